use crate::containers::KeyedVec;
use crate::engine::propagation::ReadDomains;
use crate::engine::variables::DomainId;
use crate::engine::Model;
use crate::marrow_assert_moderate;

/// The values of all variables in a model where every domain is a singleton.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Solution {
    values: KeyedVec<DomainId, i32>,
}

impl Solution {
    /// Takes the values of the variables of `model`, all of which must be fixed.
    pub(crate) fn from_model(model: &Model) -> Solution {
        let mut values = KeyedVec::default();
        for variable in model.variables() {
            marrow_assert_moderate!(model.is_fixed(variable));
            let _ = values.push(model.lower_bound(variable));
        }
        Solution { values }
    }

    pub fn num_variables(&self) -> usize {
        self.values.len()
    }

    /// The value of `variable` in this solution.
    ///
    /// Panics if `variable` did not exist when the solution was found.
    pub fn value(&self, variable: DomainId) -> i32 {
        self.values[variable]
    }

    pub fn get(&self, variable: DomainId) -> Option<i32> {
        self.values.get(variable).copied()
    }

    /// The values in the creation order of the variables.
    pub fn values(&self) -> impl Iterator<Item = i32> + '_ {
        self.values.iter().copied()
    }
}
