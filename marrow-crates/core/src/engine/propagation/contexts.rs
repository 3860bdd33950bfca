use log::trace;

use super::PropagatorId;
use crate::basic_types::Contradiction;
use crate::basic_types::ContradictionInfo;
use crate::engine::variable_queue::VariableQueue;
use crate::engine::variables::DomainId;
use crate::engine::variables::DomainUpdate;
use crate::engine::variables::EmptyDomain;
use crate::engine::variables::IntegerDomain;
use crate::engine::variables::IntegerVariable;
use crate::engine::variables::VariableStore;
use crate::engine::IntEventKind;
use crate::trailing::ManipulateStoredValues;
use crate::trailing::ReadStoredValues;
use crate::trailing::StoredBool;
use crate::trailing::StoredPrimitive;
use crate::trailing::TrailedValues;

/// A read-only view of the domains.
#[derive(Clone, Copy, Debug)]
pub struct Domains<'a> {
    pub(crate) variables: &'a VariableStore,
    pub(crate) stored_values: &'a TrailedValues,
}

impl<'a> Domains<'a> {
    pub(crate) fn new(variables: &'a VariableStore, stored_values: &'a TrailedValues) -> Self {
        Domains {
            variables,
            stored_values,
        }
    }
}

/// Read access to the current domains of the variables.
pub trait ReadDomains {
    fn domains(&self) -> Domains<'_>;

    fn lower_bound<Var: IntegerVariable>(&self, variable: Var) -> i32 {
        variable.lower_bound(self.domains())
    }

    fn upper_bound<Var: IntegerVariable>(&self, variable: Var) -> i32 {
        variable.upper_bound(self.domains())
    }

    fn size<Var: IntegerVariable>(&self, variable: Var) -> usize {
        variable.size(self.domains())
    }

    fn contains<Var: IntegerVariable>(&self, variable: Var, value: i32) -> bool {
        variable.contains(self.domains(), value)
    }

    fn is_fixed<Var: IntegerVariable>(&self, variable: Var) -> bool {
        self.lower_bound(variable) == self.upper_bound(variable)
    }

    /// The value of the variable if its domain is a singleton.
    fn fixed_value<Var: IntegerVariable>(&self, variable: Var) -> Option<i32> {
        self.is_fixed(variable)
            .then(|| self.lower_bound(variable))
    }

    /// The smallest value in the domain which is strictly greater than `value`.
    fn next_value<Var: IntegerVariable>(&self, variable: Var, value: i32) -> Option<i32> {
        variable.next_value(self.domains(), value)
    }

    /// The largest value in the domain which is strictly smaller than `value`.
    fn previous_value<Var: IntegerVariable>(&self, variable: Var, value: i32) -> Option<i32> {
        variable.previous_value(self.domains(), value)
    }

    /// The values of the domain in increasing order.
    fn iterate_domain<Var: IntegerVariable>(
        &self,
        variable: Var,
    ) -> impl Iterator<Item = i32> + '_ {
        let domains = self.domains();
        std::iter::successors(Some(variable.lower_bound(domains)), move |&value| {
            variable.next_value(domains, value)
        })
    }
}

impl ReadDomains for Domains<'_> {
    fn domains(&self) -> Domains<'_> {
        *self
    }
}

/// Provided to [`super::Propagator::is_entailed`]; it can only read.
#[derive(Clone, Copy, Debug)]
pub struct PropagationContext<'a> {
    pub(crate) variables: &'a VariableStore,
    pub(crate) stored_values: &'a TrailedValues,
}

impl<'a> PropagationContext<'a> {
    pub(crate) fn new(variables: &'a VariableStore, stored_values: &'a TrailedValues) -> Self {
        PropagationContext {
            variables,
            stored_values,
        }
    }
}

impl ReadDomains for PropagationContext<'_> {
    fn domains(&self) -> Domains<'_> {
        Domains::new(self.variables, self.stored_values)
    }
}

impl ReadStoredValues for PropagationContext<'_> {
    fn stored_values(&self) -> &TrailedValues {
        self.stored_values
    }
}

/// Provided to [`super::Propagator::advise`]; domains are read-only but the propagator may update
/// its stored state.
#[derive(Debug)]
pub struct NotificationContext<'a> {
    pub(crate) variables: &'a VariableStore,
    pub(crate) stored_values: &'a mut TrailedValues,
}

impl ReadDomains for NotificationContext<'_> {
    fn domains(&self) -> Domains<'_> {
        Domains::new(self.variables, self.stored_values)
    }
}

impl ReadStoredValues for NotificationContext<'_> {
    fn stored_values(&self) -> &TrailedValues {
        self.stored_values
    }
}

impl ManipulateStoredValues for NotificationContext<'_> {
    fn stored_values_mut(&mut self) -> &mut TrailedValues {
        self.stored_values
    }
}

/// Provided to propagators while they filter, and used for decisions made from outside the
/// engine.
///
/// Every successful domain modification schedules the variable in the engine queue, tagged with
/// the cause of the modification. A modification which would empty a domain leaves the domain
/// untouched and returns a [`Contradiction`].
#[derive(Debug)]
pub struct PropagationContextMut<'a> {
    pub(crate) stored_values: &'a mut TrailedValues,
    pub(crate) variables: &'a VariableStore,
    pub(crate) queue: &'a mut VariableQueue,
    pub(crate) contradiction: &'a mut ContradictionInfo,
    /// `None` when the modifications do not come from a propagator.
    pub(crate) cause: Option<PropagatorId>,
    pub(crate) active: Option<StoredBool>,
}

impl PropagationContextMut<'_> {
    /// Sets the lower bound of `variable` to at least `value`.
    ///
    /// Returns whether the domain changed.
    pub fn update_lower_bound<Var: IntegerVariable>(
        &mut self,
        variable: Var,
        value: i32,
    ) -> Result<bool, Contradiction> {
        variable.update_lower_bound(self, value)
    }

    /// Sets the upper bound of `variable` to at most `value`.
    pub fn update_upper_bound<Var: IntegerVariable>(
        &mut self,
        variable: Var,
        value: i32,
    ) -> Result<bool, Contradiction> {
        variable.update_upper_bound(self, value)
    }

    /// Removes `value` from the domain of `variable`.
    ///
    /// On interval domains only the removal of a bound has an effect.
    pub fn remove_value<Var: IntegerVariable>(
        &mut self,
        variable: Var,
        value: i32,
    ) -> Result<bool, Contradiction> {
        variable.remove_value(self, value)
    }

    /// Removes every value in `from..=to` from the domain of `variable`.
    pub fn remove_interval<Var: IntegerVariable>(
        &mut self,
        variable: Var,
        from: i32,
        to: i32,
    ) -> Result<bool, Contradiction> {
        variable.remove_interval(self, from, to)
    }

    /// Reduces the domain of `variable` to `value`.
    pub fn instantiate_to<Var: IntegerVariable>(
        &mut self,
        variable: Var,
        value: i32,
    ) -> Result<bool, Contradiction> {
        variable.instantiate_to(self, value)
    }

    /// Records a contradiction detected by the filtering logic itself.
    ///
    /// The returned token should be returned from the propagator.
    pub fn fails(&mut self, variable: Option<DomainId>, message: &'static str) -> Contradiction {
        self.contradiction.set(self.cause, variable, message)
    }

    /// Deactivates the propagator for the rest of the current subtree; it is reactivated when the
    /// world in which this was called is popped.
    pub fn set_passive(&mut self) {
        if let Some(active) = self.active {
            active.write(self.stored_values, false);
        }
    }

    pub(crate) fn modify(
        &mut self,
        variable: DomainId,
        update: impl FnOnce(&IntegerDomain, &mut TrailedValues) -> DomainUpdate,
    ) -> Result<bool, Contradiction> {
        match update(self.variables.domain(variable), self.stored_values) {
            Ok(Some(kind)) => {
                self.on_variable_update(variable, kind);
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(EmptyDomain(message)) => Err(self.fails(Some(variable), message)),
        }
    }

    fn on_variable_update(&mut self, variable: DomainId, kind: IntEventKind) {
        trace!(
            "{kind} on {variable} caused by {}",
            self.cause
                .map_or_else(|| "a decision".to_owned(), |cause| cause.to_string())
        );
        if !self.variables.subscriptions(variable).is_empty() {
            self.queue.schedule(variable, kind, self.cause);
        }
    }
}

impl ReadDomains for PropagationContextMut<'_> {
    fn domains(&self) -> Domains<'_> {
        Domains::new(self.variables, self.stored_values)
    }
}

impl ReadStoredValues for PropagationContextMut<'_> {
    fn stored_values(&self) -> &TrailedValues {
        self.stored_values
    }
}

impl ManipulateStoredValues for PropagationContextMut<'_> {
    fn stored_values_mut(&mut self) -> &mut TrailedValues {
        self.stored_values
    }
}
