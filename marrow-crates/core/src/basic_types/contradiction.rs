use std::fmt::Display;
use std::fmt::Formatter;

use thiserror::Error;

use crate::engine::propagation::PropagatorId;
use crate::engine::variables::DomainId;

/// The result of a propagation step; `Err` means the current branch is infeasible.
pub type PropagationStatus = Result<(), Contradiction>;

/// Signals that the current branch of the search tree cannot contain a solution.
///
/// The token itself carries no data. The details of the most recent contradiction are kept in a
/// single [`ContradictionInfo`] owned by the engine, which is overwritten by every failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("a contradiction was reached during propagation")]
pub struct Contradiction;

/// What caused the last [`Contradiction`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContradictionInfo {
    /// The propagator which detected the contradiction, `None` for decisions.
    pub cause: Option<PropagatorId>,
    /// The variable whose domain would have become empty, if any.
    pub variable: Option<DomainId>,
    pub message: &'static str,
}

impl ContradictionInfo {
    /// Overwrite the details and hand out the token.
    pub(crate) fn set(
        &mut self,
        cause: Option<PropagatorId>,
        variable: Option<DomainId>,
        message: &'static str,
    ) -> Contradiction {
        self.cause = cause;
        self.variable = variable;
        self.message = message;
        Contradiction
    }
}

impl Display for ContradictionInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(variable) = self.variable {
            write!(f, " on {variable}")?;
        }
        match self.cause {
            Some(propagator) => write!(f, " (raised by {propagator})"),
            None => write!(f, " (raised by a decision)"),
        }
    }
}

/// Messages attached to contradictions raised by the domains.
pub(crate) mod messages {
    pub(crate) const EMPTY_LOWER_BOUND: &str = "the new lower bound exceeds the upper bound";
    pub(crate) const EMPTY_UPPER_BOUND: &str = "the new upper bound is below the lower bound";
    pub(crate) const VALUE_NOT_IN_DOMAIN: &str = "the instantiation value is not in the domain";
    pub(crate) const LAST_VALUE_REMOVED: &str = "the last value of the domain was removed";
}
