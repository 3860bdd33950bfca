use thiserror::Error;

use crate::engine::propagation::LocalId;
use crate::engine::variables::DomainId;

/// Errors which signal a misbuilt model.
///
/// These are returned when the model is assembled; a [`crate::Contradiction`] on the other hand
/// is part of normal solving.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("propagators cannot be added once the propagation engine has been initialised")]
    DynamicPropagatorAddition,
    #[error("the variable {0} does not belong to this model")]
    UnknownVariable(DomainId),
    #[error("local id {local_id} is registered more than once")]
    DuplicateLocalId { local_id: LocalId },
    #[error("local ids must be contiguous from 0, but {local_id} is used with arity {arity}")]
    NonContiguousLocalId { local_id: LocalId, arity: usize },
    #[error("the model is infeasible at the root")]
    RootInfeasible,
}
