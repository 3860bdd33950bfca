//! Propagators and the means by which they talk to the engine.
//!
//! A propagator is created by a [`PropagatorConstructor`], which registers the variables the
//! propagator listens to, each under a [`LocalId`]. The propagator then reads and modifies domains
//! through the contexts handed to it by the engine; the contexts are the only point of contact
//! between a propagator and the rest of the model.
mod constructor;
mod contexts;
mod local_id;
mod propagator;
mod propagator_id;
pub(crate) mod store;

pub(crate) use constructor::Registration;
pub use constructor::PropagatorConstructor;
pub use constructor::PropagatorConstructorContext;
pub use constructor::Watchers;
pub use contexts::Domains;
pub use contexts::NotificationContext;
pub use contexts::PropagationContext;
pub use contexts::PropagationContextMut;
pub use contexts::ReadDomains;
pub use local_id::LocalId;
pub use propagator::Entailment;
pub use propagator::Priority;
pub use propagator::Propagator;
pub use propagator_id::PropagatorHandle;
pub use propagator_id::PropagatorId;
