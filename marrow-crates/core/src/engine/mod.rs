//! The domain variables, the propagators and the engine which drives them to a fixpoint.
mod events;
mod model;
pub mod propagation;
mod propagation_engine;
pub(crate) mod variable_queue;
pub mod variables;

#[cfg(test)]
pub(crate) mod test_solver;

pub use events::strengthen;
pub use events::DomainEvents;
pub use events::EventMask;
pub use events::IntEventKind;
pub use model::Model;
pub use propagation_engine::EngineState;
pub use propagation_engine::EngineStatistics;
