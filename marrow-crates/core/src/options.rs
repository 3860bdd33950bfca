//! Configuration of the [`crate::Model`].

/// Options for the propagation engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EngineOptions {
    /// Ask every propagator whether it is entailed after it propagated; entailed propagators are
    /// deactivated until the current world is popped.
    pub check_entailment: bool,
    /// Order the initial pass over the propagators by [`crate::engine::propagation::Priority`]
    /// and arity instead of registration order.
    pub sort_initial_pass_by_priority: bool,
}

/// Options for the [`crate::Model`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ModelOptions {
    pub engine: EngineOptions,
    /// The number of stored cells and trail entries to allocate up front.
    pub initial_trail_capacity: usize,
}
