#![cfg(test)]
//! Helpers for testing propagators: the [`TestSolver`] sets up a model with a single propagator
//! and lets tests apply modifications and inspect the domains.
use super::propagation::PropagatorConstructor;
use super::propagation::PropagatorHandle;
use super::propagation::PropagatorId;
use super::propagation::ReadDomains;
use super::variables::DomainId;
use super::Model;
use crate::basic_types::Contradiction;
use crate::basic_types::ContradictionInfo;
use crate::basic_types::ModelError;
use crate::options::EngineOptions;
use crate::options::ModelOptions;

/// A model which is propagated as soon as a propagator is added.
#[derive(Debug, Default)]
pub(crate) struct TestSolver {
    pub(crate) model: Model,
}

impl TestSolver {
    pub(crate) fn with_entailment_checks() -> Self {
        TestSolver {
            model: Model::with_options(ModelOptions {
                engine: EngineOptions {
                    check_entailment: true,
                    ..Default::default()
                },
                ..Default::default()
            }),
        }
    }

    pub(crate) fn new_variable(&mut self, lb: i32, ub: i32) -> DomainId {
        self.model.new_enumerated_variable(lb, ub, None)
    }

    pub(crate) fn new_interval_variable(&mut self, lb: i32, ub: i32) -> DomainId {
        self.model.new_interval_variable(lb, ub, None)
    }

    pub(crate) fn new_sparse_variable(&mut self, values: Vec<i32>) -> DomainId {
        self.model.new_sparse_variable(values, None)
    }

    /// Adds the propagator and propagates to a fixpoint.
    ///
    /// A contradiction is flushed before it is returned.
    pub(crate) fn new_propagator<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> Result<PropagatorId, Contradiction>
    where
        Constructor: PropagatorConstructor,
        Constructor::PropagatorImpl: 'static,
    {
        self.new_propagator_with_handle(constructor)
            .map(|handle| handle.untyped())
    }

    pub(crate) fn new_propagator_with_handle<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> Result<PropagatorHandle<Constructor::PropagatorImpl>, Contradiction>
    where
        Constructor: PropagatorConstructor,
        Constructor::PropagatorImpl: 'static,
    {
        let handle = self
            .model
            .add_propagator(constructor)
            .unwrap_or_else(|error: ModelError| panic!("misbuilt test model: {error}"));
        self.propagate_until_fixed_point()?;
        Ok(handle)
    }

    pub(crate) fn propagate_until_fixed_point(&mut self) -> Result<(), Contradiction> {
        let result = self.model.propagate();
        if result.is_err() {
            self.model.flush();
        }
        result
    }

    pub(crate) fn lower_bound(&self, var: DomainId) -> i32 {
        self.model.lower_bound(var)
    }

    pub(crate) fn upper_bound(&self, var: DomainId) -> i32 {
        self.model.upper_bound(var)
    }

    pub(crate) fn contains(&self, var: DomainId, value: i32) -> bool {
        self.model.contains(var, value)
    }

    pub(crate) fn assert_bounds(&self, var: DomainId, lb: i32, ub: i32) {
        let actual_lb = self.lower_bound(var);
        let actual_ub = self.upper_bound(var);

        assert_eq!(
            (lb, ub),
            (actual_lb, actual_ub),
            "The expected bounds [{lb}..{ub}] did not match the actual bounds [{actual_lb}..{actual_ub}]"
        );
    }

    pub(crate) fn remove(&mut self, var: DomainId, value: i32) -> Result<bool, Contradiction> {
        self.model.remove_value(var, value)
    }

    pub(crate) fn increase_lower_bound(
        &mut self,
        var: DomainId,
        value: i32,
    ) -> Result<bool, Contradiction> {
        self.model.update_lower_bound(var, value)
    }

    pub(crate) fn decrease_upper_bound(
        &mut self,
        var: DomainId,
        value: i32,
    ) -> Result<bool, Contradiction> {
        self.model.update_upper_bound(var, value)
    }

    pub(crate) fn set(&mut self, var: DomainId, value: i32) -> Result<bool, Contradiction> {
        self.model.instantiate_to(var, value)
    }

    pub(crate) fn last_contradiction(&self) -> &ContradictionInfo {
        self.model.last_contradiction()
    }
}
