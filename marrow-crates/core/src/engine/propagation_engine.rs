use std::collections::VecDeque;

use log::debug;
use log::trace;

use super::events::strengthen;
use super::propagation::store::PropagatorStore;
use super::propagation::Entailment;
use super::propagation::NotificationContext;
use super::propagation::PropagationContext;
use super::propagation::PropagationContextMut;
use super::propagation::PropagatorId;
use super::variable_queue::VariableQueue;
use super::variables::DomainId;
use super::variables::VariableStore;
use crate::basic_types::Contradiction;
use crate::basic_types::ContradictionInfo;
use crate::basic_types::PropagationStatus;
use crate::create_statistics_struct;
use crate::marrow_assert_advanced;
use crate::marrow_assert_simple;
use crate::options::EngineOptions;
use crate::statistics::CumulativeMovingAverage;
use crate::statistics::MovingAverage;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;
use crate::trailing::StoredBool;
use crate::trailing::StoredPrimitive;
use crate::trailing::TrailedValues;

create_statistics_struct!(
    /// Statistics about the propagation engine.
    EngineStatistics {
        /// The number of calls to `propagate_from_scratch` during the initial pass.
        num_coarse_propagations: u64,
        /// The number of event-driven calls to `propagate`.
        num_fine_propagations: u64,
        /// The number of variables taken from the queue.
        num_dequeues: u64,
        /// The number of notifications dropped because the propagator caused every pending event.
        num_suppressed_self_notifications: u64,
        /// The number of notifications for which `advise` declined propagation.
        num_declined_by_advise: u64,
        /// The number of propagators deactivated because they were entailed.
        num_entailed_propagators: u64,
        num_contradictions: u64,
        num_fixpoints: u64,
        average_dequeues_per_fixpoint: CumulativeMovingAverage<u64>,
});

/// The phase of the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Running,
    /// A contradiction interrupted propagation; [`crate::Model::flush`] must be called before
    /// propagating again.
    Contradicted,
}

/// Drives the propagators to a fixpoint.
///
/// The first call to [`PropagationEngine::propagate`] runs every propagator once from scratch, in
/// registration order (or by priority, see [`EngineOptions`]). After that, modified variables are
/// taken from a FIFO queue and the propagators subscribed to them are notified in registration
/// order with the events they have not caused themselves.
#[derive(Debug)]
pub(crate) struct PropagationEngine {
    options: EngineOptions,
    state: EngineState,
    is_initialized: bool,
    /// Propagators still waiting for their initial pass.
    awake_queue: VecDeque<PropagatorId>,
    variable_queue: VariableQueue,
    /// Reused for every contradiction.
    contradiction: ContradictionInfo,
    statistics: EngineStatistics,
}

impl PropagationEngine {
    pub(crate) fn new(options: EngineOptions) -> Self {
        PropagationEngine {
            options,
            state: EngineState::Idle,
            is_initialized: false,
            awake_queue: VecDeque::new(),
            variable_queue: VariableQueue::default(),
            contradiction: ContradictionInfo::default(),
            statistics: EngineStatistics::default(),
        }
    }

    pub(crate) fn state(&self) -> EngineState {
        self.state
    }

    pub(crate) fn is_initialized(&self) -> bool {
        self.is_initialized
    }

    pub(crate) fn last_contradiction(&self) -> &ContradictionInfo {
        &self.contradiction
    }

    pub(crate) fn statistics(&self) -> &EngineStatistics {
        &self.statistics
    }

    pub(crate) fn has_pending_events(&self) -> bool {
        !self.variable_queue.is_empty()
    }

    /// Schedules the initial pass over every propagator. Has no effect after the first call.
    pub(crate) fn initialize(&mut self, propagators: &PropagatorStore) {
        if self.is_initialized {
            return;
        }

        self.awake_queue.extend(propagators.ids());
        if self.options.sort_initial_pass_by_priority {
            // Stable, so registration order breaks ties.
            self.awake_queue.make_contiguous().sort_by_key(|&id| {
                let slot = propagators.slot(id);
                (slot.propagator.priority(), slot.variables.len())
            });
        }

        self.is_initialized = true;
        debug!(
            "engine initialised with {} propagators",
            propagators.num_propagators()
        );
    }

    /// Records a contradiction and returns the token to propagate.
    pub(crate) fn fails(
        &mut self,
        cause: Option<PropagatorId>,
        variable: Option<DomainId>,
        message: &'static str,
    ) -> Contradiction {
        self.contradiction.set(cause, variable, message)
    }

    /// A context for modifications which do not originate from a propagator.
    pub(crate) fn decision_context<'a>(
        &'a mut self,
        variables: &'a VariableStore,
        stored_values: &'a mut TrailedValues,
    ) -> PropagationContextMut<'a> {
        self.context(variables, stored_values, None, None)
    }

    fn context<'a>(
        &'a mut self,
        variables: &'a VariableStore,
        stored_values: &'a mut TrailedValues,
        cause: Option<PropagatorId>,
        active: Option<StoredBool>,
    ) -> PropagationContextMut<'a> {
        PropagationContextMut {
            stored_values,
            variables,
            queue: &mut self.variable_queue,
            contradiction: &mut self.contradiction,
            cause,
            active,
        }
    }

    /// Propagates until the queue is empty or a contradiction is found.
    ///
    /// After a contradiction the queue is left as it is; [`PropagationEngine::flush`] has to be
    /// called before propagating again.
    pub(crate) fn propagate(
        &mut self,
        propagators: &mut PropagatorStore,
        variables: &VariableStore,
        stored_values: &mut TrailedValues,
    ) -> PropagationStatus {
        marrow_assert_simple!(
            self.state != EngineState::Contradicted,
            "the engine must be flushed after a contradiction"
        );

        self.initialize(propagators);
        self.state = EngineState::Running;
        let dequeues_before = self.statistics.num_dequeues;

        let result = self
            .run_initial_pass(propagators, variables, stored_values)
            .and_then(|_| self.run_fine_loop(propagators, variables, stored_values));

        match result {
            Ok(()) => {
                self.state = EngineState::Idle;
                self.statistics.num_fixpoints += 1;
                self.statistics
                    .average_dequeues_per_fixpoint
                    .add_term(self.statistics.num_dequeues - dequeues_before);
            }
            Err(_) => {
                self.state = EngineState::Contradicted;
                self.statistics.num_contradictions += 1;
                debug!("contradiction: {}", self.contradiction);
            }
        }

        result
    }

    fn run_initial_pass(
        &mut self,
        propagators: &mut PropagatorStore,
        variables: &VariableStore,
        stored_values: &mut TrailedValues,
    ) -> PropagationStatus {
        // A propagator leaves the awake queue only once its pass succeeded.
        while let Some(&id) = self.awake_queue.front() {
            if propagators.is_active(id, stored_values) {
                self.statistics.num_coarse_propagations += 1;

                let slot = propagators.slot_mut(id);
                trace!("initial pass of {} ({id})", slot.propagator.name());
                let context = self.context(variables, stored_values, Some(id), Some(slot.active));
                slot.propagator.propagate_from_scratch(context)?;

                self.check_entailment(id, propagators, variables, stored_values);
            }
            let _ = self.awake_queue.pop_front();
        }
        Ok(())
    }

    fn run_fine_loop(
        &mut self,
        propagators: &mut PropagatorStore,
        variables: &VariableStore,
        stored_values: &mut TrailedValues,
    ) -> PropagationStatus {
        while let Some((variable, pending)) = self.variable_queue.pop() {
            self.statistics.num_dequeues += 1;
            trace!("dequeued {variable} with {:?}", pending.mask());

            for subscription in variables.subscriptions(variable) {
                let id = subscription.propagator;
                if !propagators.is_active(id, stored_values) {
                    continue;
                }

                let unattributed = pending.mask_excluding(id);
                if unattributed.is_empty() {
                    self.statistics.num_suppressed_self_notifications += 1;
                    continue;
                }
                let events = strengthen(unattributed) & subscription.events;
                if events.is_empty() {
                    continue;
                }

                let slot = propagators.slot_mut(id);
                marrow_assert_advanced!(slot.variables[subscription.local_id] == variable);
                marrow_assert_advanced!(
                    variables.subscriptions(variable)[slot.positions[subscription.local_id]]
                        .propagator
                        == id
                );

                let notification = NotificationContext {
                    variables,
                    stored_values,
                };
                if !slot
                    .propagator
                    .advise(notification, subscription.local_id, events)
                {
                    self.statistics.num_declined_by_advise += 1;
                    continue;
                }

                self.statistics.num_fine_propagations += 1;
                let context = self.context(variables, stored_values, Some(id), Some(slot.active));
                slot.propagator
                    .propagate(context, subscription.local_id, events)?;

                self.check_entailment(id, propagators, variables, stored_values);
            }
        }
        Ok(())
    }

    fn check_entailment(
        &mut self,
        id: PropagatorId,
        propagators: &PropagatorStore,
        variables: &VariableStore,
        stored_values: &mut TrailedValues,
    ) {
        if !self.options.check_entailment {
            return;
        }

        let slot = propagators.slot(id);
        if !slot.active.read(stored_values) {
            return;
        }
        let context = PropagationContext::new(variables, stored_values);
        if slot.propagator.is_entailed(context) == Entailment::Satisfied {
            trace!("{} ({id}) is entailed", slot.propagator.name());
            slot.active.write(stored_values, false);
            self.statistics.num_entailed_propagators += 1;
        }
    }

    /// Drops the pending events left behind by a contradiction.
    pub(crate) fn flush(&mut self) {
        self.variable_queue.clear();
        self.state = EngineState::Idle;
    }

    pub(crate) fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.statistics.log(statistic_logger)
    }
}
