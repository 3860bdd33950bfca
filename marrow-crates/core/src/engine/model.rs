use log::debug;
use log::warn;

use super::propagation::store::PropagatorStore;
use super::propagation::Domains;
use super::propagation::Entailment;
use super::propagation::PropagationContext;
use super::propagation::PropagationContextMut;
use super::propagation::Propagator;
use super::propagation::PropagatorConstructor;
use super::propagation::PropagatorConstructorContext;
use super::propagation::PropagatorHandle;
use super::propagation::PropagatorId;
use super::propagation::ReadDomains;
use super::propagation_engine::EngineStatistics;
use super::propagation_engine::PropagationEngine;
use super::variables::DomainId;
use super::variables::DomainKind;
use super::variables::IntegerDomain;
use super::variables::IntegerVariable;
use super::variables::VariableNames;
use super::variables::VariableStore;
use super::EngineState;
use crate::basic_types::Contradiction;
use crate::basic_types::ContradictionInfo;
use crate::basic_types::ModelError;
use crate::basic_types::PropagationStatus;
use crate::marrow_assert_simple;
use crate::options::ModelOptions;
use crate::statistics::log_statistic;
use crate::statistics::log_statistic_postfix;
use crate::statistics::should_log_statistics;
use crate::statistics::StatisticLogger;
use crate::trailing::ManipulateStoredValues;
use crate::trailing::ReadStoredValues;
use crate::trailing::StoredBool;
use crate::trailing::StoredInt;
use crate::trailing::StoredLong;
use crate::trailing::TrailStatistics;
use crate::trailing::TrailedValues;

/// The container of variables and propagators, and the entry point for search.
///
/// A model is built by creating variables and adding propagators. The first call to
/// [`Model::propagate`] initialises the engine, after which no propagators can be added.
///
/// Search explores the tree of worlds: [`Model::world_push`] saves the state,
/// decisions are applied through the mutators ([`Model::instantiate_to`],
/// [`Model::remove_value`], ...) and [`Model::propagate`] filters until a fixpoint or a
/// [`Contradiction`]. After a contradiction, [`Model::flush`] must be called before the state is
/// restored with [`Model::world_pop`].
#[derive(Debug)]
pub struct Model {
    stored_values: TrailedValues,
    variables: VariableStore,
    variable_names: VariableNames,
    propagators: PropagatorStore,
    engine: PropagationEngine,
}

impl Default for Model {
    fn default() -> Self {
        Model::with_options(ModelOptions::default())
    }
}

/// Operations to build the model.
impl Model {
    pub fn with_options(options: ModelOptions) -> Self {
        Model {
            stored_values: TrailedValues::with_capacity(options.initial_trail_capacity),
            variables: VariableStore::default(),
            variable_names: VariableNames::default(),
            propagators: PropagatorStore::default(),
            engine: PropagationEngine::new(options.engine),
        }
    }

    /// Creates a variable which only stores its bounds.
    ///
    /// Removing a value from the interior of such a domain has no effect.
    ///
    /// # Panics
    /// If `lower_bound > upper_bound`.
    pub fn new_interval_variable(
        &mut self,
        lower_bound: i32,
        upper_bound: i32,
        name: Option<&str>,
    ) -> DomainId {
        marrow_assert_simple!(
            lower_bound <= upper_bound,
            "cannot create a variable with the empty domain [{lower_bound}, {upper_bound}]"
        );
        let domain = IntegerDomain::interval(&mut self.stored_values, lower_bound, upper_bound);
        self.add_variable(domain, name)
    }

    /// Creates a variable over `lower_bound..=upper_bound` which supports holes.
    ///
    /// # Panics
    /// If `lower_bound > upper_bound`, or if the range holds more than
    /// [`super::variables::MAX_ENUMERATED_RANGE`] values; such ranges should use
    /// [`Model::new_interval_variable`].
    pub fn new_enumerated_variable(
        &mut self,
        lower_bound: i32,
        upper_bound: i32,
        name: Option<&str>,
    ) -> DomainId {
        marrow_assert_simple!(
            lower_bound <= upper_bound,
            "cannot create a variable with the empty domain [{lower_bound}, {upper_bound}]"
        );
        let domain = IntegerDomain::bitset(&mut self.stored_values, lower_bound, upper_bound);
        self.add_variable(domain, name)
    }

    /// Creates a variable whose domain is exactly the given values.
    ///
    /// Dense value sets are stored as a bitset over their range, very sparse ones as a sorted
    /// array of values.
    ///
    /// # Panics
    /// If `values` is empty.
    pub fn new_sparse_variable(&mut self, mut values: Vec<i32>, name: Option<&str>) -> DomainId {
        marrow_assert_simple!(
            !values.is_empty(),
            "cannot create a variable with an empty domain"
        );
        values.sort_unstable();
        values.dedup();
        let domain = IntegerDomain::from_sorted_values(&mut self.stored_values, &values);
        self.add_variable(domain, name)
    }

    /// Creates a 0-1 variable.
    pub fn new_boolean_variable(&mut self, name: Option<&str>) -> DomainId {
        let domain = IntegerDomain::boolean(&mut self.stored_values);
        self.add_variable(domain, name)
    }

    fn add_variable(&mut self, domain: IntegerDomain, name: Option<&str>) -> DomainId {
        let variable = self.variables.grow(domain);
        if let Some(name) = name {
            self.variable_names.add(variable, name.to_owned());
        }
        variable
    }

    /// Creates a backtrackable integer which can be used for search state.
    pub fn new_stored_int(&mut self, initial_value: i32) -> StoredInt {
        self.stored_values.new_stored_int(initial_value)
    }

    pub fn new_stored_long(&mut self, initial_value: i64) -> StoredLong {
        self.stored_values.new_stored_long(initial_value)
    }

    pub fn new_stored_bool(&mut self, initial_value: bool) -> StoredBool {
        self.stored_values.new_stored_bool(initial_value)
    }

    /// Adds a propagator to the model.
    ///
    /// The propagator is not run until [`Model::propagate`] is called. Propagators cannot be
    /// added once the engine is initialised.
    pub fn add_propagator<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> Result<PropagatorHandle<Constructor::PropagatorImpl>, ModelError>
    where
        Constructor: PropagatorConstructor,
        Constructor::PropagatorImpl: 'static,
    {
        if self.engine.is_initialized() {
            warn!("rejected a propagator added after the engine was initialised");
            return Err(ModelError::DynamicPropagatorAddition);
        }

        let propagator_id = self.propagators.next_id();
        let mut context = PropagatorConstructorContext::new(
            propagator_id,
            &mut self.stored_values,
            &self.variables,
        );
        let propagator = constructor.create(&mut context);
        let registrations = context.registrations;

        if let Err(error) = PropagatorStore::validate_registrations(&registrations, &self.variables)
        {
            warn!("rejected propagator {}: {error}", propagator.name());
            return Err(error);
        }

        debug!(
            "added propagator {} ({propagator_id}) over {} variables",
            propagator.name(),
            registrations.len()
        );
        Ok(self.propagators.add(
            propagator,
            registrations,
            &mut self.variables,
            &mut self.stored_values,
        ))
    }

    /// Get a reference to the propagator identified by the given handle.
    pub fn get_propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> Option<&P> {
        self.propagators.get_propagator(handle)
    }
}

/// Operations of the propagation engine.
impl Model {
    /// Schedules the initial pass over all propagators; called by the first [`Model::propagate`].
    pub fn initialize(&mut self) {
        self.engine.initialize(&self.propagators)
    }

    pub fn is_initialized(&self) -> bool {
        self.engine.is_initialized()
    }

    /// Propagates until a fixpoint or a contradiction.
    ///
    /// After a contradiction, [`Model::flush`] must be called before propagating again.
    pub fn propagate(&mut self) -> PropagationStatus {
        self.engine.propagate(
            &mut self.propagators,
            &self.variables,
            &mut self.stored_values,
        )
    }

    /// Propagates the root of the model, reporting infeasibility as a [`ModelError`].
    pub fn propagate_at_root(&mut self) -> Result<(), ModelError> {
        marrow_assert_simple!(self.world_index() == 0, "not at the root world");
        self.propagate().map_err(|_| {
            self.flush();
            ModelError::RootInfeasible
        })
    }

    /// Drops the events left in the queue after a contradiction.
    pub fn flush(&mut self) {
        self.engine.flush()
    }

    pub fn engine_state(&self) -> EngineState {
        self.engine.state()
    }

    /// The details of the most recent contradiction.
    pub fn last_contradiction(&self) -> &ContradictionInfo {
        self.engine.last_contradiction()
    }

    /// Raises a contradiction on behalf of the caller, e.g. when a search-level condition fails.
    pub fn fails(&mut self, variable: Option<DomainId>, message: &'static str) -> Contradiction {
        self.engine.fails(None, variable, message)
    }

    pub fn engine_statistics(&self) -> &EngineStatistics {
        self.engine.statistics()
    }

    /// Whether the propagator is active in the current world.
    pub fn is_propagator_active(&self, propagator: PropagatorId) -> bool {
        self.propagators.is_active(propagator, &self.stored_values)
    }

    /// The propagators which report [`Entailment::Violated`] for the current domains.
    pub fn violated_propagators(&self) -> Vec<PropagatorId> {
        let context = PropagationContext::new(&self.variables, &self.stored_values);
        self.propagators
            .ids()
            .filter(|&id| {
                self.propagators.slot(id).propagator.is_entailed(context) == Entailment::Violated
            })
            .collect()
    }

    pub fn num_propagators(&self) -> usize {
        self.propagators.num_propagators()
    }
}

/// Operations on the worlds of the backtrackable store.
impl Model {
    pub fn world_index(&self) -> usize {
        self.stored_values.world_index()
    }

    /// Saves the current state; returns the index of the new world.
    ///
    /// Must be called at a fixpoint.
    pub fn world_push(&mut self) -> usize {
        marrow_assert_simple!(
            !self.engine.has_pending_events(),
            "a world can only be pushed at a fixpoint"
        );
        self.stored_values.world_push()
    }

    /// Restores the state from before the last [`Model::world_push`].
    pub fn world_pop(&mut self) {
        marrow_assert_simple!(
            self.engine.state() != EngineState::Contradicted,
            "the engine must be flushed before popping"
        );
        self.stored_values.world_pop()
    }

    /// Pops worlds until `world` is the current world.
    pub fn world_pop_until(&mut self, world: usize) {
        marrow_assert_simple!(
            world <= self.world_index(),
            "cannot pop to world {world} from world {}",
            self.world_index()
        );
        marrow_assert_simple!(
            self.engine.state() != EngineState::Contradicted,
            "the engine must be flushed before popping"
        );
        self.stored_values.world_pop_until(world)
    }

    /// Merges the current world into its parent, keeping the current state.
    pub fn world_commit(&mut self) {
        self.stored_values.world_commit()
    }

    pub fn trail_statistics(&self) -> &TrailStatistics {
        self.stored_values.statistics()
    }
}

/// Domain modifications made from outside the engine, such as decisions.
///
/// The modified variables are scheduled for propagation, which only happens on the next call to
/// [`Model::propagate`].
impl Model {
    fn decision_context(&mut self) -> PropagationContextMut<'_> {
        self.engine
            .decision_context(&self.variables, &mut self.stored_values)
    }

    pub fn instantiate_to<Var: IntegerVariable>(
        &mut self,
        variable: Var,
        value: i32,
    ) -> Result<bool, Contradiction> {
        self.decision_context().instantiate_to(variable, value)
    }

    pub fn update_lower_bound<Var: IntegerVariable>(
        &mut self,
        variable: Var,
        value: i32,
    ) -> Result<bool, Contradiction> {
        self.decision_context().update_lower_bound(variable, value)
    }

    pub fn update_upper_bound<Var: IntegerVariable>(
        &mut self,
        variable: Var,
        value: i32,
    ) -> Result<bool, Contradiction> {
        self.decision_context().update_upper_bound(variable, value)
    }

    pub fn remove_value<Var: IntegerVariable>(
        &mut self,
        variable: Var,
        value: i32,
    ) -> Result<bool, Contradiction> {
        self.decision_context().remove_value(variable, value)
    }

    pub fn remove_interval<Var: IntegerVariable>(
        &mut self,
        variable: Var,
        from: i32,
        to: i32,
    ) -> Result<bool, Contradiction> {
        self.decision_context().remove_interval(variable, from, to)
    }
}

/// Operations to retrieve information about variables.
impl Model {
    pub fn num_variables(&self) -> usize {
        self.variables.num_variables()
    }

    /// The variables in creation order.
    pub fn variables(&self) -> impl Iterator<Item = DomainId> {
        self.variables.variables()
    }

    pub fn variable_name(&self, variable: DomainId) -> Option<&str> {
        self.variable_names.get(variable)
    }

    pub fn domain_kind(&self, variable: DomainId) -> DomainKind {
        self.variables.domain(variable).kind()
    }

    /// The values in the domain of `variable`, in increasing order.
    pub fn domain_values(&self, variable: DomainId) -> Vec<i32> {
        self.iterate_domain(variable).collect()
    }

    /// Renders the domain of `variable`, e.g. `x = {1..3, 5}`.
    pub fn describe(&self, variable: DomainId) -> String {
        let name = self
            .variable_name(variable)
            .map_or_else(|| variable.to_string(), str::to_owned);

        let mut ranges: Vec<(i32, i32)> = Vec::new();
        for value in self.iterate_domain(variable) {
            match ranges.last_mut() {
                Some((_, end)) if *end + 1 == value => *end = value,
                _ => ranges.push((value, value)),
            }
        }
        let rendered = ranges
            .iter()
            .map(|&(start, end)| {
                if start == end {
                    start.to_string()
                } else {
                    format!("{start}..{end}")
                }
            })
            .collect::<Vec<_>>()
            .join(", ");

        format!("{name} = {{{rendered}}}")
    }
}

impl Model {
    /// Logs the statistics of the store, the engine and every propagator, if statistic logging is
    /// configured.
    pub fn log_statistics(&self) {
        if !should_log_statistics() {
            return;
        }

        log_statistic("variables", self.num_variables());
        log_statistic("propagators", self.num_propagators());
        self.stored_values
            .log_statistics(StatisticLogger::new(["trail"]));
        self.engine.log_statistics(StatisticLogger::new(["engine"]));
        for (index, propagator) in self.propagators.iter_propagators().enumerate() {
            propagator.log_statistics(StatisticLogger::new([
                propagator.name(),
                "number",
                index.to_string().as_str(),
            ]));
        }
        log_statistic_postfix();
    }
}

impl ReadDomains for Model {
    fn domains(&self) -> Domains<'_> {
        Domains::new(&self.variables, &self.stored_values)
    }
}

impl ReadStoredValues for Model {
    fn stored_values(&self) -> &TrailedValues {
        &self.stored_values
    }
}

impl ManipulateStoredValues for Model {
    fn stored_values_mut(&mut self) -> &mut TrailedValues {
        &mut self.stored_values
    }
}
