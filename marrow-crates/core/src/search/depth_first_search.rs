use log::debug;
use log::info;

use super::IteratedSolution;
use super::SatisfactionResult;
use super::Solution;
use crate::create_statistics_struct;
use crate::engine::propagation::ReadDomains;
use crate::engine::variables::DomainId;
use crate::engine::Model;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;
use crate::termination::TerminationCondition;

create_statistics_struct!(
    /// Statistics about the search tree.
    SearchStatistics {
        num_decisions: u64,
        /// The number of contradictions, including those raised while refuting a decision.
        num_failures: u64,
        num_solutions: u64,
        /// The largest number of open decisions at any point.
        max_depth: u64,
});

/// A decision `variable = value` whose refutation has not been tried yet.
#[derive(Clone, Copy, Debug)]
struct Decision {
    variable: DomainId,
    value: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SearchState {
    NotStarted,
    Searching,
    /// The last call returned a solution; the next one starts by backtracking.
    AtSolution,
    Exhausted,
}

/// Depth-first search with binary branching: `x = v` first, then `x != v`.
///
/// The search operates inside a world pushed on top of the world it started in, so that the
/// refutations of the first decisions can be undone by [`DepthFirstSearch::reset`].
#[derive(Debug)]
pub struct DepthFirstSearch {
    decisions: Vec<Decision>,
    /// The world the model was in when the search started.
    root_world: usize,
    state: SearchState,
    /// The solutions reported since the last reset.
    num_solutions_in_run: u64,
    statistics: SearchStatistics,
}

impl Default for DepthFirstSearch {
    fn default() -> Self {
        DepthFirstSearch {
            decisions: Vec::new(),
            root_world: 0,
            state: SearchState::NotStarted,
            num_solutions_in_run: 0,
            statistics: SearchStatistics::default(),
        }
    }
}

impl DepthFirstSearch {
    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    pub fn log_statistics(&self) {
        self.statistics.log(StatisticLogger::new(["search"]));
    }

    /// Finds a single solution, starting a new search, and restores the model to the world the
    /// search started in.
    pub fn satisfy(
        &mut self,
        model: &mut Model,
        termination: &mut impl TerminationCondition,
    ) -> SatisfactionResult {
        self.reset(model);
        let result = match self.next_solution(model, termination) {
            IteratedSolution::Solution(solution) => SatisfactionResult::Satisfiable(solution),
            // Without an earlier solution in this run both mean the same.
            IteratedSolution::Unsatisfiable | IteratedSolution::Finished => {
                SatisfactionResult::Unsatisfiable
            }
            IteratedSolution::Unknown => SatisfactionResult::Unknown,
        };
        self.reset(model);
        result
    }

    /// Continues the search until the next solution.
    ///
    /// The model is left at the solution; it is restored by the next call, or by
    /// [`DepthFirstSearch::reset`].
    pub fn next_solution(
        &mut self,
        model: &mut Model,
        termination: &mut impl TerminationCondition,
    ) -> IteratedSolution {
        match self.state {
            SearchState::NotStarted => {
                self.root_world = model.world_index();
                if model.propagate().is_err() {
                    model.flush();
                    self.statistics.num_failures += 1;
                    info!("the model is infeasible at the root");
                    self.state = SearchState::Exhausted;
                    return IteratedSolution::Unsatisfiable;
                }
                let _ = model.world_push();
                self.state = SearchState::Searching;
            }
            SearchState::AtSolution => {
                self.state = SearchState::Searching;
                if !self.backtrack(model) {
                    return self.exhausted(model);
                }
            }
            SearchState::Searching => {}
            SearchState::Exhausted => return self.exhausted_result(),
        }

        loop {
            if termination.should_stop() {
                info!(
                    "search stopped after {} decisions",
                    self.statistics.num_decisions
                );
                return IteratedSolution::Unknown;
            }

            let Some(variable) = model.variables().find(|&variable| !model.is_fixed(variable))
            else {
                let violated = model.violated_propagators();
                if violated.is_empty() {
                    self.statistics.num_solutions += 1;
                    self.num_solutions_in_run += 1;
                    self.state = SearchState::AtSolution;
                    info!(
                        "found solution {} at depth {}",
                        self.statistics.num_solutions,
                        self.decisions.len()
                    );
                    return IteratedSolution::Solution(Solution::from_model(model));
                }

                debug!("assignment violates {violated:?}");
                self.statistics.num_failures += 1;
                if !self.backtrack(model) {
                    return self.exhausted(model);
                }
                continue;
            };

            let value = model.lower_bound(variable);
            let _ = model.world_push();
            self.decisions.push(Decision { variable, value });
            termination.decision_has_been_made();
            self.statistics.num_decisions += 1;
            self.statistics.max_depth = self.statistics.max_depth.max(self.decisions.len() as u64);
            debug!("decide {variable} = {value}");

            let status = model
                .instantiate_to(variable, value)
                .and_then(|_| model.propagate());
            if status.is_err() {
                self.fail(model);
                if !self.backtrack(model) {
                    return self.exhausted(model);
                }
            }
        }
    }

    /// Pops the search worlds and forgets every open decision.
    pub fn reset(&mut self, model: &mut Model) {
        if self.state == SearchState::NotStarted {
            return;
        }
        model.flush();
        model.world_pop_until(self.root_world);
        self.decisions.clear();
        self.num_solutions_in_run = 0;
        self.state = SearchState::NotStarted;
    }

    /// Undoes decisions until one can be refuted without a contradiction.
    ///
    /// Returns `false` when no decision is left.
    fn backtrack(&mut self, model: &mut Model) -> bool {
        while let Some(Decision { variable, value }) = self.decisions.pop() {
            model.world_pop();
            debug!("refute {variable} = {value}");

            let status = model
                .remove_value(variable, value)
                .and_then(|_| model.propagate());
            match status {
                Ok(()) => return true,
                Err(_) => self.fail(model),
            }
        }
        false
    }

    fn fail(&mut self, model: &mut Model) {
        debug!("contradiction: {}", model.last_contradiction());
        model.flush();
        self.statistics.num_failures += 1;
    }

    fn exhausted(&mut self, model: &mut Model) -> IteratedSolution {
        model.world_pop_until(self.root_world);
        self.state = SearchState::Exhausted;
        info!(
            "search exhausted after {} decisions and {} solutions",
            self.statistics.num_decisions, self.statistics.num_solutions
        );
        self.exhausted_result()
    }

    fn exhausted_result(&self) -> IteratedSolution {
        if self.num_solutions_in_run == 0 {
            IteratedSolution::Unsatisfiable
        } else {
            IteratedSolution::Finished
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propagators::BinaryLessOrEqualArgs;
    use crate::propagators::NotEqualArgs;
    use crate::termination::DecisionBudget;
    use crate::termination::Indefinite;

    fn all_different(model: &mut Model, variables: &[DomainId]) {
        for (index, &a) in variables.iter().enumerate() {
            for &b in &variables[index + 1..] {
                let _ = model
                    .add_propagator(NotEqualArgs { a, b })
                    .expect("valid propagator");
            }
        }
    }

    #[test]
    fn enumerates_every_solution() {
        let mut model = Model::default();
        let x = model.new_enumerated_variable(0, 2, Some("x"));
        let y = model.new_enumerated_variable(0, 2, Some("y"));
        let _ = model
            .add_propagator(BinaryLessOrEqualArgs::less_than(x, y))
            .expect("valid propagator");

        let mut search = DepthFirstSearch::default();
        let mut solutions = Vec::new();
        loop {
            match search.next_solution(&mut model, &mut Indefinite) {
                IteratedSolution::Solution(solution) => {
                    solutions.push((solution.value(x), solution.value(y)))
                }
                IteratedSolution::Finished => break,
                other => panic!("unexpected outcome {other:?}"),
            }
        }

        assert_eq!(vec![(0, 1), (0, 2), (1, 2)], solutions);
        assert_eq!(0, model.world_index());
        assert_eq!(3, search.statistics().num_solutions);
    }

    #[test]
    fn pigeonhole_is_unsatisfiable() {
        let mut model = Model::default();
        let holes: Vec<DomainId> = (0..4)
            .map(|_| model.new_enumerated_variable(0, 2, None))
            .collect();
        all_different(&mut model, &holes);

        let mut search = DepthFirstSearch::default();
        let result = search.satisfy(&mut model, &mut Indefinite);

        assert_eq!(SatisfactionResult::Unsatisfiable, result);
        assert!(search.statistics().num_failures > 0);
        assert_eq!(0, model.world_index());
        for &hole in &holes {
            assert_eq!((0, 2), (model.lower_bound(hole), model.upper_bound(hole)));
        }
    }

    #[test]
    fn root_contradiction_is_unsatisfiable() {
        let mut model = Model::default();
        let x = model.new_enumerated_variable(3, 5, None);
        let y = model.new_enumerated_variable(0, 3, None);
        let _ = model
            .add_propagator(BinaryLessOrEqualArgs::less_than(x, y))
            .expect("valid propagator");

        let mut search = DepthFirstSearch::default();
        assert_eq!(
            SatisfactionResult::Unsatisfiable,
            search.satisfy(&mut model, &mut Indefinite)
        );
        assert_eq!(0, search.statistics().num_decisions);
    }

    #[test]
    fn satisfy_restores_the_starting_world() {
        let mut model = Model::default();
        let x = model.new_enumerated_variable(0, 3, None);
        let y = model.new_enumerated_variable(0, 3, None);
        all_different(&mut model, &[x, y]);

        let mut search = DepthFirstSearch::default();
        let SatisfactionResult::Satisfiable(solution) = search.satisfy(&mut model, &mut Indefinite)
        else {
            panic!("x != y has solutions");
        };

        assert_eq!((0, 1), (solution.value(x), solution.value(y)));
        assert_eq!(0, model.world_index());
        assert_eq!(4, model.size(x));
    }

    #[test]
    fn decision_budget_stops_the_search() {
        let mut model = Model::default();
        let variables: Vec<DomainId> = (0..5)
            .map(|_| model.new_enumerated_variable(0, 4, None))
            .collect();
        all_different(&mut model, &variables);

        let mut search = DepthFirstSearch::default();
        let result = search.satisfy(&mut model, &mut DecisionBudget::new(2));

        assert_eq!(SatisfactionResult::Unknown, result);
        assert_eq!(2, search.statistics().num_decisions);
        assert_eq!(0, model.world_index());
    }
}
