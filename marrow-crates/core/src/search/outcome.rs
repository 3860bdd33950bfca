use super::Solution;
#[cfg(doc)]
use crate::termination::TerminationCondition;

/// The result of [`super::DepthFirstSearch::satisfy`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SatisfactionResult {
    Satisfiable(Solution),
    /// There is no solution to the model.
    Unsatisfiable,
    /// The [`TerminationCondition`] stopped the search before it reached a conclusion.
    Unknown,
}

/// The result of [`super::DepthFirstSearch::next_solution`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IteratedSolution {
    /// A solution which was not reported before.
    Solution(Solution),
    /// Every solution has been reported.
    Finished,
    /// The model has no solutions at all.
    Unsatisfiable,
    /// The [`TerminationCondition`] stopped the search; it can be resumed with another call.
    Unknown,
}
