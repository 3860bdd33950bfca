//! A minimal depth-first search over a [`Model`](crate::Model).
//!
//! The search branches on the first unfixed variable (in creation order) and tries its smallest
//! value first: the left branch instantiates the variable, the right branch removes the value.
//! It is the consumer of the contradiction channel; every contradiction is flushed and answered
//! by backtracking to the most recent open branch.
mod depth_first_search;
mod outcome;
mod solution;

pub use depth_first_search::DepthFirstSearch;
pub use depth_first_search::SearchStatistics;
pub use outcome::IteratedSolution;
pub use outcome::SatisfactionResult;
pub use solution::Solution;
