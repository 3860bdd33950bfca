use std::fmt::Display;

use itertools::Itertools;

use super::statistic_logging::log_statistic;
#[cfg(doc)]
use crate::engine::propagation::Propagator;

/// Logs statistics under a name prefix; used for the engine, the trail, the search and the
/// statistics of individual [`Propagator`]s.
#[derive(Debug, Default, Clone)]
pub struct StatisticLogger {
    /// The parts of the prefix, joined with `_` when a statistic is written.
    name_prefix: Vec<String>,
}

impl StatisticLogger {
    pub fn new<Input: IntoIterator<Item = impl Display>>(name_prefix: Input) -> Self {
        Self {
            name_prefix: name_prefix.into_iter().map(|part| part.to_string()).collect(),
        }
    }

    pub fn attach_to_prefix(&self, addition_to_prefix: impl Display) -> Self {
        let mut name_prefix = self.name_prefix.clone();
        name_prefix.push(addition_to_prefix.to_string());
        Self { name_prefix }
    }

    fn name(&self) -> String {
        self.name_prefix.iter().join("_")
    }
}

impl std::fmt::Write for StatisticLogger {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        log_statistic(self.name(), s);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_parts_are_joined_with_underscores() {
        let logger = StatisticLogger::new(["engine"]).attach_to_prefix("numberOfDequeues");

        assert_eq!("engine_numberOfDequeues", logger.name());
    }
}
