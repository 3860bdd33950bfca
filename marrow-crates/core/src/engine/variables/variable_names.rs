use super::DomainId;
use crate::containers::HashMap;

/// Optional human readable names for variables, used when logging.
#[derive(Debug, Default)]
pub(crate) struct VariableNames {
    names: HashMap<DomainId, String>,
}

impl VariableNames {
    pub(crate) fn add(&mut self, variable: DomainId, name: String) {
        let _ = self.names.insert(variable, name);
    }

    pub(crate) fn get(&self, variable: DomainId) -> Option<&str> {
        self.names.get(&variable).map(|name| name.as_str())
    }
}
