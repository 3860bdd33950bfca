use super::DomainId;
use super::IntegerDomain;
use crate::containers::KeyedVec;
use crate::engine::propagation::LocalId;
use crate::engine::propagation::PropagatorId;
use crate::engine::EventMask;

/// A propagator's interest in a variable.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Subscription {
    pub(crate) propagator: PropagatorId,
    pub(crate) local_id: LocalId,
    pub(crate) events: EventMask,
}

/// The domains of all variables together with the propagators subscribed to each of them.
///
/// Subscriptions are kept in registration order, which is the order in which the engine notifies
/// propagators.
#[derive(Debug, Default)]
pub(crate) struct VariableStore {
    domains: KeyedVec<DomainId, IntegerDomain>,
    subscriptions: KeyedVec<DomainId, Vec<Subscription>>,
}

impl VariableStore {
    pub(crate) fn grow(&mut self, domain: IntegerDomain) -> DomainId {
        let _ = self.subscriptions.push(Vec::new());
        self.domains.push(domain)
    }

    pub(crate) fn num_variables(&self) -> usize {
        self.domains.len()
    }

    pub(crate) fn contains_variable(&self, variable: DomainId) -> bool {
        self.domains.get(variable).is_some()
    }

    pub(crate) fn domain(&self, variable: DomainId) -> &IntegerDomain {
        &self.domains[variable]
    }

    pub(crate) fn variables(&self) -> impl Iterator<Item = DomainId> {
        self.domains.keys()
    }

    /// Subscribes the propagator and returns the position of the subscription in the variable's
    /// list.
    pub(crate) fn subscribe(&mut self, variable: DomainId, subscription: Subscription) -> usize {
        let subscriptions = &mut self.subscriptions[variable];
        subscriptions.push(subscription);
        subscriptions.len() - 1
    }

    pub(crate) fn subscriptions(&self, variable: DomainId) -> &[Subscription] {
        &self.subscriptions[variable]
    }
}
