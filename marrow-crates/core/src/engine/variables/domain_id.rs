use std::fmt::Display;

use super::AffineView;
use super::IntegerVariable;
use super::TransformableVariable;
use crate::basic_types::Contradiction;
use crate::containers::StorageKey;
use crate::engine::propagation::Domains;
use crate::engine::propagation::PropagationContextMut;
use crate::engine::propagation::Watchers;
use crate::engine::EventMask;

/// Identifies an integer variable of a [`crate::Model`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DomainId {
    id: u32,
}

impl DomainId {
    pub(crate) const fn new(id: u32) -> Self {
        DomainId { id }
    }

    pub fn id(&self) -> u32 {
        self.id
    }
}

impl StorageKey for DomainId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        DomainId { id: index as u32 }
    }
}

impl Display for DomainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.id)
    }
}

impl IntegerVariable for DomainId {
    type AffineView = AffineView<Self>;

    fn domain_id(&self) -> DomainId {
        *self
    }

    fn lower_bound(&self, domains: Domains<'_>) -> i32 {
        domains
            .variables
            .domain(*self)
            .lower_bound(domains.stored_values)
    }

    fn upper_bound(&self, domains: Domains<'_>) -> i32 {
        domains
            .variables
            .domain(*self)
            .upper_bound(domains.stored_values)
    }

    fn size(&self, domains: Domains<'_>) -> usize {
        domains.variables.domain(*self).size(domains.stored_values)
    }

    fn contains(&self, domains: Domains<'_>, value: i32) -> bool {
        domains
            .variables
            .domain(*self)
            .contains(domains.stored_values, value)
    }

    fn next_value(&self, domains: Domains<'_>, value: i32) -> Option<i32> {
        domains
            .variables
            .domain(*self)
            .next_value(domains.stored_values, value)
    }

    fn previous_value(&self, domains: Domains<'_>, value: i32) -> Option<i32> {
        domains
            .variables
            .domain(*self)
            .previous_value(domains.stored_values, value)
    }

    fn update_lower_bound(
        &self,
        context: &mut PropagationContextMut<'_>,
        value: i32,
    ) -> Result<bool, Contradiction> {
        context.modify(*self, |domain, store| domain.update_lower_bound(store, value))
    }

    fn update_upper_bound(
        &self,
        context: &mut PropagationContextMut<'_>,
        value: i32,
    ) -> Result<bool, Contradiction> {
        context.modify(*self, |domain, store| domain.update_upper_bound(store, value))
    }

    fn remove_value(
        &self,
        context: &mut PropagationContextMut<'_>,
        value: i32,
    ) -> Result<bool, Contradiction> {
        context.modify(*self, |domain, store| domain.remove_value(store, value))
    }

    fn remove_interval(
        &self,
        context: &mut PropagationContextMut<'_>,
        from: i32,
        to: i32,
    ) -> Result<bool, Contradiction> {
        context.modify(*self, |domain, store| {
            domain.remove_interval(store, from, to)
        })
    }

    fn instantiate_to(
        &self,
        context: &mut PropagationContextMut<'_>,
        value: i32,
    ) -> Result<bool, Contradiction> {
        context.modify(*self, |domain, store| domain.instantiate_to(store, value))
    }

    fn watch_all(&self, watchers: &mut Watchers<'_>, events: EventMask) {
        watchers.watch(*self, events);
    }

    fn unpack_events(&self, events: EventMask) -> EventMask {
        events
    }
}

impl TransformableVariable<AffineView<DomainId>> for DomainId {
    fn scaled(&self, scale: i32) -> AffineView<DomainId> {
        AffineView::new(*self, scale, 0)
    }

    fn offset(&self, offset: i32) -> AffineView<DomainId> {
        AffineView::new(*self, 1, offset)
    }
}
