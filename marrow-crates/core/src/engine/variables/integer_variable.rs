use std::fmt::Debug;

use super::DomainId;
use super::TransformableVariable;
use crate::basic_types::Contradiction;
use crate::engine::propagation::Domains;
use crate::engine::propagation::PropagationContextMut;
use crate::engine::propagation::Watchers;
use crate::engine::EventMask;

/// The behaviour required of an integer variable: reading its domain, modifying it, and
/// translating the events of the underlying domain.
///
/// A [`DomainId`] is the domain itself; an [`super::AffineView`] is a transformation of another
/// variable which is evaluated on the fly.
pub trait IntegerVariable:
    Copy + Debug + TransformableVariable<Self::AffineView> + 'static
{
    type AffineView: IntegerVariable;

    /// The domain this variable reads and modifies.
    fn domain_id(&self) -> DomainId;

    fn lower_bound(&self, domains: Domains<'_>) -> i32;

    fn upper_bound(&self, domains: Domains<'_>) -> i32;

    fn size(&self, domains: Domains<'_>) -> usize;

    fn contains(&self, domains: Domains<'_>, value: i32) -> bool;

    /// The smallest value in the domain which is strictly greater than `value`.
    fn next_value(&self, domains: Domains<'_>, value: i32) -> Option<i32>;

    /// The largest value in the domain which is strictly smaller than `value`.
    fn previous_value(&self, domains: Domains<'_>, value: i32) -> Option<i32>;

    fn update_lower_bound(
        &self,
        context: &mut PropagationContextMut<'_>,
        value: i32,
    ) -> Result<bool, Contradiction>;

    fn update_upper_bound(
        &self,
        context: &mut PropagationContextMut<'_>,
        value: i32,
    ) -> Result<bool, Contradiction>;

    fn remove_value(
        &self,
        context: &mut PropagationContextMut<'_>,
        value: i32,
    ) -> Result<bool, Contradiction>;

    /// Removes every value in `from..=to`.
    fn remove_interval(
        &self,
        context: &mut PropagationContextMut<'_>,
        from: i32,
        to: i32,
    ) -> Result<bool, Contradiction>;

    fn instantiate_to(
        &self,
        context: &mut PropagationContextMut<'_>,
        value: i32,
    ) -> Result<bool, Contradiction>;

    /// Subscribes to the given events of this variable, expressed in terms of this variable.
    fn watch_all(&self, watchers: &mut Watchers<'_>, events: EventMask);

    /// Translates events of the underlying domain into events of this variable.
    fn unpack_events(&self, events: EventMask) -> EventMask;
}
