use std::cmp::Ordering;

use enumset::enum_set;
use num::Integer;

use super::DomainId;
use super::IntegerVariable;
use super::TransformableVariable;
use crate::basic_types::messages;
use crate::basic_types::Contradiction;
use crate::engine::propagation::Domains;
use crate::engine::propagation::PropagationContextMut;
use crate::engine::propagation::Watchers;
use crate::engine::EventMask;
use crate::engine::IntEventKind;

/// Models `y = scale * x + offset` by expressing the domain of `y` as a transformation of the
/// domain of `x`.
///
/// The values of the view must fit in an `i32`.
#[derive(Clone, Copy, Hash, Eq, PartialEq)]
pub struct AffineView<Inner> {
    inner: Inner,
    scale: i32,
    offset: i32,
}

#[derive(Clone, Copy, Debug)]
enum Rounding {
    Up,
    Down,
}

impl<Inner> AffineView<Inner> {
    pub fn new(inner: Inner, scale: i32, offset: i32) -> Self {
        assert_ne!(scale, 0, "multiplication by zero is not invertible");
        AffineView {
            inner,
            scale,
            offset,
        }
    }

    fn map(&self, value: i32) -> i32 {
        self.scale * value + self.offset
    }

    /// The preimage of `value` in the domain of the inner variable, rounded in the given
    /// direction.
    fn invert(&self, value: i32, rounding: Rounding) -> i64 {
        let translated = i64::from(value) - i64::from(self.offset);
        let scale = i64::from(self.scale);
        match rounding {
            Rounding::Up => Integer::div_ceil(&translated, &scale),
            Rounding::Down => Integer::div_floor(&translated, &scale),
        }
    }

    /// The exact preimage of `value`, if there is one.
    fn invert_exactly(&self, value: i32) -> Option<i32> {
        let translated = i64::from(value) - i64::from(self.offset);
        let scale = i64::from(self.scale);
        if translated % scale != 0 {
            return None;
        }
        i32::try_from(translated / scale).ok()
    }
}

/// Exchanges the lower and upper bound events; a negative scale turns one into the other.
fn mirror(events: EventMask) -> EventMask {
    let bounds = enum_set!(IntEventKind::IncLow | IntEventKind::DecUpp);
    if events.intersection(bounds).len() == 1 {
        events.symmetrical_difference(bounds)
    } else {
        events
    }
}

/// Smallest value of `inner` which is strictly greater than `threshold`.
fn next_inner_value<Var: IntegerVariable>(
    inner: Var,
    domains: Domains<'_>,
    threshold: i64,
) -> Option<i32> {
    match i32::try_from(threshold) {
        Ok(threshold) => inner.next_value(domains, threshold),
        Err(_) if threshold < 0 => Some(inner.lower_bound(domains)),
        Err(_) => None,
    }
}

/// Largest value of `inner` which is strictly smaller than `threshold`.
fn previous_inner_value<Var: IntegerVariable>(
    inner: Var,
    domains: Domains<'_>,
    threshold: i64,
) -> Option<i32> {
    match i32::try_from(threshold) {
        Ok(threshold) => inner.previous_value(domains, threshold),
        Err(_) if threshold > 0 => Some(inner.upper_bound(domains)),
        Err(_) => None,
    }
}

fn raise_inner_lower_bound<Var: IntegerVariable>(
    inner: Var,
    context: &mut PropagationContextMut<'_>,
    bound: i64,
) -> Result<bool, Contradiction> {
    match i32::try_from(bound) {
        Ok(bound) => inner.update_lower_bound(context, bound),
        Err(_) if bound > 0 => Err(context.fails(
            Some(inner.domain_id()),
            messages::EMPTY_LOWER_BOUND,
        )),
        Err(_) => Ok(false),
    }
}

fn lower_inner_upper_bound<Var: IntegerVariable>(
    inner: Var,
    context: &mut PropagationContextMut<'_>,
    bound: i64,
) -> Result<bool, Contradiction> {
    match i32::try_from(bound) {
        Ok(bound) => inner.update_upper_bound(context, bound),
        Err(_) if bound < 0 => Err(context.fails(
            Some(inner.domain_id()),
            messages::EMPTY_UPPER_BOUND,
        )),
        Err(_) => Ok(false),
    }
}

impl<View> IntegerVariable for AffineView<View>
where
    View: IntegerVariable,
{
    type AffineView = Self;

    fn domain_id(&self) -> DomainId {
        self.inner.domain_id()
    }

    fn lower_bound(&self, domains: Domains<'_>) -> i32 {
        if self.scale < 0 {
            self.map(self.inner.upper_bound(domains))
        } else {
            self.map(self.inner.lower_bound(domains))
        }
    }

    fn upper_bound(&self, domains: Domains<'_>) -> i32 {
        if self.scale < 0 {
            self.map(self.inner.lower_bound(domains))
        } else {
            self.map(self.inner.upper_bound(domains))
        }
    }

    fn size(&self, domains: Domains<'_>) -> usize {
        self.inner.size(domains)
    }

    fn contains(&self, domains: Domains<'_>, value: i32) -> bool {
        self.invert_exactly(value)
            .is_some_and(|inverted| self.inner.contains(domains, inverted))
    }

    fn next_value(&self, domains: Domains<'_>, value: i32) -> Option<i32> {
        let next = if self.scale < 0 {
            previous_inner_value(self.inner, domains, self.invert(value, Rounding::Up))
        } else {
            next_inner_value(self.inner, domains, self.invert(value, Rounding::Down))
        };
        next.map(|inner_value| self.map(inner_value))
    }

    fn previous_value(&self, domains: Domains<'_>, value: i32) -> Option<i32> {
        let previous = if self.scale < 0 {
            next_inner_value(self.inner, domains, self.invert(value, Rounding::Down))
        } else {
            previous_inner_value(self.inner, domains, self.invert(value, Rounding::Up))
        };
        previous.map(|inner_value| self.map(inner_value))
    }

    fn update_lower_bound(
        &self,
        context: &mut PropagationContextMut<'_>,
        value: i32,
    ) -> Result<bool, Contradiction> {
        if self.scale < 0 {
            lower_inner_upper_bound(self.inner, context, self.invert(value, Rounding::Down))
        } else {
            raise_inner_lower_bound(self.inner, context, self.invert(value, Rounding::Up))
        }
    }

    fn update_upper_bound(
        &self,
        context: &mut PropagationContextMut<'_>,
        value: i32,
    ) -> Result<bool, Contradiction> {
        if self.scale < 0 {
            raise_inner_lower_bound(self.inner, context, self.invert(value, Rounding::Up))
        } else {
            lower_inner_upper_bound(self.inner, context, self.invert(value, Rounding::Down))
        }
    }

    fn remove_value(
        &self,
        context: &mut PropagationContextMut<'_>,
        value: i32,
    ) -> Result<bool, Contradiction> {
        match self.invert_exactly(value) {
            Some(inverted) => self.inner.remove_value(context, inverted),
            None => Ok(false),
        }
    }

    fn remove_interval(
        &self,
        context: &mut PropagationContextMut<'_>,
        from: i32,
        to: i32,
    ) -> Result<bool, Contradiction> {
        if from > to {
            return Ok(false);
        }
        let (low, high) = if self.scale < 0 {
            (
                self.invert(to, Rounding::Up),
                self.invert(from, Rounding::Down),
            )
        } else {
            (
                self.invert(from, Rounding::Up),
                self.invert(to, Rounding::Down),
            )
        };

        let low = low.max(i64::from(i32::MIN));
        let high = high.min(i64::from(i32::MAX));
        if low > high {
            return Ok(false);
        }
        self.inner
            .remove_interval(context, low as i32, high as i32)
    }

    fn instantiate_to(
        &self,
        context: &mut PropagationContextMut<'_>,
        value: i32,
    ) -> Result<bool, Contradiction> {
        match self.invert_exactly(value) {
            Some(inverted) => self.inner.instantiate_to(context, inverted),
            None => Err(context.fails(
                Some(self.domain_id()),
                messages::VALUE_NOT_IN_DOMAIN,
            )),
        }
    }

    fn watch_all(&self, watchers: &mut Watchers<'_>, events: EventMask) {
        let events = if self.scale < 0 {
            mirror(events)
        } else {
            events
        };
        self.inner.watch_all(watchers, events);
    }

    fn unpack_events(&self, events: EventMask) -> EventMask {
        let events = self.inner.unpack_events(events);
        if self.scale < 0 {
            mirror(events)
        } else {
            events
        }
    }
}

impl<View> TransformableVariable<AffineView<View>> for AffineView<View>
where
    View: IntegerVariable,
{
    fn scaled(&self, scale: i32) -> AffineView<View> {
        let mut result = *self;
        result.scale *= scale;
        result.offset *= scale;
        assert_ne!(result.scale, 0, "multiplication by zero is not invertible");
        result
    }

    fn offset(&self, offset: i32) -> AffineView<View> {
        let mut result = *self;
        result.offset += offset;
        result
    }
}

impl<Var: std::fmt::Debug> std::fmt::Debug for AffineView<Var> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.scale == -1 {
            write!(f, "-")?;
        } else if self.scale != 1 {
            write!(f, "{} * ", self.scale)?;
        }

        write!(f, "({:?})", self.inner)?;

        match self.offset.cmp(&0) {
            Ordering::Less => write!(f, " - {}", -i64::from(self.offset))?,
            Ordering::Equal => {}
            Ordering::Greater => write!(f, " + {}", self.offset)?,
        }

        Ok(())
    }
}
