use std::collections::VecDeque;

use enum_map::EnumMap;
use enumset::EnumSet;

use crate::containers::KeyedVec;
use crate::engine::propagation::PropagatorId;
use crate::engine::variables::DomainId;
use crate::engine::EventMask;
use crate::engine::IntEventKind;

/// Who caused the pending events of one kind on a scheduled variable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum PendingCause {
    #[default]
    Absent,
    /// Every event of this kind was caused by the same propagator.
    Propagator(PropagatorId),
    /// Caused by a decision, or by more than one propagator.
    Unattributed,
}

impl PendingCause {
    fn merge(self, cause: Option<PropagatorId>) -> PendingCause {
        match (self, cause) {
            (PendingCause::Absent, Some(propagator)) => PendingCause::Propagator(propagator),
            (PendingCause::Propagator(existing), Some(propagator)) if existing == propagator => {
                self
            }
            _ => PendingCause::Unattributed,
        }
    }
}

/// The events which happened to a variable since it was last dequeued.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct PendingEvents {
    causes: EnumMap<IntEventKind, PendingCause>,
}

impl PendingEvents {
    fn record(&mut self, kind: IntEventKind, cause: Option<PropagatorId>) {
        self.causes[kind] = self.causes[kind].merge(cause);
    }

    /// Every pending kind, before strengthening.
    pub(crate) fn mask(&self) -> EventMask {
        self.causes
            .iter()
            .filter(|(_, cause)| **cause != PendingCause::Absent)
            .map(|(kind, _)| kind)
            .collect()
    }

    /// The pending kinds which `propagator` did not cause by itself.
    pub(crate) fn mask_excluding(&self, propagator: PropagatorId) -> EventMask {
        self.causes
            .iter()
            .filter(|(_, cause)| {
                **cause != PendingCause::Absent && **cause != PendingCause::Propagator(propagator)
            })
            .map(|(kind, _)| kind)
            .fold(EnumSet::empty(), |mask, kind| mask | kind)
    }
}

/// The FIFO queue of modified variables.
///
/// A variable is in the queue at most once; modifying a scheduled variable only records the new
/// event kind and its cause.
#[derive(Debug, Default)]
pub(crate) struct VariableQueue {
    queue: VecDeque<DomainId>,
    is_scheduled: KeyedVec<DomainId, bool>,
    pending: KeyedVec<DomainId, PendingEvents>,
}

impl VariableQueue {
    pub(crate) fn schedule(
        &mut self,
        variable: DomainId,
        kind: IntEventKind,
        cause: Option<PropagatorId>,
    ) {
        self.is_scheduled.accomodate(variable, false);
        self.pending.accomodate(variable, PendingEvents::default());

        self.pending[variable].record(kind, cause);
        if !self.is_scheduled[variable] {
            self.is_scheduled[variable] = true;
            self.queue.push_back(variable);
        }
    }

    /// Removes the head of the queue together with its pending events.
    pub(crate) fn pop(&mut self) -> Option<(DomainId, PendingEvents)> {
        let variable = self.queue.pop_front()?;
        self.is_scheduled[variable] = false;
        let pending = std::mem::take(&mut self.pending[variable]);
        Some((variable, pending))
    }

    /// Drops every scheduled variable and its pending events.
    pub(crate) fn clear(&mut self) {
        for variable in self.queue.drain(..) {
            self.is_scheduled[variable] = false;
            self.pending[variable] = PendingEvents::default();
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use enumset::enum_set;

    use super::*;

    #[test]
    fn scheduling_twice_yields_one_entry() {
        let mut queue = VariableQueue::default();
        let x = DomainId::new(0);

        queue.schedule(x, IntEventKind::IncLow, None);
        queue.schedule(x, IntEventKind::Remove, None);
        assert_eq!(1, queue.len());

        let (variable, pending) = queue.pop().expect("x is scheduled");
        assert_eq!(x, variable);
        assert_eq!(
            enum_set!(IntEventKind::IncLow | IntEventKind::Remove),
            pending.mask()
        );
        assert!(queue.pop().is_none());
    }

    #[test]
    fn queue_is_first_in_first_out() {
        let mut queue = VariableQueue::default();
        let x = DomainId::new(0);
        let y = DomainId::new(1);

        queue.schedule(y, IntEventKind::DecUpp, None);
        queue.schedule(x, IntEventKind::DecUpp, None);
        queue.schedule(y, IntEventKind::IncLow, None);

        assert_eq!(Some(y), queue.pop().map(|(variable, _)| variable));
        assert_eq!(Some(x), queue.pop().map(|(variable, _)| variable));
    }

    #[test]
    fn self_caused_kinds_are_excluded() {
        let mut queue = VariableQueue::default();
        let x = DomainId::new(0);
        let p0 = PropagatorId(0);
        let p1 = PropagatorId(1);

        queue.schedule(x, IntEventKind::IncLow, Some(p0));
        queue.schedule(x, IntEventKind::DecUpp, Some(p0));
        queue.schedule(x, IntEventKind::DecUpp, Some(p1));

        let (_, pending) = queue.pop().expect("x is scheduled");
        assert_eq!(enum_set!(IntEventKind::DecUpp), pending.mask_excluding(p0));
        assert_eq!(
            enum_set!(IntEventKind::IncLow | IntEventKind::DecUpp),
            pending.mask_excluding(p1)
        );
    }

    #[test]
    fn decisions_are_never_excluded() {
        let mut queue = VariableQueue::default();
        let x = DomainId::new(0);
        let p0 = PropagatorId(0);

        queue.schedule(x, IntEventKind::Instantiate, Some(p0));
        queue.schedule(x, IntEventKind::Instantiate, None);

        let (_, pending) = queue.pop().expect("x is scheduled");
        assert_eq!(enum_set!(IntEventKind::Instantiate), pending.mask_excluding(p0));
    }

    #[test]
    fn clearing_resets_the_scheduled_flags() {
        let mut queue = VariableQueue::default();
        let x = DomainId::new(0);

        queue.schedule(x, IntEventKind::Remove, None);
        queue.clear();
        assert!(queue.is_empty());

        queue.schedule(x, IntEventKind::IncLow, None);
        let (_, pending) = queue.pop().expect("x is scheduled again");
        assert_eq!(enum_set!(IntEventKind::IncLow), pending.mask());
    }
}
