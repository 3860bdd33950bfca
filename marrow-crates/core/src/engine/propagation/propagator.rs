use downcast_rs::impl_downcast;
use downcast_rs::Downcast;

use super::LocalId;
use super::NotificationContext;
use super::PropagationContext;
use super::PropagationContextMut;
use crate::basic_types::PropagationStatus;
#[cfg(doc)]
use crate::create_statistics_struct;
use crate::engine::EventMask;
#[cfg(doc)]
use crate::engine::propagation::PropagatorConstructorContext;
use crate::statistics::StatisticLogger;

// Allows going from `Box<dyn Propagator>` back to the concrete type behind a
// `PropagatorHandle`.
impl_downcast!(Propagator);

/// A propagator removes values from domains which cannot be part of any solution of its
/// constraint, or reports a contradiction when no such solution remains.
///
/// The required functions are [`Propagator::name`], [`Propagator::propagate_from_scratch`] and
/// [`Propagator::is_entailed`]; all other functions have default implementations.
///
/// The engine calls [`Propagator::propagate_from_scratch`] exactly once, the first time the model
/// is propagated. Afterwards the propagator is only woken up through the events of the variables
/// it registered for in its [`PropagatorConstructorContext`]: for every dequeued variable the
/// engine calls [`Propagator::advise`] and, if it returns `true`, [`Propagator::propagate`] with
/// the [`LocalId`] of the variable and the events it missed.
///
/// Propagators do not need to reach their own fixpoint. Modifications made by a propagator are
/// never reported back to that same propagator, so if it relies on seeing the consequences of
/// its own changes it should iterate internally.
pub trait Propagator: Downcast {
    /// Return the name of the propagator, used in logs and statistics.
    fn name(&self) -> &str;

    /// The position of the propagator in the initial pass, when the engine is configured to sort
    /// that pass.
    ///
    /// By default the priority is [`Priority::VerySlow`].
    fn priority(&self) -> Priority {
        Priority::VerySlow
    }

    /// Filters the domains without relying on any incremental state.
    ///
    /// Returns `Err` when the constraint cannot be satisfied anymore, either because a domain
    /// modification would have emptied a domain, or through
    /// [`PropagationContextMut::fails`].
    fn propagate_from_scratch(&mut self, context: PropagationContextMut) -> PropagationStatus;

    /// Called with the strengthened events of a variable before [`Propagator::propagate`].
    ///
    /// This can be used to maintain incremental state; it should be cheap. Returning `false`
    /// skips the call to [`Propagator::propagate`] for this variable.
    ///
    /// By default the propagator is always propagated.
    fn advise(
        &mut self,
        _context: NotificationContext,
        _local_id: LocalId,
        _events: EventMask,
    ) -> bool {
        true
    }

    /// Filters the domains after the variable identified by `local_id` was modified.
    ///
    /// `events` holds every modification of that variable since the propagator was last
    /// notified about it, strengthened and restricted to the events it registered for.
    ///
    /// By default this calls [`Propagator::propagate_from_scratch`].
    fn propagate(
        &mut self,
        context: PropagationContextMut,
        _local_id: LocalId,
        _events: EventMask,
    ) -> PropagationStatus {
        self.propagate_from_scratch(context)
    }

    /// Whether the constraint holds for every remaining combination of values, for none of them,
    /// or neither.
    fn is_entailed(&self, context: PropagationContext) -> Entailment;

    /// Logs statistics of the propagator using the provided [`StatisticLogger`].
    ///
    /// It is recommended to create a struct through the [`create_statistics_struct!`] macro.
    fn log_statistics(&self, _statistic_logger: StatisticLogger) {}
}

/// The outcome of [`Propagator::is_entailed`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Entailment {
    /// Every combination of values satisfies the constraint.
    Satisfied,
    /// No combination of values satisfies the constraint.
    Violated,
    Undetermined,
}

/// The cost class of a propagator, cheapest first.
#[derive(Default, Debug, Clone, Copy, Hash, PartialEq, Eq)]
#[repr(u8)]
pub enum Priority {
    Unary = 0,
    Binary = 1,
    Ternary = 2,
    Linear = 3,
    Quadratic = 4,
    Cubic = 5,
    #[default]
    VerySlow = 6,
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        ((*self) as u8).cmp(&((*other) as u8))
    }
}
