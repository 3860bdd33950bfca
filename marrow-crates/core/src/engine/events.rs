use std::fmt::Display;

use enum_map::Enum;
use enumset::enum_set;
use enumset::EnumSet;
use enumset::EnumSetType;

/// The kinds of modification a domain can undergo.
#[derive(Debug, EnumSetType, Enum, Hash)]
pub enum IntEventKind {
    /// The domain collapsed to a single value.
    Instantiate,
    /// The lower bound increased.
    IncLow,
    /// The upper bound decreased.
    DecUpp,
    /// A value was removed; this may have been an interior value.
    Remove,
}

/// A set of [`IntEventKind`]s.
pub type EventMask = EnumSet<IntEventKind>;

impl IntEventKind {
    /// The mask containing only this kind.
    pub fn mask(self) -> EventMask {
        EnumSet::only(self)
    }

    /// The kinds which are implied by this kind.
    ///
    /// An instantiation moves both bounds and removes values; a bound move removes values.
    pub fn strengthened_mask(self) -> EventMask {
        match self {
            IntEventKind::Instantiate => EnumSet::all(),
            IntEventKind::IncLow => enum_set!(IntEventKind::IncLow | IntEventKind::Remove),
            IntEventKind::DecUpp => enum_set!(IntEventKind::DecUpp | IntEventKind::Remove),
            IntEventKind::Remove => enum_set!(IntEventKind::Remove),
        }
    }
}

/// The union of the strengthened masks of every kind in `mask`.
pub fn strengthen(mask: EventMask) -> EventMask {
    mask.iter()
        .fold(EnumSet::empty(), |strengthened, kind| {
            strengthened | kind.strengthened_mask()
        })
}

impl Display for IntEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntEventKind::Instantiate => write!(f, "[Event:Instantiate]"),
            IntEventKind::IncLow => write!(f, "[Event:IncLow]"),
            IntEventKind::DecUpp => write!(f, "[Event:DecUpp]"),
            IntEventKind::Remove => write!(f, "[Event:Remove]"),
        }
    }
}

/// The events a propagator subscribes to for one of its variables.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DomainEvents {
    events: EventMask,
}

impl DomainEvents {
    /// Every kind of modification.
    pub const ANY: DomainEvents = DomainEvents::new(enum_set!(
        IntEventKind::Instantiate | IntEventKind::IncLow | IntEventKind::DecUpp | IntEventKind::Remove
    ));
    /// Bound tightening (and therefore instantiation).
    pub const BOUNDS: DomainEvents = DomainEvents::new(enum_set!(
        IntEventKind::Instantiate | IntEventKind::IncLow | IntEventKind::DecUpp
    ));
    /// Lower bound tightening.
    pub const LOWER_BOUND: DomainEvents = DomainEvents::new(enum_set!(IntEventKind::IncLow));
    /// Upper bound tightening.
    pub const UPPER_BOUND: DomainEvents = DomainEvents::new(enum_set!(IntEventKind::DecUpp));
    /// Collapse to a single value.
    pub const INSTANTIATE: DomainEvents = DomainEvents::new(enum_set!(IntEventKind::Instantiate));

    pub const fn new(events: EventMask) -> DomainEvents {
        DomainEvents { events }
    }

    pub fn events(&self) -> EventMask {
        self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instantiation_strengthens_to_every_kind() {
        assert_eq!(EnumSet::all(), IntEventKind::Instantiate.strengthened_mask());
    }

    #[test]
    fn bound_moves_imply_removal() {
        assert_eq!(
            enum_set!(IntEventKind::IncLow | IntEventKind::DecUpp | IntEventKind::Remove),
            strengthen(enum_set!(IntEventKind::IncLow | IntEventKind::DecUpp))
        );
        assert_eq!(IntEventKind::Remove.mask(), strengthen(IntEventKind::Remove.mask()));
    }

    #[test]
    fn strengthening_the_empty_mask_is_empty() {
        assert!(strengthen(EnumSet::empty()).is_empty());
    }
}
