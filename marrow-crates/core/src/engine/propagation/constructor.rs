use super::Domains;
use super::LocalId;
use super::Propagator;
use super::PropagatorId;
use super::ReadDomains;
use crate::engine::variables::DomainId;
use crate::engine::variables::IntegerVariable;
use crate::engine::variables::VariableStore;
use crate::engine::DomainEvents;
use crate::engine::EventMask;
use crate::trailing::ManipulateStoredValues;
use crate::trailing::ReadStoredValues;
use crate::trailing::StoredBitSet;
use crate::trailing::StoredBool;
use crate::trailing::StoredInt;
use crate::trailing::StoredLong;
use crate::trailing::TrailedValues;

/// A propagator constructor creates a fully initialised instance of a [`Propagator`].
///
/// The constructor declares which events of which variables wake up the propagator, and may
/// allocate stored state for it.
pub trait PropagatorConstructor {
    /// The propagator that is produced by this constructor.
    type PropagatorImpl: Propagator;

    /// Create the propagator instance from `Self`.
    fn create(self, context: &mut PropagatorConstructorContext<'_>) -> Self::PropagatorImpl;
}

/// A variable binding declared through [`PropagatorConstructorContext::register`].
#[derive(Clone, Copy, Debug)]
pub(crate) struct Registration {
    pub(crate) variable: DomainId,
    pub(crate) events: DomainEvents,
    pub(crate) local_id: LocalId,
}

/// Collects the domains a variable watches on behalf of one [`LocalId`] of a propagator.
#[derive(Debug)]
pub struct Watchers<'a> {
    registrations: &'a mut Vec<Registration>,
    local_id: LocalId,
}

impl Watchers<'_> {
    pub(crate) fn watch(&mut self, domain: DomainId, events: EventMask) {
        self.registrations.push(Registration {
            variable: domain,
            events: DomainEvents::new(events),
            local_id: self.local_id,
        });
    }
}

/// The communication point between the model and a propagator which is being created.
///
/// The local ids registered through it must be exactly `0..arity`, each used once.
#[derive(Debug)]
pub struct PropagatorConstructorContext<'a> {
    pub(crate) stored_values: &'a mut TrailedValues,
    pub(crate) variables: &'a VariableStore,
    pub(crate) propagator_id: PropagatorId,
    pub(crate) registrations: Vec<Registration>,
}

impl<'a> PropagatorConstructorContext<'a> {
    pub(crate) fn new(
        propagator_id: PropagatorId,
        stored_values: &'a mut TrailedValues,
        variables: &'a VariableStore,
    ) -> Self {
        PropagatorConstructorContext {
            stored_values,
            variables,
            propagator_id,
            registrations: Vec::new(),
        }
    }

    /// The id the propagator will receive.
    pub fn propagator_id(&self) -> PropagatorId {
        self.propagator_id
    }

    /// Subscribes the propagator to the given [`DomainEvents`] of `variable`.
    ///
    /// The [`LocalId`] is how the propagator will be told which of its variables changed; most
    /// often it is the index of the variable in the propagator's own array.
    ///
    /// The events are those of `variable`; a view translates them to the events of its domain.
    pub fn register<Var: IntegerVariable>(
        &mut self,
        variable: Var,
        events: DomainEvents,
        local_id: LocalId,
    ) {
        let mut watchers = Watchers {
            registrations: &mut self.registrations,
            local_id,
        };
        variable.watch_all(&mut watchers, events.events());
    }

    pub fn new_stored_int(&mut self, initial_value: i32) -> StoredInt {
        self.stored_values.new_stored_int(initial_value)
    }

    pub fn new_stored_long(&mut self, initial_value: i64) -> StoredLong {
        self.stored_values.new_stored_long(initial_value)
    }

    pub fn new_stored_bool(&mut self, initial_value: bool) -> StoredBool {
        self.stored_values.new_stored_bool(initial_value)
    }

    pub fn new_stored_bitset(&mut self, capacity: usize, full: bool) -> StoredBitSet {
        StoredBitSet::new(self.stored_values, capacity, full)
    }
}

impl ReadDomains for PropagatorConstructorContext<'_> {
    fn domains(&self) -> Domains<'_> {
        Domains::new(self.variables, self.stored_values)
    }
}

impl ReadStoredValues for PropagatorConstructorContext<'_> {
    fn stored_values(&self) -> &TrailedValues {
        self.stored_values
    }
}

impl ManipulateStoredValues for PropagatorConstructorContext<'_> {
    fn stored_values_mut(&mut self) -> &mut TrailedValues {
        self.stored_values
    }
}
