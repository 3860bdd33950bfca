use std::fmt::Debug;

use super::constructor::Registration;
use super::LocalId;
use super::Propagator;
use super::PropagatorHandle;
use super::PropagatorId;
use crate::basic_types::ModelError;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::engine::variables::DomainId;
use crate::engine::variables::Subscription;
use crate::engine::variables::VariableStore;
use crate::trailing::StoredBool;
use crate::trailing::StoredPrimitive;
use crate::trailing::TrailedValues;

/// A propagator together with its side of the variable bindings.
pub(crate) struct PropagatorSlot {
    pub(crate) propagator: Box<dyn Propagator>,
    /// The variable behind every local id.
    pub(crate) variables: KeyedVec<LocalId, DomainId>,
    /// The position of this propagator in the subscription list of the variable behind every
    /// local id.
    pub(crate) positions: KeyedVec<LocalId, usize>,
    /// Cleared when the propagator is entailed; restored on backtracking.
    pub(crate) active: StoredBool,
}

/// A central store for propagators.
#[derive(Default)]
pub(crate) struct PropagatorStore {
    slots: KeyedVec<PropagatorId, PropagatorSlot>,
}

impl PropagatorStore {
    pub(crate) fn num_propagators(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn next_id(&self) -> PropagatorId {
        self.slots.next_key()
    }

    pub(crate) fn ids(&self) -> impl Iterator<Item = PropagatorId> {
        self.slots.keys()
    }

    /// Checks that the registrations bind every local id in `0..arity` exactly once, to a
    /// variable of the model.
    pub(crate) fn validate_registrations(
        registrations: &[Registration],
        variables: &VariableStore,
    ) -> Result<(), ModelError> {
        let arity = registrations.len();
        let mut seen = vec![false; arity];

        for registration in registrations {
            if !variables.contains_variable(registration.variable) {
                return Err(ModelError::UnknownVariable(registration.variable));
            }

            let index = registration.local_id.index();
            if index >= arity {
                return Err(ModelError::NonContiguousLocalId {
                    local_id: registration.local_id,
                    arity,
                });
            }
            if std::mem::replace(&mut seen[index], true) {
                return Err(ModelError::DuplicateLocalId {
                    local_id: registration.local_id,
                });
            }
        }

        Ok(())
    }

    /// Stores the propagator and subscribes it to its variables, in local id order.
    ///
    /// The registrations must have been validated.
    pub(crate) fn add<P: Propagator>(
        &mut self,
        propagator: P,
        mut registrations: Vec<Registration>,
        variables: &mut VariableStore,
        stored_values: &mut TrailedValues,
    ) -> PropagatorHandle<P> {
        let id = self.next_id();
        registrations.sort_by_key(|registration| registration.local_id);

        let mut slot_variables = KeyedVec::default();
        let mut positions = KeyedVec::default();
        for registration in registrations {
            let position = variables.subscribe(
                registration.variable,
                Subscription {
                    propagator: id,
                    local_id: registration.local_id,
                    events: registration.events.events(),
                },
            );
            let _ = slot_variables.push(registration.variable);
            let _ = positions.push(position);
        }

        let key = self.slots.push(PropagatorSlot {
            propagator: Box::new(propagator),
            variables: slot_variables,
            positions,
            active: stored_values.new_stored_bool(true),
        });
        PropagatorHandle::new(key)
    }

    pub(crate) fn is_active(&self, id: PropagatorId, stored_values: &TrailedValues) -> bool {
        self.slots[id].active.read(stored_values)
    }

    pub(crate) fn slot(&self, id: PropagatorId) -> &PropagatorSlot {
        &self.slots[id]
    }

    pub(crate) fn slot_mut(&mut self, id: PropagatorId) -> &mut PropagatorSlot {
        &mut self.slots[id]
    }

    pub(crate) fn iter_propagators(&self) -> impl Iterator<Item = &dyn Propagator> + '_ {
        self.slots.iter().map(|slot| slot.propagator.as_ref())
    }

    /// Get a reference to the propagator identified by the given handle.
    pub(crate) fn get_propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> Option<&P> {
        self.slots
            .get(handle.untyped())?
            .propagator
            .downcast_ref()
    }
}

impl Debug for PropagatorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.iter_propagators().map(|propagator| propagator.name()))
            .finish()
    }
}
