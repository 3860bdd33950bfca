#![allow(dead_code, reason = "each test file uses a different part of the helpers")]

use std::cell::RefCell;
use std::rc::Rc;

use marrow_core::engine::propagation::Entailment;
use marrow_core::engine::propagation::LocalId;
use marrow_core::engine::propagation::PropagationContext;
use marrow_core::engine::propagation::PropagationContextMut;
use marrow_core::engine::propagation::Propagator;
use marrow_core::engine::propagation::PropagatorConstructor;
use marrow_core::engine::propagation::PropagatorConstructorContext;
use marrow_core::engine::propagation::ReadDomains;
use marrow_core::engine::EventMask;
use marrow_core::DomainEvents;
use marrow_core::DomainId;
use marrow_core::Model;
use marrow_core::PropagationStatus;

pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// The values of every variable, in creation order.
pub(crate) fn snapshot(model: &Model) -> Vec<Vec<i32>> {
    model
        .variables()
        .map(|variable| model.domain_values(variable))
        .collect()
}

/// A notification received by a [`Recorder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Call {
    FromScratch,
    Propagate(LocalId, EventMask),
}

pub(crate) type CallLog = Rc<RefCell<Vec<Call>>>;

/// Registers for the given events of the given variables and records every call it receives.
pub(crate) struct RecorderArgs {
    pub(crate) variables: Vec<DomainId>,
    pub(crate) events: DomainEvents,
    pub(crate) log: CallLog,
}

impl PropagatorConstructor for RecorderArgs {
    type PropagatorImpl = Recorder;

    fn create(self, context: &mut PropagatorConstructorContext<'_>) -> Recorder {
        for (index, &variable) in self.variables.iter().enumerate() {
            context.register(variable, self.events, LocalId::from(index as u32));
        }
        Recorder { log: self.log }
    }
}

pub(crate) struct Recorder {
    log: CallLog,
}

impl Propagator for Recorder {
    fn name(&self) -> &str {
        "Recorder"
    }

    fn propagate_from_scratch(&mut self, _context: PropagationContextMut) -> PropagationStatus {
        self.log.borrow_mut().push(Call::FromScratch);
        Ok(())
    }

    fn propagate(
        &mut self,
        _context: PropagationContextMut,
        local_id: LocalId,
        events: EventMask,
    ) -> PropagationStatus {
        self.log.borrow_mut().push(Call::Propagate(local_id, events));
        Ok(())
    }

    fn is_entailed(&self, _context: PropagationContext) -> Entailment {
        Entailment::Undetermined
    }
}

/// Raises the lower bound of its variable by one every time it runs, unless it is fixed.
pub(crate) struct ShaverArgs {
    pub(crate) variable: DomainId,
    pub(crate) num_calls: Rc<RefCell<usize>>,
}

impl PropagatorConstructor for ShaverArgs {
    type PropagatorImpl = Shaver;

    fn create(self, context: &mut PropagatorConstructorContext<'_>) -> Shaver {
        context.register(self.variable, DomainEvents::ANY, LocalId::from(0));
        Shaver {
            variable: self.variable,
            num_calls: self.num_calls,
        }
    }
}

pub(crate) struct Shaver {
    variable: DomainId,
    num_calls: Rc<RefCell<usize>>,
}

impl Propagator for Shaver {
    fn name(&self) -> &str {
        "Shaver"
    }

    fn propagate_from_scratch(&mut self, mut context: PropagationContextMut) -> PropagationStatus {
        *self.num_calls.borrow_mut() += 1;
        if !context.is_fixed(self.variable) {
            let lower_bound = context.lower_bound(self.variable);
            let _ = context.update_lower_bound(self.variable, lower_bound + 1)?;
        }
        Ok(())
    }

    fn is_entailed(&self, _context: PropagationContext) -> Entailment {
        Entailment::Undetermined
    }
}
