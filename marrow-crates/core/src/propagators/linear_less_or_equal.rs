use crate::basic_types::PropagationStatus;
use crate::engine::propagation::Entailment;
use crate::engine::propagation::LocalId;
use crate::engine::propagation::NotificationContext;
use crate::engine::propagation::PropagationContext;
use crate::engine::propagation::PropagationContextMut;
use crate::engine::propagation::Priority;
use crate::engine::propagation::Propagator;
use crate::engine::propagation::PropagatorConstructor;
use crate::engine::propagation::PropagatorConstructorContext;
use crate::engine::propagation::ReadDomains;
use crate::engine::variables::IntegerVariable;
use crate::engine::DomainEvents;
use crate::engine::EventMask;
use crate::trailing::ManipulateStoredValues;
use crate::trailing::ReadStoredValues;
use crate::trailing::StoredLong;

/// The [`PropagatorConstructor`] for the [`LinearLessOrEqualPropagator`].
///
/// Weights are expressed through views, e.g. `x: [a.scaled(2), b.scaled(-1)]`.
#[derive(Clone, Debug)]
pub struct LinearLessOrEqualArgs<Var> {
    pub x: Box<[Var]>,
    pub c: i32,
}

impl<Var: IntegerVariable> PropagatorConstructor for LinearLessOrEqualArgs<Var> {
    type PropagatorImpl = LinearLessOrEqualPropagator<Var>;

    fn create(self, context: &mut PropagatorConstructorContext<'_>) -> Self::PropagatorImpl {
        let mut c = i64::from(self.c);
        let mut terms = Vec::new();
        for &variable in self.x.iter() {
            if let Some(value) = context.fixed_value(variable) {
                c -= i64::from(value);
                continue;
            }

            let local_id = LocalId::from(terms.len() as u32);
            context.register(variable, DomainEvents::LOWER_BOUND, local_id);

            terms.push(Term {
                variable,
                minimum: context.new_stored_long(0),
            });
        }

        let minimal_sum = context.new_stored_long(0);
        LinearLessOrEqualPropagator {
            terms: terms.into_boxed_slice(),
            c,
            minimal_sum,
        }
    }
}

#[derive(Clone, Debug)]
struct Term<Var> {
    variable: Var,
    /// The lower bound of the variable as last seen by the propagator.
    minimum: StoredLong,
}

/// Bounds propagator for `sum(x) <= c`.
///
/// Variables which are fixed when the propagator is created are folded into `c`. The minimal value
/// of the left-hand side is kept in stored state and updated in [`Propagator::advise`], so a
/// propagation usually costs one pass over the terms.
///
/// One domain may occur in several terms, e.g. as `2y` and `-y`. Tightening one of those terms
/// moves the minimum of another, which the engine does not report back to this propagator, so
/// the filtering repeats until the minimal sum is stable.
#[derive(Clone, Debug)]
pub struct LinearLessOrEqualPropagator<Var> {
    terms: Box<[Term<Var>]>,
    c: i64,
    minimal_sum: StoredLong,
}

impl<Var: IntegerVariable> LinearLessOrEqualPropagator<Var> {
    fn filter(&self, context: &mut PropagationContextMut) -> PropagationStatus {
        loop {
            let minimal_sum = context.read_stored(self.minimal_sum);
            if minimal_sum > self.c {
                return Err(context.fails(None, "the smallest sum exceeds the right-hand side"));
            }

            let mut changed = false;
            for term in self.terms.iter() {
                let bound = self.c - (minimal_sum - context.read_stored(term.minimum));
                if bound < i64::from(context.lower_bound(term.variable)) {
                    return Err(context.fails(
                        Some(term.variable.domain_id()),
                        "the sum exceeds its bound",
                    ));
                }
                if let Ok(bound) = i32::try_from(bound) {
                    changed |= context.update_upper_bound(term.variable, bound)?;
                }
            }

            if !changed || self.refresh_minimums(context) == minimal_sum {
                return Ok(());
            }
        }
    }

    /// Stores the current minimum of every term; returns the new minimal sum.
    fn refresh_minimums(&self, context: &mut PropagationContextMut) -> i64 {
        let mut minimal_sum = 0;
        for term in self.terms.iter() {
            let minimum = i64::from(context.lower_bound(term.variable));
            context.write_stored(term.minimum, minimum);
            minimal_sum += minimum;
        }
        context.write_stored(self.minimal_sum, minimal_sum);
        minimal_sum
    }
}

impl<Var: IntegerVariable> Propagator for LinearLessOrEqualPropagator<Var> {
    fn name(&self) -> &str {
        "LinearLeq"
    }

    fn priority(&self) -> Priority {
        Priority::Linear
    }

    fn propagate_from_scratch(&mut self, mut context: PropagationContextMut) -> PropagationStatus {
        let _ = self.refresh_minimums(&mut context);
        self.filter(&mut context)
    }

    fn advise(
        &mut self,
        mut context: NotificationContext,
        local_id: LocalId,
        _events: EventMask,
    ) -> bool {
        let term = &self.terms[local_id.unpack() as usize];
        let minimum = i64::from(context.lower_bound(term.variable));
        let delta = minimum - context.read_stored(term.minimum);
        if delta == 0 {
            return false;
        }

        context.write_stored(term.minimum, minimum);
        context.add_to_stored(self.minimal_sum, delta);
        true
    }

    fn propagate(
        &mut self,
        mut context: PropagationContextMut,
        _local_id: LocalId,
        _events: EventMask,
    ) -> PropagationStatus {
        self.filter(&mut context)
    }

    fn is_entailed(&self, context: PropagationContext) -> Entailment {
        let maximal_sum: i64 = self
            .terms
            .iter()
            .map(|term| i64::from(context.upper_bound(term.variable)))
            .sum();
        let minimal_sum: i64 = self
            .terms
            .iter()
            .map(|term| i64::from(context.lower_bound(term.variable)))
            .sum();

        if maximal_sum <= self.c {
            Entailment::Satisfied
        } else if minimal_sum > self.c {
            Entailment::Violated
        } else {
            Entailment::Undetermined
        }
    }
}
