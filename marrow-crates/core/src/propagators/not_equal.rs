use crate::basic_types::PropagationStatus;
use crate::engine::propagation::Entailment;
use crate::engine::propagation::LocalId;
use crate::engine::propagation::PropagationContext;
use crate::engine::propagation::PropagationContextMut;
use crate::engine::propagation::Priority;
use crate::engine::propagation::Propagator;
use crate::engine::propagation::PropagatorConstructor;
use crate::engine::propagation::PropagatorConstructorContext;
use crate::engine::propagation::ReadDomains;
use crate::engine::variables::IntegerVariable;
use crate::engine::DomainEvents;

/// The [`PropagatorConstructor`] for the [`NotEqualPropagator`].
#[derive(Clone, Copy, Debug)]
pub struct NotEqualArgs<A, B> {
    pub a: A,
    pub b: B,
}

impl<A, B> PropagatorConstructor for NotEqualArgs<A, B>
where
    A: IntegerVariable,
    B: IntegerVariable,
{
    type PropagatorImpl = NotEqualPropagator<A, B>;

    fn create(self, context: &mut PropagatorConstructorContext<'_>) -> Self::PropagatorImpl {
        context.register(self.a, DomainEvents::INSTANTIATE, LocalId::from(0));
        context.register(self.b, DomainEvents::INSTANTIATE, LocalId::from(1));

        NotEqualPropagator {
            a: self.a,
            b: self.b,
        }
    }
}

/// Propagator for `a != b`, which only acts once one side is fixed.
#[derive(Clone, Debug)]
pub struct NotEqualPropagator<A, B> {
    a: A,
    b: B,
}

impl<A: IntegerVariable, B: IntegerVariable> Propagator for NotEqualPropagator<A, B> {
    fn name(&self) -> &str {
        "NotEqual"
    }

    fn priority(&self) -> Priority {
        Priority::Binary
    }

    fn propagate_from_scratch(&mut self, mut context: PropagationContextMut) -> PropagationStatus {
        if let Some(a) = context.fixed_value(self.a) {
            let _ = context.remove_value(self.b, a)?;
        }
        if let Some(b) = context.fixed_value(self.b) {
            let _ = context.remove_value(self.a, b)?;
        }
        if context.is_fixed(self.a) && context.is_fixed(self.b) {
            context.set_passive();
        }
        Ok(())
    }

    fn is_entailed(&self, context: PropagationContext) -> Entailment {
        if context.upper_bound(self.a) < context.lower_bound(self.b)
            || context.lower_bound(self.a) > context.upper_bound(self.b)
        {
            return Entailment::Satisfied;
        }

        match (context.fixed_value(self.a), context.fixed_value(self.b)) {
            (Some(a), Some(b)) if a == b => Entailment::Violated,
            (Some(a), _) if !context.contains(self.b, a) => Entailment::Satisfied,
            (_, Some(b)) if !context.contains(self.a, b) => Entailment::Satisfied,
            _ => Entailment::Undetermined,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;
    use crate::engine::variables::TransformableVariable;

    #[test]
    fn fixed_side_is_removed_from_the_other() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(3, 3);
        let y = solver.new_variable(0, 5);

        let _ = solver
            .new_propagator(NotEqualArgs { a: x, b: y.offset(1) })
            .expect("no empty domains");

        assert!(!solver.contains(y, 2));
        assert!(solver.contains(y, 3));
    }

    #[test]
    fn instantiation_later_on_is_propagated() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 5);
        let y = solver.new_variable(0, 5);
        let _ = solver
            .new_propagator(NotEqualArgs { a: x, b: y })
            .expect("no empty domains");

        let _ = solver.set(y, 5).expect("non-empty domain");
        solver
            .propagate_until_fixed_point()
            .expect("non-empty domain");

        solver.assert_bounds(x, 0, 4);
    }

    #[test]
    fn equal_fixed_values_are_a_contradiction() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(2, 2);
        let y = solver.new_variable(2, 2);

        let _ = solver
            .new_propagator(NotEqualArgs { a: x, b: y })
            .expect_err("x and y are equal");
    }

    #[test]
    fn interior_values_stay_in_interval_domains() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(3, 3);
        let y = solver.new_interval_variable(0, 5);

        let _ = solver
            .new_propagator(NotEqualArgs { a: x, b: y })
            .expect("no empty domains");

        assert!(solver.contains(y, 3));
    }

    #[test]
    fn removed_value_entails_the_constraint() {
        let mut solver = TestSolver::with_entailment_checks();
        let x = solver.new_variable(3, 3);
        let y = solver.new_variable(0, 5);

        let propagator = solver
            .new_propagator(NotEqualArgs { a: x, b: y })
            .expect("no empty domains");

        assert!(!solver.model.is_propagator_active(propagator));
    }

    #[test]
    fn values_off_the_scaled_grid_are_never_equal() {
        let mut solver = TestSolver::with_entailment_checks();
        let x = solver.new_variable(3, 3);
        let y = solver.new_variable(0, 5);

        let propagator = solver
            .new_propagator(NotEqualArgs { a: x, b: y.scaled(2) })
            .expect("no empty domains");

        solver.assert_bounds(y, 0, 5);
        assert!(!solver.model.is_propagator_active(propagator));
    }
}
