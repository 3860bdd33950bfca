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
use crate::engine::variables::TransformableVariable;
use crate::engine::DomainEvents;
use crate::engine::EventMask;

const ID_A: LocalId = LocalId::from(0);
const ID_B: LocalId = LocalId::from(1);

/// The [`PropagatorConstructor`] for the [`BinaryLessOrEqualPropagator`].
#[derive(Clone, Copy, Debug)]
pub struct BinaryLessOrEqualArgs<A, B> {
    pub a: A,
    pub b: B,
}

impl<A: IntegerVariable, B: IntegerVariable> BinaryLessOrEqualArgs<A, B> {
    /// `a <= b`
    pub fn less_or_equal(a: A, b: B) -> Self {
        BinaryLessOrEqualArgs { a, b }
    }

    /// `a < b`, posted as `a + 1 <= b`.
    pub fn less_than(a: A, b: B) -> BinaryLessOrEqualArgs<A::AffineView, B> {
        BinaryLessOrEqualArgs { a: a.offset(1), b }
    }
}

impl<A, B> PropagatorConstructor for BinaryLessOrEqualArgs<A, B>
where
    A: IntegerVariable,
    B: IntegerVariable,
{
    type PropagatorImpl = BinaryLessOrEqualPropagator<A, B>;

    fn create(self, context: &mut PropagatorConstructorContext<'_>) -> Self::PropagatorImpl {
        context.register(self.a, DomainEvents::LOWER_BOUND, ID_A);
        context.register(self.b, DomainEvents::UPPER_BOUND, ID_B);

        BinaryLessOrEqualPropagator {
            a: self.a,
            b: self.b,
        }
    }
}

/// Bounds propagator for `a <= b`.
#[derive(Clone, Debug)]
pub struct BinaryLessOrEqualPropagator<A, B> {
    a: A,
    b: B,
}

impl<A: IntegerVariable, B: IntegerVariable> BinaryLessOrEqualPropagator<A, B> {
    fn propagate_lower_bound_of_b(&self, context: &mut PropagationContextMut) -> PropagationStatus {
        let bound = context.lower_bound(self.a);
        if bound > context.upper_bound(self.b) {
            return Err(context.fails(Some(self.b.domain_id()), "b cannot exceed a"));
        }
        let _ = context.update_lower_bound(self.b, bound)?;
        Ok(())
    }

    fn propagate_upper_bound_of_a(&self, context: &mut PropagationContextMut) -> PropagationStatus {
        let bound = context.upper_bound(self.b);
        if bound < context.lower_bound(self.a) {
            return Err(context.fails(Some(self.a.domain_id()), "a cannot stay below b"));
        }
        let _ = context.update_upper_bound(self.a, bound)?;
        Ok(())
    }
}

impl<A: IntegerVariable, B: IntegerVariable> Propagator for BinaryLessOrEqualPropagator<A, B> {
    fn name(&self) -> &str {
        "BinaryLessOrEqual"
    }

    fn priority(&self) -> Priority {
        Priority::Binary
    }

    fn propagate_from_scratch(&mut self, mut context: PropagationContextMut) -> PropagationStatus {
        self.propagate_lower_bound_of_b(&mut context)?;
        self.propagate_upper_bound_of_a(&mut context)
    }

    fn propagate(
        &mut self,
        mut context: PropagationContextMut,
        local_id: LocalId,
        _events: EventMask,
    ) -> PropagationStatus {
        if local_id == ID_A {
            self.propagate_lower_bound_of_b(&mut context)
        } else {
            self.propagate_upper_bound_of_a(&mut context)
        }
    }

    fn is_entailed(&self, context: PropagationContext) -> Entailment {
        if context.upper_bound(self.a) <= context.lower_bound(self.b) {
            Entailment::Satisfied
        } else if context.lower_bound(self.a) > context.upper_bound(self.b) {
            Entailment::Violated
        } else {
            Entailment::Undetermined
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;

    #[test]
    fn bounds_are_propagated() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(3, 10);
        let y = solver.new_variable(0, 7);

        let _ = solver
            .new_propagator(BinaryLessOrEqualArgs::less_than(x, y))
            .expect("no empty domains");

        solver.assert_bounds(x, 3, 6);
        solver.assert_bounds(y, 4, 7);
    }

    #[test]
    fn later_bound_changes_are_propagated() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 10);
        let y = solver.new_variable(0, 10);
        let _ = solver
            .new_propagator(BinaryLessOrEqualArgs::less_or_equal(x, y))
            .expect("no empty domains");

        let _ = solver.increase_lower_bound(x, 4).expect("non-empty domain");
        let _ = solver.decrease_upper_bound(y, 8).expect("non-empty domain");
        solver
            .propagate_until_fixed_point()
            .expect("non-empty domain");

        solver.assert_bounds(x, 4, 8);
        solver.assert_bounds(y, 4, 8);
    }

    #[test]
    fn crossing_bounds_are_a_contradiction() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(5, 10);
        let y = solver.new_variable(0, 5);

        let _ = solver
            .new_propagator(BinaryLessOrEqualArgs::less_than(x, y))
            .expect_err("x < y cannot hold");
    }

    #[test]
    fn offsets_near_the_integer_limits_do_not_overflow() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(i32::MAX - 1, i32::MAX);
        let y = solver.new_variable(0, i32::MAX);

        let _ = solver
            .new_propagator(BinaryLessOrEqualArgs::less_or_equal(x, y.offset(-2)))
            .expect_err("x + 2 exceeds every value of y");
    }

    #[test]
    fn negated_variables_are_bounded_from_the_other_side() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 10);
        let y = solver.new_variable(-3, 8);

        // -x <= y - 5, i.e. x + y >= 5
        let _ = solver
            .new_propagator(BinaryLessOrEqualArgs::less_or_equal(x.scaled(-1), y.offset(-5)))
            .expect("no empty domains");

        solver.assert_bounds(y, -3, 8);
        solver.assert_bounds(x, 0, 10);

        let _ = solver.decrease_upper_bound(y, 2).expect("non-empty domain");
        solver
            .propagate_until_fixed_point()
            .expect("non-empty domain");
        solver.assert_bounds(x, 3, 10);

        let _ = solver.decrease_upper_bound(x, 4).expect("non-empty domain");
        solver
            .propagate_until_fixed_point()
            .expect("non-empty domain");
        solver.assert_bounds(y, 1, 2);
    }

    #[test]
    fn disjoint_domains_are_entailed() {
        let mut solver = TestSolver::with_entailment_checks();
        let x = solver.new_variable(0, 3);
        let y = solver.new_variable(5, 9);

        let propagator = solver
            .new_propagator(BinaryLessOrEqualArgs::less_than(x, y))
            .expect("no empty domains");

        assert!(!solver.model.is_propagator_active(propagator));
    }
}
