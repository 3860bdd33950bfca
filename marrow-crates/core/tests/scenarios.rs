#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

mod helpers;

use marrow_core::engine::propagation::ReadDomains;
use marrow_core::propagators::BinaryLessOrEqualArgs;
use marrow_core::propagators::NotEqualArgs;
use marrow_core::trailing::ManipulateStoredValues;
use marrow_core::trailing::ReadStoredValues;
use marrow_core::EngineState;
use marrow_core::Model;

use crate::helpers::init_logging;

#[test]
fn strict_inequality_on_bounds() {
    init_logging();
    let mut model = Model::default();
    let x = model.new_enumerated_variable(0, 3, Some("x"));
    let y = model.new_enumerated_variable(0, 3, Some("y"));
    let _ = model
        .add_propagator(BinaryLessOrEqualArgs::less_than(x, y))
        .expect("x and y exist");

    model.propagate().expect("x < y is satisfiable");

    assert_eq!(2, model.upper_bound(x));
    assert_eq!(1, model.lower_bound(y));
    assert_eq!(vec![0, 1, 2], model.domain_values(x));
    assert_eq!(vec![1, 2, 3], model.domain_values(y));
}

#[test]
fn stored_int_is_restored_by_pop() {
    init_logging();
    let mut model = Model::default();
    let stored = model.new_stored_int(0);

    let world = model.world_push();
    assert_eq!(1, world);
    model.write_stored(stored, 5);
    assert_eq!(5, model.read_stored(stored));

    model.world_pop();
    assert_eq!(0, model.read_stored(stored));
    assert_eq!(0, model.world_index());
}

#[test]
fn instantiating_outside_the_bounds_fails_without_changes() {
    init_logging();
    let mut model = Model::default();
    let x = model.new_enumerated_variable(0, 5, Some("x"));
    model.propagate().expect("nothing to propagate");

    let _ = model
        .instantiate_to(x, 7)
        .expect_err("7 is not in the domain of x");

    let contradiction = *model.last_contradiction();
    assert_eq!(Some(x), contradiction.variable);
    assert_eq!(None, contradiction.cause);

    model.flush();
    assert_eq!(EngineState::Idle, model.engine_state());
    assert_eq!(vec![0, 1, 2, 3, 4, 5], model.domain_values(x));
}

#[test]
fn removing_the_last_value_is_a_contradiction() {
    init_logging();
    let mut model = Model::default();
    let x = model.new_enumerated_variable(2, 3, Some("x"));
    let y = model.new_enumerated_variable(2, 3, Some("y"));
    let z = model.new_enumerated_variable(2, 3, Some("z"));
    let _ = model
        .add_propagator(NotEqualArgs {
            a: x,
            b: y,
        })
        .expect("variables exist");
    let _ = model
        .add_propagator(NotEqualArgs {
            a: x,
            b: z,
        })
        .expect("variables exist");
    let last = model
        .add_propagator(NotEqualArgs {
            a: y,
            b: z,
        })
        .expect("variables exist");
    model.propagate().expect("nothing is fixed yet");

    let _ = model.world_push();
    let _ = model.instantiate_to(x, 2).expect("2 is in the domain");
    let _ = model
        .propagate()
        .expect_err("three variables cannot take two values");

    assert_eq!(EngineState::Contradicted, model.engine_state());
    let contradiction = *model.last_contradiction();
    assert_eq!(Some(z), contradiction.variable);
    assert_eq!(Some(last.untyped()), contradiction.cause);
    // The failing removal left the domain as it was.
    assert_eq!(vec![3], model.domain_values(z));

    model.flush();
    model.world_pop();
    assert_eq!(vec![2, 3], model.domain_values(x));
    assert_eq!(vec![2, 3], model.domain_values(z));
}
