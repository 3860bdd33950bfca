//! # Marrow
//! Marrow is the kernel of a constraint solver: integer domain variables whose every modification
//! can be undone, and an engine which runs propagators on those variables until nothing changes.
//!
//! A [`Model`] holds the variables and propagators. Propagators are added through a
//! [`PropagatorConstructor`](engine::propagation::PropagatorConstructor), which declares the
//! variables and [`DomainEvents`] the propagator wants to be woken up by.
//!
//! ```rust
//! # use marrow_core::Model;
//! # use marrow_core::propagators::LinearLessOrEqualArgs;
//! # use marrow_core::engine::propagation::ReadDomains;
//! let mut model = Model::default();
//! let x = model.new_enumerated_variable(1, 5, Some("x"));
//! let y = model.new_enumerated_variable(0, 10, Some("y"));
//!
//! // x + y <= 7
//! let _ = model
//!     .add_propagator(LinearLessOrEqualArgs {
//!         x: [x, y].into(),
//!         c: 7,
//!     })
//!     .expect("x and y belong to the model");
//!
//! model.propagate().expect("the model is consistent");
//! assert_eq!(6, model.upper_bound(y));
//! ```
//!
//! Search moves through a stack of worlds. [`Model::world_push`] saves the state, after which
//! decisions and propagation modify the domains; [`Model::world_pop`] restores every domain and
//! every piece of stored propagator state to the moment of the push. A [`Contradiction`] is
//! returned whenever propagation empties a domain; it has to be acknowledged with
//! [`Model::flush`] before the world is popped. The [`search`] module contains a depth-first
//! search which does exactly that.
pub(crate) mod basic_types;
pub mod containers;
pub mod engine;
pub(crate) mod marrow_asserts;
pub mod options;
pub mod propagators;
pub mod search;
pub mod statistics;
pub mod termination;
pub mod trailing;

pub use crate::basic_types::Contradiction;
pub use crate::basic_types::ContradictionInfo;
pub use crate::basic_types::ModelError;
pub use crate::basic_types::PropagationStatus;
pub use crate::engine::variables::AffineView;
pub use crate::engine::variables::DomainId;
pub use crate::engine::variables::IntegerVariable;
pub use crate::engine::variables::TransformableVariable;
pub use crate::engine::DomainEvents;
pub use crate::engine::EngineState;
pub use crate::engine::Model;
pub use crate::options::EngineOptions;
pub use crate::options::ModelOptions;
