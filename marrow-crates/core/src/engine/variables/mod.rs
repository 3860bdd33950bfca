//! A variable is a view onto a domain. A [`DomainId`] is the domain itself, an [`AffineView`]
//! transforms the values of another variable without needing a constraint.
mod affine_view;
mod domain_id;
mod integer_domain;
mod integer_variable;
mod transformable_variable;
mod variable_names;
mod variable_store;

pub use affine_view::AffineView;
pub use domain_id::DomainId;
pub use integer_domain::DomainKind;
pub(crate) use integer_domain::DomainUpdate;
pub(crate) use integer_domain::EmptyDomain;
pub(crate) use integer_domain::IntegerDomain;
pub use integer_domain::MAX_ENUMERATED_RANGE;
pub use integer_variable::IntegerVariable;
pub use transformable_variable::TransformableVariable;
pub(crate) use variable_names::VariableNames;
pub(crate) use variable_store::Subscription;
pub(crate) use variable_store::VariableStore;
