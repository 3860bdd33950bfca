//! Propagators for a handful of arithmetic constraints.
mod binary_less_or_equal;
mod linear_less_or_equal;
mod not_equal;

pub use binary_less_or_equal::BinaryLessOrEqualArgs;
pub use binary_less_or_equal::BinaryLessOrEqualPropagator;
pub use linear_less_or_equal::LinearLessOrEqualArgs;
pub use linear_less_or_equal::LinearLessOrEqualPropagator;
pub use not_equal::NotEqualArgs;
pub use not_equal::NotEqualPropagator;
