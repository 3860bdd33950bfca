mod contradiction;
mod model_error;
mod trail;

pub use contradiction::Contradiction;
pub use contradiction::ContradictionInfo;
pub(crate) use contradiction::messages;
pub use contradiction::PropagationStatus;
pub use model_error::ModelError;
pub(crate) use trail::Trail;
