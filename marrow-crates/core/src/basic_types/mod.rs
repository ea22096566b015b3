mod cause;
mod contradiction;
mod model_error;
mod trail;

pub use cause::Cause;
pub use contradiction::Contradiction;
pub use contradiction::ContradictionReason;
pub use contradiction::PropagationStatus;
pub use model_error::ModelError;
pub(crate) use trail::Trail;
