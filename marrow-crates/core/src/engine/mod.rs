//! The runtime of the solver: reversible state, variables, events and propagation.
pub mod delta;
mod engine_statistics;
pub mod events;
pub mod hypothesis;
pub mod model;
pub mod notifications;
pub mod propagation;
pub mod reversible;
pub mod variables;

pub use engine_statistics::EngineStatistics;
