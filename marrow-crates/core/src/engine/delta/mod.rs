//! Logs of removed values, read incrementally by propagators.
mod delta_log;
mod delta_monitor;

pub(crate) use delta_log::DeltaLog;
pub(crate) use delta_log::DeltaRecorder;
pub use delta_log::Removal;
pub use delta_monitor::DeltaMonitor;
