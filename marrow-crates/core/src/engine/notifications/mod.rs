//! Delivery of domain events to the monitors, propagators and views subscribed to a variable.
mod dispatch_context;
mod notification_engine;
mod variable_monitor;

pub(crate) use dispatch_context::DispatchContext;
pub(crate) use notification_engine::NotificationEngine;
pub use variable_monitor::MonitorId;
pub use variable_monitor::VariableMonitor;
