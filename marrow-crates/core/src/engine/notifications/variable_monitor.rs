use downcast_rs::impl_downcast;
use downcast_rs::Downcast;

use crate::basic_types::Cause;
use crate::containers::StorageKey;
use crate::engine::events::IntEventType;
use crate::engine::variables::VariableRef;
use crate::engine::variables::VariableStore;

impl_downcast!(VariableMonitor);

/// Observes the changes of a variable or a view as they happen.
///
/// Monitors are called synchronously from inside the mutation, before any propagator learns of
/// the change, and hear every event including those of the propagator which caused it. They
/// cannot modify domains.
pub trait VariableMonitor: Downcast {
    fn on_update(
        &mut self,
        variables: &VariableStore,
        variable: VariableRef,
        event: IntEventType,
        cause: Option<Cause>,
    );
}

/// Identifies a monitor added to a [`Model`](crate::engine::model::Model).
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct MonitorId(u32);

impl StorageKey for MonitorId {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        MonitorId(index as u32)
    }
}
