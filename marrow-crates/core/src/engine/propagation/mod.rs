//! Propagators and the engine which runs them to a fix-point.
//!
//! A propagator is built by a [`PropagatorConstructor`], which registers the propagator to the
//! variables it watches. Whenever one of those variables changes in a way the registration
//! selects, the propagator is notified through [`Propagator::notify`] and, unless it declines,
//! scheduled in a priority queue. [`Model::propagate`](crate::engine::model::Model::propagate)
//! then calls the scheduled propagators until the queue is empty or one of them reports a
//! contradiction.
mod constructor;
mod engine;
mod local_id;
mod propagation_context;
mod propagator;
mod propagator_id;
mod propagator_queue;
mod propagator_var_id;
mod store;

pub use constructor::PropagatorConstructor;
pub use constructor::PropagatorConstructorContext;
pub(crate) use engine::PropagationEngine;
pub use local_id::LocalId;
pub use propagation_context::NotificationContext;
pub use propagation_context::PropagationContext;
pub use propagator::EnqueueDecision;
pub use propagator::Priority;
pub use propagator::Propagator;
pub use propagator_id::PropagatorId;
pub(crate) use propagator_queue::PropagatorQueue;
pub(crate) use propagator_var_id::PropagatorVarId;
pub use store::PropagatorHandle;
pub(crate) use store::PropagatorStore;
