use std::collections::VecDeque;

use enum_map::EnumMap;

use super::Priority;
use super::PropagatorId;
use crate::containers::KeyedVec;

/// The propagators scheduled for propagation, one FIFO queue per [`Priority`].
///
/// A propagator is in the queue at most once.
#[derive(Debug, Clone, Default)]
pub(crate) struct PropagatorQueue {
    queues: EnumMap<Priority, VecDeque<PropagatorId>>,
    is_enqueued: KeyedVec<PropagatorId, bool>,
    num_enqueued: usize,
}

impl PropagatorQueue {
    pub(crate) fn is_empty(&self) -> bool {
        self.num_enqueued == 0
    }

    pub(crate) fn enqueue_propagator(&mut self, propagator_id: PropagatorId, priority: Priority) {
        if self.is_propagator_enqueued(propagator_id) {
            return;
        }
        self.is_enqueued.accommodate(propagator_id, false);
        self.is_enqueued[propagator_id] = true;
        self.num_enqueued += 1;
        self.queues[priority].push_back(propagator_id);
    }

    pub(crate) fn pop(&mut self) -> Option<PropagatorId> {
        let propagator_id = self
            .queues
            .values_mut()
            .find_map(|queue| queue.pop_front())?;

        self.is_enqueued[propagator_id] = false;
        self.num_enqueued -= 1;
        Some(propagator_id)
    }

    pub(crate) fn clear(&mut self) {
        self.queues.values_mut().for_each(VecDeque::clear);
        self.is_enqueued
            .iter_mut()
            .for_each(|is_enqueued| *is_enqueued = false);
        self.num_enqueued = 0;
    }

    pub(crate) fn is_propagator_enqueued(&self, propagator_id: PropagatorId) -> bool {
        self.is_enqueued
            .get(propagator_id)
            .copied()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn higher_priorities_are_popped_first() {
        let mut queue = PropagatorQueue::default();

        queue.enqueue_propagator(PropagatorId(1), Priority::High);
        queue.enqueue_propagator(PropagatorId(0), Priority::Medium);
        queue.enqueue_propagator(PropagatorId(3), Priority::VeryLow);
        queue.enqueue_propagator(PropagatorId(4), Priority::Low);

        assert_eq!(Some(PropagatorId(1)), queue.pop());
        assert_eq!(Some(PropagatorId(0)), queue.pop());
        assert_eq!(Some(PropagatorId(4)), queue.pop());
        assert_eq!(Some(PropagatorId(3)), queue.pop());
        assert_eq!(None, queue.pop());
    }

    #[test]
    fn propagators_are_enqueued_once() {
        let mut queue = PropagatorQueue::default();

        queue.enqueue_propagator(PropagatorId(2), Priority::Low);
        queue.enqueue_propagator(PropagatorId(2), Priority::High);

        assert_eq!(Some(PropagatorId(2)), queue.pop());
        assert!(queue.is_empty());
    }

    #[test]
    fn clearing_forgets_every_propagator() {
        let mut queue = PropagatorQueue::default();
        queue.enqueue_propagator(PropagatorId(0), Priority::High);
        queue.enqueue_propagator(PropagatorId(1), Priority::Low);

        queue.clear();

        assert!(queue.is_empty());
        assert!(!queue.is_propagator_enqueued(PropagatorId(0)));
        assert_eq!(None, queue.pop());
    }
}
