use std::iter::Rev;
use std::ops::Deref;
use std::vec::Drain;

use crate::marrow_assert_simple;

/// An undo log partitioned into worlds.
///
/// Every entry pushed after [`Trail::push_world`] belongs to the newly opened world, popping back
/// to an earlier world hands the entries of the discarded worlds back most recent first.
#[derive(Clone, Debug)]
pub(crate) struct Trail<T> {
    /// At index i is the length the trail had when world i + 1 was opened.
    world_starts: Vec<usize>,
    entries: Vec<T>,
}

impl<T> Default for Trail<T> {
    fn default() -> Self {
        Trail {
            world_starts: Vec::new(),
            entries: Vec::new(),
        }
    }
}

impl<T> Trail<T> {
    pub(crate) fn push_world(&mut self) {
        self.world_starts.push(self.entries.len());
    }

    /// The index of the current world, the root world has index 0.
    pub(crate) fn world_index(&self) -> usize {
        self.world_starts.len()
    }

    /// Discards every world above `world` and returns their entries in reverse order of insertion.
    pub(crate) fn pop_to_world(&mut self, world: usize) -> Rev<Drain<'_, T>> {
        marrow_assert_simple!(
            world < self.world_index(),
            "cannot pop to world {world} from world {}",
            self.world_index()
        );

        let new_len = self.world_starts[world];
        self.world_starts.truncate(world);
        self.entries.drain(new_len..).rev()
    }

    pub(crate) fn push(&mut self, entry: T) {
        self.entries.push(entry)
    }
}

impl<T> Deref for Trail<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.entries
    }
}
