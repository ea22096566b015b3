use log::trace;

use super::ReversibleBitSet;
use super::ReversibleInt;
use crate::basic_types::Trail;
use crate::containers::KeyedVec;
use crate::marrow_assert_moderate;
use crate::marrow_assert_simple;

const WORD_BITS: usize = u64::BITS as usize;

#[derive(Debug, Clone, Copy)]
enum ReversibleChange {
    Integer { cell: ReversibleInt, old_value: i64 },
    Word { index: usize, old_value: u64 },
}

#[derive(Debug, Clone, Copy)]
struct BitSetLayout {
    first_word: usize,
    num_words: usize,
    capacity: usize,
}

/// Arena of reversible integers and bit-sets sharing one trail.
///
/// Writes which leave a cell unchanged are not recorded. The store keeps a timestamp which changes
/// whenever a world is pushed or popped, letting lazily maintained structures detect that
/// their content belongs to another world.
#[derive(Default, Debug, Clone)]
pub struct ReversibleStore {
    trail: Trail<ReversibleChange>,
    integers: KeyedVec<ReversibleInt, i64>,
    words: Vec<u64>,
    bit_sets: KeyedVec<ReversibleBitSet, BitSetLayout>,
    timestamp: u64,
}

/// The mask selecting bits `from..to` of a single word, with `from < to <= 64`.
fn word_mask(from: usize, to: usize) -> u64 {
    let upper = if to == WORD_BITS {
        u64::MAX
    } else {
        (1_u64 << to) - 1
    };
    upper & (u64::MAX << from)
}

impl ReversibleStore {
    pub fn new_int(&mut self, initial_value: i64) -> ReversibleInt {
        self.integers.push(initial_value)
    }

    /// Allocates a bit-set over `0..capacity` with every bit set when `filled`.
    pub fn new_bit_set(&mut self, capacity: usize, filled: bool) -> ReversibleBitSet {
        let first_word = self.words.len();
        let num_words = capacity.div_ceil(WORD_BITS);
        self.words.resize(first_word + num_words, 0);

        let bit_set = self.bit_sets.push(BitSetLayout {
            first_word,
            num_words,
            capacity,
        });
        if filled && capacity > 0 {
            // Initial content is written outside of any world and never undone.
            for (offset, word) in self.words[first_word..].iter_mut().enumerate() {
                let from = offset * WORD_BITS;
                *word = word_mask(0, (capacity - from).min(WORD_BITS));
            }
        }
        bit_set
    }

    /// Allocates a bit-set over `0..capacity` whose initial content are the given indices.
    pub fn new_bit_set_with(
        &mut self,
        capacity: usize,
        indices: impl IntoIterator<Item = usize>,
    ) -> ReversibleBitSet {
        let bit_set = self.new_bit_set(capacity, false);
        let first_word = self.layout(bit_set).first_word;
        for index in indices {
            marrow_assert_simple!(index < capacity);
            self.words[first_word + index / WORD_BITS] |= 1 << (index % WORD_BITS);
        }
        bit_set
    }

    pub fn push_world(&mut self) {
        self.trail.push_world();
        self.timestamp += 1;
        trace!("pushed world {}", self.trail.world_index());
    }

    /// Undoes every write of the current world and returns to the previous one.
    pub fn pop_world(&mut self) {
        marrow_assert_simple!(
            self.trail.world_index() > 0,
            "the root world cannot be popped"
        );
        self.pop_to_world(self.trail.world_index() - 1)
    }

    /// Undoes every write made since `world` was the current world.
    pub fn pop_to_world(&mut self, world: usize) {
        self.trail
            .pop_to_world(world)
            .for_each(|change| match change {
                ReversibleChange::Integer { cell, old_value } => self.integers[cell] = old_value,
                ReversibleChange::Word { index, old_value } => self.words[index] = old_value,
            });
        self.timestamp += 1;
        trace!("popped to world {world}");
    }

    pub fn world_index(&self) -> usize {
        self.trail.world_index()
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn read(&self, cell: ReversibleInt) -> i64 {
        self.integers[cell]
    }

    pub fn assign(&mut self, cell: ReversibleInt, value: i64) {
        let old_value = self.integers[cell];
        if old_value == value {
            return;
        }
        self.trail
            .push(ReversibleChange::Integer { cell, old_value });
        self.integers[cell] = value;
    }

    pub fn add_assign(&mut self, cell: ReversibleInt, addition: i64) {
        self.assign(cell, self.integers[cell] + addition);
    }

    fn write_word(&mut self, index: usize, value: u64) {
        let old_value = self.words[index];
        if old_value == value {
            return;
        }
        self.trail.push(ReversibleChange::Word { index, old_value });
        self.words[index] = value;
    }

    fn layout(&self, bit_set: ReversibleBitSet) -> BitSetLayout {
        self.bit_sets[bit_set]
    }

    pub fn capacity(&self, bit_set: ReversibleBitSet) -> usize {
        self.layout(bit_set).capacity
    }

    pub fn bit(&self, bit_set: ReversibleBitSet, index: usize) -> bool {
        let layout = self.layout(bit_set);
        if index >= layout.capacity {
            return false;
        }
        let word = self.words[layout.first_word + index / WORD_BITS];
        word & (1 << (index % WORD_BITS)) != 0
    }

    pub fn set_bit(&mut self, bit_set: ReversibleBitSet, index: usize) {
        self.set_bits(bit_set, index, index + 1)
    }

    pub fn clear_bit(&mut self, bit_set: ReversibleBitSet, index: usize) {
        self.clear_bits(bit_set, index, index + 1)
    }

    /// Sets the bits `from..to`.
    pub fn set_bits(&mut self, bit_set: ReversibleBitSet, from: usize, to: usize) {
        self.update_bits(bit_set, from, to, |word, mask| word | mask)
    }

    /// Clears the bits `from..to`.
    pub fn clear_bits(&mut self, bit_set: ReversibleBitSet, from: usize, to: usize) {
        self.update_bits(bit_set, from, to, |word, mask| word & !mask)
    }

    fn update_bits(
        &mut self,
        bit_set: ReversibleBitSet,
        from: usize,
        to: usize,
        update: impl Fn(u64, u64) -> u64,
    ) {
        let layout = self.layout(bit_set);
        marrow_assert_simple!(
            to <= layout.capacity,
            "bit {to} is out of the capacity {}",
            layout.capacity
        );
        let mut start = from;
        while start < to {
            let word_end = (start / WORD_BITS + 1) * WORD_BITS;
            let end = to.min(word_end);
            let index = layout.first_word + start / WORD_BITS;
            let mask = word_mask(start % WORD_BITS, end - (word_end - WORD_BITS));
            self.write_word(index, update(self.words[index], mask));
            start = end;
        }
    }

    /// The number of set bits among `from..to`.
    pub fn count_bits(&self, bit_set: ReversibleBitSet, from: usize, to: usize) -> usize {
        let layout = self.layout(bit_set);
        let to = to.min(layout.capacity);
        let mut count = 0;
        let mut start = from;
        while start < to {
            let word_end = (start / WORD_BITS + 1) * WORD_BITS;
            let end = to.min(word_end);
            let mask = word_mask(start % WORD_BITS, end - (word_end - WORD_BITS));
            let word = self.words[layout.first_word + start / WORD_BITS];
            count += (word & mask).count_ones() as usize;
            start = end;
        }
        count
    }

    pub fn cardinality(&self, bit_set: ReversibleBitSet) -> usize {
        let layout = self.layout(bit_set);
        self.words[layout.first_word..layout.first_word + layout.num_words]
            .iter()
            .map(|word| word.count_ones() as usize)
            .sum()
    }

    /// The smallest set bit at or after `from`.
    pub fn next_set_bit(&self, bit_set: ReversibleBitSet, from: usize) -> Option<usize> {
        self.next_bit(bit_set, from, false)
    }

    /// The smallest clear bit at or after `from`; bits beyond the capacity count as clear.
    pub fn next_clear_bit(&self, bit_set: ReversibleBitSet, from: usize) -> usize {
        let capacity = self.capacity(bit_set);
        if from >= capacity {
            return from;
        }
        self.next_bit(bit_set, from, true).unwrap_or(capacity)
    }

    /// The largest set bit at or before `from`.
    pub fn previous_set_bit(&self, bit_set: ReversibleBitSet, from: usize) -> Option<usize> {
        self.previous_bit(bit_set, from, false)
    }

    /// The largest clear bit at or before `from`; bits beyond the capacity count as clear.
    pub fn previous_clear_bit(&self, bit_set: ReversibleBitSet, from: usize) -> Option<usize> {
        if from >= self.capacity(bit_set) {
            return Some(from);
        }
        self.previous_bit(bit_set, from, true)
    }

    fn next_bit(&self, bit_set: ReversibleBitSet, from: usize, clear: bool) -> Option<usize> {
        let layout = self.layout(bit_set);
        if from >= layout.capacity {
            return None;
        }
        let read = |word_index: usize| {
            let word = self.words[layout.first_word + word_index];
            if clear {
                !word
            } else {
                word
            }
        };

        let mut word_index = from / WORD_BITS;
        let mut word = read(word_index) & (u64::MAX << (from % WORD_BITS));
        loop {
            if word != 0 {
                let index = word_index * WORD_BITS + word.trailing_zeros() as usize;
                return (index < layout.capacity).then_some(index);
            }
            word_index += 1;
            if word_index >= layout.num_words {
                return None;
            }
            word = read(word_index);
        }
    }

    fn previous_bit(&self, bit_set: ReversibleBitSet, from: usize, clear: bool) -> Option<usize> {
        let layout = self.layout(bit_set);
        if layout.capacity == 0 {
            return None;
        }
        let from = from.min(layout.capacity - 1);
        marrow_assert_moderate!(from < layout.num_words * WORD_BITS);
        let read = |word_index: usize| {
            let word = self.words[layout.first_word + word_index];
            if clear {
                !word
            } else {
                word
            }
        };

        let mut word_index = from / WORD_BITS;
        let mut word = read(word_index) & word_mask(0, from % WORD_BITS + 1);
        loop {
            if word != 0 {
                return Some(
                    word_index * WORD_BITS + (WORD_BITS - 1) - word.leading_zeros() as usize,
                );
            }
            if word_index == 0 {
                return None;
            }
            word_index -= 1;
            word = read(word_index);
        }
    }
}
