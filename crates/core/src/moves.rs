//! MoveSet - a set of board coordinates backed by a 64-bit mask
//!
//! One bit per cell in row-major order. Inserting the same cell twice is a
//! no-op, so landing cells found from different source pieces collapse
//! naturally, and iteration is always in row-major order.

use crate::types::{Move, NUM_CELLS};

/// Set of board coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MoveSet {
    bits: u64,
}

impl MoveSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self { bits: 0 }
    }

    /// Insert a move; returns false if it was already present
    pub fn insert(&mut self, mv: Move) -> bool {
        let bit = 1u64 << mv.index();
        let fresh = self.bits & bit == 0;
        self.bits |= bit;
        fresh
    }

    pub fn contains(&self, mv: Move) -> bool {
        self.bits & (1u64 << mv.index()) != 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn clear(&mut self) {
        self.bits = 0;
    }

    /// Iterate in row-major order
    pub fn iter(&self) -> MoveSetIter {
        MoveSetIter { bits: self.bits }
    }
}

/// Row-major iterator over a [`MoveSet`]
#[derive(Debug, Clone)]
pub struct MoveSetIter {
    bits: u64,
}

impl Iterator for MoveSetIter {
    type Item = Move;

    fn next(&mut self) -> Option<Move> {
        if self.bits == 0 {
            return None;
        }
        let index = self.bits.trailing_zeros() as usize;
        // Clear lowest set bit.
        self.bits &= self.bits - 1;
        debug_assert!(index < NUM_CELLS);
        Move::from_index(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.bits.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for MoveSetIter {}

impl<'a> IntoIterator for &'a MoveSet {
    type Item = Move;
    type IntoIter = MoveSetIter;

    fn into_iter(self) -> MoveSetIter {
        self.iter()
    }
}

impl IntoIterator for MoveSet {
    type Item = Move;
    type IntoIter = MoveSetIter;

    fn into_iter(self) -> MoveSetIter {
        self.iter()
    }
}

impl FromIterator<Move> for MoveSet {
    fn from_iter<I: IntoIterator<Item = Move>>(iter: I) -> Self {
        let mut set = MoveSet::new();
        set.extend(iter);
        set
    }
}

impl Extend<Move> for MoveSet {
    fn extend<I: IntoIterator<Item = Move>>(&mut self, iter: I) {
        for mv in iter {
            self.insert(mv);
        }
    }
}
