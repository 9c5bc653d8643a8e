//! [`Bitboard`] is a compact set of squares. The board uses it to store the
//! squares controlled by each side, which are then queried for king safety
//! and castling.
//!
//! [Bitboard]: https://www.chessprogramming.org/Bitboards

use std::fmt;

use itertools::Itertools;

use crate::chess::core::{Position, BOARD_SIZE, BOARD_WIDTH};

/// Represents a set of squares. Each bit corresponds to one of 64 squares of
/// the chess board.
///
/// Mirroring [`Position::to_index`] semantics, the least significant bit
/// corresponds to A1, and the most significant bit to H8.
#[derive(Copy, Clone, Default, PartialEq, Eq)]
pub struct Bitboard {
    bits: u64,
}

impl Bitboard {
    /// Constructs a bitboard representing empty set of squares.
    #[must_use]
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Returns true if this bitboard contains given square.
    #[must_use]
    pub fn contains(self, square: Position) -> bool {
        (self.bits & (1u64 << square.to_index())) != 0
    }

    pub fn insert(&mut self, square: Position) {
        self.bits |= 1u64 << square.to_index();
    }

    #[must_use]
    pub const fn count(self) -> u32 {
        self.bits.count_ones()
    }

    /// Iterates over the set squares from A1 to H8.
    #[must_use]
    pub const fn iter(self) -> BitboardIterator {
        BitboardIterator { bits: self.bits }
    }
}

const LINE_SEPARATOR: &str = "\n";
const SQUARE_SEPARATOR: &str = " ";

impl fmt::Debug for Bitboard {
    /// Prints the set as an 8x8 grid, rank 8 on top. Set squares are `1`,
    /// the rest are `.`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let grid = (0..BOARD_SIZE)
            .map(|index| {
                if self.contains(Position::from_index(index)) {
                    '1'
                } else {
                    '.'
                }
            })
            .chunks(BOARD_WIDTH as usize)
            .into_iter()
            .map(|mut rank| rank.join(SQUARE_SEPARATOR))
            .collect_vec();
        write!(f, "{}", grid.iter().rev().join(LINE_SEPARATOR))
    }
}

/// Iterates over set squares in a given [Bitboard] from least significant 1
/// bits (LS1B) to most significant 1 bits (MS1B) through the [BitScan]
/// forward operation.
///
/// [BitScan]: https://www.chessprogramming.org/BitScan
pub struct BitboardIterator {
    bits: u64,
}

impl Iterator for BitboardIterator {
    type Item = Position;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            return None;
        }
        // Get the LS1B and consume it from the iterator.
        let next_index = self.bits.trailing_zeros();
        self.bits ^= 1 << next_index;
        Some(Position::from_index(next_index as usize))
    }
}
