//! Pawn promotion selection. A promotion move can carry the chosen piece, in
//! which case it is applied immediately. Otherwise the board waits for
//! [`crate::chess::board::Board::select_promotion`] and refuses other moves.

use crate::chess::core::{Color, Position};

/// Whether the board is waiting for a promotion choice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PromotionState {
    /// No promotion is pending.
    #[default]
    None,
    /// A pawn of `color` reached `square` and waits to be replaced.
    Selecting {
        #[allow(missing_docs)]
        square: Position,
        #[allow(missing_docs)]
        color: Color,
    },
}

impl PromotionState {
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Selecting { .. })
    }
}

/// Notified when a pawn reaches the last rank without a promotion choice,
/// e.g. to show a piece selector. Closures can be used directly.
pub trait PromotionHandler {
    /// A pawn of `color` on `square` has to be promoted.
    fn promotion_pending(&mut self, square: Position, color: Color);
}

impl<F: FnMut(Position, Color)> PromotionHandler for F {
    fn promotion_pending(&mut self, square: Position, color: Color) {
        self(square, color);
    }
}
