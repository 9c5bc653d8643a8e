//! The [en passant] marker: a pseudo-piece standing on the square a pawn
//! skipped with a double push. It never blocks sliders and is not part of the
//! grid, it only makes the skipped square capturable for enemy pawns during
//! the next ply.
//!
//! [en passant]: https://www.chessprogramming.org/En_passant

use crate::chess::core::{Color, Position};

/// Live en passant opportunity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Offer {
    /// Square of the pawn that made the double push.
    pub pawn: Position,
    /// Square the pawn skipped. Enemy pawns capture by moving here.
    pub square: Position,
    /// Color of the pawn that made the double push.
    pub color: Color,
    /// Ply of the double push. Absent when the offer comes from a setup
    /// string.
    pub ply: Option<usize>,
}

impl Offer {
    /// Offer created by a double push from `from` to `to`.
    #[must_use]
    pub fn new(from: Position, to: Position, color: Color, ply: Option<usize>) -> Self {
        Self {
            pawn: to,
            square: Position::new(from.file, (from.rank + to.rank) / 2),
            color,
            ply,
        }
    }
}

/// The single en passant marker of a board together with the history needed
/// to revert its transitions. Each history entry stores the offer that was
/// replaced and the ply that replaced it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnPassant {
    offer: Option<Offer>,
    history: Vec<(usize, Option<Offer>)>,
}

impl EnPassant {
    pub(crate) fn with_offer(offer: Option<Offer>) -> Self {
        Self {
            offer,
            history: Vec::new(),
        }
    }

    #[must_use]
    pub const fn offer(&self) -> Option<Offer> {
        self.offer
    }

    /// Where the marker currently resides.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        self.offer.map(|offer| offer.square)
    }

    /// Places the marker for a fresh double push made at `ply`, dropping any
    /// previous offer.
    pub(crate) fn offer_at(&mut self, offer: Offer, ply: usize) {
        log::trace!("en passant offered on {} at ply {ply}", offer.square);
        let previous = self.offer.replace(offer);
        self.history.push((ply, previous));
    }

    /// Removes the marker. Without a ply the removal is not recorded and can
    /// not be undone.
    pub(crate) fn cancel(&mut self, ply: Option<usize>) {
        let Some(previous) = self.offer.take() else {
            return;
        };
        log::trace!("en passant on {} cancelled", previous.square);
        if let Some(ply) = ply {
            self.history.push((ply, Some(previous)));
        }
    }

    /// Cancels the offer once it is the offering side's turn again: the
    /// opponent had exactly one ply to use it.
    pub(crate) fn expire(&mut self, turn: Color, ply: Option<usize>) {
        if self.offer.is_some_and(|offer| offer.color == turn) {
            self.cancel(ply);
        }
    }

    /// Reverts every transition made at `ply`.
    pub(crate) fn undo(&mut self, ply: usize) {
        while self.history.last().is_some_and(|(tag, _)| *tag == ply) {
            if let Some((_, previous)) = self.history.pop() {
                self.offer = previous;
            }
        }
    }
}
