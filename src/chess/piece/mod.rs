//! Pieces own their move state: every piece knows its legal destinations and
//! the squares it controls. The board asks each piece to recompute this state
//! after every change and combines the results (controlled squares, pins,
//! check restrictions).

mod king;
mod knight;
mod pawn;
mod sliding;

use std::fmt;

use arrayvec::ArrayVec;

pub use self::king::Check;
pub(crate) use self::king::{check, checkers, does_move_block_check, keeps_castle_right};
use crate::chess::board::Board;
use crate::chess::core::{Color, PieceKind, Position};

/// Fixed-capacity list of squares. A queen in the center of an empty board
/// reaches 27 squares, which is the upper bound for any piece.
pub type Squares = ArrayVec<Position, 32>;

/// A piece pinned to its king by the enemy slider standing on the other side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pin {
    /// Square of the pinned piece.
    pub position: Position,
    /// Unit direction of the line the piece is pinned along.
    pub direction: Position,
}

/// Result of a single piece calculation. The board stores the square lists in
/// the piece and applies the pins to other pieces.
#[derive(Clone, Debug, Default)]
pub(crate) struct Calculation {
    pub(crate) legal_moves: Squares,
    pub(crate) controlled_squares: Squares,
    pub(crate) pins: ArrayVec<Pin, 8>,
}

/// A chess piece placed on the board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    color: Color,
    position: Position,
    /// The piece has not moved yet.
    virgin: bool,
    starting_position: Position,
    /// Ply of the first move, used to restore `virgin` on undo.
    first_moved_at: Option<usize>,
    legal_moves: Squares,
    controlled_squares: Squares,
    /// Zero when the piece is not pinned.
    pinned_direction: Position,
}

impl Piece {
    #[must_use]
    pub fn new(kind: PieceKind, color: Color, position: Position) -> Self {
        Self {
            kind,
            color,
            position,
            virgin: true,
            starting_position: position,
            first_moved_at: None,
            legal_moves: Squares::new(),
            controlled_squares: Squares::new(),
            pinned_direction: Position::ZERO,
        }
    }

    /// Creates the piece a pawn turns into. Promoted pieces are never virgin,
    /// so a promoted rook can not castle.
    #[must_use]
    pub(crate) fn promoted(kind: PieceKind, color: Color, position: Position) -> Self {
        Self {
            virgin: false,
            ..Self::new(kind, color, position)
        }
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Returns true if the piece has not moved since the board was set up.
    #[must_use]
    pub const fn is_virgin(&self) -> bool {
        self.virgin
    }

    /// Square the piece occupied before its first move.
    #[must_use]
    pub const fn starting_position(&self) -> Position {
        self.starting_position
    }

    /// Destinations the piece can move to in the current position. Promotion
    /// destinations are listed once.
    #[must_use]
    pub fn legal_moves(&self) -> &[Position] {
        &self.legal_moves
    }

    /// Squares attacked or defended by the piece regardless of pins.
    #[must_use]
    pub fn controlled_squares(&self) -> &[Position] {
        &self.controlled_squares
    }

    #[must_use]
    pub const fn pinned_direction(&self) -> Position {
        self.pinned_direction
    }

    #[must_use]
    pub const fn is_pinned(&self) -> bool {
        !self.pinned_direction.is_zero()
    }

    /// Returns true if moving a pawn to `to` reaches the last rank.
    #[must_use]
    pub const fn is_promotion_move(&self, to: Position) -> bool {
        matches!(self.kind, PieceKind::Pawn) && to.rank == self.color.promotion_rank()
    }

    /// Returns true if the pin (if any) allows moving along `direction`.
    #[must_use]
    pub(crate) fn can_move_along(&self, direction: Position) -> bool {
        !self.is_pinned()
            || direction == self.pinned_direction
            || direction == -self.pinned_direction
    }

    pub fn pin(&mut self, direction: Position) {
        self.pinned_direction = direction.normalized();
    }

    pub fn unpin(&mut self) {
        self.pinned_direction = Position::ZERO;
    }

    /// Moves the piece to `to` if it is one of the legal destinations. Returns
    /// false and leaves the piece untouched otherwise.
    ///
    /// Side effects on other pieces (captures, castling rook, en passant,
    /// promotion) are handled by [`Board::make_move`].
    pub fn move_to(&mut self, to: Position, ply: usize) -> bool {
        if !self.legal_moves.contains(&to) {
            return false;
        }
        self.relocate(to, ply);
        true
    }

    /// Reverts [`Piece::move_to`] made at `ply`.
    pub fn undo_move(&mut self, from: Position, ply: usize) {
        self.position = from;
        if self.first_moved_at == Some(ply) {
            self.virgin = true;
            self.first_moved_at = None;
        }
    }

    /// Unconditional rook relocation next to the castling king.
    pub(crate) fn castle(&mut self, to: Position, ply: usize) {
        debug_assert_eq!(self.kind, PieceKind::Rook);
        self.relocate(to, ply);
    }

    fn relocate(&mut self, to: Position, ply: usize) {
        if self.virgin {
            self.virgin = false;
            self.starting_position = self.position;
            self.first_moved_at = Some(ply);
        }
        self.position = to;
    }

    /// Computes the legal moves and controlled squares of the piece without
    /// modifying anything.
    #[must_use]
    pub(crate) fn calculate(&self, board: &Board) -> Calculation {
        match self.kind {
            PieceKind::King => king::calculate(self, board),
            PieceKind::Knight => knight::calculate(self, board),
            PieceKind::Pawn => pawn::calculate(self, board),
            PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop => {
                sliding::calculate(self, board, sliding::directions(self.kind))
            },
        }
    }

    /// Stores the square lists produced by [`Piece::calculate`].
    pub(crate) fn apply(&mut self, legal_moves: Squares, controlled_squares: Squares) {
        self.legal_moves = legal_moves;
        self.controlled_squares = controlled_squares;
    }

    /// Replaces the legal moves, e.g. with the subset resolving a check.
    pub(crate) fn set_legal_moves(&mut self, legal_moves: Squares) {
        self.legal_moves = legal_moves;
    }

    pub(crate) fn clear_legal_moves(&mut self) {
        self.legal_moves.clear();
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.symbol(self.color), self.position)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn first_move_is_undone_by_ply() {
        let mut rook = Piece::new(PieceKind::Rook, Color::White, Position::new(0, 0));
        rook.legal_moves.push(Position::new(0, 3));
        assert!(!rook.move_to(Position::new(0, 4), 3));
        assert_eq!(rook.position(), Position::new(0, 0));
        assert!(rook.is_virgin());

        assert!(rook.move_to(Position::new(0, 3), 3));
        assert!(!rook.is_virgin());
        assert_eq!(rook.starting_position(), Position::new(0, 0));

        rook.relocate(Position::new(0, 0), 5);
        // Coming back to the starting square does not restore the flag.
        assert!(!rook.is_virgin());
        rook.undo_move(Position::new(0, 3), 5);
        assert!(!rook.is_virgin());
        rook.undo_move(Position::new(0, 0), 3);
        assert!(rook.is_virgin());
        assert_eq!(rook.position(), Position::new(0, 0));
    }

    #[test]
    fn pins() {
        let mut bishop = Piece::new(PieceKind::Bishop, Color::Black, Position::new(2, 2));
        assert!(!bishop.is_pinned());
        bishop.pin(Position::new(3, 3));
        assert!(bishop.is_pinned());
        assert_eq!(bishop.pinned_direction(), Position::new(1, 1));
        assert!(bishop.can_move_along(Position::new(1, 1)));
        assert!(bishop.can_move_along(Position::new(-1, -1)));
        assert!(!bishop.can_move_along(Position::new(1, -1)));
        bishop.unpin();
        assert!(bishop.can_move_along(Position::new(1, -1)));
    }

    #[test]
    fn promotion_moves() {
        let white = Piece::new(PieceKind::Pawn, Color::White, Position::new(0, 6));
        assert!(white.is_promotion_move(Position::new(0, 7)));
        assert!(!white.is_promotion_move(Position::new(0, 5)));
        let black = Piece::new(PieceKind::Pawn, Color::Black, Position::new(0, 1));
        assert!(black.is_promotion_move(Position::new(1, 0)));
        let knight = Piece::new(PieceKind::Knight, Color::White, Position::new(1, 5));
        assert!(!knight.is_promotion_move(Position::new(0, 7)));
    }

    #[test]
    fn display() {
        let queen = Piece::new(PieceKind::Queen, Color::White, Position::new(3, 0));
        assert_eq!(queen.to_string(), "Qd1");
    }
}
