use super::{Calculation, Piece};
use crate::chess::board::Board;
use crate::chess::core::Position;

const OFFSETS: [Position; 8] = [
    Position::new(1, 2),
    Position::new(2, 1),
    Position::new(2, -1),
    Position::new(1, -2),
    Position::new(-1, -2),
    Position::new(-2, -1),
    Position::new(-2, 1),
    Position::new(-1, 2),
];

/// A knight can not stay on the pin line, so a pinned knight has no legal
/// moves but still controls its squares.
pub(super) fn calculate(piece: &Piece, board: &Board) -> Calculation {
    let mut result = Calculation::default();
    for offset in OFFSETS {
        let target = piece.position() + offset;
        if !target.is_valid() {
            continue;
        }
        result.controlled_squares.push(target);
        if piece.is_pinned() {
            continue;
        }
        if board
            .piece_at(target)
            .map_or(true, |occupant| occupant.color() != piece.color())
        {
            result.legal_moves.push(target);
        }
    }
    result
}
