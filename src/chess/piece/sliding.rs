//! Bishops, rooks and queens share the same ray walk and differ only in the
//! set of directions.

use super::{Calculation, Pin, Piece};
use crate::chess::board::Board;
use crate::chess::core::{PieceKind, Position};

const BISHOP_DIRECTIONS: [Position; 4] = [
    Position::new(1, 1),
    Position::new(1, -1),
    Position::new(-1, 1),
    Position::new(-1, -1),
];

const ROOK_DIRECTIONS: [Position; 4] = [
    Position::new(1, 0),
    Position::new(-1, 0),
    Position::new(0, 1),
    Position::new(0, -1),
];

const QUEEN_DIRECTIONS: [Position; 8] = [
    Position::new(1, 1),
    Position::new(1, -1),
    Position::new(-1, 1),
    Position::new(-1, -1),
    Position::new(1, 0),
    Position::new(-1, 0),
    Position::new(0, 1),
    Position::new(0, -1),
];

pub(super) fn directions(kind: PieceKind) -> &'static [Position] {
    match kind {
        PieceKind::Bishop => &BISHOP_DIRECTIONS,
        PieceKind::Rook => &ROOK_DIRECTIONS,
        PieceKind::Queen => &QUEEN_DIRECTIONS,
        _ => unreachable!("{kind:?} is not a sliding piece"),
    }
}

/// Walks every ray until the first occupied square.
///
/// The first occupied square is always controlled. Enemy pieces there can be
/// captured. Behind the enemy king the ray keeps going (x-ray) up to and
/// including the next occupied square, so that the king can not step back
/// along the line of attack. Behind any other enemy piece the ray is
/// inspected for a pin against that piece's king.
pub(super) fn calculate(piece: &Piece, board: &Board, directions: &[Position]) -> Calculation {
    let mut result = Calculation::default();
    for &direction in directions {
        let movable = piece.can_move_along(direction);
        let mut target = piece.position() + direction;
        while target.is_valid() && !board.is_square_occupied(target) {
            result.controlled_squares.push(target);
            if movable {
                result.legal_moves.push(target);
            }
            target += direction;
        }
        let Some(blocker) = board.piece_at(target) else {
            continue;
        };
        result.controlled_squares.push(target);
        if blocker.color() == piece.color() {
            continue;
        }
        if movable {
            result.legal_moves.push(target);
        }
        if blocker.kind() == PieceKind::King {
            target += direction;
            while target.is_valid() {
                result.controlled_squares.push(target);
                if board.is_square_occupied(target) {
                    break;
                }
                target += direction;
            }
        } else if let Some(pin) = detect_pin(board, blocker, direction) {
            result.pins.push(pin);
        }
    }
    result
}

/// Checks whether `candidate` shields its own king from a slider attacking
/// along `direction`.
fn detect_pin(board: &Board, candidate: &Piece, direction: Position) -> Option<Pin> {
    let mut target = candidate.position() + direction;
    while target.is_valid() {
        if let Some(piece) = board.piece_at(target) {
            return (piece.kind() == PieceKind::King && piece.color() == candidate.color()).then_some(
                Pin {
                    position: candidate.position(),
                    direction,
                },
            );
        }
        target += direction;
    }
    None
}
