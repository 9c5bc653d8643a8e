//! Pawn pushes, diagonal captures and en passant.

use super::{Calculation, Piece};
use crate::chess::board::Board;
use crate::chess::core::{PieceKind, Position};

/// Pushes only go to empty squares. Captures need an enemy piece or the enemy
/// en passant marker on the diagonal, both diagonals are always controlled.
pub(super) fn calculate(piece: &Piece, board: &Board) -> Calculation {
    let mut result = Calculation::default();
    let color = piece.color();
    let forward = color.pawn_direction();

    let single_push = piece.position() + forward;
    if piece.can_move_along(forward)
        && single_push.is_valid()
        && !board.is_square_occupied(single_push)
    {
        result.legal_moves.push(single_push);
        let double_push = single_push + forward;
        if piece.is_virgin()
            && piece.position().rank == color.pawn_starting_rank()
            && !board.is_square_occupied(double_push)
        {
            result.legal_moves.push(double_push);
        }
    }

    for side in [-1, 1] {
        let direction = forward + Position::new(side, 0);
        let target = piece.position() + direction;
        if !target.is_valid() {
            continue;
        }
        result.controlled_squares.push(target);
        if !piece.can_move_along(direction) || !board.is_piece_capturable(target, color) {
            continue;
        }
        let en_passant = board
            .en_passant()
            .offer()
            .filter(|offer| offer.square == target && offer.color != color);
        if let Some(offer) = en_passant {
            if exposes_king_on_rank(board, piece, offer.pawn) {
                continue;
            }
        }
        result.legal_moves.push(target);
    }
    result
}

/// En passant removes two pawns from the same rank at once, which may open the
/// rank between the king and an enemy rook or queen. Regular pin detection
/// does not see this because it stops at the first of the two pawns.
fn exposes_king_on_rank(board: &Board, pawn: &Piece, captured: Position) -> bool {
    let king = board.king_position(pawn.color());
    if king.rank != pawn.position().rank {
        return false;
    }
    let direction = Position::new((pawn.position().file - king.file).signum(), 0);
    let mut square = king + direction;
    while square.is_valid() {
        if square != pawn.position() && square != captured {
            if let Some(blocker) = board.piece_at(square) {
                return blocker.color() != pawn.color()
                    && matches!(blocker.kind(), PieceKind::Rook | PieceKind::Queen);
            }
        }
        square += direction;
    }
    false
}
