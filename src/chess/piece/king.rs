//! King moves, castling and check detection.

use super::{Calculation, Piece};
use crate::chess::board::Board;
use crate::chess::core::{CastleRights, CastleSide, Color, PieceKind, Position};

const OFFSETS: [Position; 8] = [
    Position::new(-1, -1),
    Position::new(-1, 0),
    Position::new(-1, 1),
    Position::new(0, -1),
    Position::new(0, 1),
    Position::new(1, -1),
    Position::new(1, 0),
    Position::new(1, 1),
];

/// Home file of both kings.
const KING_FILE: i8 = 4;

/// The king can step to any adjacent square that is not occupied by a friendly
/// piece and is not controlled by the opponent. Castling is only considered
/// when the king is not in check.
///
/// The result is only correct once the opponent's controlled squares are
/// complete, which is why the board recalculates kings last.
pub(super) fn calculate(piece: &Piece, board: &Board) -> Calculation {
    let mut result = Calculation::default();
    let color = piece.color();
    for offset in OFFSETS {
        let target = piece.position() + offset;
        if !target.is_valid() {
            continue;
        }
        result.controlled_squares.push(target);
        let friendly = board
            .piece_at(target)
            .is_some_and(|occupant| occupant.color() == color);
        if !friendly && !board.is_in_enemy_territory(target, color) {
            result.legal_moves.push(target);
        }
    }
    if !board.is_in_enemy_territory(piece.position(), color) {
        for side in CastleSide::BOTH {
            if can_castle(piece, board, side) {
                result
                    .legal_moves
                    .push(piece.position() + side.direction() * 2);
            }
        }
    }
    result
}

/// Castling requires:
///
/// - The right given by the setup string and an unmoved king on its home
///   square.
/// - An unmoved friendly rook in the corner.
/// - Every square between the king and the rook empty.
/// - The two squares the king crosses not controlled by the opponent.
fn can_castle(king: &Piece, board: &Board, side: CastleSide) -> bool {
    let color = king.color();
    let home = Position::new(KING_FILE, color.back_rank());
    if !king.is_virgin()
        || king.position() != home
        || !board.castle_rights().contains(CastleRights::flag(color, side))
    {
        return false;
    }
    let corner = Position::new(side.rook_file(), color.back_rank());
    if !is_castling_rook(board.piece_at(corner), color) {
        return false;
    }
    let direction = side.direction();
    let mut square = home + direction;
    while square != corner {
        if board.is_square_occupied(square) {
            return false;
        }
        square += direction;
    }
    (1..=2).all(|step| !board.is_in_enemy_territory(home + direction * step, color))
}

fn is_castling_rook(piece: Option<&Piece>, color: Color) -> bool {
    piece.is_some_and(|rook| {
        rook.kind() == PieceKind::Rook && rook.color() == color && rook.is_virgin()
    })
}

/// Returns true if the castling right is backed by an unmoved king on its home
/// square and an unmoved rook in the corner. Ignores the squares in between
/// and attacks, which only matter for the move itself.
pub(crate) fn keeps_castle_right(board: &Board, color: Color, side: CastleSide) -> bool {
    let home = Position::new(KING_FILE, color.back_rank());
    let king_ready = board.piece_at(home).is_some_and(|king| {
        king.kind() == PieceKind::King && king.color() == color && king.is_virgin()
    });
    let corner = Position::new(side.rook_file(), color.back_rank());
    king_ready
        && board.castle_rights().contains(CastleRights::flag(color, side))
        && is_castling_rook(board.piece_at(corner), color)
}

/// Check status of a king.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Check {
    #[allow(missing_docs)]
    None,
    /// Square of the only checking piece.
    Single(Position),
    /// Two pieces give check, only king moves can resolve it.
    Double,
}

/// Squares of the enemy pieces attacking the king of `color`.
pub(crate) fn checkers(board: &Board, color: Color) -> impl Iterator<Item = Position> + '_ {
    let king = board.king_position(color);
    board
        .pieces(color.opponent())
        .filter(move |piece| piece.controlled_squares().contains(&king))
        .map(Piece::position)
}

/// Finds the pieces giving check to the king of `color`.
///
/// # Panics
///
/// Panics if controlled squares are inconsistent with the pieces, which can
/// only be caused by a defect.
pub(crate) fn check(board: &Board, color: Color) -> Check {
    let king = board.king_position(color);
    if !board.is_in_enemy_territory(king, color) {
        return Check::None;
    }
    let mut checkers = checkers(board, color);
    match (checkers.next(), checkers.next()) {
        (Some(checker), None) => Check::Single(checker),
        (Some(_), Some(_)) => Check::Double,
        (None, _) => unreachable!("{color:?} king on {king} is controlled but has no checkers"),
    }
}

/// Returns true if moving `piece` to `to` resolves a check given by the piece
/// on `checker`.
///
/// Capturing the checker always works. Checks by sliding pieces can also be
/// blocked on any square strictly between the checker and the king. A checking
/// pawn can also be taken en passant.
pub(crate) fn does_move_block_check(
    board: &Board,
    piece: &Piece,
    to: Position,
    checker: Position,
) -> bool {
    if to == checker {
        return true;
    }
    let Some(checking) = board.piece_at(checker) else {
        return false;
    };
    match checking.kind() {
        PieceKind::Pawn => {
            piece.kind() == PieceKind::Pawn
                && board
                    .en_passant()
                    .offer()
                    .is_some_and(|offer| offer.pawn == checker && offer.square == to)
        },
        PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop => {
            let king = board.king_position(piece.color());
            let direction = (king - checker).normalized();
            let mut square = checker + direction;
            while square != king && square.is_valid() {
                if square == to {
                    return true;
                }
                square += direction;
            }
            false
        },
        PieceKind::Knight | PieceKind::King => false,
    }
}
