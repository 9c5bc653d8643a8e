//! [Perft] (*per*formance *t*esting) is a technique for checking correctness of
//! move generation (tested functions are generate move, make move and unmake
//! move).
//!
//! [Perft]: https://www.chessprogramming.org/Perft

use crate::chess::board::Board;
use crate::chess::core::Move;

/// Counts the leaf nodes of the legal move tree of the given depth. The board
/// is restored before returning.
///
/// # Panics
///
/// Panics if a generated move is rejected by [`Board::make_move`] or can not
/// be taken back: either is a move generation defect.
pub fn perft(board: &mut Board, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = board.legal_moves();
    // Bulk counting: the last layer does not have to be played.
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .iter()
        .map(|mv| count_after(board, *mv, depth - 1))
        .sum()
}

/// Reports the perft count under every legal move of the root position,
/// ordered as [`Board::legal_moves`] returns them.
#[must_use]
pub fn divide(board: &mut Board, depth: u8) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    board
        .legal_moves()
        .into_iter()
        .map(|mv| (mv, count_after(board, mv, depth - 1)))
        .collect()
}

fn count_after(board: &mut Board, mv: Move, depth: u8) -> u64 {
    assert!(board.make_move(mv), "generated move {mv} was rejected:\n{board:?}");
    let nodes = perft(board, depth);
    assert!(board.undo_move(mv), "{mv} could not be taken back:\n{board:?}");
    nodes
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn starting_position() {
        let mut board = Board::starting();
        assert_eq!(perft(&mut board, 0), 1);
        assert_eq!(perft(&mut board, 1), 20);
        assert_eq!(perft(&mut board, 2), 400);
        assert_eq!(board.to_string(), Board::starting().to_string());
    }

    #[test]
    fn divide_sums_to_perft() {
        let mut board = Board::starting();
        let divided = divide(&mut board, 3);
        assert_eq!(divided.len(), 20);
        assert_eq!(divided.iter().map(|(_, nodes)| nodes).sum::<u64>(), 8902);
        assert!(divided
            .iter()
            .any(|(mv, nodes)| mv.to_string() == "e2e4" && *nodes == 600));
        assert!(divide(&mut board, 0).is_empty());
    }
}
