use pawnstorm::chess::board::Board;
use pawnstorm::chess::perft::{divide, perft};
use pawnstorm::util::PERFT_POSITIONS;
use pretty_assertions::assert_eq;

fn check_counts(fen: &str, counts: &[u64]) {
    let mut board = Board::try_from(fen).unwrap();
    for (depth, expected) in (1..).zip(counts) {
        assert_eq!(perft(&mut board, depth), *expected, "{fen} at depth {depth}");
    }
    assert_eq!(board.to_string(), fen);
}

#[test]
fn shallow_perft() {
    for (name, fen, counts) in PERFT_POSITIONS {
        let mut board = Board::try_from(fen).unwrap();
        assert_eq!(perft(&mut board, 1), counts[0], "{name}");
        assert_eq!(perft(&mut board, 2), counts[1], "{name}");
    }
}

#[test]
fn perft_starting_position() {
    check_counts(
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        &[20, 400, 8902, 197_281],
    );
}

#[test]
fn perft_kiwipete() {
    check_counts(
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        &[48, 2039, 97862],
    );
}

// Position 3 is small enough to be walked deep in every build.
#[test]
fn perft_endgame() {
    check_counts("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", &[14, 191, 2812]);
}

#[test]
fn perft_mirrored_position() {
    check_counts(
        "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1",
        &[6, 264, 9467],
    );
}

#[test]
fn divide_matches_perft() {
    let (_, fen, counts) = PERFT_POSITIONS[1];
    let mut board = Board::try_from(fen).unwrap();
    let divided = divide(&mut board, 2);
    assert_eq!(divided.len() as u64, counts[0]);
    assert_eq!(divided.iter().map(|(_, nodes)| nodes).sum::<u64>(), counts[1]);
}

// Every position at its deepest listed count, and depth 5 of the starting
// position: too slow for the Debug setting.
#[ignore]
#[test]
fn deep_perft() {
    for (_, fen, counts) in PERFT_POSITIONS {
        check_counts(fen, counts);
    }
}

#[ignore]
#[test]
fn perft_starting_position_depth_5() {
    let mut board = Board::starting();
    assert_eq!(perft(&mut board, 5), 4_865_609);
}
