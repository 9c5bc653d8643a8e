//! Convenient utility functions that can be used from benchmarks and public
//! tests.

/// Brings a FEN/EPD line to the form produced by
/// [`crate::chess::board::Board`]'s `Display`: surrounding whitespace and the
/// `fen `/`epd ` prefixes are removed, and EPD gets the default `0 1`
/// counters.
///
/// ```
/// use pawnstorm::util::sanitize_fen;
///
/// assert_eq!(
///     sanitize_fen(" epd 8/8/8/8/8/8/8/k6K w - -\n"),
///     "8/8/8/8/8/8/8/k6K w - - 0 1"
/// );
/// ```
#[must_use]
pub fn sanitize_fen(position: &str) -> String {
    let mut position = position.trim();
    for prefix in ["fen ", "epd "] {
        if let Some(stripped) = position.strip_prefix(prefix) {
            position = stripped;
        }
    }
    match position.split_ascii_whitespace().count() {
        4 => format!("{position} 0 1"),
        _ => position.to_string(),
    }
}

/// Well-known positions with their perft results, used by tests and
/// benchmarks. The counts start at depth 1.
///
/// Source: <https://www.chessprogramming.org/Perft_Results>
pub const PERFT_POSITIONS: [(&str, &str, &[u64]); 6] = [
    (
        "starting",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        &[20, 400, 8902, 197_281],
    ),
    (
        "kiwipete",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        &[48, 2039, 97862],
    ),
    (
        "position 3",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        &[14, 191, 2812, 43238],
    ),
    (
        "position 4",
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        &[6, 264, 9467],
    ),
    (
        "position 5",
        "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        &[44, 1486, 62379],
    ),
    (
        "position 6",
        "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
        &[46, 2079, 89890],
    ),
];
