#![no_main]
use libfuzzer_sys::fuzz_target;
use pawnstorm::chess::board::Board;
use pretty_assertions::assert_eq;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(board) = Board::try_from(input) else {
        return;
    };
    // Whatever was accepted is printed back into a setup that is read the same way.
    let fen = board.to_string();
    let reparsed = Board::try_from(fen.as_str()).expect("printed setup should be accepted");
    assert_eq!(reparsed.to_string(), fen);
});
