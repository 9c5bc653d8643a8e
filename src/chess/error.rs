//! Errors produced while reading textual chess data: squares, moves and board
//! setup strings (FEN/EPD).

use thiserror::Error;

use crate::chess::core::Color;

/// Describes which part of the input could not be parsed and why. Parsing never
/// panics on malformed input: every rejected string maps to one of these
/// variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Square is not in algebraic notation.
    #[error("square should be two chars within 'a'..='h' and '1'..='8', got '{0}'")]
    Square(String),
    /// Side to move is not `w` or `b`.
    #[error("color should be 'w' or 'b', got '{0}'")]
    Color(String),
    /// Unknown piece symbol in the placement field.
    #[error("piece symbol should be within \"KQRBNPkqrbnp\", got '{0}'")]
    Piece(char),
    /// Unknown promotion suffix.
    #[error("promotion symbol should be within \"qrbn\", got '{0}'")]
    Promotion(char),
    /// Castling field is neither `-` nor a subset of `KQkq`.
    #[error("unknown castle rights: '{0}'")]
    CastleRights(String),
    /// Move is not in long algebraic (UCI) notation.
    #[error("move should be in UCI format (e.g. e2e4, e7e8q), got '{0}'")]
    Move(String),
    /// One of the mandatory FEN fields is absent.
    #[error("incorrect FEN: missing {0}")]
    MissingField(&'static str),
    /// Piece placement field is malformed.
    #[error("incorrect FEN: {0}")]
    Placement(String),
    /// Halfmove clock or fullmove counter is not a valid number.
    #[error("incorrect FEN: {field} can not be parsed from '{value}'")]
    Counter {
        /// Name of the counter field.
        field: &'static str,
        /// Offending value.
        value: String,
    },
    /// Each side needs exactly one king.
    #[error("incorrect FEN: expected 1 {} king, got {count}", .color.name())]
    KingCount {
        /// Side with the wrong number of kings.
        color: Color,
        /// Number of kings found.
        count: usize,
    },
    /// En passant target square is inconsistent with the placement.
    #[error("incorrect FEN: {0}")]
    EnPassant(String),
    /// Input continues after the last FEN field.
    #[error("trailing symbols are not allowed in FEN: '{0}'")]
    Trailing(String),
}
