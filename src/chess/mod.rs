//! Implementation of chess rules: board representation, per-piece move
//! generation, special moves and reversible move application.

pub mod bitboard;
pub mod board;
pub mod core;
pub mod en_passant;
pub mod error;
mod fen;
pub mod perft;
pub mod piece;
pub mod promotion;
