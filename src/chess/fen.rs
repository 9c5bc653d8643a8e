//! [Forsyth-Edwards Notation] reading and writing.
//!
//! [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation

use std::fmt;

use crate::chess::board::Board;
use crate::chess::core::{
    CastleRights, CastleSide, Color, PieceKind, Position, BOARD_WIDTH,
};
use crate::chess::en_passant::Offer;
use crate::chess::error::ParseError;
use crate::chess::piece::keeps_castle_right;

/// Parsed contents of a FEN/EPD string, validated enough for the board to be
/// built from it: each side has exactly one king, no pawns on the back ranks
/// and an en passant square backed by a pawn.
pub(super) struct Setup {
    pub(super) placement: Vec<(Position, Color, PieceKind)>,
    pub(super) turn: Color,
    pub(super) castle_rights: CastleRights,
    pub(super) en_passant: Option<Offer>,
    pub(super) halfmove_clock: u16,
    pub(super) fullmove_number: u16,
}

pub(super) fn parse(input: &str) -> Result<Setup, ParseError> {
    let mut parts = input.split_ascii_whitespace();
    let Some(pieces_placement) = parts.next() else {
        return Err(ParseError::MissingField("pieces placement"));
    };
    let placement = parse_placement(pieces_placement)?;
    let turn = match parts.next() {
        Some(value) => Color::try_from(value)?,
        None => return Err(ParseError::MissingField("side to move")),
    };
    let castle_rights = match parts.next() {
        Some(value) => CastleRights::try_from(value)?,
        None => return Err(ParseError::MissingField("castling rights")),
    };
    let en_passant = match parts.next() {
        Some("-") => None,
        Some(value) => Some(parse_en_passant(Position::try_from(value)?, turn, &placement)?),
        None => return Err(ParseError::MissingField("en passant square")),
    };
    let mut setup = Setup {
        placement,
        turn,
        castle_rights,
        en_passant,
        halfmove_clock: 0,
        fullmove_number: 1,
    };
    match parts.next() {
        Some(value) => setup.halfmove_clock = parse_counter("halfmove clock", value)?,
        // This is a correct EPD: exit early.
        None => return Ok(setup),
    }
    setup.fullmove_number = match parts.next() {
        Some(value) => match parse_counter("fullmove number", value)? {
            0 => {
                return Err(ParseError::Counter {
                    field: "fullmove number",
                    value: value.to_string(),
                })
            },
            number => number,
        },
        None => return Err(ParseError::MissingField("fullmove number")),
    };
    match parts.next() {
        None => Ok(setup),
        Some(rest) => Err(ParseError::Trailing(rest.to_string())),
    }
}

fn parse_placement(input: &str) -> Result<Vec<(Position, Color, PieceKind)>, ParseError> {
    let mut placement = Vec::new();
    let mut rank = BOARD_WIDTH;
    for rank_fen in input.split('/') {
        if rank == 0 {
            return Err(ParseError::Placement(format!(
                "expected 8 ranks, got {input}"
            )));
        }
        rank -= 1;
        let mut file = 0;
        for symbol in rank_fen.chars() {
            if file >= BOARD_WIDTH {
                return Err(ParseError::Placement(format!(
                    "rank {rank_fen} is longer than {BOARD_WIDTH} squares"
                )));
            }
            match symbol {
                '0' => {
                    return Err(ParseError::Placement(String::from(
                        "increment can not be 0",
                    )))
                },
                '1'..='8' => {
                    file += (symbol as u8 - b'0') as i8;
                    continue;
                },
                _ => (),
            }
            let (color, kind) = PieceKind::from_symbol(symbol)?;
            let position = Position::new(file, rank);
            if kind == PieceKind::Pawn && (rank == 0 || rank == BOARD_WIDTH - 1) {
                return Err(ParseError::Placement(format!(
                    "pawns can not be placed on backranks, got one on {position}"
                )));
            }
            placement.push((position, color, kind));
            file += 1;
        }
        if file != BOARD_WIDTH {
            return Err(ParseError::Placement(format!(
                "rank size should be exactly {BOARD_WIDTH}, got {rank_fen} of length {file}"
            )));
        }
    }
    if rank != 0 {
        return Err(ParseError::Placement(format!(
            "there should be 8 ranks, got {input}"
        )));
    }
    for color in [Color::White, Color::Black] {
        let count = |wanted: PieceKind| {
            placement
                .iter()
                .filter(|(_, owner, kind)| *owner == color && *kind == wanted)
                .count()
        };
        let kings = count(PieceKind::King);
        if kings != 1 {
            return Err(ParseError::KingCount {
                color,
                count: kings,
            });
        }
        let pawns = count(PieceKind::Pawn);
        if pawns > BOARD_WIDTH as usize {
            return Err(ParseError::Placement(format!(
                "expected <= {BOARD_WIDTH} {} pawns, got {pawns}",
                color.name()
            )));
        }
    }
    Ok(placement)
}

/// The en passant square is behind the pawn of the side that just moved: the
/// marker is synthesized pointing at that pawn.
fn parse_en_passant(
    square: Position,
    turn: Color,
    placement: &[(Position, Color, PieceKind)],
) -> Result<Offer, ParseError> {
    let offering = turn.opponent();
    // The skipped square is on the 3rd rank for White and on the 6th for Black.
    let expected_rank = offering.pawn_starting_rank() + offering.pawn_direction().rank;
    if square.rank != expected_rank {
        return Err(ParseError::EnPassant(format!(
            "expected en passant square to be on rank {}, got {}",
            expected_rank + 1,
            square.rank + 1
        )));
    }
    let pawn = square + offering.pawn_direction();
    let from = square - offering.pawn_direction();
    if !placement.contains(&(pawn, offering, PieceKind::Pawn)) {
        return Err(ParseError::EnPassant(format!(
            "en passant square {square} has no {} pawn in front of it",
            offering.name()
        )));
    }
    if placement.iter().any(|(position, _, _)| *position == square || *position == from) {
        return Err(ParseError::EnPassant(format!(
            "en passant square {square} requires empty squares behind the pawn"
        )));
    }
    Ok(Offer::new(from, pawn, offering, None))
}

fn parse_counter(field: &'static str, value: &str) -> Result<u16, ParseError> {
    let error = || ParseError::Counter {
        field,
        value: value.to_string(),
    };
    if !value.bytes().all(|c| c.is_ascii_digit()) {
        return Err(error());
    }
    value.parse::<u16>().map_err(|_| error())
}

/// Writes the board as a FEN string. Castling rights are only printed while
/// the king and the corresponding rook have not moved.
pub(super) fn write(board: &Board, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for rank in (0..BOARD_WIDTH).rev() {
        let mut empty_squares = 0;
        for file in 0..BOARD_WIDTH {
            match board.piece_at(Position::new(file, rank)) {
                Some(piece) => {
                    if empty_squares != 0 {
                        write!(f, "{empty_squares}")?;
                        empty_squares = 0;
                    }
                    write!(f, "{}", piece.kind().symbol(piece.color()))?;
                },
                None => empty_squares += 1,
            }
        }
        if empty_squares != 0 {
            write!(f, "{empty_squares}")?;
        }
        if rank != 0 {
            write!(f, "/")?;
        }
    }
    let mut castle_rights = CastleRights::empty();
    for color in [Color::White, Color::Black] {
        for side in CastleSide::BOTH {
            if keeps_castle_right(board, color, side) {
                castle_rights |= CastleRights::flag(color, side);
            }
        }
    }
    write!(f, " {} {} ", board.turn(), castle_rights)?;
    match board.en_passant().position() {
        Some(square) => write!(f, "{square} "),
        None => write!(f, "- "),
    }?;
    write!(f, "{} {}", board.halfmove_clock(), board.fullmove_number())
}
