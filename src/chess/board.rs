//! [`Board`] is the square-centric (mailbox) game state: 64 cells owning
//! their pieces, whose turn it is and everything needed to take moves back.
//!
//! Legal moves are computed by the pieces themselves. The board runs the
//! calculation in a fixed order (all pieces, then pinned pieces, then kings)
//! so that each step sees complete data from the previous ones.

use std::fmt;

use itertools::Itertools;

use crate::chess::bitboard::Bitboard;
use crate::chess::core::{
    CastleRights, CastleSide, Color, Move, PieceKind, Position, Promotion, BOARD_SIZE,
    BOARD_WIDTH,
};
use crate::chess::en_passant::{EnPassant, Offer};
use crate::chess::error::ParseError;
use crate::chess::fen::{self, Setup};
use crate::chess::piece::{self, Calculation, Check, Piece, Pin};
use crate::chess::promotion::{PromotionHandler, PromotionState};

/// Setup of a standard chess game.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Side of a square in normalized device coordinates, where the board spans
/// `[-1, 1]` on both axes.
const SQUARE_SIZE: f32 = 2.0 / BOARD_WIDTH as f32;

/// State of the game after the last move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The side to move has legal moves (or has to choose a promotion).
    Ongoing,
    #[allow(missing_docs)]
    Checkmate { winner: Color },
    #[allow(missing_docs)]
    Stalemate,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ongoing => write!(f, "ongoing"),
            Self::Checkmate {
                winner: Color::White,
            } => write!(f, "checkmate, White wins"),
            Self::Checkmate {
                winner: Color::Black,
            } => write!(f, "checkmate, Black wins"),
            Self::Stalemate => write!(f, "stalemate"),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct PlayedMove {
    mv: Move,
    previous_halfmove_clock: u16,
    previous_fullmove_number: u16,
}

/// Chess board with the complete game state.
///
/// All mutations go through [`Board::make_move`], [`Board::undo_move`] and
/// [`Board::select_promotion`], each of which leaves the legal moves of every
/// piece up to date.
pub struct Board {
    squares: [Option<Piece>; BOARD_SIZE],
    turn: Color,
    /// Rights given by the setup string. Moves do not clear them: the virgin
    /// flags of the king and the rooks are checked instead.
    castle_rights: CastleRights,
    king_positions: [Position; 2],
    controlled: [Bitboard; 2],
    pinned: [Vec<Position>; 2],
    en_passant: EnPassant,
    promotion: PromotionState,
    promotion_handler: Option<Box<dyn PromotionHandler>>,
    /// Captured pieces of each color, tagged with the ply of the capture.
    captured: [Vec<(usize, Piece)>; 2],
    /// Pawns replaced by promotion, tagged with the ply of the promotion.
    promoted: Vec<(usize, Piece)>,
    moves_played: Vec<PlayedMove>,
    halfmove_clock: u16,
    fullmove_number: u16,
    legal_move_count: usize,
}

impl Board {
    /// Creates the board with the standard starting position.
    #[must_use]
    pub fn starting() -> Self {
        let mut placement = Vec::with_capacity(32);
        for color in [Color::White, Color::Black] {
            for (file, kind) in (0..BOARD_WIDTH).zip(BACK_RANK) {
                placement.push((Position::new(file, color.back_rank()), color, kind));
                placement.push((
                    Position::new(file, color.pawn_starting_rank()),
                    color,
                    PieceKind::Pawn,
                ));
            }
        }
        Self::from_setup(Setup {
            placement,
            turn: Color::White,
            castle_rights: CastleRights::ALL,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        })
    }

    /// Parses board from Forsyth-Edwards Notation. The halfmove clock and the
    /// fullmove number are optional (EPD).
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] naming the malformed field.
    pub fn from_fen(input: &str) -> Result<Self, ParseError> {
        let board = Self::from_setup(fen::parse(input)?);
        board.validate_checks()?;
        Ok(board)
    }

    /// Positions that can not be reached in a game: the side that just moved
    /// left its king in check or the king is attacked by more than two
    /// pieces.
    fn validate_checks(&self) -> Result<(), ParseError> {
        let waiting = self.turn.opponent();
        if self.is_in_check(waiting) {
            return Err(ParseError::Placement(format!(
                "{} king can not be in check while {} is to move",
                waiting.name(),
                self.turn.name()
            )));
        }
        let checks = piece::checkers(self, self.turn).count();
        if checks > 2 {
            return Err(ParseError::Placement(format!(
                "expected <= 2 checks, got {checks}"
            )));
        }
        Ok(())
    }

    fn from_setup(setup: Setup) -> Self {
        let mut board = Self {
            squares: std::array::from_fn(|_| None),
            turn: setup.turn,
            castle_rights: setup.castle_rights,
            king_positions: [Position::ZERO; 2],
            controlled: [Bitboard::empty(); 2],
            pinned: [Vec::new(), Vec::new()],
            en_passant: EnPassant::with_offer(setup.en_passant),
            promotion: PromotionState::None,
            promotion_handler: None,
            captured: [Vec::new(), Vec::new()],
            promoted: Vec::new(),
            moves_played: Vec::new(),
            halfmove_clock: setup.halfmove_clock,
            fullmove_number: setup.fullmove_number,
            legal_move_count: 0,
        };
        for (position, color, kind) in setup.placement {
            board.place(Piece::new(kind, color, position));
        }
        board.refresh();
        board
    }

    /// Registers the callback notified when a promotion choice is needed.
    pub fn set_promotion_handler(&mut self, handler: Box<dyn PromotionHandler>) {
        self.promotion_handler = Some(handler);
    }

    #[must_use]
    pub const fn turn(&self) -> Color {
        self.turn
    }

    #[must_use]
    pub const fn castle_rights(&self) -> CastleRights {
        self.castle_rights
    }

    #[must_use]
    pub const fn en_passant(&self) -> &EnPassant {
        &self.en_passant
    }

    #[must_use]
    pub const fn pending_promotion(&self) -> PromotionState {
        self.promotion
    }

    #[must_use]
    pub const fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[must_use]
    pub const fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    #[must_use]
    pub const fn king_position(&self, color: Color) -> Position {
        self.king_positions[color.index()]
    }

    /// Squares attacked or defended by the pieces of `color`.
    #[must_use]
    pub const fn controlled_squares(&self, color: Color) -> Bitboard {
        self.controlled[color.index()]
    }

    /// Squares of the pieces of `color` pinned to their king.
    #[must_use]
    pub fn pinned_pieces(&self, color: Color) -> &[Position] {
        &self.pinned[color.index()]
    }

    /// Returns the piece on `position`. Squares outside of the board are
    /// empty.
    #[must_use]
    pub fn piece_at(&self, position: Position) -> Option<&Piece> {
        if !position.is_valid() {
            return None;
        }
        self.squares[position.to_index()].as_ref()
    }

    /// Iterates over the pieces of `color` from A1 to H8.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = &Piece> {
        self.squares
            .iter()
            .flatten()
            .filter(move |piece| piece.color() == color)
    }

    /// The en passant marker never occupies a square.
    #[must_use]
    pub fn is_square_occupied(&self, position: Position) -> bool {
        self.piece_at(position).is_some()
    }

    /// Returns true if a piece of `color` moving to `position` would capture:
    /// either an enemy piece stands there or it is the enemy en passant
    /// marker.
    #[must_use]
    pub fn is_piece_capturable(&self, position: Position, color: Color) -> bool {
        self.piece_at(position)
            .is_some_and(|piece| piece.color() != color)
            || self
                .en_passant
                .offer()
                .is_some_and(|offer| offer.square == position && offer.color != color)
    }

    /// Returns true if `position` is controlled by the opponent of `color`.
    #[must_use]
    pub fn is_in_enemy_territory(&self, position: Position, color: Color) -> bool {
        self.controlled[color.opponent().index()].contains(position)
    }

    /// Check status of the king of `color`.
    #[must_use]
    pub fn check(&self, color: Color) -> Check {
        piece::check(self, color)
    }

    #[must_use]
    pub fn is_in_check(&self, color: Color) -> bool {
        self.check(color) != Check::None
    }

    /// Number of legal moves of the side to move, as returned by the last
    /// [`Board::calculate_all_legal_moves`].
    #[must_use]
    pub const fn legal_move_count(&self) -> usize {
        self.legal_move_count
    }

    /// Zero legal moves means the game is over: checkmate if the side to move
    /// is in check, stalemate otherwise.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        if self.legal_move_count != 0 || self.promotion.is_pending() {
            return Outcome::Ongoing;
        }
        if self.is_in_check(self.turn) {
            Outcome::Checkmate {
                winner: self.turn.opponent(),
            }
        } else {
            Outcome::Stalemate
        }
    }

    /// All legal moves of the side to move. Moves to the last rank are listed
    /// once per promotion piece. Empty while a promotion choice is pending.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(self.legal_move_count);
        if self.promotion.is_pending() {
            return moves;
        }
        for piece in self.pieces(self.turn) {
            for &to in piece.legal_moves() {
                if piece.is_promotion_move(to) {
                    moves.extend(
                        Promotion::ALL
                            .iter()
                            .map(|promotion| Move::new(piece.position(), to, Some(*promotion))),
                    );
                } else {
                    moves.push(Move::new(piece.position(), to, None));
                }
            }
        }
        moves
    }

    /// Moves made since the setup, oldest first.
    pub fn moves_played(&self) -> impl ExactSizeIterator<Item = Move> + '_ {
        self.moves_played.iter().map(|played| played.mv)
    }

    /// Converts normalized device coordinates (both axes in `[-1, 1]`, A1 in
    /// the bottom left corner) into the square under them.
    #[must_use]
    pub fn square_at(x: f32, y: f32) -> Option<Position> {
        let file = ((x + 1.0) / SQUARE_SIZE).floor();
        let rank = ((y + 1.0) / SQUARE_SIZE).floor();
        let range = 0.0..f32::from(BOARD_WIDTH);
        if !range.contains(&file) || !range.contains(&rank) {
            return None;
        }
        Some(Position::new(file as i8, rank as i8))
    }

    /// Recomputes legal moves and controlled squares of every piece and
    /// returns the number of legal moves of the side to move.
    pub fn calculate_all_legal_moves(&mut self) -> usize {
        self.refresh();
        self.legal_move_count
    }

    fn refresh(&mut self) {
        self.controlled = [Bitboard::empty(); 2];
        for piece in self.squares.iter_mut().flatten() {
            piece.unpin();
        }
        for pinned in &mut self.pinned {
            pinned.clear();
        }

        for index in 0..BOARD_SIZE {
            let Some(piece) = &self.squares[index] else {
                continue;
            };
            let calculation = piece.calculate(self);
            self.store(index, calculation);
        }

        self.en_passant
            .expire(self.turn, self.moves_played.len().checked_sub(1));

        // Pins found after a pinned piece was calculated are only applied now.
        for color in [Color::White, Color::Black] {
            for position in self.pinned[color.index()].clone() {
                self.recalculate(position);
            }
        }

        for color in [Color::White, Color::Black] {
            self.recalculate(self.king_position(color));
            match self.check(color) {
                Check::None => (),
                Check::Single(checker) => self.restrict_to_evasions(color, checker),
                Check::Double => {
                    for piece in self.squares.iter_mut().flatten() {
                        if piece.color() == color && piece.kind() != PieceKind::King {
                            piece.clear_legal_moves();
                        }
                    }
                },
            }
        }

        self.legal_move_count = self
            .pieces(self.turn)
            .map(|piece| {
                piece
                    .legal_moves()
                    .iter()
                    .map(|to| {
                        if piece.is_promotion_move(*to) {
                            Promotion::ALL.len()
                        } else {
                            1
                        }
                    })
                    .sum::<usize>()
            })
            .sum();
        if self.legal_move_count == 0 {
            log::debug!("{:?} has no legal moves: {}", self.turn, self.outcome());
        }
    }

    /// Stores a piece calculation made during the full pass: controlled
    /// squares are accumulated and pins are applied.
    fn store(&mut self, index: usize, calculation: Calculation) {
        let Calculation {
            legal_moves,
            controlled_squares,
            pins,
        } = calculation;
        let Some(piece) = self.squares[index].as_mut() else {
            return;
        };
        let controlled = &mut self.controlled[piece.color().index()];
        for square in &controlled_squares {
            controlled.insert(*square);
        }
        piece.apply(legal_moves, controlled_squares);
        for pin in pins {
            self.apply_pin(pin);
        }
    }

    fn apply_pin(&mut self, pin: Pin) {
        let Some(piece) = self.squares[pin.position.to_index()].as_mut() else {
            return;
        };
        piece.pin(pin.direction);
        let pinned = &mut self.pinned[piece.color().index()];
        if !pinned.contains(&pin.position) {
            pinned.push(pin.position);
        }
    }

    /// Single-piece entrypoint: refreshes the moves of the piece on
    /// `position` without touching other pieces or controlled squares.
    fn recalculate(&mut self, position: Position) {
        let index = position.to_index();
        let Some(piece) = &self.squares[index] else {
            return;
        };
        let calculation = piece.calculate(self);
        if let Some(piece) = self.squares[index].as_mut() {
            piece.apply(calculation.legal_moves, calculation.controlled_squares);
        }
    }

    /// While in check, pieces other than the king may only capture the
    /// checker or block the line of attack.
    fn restrict_to_evasions(&mut self, color: Color, checker: Position) {
        for index in 0..BOARD_SIZE {
            let Some(piece) = &self.squares[index] else {
                continue;
            };
            if piece.color() != color || piece.kind() == PieceKind::King {
                continue;
            }
            let evasions = piece
                .legal_moves()
                .iter()
                .copied()
                .filter(|to| piece::does_move_block_check(self, piece, *to, checker))
                .collect();
            if let Some(piece) = self.squares[index].as_mut() {
                piece.set_legal_moves(evasions);
            }
        }
    }

    fn place(&mut self, piece: Piece) {
        if piece.kind() == PieceKind::King {
            self.king_positions[piece.color().index()] = piece.position();
        }
        let index = piece.position().to_index();
        self.squares[index] = Some(piece);
    }

    /// Applies `mv` if it is legal and returns true. Otherwise returns false
    /// and the board is not modified.
    ///
    /// A move to the last rank without a promotion piece leaves the board
    /// waiting for [`Board::select_promotion`].
    pub fn make_move(&mut self, mv: Move) -> bool {
        if self.promotion.is_pending() {
            log::debug!("{mv} rejected: promotion choice is pending");
            return false;
        }
        let Some(piece) = self.piece_at(mv.from) else {
            return false;
        };
        if piece.color() != self.turn || !piece.legal_moves().contains(&mv.to) {
            return false;
        }
        let promotes = piece.is_promotion_move(mv.to);
        if !promotes && mv.promotion.is_some() {
            return false;
        }
        let Some(mut piece) = self.squares[mv.from.to_index()].take() else {
            return false;
        };
        let kind = piece.kind();
        let ply = self.moves_played.len();
        log::debug!("{:?} plays {mv} at ply {ply}", self.turn);

        let mut captured = self.squares[mv.to.to_index()].take();
        if captured.is_none() && kind == PieceKind::Pawn {
            let en_passant = self
                .en_passant
                .offer()
                .filter(|offer| offer.square == mv.to && offer.color != self.turn);
            if let Some(offer) = en_passant {
                captured = self.squares[offer.pawn.to_index()].take();
                self.en_passant.cancel(Some(ply));
            }
        }
        let is_capture = captured.is_some();
        if let Some(captured) = captured {
            log::trace!("{captured} captured at ply {ply}");
            self.captured[captured.color().index()].push((ply, captured));
        }

        let moved = piece.move_to(mv.to, ply);
        debug_assert!(moved, "{mv} was checked against legal moves");
        self.place(piece);

        if kind == PieceKind::King {
            if let Some(side) = CastleSide::from_king_move(mv.from, mv.to) {
                let corner = Position::new(side.rook_file(), mv.from.rank);
                if let Some(mut rook) = self.squares[corner.to_index()].take() {
                    rook.castle(mv.from + side.direction(), ply);
                    self.place(rook);
                }
            }
        }

        if kind == PieceKind::Pawn && (mv.to.rank - mv.from.rank).abs() == 2 {
            self.en_passant
                .offer_at(Offer::new(mv.from, mv.to, self.turn, Some(ply)), ply);
        }

        if promotes {
            match mv.promotion {
                Some(promotion) => self.promote(mv.to, promotion, ply),
                None => {
                    self.promotion = PromotionState::Selecting {
                        square: mv.to,
                        color: self.turn,
                    };
                },
            }
        }

        self.moves_played.push(PlayedMove {
            mv,
            previous_halfmove_clock: self.halfmove_clock,
            previous_fullmove_number: self.fullmove_number,
        });
        if kind == PieceKind::Pawn || is_capture {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if self.turn == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        self.turn = self.turn.opponent();
        self.refresh();
        debug_assert!(
            piece::checkers(self, self.turn).count() <= 2,
            "{mv} produced more than two checks:\n{self:?}"
        );

        if let PromotionState::Selecting { square, color } = self.promotion {
            log::debug!("waiting for promotion choice on {square}");
            if let Some(handler) = self.promotion_handler.as_mut() {
                handler.promotion_pending(square, color);
            }
        }
        true
    }

    /// Replaces the pawn on `square` with the promotion piece and caches the
    /// pawn for undo.
    fn promote(&mut self, square: Position, promotion: Promotion, ply: usize) {
        let Some(pawn) = self.squares[square.to_index()].take() else {
            return;
        };
        log::trace!("{pawn} promotes to {promotion}");
        self.place(Piece::promoted(promotion.into(), pawn.color(), square));
        self.promoted.push((ply, pawn));
    }

    /// Completes a pending promotion. Returns false if no promotion choice is
    /// pending.
    pub fn select_promotion(&mut self, promotion: Promotion) -> bool {
        let PromotionState::Selecting { square, .. } = self.promotion else {
            return false;
        };
        let Some(last) = self.moves_played.last_mut() else {
            return false;
        };
        last.mv.promotion = Some(promotion);
        let ply = self.moves_played.len() - 1;
        self.promote(square, promotion, ply);
        self.promotion = PromotionState::None;
        self.refresh();
        true
    }

    /// Takes back `mv` if it is the last move played. Returns false without
    /// modifying the board otherwise.
    pub fn undo_move(&mut self, mv: Move) -> bool {
        if self.moves_played.last().map(|played| played.mv) != Some(mv) {
            return false;
        }
        self.undo_last().is_some()
    }

    /// Takes back the last move and returns it. A pending promotion choice is
    /// discarded together with the move.
    ///
    /// # Panics
    ///
    /// Panics if the moved piece is missing from its destination, which means
    /// the board was corrupted.
    pub fn undo_last(&mut self) -> Option<Move> {
        let played = self.moves_played.pop()?;
        let mv = played.mv;
        let ply = self.moves_played.len();
        self.turn = self.turn.opponent();
        self.halfmove_clock = played.previous_halfmove_clock;
        self.fullmove_number = played.previous_fullmove_number;
        log::debug!("{:?} takes back {mv} made at ply {ply}", self.turn);

        if self.promotion.is_pending() {
            self.promotion = PromotionState::None;
        } else if self.promoted.last().is_some_and(|(tag, _)| *tag == ply) {
            if let Some((_, pawn)) = self.promoted.pop() {
                self.squares[mv.to.to_index()] = Some(pawn);
            }
        }

        let Some(mut piece) = self.squares[mv.to.to_index()].take() else {
            panic!("no piece on {} to take back {mv}", mv.to);
        };
        piece.undo_move(mv.from, ply);
        if piece.kind() == PieceKind::King {
            if let Some(side) = CastleSide::from_king_move(mv.from, mv.to) {
                let rook_square = mv.from + side.direction();
                if let Some(mut rook) = self.squares[rook_square.to_index()].take() {
                    rook.undo_move(Position::new(side.rook_file(), mv.from.rank), ply);
                    self.place(rook);
                }
            }
        }
        self.place(piece);

        let captured = &mut self.captured[self.turn.opponent().index()];
        let restored = if captured.last().is_some_and(|(tag, _)| *tag == ply) {
            captured.pop()
        } else {
            None
        };
        if let Some((_, piece)) = restored {
            self.place(piece);
        }

        self.en_passant.undo(ply);
        self.refresh();
        Some(mv)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::starting()
    }
}

impl TryFrom<&str> for Board {
    type Error = ParseError;

    /// Accepts FEN and EPD, optionally prefixed with `fen ` or `epd ` and
    /// surrounded by whitespace.
    fn try_from(input: &str) -> Result<Self, ParseError> {
        let input = input.trim();
        for prefix in ["fen ", "epd "] {
            if let Some(stripped) = input.strip_prefix(prefix) {
                return Self::from_fen(stripped);
            }
        }
        Self::from_fen(input)
    }
}

impl fmt::Display for Board {
    /// Prints board in Forsyth-Edwards Notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fen::write(self, f)
    }
}

impl fmt::Debug for Board {
    /// Dumps the grid (rank 8 on top) followed by the derived state of every
    /// piece.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..BOARD_WIDTH).rev() {
            let line = (0..BOARD_WIDTH)
                .map(|file| match self.piece_at(Position::new(file, rank)) {
                    Some(piece) => piece.kind().symbol(piece.color()),
                    None => '.',
                })
                .join(" ");
            writeln!(f, "{line}")?;
        }
        writeln!(f, "Player to move: {:?}", self.turn)?;
        writeln!(f, "Castling rights: {}", self.castle_rights)?;
        writeln!(f, "En Passant: {:?}", self.en_passant.offer())?;
        writeln!(f, "Promotion: {:?}", self.promotion)?;
        for color in [Color::White, Color::Black] {
            writeln!(
                f,
                "{color:?} pinned: [{}]",
                self.pinned[color.index()].iter().join(", ")
            )?;
            writeln!(
                f,
                "{color:?} controls: [{}]",
                self.controlled[color.index()].iter().join(", ")
            )?;
        }
        for piece in self.squares.iter().flatten() {
            writeln!(
                f,
                "{piece}{} moves: [{}] controls: [{}]",
                if piece.is_virgin() { " (virgin)" } else { "" },
                piece.legal_moves().iter().join(", "),
                piece.controlled_squares().iter().join(", "),
            )?;
        }
        writeln!(f, "FEN: {self}")
    }
}
