//! Chess primitives commonly used within [`crate::chess`]: coordinates, colors,
//! piece kinds, moves and castling rights.

use std::fmt::{self, Write};
use std::ops::{Add, AddAssign, Mul, Neg, Not, Sub, SubAssign};

use itertools::Itertools;

use crate::chess::error::ParseError;

#[allow(missing_docs)]
pub const BOARD_WIDTH: i8 = 8;
#[allow(missing_docs)]
pub const BOARD_SIZE: usize = 64;

/// Board coordinates (or a displacement between two coordinates). Files and
/// ranks are zero-based: A1 is `{0, 0}`, H8 is `{7, 7}`.
///
/// The same type doubles as a direction vector for move patterns, hence the
/// arithmetic operators and [`Position::normalized`].
///
/// ```
/// use pawnstorm::chess::core::Position;
///
/// let e4 = Position::try_from("e4").unwrap();
/// assert_eq!(e4, Position::new(4, 3));
/// assert_eq!(e4.to_index(), 28);
/// assert_eq!((e4 + Position::new(0, 1)).to_string(), "e5");
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    #[allow(missing_docs)]
    pub file: i8,
    #[allow(missing_docs)]
    pub rank: i8,
}

impl Position {
    /// Zero displacement. Used as "no direction" (e.g. unpinned piece).
    pub const ZERO: Self = Self::new(0, 0);

    #[must_use]
    pub const fn new(file: i8, rank: i8) -> Self {
        Self { file, rank }
    }

    /// Returns true if both coordinates are within the board.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.file >= 0 && self.file < BOARD_WIDTH && self.rank >= 0 && self.rank < BOARD_WIDTH
    }

    /// Index of the square in a rank-major array: `rank * 8 + file`.
    #[must_use]
    pub fn to_index(self) -> usize {
        debug_assert!(self.is_valid(), "{self:?} is outside the board");
        (self.rank * BOARD_WIDTH + self.file) as usize
    }

    /// Inverse of [`Position::to_index`].
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        debug_assert!(index < BOARD_SIZE);
        let index = index as i8;
        Self::new(index % BOARD_WIDTH, index / BOARD_WIDTH)
    }

    /// Reduces a displacement to its unit direction (sign of each component).
    ///
    /// ```
    /// use pawnstorm::chess::core::Position;
    ///
    /// assert_eq!(Position::new(-5, 5).normalized(), Position::new(-1, 1));
    /// assert_eq!(Position::new(0, 3).normalized(), Position::new(0, 1));
    /// ```
    #[must_use]
    pub const fn normalized(self) -> Self {
        Self::new(self.file.signum(), self.rank.signum())
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.file == 0 && self.rank == 0
    }

    /// Iterates over all squares from A1 to H8.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..BOARD_SIZE).map(Self::from_index)
    }
}

impl Add for Position {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.file + rhs.file, self.rank + rhs.rank)
    }
}

impl AddAssign for Position {
    fn add_assign(&mut self, rhs: Self) {
        self.file += rhs.file;
        self.rank += rhs.rank;
    }
}

impl Sub for Position {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.file - rhs.file, self.rank - rhs.rank)
    }
}

impl SubAssign for Position {
    fn sub_assign(&mut self, rhs: Self) {
        self.file -= rhs.file;
        self.rank -= rhs.rank;
    }
}

impl Neg for Position {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.file, -self.rank)
    }
}

impl Mul<i8> for Position {
    type Output = Self;

    fn mul(self, rhs: i8) -> Self::Output {
        Self::new(self.file * rhs, self.rank * rhs)
    }
}

impl TryFrom<&str> for Position {
    type Error = ParseError;

    fn try_from(square: &str) -> Result<Self, ParseError> {
        let Some((file, rank)) = square.chars().collect_tuple() else {
            return Err(ParseError::Square(square.to_string()));
        };
        match (file, rank) {
            ('a'..='h', '1'..='8') => Ok(Self::new(
                (file as u8 - b'a') as i8,
                (rank as u8 - b'1') as i8,
            )),
            _ => Err(ParseError::Square(square.to_string())),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        debug_assert!(self.is_valid(), "{self:?} is not a square");
        f.write_char((b'a' + self.file as u8) as char)?;
        f.write_char((b'1' + self.rank as u8) as char)
    }
}

/// A standard game of chess is played between two players: White (having the
/// advantage of the first turn) and Black. The discriminant is used to index
/// per-color arrays.
#[allow(missing_docs)]
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Black = 0,
    White = 1,
}

impl Color {
    /// "Flips" the color.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Lowercase name for messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }

    /// Index into per-color arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Direction in which the pawns of this color advance.
    #[must_use]
    pub const fn pawn_direction(self) -> Position {
        match self {
            Self::White => Position::new(0, 1),
            Self::Black => Position::new(0, -1),
        }
    }

    /// Rank on which the king and rooks of this color start.
    #[must_use]
    pub const fn back_rank(self) -> i8 {
        match self {
            Self::White => 0,
            Self::Black => BOARD_WIDTH - 1,
        }
    }

    /// Rank on which the pawns of this color get promoted.
    #[must_use]
    pub const fn promotion_rank(self) -> i8 {
        self.opponent().back_rank()
    }

    /// Rank from which the pawns of this color may advance two squares.
    #[must_use]
    pub const fn pawn_starting_rank(self) -> i8 {
        match self {
            Self::White => 1,
            Self::Black => BOARD_WIDTH - 2,
        }
    }
}

impl Not for Color {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.opponent()
    }
}

impl TryFrom<&str> for Color {
    type Error = ParseError;

    fn try_from(color: &str) -> Result<Self, ParseError> {
        match color {
            "w" => Ok(Self::White),
            "b" => Ok(Self::Black),
            _ => Err(ParseError::Color(color.to_string())),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match &self {
            Self::White => 'w',
            Self::Black => 'b',
        })
    }
}

/// Standard [chess pieces].
///
/// [chess pieces]: https://en.wikipedia.org/wiki/Chess_piece
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceKind {
    /// Bishops, rooks and queens move along rays until blocked.
    #[must_use]
    pub const fn is_sliding(self) -> bool {
        matches!(self, Self::Queen | Self::Rook | Self::Bishop)
    }

    /// Parses a FEN piece symbol: uppercase for White, lowercase for Black.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Piece`] for symbols outside of "KQRBNPkqrbnp".
    pub fn from_symbol(symbol: char) -> Result<(Color, Self), ParseError> {
        let color = if symbol.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = match symbol.to_ascii_lowercase() {
            'k' => Self::King,
            'q' => Self::Queen,
            'r' => Self::Rook,
            'b' => Self::Bishop,
            'n' => Self::Knight,
            'p' => Self::Pawn,
            _ => return Err(ParseError::Piece(symbol)),
        };
        Ok((color, kind))
    }

    /// FEN symbol of the piece owned by `color`.
    #[must_use]
    pub fn symbol(self, color: Color) -> char {
        let symbol = match self {
            Self::King => 'k',
            Self::Queen => 'q',
            Self::Rook => 'r',
            Self::Bishop => 'b',
            Self::Knight => 'n',
            Self::Pawn => 'p',
        };
        match color {
            Color::White => symbol.to_ascii_uppercase(),
            Color::Black => symbol,
        }
    }
}

impl From<Promotion> for PieceKind {
    fn from(promotion: Promotion) -> Self {
        match promotion {
            Promotion::Queen => Self::Queen,
            Promotion::Rook => Self::Rook,
            Promotion::Bishop => Self::Bishop,
            Promotion::Knight => Self::Knight,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(self.symbol(Color::Black))
    }
}

/// A pawn can be promoted to a queen, rook, bishop or a knight.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Promotion {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl Promotion {
    /// All promotion choices in the order they are offered to the player.
    pub const ALL: [Self; 4] = [Self::Queen, Self::Rook, Self::Bishop, Self::Knight];

    /// Position of the choice in [`Promotion::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl TryFrom<char> for Promotion {
    type Error = ParseError;

    fn try_from(symbol: char) -> Result<Self, ParseError> {
        match symbol {
            'q' => Ok(Self::Queen),
            'r' => Ok(Self::Rook),
            'b' => Ok(Self::Bishop),
            'n' => Ok(Self::Knight),
            _ => Err(ParseError::Promotion(symbol)),
        }
    }
}

impl fmt::Display for Promotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", PieceKind::from(*self))
    }
}

/// Request to move a piece from one square to the other. Castling is a king
/// move by two files, en passant is a pawn move onto the en passant marker.
/// Promotion moves may carry the chosen piece; when it is absent the board
/// waits for [`crate::chess::board::Board::select_promotion`].
///
/// The text form is the [UCI] long algebraic notation: `e2e4`, `e7e8q`.
///
/// [UCI]: http://wbec-ridderkerk.nl/html/UCIProtocol.html
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    #[allow(missing_docs)]
    pub from: Position,
    #[allow(missing_docs)]
    pub to: Position,
    #[allow(missing_docs)]
    pub promotion: Option<Promotion>,
}

impl Move {
    #[must_use]
    pub const fn new(from: Position, to: Position, promotion: Option<Promotion>) -> Self {
        Self {
            from,
            to,
            promotion,
        }
    }

    /// Parses a move in UCI notation.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Move`] if the input is not 4 or 5 characters
    /// long, and square/promotion errors for the individual parts.
    pub fn from_uci(input: &str) -> Result<Self, ParseError> {
        if !input.is_ascii() || !(4..=5).contains(&input.len()) {
            return Err(ParseError::Move(input.to_string()));
        }
        let from = Position::try_from(&input[0..2])?;
        let to = Position::try_from(&input[2..4])?;
        let promotion = match input[4..].chars().next() {
            Some(symbol) => Some(Promotion::try_from(symbol)?),
            None => None,
        };
        Ok(Self::new(from, to, promotion))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{promotion}")?;
        }
        Ok(())
    }
}

/// Castling direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CastleSide {
    /// Kingside castle, O-O.
    Short,
    /// Queenside castle, O-O-O.
    Long,
}

impl CastleSide {
    #[allow(missing_docs)]
    pub const BOTH: [Self; 2] = [Self::Short, Self::Long];

    /// Horizontal direction in which the king walks.
    #[must_use]
    pub const fn direction(self) -> Position {
        match self {
            Self::Short => Position::new(1, 0),
            Self::Long => Position::new(-1, 0),
        }
    }

    /// File of the corner rook taking part in castling.
    #[must_use]
    pub const fn rook_file(self) -> i8 {
        match self {
            Self::Short => BOARD_WIDTH - 1,
            Self::Long => 0,
        }
    }

    /// Infers the side from the king's horizontal displacement.
    #[must_use]
    pub const fn from_king_move(from: Position, to: Position) -> Option<Self> {
        match to.file - from.file {
            2 => Some(Self::Short),
            -2 => Some(Self::Long),
            _ => None,
        }
    }
}

bitflags::bitflags! {
    /// Track the ability to [castle] each side as given by the setup string.
    /// The flags are not updated by moves: king and rook movement is tracked
    /// by their virgin flags instead, which keeps undo trivial.
    ///
    /// [castle]: https://www.chessprogramming.org/Castling
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CastleRights: u8 {
        #[allow(missing_docs)]
        const WHITE_SHORT = 0b1000;
        #[allow(missing_docs)]
        const WHITE_LONG = 0b0100;
        #[allow(missing_docs)]
        const WHITE_BOTH = Self::WHITE_SHORT.bits() | Self::WHITE_LONG.bits();
        #[allow(missing_docs)]
        const BLACK_SHORT = 0b0010;
        #[allow(missing_docs)]
        const BLACK_LONG = 0b0001;
        #[allow(missing_docs)]
        const BLACK_BOTH = Self::BLACK_SHORT.bits() | Self::BLACK_LONG.bits();
        #[allow(missing_docs)]
        const ALL = Self::WHITE_BOTH.bits() | Self::BLACK_BOTH.bits();
    }
}

impl CastleRights {
    /// The flag for castling `side` by `color`.
    #[must_use]
    pub const fn flag(color: Color, side: CastleSide) -> Self {
        match (color, side) {
            (Color::White, CastleSide::Short) => Self::WHITE_SHORT,
            (Color::White, CastleSide::Long) => Self::WHITE_LONG,
            (Color::Black, CastleSide::Short) => Self::BLACK_SHORT,
            (Color::Black, CastleSide::Long) => Self::BLACK_LONG,
        }
    }
}

impl TryFrom<&str> for CastleRights {
    type Error = ParseError;

    /// Parses [`CastleRights`] from the FEN field: `-` or a subset of `KQkq`
    /// in this order.
    fn try_from(input: &str) -> Result<Self, ParseError> {
        if input == "-" {
            return Ok(Self::empty());
        }
        let error = || ParseError::CastleRights(input.to_string());
        if input.is_empty() {
            return Err(error());
        }
        let mut result = Self::empty();
        let mut previous = None;
        for symbol in input.chars() {
            let (order, flag) = match symbol {
                'K' => (0, Self::WHITE_SHORT),
                'Q' => (1, Self::WHITE_LONG),
                'k' => (2, Self::BLACK_SHORT),
                'q' => (3, Self::BLACK_LONG),
                _ => return Err(error()),
            };
            if previous.is_some_and(|previous| previous >= order) {
                return Err(error());
            }
            previous = Some(order);
            result |= flag;
        }
        Ok(result)
    }
}

impl fmt::Display for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_char('-');
        }
        for (flag, symbol) in [
            (Self::WHITE_SHORT, 'K'),
            (Self::WHITE_LONG, 'Q'),
            (Self::BLACK_SHORT, 'k'),
            (Self::BLACK_LONG, 'q'),
        ] {
            if self.contains(flag) {
                f.write_char(symbol)?;
            }
        }
        Ok(())
    }
}
