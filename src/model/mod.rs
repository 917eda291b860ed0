use serde::{Deserialize, Serialize};
use strum::{EnumIs, EnumIter, VariantArray, VariantNames};
use thiserror::Error;

use crate::notation::fen::FenError;

pub mod attacking;
pub mod attacks;
pub mod castling;
pub mod endings;
pub mod game;
pub mod mailbox;
pub mod movegen;
pub mod moving;

/// Representation of the squares on a chessboard.
///
/// This enum uses the convention of numbering squares starting with
/// a8 = 0 in the top-left corner as White sees the board, counting
/// over the files first, b8 = 1, c8 = 2, ... and then down the
/// ranks, a7 = 8, a6 = 16, ... ending with h1 = 63.
///
/// This is the rank-major big-endian layout: `row` 0 is the 8th rank
/// and `col` 0 is the a-file.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    VariantNames, EnumIter, Serialize, Deserialize)]
#[repr(u8)]
#[rustfmt::skip]
pub enum Square {
    a8 = 0o00, b8 = 0o01, c8 = 0o02, d8 = 0o03, e8 = 0o04, f8 = 0o05, g8 = 0o06, h8 = 0o07,
    a7 = 0o10, b7 = 0o11, c7 = 0o12, d7 = 0o13, e7 = 0o14, f7 = 0o15, g7 = 0o16, h7 = 0o17,
    a6 = 0o20, b6 = 0o21, c6 = 0o22, d6 = 0o23, e6 = 0o24, f6 = 0o25, g6 = 0o26, h6 = 0o27,
    a5 = 0o30, b5 = 0o31, c5 = 0o32, d5 = 0o33, e5 = 0o34, f5 = 0o35, g5 = 0o36, h5 = 0o37,
    a4 = 0o40, b4 = 0o41, c4 = 0o42, d4 = 0o43, e4 = 0o44, f4 = 0o45, g4 = 0o46, h4 = 0o47,
    a3 = 0o50, b3 = 0o51, c3 = 0o52, d3 = 0o53, e3 = 0o54, f3 = 0o55, g3 = 0o56, h3 = 0o57,
    a2 = 0o60, b2 = 0o61, c2 = 0o62, d2 = 0o63, e2 = 0o64, f2 = 0o65, g2 = 0o66, h2 = 0o67,
    a1 = 0o70, b1 = 0o71, c1 = 0o72, d1 = 0o73, e1 = 0o74, f1 = 0o75, g1 = 0o76, h1 = 0o77,
}

impl Square {
    /// Use this Square as an array index.
    #[inline]
    pub fn ix(self) -> usize {
        self as usize
    }

    /// Infallible conversion from a u8 by way of truncating the
    /// extraneous bits.
    #[inline]
    pub fn from_u8(ix: u8) -> Self {
        unsafe { std::mem::transmute::<u8, Self>(ix & 0x3F) }
    }

    /// Row counted downward from the 8th rank, 0 ..= 7.
    #[inline]
    pub fn row(self) -> u8 {
        self as u8 >> 3
    }

    /// Column counted rightward from the a-file, 0 ..= 7.
    #[inline]
    pub fn col(self) -> u8 {
        self as u8 & 0x7
    }

    /// Split a square into row and column.
    #[inline]
    pub fn row_col(self) -> (u8, u8) {
        (self.row(), self.col())
    }

    /// Reassemble a square from row and column.
    ///
    /// Out-of-range coordinates yield `None`; callers stepping off
    /// the board must check.
    #[inline]
    pub fn from_row_col(row: i8, col: i8) -> Option<Self> {
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Self::from_u8((row as u8) << 3 | col as u8))
        } else {
            None
        }
    }

    /// Step by a row/column delta, `None` when leaving the board.
    #[inline]
    pub fn offset(self, dr: i8, dc: i8) -> Option<Self> {
        Self::from_row_col(self.row() as i8 + dr, self.col() as i8 + dc)
    }

    /// File letter a ..= h.
    #[inline]
    pub fn file_char(self) -> char {
        (b'a' + self.col()) as char
    }

    /// Rank digit 1 ..= 8.
    #[inline]
    pub fn rank_char(self) -> char {
        (b'8' - self.row()) as char
    }
}

/// Representation of color of a player or chessman.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIs,
    Serialize, Deserialize)]
#[repr(u8)]
pub enum ChessColor {
    WHITE = 0,
    BLACK = 1,
}

impl ChessColor {
    /// Opposing color.
    #[inline]
    pub fn opp(self) -> Self {
        unsafe { std::mem::transmute(self as u8 ^ 1) }
    }

    /// Sign value of associated chessman color.
    #[inline]
    pub fn sign(self) -> i8 {
        match self {
            Self::WHITE => 1,
            Self::BLACK => -1,
        }
    }

    /// Associated array index.
    #[inline]
    pub fn ix(self) -> usize {
        self as usize
    }
}

/// Representation of the piece types of chessmen.
///
/// The discriminant values are the absolute values of the
/// [`ChessMan`] enum, or equivalently, the white chessmen.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, VariantArray,
    EnumIs, Serialize, Deserialize)]
#[repr(u8)]
pub enum ChessPiece {
    PAWN = 1,
    KNIGHT = 2,
    BISHOP = 3,
    ROOK = 4,
    QUEEN = 5,
    KING = 6,
}

impl ChessPiece {
    /// Use as an array index: equal to one less than the discriminant value.
    #[inline]
    pub fn ix(self) -> usize {
        self as usize - 1
    }

    /// Conventional material value in pawns. Kings are never traded
    /// and carry no value.
    #[inline]
    pub fn value(self) -> u32 {
        [1, 3, 3, 5, 9, 0][self.ix()]
    }

    /// Upper-case SAN letter. Pawns have none; their placeholder is
    /// never printed.
    #[inline]
    pub fn letter(self) -> char {
        [' ', 'N', 'B', 'R', 'Q', 'K'][self.ix()]
    }
}

/// Extracting the type of a chessman.
impl From<ChessMan> for ChessPiece {
    #[inline]
    fn from(value: ChessMan) -> Self {
        unsafe { std::mem::transmute((value as i8).unsigned_abs()) }
    }
}

/// Representation of a chessman.
///
/// The discriminants allow niche optimization with a byte value of
/// 0 representing absence, and with the sign representing color.
///
/// The name chessman is of British-English origin, and though archaic
/// is used because it allows a distinction between pawns and pieces.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, VariantArray, Serialize, Deserialize)]
#[repr(i8)]
pub enum ChessMan {
    BLACK_KING = -6,
    BLACK_QUEEN = -5,
    BLACK_ROOK = -4,
    BLACK_BISHOP = -3,
    BLACK_KNIGHT = -2,
    BLACK_PAWN = -1,
    WHITE_PAWN = 1,
    WHITE_KNIGHT = 2,
    WHITE_BISHOP = 3,
    WHITE_ROOK = 4,
    WHITE_QUEEN = 5,
    WHITE_KING = 6,
}

impl ChessMan {
    /// Assemble a chessman from its color and type.
    #[inline]
    pub fn new(color: ChessColor, piece: ChessPiece) -> Self {
        unsafe { std::mem::transmute(piece as i8 * color.sign()) }
    }

    #[inline]
    pub fn color(self) -> ChessColor {
        ChessColor::from(self)
    }

    #[inline]
    pub fn piece(self) -> ChessPiece {
        ChessPiece::from(self)
    }

    /// The per-color FEN letter: upper-case for white, lower-case
    /// for black.
    pub fn alias(self) -> char {
        use ChessMan::*;
        match self {
            WHITE_PAWN => 'P',
            WHITE_KNIGHT => 'N',
            WHITE_BISHOP => 'B',
            WHITE_ROOK => 'R',
            WHITE_QUEEN => 'Q',
            WHITE_KING => 'K',
            BLACK_PAWN => 'p',
            BLACK_KNIGHT => 'n',
            BLACK_BISHOP => 'b',
            BLACK_ROOK => 'r',
            BLACK_QUEEN => 'q',
            BLACK_KING => 'k',
        }
    }

    /// Inverse of [`ChessMan::alias`].
    pub fn from_alias(c: char) -> Option<Self> {
        use ChessMan::*;
        Some(match c {
            'P' => WHITE_PAWN,
            'N' => WHITE_KNIGHT,
            'B' => WHITE_BISHOP,
            'R' => WHITE_ROOK,
            'Q' => WHITE_QUEEN,
            'K' => WHITE_KING,
            'p' => BLACK_PAWN,
            'n' => BLACK_KNIGHT,
            'b' => BLACK_BISHOP,
            'r' => BLACK_ROOK,
            'q' => BLACK_QUEEN,
            'k' => BLACK_KING,
            _ => return None,
        })
    }

    /// The figurine glyph used by figurine algebraic notation.
    pub fn glyph(self) -> char {
        use ChessMan::*;
        match self {
            WHITE_KING => '♔',
            WHITE_QUEEN => '♕',
            WHITE_ROOK => '♖',
            WHITE_BISHOP => '♗',
            WHITE_KNIGHT => '♘',
            WHITE_PAWN => '♙',
            BLACK_KING => '♚',
            BLACK_QUEEN => '♛',
            BLACK_ROOK => '♜',
            BLACK_BISHOP => '♝',
            BLACK_KNIGHT => '♞',
            BLACK_PAWN => '♟',
        }
    }
}

/// Extracting the color of a chessman.
impl From<ChessMan> for ChessColor {
    #[inline]
    fn from(value: ChessMan) -> Self {
        if (value as i8) < 0 { Self::BLACK } else { Self::WHITE }
    }
}

/// Representation of the directions on a chessboard.
///
/// ```text
///  NW     North    NE
///      -9  -8  -7
/// West -1  ..  +1 East
///      +7  +8  +9
///  SW     South    SE
/// ```
///
/// North is toward the 8th rank, i.e. toward row 0 of the
/// [`Square`] layout, so its row delta is negative.
///
/// The discriminants are array indexes into per-square ray tables;
/// diagonals sit on the odd indexes.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, VariantArray)]
#[repr(u8)]
pub enum Compass {
    NORTH = 0,
    NORTHEAST = 1,
    EAST = 2,
    SOUTHEAST = 3,
    SOUTH = 4,
    SOUTHWEST = 5,
    WEST = 6,
    NORTHWEST = 7,
}

impl Compass {
    /// Use as an array index.
    #[inline]
    pub fn ix(self) -> usize {
        self as usize
    }

    /// Row/column step of this direction.
    #[inline]
    pub fn delta(self) -> (i8, i8) {
        [(-1, 0), (-1, 1), (0, 1), (1, 1), (1, 0), (1, -1), (0, -1), (-1, -1)][self.ix()]
    }

    /// Bishops and queens slide along these.
    #[inline]
    pub fn is_diagonal(self) -> bool {
        self as u8 & 1 == 1
    }

    /// Rooks and queens slide along these.
    #[inline]
    pub fn is_orthogonal(self) -> bool {
        self as u8 & 1 == 0
    }
}

/// Representation of the two directions of castling.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CastlingSide {
    /// Aka. 'king-side' castling, toward the h-file rook.
    SHORT = 0,
    /// Aka. 'queen-side' castling, toward the a-file rook.
    LONG = 1,
}

impl CastlingSide {
    /// Use as an array index.
    #[inline]
    pub fn ix(self) -> usize {
        self as usize
    }
}

/// Castling rights of a single color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CastleRights {
    pub short: bool,
    pub long: bool,
}

impl CastleRights {
    pub const BOTH: Self = Self { short: true, long: true };
    pub const NONE: Self = Self { short: false, long: false };

    #[inline]
    pub fn allows(self, side: CastlingSide) -> bool {
        match side {
            CastlingSide::SHORT => self.short,
            CastlingSide::LONG => self.long,
        }
    }

    #[inline]
    pub fn grant(&mut self, side: CastlingSide) {
        match side {
            CastlingSide::SHORT => self.short = true,
            CastlingSide::LONG => self.long = true,
        }
    }

    #[inline]
    pub fn revoke(&mut self, side: CastlingSide) {
        match side {
            CastlingSide::SHORT => self.short = false,
            CastlingSide::LONG => self.long = false,
        }
    }

    #[inline]
    pub fn any(self) -> bool {
        self.short || self.long
    }
}

/// The five shapes a chess move can take.
///
/// En-passant is kept apart from plain captures because the captured
/// pawn does not stand on the destination square; the two castling
/// moves are kept apart because they relocate two men at once.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIs, Serialize, Deserialize)]
#[repr(u8)]
pub enum MoveKind {
    STANDARD = 0,
    CAPTURE = 1,
    EN_PASSANT = 2,
    SHORT_CASTLE = 3,
    LONG_CASTLE = 4,
}

impl MoveKind {
    /// Whether a man is removed from the board.
    #[inline]
    pub fn takes(self) -> bool {
        matches!(self, Self::CAPTURE | Self::EN_PASSANT)
    }

    /// The castling direction, for the two castling kinds.
    #[inline]
    pub fn castle_side(self) -> Option<CastlingSide> {
        match self {
            Self::SHORT_CASTLE => Some(CastlingSide::SHORT),
            Self::LONG_CASTLE => Some(CastlingSide::LONG),
            _ => None,
        }
    }
}

/// Representation of a move on a chessboard.
///
/// This is a 'fat' representation: applying a `ChessMove` never
/// requires re-deriving facts from the board it was generated
/// against. The moves are assumed to be produced by the move
/// enumeration in [`movegen`]; executing a move that is invalid
/// in a given position results in unspecified board contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChessMove {
    pub man: ChessMan,
    pub from: Square,
    pub to: Square,
    pub kind: MoveKind,
    /// The man removed from the board, for the capturing kinds.
    pub capture: Option<ChessMan>,
    /// Where the captured man stood. Differs from `to` only for
    /// en-passant.
    pub capture_square: Option<Square>,
    /// The man a promoting pawn turns into, already colored.
    pub promotion: Option<ChessMan>,
}

/// A move as submitted by the caller, before it has been matched
/// against the current legal-move set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveRequest {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<ChessMan>,
}

impl MoveRequest {
    #[inline]
    pub fn new(from: Square, to: Square) -> Self {
        Self { from, to, promotion: None }
    }

    #[inline]
    pub fn promoting(from: Square, to: Square, promotion: ChessMan) -> Self {
        Self { from, to, promotion: Some(promotion) }
    }
}

/// A full chess position: the board plus the transient metadata that
/// cannot be read off the squares.
///
/// Exactly one king of each color is present after any legal
/// transition; this is established when a position is constructed
/// (from FEN or the starting array) and never re-checked
/// mid-application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    pub board: mailbox::Mailbox,
    pub player: ChessColor,
    /// Castling rights, indexed by [`ChessColor`].
    pub rights: [CastleRights; 2],
    /// Square a double-pushed pawn skipped, capturable en passant.
    pub en_passant: Option<Square>,
    /// Plies elapsed since the last capture or pawn move.
    pub halfmove_clock: u16,
    /// Turn counter, starts at 1, increments after Black moves.
    pub fullmove_clock: u16,
}

impl BoardState {
    /// The standard starting position.
    pub fn startpos() -> Self {
        Self {
            board: mailbox::Mailbox::startpos(),
            player: ChessColor::WHITE,
            rights: castling::initial_rights(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_clock: 1,
        }
    }
}

/// How a game stands.
///
/// The engine derives the first six statuses itself; `DRAW_AGREED`,
/// `RESIGNED` and `TIMEOUT` are verdicts only the surrounding
/// application can hand down.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIs, Serialize, Deserialize)]
#[repr(u8)]
pub enum GameStatus {
    IN_PROGRESS = 0,
    CHECKMATE = 1,
    STALEMATE = 2,
    FIFTY_MOVE_DRAW = 3,
    THREEFOLD_REPETITION = 4,
    INSUFFICIENT_MATERIAL = 5,
    DRAW_AGREED = 6,
    RESIGNED = 7,
    TIMEOUT = 8,
}

impl GameStatus {
    #[inline]
    pub fn is_over(self) -> bool {
        !self.is_in_progress()
    }
}

/// Status plus who won and whose king stands in check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub status: GameStatus,
    pub winner: Option<ChessColor>,
    pub check: Option<ChessColor>,
}

/// A played move together with its rendered notation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub mv: ChessMove,
    pub san: String,
    pub figurine: String,
}

/// A captured man, keyed to the history index of the move that took it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceCapture {
    pub man: ChessMan,
    pub move_index: usize,
}

/// The two ways a call into the engine can be rejected.
///
/// Both are deterministic, non-retryable verdicts on a single call;
/// a failed transition leaves the caller's prior game value
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),
    #[error("no legal move from {from} to {to}")]
    IllegalMove { from: Square, to: Square },
}

/// Malformed input on an otherwise well-directed call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error(transparent)]
    Fen(#[from] FenError),
    #[error("a pawn reaching {0} must name a promotion piece")]
    MissingPromotion(Square),
    #[error("a pawn cannot promote to {0:?}")]
    NotPromotable(ChessMan),
    #[error("promotion piece {0:?} does not belong to the moving player")]
    PromotionColorMismatch(ChessMan),
    #[error("the move from {0} to {1} does not promote")]
    UnexpectedPromotion(Square, Square),
}
