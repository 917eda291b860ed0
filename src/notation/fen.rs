//! # Forsyth-Edwards Notation
//!
//! FEN is the standard way of representing a chess position in a
//! single line. It consists of six space-separated fields:
//!
//! - the placement: eight solidus-separated ranks, 8th rank first,
//!   occupied squares as per-color piece letters and runs of empty
//!   squares run-length encoded as digits 1 ..= 8,
//! - the active player, `w` or `b`,
//! - the castling availability, a subset of `KQkq` in exactly that
//!   order, or `-` when all rights are gone,
//! - the en-passant target square, or `-`,
//! - the halfmove clock, a non-negative integer,
//! - the fullmove number, a positive integer.
//!
//! The FEN string of the standard starting position is:
//! ```text
//! rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1
//! ```
//!
//! Each field is parsed independently so a malformed FEN names the
//! field that broke. The first four fields double as the repetition
//! key: two positions repeat when those fields agree, whatever the
//! clocks say.

use chumsky::{error::EmptyErr, prelude::*};
use thiserror::Error;

use crate::{
    model::{BoardState, CastleRights, ChessColor, ChessMan, ChessPiece, Square, mailbox::Mailbox},
    notation::{Parsable, parse_field},
};

pub const STARTING_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// What went wrong, and in which field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("FEN must have 6 space-separated fields, found {0}")]
    FieldCount(usize),
    #[error("the placement must have 8 ranks, found {0}")]
    RankCount(usize),
    #[error("rank {0} of the placement is not a run of piece letters and digits")]
    MalformedRank(u8),
    #[error("rank {0} of the placement describes more than 8 files")]
    OverfullRank(u8),
    #[error("rank {0} of the placement describes fewer than 8 files")]
    IncompleteRank(u8),
    #[error("the active color must be w or b, found {0:?}")]
    BadActiveColor(String),
    #[error("the castling field must be - or a subset of KQkq in that order, found {0:?}")]
    BadCastling(String),
    #[error("the en-passant field must be - or a square, found {0:?}")]
    BadEnPassant(String),
    #[error("the halfmove clock must be a non-negative integer, found {0:?}")]
    BadHalfmove(String),
    #[error("the fullmove number must be a positive integer, found {0:?}")]
    BadFullmove(String),
    #[error("the placement must contain exactly one king per color")]
    KingCount,
}

/// Decode a full six-field FEN into a position.
pub fn parse(fen: &str) -> Result<BoardState, FenError> {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    let [placement, color, castling, en_passant, halfmove, fullmove] = fields[..] else {
        return Err(FenError::FieldCount(fields.len()));
    };

    let board = parse_placement(placement)?;
    for color in [ChessColor::WHITE, ChessColor::BLACK] {
        if board.find_king(color).is_none()
            || board.men_of(color).filter(|(_, m)| m.piece() == ChessPiece::KING).count() != 1
        {
            return Err(FenError::KingCount);
        }
    }

    let player = parse_field::<ChessColor>(color)
        .ok_or_else(|| FenError::BadActiveColor(color.to_string()))?;

    let rights = parse_castling(castling)?;

    let en_passant = match en_passant {
        "-" => None,
        text => Some(
            parse_field::<Square>(text).ok_or_else(|| FenError::BadEnPassant(text.to_string()))?,
        ),
    };

    let halfmove_clock = parse_field::<Clock>(halfmove)
        .ok_or_else(|| FenError::BadHalfmove(halfmove.to_string()))?
        .0;

    let fullmove_clock = parse_field::<Clock>(fullmove)
        .ok_or_else(|| FenError::BadFullmove(fullmove.to_string()))?
        .0;
    if fullmove_clock == 0 {
        return Err(FenError::BadFullmove(fullmove.to_string()));
    }

    Ok(BoardState {
        board,
        player,
        rights,
        en_passant,
        halfmove_clock,
        fullmove_clock,
    })
}

/// Decode the placement field alone into a mailbox board.
pub fn parse_placement(text: &str) -> Result<Mailbox, FenError> {
    let ranks: Vec<&str> = text.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::RankCount(ranks.len()));
    }

    let mut board = Mailbox::EMPTY;
    for (row, rank_text) in ranks.iter().enumerate() {
        let label = 8 - row as u8;
        let tokens = rank_tokens()
            .then_ignore(end())
            .parse(*rank_text)
            .into_result()
            .map_err(|_| FenError::MalformedRank(label))?;

        let mut col = 0usize;
        for token in tokens {
            match token {
                RankToken::Gap(n) => col += n as usize,
                RankToken::Man(man) => {
                    if col >= 8 {
                        return Err(FenError::OverfullRank(label));
                    }
                    board.set(Square::from_u8((row << 3 | col) as u8), Some(man));
                    col += 1;
                }
            }
            if col > 8 {
                return Err(FenError::OverfullRank(label));
            }
        }
        if col < 8 {
            return Err(FenError::IncompleteRank(label));
        }
    }
    Ok(board)
}

#[derive(Debug, Clone, Copy)]
enum RankToken {
    Man(ChessMan),
    Gap(u8),
}

fn rank_tokens<'s>() -> impl Parser<'s, &'s str, Vec<RankToken>> {
    choice((
        ChessMan::parser().map(RankToken::Man),
        one_of('1'..='8').map(|c: char| RankToken::Gap(c as u8 - b'0')),
    ))
    .repeated()
    .at_least(1)
    .collect()
}

fn parse_castling(text: &str) -> Result<[CastleRights; 2], FenError> {
    if text == "-" {
        return Ok([CastleRights::NONE; 2]);
    }
    let parsed = group((
        is_it(just('K')),
        is_it(just('Q')),
        is_it(just('k')),
        is_it(just('q')),
    ))
    .then_ignore(end())
    .parse(text)
    .into_result();
    match parsed {
        Ok((wk, wq, bk, bq)) if wk || wq || bk || bq => Ok([
            CastleRights { short: wk, long: wq },
            CastleRights { short: bk, long: bq },
        ]),
        _ => Err(FenError::BadCastling(text.to_string())),
    }
}

fn is_it<'s, T>(p: impl Parser<'s, &'s str, T>) -> impl Parser<'s, &'s str, bool> {
    p.or_not().map(|it| it.is_some())
}

/// Newtype so the clock fields can share the [`Parsable`] plumbing.
struct Clock(u16);

impl Parsable for Clock {
    fn parser<'s>() -> impl Parser<'s, &'s str, Self> {
        text::int(10)
            .try_map(|digits: &str, _| digits.parse::<u16>().map_err(|_| EmptyErr::default()))
            .map(Clock)
    }
}

/// Encode the placement field of a board.
pub fn placement(board: &Mailbox) -> String {
    let mut out = String::with_capacity(71);
    for row in 0..8u8 {
        if row > 0 {
            out.push('/');
        }
        let mut gap = 0u8;
        for col in 0..8u8 {
            match board.get(Square::from_u8(row << 3 | col)) {
                None => gap += 1,
                Some(man) => {
                    if gap > 0 {
                        out.push((b'0' + gap) as char);
                        gap = 0;
                    }
                    out.push(man.alias());
                }
            }
        }
        if gap > 0 {
            out.push((b'0' + gap) as char);
        }
    }
    out
}

/// Encode a full six-field FEN.
pub fn serialize(state: &BoardState) -> String {
    format!(
        "{} {} {}",
        repetition_key(state),
        state.halfmove_clock,
        state.fullmove_clock
    )
}

/// The first four FEN fields: placement, turn, castling, en-passant.
///
/// The clocks are left out on purpose, so identical positions
/// reached via different move counts collide in the repetition
/// table.
pub fn repetition_key(state: &BoardState) -> String {
    format!(
        "{} {} {} {}",
        placement(&state.board),
        state.player,
        castling_field(state.rights),
        state
            .en_passant
            .map(|sq| sq.to_string())
            .unwrap_or_else(|| "-".to_string()),
    )
}

fn castling_field(rights: [CastleRights; 2]) -> String {
    let mut out = String::with_capacity(4);
    let [white, black] = rights;
    for (present, letter) in [
        (white.short, 'K'),
        (white.long, 'Q'),
        (black.short, 'k'),
        (black.long, 'q'),
    ] {
        if present {
            out.push(letter);
        }
    }
    if out.is_empty() {
        out.push('-');
    }
    out
}
