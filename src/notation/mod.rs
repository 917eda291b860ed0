//! Reading and writing chess notation: FEN in both directions, SAN
//! outward only.

pub mod fen;
pub mod san;

use std::fmt::Display;

use chumsky::prelude::*;
use strum::VariantNames;

use crate::model::{CastlingSide, ChessColor, ChessMan, MoveRequest, Square};

/// Types with a canonical text form readable by a [`chumsky`] parser.
pub trait Parsable: Sized {
    fn parser<'s>() -> impl Parser<'s, &'s str, Self>;
}

/// Run a parser over an entire input field, rejecting trailing text.
pub(crate) fn parse_field<T: Parsable>(text: &str) -> Option<T> {
    T::parser().then_ignore(end()).parse(text).into_result().ok()
}

impl Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(Square::VARIANTS[self.ix()])
    }
}

impl Display for ChessColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WHITE => write!(f, "w"),
            Self::BLACK => write!(f, "b"),
        }
    }
}

impl Display for ChessMan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            write!(f, "{}", self.glyph())
        } else {
            write!(f, "{}", self.alias())
        }
    }
}

impl Display for CastlingSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SHORT => write!(f, "O-O"),
            Self::LONG => write!(f, "O-O-O"),
        }
    }
}

/// Coordinate notation: origin, destination, and a lower-case
/// promotion letter when present, e.g. `e7e8q`.
impl Display for MoveRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", promotion.alias().to_ascii_lowercase())?;
        }
        Ok(())
    }
}

impl Parsable for Square {
    fn parser<'s>() -> impl Parser<'s, &'s str, Self> {
        group((one_of('a'..='h'), one_of('1'..='8'))).map(|(file, rank): (char, char)| {
            let col = file as u8 - b'a';
            let row = b'8' - rank as u8;
            Square::from_u8(row << 3 | col)
        })
    }
}

impl Parsable for ChessColor {
    fn parser<'s>() -> impl Parser<'s, &'s str, Self> {
        choice((just('w').to(Self::WHITE), just('b').to(Self::BLACK)))
    }
}

impl Parsable for ChessMan {
    fn parser<'s>() -> impl Parser<'s, &'s str, Self> {
        use ChessMan::*;
        choice((
            just('k').to(BLACK_KING),
            just('q').to(BLACK_QUEEN),
            just('r').to(BLACK_ROOK),
            just('b').to(BLACK_BISHOP),
            just('n').to(BLACK_KNIGHT),
            just('p').to(BLACK_PAWN),
            just('P').to(WHITE_PAWN),
            just('N').to(WHITE_KNIGHT),
            just('B').to(WHITE_BISHOP),
            just('R').to(WHITE_ROOK),
            just('Q').to(WHITE_QUEEN),
            just('K').to(WHITE_KING),
        ))
    }
}
