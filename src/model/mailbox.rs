//! The 'mailbox' representation of a chessboard.
//!
//! This is the simple and most obvious representation, using a
//! separate optional value in an array for each square, a so-called
//! 'board'-centric representation. All move generation and attack
//! detection in this crate reads it directly; there is no derived
//! bit-level representation to keep in sync.

use std::sync::LazyLock;

use crate::{
    model::{ChessColor, ChessMan, ChessPiece, Square},
    notation::fen,
};

/// One optional chessman per square, indexed by [`Square::ix`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[repr(transparent)]
pub struct Mailbox(pub [Option<ChessMan>; 64]);

/// The starting array, decoded once from the standard placement string.
static STARTPOS: LazyLock<Mailbox> = LazyLock::new(|| {
    fen::parse_placement(fen::STARTING_PLACEMENT)
        .expect("the standard placement string is well-formed")
});

impl Mailbox {
    pub const EMPTY: Self = Self([None; 64]);

    /// The standard starting position.
    pub fn startpos() -> Self {
        STARTPOS.clone()
    }

    /// Read a square.
    #[inline]
    pub fn get(&self, sq: Square) -> Option<ChessMan> {
        self.0[sq.ix()]
    }

    /// Write to a square.
    #[inline]
    pub fn set(&mut self, sq: Square, man: Option<ChessMan>) {
        self.0[sq.ix()] = man;
    }

    /// All occupied squares, in index order.
    pub fn men(&self) -> impl Iterator<Item = (Square, ChessMan)> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(ix, man)| man.map(|m| (Square::from_u8(ix as u8), m)))
    }

    /// All occupied squares of one color, in index order.
    pub fn men_of(&self, color: ChessColor) -> impl Iterator<Item = (Square, ChessMan)> + '_ {
        self.men().filter(move |(_, m)| m.color() == color)
    }

    /// Where this color's king stands.
    ///
    /// `None` only on boards that never passed construction-time
    /// validation.
    pub fn find_king(&self, color: ChessColor) -> Option<Square> {
        let king = ChessMan::new(color, ChessPiece::KING);
        self.men().find(|&(_, m)| m == king).map(|(sq, _)| sq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChessColor::*, ChessMan::*};

    #[test]
    fn startpos_layout() {
        let b = Mailbox::startpos();
        assert_eq!(b.get(Square::a8), Some(BLACK_ROOK));
        assert_eq!(b.get(Square::e8), Some(BLACK_KING));
        assert_eq!(b.get(Square::d1), Some(WHITE_QUEEN));
        assert_eq!(b.get(Square::e2), Some(WHITE_PAWN));
        assert_eq!(b.get(Square::e4), None);
        assert_eq!(b.men().count(), 32);
        assert_eq!(b.men_of(WHITE).count(), 16);
    }

    #[test]
    fn kings_are_found() {
        let b = Mailbox::startpos();
        assert_eq!(b.find_king(WHITE), Some(Square::e1));
        assert_eq!(b.find_king(BLACK), Some(Square::e8));
        assert_eq!(Mailbox::EMPTY.find_king(WHITE), None);
    }
}
