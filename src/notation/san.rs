//! Standard algebraic notation, rendered outward only.
//!
//! SAN names a move by the destination and the least origin detail
//! needed to single the mover out, which is why rendering takes the
//! whole legal move store of the pre-move position and not just the
//! move itself. Whether the move gives check or mate is a fact about
//! the position after it, so the caller passes the verdict in.

use std::fmt::Display;

use crate::model::{ChessMove, ChessPiece, MoveKind, movegen::LegalMoves};

/// The suffix a move earns from the position it creates.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::EnumIs)]
pub enum CheckMark {
    #[default]
    NONE,
    CHECK,
    MATE,
}

impl Display for CheckMark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NONE => Ok(()),
            Self::CHECK => write!(f, "+"),
            Self::MATE => write!(f, "#"),
        }
    }
}

/// Letter SAN, e.g. `Nbd2`, `exd6 e.p.`, `a8=Q`, `O-O+`.
pub fn standard(mv: &ChessMove, legal: &LegalMoves, mark: CheckMark) -> String {
    render(mv, legal, mark, false)
}

/// Figurine SAN, the same grammar with glyphs for the letters.
pub fn figurine(mv: &ChessMove, legal: &LegalMoves, mark: CheckMark) -> String {
    render(mv, legal, mark, true)
}

fn render(mv: &ChessMove, legal: &LegalMoves, mark: CheckMark, glyphs: bool) -> String {
    if let Some(side) = mv.kind.castle_side() {
        return format!("{side}{mark}");
    }

    let mut out = String::with_capacity(8);

    match mv.man.piece() {
        ChessPiece::PAWN => {
            if mv.kind.takes() {
                out.push(mv.from.file_char());
                out.push('x');
            }
        }
        piece => {
            if glyphs {
                out.push(mv.man.glyph());
            } else {
                out.push(piece.letter());
            }
            out.push_str(&disambiguator(mv, legal));
            if mv.kind.takes() {
                out.push('x');
            }
        }
    }

    out.push_str(&mv.to.to_string());

    if let Some(promotion) = mv.promotion {
        out.push('=');
        if glyphs {
            out.push(promotion.glyph());
        } else {
            out.push(promotion.piece().letter());
        }
    }

    out.push_str(&mark.to_string());

    if mv.kind == MoveKind::EN_PASSANT {
        out.push_str(" e.p.");
    }

    out
}

/// The smallest origin hint telling this man apart from every other
/// same-type man that can reach the same destination.
fn disambiguator(mv: &ChessMove, legal: &LegalMoves) -> String {
    let rivals: Vec<_> = legal
        .reachers
        .get(&(mv.man.piece(), mv.to))
        .map(Vec::as_slice)
        .unwrap_or(&[])
        .iter()
        .filter(|&&from| from != mv.from)
        .collect();

    if rivals.is_empty() {
        String::new()
    } else if rivals.iter().all(|r| r.col() != mv.from.col()) {
        mv.from.file_char().to_string()
    } else if rivals.iter().all(|r| r.row() != mv.from.row()) {
        mv.from.rank_char().to_string()
    } else {
        format!("{}{}", mv.from.file_char(), mv.from.rank_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Square, Square::*, movegen::legal_moves};
    use crate::notation::fen;

    fn pick(fen_text: &str, from: Square, to: Square) -> (ChessMove, LegalMoves) {
        let legal = legal_moves(&fen::parse(fen_text).expect("test position parses"));
        let mv = legal
            .from_square(from)
            .iter()
            .find(|m| m.to == to)
            .copied()
            .expect("test move is legal");
        (mv, legal)
    }

    #[test]
    fn plain_moves_name_the_destination_alone() {
        let (mv, legal) = pick(fen::STARTING_FEN, e2, e4);
        assert_eq!(standard(&mv, &legal, CheckMark::NONE), "e4");
        let (mv, legal) = pick(fen::STARTING_FEN, g1, f3);
        assert_eq!(standard(&mv, &legal, CheckMark::NONE), "Nf3");
        assert_eq!(figurine(&mv, &legal, CheckMark::NONE), "♘f3");
    }

    #[test]
    fn pawn_captures_carry_the_origin_file() {
        let (mv, legal) = pick("4k3/8/8/8/3p4/4P3/8/4K3 w - - 0 1", e3, d4);
        assert_eq!(standard(&mv, &legal, CheckMark::NONE), "exd4");
    }

    #[test]
    fn twins_on_different_files_split_by_file() {
        // knights on b1 and f3 both reach d2
        let (mv, legal) = pick("4k3/8/8/8/8/5N2/8/1N2K3 w - - 0 1", b1, d2);
        assert_eq!(standard(&mv, &legal, CheckMark::NONE), "Nbd2");
        let (mv, legal) = pick("4k3/8/8/8/8/5N2/8/1N2K3 w - - 0 1", f3, d2);
        assert_eq!(standard(&mv, &legal, CheckMark::NONE), "Nfd2");
    }

    #[test]
    fn twins_on_one_file_split_by_rank() {
        // rooks on a1 and a5 both reach a3
        let (mv, legal) = pick("4k3/8/8/R7/8/8/8/R3K3 w - - 0 1", a1, a3);
        assert_eq!(standard(&mv, &legal, CheckMark::NONE), "R1a3");
        let (mv, legal) = pick("4k3/8/8/R7/8/8/8/R3K3 w - - 0 1", a5, a3);
        assert_eq!(standard(&mv, &legal, CheckMark::NONE), "R5a3");
    }

    #[test]
    fn crowded_twins_need_both_coordinates() {
        // queens on e4, h4 and h1 all reach e1
        let (mv, legal) = pick("6k1/8/8/8/4Q2Q/8/1K6/7Q w - - 0 1", h4, e1);
        assert_eq!(standard(&mv, &legal, CheckMark::NONE), "Qh4e1");
    }

    #[test]
    fn the_fools_mate_queen() {
        let fen_text = "rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq g3 0 2";
        let (mv, legal) = pick(fen_text, d8, h4);
        assert_eq!(standard(&mv, &legal, CheckMark::MATE), "Qh4#");
        assert_eq!(figurine(&mv, &legal, CheckMark::MATE), "♛h4#");
    }

    #[test]
    fn en_passant_is_spelled_out() {
        let (mv, legal) = pick("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1", e5, d6);
        assert_eq!(standard(&mv, &legal, CheckMark::NONE), "exd6 e.p.");
    }

    #[test]
    fn promotion_names_the_new_man() {
        let legal = legal_moves(&fen::parse("8/P3k3/8/8/8/8/8/4K3 w - - 0 1").unwrap());
        let mv = legal
            .from_square(a7)
            .iter()
            .find(|m| m.promotion.map(|p| p.piece()) == Some(ChessPiece::QUEEN))
            .copied()
            .unwrap();
        assert_eq!(standard(&mv, &legal, CheckMark::NONE), "a8=Q");
        assert_eq!(figurine(&mv, &legal, CheckMark::NONE), "a8=♕");
    }

    #[test]
    fn castling_takes_the_check_mark_too() {
        let (mv, legal) = pick("5k2/8/8/8/8/8/8/4K2R w K - 0 1", e1, g1);
        assert_eq!(standard(&mv, &legal, CheckMark::CHECK), "O-O+");
        assert_eq!(figurine(&mv, &legal, CheckMark::CHECK), "O-O+");
    }
}
