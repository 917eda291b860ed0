//! Pseudo-legal move enumeration, the king-safety filter, and the
//! indexed store of legal moves.
//!
//! Generation is purely geometric; the only place the pseudo-legal
//! and legal move sets diverge is the simulation filter at the end,
//! which plays each candidate on a scratch board and discards those
//! leaving the mover's king in check.

use indexmap::IndexMap;

use crate::model::{
    BoardState, CastlingSide, ChessColor, ChessMan, ChessMove, ChessPiece, MoveKind, Square,
    attacking, attacks::TABLES, castling, mailbox::Mailbox, moving,
};

/// Every legal move of a position, indexed three ways.
///
/// `reachers` maps a (piece type, destination) pair to the origin
/// squares of same-type men that can legally reach it; it exists
/// purely to let SAN rendering pick a disambiguator.
#[derive(Debug, Clone, Default)]
pub struct LegalMoves {
    pub all: Vec<ChessMove>,
    pub by_from: IndexMap<Square, Vec<ChessMove>>,
    pub reachers: IndexMap<(ChessPiece, Square), Vec<Square>>,
}

impl LegalMoves {
    fn push(&mut self, mv: ChessMove) {
        self.by_from.entry(mv.from).or_default().push(mv);
        let starts = self.reachers.entry((mv.man.piece(), mv.to)).or_default();
        // the four promotion moves share one origin
        if !starts.contains(&mv.from) {
            starts.push(mv.from);
        }
        self.all.push(mv);
    }

    /// Legal moves leaving the given square.
    pub fn from_square(&self, sq: Square) -> &[ChessMove] {
        self.by_from.get(&sq).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

/// Enumerate the legal moves of the player to move.
pub fn legal_moves(state: &BoardState) -> LegalMoves {
    let mut pseudo = Vec::with_capacity(64);
    enumerate(state, &mut pseudo);

    let mut store = LegalMoves::default();
    for mv in pseudo {
        if keeps_king_safe(state, &mv) {
            store.push(mv);
        }
    }
    store
}

/// Enumerate pseudo-legal moves, king safety not yet considered.
pub fn enumerate(state: &BoardState, out: &mut Vec<ChessMove>) {
    for (from, man) in state.board.men_of(state.player) {
        match man.piece() {
            ChessPiece::PAWN => pawn_moves(state, from, man, out),
            ChessPiece::KNIGHT => leaper_moves(state, from, man, TABLES.knight_moves(from), out),
            ChessPiece::BISHOP | ChessPiece::ROOK | ChessPiece::QUEEN => {
                slider_moves(state, from, man, out)
            }
            ChessPiece::KING => king_moves(state, from, man, out),
        }
    }
}

fn keeps_king_safe(state: &BoardState, mv: &ChessMove) -> bool {
    let mut scratch = state.board.clone();
    moving::apply_to_board(&mut scratch, mv);
    !attacking::is_king_in_check(&scratch, mv.man.color())
}

fn quiet(man: ChessMan, from: Square, to: Square) -> ChessMove {
    ChessMove {
        man,
        from,
        to,
        kind: MoveKind::STANDARD,
        capture: None,
        capture_square: None,
        promotion: None,
    }
}

fn pawn_moves(state: &BoardState, from: Square, man: ChessMan, out: &mut Vec<ChessMove>) {
    let color = man.color();
    // white pawns walk toward row 0, black toward row 7
    let dr = -color.sign();
    let start_row = match color {
        ChessColor::WHITE => 6,
        ChessColor::BLACK => 1,
    };

    if let Some(one) = from.offset(dr, 0)
        && state.board.get(one).is_none()
    {
        push_pawn_move(quiet(man, from, one), out);

        if from.row() == start_row
            && let Some(two) = one.offset(dr, 0)
            && state.board.get(two).is_none()
        {
            out.push(quiet(man, from, two));
        }
    }

    for dc in [-1, 1] {
        let Some(to) = from.offset(dr, dc) else { continue };
        if let Some(victim) = state.board.get(to) {
            if victim.color() != color {
                push_pawn_move(
                    ChessMove {
                        kind: MoveKind::CAPTURE,
                        capture: Some(victim),
                        capture_square: Some(to),
                        ..quiet(man, from, to)
                    },
                    out,
                );
            }
        } else if state.en_passant == Some(to) {
            // the passed pawn stands beside us, not on the target
            let victim_square = Square::from_row_col(from.row() as i8, to.col() as i8);
            out.push(ChessMove {
                kind: MoveKind::EN_PASSANT,
                capture: Some(ChessMan::new(color.opp(), ChessPiece::PAWN)),
                capture_square: victim_square,
                ..quiet(man, from, to)
            });
        }
    }
}

/// Emit a pawn move, fanned out into the four promotions when it
/// reaches the back rank.
fn push_pawn_move(mv: ChessMove, out: &mut Vec<ChessMove>) {
    let back_rank = match mv.man.color() {
        ChessColor::WHITE => 0,
        ChessColor::BLACK => 7,
    };
    if mv.to.row() == back_rank {
        use ChessPiece::*;
        for piece in [KNIGHT, BISHOP, ROOK, QUEEN] {
            out.push(ChessMove {
                promotion: Some(ChessMan::new(mv.man.color(), piece)),
                ..mv
            });
        }
    } else {
        out.push(mv);
    }
}

fn slider_moves(state: &BoardState, from: Square, man: ChessMan, out: &mut Vec<ChessMove>) {
    let tables = &*TABLES;
    let rays: Vec<&[Square]> = match man.piece() {
        ChessPiece::BISHOP => tables.bishop_rays(from).collect(),
        ChessPiece::ROOK => tables.rook_rays(from).collect(),
        _ => tables.queen_rays(from).collect(),
    };

    for ray in rays {
        for &to in ray {
            match state.board.get(to) {
                None => out.push(quiet(man, from, to)),
                Some(victim) => {
                    if victim.color() != man.color() {
                        out.push(ChessMove {
                            kind: MoveKind::CAPTURE,
                            capture: Some(victim),
                            capture_square: Some(to),
                            ..quiet(man, from, to)
                        });
                    }
                    break;
                }
            }
        }
    }
}

fn leaper_moves(
    state: &BoardState,
    from: Square,
    man: ChessMan,
    targets: &[Square],
    out: &mut Vec<ChessMove>,
) {
    for &to in targets {
        match state.board.get(to) {
            None => out.push(quiet(man, from, to)),
            Some(victim) if victim.color() != man.color() => out.push(ChessMove {
                kind: MoveKind::CAPTURE,
                capture: Some(victim),
                capture_square: Some(to),
                ..quiet(man, from, to)
            }),
            Some(_) => {}
        }
    }
}

fn king_moves(state: &BoardState, from: Square, man: ChessMan, out: &mut Vec<ChessMove>) {
    let color = man.color();

    // castles come ahead of the king's own one-step moves
    let granted = castling::legality(color, &state.board, state.rights[color.ix()]);
    for (side, kind) in [
        (CastlingSide::SHORT, MoveKind::SHORT_CASTLE),
        (CastlingSide::LONG, MoveKind::LONG_CASTLE),
    ] {
        let plan = castling::plan(color, side);
        if granted.allows(side) && from == plan.king_from {
            out.push(ChessMove {
                kind,
                ..quiet(man, plan.king_from, plan.king_to)
            });
        }
    }

    leaper_moves(state, from, man, TABLES.king_moves(from), out);
}
