//! Applying a move: board mutation on a scratch copy, and the full
//! successor position with its transient metadata.

use crate::model::{
    BoardState, ChessColor, ChessMove, ChessPiece, MoveKind, Square, castling, mailbox::Mailbox,
};

/// Play `mv` onto a board.
///
/// The move is trusted to come from [`movegen`](super::movegen)
/// against this very position; everything needed is read off the
/// move itself.
pub fn apply_to_board(board: &mut Mailbox, mv: &ChessMove) {
    match mv.kind {
        MoveKind::STANDARD => {}
        MoveKind::CAPTURE | MoveKind::EN_PASSANT => {
            // for en-passant the victim is beside the destination
            if let Some(victim_square) = mv.capture_square {
                board.set(victim_square, None);
            }
        }
        MoveKind::SHORT_CASTLE | MoveKind::LONG_CASTLE => {
            if let Some(side) = mv.kind.castle_side() {
                let plan = castling::plan(mv.man.color(), side);
                let rook = board.get(plan.rook_from);
                board.set(plan.rook_from, None);
                board.set(plan.rook_to, rook);
            }
        }
    }

    board.set(mv.from, None);
    board.set(mv.to, Some(mv.promotion.unwrap_or(mv.man)));
}

/// The position after `mv`, with rights, clocks and the en-passant
/// target brought forward.
pub fn next_state(state: &BoardState, mv: &ChessMove) -> BoardState {
    let mut board = state.board.clone();
    apply_to_board(&mut board, mv);

    let mover = mv.man.color();
    let pawn_move = mv.man.piece() == ChessPiece::PAWN;

    let halfmove_clock = if pawn_move || mv.kind.takes() {
        0
    } else {
        state.halfmove_clock + 1
    };

    let fullmove_clock = state.fullmove_clock + u16::from(mover.is_black());

    // only a double pawn push leaves a capturable square behind
    let en_passant = if pawn_move && mv.from.row().abs_diff(mv.to.row()) == 2 {
        Square::from_row_col(
            (mv.from.row() as i8 + mv.to.row() as i8) / 2,
            mv.from.col() as i8,
        )
    } else {
        None
    };

    BoardState {
        board,
        player: mover.opp(),
        rights: castling::rights_after(state.rights, mv),
        en_passant,
        halfmove_clock,
        fullmove_clock,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChessMan::*, Square::*, movegen};
    use crate::notation::fen;

    fn play(state: &BoardState, from: Square, to: Square) -> BoardState {
        let legal = movegen::legal_moves(state);
        let mv = legal
            .from_square(from)
            .iter()
            .find(|m| m.to == to)
            .copied()
            .expect("test move is legal");
        next_state(state, &mv)
    }

    #[test]
    fn a_double_push_leaves_its_target_behind() {
        let state = play(&BoardState::startpos(), e2, e4);
        assert_eq!(state.board.get(e4), Some(WHITE_PAWN));
        assert_eq!(state.board.get(e2), None);
        assert_eq!(state.en_passant, Some(e3));
        assert_eq!(state.player, ChessColor::BLACK);
        assert_eq!(state.halfmove_clock, 0);
        assert_eq!(state.fullmove_clock, 1);

        // a single step leaves nothing
        let state = play(&state, e7, e6);
        assert_eq!(state.en_passant, None);
        assert_eq!(state.fullmove_clock, 2);
    }

    #[test]
    fn clocks_reset_on_pawn_moves_and_captures_only() {
        let start = BoardState::startpos();
        let state = play(&start, g1, f3);
        assert_eq!(state.halfmove_clock, 1);
        let state = play(&state, b8, c6);
        assert_eq!(state.halfmove_clock, 2);
        let state = play(&state, f3, e5);
        assert_eq!(state.halfmove_clock, 3);
        let state = play(&state, c6, e5);
        assert_eq!(state.halfmove_clock, 0);
        assert_eq!(state.board.get(e5), Some(BLACK_KNIGHT));
    }

    #[test]
    fn en_passant_removes_the_passed_pawn() {
        let state = fen::parse("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        let state = play(&state, e5, d6);
        assert_eq!(state.board.get(d6), Some(WHITE_PAWN));
        assert_eq!(state.board.get(d5), None);
        // the destination square held nothing to clear
        assert_eq!(state.board.get(e5), None);
    }

    #[test]
    fn castling_relocates_both_men() {
        let state = fen::parse("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let state = play(&state, e1, g1);
        assert_eq!(state.board.get(g1), Some(WHITE_KING));
        assert_eq!(state.board.get(f1), Some(WHITE_ROOK));
        assert_eq!(state.board.get(e1), None);
        assert_eq!(state.board.get(h1), None);
        assert_eq!(state.rights[ChessColor::WHITE.ix()], crate::model::CastleRights::NONE);

        let state = play(&state, e8, c8);
        assert_eq!(state.board.get(c8), Some(BLACK_KING));
        assert_eq!(state.board.get(d8), Some(BLACK_ROOK));
        assert_eq!(state.board.get(a8), None);
    }

    #[test]
    fn promotion_replaces_the_pawn() {
        let state = fen::parse("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let legal = movegen::legal_moves(&state);
        let mv = legal
            .from_square(a7)
            .iter()
            .find(|m| m.promotion == Some(WHITE_QUEEN))
            .copied()
            .unwrap();
        let state = next_state(&state, &mv);
        assert_eq!(state.board.get(a8), Some(WHITE_QUEEN));
        assert_eq!(state.board.get(a7), None);
    }
}
