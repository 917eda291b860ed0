//! Checkmate, stalemate and the draw rules.

use indexmap::IndexMap;

use crate::model::{
    BoardState, ChessPiece, GameState, GameStatus, attacking, mailbox::Mailbox,
    movegen::LegalMoves,
};

/// Resolve the status of a position, given its legal moves and the
/// running repetition table.
///
/// Move exhaustion (mate, stalemate) outranks every draw rule; the
/// draw rules themselves are ordered fifty-move, then material, then
/// repetition.
pub fn resolve(
    state: &BoardState,
    legal: &LegalMoves,
    positions: &IndexMap<String, u32>,
) -> GameState {
    let in_check = attacking::is_king_in_check(&state.board, state.player);
    let check = in_check.then_some(state.player);

    if legal.is_empty() {
        return if in_check {
            GameState {
                status: GameStatus::CHECKMATE,
                winner: Some(state.player.opp()),
                check,
            }
        } else {
            GameState {
                status: GameStatus::STALEMATE,
                winner: None,
                check: None,
            }
        };
    }

    let status = if state.halfmove_clock >= 100 {
        GameStatus::FIFTY_MOVE_DRAW
    } else if insufficient_material(&state.board) {
        GameStatus::INSUFFICIENT_MATERIAL
    } else if positions.values().any(|&n| n >= 3) {
        GameStatus::THREEFOLD_REPETITION
    } else {
        GameStatus::IN_PROGRESS
    };

    GameState { status, winner: None, check }
}

/// Neither side can ever deliver mate.
///
/// Drawn when no pawn, rook or queen remains anywhere and each side
/// independently keeps at most one minor piece; additionally a bare
/// king facing exactly two knights is counted as drawn. The latter
/// is deliberately more generous than the strict FIDE rule and is
/// kept that way.
pub fn insufficient_material(board: &Mailbox) -> bool {
    let mut minors = [0u8; 2];
    let mut knights = [0u8; 2];

    for (_, man) in board.men() {
        let color = man.color().ix();
        match man.piece() {
            ChessPiece::PAWN | ChessPiece::ROOK | ChessPiece::QUEEN => return false,
            ChessPiece::KNIGHT => {
                minors[color] += 1;
                knights[color] += 1;
            }
            ChessPiece::BISHOP => minors[color] += 1,
            ChessPiece::KING => {}
        }
    }

    (minors[0] <= 1 && minors[1] <= 1)
        || (minors[0] == 0 && minors[1] == 2 && knights[1] == 2)
        || (minors[1] == 0 && minors[0] == 2 && knights[0] == 2)
}
