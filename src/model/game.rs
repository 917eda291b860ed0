//! The game value: a position plus everything accumulated on the way
//! there.
//!
//! A [`ChessGame`] is a snapshot. Playing a move builds and returns
//! the successor game; a rejected move returns an error and leaves
//! the prior value untouched, so callers can keep earlier snapshots
//! around for takeback or analysis.

use indexmap::IndexMap;

use crate::{
    model::{
        BoardState, ChessColor, ChessMove, ChessPiece, EngineError, GameState, GameStatus,
        InputError, MoveRecord, MoveRequest, PieceCapture, Square, attacking, endings,
        movegen::{self, LegalMoves},
        moving,
    },
    notation::{fen, san},
};

#[derive(Debug, Clone)]
pub struct ChessGame {
    state: BoardState,
    game_state: GameState,
    legal: LegalMoves,
    history: Vec<MoveRecord>,
    captures: Vec<PieceCapture>,
    /// Repetition table: occurrence count per position key, the
    /// current position included.
    positions: IndexMap<String, u32>,
}

impl ChessGame {
    /// A fresh game from the standard starting position.
    pub fn new() -> Self {
        Self::from_parts(BoardState::startpos(), Vec::new(), Vec::new(), IndexMap::new())
    }

    /// Resume a game from a FEN position. History starts empty, and
    /// the repetition table knows only the given position.
    pub fn from_fen(fen_text: &str) -> Result<Self, EngineError> {
        let state = fen::parse(fen_text).map_err(InputError::from)?;
        Ok(Self::from_parts(state, Vec::new(), Vec::new(), IndexMap::new()))
    }

    fn from_parts(
        state: BoardState,
        history: Vec<MoveRecord>,
        captures: Vec<PieceCapture>,
        mut positions: IndexMap<String, u32>,
    ) -> Self {
        *positions.entry(fen::repetition_key(&state)).or_insert(0) += 1;
        let legal = movegen::legal_moves(&state);
        let game_state = endings::resolve(&state, &legal, &positions);
        Self { state, game_state, legal, history, captures, positions }
    }

    /// The game after playing the requested move.
    ///
    /// The request is matched against the legal-move set of this
    /// position; anything that does not match is rejected, including
    /// any request at all once the game is over.
    pub fn after_move(&self, req: MoveRequest) -> Result<Self, EngineError> {
        let illegal = EngineError::IllegalMove { from: req.from, to: req.to };
        if self.game_state.status.is_over() {
            return Err(illegal);
        }

        let candidates: Vec<&ChessMove> = self
            .legal
            .from_square(req.from)
            .iter()
            .filter(|m| m.to == req.to)
            .collect();
        let mv = *select_promotion(&candidates, &req, self.state.player).ok_or(illegal)??;

        let next = moving::next_state(&self.state, &mv);
        let next_legal = movegen::legal_moves(&next);
        let mark = if attacking::is_king_in_check(&next.board, next.player) {
            if next_legal.is_empty() { san::CheckMark::MATE } else { san::CheckMark::CHECK }
        } else {
            san::CheckMark::NONE
        };

        let mut history = self.history.clone();
        history.push(MoveRecord {
            mv,
            san: san::standard(&mv, &self.legal, mark),
            figurine: san::figurine(&mv, &self.legal, mark),
        });

        let mut captures = self.captures.clone();
        if let Some(man) = mv.capture {
            captures.push(PieceCapture { man, move_index: history.len() - 1 });
        }

        Ok(Self::from_parts(next, history, captures, self.positions.clone()))
    }

    /// The game after the given player resigns.
    ///
    /// A finished game is returned unchanged; the first verdict on a
    /// game sticks.
    pub fn resign(&self, player: ChessColor) -> Self {
        self.verdict(GameStatus::RESIGNED, Some(player.opp()))
    }

    /// The game after the players agree to a draw.
    pub fn agree_draw(&self) -> Self {
        self.verdict(GameStatus::DRAW_AGREED, None)
    }

    /// The game after the given player runs out of time.
    pub fn flag(&self, player: ChessColor) -> Self {
        self.verdict(GameStatus::TIMEOUT, Some(player.opp()))
    }

    fn verdict(&self, status: GameStatus, winner: Option<ChessColor>) -> Self {
        let mut next = self.clone();
        if !self.game_state.status.is_over() {
            next.game_state = GameState { status, winner, check: self.game_state.check };
        }
        next
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn game_state(&self) -> GameState {
        self.game_state
    }

    pub fn status(&self) -> GameStatus {
        self.game_state.status
    }

    /// The player to move.
    pub fn player(&self) -> ChessColor {
        self.state.player
    }

    pub fn legal_moves(&self) -> &LegalMoves {
        &self.legal
    }

    /// Legal moves leaving the given square; empty when the square
    /// holds nothing of the mover's.
    pub fn moves_from(&self, sq: Square) -> &[ChessMove] {
        self.legal.from_square(sq)
    }

    pub fn to_fen(&self) -> String {
        fen::serialize(&self.state)
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn captures(&self) -> &[PieceCapture] {
        &self.captures
    }
}

impl Default for ChessGame {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick the one candidate the request names.
///
/// For a promoting pawn the four candidates differ only in the
/// promotion field, so the request must name a piece; everywhere
/// else naming one is itself an error.
fn select_promotion<'m>(
    candidates: &[&'m ChessMove],
    req: &MoveRequest,
    player: ChessColor,
) -> Option<Result<&'m ChessMove, EngineError>> {
    let first = candidates.first()?;

    if first.promotion.is_none() {
        return Some(match req.promotion {
            None => Ok(first),
            Some(_) => Err(InputError::UnexpectedPromotion(req.from, req.to).into()),
        });
    }

    let Some(named) = req.promotion else {
        return Some(Err(InputError::MissingPromotion(req.to).into()));
    };
    if matches!(named.piece(), ChessPiece::PAWN | ChessPiece::KING) {
        return Some(Err(InputError::NotPromotable(named).into()));
    }
    if named.color() != player {
        return Some(Err(InputError::PromotionColorMismatch(named).into()));
    }
    candidates
        .iter()
        .find(|m| m.promotion == Some(named))
        .map(|m| Ok(*m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChessMan::*, Square::*};

    fn play(game: &ChessGame, from: Square, to: Square) -> ChessGame {
        game.after_move(MoveRequest::new(from, to)).expect("test move is legal")
    }

    #[test]
    fn the_fools_mate() {
        let game = play(&ChessGame::new(), f2, f3);
        let game = play(&game, e7, e5);
        let game = play(&game, g2, g4);
        let game = play(&game, d8, h4);

        assert_eq!(game.status(), GameStatus::CHECKMATE);
        assert_eq!(game.game_state().winner, Some(ChessColor::BLACK));
        assert_eq!(game.game_state().check, Some(ChessColor::WHITE));
        assert!(game.legal_moves().is_empty());

        let sans: Vec<&str> = game.history().iter().map(|r| r.san.as_str()).collect();
        assert_eq!(sans, ["f3", "e5", "g4", "Qh4#"]);
        assert_eq!(game.history()[3].figurine, "♛h4#");
    }

    #[test]
    fn moves_from_agrees_with_the_move_store() {
        let game = ChessGame::new();
        assert_eq!(game.legal_moves().len(), 20);
        let targets: Vec<Square> = game.moves_from(e2).iter().map(|m| m.to).collect();
        assert!(targets.contains(&e3) && targets.contains(&e4));
        assert!(game.moves_from(e5).is_empty());
        assert!(game.moves_from(e7).is_empty());
    }

    #[test]
    fn unmatched_requests_are_illegal() {
        let game = ChessGame::new();
        assert_eq!(
            game.after_move(MoveRequest::new(e2, e5)).unwrap_err(),
            EngineError::IllegalMove { from: e2, to: e5 }
        );
        // not the mover's man
        assert_eq!(
            game.after_move(MoveRequest::new(e7, e5)).unwrap_err(),
            EngineError::IllegalMove { from: e7, to: e5 }
        );
    }

    #[test]
    fn finished_games_refuse_further_moves() {
        // stalemate from the first resolve
        let game = ChessGame::from_fen("7k/5Q2/8/8/8/8/8/K7 b - - 3 40").unwrap();
        assert_eq!(game.status(), GameStatus::STALEMATE);
        assert_eq!(
            game.after_move(MoveRequest::new(h8, h7)).unwrap_err(),
            EngineError::IllegalMove { from: h8, to: h7 }
        );
    }

    #[test]
    fn knight_shuffles_draw_by_repetition() {
        let mut game = ChessGame::new();
        for _ in 0..2 {
            game = play(&game, g1, f3);
            game = play(&game, g8, f6);
            game = play(&game, f3, g1);
            game = play(&game, f6, g8);
        }
        // the starting position has now stood three times
        assert_eq!(game.status(), GameStatus::THREEFOLD_REPETITION);
        assert!(game.status().is_over());
    }

    #[test]
    fn promotion_requests_are_vetted() {
        let game = ChessGame::from_fen("8/P3k3/8/8/8/8/8/4K3 w - - 0 1").unwrap();

        assert_eq!(
            game.after_move(MoveRequest::new(a7, a8)).unwrap_err(),
            EngineError::from(InputError::MissingPromotion(a8))
        );
        assert_eq!(
            game.after_move(MoveRequest::promoting(a7, a8, BLACK_QUEEN)).unwrap_err(),
            EngineError::from(InputError::PromotionColorMismatch(BLACK_QUEEN))
        );
        assert_eq!(
            game.after_move(MoveRequest::promoting(a7, a8, WHITE_PAWN)).unwrap_err(),
            EngineError::from(InputError::NotPromotable(WHITE_PAWN))
        );

        let game = game
            .after_move(MoveRequest::promoting(a7, a8, WHITE_QUEEN))
            .unwrap();
        assert_eq!(game.state().board.get(a8), Some(WHITE_QUEEN));
        assert_eq!(game.history()[0].san, "a8=Q");
    }

    #[test]
    fn naming_a_promotion_on_a_plain_move_is_rejected() {
        let game = ChessGame::new();
        assert_eq!(
            game.after_move(MoveRequest::promoting(e2, e4, WHITE_QUEEN)).unwrap_err(),
            EngineError::from(InputError::UnexpectedPromotion(e2, e4))
        );
    }

    #[test]
    fn captures_are_tallied_against_their_moves() {
        let game = play(&ChessGame::new(), e2, e4);
        let game = play(&game, d7, d5);
        let game = play(&game, e4, d5);

        assert_eq!(game.captures(), [PieceCapture { man: BLACK_PAWN, move_index: 2 }]);
        assert_eq!(game.history()[2].san, "exd5");
        assert_eq!(game.history()[2].mv.capture, Some(BLACK_PAWN));
    }

    #[test]
    fn en_passant_through_the_game_api() {
        let game = ChessGame::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 3").unwrap();
        let game = play(&game, e5, d6);
        assert_eq!(game.state().board.get(d5), None);
        assert_eq!(game.history()[0].san, "exd6 e.p.");
        assert_eq!(game.captures()[0].man, BLACK_PAWN);
    }

    #[test]
    fn terminal_draws_surface_from_fen() {
        let game = ChessGame::from_fen("4k3/8/8/8/8/8/8/2B1K3 b - - 10 40").unwrap();
        assert_eq!(game.status(), GameStatus::INSUFFICIENT_MATERIAL);

        let game = ChessGame::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 100 80").unwrap();
        assert_eq!(game.status(), GameStatus::FIFTY_MOVE_DRAW);
    }

    #[test]
    fn castling_through_the_game_api() {
        let game = ChessGame::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let game = play(&game, e1, g1);
        assert_eq!(game.state().board.get(f1), Some(WHITE_ROOK));
        assert_eq!(game.history()[0].san, "O-O");
        let game = play(&game, e8, c8);
        assert_eq!(game.state().board.get(d8), Some(BLACK_ROOK));
        assert_eq!(game.history()[1].san, "O-O-O");
    }

    #[test]
    fn outside_verdicts_end_the_game() {
        let game = ChessGame::new().resign(ChessColor::WHITE);
        assert_eq!(game.status(), GameStatus::RESIGNED);
        assert_eq!(game.game_state().winner, Some(ChessColor::BLACK));

        let game = ChessGame::new().flag(ChessColor::BLACK);
        assert_eq!(game.status(), GameStatus::TIMEOUT);
        assert_eq!(game.game_state().winner, Some(ChessColor::WHITE));

        let game = ChessGame::new().agree_draw();
        assert_eq!(game.status(), GameStatus::DRAW_AGREED);
        assert_eq!(game.game_state().winner, None);

        // the first verdict sticks
        let game = game.resign(ChessColor::WHITE);
        assert_eq!(game.status(), GameStatus::DRAW_AGREED);
        assert_eq!(
            game.after_move(MoveRequest::new(e2, e4)).unwrap_err(),
            EngineError::IllegalMove { from: e2, to: e4 }
        );
    }

    #[test]
    fn to_fen_round_trips_through_play() {
        let game = play(&ChessGame::new(), e2, e4);
        assert_eq!(
            game.to_fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
        let resumed = ChessGame::from_fen(&game.to_fen()).unwrap();
        assert_eq!(resumed.state(), game.state());
        assert_eq!(resumed.legal_moves().len(), game.legal_moves().len());
    }
}
