//! A standalone chess rules engine.
//!
//! The engine owns board representation, legal-move generation,
//! check/checkmate/draw determination, castling-rights bookkeeping,
//! and SAN/FEN notation. It knows nothing about rooms, sockets,
//! players, or clocks: it receives a position and a move and returns
//! a new position.
//!
//! Every value handed out is immutable; advancing a game produces a
//! brand-new [`ChessGame`](model::game::ChessGame) and leaves the old
//! one untouched.

/// Modeling the game of chess.
pub mod model;

/// Reading and writing chess notation.
pub mod notation;

pub use model::{
    ChessColor, ChessMan, ChessMove, ChessPiece, EngineError, GameState, GameStatus, InputError,
    MoveKind, MoveRequest, Square, game::ChessGame,
};
