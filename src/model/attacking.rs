//! Square and king attack queries over a board snapshot.

use strum::VariantArray;

use crate::model::{
    ChessColor, ChessMan, ChessPiece, Compass, Square, attacks::TABLES, mailbox::Mailbox,
};

/// Whether any man of `by` attacks `sq` on this board.
///
/// Pawns are probed on their two backward-diagonal origin squares,
/// knights and kings through the precomputed neighbor sets, and
/// sliders by walking each ray until its first occupant: a matching
/// slider or queen of `by` attacks, anything else blocks the ray.
pub fn is_square_attacked(board: &Mailbox, sq: Square, by: ChessColor) -> bool {
    let tables = &*TABLES;

    // A white pawn attacks from the row below (greater row index),
    // a black pawn from the row above.
    let pawn = ChessMan::new(by, ChessPiece::PAWN);
    let dr = by.sign();
    for dc in [-1, 1] {
        if let Some(origin) = sq.offset(dr, dc)
            && board.get(origin) == Some(pawn)
        {
            return true;
        }
    }

    let knight = ChessMan::new(by, ChessPiece::KNIGHT);
    if tables.knight_moves(sq).iter().any(|&o| board.get(o) == Some(knight)) {
        return true;
    }

    let king = ChessMan::new(by, ChessPiece::KING);
    if tables.king_moves(sq).iter().any(|&o| board.get(o) == Some(king)) {
        return true;
    }

    for &dir in Compass::VARIANTS {
        for &o in tables.ray(sq, dir) {
            let Some(man) = board.get(o) else { continue };
            if man.color() == by {
                let piece = man.piece();
                if piece == ChessPiece::QUEEN
                    || piece == if dir.is_diagonal() { ChessPiece::BISHOP } else { ChessPiece::ROOK }
                {
                    return true;
                }
            }
            break;
        }
    }

    false
}

/// Whether `color`'s king stands in check.
pub fn is_king_in_check(board: &Mailbox, color: ChessColor) -> bool {
    match board.find_king(color) {
        Some(sq) => is_square_attacked(board, sq, color.opp()),
        None => false,
    }
}
