//! Castling rights bookkeeping and same-move-cycle legality.

use crate::model::{
    CastleRights, CastlingSide, ChessColor, ChessMan, ChessMove, ChessPiece, Square,
    attacking::{is_king_in_check, is_square_attacked},
    mailbox::Mailbox,
};

/// The fixed geometry of one castling move: who goes where, which
/// squares must be empty, and which squares must be safe for the
/// king to cross or land on.
#[derive(Debug)]
pub struct CastlePlan {
    pub side: CastlingSide,
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    pub path: &'static [Square],
    pub safety: &'static [Square],
}

/// Indexed first by [`ChessColor`], then by [`CastlingSide`].
pub const PLANS: [[CastlePlan; 2]; 2] = {
    use Square::*;
    [
        [
            CastlePlan {
                side: CastlingSide::SHORT,
                king_from: e1,
                king_to: g1,
                rook_from: h1,
                rook_to: f1,
                path: &[f1, g1],
                safety: &[f1, g1],
            },
            CastlePlan {
                side: CastlingSide::LONG,
                king_from: e1,
                king_to: c1,
                rook_from: a1,
                rook_to: d1,
                path: &[d1, c1, b1],
                safety: &[d1, c1],
            },
        ],
        [
            CastlePlan {
                side: CastlingSide::SHORT,
                king_from: e8,
                king_to: g8,
                rook_from: h8,
                rook_to: f8,
                path: &[f8, g8],
                safety: &[f8, g8],
            },
            CastlePlan {
                side: CastlingSide::LONG,
                king_from: e8,
                king_to: c8,
                rook_from: a8,
                rook_to: d8,
                path: &[d8, c8, b8],
                safety: &[d8, c8],
            },
        ],
    ]
};

#[inline]
pub fn plan(color: ChessColor, side: CastlingSide) -> &'static CastlePlan {
    &PLANS[color.ix()][side.ix()]
}

/// Both sides for both colors.
#[inline]
pub fn initial_rights() -> [CastleRights; 2] {
    [CastleRights::BOTH; 2]
}

/// The rights left standing after `mv` is played.
///
/// A king move forfeits both of the mover's rights. A rook moving
/// off its home square forfeits that side only; rooks moving from
/// anywhere else (a promoted rook, say) are inert. A capture landing
/// exactly on an opponent rook's home square strips that opponent
/// side, whatever the capturing man is.
pub fn rights_after(mut rights: [CastleRights; 2], mv: &ChessMove) -> [CastleRights; 2] {
    let mover = mv.man.color();

    if mv.man.piece() == ChessPiece::KING {
        rights[mover.ix()] = CastleRights::NONE;
    }

    for side in [CastlingSide::SHORT, CastlingSide::LONG] {
        if mv.man.piece() == ChessPiece::ROOK && mv.from == plan(mover, side).rook_from {
            rights[mover.ix()].revoke(side);
        }
        if mv.kind.takes() && mv.to == plan(mover.opp(), side).rook_from {
            rights[mover.opp().ix()].revoke(side);
        }
    }

    rights
}

/// Which castling moves `color` may play right now.
///
/// Shortcuts to nothing when the rights are already gone or the king
/// stands in check; otherwise a side is granted when its path is
/// empty, its transit and landing squares are not attacked by the
/// enemy, and the rook is physically home.
pub fn legality(color: ChessColor, board: &Mailbox, rights: CastleRights) -> CastleRights {
    if !rights.any() || is_king_in_check(board, color) {
        return CastleRights::NONE;
    }

    let rook = ChessMan::new(color, ChessPiece::ROOK);
    let mut granted = CastleRights::NONE;
    for side in [CastlingSide::SHORT, CastlingSide::LONG] {
        if !rights.allows(side) {
            continue;
        }
        let plan = plan(color, side);
        let clear = plan.path.iter().all(|&sq| board.get(sq).is_none());
        let safe = plan
            .safety
            .iter()
            .all(|&sq| !is_square_attacked(board, sq, color.opp()));
        if clear && safe && board.get(plan.rook_from) == Some(rook) {
            granted.grant(side);
        }
    }
    granted
}
