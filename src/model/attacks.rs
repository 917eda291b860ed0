//! Precomputed per-square reachability tables.
//!
//! Built once behind a [`LazyLock`] and shared read-only by every
//! query thereafter; nothing here depends on a particular board.
//! Sliding rays are truncated at the board edge only; occupancy is
//! applied at query time, so the same table serves any position.

use std::sync::LazyLock;

use strum::VariantArray;

use crate::model::{Compass, Square};

/// The process-wide tables. Safe to share across any number of
/// concurrently evaluated games; never mutated after construction.
pub static TABLES: LazyLock<AttackTables> = LazyLock::new(AttackTables::build);

/// For each origin square: the non-sliding neighbor sets of king and
/// knight, clipped to the board, and the eight sliding rays as
/// ordered lists of squares walking outward from the origin.
#[derive(Debug)]
pub struct AttackTables {
    king: [Vec<Square>; 64],
    knight: [Vec<Square>; 64],
    rays: [[Vec<Square>; 8]; 64],
}

const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (-2, -1), (-2, 1), (-1, -2), (-1, 2),
    (1, -2), (1, 2), (2, -1), (2, 1),
];

impl AttackTables {
    fn build() -> Self {
        Self {
            king: std::array::from_fn(|ix| {
                let sq = Square::from_u8(ix as u8);
                Compass::VARIANTS
                    .iter()
                    .filter_map(|d| {
                        let (dr, dc) = d.delta();
                        sq.offset(dr, dc)
                    })
                    .collect()
            }),
            knight: std::array::from_fn(|ix| {
                let sq = Square::from_u8(ix as u8);
                KNIGHT_DELTAS
                    .iter()
                    .filter_map(|&(dr, dc)| sq.offset(dr, dc))
                    .collect()
            }),
            rays: std::array::from_fn(|ix| {
                let sq = Square::from_u8(ix as u8);
                std::array::from_fn(|d| ray(sq, Compass::VARIANTS[d]))
            }),
        }
    }

    /// King neighbor squares.
    #[inline]
    pub fn king_moves(&self, sq: Square) -> &[Square] {
        &self.king[sq.ix()]
    }

    /// Knight target squares.
    #[inline]
    pub fn knight_moves(&self, sq: Square) -> &[Square] {
        &self.knight[sq.ix()]
    }

    /// The ray walking outward from `sq` in `dir`, edge-truncated.
    #[inline]
    pub fn ray(&self, sq: Square, dir: Compass) -> &[Square] {
        &self.rays[sq.ix()][dir.ix()]
    }

    /// The rays a bishop standing on `sq` slides along.
    pub fn bishop_rays(&self, sq: Square) -> impl Iterator<Item = &[Square]> {
        self.slider_rays(sq, Compass::is_diagonal)
    }

    /// The rays a rook standing on `sq` slides along.
    pub fn rook_rays(&self, sq: Square) -> impl Iterator<Item = &[Square]> {
        self.slider_rays(sq, Compass::is_orthogonal)
    }

    /// All eight rays, for queens.
    pub fn queen_rays(&self, sq: Square) -> impl Iterator<Item = &[Square]> {
        self.slider_rays(sq, |_| true)
    }

    fn slider_rays(
        &self,
        sq: Square,
        keep: impl Fn(Compass) -> bool,
    ) -> impl Iterator<Item = &[Square]> {
        Compass::VARIANTS
            .iter()
            .filter(move |d| keep(**d))
            .map(move |d| self.ray(sq, *d))
    }
}

fn ray(origin: Square, dir: Compass) -> Vec<Square> {
    let (dr, dc) = dir.delta();
    let mut out = Vec::new();
    let mut here = origin;
    while let Some(next) = here.offset(dr, dc) {
        out.push(next);
        here = next;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Square::*;

    #[test]
    fn corner_knight_and_king() {
        let t = &*TABLES;
        assert_eq!(t.knight_moves(a8).len(), 2);
        assert_eq!(t.king_moves(a8).len(), 3);
        assert_eq!(t.knight_moves(e4).len(), 8);
        assert_eq!(t.king_moves(e4).len(), 8);
    }

    #[test]
    fn rays_walk_outward_to_the_edge() {
        let t = &*TABLES;
        assert_eq!(t.ray(a1, Compass::NORTH), [a2, a3, a4, a5, a6, a7, a8]);
        assert_eq!(t.ray(a1, Compass::NORTHEAST), [b2, c3, d4, e5, f6, g7, h8]);
        assert!(t.ray(a1, Compass::SOUTH).is_empty());
        assert_eq!(t.ray(e4, Compass::EAST), [f4, g4, h4]);
    }

    #[test]
    fn every_square_sees_twentyseven_queen_squares_or_fewer() {
        let t = &*TABLES;
        for ix in 0..64u8 {
            let sq = Square::from_u8(ix);
            let total: usize = t.queen_rays(sq).map(<[Square]>::len).sum();
            assert!((21..=27).contains(&total), "queen reach from {sq:?} was {total}");
        }
    }
}
