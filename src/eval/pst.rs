use once_cell::sync::Lazy;

use crate::board::bitboard::{file_of, rank_of};
use crate::board::position::{Color, PieceType};
use crate::eval::material::MAX_PHASE;

// All tables are written from White's perspective with rank 1 at the top
// row (index 0). Black lookups flip the rank only, never the file.

const PAWN_MG: [i32; 64] = [
     0,   0,   0,   0,   0,   0,   0,   0,
     2,   4,   5,  10,  10,   5,   4,   2,
     4,   8,  12,  16,  16,  12,   8,   4,
     6,  12,  16,  24,  24,  16,  12,   6,
     8,  16,  24,  32,  32,  24,  16,   8,
    12,  24,  36,  48,  48,  36,  24,  12,
     0,   0,   0,   0,   0,   0,   0,   0,
     0,   0,   0,   0,   0,   0,   0,   0,
];

const PAWN_EG: [i32; 64] = [
      0,   0,   0,   0,   0,   0,   0,   0,
     10,  10,  10,  10,  10,  10,  10,  10,
     20,  20,  20,  20,  20,  20,  20,  20,
     30,  30,  30,  30,  30,  30,  30,  30,
     40,  40,  40,  40,  40,  40,  40,  40,
     60,  60,  60,  60,  60,  60,  60,  60,
    100, 100, 100, 100, 100, 100, 100, 100,
      0,   0,   0,   0,   0,   0,   0,   0,
];

const KNIGHT_MG: [i32; 64] = [
    -10,  -8,  -6,  -4,  -4,  -6,  -8, -10,
     -8,   0,   2,   4,   4,   2,   0,  -8,
     -6,   2,   6,   8,   8,   6,   2,  -6,
     -4,   4,   8,  10,  10,   8,   4,  -4,
     -4,   4,   8,  10,  10,   8,   4,  -4,
     -6,   2,   6,   8,   8,   6,   2,  -6,
     -8,   0,   2,   4,   4,   2,   0,  -8,
    -10,  -8,  -6,  -4,  -4,  -6,  -8, -10,
];

const KNIGHT_EG: [i32; 64] = [
    -6,  -4,  -2,   0,   0,  -2,  -4,  -6,
    -4,   0,   2,   4,   4,   2,   0,  -4,
    -2,   2,   4,   6,   6,   4,   2,  -2,
     0,   4,   6,   8,   8,   6,   4,   0,
     0,   4,   6,   8,   8,   6,   4,   0,
    -2,   2,   4,   6,   6,   4,   2,  -2,
    -4,   0,   2,   4,   4,   2,   0,  -4,
    -6,  -4,  -2,   0,   0,  -2,  -4,  -6,
];

const BISHOP_MG: [i32; 64] = [
    -4,  -2,  -2,  -2,  -2,  -2,  -2,  -4,
    -2,   0,   2,   2,   2,   2,   0,  -2,
    -2,   2,   4,   4,   4,   4,   2,  -2,
    -2,   2,   4,   6,   6,   4,   2,  -2,
    -2,   2,   4,   6,   6,   4,   2,  -2,
    -2,   2,   4,   4,   4,   4,   2,  -2,
    -2,   0,   2,   2,   2,   2,   0,  -2,
    -4,  -2,  -2,  -2,  -2,  -2,  -2,  -4,
];

const BISHOP_EG: [i32; 64] = [
    -2,  -1,  -1,  -1,  -1,  -1,  -1,  -2,
    -1,   0,   1,   1,   1,   1,   0,  -1,
    -1,   1,   2,   2,   2,   2,   1,  -1,
    -1,   1,   2,   4,   4,   2,   1,  -1,
    -1,   1,   2,   4,   4,   2,   1,  -1,
    -1,   1,   2,   2,   2,   2,   1,  -1,
    -1,   0,   1,   1,   1,   1,   0,  -1,
    -2,  -1,  -1,  -1,  -1,  -1,  -1,  -2,
];

const ROOK_MG: [i32; 64] = [
    0,   1,   2,   3,   3,   2,   1,   0,
    1,   2,   3,   4,   4,   3,   2,   1,
    0,   0,   0,   0,   0,   0,   0,   0,
    0,   0,   0,   0,   0,   0,   0,   0,
    0,   0,   0,   0,   0,   0,   0,   0,
    0,   0,   0,   0,   0,   0,   0,   0,
    5,   5,   5,   5,   5,   5,   5,   5,
    0,   1,   2,   3,   3,   2,   1,   0,
];

const ROOK_EG: [i32; 64] = [
    -4,  -2,   0,   0,   0,   0,  -2,  -4,
    -2,   0,   2,   2,   2,   2,   0,  -2,
     0,   2,   4,   4,   4,   4,   2,   0,
     0,   2,   4,   6,   6,   4,   2,   0,
     0,   2,   4,   6,   6,   4,   2,   0,
     0,   2,   4,   4,   4,   4,   2,   0,
    -2,   0,   2,   2,   2,   2,   0,  -2,
    -4,  -2,   0,   0,   0,   0,  -2,  -4,
];

const QUEEN_MG: [i32; 64] = [
    -4,  -2,   0,   0,   0,   0,  -2,  -4,
    -2,   0,   2,   2,   2,   2,   0,  -2,
     0,   2,   4,   4,   4,   4,   2,   0,
     0,   2,   4,   6,   6,   4,   2,   0,
     0,   2,   4,   6,   6,   4,   2,   0,
     0,   2,   4,   4,   4,   4,   2,   0,
    -2,   0,   2,   2,   2,   2,   0,  -2,
    -4,  -2,   0,   0,   0,   0,  -2,  -4,
];

const QUEEN_EG: [i32; 64] = [
    -2,  -1,   0,   0,   0,   0,  -1,  -2,
    -1,   0,   1,   1,   1,   1,   0,  -1,
     0,   1,   2,   2,   2,   2,   1,   0,
     0,   1,   2,   4,   4,   2,   1,   0,
     0,   1,   2,   4,   4,   2,   1,   0,
     0,   1,   2,   2,   2,   2,   1,   0,
    -1,   0,   1,   1,   1,   1,   0,  -1,
    -2,  -1,   0,   0,   0,   0,  -1,  -2,
];

const KING_MG: [i32; 64] = [
    -40, -30, -30, -30, -30, -30, -30, -40,
    -30, -20, -10, -10, -10, -10, -20, -30,
    -20, -10,   0,   0,   0,   0, -10, -20,
    -10,   0,   5,   5,   5,   5,   0, -10,
      0,   5,  10,  10,  10,  10,   5,   0,
     -5,   0,   5,  10,  10,   5,   0,  -5,
    -30, -20, -10, -10, -10, -10, -20, -30,
    -50, -40, -30, -30, -30, -30, -40, -50,
];

const KING_EG: [i32; 64] = [
    -6,  -4,  -2,   0,   0,  -2,  -4,  -6,
    -4,   0,   2,   4,   4,   2,   0,  -4,
    -2,   2,   4,   6,   6,   4,   2,  -2,
     0,   4,   6,   8,   8,   6,   4,   0,
     0,   4,   6,   8,   8,   6,   4,   0,
    -2,   2,   4,   6,   6,   4,   2,  -2,
    -4,   0,   2,   4,   4,   2,   0,  -4,
    -6,  -4,  -2,   0,   0,  -2,  -4,  -6,
];

pub struct PieceSquareTables {
    midgame: [[i32; 64]; 6],
    endgame: [[i32; 64]; 6],
}

static TABLES: Lazy<PieceSquareTables> = Lazy::new(|| PieceSquareTables {
    midgame: [PAWN_MG, KNIGHT_MG, BISHOP_MG, ROOK_MG, QUEEN_MG, KING_MG],
    endgame: [PAWN_EG, KNIGHT_EG, BISHOP_EG, ROOK_EG, QUEEN_EG, KING_EG],
});

#[inline(always)]
fn table_square(sq: u8, color: Color) -> usize {
    match color {
        Color::White => sq as usize,
        // Flip the rank only, not the whole square.
        Color::Black => ((7 - rank_of(sq)) * 8 + file_of(sq)) as usize,
    }
}

pub fn midgame_value(piece: PieceType, sq: u8, color: Color) -> i32 {
    TABLES.midgame[piece as usize][table_square(sq, color)]
}

pub fn endgame_value(piece: PieceType, sq: u8, color: Color) -> i32 {
    TABLES.endgame[piece as usize][table_square(sq, color)]
}

/// Linear interpolation between midgame and endgame tables;
/// `phase` runs from 0 (endgame) to 256 (midgame).
pub fn tapered_value(piece: PieceType, sq: u8, color: Color, phase: i32) -> i32 {
    let mg = midgame_value(piece, sq, color);
    let eg = endgame_value(piece, sq, color);
    (mg * phase + eg * (MAX_PHASE - phase)) / MAX_PHASE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::bitboard::algebraic_to_square;

    fn sq(name: &str) -> u8 {
        algebraic_to_square(name).unwrap()
    }

    #[test]
    fn test_black_lookup_mirrors_white() {
        for name in ["a1", "e4", "d6", "h8"] {
            let white_sq = sq(name);
            let mirrored = (7 - rank_of(white_sq)) * 8 + file_of(white_sq);
            for piece in PieceType::ALL {
                assert_eq!(
                    midgame_value(piece, white_sq, Color::White),
                    midgame_value(piece, mirrored, Color::Black)
                );
            }
        }
    }

    #[test]
    fn test_pawn_advancement_rewarded() {
        assert!(
            midgame_value(PieceType::Pawn, sq("d6"), Color::White)
                > midgame_value(PieceType::Pawn, sq("d3"), Color::White)
        );
        assert!(
            endgame_value(PieceType::Pawn, sq("d7"), Color::White)
                > endgame_value(PieceType::Pawn, sq("d2"), Color::White)
        );
    }

    #[test]
    fn test_tapered_endpoints() {
        let square = sq("e1");
        assert_eq!(
            tapered_value(PieceType::King, square, Color::White, MAX_PHASE),
            midgame_value(PieceType::King, square, Color::White)
        );
        assert_eq!(
            tapered_value(PieceType::King, square, Color::White, 0),
            endgame_value(PieceType::King, square, Color::White)
        );
    }

    #[test]
    fn test_tables_left_right_symmetric() {
        for piece in PieceType::ALL {
            for square in 0..64u8 {
                let mirrored = rank_of(square) * 8 + (7 - file_of(square));
                assert_eq!(
                    midgame_value(piece, square, Color::White),
                    midgame_value(piece, mirrored, Color::White)
                );
                assert_eq!(
                    endgame_value(piece, square, Color::White),
                    endgame_value(piece, mirrored, Color::White)
                );
            }
        }
    }

    #[test]
    fn test_knight_center_beats_rim() {
        assert!(
            midgame_value(PieceType::Knight, sq("e4"), Color::White)
                > midgame_value(PieceType::Knight, sq("a1"), Color::White)
        );
    }
}
