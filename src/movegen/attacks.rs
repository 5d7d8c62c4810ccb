use once_cell::sync::Lazy;

use crate::board::bitboard::{
    file_of, rank_of, shift_east, shift_north, shift_northeast, shift_northwest, shift_south,
    shift_southeast, shift_southwest, shift_west, square_mask, Bitboard, EMPTY,
};
use crate::board::position::Color;

pub struct AttackTables {
    pub knight: [Bitboard; 64],
    pub king: [Bitboard; 64],
    pub pawn: [[Bitboard; 64]; 2],
}

static TABLES: Lazy<AttackTables> = Lazy::new(|| {
    let mut knight = [EMPTY; 64];
    let mut king = [EMPTY; 64];
    let mut pawn = [[EMPTY; 64]; 2];

    for square in 0..64u8 {
        knight[square as usize] = compute_knight_attacks(square);
        king[square as usize] = compute_king_attacks(square);
        pawn[Color::White as usize][square as usize] = compute_pawn_attacks(square, Color::White);
        pawn[Color::Black as usize][square as usize] = compute_pawn_attacks(square, Color::Black);
    }

    AttackTables { knight, king, pawn }
});

fn compute_knight_attacks(square: u8) -> Bitboard {
    const KNIGHT_DELTAS: [(i8, i8); 8] = [
        (-2, -1),
        (-2, 1),
        (-1, -2),
        (-1, 2),
        (1, -2),
        (1, 2),
        (2, -1),
        (2, 1),
    ];

    let rank = rank_of(square) as i8;
    let file = file_of(square) as i8;
    let mut attacks = EMPTY;

    for &(dr, df) in &KNIGHT_DELTAS {
        let r = rank + dr;
        let f = file + df;
        if ((r | f) & !7) == 0 {
            attacks |= 1u64 << ((r << 3) | f);
        }
    }

    attacks
}

fn compute_king_attacks(square: u8) -> Bitboard {
    let bb = square_mask(square);
    shift_north(bb)
        | shift_south(bb)
        | shift_east(bb)
        | shift_west(bb)
        | shift_northeast(bb)
        | shift_northwest(bb)
        | shift_southeast(bb)
        | shift_southwest(bb)
}

fn compute_pawn_attacks(square: u8, color: Color) -> Bitboard {
    let bb = square_mask(square);
    match color {
        Color::White => shift_northwest(bb) | shift_northeast(bb),
        Color::Black => shift_southwest(bb) | shift_southeast(bb),
    }
}

#[inline(always)]
pub fn knight_attacks(square: u8) -> Bitboard {
    TABLES.knight[(square & 63) as usize]
}

#[inline(always)]
pub fn king_attacks(square: u8) -> Bitboard {
    TABLES.king[(square & 63) as usize]
}

/// Squares a pawn of `color` standing on `square` attacks.
#[inline(always)]
pub fn pawn_attacks(color: Color, square: u8) -> Bitboard {
    TABLES.pawn[color as usize][(square & 63) as usize]
}

/// Rook attacks computed by walking each rank/file ray until the first
/// blocker in `occupancy`. The blocker square is included; the caller
/// filters own-color pieces.
pub fn rook_attacks(square: u8, occupancy: Bitboard) -> Bitboard {
    let rank = rank_of(square) as i8;
    let file = file_of(square) as i8;
    let mut attacks = EMPTY;

    for &(dr, df) in &[(1i8, 0i8), (-1, 0), (0, 1), (0, -1)] {
        let mut r = rank + dr;
        let mut f = file + df;
        while (0..8).contains(&r) && (0..8).contains(&f) {
            let target = 1u64 << ((r << 3) | f);
            attacks |= target;
            if occupancy & target != 0 {
                break;
            }
            r += dr;
            f += df;
        }
    }

    attacks
}

/// Bishop attacks along the four diagonals, blocker-inclusive like
/// `rook_attacks`.
pub fn bishop_attacks(square: u8, occupancy: Bitboard) -> Bitboard {
    let rank = rank_of(square) as i8;
    let file = file_of(square) as i8;
    let mut attacks = EMPTY;

    for &(dr, df) in &[(1i8, 1i8), (1, -1), (-1, 1), (-1, -1)] {
        let mut r = rank + dr;
        let mut f = file + df;
        while (0..8).contains(&r) && (0..8).contains(&f) {
            let target = 1u64 << ((r << 3) | f);
            attacks |= target;
            if occupancy & target != 0 {
                break;
            }
            r += dr;
            f += df;
        }
    }

    attacks
}

#[inline(always)]
pub fn queen_attacks(square: u8, occupancy: Bitboard) -> Bitboard {
    rook_attacks(square, occupancy) | bishop_attacks(square, occupancy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::bitboard::popcount;

    #[test]
    fn test_knight_attack_counts() {
        assert_eq!(popcount(knight_attacks(0)), 2); // a1
        assert_eq!(popcount(knight_attacks(1)), 3); // b1
        assert_eq!(popcount(knight_attacks(28)), 8); // e4
        assert_eq!(popcount(knight_attacks(63)), 2); // h8
    }

    #[test]
    fn test_king_attack_counts() {
        assert_eq!(popcount(king_attacks(0)), 3); // a1
        assert_eq!(popcount(king_attacks(4)), 5); // e1
        assert_eq!(popcount(king_attacks(28)), 8); // e4
    }

    #[test]
    fn test_pawn_attacks_edges() {
        // a2 white pawn attacks only b3.
        assert_eq!(pawn_attacks(Color::White, 8), square_mask(17));
        // h7 black pawn attacks only g6.
        assert_eq!(pawn_attacks(Color::Black, 55), square_mask(46));
        // e4 white pawn attacks d5 and f5.
        assert_eq!(
            pawn_attacks(Color::White, 28),
            square_mask(35) | square_mask(37)
        );
        // Rank-8 white pawns and rank-1 black pawns attack nothing.
        assert_eq!(pawn_attacks(Color::White, 60), EMPTY);
        assert_eq!(pawn_attacks(Color::Black, 4), EMPTY);
    }

    #[test]
    fn test_rook_attacks_empty_board() {
        assert_eq!(popcount(rook_attacks(28, EMPTY)), 14);
        assert_eq!(popcount(rook_attacks(0, EMPTY)), 14);
    }

    #[test]
    fn test_rook_attacks_blocker_included() {
        // Blocker on e6 stops the north ray; e6 itself stays in the mask.
        let occupancy = square_mask(44);
        let attacks = rook_attacks(28, occupancy);
        assert!(attacks & square_mask(44) != 0);
        assert!(attacks & square_mask(52) == 0);
    }

    #[test]
    fn test_bishop_attacks_corner() {
        assert_eq!(popcount(bishop_attacks(0, EMPTY)), 7);
        let occupancy = square_mask(27); // d4 blocks the a1 diagonal
        let attacks = bishop_attacks(0, occupancy);
        assert!(attacks & square_mask(27) != 0);
        assert!(attacks & square_mask(36) == 0);
    }

    #[test]
    fn test_queen_is_rook_plus_bishop() {
        let occupancy = square_mask(44) | square_mask(37);
        assert_eq!(
            queen_attacks(28, occupancy),
            rook_attacks(28, occupancy) | bishop_attacks(28, occupancy)
        );
    }
}
