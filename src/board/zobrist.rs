use once_cell::sync::Lazy;

use crate::board::bitboard::{file_of, iter_bits, INVALID_SQUARE};
use crate::board::position::{Color, Move, MoveFlag, PieceType, Position};

pub struct ZobristKeys {
    pub pieces: [[u64; 64]; 12],
    pub castling: [u64; 16],
    pub en_passant: [u64; 8],
    pub side_to_move: u64,
}

/// Key tables are seeded with a fixed constant so identical positions hash
/// identically across runs and processes.
const ZOBRIST_SEED: u64 = 0x1234_5678_90AB_CDEF;

static KEYS: Lazy<ZobristKeys> = Lazy::new(|| {
    let mut rng = XorShiftRng::new(ZOBRIST_SEED);

    let mut pieces = [[0u64; 64]; 12];
    for table in pieces.iter_mut() {
        for key in table.iter_mut() {
            *key = rng.next();
        }
    }

    let mut castling = [0u64; 16];
    for key in castling.iter_mut() {
        *key = rng.next();
    }

    let mut en_passant = [0u64; 8];
    for key in en_passant.iter_mut() {
        *key = rng.next();
    }

    ZobristKeys {
        pieces,
        castling,
        en_passant,
        side_to_move: rng.next(),
    }
});

struct XorShiftRng {
    state: u64,
}

impl XorShiftRng {
    const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }
}

/// Key table index for a colored piece: White pieces occupy 0..6,
/// Black 6..12.
#[inline(always)]
pub const fn piece_index(color: Color, piece: PieceType) -> usize {
    color as usize * 6 + piece as usize
}

#[inline(always)]
pub fn piece_key(color: Color, piece: PieceType, square: u8) -> u64 {
    KEYS.pieces[piece_index(color, piece)][square as usize]
}

#[inline(always)]
pub fn castling_key(rights: u8) -> u64 {
    KEYS.castling[(rights & 0xF) as usize]
}

#[inline(always)]
pub fn en_passant_key(square: u8) -> u64 {
    KEYS.en_passant[file_of(square) as usize]
}

#[inline(always)]
pub fn side_to_move_key() -> u64 {
    KEYS.side_to_move
}

/// Full recomputation from scratch. `update` must always agree with this.
pub fn compute(position: &Position) -> u64 {
    let mut hash = 0u64;

    for color in [Color::White, Color::Black] {
        for piece in PieceType::ALL {
            for square in iter_bits(position.pieces(color, piece)) {
                hash ^= piece_key(color, piece, square);
            }
        }
    }

    hash ^= castling_key(position.castle_rights);

    // Only the en-passant file is hashed, not the rank.
    if position.en_passant_square != INVALID_SQUARE {
        hash ^= en_passant_key(position.en_passant_square);
    }

    if position.side_to_move == Color::Black {
        hash ^= side_to_move_key();
    }

    hash
}

/// Incremental update for one applied move. Applies only the deltas between
/// the pre-move and post-move positions.
#[allow(clippy::too_many_arguments)]
pub fn update(
    mut hash: u64,
    mv: Move,
    moved: (Color, PieceType),
    captured: Option<(Color, PieceType)>,
    old_castle_rights: u8,
    new_castle_rights: u8,
    old_en_passant: u8,
    new_en_passant: u8,
) -> u64 {
    let (color, piece) = moved;

    hash ^= piece_key(color, piece, mv.from());

    if mv.flag() == MoveFlag::Promotion {
        let promoted = mv.promotion().unwrap_or(PieceType::Queen);
        hash ^= piece_key(color, promoted, mv.to());
    } else {
        hash ^= piece_key(color, piece, mv.to());
    }

    if let Some((captured_color, captured_piece)) = captured {
        hash ^= piece_key(captured_color, captured_piece, mv.to());
    }

    if mv.flag() == MoveFlag::EnPassant {
        let captured_square = match color {
            Color::White => mv.to() - 8,
            Color::Black => mv.to() + 8,
        };
        hash ^= piece_key(color.opposite(), PieceType::Pawn, captured_square);
    }

    if mv.flag() == MoveFlag::Castling {
        let (rook_from, rook_to) = match mv.to() {
            6 => (7u8, 5u8),    // g1: h1 -> f1
            2 => (0, 3),        // c1: a1 -> d1
            62 => (63, 61),     // g8: h8 -> f8
            _ => (56, 59),      // c8: a8 -> d8
        };
        hash ^= piece_key(color, PieceType::Rook, rook_from);
        hash ^= piece_key(color, PieceType::Rook, rook_to);
    }

    if old_castle_rights != new_castle_rights {
        hash ^= castling_key(old_castle_rights);
        hash ^= castling_key(new_castle_rights);
    }

    if old_en_passant != new_en_passant {
        if old_en_passant != INVALID_SQUARE {
            hash ^= en_passant_key(old_en_passant);
        }
        if new_en_passant != INVALID_SQUARE {
            hash ^= en_passant_key(new_en_passant);
        }
    }

    // Side to move always flips.
    hash ^= side_to_move_key();

    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_deterministic() {
        assert_eq!(
            piece_key(Color::White, PieceType::Pawn, 12),
            piece_key(Color::White, PieceType::Pawn, 12)
        );
        assert_ne!(
            piece_key(Color::White, PieceType::Pawn, 12),
            piece_key(Color::Black, PieceType::Pawn, 12)
        );
        assert_ne!(castling_key(0b1111), castling_key(0b0111));
    }

    #[test]
    fn test_piece_index_layout() {
        assert_eq!(piece_index(Color::White, PieceType::Pawn), 0);
        assert_eq!(piece_index(Color::White, PieceType::King), 5);
        assert_eq!(piece_index(Color::Black, PieceType::Pawn), 6);
        assert_eq!(piece_index(Color::Black, PieceType::King), 11);
    }

    #[test]
    fn test_en_passant_hashed_by_file_only() {
        // e3 (sq 20) and e6 (sq 44) share a file and must share a key.
        assert_eq!(en_passant_key(20), en_passant_key(44));
        assert_ne!(en_passant_key(20), en_passant_key(21));
    }

    #[test]
    fn test_keys_nonzero_and_distinct() {
        let mut seen = std::collections::HashSet::new();
        for color in [Color::White, Color::Black] {
            for piece in PieceType::ALL {
                for square in 0..64u8 {
                    let key = piece_key(color, piece, square);
                    assert_ne!(key, 0);
                    assert!(seen.insert(key));
                }
            }
        }
    }
}
