use crate::board::bitboard::iter_bits;
use crate::board::position::{Board, Color, PieceType, Position};
use crate::eval::material::{game_phase, piece_value};
use crate::eval::pst::tapered_value;

pub type Score = i32;

/// Mate score magnitude; actual mate scores are offset by the ply distance
/// so shorter mates score higher.
pub const CHECKMATE: Score = 32_700;
pub const DRAW_SCORE: Score = 0;

/// Material plus tapered piece-square value, from White's perspective.
pub fn evaluate_white(pos: &Position) -> Score {
    let phase = game_phase(pos);
    let mut score = 0;

    for color in [Color::White, Color::Black] {
        let sign = if color == Color::White { 1 } else { -1 };
        for piece in PieceType::ALL {
            for sq in iter_bits(pos.pieces(color, piece)) {
                score += sign * (piece_value(piece) + tapered_value(piece, sq, color, phase));
            }
        }
    }

    score
}

/// Static evaluation relative to the side to move (negamax convention).
/// No terminal detection; quiescence stand-pat uses this directly.
#[inline(always)]
pub fn evaluate_static(pos: &Position) -> Score {
    let white = evaluate_white(pos);
    if pos.side_to_move == Color::White {
        white
    } else {
        -white
    }
}

/// Raw material for one color, positional factors excluded.
pub fn material_count(pos: &Position, color: Color) -> Score {
    let mut total = 0;
    for piece in PieceType::ALL {
        total += piece_value(piece) * iter_bits(pos.pieces(color, piece)).count() as Score;
    }
    total
}

/// Material balance from the side to move's point of view.
pub fn material_balance(pos: &Position) -> Score {
    let us = material_count(pos, pos.side_to_move);
    let them = material_count(pos, pos.side_to_move.opposite());
    us - them
}

/// Full evaluation with terminal overrides: a mated side scores
/// `-CHECKMATE`, any draw scores zero.
pub fn evaluate(board: &mut Board) -> Score {
    if board.is_checkmate() {
        return -CHECKMATE;
    }
    if board.is_draw() {
        return DRAW_SCORE;
    }
    evaluate_static(board.position())
}
