use crate::game_state::board::Board;
use crate::game_state::chess_types::{CandidateMove, Color, Square};
use crate::moves::knight_moves::step_moves;

pub const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 1),
    (1, 0),
    (1, -1),
    (0, 1),
    (0, -1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// One-square king steps. Castling lives in `special_moves`; safety is the
/// legality filter's job.
#[inline]
pub fn generate_king_moves(board: &Board, color: Color, from: Square, out: &mut Vec<CandidateMove>) {
    step_moves(board, color, from, &KING_OFFSETS, out);
}
