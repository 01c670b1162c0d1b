//! Bishop, rook and queen rays.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{CandidateMove, Color, Square};

pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Walks each direction one square at a time. Empty squares are added; the
/// first opposing piece is added as a capture and ends the ray; a friendly
/// piece ends the ray without being added.
pub fn slide_moves(
    board: &Board,
    color: Color,
    from: Square,
    directions: &[(i8, i8)],
    out: &mut Vec<CandidateMove>,
) {
    for &(d_file, d_rank) in directions {
        let mut cursor = from;
        while let Some(to) = cursor.offset(d_file, d_rank) {
            match board.color_at(to) {
                None => out.push(CandidateMove::quiet(from, to)),
                Some(owner) if owner != color => {
                    out.push(CandidateMove::capture(from, to));
                    break;
                }
                Some(_) => break,
            }
            cursor = to;
        }
    }
}

#[inline]
pub fn generate_bishop_moves(board: &Board, color: Color, from: Square, out: &mut Vec<CandidateMove>) {
    slide_moves(board, color, from, &BISHOP_DIRECTIONS, out);
}

#[inline]
pub fn generate_rook_moves(board: &Board, color: Color, from: Square, out: &mut Vec<CandidateMove>) {
    slide_moves(board, color, from, &ROOK_DIRECTIONS, out);
}

#[inline]
pub fn generate_queen_moves(board: &Board, color: Color, from: Square, out: &mut Vec<CandidateMove>) {
    slide_moves(board, color, from, &ROOK_DIRECTIONS, out);
    slide_moves(board, color, from, &BISHOP_DIRECTIONS, out);
}
