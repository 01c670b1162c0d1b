use crate::game_state::board::Board;
use crate::game_state::chess_types::{CandidateMove, Color, Square};

pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// Adds every on-board offset square that is empty or holds an opponent.
pub fn step_moves(
    board: &Board,
    color: Color,
    from: Square,
    offsets: &[(i8, i8)],
    out: &mut Vec<CandidateMove>,
) {
    for &(d_file, d_rank) in offsets {
        let Some(to) = from.offset(d_file, d_rank) else {
            continue;
        };
        match board.color_at(to) {
            None => out.push(CandidateMove::quiet(from, to)),
            Some(owner) if owner != color => out.push(CandidateMove::capture(from, to)),
            Some(_) => {}
        }
    }
}

#[inline]
pub fn generate_knight_moves(board: &Board, color: Color, from: Square, out: &mut Vec<CandidateMove>) {
    step_moves(board, color, from, &KNIGHT_OFFSETS, out);
}
