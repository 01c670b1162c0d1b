use crate::game_state::board::Board;
use crate::game_state::chess_types::{CandidateMove, Color, Square};

/// Squares a pawn of `color` on `from` attacks, occupied or not.
pub fn pawn_attacks(color: Color, from: Square) -> impl Iterator<Item = Square> {
    [-1i8, 1i8]
        .into_iter()
        .filter_map(move |d_file| from.offset(d_file, color.forward()))
}

/// Single and double pushes plus diagonal captures onto opponents.
///
/// En passant and promotion flags are added by `special_moves`.
pub fn generate_pawn_moves(board: &Board, color: Color, from: Square, out: &mut Vec<CandidateMove>) {
    let forward = color.forward();

    if let Some(one_step) = from.offset(0, forward) {
        if board.is_empty(one_step) {
            out.push(CandidateMove::quiet(from, one_step));

            if from.rank() == color.pawn_rank() {
                if let Some(two_step) = from.offset(0, 2 * forward) {
                    if board.is_empty(two_step) {
                        out.push(CandidateMove::quiet(from, two_step));
                    }
                }
            }
        }
    }

    for to in pawn_attacks(color, from) {
        if matches!(board.color_at(to), Some(owner) if owner != color) {
            out.push(CandidateMove::capture(from, to));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_types::PieceKind;

    fn sq(file: u8, rank: u8) -> Square {
        Square::new(file, rank).expect("test square should be on the board")
    }

    #[test]
    fn start_rank_pawn_has_single_and_double_push() {
        let board = Board::new_game();
        let mut out = Vec::new();
        generate_pawn_moves(&board, Color::Light, sq(4, 1), &mut out);
        let targets: Vec<Square> = out.iter().map(|m| m.to).collect();
        assert_eq!(targets, vec![sq(4, 2), sq(4, 3)]);
    }

    #[test]
    fn blocked_pawn_cannot_jump() {
        let mut board = Board::new_game();
        board
            .spawn(Color::Dark, PieceKind::Knight, sq(4, 2))
            .expect("e3 empty");
        let mut out = Vec::new();
        generate_pawn_moves(&board, Color::Light, sq(4, 1), &mut out);
        let targets: Vec<Square> = out.iter().map(|m| m.to).collect();
        assert_eq!(targets, vec![sq(3, 2), sq(5, 2)]);
        assert!(out.iter().all(|m| m.is_capture()));
    }

    #[test]
    fn dark_pawns_move_down_and_capture_only_opponents() {
        let mut board = Board::new_empty();
        board.spawn(Color::Dark, PieceKind::Pawn, sq(3, 4)).expect("d5 empty");
        board.spawn(Color::Light, PieceKind::Pawn, sq(2, 3)).expect("c4 empty");
        board.spawn(Color::Dark, PieceKind::Pawn, sq(4, 3)).expect("e4 empty");
        let mut out = Vec::new();
        generate_pawn_moves(&board, Color::Dark, sq(3, 4), &mut out);
        let targets: Vec<Square> = out.iter().map(|m| m.to).collect();
        assert_eq!(targets, vec![sq(3, 3), sq(2, 3)]);
    }
}
