//! Per-kind pseudo-legal generation behind one exhaustive dispatch.

use crate::game_state::board::{Board, Piece};
use crate::game_state::chess_types::{CandidateMove, Color, PieceKind, Square};
use crate::moves::king_moves::generate_king_moves;
use crate::moves::knight_moves::generate_knight_moves;
use crate::moves::pawn_moves::generate_pawn_moves;
use crate::moves::sliding_moves::{generate_bishop_moves, generate_queen_moves, generate_rook_moves};

/// Pseudo-legal destinations of a `kind` piece of `color` on `from`.
///
/// Ignores whether the move exposes the mover's king and never yields a
/// square held by a friendly piece.
pub fn generate_into(
    kind: PieceKind,
    color: Color,
    from: Square,
    board: &Board,
    out: &mut Vec<CandidateMove>,
) {
    match kind {
        PieceKind::Pawn => generate_pawn_moves(board, color, from, out),
        PieceKind::Knight => generate_knight_moves(board, color, from, out),
        PieceKind::Bishop => generate_bishop_moves(board, color, from, out),
        PieceKind::Rook => generate_rook_moves(board, color, from, out),
        PieceKind::Queen => generate_queen_moves(board, color, from, out),
        PieceKind::King => generate_king_moves(board, color, from, out),
    }
}

pub fn generate(kind: PieceKind, color: Color, from: Square, board: &Board) -> Vec<CandidateMove> {
    let mut out = Vec::with_capacity(16);
    generate_into(kind, color, from, board, &mut out);
    out
}

#[inline]
pub fn generate_for_piece(board: &Board, piece: &Piece) -> Vec<CandidateMove> {
    generate(piece.kind, piece.color, piece.square, board)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_position_has_twenty_pseudo_legal_moves_per_side() {
        let board = Board::new_game();
        for color in [Color::Light, Color::Dark] {
            let total: usize = board
                .active_pieces(color)
                .map(|p| generate_for_piece(&board, p).len())
                .sum();
            assert_eq!(total, 20);
        }
    }

    #[test]
    fn generation_never_targets_friendly_squares() {
        let board = Board::new_game();
        for color in [Color::Light, Color::Dark] {
            for piece in board.active_pieces(color) {
                for mv in generate_for_piece(&board, piece) {
                    assert_ne!(board.color_at(mv.to), Some(color));
                }
            }
        }
    }
}
