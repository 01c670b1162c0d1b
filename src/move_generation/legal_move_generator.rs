//! Full legal move generation pipeline.
//!
//! Orchestrates per-kind pseudo-legal generation, history-dependent special
//! moves and promotion flags, then filters out self-check outcomes.

use crate::game_state::board::{Board, Piece};
use crate::game_state::chess_types::{CandidateMove, Color};
use crate::game_state::move_history::HistoryView;
use crate::move_generation::legal_move_filter::filter_legal;
use crate::moves::piece_moves::generate_for_piece;
use crate::moves::special_moves::{flag_promotions, generate_special_moves};

/// Legal moves of one piece, special moves included.
pub fn legal_moves_for_piece(board: &Board, history: HistoryView<'_>, piece: &Piece) -> Vec<CandidateMove> {
    if piece.off_board {
        return Vec::new();
    }
    let mut candidates = generate_for_piece(board, piece);
    generate_special_moves(board, history, piece, &mut candidates);
    flag_promotions(piece, &mut candidates);
    filter_legal(board, piece, candidates)
}

/// Legal moves of every live piece of `color`.
pub fn legal_moves_for_side(board: &Board, history: HistoryView<'_>, color: Color) -> Vec<CandidateMove> {
    board
        .active_pieces(color)
        .flat_map(|piece| legal_moves_for_piece(board, history, piece))
        .collect()
}

/// Stops at the first piece with a legal move.
pub fn has_any_legal_move(board: &Board, history: HistoryView<'_>, color: Color) -> bool {
    board
        .active_pieces(color)
        .any(|piece| !legal_moves_for_piece(board, history, piece).is_empty())
}
