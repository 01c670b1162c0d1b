//! Removes candidates that would leave the mover's own king attacked.
//!
//! Each candidate is played on a private copy of the board; the copy is
//! dropped before the next candidate is examined and never escapes this
//! module.

use crate::game_state::board::{Board, Piece};
use crate::game_state::chess_rules::{castle_rook_target, rook_home};
use crate::game_state::chess_types::{CandidateMove, PieceKind, SpecialMove};
use crate::move_generation::attacks::attacked_squares;

/// The subset of `candidates` for `piece` that keeps its king safe.
pub fn filter_legal(board: &Board, piece: &Piece, candidates: Vec<CandidateMove>) -> Vec<CandidateMove> {
    candidates
        .into_iter()
        .filter(|candidate| keeps_king_safe(board, piece, candidate))
        .collect()
}

/// Plays `candidate` on a scratch board and checks the king's square against
/// every opposing piece left on it.
pub fn keeps_king_safe(board: &Board, piece: &Piece, candidate: &CandidateMove) -> bool {
    let king_square = if piece.kind == PieceKind::King {
        candidate.to
    } else {
        match board.king_square(piece.color) {
            Some(square) => square,
            // Kingless setups have nothing to expose.
            None => return true,
        }
    };

    let scratch = scratch_after(board, piece, candidate);
    attacked_squares(&scratch, piece.color.opposite()) & king_square.mask() == 0
}

fn scratch_after(board: &Board, piece: &Piece, candidate: &CandidateMove) -> Board {
    let mut scratch = board.clone();

    if let Some(victim) = candidate.capture.and_then(|square| scratch.id_at(square)) {
        scratch.take_off(victim);
    }
    scratch.relocate(piece.id, candidate.to);

    match candidate.special {
        SpecialMove::Castle(side) => {
            if let Some(rook) = scratch.id_at(rook_home(piece.color, side)) {
                scratch.relocate(rook, castle_rook_target(piece.color, side));
            }
        }
        // The replacement kind is unknown yet; a queen blocks every line a
        // pawn or any other choice would block.
        SpecialMove::Promotion => scratch.set_kind(piece.id, PieceKind::Queen),
        SpecialMove::None | SpecialMove::EnPassant => {}
    }

    scratch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_types::{Color, Square};
    use crate::moves::piece_moves::generate_for_piece;

    fn sq(file: u8, rank: u8) -> Square {
        Square::new(file, rank).expect("test square should be on the board")
    }

    #[test]
    fn pinned_rook_only_slides_along_the_pin() {
        let mut board = Board::new_empty();
        board.spawn(Color::Light, PieceKind::King, sq(4, 0)).expect("e1 empty");
        let rook = board.spawn(Color::Light, PieceKind::Rook, sq(4, 1)).expect("e2 empty");
        board.spawn(Color::Dark, PieceKind::Rook, sq(4, 7)).expect("e8 empty");
        board.spawn(Color::Dark, PieceKind::King, sq(0, 7)).expect("a8 empty");

        let piece = board.piece(rook).clone();
        let legal = filter_legal(&board, &piece, generate_for_piece(&board, &piece));
        assert!(!legal.is_empty());
        assert!(legal.iter().all(|m| m.to.file() == 4));
        assert!(legal.iter().any(|m| m.to == sq(4, 7)));
    }

    #[test]
    fn pinned_knight_has_no_moves() {
        let mut board = Board::new_empty();
        board.spawn(Color::Light, PieceKind::King, sq(4, 0)).expect("e1 empty");
        let knight = board
            .spawn(Color::Light, PieceKind::Knight, sq(4, 1))
            .expect("e2 empty");
        board.spawn(Color::Dark, PieceKind::Queen, sq(4, 5)).expect("e6 empty");

        let piece = board.piece(knight).clone();
        let legal = filter_legal(&board, &piece, generate_for_piece(&board, &piece));
        assert!(legal.is_empty());
    }

    #[test]
    fn king_cannot_capture_a_defended_piece() {
        let mut board = Board::new_empty();
        let king = board.spawn(Color::Light, PieceKind::King, sq(4, 0)).expect("e1 empty");
        board.spawn(Color::Dark, PieceKind::Pawn, sq(4, 1)).expect("e2 empty");
        board.spawn(Color::Dark, PieceKind::Bishop, sq(1, 4)).expect("b5 empty");

        let piece = board.piece(king).clone();
        let legal = filter_legal(&board, &piece, generate_for_piece(&board, &piece));
        assert!(legal.iter().all(|m| m.to != sq(4, 1)));
        // The pawn on e2 covers d1 and f1.
        assert!(legal.iter().all(|m| m.to != sq(3, 0) && m.to != sq(5, 0)));
        assert!(legal.iter().any(|m| m.to == sq(3, 1)));
    }
}
