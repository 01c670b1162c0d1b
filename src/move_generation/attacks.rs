//! The one "squares attacked by side X on board Y" primitive.
//!
//! The legality filter, the game-end classifier and castling all ask this
//! module, so king-safety logic exists in exactly one place.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, PieceKind, Square};
use crate::moves::pawn_moves::pawn_attacks;
use crate::moves::piece_moves::generate_into;

/// Union of every square `attacker` could move a piece onto, as a mask.
///
/// Pawns contribute their two diagonal squares whether occupied or not;
/// pushes never capture and are left out. Other kinds contribute their
/// pseudo-legal destinations.
pub fn attacked_squares(board: &Board, attacker: Color) -> u64 {
    let mut attacked = 0u64;
    let mut scratch = Vec::with_capacity(32);

    for piece in board.active_pieces(attacker) {
        match piece.kind {
            PieceKind::Pawn => {
                for to in pawn_attacks(attacker, piece.square) {
                    attacked |= to.mask();
                }
            }
            kind => {
                scratch.clear();
                generate_into(kind, attacker, piece.square, board, &mut scratch);
                for mv in &scratch {
                    attacked |= mv.to.mask();
                }
            }
        }
    }

    attacked
}

#[inline]
pub fn is_square_attacked(board: &Board, square: Square, attacker: Color) -> bool {
    attacked_squares(board, attacker) & square.mask() != 0
}

/// True when `color`'s king stands on a square the other side attacks.
pub fn is_king_in_check(board: &Board, color: Color) -> bool {
    let Some(king) = board.king_square(color) else {
        return false;
    };
    is_square_attacked(board, king, color.opposite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(file: u8, rank: u8) -> Square {
        Square::new(file, rank).expect("test square should be on the board")
    }

    #[test]
    fn start_position_attacks_the_third_rank() {
        let board = Board::new_game();
        let attacked = attacked_squares(&board, Color::Light);
        for file in 0..8 {
            assert_ne!(attacked & sq(file, 2).mask(), 0);
        }
        assert_eq!(attacked & sq(4, 3).mask(), 0);
        assert!(!is_king_in_check(&board, Color::Light));
    }

    #[test]
    fn pawn_attacks_empty_diagonals_but_not_pushes() {
        let mut board = Board::new_empty();
        board
            .spawn(Color::Dark, PieceKind::Pawn, sq(3, 4))
            .expect("d5 empty");
        let attacked = attacked_squares(&board, Color::Dark);
        assert_eq!(attacked, sq(2, 3).mask() | sq(4, 3).mask());
    }

    #[test]
    fn rook_gives_check_along_open_file() {
        let mut board = Board::new_empty();
        board.spawn(Color::Light, PieceKind::King, sq(4, 0)).expect("e1 empty");
        board.spawn(Color::Dark, PieceKind::Rook, sq(4, 7)).expect("e8 empty");
        assert!(is_king_in_check(&board, Color::Light));
        board.spawn(Color::Light, PieceKind::Pawn, sq(4, 3)).expect("e4 empty");
        assert!(!is_king_in_check(&board, Color::Light));
    }
}
