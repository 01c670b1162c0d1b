//! Check / checkmate / stalemate classification, run once per committed ply.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, GameStatus};
use crate::game_state::move_history::HistoryView;
use crate::move_generation::attacks::attacked_squares;
use crate::move_generation::legal_move_generator::has_any_legal_move;

/// Verdict for `defender`, the side about to move.
pub fn classify(board: &Board, history: HistoryView<'_>, defender: Color) -> GameStatus {
    let attacker = defender.opposite();

    if board.only_kings_remain() {
        return GameStatus::Stalemate;
    }

    let Some(king) = board.king_square(defender) else {
        // Only reachable after the executor's king-capture fallback.
        return GameStatus::Checkmate { winner: attacker };
    };

    let in_check = attacked_squares(board, attacker) & king.mask() != 0;
    let can_move = has_any_legal_move(board, history, defender);

    match (in_check, can_move) {
        (true, true) => GameStatus::Check,
        (true, false) => GameStatus::Checkmate { winner: attacker },
        (false, true) => GameStatus::Ongoing,
        (false, false) => GameStatus::Stalemate,
    }
}
