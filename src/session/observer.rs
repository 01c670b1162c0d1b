//! Callbacks for whatever renders the game.

use crate::game_state::chess_types::{GameStatus, Square};
use crate::game_state::game_state::{MoveApplied, Navigation};

/// Every method has an empty default; implement the ones you need.
pub trait GameObserver {
    fn on_move(&mut self, _applied: &MoveApplied) {}

    fn on_navigation(&mut self, _navigation: &Navigation) {}

    /// Squares to redraw after a ply or a cursor step.
    fn on_squares_changed(&mut self, _squares: &[Square]) {}

    fn on_game_over(&mut self, _status: GameStatus, _result: &str) {}
}

/// Logs every notification at debug level.
#[derive(Debug, Default)]
pub struct LoggingObserver;

impl GameObserver for LoggingObserver {
    fn on_move(&mut self, applied: &MoveApplied) {
        log::debug!("move {} -> {:?}", applied.record.san, applied.status);
    }

    fn on_navigation(&mut self, navigation: &Navigation) {
        log::debug!("{:?} over {}", navigation.direction, navigation.record.san);
    }

    fn on_game_over(&mut self, status: GameStatus, result: &str) {
        log::debug!("game over {status:?} {result}");
    }
}
