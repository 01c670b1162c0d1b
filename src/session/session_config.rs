//! Per-session settings and counters.

use crate::engines::engine_trait::EngineOptions;
use crate::game_state::chess_types::Color;

/// Settings fixed for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Side played by the suggester, if any.
    pub engine_color: Option<Color>,
    pub options: EngineOptions,
    pub white_name: String,
    pub black_name: String,
    pub event: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            engine_color: None,
            options: EngineOptions::default(),
            white_name: "White".to_owned(),
            black_name: "Black".to_owned(),
            event: "Plum Board Game".to_owned(),
        }
    }
}

/// Counters carried across restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionContext {
    /// Number of the game in progress, starting at 1.
    pub game_number: u32,
    /// Games that reached a result (mate, stalemate or resignation).
    pub games_completed: u32,
    /// Winner of the most recently completed game; `None` after a draw.
    pub last_winner: Option<Color>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self {
            game_number: 1,
            games_completed: 0,
            last_winner: None,
        }
    }
}
