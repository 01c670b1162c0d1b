//! Crate root module declarations for the Plum Board rules core.
//!
//! Exposes the board model, move generation and legality, the game executor
//! with its undo/redo history, notation helpers, the session/engine boundary
//! and the console front end so binaries, tests and benches share one set of
//! module paths.

pub mod errors;

pub mod game_state {
    pub mod board;
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_state;
    pub mod move_history;
    pub mod move_record;
}

pub mod moves {
    pub mod king_moves;
    pub mod knight_moves;
    pub mod pawn_moves;
    pub mod piece_moves;
    pub mod sliding_moves;
    pub mod special_moves;
}

pub mod move_generation {
    pub mod attacks;
    pub mod game_end;
    pub mod legal_move_apply;
    pub mod legal_move_filter;
    pub mod legal_move_generator;
    pub mod perft;
}

pub mod engines {
    pub mod engine_random;
    pub mod engine_trait;
}

pub mod session {
    pub mod game_session;
    pub mod observer;
    pub mod session_config;
}

pub mod console {
    pub mod console_top;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen;
    pub mod pgn;
    pub mod render_game_state;
    pub mod san;
}
