//! Errors used throughout the rules core.
//!
//! `ChessError` is the single error type returned by the executor, the
//! notation translator, position setup and the session layer. Move
//! generation and legality filtering never fail; an empty move list is a
//! valid answer.
//!
//! Every operation that returns an error leaves the board and history
//! untouched, so callers can treat an `Err` as "the ply did not happen".

use crate::game_state::chess_types::{Color, Square};

/// Unified error type for the rules core.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    // --- Rejected moves ---
    /// No live piece stands on the origin square.
    #[error("no piece on {0}")]
    NoPieceOnSquare(Square),

    /// The selected piece does not belong to the side to move.
    #[error("it is {expected}'s turn")]
    WrongTurn { expected: Color },

    /// The destination holds a piece of the mover's own color.
    #[error("{0} is occupied by a friendly piece")]
    FriendlyOccupied(Square),

    /// The destination is not in the piece's legal move set.
    #[error("{from} to {to} is not a legal move")]
    IllegalDestination { from: Square, to: Square },

    /// A new ply was attempted while the history cursor is behind the tail.
    #[error("history is not at its tail; move forward before playing")]
    HistoryNotAtTail,

    /// The game already ended by checkmate or stalemate.
    #[error("the game is over")]
    GameOver,

    /// A suggestion request is outstanding; plies wait for its reply.
    #[error("waiting for the move-suggestion engine")]
    AwaitingEngine,

    // --- Notation ---
    /// Inbound SAN resolved to zero or several pieces.
    #[error("notation '{san}' matches {candidates} pieces")]
    AmbiguousNotation { san: String, candidates: usize },

    /// Inbound text is not SAN at all.
    #[error("invalid notation: {0}")]
    InvalidNotation(String),

    // --- Special-move state ---
    /// Promotion completed without a pending promotion, a promotion kind on a
    /// non-promoting move, or a castle without rights.
    #[error("invalid special-move state: {0}")]
    InvalidSpecialState(String),

    // --- Session / engine boundary ---
    /// A reply arrived for a request issued against another position.
    #[error("engine reply is stale")]
    StaleReply,

    /// A reply or abandon arrived with no request outstanding.
    #[error("no engine request is pending")]
    NoPendingRequest,

    /// The in-process suggester failed.
    #[error("suggester failure: {0}")]
    Suggester(String),

    // --- Setup ---
    /// A placement string or piece spawn could not be applied.
    #[error("invalid placement: {0}")]
    InvalidPlacement(String),
}

/// Result type for rules-core operations.
pub type ChessResult<T> = Result<T, ChessError>;
