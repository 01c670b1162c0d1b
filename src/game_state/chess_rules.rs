//! Canonical chess-rule constants.
//!
//! Starting layout, castling geometry and the home squares used to derive
//! castling rights from the move history.

use crate::game_state::chess_types::{CastleSide, Color, PieceKind, Square};

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Back-rank order from the a-file to the h-file.
pub const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

pub const KING_HOME_FILE: u8 = 4;

#[inline]
pub const fn king_home(color: Color) -> Square {
    Square::at(KING_HOME_FILE, color.home_rank())
}

/// Home square of the rook paired with `side`.
#[inline]
pub const fn rook_home(color: Color, side: CastleSide) -> Square {
    match side {
        CastleSide::Kingside => Square::at(7, color.home_rank()),
        CastleSide::Queenside => Square::at(0, color.home_rank()),
    }
}

/// King destination of a castle toward `side`.
#[inline]
pub const fn castle_king_target(color: Color, side: CastleSide) -> Square {
    match side {
        CastleSide::Kingside => Square::at(6, color.home_rank()),
        CastleSide::Queenside => Square::at(2, color.home_rank()),
    }
}

/// Rook destination of a castle toward `side`.
#[inline]
pub const fn castle_rook_target(color: Color, side: CastleSide) -> Square {
    match side {
        CastleSide::Kingside => Square::at(5, color.home_rank()),
        CastleSide::Queenside => Square::at(3, color.home_rank()),
    }
}
