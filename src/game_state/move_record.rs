use crate::game_state::chess_types::{Color, GameStatus, PieceId, PieceKind, Square};

/// Piece removed by a ply and the square it was removed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapturedPiece {
    pub piece: PieceId,
    pub kind: PieceKind,
    pub square: Square,
}

/// Rook half of a castle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastleRecord {
    pub rook: PieceId,
    pub rook_from: Square,
    pub rook_to: Square,
    pub rook_had_moved: bool,
}

/// The original pawn and the piece that replaced it, kept together so undo
/// and redo always swap the same pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromotionRecord {
    pub pawn: PieceId,
    pub promoted: PieceId,
    pub kind: PieceKind,
}

/// Side effects beyond moving one piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialRecord {
    None,
    Promotion(PromotionRecord),
    /// Captured square is recorded in `MoveRecord::captured`.
    EnPassant,
    Castle(CastleRecord),
}

/// One committed ply. Never modified after it is pushed to the history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub from: Square,
    pub to: Square,
    pub piece: PieceId,
    /// Kind of the moved piece before the ply (a pawn for promotions).
    pub kind: PieceKind,
    pub color: Color,
    pub captured: Option<CapturedPiece>,
    pub special: SpecialRecord,
    /// `has_moved` of the moved piece before the ply.
    pub had_moved: bool,
    /// Outbound SAN, including check/mate marks.
    pub san: String,
    /// Classifier verdict for the side to move after this ply.
    pub status_after: GameStatus,
}

impl MoveRecord {
    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// A pawn move of two ranks.
    #[inline]
    pub fn is_double_pawn_push(&self) -> bool {
        self.kind == PieceKind::Pawn && self.from.rank().abs_diff(self.to.rank()) == 2
    }

    /// Squares whose contents differ before and after this ply.
    pub fn changed_squares(&self) -> Vec<Square> {
        let mut squares = vec![self.from, self.to];
        if let Some(captured) = self.captured {
            if captured.square != self.to {
                squares.push(captured.square);
            }
        }
        if let SpecialRecord::Castle(castle) = self.special {
            squares.push(castle.rook_from);
            squares.push(castle.rook_to);
        }
        squares
    }
}
