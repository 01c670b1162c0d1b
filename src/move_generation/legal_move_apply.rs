//! Board mutation for committed plies.
//!
//! `build_record` turns a legal candidate into a `MoveRecord`, `apply_record`
//! plays it and `revert_record` is its exact inverse. Undo and redo both go
//! through the record, so navigating the history never regenerates moves.

use log::warn;

use crate::errors::{ChessError, ChessResult};
use crate::game_state::board::{Board, Piece};
use crate::game_state::chess_rules::{castle_rook_target, rook_home};
use crate::game_state::chess_types::{CandidateMove, GameStatus, PieceKind, SpecialMove};
use crate::game_state::move_record::{
    CapturedPiece, CastleRecord, MoveRecord, PromotionRecord, SpecialRecord,
};

/// Builds the record for `candidate` played by `mover`.
///
/// `board` is the board the record will be applied to; a promotion adds the
/// replacement piece to its arena, off the board until `apply_record` runs.
/// `san` and `status_after` are left blank for the caller to fill in.
pub fn build_record(
    board: &mut Board,
    mover: &Piece,
    candidate: &CandidateMove,
    promotion: Option<PieceKind>,
) -> ChessResult<MoveRecord> {
    let captured = match candidate.capture {
        Some(square) => {
            let victim = board.piece_at(square).ok_or_else(|| {
                ChessError::InvalidSpecialState(format!("no piece to capture on {square}"))
            })?;
            if victim.kind == PieceKind::King {
                warn!("{} captures the {} king on {square}", mover.color, victim.color);
            }
            Some(CapturedPiece {
                piece: victim.id,
                kind: victim.kind,
                square,
            })
        }
        None => None,
    };

    let special = match (candidate.special, promotion) {
        (SpecialMove::Promotion, Some(kind)) if kind.is_promotion_choice() => {
            let promoted = board.spawn_off_board(mover.color, kind, candidate.to);
            SpecialRecord::Promotion(PromotionRecord {
                pawn: mover.id,
                promoted,
                kind,
            })
        }
        (SpecialMove::Promotion, Some(kind)) => {
            return Err(ChessError::InvalidSpecialState(format!(
                "cannot promote to {kind:?}"
            )));
        }
        (SpecialMove::Promotion, None) => {
            return Err(ChessError::InvalidSpecialState(
                "promotion requires a piece kind".to_owned(),
            ));
        }
        (_, Some(_)) => {
            return Err(ChessError::InvalidSpecialState(format!(
                "{}{} is not a promotion",
                candidate.from, candidate.to
            )));
        }
        (SpecialMove::Castle(side), None) => {
            let rook_from = rook_home(mover.color, side);
            let rook = board.piece_at(rook_from).ok_or_else(|| {
                ChessError::InvalidSpecialState(format!("no rook on {rook_from} to castle with"))
            })?;
            SpecialRecord::Castle(CastleRecord {
                rook: rook.id,
                rook_from,
                rook_to: castle_rook_target(mover.color, side),
                rook_had_moved: rook.has_moved,
            })
        }
        (SpecialMove::EnPassant, None) => SpecialRecord::EnPassant,
        (SpecialMove::None, None) => SpecialRecord::None,
    };

    Ok(MoveRecord {
        from: candidate.from,
        to: candidate.to,
        piece: mover.id,
        kind: mover.kind,
        color: mover.color,
        captured,
        special,
        had_moved: mover.has_moved,
        san: String::new(),
        status_after: GameStatus::Ongoing,
    })
}

/// Plays `record` onto `board`.
pub fn apply_record(board: &mut Board, record: &MoveRecord) {
    if let Some(captured) = record.captured {
        board.take_off(captured.piece);
    }
    board.relocate(record.piece, record.to);
    board.set_has_moved(record.piece, true);

    match record.special {
        SpecialRecord::Castle(castle) => {
            board.relocate(castle.rook, castle.rook_to);
            board.set_has_moved(castle.rook, true);
        }
        SpecialRecord::Promotion(promotion) => {
            board.take_off(promotion.pawn);
            board.put_back(promotion.promoted, record.to);
        }
        SpecialRecord::EnPassant | SpecialRecord::None => {}
    }
}

/// Undoes `record`, which must be the last ply applied to `board`.
pub fn revert_record(board: &mut Board, record: &MoveRecord) {
    match record.special {
        SpecialRecord::Castle(castle) => {
            board.relocate(castle.rook, castle.rook_from);
            board.set_has_moved(castle.rook, castle.rook_had_moved);
        }
        SpecialRecord::Promotion(promotion) => {
            board.take_off(promotion.promoted);
            board.put_back(promotion.pawn, record.to);
        }
        SpecialRecord::EnPassant | SpecialRecord::None => {}
    }

    board.relocate(record.piece, record.from);
    board.set_has_moved(record.piece, record.had_moved);

    if let Some(captured) = record.captured {
        board.put_back(captured.piece, captured.square);
    }
}
