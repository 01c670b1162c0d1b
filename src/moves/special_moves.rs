//! Castling, en passant and promotion flags.
//!
//! These depend on the move history rather than the board alone, so they are
//! generated separately from the per-kind rules.

use log::debug;

use crate::game_state::board::{Board, Piece};
use crate::game_state::chess_rules::{castle_king_target, king_home, rook_home};
use crate::game_state::chess_types::{CandidateMove, CastleSide, PieceKind, SpecialMove};
use crate::game_state::move_history::HistoryView;
use crate::move_generation::attacks::attacked_squares;

/// Appends the special moves available to `piece`.
pub fn generate_special_moves(
    board: &Board,
    history: HistoryView<'_>,
    piece: &Piece,
    out: &mut Vec<CandidateMove>,
) {
    match piece.kind {
        PieceKind::King => generate_castle_moves(board, history, piece, out),
        PieceKind::Pawn => generate_en_passant(board, history, piece, out),
        PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {}
    }
}

/// Castle toward each rook whose pairing with the king is untouched.
///
/// Rights are derived, not stored: neither the king's nor the rook's home
/// square may appear as the origin of any applied ply, and neither piece may
/// carry `has_moved` (set up from a FEN castling field). The king must not be
/// in check and must not cross an attacked square; the destination square is
/// left to the legality filter.
pub fn generate_castle_moves(
    board: &Board,
    history: HistoryView<'_>,
    king: &Piece,
    out: &mut Vec<CandidateMove>,
) {
    let color = king.color;
    let home = king_home(color);
    if king.square != home || king.has_moved || history.any_move_from(home) {
        return;
    }

    let mut attacked: Option<u64> = None;

    for side in [CastleSide::Kingside, CastleSide::Queenside] {
        let rook_square = rook_home(color, side);
        let rook_in_place = board
            .piece_at(rook_square)
            .is_some_and(|p| p.color == color && p.kind == PieceKind::Rook && !p.has_moved);
        if !rook_in_place || history.any_move_from(rook_square) {
            continue;
        }

        let step: i8 = match side {
            CastleSide::Kingside => 1,
            CastleSide::Queenside => -1,
        };
        let mut path_clear = true;
        let mut cursor = home;
        while let Some(next) = cursor.offset(step, 0) {
            if next == rook_square {
                break;
            }
            if !board.is_empty(next) {
                path_clear = false;
                break;
            }
            cursor = next;
        }
        if !path_clear {
            continue;
        }

        let attacked = *attacked.get_or_insert_with(|| attacked_squares(board, color.opposite()));
        let Some(crossing) = home.offset(step, 0) else {
            continue;
        };
        if attacked & (home.mask() | crossing.mask()) != 0 {
            debug!("castle {side:?} for {color} blocked by attacked squares");
            continue;
        }

        out.push(CandidateMove {
            from: home,
            to: castle_king_target(color, side),
            capture: None,
            special: SpecialMove::Castle(side),
        });
    }
}

/// Diagonal capture of a pawn that just advanced two ranks beside `pawn`.
pub fn generate_en_passant(
    board: &Board,
    history: HistoryView<'_>,
    pawn: &Piece,
    out: &mut Vec<CandidateMove>,
) {
    let Some(last) = history.last() else {
        return;
    };
    if last.color == pawn.color || !last.is_double_pawn_push() {
        return;
    }
    if last.to.rank() != pawn.square.rank() || last.to.file().abs_diff(pawn.square.file()) != 1 {
        return;
    }
    let victim_present = board
        .piece_at(last.to)
        .is_some_and(|p| p.id == last.piece && p.kind == PieceKind::Pawn);
    if !victim_present {
        return;
    }
    let Some(to) = last
        .to
        .offset(0, pawn.color.forward())
        .filter(|to| board.is_empty(*to))
    else {
        return;
    };

    out.push(CandidateMove {
        from: pawn.square,
        to,
        capture: Some(last.to),
        special: SpecialMove::EnPassant,
    });
}

/// Marks pawn moves that land on the far rank.
pub fn flag_promotions(piece: &Piece, candidates: &mut [CandidateMove]) {
    if piece.kind != PieceKind::Pawn {
        return;
    }
    let far_rank = piece.color.promotion_rank();
    for candidate in candidates.iter_mut() {
        if candidate.to.rank() == far_rank {
            candidate.special = SpecialMove::Promotion;
        }
    }
}
