//! Standard Algebraic Notation in both directions.
//!
//! Outbound SAN is written once per ply when it is committed and stored on
//! the record. Inbound SAN is resolved against the live legal move sets and
//! is never guessed: anything that does not single out exactly one move is
//! rejected.

use log::warn;

use crate::errors::{ChessError, ChessResult};
use crate::game_state::board::Board;
use crate::game_state::chess_rules::{castle_king_target, king_home};
use crate::game_state::chess_types::{CastleSide, GameStatus, PieceKind, Square, SpecialMove};
use crate::game_state::game_state::{Game, MoveApplied, MoveOutcome};
use crate::game_state::move_history::HistoryView;
use crate::game_state::move_record::{MoveRecord, SpecialRecord};
use crate::move_generation::legal_move_generator::legal_moves_for_piece;
use crate::utils::algebraic::{file_from_char, rank_from_char};

/// Appended to en-passant captures.
pub const EN_PASSANT_MARKER: &str = "e.p.";

/// SAN for `record`, played from `board_before`, given the verdict after it.
pub fn move_to_san(
    board_before: &Board,
    history: HistoryView<'_>,
    record: &MoveRecord,
    status_after: GameStatus,
) -> String {
    let mut out = String::with_capacity(8);

    match record.special {
        SpecialRecord::Castle(castle) => {
            out.push_str(if castle.rook_from.file() > record.from.file() {
                "O-O"
            } else {
                "O-O-O"
            });
        }
        _ => {
            match record.kind.san_letter() {
                Some(letter) => {
                    out.push(letter);
                    out.push_str(&disambiguator(board_before, history, record));
                }
                None if record.is_capture() => out.push(record.from.file_char()),
                None => {}
            }
            if record.is_capture() {
                out.push('x');
            }
            out.push_str(&record.to.to_string());

            match record.special {
                SpecialRecord::Promotion(promotion) => {
                    out.push('=');
                    out.extend(promotion.kind.san_letter());
                }
                SpecialRecord::EnPassant => out.push_str(EN_PASSANT_MARKER),
                SpecialRecord::None | SpecialRecord::Castle(_) => {}
            }
        }
    }

    match status_after {
        GameStatus::Check => out.push('+'),
        GameStatus::Checkmate { .. } => out.push('#'),
        GameStatus::Ongoing | GameStatus::Stalemate => {}
    }
    out
}

/// Source file, rank, or both, when another piece of the same kind could
/// legally reach the same square.
fn disambiguator(board: &Board, history: HistoryView<'_>, record: &MoveRecord) -> String {
    let rivals: Vec<Square> = board
        .active_pieces(record.color)
        .filter(|p| p.kind == record.kind && p.id != record.piece)
        .filter(|p| {
            legal_moves_for_piece(board, history, p)
                .iter()
                .any(|m| m.to == record.to)
        })
        .map(|p| p.square)
        .collect();

    if rivals.is_empty() {
        String::new()
    } else if rivals.iter().all(|s| s.file() != record.from.file()) {
        record.from.file_char().to_string()
    } else if rivals.iter().all(|s| s.rank() != record.from.rank()) {
        record.from.rank_char().to_string()
    } else {
        record.from.to_string()
    }
}

/// Inbound SAN broken into its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SanMove {
    Castle(CastleSide),
    Normal {
        kind: PieceKind,
        to: Square,
        from_file: Option<u8>,
        from_rank: Option<u8>,
        capture: bool,
        promotion: Option<PieceKind>,
    },
}

/// A move ready for `Game::try_move` / `try_move_with_promotion`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

/// Strips check and annotation marks plus the en-passant marker.
fn strip_decorations(text: &str) -> &str {
    let mut body = text.trim();
    loop {
        let trimmed = body.trim_end_matches(['+', '#', '!', '?']);
        let trimmed = trimmed
            .strip_suffix(EN_PASSANT_MARKER)
            .unwrap_or(trimmed)
            .trim_end();
        if trimmed == body {
            return body;
        }
        body = trimmed;
    }
}

pub fn parse_san(text: &str) -> ChessResult<SanMove> {
    let invalid = || ChessError::InvalidNotation(text.to_owned());
    let body = strip_decorations(text);
    if !body.is_ascii() || body.is_empty() {
        return Err(invalid());
    }

    match body {
        "O-O" | "0-0" => return Ok(SanMove::Castle(CastleSide::Kingside)),
        "O-O-O" | "0-0-0" => return Ok(SanMove::Castle(CastleSide::Queenside)),
        _ => {}
    }

    let (kind, rest) = match body.chars().next().and_then(PieceKind::from_san_letter) {
        Some(kind) => (kind, &body[1..]),
        None => (PieceKind::Pawn, body),
    };

    let (rest, promotion) = match rest.split_once('=') {
        Some((head, suffix)) => {
            let mut chars = suffix.chars();
            let promoted = chars
                .next()
                .and_then(PieceKind::from_san_letter)
                .ok_or_else(invalid)?;
            if chars.next().is_some() {
                return Err(invalid());
            }
            (head, Some(promoted))
        }
        None => match rest.chars().last().and_then(PieceKind::from_san_letter) {
            Some(promoted) if kind == PieceKind::Pawn => (&rest[..rest.len() - 1], Some(promoted)),
            _ => (rest, None),
        },
    };

    if rest.len() < 2 {
        return Err(invalid());
    }
    let (prefix, destination) = rest.split_at(rest.len() - 2);
    let mut dest_chars = destination.chars();
    let to = match (
        dest_chars.next().and_then(file_from_char),
        dest_chars.next().and_then(rank_from_char),
    ) {
        (Some(file), Some(rank)) => Square::new(file, rank).ok_or_else(invalid)?,
        _ => return Err(invalid()),
    };

    let mut from_file = None;
    let mut from_rank = None;
    let mut capture = false;
    for c in prefix.chars() {
        if c == 'x' || c == ':' {
            capture = true;
        } else if let Some(file) = file_from_char(c) {
            from_file = Some(file);
        } else if let Some(rank) = rank_from_char(c) {
            from_rank = Some(rank);
        } else {
            return Err(invalid());
        }
    }

    Ok(SanMove::Normal {
        kind,
        to,
        from_file,
        from_rank,
        capture,
        promotion,
    })
}

/// Finds the single legal move `text` names for the side to move.
pub fn resolve_san(game: &Game, text: &str) -> ChessResult<ResolvedMove> {
    let resolved = match parse_san(text)? {
        SanMove::Castle(side) => resolve_castle(game, side),
        SanMove::Normal {
            kind,
            to,
            from_file,
            from_rank,
            capture,
            promotion,
        } => {
            let side = game.side_to_move();
            let mut matches = Vec::new();
            for piece in game.board().active_pieces(side).filter(|p| p.kind == kind) {
                if from_file.is_some_and(|f| f != piece.square.file())
                    || from_rank.is_some_and(|r| r != piece.square.rank())
                {
                    continue;
                }
                // A bare pawn destination names a push on its own file.
                if kind == PieceKind::Pawn
                    && piece.square.file() != to.file()
                    && !capture
                    && from_file.is_none()
                {
                    continue;
                }
                if let Some(candidate) = game
                    .compute_legal_moves(piece.square)
                    .into_iter()
                    .find(|m| m.to == to)
                {
                    matches.push(candidate);
                }
            }

            match matches.as_slice() {
                [candidate] => {
                    let is_promotion = candidate.special == SpecialMove::Promotion;
                    if promotion.is_some() && !is_promotion {
                        Err(ChessError::InvalidSpecialState(format!(
                            "{text} is not a promotion"
                        )))
                    } else if is_promotion && promotion.is_none() {
                        Err(ChessError::InvalidSpecialState(format!(
                            "{text} needs a promotion piece"
                        )))
                    } else if capture && !candidate.is_capture() {
                        Err(ChessError::InvalidNotation(format!(
                            "{text} marks a capture on an empty square"
                        )))
                    } else {
                        Ok(ResolvedMove {
                            from: candidate.from,
                            to: candidate.to,
                            promotion,
                        })
                    }
                }
                _ => Err(ChessError::AmbiguousNotation {
                    san: text.to_owned(),
                    candidates: matches.len(),
                }),
            }
        }
    };

    if let Err(err) = &resolved {
        warn!("could not resolve {text:?}: {err}");
    }
    resolved
}

fn resolve_castle(game: &Game, side: CastleSide) -> ChessResult<ResolvedMove> {
    let color = game.side_to_move();
    let home = king_home(color);
    let target = castle_king_target(color, side);
    let legal = game
        .compute_legal_moves(home)
        .into_iter()
        .any(|m| m.to == target && m.special == SpecialMove::Castle(side));
    if !legal {
        return Err(ChessError::InvalidSpecialState(format!(
            "{color} cannot castle {side:?}"
        )));
    }
    Ok(ResolvedMove {
        from: home,
        to: target,
        promotion: None,
    })
}

/// Resolves `text` and plays it.
pub fn apply_san(game: &mut Game, text: &str) -> ChessResult<MoveApplied> {
    let resolved = resolve_san(game, text)?;
    match resolved.promotion {
        Some(kind) => game.try_move_with_promotion(resolved.from, resolved.to, kind),
        None => match game.try_move(resolved.from, resolved.to)? {
            MoveOutcome::Applied(applied) => Ok(applied),
            MoveOutcome::PromotionPending { .. } => {
                game.cancel_promotion();
                Err(ChessError::InvalidSpecialState(format!(
                    "{text} needs a promotion piece"
                )))
            }
        },
    }
}

/// The applied plies as one space-separated SAN stream.
pub fn san_stream(game: &Game) -> String {
    game.history()
        .applied()
        .iter()
        .map(|record| record.san.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
