//! FEN setup and export.
//!
//! Only the fields this crate keeps state for are interpreted: placement,
//! side to move and castling. Castling rights are otherwise derived from the
//! move history, so a missing right is expressed by marking the king or rook
//! as already moved. En passant follows the history and the clocks are not
//! tracked; both fields are accepted and ignored.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::board::Board;
use crate::game_state::chess_rules::{king_home, rook_home};
use crate::game_state::chess_types::{CastleSide, Color, PieceKind, Square};

/// Parses `fen` into a board and the side to move (light when omitted).
pub fn parse_fen(fen: &str) -> ChessResult<(Board, Color)> {
    let mut parts = fen.split_whitespace();
    let placement = parts
        .next()
        .ok_or_else(|| ChessError::InvalidPlacement("missing board layout in FEN".to_owned()))?;

    let mut board = parse_placement(placement)?;
    let side = match parts.next() {
        Some(field) => parse_side_to_move(field)?,
        None => Color::Light,
    };
    if let Some(castling) = parts.next() {
        apply_castling_field(&mut board, castling)?;
    }

    Ok((board, side))
}

/// Parses the placement field alone.
pub fn parse_placement(placement: &str) -> ChessResult<Board> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(ChessError::InvalidPlacement(
            "board layout must contain 8 ranks".to_owned(),
        ));
    }

    let mut board = Board::new_empty();
    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - fen_rank_idx as u8;
        let mut file = 0u8;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(ChessError::InvalidPlacement(format!(
                        "invalid empty-square count '{ch}'"
                    )));
                }
                file += empty_count as u8;
                if file > 8 {
                    return Err(ChessError::InvalidPlacement(format!(
                        "rank {} has too many files",
                        rank + 1
                    )));
                }
                continue;
            }

            let (color, kind) = piece_from_fen_char(ch).ok_or_else(|| {
                ChessError::InvalidPlacement(format!("invalid piece character '{ch}'"))
            })?;
            let square = Square::new(file, rank).ok_or_else(|| {
                ChessError::InvalidPlacement(format!("rank {} has too many files", rank + 1))
            })?;
            board.spawn(color, kind, square)?;
            file += 1;
        }

        if file != 8 {
            return Err(ChessError::InvalidPlacement(format!(
                "rank {} does not sum to 8 files",
                rank + 1
            )));
        }
    }

    for color in [Color::Light, Color::Dark] {
        let kings = board
            .active_pieces(color)
            .filter(|p| p.kind == PieceKind::King)
            .count();
        if kings > 1 {
            return Err(ChessError::InvalidPlacement(format!(
                "{color} has {kings} kings"
            )));
        }
    }

    Ok(board)
}

fn parse_side_to_move(field: &str) -> ChessResult<Color> {
    match field {
        "w" => Ok(Color::Light),
        "b" => Ok(Color::Dark),
        _ => Err(ChessError::InvalidPlacement(format!(
            "invalid side-to-move field: {field}"
        ))),
    }
}

/// Marks kings and rooks lacking a castling right as moved.
fn apply_castling_field(board: &mut Board, field: &str) -> ChessResult<()> {
    let mut rights = [[false; 2]; 2];
    if field != "-" {
        for ch in field.chars() {
            let (color, side) = match ch {
                'K' => (Color::Light, CastleSide::Kingside),
                'Q' => (Color::Light, CastleSide::Queenside),
                'k' => (Color::Dark, CastleSide::Kingside),
                'q' => (Color::Dark, CastleSide::Queenside),
                _ => {
                    return Err(ChessError::InvalidPlacement(format!(
                        "invalid castling rights character: {ch}"
                    )))
                }
            };
            rights[color.index()][side_index(side)] = true;
        }
    }

    for color in [Color::Light, Color::Dark] {
        let color_rights = rights[color.index()];
        for side in [CastleSide::Kingside, CastleSide::Queenside] {
            if !color_rights[side_index(side)] {
                if let Some(rook) = board.id_at(rook_home(color, side)) {
                    board.set_has_moved(rook, true);
                }
            }
        }
        if !color_rights.contains(&true) {
            if let Some(king) = board.id_at(king_home(color)) {
                board.set_has_moved(king, true);
            }
        }
    }
    Ok(())
}

#[inline]
const fn side_index(side: CastleSide) -> usize {
    match side {
        CastleSide::Kingside => 0,
        CastleSide::Queenside => 1,
    }
}

/// The placement field for `board`.
pub fn generate_placement(board: &Board) -> String {
    let mut out = String::new();

    for rank in (0..8u8).rev() {
        let mut empty_count = 0u8;

        for file in 0..8u8 {
            match board.piece_at(Square::at(file, rank)) {
                Some(piece) => {
                    if empty_count > 0 {
                        out.push(char::from(b'0' + empty_count));
                        empty_count = 0;
                    }
                    out.push(piece_to_fen_char(piece.color, piece.kind));
                }
                None => empty_count += 1,
            }
        }

        if empty_count > 0 {
            out.push(char::from(b'0' + empty_count));
        }
        if rank > 0 {
            out.push('/');
        }
    }

    out
}

/// Six-field FEN for a position with no history behind it.
///
/// Castling letters are written for every king/rook pair still on its home
/// squares and unmoved; the en-passant field is always `-`.
pub fn generate_fen(board: &Board, side_to_move: Color) -> String {
    let side = match side_to_move {
        Color::Light => "w",
        Color::Dark => "b",
    };
    format!(
        "{} {} {} - 0 1",
        generate_placement(board),
        side,
        generate_castling_field(board)
    )
}

fn generate_castling_field(board: &Board) -> String {
    let unmoved = |square: Square, color: Color, kind: PieceKind| {
        board
            .piece_at(square)
            .is_some_and(|p| p.color == color && p.kind == kind && !p.has_moved)
    };

    let mut out = String::new();
    for color in [Color::Light, Color::Dark] {
        if !unmoved(king_home(color), color, PieceKind::King) {
            continue;
        }
        for side in [CastleSide::Kingside, CastleSide::Queenside] {
            if unmoved(rook_home(color, side), color, PieceKind::Rook) {
                let letter = match side {
                    CastleSide::Kingside => 'K',
                    CastleSide::Queenside => 'Q',
                };
                out.push(match color {
                    Color::Light => letter,
                    Color::Dark => letter.to_ascii_lowercase(),
                });
            }
        }
    }

    if out.is_empty() {
        out.push('-');
    }
    out
}

fn piece_from_fen_char(ch: char) -> Option<(Color, PieceKind)> {
    let color = if ch.is_ascii_uppercase() {
        Color::Light
    } else if ch.is_ascii_lowercase() {
        Color::Dark
    } else {
        return None;
    };
    let kind = match ch.to_ascii_lowercase() {
        'p' => PieceKind::Pawn,
        other => PieceKind::from_san_letter(other.to_ascii_uppercase())?,
    };
    Some((color, kind))
}

fn piece_to_fen_char(color: Color, kind: PieceKind) -> char {
    let upper = kind.san_letter().unwrap_or('P');
    match color {
        Color::Light => upper,
        Color::Dark => upper.to_ascii_lowercase(),
    }
}
