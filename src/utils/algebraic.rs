//! Square coordinates in algebraic form (`e4`).
//!
//! Shared by the FEN, SAN and console front ends.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::Square;

/// Parses a coordinate such as `"e4"`.
#[inline]
pub fn algebraic_to_square(square: &str) -> ChessResult<Square> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return Err(ChessError::InvalidNotation(format!(
            "invalid algebraic square: {square}"
        )));
    }
    let file = file_from_char(char::from(bytes[0])).ok_or_else(|| {
        ChessError::InvalidNotation(format!("invalid algebraic file: {}", char::from(bytes[0])))
    })?;
    let rank = rank_from_char(char::from(bytes[1])).ok_or_else(|| {
        ChessError::InvalidNotation(format!("invalid algebraic rank: {}", char::from(bytes[1])))
    })?;
    Ok(Square::at(file, rank))
}

#[inline]
pub fn square_to_algebraic(square: Square) -> String {
    square.to_string()
}

/// `'a'..='h'` to `0..=7`.
#[inline]
pub fn file_from_char(c: char) -> Option<u8> {
    ('a'..='h').contains(&c).then(|| c as u8 - b'a')
}

/// `'1'..='8'` to `0..=7`.
#[inline]
pub fn rank_from_char(c: char) -> Option<u8> {
    ('1'..='8').contains(&c).then(|| c as u8 - b'1')
}
