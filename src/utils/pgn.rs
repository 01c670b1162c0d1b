//! PGN read/write for finished or in-progress games.
//!
//! Export walks the applied plies (up to the cursor) and uses the SAN stored
//! on each record. Import replays SAN through the normal move path, so a
//! PGN that names an illegal or ambiguous move is rejected.

use std::collections::BTreeMap;

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::Color;
use crate::game_state::game_state::Game;
use crate::session::session_config::{SessionConfig, SessionContext};
use crate::utils::san::apply_san;

#[derive(Debug, Clone)]
pub struct PgnGame {
    pub headers: BTreeMap<String, String>,
    pub game: Game,
    pub result: String,
}

/// PGN with generic headers.
pub fn write_pgn(game: &Game, result: &str) -> String {
    let headers = default_headers(
        game,
        &SessionContext::default(),
        &SessionConfig::default(),
        result,
    );
    write_pgn_with_headers(game, &headers)
}

/// Seven-tag roster filled from the session, plus `SetUp`/`FEN` for a
/// non-standard start.
pub fn default_headers(
    game: &Game,
    context: &SessionContext,
    config: &SessionConfig,
    result: &str,
) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::<String, String>::new();
    headers.insert("Event".to_owned(), config.event.clone());
    headers.insert("Site".to_owned(), "Local".to_owned());
    headers.insert(
        "Date".to_owned(),
        chrono::Local::now().format("%Y.%m.%d").to_string(),
    );
    headers.insert("Round".to_owned(), context.game_number.to_string());
    headers.insert("White".to_owned(), config.white_name.clone());
    headers.insert("Black".to_owned(), config.black_name.clone());
    headers.insert("Result".to_owned(), normalize_result(result).to_owned());

    if let Some(fen) = game.setup_fen() {
        headers.insert("SetUp".to_owned(), "1".to_owned());
        headers.insert("FEN".to_owned(), fen.to_owned());
    }
    headers
}

pub fn write_pgn_with_headers(game: &Game, headers: &BTreeMap<String, String>) -> String {
    let mut out = String::new();

    for (key, value) in headers {
        out.push_str(&format!("[{} \"{}\"]\n", key, escape_pgn_value(value)));
    }
    out.push('\n');

    let result = headers
        .get("Result")
        .map(|x| normalize_result(x))
        .unwrap_or("*");
    out.push_str(&movetext_with_result(game, result));
    out.push('\n');

    out
}

/// Turn-numbered movetext of the applied plies, ending with `result`.
pub fn movetext(game: &Game) -> String {
    movetext_with_result(game, game.status().result_token())
}

/// Movetext ending with an explicit result, such as a resignation.
pub fn movetext_with_result(game: &Game, result: &str) -> String {
    let offset = usize::from(game.initial_side() == Color::Dark);
    let applied = game.history().applied();
    let mut parts = Vec::<String>::with_capacity(applied.len() + 1);

    for (index, record) in applied.iter().enumerate() {
        let ply = index + offset;
        let number = ply / 2 + 1;
        if ply % 2 == 0 {
            parts.push(format!("{number}. {}", record.san));
        } else if index == 0 {
            parts.push(format!("{number}... {}", record.san));
        } else {
            parts.push(record.san.clone());
        }
    }

    parts.push(normalize_result(result).to_owned());
    parts.join(" ")
}

pub fn read_pgn(pgn: &str) -> ChessResult<PgnGame> {
    let mut headers = BTreeMap::<String, String>::new();
    let mut movetext_lines = Vec::<String>::new();

    for line in pgn.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with('[') {
            let (k, v) = parse_header_line(trimmed)?;
            headers.insert(k, v);
        } else {
            movetext_lines.push(trimmed.to_owned());
        }
    }

    let mut game = if headers.get("SetUp").map(|x| x.as_str()) == Some("1") {
        let fen = headers.get("FEN").ok_or_else(|| {
            ChessError::InvalidNotation("PGN SetUp=1 is present but FEN header is missing".to_owned())
        })?;
        Game::from_fen(fen)?
    } else {
        Game::new()
    };

    let mut result = "*".to_owned();
    let text = strip_pgn_comments_and_variations(&movetext_lines.join(" "));
    for token in text.split_whitespace() {
        if is_move_number_token(token) {
            continue;
        }
        if is_result_token(token) {
            result = token.to_owned();
            break;
        }
        // "12.e4" style tokens carry the number and the move together.
        let san = match token.rfind('.') {
            Some(dot) if token[..dot].chars().all(|c| c.is_ascii_digit() || c == '.') => {
                &token[dot + 1..]
            }
            _ => token,
        };
        apply_san(&mut game, san)?;
    }

    if let Some(header_result) = headers.get("Result") {
        result = normalize_result(header_result).to_owned();
    }

    Ok(PgnGame {
        headers,
        game,
        result,
    })
}

fn parse_header_line(line: &str) -> ChessResult<(String, String)> {
    let invalid = || ChessError::InvalidNotation(format!("invalid PGN header line: {line}"));
    if !line.starts_with('[') || !line.ends_with(']') {
        return Err(invalid());
    }
    let inner = &line[1..line.len() - 1];
    let (key, value_raw) = inner.split_once(' ').ok_or_else(invalid)?;
    let value_raw = value_raw.trim();

    if !value_raw.starts_with('"') || !value_raw.ends_with('"') || value_raw.len() < 2 {
        return Err(invalid());
    }
    let value = value_raw[1..value_raw.len() - 1].replace("\\\"", "\"");
    Ok((key.trim().to_owned(), value))
}

fn strip_pgn_comments_and_variations(text: &str) -> String {
    let mut out = String::new();
    let mut brace_depth = 0usize;
    let mut paren_depth = 0usize;

    for ch in text.chars() {
        match ch {
            '{' => brace_depth = brace_depth.saturating_add(1),
            '}' => brace_depth = brace_depth.saturating_sub(1),
            '(' => paren_depth = paren_depth.saturating_add(1),
            ')' => paren_depth = paren_depth.saturating_sub(1),
            _ if brace_depth == 0 && paren_depth == 0 => out.push(ch),
            _ => {}
        }
    }

    out
}

fn is_move_number_token(token: &str) -> bool {
    let digits = token.trim_end_matches('.');
    digits.len() < token.len() && !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

fn is_result_token(token: &str) -> bool {
    matches!(token, "1-0" | "0-1" | "1/2-1/2" | "*")
}

fn normalize_result(result: &str) -> &str {
    if is_result_token(result) {
        result
    } else {
        "*"
    }
}

fn escape_pgn_value(value: &str) -> String {
    value.replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn played(moves: &[&str]) -> Game {
        let mut game = Game::new();
        for san in moves {
            apply_san(&mut game, san).expect("move should be legal");
        }
        game
    }

    #[test]
    fn movetext_numbers_turns_and_appends_result() {
        let game = played(&["e4", "e5", "Nf3"]);
        assert_eq!(movetext(&game), "1. e4 e5 2. Nf3 *");

        let mate = played(&["f3", "e5", "g4", "Qh4#"]);
        assert_eq!(movetext(&mate), "1. f3 e5 2. g4 Qh4# 0-1");
    }

    #[test]
    fn export_stops_at_the_cursor() {
        let mut game = played(&["e4", "e5", "Nf3"]);
        game.move_back().expect("one ply to undo");
        assert_eq!(movetext(&game), "1. e4 e5 *");
    }

    #[test]
    fn dark_to_move_setups_start_with_ellipsis() {
        let mut game = Game::from_fen("4k3/8/8/8/8/8/8/R3K3 b").expect("FEN should parse");
        apply_san(&mut game, "Kd7").expect("king move is legal");
        apply_san(&mut game, "Ra7+").expect("rook check is legal");
        assert_eq!(movetext(&game), "1... Kd7 2. Ra7+ *");
    }

    #[test]
    fn headers_carry_session_details() {
        let game = played(&["e4"]);
        let context = SessionContext {
            game_number: 3,
            ..SessionContext::default()
        };
        let config = SessionConfig {
            white_name: "Ada".to_owned(),
            ..SessionConfig::default()
        };
        let headers = default_headers(&game, &context, &config, "*");
        assert_eq!(headers["Round"], "3");
        assert_eq!(headers["White"], "Ada");
        assert_eq!(headers["Date"].len(), 10);
        assert!(!headers.contains_key("FEN"));
    }

    #[test]
    fn pgn_round_trip_start_position_history() {
        let game = played(&["e4", "e5", "Nf3", "Nc6", "Bb5", "a6"]);
        let pgn = write_pgn(&game, "*");
        let parsed = read_pgn(&pgn).expect("PGN should parse");
        assert_eq!(parsed.game.board(), game.board());
        assert_eq!(parsed.result, "*");
        assert_eq!(parsed.headers["Event"], "Plum Board Game");
    }

    #[test]
    fn pgn_round_trip_custom_fen_setup() {
        let mut game = Game::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").expect("FEN should parse");
        apply_san(&mut game, "e4").expect("e4 is legal");
        let pgn = write_pgn(&game, "1-0");
        assert!(pgn.contains("[SetUp \"1\"]"));
        assert!(pgn.contains("[FEN \"4k3/8/8/8/8/8/4P3/4K3 w - - 0 1\"]"));

        let parsed = read_pgn(&pgn).expect("PGN should parse");
        assert_eq!(parsed.game.placement(), game.placement());
        assert_eq!(parsed.result, "1-0");
    }

    #[test]
    fn read_skips_comments_and_variations() {
        let parsed = read_pgn("1. e4 {best by test} e5 (1... c5) 2.Nf3 *")
            .expect("PGN should parse");
        assert_eq!(parsed.game.history().len(), 3);
        assert!(read_pgn("1. e4 e4 *").is_err());
    }
}
