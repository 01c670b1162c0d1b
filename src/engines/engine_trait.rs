//! Move-suggestion boundary.
//!
//! The core never computes a suggestion itself. A request carries the game
//! so far as a SAN stream plus opaque options; the reply names one SAN move.
//! Both carry a `RequestTag` so a reply that arrives after the position has
//! changed can be recognised and dropped.

use std::collections::BTreeMap;

use crate::errors::ChessResult;

/// Options forwarded to the suggester unmodified.
///
/// Values are kept as the caller wrote them; only the suggester reads them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOptions {
    pub depth: Option<String>,
    pub skill_level: Option<String>,
    pub extra: BTreeMap<String, String>,
}

impl EngineOptions {
    /// `setoption`-style update. `Depth` and `Skill Level` get their own
    /// slots; any other name lands in `extra`.
    pub fn set(&mut self, name: &str, value: &str) {
        let value = value.to_owned();
        if name.eq_ignore_ascii_case("Depth") {
            self.depth = Some(value);
        } else if name.eq_ignore_ascii_case("Skill Level") {
            self.skill_level = Some(value);
        } else {
            self.extra.insert(name.to_owned(), value);
        }
    }
}

/// Identifies the position a request was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTag {
    /// Session game number, starting at 1.
    pub game: u32,
    /// History cursor when the request was issued.
    pub ply: isize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRequest {
    pub tag: RequestTag,
    /// FEN of a non-standard starting position.
    pub start_fen: Option<String>,
    /// Applied plies as space-separated SAN.
    pub moves: String,
    pub options: EngineOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionReply {
    pub tag: RequestTag,
    pub san: String,
    /// Free-form engine output, passed through untouched.
    pub metrics: Vec<String>,
}

pub trait MoveSuggester: Send {
    fn name(&self) -> &str;

    fn new_game(&mut self) {}

    fn suggest(&mut self, request: &SuggestionRequest) -> ChessResult<SuggestionReply>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_are_stored_verbatim() {
        let mut options = EngineOptions::default();
        options.set("Depth", "12");
        options.set("skill level", "expert");
        options.set("Threads", "4");
        assert_eq!(options.depth.as_deref(), Some("12"));
        assert_eq!(options.skill_level.as_deref(), Some("expert"));
        assert_eq!(options.extra.get("Threads").map(String::as_str), Some("4"));

        options.set("Depth", "deep");
        assert_eq!(options.depth.as_deref(), Some("deep"));
    }
}
