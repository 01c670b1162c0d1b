//! Random-move suggester.
//!
//! Replays the request's SAN stream from its starting position and picks a
//! legal move uniformly. Used by the console and for integration testing.

use log::debug;
use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::engines::engine_trait::{MoveSuggester, SuggestionReply, SuggestionRequest};
use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::{PieceKind, SpecialMove};
use crate::game_state::game_state::{Game, MoveOutcome};
use crate::utils::san::apply_san;

pub struct RandomSuggester {
    rng: StdRng,
}

impl RandomSuggester {
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Deterministic choices for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

fn replay(request: &SuggestionRequest) -> ChessResult<Game> {
    let mut game = match &request.start_fen {
        Some(fen) => Game::from_fen(fen)?,
        None => Game::new(),
    };
    for san in request.moves.split_whitespace() {
        apply_san(&mut game, san)?;
    }
    Ok(game)
}

impl Default for RandomSuggester {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveSuggester for RandomSuggester {
    fn name(&self) -> &str {
        "PlumBoard Random"
    }

    fn suggest(&mut self, request: &SuggestionRequest) -> ChessResult<SuggestionReply> {
        let game = replay(request)?;
        let legal_moves = game.all_legal_moves();

        let mut metrics = vec![format!("legal_moves {}", legal_moves.len())];
        if let Some(depth) = &request.options.depth {
            metrics.push(format!("requested_depth {depth}"));
        }

        let picked = legal_moves
            .as_slice()
            .choose(&mut self.rng)
            .copied()
            .ok_or_else(|| ChessError::Suggester("no legal move to suggest".to_owned()))?;

        let mut scratch = game;
        let applied = if picked.special == SpecialMove::Promotion {
            scratch.try_move_with_promotion(picked.from, picked.to, PieceKind::Queen)?
        } else {
            match scratch.try_move(picked.from, picked.to)? {
                MoveOutcome::Applied(applied) => applied,
                MoveOutcome::PromotionPending { .. } => {
                    return Err(ChessError::Suggester(
                        "unexpected pending promotion".to_owned(),
                    ))
                }
            }
        };
        debug!("{} suggests {}", self.name(), applied.record.san);

        Ok(SuggestionReply {
            tag: request.tag,
            san: applied.record.san,
            metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::engine_trait::{EngineOptions, RequestTag};
    use crate::utils::san::resolve_san;

    fn request(moves: &str) -> SuggestionRequest {
        SuggestionRequest {
            tag: RequestTag { game: 1, ply: 0 },
            start_fen: None,
            moves: moves.to_owned(),
            options: EngineOptions::default(),
        }
    }

    #[test]
    fn suggestion_is_legal_in_the_replayed_position() {
        let mut suggester = RandomSuggester::with_seed(7);
        let reply = suggester.suggest(&request("e4")).expect("dark has moves");
        assert_eq!(reply.tag, RequestTag { game: 1, ply: 0 });

        let mut game = Game::new();
        apply_san(&mut game, "e4").expect("e4 is legal");
        resolve_san(&game, &reply.san).expect("reply should resolve");
        assert_eq!(reply.metrics[0], "legal_moves 20");
    }

    #[test]
    fn same_seed_same_choice() {
        let a = RandomSuggester::with_seed(42)
            .suggest(&request(""))
            .expect("start has moves");
        let b = RandomSuggester::with_seed(42)
            .suggest(&request(""))
            .expect("start has moves");
        assert_eq!(a.san, b.san);
    }

    #[test]
    fn finished_games_have_nothing_to_suggest() {
        let mut suggester = RandomSuggester::with_seed(1);
        assert!(matches!(
            suggester.suggest(&request("f3 e5 g4 Qh4#")),
            Err(ChessError::Suggester(_))
        ));
        assert!(suggester.suggest(&request("e5")).is_err());
    }
}
