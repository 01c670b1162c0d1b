//! Perft: counts leaf nodes of the legal move tree.
//!
//! Exercises generation, special moves, the legality filter and the
//! executor together; promotions expand into one node per choice.

use crate::errors::ChessResult;
use crate::game_state::chess_types::{CandidateMove, GameStatus, PieceKind, SpecialMove};
use crate::game_state::game_state::{Game, MoveOutcome};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: usize,
    pub captures: usize,
    pub en_passant: usize,
    pub castles: usize,
    pub promotions: usize,
    pub checks: usize,
    pub checkmates: usize,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
        self.checkmates += rhs.checkmates;
    }
}

/// Leaf counts `depth` plies below `game`'s current position.
///
/// Finished games are leaves with no children, including the bare-kings draw.
pub fn perft(game: &Game, depth: u8) -> ChessResult<PerftCounts> {
    if depth == 0 {
        return Ok(PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        });
    }

    let mut total = PerftCounts::default();
    if game.is_over() {
        return Ok(total);
    }
    for candidate in game.all_legal_moves() {
        for promotion in promotion_choices(&candidate) {
            let mut child = game.clone();
            let applied = match promotion {
                Some(kind) => child.try_move_with_promotion(candidate.from, candidate.to, kind)?,
                None => match child.try_move(candidate.from, candidate.to)? {
                    MoveOutcome::Applied(applied) => applied,
                    MoveOutcome::PromotionPending { .. } => continue,
                },
            };

            if depth == 1 {
                total.merge(leaf_counts(&candidate, applied.status));
            } else {
                total.merge(perft(&child, depth - 1)?);
            }
        }
    }

    Ok(total)
}

/// Leaf count only, split by root move.
pub fn perft_divide(game: &Game, depth: u8) -> ChessResult<Vec<(String, usize)>> {
    let mut out = Vec::new();
    if depth == 0 || game.is_over() {
        return Ok(out);
    }
    for candidate in game.all_legal_moves() {
        for promotion in promotion_choices(&candidate) {
            let mut child = game.clone();
            let applied = match promotion {
                Some(kind) => child.try_move_with_promotion(candidate.from, candidate.to, kind)?,
                None => match child.try_move(candidate.from, candidate.to)? {
                    MoveOutcome::Applied(applied) => applied,
                    MoveOutcome::PromotionPending { .. } => continue,
                },
            };
            let nodes = perft(&child, depth - 1)?.nodes;
            out.push((applied.record.san, nodes));
        }
    }
    Ok(out)
}

fn promotion_choices(candidate: &CandidateMove) -> Vec<Option<PieceKind>> {
    if candidate.special == SpecialMove::Promotion {
        PieceKind::PROMOTION_CHOICES.iter().copied().map(Some).collect()
    } else {
        vec![None]
    }
}

fn leaf_counts(candidate: &CandidateMove, status: GameStatus) -> PerftCounts {
    PerftCounts {
        nodes: 1,
        captures: usize::from(candidate.is_capture()),
        en_passant: usize::from(candidate.special == SpecialMove::EnPassant),
        castles: usize::from(matches!(candidate.special, SpecialMove::Castle(_))),
        promotions: usize::from(candidate.special == SpecialMove::Promotion),
        checks: usize::from(matches!(
            status,
            GameStatus::Check | GameStatus::Checkmate { .. }
        )),
        checkmates: usize::from(matches!(status, GameStatus::Checkmate { .. })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_position_counts() {
        let game = Game::new();
        assert_eq!(perft(&game, 1).expect("perft should run").nodes, 20);
        assert_eq!(perft(&game, 2).expect("perft should run").nodes, 400);
        let depth3 = perft(&game, 3).expect("perft should run");
        assert_eq!(depth3.nodes, 8_902);
        assert_eq!(depth3.captures, 34);
        assert_eq!(depth3.checks, 12);
    }

    #[test]
    fn rank_pinned_en_passant_position() {
        let game = Game::from_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w").expect("FEN should parse");
        assert_eq!(perft(&game, 1).expect("perft should run").nodes, 14);
        assert_eq!(perft(&game, 2).expect("perft should run").nodes, 191);
    }

    #[test]
    fn promotions_expand_into_four_nodes() {
        let game = Game::from_fen("7k/P7/8/8/8/8/8/K7 w").expect("FEN should parse");
        let counts = perft(&game, 1).expect("perft should run");
        // a8=Q/R/B/N plus three king moves.
        assert_eq!(counts.nodes, 7);
        assert_eq!(counts.promotions, 4);
    }

    #[test]
    fn divide_sums_to_perft() {
        let game = Game::new();
        let divide = perft_divide(&game, 2).expect("divide should run");
        assert_eq!(divide.len(), 20);
        assert_eq!(divide.iter().map(|(_, n)| n).sum::<usize>(), 400);
    }
}
