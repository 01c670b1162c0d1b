//! The game: board, history and whose turn it is.
//!
//! Every ply is planned on a cloned board (record, classification, SAN) and
//! swapped in only once nothing can fail, so a rejected move leaves the game
//! exactly as it was.

use log::{debug, info};

use crate::errors::{ChessError, ChessResult};
use crate::game_state::board::{Board, Piece};
use crate::game_state::chess_types::{
    CandidateMove, Color, GameStatus, PieceId, PieceKind, Square, SpecialMove,
};
use crate::game_state::move_history::MoveHistory;
use crate::game_state::move_record::MoveRecord;
use crate::move_generation::attacks::is_king_in_check;
use crate::move_generation::game_end::classify;
use crate::move_generation::legal_move_apply::{apply_record, build_record, revert_record};
use crate::move_generation::legal_move_generator::{legal_moves_for_piece, legal_moves_for_side};
use crate::utils::fen::{generate_fen, generate_placement, parse_fen};
use crate::utils::san::move_to_san;

/// Cached legal set of the last selected piece.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub piece: PieceId,
    pub moves: Vec<CandidateMove>,
}

/// A committed ply as seen by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveApplied {
    pub record: MoveRecord,
    pub changed_squares: Vec<Square>,
    pub status: GameStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Applied(MoveApplied),
    /// The pawn reached the far rank; call `complete_promotion` with a kind.
    PromotionPending { from: Square, to: Square },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Back,
    Forward,
}

/// Result of one cursor step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub direction: Direction,
    pub record: MoveRecord,
    pub changed_squares: Vec<Square>,
    pub status: GameStatus,
}

#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    history: MoveHistory,
    side_to_move: Color,
    status: GameStatus,
    initial_side: Color,
    initial_status: GameStatus,
    /// Six-field FEN of a non-standard starting position.
    setup_fen: Option<String>,
    selection: Option<Selection>,
    pending_promotion: Option<(Square, Square)>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// A fresh game from the standard starting position.
    pub fn new() -> Self {
        Self::from_board(Board::new_game(), Color::Light, None)
    }

    /// A game starting from `fen` (placement, optionally side and castling).
    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        let (board, side) = parse_fen(fen)?;
        let setup = generate_fen(&board, side);
        Ok(Self::from_board(board, side, Some(setup)))
    }

    fn from_board(board: Board, side_to_move: Color, setup_fen: Option<String>) -> Self {
        let history = MoveHistory::new();
        let status = classify(&board, history.view(), side_to_move);
        Self {
            board,
            history,
            side_to_move,
            status,
            initial_side: side_to_move,
            initial_status: status,
            setup_fen,
            selection: None,
            pending_promotion: None,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Side that moved first from the starting position.
    #[inline]
    pub fn initial_side(&self) -> Color {
        self.initial_side
    }

    #[inline]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.status.is_game_over()
    }

    /// Index of the last applied ply; -1 at the starting position.
    #[inline]
    pub fn cursor(&self) -> isize {
        self.history.cursor()
    }

    pub fn setup_fen(&self) -> Option<&str> {
        self.setup_fen.as_deref()
    }

    pub fn pending_promotion(&self) -> Option<(Square, Square)> {
        self.pending_promotion
    }

    /// FEN placement field of the displayed position.
    pub fn placement(&self) -> String {
        generate_placement(&self.board)
    }

    /// Legal moves of the piece on `square` and caches them as the selection.
    ///
    /// Empty for an empty square or a piece of the side not to move.
    pub fn legal_moves(&mut self, square: Square) -> Vec<CandidateMove> {
        let moves = self.compute_legal_moves(square);
        self.selection = self.board.id_at(square).map(|piece| Selection {
            piece,
            moves: moves.clone(),
        });
        debug!("{} legal moves from {square}", moves.len());
        moves
    }

    /// Legal moves of the piece on `square` without touching the selection.
    pub fn compute_legal_moves(&self, square: Square) -> Vec<CandidateMove> {
        match self.board.piece_at(square) {
            Some(piece) if piece.color == self.side_to_move => {
                legal_moves_for_piece(&self.board, self.history.view(), piece)
            }
            _ => Vec::new(),
        }
    }

    /// Every legal move of the side to move.
    pub fn all_legal_moves(&self) -> Vec<CandidateMove> {
        legal_moves_for_side(&self.board, self.history.view(), self.side_to_move)
    }

    /// Moves the piece on `from` to `to`.
    ///
    /// A pawn reaching the far rank is not played yet: the pair is stored and
    /// `PromotionPending` returned until `complete_promotion` names a kind.
    pub fn try_move(&mut self, from: Square, to: Square) -> ChessResult<MoveOutcome> {
        let (mover, candidate) = self.validate(from, to)?;
        if candidate.special == SpecialMove::Promotion {
            debug!("promotion pending for {from}{to}");
            self.pending_promotion = Some((from, to));
            return Ok(MoveOutcome::PromotionPending { from, to });
        }
        self.commit(&mover, &candidate, None).map(MoveOutcome::Applied)
    }

    /// Plays a promotion in one call.
    pub fn try_move_with_promotion(
        &mut self,
        from: Square,
        to: Square,
        kind: PieceKind,
    ) -> ChessResult<MoveApplied> {
        let (mover, candidate) = self.validate(from, to)?;
        self.commit(&mover, &candidate, Some(kind))
    }

    /// Finishes the promotion stored by `try_move`.
    pub fn complete_promotion(&mut self, kind: PieceKind) -> ChessResult<MoveApplied> {
        let (from, to) = self.pending_promotion.ok_or_else(|| {
            ChessError::InvalidSpecialState("no promotion is pending".to_owned())
        })?;
        self.try_move_with_promotion(from, to, kind)
    }

    pub fn cancel_promotion(&mut self) {
        self.pending_promotion = None;
    }

    fn validate(&self, from: Square, to: Square) -> ChessResult<(Piece, CandidateMove)> {
        let mover = self
            .board
            .piece_at(from)
            .ok_or(ChessError::NoPieceOnSquare(from))?;
        if mover.color != self.side_to_move {
            return Err(ChessError::WrongTurn {
                expected: self.side_to_move,
            });
        }
        if !self.history.is_at_tail() {
            return Err(ChessError::HistoryNotAtTail);
        }
        if self.status.is_game_over() {
            return Err(ChessError::GameOver);
        }
        if self.board.color_at(to) == Some(mover.color) {
            return Err(ChessError::FriendlyOccupied(to));
        }

        let candidate = match &self.selection {
            Some(selection) if selection.piece == mover.id => {
                selection.moves.iter().find(|m| m.to == to).copied()
            }
            _ => legal_moves_for_piece(&self.board, self.history.view(), mover)
                .into_iter()
                .find(|m| m.to == to),
        };

        match candidate {
            Some(candidate) => Ok((mover.clone(), candidate)),
            None => {
                debug!("rejected {from}{to}: not a legal destination");
                Err(ChessError::IllegalDestination { from, to })
            }
        }
    }

    fn commit(
        &mut self,
        mover: &Piece,
        candidate: &CandidateMove,
        promotion: Option<PieceKind>,
    ) -> ChessResult<MoveApplied> {
        let mut next = self.board.clone();
        let mut record = build_record(&mut next, mover, candidate, promotion)?;
        apply_record(&mut next, &record);

        let defender = mover.color.opposite();
        let status = classify(&next, self.history.view().with_pending(&record), defender);
        record.san = move_to_san(&self.board, self.history.view(), &record, status);
        record.status_after = status;

        self.board = next;
        self.history.push(record.clone());
        self.side_to_move = defender;
        self.status = status;
        self.selection = None;
        self.pending_promotion = None;

        info!("ply {}: {} played {}", self.history.cursor(), mover.color, record.san);
        if status.is_game_over() {
            info!("game over: {}", status.result_token());
        }

        Ok(MoveApplied {
            changed_squares: record.changed_squares(),
            status,
            record,
        })
    }

    /// Steps the cursor back one ply; `None` at the starting position.
    pub fn move_back(&mut self) -> Option<Navigation> {
        let record = self.history.step_back()?.clone();
        revert_record(&mut self.board, &record);
        self.side_to_move = record.color;
        self.status = self
            .history
            .last_applied()
            .map_or(self.initial_status, |last| last.status_after);
        self.selection = None;
        self.pending_promotion = None;
        debug!("back to ply {}", self.history.cursor());

        Some(Navigation {
            direction: Direction::Back,
            changed_squares: record.changed_squares(),
            status: self.status,
            record,
        })
    }

    /// Re-applies the next recorded ply; `None` at the tail.
    pub fn move_forward(&mut self) -> Option<Navigation> {
        let record = self.history.step_forward()?.clone();
        apply_record(&mut self.board, &record);
        self.side_to_move = record.color.opposite();
        self.status = record.status_after;
        self.selection = None;
        self.pending_promotion = None;
        debug!("forward to ply {}", self.history.cursor());

        Some(Navigation {
            direction: Direction::Forward,
            changed_squares: record.changed_squares(),
            status: self.status,
            record,
        })
    }

    /// True when `color`'s king is attacked in the displayed position.
    pub fn in_check(&self, color: Color) -> bool {
        is_king_in_check(&self.board, color)
    }
}
