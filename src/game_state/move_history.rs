//! Ordered ply records plus a cursor.
//!
//! The cursor is the index of the last applied record; `-1` is the initial
//! position. Records past the cursor are "future" plies reachable with
//! `step_forward`. The board always equals the initial position with
//! `records[0..=cursor]` applied in order.

use crate::game_state::chess_types::Square;
use crate::game_state::move_record::MoveRecord;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveHistory {
    records: Vec<MoveRecord>,
    applied: usize,
}

impl MoveHistory {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Index of the last applied record, `-1` at the initial position.
    #[inline]
    pub fn cursor(&self) -> isize {
        self.applied as isize - 1
    }

    /// Number of applied plies.
    #[inline]
    pub fn applied_len(&self) -> usize {
        self.applied
    }

    #[inline]
    pub fn is_at_tail(&self) -> bool {
        self.applied == self.records.len()
    }

    /// Records up to and including the cursor.
    pub fn applied(&self) -> &[MoveRecord] {
        &self.records[..self.applied]
    }

    /// Every record, including undone ones.
    pub fn records(&self) -> &[MoveRecord] {
        &self.records
    }

    /// The record at the cursor.
    pub fn last_applied(&self) -> Option<&MoveRecord> {
        self.applied.checked_sub(1).map(|i| &self.records[i])
    }

    /// True when any applied ply started on `square`.
    pub fn any_move_from(&self, square: Square) -> bool {
        self.view().any_move_from(square)
    }

    /// Read-only view of the applied plies for special-move generation.
    #[inline]
    pub fn view(&self) -> HistoryView<'_> {
        HistoryView {
            applied: self.applied(),
            pending: None,
        }
    }

    /// Appends at the tail and moves the cursor onto it.
    ///
    /// Callers reject plies while the cursor is behind the tail.
    pub(crate) fn push(&mut self, record: MoveRecord) {
        debug_assert!(self.is_at_tail(), "push behind history tail");
        self.records.push(record);
        self.applied = self.records.len();
    }

    /// Moves the cursor back one ply and returns the record to undo.
    pub(crate) fn step_back(&mut self) -> Option<&MoveRecord> {
        let index = self.applied.checked_sub(1)?;
        self.applied = index;
        Some(&self.records[index])
    }

    /// Moves the cursor forward one ply and returns the record to redo.
    pub(crate) fn step_forward(&mut self) -> Option<&MoveRecord> {
        if self.is_at_tail() {
            return None;
        }
        let index = self.applied;
        self.applied += 1;
        Some(&self.records[index])
    }
}

/// The applied plies as seen by castling and en-passant generation.
///
/// `pending` is a ply being planned on a scratch board; it counts as played
/// after `applied`.
#[derive(Debug, Clone, Copy)]
pub struct HistoryView<'a> {
    applied: &'a [MoveRecord],
    pending: Option<&'a MoveRecord>,
}

impl<'a> HistoryView<'a> {
    /// A view with no plies, as at the initial position.
    pub const fn empty() -> Self {
        HistoryView {
            applied: &[],
            pending: None,
        }
    }

    /// This view followed by `record`.
    pub fn with_pending(self, record: &'a MoveRecord) -> HistoryView<'a> {
        HistoryView {
            applied: self.applied,
            pending: Some(record),
        }
    }

    /// The most recent ply.
    pub fn last(&self) -> Option<&'a MoveRecord> {
        self.pending.or_else(|| self.applied.last())
    }

    pub fn any_move_from(&self, square: Square) -> bool {
        self.pending.is_some_and(|r| r.from == square) || self.applied.iter().any(|r| r.from == square)
    }
}
