//! Square-centric board backed by a piece arena.
//!
//! Every piece created during a game lives in `pieces` for the whole game;
//! its `PieceId` is the arena index. Captured pawns and promoted-away pawns
//! stay in the arena flagged `off_board` so undo can put the very same piece
//! back. `squares` maps each square to the live piece standing on it.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_rules::BACK_RANK;
use crate::game_state::chess_types::{Color, PieceId, PieceKind, Square};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub id: PieceId,
    pub color: Color,
    pub kind: PieceKind,
    /// Last square occupied; still meaningful while off the board.
    pub square: Square,
    pub has_moved: bool,
    pub off_board: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Option<PieceId>; 64],
    pieces: Vec<Piece>,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            squares: [None; 64],
            pieces: Vec::with_capacity(34),
        }
    }
}

impl Board {
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// The standard 32-piece starting layout.
    pub fn new_game() -> Self {
        let mut board = Self::new_empty();
        for color in [Color::Light, Color::Dark] {
            for (file, kind) in BACK_RANK.iter().enumerate() {
                board.spawn_unchecked(color, *kind, Square::at(file as u8, color.home_rank()));
            }
            for file in 0..8u8 {
                board.spawn_unchecked(color, PieceKind::Pawn, Square::at(file, color.pawn_rank()));
            }
        }
        board
    }

    /// Adds a new live piece on an empty square.
    pub fn spawn(&mut self, color: Color, kind: PieceKind, square: Square) -> ChessResult<PieceId> {
        if let Some(existing) = self.piece_at(square) {
            return Err(ChessError::InvalidPlacement(format!(
                "{square} already holds a {:?} {:?}",
                existing.color, existing.kind
            )));
        }
        Ok(self.spawn_unchecked(color, kind, square))
    }

    fn spawn_unchecked(&mut self, color: Color, kind: PieceKind, square: Square) -> PieceId {
        let id = PieceId(self.pieces.len());
        self.pieces.push(Piece {
            id,
            color,
            kind,
            square,
            has_moved: false,
            off_board: false,
        });
        self.squares[square.index()] = Some(id);
        id
    }

    /// Adds a piece to the arena without putting it on a square.
    pub(crate) fn spawn_off_board(&mut self, color: Color, kind: PieceKind, square: Square) -> PieceId {
        let id = PieceId(self.pieces.len());
        self.pieces.push(Piece {
            id,
            color,
            kind,
            square,
            has_moved: true,
            off_board: true,
        });
        id
    }

    #[inline]
    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.index()]
    }

    #[inline]
    pub fn id_at(&self, square: Square) -> Option<PieceId> {
        self.squares[square.index()]
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.id_at(square).map(|id| self.piece(id))
    }

    #[inline]
    pub fn is_empty(&self, square: Square) -> bool {
        self.squares[square.index()].is_none()
    }

    /// Color of the piece on `square`, if any.
    #[inline]
    pub fn color_at(&self, square: Square) -> Option<Color> {
        self.piece_at(square).map(|p| p.color)
    }

    /// Every piece ever created in this game, including off-board ones.
    pub fn arena(&self) -> &[Piece] {
        &self.pieces
    }

    /// Live pieces of `color`.
    pub fn active_pieces(&self, color: Color) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces
            .iter()
            .filter(move |p| !p.off_board && p.color == color)
    }

    pub fn active_count(&self) -> usize {
        self.squares.iter().filter(|s| s.is_some()).count()
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.active_pieces(color)
            .find(|p| p.kind == PieceKind::King)
            .map(|p| p.square)
    }

    /// True when nothing but the two kings is left.
    pub fn only_kings_remain(&self) -> bool {
        self.pieces
            .iter()
            .filter(|p| !p.off_board)
            .all(|p| p.kind == PieceKind::King)
    }

    /// Mask of squares occupied by `color`.
    pub fn occupancy(&self, color: Color) -> u64 {
        self.active_pieces(color).fold(0u64, |acc, p| acc | p.square.mask())
    }

    // --- Mutation primitives used by the executor and the scratch simulation ---

    /// Moves a live piece to an empty square, clearing its origin.
    pub(crate) fn relocate(&mut self, id: PieceId, to: Square) {
        let from = self.pieces[id.index()].square;
        if self.squares[from.index()] == Some(id) {
            self.squares[from.index()] = None;
        }
        self.squares[to.index()] = Some(id);
        self.pieces[id.index()].square = to;
    }

    /// Takes a piece off the board; it stays in the arena.
    pub(crate) fn take_off(&mut self, id: PieceId) {
        let square = self.pieces[id.index()].square;
        if self.squares[square.index()] == Some(id) {
            self.squares[square.index()] = None;
        }
        self.pieces[id.index()].off_board = true;
    }

    /// Puts an off-board piece back on `square`.
    pub(crate) fn put_back(&mut self, id: PieceId, square: Square) {
        let piece = &mut self.pieces[id.index()];
        piece.off_board = false;
        piece.square = square;
        self.squares[square.index()] = Some(id);
    }

    pub(crate) fn set_has_moved(&mut self, id: PieceId, has_moved: bool) {
        self.pieces[id.index()].has_moved = has_moved;
    }

    /// Turns `id` into `kind` in place. Only the scratch simulation uses this.
    pub(crate) fn set_kind(&mut self, id: PieceId, kind: PieceKind) {
        self.pieces[id.index()].kind = kind;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(file: u8, rank: u8) -> Square {
        Square::new(file, rank).expect("test square should be on the board")
    }

    #[test]
    fn new_game_has_thirty_two_pieces() {
        let board = Board::new_game();
        assert_eq!(board.active_count(), 32);
        assert_eq!(board.king_square(Color::Light), Some(sq(4, 0)));
        assert_eq!(board.king_square(Color::Dark), Some(sq(4, 7)));
        let d1 = board.piece_at(sq(3, 0)).expect("queen on d1");
        assert_eq!(d1.kind, PieceKind::Queen);
        assert!(!board.only_kings_remain());
    }

    #[test]
    fn every_live_piece_sits_on_its_own_slot() {
        let board = Board::new_game();
        for piece in board.arena() {
            assert_eq!(board.id_at(piece.square), Some(piece.id));
        }
    }

    #[test]
    fn spawn_rejects_occupied_square() {
        let mut board = Board::new_game();
        let result = board.spawn(Color::Dark, PieceKind::Queen, sq(0, 0));
        assert!(matches!(result, Err(ChessError::InvalidPlacement(_))));
    }

    #[test]
    fn take_off_and_put_back_keep_identity() {
        let mut board = Board::new_game();
        let id = board.id_at(sq(1, 0)).expect("knight on b1");
        board.take_off(id);
        assert!(board.is_empty(sq(1, 0)));
        assert!(board.piece(id).off_board);
        board.put_back(id, sq(1, 0));
        assert_eq!(board.id_at(sq(1, 0)), Some(id));
        assert_eq!(board, Board::new_game());
    }

    #[test]
    fn occupancy_masks_cover_the_home_ranks() {
        let mut board = Board::new_game();
        assert_eq!(board.occupancy(Color::Light), 0x0000_0000_0000_FFFF);
        assert_eq!(board.occupancy(Color::Dark), 0xFFFF_0000_0000_0000);

        let id = board.id_at(sq(4, 1)).expect("pawn on e2");
        board.take_off(id);
        assert_eq!(board.occupancy(Color::Light) & sq(4, 1).mask(), 0);
    }
}
