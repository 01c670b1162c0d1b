//! Core value types shared by the board, generators, executor and notation.
//!
//! Squares are `(file, rank)` pairs with `a1 == (0, 0)` and `h8 == (7, 7)`.
//! Light is team 0 and moves first from ranks 1-2; Dark is team 1.

use std::fmt;

/// Side to move / piece owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::Light => 0,
            Color::Dark => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::Light => Color::Dark,
            Color::Dark => Color::Light,
        }
    }

    /// Rank delta of a pawn step for this side.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::Light => 1,
            Color::Dark => -1,
        }
    }

    /// Rank holding the king and rooks at game start.
    #[inline]
    pub const fn home_rank(self) -> u8 {
        match self {
            Color::Light => 0,
            Color::Dark => 7,
        }
    }

    #[inline]
    pub const fn pawn_rank(self) -> u8 {
        match self {
            Color::Light => 1,
            Color::Dark => 6,
        }
    }

    /// Rank on which this side's pawns promote.
    #[inline]
    pub const fn promotion_rank(self) -> u8 {
        match self {
            Color::Light => 7,
            Color::Dark => 0,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Light => write!(f, "light"),
            Color::Dark => write!(f, "dark"),
        }
    }
}

/// Piece kind. The set is closed; generation dispatches on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Kinds a pawn may be replaced by on the far rank.
    pub const PROMOTION_CHOICES: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    /// SAN letter; `None` for pawns.
    pub const fn san_letter(self) -> Option<char> {
        match self {
            PieceKind::Pawn => None,
            PieceKind::Knight => Some('N'),
            PieceKind::Bishop => Some('B'),
            PieceKind::Rook => Some('R'),
            PieceKind::Queen => Some('Q'),
            PieceKind::King => Some('K'),
        }
    }

    /// Parses an uppercase SAN piece letter.
    pub fn from_san_letter(c: char) -> Option<Self> {
        match c {
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_promotion_choice(self) -> bool {
        matches!(
            self,
            PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop | PieceKind::Knight
        )
    }
}

/// A board coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    /// Builds a square, returning `None` outside the 8x8 board.
    #[inline]
    pub const fn new(file: u8, rank: u8) -> Option<Self> {
        if file < 8 && rank < 8 {
            Some(Self { file, rank })
        } else {
            None
        }
    }

    /// Builds a square from indices known to be on the board.
    ///
    /// Only used with constants and loop bounds `0..8`.
    #[inline]
    pub(crate) const fn at(file: u8, rank: u8) -> Self {
        Self {
            file: file & 7,
            rank: rank & 7,
        }
    }

    #[inline]
    pub const fn file(self) -> u8 {
        self.file
    }

    #[inline]
    pub const fn rank(self) -> u8 {
        self.rank
    }

    /// Square index with `a1 == 0`, `h1 == 7`, `h8 == 63`.
    #[inline]
    pub const fn index(self) -> usize {
        (self.rank as usize) * 8 + self.file as usize
    }

    /// One-hot mask of this square.
    #[inline]
    pub const fn mask(self) -> u64 {
        1u64 << self.index()
    }

    /// Moves the square by a file/rank delta, `None` when it leaves the board.
    #[inline]
    pub fn offset(self, d_file: i8, d_rank: i8) -> Option<Self> {
        let file = self.file as i8 + d_file;
        let rank = self.rank as i8 + d_rank;
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Some(Self {
                file: file as u8,
                rank: rank as u8,
            })
        } else {
            None
        }
    }

    /// All 64 squares, rank by rank from a1.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64u8).map(|i| Square::at(i % 8, i / 8))
    }

    #[inline]
    pub const fn file_char(self) -> char {
        (b'a' + self.file) as char
    }

    #[inline]
    pub const fn rank_char(self) -> char {
        (b'1' + self.rank) as char
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

/// Stable identity of a piece within one game's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub(crate) usize);

impl PieceId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Which rook a castle move pairs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

/// Flag attached to a generated candidate move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialMove {
    None,
    Promotion,
    EnPassant,
    Castle(CastleSide),
}

/// A pseudo-legal or legal destination for one piece.
///
/// `capture` names the square of the piece removed by this move. For en
/// passant it differs from `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CandidateMove {
    pub from: Square,
    pub to: Square,
    pub capture: Option<Square>,
    pub special: SpecialMove,
}

impl CandidateMove {
    #[inline]
    pub const fn quiet(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            capture: None,
            special: SpecialMove::None,
        }
    }

    #[inline]
    pub const fn capture(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            capture: Some(to),
            special: SpecialMove::None,
        }
    }

    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.capture.is_some()
    }
}

/// Classifier verdict for the side about to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Ongoing,
    Check,
    Checkmate { winner: Color },
    Stalemate,
}

impl GameStatus {
    #[inline]
    pub const fn is_game_over(self) -> bool {
        matches!(self, GameStatus::Checkmate { .. } | GameStatus::Stalemate)
    }

    /// PGN result token for this status.
    pub const fn result_token(self) -> &'static str {
        match self {
            GameStatus::Checkmate {
                winner: Color::Light,
            } => "1-0",
            GameStatus::Checkmate {
                winner: Color::Dark,
            } => "0-1",
            GameStatus::Stalemate => "1/2-1/2",
            GameStatus::Ongoing | GameStatus::Check => "*",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_offsets_stay_on_board() {
        let a1 = Square::new(0, 0).expect("a1 is on the board");
        assert_eq!(a1.offset(-1, 0), None);
        assert_eq!(a1.offset(1, 2), Square::new(1, 2));
        assert_eq!(a1.to_string(), "a1");
        let h8 = Square::new(7, 7).expect("h8 is on the board");
        assert_eq!(h8.index(), 63);
        assert_eq!(h8.offset(0, 1), None);
    }

    #[test]
    fn color_geometry_mirrors() {
        assert_eq!(Color::Light.forward(), -Color::Dark.forward());
        assert_eq!(Color::Light.promotion_rank(), Color::Dark.home_rank());
        assert_eq!(Color::Dark.opposite(), Color::Light);
    }

    #[test]
    fn result_tokens_follow_winner() {
        assert_eq!(
            GameStatus::Checkmate {
                winner: Color::Dark
            }
            .result_token(),
            "0-1"
        );
        assert_eq!(GameStatus::Check.result_token(), "*");
        assert!(GameStatus::Stalemate.is_game_over());
        assert!(!GameStatus::Check.is_game_over());
    }
}
