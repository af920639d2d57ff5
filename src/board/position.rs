// Copyright 2023 Tobin Edwards
//
//    Licensed under the Apache License, Version 2.0 (the "License");
//    you may not use this file except in compliance with the License.
//    You may obtain a copy of the License at
//
//        http://www.apache.org/licenses/LICENSE-2.0
//
//    Unless required by applicable law or agreed to in writing, software
//    distributed under the License is distributed on an "AS IS" BASIS,
//    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//    See the License for the specific language governing permissions and
//    limitations under the License.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::ops::{Index, IndexMut};
use strum::IntoEnumIterator;

use super::castling::CastlingRights;
use super::material::{Color, Material, Pair, Piece};
use super::moves::{MoveError, Promotion};
use super::square::{Rank, Square};
use super::Turn;

use Color::*;

/// The mailbox board: one `Option<Material>` per square, indexed by
/// `Square` in rank-major order (a8 first, h1 last).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Squares([Option<Material>; 64]);

impl Squares {
    pub fn empty() -> Self {
        Self([None; 64])
    }

    /// Parse eight 8-character rows, top (black) rank first. Uppercase is
    /// white, lowercase black, `.` empty. Returns `None` on any shape or
    /// character mismatch.
    pub fn try_from_rows<'a, I>(rows: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut squares = Self::empty();
        let mut count = 0;
        for (rank_index, row) in rows.into_iter().enumerate() {
            if rank_index >= 8 || row.chars().count() != 8 {
                return None;
            }
            for (file_index, c) in row.chars().enumerate() {
                let square = Square::from_index(rank_index * 8 + file_index);
                squares[square] = match c {
                    '.' => None,
                    _ => Some(Material::try_from_char(c)?),
                };
            }
            count += 1;
        }
        if count != 8 {
            return None;
        }
        Some(squares)
    }

    /// The inverse of `try_from_rows`.
    pub fn to_rows(&self) -> [String; 8] {
        let mut rows: [String; 8] = Default::default();
        for (rank_index, row) in rows.iter_mut().enumerate() {
            for file_index in 0..8 {
                let square = Square::from_index(rank_index * 8 + file_index);
                row.push(match self[square] {
                    Some(material) => material.to_char(),
                    None => '.',
                });
            }
        }
        rows
    }

    pub fn occupied(&self) -> impl Iterator<Item = (Square, Material)> + '_ {
        Square::iter().filter_map(|square| self[square].map(|material| (square, material)))
    }

    pub fn king(&self, color: Color) -> Option<Square> {
        self.occupied()
            .find(|(_, material)| material.is(color, Piece::King))
            .map(|(square, _)| square)
    }

    pub fn count(&self, color: Color, piece: Piece) -> usize {
        self.occupied()
            .filter(|(_, material)| material.is(color, piece))
            .count()
    }
}

impl Index<Square> for Squares {
    type Output = Option<Material>;
    fn index(&self, index: Square) -> &Self::Output {
        &self.0[index.to_index()]
    }
}

impl IndexMut<Square> for Squares {
    fn index_mut(&mut self, index: Square) -> &mut Self::Output {
        &mut self.0[index.to_index()]
    }
}

static INITIAL_LAYOUT: Lazy<Squares> = Lazy::new(|| {
    Squares::try_from_rows([
        "rnbqkbnr",
        "pppppppp",
        "........",
        "........",
        "........",
        "........",
        "PPPPPPPP",
        "RNBQKBNR",
    ])
    .expect("initial layout literal is well-formed")
});

pub(crate) struct MoveEffects {
    pub captured: Option<Material>,
    pub pawn_move: bool,
}

impl MoveEffects {
    /// A capture or pawn move resets the halfmove clock (and makes every
    /// earlier position unrepeatable).
    pub fn progress(&self) -> bool {
        self.captured.is_some() || self.pawn_move
    }
}

/// The full game state: board, side to move, castling rights, en-passant
/// target, the two counters, and the repetition table. Legality queries
/// work on clones; `apply_move` is the only mutation a committed game
/// path performs.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    squares: Squares,
    turn: Color,
    castling: Pair<CastlingRights>,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
    repetitions: HashMap<String, u8>,
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl Position {
    pub fn new() -> Self {
        let mut position = Self {
            squares: INITIAL_LAYOUT.clone(),
            turn: White,
            castling: Pair::default(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            repetitions: HashMap::new(),
        };
        position.record_key();
        position
    }

    /// Assemble a position from externally validated parts (the snapshot
    /// loader). The repetition table is taken as-is; nothing is recorded.
    pub(crate) fn from_parts(
        squares: Squares,
        turn: Color,
        castling: Pair<CastlingRights>,
        en_passant: Option<Square>,
        halfmove_clock: u32,
        fullmove_number: u32,
        repetitions: HashMap<String, u8>,
    ) -> Self {
        Self {
            squares,
            turn,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
            repetitions,
        }
    }

    pub fn squares(&self) -> &Squares {
        &self.squares
    }

    pub fn castling(&self, color: Color) -> &CastlingRights {
        &self.castling[color]
    }

    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    pub fn repetitions(&self) -> &HashMap<String, u8> {
        &self.repetitions
    }

    /// Occurrences of the current position (by canonical key).
    pub fn repetition_count(&self) -> u8 {
        self.repetitions.get(&self.key()).copied().unwrap_or(0)
    }

    /// Canonical position key: the eight board rows, side to move,
    /// compact rights letters, and the en-passant square (or `-`).
    /// Two positions repeat iff their keys are equal.
    pub fn key(&self) -> String {
        let mut key = String::with_capacity(64 + 8);
        for row in self.to_rows() {
            key.push_str(&row);
        }
        key.push(self.turn.to_char());
        let mut rights = String::new();
        if self.castling[White].oo() {
            rights.push('K');
        }
        if self.castling[White].ooo() {
            rights.push('Q');
        }
        if self.castling[Black].oo() {
            rights.push('k');
        }
        if self.castling[Black].ooo() {
            rights.push('q');
        }
        if rights.is_empty() {
            rights.push('-');
        }
        key.push_str(&rights);
        match self.en_passant {
            Some(square) => key.push_str(&square.to_string()),
            None => key.push('-'),
        }
        key
    }

    pub fn to_rows(&self) -> [String; 8] {
        self.squares.to_rows()
    }

    /// Apply a committed move. The caller must have validated `to`
    /// against `legal_destinations`; the only rejection here is an empty
    /// source square. A missing promotion choice defaults to queen.
    pub fn apply_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<Promotion>,
    ) -> Result<(), MoveError> {
        let effects = self.edit_board(from, to, promotion.unwrap_or(Promotion::Queen))?;
        if effects.progress() {
            self.halfmove_clock = 0;
            // Trap-door: no position prior to a capture or pawn move can
            // ever recur, so earlier keys can be dropped
            self.repetitions.clear();
        } else {
            self.halfmove_clock += 1;
        }
        self.turn = !self.turn;
        if self.turn == White {
            self.fullmove_number += 1;
        }
        self.record_key();
        Ok(())
    }

    /// Board edit shared by committed moves and legality simulations:
    /// relocation (plus the castling rook or the en-passant victim),
    /// promotion, en-passant target recomputation and rights revocation.
    /// Clocks, turn and the repetition table are untouched.
    pub(crate) fn edit_board(
        &mut self,
        from: Square,
        to: Square,
        promotion: Promotion,
    ) -> Result<MoveEffects, MoveError> {
        let material = self.squares[from].ok_or(MoveError::EmptySquare)?;
        let color = material.color();
        let mut en_passant = None;
        let captured;

        if material.piece().is_king() && (to.file() - from.file()).abs() == 2 {
            // Castle: the generator has vetted rights, lanes and attacks;
            // move king and rook together
            let rights = self.castling[color];
            let (rook_src, rook_dest) = if to.file() > from.file() {
                (rights.oo_rook_src(), rights.oo_rook_dest())
            } else {
                (rights.ooo_rook_src(), rights.ooo_rook_dest())
            };
            self.relocate(from, to);
            self.relocate(rook_src, rook_dest);
            self.castling[color].clear();
            captured = None;
        } else if material.piece().is_pawn()
            && self.en_passant == Some(to)
            && self.squares[to].is_none()
            && from.file() != to.file()
        {
            // En passant: the captured pawn sits behind the destination,
            // on the mover's own rank
            self.relocate(from, to);
            let victim = Square::new(to.file(), from.rank());
            captured = self.squares[victim].take();
        } else {
            captured = self.relocate(from, to);
            if material.piece().is_pawn() && to.rank() == Rank::back_rank(!color) {
                if let Some(pawn) = self.squares[to].as_mut() {
                    pawn.set_piece(promotion.into());
                }
            }
            if material.piece().is_pawn() && (to.rank() - from.rank()).abs() == 2 {
                let middle = (from.rank_index() + to.rank_index()) / 2;
                en_passant = Some(Square::from_index(middle * 8 + from.file_index()));
            }
            self.castling[color].update(from);
            self.castling[!color].update(to);
        }

        self.en_passant = en_passant;
        Ok(MoveEffects {
            captured,
            pawn_move: material.piece().is_pawn(),
        })
    }

    fn relocate(&mut self, from: Square, to: Square) -> Option<Material> {
        let material = self.squares[from].take();
        let replaced = self.squares[to];
        self.squares[to] = material;
        replaced
    }

    fn record_key(&mut self) {
        let key = self.key();
        *self.repetitions.entry(key).or_insert(0) += 1;
    }
}

impl Turn for Position {
    #[inline]
    fn turn(&self) -> Color {
        self.turn
    }
}

impl Index<Square> for Position {
    type Output = Option<Material>;
    #[inline]
    fn index(&self, index: Square) -> &Self::Output {
        &self.squares[index]
    }
}

impl AsRef<Self> for Position {
    fn as_ref(&self) -> &Self {
        self
    }
}

#[cfg(test)]
impl Position {
    /// An empty board with all rights cleared; build it up with
    /// `set_contents`.
    pub fn blank() -> Self {
        Self {
            squares: Squares::empty(),
            turn: White,
            castling: Pair::new(
                CastlingRights::new(White, false, false),
                CastlingRights::new(Black, false, false),
            ),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            repetitions: HashMap::new(),
        }
    }
    pub fn set_contents(mut self, square: Square, value: Option<Material>) -> Self {
        self.squares[square] = value;
        self
    }
    pub fn set_turn(mut self, value: Color) -> Self {
        self.turn = value;
        self
    }
    pub fn set_en_passant(mut self, value: Option<Square>) -> Self {
        self.en_passant = value;
        self
    }
    pub fn set_castling(mut self, color: Color, oo: bool, ooo: bool) -> Self {
        self.castling[color] = CastlingRights::new(color, oo, ooo);
        self
    }
    pub fn set_halfmove_clock(mut self, value: u32) -> Self {
        self.halfmove_clock = value;
        self
    }
    pub fn set_fullmove_number(mut self, value: u32) -> Self {
        self.fullmove_number = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Square::*;

    #[test]
    fn test_initial_layout() {
        let position = Position::new();
        assert_eq!(position[E1], Some(Material::WK));
        assert_eq!(position[D8], Some(Material::BQ));
        assert_eq!(position[A2], Some(Material::WP));
        assert_eq!(position[H7], Some(Material::BP));
        assert_eq!(position[E4], None);
        assert_eq!(position.turn(), White);
        assert_eq!(position.halfmove_clock(), 0);
        assert_eq!(position.fullmove_number(), 1);
    }

    #[test]
    fn test_initial_key_is_recorded() {
        let position = Position::new();
        assert_eq!(position.repetition_count(), 1);
    }

    #[test]
    fn test_rows_round_trip() {
        let position = Position::new();
        let rows = position.to_rows();
        assert_eq!(rows[0], "rnbqkbnr");
        assert_eq!(rows[6], "PPPPPPPP");
        let squares = Squares::try_from_rows(rows.iter().map(String::as_str)).unwrap();
        assert_eq!(&squares, position.squares());
    }

    #[test]
    fn test_key_format() {
        let key = Position::new().key();
        assert!(key.starts_with("rnbqkbnrpppppppp"));
        assert!(key.ends_with("wKQkq-"));
    }

    #[test]
    fn test_double_advance_sets_en_passant() {
        let mut position = Position::new();
        position.apply_move(E2, E4, None).unwrap();
        assert_eq!(position.en_passant(), Some(E3));
        assert_eq!(position.turn(), Black);
        position.apply_move(G8, F6, None).unwrap();
        assert_eq!(position.en_passant(), None);
    }

    #[test]
    fn test_halfmove_and_fullmove_counters() {
        let mut position = Position::new();
        position.apply_move(E2, E4, None).unwrap();
        assert_eq!(position.halfmove_clock(), 0);
        assert_eq!(position.fullmove_number(), 1);
        position.apply_move(E7, E5, None).unwrap();
        assert_eq!(position.fullmove_number(), 2);
        position.apply_move(G1, F3, None).unwrap();
        assert_eq!(position.halfmove_clock(), 1);
    }

    #[test]
    fn test_capture_resets_halfmove_clock() {
        let mut position = Position::new();
        position.apply_move(G1, F3, None).unwrap();
        position.apply_move(B8, C6, None).unwrap();
        assert_eq!(position.halfmove_clock(), 2);
        position.apply_move(E2, E4, None).unwrap();
        assert_eq!(position.halfmove_clock(), 0);
    }

    #[test]
    fn test_king_move_clears_both_rights() {
        let mut position = Position::new();
        position.apply_move(E2, E4, None).unwrap();
        position.apply_move(E7, E5, None).unwrap();
        position.apply_move(E1, E2, None).unwrap();
        assert!(!position.castling(White).oo());
        assert!(!position.castling(White).ooo());
        assert!(position.castling(Black).oo());
    }

    #[test]
    fn test_rook_move_clears_one_right() {
        let mut position = Position::new();
        position.apply_move(H2, H4, None).unwrap();
        position.apply_move(H7, H5, None).unwrap();
        position.apply_move(H1, H3, None).unwrap();
        assert!(!position.castling(White).oo());
        assert!(position.castling(White).ooo());
    }

    #[test]
    fn test_castle_moves_both_pieces() {
        let mut position = Position::new()
            .set_contents(F1, None)
            .set_contents(G1, None);
        position.apply_move(E1, G1, None).unwrap();
        assert_eq!(position[G1], Some(Material::WK));
        assert_eq!(position[F1], Some(Material::WR));
        assert_eq!(position[E1], None);
        assert_eq!(position[H1], None);
        assert!(!position.castling(White).oo());
        assert!(!position.castling(White).ooo());
    }

    #[test]
    fn test_en_passant_capture_removes_victim() {
        let mut position = Position::new();
        position.apply_move(E2, E4, None).unwrap();
        position.apply_move(A7, A6, None).unwrap();
        position.apply_move(E4, E5, None).unwrap();
        position.apply_move(D7, D5, None).unwrap();
        assert_eq!(position.en_passant(), Some(D6));
        position.apply_move(E5, D6, None).unwrap();
        assert_eq!(position[D6], Some(Material::WP));
        assert_eq!(position[D5], None);
        assert_eq!(position.halfmove_clock(), 0);
    }

    #[test]
    fn test_promotion_defaults_to_queen() {
        let mut position = Position::blank()
            .set_contents(A7, Some(Material::WP))
            .set_contents(E1, Some(Material::WK))
            .set_contents(E8, Some(Material::BK));
        position.apply_move(A7, A8, None).unwrap();
        assert_eq!(position[A8], Some(Material::WQ));
    }

    #[test]
    fn test_promotion_choice_is_honored() {
        let mut position = Position::blank()
            .set_contents(A7, Some(Material::WP))
            .set_contents(E1, Some(Material::WK))
            .set_contents(E8, Some(Material::BK));
        position
            .apply_move(A7, A8, Some(Promotion::Knight))
            .unwrap();
        assert_eq!(position[A8], Some(Material::WN));
    }

    #[test]
    fn test_apply_from_empty_square_is_rejected() {
        let mut position = Position::new();
        assert!(position.apply_move(E4, E5, None).is_err());
    }

    #[test]
    fn test_repetition_counting() {
        let mut position = Position::new();
        position.apply_move(G1, F3, None).unwrap();
        position.apply_move(G8, F6, None).unwrap();
        position.apply_move(F3, G1, None).unwrap();
        position.apply_move(F6, G8, None).unwrap();
        // back at the start layout with identical rights and no en
        // passant, so this key was first recorded at game start
        assert_eq!(position.repetition_count(), 2);
        position.apply_move(G1, F3, None).unwrap();
        position.apply_move(G8, F6, None).unwrap();
        position.apply_move(F3, G1, None).unwrap();
        position.apply_move(F6, G8, None).unwrap();
        assert_eq!(position.repetition_count(), 3);
    }

    #[test]
    fn test_pawn_move_clears_repetition_table() {
        let mut position = Position::new();
        position.apply_move(G1, F3, None).unwrap();
        position.apply_move(G8, F6, None).unwrap();
        assert_eq!(position.repetitions().len(), 3);
        position.apply_move(E2, E4, None).unwrap();
        assert_eq!(position.repetitions().len(), 1);
    }
}
