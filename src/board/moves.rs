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

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::IntoEnumIterator;
use thiserror::Error;

use super::attacks::{forward, in_check, is_attacked, KNIGHT_OFFSETS};
use super::castling;
use super::material::{Color, Piece};
use super::position::Position;
use super::square::{Direction, Offset, Rank, Square};
use super::Turn;

use Piece::*;

/// Rejection of a coordinate string before any rules are consulted.
/// Distinct from `MoveError`: a parse failure never reached the board.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("a move is four characters, like e2e4")]
    Length,
    #[error("invalid square `{0}`")]
    InvalidSquare(String),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("no piece on the source square")]
    EmptySquare,
    #[error("that piece is not yours to move")]
    WrongColor,
    #[error("not a legal move")]
    IllegalMove,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Promotion>,
}

impl Move {
    pub fn new(from: Square, to: Square, promotion: Option<Promotion>) -> Self {
        Self {
            from,
            to,
            promotion,
        }
    }

    /// Parse the minimal coordinate encoding, `<from><to>` ("e2e4").
    /// The promotion choice travels separately; see `Promotion`.
    pub fn from_coordinate(text: &str) -> Result<Self, ParseError> {
        let chars: Vec<char> = text.chars().collect();
        if chars.len() != 4 {
            return Err(ParseError::Length);
        }
        let from = Square::try_from_chars(chars[0], chars[1])
            .ok_or_else(|| ParseError::InvalidSquare(chars[0..2].iter().collect()))?;
        let to = Square::try_from_chars(chars[2], chars[3])
            .ok_or_else(|| ParseError::InvalidSquare(chars[2..4].iter().collect()))?;
        Ok(Self::new(from, to, None))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", promotion)?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Promotion {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl Promotion {
    pub fn try_from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'q' => Some(Promotion::Queen),
            'r' => Some(Promotion::Rook),
            'b' => Some(Promotion::Bishop),
            'n' => Some(Promotion::Knight),
            _ => None,
        }
    }

    /// An unrecognized letter degrades to queen instead of failing.
    pub fn from_char_or_queen(c: char) -> Self {
        Self::try_from_char(c).unwrap_or(Promotion::Queen)
    }
}

impl From<Promotion> for Piece {
    fn from(value: Promotion) -> Self {
        match value {
            Promotion::Queen => Piece::Queen,
            Promotion::Rook => Piece::Rook,
            Promotion::Bishop => Piece::Bishop,
            Promotion::Knight => Piece::Knight,
        }
    }
}

impl fmt::Display for Promotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Promotion::Queen => "q",
            Promotion::Rook => "r",
            Promotion::Bishop => "b",
            Promotion::Knight => "n",
        };
        write!(f, "{}", s)
    }
}

/// Destinations consistent with the piece's movement pattern and board
/// occupancy, pins and self-check ignored. Castling availability and the
/// lane attack conditions are checked here; the self-check filter lives
/// in `legal_destinations`.
pub fn pseudo_destinations(position: &Position, from: Square) -> Vec<Square> {
    let Some(material) = position[from] else {
        return Vec::new();
    };
    let color = material.color();
    match material.piece() {
        Pawn => pawn_destinations(position, from, color),
        Knight => offset_destinations(position, from, color, &KNIGHT_OFFSETS),
        Bishop => ray_destinations(position, from, color, Direction::diagonals()),
        Rook => ray_destinations(position, from, color, Direction::horizontals()),
        Queen => ray_destinations(position, from, color, Direction::iter()),
        King => king_destinations(position, from, color),
    }
}

/// Pseudo-legal destinations minus any that would leave the mover's own
/// king attacked, established by applying the move to a cloned position.
/// The promotion choice cannot affect check status, so simulations
/// always promote to queen.
pub fn legal_destinations(position: &Position, from: Square) -> Vec<Square> {
    let Some(material) = position[from] else {
        return Vec::new();
    };
    let color = material.color();
    pseudo_destinations(position, from)
        .into_iter()
        .filter(|&to| {
            let mut trial = position.clone();
            match trial.edit_board(from, to, Promotion::Queen) {
                Ok(_) => !in_check(trial.squares(), color),
                Err(_) => false,
            }
        })
        .collect()
}

/// Whether the side to move has any legal move at all.
pub fn has_legal_move(position: &Position) -> bool {
    let turn = position.turn();
    position
        .squares()
        .occupied()
        .filter(|(_, material)| material.color() == turn)
        .any(|(from, _)| !legal_destinations(position, from).is_empty())
}

fn pawn_destinations(position: &Position, from: Square, color: Color) -> Vec<Square> {
    let mut destinations = Vec::new();
    let advance = Offset::new(0, forward(color));
    if let Some(one) = from + advance {
        if position[one].is_none() {
            destinations.push(one);
            if from.rank() == Rank::pawn_rank(color) {
                if let Some(two) = one + advance {
                    if position[two].is_none() {
                        destinations.push(two);
                    }
                }
            }
        }
    }
    for dx in [-1, 1] {
        let Some(dest) = from + Offset::new(dx, forward(color)) else {
            continue;
        };
        match position[dest] {
            Some(material) if material.color() != color => destinations.push(dest),
            None if position.en_passant() == Some(dest) => destinations.push(dest),
            _ => {}
        }
    }
    destinations
}

fn offset_destinations(
    position: &Position,
    from: Square,
    color: Color,
    offsets: &[Offset],
) -> Vec<Square> {
    offsets
        .iter()
        .filter_map(|offset| from + offset)
        .filter(|&dest| match position[dest] {
            Some(material) => material.color() != color,
            None => true,
        })
        .collect()
}

fn ray_destinations(
    position: &Position,
    from: Square,
    color: Color,
    dirs: impl Iterator<Item = Direction>,
) -> Vec<Square> {
    let mut destinations = Vec::new();
    for dir in dirs {
        let offset: Offset = dir.into();
        let mut next = from + offset;
        while let Some(dest) = next {
            match position[dest] {
                None => destinations.push(dest),
                Some(material) => {
                    if material.color() != color {
                        destinations.push(dest);
                    }
                    break;
                }
            }
            next = dest + offset;
        }
    }
    destinations
}

fn king_destinations(position: &Position, from: Square, color: Color) -> Vec<Square> {
    let offsets: Vec<Offset> = Direction::iter().map(Offset::from).collect();
    let mut destinations = offset_destinations(position, from, color, &offsets);

    // Castling, only ever from the canonical start square. The rights
    // flag and the rook's actual presence are independently required:
    // a loaded snapshot may carry rights that are stale relative to
    // its board.
    if from == castling::king_src(color) {
        let rights = *position.castling(color);
        let them = !color;
        if rights.oo()
            && position[rights.oo_rook_src()].is_some_and(|m| m.is(color, Rook))
            && rights
                .oo_blocking_lane()
                .iter()
                .all(|&square| position[square].is_none())
            && rights
                .oo_attacking_lane()
                .iter()
                .all(|&square| !is_attacked(position.squares(), square, them))
        {
            destinations.push(rights.oo_king_dest());
        }
        if rights.ooo()
            && position[rights.ooo_rook_src()].is_some_and(|m| m.is(color, Rook))
            && rights
                .ooo_blocking_lane()
                .iter()
                .all(|&square| position[square].is_none())
            && rights
                .ooo_attacking_lane()
                .iter()
                .all(|&square| !is_attacked(position.squares(), square, them))
        {
            destinations.push(rights.ooo_king_dest());
        }
    }
    destinations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::material::Material;
    use Color::*;
    use Square::*;

    fn assert_dests(mut actual: Vec<Square>, mut expected: Vec<Square>) {
        actual.sort_by_key(|s| s.to_index());
        expected.sort_by_key(|s| s.to_index());
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_parse_coordinate_move() {
        let mv = Move::from_coordinate("e2e4").unwrap();
        assert_eq!(mv.from, E2);
        assert_eq!(mv.to, E4);
        assert_eq!(mv.promotion, None);
        assert_eq!(Move::from_coordinate("e2e"), Err(ParseError::Length));
        assert_eq!(Move::from_coordinate("e2e44"), Err(ParseError::Length));
        assert_eq!(
            Move::from_coordinate("i2e4"),
            Err(ParseError::InvalidSquare("i2".to_string()))
        );
        assert_eq!(
            Move::from_coordinate("e2e9"),
            Err(ParseError::InvalidSquare("e9".to_string()))
        );
    }

    #[test]
    fn test_promotion_letters() {
        assert_eq!(Promotion::try_from_char('n'), Some(Promotion::Knight));
        assert_eq!(Promotion::try_from_char('R'), Some(Promotion::Rook));
        assert_eq!(Promotion::try_from_char('x'), None);
        assert_eq!(Promotion::from_char_or_queen('x'), Promotion::Queen);
    }

    #[test]
    fn test_opening_pawn_moves() {
        let position = Position::new();
        assert_dests(legal_destinations(&position, E2), vec![E3, E4]);
    }

    #[test]
    fn test_opening_knight_moves() {
        let position = Position::new();
        assert_dests(legal_destinations(&position, G1), vec![F3, H3]);
    }

    #[test]
    fn test_blocked_pieces_have_no_moves() {
        let position = Position::new();
        assert!(legal_destinations(&position, F1).is_empty());
        assert!(legal_destinations(&position, D1).is_empty());
        assert!(legal_destinations(&position, E1).is_empty());
    }

    #[test]
    fn test_empty_square_has_no_moves() {
        let position = Position::new();
        assert!(legal_destinations(&position, E4).is_empty());
    }

    #[test]
    fn test_pawn_captures_diagonally() {
        let position = Position::blank()
            .set_contents(E4, Some(Material::WP))
            .set_contents(D5, Some(Material::BP))
            .set_contents(E5, Some(Material::BP))
            .set_contents(E1, Some(Material::WK))
            .set_contents(E8, Some(Material::BK));
        assert_dests(legal_destinations(&position, E4), vec![D5]);
    }

    #[test]
    fn test_rook_rays_stop_at_first_piece() {
        let position = Position::blank()
            .set_contents(D4, Some(Material::WR))
            .set_contents(D6, Some(Material::BP))
            .set_contents(D2, Some(Material::WP))
            .set_contents(A1, Some(Material::WK))
            .set_contents(H8, Some(Material::BK));
        assert_dests(
            legal_destinations(&position, D4),
            vec![D5, D6, D3, C4, B4, A4, E4, F4, G4, H4],
        );
    }

    #[test]
    fn test_pinned_piece_cannot_expose_king() {
        let position = Position::blank()
            .set_contents(E1, Some(Material::WK))
            .set_contents(E4, Some(Material::WR))
            .set_contents(E8, Some(Material::BQ))
            .set_contents(A8, Some(Material::BK));
        // the rook may slide along the pin file but never off it
        assert_dests(
            legal_destinations(&position, E4),
            vec![E2, E3, E5, E6, E7, E8],
        );
    }

    #[test]
    fn test_king_cannot_step_into_attack() {
        let position = Position::blank()
            .set_contents(E1, Some(Material::WK))
            .set_contents(A2, Some(Material::BR))
            .set_contents(H8, Some(Material::BK));
        let destinations = legal_destinations(&position, E1);
        assert!(!destinations.contains(&D2));
        assert!(!destinations.contains(&E2));
        assert!(!destinations.contains(&F2));
        assert_dests(destinations, vec![D1, F1]);
    }

    #[test]
    fn test_check_must_be_answered() {
        // the knight's only legal move is the one that blocks the file
        let position = Position::blank()
            .set_contents(E1, Some(Material::WK))
            .set_contents(E8, Some(Material::BR))
            .set_contents(G1, Some(Material::WN))
            .set_contents(A8, Some(Material::BK));
        assert_dests(legal_destinations(&position, G1), vec![E2]);
    }

    #[test]
    fn test_castle_available_when_path_clear_and_safe() {
        let position = Position::blank()
            .set_contents(E1, Some(Material::WK))
            .set_contents(H1, Some(Material::WR))
            .set_contents(A1, Some(Material::WR))
            .set_contents(E8, Some(Material::BK))
            .set_castling(White, true, true);
        let destinations = legal_destinations(&position, E1);
        assert!(destinations.contains(&G1));
        assert!(destinations.contains(&C1));
    }

    #[test]
    fn test_castle_requires_right() {
        let position = Position::blank()
            .set_contents(E1, Some(Material::WK))
            .set_contents(H1, Some(Material::WR))
            .set_contents(E8, Some(Material::BK))
            .set_castling(White, false, false);
        let destinations = legal_destinations(&position, E1);
        assert!(!destinations.contains(&G1));
    }

    #[test]
    fn test_castle_requires_rook_present() {
        // right still set but the rook is gone: stale-rights guard
        let position = Position::blank()
            .set_contents(E1, Some(Material::WK))
            .set_contents(E8, Some(Material::BK))
            .set_castling(White, true, true);
        let destinations = legal_destinations(&position, E1);
        assert!(!destinations.contains(&G1));
        assert!(!destinations.contains(&C1));
    }

    #[test]
    fn test_castle_blocked_by_piece_between() {
        let position = Position::blank()
            .set_contents(E1, Some(Material::WK))
            .set_contents(H1, Some(Material::WR))
            .set_contents(G1, Some(Material::WN))
            .set_contents(E8, Some(Material::BK))
            .set_castling(White, true, false);
        assert!(!legal_destinations(&position, E1).contains(&G1));
    }

    #[test]
    fn test_castle_through_attack_is_excluded() {
        let position = Position::blank()
            .set_contents(E1, Some(Material::WK))
            .set_contents(H1, Some(Material::WR))
            .set_contents(F8, Some(Material::BR))
            .set_contents(A8, Some(Material::BK))
            .set_castling(White, true, false);
        // f1 is attacked: the king would pass through check
        assert!(!legal_destinations(&position, E1).contains(&G1));
    }

    #[test]
    fn test_castle_out_of_check_is_excluded() {
        let position = Position::blank()
            .set_contents(E1, Some(Material::WK))
            .set_contents(H1, Some(Material::WR))
            .set_contents(E8, Some(Material::BR))
            .set_contents(A8, Some(Material::BK))
            .set_castling(White, true, false);
        assert!(!legal_destinations(&position, E1).contains(&G1));
    }

    #[test]
    fn test_queenside_castle_b_file_may_be_attacked() {
        // b1 is neither transit nor destination for the king; only
        // e1/d1/c1 must be safe
        let position = Position::blank()
            .set_contents(E1, Some(Material::WK))
            .set_contents(A1, Some(Material::WR))
            .set_contents(B8, Some(Material::BR))
            .set_contents(H8, Some(Material::BK))
            .set_castling(White, false, true);
        assert!(legal_destinations(&position, E1).contains(&C1));
    }

    #[test]
    fn test_en_passant_capture_is_offered() {
        let mut position = Position::new();
        position.apply_move(E2, E4, None).unwrap();
        position.apply_move(A7, A6, None).unwrap();
        position.apply_move(E4, E5, None).unwrap();
        position.apply_move(D7, D5, None).unwrap();
        assert!(legal_destinations(&position, E5).contains(&D6));
    }

    #[test]
    fn test_en_passant_expires_after_one_move() {
        let mut position = Position::new();
        position.apply_move(E2, E4, None).unwrap();
        position.apply_move(A7, A6, None).unwrap();
        position.apply_move(E4, E5, None).unwrap();
        position.apply_move(D7, D5, None).unwrap();
        position.apply_move(H2, H3, None).unwrap();
        position.apply_move(A6, A5, None).unwrap();
        assert!(!legal_destinations(&position, E5).contains(&D6));
    }

    #[test]
    fn test_en_passant_discovering_check_is_illegal() {
        // capturing en passant empties both d5 and c5, exposing the
        // white king on a5 to the rook on h5
        let position = Position::blank()
            .set_contents(A5, Some(Material::WK))
            .set_contents(C5, Some(Material::WP))
            .set_contents(D5, Some(Material::BP))
            .set_contents(H5, Some(Material::BR))
            .set_contents(H8, Some(Material::BK))
            .set_en_passant(Some(D6));
        assert!(!legal_destinations(&position, C5).contains(&D6));
    }

    #[test]
    fn test_has_legal_move() {
        assert!(has_legal_move(&Position::new()));
        // lone king boxed in by queen and king
        let stuck = Position::blank()
            .set_contents(A8, Some(Material::BK))
            .set_contents(C7, Some(Material::WQ))
            .set_contents(C6, Some(Material::WK))
            .set_turn(Black);
        assert!(!has_legal_move(&stuck));
    }
}
