// Copyright 2026 Tobin Edwards
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
use std::collections::HashMap;
use thiserror::Error;

use super::castling::CastlingRights;
use super::material::{Color, Pair, Piece};
use super::position::{Position, Squares};
use super::square::Square;
use super::Turn;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("board must be eight rows of eight piece letters")]
    MalformedBoard,
    #[error("each side must have exactly one king")]
    KingCount,
}

/// Externalized game state. Rows run from black's back rank down to
/// white's, one character per square, '.' for empty. Everything past
/// the board and turn is defaulted when absent so snapshots written by
/// older versions still load.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub board: [String; 8],
    pub turn: Color,
    #[serde(default = "default_true")]
    pub white_oo: bool,
    #[serde(default = "default_true")]
    pub white_ooo: bool,
    #[serde(default = "default_true")]
    pub black_oo: bool,
    #[serde(default = "default_true")]
    pub black_ooo: bool,
    #[serde(default)]
    pub en_passant: Option<Square>,
    #[serde(default)]
    pub halfmove_clock: u32,
    #[serde(default = "default_fullmove")]
    pub fullmove_number: u32,
    #[serde(default)]
    pub repetitions: HashMap<String, u8>,
}

fn default_true() -> bool {
    true
}

fn default_fullmove() -> u32 {
    1
}

impl Snapshot {
    /// Validate and rebuild the position this snapshot describes.
    /// Rights and repetition counts are taken at face value; the board
    /// itself must parse and carry exactly one king per side.
    pub fn restore(&self) -> Result<Position, SnapshotError> {
        let squares = Squares::try_from_rows(self.board.iter().map(String::as_str))
            .ok_or(SnapshotError::MalformedBoard)?;
        for color in [Color::White, Color::Black] {
            if squares.count(color, Piece::King) != 1 {
                return Err(SnapshotError::KingCount);
            }
        }
        let castling = Pair::new(
            CastlingRights::new(Color::White, self.white_oo, self.white_ooo),
            CastlingRights::new(Color::Black, self.black_oo, self.black_ooo),
        );
        Ok(Position::from_parts(
            squares,
            self.turn,
            castling,
            self.en_passant,
            self.halfmove_clock,
            self.fullmove_number,
            self.repetitions.clone(),
        ))
    }
}

impl From<&Position> for Snapshot {
    fn from(position: &Position) -> Self {
        Self {
            board: position.to_rows(),
            turn: position.turn(),
            white_oo: position.castling(Color::White).oo(),
            white_ooo: position.castling(Color::White).ooo(),
            black_oo: position.castling(Color::Black).oo(),
            black_ooo: position.castling(Color::Black).ooo(),
            en_passant: position.en_passant(),
            halfmove_clock: position.halfmove_clock(),
            fullmove_number: position.fullmove_number(),
            repetitions: position.repetitions().clone(),
        }
    }
}
