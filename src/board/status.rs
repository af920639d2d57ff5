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
use std::fmt;
use strum_macros::EnumIter;

use super::attacks::in_check;
use super::moves::has_legal_move;
use super::position::Position;
use super::Turn;

/// Verdict on a position from the perspective of the side to move.
///
/// `Check` and `Normal` mean play continues; the other four end the
/// game. Automatic draws take precedence over mate, so a move that
/// delivers checkmate while also completing the fifty-move count is a
/// draw.
#[derive(Debug, Serialize, Deserialize, EnumIter, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Normal,
    Check,
    Checkmate,
    Stalemate,
    DrawFiftyMove,
    DrawRepetition,
}

impl Status {
    /// Evaluation order is fixed: fifty-move, then repetition, then the
    /// check and mobility outcomes.
    pub fn of(position: &Position) -> Self {
        if position.halfmove_clock() >= 100 {
            return Status::DrawFiftyMove;
        }
        if position.repetition_count() >= 3 {
            return Status::DrawRepetition;
        }
        let checked = in_check(position.squares(), position.turn());
        let mobile = has_legal_move(position);
        match (checked, mobile) {
            (true, false) => Status::Checkmate,
            (true, true) => Status::Check,
            (false, false) => Status::Stalemate,
            (false, true) => Status::Normal,
        }
    }

    pub fn is_over(&self) -> bool {
        !matches!(self, Status::Normal | Status::Check)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Status::Normal => "normal",
            Status::Check => "check",
            Status::Checkmate => "checkmate",
            Status::Stalemate => "stalemate",
            Status::DrawFiftyMove => "draw by fifty-move rule",
            Status::DrawRepetition => "draw by repetition",
        };
        write!(f, "{}", s)
    }
}
