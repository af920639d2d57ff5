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

//! A playable game wrapped around a [`Position`].
//!
//! `Game` is the surface intended for callers: submit a move, get back
//! the resulting status or a rejection. The board module does the rules
//! work; this layer adds turn ownership checks, refuses input once the
//! game is over, and handles save and restore.

use anyhow::{bail, Result};
use log::debug;

use crate::board::{
    legal_destinations, Move, MoveError, Position, Snapshot, Square, Status, Turn,
};

#[derive(Debug, Clone)]
pub struct Game {
    position: Position,
}

impl Game {
    pub fn new() -> Self {
        Self {
            position: Position::new(),
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn status(&self) -> Status {
        Status::of(&self.position)
    }

    /// Legal destinations for the piece on `from`, empty when the
    /// square is empty or the piece belongs to the waiting side.
    pub fn destinations(&self, from: Square) -> Vec<Square> {
        match self.position[from] {
            Some(material) if material.color() == self.position.turn() => {
                legal_destinations(&self.position, from)
            }
            _ => Vec::new(),
        }
    }

    /// Apply a move on behalf of the side to move.
    ///
    /// The move must name one of the mover's own pieces and a legal
    /// destination for it. On success the position advances and the
    /// new status is returned. Once the game is over every further
    /// move is rejected.
    pub fn submit_move(&mut self, mv: Move) -> Result<Status> {
        if self.status().is_over() {
            bail!("the game is over: {}", self.status());
        }
        let material = self.position[mv.from].ok_or(MoveError::EmptySquare)?;
        if material.color() != self.position.turn() {
            return Err(MoveError::WrongColor.into());
        }
        if !legal_destinations(&self.position, mv.from).contains(&mv.to) {
            return Err(MoveError::IllegalMove.into());
        }
        self.position.apply_move(mv.from, mv.to, mv.promotion)?;
        let status = self.status();
        debug!("applied {}, status {}", mv, status);
        Ok(status)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from(&self.position)
    }

    pub fn restore(snapshot: &Snapshot) -> Result<Self> {
        let position = snapshot.restore()?;
        debug!(
            "restored game at move {}, {} to play",
            position.fullmove_number(),
            position.turn()
        );
        Ok(Self { position })
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Turn for Game {
    fn turn(&self) -> crate::board::Color {
        self.position.turn()
    }
}
