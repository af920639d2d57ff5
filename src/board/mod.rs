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

//! Chess rules and state tracking on a plain 8-by-8 mailbox board.
//!
//! A _board_ holds everything needed to adjudicate a game in progress:
//! piece placement, the side to move, castling rights, the en passant
//! target, the halfmove and fullmove counters, and the repetition table.
//! The following rules are enforced:
//!
//! [x] Standard piece movement, including castling, en passant and
//!     pawn promotion
//! [x] Full legality filtering (pins, self-check, castling lanes)
//! [x] Check, checkmate and stalemate detection
//! [x] Fifty-move rule
//! [x] Three-fold repetition rule
//! [ ] Insufficient mating material
//! [ ] Time controls
//!
//! Some of the key abstractions include:
//!
//! * A `Square` represents the coordinates for a single square
//!   on an 8-by-8 board. The 8 rows and 8 columns on a board
//!   are represented by `Rank` (`Rank1` .. `Rank8`) and `File`
//!   ('FileA' .. 'FileH') respectively. Each square is uniquely
//!   identified by a rank and a file and is named using the letter of
//!   the file followed by the number of the rank (e.g. `A1` .. `H8`).
//!
//! * `Material` represents a piece of a specific color. A `Piece` has
//!   six variants: `King`, `Queen`, `Rook`, `Bishop`, `Knight` and
//!   `Pawn`. `Color` is either `White` or `Black`. Pawn promotion has
//!   its own four-variant `Promotion` type, convertible to `Piece`
//!   via `From<Promotion>`.
//!
//! * A `Position` is the complete game state. Moves go through
//!   `Position::apply_move`, which rejects anything illegal and keeps
//!   the counters and repetition table current as a side effect.
//!
//! * `Status` classifies a position for the side to move, from
//!   `Normal` through `Check` to the four game-over verdicts.
//!
//! * A `Snapshot` is the serializable form of a `Position`, suitable
//!   for saving a game to disk and resuming it later.

mod attacks;
mod castling;
mod material;
mod moves;
mod position;
mod snapshot;
mod square;
mod status;

pub use attacks::{in_check, is_attacked};
pub use castling::CastlingRights;
pub use material::{Color, Material, Pair, Piece};
pub use moves::{
    has_legal_move, legal_destinations, pseudo_destinations, Move, MoveError, ParseError, Promotion,
};
pub use position::{Position, Squares};
pub use snapshot::{Snapshot, SnapshotError};
pub use square::{Direction, File, Offset, Rank, Square};
pub use status::Status;

/// Anything with a side to move.
pub trait Turn {
    fn turn(&self) -> Color;
}
