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

//! The attack oracle: pure reachability queries over a board. Pins are
//! deliberately ignored here; a pinned piece still gives check, and the
//! legality filter handles self-check by simulation.

use strum::IntoEnumIterator;

use super::material::{Color, Material, Piece};
use super::position::Squares;
use super::square::{Direction, Offset, Square};

use Color::*;
use Piece::*;

pub(crate) const KNIGHT_OFFSETS: [Offset; 8] = [
    Offset::new(-2, -1),
    Offset::new(-2, 1),
    Offset::new(2, -1),
    Offset::new(2, 1),
    Offset::new(-1, -2),
    Offset::new(-1, 2),
    Offset::new(1, -2),
    Offset::new(1, 2),
];

/// The rank direction `color`'s pawns advance in (toward the opposing
/// back rank).
#[inline]
pub(crate) const fn forward(color: Color) -> isize {
    match color {
        White => -1,
        Black => 1,
    }
}

/// True iff some piece of color `by` attacks `square` under basic
/// movement rules. No allocation; called once per candidate destination
/// during legality filtering.
pub fn is_attacked(squares: &Squares, square: Square, by: Color) -> bool {
    // Pawns: probe the two squares a capturing pawn would come from
    let backward = -forward(by);
    for dx in [-1, 1] {
        if let Some(from) = square + Offset::new(dx, backward) {
            if squares[from].is_some_and(|m| m.is(by, Pawn)) {
                return true;
            }
        }
    }
    for offset in KNIGHT_OFFSETS {
        if let Some(from) = square + offset {
            if squares[from].is_some_and(|m| m.is(by, Knight)) {
                return true;
            }
        }
    }
    for dir in Direction::diagonals() {
        if let Some(material) = first_along(squares, square, dir) {
            if material.color() == by && matches!(material.piece(), Bishop | Queen) {
                return true;
            }
        }
    }
    for dir in Direction::horizontals() {
        if let Some(material) = first_along(squares, square, dir) {
            if material.color() == by && matches!(material.piece(), Rook | Queen) {
                return true;
            }
        }
    }
    for dir in Direction::iter() {
        if let Some(from) = square + dir {
            if squares[from].is_some_and(|m| m.is(by, King)) {
                return true;
            }
        }
    }
    false
}

/// First piece encountered walking from `square` in `dir` (exclusive).
fn first_along(squares: &Squares, square: Square, dir: Direction) -> Option<Material> {
    let offset: Offset = dir.into();
    let mut next = square + offset;
    while let Some(current) = next {
        if let Some(material) = squares[current] {
            return Some(material);
        }
        next = current + offset;
    }
    None
}

pub fn in_check(squares: &Squares, color: Color) -> bool {
    match squares.king(color) {
        Some(king) => is_attacked(squares, king, !color),
        None => false,
    }
}
