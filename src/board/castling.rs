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

use super::material::{Color, Pair};
use super::square::{File, Rank, Square};

use File::*;

/// Per-color castling eligibility. Rights only ever get cleared; nothing
/// re-enables them once lost.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastlingRights {
    color: Color,
    oo: bool,
    ooo: bool,
}

impl CastlingRights {
    pub fn new(color: Color, oo: bool, ooo: bool) -> Self {
        Self { color, oo, ooo }
    }
    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }
    #[inline]
    pub fn oo(&self) -> bool {
        self.oo
    }
    #[inline]
    pub fn ooo(&self) -> bool {
        self.ooo
    }
    #[inline]
    pub fn rank(&self) -> Rank {
        Rank::back_rank(self.color)
    }
    pub fn clear(&mut self) {
        self.oo = false;
        self.ooo = false;
    }
    pub fn clear_oo(&mut self) {
        self.oo = false;
    }
    pub fn clear_ooo(&mut self) {
        self.ooo = false;
    }

    /// Revoke whatever rights depend on `square`: the king leaving its
    /// start square loses both sides, a rook leaving (or being captured
    /// on) its corner loses that side.
    pub fn update(&mut self, square: Square) {
        if square == king_src(self.color) {
            self.clear();
        }
        if square == oo_rook_src(self.color) {
            self.clear_oo();
        }
        if square == ooo_rook_src(self.color) {
            self.clear_ooo();
        }
    }

    #[inline]
    pub fn king_src(&self) -> Square {
        king_src(self.color)
    }
    #[inline]
    pub fn oo_rook_src(&self) -> Square {
        oo_rook_src(self.color)
    }
    #[inline]
    pub fn ooo_rook_src(&self) -> Square {
        ooo_rook_src(self.color)
    }
    #[inline]
    pub fn oo_king_dest(&self) -> Square {
        Square::new(FileG, self.rank())
    }
    #[inline]
    pub fn ooo_king_dest(&self) -> Square {
        Square::new(FileC, self.rank())
    }
    #[inline]
    pub fn oo_rook_dest(&self) -> Square {
        Square::new(FileF, self.rank())
    }
    #[inline]
    pub fn ooo_rook_dest(&self) -> Square {
        Square::new(FileD, self.rank())
    }

    /// Squares strictly between king and kingside rook; all must be empty.
    pub fn oo_blocking_lane(&self) -> [Square; 2] {
        let rank = self.rank();
        [Square::new(FileF, rank), Square::new(FileG, rank)]
    }
    /// Squares strictly between king and queenside rook; all must be empty.
    pub fn ooo_blocking_lane(&self) -> [Square; 3] {
        let rank = self.rank();
        [
            Square::new(FileB, rank),
            Square::new(FileC, rank),
            Square::new(FileD, rank),
        ]
    }
    /// King start, transit and destination squares; none may be attacked.
    pub fn oo_attacking_lane(&self) -> [Square; 3] {
        let rank = self.rank();
        [
            Square::new(FileE, rank),
            Square::new(FileF, rank),
            Square::new(FileG, rank),
        ]
    }
    /// King start, transit and destination squares; none may be attacked.
    pub fn ooo_attacking_lane(&self) -> [Square; 3] {
        let rank = self.rank();
        [
            Square::new(FileE, rank),
            Square::new(FileD, rank),
            Square::new(FileC, rank),
        ]
    }
}

impl Default for Pair<CastlingRights> {
    fn default() -> Self {
        Pair::new(
            CastlingRights::new(Color::White, true, true),
            CastlingRights::new(Color::Black, true, true),
        )
    }
}

#[inline]
pub const fn king_src(color: Color) -> Square {
    Square::new(FileE, Rank::back_rank(color))
}

#[inline]
pub const fn oo_rook_src(color: Color) -> Square {
    Square::new(FileH, Rank::back_rank(color))
}

#[inline]
pub const fn ooo_rook_src(color: Color) -> Square {
    Square::new(FileA, Rank::back_rank(color))
}
