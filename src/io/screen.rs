// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

use serde::{Deserialize, Serialize};

use crate::Colour;

pub const SCREEN_WIDTH: usize = 160;
pub const SCREEN_HEIGHT: usize = 144;

/// The two screen buffers: one the PPU renders into, one the frontend
/// presents. Which one is which is a derived view, see
/// [crate::views::MemoryViews].
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScreenBuffers {
    pub buffers: [Vec<Colour>; 2],
}

impl Default for ScreenBuffers {
    fn default() -> Self {
        Self {
            buffers: [
                vec![[0, 0, 0, 255]; SCREEN_WIDTH * SCREEN_HEIGHT],
                vec![[0, 0, 0, 255]; SCREEN_WIDTH * SCREEN_HEIGHT],
            ],
        }
    }
}
