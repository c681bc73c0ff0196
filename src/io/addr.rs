// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

//! Offsets of IO registers inside the high page (0xFF00-0xFFFF).

pub const JOYP: u16 = 0x00;
pub const IF: u16 = 0x0F;
pub const VRAM_SELECT: u16 = 0x4F;
pub const WRAM_SELECT: u16 = 0x70;

pub const HIGH_START: u16 = 0xFF00;
