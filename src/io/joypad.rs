// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

use serde::{Deserialize, Serialize};

/// Buttons on the console.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(C)]
pub enum Button {
    A = 0,
    B = 1,
    Select = 2,
    Start = 3,
    Right = 4,
    Left = 5,
    Up = 6,
    Down = 7,
}

impl Button {
    pub const BUTTONS: [Self; 8] = [
        Self::A,
        Self::B,
        Self::Select,
        Self::Start,
        Self::Right,
        Self::Left,
        Self::Up,
        Self::Down,
    ];
}

/// Joypad of the console, plus the frontend's turbo modifier.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Joypad {
    key_states: [bool; 8],
    turbo: bool,
}

impl Joypad {
    /// Value of the JOYP register, given the row selection bits last written.
    pub fn read(&self, joyp: u8) -> u8 {
        let row_start = match joyp & 0x30 {
            0x10 => 0,
            0x20 => 4,
            _ => return 0xCF,
        };
        let mut res = 0;
        for key in self.key_states.iter().skip(row_start).take(4).rev() {
            res <<= 1;
            res += (!key) as u8;
        }
        res | (joyp & 0x30) | 0b1100_0000
    }

    /// To be called by frontend code; sets the state of a given button.
    pub fn set(&mut self, button: Button, state: bool) {
        self.key_states[button as usize] = state;
    }

    pub fn is_pressed(&self, button: Button) -> bool {
        self.key_states[button as usize]
    }

    pub fn set_turbo(&mut self, state: bool) {
        self.turbo = state;
    }

    pub fn turbo(&self) -> bool {
        self.turbo
    }

    /// Is anything held at all?
    pub fn any_held(&self) -> bool {
        self.turbo || self.key_states.iter().any(|k| *k)
    }

    /// Release every button and the turbo modifier.
    pub fn release_all(&mut self) {
        self.key_states = [false; 8];
        self.turbo = false;
    }
}
