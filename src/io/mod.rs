// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

use serde::{Deserialize, Serialize};

use crate::{io::addr::*, numutil::NumExt, Machine, Mode};

pub mod addr;
pub mod cartridge;
pub mod joypad;
pub mod screen;

pub const VRAM_BANK_SIZE: usize = 0x2000;
pub const VRAM_BANKS: usize = 2;
pub const WRAM_BANK_SIZE: usize = 0x1000;
pub const WRAM_BANKS: usize = 8;

/// The memory of the console, containing big arrays holding internal memory.
/// Banked regions are stored back to back; which bank is mapped where is
/// decided by the bank registers and resolved into [crate::views::MemoryViews].
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Memory {
    #[serde(with = "serde_arrays")]
    pub vram: [u8; VRAM_BANKS * VRAM_BANK_SIZE],
    pub(crate) vram_bank: u8,
    #[serde(with = "serde_arrays")]
    pub wram: [u8; WRAM_BANKS * WRAM_BANK_SIZE],
    pub(crate) wram_bank: u8,
    #[serde(with = "serde_arrays")]
    pub oam: [u8; 160],
    #[serde(with = "serde_arrays")]
    pub high: [u8; 256],
}

impl Memory {
    pub fn new() -> Self {
        Self {
            vram: [0; VRAM_BANKS * VRAM_BANK_SIZE],
            vram_bank: 0,
            wram: [0; WRAM_BANKS * WRAM_BANK_SIZE],
            wram_bank: 1,
            oam: [0; 160],
            high: [0; 256],
        }
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine {
    /// Read an IO register in the high page. `addr` may be given either as
    /// a full address or as an offset into the page.
    /// Reading never changes any state.
    pub fn read_io(&self, addr: u16) -> u8 {
        let cgb = self.mode == Mode::Cgb;
        match addr & 0x00FF {
            JOYP => self.joypad.read(self.mem.high[JOYP.us()]),
            VRAM_SELECT if cgb => self.mem.vram_bank | 0xFE,
            WRAM_SELECT if cgb => self.mem.wram_bank | 0xF8,
            VRAM_SELECT | WRAM_SELECT => 0xFF,
            a => self.mem.high[a.us()],
        }
    }

    /// Write an IO register in the high page. Writes to the bank
    /// registers remap the banked regions immediately.
    pub fn write_io(&mut self, addr: u16, value: u8) {
        let cgb = self.mode == Mode::Cgb;
        match addr & 0x00FF {
            VRAM_SELECT if cgb => {
                self.mem.vram_bank = value & 1;
                self.refresh_banks();
            }
            WRAM_SELECT if cgb => {
                self.mem.wram_bank = u8::max(1, value & 7);
                self.refresh_banks();
            }
            VRAM_SELECT | WRAM_SELECT => (),
            JOYP => self.mem.high[JOYP.us()] = value & 0x30,
            IF => self.mem.high[IF.us()] = value | 0xE0,
            a => self.mem.high[a.us()] = value,
        }
    }

    /// Select the ROM bank mapped to 4000-7FFF.
    pub fn select_rom_bank(&mut self, bank: u16) {
        self.cart.select_rom_bank(bank);
        self.refresh_banks();
    }
}
