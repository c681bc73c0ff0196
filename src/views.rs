// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

//! Derived views into banked memory.
//!
//! A view is just an offset into the array backing its region, so it stays
//! valid no matter where that array lives. Views are never saved; after a
//! state load they are rebuilt from the bank registers with [MemoryViews::resolve].

use crate::{
    io::{
        addr::{VRAM_SELECT, WRAM_SELECT},
        cartridge::ROM_BANK_SIZE,
        VRAM_BANK_SIZE, WRAM_BANK_SIZE,
    },
    numutil::NumExt,
    Machine, Mode,
};

/// Offsets of every mapped region into its backing array.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MemoryViews {
    /// 0000-3FFF, into the cartridge ROM.
    pub rom0: usize,
    /// 4000-7FFF, into the cartridge ROM.
    pub romx: usize,
    /// 8000-9FFF, into [crate::io::Memory::vram].
    pub vram: usize,
    /// A000-BFFF, into the cartridge RAM.
    pub sram: usize,
    /// C000-CFFF, into [crate::io::Memory::wram].
    pub wram0: usize,
    /// D000-DFFF, into [crate::io::Memory::wram].
    pub wramx: usize,
    /// E000-FDFF. Mirrors C000.
    pub echo: usize,
    /// Screen buffer the PPU draws into.
    pub render_target: usize,
    /// Screen buffer the frontend displays.
    pub presented: usize,
}

impl MemoryViews {
    /// Compute all views from the current bank state of the given machine.
    /// Screen buffers get their initial roles.
    pub fn resolve(gg: &Machine) -> Self {
        let (vram_bank, wram_bank) = match gg.mode {
            Mode::Dmg => (0, 1),
            Mode::Cgb => (
                gg.read_io(VRAM_SELECT) & 1,
                u8::max(1, gg.read_io(WRAM_SELECT) & 7),
            ),
        };

        let wram0 = 0;
        Self {
            rom0: 0,
            romx: gg.cart.rom_bank.us() * ROM_BANK_SIZE,
            vram: vram_bank.us() * VRAM_BANK_SIZE,
            sram: 0,
            wram0,
            wramx: wram_bank.us() * WRAM_BANK_SIZE,
            echo: wram0,
            render_target: 0,
            presented: 1,
        }
    }
}

impl Machine {
    /// Rebuild every view from scratch. Needs to be done after the
    /// machine was replaced wholesale, e.g. by a state load.
    pub fn relink(&mut self) {
        self.views = MemoryViews::resolve(self);
    }

    /// Rebuild the bank views after a bank switch,
    /// keeping the current screen buffer roles.
    pub(crate) fn refresh_banks(&mut self) {
        let MemoryViews {
            render_target,
            presented,
            ..
        } = self.views;
        self.views = MemoryViews {
            render_target,
            presented,
            ..MemoryViews::resolve(self)
        };
    }

    pub fn views(&self) -> MemoryViews {
        self.views
    }
}
