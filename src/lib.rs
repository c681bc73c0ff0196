// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

//! Persistence for a GG(C) core: battery saves next to the ROM,
//! numbered save state slots, and rebuilding a consistent machine
//! after a state was loaded.

use std::mem;

use serde::{Deserialize, Serialize};

use crate::{
    cpu::Cpu,
    io::{
        cartridge::{Cartridge, RAM_BANK_SIZE, ROM_BANK_SIZE},
        joypad::Joypad,
        screen::ScreenBuffers,
        Memory, VRAM_BANK_SIZE, WRAM_BANK_SIZE,
    },
    views::MemoryViews,
};

pub mod cpu;
pub mod error;
pub mod io;
pub mod numutil;
pub mod options;
pub mod shared;
pub mod storage;
pub mod testing;
pub mod views;

pub use error::StorageError;
pub use options::StorageConfig;
pub use shared::{SharedMachine, SlotRequests};
pub use storage::{path::Slot, Storage};

/// Colour type used by the PPU for image data.
pub type Colour = [u8; 4];

/// Which console the machine is running as.
/// Decides which registers select the VRAM and WRAM banks.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum Mode {
    Dmg,
    Cgb,
}

/// The system and its state.
/// Represents the entire console, as far as a save state is concerned.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Machine {
    pub cpu: Cpu,
    pub mem: Memory,
    pub mode: Mode,
    pub cart: Cartridge,
    pub joypad: Joypad,
    pub screen: ScreenBuffers,
    /// Set once a game was loaded and the system booted.
    pub initialised: bool,

    #[serde(skip)]
    views: MemoryViews,
}

impl Machine {
    /// Create a system with the given cartridge inserted.
    /// Runs in CGB mode if the cartridge supports it.
    pub fn new(cart: Cartridge) -> Self {
        let mode = if cart.supports_cgb() {
            Mode::Cgb
        } else {
            Mode::Dmg
        };
        let mut gg = Self {
            mode,
            cart,
            initialised: true,
            ..Self::default()
        };
        gg.relink();
        gg
    }

    /// Restore state after a savestate load. `old_self` should be the
    /// system state before the state was loaded, `ram` the cartridge RAM
    /// stored with the state.
    pub fn restore_from(&mut self, old_self: Self, ram: &[u8]) {
        self.cart.rom = old_self.cart.rom;
        self.cart.ram = old_self.cart.ram;
        self.cart.path = old_self.cart.path;
        let len = ram.len().min(self.cart.ram.len());
        self.cart.ram[..len].copy_from_slice(&ram[..len]);

        self.relink();
        self.joypad.release_all();
    }

    pub fn rom0(&self) -> &[u8] {
        window(&self.cart.rom, self.views.rom0, ROM_BANK_SIZE)
    }

    pub fn romx(&self) -> &[u8] {
        window(&self.cart.rom, self.views.romx, ROM_BANK_SIZE)
    }

    pub fn vram(&self) -> &[u8] {
        window(&self.mem.vram, self.views.vram, VRAM_BANK_SIZE)
    }

    pub fn sram(&self) -> &[u8] {
        window(&self.cart.ram, self.views.sram, RAM_BANK_SIZE)
    }

    pub fn wram0(&self) -> &[u8] {
        window(&self.mem.wram, self.views.wram0, WRAM_BANK_SIZE)
    }

    pub fn wramx(&self) -> &[u8] {
        window(&self.mem.wram, self.views.wramx, WRAM_BANK_SIZE)
    }

    pub fn echo(&self) -> &[u8] {
        window(&self.mem.wram, self.views.echo, WRAM_BANK_SIZE)
    }

    /// The frame the frontend should currently display.
    pub fn presented_frame(&self) -> &[Colour] {
        &self.screen.buffers[self.views.presented]
    }

    /// The buffer the PPU is currently drawing into.
    pub fn render_target(&mut self) -> &mut [Colour] {
        &mut self.screen.buffers[self.views.render_target]
    }

    /// Called by the PPU at the end of a frame.
    pub fn swap_screen_buffers(&mut self) {
        let views = &mut self.views;
        mem::swap(&mut views.render_target, &mut views.presented);
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self {
            cpu: Cpu::default(),
            mem: Memory::new(),
            mode: Mode::Dmg,
            cart: Cartridge::dummy(),
            joypad: Joypad::default(),
            screen: ScreenBuffers::default(),
            initialised: false,
            views: MemoryViews::default(),
        }
    }
}

/// Up to `len` bytes of `data` starting at `offset`, clamped to what exists.
fn window(data: &[u8], offset: usize, len: usize) -> &[u8] {
    let start = offset.min(data.len());
    let end = offset.saturating_add(len).min(data.len());
    &data[start..end]
}
