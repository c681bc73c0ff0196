// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

use std::{path::PathBuf, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{io::cartridge::MbcKind::*, numutil::NumExt};

const CGB_FLAG: usize = 0x0143;
const KIND: usize = 0x0147;
const ROM_BANKS: usize = 0x0148;
const RAM_BANKS: usize = 0x0149;

pub const ROM_BANK_SIZE: usize = 0x4000;
pub const RAM_BANK_SIZE: usize = 0x2000;
const MBC2_RAM_SIZE: usize = 0x200;

/// Struct representing the game cartridge.
///
/// The ROM, the RAM buffer and the path the ROM was loaded from belong
/// to the running process and are never part of a save state;
/// the RAM contents are stored next to the state instead.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Cartridge {
    #[serde(skip, default = "empty_rom")]
    pub rom: Arc<[u8]>,
    #[serde(skip)]
    pub(crate) ram: Vec<u8>,
    #[serde(skip)]
    pub path: Option<PathBuf>,

    /// Size of cartridge RAM in bytes. Always equal to the RAM buffer's length.
    pub(crate) ram_size: usize,
    /// Bank of the ROM area 4000-8000.
    pub rom_bank: u16,
    pub ram_bank: u8,
    pub ram_enable: bool,
    pub kind: MbcKind,
}

impl Cartridge {
    /// Create a cartridge from a ROM image, with zeroed RAM sized after the header.
    pub fn from_rom(rom: impl Into<Arc<[u8]>>, path: Option<PathBuf>) -> Self {
        let rom = rom.into();
        let kind = match rom.get(KIND).copied().unwrap_or(0) {
            0x01..=0x03 => Mbc1,
            0x05..=0x06 => Mbc2,
            0x0F..=0x13 => Mbc3,
            0x19..=0x1E => Mbc5,
            _ => NoMbc,
        };
        let mut cart = Self {
            rom,
            path,
            kind,
            ..Self::dummy()
        };
        cart.ram_size = cart.header_ram_size();
        cart.ram = vec![0; cart.ram_size];
        cart
    }

    /// A cartridge with no ROM and no RAM, used before a game is loaded.
    pub fn dummy() -> Self {
        Self {
            rom: empty_rom(),
            ram: vec![],
            path: None,
            ram_size: 0,
            rom_bank: 1,
            ram_bank: 0,
            ram_enable: false,
            kind: NoMbc,
        }
    }

    pub fn ram(&self) -> &[u8] {
        &self.ram
    }

    pub fn ram_mut(&mut self) -> &mut [u8] {
        &mut self.ram
    }

    pub fn ram_size(&self) -> usize {
        self.ram_size
    }

    pub fn rom_bank_count(&self) -> u16 {
        match self.rom.get(ROM_BANKS).copied() {
            Some(code @ 0..=8) => 2 << code.u16(),
            _ => (self.rom.len() / ROM_BANK_SIZE).max(2) as u16,
        }
    }

    /// Select the bank mapped to 4000-8000. Bank 0 there is not possible
    /// and becomes bank 1, same as on the MBCs.
    pub fn select_rom_bank(&mut self, bank: u16) {
        self.rom_bank = bank.max(1) % self.rom_bank_count();
    }

    fn header_ram_size(&self) -> usize {
        match (self.rom.get(RAM_BANKS).copied().unwrap_or(0), &self.kind) {
            (0, Mbc2) => MBC2_RAM_SIZE,
            (0, _) => 0,
            (2, _) => RAM_BANK_SIZE,
            (3, _) => 4 * RAM_BANK_SIZE,
            (4, _) => 16 * RAM_BANK_SIZE,
            (5, _) => 8 * RAM_BANK_SIZE,
            (code, _) => {
                log::warn!("Unknown RAM size code 0x{code:02X}, assuming no RAM");
                0
            }
        }
    }

    pub fn supports_cgb(&self) -> bool {
        self.rom.get(CGB_FLAG).is_some_and(|flag| flag.is_bit(7))
    }
}

impl Default for Cartridge {
    fn default() -> Self {
        Self::dummy()
    }
}

/// Various MBCs. Only used to remember what the cartridge is;
/// the banking itself is done by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum MbcKind {
    NoMbc,
    Mbc1,
    Mbc2,
    Mbc3,
    Mbc5,
}

fn empty_rom() -> Arc<[u8]> {
    Arc::from(Vec::new())
}
