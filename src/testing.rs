// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

//! Helpers for building systems in tests.

use std::path::PathBuf;

use crate::{io::cartridge::Cartridge, Machine};

const ROM_BANKS: usize = 8;

/// Build a 128KiB MBC5 ROM with the given RAM size code in the header.
/// The first byte of every bank is the bank number.
pub fn test_rom(cgb: bool, ram_code: u8) -> Vec<u8> {
    let mut rom = vec![0; ROM_BANKS * 0x4000];
    for bank in 0..ROM_BANKS {
        rom[bank * 0x4000] = bank as u8;
    }
    rom[0x0104] = 0xCE;
    rom[0x0105] = 0xED;
    rom[0x0134..0x013C].copy_from_slice(b"SAVETEST");
    rom[0x0143] = if cgb { 0x80 } else { 0x00 };
    rom[0x0147] = 0x1B;
    rom[0x0148] = 0x02;
    rom[0x0149] = ram_code;
    rom
}

/// A booted machine running a [test_rom], as if loaded from `path`.
pub fn test_machine(cgb: bool, ram_code: u8, path: Option<PathBuf>) -> Box<Machine> {
    Box::new(Machine::new(Cartridge::from_rom(
        test_rom(cgb, ram_code),
        path,
    )))
}

/// Fill a buffer with bytes that are unlikely to appear by accident.
pub fn fill_pattern(buf: &mut [u8], seed: u8) {
    for (i, b) in buf.iter_mut().enumerate() {
        *b = (i as u8).wrapping_mul(31).wrapping_add(seed) ^ (i >> 8) as u8;
    }
}
