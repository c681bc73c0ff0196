// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

//! Save states.
//!
//! A state is the bincode-encoded [Machine] behind a format version,
//! directly followed by the raw cartridge RAM. ROM, RAM buffer and ROM path
//! are not part of the encoded machine; on load they are taken from the
//! system the state is loaded into.

use std::{
    fs::{self, File},
    io::{ErrorKind, Write},
    mem,
    path::{Path, PathBuf},
};

use crate::{Machine, StorageError};

/// Version of the state format. Bump whenever anything serialized changes.
pub const FORMAT_VERSION: u32 = 1;

/// A decoded save state that was not loaded into a system yet.
pub struct Snapshot {
    machine: Box<Machine>,
    ram: Vec<u8>,
}

impl Snapshot {
    /// Decode a state made by [encode].
    pub fn decode(state: &[u8]) -> Result<Self, StorageError> {
        let mut rest = state;
        let version: u32 = bincode::deserialize_from(&mut rest).map_err(StorageError::Decode)?;
        if version != FORMAT_VERSION {
            return Err(StorageError::Version {
                found: version,
                expected: FORMAT_VERSION,
            });
        }
        let machine: Box<Machine> =
            bincode::deserialize_from(&mut rest).map_err(StorageError::Decode)?;

        let ram_size = machine.cart.ram_size();
        if rest.len() < ram_size {
            return Err(StorageError::Truncated {
                expected: ram_size,
                found: rest.len(),
            });
        }
        Ok(Self {
            machine,
            ram: rest[..ram_size].to_vec(),
        })
    }

    /// Load this state into the given system, replacing everything
    /// except ROM, RAM buffer and ROM path. The system is left untouched
    /// if the state does not fit its cartridge.
    pub fn apply(self, gg: &mut Machine) -> Result<(), StorageError> {
        let expected = gg.cart.ram().len();
        if self.ram.len() != expected {
            return Err(StorageError::RamSize {
                found: self.ram.len(),
                expected,
            });
        }

        let old_self = mem::replace(gg, *self.machine);
        gg.restore_from(old_self, &self.ram);
        Ok(())
    }

    /// The machine as it is stored in the state, before being restored.
    /// It has no ROM, no RAM and no views.
    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn ram(&self) -> &[u8] {
        &self.ram
    }
}

/// Result of loading a state slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StateLoad {
    Loaded,
    /// Nothing was ever saved in this slot.
    Empty,
}

/// Create a save state that can be loaded with [Snapshot::decode].
pub fn encode(gg: &Machine) -> Result<Vec<u8>, StorageError> {
    let ram = &gg.cart.ram()[..gg.cart.ram_size()];
    let mut state = Vec::with_capacity(0x10000 + ram.len());
    bincode::serialize_into(&mut state, &FORMAT_VERSION).map_err(StorageError::Encode)?;
    bincode::serialize_into(&mut state, gg).map_err(StorageError::Encode)?;
    state.extend_from_slice(ram);
    Ok(state)
}

/// Save a state of the given system into the given file.
/// The file is only created once the state was encoded.
pub fn save_to(path: &Path, gg: &Machine) -> Result<(), StorageError> {
    let state = encode(gg)?;
    write_state(path, &state)
}

/// Write an encoded state into the given file. The state goes into a
/// sibling file first, which then replaces the slot, so a failed write
/// never destroys the state saved before.
pub(crate) fn write_state(path: &Path, state: &[u8]) -> Result<(), StorageError> {
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let mut file = File::create(&tmp).map_err(|err| {
        log::error!("Error opening {}: {err}", tmp.display());
        StorageError::io(&tmp, err)
    })?;
    let written = file
        .write_all(state)
        .and_then(|_| file.sync_all())
        .map_err(|err| StorageError::io(&tmp, err))
        .and_then(|_| fs::rename(&tmp, path).map_err(|err| StorageError::io(path, err)));
    if let Err(err) = written {
        log::error!("Error writing {}: {err}", path.display());
        fs::remove_file(&tmp).ok();
        return Err(err);
    }
    Ok(())
}

/// Load a state from the given file.
pub fn load_from(path: &Path, gg: &mut Machine) -> Result<StateLoad, StorageError> {
    match read(path)? {
        Some(snapshot) => {
            snapshot.apply(gg)?;
            Ok(StateLoad::Loaded)
        }
        None => Ok(StateLoad::Empty),
    }
}

/// Read and decode the state in the given file, without loading it.
/// Returns None if there is no such file.
pub fn read(path: &Path) -> Result<Option<Snapshot>, StorageError> {
    let state = match fs::read(path) {
        Ok(state) => state,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            log::info!("No save state at {}", path.display());
            return Ok(None);
        }
        Err(err) => {
            log::error!("Error opening {}: {err}", path.display());
            return Err(StorageError::io(path, err));
        }
    };
    Snapshot::decode(&state).map(Some)
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use super::*;
    use crate::{
        io::{
            addr::{VRAM_SELECT, WRAM_SELECT},
            joypad::Button,
            VRAM_BANK_SIZE, WRAM_BANK_SIZE,
        },
        testing::{fill_pattern, test_machine},
        Mode,
    };

    fn busy_machine(path: PathBuf) -> Box<Machine> {
        let mut gg = test_machine(true, 3, Some(path));
        gg.cpu.pc = 0x0150;
        gg.cpu.sp = 0xFFFE;
        gg.cpu.ime = true;
        gg.cpu.regs = [0x11, 0xB0, 0, 0x13, 0, 0xD8, 0x01, 0x77];
        fill_pattern(&mut gg.mem.vram, 1);
        fill_pattern(&mut gg.mem.wram, 2);
        fill_pattern(&mut gg.mem.oam, 3);
        fill_pattern(gg.cart.ram_mut(), 4);
        gg.write_io(VRAM_SELECT, 1);
        gg.write_io(WRAM_SELECT, 6);
        gg.select_rom_bank(5);
        gg.cart.ram_bank = 2;
        gg.cart.ram_enable = true;
        gg.render_target().fill([1, 2, 3, 4]);
        gg.swap_screen_buffers();
        gg
    }

    #[test]
    fn round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.s3");
        let gg = busy_machine(dir.path().join("game.gbc"));
        save_to(&path, &gg).unwrap();

        let mut fresh = test_machine(true, 3, None);
        assert_eq!(load_from(&path, &mut fresh).unwrap(), StateLoad::Loaded);

        assert_eq!(fresh.cpu, gg.cpu);
        assert!(fresh.mem == gg.mem);
        assert_eq!(fresh.cart.ram(), gg.cart.ram());
        assert_eq!(fresh.cart.rom_bank, 5);
        assert_eq!(fresh.cart.ram_bank, 2);
        assert!(fresh.cart.ram_enable);
        assert_eq!(fresh.mode, Mode::Cgb);
        assert!(fresh.screen == gg.screen);
    }

    #[test]
    fn file_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.s0");
        let gg = busy_machine(dir.path().join("game.gbc"));
        save_to(&path, &gg).unwrap();
        let file = fs::read(path).unwrap();

        assert_eq!(&file[..4], &FORMAT_VERSION.to_le_bytes());
        assert_eq!(&file[file.len() - gg.cart.ram_size()..], gg.cart.ram());
        let record = bincode::serialized_size(&*gg).unwrap() as usize;
        assert_eq!(file.len(), 4 + record + gg.cart.ram_size());
    }

    #[test]
    fn no_ram_no_trailer() {
        let gg = test_machine(false, 0, None);
        let state = encode(&gg).unwrap();
        let record = bincode::serialized_size(&*gg).unwrap() as usize;
        assert_eq!(state.len(), 4 + record);

        let mut other = test_machine(false, 0, None);
        other.cpu.pc = 0x1234;
        Snapshot::decode(&state).unwrap().apply(&mut other).unwrap();
        assert_eq!(other.cpu.pc, 0);
    }

    #[test]
    fn references_come_from_caller() {
        let dir = tempfile::tempdir().unwrap();
        let gg = busy_machine(dir.path().join("old.gbc"));
        let state = encode(&gg).unwrap();

        let new_path = dir.path().join("elsewhere/new.gbc");
        let mut target = test_machine(true, 3, Some(new_path.clone()));
        let rom = target.cart.rom.clone();
        let ram_ptr = target.cart.ram().as_ptr();

        Snapshot::decode(&state).unwrap().apply(&mut target).unwrap();
        assert!(Arc::ptr_eq(&target.cart.rom, &rom));
        assert_eq!(target.cart.ram().as_ptr(), ram_ptr);
        assert_eq!(target.cart.path, Some(new_path));
    }

    #[test]
    fn views_rebuilt_after_load() {
        let gg = busy_machine(PathBuf::from("game.gbc"));
        let state = encode(&gg).unwrap();
        let mut target = test_machine(true, 3, None);
        Snapshot::decode(&state).unwrap().apply(&mut target).unwrap();

        assert_eq!(target.vram().as_ptr(), target.mem.vram[VRAM_BANK_SIZE..].as_ptr());
        assert_eq!(
            target.wramx().as_ptr(),
            target.mem.wram[6 * WRAM_BANK_SIZE..].as_ptr()
        );
        assert_eq!(target.romx()[0], 5);
        assert_eq!(target.romx().as_ptr(), target.cart.rom[5 * 0x4000..].as_ptr());
        assert_eq!(target.sram().as_ptr(), target.cart.ram().as_ptr());
        assert_eq!(target.views().render_target, 0);
        assert_eq!(target.views().presented, 1);
    }

    #[test]
    fn input_released_after_load() {
        let mut gg = test_machine(false, 2, None);
        for button in Button::BUTTONS {
            gg.joypad.set(button, true);
        }
        gg.joypad.set_turbo(true);
        let state = encode(&gg).unwrap();

        let mut target = test_machine(false, 2, None);
        Snapshot::decode(&state).unwrap().apply(&mut target).unwrap();
        assert!(!target.joypad.any_held());
    }

    #[test]
    fn empty_slot_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut gg = busy_machine(dir.path().join("game.gbc"));
        let before = gg.clone();
        let path = dir.path().join("game.s7");
        assert_eq!(load_from(&path, &mut gg).unwrap(), StateLoad::Empty);
        assert!(*gg == *before);
    }

    #[test]
    fn version_mismatch() {
        let gg = test_machine(false, 2, None);
        let mut state = encode(&gg).unwrap();
        state[..4].copy_from_slice(&(FORMAT_VERSION + 1).to_le_bytes());
        assert!(matches!(
            Snapshot::decode(&state),
            Err(StorageError::Version { found, expected: FORMAT_VERSION }) if found == FORMAT_VERSION + 1
        ));
    }

    #[test]
    fn truncated_ram_rejected() {
        let mut gg = test_machine(false, 2, None);
        gg.cpu.pc = 0x4000;
        let mut state = encode(&gg).unwrap();
        state.truncate(state.len() - 10);
        assert!(matches!(
            Snapshot::decode(&state),
            Err(StorageError::Truncated { expected: 0x2000, found: 0x1FF6 })
        ));

        state.truncate(100);
        assert!(matches!(Snapshot::decode(&state), Err(StorageError::Decode(_))));
    }

    #[test]
    fn ram_size_mismatch_leaves_machine() {
        let gg = test_machine(false, 3, None);
        let state = encode(&gg).unwrap();

        let mut target = test_machine(false, 2, None);
        target.cpu.pc = 0x0200;
        let before = target.clone();
        let err = Snapshot::decode(&state).unwrap().apply(&mut target);
        assert!(matches!(
            err,
            Err(StorageError::RamSize { found: 0x8000, expected: 0x2000 })
        ));
        assert!(*target == *before);
    }

    #[test]
    fn open_failure_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nowhere/game.s1");
        let gg = test_machine(false, 2, None);
        assert!(matches!(save_to(&path, &gg), Err(StorageError::Io { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn overwrites_slot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.s2");
        let mut gg = test_machine(false, 2, None);
        gg.cpu.pc = 1;
        save_to(&path, &gg).unwrap();
        gg.cpu.pc = 2;
        save_to(&path, &gg).unwrap();
        gg.cpu.pc = 3;
        assert_eq!(load_from(&path, &mut gg).unwrap(), StateLoad::Loaded);
        assert_eq!(gg.cpu.pc, 2);
        assert!(!dir.path().join("game.s2.tmp").exists());
    }

    #[test]
    fn failed_write_keeps_old_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.s4");
        let mut gg = test_machine(false, 2, None);
        gg.cpu.pc = 0x0444;
        save_to(&path, &gg).unwrap();
        let before = fs::read(&path).unwrap();

        // A directory in the way of the temporary file makes the write fail.
        fs::create_dir(dir.path().join("game.s4.tmp")).unwrap();
        gg.cpu.pc = 0x0555;
        assert!(matches!(save_to(&path, &gg), Err(StorageError::Io { .. })));
        assert_eq!(fs::read(&path).unwrap(), before);

        gg.cpu.pc = 0;
        load_from(&path, &mut gg).unwrap();
        assert_eq!(gg.cpu.pc, 0x0444);
    }
}
