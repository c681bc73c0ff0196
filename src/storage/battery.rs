// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

//! Cartridge RAM, stored as a raw `.sav` file next to the ROM.

use std::{
    fs::{self, File},
    io::{ErrorKind, Read, Write},
    path::Path,
};

use crate::{Machine, StorageError};

/// Result of loading cartridge RAM.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BatteryLoad {
    /// RAM was filled from the save file.
    Loaded { bytes: usize },
    /// There is no save file; this game was never saved.
    NoSave,
}

/// Is there cartridge RAM worth saving?
/// Checked before a save file path is even derived.
pub(crate) fn has_data(gg: &Machine) -> bool {
    if gg.cart.ram_size() == 0 {
        log::info!("Cartridge has no battery RAM, not saving.");
        return false;
    }
    if !gg.initialised {
        log::info!("GG not initialised, not saving.");
        return false;
    }
    true
}

/// Save the given system's cartridge RAM into the given file.
/// Returns false without touching the file if there is nothing to save.
pub fn save_to(path: &Path, gg: &Machine) -> Result<bool, StorageError> {
    if !has_data(gg) {
        return Ok(false);
    }

    log::info!("Saving {}...", path.display());
    let write_err = |source| StorageError::BatteryWrite {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::create(path).map_err(write_err)?;
    file.write_all(&gg.cart.ram()[..gg.cart.ram_size()])
        .map_err(write_err)?;
    log::info!("Saved.");
    Ok(true)
}

/// Load the given system's cartridge RAM from the given file.
/// A missing file is not an error, RAM is left as it was.
/// A file shorter than RAM only fills the start of it.
pub fn load_from(path: &Path, gg: &mut Machine) -> Result<BatteryLoad, StorageError> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BatteryLoad::NoSave),
        Err(err) => return Err(StorageError::io(path, err)),
    };

    log::info!("Loading {}...", path.display());
    let ram = gg.cart.ram_mut();
    let mut filled = 0;
    while filled < ram.len() {
        match file.read(&mut ram[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(StorageError::io(path, err)),
        }
    }
    if filled < ram.len() {
        log::warn!(
            "Save file {} is only {filled} bytes, cartridge has {}",
            path.display(),
            ram.len()
        );
    }
    Ok(BatteryLoad::Loaded { bytes: filled })
}

/// Delete the given save file, if it exists.
pub fn remove(path: &Path) -> Result<(), StorageError> {
    match fs::remove_file(path) {
        Err(err) if err.kind() != ErrorKind::NotFound => Err(StorageError::io(path, err)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testing::{fill_pattern, test_machine};

    #[test]
    fn round_trip_all_sizes() {
        let dir = tempfile::tempdir().unwrap();
        for (code, size) in [(0, 0), (2, 0x2000), (3, 0x8000), (5, 0x10000), (4, 0x20000)] {
            let path = dir.path().join(format!("game{code}.sav"));
            let mut gg = test_machine(true, code, None);
            assert_eq!(gg.cart.ram_size(), size);
            fill_pattern(gg.cart.ram_mut(), code);
            let saved = gg.cart.ram().to_vec();

            let written = save_to(&path, &gg).unwrap();
            let mut fresh = test_machine(true, code, None);
            let loaded = load_from(&path, &mut fresh).unwrap();
            assert_eq!(fresh.cart.ram(), &saved[..]);

            if size == 0 {
                assert!(!written);
                assert!(!path.exists());
                assert_eq!(loaded, BatteryLoad::NoSave);
            } else {
                assert!(written);
                assert_eq!(fs::metadata(&path).unwrap().len(), size as u64);
                assert_eq!(loaded, BatteryLoad::Loaded { bytes: size });
            }
        }
    }

    #[test]
    fn missing_file_leaves_ram() {
        let dir = tempfile::tempdir().unwrap();
        let mut gg = test_machine(false, 2, None);
        fill_pattern(gg.cart.ram_mut(), 7);
        let before = gg.cart.ram().to_vec();
        assert_eq!(
            load_from(&dir.path().join("new.sav"), &mut gg).unwrap(),
            BatteryLoad::NoSave
        );
        assert_eq!(gg.cart.ram(), &before[..]);
    }

    #[test]
    fn short_file_fills_start() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.sav");
        fs::write(&path, [0xAA; 100]).unwrap();

        let mut gg = test_machine(false, 2, None);
        gg.cart.ram_mut().fill(0x11);
        assert_eq!(
            load_from(&path, &mut gg).unwrap(),
            BatteryLoad::Loaded { bytes: 100 }
        );
        assert!(gg.cart.ram()[..100].iter().all(|b| *b == 0xAA));
        assert!(gg.cart.ram()[100..].iter().all(|b| *b == 0x11));
    }

    #[test]
    fn long_file_is_cut() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("long.sav");
        fs::write(&path, vec![0x55; 0x3000]).unwrap();

        let mut gg = test_machine(false, 2, None);
        assert_eq!(
            load_from(&path, &mut gg).unwrap(),
            BatteryLoad::Loaded { bytes: 0x2000 }
        );
        assert_eq!(gg.cart.ram().len(), 0x2000);
    }

    #[test]
    fn nothing_to_save() {
        let mut gg = test_machine(false, 2, None);
        assert!(has_data(&gg));
        gg.initialised = false;
        assert!(!has_data(&gg));
        assert!(!has_data(&test_machine(false, 0, None)));
    }

    #[test]
    fn not_initialised_does_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.sav");
        let mut gg = test_machine(false, 2, None);
        gg.initialised = false;
        assert!(!save_to(&path, &gg).unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn unwritable_is_battery_error() {
        let dir = tempfile::tempdir().unwrap();
        let gg = test_machine(false, 2, None);
        assert!(matches!(
            save_to(&dir.path().join("missing/game.sav"), &gg),
            Err(StorageError::BatteryWrite { .. })
        ));
    }

    #[test]
    fn remove_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.sav");
        save_to(&path, &test_machine(false, 2, None)).unwrap();
        assert!(path.exists());
        remove(&path).unwrap();
        assert!(!path.exists());
        remove(&path).unwrap();
    }
}
