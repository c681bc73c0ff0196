// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

use std::{
    path::{Path, PathBuf},
    process,
};

use crate::{
    shared::{SharedMachine, SlotRequests},
    storage::{
        battery::BatteryLoad,
        path::{SaveKind, Slot},
        snapshot::{Snapshot, StateLoad},
    },
    Machine, StorageConfig, StorageError,
};

pub mod battery;
pub mod path;
pub mod snapshot;

/// Struct holding methods used for interacting with the file system,
/// for storing game save data / cartridge RAM and save states.
/// Will load/store `.sav` and `.s0`-`.s9` files next to game ROM files.
#[derive(Debug, Clone, Default)]
pub struct Storage {
    pub config: StorageConfig,
}

impl Storage {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    /// Save the given system's cartridge RAM to disk.
    /// If the save file cannot be written, this logs the error and
    /// exits the process.
    pub fn save_game(&self, gg: &Machine) {
        if !self.config.battery_saves {
            return;
        }
        if let Err(err) = self.try_save_game(gg) {
            log::error!("{err}");
            process::exit(1);
        }
    }

    /// Save the given system's cartridge RAM to disk, returning any error.
    pub fn try_save_game(&self, gg: &Machine) -> Result<Option<PathBuf>, StorageError> {
        if !battery::has_data(gg) {
            return Ok(None);
        }
        let Some(source) = gg.cart.path.as_deref() else {
            log::info!("No ROM path, not saving.");
            return Ok(None);
        };
        let path = self.path_for(source, SaveKind::Battery)?;
        battery::save_to(&path, gg).map(|written| written.then_some(path))
    }

    /// Load the given system's cartridge RAM from disk, replacing existing RAM.
    pub fn load_game(&self, gg: &mut Machine) -> Result<BatteryLoad, StorageError> {
        let Some(source) = gg.cart.path.clone() else {
            return Ok(BatteryLoad::NoSave);
        };
        let path = self.path_for(&source, SaveKind::Battery)?;
        battery::load_from(&path, gg)
    }

    /// Delete the given system's battery save, if there is one.
    pub fn remove_game(&self, gg: &Machine) -> Result<(), StorageError> {
        let Some(source) = gg.cart.path.as_deref() else {
            return Ok(());
        };
        battery::remove(&self.path_for(source, SaveKind::Battery)?)
    }

    /// Save the current state of the shared system into the given slot.
    /// The state is captured while holding the lock, the file is written
    /// after releasing it.
    pub fn save_state(
        &self,
        shared: &SharedMachine,
        slot: Slot,
    ) -> Result<PathBuf, StorageError> {
        let (source, state) = {
            let gg = shared.lock();
            (gg.cart.path.clone(), snapshot::encode(&gg)?)
        };
        let source = source.ok_or(StorageError::NoPath)?;
        let path = self.path_for(&source, SaveKind::State(slot))?;
        snapshot::write_state(&path, &state)?;
        log::info!("Saved state to {}", path.display());
        Ok(path)
    }

    /// Load the given slot into the shared system.
    /// The file is read and decoded without holding the lock; replacing the
    /// system, restoring references, rebuilding views and releasing input all
    /// happen under a single lock, so no other user of the system ever
    /// sees a partially restored state.
    pub fn load_state(
        &self,
        shared: &SharedMachine,
        slot: Slot,
    ) -> Result<StateLoad, StorageError> {
        let source = shared.source_path().ok_or(StorageError::NoPath)?;
        let path = self.path_for(&source, SaveKind::State(slot))?;
        let Some(snapshot) = snapshot::read(&path)? else {
            return Ok(StateLoad::Empty);
        };
        self.publish(shared, snapshot)?;
        log::info!("Loaded state from {}", path.display());
        Ok(StateLoad::Loaded)
    }

    /// Service pending slot requests, consuming them.
    /// A save is done before a load. Both are attempted even if one fails;
    /// the first error is returned.
    pub fn service(
        &self,
        shared: &SharedMachine,
        requests: &mut SlotRequests,
    ) -> Result<(), StorageError> {
        let saved = requests
            .take_save()
            .map(|slot| self.save_state(shared, slot).map(|_| ()));
        let loaded = requests
            .take_load()
            .map(|slot| self.load_state(shared, slot).map(|_| ()));
        saved.unwrap_or(Ok(())).and(loaded.unwrap_or(Ok(())))
    }

    fn publish(&self, shared: &SharedMachine, snapshot: Snapshot) -> Result<(), StorageError> {
        let mut gg = shared.lock();
        snapshot.apply(&mut gg)
    }

    /// Path of the given state slot for the given system's ROM.
    pub fn slot_path(&self, gg: &Machine, slot: Slot) -> Result<PathBuf, StorageError> {
        let source = gg.cart.path.as_deref().ok_or(StorageError::NoPath)?;
        self.path_for(source, SaveKind::State(slot))
    }

    fn path_for(&self, source: &Path, kind: SaveKind) -> Result<PathBuf, StorageError> {
        path::derive_with_limit(source, kind, self.config.max_path_len)
    }
}
