// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

//! Sharing a system between the emulation thread and the frontend.

use std::{
    path::PathBuf,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{storage::path::Slot, Colour, Machine};

/// A system shared between threads. Everyone, including the frontend
/// drawing the screen, goes through the same lock, and state loads
/// replace the system in a single critical section.
#[derive(Clone)]
pub struct SharedMachine(Arc<Mutex<Box<Machine>>>);

impl SharedMachine {
    pub fn new(gg: Box<Machine>) -> Self {
        Self(Arc::new(Mutex::new(gg)))
    }

    /// Lock the system. A panic on another thread while it held the
    /// lock does not make the system unusable.
    pub fn lock(&self) -> MutexGuard<'_, Box<Machine>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run the given closure on the frame currently presented.
    /// For use by the render path.
    pub fn with_frame<T>(&self, f: impl FnOnce(&[Colour]) -> T) -> T {
        let gg = self.lock();
        f(gg.presented_frame())
    }

    /// Path of the ROM the system was loaded from.
    pub fn source_path(&self) -> Option<PathBuf> {
        self.lock().cart.path.clone()
    }
}

/// Save state requests made by the frontend, to be serviced by
/// [crate::Storage::service] between frames. Servicing consumes them,
/// whether they succeed or not.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SlotRequests {
    save: Option<Slot>,
    load: Option<Slot>,
}

impl SlotRequests {
    pub fn request_save(&mut self, slot: Slot) {
        self.save = Some(slot);
    }

    pub fn request_load(&mut self, slot: Slot) {
        self.load = Some(slot);
    }

    pub fn take_save(&mut self) -> Option<Slot> {
        self.save.take()
    }

    pub fn take_load(&mut self) -> Option<Slot> {
        self.load.take()
    }

    pub fn is_idle(&self) -> bool {
        self.save.is_none() && self.load.is_none()
    }
}
