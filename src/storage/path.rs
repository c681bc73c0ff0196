// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use crate::StorageError;

/// Longest path a save file may have, in bytes.
pub const MAX_PATH_LEN: usize = 4096;

/// A save state slot. Slots are numbered 0-9.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Slot(u8);

impl Slot {
    pub const COUNT: u8 = 10;

    pub fn new(index: u8) -> Result<Self, StorageError> {
        if index < Self::COUNT {
            Ok(Self(index))
        } else {
            Err(StorageError::InvalidSlot(index))
        }
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = Slot> {
        (0..Self::COUNT).map(Slot)
    }
}

impl TryFrom<u8> for Slot {
    type Error = StorageError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::new(index)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of file stored next to a ROM.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SaveKind {
    /// Cartridge RAM, `.sav`.
    Battery,
    /// A save state, `.s0` to `.s9`.
    State(Slot),
}

impl SaveKind {
    fn extension(self) -> String {
        match self {
            SaveKind::Battery => ".sav".into(),
            SaveKind::State(slot) => format!(".s{slot}"),
        }
    }
}

/// "hello/my/rom.gb" -> "hello/my/rom.sav" / "hello/my/rom.s3"
pub fn derive(source: &Path, kind: SaveKind) -> Result<PathBuf, StorageError> {
    derive_with_limit(source, kind, MAX_PATH_LEN)
}

/// Same as [derive], with a custom path length limit.
/// Only the last extension of the file name is replaced.
pub fn derive_with_limit(
    source: &Path,
    kind: SaveKind,
    limit: usize,
) -> Result<PathBuf, StorageError> {
    let path = match source.file_stem() {
        Some(stem) => {
            let mut name = stem.to_os_string();
            name.push(kind.extension());
            source.with_file_name(name)
        }
        None => {
            let mut name = source.as_os_str().to_os_string();
            name.push(kind.extension());
            PathBuf::from(name)
        }
    };

    let len = path.as_os_str().len();
    if len >= limit {
        log::error!("Save file name {} too long", path.display());
        return Err(StorageError::PathTooLong { len, limit });
    }
    Ok(path)
}
