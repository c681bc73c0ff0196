// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Everything that can go wrong while persisting a game.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The derived save file name does not fit the path limit.
    #[error("save file name is too long ({len} bytes, limit {limit})")]
    PathTooLong { len: usize, limit: usize },
    /// Save files are named after the ROM, which needs to have a path.
    #[error("no ROM path to name save files after")]
    NoPath,
    /// Slot indices are a single digit.
    #[error("invalid save state slot {0}, must be 0-9")]
    InvalidSlot(u8),

    /// A save state file could not be opened, read or written.
    #[error("error accessing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The battery save could not be written.
    /// Callers are expected to treat this as fatal.
    #[error("can't write save file {}: {source}", path.display())]
    BatteryWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode save state: {0}")]
    Encode(#[source] bincode::Error),
    #[error("failed to decode save state: {0}")]
    Decode(#[source] bincode::Error),
    #[error("save state has format version {found}, expected {expected}")]
    Version { found: u32, expected: u32 },
    #[error("save state is for a cartridge with {found} bytes of RAM, this one has {expected}")]
    RamSize { found: usize, expected: usize },
    #[error("save state is missing cartridge RAM: expected {expected} bytes, found {found}")]
    Truncated { expected: usize, found: usize },
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
