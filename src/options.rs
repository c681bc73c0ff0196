// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

use crate::storage::path::MAX_PATH_LEN;

/// Configuration used by [crate::storage::Storage].
/// These options don't change at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde_config", derive(serde::Deserialize, serde::Serialize))]
pub struct StorageConfig {
    /// If cartridge RAM should be written to a `.sav` file at all.
    pub battery_saves: bool,
    /// Maximum length of a derived save file path, in bytes.
    pub max_path_len: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            battery_saves: true,
            max_path_len: MAX_PATH_LEN,
        }
    }
}
