// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

use serde::{Deserialize, Serialize};

/// The system CPU's registers.
/// Execution itself is done by the core; this only holds what
/// needs to survive a save state.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Cpu {
    pub pc: u16,
    pub sp: u16,
    pub ime: bool,
    pub halted: bool,
    /// A, F, B, C, D, E, H, L.
    pub regs: [u8; 8],
}
