// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Local persistence
//!
//! Small key/value preferences (emoji snapshot, notification caches) and the
//! checksums that guard persisted snapshots.

mod integrity;
mod prefs;

pub use integrity::{compute_checksum, verify_checksum, IntegrityError};
pub use prefs::{FilePreferences, MemoryPreferences, Preferences, PrefsError, PREFS_FILE_NAME};
