// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Key/value preferences for small persisted state
//!
//! The file-backed store keeps all entries in one JSON map, written
//! atomically to prevent partial files on crash/interruption.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use thiserror::Error;
use tracing::warn;

/// Name of the preferences file inside the data directory.
pub const PREFS_FILE_NAME: &str = "chatkit_prefs.json";

/// String key/value store that survives process restarts.
pub trait Preferences: Send + Sync {
    /// Returns the value stored under `key`.
    fn get_string(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`.
    fn put_string(&self, key: &str, value: &str) -> Result<(), PrefsError>;

    /// Removes `key`.
    fn remove(&self, key: &str) -> Result<(), PrefsError>;

    /// Removes every entry.
    fn clear(&self) -> Result<(), PrefsError>;
}

/// Preferences persisted as a JSON map in the data directory.
pub struct FilePreferences {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FilePreferences {
    /// Opens the preferences file in `data_dir`, creating the directory if needed.
    ///
    /// An unreadable or corrupt file is treated as empty.
    pub fn open(data_dir: &Path) -> Result<Self, PrefsError> {
        fs::create_dir_all(data_dir)?;
        let path = data_dir.join(PREFS_FILE_NAME);

        let entries = match fs::read_to_string(&path) {
            Ok(data) => serde_json::from_str(&data).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "discarding corrupt preferences");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(FilePreferences {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), PrefsError> {
        let data = serde_json::to_string_pretty(entries)?;
        atomic_write(&self.path, data.as_bytes())
    }
}

impl Preferences for FilePreferences {
    fn get_string(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn put_string(&self, key: &str, value: &str) -> Result<(), PrefsError> {
        let mut entries = self.entries.lock();
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), PrefsError> {
        let mut entries = self.entries.lock();
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), PrefsError> {
        let mut entries = self.entries.lock();
        entries.clear();
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// Preferences kept in memory only.
#[derive(Default)]
pub struct MemoryPreferences {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryPreferences {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Preferences for MemoryPreferences {
    fn get_string(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn put_string(&self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PrefsError> {
        self.entries.lock().remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), PrefsError> {
        self.entries.lock().clear();
        Ok(())
    }
}

/// Atomic file write (write to temp, then rename)
///
/// Either the old content remains or the new content is fully written.
fn atomic_write(path: &Path, data: &[u8]) -> Result<(), PrefsError> {
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, data)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

/// Errors that can occur with the preferences store
#[derive(Debug, Error)]
pub enum PrefsError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
