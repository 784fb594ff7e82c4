//! JSON file store backend
//!
//! All keys live in one JSON object on disk. Each write rewrites the file
//! through a temp file in the same directory followed by a rename, so a crash
//! mid-write never leaves a truncated store behind.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{Error, Result};

use super::KeyValueStore;

/// Default store location (~/.local/share/jarbook/store.json on Linux)
pub fn default_store_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("jarbook").join("store.json"))
}

/// Key-value store persisted as a single JSON file
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open a store file, creating the parent directory if needed
    ///
    /// A missing file is an empty store; it is created on first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    Error::Store(format!(
                        "Failed to create store directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
                info!("Created store directory: {}", parent.display());
            }
        }

        let entries = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content).map_err(|e| {
                    Error::Store(format!("Corrupt store file {}: {}", path.display(), e))
                })?
            }
        } else {
            BTreeMap::new()
        };

        debug!(path = %path.display(), keys = entries.len(), "Opened file store");

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut temp = NamedTempFile::new_in(&dir)?;
        let json = serde_json::to_string_pretty(entries)?;
        temp.write_all(json.as_bytes())?;
        temp.flush()?;
        temp.persist(&self.path)
            .map_err(|e| Error::Store(format!("Failed to write store file: {}", e)))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| Error::Store("Failed to acquire store lock".into()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| Error::Store("Failed to acquire store lock".into()))?;
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| Error::Store("Failed to acquire store lock".into()))?;
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }
}
