//! JSON file record store.
//!
//! Values live in memory and every write is flushed to disk with a
//! write-then-rename so a crash never leaves a half-written file. Disk
//! failures are logged and otherwise ignored: the session keeps playing with
//! the in-memory copy.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::RecordStore;

#[derive(Debug, Default, Serialize, Deserialize)]
struct RecordFile {
    version: u32,
    #[serde(default)]
    records: BTreeMap<String, u32>,
}

impl RecordFile {
    const VERSION: u32 = 1;
}

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, u32>,
}

impl JsonFileStore {
    /// Open the store at `path`, loading existing records.
    ///
    /// A missing file is an empty store. An unreadable or corrupt file is
    /// logged and treated as empty; it is replaced on the next write.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let values = match Self::load(&path) {
            Ok(values) => values,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignoring unreadable record file");
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    /// `$XDG_STATE_HOME/tui-link/records.json`, then `~/.local/state/...`,
    /// then the current directory.
    pub fn default_path() -> PathBuf {
        let base = if let Ok(state_home) = std::env::var("XDG_STATE_HOME") {
            PathBuf::from(state_home)
        } else if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home).join(".local").join("state")
        } else {
            PathBuf::from(".")
        };
        base.join("tui-link").join("records.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> Result<BTreeMap<String, u32>> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let file: RecordFile = serde_json::from_str(&text).context("failed to parse record file")?;
        if file.version != RecordFile::VERSION {
            warn!(
                stored = file.version,
                expected = RecordFile::VERSION,
                "record file version mismatch, starting fresh"
            );
            return Ok(BTreeMap::new());
        }
        Ok(file.records)
    }

    /// Write all values to disk.
    pub fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }

        let file = RecordFile {
            version: RecordFile::VERSION,
            records: self.values.clone(),
        };
        let json = serde_json::to_string_pretty(&file)?;

        let mut tmp = self.path.clone();
        tmp.set_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;

        debug!(path = %self.path.display(), entries = self.values.len(), "records saved");
        Ok(())
    }
}

impl RecordStore for JsonFileStore {
    fn read(&self, key: &str) -> u32 {
        self.values.get(key).copied().unwrap_or(0)
    }

    fn write(&mut self, key: &str, value: u32) {
        self.values.insert(key.to_string(), value);
        if let Err(err) = self.flush() {
            warn!(key, value, error = %err, "failed to persist record");
        }
    }
}
