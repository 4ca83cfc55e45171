use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".bookshelf-tracker";

/// Flat key-value persistence boundary. The shelf store only ever reads and
/// writes whole values under a fixed key, which keeps this trait small enough
/// to fake in tests with a plain map.
pub trait StorageBackend {
    /// Fetch the raw value stored under `key`, or `None` when nothing has
    /// been written yet.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value under `key` in a single step. Implementations must
    /// never leave a partially written value behind.
    fn write(&self, key: &str, value: &str) -> Result<()>;
}

/// Backend that keeps each key in its own JSON file inside the application
/// data directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open the store rooted at the default per-user data directory, creating
    /// the directory on first run.
    pub fn open_default() -> Result<Self> {
        let base_dirs =
            BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
        Self::open(base_dirs.home_dir().join(DATA_DIR_NAME))
    }

    /// Open a store rooted at an explicit directory. Tests point this at a
    /// temporary directory instead of the real home.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).context("failed to create data directory")?;
        Ok(Self { dir })
    }

    /// Directory this store keeps its files in. The log file lives alongside
    /// the persisted values.
    pub fn data_dir(&self) -> &Path {
        &self.dir
    }

    fn value_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageBackend for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.value_path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).context("failed to read persisted value"),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        // Write a sibling temp file and rename it into place so an
        // interrupted write can never leave a truncated value behind.
        let path = self.value_path(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, value).context("failed to write temporary value file")?;
        fs::rename(&tmp, &path).context("failed to replace persisted value")?;
        Ok(())
    }
}

/// In-memory backend so the shelf store logic can be exercised in unit tests
/// without touching the real home directory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl StorageBackend for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
