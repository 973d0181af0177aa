//! String-keyed persistent stores.
//!
//! The repository only ever talks to a [`KeyValueStore`]. Values are
//! serialized text; the store does not interpret them.
//!
//! [`FileStore`] guards its directory with one advisory lock file: reads
//! hold it shared, writes and removals hold it exclusively.

use crate::{Error, Result};
use fs2::FileExt;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

/// Key under which the sorted exercise name list is stored
pub const EXERCISES_KEY: &str = "gym_logbook_exercises";

/// Key under which the entry collection is stored
pub const ENTRIES_KEY: &str = "gym_logbook_entries";

/// Advisory lock file shared by every key in a [`FileStore`] directory
pub const LOCK_FILE: &str = ".lock";

/// Key-value store trait used by the repository
pub trait KeyValueStore {
    /// Read the value for `key`, or `None` if it was never set
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value for `key`
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// File-backed store keeping one `<key>.json` file per key
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`. The directory is created lazily.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Open (creating if needed) the directory lock file. The directory must exist.
    fn open_lock(&self) -> Result<File> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.dir.join(LOCK_FILE))?;
        Ok(file)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let lock = self.open_lock()?;
        lock.lock_shared()?;

        let mut contents = String::new();
        let read = File::open(&path)
            .and_then(|file| std::io::BufReader::new(file).read_to_string(&mut contents));
        lock.unlock()?;
        read?;

        tracing::trace!("Read {} bytes from {:?}", contents.len(), path);
        Ok(Some(contents))
    }

    /// Atomically writes the value by:
    /// 1. Taking the directory lock exclusively
    /// 2. Writing to a temp file in the same directory
    /// 3. Syncing to disk
    /// 4. Renaming over the original
    fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);

        let lock = self.open_lock()?;
        lock.lock_exclusive()?;
        let written = write_atomic(&self.dir, &path, value);
        lock.unlock()?;
        written?;

        tracing::debug!("Wrote key {} to {:?}", key, path);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(());
        }

        let lock = self.open_lock()?;
        lock.lock_exclusive()?;
        let removed = std::fs::remove_file(&path);
        lock.unlock()?;

        match removed {
            Ok(()) => {
                tracing::debug!("Removed key {} ({:?})", key, path);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn write_atomic(dir: &Path, path: &Path, value: &str) -> Result<()> {
    let temp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        writer.write_all(value.as_bytes())?;
        writer.flush()?;
    }
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

/// In-memory store, mostly for tests and embedding
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.values
            .lock()
            .map_err(|_| Error::Store("memory store mutex poisoned".into()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}
