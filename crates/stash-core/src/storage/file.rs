//! JSON-file-backed storage handle.
//!
//! The whole key space lives in one JSON object file. Nothing is cached in
//! memory: every read parses the file under a shared lock, and every mutation
//! runs read-modify-write under an exclusive lock, so several handles (or
//! processes) on the same path only ever overwrite the keys they touch.
//!
//! Writes are atomic:
//! 1. Serialize to a temp file with unique PID+TID suffix
//! 2. Sync it to disk
//! 3. Rename it over the target (the temp file is removed if any step fails)

use super::traits::{StorageHandle, StorageResult};
use crate::error::{Result, StashError, StorageError};
use fs2::FileExt;
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::hash::{Hash, Hasher};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::{process, thread};
use tracing::{debug, warn};

type Entries = BTreeMap<String, String>;

/// Persistent storage handle over a JSON file.
///
/// Writers are serialized through an advisory lock on a `<file>.lock`
/// sidecar.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
    lock_path: PathBuf,
}

impl JsonFileStorage {
    /// Open the store at `path`.
    ///
    /// A missing file opens as an empty store; it is created on first write.
    /// An existing file must parse as a JSON object of strings.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let mut lock_name = OsString::from(path.as_os_str());
        lock_name.push(".lock");

        let store = Self {
            lock_path: PathBuf::from(lock_name),
            path,
        };

        if store.path.exists() {
            let contents = fs::read_to_string(&store.path)
                .map_err(|e| StashError::io_with_path(e, &store.path))?;
            let entries = serde_json::from_str::<Entries>(&contents).map_err(|e| {
                StashError::Json {
                    message: format!("Failed to parse {}: {}", store.path.display(), e),
                    source: Some(e),
                }
            })?;
            debug!("Opened {} ({} entries)", store.path.display(), entries.len());
        } else {
            debug!("Opened {} (not yet created)", store.path.display());
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the lock sidecar and take a shared or exclusive lock on it.
    ///
    /// The lock is held until the returned file is dropped.
    fn acquire(&self, exclusive: bool) -> StorageResult<File> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                backend_error(format!("Failed to create directory {}: {}", parent.display(), e))
            })?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.lock_path)
            .map_err(|e| {
                backend_error(format!("Failed to open {}: {}", self.lock_path.display(), e))
            })?;

        let locked = if exclusive {
            FileExt::lock_exclusive(&file)
        } else {
            FileExt::lock_shared(&file)
        };
        locked.map_err(|e| StorageError::Unavailable {
            message: format!("Failed to lock {}: {}", self.lock_path.display(), e),
        })?;

        Ok(file)
    }

    /// Parse the current file contents. The caller holds the lock.
    fn read_entries(&self) -> StorageResult<Entries> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => {
                return Err(backend_error(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        serde_json::from_str(&contents)
            .map_err(|e| backend_error(format!("Failed to parse {}: {}", self.path.display(), e)))
    }

    /// Current entries, read under a shared lock.
    fn snapshot(&self) -> StorageResult<Entries> {
        if !self.path.exists() {
            return Ok(Entries::new());
        }
        let _lock = self.acquire(false)?;
        self.read_entries()
    }

    /// Re-read the file, apply `mutate`, and persist the result, all under the
    /// exclusive lock. `mutate` returns whether anything changed; unchanged
    /// entries are not rewritten.
    fn update(&self, mutate: impl FnOnce(&mut Entries) -> bool) -> StorageResult<()> {
        let _lock = self.acquire(true)?;
        let mut entries = self.read_entries()?;
        if !mutate(&mut entries) {
            return Ok(());
        }
        write_atomic(&self.path, &entries)
    }
}

fn backend_error(message: String) -> StorageError {
    StorageError::Backend { message }
}

/// Get a unique thread identifier.
fn thread_id() -> u64 {
    let mut hasher = DefaultHasher::new();
    thread::current().id().hash(&mut hasher);
    hasher.finish()
}

fn write_temp(temp_path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp_path)?;
    file.write_all(contents)?;
    file.sync_all()
}

fn write_atomic(path: &Path, entries: &Entries) -> StorageResult<()> {
    let serialized = serde_json::to_string_pretty(entries)
        .map_err(|e| backend_error(format!("Failed to serialize store: {}", e)))?;

    let temp_path = path.with_extension(format!("json.{}.{}.tmp", process::id(), thread_id()));

    let result = write_temp(&temp_path, serialized.as_bytes())
        .map_err(|e| format!("Failed to write temp file {}: {}", temp_path.display(), e))
        .and_then(|_| {
            fs::rename(&temp_path, path).map_err(|e| {
                format!(
                    "Failed to rename {} to {}: {}",
                    temp_path.display(),
                    path.display(),
                    e
                )
            })
        });

    if let Err(message) = result {
        if let Err(e) = fs::remove_file(&temp_path) {
            if e.kind() != ErrorKind::NotFound {
                warn!("Failed to remove temp file {}: {}", temp_path.display(), e);
            }
        }
        return Err(backend_error(message));
    }

    debug!("Atomically wrote {}", path.display());
    Ok(())
}

impl StorageHandle for JsonFileStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.snapshot()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        if !self.path.exists() {
            return Ok(());
        }
        self.update(|entries| entries.remove(key).is_some())
    }

    fn has_item(&self, key: &str) -> StorageResult<bool> {
        Ok(self.snapshot()?.contains_key(key))
    }
}
