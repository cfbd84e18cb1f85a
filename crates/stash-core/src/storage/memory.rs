//! In-process storage handle.

use super::traits::{StorageHandle, StorageResult};
use crate::error::StorageError;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// `HashMap`-backed storage handle.
///
/// Behaves like a browser storage area, including an optional capacity limit
/// counted over the UTF-8 length of all keys and values. A write that would
/// exceed it fails with [`StorageError::QuotaExceeded`] and leaves the
/// previous value in place.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
    capacity_limit: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a handle that rejects writes past `limit_bytes`.
    pub fn with_capacity_limit(limit_bytes: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            capacity_limit: Some(limit_bytes),
        }
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, HashMap<String, String>>> {
        self.entries.lock().map_err(|e| StorageError::Unavailable {
            message: format!("Failed to lock memory storage: {}", e),
        })
    }

    /// Number of stored keys.
    pub fn len(&self) -> StorageResult<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Stored keys, sorted.
    pub fn keys(&self) -> StorageResult<Vec<String>> {
        let mut keys: Vec<String> = self.lock()?.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    /// Bytes currently used by keys and values.
    pub fn used_bytes(&self) -> StorageResult<usize> {
        Ok(used_bytes(&*self.lock()?))
    }

    pub fn clear(&self) -> StorageResult<()> {
        self.lock()?.clear();
        Ok(())
    }
}

fn used_bytes(entries: &HashMap<String, String>) -> usize {
    entries.iter().map(|(k, v)| k.len() + v.len()).sum()
}

impl StorageHandle for MemoryStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.lock()?;

        if let Some(limit) = self.capacity_limit {
            let replaced = entries.get(key).map(|v| key.len() + v.len()).unwrap_or(0);
            let projected = used_bytes(&entries) - replaced + key.len() + value.len();
            if projected > limit {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    limit_bytes: limit,
                });
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn has_item(&self, key: &str) -> StorageResult<bool> {
        Ok(self.lock()?.contains_key(key))
    }
}
