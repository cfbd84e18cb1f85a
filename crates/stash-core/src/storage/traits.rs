//! Storage handle trait.

use crate::error::StorageError;
use std::rc::Rc;
use std::sync::Arc;

/// Result type for storage handle primitives.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Synchronous string key-value surface wrapped by the adapter.
///
/// Shaped after the Web Storage API. The handle is owned by the caller; the
/// adapter only borrows its primitives.
pub trait StorageHandle {
    /// Get the raw string stored under `key`.
    ///
    /// Returns `None` if nothing is stored there.
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> StorageResult<()>;

    /// Check whether `key` exists.
    fn has_item(&self, key: &str) -> StorageResult<bool>;

    /// Whether the platform storage capability is present at all.
    fn is_supported(&self) -> bool {
        true
    }
}

impl<T: StorageHandle + ?Sized> StorageHandle for &T {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        (**self).remove_item(key)
    }

    fn has_item(&self, key: &str) -> StorageResult<bool> {
        (**self).has_item(key)
    }

    fn is_supported(&self) -> bool {
        (**self).is_supported()
    }
}

impl<T: StorageHandle + ?Sized> StorageHandle for Rc<T> {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        (**self).remove_item(key)
    }

    fn has_item(&self, key: &str) -> StorageResult<bool> {
        (**self).has_item(key)
    }

    fn is_supported(&self) -> bool {
        (**self).is_supported()
    }
}

impl<T: StorageHandle + ?Sized> StorageHandle for Arc<T> {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        (**self).remove_item(key)
    }

    fn has_item(&self, key: &str) -> StorageResult<bool> {
        (**self).has_item(key)
    }

    fn is_supported(&self) -> bool {
        (**self).is_supported()
    }
}
