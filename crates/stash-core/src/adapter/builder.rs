//! Builder for configuring a [`ClientStorageAdapter`].

use super::client::ClientStorageAdapter;
use crate::config::Messages;
use crate::error::{Result, StashError};
use crate::storage::StorageHandle;
use crate::validation::validate_namespace;
use tracing::debug;

/// Builder for configuring a [`ClientStorageAdapter`].
///
/// # Example
///
/// ```
/// use stash_client_storage::{ClientStorageAdapter, MemoryStorage, StashAdapter};
///
/// let adapter = ClientStorageAdapter::builder()
///     .storage(MemoryStorage::new())
///     .namespace("drafts")
///     .build()
///     .unwrap();
///
/// assert_eq!(adapter.build_key("post-1"), "drafts.post-1");
/// ```
pub struct ClientStorageAdapterBuilder<S> {
    storage: Option<S>,
    namespace: Option<String>,
}

impl<S> Default for ClientStorageAdapterBuilder<S> {
    fn default() -> Self {
        Self {
            storage: None,
            namespace: None,
        }
    }
}

impl<S: StorageHandle> ClientStorageAdapterBuilder<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage handle to wrap. Required.
    pub fn storage(mut self, storage: S) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Namespace for built keys and stored items.
    ///
    /// Must match `^[A-Za-z0-9_-]+$`. Default: none.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Validate the configuration and build the adapter.
    ///
    /// Performs no storage I/O.
    pub fn build(self) -> Result<ClientStorageAdapter<S>> {
        let storage = self
            .storage
            .ok_or_else(|| StashError::configuration(Messages::STORAGE_NOT_OBJECT))?;

        if !storage.is_supported() {
            return Err(StashError::configuration(Messages::STORAGE_NOT_SUPPORTED));
        }

        if let Some(namespace) = &self.namespace {
            validate_namespace(namespace)?;
        }

        debug!(namespace = ?self.namespace, "Built client storage adapter");

        Ok(ClientStorageAdapter::from_parts(storage, self.namespace))
    }
}
