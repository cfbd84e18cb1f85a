//! Browser `localStorage` / `sessionStorage` handle.

use super::traits::{StorageHandle, StorageResult};
use crate::config::StorageKind;
use crate::error::StorageError;
use wasm_bindgen::JsValue;

/// Web Storage area wrapped as a [`StorageHandle`].
///
/// Cheap to clone; clones share the same browser storage area.
#[derive(Debug, Clone)]
pub struct WebStorage {
    inner: web_sys::Storage,
    kind: StorageKind,
}

fn js_error(err: JsValue) -> StorageError {
    StorageError::Backend {
        message: err.as_string().unwrap_or_else(|| format!("{:?}", err)),
    }
}

impl WebStorage {
    /// The window's `localStorage`.
    pub fn local() -> StorageResult<Self> {
        Self::open(StorageKind::Local)
    }

    /// The window's `sessionStorage`.
    pub fn session() -> StorageResult<Self> {
        Self::open(StorageKind::Session)
    }

    /// Open the storage area named by `kind`.
    pub fn open(kind: StorageKind) -> StorageResult<Self> {
        let window = web_sys::window().ok_or_else(|| StorageError::Unavailable {
            message: "no global `window`".to_string(),
        })?;

        let storage = match kind {
            StorageKind::Local => window.local_storage(),
            StorageKind::Session => window.session_storage(),
        }
        .map_err(js_error)?
        .ok_or_else(|| StorageError::Unavailable {
            message: format!("`window.{}` is not available", kind.window_property()),
        })?;

        Ok(Self::from_storage(storage, kind))
    }

    /// Wrap an already acquired storage object.
    pub fn from_storage(inner: web_sys::Storage, kind: StorageKind) -> Self {
        Self { inner, kind }
    }

    pub fn kind(&self) -> StorageKind {
        self.kind
    }
}

impl StorageHandle for WebStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        self.inner.get_item(key).map_err(js_error)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.inner.set_item(key, value).map_err(js_error)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.inner.remove_item(key).map_err(js_error)
    }

    fn has_item(&self, key: &str) -> StorageResult<bool> {
        Ok(self.inner.has_own_property(&JsValue::from_str(key)))
    }

    /// Checks that the `Storage` interface exists on the global object.
    fn is_supported(&self) -> bool {
        js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("Storage"))
            .map(|storage| !storage.is_undefined())
            .unwrap_or(false)
    }
}
