//! Stash Client Storage - cache adapter over synchronous key-value storage.
//!
//! Persists cache items as JSON strings in a `localStorage`/`sessionStorage`
//! style handle, validating keys, namespaces and extra metadata on the way in.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use stash_client_storage::{ClientStorageAdapter, MemoryStorage, StashAdapter};
//!
//! # fn main() -> stash_client_storage::Result<()> {
//! let adapter = ClientStorageAdapter::new(MemoryStorage::new())?;
//!
//! adapter.set_value("greeting", json!("hello"))?;
//! adapter.add_extra("greeting", json!({"lang": "en"}))?;
//!
//! let item = adapter.get_item("greeting")?.expect("stored above");
//! assert_eq!(item.value, json!("hello"));
//! assert_eq!(item.extra["lang"], json!("en"));
//!
//! assert!(adapter.remove_item("greeting")?);
//! # Ok(())
//! # }
//! ```
//!
//! In the browser, enable the `web` feature and wrap `WebStorage::local()`.

pub mod adapter;
pub mod config;
pub mod error;
pub mod item;
pub mod storage;
pub mod validation;

// Re-export commonly used types
pub use adapter::{ClientStorageAdapter, ClientStorageAdapterBuilder, StashAdapter};
pub use config::{AdapterConfig, StorageKind};
pub use error::{Result, StashError, StorageError};
pub use item::{create_item, Extra, Item};
pub use storage::{MemoryStorage, StorageHandle, StorageResult};
#[cfg(not(target_arch = "wasm32"))]
pub use storage::JsonFileStorage;
#[cfg(feature = "web")]
pub use storage::WebStorage;
