//! The client-storage cache adapter.
//!
//! [`ClientStorageAdapter`] binds a [`StorageHandle`](crate::StorageHandle) and
//! an optional namespace, and exposes the [`StashAdapter`] operations over it.

mod builder;
mod client;
mod traits;

pub use builder::ClientStorageAdapterBuilder;
pub use client::ClientStorageAdapter;
pub use traits::StashAdapter;
