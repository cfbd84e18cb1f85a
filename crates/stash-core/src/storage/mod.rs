//! Storage handles the adapter can wrap.
//!
//! - [`MemoryStorage`]: in-process map with an optional capacity limit
//! - [`JsonFileStorage`]: one JSON object file on disk, locked and written
//!   atomically (not built for wasm)
//! - `WebStorage`: browser `localStorage`/`sessionStorage` (feature `web`)

#[cfg(not(target_arch = "wasm32"))]
mod file;
mod memory;
mod traits;
#[cfg(feature = "web")]
mod web;

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStorage;
pub use memory::MemoryStorage;
pub use traits::{StorageHandle, StorageResult};
#[cfg(feature = "web")]
pub use web::WebStorage;
