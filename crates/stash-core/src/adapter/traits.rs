//! Adapter trait consumed by the caching front-end.

use crate::error::Result;
use crate::item::{Extra, Item};
use serde_json::Value;

/// Persistence adapter for a key/value cache.
///
/// Lookups that find nothing return `Ok(None)`; that is not an error.
pub trait StashAdapter {
    /// Compose the externally visible lookup key.
    fn build_key(&self, key: &str) -> String;

    /// Store `value` with `extra` under `key`, replacing any previous item.
    ///
    /// Returns the item exactly as written.
    fn set_item(&self, key: &str, value: Value, extra: Extra) -> Result<Item>;

    /// Store `value` with empty extra.
    fn set_value(&self, key: &str, value: Value) -> Result<Item> {
        self.set_item(key, value, Extra::new())
    }

    fn get_item(&self, key: &str) -> Result<Option<Item>>;

    /// Shallow-merge `extra` onto the stored item's extra.
    ///
    /// Returns the extra written, or `None` without writing if `key` is absent.
    fn add_extra(&self, key: &str, extra: Value) -> Result<Option<Extra>>;

    /// Replace the stored item's extra.
    ///
    /// Returns the extra written, or `None` without writing if `key` is absent.
    fn set_extra(&self, key: &str, extra: Value) -> Result<Option<Extra>>;

    fn get_extra(&self, key: &str) -> Result<Option<Extra>>;

    fn has_item(&self, key: &str) -> Result<bool>;

    /// Remove `key`, returning whether it is confirmed gone.
    ///
    /// Returns `false` without touching storage if `key` is absent.
    fn remove_item(&self, key: &str) -> Result<bool>;

    /// The namespace bound at construction, if any.
    fn namespace(&self) -> Option<&str>;
}
