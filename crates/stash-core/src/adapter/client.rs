//! Adapter over a synchronous client-side storage handle.

use super::builder::ClientStorageAdapterBuilder;
use super::traits::StashAdapter;
use crate::config::AdapterConfig;
use crate::error::{Result, StashError};
use crate::item::{create_item, Extra, Item};
use crate::storage::StorageHandle;
use crate::validation::{ensure_no_reserved_fields, validate_extra, validate_key};
use serde_json::Value;
use tracing::{debug, warn};

/// Cache adapter persisting items as JSON strings in a [`StorageHandle`].
///
/// Items are written under the raw key; the namespace only shapes
/// [`build_key`](StashAdapter::build_key) and the stored item itself.
#[derive(Debug)]
pub struct ClientStorageAdapter<S> {
    storage: S,
    namespace: Option<String>,
}

impl<S: StorageHandle> ClientStorageAdapter<S> {
    /// Start configuring an adapter.
    pub fn builder() -> ClientStorageAdapterBuilder<S> {
        ClientStorageAdapterBuilder::new()
    }

    /// Adapter without a namespace.
    pub fn new(storage: S) -> Result<Self> {
        Self::builder().storage(storage).build()
    }

    /// Adapter bound to `namespace`.
    pub fn with_namespace(storage: S, namespace: impl Into<String>) -> Result<Self> {
        Self::builder().storage(storage).namespace(namespace).build()
    }

    pub(crate) fn from_parts(storage: S, namespace: Option<String>) -> Self {
        Self { storage, namespace }
    }

    /// The wrapped storage handle.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Give the storage handle back to the caller.
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn check_reserved(&self, extra: &Extra) -> Result<()> {
        if self.namespace.is_some() {
            ensure_no_reserved_fields(extra)?;
        }
        Ok(())
    }

    /// Stored extra minus the field the item constructor injects.
    fn caller_extra(&self, mut extra: Extra) -> Extra {
        if self.namespace.is_some() {
            extra.remove(AdapterConfig::NAMESPACE_FIELD);
        }
        extra
    }
}

impl<S: StorageHandle> StashAdapter for ClientStorageAdapter<S> {
    fn build_key(&self, key: &str) -> String {
        match &self.namespace {
            Some(ns) => format!("{}{}{}", ns, AdapterConfig::KEY_SEPARATOR, key),
            None => key.to_string(),
        }
    }

    fn set_item(&self, key: &str, value: Value, extra: Extra) -> Result<Item> {
        validate_key(key)?;
        self.check_reserved(&extra)?;

        let item = create_item(key, value, self.namespace.as_deref(), extra);
        let encoded = serde_json::to_string(&item)?;

        self.storage.set_item(key, &encoded)?;
        debug!("Stored item {} ({} bytes)", key, encoded.len());

        Ok(item)
    }

    fn get_item(&self, key: &str) -> Result<Option<Item>> {
        let Some(encoded) = self.storage.get_item(key)? else {
            return Ok(None);
        };

        let item = serde_json::from_str(&encoded).map_err(|e| StashError::Json {
            message: format!("Failed to decode item {}: {}", key, e),
            source: Some(e),
        })?;

        Ok(Some(item))
    }

    fn add_extra(&self, key: &str, extra: Value) -> Result<Option<Extra>> {
        let extra = validate_extra(&extra)?;
        self.check_reserved(extra)?;

        let Some(item) = self.get_item(key)? else {
            return Ok(None);
        };

        let mut combined = self.caller_extra(item.extra);
        combined.extend(extra.clone());

        let written = self.set_item(key, item.value, combined)?;
        Ok(Some(written.extra))
    }

    fn set_extra(&self, key: &str, extra: Value) -> Result<Option<Extra>> {
        let extra = validate_extra(&extra)?;
        self.check_reserved(extra)?;

        let Some(item) = self.get_item(key)? else {
            return Ok(None);
        };

        let written = self.set_item(key, item.value, extra.clone())?;
        Ok(Some(written.extra))
    }

    fn get_extra(&self, key: &str) -> Result<Option<Extra>> {
        Ok(self.get_item(key)?.map(|item| item.extra))
    }

    fn has_item(&self, key: &str) -> Result<bool> {
        Ok(self.storage.has_item(key)?)
    }

    fn remove_item(&self, key: &str) -> Result<bool> {
        if !self.has_item(key)? {
            return Ok(false);
        }

        self.storage.remove_item(key)?;

        let removed = !self.has_item(key)?;
        if removed {
            debug!("Removed item {}", key);
        } else {
            warn!("Storage still reports {} after removal", key);
        }
        Ok(removed)
    }

    fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Messages;
    use crate::error::StorageError;
    use crate::storage::{MemoryStorage, StorageResult};
    use serde_json::json;
    use std::cell::Cell;

    const FOO_KEY: &str = "foo";
    const FOO_WITH_EXTRA_KEY: &str = "fooWithExtra";
    const NONEXISTENT_KEY: &str = "nonexistentKey";

    /// Memory storage that counts primitive calls.
    #[derive(Debug, Default)]
    struct SpyStorage {
        inner: MemoryStorage,
        unsupported: bool,
        ignore_removals: bool,
        gets: Cell<usize>,
        sets: Cell<usize>,
        removes: Cell<usize>,
        has_checks: Cell<usize>,
    }

    fn bump(counter: &Cell<usize>) {
        counter.set(counter.get() + 1);
    }

    impl StorageHandle for SpyStorage {
        fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
            bump(&self.gets);
            self.inner.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
            bump(&self.sets);
            self.inner.set_item(key, value)
        }

        fn remove_item(&self, key: &str) -> StorageResult<()> {
            bump(&self.removes);
            if self.ignore_removals {
                return Ok(());
            }
            self.inner.remove_item(key)
        }

        fn has_item(&self, key: &str) -> StorageResult<bool> {
            bump(&self.has_checks);
            self.inner.has_item(key)
        }

        fn is_supported(&self) -> bool {
            !self.unsupported
        }
    }

    fn foo_extra() -> Extra {
        json!({"foo": "foo", "bar": "bar"})
            .as_object()
            .cloned()
            .unwrap()
    }

    /// Adapter over a spy pre-seeded with `foo` and `fooWithExtra`.
    fn seeded_adapter() -> ClientStorageAdapter<SpyStorage> {
        let adapter = ClientStorageAdapter::new(SpyStorage::default()).unwrap();
        adapter.set_value(FOO_KEY, json!("value")).unwrap();
        adapter
            .set_item(FOO_WITH_EXTRA_KEY, json!("value"), foo_extra())
            .unwrap();
        adapter.storage().sets.set(0);
        adapter.storage().gets.set(0);
        adapter
    }

    #[test]
    fn test_missing_storage() {
        let err = ClientStorageAdapter::<MemoryStorage>::builder()
            .build()
            .unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(err.to_string(), Messages::STORAGE_NOT_OBJECT);
    }

    #[test]
    fn test_unsupported_storage() {
        let storage = SpyStorage {
            unsupported: true,
            ..Default::default()
        };
        let err = ClientStorageAdapter::new(storage).unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(
            err.to_string(),
            "Storage (localStorage or sessionStorage) is not supported."
        );
    }

    #[test]
    fn test_invalid_namespace() {
        for ns in ["", "with space", "dotted.ns", "slash/ns"] {
            let err = ClientStorageAdapter::with_namespace(MemoryStorage::new(), ns).unwrap_err();
            assert_eq!(
                err.to_string(),
                "`namespace` can contain only letters, numbers, `_` or `-`."
            );
        }
    }

    #[test]
    fn test_construction_does_no_io() {
        let adapter = ClientStorageAdapter::new(SpyStorage::default()).unwrap();
        let spy = adapter.storage();
        assert_eq!(spy.gets.get() + spy.sets.get() + spy.has_checks.get(), 0);
    }

    #[test]
    fn test_build_key() {
        let adapter = ClientStorageAdapter::new(MemoryStorage::new()).unwrap();
        assert_eq!(adapter.build_key("key"), "key");
        assert_eq!(adapter.namespace(), None);

        let adapter = ClientStorageAdapter::with_namespace(MemoryStorage::new(), "ns").unwrap();
        assert_eq!(adapter.build_key("x"), "ns.x");
        assert_eq!(adapter.namespace(), Some("ns"));
    }

    #[test]
    fn test_set_item_writes_encoded_item_under_raw_key() {
        let adapter = ClientStorageAdapter::new(SpyStorage::default()).unwrap();

        let item = adapter.set_value(FOO_KEY, json!("value")).unwrap();
        assert_eq!(item, create_item(FOO_KEY, json!("value"), None, Extra::new()));

        let spy = adapter.storage();
        assert_eq!(spy.sets.get(), 1);
        assert_eq!(
            spy.inner.get_item(FOO_KEY).unwrap().unwrap(),
            serde_json::to_string(&item).unwrap()
        );
    }

    #[test]
    fn test_set_item_with_extra() {
        let adapter = ClientStorageAdapter::new(MemoryStorage::new()).unwrap();

        let item = adapter
            .set_item(FOO_WITH_EXTRA_KEY, json!([1, 2, 3]), foo_extra())
            .unwrap();
        assert_eq!(item.extra, foo_extra());
        assert_eq!(adapter.get_item(FOO_WITH_EXTRA_KEY).unwrap(), Some(item));
    }

    #[test]
    fn test_namespaced_set_item_keeps_raw_key() {
        let adapter =
            ClientStorageAdapter::with_namespace(MemoryStorage::new(), "ns").unwrap();

        let item = adapter.set_value("x", json!(1)).unwrap();
        assert_eq!(item.namespace.as_deref(), Some("ns"));
        assert_eq!(item.extra.get("namespace"), Some(&json!("ns")));

        let storage = adapter.storage();
        assert!(storage.has_item("x").unwrap());
        assert!(!storage.has_item("ns.x").unwrap());
    }

    #[test]
    fn test_set_item_rejects_invalid_key_before_io() {
        let adapter = ClientStorageAdapter::new(SpyStorage::default()).unwrap();

        for key in ["", "foo bar", "foo/bar", "foo:bar"] {
            let err = adapter.set_value(key, json!(1)).unwrap_err();
            assert!(err.is_validation());
            assert_eq!(err.to_string(), Messages::INVALID_KEY);
        }
        assert_eq!(adapter.storage().sets.get(), 0);
    }

    #[test]
    fn test_namespaced_set_item_rejects_namespace_in_extra() {
        let adapter =
            ClientStorageAdapter::with_namespace(SpyStorage::default(), "ns").unwrap();
        let extra = json!({"namespace": "other"}).as_object().cloned().unwrap();

        let err = adapter.set_item("x", json!(1), extra).unwrap_err();
        assert_eq!(err.to_string(), Messages::EXTRA_HAS_NAMESPACE);
        assert_eq!(adapter.storage().sets.get(), 0);
    }

    #[test]
    fn test_plain_set_item_allows_namespace_in_extra() {
        let adapter = ClientStorageAdapter::new(MemoryStorage::new()).unwrap();
        let extra = json!({"namespace": "mine"}).as_object().cloned().unwrap();

        let item = adapter.set_item("x", json!(1), extra.clone()).unwrap();
        assert_eq!(item.extra, extra);
    }

    #[test]
    fn test_get_item() {
        let adapter = seeded_adapter();

        let item = adapter.get_item(FOO_KEY).unwrap().unwrap();
        assert_eq!(item, create_item(FOO_KEY, json!("value"), None, Extra::new()));
        assert_eq!(adapter.storage().gets.get(), 1);
    }

    #[test]
    fn test_get_item_nonexistent() {
        let adapter = seeded_adapter();

        assert_eq!(adapter.get_item(NONEXISTENT_KEY).unwrap(), None);
        assert_eq!(adapter.storage().gets.get(), 1);
    }

    #[test]
    fn test_get_item_does_not_validate_key() {
        let storage = MemoryStorage::new();
        storage
            .set_item("odd key!", r#"{"key":"odd key!","value":1,"extra":{}}"#)
            .unwrap();
        let adapter = ClientStorageAdapter::new(storage).unwrap();

        let item = adapter.get_item("odd key!").unwrap().unwrap();
        assert_eq!(item.value, json!(1));
    }

    #[test]
    fn test_get_item_undecodable() {
        let storage = MemoryStorage::new();
        storage.set_item("broken", "not json").unwrap();
        let adapter = ClientStorageAdapter::new(storage).unwrap();

        let err = adapter.get_item("broken").unwrap_err();
        assert!(matches!(err, StashError::Json { .. }));
    }

    #[test]
    fn test_add_extra_merges() {
        let adapter = seeded_adapter();

        let extra = adapter
            .add_extra(FOO_WITH_EXTRA_KEY, json!({"something": "else"}))
            .unwrap()
            .unwrap();
        assert_eq!(
            Value::Object(extra),
            json!({"foo": "foo", "bar": "bar", "something": "else"})
        );
    }

    #[test]
    fn test_add_extra_overwrites_shared_keys() {
        let adapter = seeded_adapter();

        let extra = adapter
            .add_extra(FOO_WITH_EXTRA_KEY, json!({"foo": "new"}))
            .unwrap()
            .unwrap();
        assert_eq!(Value::Object(extra.clone()), json!({"foo": "new", "bar": "bar"}));
        assert_eq!(adapter.get_extra(FOO_WITH_EXTRA_KEY).unwrap(), Some(extra));
    }

    #[test]
    fn test_add_extra_nonexistent() {
        let adapter = seeded_adapter();

        assert_eq!(adapter.add_extra(NONEXISTENT_KEY, json!({"a": 1})).unwrap(), None);
        assert_eq!(adapter.storage().sets.get(), 0);
    }

    #[test]
    fn test_add_extra_rejects_non_objects() {
        let adapter = seeded_adapter();

        for extra in [json!(null), json!([1]), json!("str"), json!(7)] {
            let err = adapter.add_extra(FOO_KEY, extra.clone()).unwrap_err();
            assert_eq!(err.to_string(), Messages::EXTRA_NOT_OBJECT);

            let err = adapter.set_extra(FOO_KEY, extra).unwrap_err();
            assert_eq!(err.to_string(), Messages::EXTRA_NOT_OBJECT);
        }
        assert_eq!(adapter.storage().gets.get(), 0);
        assert_eq!(adapter.storage().sets.get(), 0);
    }

    #[test]
    fn test_set_extra_replaces() {
        let adapter = seeded_adapter();

        assert_eq!(
            adapter.get_extra(FOO_WITH_EXTRA_KEY).unwrap(),
            Some(foo_extra())
        );

        let extra = adapter
            .set_extra(FOO_WITH_EXTRA_KEY, json!({"something": "else"}))
            .unwrap()
            .unwrap();
        assert_eq!(Value::Object(extra), json!({"something": "else"}));

        let item = adapter.get_item(FOO_WITH_EXTRA_KEY).unwrap().unwrap();
        assert_eq!(item.value, json!("value"));
    }

    #[test]
    fn test_set_extra_nonexistent() {
        let adapter = seeded_adapter();

        assert_eq!(adapter.set_extra(NONEXISTENT_KEY, json!({"a": 1})).unwrap(), None);
        assert_eq!(adapter.storage().sets.get(), 0);
    }

    #[test]
    fn test_namespaced_extra_updates_reinject_namespace() {
        let adapter =
            ClientStorageAdapter::with_namespace(MemoryStorage::new(), "ns").unwrap();
        adapter
            .set_item("x", json!(1), json!({"foo": "foo"}).as_object().cloned().unwrap())
            .unwrap();

        let extra = adapter.add_extra("x", json!({"bar": "bar"})).unwrap().unwrap();
        assert_eq!(
            Value::Object(extra),
            json!({"foo": "foo", "bar": "bar", "namespace": "ns"})
        );

        let extra = adapter
            .set_extra("x", json!({"something": "else"}))
            .unwrap()
            .unwrap();
        assert_eq!(
            Value::Object(extra),
            json!({"something": "else", "namespace": "ns"})
        );

        let err = adapter
            .add_extra("x", json!({"namespace": "hijack"}))
            .unwrap_err();
        assert_eq!(err.to_string(), Messages::EXTRA_HAS_NAMESPACE);
    }

    #[test]
    fn test_get_extra_nonexistent() {
        let adapter = seeded_adapter();
        assert_eq!(adapter.get_extra(NONEXISTENT_KEY).unwrap(), None);
        assert_eq!(adapter.storage().gets.get(), 1);
    }

    #[test]
    fn test_has_item() {
        let adapter = seeded_adapter();

        assert!(adapter.has_item(FOO_KEY).unwrap());
        assert!(!adapter.has_item(NONEXISTENT_KEY).unwrap());
        assert_eq!(adapter.storage().has_checks.get(), 2);
        assert_eq!(adapter.storage().gets.get(), 0);
    }

    #[test]
    fn test_remove_item() {
        let adapter = seeded_adapter();

        assert!(adapter.remove_item(FOO_KEY).unwrap());
        assert!(!adapter.has_item(FOO_KEY).unwrap());

        let spy = adapter.storage();
        assert_eq!(spy.removes.get(), 1);
        assert_eq!(spy.has_checks.get(), 3);
    }

    #[test]
    fn test_remove_item_nonexistent() {
        let adapter = seeded_adapter();

        assert!(!adapter.remove_item(NONEXISTENT_KEY).unwrap());

        let spy = adapter.storage();
        assert_eq!(spy.removes.get(), 0);
        assert_eq!(spy.has_checks.get(), 1);
    }

    #[test]
    fn test_remove_item_ignored_by_storage() {
        let storage = SpyStorage {
            ignore_removals: true,
            ..Default::default()
        };
        let adapter = ClientStorageAdapter::new(storage).unwrap();
        adapter.set_value(FOO_KEY, json!(1)).unwrap();

        assert!(!adapter.remove_item(FOO_KEY).unwrap());
        assert_eq!(adapter.storage().removes.get(), 1);
        assert!(adapter.has_item(FOO_KEY).unwrap());
    }

    #[test]
    fn test_quota_failure_propagates() {
        let adapter = ClientStorageAdapter::new(MemoryStorage::with_capacity_limit(64)).unwrap();

        let err = adapter
            .set_value("big", json!("x".repeat(100)))
            .unwrap_err();
        assert!(matches!(
            err,
            StashError::Storage(StorageError::QuotaExceeded { .. })
        ));
        assert!(!adapter.has_item("big").unwrap());
    }
}
