//! The canonical item record and its constructor.

use crate::config::AdapterConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Supplementary metadata attached to an item.
pub type Extra = serde_json::Map<String, Value>;

/// A stored cache entry.
///
/// Serialized as `{key, value, extra}`, or `{key, value, namespace, extra}`
/// when the item belongs to a namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub key: String,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default)]
    pub extra: Extra,
}

/// Build an item.
///
/// With a namespace, the namespace is set on the item and also injected into
/// `extra` under the reserved `namespace` field.
pub fn create_item(
    key: impl Into<String>,
    value: Value,
    namespace: Option<&str>,
    mut extra: Extra,
) -> Item {
    if let Some(ns) = namespace {
        extra.insert(
            AdapterConfig::NAMESPACE_FIELD.to_string(),
            Value::String(ns.to_string()),
        );
    }

    Item {
        key: key.into(),
        value,
        namespace: namespace.map(str::to_string),
        extra,
    }
}
