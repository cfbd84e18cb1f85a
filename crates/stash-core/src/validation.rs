//! Key, namespace and extra validation.

use crate::config::{AdapterConfig, Messages};
use crate::error::{Result, StashError};
use crate::item::Extra;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static KEY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(AdapterConfig::KEY_PATTERN).unwrap());

static NAMESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(AdapterConfig::NAMESPACE_PATTERN).unwrap());

/// Check an item key against the allowed charset.
pub fn validate_key(key: &str) -> Result<()> {
    if KEY_RE.is_match(key) {
        Ok(())
    } else {
        Err(StashError::validation("key", Messages::INVALID_KEY))
    }
}

/// Check a namespace. Raised as a configuration error since namespaces are
/// only ever supplied at construction.
pub fn validate_namespace(namespace: &str) -> Result<()> {
    if NAMESPACE_RE.is_match(namespace) {
        Ok(())
    } else {
        Err(StashError::configuration(Messages::INVALID_NAMESPACE))
    }
}

/// Require `extra` to be a JSON object and borrow it as a map.
pub fn validate_extra(extra: &Value) -> Result<&Extra> {
    extra
        .as_object()
        .ok_or_else(|| StashError::validation("extra", Messages::EXTRA_NOT_OBJECT))
}

/// Reject caller-supplied extra carrying the reserved namespace field.
pub fn ensure_no_reserved_fields(extra: &Extra) -> Result<()> {
    if extra.contains_key(AdapterConfig::NAMESPACE_FIELD) {
        return Err(StashError::validation("extra", Messages::EXTRA_HAS_NAMESPACE));
    }
    Ok(())
}
