//! Centralized configuration for the adapter.
//!
//! Naming rules, reserved field names and the fixed error messages the wider
//! caching ecosystem tests against.

/// Adapter-level constants.
pub struct AdapterConfig;

impl AdapterConfig {
    /// Allowed item key pattern.
    pub const KEY_PATTERN: &'static str = r"^[A-Za-z0-9._-]+$";
    /// Allowed namespace pattern. Dots are excluded: they separate the
    /// namespace from the key in built keys.
    pub const NAMESPACE_PATTERN: &'static str = r"^[A-Za-z0-9_-]+$";
    /// Separator between namespace and key in [`build_key`](crate::StashAdapter::build_key).
    pub const KEY_SEPARATOR: char = '.';
    /// Extra field reserved for the namespace injected by the item constructor.
    pub const NAMESPACE_FIELD: &'static str = "namespace";
}

/// Fixed error messages.
pub struct Messages;

impl Messages {
    pub const STORAGE_NOT_OBJECT: &'static str = "`storage` must be an object.";
    pub const STORAGE_NOT_SUPPORTED: &'static str =
        "Storage (localStorage or sessionStorage) is not supported.";
    pub const INVALID_NAMESPACE: &'static str =
        "`namespace` can contain only letters, numbers, `_` or `-`.";
    pub const INVALID_KEY: &'static str =
        "`key` can contain only letters, numbers, `_`, `.` or `-`.";
    pub const EXTRA_NOT_OBJECT: &'static str = "`extra` must be an object.";
    pub const EXTRA_HAS_NAMESPACE: &'static str = "`extra` can't contain `namespace` property.";
}

/// Which browser storage area a handle wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKind {
    Local,
    Session,
}

impl StorageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKind::Local => "local",
            StorageKind::Session => "session",
        }
    }

    /// Name of the `window` property holding this storage area.
    pub fn window_property(&self) -> &'static str {
        match self {
            StorageKind::Local => "localStorage",
            StorageKind::Session => "sessionStorage",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "local" | "localstorage" => Some(StorageKind::Local),
            "session" | "sessionstorage" => Some(StorageKind::Session),
            _ => None,
        }
    }
}

impl Default for StorageKind {
    fn default() -> Self {
        StorageKind::Local
    }
}

impl std::fmt::Display for StorageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
