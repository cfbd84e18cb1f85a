//! CLI defaults.

/// Defaults and environment variable names for the CLI.
pub struct CliConfig;

impl CliConfig {
    /// Store file used when neither `--store` nor `STASH_STORE` is given.
    pub const DEFAULT_STORE: &'static str = "stash.json";
    pub const STORE_ENV: &'static str = "STASH_STORE";
    pub const NAMESPACE_ENV: &'static str = "STASH_NAMESPACE";
}
