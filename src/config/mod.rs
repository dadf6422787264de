//! Runtime tuning settings.
//!
//! The query layer itself holds no state; the only values it shares with the
//! rest of the system are the read-only tuning knobs collected here (page
//! sizes, batch limits, content quotas). The snapshot is built once at
//! startup — from defaults, an optional TOML file, and `CONFSQL_*`
//! environment overrides — and passed by reference afterwards. Nothing in
//! this crate ever mutates it.

use serde::Deserialize;
use std::path::Path;

/// Default page size for listing operations.
pub const DEFAULT_PAGE_SIZE: u64 = 100;

/// Default batch size for full and incremental dumps.
pub const DEFAULT_DUMP_BATCH_SIZE: u64 = 1000;

/// Default maximum rows removed per history purge invocation.
pub const DEFAULT_HISTORY_PURGE_BATCH: u32 = 1000;

/// Default maximum configuration content size in bytes.
pub const DEFAULT_MAX_CONTENT_BYTES: u64 = 10 * 1024 * 1024;

/// Immutable tuning snapshot consumed by callers of the query layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    /// Page size used when a caller does not specify one.
    pub default_page_size: u64,
    /// Batch size for full/incremental dump operations.
    pub dump_batch_size: u64,
    /// Maximum rows removed per history purge invocation.
    pub history_purge_batch: u32,
    /// Maximum configuration content size in bytes.
    pub max_content_bytes: u64,
    /// Maximum number of records per namespace.
    pub namespace_quota: u32,
    /// Maximum number of records per group.
    pub group_quota: u32,
}

/// Settings file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
struct SettingsFile {
    default_page_size: Option<u64>,
    dump_batch_size: Option<u64>,
    history_purge_batch: Option<u32>,
    max_content_bytes: Option<u64>,
    namespace_quota: Option<u32>,
    group_quota: Option<u32>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            dump_batch_size: DEFAULT_DUMP_BATCH_SIZE,
            history_purge_batch: DEFAULT_HISTORY_PURGE_BATCH,
            max_content_bytes: DEFAULT_MAX_CONTENT_BYTES,
            namespace_quota: 200,
            group_quota: 200,
        }
    }
}

impl StoreSettings {
    /// Creates a settings snapshot with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads settings from a TOML file, then applies `CONFSQL_*` environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Settings`] if the file cannot be read or
    /// parsed.
    pub fn load_from_file(path: &Path) -> crate::Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| crate::Error::Settings {
            cause: format!("read {}: {e}", path.display()),
        })?;

        let file: SettingsFile = toml::from_str(&contents).map_err(|e| crate::Error::Settings {
            cause: format!("parse {}: {e}", path.display()),
        })?;

        let settings = Self::default().merged(file).with_env_overrides();
        settings.log_effective();
        Ok(settings)
    }

    /// Loads default settings with `CONFSQL_*` environment overrides applied.
    #[must_use]
    pub fn load_default() -> Self {
        let settings = Self::default().with_env_overrides();
        settings.log_effective();
        settings
    }

    fn merged(mut self, file: SettingsFile) -> Self {
        if let Some(v) = file.default_page_size {
            self.default_page_size = v;
        }
        if let Some(v) = file.dump_batch_size {
            self.dump_batch_size = v;
        }
        if let Some(v) = file.history_purge_batch {
            self.history_purge_batch = v;
        }
        if let Some(v) = file.max_content_bytes {
            self.max_content_bytes = v;
        }
        if let Some(v) = file.namespace_quota {
            self.namespace_quota = v;
        }
        if let Some(v) = file.group_quota {
            self.group_quota = v;
        }
        self
    }

    fn with_env_overrides(mut self) -> Self {
        if let Some(v) = env_u64("CONFSQL_DEFAULT_PAGE_SIZE") {
            self.default_page_size = v;
        }
        if let Some(v) = env_u64("CONFSQL_DUMP_BATCH_SIZE") {
            self.dump_batch_size = v;
        }
        if let Some(v) = env_u32("CONFSQL_HISTORY_PURGE_BATCH") {
            self.history_purge_batch = v;
        }
        if let Some(v) = env_u64("CONFSQL_MAX_CONTENT_BYTES") {
            self.max_content_bytes = v;
        }
        if let Some(v) = env_u32("CONFSQL_NAMESPACE_QUOTA") {
            self.namespace_quota = v;
        }
        if let Some(v) = env_u32("CONFSQL_GROUP_QUOTA") {
            self.group_quota = v;
        }
        self
    }

    fn log_effective(&self) {
        tracing::info!(default_page_size = self.default_page_size, "effective setting");
        tracing::info!(dump_batch_size = self.dump_batch_size, "effective setting");
        tracing::info!(
            history_purge_batch = self.history_purge_batch,
            "effective setting"
        );
        tracing::info!(max_content_bytes = self.max_content_bytes, "effective setting");
        tracing::info!(namespace_quota = self.namespace_quota, "effective setting");
        tracing::info!(group_quota = self.group_quota, "effective setting");
    }
}

fn env_u64(key: &str) -> Option<u64> {
    let raw = std::env::var(key).ok()?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring non-numeric setting override");
            None
        }
    }
}

fn env_u32(key: &str) -> Option<u32> {
    let raw = std::env::var(key).ok()?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring non-numeric setting override");
            None
        }
    }
}
