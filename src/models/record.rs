//! Configuration record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored configuration record.
///
/// Identified by the `(data_id, group, namespace)` tuple, which is unique.
/// The default namespace is stored as SQL NULL in the `namespace_id` column;
/// [`crate::NamespaceFilter`] documents how the query layer maps caller-side
/// representations onto that column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRecord {
    /// Monotonically increasing primary id.
    pub id: i64,
    /// Data identifier (first key component).
    pub data_id: String,
    /// Group identifier (second key component).
    pub group: String,
    /// Namespace (third key component); `None` is the default namespace.
    pub namespace: Option<String>,
    /// Owning application name.
    pub app_name: Option<String>,
    /// Configuration content.
    pub content: String,
    /// Content hash, used for replica drift detection.
    pub content_hash: String,
    /// Declared content type (e.g. `properties`, `yaml`).
    pub content_type: Option<String>,
    /// Key id when the content is stored encrypted.
    pub encrypted_data_key: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub modified_at: DateTime<Utc>,
}

impl ConfigRecord {
    /// Table holding configuration records.
    pub const TABLE: &'static str = "config_record";

    /// Projection for exact and pattern page fetches.
    pub const PAGE_COLUMNS: &'static str =
        "id, data_id, group_id, namespace_id, app_name, content, content_type, encrypted_data_key";

    /// Projection for full-record dumps.
    pub const DUMP_COLUMNS: &'static str = "id, data_id, group_id, namespace_id, app_name, \
         content, content_hash, content_type, encrypted_data_key, modified_at";

    /// Projection for key-triple listings.
    pub const KEY_COLUMNS: &'static str = "data_id, group_id, app_name";

    /// Projection for replica fingerprint listings.
    pub const FINGERPRINT_COLUMNS: &'static str = "id, data_id, group_id, namespace_id, \
         app_name, content_hash, content_type, modified_at, encrypted_data_key";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projections_share_identity_columns() {
        for cols in [
            ConfigRecord::PAGE_COLUMNS,
            ConfigRecord::DUMP_COLUMNS,
            ConfigRecord::FINGERPRINT_COLUMNS,
        ] {
            assert!(cols.starts_with("id, data_id, group_id, namespace_id"));
        }
        assert!(ConfigRecord::KEY_COLUMNS.starts_with("data_id, group_id"));
    }
}
