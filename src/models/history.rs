//! Change-history record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kind of change a history record captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpType {
    /// A record was created.
    Insert,
    /// A record's content or metadata changed.
    Update,
    /// A record was removed.
    Delete,
}

impl OpType {
    /// Returns the operation type as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Parses an operation type string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "insert" => Some(Self::Insert),
            "update" => Some(Self::Update),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

/// An append-only snapshot of a past [`super::ConfigRecord`] state.
///
/// History rows for a given key are totally ordered by `nid`, which increases
/// monotonically and independently of the record's primary id. History pages
/// are served newest first; purging removes only rows strictly older than a
/// cutoff, oldest first, and never more than the caller's row limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// History id, monotonic per table.
    pub nid: i64,
    /// Data identifier of the changed record.
    pub data_id: String,
    /// Group identifier of the changed record.
    pub group: String,
    /// Namespace of the changed record; `None` is the default namespace.
    pub namespace: Option<String>,
    /// Owning application name at change time.
    pub app_name: Option<String>,
    /// IP the change originated from.
    pub src_ip: Option<String>,
    /// User the change originated from.
    pub src_user: Option<String>,
    /// The kind of change.
    pub op_type: OpType,
    /// Creation timestamp of the history row.
    pub created_at: DateTime<Utc>,
    /// Modification timestamp of the configuration at change time.
    pub modified_at: DateTime<Utc>,
}

impl HistoryRecord {
    /// Table holding history records.
    pub const TABLE: &'static str = "config_history";

    /// Projection for history page fetches.
    pub const PAGE_COLUMNS: &'static str = "nid, data_id, group_id, namespace_id, app_name, \
         src_ip, src_user, op_type, created_at, modified_at";
}
