//! Dialect query builders.
//!
//! One implementation per backend family of the two capability traits below.
//! A builder is a stateless unit struct: it holds nothing, shares nothing,
//! and is safe to invoke concurrently from any number of callers. Each
//! builder answers only for the dialect identifier it claims; selection by
//! identifier is the job of an external registry.
//!
//! The per-operation predicate sets live in the `filters` submodule and are
//! invoked by both sides of every count/fetch pair, in every dialect, so
//! paired queries are structurally identical and cannot drift.

mod filters;
mod oracle;
mod postgres;
mod sqlite;

pub use oracle::OracleQueryBuilder;
pub use postgres::PostgresQueryBuilder;
pub use sqlite::SqliteQueryBuilder;

use crate::query::{PlaceholderStyle, PredicateAssembler, Query, QueryContext, RowWindow, SqlParam};
use serde::{Deserialize, Serialize};

/// A supported relational backend family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// `SQLite`: offset/limit pagination, `?N` placeholders.
    Sqlite,
    /// PostgreSQL: offset/limit pagination, `$N` placeholders.
    Postgres,
    /// Oracle: numbered-row window pagination, `?` placeholders.
    Oracle,
}

impl Dialect {
    /// Returns the stable string key used for dialect selection.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Postgres => "postgres",
            Self::Oracle => "oracle",
        }
    }

    /// Parses a dialect identifier.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sqlite" => Some(Self::Sqlite),
            "postgres" | "postgresql" => Some(Self::Postgres),
            "oracle" => Some(Self::Oracle),
            _ => None,
        }
    }

    /// The placeholder syntax this dialect binds parameters with.
    #[must_use]
    pub const fn placeholder_style(&self) -> PlaceholderStyle {
        match self {
            Self::Sqlite => PlaceholderStyle::Numbered,
            Self::Postgres => PlaceholderStyle::Dollar,
            Self::Oracle => PlaceholderStyle::Question,
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn unsupported(dialect: Dialect, operation: &'static str) -> crate::Result<Query> {
    Err(crate::Error::UnsupportedOperation { dialect, operation })
}

fn build(dialect: Dialect, operation: &'static str, sql: String, params: Vec<SqlParam>) -> Query {
    tracing::trace!(
        dialect = %dialect,
        operation,
        params = params.len(),
        "generated query"
    );
    Query::new(sql, params)
}

fn count_query(
    dialect: Dialect,
    operation: &'static str,
    table: &str,
    asm: PredicateAssembler,
) -> Query {
    let (where_sql, params) = asm.into_parts();
    build(
        dialect,
        operation,
        format!("SELECT COUNT(*) FROM {table}{where_sql}"),
        params,
    )
}

// Offset/limit page emission shared by the sqlite and postgres families; the
// numbered-row form lives with the oracle builder.
fn offset_limit_page(
    dialect: Dialect,
    operation: &'static str,
    columns: &str,
    table: &str,
    order_by: &str,
    asm: PredicateAssembler,
    window: &RowWindow,
) -> Query {
    let (where_sql, params) = asm.into_parts();
    build(
        dialect,
        operation,
        format!(
            "SELECT {columns} FROM {table}{where_sql} ORDER BY {order_by} {}",
            window.limit_offset()
        ),
        params,
    )
}

/// Query generation over the configuration-record table.
///
/// Every operation is a pure function of the [`QueryContext`]: identical
/// context, byte-identical [`Query`]. Operations a dialect variant does not
/// override fail with [`crate::Error::UnsupportedOperation`]; the shipped
/// dialects override the full set.
pub trait ConfigQueryBuilder: Send + Sync {
    /// The dialect identifier this builder claims.
    fn dialect(&self) -> Dialect;

    /// Scalar count paired with [`Self::exact_page_fetch`]: exact-match
    /// filters under the shared predicate assembly.
    fn exact_page_count(&self, ctx: &QueryContext) -> crate::Result<Query> {
        let _ = ctx;
        unsupported(self.dialect(), "exact_page_count")
    }

    /// Page of records under exact-match filters (data id, group,
    /// application name; content as pattern), ordered by id.
    fn exact_page_fetch(&self, ctx: &QueryContext) -> crate::Result<Query> {
        let _ = ctx;
        unsupported(self.dialect(), "exact_page_fetch")
    }

    /// Scalar count paired with [`Self::search_page_fetch`]: pattern filters
    /// under the shared predicate assembly.
    fn search_page_count(&self, ctx: &QueryContext) -> crate::Result<Query> {
        let _ = ctx;
        unsupported(self.dialect(), "search_page_count")
    }

    /// Page of records under pattern filters (data id, group, application
    /// name, content), ordered by id.
    fn search_page_fetch(&self, ctx: &QueryContext) -> crate::Result<Query> {
        let _ = ctx;
        unsupported(self.dialect(), "search_page_fetch")
    }

    /// Page of records for one application (required, exact), ordered by id.
    fn configs_by_app_page(&self, ctx: &QueryContext) -> crate::Result<Query> {
        let _ = ctx;
        unsupported(self.dialect(), "configs_by_app_page")
    }

    /// Windowed listing of distinct non-default namespaces.
    fn namespace_list(&self, ctx: &QueryContext) -> crate::Result<Query> {
        let _ = ctx;
        unsupported(self.dialect(), "namespace_list")
    }

    /// Windowed listing of distinct groups within the default namespace.
    fn group_list(&self, ctx: &QueryContext) -> crate::Result<Query> {
        let _ = ctx;
        unsupported(self.dialect(), "group_list")
    }

    /// Windowed listing of key triples (data id, group, application name),
    /// ordered by id.
    fn all_config_keys(&self, ctx: &QueryContext) -> crate::Result<Query> {
        let _ = ctx;
        unsupported(self.dialect(), "all_config_keys")
    }

    /// Windowed full-projection dump, ordered by id.
    fn all_configs_page(&self, ctx: &QueryContext) -> crate::Result<Query> {
        let _ = ctx;
        unsupported(self.dialect(), "all_configs_page")
    }

    /// Incremental dump resuming after an id cursor (required): rows with
    /// `id` strictly greater than the cursor, ascending.
    fn configs_after_id(&self, ctx: &QueryContext) -> crate::Result<Query> {
        let _ = ctx;
        unsupported(self.dialect(), "configs_after_id")
    }

    /// Changed-record listing: optional key/app/time filters plus the
    /// mandatory id cursor, ascending by id.
    fn changed_configs_page(&self, ctx: &QueryContext) -> crate::Result<Query> {
        let _ = ctx;
        unsupported(self.dialect(), "changed_configs_page")
    }

    /// Windowed identity+fingerprint listing for replica drift detection,
    /// ordered by id.
    fn fingerprint_page(&self, ctx: &QueryContext) -> crate::Result<Query> {
        let _ = ctx;
        unsupported(self.dialect(), "fingerprint_page")
    }
}

/// Query generation over the change-history table.
pub trait HistoryQueryBuilder: Send + Sync {
    /// The dialect identifier this builder claims.
    fn dialect(&self) -> Dialect;

    /// Scalar count paired with [`Self::history_page_fetch`].
    fn history_page_count(&self, ctx: &QueryContext) -> crate::Result<Query> {
        let _ = ctx;
        unsupported(self.dialect(), "history_page_count")
    }

    /// Page of history rows for one key, ordered by history id descending
    /// (newest first).
    fn history_page_fetch(&self, ctx: &QueryContext) -> crate::Result<Query> {
        let _ = ctx;
        unsupported(self.dialect(), "history_page_fetch")
    }

    /// Bounded deletion of history rows strictly older than the cutoff,
    /// oldest first, capped by the caller's row limit. Never unbounded.
    fn purge_history(&self, ctx: &QueryContext) -> crate::Result<Query> {
        let _ = ctx;
        unsupported(self.dialect(), "purge_history")
    }
}
