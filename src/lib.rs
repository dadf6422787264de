//! # Confsql
//!
//! Dialect-portable SQL generation for a configuration-record store.
//!
//! Confsql turns an abstract read/write request (filters, pagination window,
//! ordering) into dialect-correct SQL text plus an ordered parameter list,
//! for a configuration-record table and its append-only change-history table.
//! The same logical request produces the same logical result set — same rows,
//! same order, same page boundaries — on every supported backend, even though
//! the backends disagree on pagination syntax (`LIMIT/OFFSET` vs. numbered-row
//! window subqueries) and placeholder syntax (`?1`, `$1`, `?`).
//!
//! ## Guarantees
//!
//! - Pure generation: no connection handling, no execution, no I/O
//! - Placeholder count always equals parameter-list length, in order
//! - Externally supplied strings always travel as parameters, never inlined
//! - Count/fetch query pairs share one predicate assembly and cannot drift
//!
//! ## Example
//!
//! ```rust
//! use confsql::{ConfigQueryBuilder, QueryContext, SqliteQueryBuilder};
//!
//! let ctx = QueryContext::new()
//!     .with_data_id("app-%")
//!     .with_namespace("tenant-a")
//!     .with_window(0, 10);
//! let query = SqliteQueryBuilder.search_page_fetch(&ctx)?;
//! assert_eq!(query.params().len(), 2);
//! # Ok::<(), confsql::Error>(())
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use thiserror::Error as ThisError;

// Module declarations
pub mod cli;
pub mod config;
pub mod dialect;
pub mod models;
pub mod query;

// Re-exports for convenience
pub use config::StoreSettings;
pub use dialect::{
    ConfigQueryBuilder, Dialect, HistoryQueryBuilder, OracleQueryBuilder, PostgresQueryBuilder,
    SqliteQueryBuilder,
};
pub use models::{ConfigRecord, HistoryRecord, OpType};
pub use query::{
    NamespaceFilter, PlaceholderStyle, PredicateAssembler, Query, QueryContext, RowWindow,
    SqlParam,
};

/// Error type for confsql operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `MissingParameter` | An operation reads a required context field that is absent |
/// | `UnsupportedOperation` | A dialect is asked for an operation it does not implement |
/// | `InvalidRange` | Zero page size, zero purge limit, inverted time range |
/// | `Settings` | The settings file cannot be read or parsed |
///
/// Every failure is deterministic for a given input: the layer performs no
/// I/O during query generation, so there are no transient failure modes and
/// nothing is retried internally.
#[derive(Debug, ThisError)]
pub enum Error {
    /// A required context field is absent.
    ///
    /// Raised when an operation documents a field as required (e.g. the
    /// id cursor for an incremental dump, the key tuple for a history page)
    /// and the caller did not supply it. This is a caller error, surfaced
    /// immediately.
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// The dialect does not implement the requested operation.
    ///
    /// Raised by the default trait bodies in
    /// [`ConfigQueryBuilder`]/[`HistoryQueryBuilder`] when an implementation
    /// has not overridden an operation. Every shipped dialect overrides the
    /// full set.
    #[error("dialect '{dialect}' does not implement {operation}")]
    UnsupportedOperation {
        /// The dialect that was asked.
        dialect: Dialect,
        /// The operation that is not implemented.
        operation: &'static str,
    },

    /// A numeric or chronological input is outside its valid range.
    ///
    /// Raised when:
    /// - The page size is zero
    /// - The purge row limit is zero
    /// - A time range is inverted (lower bound after upper bound)
    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// The settings file could not be loaded.
    ///
    /// Raised only by the configuration layer, never by query generation.
    #[error("settings error: {cause}")]
    Settings {
        /// The underlying cause.
        cause: String,
    },
}

/// Result type alias for confsql operations.
pub type Result<T> = std::result::Result<T, Error>;
