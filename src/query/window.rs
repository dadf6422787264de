//! Pagination rank arithmetic.

use super::context::QueryContext;

/// A validated page window over a stably ordered result set.
///
/// Given a zero-based `start_row` and a `page_size`, every listing operation
/// returns at most `page_size` rows: those ranked
/// `start_row + 1 ..= start_row + page_size` under the operation's
/// documented order. Offset/limit dialects emit the window directly; the
/// numbered-row dialect wraps the ordered selection so that the outer rank
/// filter selects the identical inclusive range. If fewer rows remain than
/// the page size, the page is simply short.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowWindow {
    start_row: u64,
    page_size: u64,
}

impl RowWindow {
    /// Creates a window from a zero-based start row and a page size.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidRange`] when `page_size` is zero.
    /// A negative start row is unrepresentable.
    pub fn new(start_row: u64, page_size: u64) -> crate::Result<Self> {
        if page_size == 0 {
            return Err(crate::Error::InvalidRange(
                "page size must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            start_row,
            page_size,
        })
    }

    /// Creates a window from a context's pagination fields.
    pub fn from_context(ctx: &QueryContext) -> crate::Result<Self> {
        Self::new(ctx.start_row(), ctx.page_size())
    }

    /// The zero-based start row.
    #[must_use]
    pub const fn start_row(&self) -> u64 {
        self.start_row
    }

    /// The page size.
    #[must_use]
    pub const fn page_size(&self) -> u64 {
        self.page_size
    }

    /// The 1-based rank of the first row in the page.
    #[must_use]
    pub const fn first_rank(&self) -> u64 {
        self.start_row + 1
    }

    /// The 1-based rank of the last row in the page (inclusive).
    #[must_use]
    pub const fn last_rank(&self) -> u64 {
        self.start_row + self.page_size
    }

    /// Renders the offset/limit form of the window.
    ///
    /// Both values are internally computed, range-validated integers, which
    /// is the one case where the generated-query contract permits inlining.
    #[must_use]
    pub fn limit_offset(&self) -> String {
        format!("LIMIT {} OFFSET {}", self.page_size, self.start_row)
    }
}
