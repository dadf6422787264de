//! Caller-supplied query inputs.

use crate::config::StoreSettings;
use chrono::{DateTime, Utc};

/// Canonical namespace branch at the storage boundary.
///
/// External callers represent "no namespace" inconsistently — an absent
/// value, an empty string, or a sentinel. This layer resolves the ambiguity
/// once, here:
///
/// - a context with **no** namespace value compiles to the default branch
///   (`namespace_id IS NULL`, zero placeholders);
/// - a context with **any** namespace value — the empty string included —
///   compiles to the tenant branch (`namespace_id = ?`, one parameter bound
///   to the value as given).
///
/// The two branches differ in predicate text and in binding count and are
/// never conflated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceFilter {
    /// The default namespace, stored as SQL NULL.
    Default,
    /// An explicit tenant namespace, bound as a parameter.
    Tenant(String),
}

/// Immutable bag of named inputs for one query-generation call.
///
/// All filter fields are optional unless an operation documents them as
/// required; reading an absent required field fails with
/// [`crate::Error::MissingParameter`]. Built once, read by the dialect
/// builder, discarded after use.
///
/// Ordinary optional filters treat a blank value (empty or whitespace-only)
/// as absent. The namespace field is the one exception — see
/// [`NamespaceFilter`].
#[derive(Debug, Clone, PartialEq)]
pub struct QueryContext {
    data_id: Option<String>,
    group: Option<String>,
    namespace: Option<String>,
    app_name: Option<String>,
    content: Option<String>,
    modified_after: Option<DateTime<Utc>>,
    modified_before: Option<DateTime<Utc>>,
    last_seen_id: Option<i64>,
    purge_cutoff: Option<DateTime<Utc>>,
    purge_limit: Option<u32>,
    start_row: u64,
    page_size: u64,
}

impl Default for QueryContext {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryContext {
    /// Creates an empty context with the default page window.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            data_id: None,
            group: None,
            namespace: None,
            app_name: None,
            content: None,
            modified_after: None,
            modified_before: None,
            last_seen_id: None,
            purge_cutoff: None,
            purge_limit: None,
            start_row: 0,
            page_size: crate::config::DEFAULT_PAGE_SIZE,
        }
    }

    /// Creates a context windowed to a 1-based page number, using the
    /// settings' default page size.
    #[must_use]
    pub fn for_page(page_no: u64, settings: &StoreSettings) -> Self {
        let page_size = settings.default_page_size;
        Self::new().with_window(page_no.saturating_sub(1).saturating_mul(page_size), page_size)
    }

    /// Sets the data identifier filter.
    #[must_use]
    pub fn with_data_id(mut self, data_id: impl Into<String>) -> Self {
        self.data_id = Some(data_id.into());
        self
    }

    /// Sets the group identifier filter.
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Sets an explicit namespace. Omitting this selects the default
    /// namespace branch; setting it — even to `""` — selects the tenant
    /// branch.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Sets the application name filter.
    #[must_use]
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    /// Sets the content filter.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Sets the lower modification-time bound (inclusive).
    #[must_use]
    pub const fn with_modified_after(mut self, t: DateTime<Utc>) -> Self {
        self.modified_after = Some(t);
        self
    }

    /// Sets the upper modification-time bound (inclusive).
    #[must_use]
    pub const fn with_modified_before(mut self, t: DateTime<Utc>) -> Self {
        self.modified_before = Some(t);
        self
    }

    /// Sets the id cursor for incremental scans.
    #[must_use]
    pub const fn with_last_seen_id(mut self, id: i64) -> Self {
        self.last_seen_id = Some(id);
        self
    }

    /// Sets the history purge cutoff time.
    #[must_use]
    pub const fn with_purge_cutoff(mut self, t: DateTime<Utc>) -> Self {
        self.purge_cutoff = Some(t);
        self
    }

    /// Sets the maximum rows removed per purge invocation.
    #[must_use]
    pub const fn with_purge_limit(mut self, limit: u32) -> Self {
        self.purge_limit = Some(limit);
        self
    }

    /// Sets the zero-based start row and the page size.
    #[must_use]
    pub const fn with_window(mut self, start_row: u64, page_size: u64) -> Self {
        self.start_row = start_row;
        self.page_size = page_size;
        self
    }

    /// The data identifier filter, with blank treated as absent.
    #[must_use]
    pub fn data_id(&self) -> Option<&str> {
        present(&self.data_id)
    }

    /// The group identifier filter, with blank treated as absent.
    #[must_use]
    pub fn group(&self) -> Option<&str> {
        present(&self.group)
    }

    /// The application name filter, with blank treated as absent.
    #[must_use]
    pub fn app_name(&self) -> Option<&str> {
        present(&self.app_name)
    }

    /// The content filter, with blank treated as absent.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        present(&self.content)
    }

    /// The canonical namespace branch for this context.
    ///
    /// Blank-collapsing deliberately does not apply here: `Some("")` is an
    /// explicit tenant value, not the default branch.
    #[must_use]
    pub fn namespace_filter(&self) -> NamespaceFilter {
        self.namespace
            .clone()
            .map_or(NamespaceFilter::Default, NamespaceFilter::Tenant)
    }

    /// The lower modification-time bound, if set.
    #[must_use]
    pub const fn modified_after(&self) -> Option<DateTime<Utc>> {
        self.modified_after
    }

    /// The upper modification-time bound, if set.
    #[must_use]
    pub const fn modified_before(&self) -> Option<DateTime<Utc>> {
        self.modified_before
    }

    /// The zero-based start row of the page window.
    #[must_use]
    pub const fn start_row(&self) -> u64 {
        self.start_row
    }

    /// The page size of the page window.
    #[must_use]
    pub const fn page_size(&self) -> u64 {
        self.page_size
    }

    /// The data identifier, required.
    pub fn require_data_id(&self) -> crate::Result<&str> {
        self.data_id()
            .ok_or(crate::Error::MissingParameter("data_id"))
    }

    /// The group identifier, required.
    pub fn require_group(&self) -> crate::Result<&str> {
        self.group().ok_or(crate::Error::MissingParameter("group"))
    }

    /// The application name, required.
    pub fn require_app_name(&self) -> crate::Result<&str> {
        self.app_name()
            .ok_or(crate::Error::MissingParameter("app_name"))
    }

    /// The id cursor, required.
    pub fn require_last_seen_id(&self) -> crate::Result<i64> {
        self.last_seen_id
            .ok_or(crate::Error::MissingParameter("last_seen_id"))
    }

    /// The purge cutoff time, required.
    pub fn require_purge_cutoff(&self) -> crate::Result<DateTime<Utc>> {
        self.purge_cutoff
            .ok_or(crate::Error::MissingParameter("purge_cutoff"))
    }

    /// The purge row limit, required and at least 1.
    pub fn require_purge_limit(&self) -> crate::Result<u32> {
        let limit = self
            .purge_limit
            .ok_or(crate::Error::MissingParameter("purge_limit"))?;
        if limit == 0 {
            return Err(crate::Error::InvalidRange(
                "purge limit must be at least 1".to_string(),
            ));
        }
        Ok(limit)
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_filters_are_absent() {
        let ctx = QueryContext::new()
            .with_data_id("  ")
            .with_group("")
            .with_app_name("billing");
        assert_eq!(ctx.data_id(), None);
        assert_eq!(ctx.group(), None);
        assert_eq!(ctx.app_name(), Some("billing"));
    }

    #[test]
    fn test_namespace_absent_vs_empty() {
        let absent = QueryContext::new();
        assert_eq!(absent.namespace_filter(), NamespaceFilter::Default);

        // The empty string is an explicit tenant value, not "absent".
        let empty = QueryContext::new().with_namespace("");
        assert_eq!(
            empty.namespace_filter(),
            NamespaceFilter::Tenant(String::new())
        );

        let tenant = QueryContext::new().with_namespace("tenant-a");
        assert_eq!(
            tenant.namespace_filter(),
            NamespaceFilter::Tenant("tenant-a".to_string())
        );
    }

    #[test]
    fn test_require_missing_fields() {
        let ctx = QueryContext::new();
        assert!(matches!(
            ctx.require_data_id(),
            Err(crate::Error::MissingParameter("data_id"))
        ));
        assert!(matches!(
            ctx.require_last_seen_id(),
            Err(crate::Error::MissingParameter("last_seen_id"))
        ));
        assert!(matches!(
            ctx.require_purge_cutoff(),
            Err(crate::Error::MissingParameter("purge_cutoff"))
        ));
    }

    #[test]
    fn test_require_blank_is_missing() {
        let ctx = QueryContext::new().with_app_name("   ");
        assert!(matches!(
            ctx.require_app_name(),
            Err(crate::Error::MissingParameter("app_name"))
        ));
    }

    #[test]
    fn test_zero_purge_limit_rejected() {
        let ctx = QueryContext::new().with_purge_limit(0);
        assert!(matches!(
            ctx.require_purge_limit(),
            Err(crate::Error::InvalidRange(_))
        ));
    }

    #[test]
    fn test_for_page_window() {
        let settings = StoreSettings::default();
        let ctx = QueryContext::for_page(3, &settings);
        assert_eq!(ctx.start_row(), 2 * settings.default_page_size);
        assert_eq!(ctx.page_size(), settings.default_page_size);

        // page 0 clamps to the first page rather than underflowing
        let ctx = QueryContext::for_page(0, &settings);
        assert_eq!(ctx.start_row(), 0);
    }
}
