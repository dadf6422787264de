//! Conjunctive predicate assembly.
//!
//! Every listing/search operation accepts a fixed set of optional filters
//! combined with `AND`. The assembler accumulates (fragment, parameter)
//! pairs and only concatenates at the end, so the placeholder/parameter
//! order invariant holds mechanically rather than by convention: each bound
//! condition appends exactly one placeholder to the text and exactly one
//! value to the list, in the same relative order, no matter which optional
//! filters are skipped.

use super::context::NamespaceFilter;
use super::result::SqlParam;
use serde::{Deserialize, Serialize};

/// Positional placeholder syntax of a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderStyle {
    /// Numbered question marks: `?1`, `?2`, ...
    Numbered,
    /// Numbered dollar placeholders: `$1`, `$2`, ...
    Dollar,
    /// Plain question marks, bound by position: `?`
    Question,
}

impl PlaceholderStyle {
    /// Renders the placeholder for a 1-based parameter index.
    #[must_use]
    pub fn render(self, index: usize) -> String {
        match self {
            Self::Numbered => format!("?{index}"),
            Self::Dollar => format!("${index}"),
            Self::Question => "?".to_string(),
        }
    }
}

/// Escapes SQL LIKE wildcards in a string to make them literal.
///
/// SQL LIKE treats `%` (any characters) and `_` (single character) as
/// wildcards; a literal occurrence must be escaped with a backslash, as must
/// the backslash itself. Generated LIKE clauses carry `ESCAPE '\'` so the
/// escapes mean the same thing on every dialect.
///
/// # Examples
///
/// ```
/// use confsql::query::escape_like_wildcards;
///
/// assert_eq!(escape_like_wildcards("100%"), "100\\%");
/// assert_eq!(escape_like_wildcards("user_name"), "user\\_name");
/// assert_eq!(escape_like_wildcards("path\\file"), "path\\\\file");
/// ```
#[must_use]
pub fn escape_like_wildcards(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '%' | '_' | '\\' => {
                result.push('\\');
                result.push(c);
            },
            _ => result.push(c),
        }
    }
    result
}

/// Converts a glob-style pattern to a SQL LIKE pattern.
///
/// Glob patterns use `*` (any characters) and `?` (single character). This
/// converts them to the LIKE equivalents (`%` and `_`) while escaping any
/// literal LIKE wildcards already present in the pattern.
///
/// # Examples
///
/// ```
/// use confsql::query::glob_to_like_pattern;
///
/// assert_eq!(glob_to_like_pattern("app-*"), "app-%");
/// assert_eq!(glob_to_like_pattern("env?.yaml"), "env_.yaml");
/// assert_eq!(glob_to_like_pattern("100%*"), "100\\%%");
/// ```
#[must_use]
pub fn glob_to_like_pattern(pattern: &str) -> String {
    let mut result = String::with_capacity(pattern.len() * 2);
    for c in pattern.chars() {
        match c {
            // Escape existing SQL LIKE wildcards (they're meant to be literal)
            '%' | '_' | '\\' => {
                result.push('\\');
                result.push(c);
            },
            // Convert glob wildcards to SQL LIKE wildcards
            '*' => result.push('%'),
            '?' => result.push('_'),
            _ => result.push(c),
        }
    }
    result
}

/// Accumulates conjunctive filter clauses with positionally synchronized
/// parameters.
#[derive(Debug)]
pub struct PredicateAssembler {
    style: PlaceholderStyle,
    next_index: usize,
    conditions: Vec<String>,
    params: Vec<SqlParam>,
}

impl PredicateAssembler {
    /// Creates an empty assembler for a placeholder style, numbering from 1.
    #[must_use]
    pub const fn new(style: PlaceholderStyle) -> Self {
        Self {
            style,
            next_index: 1,
            conditions: Vec::new(),
            params: Vec::new(),
        }
    }

    fn bind(&mut self, value: SqlParam) -> String {
        let placeholder = self.style.render(self.next_index);
        self.next_index += 1;
        self.params.push(value);
        placeholder
    }

    /// Appends an equality condition with one bound parameter.
    pub fn push_eq(&mut self, column: &str, value: impl Into<SqlParam>) {
        let placeholder = self.bind(value.into());
        self.conditions.push(format!("{column} = {placeholder}"));
    }

    /// Appends a LIKE condition with one bound parameter.
    ///
    /// The clause carries `ESCAPE '\'` so backslash-escaped wildcards (as
    /// produced by [`escape_like_wildcards`]) read identically on every
    /// dialect.
    pub fn push_like(&mut self, column: &str, pattern: impl Into<SqlParam>) {
        let placeholder = self.bind(pattern.into());
        self.conditions
            .push(format!("{column} LIKE {placeholder} ESCAPE '\\'"));
    }

    /// Appends a comparison condition (`>=`, `<=`, `>`, `<`) with one bound
    /// parameter.
    pub fn push_cmp(&mut self, column: &str, op: &str, value: impl Into<SqlParam>) {
        let placeholder = self.bind(value.into());
        self.conditions.push(format!("{column} {op} {placeholder}"));
    }

    /// Appends a condition with no bound parameter (e.g. `IS NULL`).
    pub fn push_unbound(&mut self, fragment: impl Into<String>) {
        self.conditions.push(fragment.into());
    }

    /// Appends an equality condition when the value is present; absent
    /// values contribute nothing — no text, no parameter.
    pub fn eq_if_present(&mut self, column: &str, value: Option<&str>) {
        if let Some(v) = value {
            self.push_eq(column, v);
        }
    }

    /// Appends a LIKE condition when the pattern is present; absent patterns
    /// contribute nothing.
    pub fn like_if_present(&mut self, column: &str, pattern: Option<&str>) {
        if let Some(p) = pattern {
            self.push_like(column, p);
        }
    }

    /// Appends the canonical namespace branch.
    ///
    /// [`NamespaceFilter::Default`] compiles to `column IS NULL` with no
    /// placeholder; [`NamespaceFilter::Tenant`] compiles to an equality with
    /// one parameter bound to the tenant value, the empty string included.
    pub fn push_namespace(&mut self, column: &str, namespace: &NamespaceFilter) {
        match namespace {
            NamespaceFilter::Default => self.push_unbound(format!("{column} IS NULL")),
            NamespaceFilter::Tenant(value) => self.push_eq(column, value.as_str()),
        }
    }

    /// Number of parameters bound so far.
    #[must_use]
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// True when no condition has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Concatenates into a WHERE clause and the ordered parameter list.
    ///
    /// The clause is empty for an empty assembler, otherwise
    /// `" WHERE c1 AND c2 AND ..."` (leading space included so callers can
    /// append it directly after a table name).
    #[must_use]
    pub fn into_parts(self) -> (String, Vec<SqlParam>) {
        let clause = if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        };
        (clause, self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_wildcards() {
        assert_eq!(escape_like_wildcards("normal"), "normal");
        assert_eq!(escape_like_wildcards("100%"), "100\\%");
        assert_eq!(escape_like_wildcards("user_name"), "user\\_name");
        assert_eq!(escape_like_wildcards("path\\file"), "path\\\\file");
        assert_eq!(escape_like_wildcards("100%_x\\"), "100\\%\\_x\\\\");
        assert_eq!(escape_like_wildcards(""), "");
    }

    #[test]
    fn test_glob_to_like_pattern() {
        assert_eq!(glob_to_like_pattern("*"), "%");
        assert_eq!(glob_to_like_pattern("?"), "_");
        assert_eq!(glob_to_like_pattern("app-*"), "app-%");
        assert_eq!(glob_to_like_pattern("env?.yaml"), "env_.yaml");
        assert_eq!(glob_to_like_pattern("100%"), "100\\%");
        assert_eq!(glob_to_like_pattern("foo%*bar"), "foo\\%%bar");
        assert_eq!(glob_to_like_pattern(""), "");
    }

    #[test]
    fn test_styles_render() {
        assert_eq!(PlaceholderStyle::Numbered.render(3), "?3");
        assert_eq!(PlaceholderStyle::Dollar.render(3), "$3");
        assert_eq!(PlaceholderStyle::Question.render(3), "?");
    }

    #[test]
    fn test_empty_assembler() {
        let asm = PredicateAssembler::new(PlaceholderStyle::Numbered);
        assert!(asm.is_empty());
        let (clause, params) = asm.into_parts();
        assert_eq!(clause, "");
        assert!(params.is_empty());
    }

    #[test]
    fn test_numbering_tracks_bound_conditions_only() {
        let mut asm = PredicateAssembler::new(PlaceholderStyle::Numbered);
        asm.push_unbound("namespace_id IS NULL");
        asm.push_eq("app_name", "billing");
        asm.push_like("data_id", "app-%");
        let (clause, params) = asm.into_parts();
        assert_eq!(
            clause,
            " WHERE namespace_id IS NULL AND app_name = ?1 AND data_id LIKE ?2 ESCAPE '\\'"
        );
        assert_eq!(
            params,
            vec![SqlParam::from("billing"), SqlParam::from("app-%")]
        );
    }

    #[test]
    fn test_skipped_filters_do_not_shift_numbering() {
        let mut asm = PredicateAssembler::new(PlaceholderStyle::Dollar);
        asm.eq_if_present("data_id", None);
        asm.eq_if_present("group_id", Some("DEFAULT"));
        asm.like_if_present("content", None);
        let (clause, params) = asm.into_parts();
        assert_eq!(clause, " WHERE group_id = $1");
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_namespace_branches_differ() {
        let mut asm = PredicateAssembler::new(PlaceholderStyle::Numbered);
        asm.push_namespace("namespace_id", &NamespaceFilter::Default);
        let (clause, params) = asm.into_parts();
        assert_eq!(clause, " WHERE namespace_id IS NULL");
        assert!(params.is_empty());

        // empty string is an explicit tenant value: one placeholder, one param
        let mut asm = PredicateAssembler::new(PlaceholderStyle::Numbered);
        asm.push_namespace("namespace_id", &NamespaceFilter::Tenant(String::new()));
        let (clause, params) = asm.into_parts();
        assert_eq!(clause, " WHERE namespace_id = ?1");
        assert_eq!(params, vec![SqlParam::from("")]);
    }

    #[test]
    fn test_cmp_and_question_style() {
        let mut asm = PredicateAssembler::new(PlaceholderStyle::Question);
        asm.push_cmp("modified_at", ">=", SqlParam::Int(100));
        asm.push_cmp("modified_at", "<=", SqlParam::Int(200));
        let (clause, params) = asm.into_parts();
        assert_eq!(clause, " WHERE modified_at >= ? AND modified_at <= ?");
        assert_eq!(params.len(), 2);
    }
}
