//! Generated query artifact.

use super::predicate::PlaceholderStyle;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A single positional parameter value.
///
/// The execution layer binds these in order; confsql never renders an
/// externally supplied value into the SQL text itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlParam {
    /// A string value (identifier, pattern, content).
    Text(String),
    /// A 64-bit integer value (ids, row limits).
    Int(i64),
    /// A UTC timestamp value (time bounds, purge cutoffs).
    Timestamp(DateTime<Utc>),
}

impl From<&str> for SqlParam {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<i64> for SqlParam {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for SqlParam {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<DateTime<Utc>> for SqlParam {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Timestamp(v)
    }
}

impl std::fmt::Display for SqlParam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Timestamp(v) => write!(f, "{}", v.to_rfc3339()),
        }
    }
}

/// Generated SQL text plus its ordered parameter list.
///
/// A `Query` is complete by construction: builders either return one with the
/// placeholder/parameter invariant intact or fail with an error. The number
/// of positional placeholders in `sql` always equals `params.len()`, and the
/// values appear in emission order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Query {
    sql: String,
    params: Vec<SqlParam>,
}

impl Query {
    /// Creates a query from text and its ordered parameters.
    #[must_use]
    pub const fn new(sql: String, params: Vec<SqlParam>) -> Self {
        Self { sql, params }
    }

    /// The generated SQL text.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The parameter values, in placeholder order.
    #[must_use]
    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }

    /// Consumes the query, returning text and parameters.
    #[must_use]
    pub fn into_parts(self) -> (String, Vec<SqlParam>) {
        (self.sql, self.params)
    }

    /// Counts the positional placeholders in the SQL text for a style.
    ///
    /// Used by the contract tests to assert the placeholder/parameter
    /// invariant; also handy when debugging a dialect by hand. Quoted
    /// literals in generated text never contain placeholder characters, so a
    /// plain scan is sufficient.
    #[must_use]
    pub fn placeholder_count(&self, style: PlaceholderStyle) -> usize {
        let bytes = self.sql.as_bytes();
        let mut count = 0;
        for (i, b) in bytes.iter().enumerate() {
            let followed_by_digit = bytes
                .get(i + 1)
                .is_some_and(|next| next.is_ascii_digit());
            match style {
                PlaceholderStyle::Question if *b == b'?' => count += 1,
                PlaceholderStyle::Numbered if *b == b'?' && followed_by_digit => count += 1,
                PlaceholderStyle::Dollar if *b == b'$' && followed_by_digit => count += 1,
                _ => {}
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_count_per_style() {
        let q = Query::new(
            "SELECT * FROM t WHERE a = ?1 AND b LIKE ?2".to_string(),
            vec![SqlParam::from("x"), SqlParam::from("y%")],
        );
        assert_eq!(q.placeholder_count(PlaceholderStyle::Numbered), 2);

        let q = Query::new(
            "SELECT * FROM t WHERE a = $1 AND b = $2 AND c = $3".to_string(),
            vec![],
        );
        assert_eq!(q.placeholder_count(PlaceholderStyle::Dollar), 3);

        let q = Query::new("DELETE FROM t WHERE a < ? AND b <= ?".to_string(), vec![]);
        assert_eq!(q.placeholder_count(PlaceholderStyle::Question), 2);
    }

    #[test]
    fn test_placeholder_count_ignores_other_styles() {
        let q = Query::new("SELECT * FROM t WHERE a = $1".to_string(), vec![]);
        assert_eq!(q.placeholder_count(PlaceholderStyle::Question), 0);
        assert_eq!(q.placeholder_count(PlaceholderStyle::Numbered), 0);
    }

    #[test]
    fn test_param_display() {
        assert_eq!(SqlParam::from("app-%").to_string(), "app-%");
        assert_eq!(SqlParam::from(42i64).to_string(), "42");
    }

    #[test]
    fn test_param_json_shapes() {
        let json = serde_json::to_string(&vec![
            SqlParam::from("a"),
            SqlParam::from(7i64),
        ])
        .unwrap_or_default();
        assert_eq!(json, r#"["a",7]"#);
    }
}
