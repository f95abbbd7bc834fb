//! Exact-match record filters
//!
//! Filters are evaluated against the canonical JSON form of a model, so
//! the same filter behaves identically on every backend. A field name may
//! be a dotted path into nested objects (`properties.path`); a top-level
//! key containing dots is matched before the path is walked.

use serde_json::Value;

/// Conjunction of `field == value` predicates
///
/// # Example
/// ```
/// use serde_json::json;
/// use strata_store::filter::Filter;
///
/// let filter = Filter::eq("name", "sales").and("scope", "global");
/// assert!(filter.matches(&json!({"name": "sales", "scope": "global"})));
/// assert!(!filter.matches(&json!({"name": "sales", "scope": "cycle"})));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    predicates: Vec<(String, Value)>,
}

impl Filter {
    /// A filter with no predicates; matches every record
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new().and(field, value)
    }

    pub fn and(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.predicates.push((field.into(), value.into()));
        self
    }

    pub fn predicates(&self) -> &[(String, Value)] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Whether every predicate holds for `record`
    ///
    /// A missing field only matches an expected `null`.
    pub fn matches(&self, record: &Value) -> bool {
        self.predicates
            .iter()
            .all(|(field, expected)| lookup(record, field).unwrap_or(&Value::Null) == expected)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Filter {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Filter::new(), |filter, (k, v)| filter.and(k, v))
    }
}

/// Whether `record` passes a list of filters
///
/// An empty list matches everything; otherwise any one filter suffices.
pub fn matches_any(filters: &[Filter], record: &Value) -> bool {
    filters.is_empty() || filters.iter().any(|f| f.matches(record))
}

fn lookup<'a>(record: &'a Value, field: &str) -> Option<&'a Value> {
    if let Some(value) = record.get(field) {
        return Some(value);
    }
    field
        .split('.')
        .try_fold(record, |current, segment| current.get(segment))
}
