use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::cursor::{CursorPosition, Direction};
use crate::error::FetchError;

/// A single backend row.
///
/// Rows are opaque key-value records; the `preserve_order` feature of
/// serde_json keeps columns in the order the backend produced them, which
/// avoids column flicker in the table view.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Comparable value used for sort keys and tiebreak ids.
///
/// Only variants that survive a serialization round trip exactly are
/// representable, so a decoded cursor always equals the encoded one.
/// Floats are deliberately absent: amounts are compared as integer minor units.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyValue {
    Null,
    Int(i64),
    Text(String),
}

impl KeyValue {
    /// Extracts a key from a JSON value.
    ///
    /// Integral numbers map to `Int`, bools to `Int(0|1)`, strings and
    /// fractional numbers to `Text`. Missing fields, nulls, arrays and objects
    /// map to `Null`.
    pub fn from_json(value: Option<&serde_json::Value>) -> Self {
        match value {
            Some(serde_json::Value::Number(n)) => match n.as_i64() {
                Some(i) => KeyValue::Int(i),
                None => KeyValue::Text(n.to_string()),
            },
            Some(serde_json::Value::String(s)) => KeyValue::Text(s.clone()),
            Some(serde_json::Value::Bool(b)) => KeyValue::Int(i64::from(*b)),
            _ => KeyValue::Null,
        }
    }

    /// Reads `field` from a row as a key.
    pub fn from_row(row: &Row, field: &str) -> Self {
        Self::from_json(row.get(field))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, KeyValue::Null)
    }
}

impl std::fmt::Display for KeyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyValue::Null => write!(f, "null"),
            KeyValue::Int(i) => write!(f, "{}", i),
            KeyValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Sort direction for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }
}

/// Ordering of a paginated listing: one sort column plus its direction.
///
/// The id column of the query breaks ties in the same direction, so the
/// canonical order is total as long as ids are unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub dir: SortDir,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, dir: SortDir) -> Self {
        Self { field: field.into(), dir }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDir::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDir::Desc)
    }
}

/// Compares two sort keys in canonical order.
///
/// NULL keys sort last regardless of direction, matching the
/// `nullslast` ordering requested from the REST backend.
pub fn compare_keys(a: &KeyValue, b: &KeyValue, dir: SortDir) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => match dir {
            SortDir::Asc => a.cmp(b),
            SortDir::Desc => b.cmp(a),
        },
    }
}

/// Compares two (sort key, id) positions in canonical order.
pub fn compare_positions(
    a: (&KeyValue, &KeyValue),
    b: (&KeyValue, &KeyValue),
    dir: SortDir,
) -> Ordering {
    compare_keys(a.0, b.0, dir).then_with(|| compare_keys(a.1, b.1, dir))
}

/// Description of one page request against a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub table: String,
    pub sort: SortSpec,
    pub id_field: String,
    pub page_size: usize,
    /// Columns to keep; `None` keeps every column.
    pub fields: Option<Vec<String>>,
}

impl PageQuery {
    pub fn new(table: impl Into<String>, sort: SortSpec) -> Self {
        Self {
            table: table.into(),
            sort,
            id_field: "id".to_string(),
            page_size: crate::config::DEFAULT_PAGE_SIZE,
            fields: None,
        }
    }

    pub fn with_id_field(mut self, id_field: impl Into<String>) -> Self {
        self.id_field = id_field.into();
        self
    }

    /// Sets the page size. Zero is raised to one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Number of rows to ask the backend for: the page plus one probe row.
    pub fn limit(&self) -> usize {
        self.page_size + 1
    }

    /// Sort key of a row under this query.
    pub fn sort_key_of(&self, row: &Row) -> KeyValue {
        KeyValue::from_row(row, &self.sort.field)
    }

    /// Tiebreak id of a row under this query.
    pub fn id_of(&self, row: &Row) -> KeyValue {
        KeyValue::from_row(row, &self.id_field)
    }
}

/// Capability to fetch ordered rows after (or before) a cursor position.
///
/// Implementations must return at most `query.limit()` rows:
/// - with `after == None` or a `Forward` cursor, rows strictly after the
///   position in canonical order, in canonical order;
/// - with a `Backward` cursor, rows strictly before the position, nearest first.
///
/// Providers are shared with background fetch threads, hence `Send + Sync`.
pub trait RowProvider: Send + Sync {
    fn fetch_rows(
        &self,
        query: &PageQuery,
        after: Option<&CursorPosition>,
    ) -> Result<Vec<Row>, FetchError>;

    /// Short human-readable description of the data source.
    fn describe(&self) -> String;
}

pub enum DynRowProvider {
    Memory(crate::memory_provider::MemoryProvider),
    Rest(crate::rest_provider::RestProvider),
}

impl RowProvider for DynRowProvider {
    #[inline]
    fn fetch_rows(
        &self,
        query: &PageQuery,
        after: Option<&CursorPosition>,
    ) -> Result<Vec<Row>, FetchError> {
        match self {
            DynRowProvider::Memory(p) => p.fetch_rows(query, after),
            DynRowProvider::Rest(p) => p.fetch_rows(query, after),
        }
    }

    #[inline]
    fn describe(&self) -> String {
        match self {
            DynRowProvider::Memory(p) => p.describe(),
            DynRowProvider::Rest(p) => p.describe(),
        }
    }
}

/// Returns the direction a seek runs in, treating "no cursor" as forward.
pub fn seek_direction(after: Option<&CursorPosition>) -> Direction {
    after.map(|p| p.direction).unwrap_or(Direction::Forward)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_from_json() {
        assert_eq!(KeyValue::from_json(Some(&json!(42))), KeyValue::Int(42));
        assert_eq!(KeyValue::from_json(Some(&json!("a"))), KeyValue::Text("a".into()));
        assert_eq!(KeyValue::from_json(Some(&json!(null))), KeyValue::Null);
        assert_eq!(KeyValue::from_json(None), KeyValue::Null);
        assert_eq!(KeyValue::from_json(Some(&json!(1.5))), KeyValue::Text("1.5".into()));
    }

    #[test]
    fn test_nulls_sort_last_both_directions() {
        let null = KeyValue::Null;
        let one = KeyValue::Int(1);
        assert_eq!(compare_keys(&null, &one, SortDir::Asc), Ordering::Greater);
        assert_eq!(compare_keys(&null, &one, SortDir::Desc), Ordering::Greater);
        assert_eq!(compare_keys(&one, &KeyValue::Int(2), SortDir::Desc), Ordering::Greater);
    }

    #[test]
    fn test_positions_break_ties_by_id() {
        let k = KeyValue::Text("2024-01-01".into());
        let a = KeyValue::Int(1);
        let b = KeyValue::Int(2);
        assert_eq!(compare_positions((&k, &a), (&k, &b), SortDir::Asc), Ordering::Less);
        assert_eq!(compare_positions((&k, &a), (&k, &b), SortDir::Desc), Ordering::Greater);
    }

    #[test]
    fn test_page_query_limit_includes_probe_row() {
        let q = PageQuery::new("invoices", SortSpec::desc("issued_on")).with_page_size(20);
        assert_eq!(q.limit(), 21);
        let q = q.with_page_size(0);
        assert_eq!(q.page_size, 1);
    }
}
