//! In-process row provider.
//!
//! Backs offline datasets and synthetic data. Implements the same keyset
//! seek semantics as the REST provider so screens cannot tell them apart.

use std::collections::BTreeMap;

use crate::cursor::{CursorPosition, Direction};
use crate::error::FetchError;
use crate::traits::{compare_positions, seek_direction, KeyValue, PageQuery, Row, RowProvider};

#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    label: String,
    tables: BTreeMap<String, Vec<Row>>,
}

impl MemoryProvider {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            tables: BTreeMap::new(),
        }
    }

    /// Replaces the rows of `table`.
    pub fn insert_table(&mut self, table: impl Into<String>, rows: Vec<Row>) {
        self.tables.insert(table.into(), rows);
    }

    /// Appends a row to `table`, creating the table if needed.
    pub fn push_row(&mut self, table: &str, row: Row) {
        self.tables.entry(table.to_string()).or_default().push(row);
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn row_count(&self, table: &str) -> Option<usize> {
        self.tables.get(table).map(Vec::len)
    }

    pub fn total_rows(&self) -> usize {
        self.tables.values().map(Vec::len).sum()
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl RowProvider for MemoryProvider {
    fn fetch_rows(
        &self,
        query: &PageQuery,
        after: Option<&CursorPosition>,
    ) -> Result<Vec<Row>, FetchError> {
        let rows = self
            .tables
            .get(&query.table)
            .ok_or_else(|| FetchError::UnknownTable(query.table.clone()))?;

        let dir = query.sort.dir;
        let mut keyed: Vec<(KeyValue, KeyValue, &Row)> = rows
            .iter()
            .map(|row| (query.sort_key_of(row), query.id_of(row), row))
            .collect();
        keyed.sort_by(|a, b| compare_positions((&a.0, &a.1), (&b.0, &b.1), dir));

        // Number of rows at or before the cursor in canonical order
        let split = |cursor: &CursorPosition, inclusive: bool| {
            keyed.partition_point(|(k, id, _)| {
                let ord = compare_positions((k, id), (&cursor.sort_key, &cursor.tiebreak_id), dir);
                ord.is_lt() || (inclusive && ord.is_eq())
            })
        };

        let limit = query.limit();
        let page: Vec<Row> = match (after, seek_direction(after)) {
            (None, _) => keyed.iter().take(limit).map(|(_, _, r)| (*r).clone()).collect(),
            (Some(cursor), Direction::Forward) => {
                let start = split(cursor, true);
                keyed[start..].iter().take(limit).map(|(_, _, r)| (*r).clone()).collect()
            }
            (Some(cursor), Direction::Backward) => {
                let end = split(cursor, false);
                keyed[..end].iter().rev().take(limit).map(|(_, _, r)| (*r).clone()).collect()
            }
        };

        log::debug!(
            "memory provider: {} rows from {} (after: {})",
            page.len(),
            query.table,
            after.is_some()
        );
        Ok(page)
    }

    fn describe(&self) -> String {
        format!("{} ({} rows)", self.label, self.total_rows())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::SortSpec;
    use serde_json::json;

    fn provider() -> MemoryProvider {
        let mut p = MemoryProvider::new("test");
        // Shuffled insertion order; two rows share a sort key
        for (id, amount) in [(3, 300), (1, 100), (4, 200), (2, 200), (5, 500)] {
            p.push_row("invoices", json!({"id": id, "amount": amount}).as_object().cloned().unwrap());
        }
        p.push_row("invoices", json!({"id": 6}).as_object().cloned().unwrap());
        p
    }

    fn ids(rows: &[Row]) -> Vec<i64> {
        rows.iter().map(|r| r["id"].as_i64().unwrap()).collect()
    }

    #[test]
    fn test_first_page_canonical_order() {
        let q = PageQuery::new("invoices", SortSpec::asc("amount")).with_page_size(3);
        let rows = provider().fetch_rows(&q, None).unwrap();
        // limit = page_size + 1; missing amount sorts last
        assert_eq!(ids(&rows), vec![1, 2, 4, 3]);
    }

    #[test]
    fn test_descending_keeps_nulls_last() {
        let q = PageQuery::new("invoices", SortSpec::desc("amount")).with_page_size(10);
        let rows = provider().fetch_rows(&q, None).unwrap();
        assert_eq!(ids(&rows), vec![5, 3, 4, 2, 1, 6]);
    }

    #[test]
    fn test_forward_seek_skips_ties_correctly() {
        let q = PageQuery::new("invoices", SortSpec::asc("amount")).with_page_size(10);
        let cursor = CursorPosition::forward(KeyValue::Int(200), KeyValue::Int(2));
        let rows = provider().fetch_rows(&q, Some(&cursor)).unwrap();
        assert_eq!(ids(&rows), vec![4, 3, 5, 6]);
    }

    #[test]
    fn test_backward_seek_nearest_first() {
        let q = PageQuery::new("invoices", SortSpec::asc("amount")).with_page_size(1);
        let cursor = CursorPosition::backward(KeyValue::Int(300), KeyValue::Int(3));
        let rows = provider().fetch_rows(&q, Some(&cursor)).unwrap();
        assert_eq!(ids(&rows), vec![4, 2]);
    }

    #[test]
    fn test_seek_after_null_key() {
        let q = PageQuery::new("invoices", SortSpec::asc("amount")).with_page_size(10);
        let cursor = CursorPosition::forward(KeyValue::Null, KeyValue::Int(6));
        assert!(provider().fetch_rows(&q, Some(&cursor)).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_table() {
        let q = PageQuery::new("nope", SortSpec::asc("id"));
        assert!(matches!(
            provider().fetch_rows(&q, None),
            Err(FetchError::UnknownTable(t)) if t == "nope"
        ));
    }
}
