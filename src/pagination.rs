//! Paginated result envelopes.
//!
//! Providers are asked for `page_size + 1` rows. The extra "probe" row only
//! signals that more data exists and never reaches the caller.

use crate::cursor::{encode_cursor, CursorPosition, Direction};
use crate::traits::{KeyValue, Row};

/// One page of results plus the tokens needed to continue from it.
///
/// Built once per fetch and never mutated afterwards; a new fetch produces a
/// new page.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorPage<T> {
    items: Vec<T>,
    next_cursor: Option<String>,
    previous_cursor: Option<String>,
    has_more: bool,
}

impl<T> CursorPage<T> {
    /// An empty page with no continuation in either direction.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            next_cursor: None,
            previous_cursor: None,
            has_more: false,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Token resuming after the last item, if there is anything after it.
    pub fn next_cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref()
    }

    /// Token resuming before the first item, if there is anything before it.
    pub fn previous_cursor(&self) -> Option<&str> {
        self.previous_cursor.as_deref()
    }

    /// Whether more rows exist in the direction this page was fetched.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Maps the items, keeping cursors and flags.
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> CursorPage<U> {
        CursorPage {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
            previous_cursor: self.previous_cursor,
            has_more: self.has_more,
        }
    }
}

/// Wraps a raw provider page into a [`CursorPage`].
///
/// * `raw_rows` - rows fetched with `limit = page_size + 1`
/// * `page_size` - number of rows the caller asked for
/// * `direction` - direction the rows were fetched in
/// * `from_cursor` - whether the fetch resumed from a cursor (false on the first page)
/// * `sort_key_of` / `id_of` - extract the comparison fields from a row
///
/// Forward pages keep the provider's order. Backward pages arrive nearest
/// first and are reversed back into display order; no comparison sort is
/// ever applied.
pub fn to_cursor_paginated_result<T, K, I>(
    mut raw_rows: Vec<T>,
    page_size: usize,
    direction: Direction,
    from_cursor: bool,
    sort_key_of: K,
    id_of: I,
) -> CursorPage<T>
where
    K: Fn(&T) -> KeyValue,
    I: Fn(&T) -> KeyValue,
{
    if raw_rows.is_empty() {
        return CursorPage::empty();
    }

    let has_more = raw_rows.len() > page_size;
    raw_rows.truncate(page_size);

    let cursor_for = |row: &T, direction: Direction| {
        encode_cursor(&CursorPosition::new(sort_key_of(row), id_of(row), direction))
    };

    match direction {
        Direction::Forward => {
            let next_cursor = if has_more {
                raw_rows.last().map(|row| cursor_for(row, Direction::Forward))
            } else {
                None
            };
            let previous_cursor = if from_cursor {
                raw_rows.first().map(|row| cursor_for(row, Direction::Backward))
            } else {
                None
            };
            CursorPage {
                items: raw_rows,
                next_cursor,
                previous_cursor,
                has_more,
            }
        }
        Direction::Backward => {
            raw_rows.reverse();
            let previous_cursor = if has_more {
                raw_rows.first().map(|row| cursor_for(row, Direction::Backward))
            } else {
                None
            };
            let next_cursor = raw_rows.last().map(|row| cursor_for(row, Direction::Forward));
            CursorPage {
                items: raw_rows,
                next_cursor,
                previous_cursor,
                has_more,
            }
        }
    }
}

/// Projects a row onto `fields`, in the requested order.
///
/// Unknown field names are skipped, as are repeats.
pub fn select_fields<S: AsRef<str>>(row: &Row, fields: &[S]) -> Row {
    let mut out = Row::new();
    for field in fields {
        let field = field.as_ref();
        if out.contains_key(field) {
            continue;
        }
        if let Some(value) = row.get(field) {
            out.insert(field.to_string(), value.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::decode_cursor;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn rows(n: usize) -> Vec<Row> {
        (1..=n)
            .map(|i| {
                let value = json!({"id": i, "created_at": format!("2024-01-{:02}", (i % 28) + 1)});
                value.as_object().cloned().unwrap()
            })
            .collect()
    }

    fn page(raw: Vec<Row>, size: usize, direction: Direction, from_cursor: bool) -> CursorPage<Row> {
        to_cursor_paginated_result(
            raw,
            size,
            direction,
            from_cursor,
            |r: &Row| KeyValue::from_row(r, "created_at"),
            |r: &Row| KeyValue::from_row(r, "id"),
        )
    }

    #[test]
    fn test_exact_page_fill() {
        let p = page(rows(20), 20, Direction::Forward, false);
        assert_eq!(p.len(), 20);
        assert!(!p.has_more());
        assert_eq!(p.next_cursor(), None);
        assert_eq!(p.previous_cursor(), None);
    }

    #[test]
    fn test_probe_row_detected() {
        let raw = rows(21);
        let twentieth = raw[19].clone();
        let p = page(raw, 20, Direction::Forward, false);
        assert_eq!(p.len(), 20);
        assert!(p.has_more());
        assert_eq!(p.items().last(), Some(&twentieth));

        let next = decode_cursor(p.next_cursor().unwrap()).unwrap();
        assert_eq!(next.sort_key, KeyValue::from_row(&twentieth, "created_at"));
        assert_eq!(next.tiebreak_id, KeyValue::Int(20));
        assert_eq!(next.direction, Direction::Forward);
    }

    #[test]
    fn test_empty_page() {
        let p = page(Vec::new(), 20, Direction::Forward, true);
        assert!(p.is_empty());
        assert!(!p.has_more());
        assert_eq!(p.next_cursor(), None);
        assert_eq!(p.previous_cursor(), None);
    }

    #[test]
    fn test_forward_from_cursor_has_previous() {
        let p = page(rows(5), 10, Direction::Forward, true);
        let prev = decode_cursor(p.previous_cursor().unwrap()).unwrap();
        assert_eq!(prev.tiebreak_id, KeyValue::Int(1));
        assert_eq!(prev.direction, Direction::Backward);
        assert_eq!(p.next_cursor(), None);
    }

    #[test]
    fn test_backward_page_is_reversed_into_display_order() {
        // Nearest-first rows 9,8,7,6 plus probe row 5
        let mut raw = rows(9);
        raw.reverse();
        raw.truncate(5);
        let p = page(raw, 4, Direction::Backward, true);

        let ids: Vec<_> = p.items().iter().map(|r| r["id"].as_u64().unwrap()).collect();
        assert_eq!(ids, vec![6, 7, 8, 9]);
        assert!(p.has_more());

        let prev = decode_cursor(p.previous_cursor().unwrap()).unwrap();
        assert_eq!(prev.tiebreak_id, KeyValue::Int(6));
        let next = decode_cursor(p.next_cursor().unwrap()).unwrap();
        assert_eq!(next.tiebreak_id, KeyValue::Int(9));
        assert_eq!(next.direction, Direction::Forward);
    }

    #[test]
    fn test_select_fields() {
        let row = json!({"id": 1, "client": "Acme", "amount": 1200, "notes": "long text"});
        let row = row.as_object().unwrap();
        let projected = select_fields(row, &["amount", "id", "missing", "id"]);
        assert_eq!(projected.len(), 2);
        let keys: Vec<_> = projected.keys().cloned().collect();
        assert_eq!(keys, vec!["amount".to_string(), "id".to_string()]);
        assert!(select_fields::<&str>(row, &[]).is_empty());
    }

    #[test]
    fn test_map_keeps_cursors() {
        let p = page(rows(3), 2, Direction::Forward, false);
        let next = p.next_cursor().map(str::to_string);
        let ids = p.map(|r| r["id"].clone());
        assert_eq!(ids.next_cursor().map(str::to_string), next);
        assert_eq!(ids.items(), &[json!(1), json!(2)]);
    }
}
