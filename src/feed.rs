//! Infinite-scroll item collection of a screen.

use crate::pagination::CursorPage;
use crate::traits::Row;
use crate::windowing::VisibleRange;

/// Rows loaded so far plus the cursor to continue from.
///
/// The feed only grows by appending forward pages. The windowing engine
/// reads `len()` and indexes; it never mutates the feed.
#[derive(Debug, Clone, Default)]
pub struct Feed {
    items: Vec<Row>,
    next_cursor: Option<String>,
    has_more: bool,
    pages_loaded: usize,
}

impl Feed {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Queries =====

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Row> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[Row] {
        &self.items
    }

    /// Rows inside `range`, clamped to what is loaded.
    pub fn slice(&self, range: &VisibleRange) -> &[Row] {
        let end = range.end_index.min(self.items.len());
        let start = range.start_index.min(end);
        &self.items[start..end]
    }

    pub fn next_cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref()
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn pages_loaded(&self) -> usize {
        self.pages_loaded
    }

    /// True until the first page has been applied.
    pub fn needs_initial_load(&self) -> bool {
        self.pages_loaded == 0
    }

    /// Whether the next page should be requested for the rendered `range`.
    ///
    /// True when more rows exist and the range ends within `threshold` rows
    /// of the end of the feed.
    pub fn should_fetch_more(&self, range: &VisibleRange, threshold: usize) -> bool {
        self.has_more
            && self.next_cursor.is_some()
            && range.end_index.saturating_add(threshold) >= self.items.len()
    }

    // ===== Mutations =====

    /// Appends a forward page and takes over its continuation.
    pub fn apply_page(&mut self, page: CursorPage<Row>) {
        self.has_more = page.has_more();
        self.next_cursor = page.next_cursor().map(str::to_string);
        self.items.extend(page.into_items());
        self.pages_loaded += 1;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::Direction;
    use crate::pagination::to_cursor_paginated_result;
    use crate::traits::KeyValue;
    use serde_json::json;

    fn page(ids: std::ops::RangeInclusive<i64>, page_size: usize) -> CursorPage<Row> {
        let rows = ids
            .map(|id| json!({"id": id}).as_object().cloned().unwrap())
            .collect();
        to_cursor_paginated_result(
            rows,
            page_size,
            Direction::Forward,
            false,
            |r: &Row| KeyValue::from_row(r, "id"),
            |r: &Row| KeyValue::from_row(r, "id"),
        )
    }

    #[test]
    fn test_apply_pages() {
        let mut feed = Feed::new();
        assert!(feed.needs_initial_load());
        feed.apply_page(page(1..=11, 10));
        assert_eq!(feed.len(), 10);
        assert!(feed.has_more());
        feed.apply_page(page(11..=15, 10));
        assert_eq!(feed.len(), 15);
        assert!(!feed.has_more());
        assert_eq!(feed.next_cursor(), None);
        assert_eq!(feed.pages_loaded(), 2);
    }

    #[test]
    fn test_should_fetch_more_near_end() {
        let mut feed = Feed::new();
        feed.apply_page(page(1..=51, 50));
        let near_top = VisibleRange { start_index: 0, end_index: 25, offset_top: 0.0 };
        let near_end = VisibleRange { start_index: 20, end_index: 45, offset_top: 0.0 };
        assert!(!feed.should_fetch_more(&near_top, 10));
        assert!(feed.should_fetch_more(&near_end, 10));
    }

    #[test]
    fn test_no_fetch_when_exhausted() {
        let mut feed = Feed::new();
        feed.apply_page(page(1..=5, 10));
        assert!(!feed.should_fetch_more(&VisibleRange::EMPTY, 100));
    }

    #[test]
    fn test_slice_and_reset() {
        let mut feed = Feed::new();
        feed.apply_page(page(1..=5, 10));
        let range = VisibleRange { start_index: 3, end_index: 50, offset_top: 0.0 };
        assert_eq!(feed.slice(&range).len(), 2);
        feed.reset();
        assert!(feed.is_empty());
        assert!(feed.needs_initial_load());
    }
}
