//! Cursor-driven page fetching.

use crate::cursor::{decode_cursor_or_first_page, Direction};
use crate::error::FetchError;
use crate::pagination::{select_fields, to_cursor_paginated_result, CursorPage};
use crate::traits::{seek_direction, PageQuery, Row, RowProvider};

/// Fetches one page of `query` resuming from `cursor_token`.
///
/// A missing or undecodable token starts from the first page. Field
/// projection happens after cursors are built, so the sort and id columns
/// do not need to be among the requested fields.
///
/// # Arguments
/// * `provider` - Source of ordered rows
/// * `query` - Table, ordering and page size
/// * `cursor_token` - Token from a previous page's `next_cursor` or `previous_cursor`
pub fn fetch_page<P>(
    provider: &P,
    query: &PageQuery,
    cursor_token: Option<&str>,
) -> Result<CursorPage<Row>, FetchError>
where
    P: RowProvider + ?Sized,
{
    let position = decode_cursor_or_first_page(cursor_token);
    let direction = seek_direction(position.as_ref());
    let rows = provider.fetch_rows(query, position.as_ref())?;

    let page = to_cursor_paginated_result(
        rows,
        query.page_size,
        direction,
        position.is_some(),
        |row: &Row| query.sort_key_of(row),
        |row: &Row| query.id_of(row),
    );

    log::debug!(
        "fetched {} rows from {} ({:?}, has_more: {})",
        page.len(),
        query.table,
        direction,
        page.has_more()
    );

    Ok(match &query.fields {
        Some(fields) => page.map(|row| select_fields(&row, fields)),
        None => page,
    })
}

/// Fetches every row of `query` by following next cursors.
///
/// Used for exports; stops after `max_pages` pages.
pub fn fetch_all<P>(provider: &P, query: &PageQuery, max_pages: usize) -> Result<Vec<Row>, FetchError>
where
    P: RowProvider + ?Sized,
{
    let mut out = Vec::new();
    let mut token: Option<String> = None;
    for _ in 0..max_pages {
        let page = fetch_page(provider, query, token.as_deref())?;
        token = page.next_cursor().map(str::to_string);
        out.extend(page.into_items());
        if token.is_none() {
            break;
        }
    }
    Ok(out)
}

/// Direction a token would page in, defaulting to forward.
pub fn token_direction(cursor_token: Option<&str>) -> Direction {
    seek_direction(decode_cursor_or_first_page(cursor_token).as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_provider::MemoryProvider;
    use crate::traits::SortSpec;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn provider(n: i64) -> MemoryProvider {
        let mut p = MemoryProvider::new("test");
        for id in 1..=n {
            let row = json!({"id": id, "due": format!("2024-02-{:02}", (id % 3) + 1), "client": "Acme"});
            p.push_row("invoices", row.as_object().cloned().unwrap());
        }
        p
    }

    fn ids(page: &CursorPage<Row>) -> Vec<i64> {
        page.items().iter().map(|r| r["id"].as_i64().unwrap()).collect()
    }

    #[test]
    fn test_walk_forward_and_back() {
        let p = provider(10);
        let q = PageQuery::new("invoices", SortSpec::asc("due")).with_page_size(4);

        let first = fetch_page(&p, &q, None).unwrap();
        assert!(first.previous_cursor().is_none());
        let second = fetch_page(&p, &q, first.next_cursor()).unwrap();
        let third = fetch_page(&p, &q, second.next_cursor()).unwrap();
        assert_eq!(third.len(), 2);
        assert!(third.next_cursor().is_none());

        let back = fetch_page(&p, &q, third.previous_cursor()).unwrap();
        assert_eq!(ids(&back), ids(&second));
        let back = fetch_page(&p, &q, back.previous_cursor()).unwrap();
        assert_eq!(ids(&back), ids(&first));
        assert!(back.previous_cursor().is_none());
    }

    #[test]
    fn test_bad_token_restarts() {
        let p = provider(5);
        let q = PageQuery::new("invoices", SortSpec::asc("due")).with_page_size(2);
        let first = fetch_page(&p, &q, None).unwrap();
        let again = fetch_page(&p, &q, Some("garbage!")).unwrap();
        assert_eq!(ids(&first), ids(&again));
        assert_eq!(token_direction(Some("garbage!")), Direction::Forward);
    }

    #[test]
    fn test_projection_after_cursor() {
        let p = provider(3);
        let q = PageQuery::new("invoices", SortSpec::asc("due"))
            .with_page_size(2)
            .with_fields(["client"]);
        let page = fetch_page(&p, &q, None).unwrap();
        assert!(page.next_cursor().is_some());
        assert_eq!(page.items()[0], json!({"client": "Acme"}).as_object().cloned().unwrap());
    }

    #[test]
    fn test_fetch_all() {
        let p = provider(11);
        let q = PageQuery::new("invoices", SortSpec::desc("due")).with_page_size(3);
        assert_eq!(fetch_all(&p, &q, 100).unwrap().len(), 11);
        assert_eq!(fetch_all(&p, &q, 2).unwrap().len(), 6);
    }
}
