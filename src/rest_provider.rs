//! Row provider for a PostgREST (Supabase) backend.
//!
//! Pages are fetched with keyset filters rather than offsets:
//!
//! ```text
//! GET {endpoint}/rest/v1/{table}
//!     ?select=...
//!     &order={sort}.asc.nullslast,{id}.asc
//!     &limit={page_size + 1}
//!     &or=({sort}.gt.K,and({sort}.eq.K,{id}.gt.I),{sort}.is.null)
//! ```
//!
//! Backward seeks mirror the order and comparison operators so the backend
//! returns the rows nearest to the cursor first.

use once_cell::sync::OnceCell;
use std::time::Duration;

use crate::config::BackendConfig;
use crate::cursor::{CursorPosition, Direction};
use crate::error::FetchError;
use crate::traits::{seek_direction, KeyValue, PageQuery, Row, RowProvider, SortDir};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct RestProvider {
    config: BackendConfig,
    /// Built lazily so construction never blocks and the client is created
    /// on the fetch thread.
    client: OnceCell<reqwest::blocking::Client>,
}

impl RestProvider {
    /// Creates a provider after validating `config`.
    pub fn new(config: BackendConfig) -> Result<Self, FetchError> {
        config.validate()?;
        Ok(Self {
            config,
            client: OnceCell::new(),
        })
    }

    fn client(&self) -> Result<&reqwest::blocking::Client, FetchError> {
        self.client.get_or_try_init(|| {
            reqwest::blocking::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .map_err(FetchError::Http)
        })
    }

    /// REST url of `table`.
    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.config.endpoint_url.trim_end_matches('/'), table)
    }
}

/// Formats a key as a PostgREST filter literal.
///
/// Text is always double-quoted so commas, dots and parentheses inside values
/// cannot break the `or=(...)` grammar.
pub fn filter_literal(key: &KeyValue) -> String {
    match key {
        KeyValue::Null => "null".to_string(),
        KeyValue::Int(i) => i.to_string(),
        KeyValue::Text(s) => {
            let escaped = s.replace('\\', "\\\\").replace('"', "\\\"");
            format!("\"{}\"", escaped)
        }
    }
}

/// `select` parameter: requested fields plus the sort and id columns.
pub fn select_param(query: &PageQuery) -> String {
    match &query.fields {
        None => "*".to_string(),
        Some(fields) => {
            let mut cols: Vec<&str> = Vec::with_capacity(fields.len() + 2);
            for f in fields
                .iter()
                .map(String::as_str)
                .chain([query.sort.field.as_str(), query.id_field.as_str()])
            {
                if !cols.contains(&f) {
                    cols.push(f);
                }
            }
            cols.join(",")
        }
    }
}

/// `order` parameter for a seek in `direction`.
pub fn order_param(query: &PageQuery, direction: Direction) -> String {
    let (dir, nulls) = match direction {
        Direction::Forward => (query.sort.dir, "nullslast"),
        Direction::Backward => (query.sort.dir.reversed(), "nullsfirst"),
    };
    format!(
        "{}.{}.{},{}.{}",
        query.sort.field,
        dir.as_str(),
        nulls,
        query.id_field,
        dir.as_str()
    )
}

/// Keyset filter selecting rows strictly after (forward) or before
/// (backward) `cursor` in canonical order. NULL sort keys sort last.
pub fn keyset_filter(query: &PageQuery, cursor: &CursorPosition) -> (&'static str, String) {
    let field = &query.sort.field;
    let id = &query.id_field;
    let after = matches!(cursor.direction, Direction::Forward);
    let op = match (query.sort.dir, after) {
        (SortDir::Asc, true) | (SortDir::Desc, false) => "gt",
        (SortDir::Asc, false) | (SortDir::Desc, true) => "lt",
    };
    let id_lit = filter_literal(&cursor.tiebreak_id);

    match (&cursor.sort_key, after) {
        (KeyValue::Null, true) => ("and", format!("({field}.is.null,{id}.{op}.{id_lit})")),
        (KeyValue::Null, false) => (
            "or",
            format!("({field}.not.is.null,and({field}.is.null,{id}.{op}.{id_lit}))"),
        ),
        (key, true) => {
            let k = filter_literal(key);
            (
                "or",
                format!("({field}.{op}.{k},and({field}.eq.{k},{id}.{op}.{id_lit}),{field}.is.null)"),
            )
        }
        (key, false) => {
            let k = filter_literal(key);
            ("or", format!("({field}.{op}.{k},and({field}.eq.{k},{id}.{op}.{id_lit}))"))
        }
    }
}

/// All query-string parameters for one page request.
pub fn query_params(query: &PageQuery, after: Option<&CursorPosition>) -> Vec<(String, String)> {
    let mut params = vec![
        ("select".to_string(), select_param(query)),
        ("order".to_string(), order_param(query, seek_direction(after))),
        ("limit".to_string(), query.limit().to_string()),
    ];
    if let Some(cursor) = after {
        let (name, value) = keyset_filter(query, cursor);
        params.push((name.to_string(), value));
    }
    params
}

/// Turns a response into rows: non-2xx statuses, bodies that are not a JSON
/// array of objects and pages longer than `limit` are errors.
pub fn parse_rows(status: reqwest::StatusCode, body: String, limit: usize) -> Result<Vec<Row>, FetchError> {
    if !status.is_success() {
        return Err(FetchError::Status { status, body });
    }

    let rows: Vec<Row> = serde_json::from_str(&body)
        .map_err(|e| FetchError::InvalidResponse(format!("expected a JSON array of objects: {e}")))?;
    if rows.len() > limit {
        return Err(FetchError::InvalidResponse(format!(
            "backend returned {} rows, limit was {}",
            rows.len(),
            limit
        )));
    }
    Ok(rows)
}

impl RowProvider for RestProvider {
    fn fetch_rows(
        &self,
        query: &PageQuery,
        after: Option<&CursorPosition>,
    ) -> Result<Vec<Row>, FetchError> {
        let url = self.table_url(&query.table);
        let params = query_params(query, after);
        log::debug!("GET {} {:?}", url, params);

        let res = self
            .client()?
            .get(&url)
            .query(&params)
            .header("apikey", &self.config.public_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .bearer_auth(self.config.bearer_token())
            .send()?;

        let status = res.status();
        let body = res.text()?;
        parse_rows(status, body, query.limit())
    }

    fn describe(&self) -> String {
        self.config.endpoint_url.clone()
    }
}
