//! Opaque cursor tokens for keyset pagination.
//!
//! A token carries the last-seen sort key, the tiebreak id and the seek
//! direction. Layout before encoding:
//!
//! ```text
//! +------------------------------+------------------------+
//! | compact JSON payload         | SHA-256(payload)[..8]  |
//! +------------------------------+------------------------+
//! ```
//!
//! The whole buffer is base64 URL-safe without padding, so tokens can travel
//! in query strings unchanged. The digest detects corruption and truncation;
//! it is not a MAC, and ordering semantics live in the backend query, not in
//! the token bytes.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::traits::{KeyValue, PageQuery, Row};

const CURSOR_VERSION: u8 = 1;
const CHECKSUM_LEN: usize = 8;
/// Tokens longer than this are rejected before any decoding work.
pub const MAX_TOKEN_LEN: usize = 4096;

/// Direction a cursor resumes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "f")]
    Forward,
    #[serde(rename = "b")]
    Backward,
}

/// Structured resume position: "continue after (sort_key, tiebreak_id)".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CursorPosition {
    pub sort_key: KeyValue,
    pub tiebreak_id: KeyValue,
    pub direction: Direction,
}

impl CursorPosition {
    pub fn new(sort_key: KeyValue, tiebreak_id: KeyValue, direction: Direction) -> Self {
        Self { sort_key, tiebreak_id, direction }
    }

    pub fn forward(sort_key: KeyValue, tiebreak_id: KeyValue) -> Self {
        Self::new(sort_key, tiebreak_id, Direction::Forward)
    }

    pub fn backward(sort_key: KeyValue, tiebreak_id: KeyValue) -> Self {
        Self::new(sort_key, tiebreak_id, Direction::Backward)
    }

    /// Builds the position of `row` under `query`.
    pub fn from_row(query: &PageQuery, row: &Row, direction: Direction) -> Self {
        Self::new(query.sort_key_of(row), query.id_of(row), direction)
    }
}

/// Cursor token could not be turned back into a position.
///
/// Callers treat this as "start from the first page".
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("empty cursor token")]
    Empty,
    #[error("cursor token exceeds {MAX_TOKEN_LEN} bytes")]
    TooLong,
    #[error("cursor token is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("cursor token is truncated")]
    Truncated,
    #[error("cursor checksum mismatch")]
    Checksum,
    #[error("cursor payload is malformed: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("unsupported cursor version {0}")]
    UnsupportedVersion(u8),
}

#[derive(Deserialize)]
struct WireCursor {
    v: u8,
    k: KeyValue,
    i: KeyValue,
    d: Direction,
}

fn key_to_json(key: &KeyValue) -> serde_json::Value {
    match key {
        KeyValue::Null => serde_json::Value::Null,
        KeyValue::Int(i) => serde_json::Value::Number((*i).into()),
        KeyValue::Text(s) => serde_json::Value::String(s.clone()),
    }
}

fn checksum(payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = Sha256::digest(payload);
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&digest[..CHECKSUM_LEN]);
    out
}

/// Encodes a position into an opaque, URL-safe token.
pub fn encode_cursor(position: &CursorPosition) -> String {
    let mut map = serde_json::Map::new();
    map.insert("v".to_string(), serde_json::Value::Number(CURSOR_VERSION.into()));
    map.insert("k".to_string(), key_to_json(&position.sort_key));
    map.insert("i".to_string(), key_to_json(&position.tiebreak_id));
    let d = match position.direction {
        Direction::Forward => "f",
        Direction::Backward => "b",
    };
    map.insert("d".to_string(), serde_json::Value::String(d.to_string()));

    let mut buf = serde_json::Value::Object(map).to_string().into_bytes();
    let sum = checksum(&buf);
    buf.extend_from_slice(&sum);
    URL_SAFE_NO_PAD.encode(buf)
}

/// Decodes a token produced by [`encode_cursor`].
///
/// Fails deterministically on malformed, truncated or altered tokens instead
/// of yielding a wrong position.
pub fn decode_cursor(token: &str) -> Result<CursorPosition, DecodeError> {
    if token.is_empty() {
        return Err(DecodeError::Empty);
    }
    if token.len() > MAX_TOKEN_LEN {
        return Err(DecodeError::TooLong);
    }

    let bytes = URL_SAFE_NO_PAD.decode(token)?;
    // Smallest payload is "{}"
    if bytes.len() < CHECKSUM_LEN + 2 {
        return Err(DecodeError::Truncated);
    }

    let (payload, sum) = bytes.split_at(bytes.len() - CHECKSUM_LEN);
    if checksum(payload) != sum {
        return Err(DecodeError::Checksum);
    }

    let wire: WireCursor = serde_json::from_slice(payload)?;
    if wire.v != CURSOR_VERSION {
        return Err(DecodeError::UnsupportedVersion(wire.v));
    }

    Ok(CursorPosition::new(wire.k, wire.i, wire.d))
}

/// Decodes an optional token, mapping failures to "first page".
pub fn decode_cursor_or_first_page(token: Option<&str>) -> Option<CursorPosition> {
    let token = token?;
    match decode_cursor(token) {
        Ok(position) => Some(position),
        Err(err) => {
            log::warn!("discarding cursor, restarting from first page: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> CursorPosition {
        CursorPosition::forward(KeyValue::Text("2024-03-31T10:00:00Z".into()), KeyValue::Int(20))
    }

    #[test]
    fn test_round_trip_basic() {
        let p = sample();
        let token = encode_cursor(&p);
        assert_eq!(decode_cursor(&token).unwrap(), p);
    }

    #[test]
    fn test_token_is_url_safe() {
        let p = CursorPosition::backward(KeyValue::Text("a/b+c?d=e&f".into()), KeyValue::Text("ü-id".into()));
        let token = encode_cursor(&p);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_eq!(decode_cursor(&token).unwrap(), p);
    }

    #[test]
    fn test_every_single_char_mutation_fails() {
        let token = encode_cursor(&sample());
        let alphabet = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

        for pos in 0..token.len() {
            let mut bytes = token.clone().into_bytes();
            let original = bytes[pos];
            // Pick a different alphabet char deterministically
            let replacement = alphabet
                .iter()
                .copied()
                .find(|&c| c != original)
                .unwrap();
            bytes[pos] = replacement;
            let mutated = String::from_utf8(bytes).unwrap();
            assert!(
                decode_cursor(&mutated).is_err(),
                "mutation at {} was accepted",
                pos
            );
        }
    }

    #[test]
    fn test_truncation_fails() {
        let token = encode_cursor(&sample());
        for len in 0..token.len() {
            assert!(decode_cursor(&token[..len]).is_err(), "prefix of len {} accepted", len);
        }
    }

    #[test]
    fn test_garbage_inputs() {
        assert!(matches!(decode_cursor(""), Err(DecodeError::Empty)));
        assert!(matches!(decode_cursor("!!!"), Err(DecodeError::Encoding(_))));
        assert!(matches!(decode_cursor("QUJD"), Err(DecodeError::Truncated)));
        let long = "A".repeat(MAX_TOKEN_LEN + 1);
        assert!(matches!(decode_cursor(&long), Err(DecodeError::TooLong)));
    }

    #[test]
    fn test_valid_checksum_bad_payload() {
        let payload = br#"{"v":1,"k":1}"#.to_vec();
        let mut buf = payload.clone();
        buf.extend_from_slice(&checksum(&payload));
        let token = URL_SAFE_NO_PAD.encode(buf);
        assert!(matches!(decode_cursor(&token), Err(DecodeError::Payload(_))));
    }

    #[test]
    fn test_unsupported_version() {
        let payload = br#"{"v":9,"k":1,"i":2,"d":"f"}"#.to_vec();
        let mut buf = payload.clone();
        buf.extend_from_slice(&checksum(&payload));
        let token = URL_SAFE_NO_PAD.encode(buf);
        assert!(matches!(decode_cursor(&token), Err(DecodeError::UnsupportedVersion(9))));
    }

    #[test]
    fn test_first_page_fallback() {
        assert_eq!(decode_cursor_or_first_page(None), None);
        assert_eq!(decode_cursor_or_first_page(Some("not-a-cursor")), None);
        let token = encode_cursor(&sample());
        assert_eq!(decode_cursor_or_first_page(Some(&token)), Some(sample()));
    }

    fn key_strategy() -> impl Strategy<Value = KeyValue> {
        prop_oneof![
            Just(KeyValue::Null),
            any::<i64>().prop_map(KeyValue::Int),
            ".*".prop_map(KeyValue::Text),
        ]
    }

    proptest! {
        #[test]
        fn prop_decode_inverts_encode(
            k in key_strategy(),
            i in key_strategy(),
            backward in any::<bool>(),
        ) {
            let direction = if backward { Direction::Backward } else { Direction::Forward };
            let p = CursorPosition::new(k, i, direction);
            let token = encode_cursor(&p);
            prop_assert_eq!(decode_cursor(&token).unwrap(), p);
        }
    }
}
