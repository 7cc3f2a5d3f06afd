//! Request/response types for the users API.
//!
//! These payloads are shared between handlers and `OpenAPI` generation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const COUNT_DEFAULT: i64 = 10;
pub const COUNT_MAX: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
}

/// Body of `POST /users` and `PUT /users/{id}`.
///
/// Unknown fields (e.g. an `id` echoed back by a client) are ignored; the
/// path id is the only one that counts.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UserPayload {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteResult {
    pub result: String,
}

impl DeleteResult {
    #[must_use]
    pub fn success() -> Self {
        Self {
            result: "success".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

/// Normalized `count`/`start` for `GET /users`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub start: i64,
    pub count: i64,
}

impl Page {
    /// Clamp raw query values: `count` must be in `1..=10` or it falls back
    /// to 10, `start` below zero or unparsable becomes 0.
    #[must_use]
    pub fn from_query(count: Option<&str>, start: Option<&str>) -> Self {
        let count = count
            .and_then(|value| value.trim().parse::<i64>().ok())
            .filter(|value| (1..=COUNT_MAX).contains(value))
            .unwrap_or(COUNT_DEFAULT);

        let start = start
            .and_then(|value| value.trim().parse::<i64>().ok())
            .map_or(0, |value| value.max(0));

        Self { start, count }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            start: 0,
            count: COUNT_DEFAULT,
        }
    }
}

/// Path ids are plain decimal digits that fit the `SERIAL` column.
#[must_use]
pub fn parse_user_id(raw: &str) -> Option<i32> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<i32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_defaults_when_absent() {
        assert_eq!(Page::from_query(None, None), Page::default());
    }

    #[test]
    fn page_count_out_of_range_falls_back_to_ten() {
        assert_eq!(Page::from_query(Some("50"), None).count, 10);
        assert_eq!(Page::from_query(Some("0"), None).count, 10);
        assert_eq!(Page::from_query(Some("-3"), None).count, 10);
        assert_eq!(Page::from_query(Some("eleven"), None).count, 10);
    }

    #[test]
    fn page_count_in_range_is_kept() {
        assert_eq!(Page::from_query(Some("1"), None).count, 1);
        assert_eq!(Page::from_query(Some("7"), None).count, 7);
        assert_eq!(Page::from_query(Some("10"), None).count, 10);
    }

    #[test]
    fn page_start_is_never_negative() {
        assert_eq!(Page::from_query(None, Some("-1")).start, 0);
        assert_eq!(Page::from_query(None, Some("abc")).start, 0);
        assert_eq!(Page::from_query(None, Some("")).start, 0);
        assert_eq!(Page::from_query(None, Some("10")).start, 10);
    }

    #[test]
    fn user_id_accepts_digits_only() {
        assert_eq!(parse_user_id("1"), Some(1));
        assert_eq!(parse_user_id("0042"), Some(42));
        assert_eq!(parse_user_id("abc"), None);
        assert_eq!(parse_user_id("-1"), None);
        assert_eq!(parse_user_id("+1"), None);
        assert_eq!(parse_user_id("1.5"), None);
        assert_eq!(parse_user_id(""), None);
    }

    #[test]
    fn user_id_rejects_overflow() {
        assert_eq!(parse_user_id("2147483647"), Some(i32::MAX));
        assert_eq!(parse_user_id("2147483648"), None);
    }

    #[test]
    fn payload_ignores_unknown_fields() {
        let payload: Result<UserPayload, _> =
            serde_json::from_str(r#"{"id": 9, "name": "Ada", "email": "ada@example.com"}"#);
        assert!(payload.is_ok());
        if let Ok(payload) = payload {
            assert_eq!(payload.name, "Ada");
            assert_eq!(payload.email, "ada@example.com");
        }
    }

    #[test]
    fn payload_requires_both_fields() {
        let payload: Result<UserPayload, _> = serde_json::from_str(r#"{"name": "Ada"}"#);
        assert!(payload.is_err());
    }
}
