//! Pagination for list endpoints.
//!
//! Every list endpoint accepts `limit`, `offset` and `page` in the query
//! string and answers with `{ "data": [...], "meta": PaginationMeta }`.
//!
//! - `limit` is clamped to `[1, 100]` and defaults to 10
//! - `page` is 1-indexed and, when present, wins over `offset`
//! - `offset` is never negative
//!
//! ```ignore
//! // GET /api/courses?department=CS&limit=20&page=2
//! let limit = filters.pagination.limit();   // 20
//! let offset = filters.pagination.offset(); // 20
//! let meta = PaginationMeta::new(total, &filters.pagination);
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Query strings deliver every value as text; an empty value means "unset".
fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s.parse::<i64>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    /// Total number of rows matching the filters
    pub total: i64,
    /// The limit that was applied
    pub limit: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    /// Whether rows remain after this page
    pub has_more: bool,
}

impl PaginationMeta {
    /// Builds the metadata for a page cut from `total` matching rows.
    #[must_use]
    pub fn new(total: i64, params: &PaginationParams) -> Self {
        let limit = params.limit();
        let offset = params.offset();
        Self {
            total,
            limit,
            offset: Some(offset),
            page: params.page(),
            has_more: offset + limit < total,
        }
    }
}

#[derive(Debug, Clone, Hash, Deserialize, ToSchema, IntoParams)]
pub struct PaginationParams {
    /// Maximum number of items to return (1-100, default: 10)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
    /// Number of items to skip (ignored when `page` is set)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub offset: Option<i64>,
    /// Page number, 1-indexed
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            limit: Some(DEFAULT_LIMIT),
            offset: Some(0),
            page: None,
        }
    }
}

impl PaginationParams {
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    #[must_use]
    pub fn offset(&self) -> i64 {
        match self.page {
            Some(page) => (page.max(1) - 1) * self.limit(),
            None => self.offset.unwrap_or(0).max(0),
        }
    }

    #[must_use]
    pub fn page(&self) -> Option<i64> {
        self.page.map(|p| p.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(limit: Option<i64>, offset: Option<i64>, page: Option<i64>) -> PaginationParams {
        PaginationParams {
            limit,
            offset,
            page,
        }
    }

    #[test]
    fn test_defaults() {
        let p = PaginationParams::default();
        assert_eq!(p.limit(), 10);
        assert_eq!(p.offset(), 0);
        assert_eq!(p.page(), None);
    }

    #[test]
    fn test_limit_is_clamped() {
        assert_eq!(params(Some(0), None, None).limit(), 1);
        assert_eq!(params(Some(-3), None, None).limit(), 1);
        assert_eq!(params(Some(500), None, None).limit(), 100);
        assert_eq!(params(Some(100), None, None).limit(), 100);
    }

    #[test]
    fn test_page_wins_over_offset() {
        let p = params(Some(20), Some(7), Some(3));
        assert_eq!(p.offset(), 40);
        assert_eq!(p.page(), Some(3));
    }

    #[test]
    fn test_page_zero_is_first_page() {
        let p = params(Some(10), None, Some(0));
        assert_eq!(p.offset(), 0);
        assert_eq!(p.page(), Some(1));
    }

    #[test]
    fn test_negative_offset() {
        assert_eq!(params(None, Some(-5), None).offset(), 0);
    }

    #[test]
    fn test_meta_has_more() {
        let p = params(Some(10), Some(0), None);
        assert!(PaginationMeta::new(25, &p).has_more);

        let last = params(Some(10), Some(20), None);
        let meta = PaginationMeta::new(25, &last);
        assert!(!meta.has_more);
        assert_eq!(meta.offset, Some(20));
        assert_eq!(meta.total, 25);
    }

    #[test]
    fn test_deserialize_empty_strings_as_unset() {
        let p: PaginationParams =
            serde_json::from_str(r#"{"limit":"","offset":"15","page":null}"#).unwrap();
        assert_eq!(p.limit, None);
        assert_eq!(p.offset, Some(15));
        assert_eq!(p.page, None);
    }

    #[test]
    fn test_deserialize_rejects_garbage() {
        let result: Result<PaginationParams, _> = serde_json::from_str(r#"{"limit":"ten"}"#);
        assert!(result.is_err());
    }
}
