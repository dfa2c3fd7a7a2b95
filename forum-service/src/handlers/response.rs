//! Response types for REST handlers
//!
//! Standard wrappers for forum endpoints: single items render as
//! `{"data": ...}`, lists as `{"items": [...], "meta": {...}}`, and actions
//! that return no entity as `{"error_code": 0}`.
//!
//! # Example
//!
//! ```rust
//! use forum_service::handlers::{ItemResponse, ListResponse, PageMeta};
//!
//! let item = ItemResponse::new("hello");
//! assert_eq!(item.data, "hello");
//!
//! let list = ListResponse::new(vec![1, 2, 3], PageMeta::new(1, 10, 3));
//! assert_eq!(list.meta.page_count, 1);
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Single item response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemResponse<T> {
    pub data: T,
}

impl<T> ItemResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

impl<T: Serialize> IntoResponse for ItemResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Pagination metadata for list responses
///
/// `page_count` is `ceil(total / per_page)`. A page past the end keeps the
/// same metadata and simply has no items.
///
/// # Example
///
/// ```rust
/// use forum_service::handlers::PageMeta;
///
/// let meta = PageMeta::new(2, 10, 25);
/// assert_eq!(meta.page_count, 3);
/// assert_eq!(meta.offset(), 10);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageMeta {
    /// Number of matching items across all pages
    pub total: u64,
    /// Current page number (1-indexed)
    pub page: u64,
    pub per_page: u64,
    pub page_count: u64,
}

impl PageMeta {
    #[must_use]
    pub fn new(page: u64, per_page: u64, total: u64) -> Self {
        let per_page = per_page.max(1);
        Self {
            total,
            page: page.max(1),
            per_page,
            page_count: calculate_page_count(total, per_page),
        }
    }

    #[must_use]
    pub fn empty(per_page: u64) -> Self {
        Self::new(1, per_page, 0)
    }

    /// Number of items before the current page
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }
}

/// Ceiling division of `total` by `per_page`
fn calculate_page_count(total: u64, per_page: u64) -> u64 {
    total.div_ceil(per_page.max(1))
}

/// List response with pagination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> ListResponse<T> {
    pub fn new(items: Vec<T>, meta: PageMeta) -> Self {
        Self { items, meta }
    }

    pub fn empty(per_page: u64) -> Self {
        Self {
            items: Vec::new(),
            meta: PageMeta::empty(per_page),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Serialize> IntoResponse for ListResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Status marker for actions that do not return an entity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusMarker {
    pub error_code: u8,
}

impl StatusMarker {
    pub const SUCCESS: Self = Self { error_code: 0 };
    pub const FAILURE: Self = Self { error_code: 1 };
}

impl IntoResponse for StatusMarker {
    fn into_response(self) -> Response {
        let status = if self.error_code == 0 {
            StatusCode::OK
        } else {
            StatusCode::UNPROCESSABLE_ENTITY
        };
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_response_serializes_under_data() {
        let json = serde_json::to_value(ItemResponse::new(7)).unwrap();
        assert_eq!(json, serde_json::json!({ "data": 7 }));
    }

    #[test]
    fn test_page_meta_counts_pages() {
        let meta = PageMeta::new(2, 10, 25);
        assert_eq!(meta.page_count, 3);
        assert_eq!(meta.offset(), 10);
    }

    #[test]
    fn test_page_meta_exact_multiple() {
        assert_eq!(PageMeta::new(1, 10, 30).page_count, 3);
        assert_eq!(PageMeta::new(1, 10, 31).page_count, 4);
    }

    #[test]
    fn test_page_meta_empty() {
        let meta = PageMeta::empty(10);
        assert_eq!(meta.total, 0);
        assert_eq!(meta.page_count, 0);
        assert_eq!(meta.page, 1);
    }

    #[test]
    fn test_page_meta_zero_per_page_protected() {
        let meta = PageMeta::new(1, 0, 5);
        assert_eq!(meta.per_page, 1);
        assert_eq!(meta.page_count, 5);
    }

    #[test]
    fn test_page_beyond_end_keeps_metadata() {
        let meta = PageMeta::new(9, 10, 25);
        assert_eq!(meta.page, 9);
        assert_eq!(meta.total, 25);
        assert_eq!(meta.page_count, 3);
        assert_eq!(meta.offset(), 80);
    }

    #[test]
    fn test_list_response_shape() {
        let list = ListResponse::new(vec!["a"], PageMeta::new(1, 10, 1));
        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "items": ["a"],
                "meta": { "total": 1, "page": 1, "per_page": 10, "page_count": 1 }
            })
        );
    }

    #[test]
    fn test_status_marker() {
        assert_eq!(StatusMarker::SUCCESS.into_response().status(), StatusCode::OK);
        assert_eq!(
            StatusMarker::FAILURE.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
