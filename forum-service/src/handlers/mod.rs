//! REST handlers for the forum resources
//!
//! Handlers are generic over the [`ForumStore`](crate::repository::ForumStore)
//! in [`AppState`](crate::state::AppState) and return the response types of
//! this module, which implement `IntoResponse`:
//!
//! - [`ItemResponse`] renders `{"data": ...}`
//! - [`ListResponse`] renders `{"items": [...], "meta": {...}}`
//! - [`StatusMarker`] renders `{"error_code": 0}` or `{"error_code": 1}`
//! - [`ApiError`] renders the failure body with the matching status
//!
//! Routes are wired in [`routes`](crate::routes).

pub mod articles;
pub mod users;

mod error;
mod lookup;
mod payload;
mod record_id;
mod response;

// Re-export all public types
pub use articles::LikeView;
pub use error::{ApiError, ApiErrorKind, ApiOperation};
pub use lookup::fetch;
pub use payload::Payload;
pub use record_id::RecordId;
pub use response::{ItemResponse, ListResponse, PageMeta, StatusMarker};
