//! Identity and authorization
//!
//! Bearer tokens are checked by [`JwtAuth`](crate::middleware::JwtAuth); this
//! module turns the resulting claims into an [`Actor`] and decides what that
//! actor may do through a [`Policy`] per resource.
//!
//! # Example
//!
//! ```rust
//! use forum_service::auth::{Action, Actor, ArticlePolicy, Policy};
//!
//! let actor = Actor {
//!     id: 1,
//!     display_name: "ada".to_string(),
//!     avatar: None,
//!     role: "member".to_string(),
//!     status: "active".to_string(),
//! };
//! assert!(ArticlePolicy.authorize(&actor, Action::Create).is_allowed());
//! ```

pub mod actor;
pub mod issuer;
pub mod policy;

pub use actor::Actor;
pub use issuer::TokenIssuer;
pub use policy::{authorize, Action, ArticlePolicy, Decision, Policy, UserPolicy};
