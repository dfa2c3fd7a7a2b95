//! Forum entities and their write payloads
//!
//! Entities serialize as they are rendered. Write payloads deserialize from
//! request bodies, carry only whitelisted attributes and validate themselves.

pub mod article;
pub mod comment;
pub mod user;
pub mod validation;

pub use article::{
    normalize_tags, Article, ArticleChanges, NewArticle, ARTICLE_STATUSES, ARTICLE_TYPES,
    DEFAULT_ARTICLE_STATUS, DEFAULT_ARTICLE_TYPE, SOLUTION_TYPE,
};
pub use comment::{Comment, CommentAuthor, CommentDraft, NewComment, COMMENTABLE_ARTICLE};
pub use user::{
    NewUser, User, UserChanges, DEFAULT_GENDER, DEFAULT_ROLE, DEFAULT_STATUS, ROLE_ADMIN,
    STATUS_ACTIVE, USER_GENDERS, USER_ROLES, USER_STATUSES,
};
pub use validation::{FieldError, Violations};
