use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::Violations;
use crate::repository::{FilterValue, Record, RepositoryError, RepositoryOperation};

/// Commentable type recorded on every comment
pub const COMMENTABLE_ARTICLE: &str = "Article";

const DESCRIPTION_MAX_CHARS: usize = 1_000;

/// A comment on an article
///
/// `user_name` and `user_avatar` are copied from the author when the comment is
/// created and are never refreshed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub description: String,
    pub parent_id: Option<i64>,
    pub user_id: i64,
    pub user_name: String,
    pub user_avatar: Option<String>,
    pub commentable_id: i64,
    pub commentable_type: String,
    pub created_at: DateTime<Utc>,
}

impl Record for Comment {
    const ENTITY: &'static str = "Comment";

    fn id(&self) -> i64 {
        self.id
    }

    fn field(&self, name: &str) -> Option<FilterValue> {
        let value = match name {
            "id" => self.id.into(),
            "description" => self.description.as_str().into(),
            "parent_id" => self.parent_id.into(),
            "user_id" => self.user_id.into(),
            "user_name" => self.user_name.as_str().into(),
            "commentable_id" => self.commentable_id.into(),
            "commentable_type" => self.commentable_type.as_str().into(),
            "created_at" => self.created_at.into(),
            _ => return None,
        };
        Some(value)
    }
}

/// Request body for creating a comment
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CommentDraft {
    pub description: Option<String>,
    pub parent_id: Option<i64>,
}

/// Snapshot of the author's display identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentAuthor {
    pub id: i64,
    pub name: String,
    pub avatar: Option<String>,
}

/// A comment ready to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
    pub description: Option<String>,
    pub parent_id: Option<i64>,
    pub author: CommentAuthor,
    pub article_id: i64,
}

impl NewComment {
    pub fn new(draft: CommentDraft, author: CommentAuthor, article_id: i64) -> Self {
        Self {
            description: draft.description,
            parent_id: draft.parent_id,
            author,
            article_id,
        }
    }

    pub fn validate(&self) -> Result<(), RepositoryError> {
        let mut violations = Violations::new();
        violations.require_text(
            "description",
            self.description.as_deref(),
            DESCRIPTION_MAX_CHARS,
        );
        if self.parent_id.is_some_and(|id| id <= 0) {
            violations.add("parent_id", "INVALID", "parent_id must be a positive id");
        }
        violations.into_result(RepositoryOperation::Create)
    }
}
