use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::Violations;
use crate::repository::{FilterValue, Record, RepositoryError, RepositoryOperation};

pub const ARTICLE_STATUSES: &[&str] = &["draft", "published"];
pub const ARTICLE_TYPES: &[&str] = &["article", "question", "solution"];

pub const DEFAULT_ARTICLE_STATUS: &str = "published";
pub const DEFAULT_ARTICLE_TYPE: &str = "article";

/// Article type of entries listed by the solutions endpoint
pub const SOLUTION_TYPE: &str = "solution";

const TITLE_MAX_CHARS: usize = 255;
const CONTENT_MAX_CHARS: usize = 100_000;
const TAG_MAX_CHARS: usize = 30;
const MAX_TAGS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub status: String,
    pub article_type: String,
    pub user_id: i64,
    pub tags: Vec<String>,
    pub likes_count: i64,
    pub comments_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Article {
    const ENTITY: &'static str = "Article";

    fn id(&self) -> i64 {
        self.id
    }

    fn field(&self, name: &str) -> Option<FilterValue> {
        let value = match name {
            "id" => self.id.into(),
            "title" => self.title.as_str().into(),
            "content" => self.content.as_str().into(),
            "status" => self.status.as_str().into(),
            "article_type" => self.article_type.as_str().into(),
            "user_id" => self.user_id.into(),
            "tags" => self.tags.clone().into(),
            "likes_count" => self.likes_count.into(),
            "comments_count" => self.comments_count.into(),
            "created_at" => self.created_at.into(),
            "updated_at" => self.updated_at.into(),
            _ => return None,
        };
        Some(value)
    }
}

/// Accepted attributes when creating an article
///
/// Unknown keys in the request body are ignored by deserialization.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewArticle {
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<String>,
    pub article_type: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl NewArticle {
    pub fn validate(&self) -> Result<(), RepositoryError> {
        let mut violations = Violations::new();
        violations.require_text("title", self.title.as_deref(), TITLE_MAX_CHARS);
        check_common(
            &mut violations,
            self.content.as_deref(),
            self.status.as_deref(),
            self.article_type.as_deref(),
            self.tags.as_deref(),
        );
        violations.into_result(RepositoryOperation::Create)
    }
}

/// Accepted attributes when updating an article; absent fields stay unchanged
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ArticleChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<String>,
    pub article_type: Option<String>,
    /// `Some` replaces the whole tag set
    pub tags: Option<Vec<String>>,
}

impl ArticleChanges {
    pub fn validate(&self) -> Result<(), RepositoryError> {
        let mut violations = Violations::new();
        violations.optional_text("title", self.title.as_deref(), TITLE_MAX_CHARS);
        check_common(
            &mut violations,
            self.content.as_deref(),
            self.status.as_deref(),
            self.article_type.as_deref(),
            self.tags.as_deref(),
        );
        violations.into_result(RepositoryOperation::Update)
    }
}

fn check_common(
    violations: &mut Violations,
    content: Option<&str>,
    status: Option<&str>,
    article_type: Option<&str>,
    tags: Option<&[String]>,
) {
    if content.is_some_and(|c| c.chars().count() > CONTENT_MAX_CHARS) {
        violations.add(
            "content",
            "TOO_LONG",
            format!("content must be at most {CONTENT_MAX_CHARS} characters"),
        );
    }
    violations.one_of("status", status, ARTICLE_STATUSES);
    violations.one_of("article_type", article_type, ARTICLE_TYPES);

    if let Some(tags) = tags {
        let tags = normalize_tags(tags);
        if tags.len() > MAX_TAGS {
            violations.add("tags", "TOO_MANY", format!("at most {MAX_TAGS} tags allowed"));
        }
        if tags.iter().any(|t| t.chars().count() > TAG_MAX_CHARS) {
            violations.add(
                "tags",
                "TOO_LONG",
                format!("tags must be at most {TAG_MAX_CHARS} characters"),
            );
        }
    }
}

/// Trim tag names, drop blanks and duplicates, keep first-seen order
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
        if !normalized.iter().any(|seen| seen == tag) {
            normalized.push(tag.to_string());
        }
    }
    normalized
}
