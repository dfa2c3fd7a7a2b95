use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::Violations;
use crate::repository::{FilterValue, Record, RepositoryError, RepositoryOperation};

pub const USER_ROLES: &[&str] = &["member", "admin"];
pub const USER_STATUSES: &[&str] = &["active", "blocked"];
pub const USER_GENDERS: &[&str] = &["male", "female", "unknown"];

pub const ROLE_ADMIN: &str = "admin";
pub const STATUS_ACTIVE: &str = "active";

pub const DEFAULT_ROLE: &str = "member";
pub const DEFAULT_STATUS: &str = STATUS_ACTIVE;
pub const DEFAULT_GENDER: &str = "unknown";

const NAME_MAX_CHARS: usize = 50;
const AVATAR_MAX_CHARS: usize = 255;
const DESCRIPTION_MAX_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub nickname: Option<String>,
    pub gender: String,
    pub avatar: Option<String>,
    pub role: String,
    pub status: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Nickname when set, otherwise the account name
    pub fn display_name(&self) -> &str {
        self.nickname
            .as_deref()
            .map(str::trim)
            .filter(|nick| !nick.is_empty())
            .unwrap_or(&self.name)
    }

    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    pub fn is_active(&self) -> bool {
        self.status == STATUS_ACTIVE
    }
}

impl Record for User {
    const ENTITY: &'static str = "User";

    fn id(&self) -> i64 {
        self.id
    }

    fn field(&self, name: &str) -> Option<FilterValue> {
        let value = match name {
            "id" => self.id.into(),
            "name" => self.name.as_str().into(),
            "nickname" => self.nickname.as_deref().into(),
            "gender" => self.gender.as_str().into(),
            "avatar" => self.avatar.as_deref().into(),
            "role" => self.role.as_str().into(),
            "status" => self.status.as_str().into(),
            "description" => self.description.as_deref().into(),
            "created_at" => self.created_at.into(),
            "updated_at" => self.updated_at.into(),
            _ => return None,
        };
        Some(value)
    }
}

/// Accepted attributes when registering a user
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewUser {
    pub name: Option<String>,
    pub nickname: Option<String>,
    pub gender: Option<String>,
    pub avatar: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), RepositoryError> {
        let mut violations = Violations::new();
        violations.require_text("name", self.name.as_deref(), NAME_MAX_CHARS);
        check_profile(
            &mut violations,
            Profile {
                nickname: self.nickname.as_deref(),
                gender: self.gender.as_deref(),
                avatar: self.avatar.as_deref(),
                role: self.role.as_deref(),
                status: self.status.as_deref(),
                description: self.description.as_deref(),
            },
        );
        violations.into_result(RepositoryOperation::Create)
    }
}

/// Profile changes; absent fields stay unchanged
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserChanges {
    pub name: Option<String>,
    pub nickname: Option<String>,
    pub gender: Option<String>,
    pub avatar: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
}

impl UserChanges {
    pub fn validate(&self) -> Result<(), RepositoryError> {
        let mut violations = Violations::new();
        violations.optional_text("name", self.name.as_deref(), NAME_MAX_CHARS);
        check_profile(
            &mut violations,
            Profile {
                nickname: self.nickname.as_deref(),
                gender: self.gender.as_deref(),
                avatar: self.avatar.as_deref(),
                role: self.role.as_deref(),
                status: self.status.as_deref(),
                description: self.description.as_deref(),
            },
        );
        violations.into_result(RepositoryOperation::Update)
    }

    /// Whether applying these changes would alter the user's role or status
    pub fn alters_standing(&self, user: &User) -> bool {
        self.role.as_deref().is_some_and(|role| role != user.role)
            || self.status.as_deref().is_some_and(|status| status != user.status)
    }
}

struct Profile<'a> {
    nickname: Option<&'a str>,
    gender: Option<&'a str>,
    avatar: Option<&'a str>,
    role: Option<&'a str>,
    status: Option<&'a str>,
    description: Option<&'a str>,
}

fn check_profile(violations: &mut Violations, profile: Profile<'_>) {
    check_max("nickname", profile.nickname, NAME_MAX_CHARS, violations);
    check_max("avatar", profile.avatar, AVATAR_MAX_CHARS, violations);
    check_max("description", profile.description, DESCRIPTION_MAX_CHARS, violations);
    violations.one_of("gender", profile.gender, USER_GENDERS);
    violations.one_of("role", profile.role, USER_ROLES);
    violations.one_of("status", profile.status, USER_STATUSES);
}

// Blank optional profile text is allowed; it clears the field.
fn check_max(field: &str, value: Option<&str>, max: usize, violations: &mut Violations) {
    if value.is_some_and(|text| text.chars().count() > max) {
        violations.add(field, "TOO_LONG", format!("{field} must be at most {max} characters"));
    }
}

/// Trim optional profile text; blank becomes `None`
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
