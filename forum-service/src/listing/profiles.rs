//! Listing profiles of the forum resources
//!
//! A profile fixes, per list endpoint, the accepted parameters, the searchable
//! text fields, the filter whitelist and the sort whitelist with its default.

use super::params::{self, ParamSpec};
use crate::models::{
    ARTICLE_STATUSES, ARTICLE_TYPES, COMMENTABLE_ARTICLE, SOLUTION_TYPE, USER_GENDERS,
    USER_ROLES, USER_STATUSES,
};
use crate::repository::{FilterCondition, FilterOperator, OrderDirection, QueryState, SortSpec};

/// Maps a request parameter onto a predicate over an entity field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSpec {
    pub param: &'static str,
    pub field: &'static str,
    pub operator: FilterOperator,
}

impl FilterSpec {
    pub const fn exact(param: &'static str) -> Self {
        Self {
            param,
            field: param,
            operator: FilterOperator::Equal,
        }
    }

    pub const fn new(param: &'static str, field: &'static str, operator: FilterOperator) -> Self {
        Self {
            param,
            field,
            operator,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingProfile {
    pub name: &'static str,
    pub schema: params::ParamSchema,
    pub search_fields: &'static [&'static str],
    pub filters: &'static [FilterSpec],
    pub sort_fields: &'static [&'static str],
    pub default_sort: SortSpec,
}

impl ListingProfile {
    /// Whitelisted sort field matching `name`
    pub fn sort_field(&self, name: &str) -> Option<&'static str> {
        self.sort_fields.iter().copied().find(|field| *field == name)
    }
}

pub const SEARCH_PARAM: &str = "search";

const ARTICLE_SORT_FIELDS: &[&str] = &[
    "id",
    "title",
    "created_at",
    "updated_at",
    "likes_count",
    "comments_count",
];
const ARTICLE_SEARCH_FIELDS: &[&str] = &["title", "content"];
const ARTICLE_FILTERS: &[FilterSpec] = &[
    FilterSpec::exact("status"),
    FilterSpec::exact("article_type"),
    FilterSpec::exact("user_id"),
    FilterSpec::new("tag", "tags", FilterOperator::Includes),
    FilterSpec::new("created_from", "created_at", FilterOperator::GreaterThanOrEqual),
    FilterSpec::new("created_to", "created_at", FilterOperator::LessThanOrEqual),
];

const ARTICLE_PARAMS: &[ParamSpec] = &[
    params::page(),
    params::per(),
    params::choice("sort_field", "id", ARTICLE_SORT_FIELDS),
    params::choice("sort_order", "ascend", SORT_ORDERS),
    params::text(SEARCH_PARAM),
    params::optional_choice("status", ARTICLE_STATUSES),
    params::optional_choice("article_type", ARTICLE_TYPES),
    params::id("user_id"),
    params::text("tag"),
    params::timestamp("created_from"),
    params::timestamp_until("created_to"),
];

// Solutions are already scoped by article_type.
const SOLUTION_PARAMS: &[ParamSpec] = &[
    params::page(),
    params::per(),
    params::choice("sort_field", "id", ARTICLE_SORT_FIELDS),
    params::choice("sort_order", "ascend", SORT_ORDERS),
    params::text(SEARCH_PARAM),
    params::optional_choice("status", ARTICLE_STATUSES),
    params::id("user_id"),
    params::text("tag"),
    params::timestamp("created_from"),
    params::timestamp_until("created_to"),
];

const COMMENT_SORT_FIELDS: &[&str] = &["id", "created_at"];
const COMMENT_PARAMS: &[ParamSpec] = &[
    params::page(),
    params::per(),
    params::choice("sort_field", "created_at", COMMENT_SORT_FIELDS),
    params::choice("sort_order", "descend", SORT_ORDERS),
    params::text(SEARCH_PARAM),
    params::id("parent_id"),
];

const USER_SORT_FIELDS: &[&str] = &["id", "name", "nickname", "created_at", "updated_at"];
const USER_PARAMS: &[ParamSpec] = &[
    params::page(),
    params::per(),
    params::choice("sort_field", "id", USER_SORT_FIELDS),
    params::choice("sort_order", "ascend", SORT_ORDERS),
    params::text(SEARCH_PARAM),
    params::optional_choice("role", USER_ROLES),
    params::optional_choice("status", USER_STATUSES),
    params::optional_choice("gender", USER_GENDERS),
];

const SORT_ORDERS: &[&str] = &["ascend", "descend"];

pub const ARTICLES: ListingProfile = ListingProfile {
    name: "articles",
    schema: ARTICLE_PARAMS,
    search_fields: ARTICLE_SEARCH_FIELDS,
    filters: ARTICLE_FILTERS,
    sort_fields: ARTICLE_SORT_FIELDS,
    default_sort: SortSpec::new("id", OrderDirection::Ascending),
};

pub const SOLUTIONS: ListingProfile = ListingProfile {
    name: "solutions",
    schema: SOLUTION_PARAMS,
    search_fields: ARTICLE_SEARCH_FIELDS,
    filters: ARTICLE_FILTERS,
    sort_fields: ARTICLE_SORT_FIELDS,
    default_sort: SortSpec::new("id", OrderDirection::Ascending),
};

pub const COMMENTS: ListingProfile = ListingProfile {
    name: "comments",
    schema: COMMENT_PARAMS,
    search_fields: &["description"],
    filters: &[FilterSpec::exact("parent_id")],
    sort_fields: COMMENT_SORT_FIELDS,
    default_sort: SortSpec::new("created_at", OrderDirection::Descending),
};

pub const USERS: ListingProfile = ListingProfile {
    name: "users",
    schema: USER_PARAMS,
    search_fields: &["name", "nickname", "description"],
    filters: &[
        FilterSpec::exact("role"),
        FilterSpec::exact("status"),
        FilterSpec::exact("gender"),
    ],
    sort_fields: USER_SORT_FIELDS,
    default_sort: SortSpec::new("id", OrderDirection::Ascending),
};

/// Base set for the solutions listing
pub fn solutions_scope() -> QueryState {
    QueryState::scoped(vec![FilterCondition::eq("article_type", SOLUTION_TYPE)])
}

/// Base set for the comments of one article
pub fn article_comments_scope(article_id: i64) -> QueryState {
    QueryState::scoped(vec![
        FilterCondition::eq("commentable_id", article_id),
        FilterCondition::eq("commentable_type", COMMENTABLE_ARTICLE),
    ])
}
