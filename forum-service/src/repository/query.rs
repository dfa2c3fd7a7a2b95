//! Query description types consumed by stores
//!
//! A [`QueryState`] describes "the set of entities matching the criteria so
//! far, in some order". List endpoints build one through a fixed pipeline of
//! refinement steps and hand it to a store, which evaluates it together with a
//! [`Pagination`] window.
//!
//! Field names are `&'static str` throughout: they can only come from the
//! constant profiles compiled into the service, never from request input.
//!
//! # Example
//!
//! ```rust
//! use forum_service::repository::{
//!     FilterCondition, OrderDirection, Pagination, QueryState, SortSpec, TextSearch,
//! };
//!
//! let query = QueryState::scoped(vec![FilterCondition::eq("article_type", "solution")])
//!     .with_search(TextSearch::new(&["title", "content"], "Tokio"))
//!     .with_filter(FilterCondition::eq("status", "published"))
//!     .with_sort(SortSpec::new("created_at", OrderDirection::Descending));
//!
//! assert_eq!(query.scope.len(), 1);
//! assert_eq!(query.filters.len(), 1);
//! assert_eq!(Pagination::page(3, 10).offset, 20);
//! ```

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};

use super::traits::Record;

/// Direction for ordering results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    /// Smallest first
    #[default]
    Ascending,
    /// Largest first
    Descending,
}

impl OrderDirection {
    /// Parameter spelling used by list endpoints
    #[must_use]
    pub const fn as_param(&self) -> &'static str {
        match self {
            Self::Ascending => "ascend",
            Self::Descending => "descend",
        }
    }

    /// Parse the parameter spelling, rejecting anything else
    #[must_use]
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "ascend" => Some(Self::Ascending),
            "descend" => Some(Self::Descending),
            _ => None,
        }
    }

    /// Orient an ascending comparison result
    #[must_use]
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

/// Offset/limit window over an ordered result set
///
/// ```rust
/// use forum_service::repository::Pagination;
///
/// let page = Pagination::page(2, 10);
/// assert_eq!(page.offset, 10);
/// assert_eq!(page.limit, 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Number of results to skip
    pub offset: u64,
    /// Maximum number of results to return
    pub limit: u64,
}

impl Pagination {
    #[must_use]
    pub const fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// Window for a 1-indexed page number
    #[must_use]
    pub const fn page(page_number: u64, page_size: u64) -> Self {
        let offset = page_number.saturating_sub(1).saturating_mul(page_size);
        Self {
            offset,
            limit: page_size,
        }
    }
}

/// Comparison operators for filter conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Equal,
    GreaterThanOrEqual,
    LessThanOrEqual,
    /// List-valued field contains the value
    Includes,
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal => write!(f, "="),
            Self::GreaterThanOrEqual => write!(f, ">="),
            Self::LessThanOrEqual => write!(f, "<="),
            Self::Includes => write!(f, "INCLUDES"),
        }
    }
}

/// A typed value, used both as a filter operand and as a record's field value
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    String(String),
    Integer(i64),
    Timestamp(DateTime<Utc>),
    StringList(Vec<String>),
    Null,
}

impl FilterValue {
    fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Integer(_) => 1,
            Self::Timestamp(_) => 2,
            Self::String(_) => 3,
            Self::StringList(_) => 4,
        }
    }

    /// Compare two scalar values of the same type
    ///
    /// Returns `None` when the values are not comparable (different types or
    /// list values).
    #[must_use]
    pub fn partial_compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(b)),
            (Self::Timestamp(a), Self::Timestamp(b)) => Some(a.cmp(b)),
            (Self::Null, Self::Null) => Some(Ordering::Equal),
            _ => None,
        }
    }

    /// Total order used for sorting; nulls first, mismatched types by kind
    #[must_use]
    pub fn sort_compare(&self, other: &Self) -> Ordering {
        self.partial_compare(other)
            .unwrap_or_else(|| self.rank().cmp(&other.rank()))
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<DateTime<Utc>> for FilterValue {
    fn from(at: DateTime<Utc>) -> Self {
        Self::Timestamp(at)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(list: Vec<String>) -> Self {
        Self::StringList(list)
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// A single exact-match or range predicate
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCondition {
    pub field: &'static str,
    pub operator: FilterOperator,
    pub value: FilterValue,
}

impl FilterCondition {
    pub fn new(field: &'static str, operator: FilterOperator, value: FilterValue) -> Self {
        Self {
            field,
            operator,
            value,
        }
    }

    pub fn eq(field: &'static str, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::Equal, value.into())
    }

    pub fn gte(field: &'static str, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::GreaterThanOrEqual, value.into())
    }

    pub fn lte(field: &'static str, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::LessThanOrEqual, value.into())
    }

    pub fn includes(field: &'static str, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::Includes, value.into())
    }

    /// Evaluate the predicate against a record's field value
    #[must_use]
    pub fn matches(&self, actual: &FilterValue) -> bool {
        let ordering = || actual.partial_compare(&self.value);
        match self.operator {
            FilterOperator::Equal => ordering() == Some(Ordering::Equal),
            FilterOperator::GreaterThanOrEqual => {
                matches!(ordering(), Some(Ordering::Greater | Ordering::Equal))
            }
            FilterOperator::LessThanOrEqual => {
                matches!(ordering(), Some(Ordering::Less | Ordering::Equal))
            }
            FilterOperator::Includes => match (actual, &self.value) {
                (FilterValue::StringList(list), FilterValue::String(s)) => list.contains(s),
                _ => false,
            },
        }
    }
}

/// Case-insensitive substring search over a fixed set of text fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSearch {
    pub fields: &'static [&'static str],
    term: String,
}

impl TextSearch {
    pub fn new(fields: &'static [&'static str], term: impl AsRef<str>) -> Self {
        Self {
            fields,
            term: term.as_ref().to_lowercase(),
        }
    }

    /// The lowercased search term
    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    #[must_use]
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        self.fields.iter().any(|field| {
            record
                .field(field)
                .as_ref()
                .and_then(FilterValue::as_str)
                .is_some_and(|text| text.to_lowercase().contains(&self.term))
        })
    }
}

/// Resolved ordering: a whitelisted field and a direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: &'static str,
    pub direction: OrderDirection,
}

impl SortSpec {
    #[must_use]
    pub const fn new(field: &'static str, direction: OrderDirection) -> Self {
        Self { field, direction }
    }
}

/// Immutable-by-convention accumulator describing a list query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryState {
    /// Conditions defining the resource's base set
    pub scope: Vec<FilterCondition>,
    pub search: Option<TextSearch>,
    pub filters: Vec<FilterCondition>,
    pub sort: Option<SortSpec>,
}

impl QueryState {
    /// Every entity of the resource
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Entities matching the given base conditions
    #[must_use]
    pub fn scoped(scope: Vec<FilterCondition>) -> Self {
        Self {
            scope,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_search(mut self, search: TextSearch) -> Self {
        self.search = Some(search);
        self
    }

    #[must_use]
    pub fn with_filter(mut self, condition: FilterCondition) -> Self {
        self.filters.push(condition);
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Whether a record belongs to the described set
    #[must_use]
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        let holds = |condition: &FilterCondition| {
            let actual = record.field(condition.field).unwrap_or(FilterValue::Null);
            condition.matches(&actual)
        };
        self.scope.iter().all(holds)
            && self.search.as_ref().map_or(true, |search| search.matches(record))
            && self.filters.iter().all(holds)
    }

    /// Ordering of two records under this query
    ///
    /// Ties on the sort field are broken by id in the same direction, so
    /// repeated identical queries page through the same sequence. Without a
    /// sort spec records are ordered by ascending id.
    #[must_use]
    pub fn compare<R: Record>(&self, a: &R, b: &R) -> Ordering {
        match self.sort {
            Some(SortSpec { field, direction }) => {
                let left = a.field(field).unwrap_or(FilterValue::Null);
                let right = b.field(field).unwrap_or(FilterValue::Null);
                direction.apply(left.sort_compare(&right).then_with(|| a.id().cmp(&b.id())))
            }
            None => a.id().cmp(&b.id()),
        }
    }
}
