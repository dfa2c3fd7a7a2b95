//! Search, filter and sort refinement steps
//!
//! Each step takes the current [`QueryState`] and returns a refined one.
//! [`compose`] applies them in the fixed order search → filter → sort; search
//! and filter only narrow the set, sort alone decides the order.

use super::params::{ParamBag, ParamValue};
use super::profiles::{ListingProfile, SEARCH_PARAM};
use crate::repository::{FilterCondition, FilterValue, OrderDirection, QueryState, SortSpec, TextSearch};

/// Narrow to entities whose search fields contain the `search` term
#[must_use]
pub fn search(query: QueryState, params: &ParamBag, profile: &ListingProfile) -> QueryState {
    match params.text(SEARCH_PARAM) {
        Some(term) if !term.is_empty() => {
            query.with_search(TextSearch::new(profile.search_fields, term))
        }
        _ => query,
    }
}

/// Apply one predicate per whitelisted filter parameter that has a value
#[must_use]
pub fn filter(query: QueryState, params: &ParamBag, profile: &ListingProfile) -> QueryState {
    profile.filters.iter().fold(query, |query, spec| {
        let value = match params.get(spec.param) {
            ParamValue::Integer(n) => FilterValue::Integer(*n),
            ParamValue::Text(text) => FilterValue::String(text.clone()),
            ParamValue::Timestamp(at) => FilterValue::Timestamp(*at),
            ParamValue::Absent => return query,
        };
        query.with_filter(FilterCondition::new(spec.field, spec.operator, value))
    })
}

/// Resolve `sort_field` / `sort_order` against the profile
///
/// A field outside the whitelist resolves to the default field, an unknown
/// order to the default direction.
#[must_use]
pub fn resolve_sort(params: &ParamBag, profile: &ListingProfile) -> SortSpec {
    let field = params
        .text("sort_field")
        .and_then(|name| profile.sort_field(name))
        .unwrap_or(profile.default_sort.field);
    let direction = params
        .text("sort_order")
        .and_then(OrderDirection::from_param)
        .unwrap_or(profile.default_sort.direction);
    SortSpec::new(field, direction)
}

#[must_use]
pub fn sort(query: QueryState, params: &ParamBag, profile: &ListingProfile) -> QueryState {
    query.with_sort(resolve_sort(params, profile))
}

/// Run the three steps in order
#[must_use]
pub fn compose(base: QueryState, params: &ParamBag, profile: &ListingProfile) -> QueryState {
    let query = search(base, params, profile);
    let query = filter(query, params, profile);
    sort(query, params, profile)
}
