//! Request parameter normalization
//!
//! Every list endpoint declares its accepted parameters as a constant
//! [`ParamSchema`]. [`normalize`] turns the raw query string map into a
//! [`ParamBag`] holding exactly the declared keys. A caller value that fails
//! coercion or its constraint is replaced by the declared default; nothing is
//! ever rejected.
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use forum_service::listing::params::{self, normalize, ParamSpec};
//!
//! const SCHEMA: &[ParamSpec] = &[
//!     params::page(),
//!     params::per(),
//!     params::choice("sort_order", "ascend", &["ascend", "descend"]),
//! ];
//!
//! let raw = HashMap::from([
//!     ("per".to_string(), "500".to_string()),
//!     ("sort_order".to_string(), "descend".to_string()),
//!     ("admin".to_string(), "true".to_string()),
//! ]);
//! let bag = normalize(&raw, SCHEMA);
//!
//! assert_eq!(bag.integer("page"), Some(1));
//! assert_eq!(bag.integer("per"), Some(10));
//! assert_eq!(bag.text("sort_order"), Some("descend"));
//! assert!(bag.text("admin").is_none());
//! ```

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, Utc};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PER: i64 = 10;
pub const MAX_PER: i64 = 50;

/// Constraint and default of one declared parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Integer within `min..=max`
    Integer { default: i64, min: i64, max: i64 },
    /// Member of a fixed set; `default: None` means absent unless given
    Choice {
        default: Option<&'static str>,
        allowed: &'static [&'static str],
    },
    /// Free text, absent unless given
    Text,
    /// Positive integer identifier, absent unless given
    Id,
    /// RFC 3339 instant or a plain `YYYY-MM-DD` date, read as the first
    /// instant of that UTC day, or the last one for an `end_of_day` bound
    Timestamp { end_of_day: bool },
}

/// A declared parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
}

/// Ordered set of declared parameters for one endpoint
pub type ParamSchema = &'static [ParamSpec];

pub const fn integer(name: &'static str, default: i64, min: i64, max: i64) -> ParamSpec {
    ParamSpec {
        name,
        kind: ParamKind::Integer { default, min, max },
    }
}

pub const fn choice(
    name: &'static str,
    default: &'static str,
    allowed: &'static [&'static str],
) -> ParamSpec {
    ParamSpec {
        name,
        kind: ParamKind::Choice {
            default: Some(default),
            allowed,
        },
    }
}

pub const fn optional_choice(name: &'static str, allowed: &'static [&'static str]) -> ParamSpec {
    ParamSpec {
        name,
        kind: ParamKind::Choice {
            default: None,
            allowed,
        },
    }
}

pub const fn text(name: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        kind: ParamKind::Text,
    }
}

pub const fn id(name: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        kind: ParamKind::Id,
    }
}

pub const fn timestamp(name: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        kind: ParamKind::Timestamp { end_of_day: false },
    }
}

/// Inclusive upper bound; a plain date covers that whole day
pub const fn timestamp_until(name: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        kind: ParamKind::Timestamp { end_of_day: true },
    }
}

/// `page`, default 1
pub const fn page() -> ParamSpec {
    integer("page", DEFAULT_PAGE, 1, i64::MAX)
}

/// `per`, default 10, accepted range 1..=50
pub const fn per() -> ParamSpec {
    integer("per", DEFAULT_PER, 1, MAX_PER)
}

/// A normalized parameter value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Integer(i64),
    Text(String),
    Timestamp(DateTime<Utc>),
    Absent,
}

static ABSENT: ParamValue = ParamValue::Absent;

/// Normalized parameters; holds every key of the schema it came from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamBag {
    values: BTreeMap<&'static str, ParamValue>,
}

impl ParamBag {
    /// Value of a parameter; undeclared names read as absent
    #[must_use]
    pub fn get(&self, name: &str) -> &ParamValue {
        self.values.get(name).unwrap_or(&ABSENT)
    }

    #[must_use]
    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.get(name) {
            ParamValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn timestamp(&self, name: &str) -> Option<DateTime<Utc>> {
        match self.get(name) {
            ParamValue::Timestamp(at) => Some(*at),
            _ => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Build the parameter bag for a request
#[must_use]
pub fn normalize(raw: &HashMap<String, String>, schema: &[ParamSpec]) -> ParamBag {
    let values = schema
        .iter()
        .map(|spec| {
            let given = raw
                .get(spec.name)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty());
            let value = given
                .and_then(|value| coerce(spec.kind, value))
                .unwrap_or_else(|| default_value(spec.kind));
            (spec.name, value)
        })
        .collect();
    ParamBag { values }
}

fn coerce(kind: ParamKind, value: &str) -> Option<ParamValue> {
    match kind {
        ParamKind::Integer { min, max, .. } => value
            .parse::<i64>()
            .ok()
            .filter(|n| (min..=max).contains(n))
            .map(ParamValue::Integer),
        ParamKind::Choice { allowed, .. } => allowed
            .contains(&value)
            .then(|| ParamValue::Text(value.to_string())),
        ParamKind::Text => Some(ParamValue::Text(value.to_string())),
        ParamKind::Id => value
            .parse::<i64>()
            .ok()
            .filter(|n| *n > 0)
            .map(ParamValue::Integer),
        ParamKind::Timestamp { end_of_day } => {
            parse_timestamp(value, end_of_day).map(ParamValue::Timestamp)
        }
    }
}

fn default_value(kind: ParamKind) -> ParamValue {
    match kind {
        ParamKind::Integer { default, .. } => ParamValue::Integer(default),
        ParamKind::Choice {
            default: Some(default),
            ..
        } => ParamValue::Text(default.to_string()),
        ParamKind::Choice { default: None, .. }
        | ParamKind::Text
        | ParamKind::Id
        | ParamKind::Timestamp { .. } => ParamValue::Absent,
    }
}

fn parse_timestamp(value: &str, end_of_day: bool) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Some(at.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    let naive = if end_of_day {
        date.and_hms_nano_opt(23, 59, 59, 999_999_999)
    } else {
        date.and_hms_opt(0, 0, 0)
    };
    naive.map(|naive| naive.and_utc())
}
