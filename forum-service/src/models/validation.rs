//! Field-level validation for write payloads
//!
//! Payload types check themselves into a [`Violations`] collection. A
//! non-empty collection turns into a `ValidationFailed` repository error whose
//! message lists every violation; endpoints log that detail and answer with
//! the generic failure marker.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::repository::{RepositoryError, RepositoryOperation};

/// One rejected field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub code: String,
    pub message: String,
}

/// Accumulates field errors for one payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Violations {
    errors: BTreeMap<String, Vec<FieldError>>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) {
        let field = field.into();
        let error = FieldError {
            field: field.clone(),
            code: code.into(),
            message: message.into(),
        };
        self.errors.entry(field).or_default().push(error);
    }

    /// Required, non-blank, at most `max` characters
    pub fn require_text(&mut self, field: &str, value: Option<&str>, max: usize) {
        match value.map(str::trim) {
            None | Some("") => self.add(field, "REQUIRED", format!("{field} is required")),
            Some(text) => self.check_length(field, text, max),
        }
    }

    /// Optional text; when present must be non-blank and at most `max` characters
    pub fn optional_text(&mut self, field: &str, value: Option<&str>, max: usize) {
        if let Some(text) = value {
            if text.trim().is_empty() {
                self.add(field, "BLANK", format!("{field} can't be blank"));
            } else {
                self.check_length(field, text, max);
            }
        }
    }

    /// Optional value that must belong to a fixed set
    pub fn one_of(&mut self, field: &str, value: Option<&str>, allowed: &[&str]) {
        if let Some(value) = value {
            if !allowed.contains(&value) {
                self.add(
                    field,
                    "NOT_ALLOWED",
                    format!("{field} must be one of: {}", allowed.join(", ")),
                );
            }
        }
    }

    fn check_length(&mut self, field: &str, text: &str, max: usize) {
        if text.chars().count() > max {
            self.add(
                field,
                "TOO_LONG",
                format!("{field} must be at most {max} characters"),
            );
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    pub fn field(&self, field: &str) -> Option<&[FieldError]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    /// `Ok(())` when nothing was rejected
    pub fn into_result(self, operation: RepositoryOperation) -> Result<(), RepositoryError> {
        if self.has_errors() {
            Err(RepositoryError::validation_failed(operation, self.to_string()))
        } else {
            Ok(())
        }
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in self.errors.values().flatten() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{} ({})", error.message, error.code)?;
            first = false;
        }
        Ok(())
    }
}
