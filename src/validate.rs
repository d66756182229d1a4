//! Client-side request validation.
//!
//! Request DTOs implement [`Validate`] so endpoint functions can reject
//! malformed input before any network I/O. A failure is a
//! [`ValidationError`] naming the offending wire field.

use std::fmt::Display;

/// Field-level validation failure, produced before a request is sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required field was absent.
    #[error("{field} is required")]
    Required {
        /// Wire name of the missing field.
        field: &'static str,
    },

    /// A field was present but violates its constraint.
    #[error("{field} does not match. {constraint}")]
    NotMatch {
        /// Wire name of the offending field.
        field: &'static str,
        /// Human-readable constraint, e.g. `5 <= x <= 100`.
        constraint: String,
    },
}

impl ValidationError {
    /// The wire name of the field that failed validation.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Required { field } | ValidationError::NotMatch { field, .. } => field,
        }
    }
}

/// Self-check implemented by request types.
pub trait Validate {
    /// Returns the first validation failure found, depth-first.
    fn validate(&self) -> Result<(), ValidationError>;
}

impl<T: Validate> Validate for Option<T> {
    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Some(inner) => inner.validate(),
            None => Ok(()),
        }
    }
}

impl<T: Validate> Validate for [T] {
    fn validate(&self) -> Result<(), ValidationError> {
        self.iter().try_for_each(Validate::validate)
    }
}

/// Returns the value if present, or `Required` naming `field`.
pub(crate) fn require<'a, T>(
    value: &'a Option<T>,
    field: &'static str,
) -> Result<&'a T, ValidationError> {
    value.as_ref().ok_or(ValidationError::Required { field })
}

/// Checks a path parameter such as a serial number or task id.
///
/// The value is percent-encoded into a single segment when the path is
/// built, but `.` and `..` stay dot segments even when encoded, so they
/// are rejected here.
pub(crate) fn require_path_segment(value: &str, field: &'static str) -> Result<(), ValidationError> {
    match value {
        "" => Err(ValidationError::Required { field }),
        "." | ".." => Err(ValidationError::NotMatch {
            field,
            constraint: "not . or ..".to_string(),
        }),
        _ => Ok(()),
    }
}

/// Closed-interval check: `min <= value <= max`.
pub(crate) fn check_range<T>(value: T, min: T, max: T, field: &'static str) -> Result<(), ValidationError>
where
    T: PartialOrd + Display,
{
    if value < min || value > max {
        return Err(ValidationError::NotMatch {
            field,
            constraint: format!("{min} <= x <= {max}"),
        });
    }
    Ok(())
}

/// `None` passes; `Some` of an empty list does not.
pub(crate) fn check_not_empty<T>(value: &Option<Vec<T>>, field: &'static str) -> Result<(), ValidationError> {
    match value {
        Some(items) if items.is_empty() => Err(ValidationError::NotMatch {
            field,
            constraint: "not empty".to_string(),
        }),
        _ => Ok(()),
    }
}
