use std::fmt;

use super::Amount;

/// A request payload that cannot be stored as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: &'static str,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: &'static str) -> Self {
        Self { field, reason }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.reason)
    }
}

impl std::error::Error for ValidationError {}

/// A derived amount (a product or a sum) that does not fit in an `Amount`.
pub(crate) fn out_of_range(field: &'static str) -> ValidationError {
    ValidationError::new(field, "is out of range")
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    Ok(())
}

pub(crate) fn require_non_negative(
    field: &'static str,
    value: Amount,
) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new(field, "must not be negative"));
    }
    Ok(())
}

pub(crate) fn require_non_negative_opt(
    field: &'static str,
    value: Option<Amount>,
) -> Result<(), ValidationError> {
    match value {
        Some(v) => require_non_negative(field, v),
        None => Ok(()),
    }
}
