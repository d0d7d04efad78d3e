//! Domain model for posts and categories.
//!
//! # Responsibility
//! - Define the records exchanged between stores, services and the
//!   filter engine.
//! - Own field-level validation for create/update payloads.
//!
//! # Invariants
//! - Identity strings are assigned by the store; an empty `id` means the
//!   record has not been persisted yet.
//! - Timestamps are Unix epoch milliseconds.

pub mod category;
pub mod post;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Field-level validation failure for post/category payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text field is empty after trimming.
    EmptyField(&'static str),
    /// Post creation requires image bytes.
    MissingImage,
    /// Timestamp is negative.
    InvalidTimestamp(i64),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "field `{field}` must not be empty"),
            Self::MissingImage => write!(f, "post image is required"),
            Self::InvalidTimestamp(value) => {
                write!(f, "timestamp must be non-negative epoch ms, got {value}")
            }
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(())
}
