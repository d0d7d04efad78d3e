//! Category domain model.

use super::{require_text, ValidationError};
use serde::{Deserialize, Serialize};

/// Store-assigned category identifier.
pub type CategoryId = String;

/// Named grouping referenced by posts through `Post::category_id`.
///
/// Names are not required to be unique.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Category {
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Checks a category name before create/rename.
pub fn validate_category_name(name: &str) -> Result<(), ValidationError> {
    require_text("name", name)
}
