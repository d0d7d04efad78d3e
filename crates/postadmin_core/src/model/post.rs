//! Post domain model.
//!
//! # Responsibility
//! - Define the stored post record and its create/update payloads.
//! - Validate payloads before they reach a repository.
//!
//! # Invariants
//! - `image_url` empty means "no image".
//! - `category_id` empty means "uncategorized"; creation still requires one.
//! - `timestamp` is wall-clock creation time in epoch ms and is not unique.

use super::{require_text, ValidationError};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Store-assigned post identifier.
pub type PostId = String;

/// Content record as held in a store snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Post {
    /// Empty for unsaved drafts.
    pub id: PostId,
    pub title: String,
    pub description: String,
    pub content: String,
    pub image_url: String,
    pub category_id: String,
    /// Unix epoch milliseconds.
    pub timestamp: i64,
}

impl Post {
    /// Returns the replaceable field set of this post.
    pub fn fields(&self) -> PostFields {
        PostFields {
            title: self.title.clone(),
            description: self.description.clone(),
            content: self.content.clone(),
            image_url: self.image_url.clone(),
            category_id: self.category_id.clone(),
            timestamp: self.timestamp,
        }
    }

    /// Whether an image reference is attached.
    pub fn has_image(&self) -> bool {
        !self.image_url.is_empty()
    }
}

/// User input for creating a post; the image is uploaded before persistence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PostDraft {
    pub title: String,
    pub description: String,
    pub content: String,
    pub category_id: String,
    pub image: Vec<u8>,
}

impl PostDraft {
    /// Validates the draft the same way the create form does.
    ///
    /// # Errors
    /// - `EmptyField` for blank title/description/content/category.
    /// - `MissingImage` when no image bytes were supplied.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        require_text("description", &self.description)?;
        require_text("content", &self.content)?;
        if self.image.is_empty() {
            return Err(ValidationError::MissingImage);
        }
        require_text("category_id", &self.category_id)?;
        Ok(())
    }
}

/// Fully-resolved record handed to `PostRepository::create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub description: String,
    pub content: String,
    pub image_url: String,
    pub category_id: String,
    pub timestamp: i64,
}

impl NewPost {
    /// Builds a record from a validated draft, an uploaded image URL and
    /// the creation time.
    pub fn from_draft(draft: &PostDraft, image_url: impl Into<String>, timestamp: i64) -> Self {
        Self {
            title: draft.title.clone(),
            description: draft.description.clone(),
            content: draft.content.clone(),
            image_url: image_url.into(),
            category_id: draft.category_id.clone(),
            timestamp,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        validate_timestamp(self.timestamp)
    }

    pub(crate) fn into_post(self, id: PostId) -> Post {
        Post {
            id,
            title: self.title,
            description: self.description,
            content: self.content,
            image_url: self.image_url,
            category_id: self.category_id,
            timestamp: self.timestamp,
        }
    }
}

/// Full-replacement update payload; every field is rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PostFields {
    pub title: String,
    pub description: String,
    pub content: String,
    pub image_url: String,
    pub category_id: String,
    pub timestamp: i64,
}

impl PostFields {
    /// Edit path only guards the title and timestamp; other fields may be
    /// cleared by the editor.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        validate_timestamp(self.timestamp)
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

fn validate_timestamp(value: i64) -> Result<(), ValidationError> {
    if value < 0 {
        return Err(ValidationError::InvalidTimestamp(value));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{PostDraft, PostFields};
    use crate::model::ValidationError;

    fn draft() -> PostDraft {
        PostDraft {
            title: "Title".to_string(),
            description: "Desc".to_string(),
            content: "Body".to_string(),
            category_id: "c1".to_string(),
            image: vec![1, 2, 3],
        }
    }

    #[test]
    fn complete_draft_is_valid() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn draft_requires_category_and_image() {
        let mut missing_category = draft();
        missing_category.category_id = "  ".to_string();
        assert_eq!(
            missing_category.validate(),
            Err(ValidationError::EmptyField("category_id"))
        );

        let mut missing_image = draft();
        missing_image.image.clear();
        assert_eq!(missing_image.validate(), Err(ValidationError::MissingImage));
    }

    #[test]
    fn fields_reject_negative_timestamp() {
        let fields = PostFields {
            title: "t".to_string(),
            timestamp: -1,
            ..PostFields::default()
        };
        assert_eq!(
            fields.validate(),
            Err(ValidationError::InvalidTimestamp(-1))
        );
    }
}
