//! Post use-case service.
//!
//! # Responsibility
//! - Run the create flow: validate draft, upload image, stamp creation
//!   time, persist.
//! - Provide list/edit/delete entry points over any `PostRepository`.
//!
//! # Invariants
//! - A failed image upload never leaves a post behind.
//! - A failed insert after upload removes the uploaded image (best effort).
//! - Edits rewrite all six mutable fields of the post.

use crate::blob::{BlobError, BlobStore};
use crate::model::post::{now_epoch_ms, NewPost, Post, PostDraft, PostId};
use crate::model::ValidationError;
use crate::repo::post_repo::PostRepository;
use crate::repo::RepoError;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for post use-cases.
#[derive(Debug)]
pub enum PostServiceError {
    Validation(ValidationError),
    /// Image upload failed; nothing was persisted.
    Upload(BlobError),
    PostNotFound(PostId),
    Repo(RepoError),
}

impl Display for PostServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Upload(err) => write!(f, "{err}"),
            Self::PostNotFound(id) => write!(f, "post not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PostServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Upload(err) => Some(err),
            Self::PostNotFound(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for PostServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { id, .. } => Self::PostNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationError> for PostServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

pub type PostServiceResult<T> = Result<T, PostServiceError>;

/// Post service facade over a store and a blob uploader.
pub struct PostService<R: PostRepository, B: BlobStore> {
    repo: R,
    blobs: B,
}

impl<R: PostRepository, B: BlobStore> PostService<R, B> {
    pub fn new(repo: R, blobs: B) -> Self {
        Self { repo, blobs }
    }

    /// Creates a post from a draft and returns the stored record.
    ///
    /// # Contract
    /// - `timestamp` is set to current wall-clock epoch ms.
    /// - `image_url` is the URL returned by the blob store.
    pub fn create_post(&self, draft: &PostDraft) -> PostServiceResult<Post> {
        draft.validate()?;

        let image_url = self.blobs.upload(&draft.image).map_err(|err| {
            error!("event=post_create module=service status=error stage=upload error={err}");
            PostServiceError::Upload(err)
        })?;

        let record = NewPost::from_draft(draft, image_url, now_epoch_ms());
        let id = match self.repo.create(&record) {
            Ok(id) => id,
            Err(err) => {
                error!("event=post_create module=service status=error stage=insert error={err}");
                if let Err(cleanup) = self.blobs.remove(&record.image_url) {
                    warn!("event=blob_cleanup module=service status=error error={cleanup}");
                }
                return Err(err.into());
            }
        };
        info!("event=post_create module=service status=ok post_id={id}");
        Ok(record.into_post(id))
    }

    /// Writes back an edited post by its id.
    pub fn edit_post(&self, post: &Post) -> PostServiceResult<()> {
        if post.id.is_empty() {
            return Err(ValidationError::EmptyField("id").into());
        }
        self.repo.update(&post.id, &post.fields())?;
        info!("event=post_edit module=service status=ok post_id={}", post.id);
        Ok(())
    }

    pub fn delete_post(&self, id: &str) -> PostServiceResult<()> {
        self.repo.delete(id)?;
        info!("event=post_delete module=service status=ok post_id={id}");
        Ok(())
    }

    pub fn get_post(&self, id: &str) -> PostServiceResult<Option<Post>> {
        Ok(self.repo.get(id)?)
    }

    /// Fetches the full post snapshot for a browse screen.
    pub fn list_posts(&self) -> PostServiceResult<Vec<Post>> {
        Ok(self.repo.fetch_all()?)
    }
}
