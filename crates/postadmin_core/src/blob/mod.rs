//! Image blob storage.
//!
//! # Responsibility
//! - Persist uploaded image bytes and hand back a reference URL that is
//!   stored in `Post::image_url`.
//!
//! # Invariants
//! - Every upload gets a fresh `images/<uuid>` object name; nothing is
//!   overwritten.
//! - Empty payloads are rejected before any I/O.
//! - `remove` only touches objects under the store's own `images/` dir.

use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const IMAGE_PREFIX: &str = "images";

pub type BlobResult<T> = Result<T, BlobError>;

/// Upload failure.
#[derive(Debug)]
pub enum BlobError {
    EmptyPayload,
    /// URL was not issued by this store.
    ForeignUrl(String),
    Io(std::io::Error),
}

impl Display for BlobError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "image payload is empty"),
            Self::ForeignUrl(url) => write!(f, "image url not owned by this store: {url}"),
            Self::Io(err) => write!(f, "image upload failed: {err}"),
        }
    }
}

impl Error for BlobError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::EmptyPayload | Self::ForeignUrl(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for BlobError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Object storage collaborator used by post creation.
pub trait BlobStore {
    /// Stores `bytes` under a new object name and returns its URL.
    fn upload(&self, bytes: &[u8]) -> BlobResult<String>;
    /// Deletes an object previously returned by `upload`.
    fn remove(&self, url: &str) -> BlobResult<()>;
}

impl<T: BlobStore + ?Sized> BlobStore for &T {
    fn upload(&self, bytes: &[u8]) -> BlobResult<String> {
        (**self).upload(bytes)
    }

    fn remove(&self, url: &str) -> BlobResult<()> {
        (**self).remove(url)
    }
}

/// Filesystem-backed blob store rooted at a directory.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl BlobStore for FsBlobStore {
    fn upload(&self, bytes: &[u8]) -> BlobResult<String> {
        if bytes.is_empty() {
            return Err(BlobError::EmptyPayload);
        }

        let dir = self.root.join(IMAGE_PREFIX);
        let path = dir.join(Uuid::new_v4().to_string());
        let written = fs::create_dir_all(&dir).and_then(|()| fs::write(&path, bytes));
        if let Err(err) = written {
            error!(
                "event=blob_upload module=blob status=error bytes={} error={err}",
                bytes.len()
            );
            return Err(err.into());
        }

        info!(
            "event=blob_upload module=blob status=ok bytes={}",
            bytes.len()
        );
        Ok(format!("file://{}", path.display()))
    }

    fn remove(&self, url: &str) -> BlobResult<()> {
        let dir = self.root.join(IMAGE_PREFIX);
        let path = url
            .strip_prefix("file://")
            .map(Path::new)
            .filter(|path| path.parent() == Some(dir.as_path()))
            .ok_or_else(|| BlobError::ForeignUrl(url.to_string()))?;

        fs::remove_file(path)?;
        info!("event=blob_remove module=blob status=ok");
        Ok(())
    }
}
