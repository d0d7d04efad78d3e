//! Category use-case service with a live snapshot feed.
//!
//! # Responsibility
//! - CRUD over any `CategoryRepository`.
//! - Push a fresh category snapshot to every subscriber after each
//!   successful mutation.
//!
//! # Invariants
//! - A new subscriber receives the current snapshot immediately.
//! - Dropped receivers are pruned on the next publish.
//! - Single-threaded like the borrowed connection; receivers may move to
//!   other threads.

use crate::filter::resolve_category_name;
use crate::model::category::{Category, CategoryId};
use crate::model::ValidationError;
use crate::repo::category_repo::CategoryRepository;
use crate::repo::RepoError;
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::cell::RefCell;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Service error for category use-cases.
#[derive(Debug)]
pub enum CategoryServiceError {
    Validation(ValidationError),
    CategoryNotFound(CategoryId),
    Repo(RepoError),
}

impl Display for CategoryServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::CategoryNotFound(id) => write!(f, "category not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CategoryServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::CategoryNotFound(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for CategoryServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { id, .. } => Self::CategoryNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

pub type CategoryServiceResult<T> = Result<T, CategoryServiceError>;

/// Category service facade.
pub struct CategoryService<R: CategoryRepository> {
    repo: R,
    subscribers: RefCell<Vec<Sender<Vec<Category>>>>,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            subscribers: RefCell::new(Vec::new()),
        }
    }

    pub fn list(&self) -> CategoryServiceResult<Vec<Category>> {
        Ok(self.repo.fetch_all()?)
    }

    pub fn create(&self, name: &str) -> CategoryServiceResult<CategoryId> {
        let id = self.repo.create(name.trim())?;
        self.publish();
        Ok(id)
    }

    pub fn rename(&self, id: &str, name: &str) -> CategoryServiceResult<()> {
        self.repo.update(id, name.trim())?;
        self.publish();
        Ok(())
    }

    /// Deletes a category. Posts referencing it keep the dangling id.
    pub fn delete(&self, id: &str) -> CategoryServiceResult<()> {
        self.repo.delete(id)?;
        self.publish();
        Ok(())
    }

    /// Display name for `id`, or the unknown-category label.
    pub fn resolve_name(&self, id: &str) -> CategoryServiceResult<String> {
        let categories = self.repo.fetch_all()?;
        Ok(resolve_category_name(id, &categories))
    }

    /// Registers a live snapshot receiver.
    ///
    /// # Errors
    /// - Returns the store error when the initial snapshot cannot be read;
    ///   no subscription is registered in that case.
    pub fn subscribe(&self) -> CategoryServiceResult<Receiver<Vec<Category>>> {
        let snapshot = self.repo.fetch_all()?;
        let (tx, rx) = channel();
        // Receiver is alive here, so the initial send cannot fail.
        let _ = tx.send(snapshot);
        self.subscribers.borrow_mut().push(tx);
        Ok(rx)
    }

    /// Number of live subscribers as of the last publish.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    fn publish(&self) {
        let snapshot = match self.repo.fetch_all() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!("event=category_feed module=service status=error error={err}");
                return;
            }
        };

        let mut subscribers = self.subscribers.borrow_mut();
        subscribers.retain(|tx| tx.send(snapshot.clone()).is_ok());
        debug!(
            "event=category_feed module=service status=ok categories={} subscribers={}",
            snapshot.len(),
            subscribers.len()
        );
    }
}
