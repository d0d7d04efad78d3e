//! Core domain logic for the post-admin client.
//! Stores, services and the post filter engine live here; UI bindings
//! stay in the FFI crate.

pub mod blob;
pub mod db;
pub mod filter;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use blob::{BlobError, BlobResult, BlobStore, FsBlobStore};
pub use filter::{
    apply, apply_json, decode_posts, resolve_category_name, FilterError, FilterResult,
    FilterState, SortCriteria, UNKNOWN_CATEGORY_LABEL,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::category::{Category, CategoryId};
pub use model::post::{now_epoch_ms, NewPost, Post, PostDraft, PostFields, PostId};
pub use model::ValidationError;
pub use repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
pub use repo::post_repo::{PostRepository, SqlitePostRepository};
pub use repo::{RepoError, RepoResult};
pub use service::browse::BrowseSession;
pub use service::category_service::{
    CategoryService, CategoryServiceError, CategoryServiceResult,
};
pub use service::post_service::{PostService, PostServiceError, PostServiceResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
