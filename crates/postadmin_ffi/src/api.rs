//! FFI use-case API for the post-admin screens.
//!
//! # Responsibility
//! - Expose post/category CRUD and the browse filter to Dart via FRB.
//! - Flatten core errors into message strings for the UI.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every call opens its own connection to the process-wide store path.

use log::warn;
use postadmin_core::db::open_db;
use postadmin_core::{
    apply, apply_json, core_version as core_version_inner, init_logging as init_logging_inner,
    ping as ping_inner, resolve_category_name, Category, CategoryService, FilterState,
    FsBlobStore, Post, PostDraft, PostService, SortCriteria, SqliteCategoryRepository,
    SqlitePostRepository,
};
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::OnceLock;

const DB_FILE_NAME: &str = "postadmin.sqlite3";
const BLOB_DIR_NAME: &str = "postadmin_blobs";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static BLOB_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Core crate version.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - `level`: `trace|debug|info|warn|error`, case-insensitive.
/// - `log_dir`: absolute directory for rolling log files.
/// - Returns an empty string on success, the error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Post row decorated for list rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub image_url: String,
    pub category_id: String,
    /// Resolved display name, or the unknown-category label.
    pub category_name: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

/// List envelope for post queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostListResponse {
    pub ok: bool,
    pub items: Vec<PostItem>,
    pub message: String,
}

impl PostListResponse {
    fn from_posts(posts: Vec<Post>, categories: &[Category]) -> Self {
        let items = posts
            .into_iter()
            .map(|post| to_post_item(post, categories))
            .collect::<Vec<_>>();
        let message = if items.is_empty() {
            "No posts.".to_string()
        } else {
            format!("{} post(s).", items.len())
        };
        Self {
            ok: true,
            items,
            message,
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            items: Vec::new(),
            message: message.into(),
        }
    }
}

/// Category row for pickers and the category manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryItem {
    pub id: String,
    pub name: String,
}

/// List envelope for category queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryListResponse {
    pub ok: bool,
    pub items: Vec<CategoryItem>,
    pub message: String,
}

/// Generic mutation result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// Created or affected record id.
    pub id: Option<String>,
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, id: String) -> Self {
        Self {
            ok: true,
            id: Some(id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }

    fn from_result(result: Result<String, String>, op: &str, success: &str) -> Self {
        match result {
            Ok(id) => Self::success(success, id),
            Err(err) => {
                warn!("event=ffi_call module=ffi status=error op={op} error={err}");
                Self::failure(format!("{op} failed: {err}"))
            }
        }
    }
}

/// Lists every stored post in store order.
#[flutter_rust_bridge::frb(sync)]
pub fn posts_list() -> PostListResponse {
    match load_snapshots() {
        Ok((posts, categories)) => PostListResponse::from_posts(posts, &categories),
        Err(err) => PostListResponse::failure(format!("posts_list failed: {err}")),
    }
}

/// Runs the browse filter over the current store snapshot.
///
/// # FFI contract
/// - Empty queries and `category_id = None` impose no constraint.
/// - `sort`: `date_asc|date_desc|title_asc|title_desc`; anything else keeps
///   store order.
#[flutter_rust_bridge::frb(sync)]
pub fn posts_filter(
    search_query: String,
    title_query: String,
    category_id: Option<String>,
    sort: Option<String>,
) -> PostListResponse {
    let filters = FilterState {
        search_query,
        title_query,
        category_id,
        sort_criteria: SortCriteria::from_key(sort.as_deref()),
    };

    let result = load_snapshots().and_then(|(posts, categories)| {
        apply(&posts, &filters)
            .map(|filtered| (filtered, categories))
            .map_err(|err| err.to_string())
    });
    match result {
        Ok((filtered, categories)) => PostListResponse::from_posts(filtered, &categories),
        Err(err) => PostListResponse::failure(format!("posts_filter failed: {err}")),
    }
}

/// Runs the browse filter over a caller-held JSON snapshot.
///
/// Category names are not resolved; `category_name` echoes the unknown label.
#[flutter_rust_bridge::frb(sync)]
pub fn posts_filter_json(posts_json: String, filters_json: String) -> PostListResponse {
    match apply_json(&posts_json, &filters_json) {
        Ok(filtered) => PostListResponse::from_posts(filtered, &[]),
        Err(err) => PostListResponse::failure(format!("posts_filter_json failed: {err}")),
    }
}

/// Creates a post: uploads `image`, then stores the record.
#[flutter_rust_bridge::frb(sync)]
pub fn post_create(
    title: String,
    description: String,
    content: String,
    image: Vec<u8>,
    category_id: String,
) -> ActionResponse {
    let draft = PostDraft {
        title: title.trim().to_string(),
        description: description.trim().to_string(),
        content,
        category_id,
        image,
    };
    let result = with_post_service(|service| {
        service
            .create_post(&draft)
            .map(|post| post.id)
            .map_err(|err| err.to_string())
    });
    ActionResponse::from_result(result, "post_create", "Post created.")
}

/// Rewrites every field of an existing post.
#[flutter_rust_bridge::frb(sync)]
pub fn post_update(
    id: String,
    title: String,
    description: String,
    content: String,
    image_url: String,
    category_id: String,
    timestamp: i64,
) -> ActionResponse {
    let post = Post {
        id,
        title: title.trim().to_string(),
        description: description.trim().to_string(),
        content,
        image_url,
        category_id,
        timestamp,
    };
    let result = with_post_service(|service| {
        service
            .edit_post(&post)
            .map(|()| post.id.clone())
            .map_err(|err| err.to_string())
    });
    ActionResponse::from_result(result, "post_update", "Post updated.")
}

/// Deletes a post by id.
#[flutter_rust_bridge::frb(sync)]
pub fn post_delete(id: String) -> ActionResponse {
    let result = with_post_service(|service| {
        service
            .delete_post(&id)
            .map(|()| id.clone())
            .map_err(|err| err.to_string())
    });
    ActionResponse::from_result(result, "post_delete", "Post deleted.")
}

/// Lists categories in store order.
#[flutter_rust_bridge::frb(sync)]
pub fn categories_list() -> CategoryListResponse {
    let result = with_category_service(|service| service.list().map_err(|err| err.to_string()));
    match result {
        Ok(categories) => CategoryListResponse {
            ok: true,
            message: format!("{} category(ies).", categories.len()),
            items: categories
                .into_iter()
                .map(|category| CategoryItem {
                    id: category.id,
                    name: category.name,
                })
                .collect(),
        },
        Err(err) => CategoryListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("categories_list failed: {err}"),
        },
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn category_create(name: String) -> ActionResponse {
    let result =
        with_category_service(|service| service.create(&name).map_err(|err| err.to_string()));
    ActionResponse::from_result(result, "category_create", "Category created.")
}

#[flutter_rust_bridge::frb(sync)]
pub fn category_rename(id: String, name: String) -> ActionResponse {
    let result = with_category_service(|service| {
        service
            .rename(&id, &name)
            .map(|()| id.clone())
            .map_err(|err| err.to_string())
    });
    ActionResponse::from_result(result, "category_rename", "Category renamed.")
}

/// Deletes a category; posts keep the dangling reference.
#[flutter_rust_bridge::frb(sync)]
pub fn category_delete(id: String) -> ActionResponse {
    let result = with_category_service(|service| {
        service
            .delete(&id)
            .map(|()| id.clone())
            .map_err(|err| err.to_string())
    });
    ActionResponse::from_result(result, "category_delete", "Category deleted.")
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| env_path("POSTADMIN_DB_PATH", DB_FILE_NAME))
        .clone()
}

fn resolve_blob_dir() -> PathBuf {
    BLOB_DIR
        .get_or_init(|| env_path("POSTADMIN_BLOB_DIR", BLOB_DIR_NAME))
        .clone()
}

fn env_path(var: &str, fallback_name: &str) -> PathBuf {
    if let Ok(raw) = std::env::var(var) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::temp_dir().join(fallback_name)
}

fn with_connection<T>(f: impl FnOnce(&Connection) -> Result<T, String>) -> Result<T, String> {
    let conn =
        open_db(resolve_db_path()).map_err(|err| format!("post store open failed: {err}"))?;
    f(&conn)
}

fn with_post_service<T>(
    f: impl FnOnce(&PostService<SqlitePostRepository<'_>, FsBlobStore>) -> Result<T, String>,
) -> Result<T, String> {
    with_connection(|conn| {
        let service = PostService::new(
            SqlitePostRepository::new(conn),
            FsBlobStore::new(resolve_blob_dir()),
        );
        f(&service)
    })
}

fn with_category_service<T>(
    f: impl FnOnce(&CategoryService<SqliteCategoryRepository<'_>>) -> Result<T, String>,
) -> Result<T, String> {
    with_connection(|conn| f(&CategoryService::new(SqliteCategoryRepository::new(conn))))
}

fn load_snapshots() -> Result<(Vec<Post>, Vec<Category>), String> {
    let posts = with_post_service(|service| service.list_posts().map_err(|err| err.to_string()))?;
    let categories =
        with_category_service(|service| service.list().map_err(|err| err.to_string()))?;
    Ok((posts, categories))
}

fn to_post_item(post: Post, categories: &[Category]) -> PostItem {
    let category_name = resolve_category_name(&post.category_id, categories);
    PostItem {
        id: post.id,
        title: post.title,
        description: post.description,
        content: post.content,
        image_url: post.image_url,
        category_id: post.category_id,
        category_name,
        timestamp: post.timestamp,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        categories_list, category_create, category_delete, core_version, init_logging, ping,
        post_create, post_delete, post_update, posts_filter, posts_filter_json, posts_list,
    };
    use postadmin_core::UNKNOWN_CATEGORY_LABEL;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_bad_input() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn created_post_is_listed_filtered_and_deleted() {
        let token = unique_token("ffi-post");
        let category = category_create(format!("Category {token}"));
        assert!(category.ok, "{}", category.message);
        let category_id = category.id.expect("category id");

        let created = post_create(
            format!("Title {token}"),
            "description".to_string(),
            "content".to_string(),
            b"image".to_vec(),
            category_id.clone(),
        );
        assert!(created.ok, "{}", created.message);
        let post_id = created.id.expect("post id");

        let listed = posts_list();
        assert!(listed.items.iter().any(|item| item.id == post_id));

        let filtered = posts_filter(
            token.to_uppercase(),
            String::new(),
            Some(category_id.clone()),
            Some("date_desc".to_string()),
        );
        assert!(filtered.ok, "{}", filtered.message);
        assert_eq!(filtered.items.len(), 1);
        assert_eq!(filtered.items[0].category_name, format!("Category {token}"));

        let deleted = category_delete(category_id.clone());
        assert!(deleted.ok, "{}", deleted.message);
        let orphaned = posts_filter(token.clone(), String::new(), None, None);
        assert_eq!(orphaned.items[0].category_name, UNKNOWN_CATEGORY_LABEL);

        assert!(post_delete(post_id.clone()).ok);
        assert!(!post_delete(post_id).ok);
    }

    #[test]
    fn post_create_requires_image_and_category() {
        let missing_image = post_create(
            "t".to_string(),
            "d".to_string(),
            "c".to_string(),
            Vec::new(),
            "cat".to_string(),
        );
        assert!(!missing_image.ok);
        assert!(missing_image.message.contains("image"));

        let missing_category = post_create(
            "t".to_string(),
            "d".to_string(),
            "c".to_string(),
            b"x".to_vec(),
            String::new(),
        );
        assert!(!missing_category.ok);
        assert!(missing_category.message.contains("category_id"));
    }

    #[test]
    fn post_update_reports_missing_post() {
        let response = post_update(
            unique_token("missing"),
            "title".to_string(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            1,
        );
        assert!(!response.ok);
        assert!(response.message.contains("not found"));
    }

    #[test]
    fn categories_list_succeeds() {
        let name = unique_token("ffi-category");
        assert!(category_create(name.clone()).ok);
        let listed = categories_list();
        assert!(listed.ok, "{}", listed.message);
        assert!(listed.items.iter().any(|item| item.name == name));
    }

    #[test]
    fn posts_filter_json_reports_invalid_snapshot() {
        let response = posts_filter_json("{".to_string(), "{}".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("invalid post snapshot"));

        let response = posts_filter_json(
            r#"[{"id":"1","title":"b"},{"id":"2","title":"a"}]"#.to_string(),
            r#"{"sort_criteria":"title_asc"}"#.to_string(),
        );
        assert!(response.ok);
        assert_eq!(response.items[0].id, "2");
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
