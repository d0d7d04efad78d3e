//! Post store contract and SQLite implementation.
//!
//! # Responsibility
//! - Create, read, fully replace and delete post documents.
//!
//! # Invariants
//! - Ids are UUID v4 strings assigned here, never by callers.
//! - `timestamp` is stored as given; the service stamps creation time.

use super::{RepoError, RepoResult};
use crate::model::post::{NewPost, Post, PostFields, PostId};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const POST_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    content,
    image_url,
    category_id,
    timestamp
FROM posts";

/// Post Store collaborator.
pub trait PostRepository {
    /// Returns every stored post.
    fn fetch_all(&self) -> RepoResult<Vec<Post>>;
    /// Gets one post by id.
    fn get(&self, id: &str) -> RepoResult<Option<Post>>;
    /// Persists a new post and returns its assigned id.
    fn create(&self, record: &NewPost) -> RepoResult<PostId>;
    /// Rewrites all mutable fields of an existing post.
    fn update(&self, id: &str, fields: &PostFields) -> RepoResult<()>;
    /// Removes a post permanently.
    fn delete(&self, id: &str) -> RepoResult<()>;
}

/// SQLite-backed post repository.
pub struct SqlitePostRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePostRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PostRepository for SqlitePostRepository<'_> {
    fn fetch_all(&self) -> RepoResult<Vec<Post>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{POST_SELECT_SQL} ORDER BY rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut posts = Vec::new();
        while let Some(row) = rows.next()? {
            posts.push(parse_post_row(row)?);
        }
        Ok(posts)
    }

    fn get(&self, id: &str) -> RepoResult<Option<Post>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{POST_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_post_row(row)?)),
            None => Ok(None),
        }
    }

    fn create(&self, record: &NewPost) -> RepoResult<PostId> {
        record.validate()?;

        let id = Uuid::new_v4().to_string();
        self.conn.execute(
            "INSERT INTO posts (
                id,
                title,
                description,
                content,
                image_url,
                category_id,
                timestamp
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                id.as_str(),
                record.title.as_str(),
                record.description.as_str(),
                record.content.as_str(),
                record.image_url.as_str(),
                record.category_id.as_str(),
                record.timestamp,
            ],
        )?;

        Ok(id)
    }

    fn update(&self, id: &str, fields: &PostFields) -> RepoResult<()> {
        fields.validate()?;

        let changed = self.conn.execute(
            "UPDATE posts
             SET
                title = ?2,
                description = ?3,
                content = ?4,
                image_url = ?5,
                category_id = ?6,
                timestamp = ?7
             WHERE id = ?1;",
            params![
                id,
                fields.title.as_str(),
                fields.description.as_str(),
                fields.content.as_str(),
                fields.image_url.as_str(),
                fields.category_id.as_str(),
                fields.timestamp,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::not_found("post", id));
        }
        Ok(())
    }

    fn delete(&self, id: &str) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM posts WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::not_found("post", id));
        }
        Ok(())
    }
}

fn parse_post_row(row: &Row<'_>) -> RepoResult<Post> {
    let timestamp: i64 = row.get("timestamp")?;
    if timestamp < 0 {
        return Err(RepoError::InvalidData(format!(
            "negative timestamp `{timestamp}` in posts.timestamp"
        )));
    }

    Ok(Post {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        content: row.get("content")?,
        image_url: row.get("image_url")?,
        category_id: row.get("category_id")?,
        timestamp,
    })
}
