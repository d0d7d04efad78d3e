//! Category store contract and SQLite implementation.
//!
//! # Invariants
//! - Names are validated non-empty on create and rename.
//! - Deleting a category leaves referencing posts untouched.

use super::{RepoError, RepoResult};
use crate::model::category::{validate_category_name, Category, CategoryId};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

/// Category Store collaborator.
pub trait CategoryRepository {
    fn fetch_all(&self) -> RepoResult<Vec<Category>>;
    fn get(&self, id: &str) -> RepoResult<Option<Category>>;
    fn create(&self, name: &str) -> RepoResult<CategoryId>;
    fn update(&self, id: &str, name: &str) -> RepoResult<()>;
    fn delete(&self, id: &str) -> RepoResult<()>;
}

/// SQLite-backed category repository.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn fetch_all(&self) -> RepoResult<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM categories ORDER BY rowid ASC;")?;
        let categories = stmt
            .query_map([], parse_category_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    fn get(&self, id: &str) -> RepoResult<Option<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM categories WHERE id = ?1;")?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_category_row(row)?)),
            None => Ok(None),
        }
    }

    fn create(&self, name: &str) -> RepoResult<CategoryId> {
        validate_category_name(name)?;

        let id = Uuid::new_v4().to_string();
        self.conn.execute(
            "INSERT INTO categories (id, name) VALUES (?1, ?2);",
            params![id.as_str(), name],
        )?;
        Ok(id)
    }

    fn update(&self, id: &str, name: &str) -> RepoResult<()> {
        validate_category_name(name)?;

        let changed = self.conn.execute(
            "UPDATE categories SET name = ?2 WHERE id = ?1;",
            params![id, name],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found("category", id));
        }
        Ok(())
    }

    fn delete(&self, id: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::not_found("category", id));
        }
        Ok(())
    }
}

fn parse_category_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}
