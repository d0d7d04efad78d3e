//! Browse-screen state holder.
//!
//! # Responsibility
//! - Hold the last-fetched post and category snapshots plus the current
//!   filter state.
//! - Re-run the filter engine whenever any of them changes.
//!
//! # Invariants
//! - `visible()` always equals `filter::apply(posts, filters)` for the held
//!   snapshot.
//! - A rejected snapshot leaves the previous state untouched.

use crate::filter::{apply, resolve_category_name, FilterResult, FilterState, SortCriteria};
use crate::model::category::Category;
use crate::model::post::Post;
use log::debug;

/// Explicit per-screen state passed to the engine on every change.
#[derive(Debug, Clone, Default)]
pub struct BrowseSession {
    posts: Vec<Post>,
    categories: Vec<Category>,
    filters: FilterState,
    visible: Vec<Post>,
}

impl BrowseSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Current engine output.
    pub fn visible(&self) -> &[Post] {
        &self.visible
    }

    /// Adopts a freshly fetched post snapshot.
    pub fn replace_posts(&mut self, posts: Vec<Post>) -> FilterResult<&[Post]> {
        self.visible = apply(&posts, &self.filters)?;
        self.posts = posts;
        self.log_recompute();
        Ok(&self.visible)
    }

    /// Adopts a pushed category snapshot. Does not affect filtering.
    pub fn replace_categories(&mut self, categories: Vec<Category>) {
        self.categories = categories;
    }

    /// Replaces every filter input at once.
    pub fn set_filters(&mut self, filters: FilterState) -> FilterResult<&[Post]> {
        self.filters = filters;
        self.recompute()
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) -> FilterResult<&[Post]> {
        self.filters.search_query = query.into();
        self.recompute()
    }

    pub fn set_title_query(&mut self, query: impl Into<String>) -> FilterResult<&[Post]> {
        self.filters.title_query = query.into();
        self.recompute()
    }

    /// `None` selects all categories.
    pub fn set_category(&mut self, category_id: Option<String>) -> FilterResult<&[Post]> {
        self.filters.category_id = category_id;
        self.recompute()
    }

    pub fn set_sort(&mut self, criteria: SortCriteria) -> FilterResult<&[Post]> {
        self.filters.sort_criteria = criteria;
        self.recompute()
    }

    /// Mirrors a successful store edit into the held snapshot.
    ///
    /// Unknown ids leave the snapshot as is.
    pub fn apply_edit(&mut self, updated: Post) -> FilterResult<&[Post]> {
        if let Some(slot) = self.posts.iter_mut().find(|post| post.id == updated.id) {
            *slot = updated;
        }
        self.recompute()
    }

    /// Mirrors a successful store delete into the held snapshot.
    pub fn apply_delete(&mut self, post_id: &str) -> FilterResult<&[Post]> {
        self.posts.retain(|post| post.id != post_id);
        self.recompute()
    }

    /// Display name of the post's category in the held snapshot.
    pub fn category_label(&self, post: &Post) -> String {
        resolve_category_name(&post.category_id, &self.categories)
    }

    fn recompute(&mut self) -> FilterResult<&[Post]> {
        self.visible = apply(&self.posts, &self.filters)?;
        self.log_recompute();
        Ok(&self.visible)
    }

    fn log_recompute(&self) {
        debug!(
            "event=browse_recompute module=service status=ok total={} visible={} sort={}",
            self.posts.len(),
            self.visible.len(),
            self.filters.sort_criteria.as_key().unwrap_or("none")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::BrowseSession;
    use crate::filter::SortCriteria;
    use crate::model::post::Post;

    fn post(id: &str, title: &str, timestamp: i64) -> Post {
        Post {
            id: id.to_string(),
            title: title.to_string(),
            category_id: "c1".to_string(),
            timestamp,
            ..Post::default()
        }
    }

    #[test]
    fn edit_and_delete_recompute_visible_list() {
        let mut session = BrowseSession::new();
        session
            .replace_posts(vec![post("1", "Beta", 1), post("2", "Alpha", 2)])
            .unwrap();
        session.set_sort(SortCriteria::TitleAsc).unwrap();
        assert_eq!(session.visible()[0].id, "2");

        session.apply_edit(post("1", "Aardvark", 1)).unwrap();
        assert_eq!(session.visible()[0].title, "Aardvark");

        let remaining = session.apply_delete("1").unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, "2");
    }

    #[test]
    fn rejected_snapshot_keeps_previous_state() {
        let mut session = BrowseSession::new();
        session.replace_posts(vec![post("1", "One", 1)]).unwrap();

        let duplicate = vec![post("x", "A", 1), post("x", "B", 2)];
        assert!(session.replace_posts(duplicate).is_err());
        assert_eq!(session.posts().len(), 1);
        assert_eq!(session.visible()[0].id, "1");
    }
}
