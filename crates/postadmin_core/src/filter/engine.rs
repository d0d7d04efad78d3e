//! Filter-sort engine over post snapshots.
//!
//! # Responsibility
//! - Map `(posts, filters)` to an ordered subset of `posts`.
//!
//! # Invariants
//! - Predicates run in order: category, general search, title search.
//!   Both search predicates apply when both queries are non-empty (AND).
//! - Empty queries and `category_id = None` impose no constraint.
//! - All sorts are stable; ties keep input-relative order.
//! - Title sorts compare by Unicode code point (byte order of UTF-8),
//!   so `"Apple"` sorts before `"banana"` and `"Zebra"` before `"apple"`.
//! - Case-insensitive matching folds both sides one `char` at a time
//!   (uppercase, then lowercase), with no word-context rules, so a query
//!   that occurs verbatim in a field always matches it.

use crate::model::post::Post;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type FilterResult<T> = Result<T, FilterError>;

/// Engine error. Empty results are never errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// Snapshot is not a well-formed collection of posts.
    InvalidInput(String),
}

impl Display for FilterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(message) => write!(f, "invalid post snapshot: {message}"),
        }
    }
}

impl Error for FilterError {}

/// Output ordering requested by the browse screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortCriteria {
    DateAsc,
    DateDesc,
    TitleAsc,
    TitleDesc,
    /// Keep filtered input order.
    #[default]
    None,
}

impl SortCriteria {
    /// Maps a wire key to a criteria; unknown or absent keys mean `None`.
    pub fn from_key(key: Option<&str>) -> Self {
        match key {
            Some("date_asc") => Self::DateAsc,
            Some("date_desc") => Self::DateDesc,
            Some("title_asc") => Self::TitleAsc,
            Some("title_desc") => Self::TitleDesc,
            _ => Self::None,
        }
    }

    /// Wire key, or `None` for the no-reorder criteria.
    pub fn as_key(self) -> Option<&'static str> {
        match self {
            Self::DateAsc => Some("date_asc"),
            Self::DateDesc => Some("date_desc"),
            Self::TitleAsc => Some("title_asc"),
            Self::TitleDesc => Some("title_desc"),
            Self::None => None,
        }
    }
}

impl Serialize for SortCriteria {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_key() {
            Some(key) => serializer.serialize_str(key),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for SortCriteria {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = Option::<String>::deserialize(deserializer)?;
        Ok(Self::from_key(key.as_deref()))
    }
}

/// Engine input configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    /// Matched against title OR description.
    pub search_query: String,
    /// Matched against title only.
    pub title_query: String,
    /// `None` means all categories.
    pub category_id: Option<String>,
    pub sort_criteria: SortCriteria,
}

impl FilterState {
    /// Whether this state leaves any snapshot unchanged.
    pub fn is_noop(&self) -> bool {
        self.search_query.is_empty()
            && self.title_query.is_empty()
            && self.category_id.is_none()
            && self.sort_criteria == SortCriteria::None
    }
}

/// Filters and orders a post snapshot.
///
/// # Errors
/// - `InvalidInput` when two posts share the same non-empty `id`.
pub fn apply(posts: &[Post], filters: &FilterState) -> FilterResult<Vec<Post>> {
    ensure_distinct_ids(posts)?;

    let search = Needle::new(&filters.search_query);
    let title = Needle::new(&filters.title_query);

    let mut selected = posts
        .iter()
        .filter(|post| match filters.category_id.as_deref() {
            Some(category_id) => post.category_id == category_id,
            None => true,
        })
        .filter(|post| match &search {
            Some(needle) => needle.found_in(&post.title) || needle.found_in(&post.description),
            None => true,
        })
        .filter(|post| match &title {
            Some(needle) => needle.found_in(&post.title),
            None => true,
        })
        .cloned()
        .collect::<Vec<_>>();

    sort_posts(&mut selected, filters.sort_criteria);
    Ok(selected)
}

/// Decodes a JSON array of post records.
///
/// # Errors
/// - `InvalidInput` when the payload is not an array of post objects.
pub fn decode_posts(json: &str) -> FilterResult<Vec<Post>> {
    serde_json::from_str::<Vec<Post>>(json)
        .map_err(|err| FilterError::InvalidInput(err.to_string()))
}

/// Decodes a JSON snapshot and filter state, then runs [`apply`].
pub fn apply_json(posts_json: &str, filters_json: &str) -> FilterResult<Vec<Post>> {
    let posts = decode_posts(posts_json)?;
    let filters = serde_json::from_str::<FilterState>(filters_json)
        .map_err(|err| FilterError::InvalidInput(format!("filter state: {err}")))?;
    apply(&posts, &filters)
}

fn sort_posts(posts: &mut [Post], criteria: SortCriteria) {
    match criteria {
        SortCriteria::DateAsc => posts.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
        SortCriteria::DateDesc => posts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
        SortCriteria::TitleAsc => posts.sort_by(|a, b| a.title.cmp(&b.title)),
        SortCriteria::TitleDesc => posts.sort_by(|a, b| b.title.cmp(&a.title)),
        SortCriteria::None => {}
    }
}

fn ensure_distinct_ids(posts: &[Post]) -> FilterResult<()> {
    let mut seen = HashSet::with_capacity(posts.len());
    for post in posts.iter().filter(|post| !post.id.is_empty()) {
        if !seen.insert(post.id.as_str()) {
            return Err(FilterError::InvalidInput(format!(
                "duplicate post id `{}`",
                post.id
            )));
        }
    }
    Ok(())
}

/// Case-folded query; `None` when the query imposes no constraint.
struct Needle(String);

impl Needle {
    fn new(query: &str) -> Option<Self> {
        if query.is_empty() {
            return None;
        }
        Some(Self(fold_case(query)))
    }

    fn found_in(&self, haystack: &str) -> bool {
        fold_case(haystack).contains(self.0.as_str())
    }
}

/// Per-char fold. `str::to_lowercase` is context-sensitive (final sigma),
/// which would fold the same letter differently in query and field.
fn fold_case(value: &str) -> String {
    let mut folded = String::with_capacity(value.len());
    for ch in value.chars() {
        let mut upper = ch.to_uppercase();
        match (upper.next(), upper.next()) {
            (Some(single), None) => folded.extend(single.to_lowercase()),
            _ => folded.extend(ch.to_lowercase()),
        }
    }
    folded
}

#[cfg(test)]
mod tests {
    use super::{fold_case, Needle, SortCriteria};

    #[test]
    fn sort_keys_roundtrip_and_unknown_maps_to_none() {
        for key in ["date_asc", "date_desc", "title_asc", "title_desc"] {
            assert_eq!(SortCriteria::from_key(Some(key)).as_key(), Some(key));
        }
        assert_eq!(SortCriteria::from_key(Some("newest")), SortCriteria::None);
        assert_eq!(SortCriteria::from_key(None), SortCriteria::None);
    }

    #[test]
    fn needle_matches_non_ascii_case_insensitively() {
        let needle = Needle::new("ПОСТ").unwrap();
        assert!(needle.found_in("Новый пост"));
        assert!(Needle::new("").is_none());
    }

    #[test]
    fn fold_case_maps_every_sigma_form_alike() {
        assert_eq!(fold_case("ΟΔΟΣ"), "οδοσ");
        assert_eq!(fold_case("οδος"), "οδοσ");
        assert_eq!(fold_case("Σ"), fold_case("ς"));
    }
}
