//! In-memory post filtering and sorting.
//!
//! # Responsibility
//! - Compose category/search/title predicates and a sort order over a
//!   post snapshot.
//! - Resolve category display names for rendering.
//!
//! # Invariants
//! - Every function here is pure: no I/O, no logging, no retained state.
//! - Inputs are never mutated; outputs are fresh vectors.

pub mod engine;
pub mod resolve;

pub use engine::{
    apply, apply_json, decode_posts, FilterError, FilterResult, FilterState, SortCriteria,
};
pub use resolve::{resolve_category_name, UNKNOWN_CATEGORY_LABEL};
