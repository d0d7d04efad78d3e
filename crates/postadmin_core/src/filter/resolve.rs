//! Category display-name lookup.

use crate::model::category::Category;

/// Label shown when a post references a missing or ambiguous category.
pub const UNKNOWN_CATEGORY_LABEL: &str = "Unknown";

/// Returns the name of the single category whose id equals `category_id`.
///
/// Falls back to [`UNKNOWN_CATEGORY_LABEL`] when no category or more than
/// one category carries that id.
pub fn resolve_category_name(category_id: &str, categories: &[Category]) -> String {
    let mut matches = categories
        .iter()
        .filter(|category| category.id == category_id);

    match (matches.next(), matches.next()) {
        (Some(category), None) => category.name.clone(),
        _ => UNKNOWN_CATEGORY_LABEL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve_category_name, UNKNOWN_CATEGORY_LABEL};
    use crate::model::category::Category;

    #[test]
    fn resolves_unique_match() {
        let categories = vec![Category::new("c1", "News"), Category::new("c2", "Blog")];
        assert_eq!(resolve_category_name("c2", &categories), "Blog");
    }

    #[test]
    fn falls_back_for_missing_or_duplicate_ids() {
        let categories = vec![Category::new("c1", "News"), Category::new("c1", "Copy")];
        assert_eq!(
            resolve_category_name("c1", &categories),
            UNKNOWN_CATEGORY_LABEL
        );
        assert_eq!(
            resolve_category_name("missing", &categories),
            UNKNOWN_CATEGORY_LABEL
        );
        assert_eq!(resolve_category_name("", &[]), UNKNOWN_CATEGORY_LABEL);
    }

    #[test]
    fn id_match_is_case_sensitive() {
        let categories = vec![Category::new("a", "Lower")];
        assert_eq!(resolve_category_name("A", &categories), UNKNOWN_CATEGORY_LABEL);
    }
}
