//! Keyword categorization of chunk text.

use crate::types::Category;

/// Ordered category rules. The first rule with a keyword contained in the
/// lowercased text wins.
const CATEGORY_RULES: &[(&[&str], Category)] = &[
    (
        &["service", "solution", "consulting", "development"],
        Category::Services,
    ),
    (
        &["about", "company", "founded", "mission", "vision"],
        Category::CompanyInfo,
    ),
    (&["contact", "email", "phone", "address"], Category::Contact),
    (
        &["technology", "tech", "ai", "machine learning", "data"],
        Category::Technology,
    ),
    (&["team", "employee", "staff", "expert"], Category::Team),
];

/// Assign a category to chunk text.
///
/// Matching is plain substring containment, so short keywords such as
/// "ai" also fire inside longer words.
pub fn categorize(text: &str) -> Category {
    let lower = text.to_lowercase();
    first_match(&lower, CATEGORY_RULES).unwrap_or(Category::General)
}

/// Return the value of the first rule with a keyword contained in `haystack`.
pub fn first_match<T: Copy>(haystack: &str, rules: &[(&[&str], T)]) -> Option<T> {
    rules
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| haystack.contains(k)))
        .map(|(_, value)| *value)
}
