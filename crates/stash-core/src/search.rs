//! Search and filter engine
//!
//! Pure functions over an in-memory item list. Filtering is not a sort:
//! the output preserves the input order, and the same `(items, query)`
//! input always yields the same output.

use crate::models::{Item, ItemKind};

/// A search query: free text plus a set of required tags
///
/// Text matches case-insensitively as a substring of the title, the
/// content (markup included, nothing is stripped), or any tag; empty text
/// matches everything. Tags are conjunctive: an item must carry every
/// query tag, compared exactly (case-sensitive).
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub text: String,
    pub tags: Vec<String>,
}

impl SearchQuery {
    /// A query that matches everything
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when the query constrains nothing
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.tags.is_empty()
    }
}

/// Filter items by a query, preserving input order
pub fn filter<'a>(items: &'a [Item], query: &SearchQuery) -> Vec<&'a Item> {
    items.iter().filter(|item| matches(item, query)).collect()
}

/// Check whether a single item satisfies the query
pub fn matches(item: &Item, query: &SearchQuery) -> bool {
    matches_text(item, &query.text) && matches_tags(item, &query.tags)
}

fn matches_text(item: &Item, text: &str) -> bool {
    if text.is_empty() {
        return true;
    }
    let needle = text.to_lowercase();
    item.title.to_lowercase().contains(&needle)
        || item.content.to_lowercase().contains(&needle)
        || item.tags.iter().any(|t| t.to_lowercase().contains(&needle))
}

fn matches_tags(item: &Item, tags: &[String]) -> bool {
    tags.iter().all(|tag| item.tags.contains(tag))
}

/// All distinct tags across the item list, in order of first appearance
///
/// Recompute this whenever the item list changes; it feeds the tag
/// filter choices presented to the user.
pub fn available_tags(items: &[Item]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut tags = Vec::new();
    for item in items {
        for tag in &item.tags {
            if seen.insert(tag.clone()) {
                tags.push(tag.clone());
            }
        }
    }
    tags
}

/// Tag usage counts (items carrying each tag), in first-appearance order
pub fn tag_counts(items: &[Item]) -> Vec<(String, usize)> {
    available_tags(items)
        .into_iter()
        .map(|tag| {
            let count = items.iter().filter(|i| i.tags.contains(&tag)).count();
            (tag, count)
        })
        .collect()
}

/// Note and link tallies for an item list
pub fn counts(items: &[Item]) -> (usize, usize) {
    let notes = items.iter().filter(|i| i.kind == ItemKind::Note).count();
    (notes, items.len() - notes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn item(title: &str, content: &str, tags: &[&str]) -> Item {
        let now = Utc::now();
        Item {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            kind: ItemKind::Note,
            title: title.to_string(),
            content: content.to_string(),
            url: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            is_public: false,
            share_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn query(text: &str, tags: &[&str]) -> SearchQuery {
        SearchQuery {
            text: text.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let items = vec![item("a", "x", &[]), item("b", "y", &["t"])];
        let out = filter(&items, &SearchQuery::empty());
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_text_match_is_case_insensitive() {
        let items = vec![
            item("Rust Notes", "content", &["a", "b"]),
            item("other", "BODY about rust", &["b", "c"]),
            item("unrelated", "nothing", &[]),
        ];

        let out = filter(&items, &query("RUST", &[]));
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].title, "Rust Notes");
        assert_eq!(out[1].title, "other");
    }

    #[test]
    fn test_text_matches_tags_too() {
        let items = vec![item("a", "x", &["work", "urgent"]), item("b", "y", &[])];
        let out = filter(&items, &query("urg", &[]));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "a");
    }

    #[test]
    fn test_text_matches_markup_without_stripping() {
        let items = vec![item("a", "<em>hello</em>", &[])];
        // The markup itself is searchable; nothing is stripped
        assert_eq!(filter(&items, &query("<em>", &[])).len(), 1);
    }

    #[test]
    fn test_tag_filter_is_conjunctive() {
        let items = vec![item("a", "x", &["work", "urgent"])];

        assert_eq!(filter(&items, &query("", &["work"])).len(), 1);
        assert_eq!(filter(&items, &query("", &["work", "urgent"])).len(), 1);
        assert_eq!(filter(&items, &query("", &["work", "personal"])).len(), 0);
    }

    #[test]
    fn test_tag_filter_is_case_sensitive() {
        let items = vec![item("a", "x", &["Work"])];
        assert_eq!(filter(&items, &query("", &["work"])).len(), 0);
        assert_eq!(filter(&items, &query("", &["Work"])).len(), 1);
    }

    #[test]
    fn test_text_and_tags_combine() {
        let items = vec![
            item("alpha", "x", &["a", "b"]),
            item("beta", "x", &["b", "c"]),
        ];
        let out = filter(&items, &query("alpha", &["b"]));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "alpha");
    }

    #[test]
    fn test_filter_preserves_order_and_is_deterministic() {
        let items = vec![
            item("one", "b here", &["a", "b"]),
            item("two", "nothing", &["b", "c"]),
            item("three", "more b", &["b"]),
        ];
        let q = query("b", &[]);

        let first = filter(&items, &q);
        let second = filter(&items, &q);
        let titles: Vec<&str> = first.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["one", "two", "three"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_two_tagged_items_match_text_b_any_case() {
        let items = vec![item("x", "c1", &["a", "b"]), item("y", "c2", &["b", "c"])];

        assert_eq!(filter(&items, &query("b", &[])).len(), 2);
        assert_eq!(filter(&items, &query("B", &[])).len(), 2);
    }

    #[test]
    fn test_available_tags_first_appearance_order() {
        let items = vec![
            item("1", "x", &["beta", "alpha"]),
            item("2", "x", &["alpha", "gamma"]),
            item("3", "x", &["beta"]),
        ];
        assert_eq!(available_tags(&items), vec!["beta", "alpha", "gamma"]);
    }

    #[test]
    fn test_tag_counts() {
        let items = vec![
            item("1", "x", &["a", "b"]),
            item("2", "x", &["a"]),
            item("3", "x", &["c"]),
        ];
        assert_eq!(
            tag_counts(&items),
            vec![
                ("a".to_string(), 2),
                ("b".to_string(), 1),
                ("c".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_counts_split_notes_and_links() {
        let mut link = item("l", "x", &[]);
        link.kind = ItemKind::Link;
        link.url = Some("https://e.com".to_string());
        let items = vec![item("n", "x", &[]), link];
        assert_eq!(counts(&items), (1, 1));
    }
}
