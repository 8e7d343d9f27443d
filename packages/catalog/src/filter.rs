//! Listing filters: title search, category narrowing, id-dedup, and the
//! recent-patterns strip.

use yarnbook_store::{Category, Pattern};

/// Page size of the pattern grids
pub const PATTERNS_PER_PAGE: usize = 6;

/// How many of the user's newest patterns the home strip shows
pub const RECENT_COUNT: usize = 3;

/// Search narrows first, then the category filter narrows the hits. An empty
/// query (or `None` category) passes everything through.
pub fn apply_filters<'a>(
    patterns: &'a [Pattern],
    query: &str,
    category: Option<Category>,
) -> Vec<&'a Pattern> {
    let needle = query.trim().to_lowercase();
    patterns
        .iter()
        .filter(|p| needle.is_empty() || p.title.to_lowercase().contains(&needle))
        .filter(|p| category.map_or(true, |c| p.category == c))
        .collect()
}

/// Collapse duplicate ids, keeping the first occurrence
pub fn dedup_by_id(patterns: Vec<Pattern>) -> Vec<Pattern> {
    let mut seen = std::collections::HashSet::new();
    patterns
        .into_iter()
        .filter(|p| seen.insert(p.id))
        .collect()
}

/// The newest patterns first; ids are creation timestamps, so id order is
/// creation order. Takes the already-filtered listing so the strip follows
/// the active search.
pub fn recent(mut patterns: Vec<&Pattern>) -> Vec<&Pattern> {
    patterns.sort_by_key(|p| std::cmp::Reverse(p.id));
    patterns.truncate(RECENT_COUNT);
    patterns
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(id: i64, title: &str, category: Category) -> Pattern {
        Pattern {
            id,
            title: title.into(),
            category,
            images: vec![],
            materials: String::new(),
            instructions: String::new(),
            stitches: vec![],
            public: true,
            creator_uid: None,
            creator_username: None,
        }
    }

    #[test]
    fn test_search_then_category() {
        let patterns = vec![
            pattern(1, "Cozy Beanie", Category::Wearables),
            pattern(2, "Cozy Coaster", Category::FunctionalItems),
            pattern(3, "Plush Bear", Category::ToysAndGifts),
        ];

        let hits = apply_filters(&patterns, "cozy", None);
        assert_eq!(hits.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2]);

        let hits = apply_filters(&patterns, "cozy", Some(Category::FunctionalItems));
        assert_eq!(hits.iter().map(|p| p.id).collect::<Vec<_>>(), vec![2]);

        let hits = apply_filters(&patterns, "", None);
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn test_dedup_keeps_the_first_occurrence() {
        let deduped = dedup_by_id(vec![
            pattern(1, "first copy", Category::Wearables),
            pattern(2, "other", Category::Wearables),
            pattern(1, "second copy", Category::Wearables),
        ]);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].title, "first copy");
    }

    #[test]
    fn test_recent_takes_the_newest_three() {
        let patterns: Vec<Pattern> = [100, 300, 200]
            .map(|id| pattern(id, "p", Category::Wearables))
            .to_vec();
        let ids: Vec<i64> = recent(patterns.iter().collect()).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![300, 200, 100]);

        let more: Vec<Pattern> = (1..=5)
            .map(|id| pattern(id, "p", Category::Wearables))
            .collect();
        let ids: Vec<i64> = recent(more.iter().collect()).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![5, 4, 3]);
    }
}
