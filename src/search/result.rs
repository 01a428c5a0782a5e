//! Ranked search results.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// One location matched by a query.
///
/// `count` is the total number of positions the matched words occupy at the
/// location and `score` is `count` divided by the location's word count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "where")]
    location: String,
    count: usize,
    score: f64,
}

impl SearchResult {
    /// Create an empty result for `location`.
    pub fn new<S: Into<String>>(location: S) -> Self {
        Self::with_values(location, 0, 0.0)
    }

    /// Create a result with explicit values.
    pub fn with_values<S: Into<String>>(location: S, count: usize, score: f64) -> Self {
        SearchResult {
            location: location.into(),
            count,
            score,
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    /// Fold `matches` more positions into the count and recompute the score
    /// against the location's total word count.
    pub(crate) fn add_matches(&mut self, matches: usize, word_count: usize) {
        self.count += matches;
        self.score = if word_count == 0 {
            0.0
        } else {
            self.count as f64 / word_count as f64
        };
    }

    /// Ranking order: higher score first, then higher count, then location
    /// compared case-insensitively.
    pub fn compare_rank(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| other.count.cmp(&self.count))
            .then_with(|| {
                let lhs = self.location.chars().flat_map(char::to_lowercase);
                let rhs = other.location.chars().flat_map(char::to_lowercase);
                lhs.cmp(rhs)
            })
    }
}

/// Sort results into ranking order.
pub fn rank(results: &mut [SearchResult]) {
    results.sort_by(SearchResult::compare_rank);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_higher_score_ranks_first() {
        let mut results = vec![
            SearchResult::with_values("a.txt", 4, 0.4),
            SearchResult::with_values("b.txt", 4, 1.0),
        ];
        rank(&mut results);

        assert_eq!(results[0].location(), "b.txt");
        assert_eq!(results[1].location(), "a.txt");
    }

    #[test]
    fn test_count_breaks_score_ties() {
        let mut results = vec![
            SearchResult::with_values("a.txt", 2, 0.5),
            SearchResult::with_values("b.txt", 6, 0.5),
        ];
        rank(&mut results);

        assert_eq!(results[0].location(), "b.txt");
    }

    #[test]
    fn test_location_breaks_remaining_ties_case_insensitively() {
        let mut results = vec![
            SearchResult::with_values("Zebra.txt", 3, 0.25),
            SearchResult::with_values("apple.txt", 3, 0.25),
        ];
        rank(&mut results);

        assert_eq!(results[0].location(), "apple.txt");
        assert_eq!(results[1].location(), "Zebra.txt");
    }

    #[test]
    fn test_add_matches_recomputes_score() {
        let mut result = SearchResult::new("doc");
        result.add_matches(2, 8);
        assert_eq!(result.count(), 2);
        assert_eq!(result.score(), 0.25);

        result.add_matches(2, 8);
        assert_eq!(result.count(), 4);
        assert_eq!(result.score(), 0.5);
    }

    #[test]
    fn test_serializes_location_as_where() {
        let json = serde_json::to_string(&SearchResult::with_values("doc", 1, 0.5)).unwrap();
        assert_eq!(json, r#"{"where":"doc","count":1,"score":0.5}"#);
    }
}
