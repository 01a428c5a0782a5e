//! In-memory inverted index.
//!
//! Maps every word to the locations it occurs in and, per location, the
//! ordered set of 1-based positions. A second map records the word count of
//! every location, which is the largest position ever added for it.
//!
//! The index is not synchronized; wrap it in
//! [`ConcurrentIndex`](crate::index::concurrent::ConcurrentIndex) to share it
//! between threads.
//!
//! # Examples
//!
//! ```
//! use scour::index::InvertedIndex;
//!
//! let mut index = InvertedIndex::new();
//! index.add_all("hello.txt", &["hello", "world", "hello"], 1);
//!
//! assert!(index.contains_position("hello", "hello.txt", 3));
//! assert_eq!(index.word_count("hello.txt"), Some(3));
//!
//! let results = index.exact_search(["hello"]);
//! assert_eq!(results[0].count(), 2);
//! ```

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::search::result::{SearchResult, rank};

/// Word to location to positions, plus per-location word counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvertedIndex {
    index: BTreeMap<String, BTreeMap<String, BTreeSet<usize>>>,
    counts: BTreeMap<String, usize>,
}

impl InvertedIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `word` at `position` (1-based) in `location`.
    ///
    /// Returns `true` if the position was not already recorded. The word
    /// count of `location` grows to `position` if it was smaller.
    pub fn add(&mut self, word: &str, location: &str, position: usize) -> bool {
        debug_assert!(position > 0, "positions are 1-based");

        let added = self
            .index
            .entry(word.to_owned())
            .or_default()
            .entry(location.to_owned())
            .or_default()
            .insert(position);

        let count = self.counts.entry(location.to_owned()).or_insert(position);
        if position > *count {
            *count = position;
        }

        added
    }

    /// Record consecutive words for `location`, the first at `start`.
    pub fn add_all<S: AsRef<str>>(&mut self, location: &str, words: &[S], start: usize) {
        for (offset, word) in words.iter().enumerate() {
            self.add(word.as_ref(), location, start + offset);
        }
    }

    /// Merge `other` into this index.
    ///
    /// Position sets are unioned. Word counts take the larger of the two
    /// values per location; they are never summed.
    pub fn merge(&mut self, other: InvertedIndex) {
        for (word, locations) in other.index {
            match self.index.entry(word) {
                Entry::Vacant(entry) => {
                    entry.insert(locations);
                }
                Entry::Occupied(mut entry) => {
                    let existing = entry.get_mut();
                    for (location, positions) in locations {
                        existing.entry(location).or_default().extend(positions);
                    }
                }
            }
        }

        for (location, count) in other.counts {
            let existing = self.counts.entry(location).or_insert(count);
            if count > *existing {
                *existing = count;
            }
        }
    }

    /// Word count per location.
    pub fn counts(&self) -> &BTreeMap<String, usize> {
        &self.counts
    }

    /// Word count of one location.
    pub fn word_count(&self, location: &str) -> Option<usize> {
        self.counts.get(location).copied()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    pub fn contains_location(&self, word: &str, location: &str) -> bool {
        self.index
            .get(word)
            .is_some_and(|locations| locations.contains_key(location))
    }

    pub fn contains_position(&self, word: &str, location: &str, position: usize) -> bool {
        self.positions(word, location)
            .is_some_and(|positions| positions.contains(&position))
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of locations containing `word`.
    pub fn location_count(&self, word: &str) -> usize {
        self.index.get(word).map_or(0, BTreeMap::len)
    }

    /// All words in sorted order.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    /// Locations containing `word`, in sorted order.
    pub fn locations<'a>(&'a self, word: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.index
            .get(word)
            .into_iter()
            .flat_map(|locations| locations.keys().map(String::as_str))
    }

    /// Positions of `word` in `location`.
    pub fn positions(&self, word: &str, location: &str) -> Option<&BTreeSet<usize>> {
        self.index.get(word)?.get(location)
    }

    /// Full nested view, word to location to positions.
    pub fn entries(&self) -> &BTreeMap<String, BTreeMap<String, BTreeSet<usize>>> {
        &self.index
    }

    /// Exact search when `exact` is set, prefix search otherwise.
    pub fn search<I>(&self, queries: I, exact: bool) -> Vec<SearchResult>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        if exact {
            self.exact_search(queries)
        } else {
            self.partial_search(queries)
        }
    }

    /// Rank every location containing one of the query words.
    pub fn exact_search<I>(&self, queries: I) -> Vec<SearchResult>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let queries: Vec<I::Item> = queries.into_iter().collect();
        let matched: BTreeSet<&str> = queries
            .iter()
            .filter_map(|query| self.index.get_key_value(query.as_ref()))
            .map(|(word, _)| word.as_str())
            .collect();

        self.collect_results(matched)
    }

    /// Rank every location containing a word that starts with one of the
    /// query words.
    ///
    /// Words sharing a prefix are contiguous in the sorted word map, so each
    /// query scans forward from the first word not less than itself until a
    /// word no longer starts with it. A word matched by several queries is
    /// counted once.
    pub fn partial_search<I>(&self, queries: I) -> Vec<SearchResult>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut matched: BTreeSet<&str> = BTreeSet::new();
        for query in queries {
            let query = query.as_ref();
            let range = self
                .index
                .range::<str, _>((Bound::Included(query), Bound::Unbounded));
            for (word, _) in range {
                if !word.starts_with(query) {
                    break;
                }
                matched.insert(word.as_str());
            }
        }

        self.collect_results(matched)
    }

    fn collect_results<'a, I>(&'a self, words: I) -> Vec<SearchResult>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut results: Vec<SearchResult> = Vec::new();
        let mut slots: AHashMap<&'a str, usize> = AHashMap::new();

        for word in words {
            let Some(locations) = self.index.get(word) else {
                continue;
            };

            for (location, positions) in locations {
                let slot = *slots.entry(location.as_str()).or_insert_with(|| {
                    results.push(SearchResult::new(location.as_str()));
                    results.len() - 1
                });
                let word_count = self.word_count(location).unwrap_or_default();
                results[slot].add_matches(positions.len(), word_count);
            }
        }

        rank(&mut results);
        results
    }
}
