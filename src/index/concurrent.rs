//! Thread-safe inverted index.
//!
//! Wraps an [`InvertedIndex`] in a [`ReadWriteLock`]. Mutations take the write
//! side; inspection and search take the read side. Accessors return owned
//! copies so no reference into the index escapes the lock.

use std::collections::{BTreeMap, BTreeSet};

use crate::index::inverted::InvertedIndex;
use crate::search::result::SearchResult;
use crate::sync::lock::ReadWriteLock;

/// An [`InvertedIndex`] that can be shared between threads.
#[derive(Debug, Default)]
pub struct ConcurrentIndex {
    inner: ReadWriteLock<InvertedIndex>,
}

impl ConcurrentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing index.
    pub fn from_index(index: InvertedIndex) -> Self {
        Self {
            inner: ReadWriteLock::new(index),
        }
    }

    /// Unwrap the underlying index.
    pub fn into_inner(self) -> InvertedIndex {
        self.inner.into_inner()
    }

    pub fn add(&self, word: &str, location: &str, position: usize) -> bool {
        self.inner.write().add(word, location, position)
    }

    pub fn add_all<S: AsRef<str>>(&self, location: &str, words: &[S], start: usize) {
        self.inner.write().add_all(location, words, start);
    }

    /// Merge a locally built index under a single write acquisition.
    pub fn merge(&self, other: InvertedIndex) {
        self.inner.write().merge(other);
    }

    /// Run `f` with shared access to the index.
    pub fn with_read<R>(&self, f: impl FnOnce(&InvertedIndex) -> R) -> R {
        f(&self.inner.read())
    }

    /// Clone the current contents.
    pub fn snapshot(&self) -> InvertedIndex {
        self.inner.read().clone()
    }

    pub fn counts(&self) -> BTreeMap<String, usize> {
        self.inner.read().counts().clone()
    }

    pub fn word_count(&self, location: &str) -> Option<usize> {
        self.inner.read().word_count(location)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.inner.read().contains(word)
    }

    pub fn contains_location(&self, word: &str, location: &str) -> bool {
        self.inner.read().contains_location(word, location)
    }

    pub fn contains_position(&self, word: &str, location: &str, position: usize) -> bool {
        self.inner.read().contains_position(word, location, position)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn location_count(&self, word: &str) -> usize {
        self.inner.read().location_count(word)
    }

    pub fn words(&self) -> Vec<String> {
        self.inner.read().words().map(str::to_owned).collect()
    }

    pub fn locations(&self, word: &str) -> Vec<String> {
        self.inner.read().locations(word).map(str::to_owned).collect()
    }

    pub fn positions(&self, word: &str, location: &str) -> Option<BTreeSet<usize>> {
        self.inner.read().positions(word, location).cloned()
    }

    pub fn search<I>(&self, queries: I, exact: bool) -> Vec<SearchResult>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.inner.read().search(queries, exact)
    }

    pub fn exact_search<I>(&self, queries: I) -> Vec<SearchResult>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.inner.read().exact_search(queries)
    }

    pub fn partial_search<I>(&self, queries: I) -> Vec<SearchResult>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.inner.read().partial_search(queries)
    }
}

impl From<InvertedIndex> for ConcurrentIndex {
    fn from(index: InvertedIndex) -> Self {
        Self::from_index(index)
    }
}
