//! Query handlers.
//!
//! A query line is normalized into its distinct stems; the sorted stems joined
//! by single spaces form the query key. Results are computed once per key:
//! parsing a line whose key is already known does nothing, even if the search
//! mode differs from the one the stored results were computed with.
//!
//! [`QueryHandler`] searches a borrowed [`InvertedIndex`] on the calling thread.
//! [`ThreadedQueryHandler`] searches a shared [`ConcurrentIndex`] and runs one
//! [`WorkQueue`] task per line of a query file.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::analysis::TextAnalyzer;
use crate::error::Result;
use crate::index::{ConcurrentIndex, InvertedIndex};
use crate::json;
use crate::search::result::SearchResult;
use crate::sync::work_queue::WorkQueue;

/// Query key to ranked results.
pub type QueryResults = BTreeMap<String, Vec<SearchResult>>;

/// Canonical key for a set of stems.
pub fn query_key(stems: &BTreeSet<String>) -> String {
    stems.iter().map(String::as_str).collect::<Vec<_>>().join(" ")
}

/// Operations shared by the single-threaded and threaded handlers.
pub trait QueryProcessor {
    /// Search one query line and store its results under its key.
    ///
    /// Lines without any stem are ignored. Lines whose key is already stored
    /// are not searched again.
    fn parse_query(&mut self, line: &str, exact: bool) -> Result<()>;

    /// Parse every line of a query file.
    fn parse_file(&mut self, path: &Path, exact: bool) -> Result<()>;

    /// Stored query keys, sorted.
    fn queries(&self) -> Vec<String>;

    /// Results stored under `key`.
    fn results(&self, key: &str) -> Option<Vec<SearchResult>>;

    /// Number of stored queries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write every stored query and its results as pretty JSON.
    fn write_results(&self, path: &Path) -> Result<()>;
}

/// Single-threaded query handler over a borrowed index.
#[derive(Debug)]
pub struct QueryHandler<'a> {
    index: &'a InvertedIndex,
    analyzer: TextAnalyzer,
    results: QueryResults,
}

impl<'a> QueryHandler<'a> {
    pub fn new(index: &'a InvertedIndex, analyzer: TextAnalyzer) -> Self {
        Self {
            index,
            analyzer,
            results: BTreeMap::new(),
        }
    }

    /// All stored results.
    pub fn query_results(&self) -> &QueryResults {
        &self.results
    }
}

impl QueryProcessor for QueryHandler<'_> {
    fn parse_query(&mut self, line: &str, exact: bool) -> Result<()> {
        let stems = self.analyzer.unique_stems(line)?;
        if stems.is_empty() {
            return Ok(());
        }

        let key = query_key(&stems);
        if self.results.contains_key(&key) {
            return Ok(());
        }

        let found = self.index.search(&stems, exact);
        self.results.insert(key, found);
        Ok(())
    }

    fn parse_file(&mut self, path: &Path, exact: bool) -> Result<()> {
        let reader = BufReader::new(File::open(path)?);
        for line in reader.lines() {
            self.parse_query(&line?, exact)?;
        }
        Ok(())
    }

    fn queries(&self) -> Vec<String> {
        self.results.keys().cloned().collect()
    }

    fn results(&self, key: &str) -> Option<Vec<SearchResult>> {
        self.results.get(key).cloned()
    }

    fn len(&self) -> usize {
        self.results.len()
    }

    fn write_results(&self, path: &Path) -> Result<()> {
        json::write_results(path, &self.results)
    }
}

/// Query handler over a shared index, searching query-file lines in parallel.
///
/// The result map sits behind a mutex that is held only to check for and
/// insert a key; searches run outside it. Two tasks racing on the same key
/// may both search, and the first insert wins.
#[derive(Debug, Clone)]
pub struct ThreadedQueryHandler {
    index: Arc<ConcurrentIndex>,
    analyzer: TextAnalyzer,
    results: Arc<Mutex<QueryResults>>,
    threads: usize,
}

impl ThreadedQueryHandler {
    pub fn new(index: Arc<ConcurrentIndex>, analyzer: TextAnalyzer, threads: usize) -> Self {
        Self {
            index,
            analyzer,
            results: Arc::new(Mutex::new(BTreeMap::new())),
            threads,
        }
    }

    /// Search one line on the calling thread.
    pub fn parse_line(&self, line: &str, exact: bool) -> Result<()> {
        process_line(&self.index, &self.analyzer, &self.results, line, exact)
    }

    /// Submit one task per line of `path`, then wait for all of them and
    /// stop the workers.
    pub fn parse_lines(&self, path: &Path, exact: bool) -> Result<()> {
        let reader = BufReader::new(File::open(path)?);
        let mut queue = WorkQueue::new(self.threads)?;

        for line in reader.lines() {
            let line = line?;
            let index = Arc::clone(&self.index);
            let analyzer = self.analyzer.clone();
            let results = Arc::clone(&self.results);
            queue.submit(move || {
                if let Err(err) = process_line(&index, &analyzer, &results, &line, exact) {
                    log::warn!("query {line:?} failed: {err}");
                }
            })?;
        }

        queue.finish();
        queue.shutdown();
        Ok(())
    }

    /// Copy of all stored results.
    pub fn query_results(&self) -> QueryResults {
        self.results.lock().clone()
    }
}

fn process_line(
    index: &ConcurrentIndex,
    analyzer: &TextAnalyzer,
    results: &Mutex<QueryResults>,
    line: &str,
    exact: bool,
) -> Result<()> {
    let stems = analyzer.unique_stems(line)?;
    if stems.is_empty() {
        return Ok(());
    }

    let key = query_key(&stems);
    if results.lock().contains_key(&key) {
        return Ok(());
    }

    let found = index.search(&stems, exact);
    results.lock().entry(key).or_insert(found);
    Ok(())
}

impl QueryProcessor for ThreadedQueryHandler {
    fn parse_query(&mut self, line: &str, exact: bool) -> Result<()> {
        self.parse_line(line, exact)
    }

    fn parse_file(&mut self, path: &Path, exact: bool) -> Result<()> {
        self.parse_lines(path, exact)
    }

    fn queries(&self) -> Vec<String> {
        self.results.lock().keys().cloned().collect()
    }

    fn results(&self, key: &str) -> Option<Vec<SearchResult>> {
        self.results.lock().get(key).cloned()
    }

    fn len(&self) -> usize {
        self.results.lock().len()
    }

    fn write_results(&self, path: &Path) -> Result<()> {
        let results = self.query_results();
        json::write_results(path, &results)
    }
}
