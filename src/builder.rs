//! Index builders.
//!
//! A document source is a path. A directory is walked recursively, following
//! symbolic links, and every regular file whose name ends in `.txt` or `.text`
//! (ignoring case) is a document. A file given directly is a document under
//! the same rule.
//! The location of a document is its path as produced by the walk.
//!
//! Every document is read whole and analyzed into words; the first word is at
//! position 1 and positions continue across lines.
//!
//! A document that cannot be read is recorded in the [`BuildSummary`] and
//! contributes nothing to the index; the build carries on with the rest.

use std::fs;
use std::mem;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ignore::WalkBuilder;
use parking_lot::Mutex;

use crate::analysis::TextAnalyzer;
use crate::error::{Result, ScourError};
use crate::index::{ConcurrentIndex, InvertedIndex};
use crate::sync::work_queue::WorkQueue;

/// Whether `path` names a text document by extension.
pub fn is_text_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .is_some_and(|name| name.ends_with(".txt") || name.ends_with(".text"))
}

/// Documents under `root`, in sorted path order.
pub fn text_files(root: &Path) -> Result<Vec<PathBuf>> {
    if fs::metadata(root)?.is_file() {
        let files = if is_text_file(root) {
            vec![root.to_path_buf()]
        } else {
            Vec::new()
        };
        return Ok(files);
    }

    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(true)
        .sort_by_file_path(|a, b| a.cmp(b))
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry?;
        let is_file = entry.file_type().is_some_and(|kind| kind.is_file());
        if is_file && is_text_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Location string for a document path.
pub fn location_of(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Outcome of a build.
#[derive(Debug, Default)]
pub struct BuildSummary {
    /// Documents added to the index, sorted.
    pub indexed: Vec<PathBuf>,

    /// Documents that could not be read, with the reason.
    pub failed: Vec<(PathBuf, ScourError)>,
}

impl BuildSummary {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    fn sort(&mut self) {
        self.indexed.sort();
        self.failed.sort_by(|a, b| a.0.cmp(&b.0));
    }
}

/// Analyze `text` and add its words to `index` under `location`.
///
/// Returns the number of words added.
pub fn add_text(
    analyzer: &TextAnalyzer,
    location: &str,
    text: &str,
    index: &mut InvertedIndex,
) -> Result<usize> {
    let words = analyzer.analyze(text)?;
    index.add_all(location, &words, 1);
    Ok(words.len())
}

/// Read the document at `path` and add its words to `index`.
pub fn add_file(analyzer: &TextAnalyzer, path: &Path, index: &mut InvertedIndex) -> Result<usize> {
    let text = fs::read_to_string(path)?;
    add_text(analyzer, &location_of(path), &text, index)
}

/// Builds an index on the calling thread.
#[derive(Debug, Clone, Default)]
pub struct IndexBuilder {
    analyzer: TextAnalyzer,
}

impl IndexBuilder {
    pub fn new(analyzer: TextAnalyzer) -> Self {
        Self { analyzer }
    }

    /// Add every document under `root` to `index`.
    pub fn build(&self, root: &Path, index: &mut InvertedIndex) -> Result<BuildSummary> {
        let mut summary = BuildSummary::default();

        for path in text_files(root)? {
            match add_file(&self.analyzer, &path, index) {
                Ok(words) => {
                    log::debug!("indexed {} ({words} words)", path.display());
                    summary.indexed.push(path);
                }
                Err(err) => {
                    log::warn!("unable to index {}: {err}", path.display());
                    summary.failed.push((path, err));
                }
            }
        }

        log::info!(
            "indexed {} documents from {}",
            summary.indexed.len(),
            root.display()
        );
        Ok(summary)
    }
}

/// Builds an index with a pool of workers, one task per document.
///
/// Each task fills a private index for its document and merges it into the
/// shared index with a single write-lock acquisition.
#[derive(Debug, Clone)]
pub struct ThreadedIndexBuilder {
    analyzer: TextAnalyzer,
    threads: usize,
}

impl ThreadedIndexBuilder {
    pub fn new(analyzer: TextAnalyzer, threads: usize) -> Self {
        Self { analyzer, threads }
    }

    /// Add every document under `root` to `index`, returning once all
    /// documents have been processed and the workers have stopped.
    pub fn build(&self, root: &Path, index: &Arc<ConcurrentIndex>) -> Result<BuildSummary> {
        let files = text_files(root)?;
        let summary = Arc::new(Mutex::new(BuildSummary::default()));
        let mut queue = WorkQueue::new(self.threads)?;

        for path in files {
            let analyzer = self.analyzer.clone();
            let index = Arc::clone(index);
            let summary = Arc::clone(&summary);

            queue.submit(move || {
                let mut local = InvertedIndex::new();
                match add_file(&analyzer, &path, &mut local) {
                    Ok(words) => {
                        index.merge(local);
                        log::debug!("indexed {} ({words} words)", path.display());
                        summary.lock().indexed.push(path);
                    }
                    Err(err) => {
                        log::warn!("unable to index {}: {err}", path.display());
                        summary.lock().failed.push((path, err));
                    }
                }
            })?;
        }

        queue.finish();
        queue.shutdown();

        let mut summary = mem::take(&mut *summary.lock());
        summary.sort();
        log::info!(
            "indexed {} documents from {} with {} workers",
            summary.indexed.len(),
            root.display(),
            self.threads
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn write(dir: &Path, name: &str, text: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_is_text_file() {
        assert!(is_text_file(Path::new("a/b.txt")));
        assert!(is_text_file(Path::new("B.TEXT")));
        assert!(is_text_file(Path::new("notes.Txt")));
        assert!(!is_text_file(Path::new("b.html")));
        assert!(!is_text_file(Path::new("txt")));
    }

    #[test]
    fn test_text_files_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "b.txt", "b");
        write(dir.path(), "a/nested.TEXT", "n");
        write(dir.path(), "skip.md", "s");
        write(dir.path(), ".hidden.txt", "h");

        let files = text_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            names,
            vec![
                PathBuf::from(".hidden.txt"),
                PathBuf::from("a/nested.TEXT"),
                PathBuf::from("b.txt"),
            ]
        );
    }

    #[test]
    fn test_single_file_must_be_text_file() {
        let dir = TempDir::new().unwrap();
        let skipped = write(dir.path(), "notes.md", "alpha beta");
        let kept = write(dir.path(), "notes.txt", "alpha beta");

        assert!(text_files(&skipped).unwrap().is_empty());
        assert_eq!(text_files(&kept).unwrap(), vec![kept.clone()]);

        let mut index = InvertedIndex::new();
        let summary = IndexBuilder::default().build(&skipped, &mut index).unwrap();
        assert!(summary.indexed.is_empty());
        assert!(index.is_empty());
    }

    #[test]
    fn test_unreadable_document_is_skipped() {
        let dir = TempDir::new().unwrap();
        let good = write(dir.path(), "good.txt", "alpha beta gamma");
        let bad = dir.path().join("bad.txt");
        fs::write(&bad, [0xff, 0xfe, 0x00, 0xc3]).unwrap();

        let check = |summary: &BuildSummary, counts: &std::collections::BTreeMap<String, usize>| {
            assert_eq!(summary.failed.len(), 1);
            assert_eq!(summary.failed[0].0, bad);
            assert!(matches!(summary.failed[0].1, ScourError::Io(_)));
            assert_eq!(summary.indexed, vec![good.clone()]);
            assert_eq!(counts.get(&location_of(&good)), Some(&3));
            assert!(!counts.contains_key(&location_of(&bad)));
        };

        let mut index = InvertedIndex::new();
        let summary = IndexBuilder::default().build(dir.path(), &mut index).unwrap();
        check(&summary, index.counts());

        let shared = Arc::new(ConcurrentIndex::new());
        let summary = ThreadedIndexBuilder::new(TextAnalyzer::default(), 3)
            .build(dir.path(), &shared)
            .unwrap();
        check(&summary, &shared.counts());
    }

    #[test]
    fn test_positions_continue_across_lines() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "doc.txt", "Hello world\n\nhello again, world");

        let mut index = InvertedIndex::new();
        let summary = IndexBuilder::default().build(&path, &mut index).unwrap();
        let location = location_of(&path);

        assert_eq!(summary.indexed, vec![path]);
        assert_eq!(index.word_count(&location), Some(5));
        assert_eq!(
            index.positions("hello", &location).unwrap().iter().copied().collect::<Vec<_>>(),
            vec![1, 3]
        );
        assert!(index.contains_position("again", &location, 4));
    }

    #[test]
    fn test_missing_root_is_error() {
        let mut index = InvertedIndex::new();
        let result = IndexBuilder::default().build(Path::new("/nonexistent/root"), &mut index);
        assert!(matches!(result, Err(ScourError::Io(_))));
    }

    #[test]
    fn test_threaded_build_matches_single_threaded() {
        let dir = TempDir::new().unwrap();
        for i in 0..20 {
            write(
                dir.path(),
                &format!("dir{}/doc{i}.txt", i % 3),
                &format!("document number {i} talks about cats and dogs {}", "word ".repeat(i)),
            );
        }

        let mut expected = InvertedIndex::new();
        IndexBuilder::default().build(dir.path(), &mut expected).unwrap();

        let shared = Arc::new(ConcurrentIndex::new());
        let summary = ThreadedIndexBuilder::new(TextAnalyzer::default(), 4)
            .build(dir.path(), &shared)
            .unwrap();

        assert_eq!(summary.indexed.len(), 20);
        assert!(summary.is_complete());
        assert_eq!(shared.snapshot(), expected);
    }
}
