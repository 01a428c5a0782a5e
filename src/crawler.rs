//! Multithreaded web crawler.
//!
//! Starting from a seed URL, every visited page is fetched, cleaned, indexed
//! under its URL and mined for links. New links are visited until the total
//! number of distinct URLs reaches the crawl limit. The limit caps the whole
//! crawl, not a single page's fan-out.
//!
//! The visited set sits behind one mutex. Checking the limit, checking for a
//! duplicate and recording a new URL happen in a single critical section, so
//! no URL is ever scheduled twice and the limit is never exceeded.
//!
//! - [`fetch`] - [`Fetcher`] trait and the HTTP implementation
//! - [`html`] - [`HtmlCleaner`] trait and the regex implementation

pub mod fetch;
pub mod html;

use std::mem;
use std::sync::Arc;

use ahash::AHashSet;
use parking_lot::Mutex;
use url::Url;

pub use fetch::{Fetcher, HttpFetcher};
pub use html::{CleanedPage, HtmlCleaner, RegexHtmlCleaner};

use crate::analysis::TextAnalyzer;
use crate::builder::add_text;
use crate::config::{DEFAULT_CRAWL_LIMIT, DEFAULT_THREADS, EngineConfig};
use crate::error::Result;
use crate::index::{ConcurrentIndex, InvertedIndex};
use crate::sync::work_queue::{TaskSubmitter, WorkQueue};

#[derive(Debug, Default)]
struct Visited {
    seen: AHashSet<Url>,
    order: Vec<Url>,
}

impl Visited {
    /// Record `url` if it is new and the limit has room for it.
    fn add(&mut self, url: &Url, limit: usize) -> bool {
        if self.order.len() >= limit || self.seen.contains(url) {
            return false;
        }
        self.seen.insert(url.clone());
        self.order.push(url.clone());
        true
    }

    fn is_full(&self, limit: usize) -> bool {
        self.order.len() >= limit
    }
}

/// State shared by all tasks of one crawl.
struct Crawl {
    index: Arc<ConcurrentIndex>,
    analyzer: TextAnalyzer,
    fetcher: Arc<dyn Fetcher>,
    cleaner: Arc<dyn HtmlCleaner>,
    limit: usize,
    visited: Mutex<Visited>,
    submitter: TaskSubmitter,
}

impl Crawl {
    fn schedule(self: &Arc<Self>, url: Url) -> Result<()> {
        let crawl = Arc::clone(self);
        self.submitter.submit(move || crawl.visit(url))
    }

    fn visit(self: &Arc<Self>, url: Url) {
        let Some(html) = self.fetcher.fetch(&url) else {
            log::debug!("skipping {url}: nothing fetched");
            return;
        };
        let page = self.cleaner.clean(&url, &html);

        let mut local = InvertedIndex::new();
        match add_text(&self.analyzer, url.as_str(), &page.text, &mut local) {
            Ok(words) => {
                self.index.merge(local);
                log::debug!("indexed {url} ({words} words, {} links)", page.links.len());
            }
            Err(err) => {
                log::warn!("unable to index {url}: {err}");
                return;
            }
        }

        let mut visited = self.visited.lock();
        for link in page.links {
            if visited.is_full(self.limit) {
                break;
            }
            if visited.add(&link, self.limit) {
                if let Err(err) = self.schedule(link) {
                    log::warn!("unable to schedule link from {url}: {err}");
                }
            }
        }
    }
}

/// Crawls the web from a seed URL into a shared index.
pub struct WebCrawler {
    index: Arc<ConcurrentIndex>,
    analyzer: TextAnalyzer,
    fetcher: Arc<dyn Fetcher>,
    cleaner: Arc<dyn HtmlCleaner>,
    threads: usize,
    limit: usize,
}

impl WebCrawler {
    /// A crawler with the default worker count and crawl limit.
    pub fn new(
        index: Arc<ConcurrentIndex>,
        analyzer: TextAnalyzer,
        fetcher: Arc<dyn Fetcher>,
        cleaner: Arc<dyn HtmlCleaner>,
    ) -> Self {
        Self {
            index,
            analyzer,
            fetcher,
            cleaner,
            threads: DEFAULT_THREADS,
            limit: DEFAULT_CRAWL_LIMIT,
        }
    }

    /// A crawler using HTTP and the regex cleaner, configured from `config`.
    pub fn from_config(index: Arc<ConcurrentIndex>, config: &EngineConfig) -> Result<Self> {
        let crawler = Self::new(
            index,
            TextAnalyzer::from_config(config),
            Arc::new(HttpFetcher::from_config(config)?),
            Arc::new(RegexHtmlCleaner::new()?),
        );
        Ok(crawler
            .with_threads(config.threads)
            .with_limit(config.crawl_limit))
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Set the maximum number of distinct URLs to visit. The seed is always
    /// visited, so a limit of zero behaves like one.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Parse `seed` and crawl from it.
    pub fn crawl_from(&self, seed: &str) -> Result<Vec<Url>> {
        let seed = Url::parse(seed.trim())?;
        self.crawl(&seed)
    }

    /// Crawl from `seed` and return every URL visited, seed first.
    ///
    /// Pages that cannot be fetched still count as visited but contribute
    /// nothing to the index.
    pub fn crawl(&self, seed: &Url) -> Result<Vec<Url>> {
        let mut queue = WorkQueue::new(self.threads)?;

        let crawl = Arc::new(Crawl {
            index: Arc::clone(&self.index),
            analyzer: self.analyzer.clone(),
            fetcher: Arc::clone(&self.fetcher),
            cleaner: Arc::clone(&self.cleaner),
            limit: self.limit,
            visited: Mutex::new(Visited::default()),
            submitter: queue.submitter(),
        });

        let mut seed = seed.clone();
        seed.set_fragment(None);
        crawl.visited.lock().add(&seed, self.limit);
        crawl.schedule(seed.clone())?;

        queue.finish();
        queue.shutdown();

        let visited = mem::take(&mut crawl.visited.lock().order);
        log::info!("crawled {} pages starting at {seed}", visited.len());
        Ok(visited)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Serves pages from memory and counts fetches.
    struct MemoryFetcher {
        pages: HashMap<Url, String>,
        fetches: AtomicUsize,
    }

    impl MemoryFetcher {
        fn new(pages: impl IntoIterator<Item = (String, String)>) -> Self {
            Self {
                pages: pages
                    .into_iter()
                    .map(|(url, html)| (Url::parse(&url).unwrap(), html))
                    .collect(),
                fetches: AtomicUsize::new(0),
            }
        }
    }

    impl Fetcher for MemoryFetcher {
        fn fetch(&self, url: &Url) -> Option<String> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.pages.get(url).cloned()
        }
    }

    fn page(url: usize) -> String {
        format!("https://site.test/{url}")
    }

    /// Page `i` links to pages `2i + 1` and `2i + 2`.
    fn tree(pages: usize) -> Arc<MemoryFetcher> {
        Arc::new(MemoryFetcher::new((0..pages).map(|i| {
            let html = format!(
                "<html><body><p>page number {i}</p><a href=\"/{}\">left</a><a href=\"/{}\">right</a></body></html>",
                2 * i + 1,
                2 * i + 2
            );
            (page(i), html)
        })))
    }

    fn crawler(index: &Arc<ConcurrentIndex>, fetcher: Arc<MemoryFetcher>) -> WebCrawler {
        WebCrawler::new(
            Arc::clone(index),
            TextAnalyzer::default(),
            fetcher,
            Arc::new(RegexHtmlCleaner::new().unwrap()),
        )
    }

    #[test]
    fn test_crawl_stops_at_limit() {
        let index = Arc::new(ConcurrentIndex::new());
        let fetcher = tree(500);
        let visited = crawler(&index, Arc::clone(&fetcher))
            .with_threads(4)
            .with_limit(50)
            .crawl(&Url::parse(&page(0)).unwrap())
            .unwrap();

        let distinct: AHashSet<&Url> = visited.iter().collect();
        assert_eq!(visited.len(), 50);
        assert_eq!(distinct.len(), 50);
        assert_eq!(visited[0].as_str(), page(0));
        assert_eq!(fetcher.fetches.load(Ordering::SeqCst), 50);

        // Links past the last page are visited but fetch nothing.
        let existing = visited
            .iter()
            .filter(|url| url.path()[1..].parse::<usize>().is_ok_and(|id| id < 500))
            .count();
        assert_eq!(index.counts().len(), existing);
    }

    #[test]
    fn test_crawl_indexes_page_text_under_url() {
        let index = Arc::new(ConcurrentIndex::new());
        let visited = crawler(&index, tree(3))
            .with_threads(2)
            .crawl(&Url::parse(&page(0)).unwrap())
            .unwrap();

        // Pages 0..3 exist; 3..7 are linked but missing.
        assert_eq!(visited.len(), 7);
        assert_eq!(index.counts().len(), 3);
        assert!(index.contains_location("page", &page(2)));
        // Digits are dropped: "page number left right".
        assert_eq!(index.word_count(&page(1)), Some(4));
    }

    #[test]
    fn test_duplicate_links_visited_once() {
        let index = Arc::new(ConcurrentIndex::new());
        let html = "<a href=\"/a\">a</a><a href=\"/a#x\">a</a><a href=\"/\">home</a>".to_string();
        let fetcher = Arc::new(MemoryFetcher::new([
            (page(0).replace("/0", "/"), html.clone()),
            ("https://site.test/a".to_string(), html),
        ]));

        let visited = crawler(&index, Arc::clone(&fetcher))
            .crawl(&Url::parse("https://site.test/").unwrap())
            .unwrap();

        assert_eq!(visited.len(), 2);
        assert_eq!(fetcher.fetches.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unreachable_seed_is_still_visited() {
        let index = Arc::new(ConcurrentIndex::new());
        let fetcher = Arc::new(MemoryFetcher::new(Vec::new()));
        let visited = crawler(&index, fetcher)
            .with_limit(0)
            .crawl(&Url::parse("https://nowhere.test/").unwrap())
            .unwrap();

        assert_eq!(visited.len(), 1);
        assert!(index.is_empty());
    }

    #[test]
    fn test_crawl_from_rejects_invalid_seed() {
        let index = Arc::new(ConcurrentIndex::new());
        let fetcher = tree(3);
        let crawler = crawler(&index, Arc::clone(&fetcher));

        let err = crawler.crawl_from("not a url").unwrap_err();
        assert!(matches!(err, crate::error::ScourError::Url(_)));
        assert_eq!(fetcher.fetches.load(Ordering::SeqCst), 0);

        let visited = crawler.crawl_from(&page(2)).unwrap();
        assert_eq!(visited.len(), 3);
    }
}
