//! Command implementations for the scour CLI.
//!
//! A run executes its stages in a fixed order: restore, build, crawl, query,
//! then the writers. A failing stage is reported and the run continues with
//! the next one. The run itself only fails when its settings cannot be
//! resolved.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};

use crate::analysis::TextAnalyzer;
use crate::builder::{IndexBuilder, ThreadedIndexBuilder};
use crate::cli::args::ScourArgs;
use crate::config::EngineConfig;
use crate::crawler::WebCrawler;
use crate::index::{ConcurrentIndex, InvertedIndex};
use crate::json;
use crate::search::query::{QueryHandler, QueryProcessor, QueryResults, ThreadedQueryHandler};

/// The index a run works on: owned in single-threaded mode, shared otherwise.
enum Engine {
    Single(InvertedIndex),
    Threaded(Arc<ConcurrentIndex>),
}

impl Engine {
    fn new(threaded: bool, index: InvertedIndex) -> Self {
        if threaded {
            Engine::Threaded(Arc::new(ConcurrentIndex::from_index(index)))
        } else {
            Engine::Single(index)
        }
    }

    fn with_index<R>(&self, f: impl FnOnce(&InvertedIndex) -> R) -> R {
        match self {
            Engine::Single(index) => f(index),
            Engine::Threaded(index) => index.with_read(f),
        }
    }
}

/// Settings resolved from the configuration file and the command line.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub config: EngineConfig,
    pub threaded: bool,
}

impl RunSettings {
    /// Merge `args` over the configuration file, if any. Flags win.
    pub fn resolve(args: &ScourArgs) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => EngineConfig::from_file(path)
                .with_context(|| format!("unable to load config {}", path.display()))?,
            None => EngineConfig::default(),
        };

        if let Some(threads) = args.thread_count() {
            config.threads = threads;
        }
        if let Some(stemmer) = args.stemmer {
            config.stemmer = stemmer;
        }
        config.crawl_limit = args.crawl_limit(config.crawl_limit);

        Ok(Self {
            config,
            threaded: args.is_threaded(),
        })
    }
}

/// Execute a full run as described by `args`.
pub fn execute_command(args: ScourArgs) -> Result<()> {
    let start = Instant::now();
    let settings = RunSettings::resolve(&args)?;
    let config = &settings.config;
    let analyzer = TextAnalyzer::from_config(config);

    log::info!(
        "running {} with {}",
        if settings.threaded { "threaded" } else { "single-threaded" },
        config.stemmer
    );

    let mut failures = 0usize;
    let mut report = |stage: &str, result: Result<()>| {
        if let Err(err) = result {
            failures += 1;
            eprintln!("Unable to {stage}: {err:#}");
        }
    };

    let restored = match &args.restore {
        Some(path) => match json::read_snapshot(path) {
            Ok(index) => index,
            Err(err) => {
                report("restore snapshot", Err(anyhow!(err)));
                InvertedIndex::new()
            }
        },
        None => InvertedIndex::new(),
    };
    let mut engine = Engine::new(settings.threaded, restored);

    if let Some(path) = &args.path {
        report("build index", build(&mut engine, &analyzer, config, path));
    }

    if let Some(seed) = &args.url {
        report("crawl", crawl(&engine, config, seed));
    }

    let mut results = QueryResults::new();
    if let Some(path) = &args.query {
        match query(&engine, &analyzer, config, path, args.exact) {
            Ok(found) => results = found,
            Err(err) => report("search queries", Err(err)),
        }
    }

    if let Some(path) = &args.counts {
        report(
            "write counts",
            engine
                .with_index(|index| json::write_counts(path, index.counts()))
                .with_context(|| format!("writing {}", path.display())),
        );
    }

    if let Some(path) = &args.index {
        report(
            "write index",
            engine
                .with_index(|index| json::write_index(path, index))
                .with_context(|| format!("writing {}", path.display())),
        );
    }

    if let Some(path) = &args.results {
        report(
            "write results",
            json::write_results(path, &results)
                .with_context(|| format!("writing {}", path.display())),
        );
    }

    if let Some(path) = &args.snapshot {
        report(
            "write snapshot",
            engine
                .with_index(|index| json::write_snapshot(path, index))
                .with_context(|| format!("writing {}", path.display())),
        );
    }

    if args.verbosity() > 0 {
        println!("Elapsed: {:.6} seconds", start.elapsed().as_secs_f64());
    }

    if failures > 0 {
        log::warn!("{failures} stage(s) failed");
    }
    Ok(())
}

fn build(engine: &mut Engine, analyzer: &TextAnalyzer, config: &EngineConfig, path: &Path) -> Result<()> {
    let summary = match engine {
        Engine::Single(index) => IndexBuilder::new(analyzer.clone()).build(path, index),
        Engine::Threaded(index) => {
            ThreadedIndexBuilder::new(analyzer.clone(), config.threads).build(path, index)
        }
    }
    .with_context(|| format!("walking {}", path.display()))?;

    for (file, err) in &summary.failed {
        eprintln!("Unable to index {}: {err}", file.display());
    }
    Ok(())
}

fn crawl(engine: &Engine, config: &EngineConfig, seed: &str) -> Result<()> {
    let Engine::Threaded(index) = engine else {
        return Err(anyhow!("crawling requires the threaded index"));
    };

    let crawler = WebCrawler::from_config(Arc::clone(index), config)?;
    crawler
        .crawl_from(seed)
        .with_context(|| format!("crawling from {seed:?}"))?;
    Ok(())
}

fn query(
    engine: &Engine,
    analyzer: &TextAnalyzer,
    config: &EngineConfig,
    path: &Path,
    exact: bool,
) -> Result<QueryResults> {
    let context = || format!("reading queries from {}", path.display());

    match engine {
        Engine::Single(index) => {
            let mut handler = QueryHandler::new(index, analyzer.clone());
            handler.parse_file(path, exact).with_context(context)?;
            Ok(handler.query_results().clone())
        }
        Engine::Threaded(index) => {
            let mut handler =
                ThreadedQueryHandler::new(Arc::clone(index), analyzer.clone(), config.threads);
            handler.parse_file(path, exact).with_context(context)?;
            Ok(handler.query_results())
        }
    }
}
