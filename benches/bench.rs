//! Criterion benchmarks for scour.
//!
//! Covers the hot paths of a run:
//! - Text analysis
//! - Index construction and merging
//! - Exact and prefix search
//! - Query handling, single-threaded and threaded

use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use scour::analysis::{StemmerKind, TextAnalyzer};
use scour::index::{ConcurrentIndex, InvertedIndex};
use scour::search::{QueryHandler, QueryProcessor, ThreadedQueryHandler};

/// Generate test documents for benchmarking.
fn generate_test_documents(count: usize) -> Vec<String> {
    let words = [
        "search",
        "engine",
        "indexing",
        "indexes",
        "queries",
        "querying",
        "documents",
        "locations",
        "positions",
        "computers",
        "computing",
        "complexity",
        "ranking",
        "ranked",
        "crawling",
        "crawler",
        "threads",
        "threaded",
        "locking",
        "readers",
        "writers",
        "stemming",
        "stemmed",
        "relevance",
    ];

    let mut documents = Vec::with_capacity(count);
    for i in 0..count {
        let doc_length = 50 + (i % 100); // Variable length documents
        let mut doc_words = Vec::with_capacity(doc_length);

        for j in 0..doc_length {
            let word_idx = (i * 7 + j * 13) % words.len(); // Pseudo-random distribution
            doc_words.push(words[word_idx]);
        }

        documents.push(doc_words.join(" "));
    }

    documents
}

fn build_index(analyzer: &TextAnalyzer, documents: &[String]) -> InvertedIndex {
    let mut index = InvertedIndex::new();
    for (i, text) in documents.iter().enumerate() {
        let words = analyzer.analyze(text).unwrap();
        index.add_all(&format!("doc{i}.txt"), &words, 1);
    }
    index
}

/// Benchmark text analysis.
fn bench_text_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_analysis");
    let documents = generate_test_documents(100);

    for kind in [StemmerKind::Porter, StemmerKind::Simple] {
        let analyzer = TextAnalyzer::standard(kind);
        group.throughput(Throughput::Elements(100));
        group.bench_function(format!("analyze_batch_{kind}"), |b| {
            b.iter(|| {
                for text in &documents {
                    black_box(analyzer.analyze(black_box(text)).unwrap());
                }
            })
        });
    }

    group.finish();
}

/// Benchmark index construction.
fn bench_indexing(c: &mut Criterion) {
    let mut group = c.benchmark_group("indexing");
    let analyzer = TextAnalyzer::default();
    let documents = generate_test_documents(200);
    let analyzed: Vec<Vec<String>> = documents
        .iter()
        .map(|text| analyzer.analyze(text).unwrap())
        .collect();

    group.throughput(Throughput::Elements(analyzed.len() as u64));
    group.bench_function("add_all", |b| {
        b.iter(|| {
            let mut index = InvertedIndex::new();
            for (i, words) in analyzed.iter().enumerate() {
                index.add_all(&format!("doc{i}.txt"), words, 1);
            }
            black_box(index)
        })
    });

    group.bench_function("merge_per_document", |b| {
        b.iter(|| {
            let shared = ConcurrentIndex::new();
            for (i, words) in analyzed.iter().enumerate() {
                let mut local = InvertedIndex::new();
                local.add_all(&format!("doc{i}.txt"), words, 1);
                shared.merge(local);
            }
            black_box(shared)
        })
    });

    group.finish();
}

/// Benchmark exact and prefix search.
fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    let analyzer = TextAnalyzer::default();
    let index = build_index(&analyzer, &generate_test_documents(1000));

    group.bench_function("exact_search", |b| {
        b.iter(|| black_box(index.exact_search(black_box(["comput", "rank"]))))
    });

    group.bench_function("partial_search", |b| {
        b.iter(|| black_box(index.partial_search(black_box(["c", "r"]))))
    });

    group.finish();
}

/// Benchmark query handling over many lines.
fn bench_query_handlers(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_handlers");
    group.sample_size(20);

    let analyzer = TextAnalyzer::default();
    let index = build_index(&analyzer, &generate_test_documents(500));
    let lines: Vec<String> = generate_test_documents(200)
        .into_iter()
        .map(|text| text.split(' ').take(3).collect::<Vec<_>>().join(" "))
        .collect();

    group.throughput(Throughput::Elements(lines.len() as u64));
    group.bench_function("single_threaded", |b| {
        b.iter(|| {
            let mut handler = QueryHandler::new(&index, analyzer.clone());
            for line in &lines {
                handler.parse_query(line, false).unwrap();
            }
            black_box(handler.len())
        })
    });

    let shared = Arc::new(ConcurrentIndex::from_index(index.clone()));
    group.bench_function("threaded_lines", |b| {
        b.iter(|| {
            let handler = ThreadedQueryHandler::new(Arc::clone(&shared), analyzer.clone(), 4);
            for line in &lines {
                handler.parse_line(line, false).unwrap();
            }
            black_box(handler.query_results().len())
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_text_analysis,
    bench_indexing,
    bench_search,
    bench_query_handlers
);

criterion_main!(benches);
