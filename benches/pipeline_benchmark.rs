//! Benchmarks for rankpdf classification and ranking.
//!
//! Run with: cargo bench
//!
//! Layouts are built in memory so the numbers exclude PDF decoding.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rankpdf::model::{flags, Block, Line, Span};
use rankpdf::{
    Corpus, HashingEmbedder, JobToBeDone, PageBlockClassifier, PageLayout, ParsedDocument,
    Persona, RelevanceRanker, SectionSelector,
};

const BODY: &str = "Coastal towns offer markets, museums and long beaches, and regional trains connect most of them within an hour.";

/// A document whose pages each carry a few headings and body paragraphs.
fn create_document(page_count: u32) -> ParsedDocument {
    let pages = (1..=page_count)
        .map(|number| {
            let mut blocks = Vec::new();
            for i in 0..4 {
                blocks.push(Block::new(vec![Line::new(vec![Span::new(
                    format!("Section {} of page {}", i + 1, number),
                    16.0,
                    flags::BOLD,
                )])]));
                blocks.push(Block::new(vec![
                    Line::new(vec![Span::new(BODY, 11.0, 0)]),
                    Line::new(vec![Span::new(format!("Entry {} continues here.", i), 11.0, 0)]),
                ]));
            }
            PageLayout::new(number, blocks)
        })
        .collect();
    ParsedDocument::new("bench.pdf", pages)
}

/// Benchmark PDF format detection.
fn bench_format_detection(c: &mut Criterion) {
    let pdf_data = b"%PDF-1.7\n%\xE2\xE3\xCF\xD3\n1 0 obj\n<< >>\nendobj\n";
    let non_pdf_data = b"Not a PDF file at all, just random text content";

    c.bench_function("detect_valid_pdf", |b| {
        b.iter(|| rankpdf::detect_format_from_bytes(black_box(pdf_data)).is_ok());
    });

    c.bench_function("detect_non_pdf", |b| {
        b.iter(|| rankpdf::detect_format_from_bytes(black_box(non_pdf_data)).is_err());
    });
}

/// Benchmark page classification at various sizes.
fn bench_classification(c: &mut Criterion) {
    let mut group = c.benchmark_group("classification");
    let classifier = PageBlockClassifier::new();

    for page_count in [1, 10, 50].iter() {
        let doc = create_document(*page_count);

        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| classifier.classify_document(black_box(&doc)));
        });
    }

    group.finish();
}

/// Benchmark hashing-embedder ranking and section selection.
fn bench_ranking(c: &mut Criterion) {
    let mut group = c.benchmark_group("ranking");
    let persona = Persona::new("Travel Planner", "coastal holidays");
    let job = JobToBeDone::new("Plan four days of beaches and markets");

    for page_count in [10, 50].iter() {
        let doc = create_document(*page_count);
        let corpus = Corpus::assemble(PageBlockClassifier::new().classify_document(&doc));
        let selector = SectionSelector::new();

        group.bench_function(format!("{}_paragraphs", corpus.len()), |b| {
            let mut ranker = RelevanceRanker::new(HashingEmbedder::default());
            b.iter(|| {
                let ranked = ranker
                    .rank(black_box(corpus.paragraphs()), &persona, &job)
                    .unwrap();
                selector.sections(&ranked, &corpus)
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_format_detection,
    bench_classification,
    bench_ranking,
);
criterion_main!(benches);
