//! Criterion benchmarks for sitescore.
//!
//! Covers the keyword matcher, per-page scoring and whole-site scoring.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use sitescore::aggregation::Aggregator;
use sitescore::matching::{Keyword, score_page};
use sitescore::prelude::*;
use std::hint::black_box;

const WORDS: [&str; 16] = [
    "running", "shoes", "trail", "boots", "outlet", "socks", "wool", "hiking", "sale", "store",
    "mountain", "grip", "sport", "运动鞋", "服装", "jacket",
];

/// Generate a synthetic site for benchmarking.
fn generate_site(pages: usize) -> SiteInfo {
    let pages = (0..pages)
        .map(|i| {
            let word = |k: usize| WORDS[(i * 7 + k * 3) % WORDS.len()];
            let body: Vec<&str> = (0..40).map(word).collect();
            let mut page = PageRecord::new(format!("https://bench.example/{i}"))
                .with_quote_count((i % 17) as u32)
                .with_title(format!("{} {}", word(0), word(1)))
                .with_heading(format!("{} {} {}", word(2), word(3), word(4)))
                .with_body(body.join(" "))
                .with_anchor_text(format!("{} {}", word(5), word(6)), 3)
                .with_anchor_text(word(7), 1);
            if i == 0 {
                page = page.with_page_type(PageType::Home);
            }
            page
        })
        .collect();
    SiteInfo::new(pages)
}

fn keywords() -> Vec<String> {
    vec![
        "running shoes".to_string(),
        "trail boots".to_string(),
        "wool socks".to_string(),
        "运动鞋".to_string(),
    ]
}

fn bench_matcher(c: &mut Criterion) {
    let mut group = c.benchmark_group("matcher");
    let text = generate_site(1).pages[0].body.clone();
    let keyword = Keyword::new("running shoes").unwrap();

    group.bench_function("keyword_new", |b| {
        b.iter(|| Keyword::new(black_box("running shoes")).unwrap())
    });

    group.bench_function("match_text", |b| {
        b.iter(|| keyword.match_text(black_box(&text)))
    });

    group.finish();
}

fn bench_link_scorer(c: &mut Criterion) {
    let mut group = c.benchmark_group("link_scorer");
    let site = generate_site(100);
    let keyword = Keyword::new("trail boots").unwrap();

    group.throughput(Throughput::Elements(site.len() as u64));
    group.bench_function("score_page_batch", |b| {
        b.iter(|| {
            for page in &site.pages {
                black_box(score_page(page, &keyword));
            }
        })
    });

    group.finish();
}

fn bench_site_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("site_match");
    group.sample_size(20);
    let keywords = keywords();

    for pages in [100, 1000, 5000] {
        let site = generate_site(pages);
        group.throughput(Throughput::Elements((pages * keywords.len()) as u64));
        group.bench_with_input(BenchmarkId::new("match_site", pages), &site, |b, site| {
            b.iter(|| match_site(site, &keywords, &MatchConfig::default()).unwrap())
        });
    }

    group.finish();
}

fn bench_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregation");
    let site = generate_site(10_000);
    let keyword = Keyword::new("running shoes").unwrap();
    let records: Vec<_> = site.pages.iter().map(|p| score_page(p, &keyword)).collect();

    group.throughput(Throughput::Elements(records.len() as u64));
    group.bench_function("sequential", |b| {
        let aggregator = Aggregator::new().with_parallel_threshold(usize::MAX);
        b.iter(|| aggregator.aggregate(black_box(&records)))
    });
    group.bench_function("parallel", |b| {
        let aggregator = Aggregator::new().with_parallel_threshold(0);
        b.iter(|| aggregator.aggregate(black_box(&records)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_matcher,
    bench_link_scorer,
    bench_site_match,
    bench_aggregation
);
criterion_main!(benches);
