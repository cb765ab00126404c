//! Benchmark suite for the analytic stages
//!
//! Measures parsing, validation, aggregation and report rendering over
//! synthetic sales lines using the divan benchmarking framework.
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench
//! ```
//!
//! Each benchmark runs at three sizes (100, 10,000 and 100,000 lines) spread
//! over 4 regions, 50 products, 500 customers and 90 dates.

use chrono::NaiveDate;
use sales_analytics::core::enricher::enrich_transactions;
use sales_analytics::core::parser::parse_transactions;
use sales_analytics::core::validator::{validate_and_filter, TransactionFilter};
use sales_analytics::report::{render_report, ReportOptions};
use sales_analytics::types::{CatalogDetails, ProductLookup};
use sales_analytics::{AggregationOptions, SalesAnalytics, Transaction};

const SIZES: [usize; 3] = [100, 10_000, 100_000];
const REGIONS: [&str; 4] = ["North", "South", "East", "West"];

fn main() {
    divan::main();
}

fn synthetic_lines(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            format!(
                "T{:06}|2024-{:02}-{:02}|P{}|Product {}|{}|{}.{:02}|C{:04}|{}",
                i,
                (i / 28) % 3 + 1,
                i % 28 + 1,
                100 + i % 50,
                i % 50,
                i % 20 + 1,
                (i * 7) % 900 + 10,
                i % 100,
                i % 500,
                REGIONS[i % REGIONS.len()]
            )
        })
        .collect()
}

fn synthetic_transactions(count: usize) -> Vec<Transaction> {
    parse_transactions(&synthetic_lines(count))
}

fn synthetic_lookup() -> ProductLookup {
    (100..125)
        .map(|id| {
            (
                id,
                CatalogDetails {
                    title: format!("Catalog {}", id),
                    category: "bench".to_string(),
                    brand: "Divan".to_string(),
                    rating: 4.0,
                },
            )
        })
        .collect()
}

#[divan::bench(args = SIZES)]
fn parse(bencher: divan::Bencher, size: usize) {
    let lines = synthetic_lines(size);
    bencher.bench(|| parse_transactions(divan::black_box(&lines)));
}

#[divan::bench(args = SIZES)]
fn validate(bencher: divan::Bencher, size: usize) {
    let transactions = synthetic_transactions(size);
    let filter = TransactionFilter::by_region("North");
    bencher.bench(|| validate_and_filter(divan::black_box(&transactions), &filter));
}

#[divan::bench(args = SIZES)]
fn aggregate(bencher: divan::Bencher, size: usize) {
    let transactions = synthetic_transactions(size);
    let options = AggregationOptions::default();
    bencher.bench(|| SalesAnalytics::compute(divan::black_box(&transactions), &options));
}

#[divan::bench(args = SIZES)]
fn enrich(bencher: divan::Bencher, size: usize) {
    let transactions = synthetic_transactions(size);
    let lookup = synthetic_lookup();
    bencher.bench(|| enrich_transactions(divan::black_box(&transactions), &lookup));
}

#[divan::bench(args = SIZES)]
fn render(bencher: divan::Bencher, size: usize) {
    let transactions = synthetic_transactions(size);
    let enriched = enrich_transactions(&transactions, &synthetic_lookup());
    let options = ReportOptions::new(
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or_default(),
    );
    bencher.bench(|| render_report(divan::black_box(&transactions), Some(&enriched), &options));
}
