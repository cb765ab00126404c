//! End-to-end analytics run
//!
//! # Stages
//!
//! ```text
//! AnalyticsPipeline::run
//!     ├── read_sales_lines      (fatal on a missing or unreadable file)
//!     ├── process_lines         (parse, validate, filter; fatal when empty)
//!     ├── SalesAnalytics        (every aggregate view; fatal on overflowing totals)
//!     ├── CatalogSource         (best effort, empty on failure)
//!     ├── enrich_transactions
//!     └── outputs               (each write reported, none fatal)
//! ```

use crate::catalog::CatalogSource;
use crate::core::aggregator::{AggregationOptions, SalesAnalytics, DEFAULT_TOP_N};
use crate::core::enricher::{enrich_transactions, EnrichmentStats};
use crate::core::parser::parse_transactions;
use crate::core::validator::{
    validate_and_filter, FilterOptions, FilterOutcome, FilterSummary, TransactionFilter,
};
use crate::io::{read_sales_lines, write_enriched_export, write_json, write_text, OutputStatus};
use crate::report::{render_report, AnalyticsSummary, ReportOptions};
use crate::types::{AnalyticsError, EnrichedTransaction, ProductLookup, Transaction};
use chrono::{Local, NaiveDateTime};
use tracing::{info, warn};

pub mod config;

pub use config::PipelineConfig;

/// Parse raw lines, then validate and filter the parsed transactions
///
/// # Errors
///
/// * `NoParsedTransactions` when no line parses
/// * `NoValidTransactions` when nothing survives validation and filters
pub fn process_lines<S: AsRef<str>>(
    lines: &[S],
    filter: &TransactionFilter,
) -> Result<FilterOutcome, AnalyticsError> {
    let parsed = parse_transactions(lines);
    if parsed.is_empty() {
        return Err(AnalyticsError::NoParsedTransactions {
            total_lines: lines.len(),
        });
    }
    info!(
        "Parsed {} of {} lines ({} dropped)",
        parsed.len(),
        lines.len(),
        lines.len() - parsed.len()
    );

    let options = FilterOptions::from_transactions(&parsed);
    info!(
        regions = %options.regions.join(", "),
        min_amount = ?options.min_amount,
        max_amount = ?options.max_amount,
        "Filter options available"
    );

    let outcome = validate_and_filter(&parsed, filter);
    let summary = &outcome.summary;
    if outcome.transactions.is_empty() {
        return Err(AnalyticsError::NoValidTransactions {
            total_input: summary.total_input,
            invalid: summary.invalid,
        });
    }
    info!(
        valid = summary.valid,
        invalid = summary.invalid,
        final_count = summary.final_count,
        "Validation complete"
    );

    Ok(outcome)
}

/// Result of a completed run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutcome {
    pub summary: FilterSummary,
    pub analytics: SalesAnalytics,
    pub enrichment: EnrichmentStats,
    /// One entry per output file, in write order
    pub outputs: Vec<OutputStatus>,
}

impl PipelineOutcome {
    pub fn all_written(&self) -> bool {
        self.outputs.iter().all(|o| o.written)
    }
}

/// Runs the whole analysis for one configuration
#[derive(Debug, Clone)]
pub struct AnalyticsPipeline {
    config: PipelineConfig,
}

impl AnalyticsPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn aggregation_options(&self) -> AggregationOptions {
        AggregationOptions {
            top_n: DEFAULT_TOP_N,
            low_performer_threshold: self.config.low_performer_threshold,
        }
    }

    /// Run with the current local time as the report timestamp
    pub async fn run<C: CatalogSource>(
        &self,
        catalog: &C,
    ) -> Result<PipelineOutcome, AnalyticsError> {
        self.run_at(catalog, Local::now().naive_local()).await
    }

    /// Run with a fixed report timestamp
    pub async fn run_at<C: CatalogSource>(
        &self,
        catalog: &C,
        generated_at: NaiveDateTime,
    ) -> Result<PipelineOutcome, AnalyticsError> {
        let lines = read_sales_lines(&self.config.input_file)?;
        let FilterOutcome { transactions, summary } = process_lines(&lines, &self.config.filter)?;

        let analytics = SalesAnalytics::try_compute(&transactions, &self.aggregation_options())?;
        info!("Analysis complete");

        let products = catalog.fetch_products().await;
        let lookup = ProductLookup::from_products(&products);
        if lookup.is_empty() {
            warn!("No catalog products available, every transaction will be unmatched");
        }

        let enriched = enrich_transactions(&transactions, &lookup);
        let enrichment = EnrichmentStats::from_enriched(&enriched);
        info!(
            "Enriched {}/{} transactions ({}%)",
            enrichment.matched,
            enrichment.total,
            enrichment.success_rate.round_dp(1)
        );

        let outputs = self.write_outputs(
            &transactions,
            &enriched,
            &summary,
            &analytics,
            &enrichment,
            generated_at,
        );

        Ok(PipelineOutcome {
            summary,
            analytics,
            enrichment,
            outputs,
        })
    }

    fn write_outputs(
        &self,
        transactions: &[Transaction],
        enriched: &[EnrichedTransaction],
        summary: &FilterSummary,
        analytics: &SalesAnalytics,
        enrichment: &EnrichmentStats,
        generated_at: NaiveDateTime,
    ) -> Vec<OutputStatus> {
        let config = &self.config;
        let mut outputs = Vec::with_capacity(5);

        let path = &config.enriched_file;
        outputs.push(OutputStatus::from_result(path, write_enriched_export(path, enriched)));

        let path = config.output_path(config::PARSED_JSON);
        outputs.push(OutputStatus::from_result(&path, write_json(&path, transactions)));

        let path = config.output_path(config::ENRICHED_JSON);
        outputs.push(OutputStatus::from_result(&path, write_json(&path, enriched)));

        let report = render_report(
            transactions,
            Some(enriched),
            &ReportOptions {
                generated_at,
                low_performer_threshold: config.low_performer_threshold,
            },
        );
        let path = config.output_path(config::REPORT_TEXT);
        outputs.push(OutputStatus::from_result(&path, write_text(&path, &report)));

        let timestamp = generated_at.format("%Y-%m-%dT%H:%M:%S%.6f").to_string();
        let document = AnalyticsSummary::build(summary, analytics, enrichment, timestamp);
        let path = config.output_path(config::ANALYTICS_JSON);
        outputs.push(OutputStatus::from_result(&path, write_json(&path, &document)));

        outputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, FileCatalog};
    use crate::core::validator::AmountRange;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::fs;
    use std::path::Path;

    const SALES: &str = "\
TransactionID|Date|ProductID|ProductName|Quantity|UnitPrice|CustomerID|Region
T001|2024-01-05|P101|Widget|10|25.50|C001|North
T002|2024-01-05|P102|Gadget|2|10.00|C002|South
T003|2024-01-06|P103|Gizmo|1|500.00|C003|North
T004|2024-01-04|P102|Gadget|4|10.00|C001|East
T005|2024-01-06|P101|Widget|5|25.50|C002|South
X006|2024-01-06|P101|Widget|5|25.50|C002|South
T007|2024-01-06|P101|Widget|five|25.50|C002|South
";

    const CATALOG: &str = r#"{"products":[{"id":101,"title":"Widget Pro","category":"tools","brand":"Acme","price":25.5,"rating":4.2}]}"#;

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 2, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn setup(dir: &Path, filter: TransactionFilter) -> (AnalyticsPipeline, FileCatalog) {
        let input = dir.join("sales_data.txt");
        fs::write(&input, SALES).unwrap();
        let catalog = dir.join("catalog.json");
        fs::write(&catalog, CATALOG).unwrap();

        let config =
            PipelineConfig::new(input, dir.join("output"), dir.join("enriched.txt"), filter, 10);
        (AnalyticsPipeline::new(config), FileCatalog::new(catalog))
    }

    #[test]
    fn test_process_lines_counts() {
        let lines = vec![
            "T001|2024-01-05|P101|Widget|10|25.50|C001|North",
            "X002|2024-01-05|P102|Gadget|2|10.00|C002|South",
            "bad line",
        ];
        let outcome = process_lines(&lines, &TransactionFilter::none()).unwrap();

        assert_eq!(outcome.summary.total_input, 2);
        assert_eq!(outcome.summary.invalid, 1);
        assert_eq!(outcome.transactions.len(), 1);
    }

    #[test]
    fn test_process_lines_nothing_parsed() {
        let lines = vec!["bad line", "T1|too|few"];
        assert_eq!(
            process_lines(&lines, &TransactionFilter::none()),
            Err(AnalyticsError::NoParsedTransactions { total_lines: 2 })
        );
    }

    #[test]
    fn test_process_lines_nothing_valid() {
        let lines = vec!["X001|2024-01-05|P101|Widget|10|25.50|C001|North"];
        assert_eq!(
            process_lines(&lines, &TransactionFilter::none()),
            Err(AnalyticsError::NoValidTransactions {
                total_input: 1,
                invalid: 1
            })
        );
    }

    #[test]
    fn test_process_lines_filtered_to_nothing() {
        let lines = vec!["T001|2024-01-05|P101|Widget|10|25.50|C001|North"];
        let result = process_lines(&lines, &TransactionFilter::by_region("West"));
        assert!(matches!(result, Err(AnalyticsError::NoValidTransactions { .. })));
    }

    #[tokio::test]
    async fn test_run_writes_every_output() {
        let dir = tempfile::tempdir().unwrap();
        let (pipeline, catalog) = setup(dir.path(), TransactionFilter::none());

        let outcome = pipeline.run_at(&catalog, generated_at()).await.unwrap();

        assert_eq!(outcome.summary.total_input, 6);
        assert_eq!(outcome.summary.invalid, 1);
        assert_eq!(outcome.summary.final_count, 5);
        assert_eq!(outcome.enrichment.matched, 2);
        assert_eq!(outcome.outputs.len(), 5);
        assert!(outcome.all_written());
        for output in &outcome.outputs {
            assert!(output.path.exists(), "missing {}", output.path.display());
        }

        let report =
            fs::read_to_string(dir.path().join("output").join("sales_report.txt")).unwrap();
        assert!(report.contains("Generated: 2024-02-01 09:30:00"));
        assert!(report.contains("Successfully Enriched:       2"));
    }

    #[tokio::test]
    async fn test_run_applies_filters() {
        let dir = tempfile::tempdir().unwrap();
        let filter = TransactionFilter::by_region("North")
            .with_amount(AmountRange::new(Some(Decimal::new(300, 0)), None).unwrap());
        let (pipeline, catalog) = setup(dir.path(), filter);

        let outcome = pipeline.run_at(&catalog, generated_at()).await.unwrap();

        assert_eq!(outcome.summary.filtered_by_region, 3);
        assert_eq!(outcome.summary.filtered_by_amount, 1);
        assert_eq!(outcome.summary.final_count, 1);
        assert_eq!(outcome.enrichment.matched, 0);
    }

    #[tokio::test]
    async fn test_run_without_catalog_marks_all_unmatched() {
        let dir = tempfile::tempdir().unwrap();
        let (pipeline, _) = setup(dir.path(), TransactionFilter::none());

        let outcome = pipeline.run_at(&Catalog::Disabled, generated_at()).await.unwrap();

        assert_eq!(outcome.enrichment.total, 5);
        assert_eq!(outcome.enrichment.matched, 0);
        assert!(outcome.all_written());
    }

    #[tokio::test]
    async fn test_run_missing_input_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig {
            input_file: dir.path().join("absent.txt"),
            ..PipelineConfig::default()
        };

        let result = AnalyticsPipeline::new(config).run(&Catalog::Disabled).await;
        assert!(matches!(result, Err(AnalyticsError::FileNotFound { .. })));
    }

    #[tokio::test]
    async fn test_run_overflowing_totals_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("sales_data.txt");
        fs::write(
            &input,
            "\
TransactionID|Date|ProductID|ProductName|Quantity|UnitPrice|CustomerID|Region
T001|2024-01-05|P101|Widget|1|79228162514264337593543950335|C001|North
T002|2024-01-06|P102|Gadget|1|79228162514264337593543950335|C002|North
T003|2024-01-06|P103|Gizmo|9223372036854775807|79228162514264337593543950335|C003|North
",
        )
        .unwrap();
        let config = PipelineConfig {
            input_file: input,
            output_dir: dir.path().join("output"),
            enriched_file: dir.path().join("enriched.txt"),
            ..PipelineConfig::default()
        };

        let result = AnalyticsPipeline::new(config)
            .run_at(&Catalog::Disabled, generated_at())
            .await;

        assert!(matches!(result, Err(AnalyticsError::ArithmeticOverflow { .. })));
        assert!(!dir.path().join("enriched.txt").exists());
    }

    #[tokio::test]
    async fn test_run_reports_failed_output() {
        let dir = tempfile::tempdir().unwrap();
        let (pipeline, catalog) = setup(dir.path(), TransactionFilter::none());
        // Occupy the export path with a directory
        fs::create_dir_all(&pipeline.config().enriched_file).unwrap();

        let outcome = pipeline.run_at(&catalog, generated_at()).await.unwrap();

        assert!(!outcome.all_written());
        assert!(!outcome.outputs[0].written);
        assert!(outcome.outputs[1..].iter().all(|o| o.written));
    }
}
