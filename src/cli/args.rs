use crate::catalog::{CatalogConfig, DEFAULT_CATALOG_LIMIT, DEFAULT_CATALOG_URL};
use crate::core::aggregator::DEFAULT_LOW_PERFORMER_THRESHOLD;
use crate::core::validator::{AmountRange, TransactionFilter};
use crate::pipeline::config::{DEFAULT_ENRICHED_FILE, DEFAULT_INPUT_FILE, DEFAULT_OUTPUT_DIR};
use crate::pipeline::PipelineConfig;
use crate::types::AnalyticsError;
use clap::{ArgAction, Parser, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::time::Duration;

/// Analyze pipe-delimited sales data and write reports
#[derive(Parser, Debug)]
#[command(name = "sales-analytics")]
#[command(about = "Analyze pipe-delimited sales data and write reports", long_about = None)]
pub struct CliArgs {
    /// Input sales file path
    #[arg(
        value_name = "INPUT",
        default_value = DEFAULT_INPUT_FILE,
        help = "Path to the pipe-delimited sales file"
    )]
    pub input_file: PathBuf,

    /// Directory for JSON outputs and the text report
    #[arg(long = "output-dir", value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Pipe-delimited enriched export path
    #[arg(long = "enriched-file", value_name = "PATH", default_value = DEFAULT_ENRICHED_FILE)]
    pub enriched_file: PathBuf,

    /// Keep only transactions from this region (exact match)
    #[arg(long = "region", value_name = "REGION")]
    pub region: Option<String>,

    /// Keep only transactions with TotalSales >= AMOUNT
    #[arg(long = "min-amount", value_name = "AMOUNT")]
    pub min_amount: Option<Decimal>,

    /// Keep only transactions with TotalSales <= AMOUNT
    #[arg(long = "max-amount", value_name = "AMOUNT")]
    pub max_amount: Option<Decimal>,

    /// Products selling fewer units are reported as low performers
    #[arg(
        long = "low-threshold",
        value_name = "UNITS",
        default_value_t = DEFAULT_LOW_PERFORMER_THRESHOLD,
        allow_negative_numbers = true
    )]
    pub low_threshold: i64,

    /// Product catalog source used for enrichment
    #[arg(
        long = "catalog",
        value_name = "SOURCE",
        default_value = "http",
        help = "Catalog source: 'http', 'file' or 'none'"
    )]
    pub catalog: CatalogKind,

    /// Catalog listing endpoint
    #[arg(long = "catalog-url", value_name = "URL", default_value = DEFAULT_CATALOG_URL)]
    pub catalog_url: String,

    /// Saved catalog payload (required with `--catalog file`)
    #[arg(long = "catalog-file", value_name = "PATH")]
    pub catalog_file: Option<PathBuf>,

    /// Maximum number of products requested from the catalog
    #[arg(long = "catalog-limit", value_name = "COUNT", default_value_t = DEFAULT_CATALOG_LIMIT)]
    pub catalog_limit: usize,

    /// Catalog request timeout in seconds
    #[arg(long = "catalog-timeout", value_name = "SECONDS", default_value_t = 10)]
    pub catalog_timeout: u64,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

/// Available catalog sources
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CatalogKind {
    Http,
    File,
    None,
}

impl CliArgs {
    /// Build the pipeline configuration
    ///
    /// # Errors
    ///
    /// `InvalidAmountRange` when `--min-amount` is greater than `--max-amount`.
    pub fn to_pipeline_config(&self) -> Result<PipelineConfig, AnalyticsError> {
        let amount = AmountRange::new(self.min_amount, self.max_amount)?;
        let filter = TransactionFilter {
            region: self.region.clone(),
            amount,
        };

        Ok(PipelineConfig::new(
            self.input_file.clone(),
            self.output_dir.clone(),
            self.enriched_file.clone(),
            filter,
            self.low_threshold,
        ))
    }

    /// Build the catalog configuration; zero limit or timeout fall back to defaults
    pub fn to_catalog_config(&self) -> CatalogConfig {
        CatalogConfig::new(
            self.catalog_url.clone(),
            self.catalog_file.clone(),
            self.catalog_limit,
            Duration::from_secs(self.catalog_timeout),
        )
    }
}
