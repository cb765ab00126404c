//! Run configuration for the analytics pipeline

use crate::core::aggregator::DEFAULT_LOW_PERFORMER_THRESHOLD;
use crate::core::validator::TransactionFilter;
use std::path::PathBuf;

pub const DEFAULT_INPUT_FILE: &str = "data/sales_data.txt";
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_ENRICHED_FILE: &str = "data/enriched_sales_data.txt";

/// File names written under the output directory
pub const PARSED_JSON: &str = "parsed_transactions.json";
pub const ENRICHED_JSON: &str = "enriched_sales_data.json";
pub const ANALYTICS_JSON: &str = "analytics_report.json";
pub const REPORT_TEXT: &str = "sales_report.txt";

/// Where to read, where to write, and which records to keep
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Pipe-delimited sales file
    pub input_file: PathBuf,
    /// Directory for the JSON outputs and the text report
    pub output_dir: PathBuf,
    /// Pipe-delimited enriched export
    pub enriched_file: PathBuf,
    pub filter: TransactionFilter,
    pub low_performer_threshold: i64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_file: PathBuf::from(DEFAULT_INPUT_FILE),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            enriched_file: PathBuf::from(DEFAULT_ENRICHED_FILE),
            filter: TransactionFilter::none(),
            low_performer_threshold: DEFAULT_LOW_PERFORMER_THRESHOLD,
        }
    }
}

impl PipelineConfig {
    /// Create a config, replacing a non-positive threshold with the default
    pub fn new(
        input_file: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        enriched_file: impl Into<PathBuf>,
        filter: TransactionFilter,
        low_performer_threshold: i64,
    ) -> Self {
        let low_performer_threshold = if low_performer_threshold <= 0 {
            tracing::warn!(
                "Invalid low performer threshold ({}), using default ({})",
                low_performer_threshold,
                DEFAULT_LOW_PERFORMER_THRESHOLD
            );
            DEFAULT_LOW_PERFORMER_THRESHOLD
        } else {
            low_performer_threshold
        };

        Self {
            input_file: input_file.into(),
            output_dir: output_dir.into(),
            enriched_file: enriched_file.into(),
            filter,
            low_performer_threshold,
        }
    }

    /// Path of a named file inside the output directory
    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::positive(25, 25)]
    #[case::zero(0, DEFAULT_LOW_PERFORMER_THRESHOLD)]
    #[case::negative(-3, DEFAULT_LOW_PERFORMER_THRESHOLD)]
    fn test_threshold_fallback(#[case] threshold: i64, #[case] expected: i64) {
        let config = PipelineConfig::new(
            "in.txt",
            "out",
            "enriched.txt",
            TransactionFilter::none(),
            threshold,
        );
        assert_eq!(config.low_performer_threshold, expected);
    }

    #[test]
    fn test_output_paths() {
        let config = PipelineConfig::default();
        assert_eq!(config.output_path(REPORT_TEXT), PathBuf::from("output/sales_report.txt"));
        assert_eq!(config.input_file, PathBuf::from("data/sales_data.txt"));
    }
}
