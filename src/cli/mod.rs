// CLI module
// Command-line interface, argument parsing and the run summary

mod args;

pub use args::{CatalogKind, CliArgs};

use crate::pipeline::PipelineOutcome;
use crate::report::text::LINE_WIDTH;
use clap::Parser;
use std::fmt::{self, Write};

/// Parse command-line arguments using clap
///
/// On invalid arguments or `--help`, clap prints the message and exits.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

/// Short summary of a completed run for stdout
pub fn render_summary(outcome: &PipelineOutcome) -> String {
    let mut out = String::new();
    // fmt::Write for String is infallible
    let _ = write_summary(&mut out, outcome);
    out
}

/// Write the run summary to any formatter sink
pub fn write_summary<W: Write>(out: &mut W, outcome: &PipelineOutcome) -> fmt::Result {
    let summary = &outcome.summary;
    let enrichment = &outcome.enrichment;

    writeln!(out, "{}", "=".repeat(LINE_WIDTH))?;
    writeln!(
        out,
        "Records: {} parsed | {} invalid | {} valid | {} after filters",
        summary.total_input, summary.invalid, summary.valid, summary.final_count
    )?;
    writeln!(
        out,
        "Filtered: {} by region | {} by amount",
        summary.filtered_by_region, summary.filtered_by_amount
    )?;
    writeln!(
        out,
        "Enriched: {}/{} transactions",
        enrichment.matched, enrichment.total
    )?;
    writeln!(out)?;
    writeln!(out, "Output Files:")?;
    for output in &outcome.outputs {
        let marker = if output.written { "[OK]" } else { "[FAILED]" };
        writeln!(out, "  {} {}", marker, output.path.display())?;
    }
    writeln!(out, "{}", "=".repeat(LINE_WIDTH))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregator::{AggregationOptions, SalesAnalytics};
    use crate::core::enricher::EnrichmentStats;
    use crate::core::validator::FilterSummary;
    use crate::io::OutputStatus;
    use std::path::PathBuf;

    #[test]
    fn test_render_summary() {
        let outcome = PipelineOutcome {
            summary: FilterSummary {
                total_input: 6,
                invalid: 1,
                valid: 5,
                filtered_by_region: 2,
                filtered_by_amount: 1,
                final_count: 2,
            },
            analytics: SalesAnalytics::compute(&[], &AggregationOptions::default()),
            enrichment: EnrichmentStats {
                total: 2,
                matched: 1,
                ..EnrichmentStats::default()
            },
            outputs: vec![
                OutputStatus {
                    path: PathBuf::from("output/sales_report.txt"),
                    written: true,
                },
                OutputStatus {
                    path: PathBuf::from("data/enriched_sales_data.txt"),
                    written: false,
                },
            ],
        };

        let text = render_summary(&outcome);
        assert!(text.contains("Records: 6 parsed | 1 invalid | 5 valid | 2 after filters\n"));
        assert!(text.contains("Filtered: 2 by region | 1 by amount\n"));
        assert!(text.contains("Enriched: 1/2 transactions\n"));
        assert!(text.contains("  [OK] output/sales_report.txt\n"));
        assert!(text.contains("  [FAILED] data/enriched_sales_data.txt\n"));
        assert!(text.ends_with(&format!("{}\n", "=".repeat(LINE_WIDTH))));
    }
}
