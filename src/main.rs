//! Sales Analytics CLI
//!
//! Reads a pipe-delimited sales file, validates and filters it, computes the
//! aggregate views, enriches records from a product catalog, and writes the
//! JSON outputs, the text report and the enriched export.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- data/sales_data.txt
//! cargo run -- --region North --min-amount 100 data/sales_data.txt
//! cargo run -- --catalog file --catalog-file products.json data/sales_data.txt
//! cargo run -- --catalog none -v data/sales_data.txt
//! ```
//!
//! Logs go to stderr; stdout carries the run summary.
//!
//! # Exit Codes
//!
//! - 0: Success (individual output writes may still have failed, see the summary)
//! - 1: Error (invalid filters, input file missing or unreadable, no usable data)

use sales_analytics::catalog::create_catalog;
use sales_analytics::cli;
use sales_analytics::logging::init_logging;
use sales_analytics::pipeline::AnalyticsPipeline;
use std::process;

#[tokio::main]
async fn main() {
    let args = cli::parse_args();
    init_logging(args.verbose);

    let config = match args.to_pipeline_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}. Please re-specify the filters.", e);
            process::exit(1);
        }
    };

    let catalog = match create_catalog(args.catalog, &args.to_catalog_config()) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    match AnalyticsPipeline::new(config).run(&catalog).await {
        Ok(outcome) => print!("{}", cli::render_summary(&outcome)),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
