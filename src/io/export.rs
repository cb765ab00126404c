//! Output writers
//!
//! Every output of a run goes through one of these functions. Failures are
//! returned to the caller, which records them as an [`OutputStatus`] and moves
//! on to the next output; a failed write never stops the run.

use crate::types::{AnalyticsError, EnrichedTransaction};
use csv::{QuoteStyle, WriterBuilder};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Column order of the pipe-delimited enriched export
pub const ENRICHED_HEADER: [&str; 12] = [
    "TransactionID",
    "Date",
    "ProductID",
    "ProductName",
    "Quantity",
    "UnitPrice",
    "CustomerID",
    "Region",
    "API_Category",
    "API_Brand",
    "API_Rating",
    "API_Match",
];

/// Outcome of writing one output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputStatus {
    pub path: PathBuf,
    pub written: bool,
}

impl OutputStatus {
    /// Log the outcome of a write and keep only whether it succeeded
    pub fn from_result(path: &Path, result: Result<(), AnalyticsError>) -> Self {
        let written = match result {
            Ok(()) => {
                info!("Wrote {}", path.display());
                true
            }
            Err(e) => {
                error!("Failed to write {}: {}", path.display(), e);
                false
            }
        };

        OutputStatus {
            path: path.to_path_buf(),
            written,
        }
    }
}

/// Write enriched records in the pipe-delimited export format
///
/// Unmatched records leave the three catalog columns empty; `API_Match` is
/// written as `true` or `false`. Fields are never quoted.
pub fn write_enriched_csv(
    records: &[EnrichedTransaction],
    output: &mut dyn Write,
) -> Result<(), AnalyticsError> {
    let mut writer = WriterBuilder::new()
        .delimiter(b'|')
        .quote_style(QuoteStyle::Never)
        .from_writer(output);

    writer.write_record(ENRICHED_HEADER)?;

    for record in records {
        let tx = &record.transaction;
        let details = record.catalog.as_ref();
        let quantity = tx.quantity().to_string();
        let unit_price = tx.unit_price().to_string();
        let rating = details.map(|d| d.rating.to_string()).unwrap_or_default();

        writer.write_record([
            tx.transaction_id(),
            tx.date(),
            tx.product_id(),
            tx.product_name(),
            quantity.as_str(),
            unit_price.as_str(),
            tx.customer_id(),
            tx.region(),
            details.map_or("", |d| d.category.as_str()),
            details.map_or("", |d| d.brand.as_str()),
            rating.as_str(),
            if record.api_match() { "true" } else { "false" },
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn create_file(path: &Path) -> Result<BufWriter<File>, AnalyticsError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(BufWriter::new(File::create(path)?))
}

/// Write the enriched export to `path`, creating parent directories
pub fn write_enriched_export(
    path: &Path,
    records: &[EnrichedTransaction],
) -> Result<(), AnalyticsError> {
    let mut file = create_file(path)?;
    write_enriched_csv(records, &mut file)?;
    file.flush()?;
    Ok(())
}

/// Write `value` as pretty-printed JSON
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), AnalyticsError> {
    let mut file = create_file(path)?;
    serde_json::to_writer_pretty(&mut file, value)?;
    file.flush()?;
    Ok(())
}

pub fn write_text(path: &Path, content: &str) -> Result<(), AnalyticsError> {
    let mut file = create_file(path)?;
    file.write_all(content.as_bytes())?;
    file.flush()?;
    Ok(())
}
