//! I/O module
//!
//! Handles reading the sales file and writing every output.
//!
//! # Components
//!
//! - `sales_reader` - Buffered sales file reader with encoding fallback
//! - `export` - JSON, text and pipe-delimited output writers

pub mod export;
pub mod sales_reader;

pub use export::{write_enriched_csv, write_enriched_export, write_json, write_text, OutputStatus};
pub use sales_reader::read_sales_lines;
