//! Core business logic module
//!
//! This module contains the pure data transformations of the pipeline:
//! - `parser` - Raw pipe-delimited lines to transactions
//! - `validator` - Business rules, region and amount filters
//! - `aggregator` - Statistics, rankings and trends
//! - `enricher` - Catalog join on the numeric product id
//!
//! Nothing here touches the filesystem or the network.

pub mod aggregator;
pub mod enricher;
pub mod parser;
pub mod validator;

pub use aggregator::{AggregationOptions, SalesAnalytics};
pub use enricher::{enrich_transactions, EnrichmentStats};
pub use parser::parse_transactions;
pub use validator::{
    validate_and_filter, AmountRange, FilterOutcome, FilterSummary, TransactionFilter,
};
