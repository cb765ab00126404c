//! Sales Analytics Library
//! # Overview
//!
//! This library turns a pipe-delimited sales file into cleaned transactions,
//! aggregate analytics, catalog-enriched records and reports.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Transaction, EnrichedTransaction, catalog types, errors)
//! - [`core`] - Pure business logic:
//!   - [`core::parser`] - Raw line parsing and cleaning
//!   - [`core::validator`] - Business rules and region/amount filters
//!   - [`core::aggregator`] - Statistics, rankings and trends
//!   - [`core::enricher`] - Catalog join on the numeric product id
//! - [`report`] - Fixed-width text report and JSON summary
//! - [`catalog`] - HTTP, file and disabled catalog sources
//! - [`io`] - Sales file reader and output writers
//! - [`pipeline`] - End-to-end run orchestration
//! - [`cli`] - CLI arguments parsing
//! - [`logging`] - `tracing` subscriber setup
//!
//! # Record Rules
//!
//! A transaction is valid when:
//!
//! - **TransactionID** starts with `T`
//! - **ProductID** starts with `P`
//! - **CustomerID** starts with `C`
//! - **Quantity** and **UnitPrice** are both greater than zero
//!
//! `TotalSales` is always `Quantity × UnitPrice`, computed with exact decimal
//! arithmetic when the transaction is created.

// Module declarations
pub mod catalog;
pub mod cli;
pub mod core;
pub mod io;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod types;

pub use crate::core::{AggregationOptions, SalesAnalytics};
pub use pipeline::{AnalyticsPipeline, PipelineConfig, PipelineOutcome};
pub use types::{AnalyticsError, EnrichedTransaction, ProductLookup, Transaction};
