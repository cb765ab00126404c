//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `transaction`: Sales transactions and their enriched form
//! - `catalog`: Product catalog entries and the id lookup
//! - `error`: Error types for the analytics pipeline

pub mod catalog;
pub mod error;
pub mod transaction;

pub use catalog::{CatalogDetails, CatalogProduct, CatalogResponse, ProductLookup};
pub use error::AnalyticsError;
pub use transaction::{EnrichedTransaction, ProductId, Transaction, TransactionFields};
