//! Error types for the sales analytics pipeline
//!
//! This module defines all error types that can occur while reading, cleaning,
//! enriching and reporting on sales data.
//!
//! # Error Categories
//!
//! - **Malformed input**: wrong field count, unparseable numbers, a line total
//!   that does not fit a decimal. The record is dropped and processing continues.
//! - **Filter preconditions**: an amount range whose minimum exceeds its maximum.
//!   Surfaced to the caller before any filtering happens.
//! - **Catalog errors**: network, timeout or payload problems. Absorbed by the
//!   catalog sources, which fall back to an empty product list.
//! - **I/O errors**: input file missing or unreadable (fatal), output writes
//!   (reported per file, never fatal).
//! - **Empty data**: nothing parsed or nothing valid. These abort the run.

use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the sales analytics pipeline
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    /// Input file not found at the specified path
    ///
    /// This is a fatal error that prevents processing from starting.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// Delimited writer error (enriched export)
    #[error("CSV error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    CsvError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the error
        message: String,
    },

    /// JSON serialization or deserialization failed
    #[error("JSON error: {message}")]
    JsonError {
        /// Description of the JSON error
        message: String,
    },

    /// A raw line did not split into the expected number of fields
    ///
    /// Recoverable: the line is dropped.
    #[error("Expected {expected} fields, found {found}")]
    FieldCount {
        /// Number of fields required by the record layout
        expected: usize,
        /// Number of fields actually present
        found: usize,
    },

    /// A numeric field failed conversion
    ///
    /// Recoverable: the line is dropped.
    #[error("Invalid {field} '{value}'")]
    InvalidNumber {
        /// Logical field name (Quantity, UnitPrice)
        field: &'static str,
        /// The offending value after cleaning
        value: String,
    },

    /// Decimal or integer arithmetic would overflow
    ///
    /// Recoverable for a single line (the line is dropped). Fatal when the
    /// totals of a whole transaction set cannot be represented.
    #[error("Arithmetic overflow in {operation}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
    },

    /// Amount filter bounds are inverted
    ///
    /// The caller must re-specify the filter; no partial filtering is applied.
    #[error("Minimum amount {min} cannot be greater than maximum amount {max}")]
    InvalidAmountRange {
        /// Requested lower bound
        min: Decimal,
        /// Requested upper bound
        max: Decimal,
    },

    /// Catalog fetch failed
    ///
    /// Absorbed by catalog sources; never terminates a run.
    #[error("Catalog error: {message}")]
    CatalogError {
        /// Description of the catalog failure
        message: String,
    },

    /// Configuration could not be assembled from the provided arguments
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// What is wrong with the configuration
        message: String,
    },

    /// No line of the input survived parsing
    #[error("No transactions parsed from {total_lines} input lines")]
    NoParsedTransactions {
        /// Number of raw lines handed to the parser
        total_lines: usize,
    },

    /// Nothing remained after validation and filtering
    #[error("No valid transactions after validation ({invalid} invalid of {total_input})")]
    NoValidTransactions {
        /// Number of parsed transactions
        total_input: usize,
        /// Number rejected by validation
        invalid: usize,
    },
}

impl From<std::io::Error> for AnalyticsError {
    fn from(error: std::io::Error) -> Self {
        AnalyticsError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for AnalyticsError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        AnalyticsError::CsvError {
            line,
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for AnalyticsError {
    fn from(error: serde_json::Error) -> Self {
        AnalyticsError::JsonError {
            message: error.to_string(),
        }
    }
}

impl From<reqwest::Error> for AnalyticsError {
    fn from(error: reqwest::Error) -> Self {
        let message = if error.is_timeout() {
            format!("request timed out: {}", error)
        } else if error.is_connect() {
            format!("unable to connect: {}", error)
        } else if error.is_decode() {
            format!("malformed response: {}", error)
        } else {
            error.to_string()
        };

        AnalyticsError::CatalogError { message }
    }
}

// Helper functions for creating common errors

impl AnalyticsError {
    /// Create a FieldCount error
    pub fn field_count(expected: usize, found: usize) -> Self {
        AnalyticsError::FieldCount { expected, found }
    }

    /// Create an InvalidNumber error
    pub fn invalid_number(field: &'static str, value: &str) -> Self {
        AnalyticsError::InvalidNumber {
            field,
            value: value.to_string(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str) -> Self {
        AnalyticsError::ArithmeticOverflow {
            operation: operation.to_string(),
        }
    }

    /// Create an InvalidAmountRange error
    pub fn invalid_amount_range(min: Decimal, max: Decimal) -> Self {
        AnalyticsError::InvalidAmountRange { min, max }
    }

    /// Create a CatalogError
    pub fn catalog(message: impl Into<String>) -> Self {
        AnalyticsError::CatalogError {
            message: message.into(),
        }
    }

    /// Create an InvalidConfig error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        AnalyticsError::InvalidConfig {
            message: message.into(),
        }
    }
}
