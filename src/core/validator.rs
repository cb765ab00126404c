//! Business-rule validation and optional filtering
//!
//! Validation runs first over every parsed transaction. The region and amount
//! filters then apply, in that order, to the valid set only. The returned
//! [`FilterSummary`] records how many records each stage removed.

use crate::types::{AnalyticsError, Transaction};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::debug;

pub const TRANSACTION_ID_PREFIX: char = 'T';
pub const PRODUCT_ID_PREFIX: char = 'P';
pub const CUSTOMER_ID_PREFIX: char = 'C';

/// Reason a parsed transaction is not valid
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleViolation {
    #[error("{field} is missing")]
    MissingField { field: &'static str },

    #[error("{field} '{value}' does not start with '{prefix}'")]
    BadPrefix {
        field: &'static str,
        value: String,
        prefix: char,
    },

    #[error("Quantity must be positive, got {quantity}")]
    NonPositiveQuantity { quantity: i64 },

    #[error("UnitPrice must be positive, got {unit_price}")]
    NonPositivePrice { unit_price: Decimal },
}

/// Check a transaction against every business rule
///
/// Rules, in order: all fields present, ID prefixes (`T`, `P`, `C`),
/// positive quantity, positive unit price.
pub fn validate_transaction(transaction: &Transaction) -> Result<(), RuleViolation> {
    let present = [
        ("TransactionID", transaction.transaction_id()),
        ("Date", transaction.date()),
        ("ProductID", transaction.product_id()),
        ("ProductName", transaction.product_name()),
        ("CustomerID", transaction.customer_id()),
        ("Region", transaction.region()),
    ];
    if let Some(&(field, _)) = present.iter().find(|(_, value)| value.is_empty()) {
        return Err(RuleViolation::MissingField { field });
    }

    let prefixed = [
        ("TransactionID", transaction.transaction_id(), TRANSACTION_ID_PREFIX),
        ("ProductID", transaction.product_id(), PRODUCT_ID_PREFIX),
        ("CustomerID", transaction.customer_id(), CUSTOMER_ID_PREFIX),
    ];
    for (field, value, prefix) in prefixed {
        if !value.starts_with(prefix) {
            return Err(RuleViolation::BadPrefix {
                field,
                value: value.to_string(),
                prefix,
            });
        }
    }

    if transaction.quantity() <= 0 {
        return Err(RuleViolation::NonPositiveQuantity {
            quantity: transaction.quantity(),
        });
    }

    if transaction.unit_price() <= Decimal::ZERO {
        return Err(RuleViolation::NonPositivePrice {
            unit_price: transaction.unit_price(),
        });
    }

    Ok(())
}

/// Inclusive bounds on `TotalSales`
///
/// Either side may be open. Construction rejects `min > max`, so a range that
/// exists is always satisfiable.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AmountRange {
    min: Option<Decimal>,
    max: Option<Decimal>,
}

impl AmountRange {
    pub fn new(min: Option<Decimal>, max: Option<Decimal>) -> Result<Self, AnalyticsError> {
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(AnalyticsError::invalid_amount_range(min, max));
            }
        }
        Ok(AmountRange { min, max })
    }

    /// A range with no bounds
    pub fn unbounded() -> Self {
        AmountRange::default()
    }

    pub fn min(&self) -> Option<Decimal> {
        self.min
    }

    pub fn max(&self) -> Option<Decimal> {
        self.max
    }

    pub fn contains(&self, amount: Decimal) -> bool {
        self.min.map_or(true, |min| amount >= min) && self.max.map_or(true, |max| amount <= max)
    }
}

/// User-selected filters applied after validation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// Exact match on `Region`
    pub region: Option<String>,
    pub amount: AmountRange,
}

impl TransactionFilter {
    pub fn none() -> Self {
        TransactionFilter::default()
    }

    pub fn by_region(region: impl Into<String>) -> Self {
        TransactionFilter {
            region: Some(region.into()),
            amount: AmountRange::unbounded(),
        }
    }

    pub fn with_amount(mut self, amount: AmountRange) -> Self {
        self.amount = amount;
        self
    }
}

/// Record counts for each validation and filter stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterSummary {
    pub total_input: usize,
    pub invalid: usize,
    pub valid: usize,
    pub filtered_by_region: usize,
    /// Removed by the minimum and maximum bounds together
    pub filtered_by_amount: usize,
    pub final_count: usize,
}

/// Transactions that passed validation and filters, with stage counts
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    pub transactions: Vec<Transaction>,
    pub summary: FilterSummary,
}

/// Validate every transaction, then apply the optional filters
///
/// The input order is preserved in the output.
pub fn validate_and_filter(
    transactions: &[Transaction],
    filter: &TransactionFilter,
) -> FilterOutcome {
    let total_input = transactions.len();

    let mut kept: Vec<Transaction> = transactions
        .iter()
        .filter(|tx| match validate_transaction(tx) {
            Ok(()) => true,
            Err(violation) => {
                debug!(transaction = tx.transaction_id(), %violation, "invalid transaction");
                false
            }
        })
        .cloned()
        .collect();
    let valid = kept.len();

    let mut filtered_by_region = 0;
    if let Some(region) = &filter.region {
        let before = kept.len();
        kept.retain(|tx| tx.region() == region);
        filtered_by_region = before - kept.len();
        debug!(region = %region, remaining = kept.len(), "applied region filter");
    }

    let before = kept.len();
    kept.retain(|tx| filter.amount.contains(tx.total_sales()));
    let filtered_by_amount = before - kept.len();
    if filtered_by_amount > 0 {
        debug!(
            min = ?filter.amount.min(),
            max = ?filter.amount.max(),
            remaining = kept.len(),
            "applied amount filter"
        );
    }

    let summary = FilterSummary {
        total_input,
        invalid: total_input - valid,
        valid,
        filtered_by_region,
        filtered_by_amount,
        final_count: kept.len(),
    };

    FilterOutcome {
        transactions: kept,
        summary,
    }
}

/// Values a user can filter on: distinct regions and the amount span
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    /// Sorted, distinct
    pub regions: Vec<String>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
}

impl FilterOptions {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let regions: BTreeSet<&str> = transactions.iter().map(|tx| tx.region()).collect();
        let amounts = transactions.iter().map(|tx| tx.total_sales());

        FilterOptions {
            regions: regions.into_iter().map(str::to_string).collect(),
            min_amount: amounts.clone().min(),
            max_amount: amounts.max(),
        }
    }
}
