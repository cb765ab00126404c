//! Record parser for pipe-delimited sales lines
//!
//! Turns each raw line into a [`Transaction`] or rejects it. The layout is
//! fixed: `TransactionID|Date|ProductID|ProductName|Quantity|UnitPrice|CustomerID|Region`.
//!
//! Cleaning rules:
//! - every field is trimmed
//! - thousands separators (`,`) are stripped from the product name, quantity
//!   and unit price
//! - quantity is a signed integer, unit price an exact decimal
//!
//! Rejected lines are dropped, not reported. Range checks (positive quantity,
//! positive price) belong to the validator.

use crate::types::{AnalyticsError, Transaction, TransactionFields};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

/// Field separator of the sales file
pub const DELIMITER: char = '|';

/// Number of fields in a sales line
pub const EXPECTED_FIELD_COUNT: usize = 8;

/// Parse a single raw line
///
/// # Returns
///
/// * `Ok(Transaction)` - with `TotalSales` computed from quantity and price
/// * `Err(AnalyticsError::FieldCount)` - the line does not have exactly 8 fields
/// * `Err(AnalyticsError::InvalidNumber)` - quantity or price failed conversion
/// * `Err(AnalyticsError::ArithmeticOverflow)` - quantity times price does not
///   fit a decimal
pub fn parse_line(line: &str) -> Result<Transaction, AnalyticsError> {
    let fields: Vec<&str> = line.split(DELIMITER).map(str::trim).collect();

    if fields.len() != EXPECTED_FIELD_COUNT {
        return Err(AnalyticsError::field_count(EXPECTED_FIELD_COUNT, fields.len()));
    }

    let quantity_str = strip_separators(fields[4]);
    let quantity = quantity_str
        .parse::<i64>()
        .map_err(|_| AnalyticsError::invalid_number("Quantity", &quantity_str))?;

    let price_str = strip_separators(fields[5]);
    let unit_price = parse_decimal(&price_str)
        .ok_or_else(|| AnalyticsError::invalid_number("UnitPrice", &price_str))?;

    Transaction::try_from(TransactionFields {
        transaction_id: fields[0].to_string(),
        date: fields[1].to_string(),
        product_id: fields[2].to_string(),
        product_name: strip_separators(fields[3]),
        quantity,
        unit_price,
        customer_id: fields[6].to_string(),
        region: fields[7].to_string(),
    })
}

/// Parse every line, keeping the survivors in input order
///
/// The number of dropped lines is `lines.len() - result.len()`.
pub fn parse_transactions<S: AsRef<str>>(lines: &[S]) -> Vec<Transaction> {
    let transactions: Vec<Transaction> = lines
        .iter()
        .enumerate()
        .filter_map(|(index, line)| match parse_line(line.as_ref()) {
            Ok(transaction) => Some(transaction),
            Err(e) => {
                debug!(record = index + 1, error = %e, "dropping malformed line");
                None
            }
        })
        .collect();

    debug!(
        parsed = transactions.len(),
        total = lines.len(),
        "parsed sales lines"
    );
    transactions
}

fn strip_separators(value: &str) -> String {
    value.replace(',', "")
}

/// Plain decimal first, then scientific notation (`1.5e2`)
fn parse_decimal(value: &str) -> Option<Decimal> {
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .ok()
}
