//! Transaction-related types for the sales analytics pipeline
//!
//! This module defines the sales transaction record and its enriched form.
//! A `Transaction` is immutable once built: its fields are private and its
//! `TotalSales` value is always derived from quantity and unit price.

use crate::types::catalog::CatalogDetails;
use crate::types::error::AnalyticsError;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

/// Numeric product identifier used by the product catalog
pub type ProductId = u64;

/// Cleaned field values for a single sales line
///
/// This is the input to [`Transaction::try_from`]. It carries everything
/// except `TotalSales`, which is never taken from the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionFields {
    pub transaction_id: String,
    pub date: String,
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub customer_id: String,
    pub region: String,
}

/// A single sales transaction
///
/// Serializes with the column names of the input file plus `TotalSales`.
/// Decimal values serialize as JSON numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    #[serde(rename = "TransactionID")]
    transaction_id: String,

    #[serde(rename = "Date")]
    date: String,

    #[serde(rename = "ProductID")]
    product_id: String,

    #[serde(rename = "ProductName")]
    product_name: String,

    #[serde(rename = "Quantity")]
    quantity: i64,

    #[serde(rename = "UnitPrice", with = "rust_decimal::serde::float")]
    unit_price: Decimal,

    #[serde(rename = "CustomerID")]
    customer_id: String,

    #[serde(rename = "Region")]
    region: String,

    /// Always `quantity * unit_price`
    #[serde(rename = "TotalSales", with = "rust_decimal::serde::float")]
    total_sales: Decimal,
}

impl TryFrom<TransactionFields> for Transaction {
    type Error = AnalyticsError;

    /// Fails when `quantity * unit_price` does not fit a `Decimal`
    fn try_from(fields: TransactionFields) -> Result<Self, Self::Error> {
        let total_sales = Decimal::from(fields.quantity)
            .checked_mul(fields.unit_price)
            .ok_or_else(|| AnalyticsError::arithmetic_overflow("TotalSales"))?;

        Ok(Transaction {
            transaction_id: fields.transaction_id,
            date: fields.date,
            product_id: fields.product_id,
            product_name: fields.product_name,
            quantity: fields.quantity,
            unit_price: fields.unit_price,
            customer_id: fields.customer_id,
            region: fields.region,
            total_sales,
        })
    }
}

impl Transaction {
    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Revenue of this line: quantity times unit price
    pub fn total_sales(&self) -> Decimal {
        self.total_sales
    }
}

/// A transaction joined against the product catalog
///
/// `catalog` is `Some` exactly when a catalog entry matched the numeric id
/// extracted from the transaction's ProductID.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedTransaction {
    pub transaction: Transaction,
    pub catalog: Option<CatalogDetails>,
}

impl EnrichedTransaction {
    pub fn new(transaction: Transaction, catalog: Option<CatalogDetails>) -> Self {
        EnrichedTransaction {
            transaction,
            catalog,
        }
    }

    /// Whether a catalog entry was found for this transaction
    pub fn api_match(&self) -> bool {
        self.catalog.is_some()
    }
}

/// Flat JSON shape of an enriched transaction
#[derive(Serialize)]
struct EnrichedRecord<'a> {
    #[serde(flatten)]
    transaction: &'a Transaction,

    #[serde(rename = "API_Category")]
    category: Option<&'a str>,

    #[serde(rename = "API_Brand")]
    brand: Option<&'a str>,

    #[serde(rename = "API_Rating")]
    rating: Option<f64>,

    #[serde(rename = "API_Match")]
    api_match: bool,
}

impl Serialize for EnrichedTransaction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let details = self.catalog.as_ref();
        EnrichedRecord {
            transaction: &self.transaction,
            category: details.map(|d| d.category.as_str()),
            brand: details.map(|d| d.brand.as_str()),
            rating: details.map(|d| d.rating),
            api_match: self.api_match(),
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn fields(quantity: i64, unit_price: Decimal) -> TransactionFields {
        TransactionFields {
            transaction_id: "T001".to_string(),
            date: "2024-01-05".to_string(),
            product_id: "P101".to_string(),
            product_name: "Widget".to_string(),
            quantity,
            unit_price,
            customer_id: "C001".to_string(),
            region: "North".to_string(),
        }
    }

    #[rstest]
    #[case(10, Decimal::new(2550, 2), Decimal::new(25500, 2))]
    #[case(3, Decimal::new(1999, 2), Decimal::new(5997, 2))]
    #[case(0, Decimal::new(500, 2), Decimal::ZERO)]
    #[case(-2, Decimal::new(150, 2), Decimal::new(-300, 2))]
    fn test_total_sales_is_quantity_times_price(
        #[case] quantity: i64,
        #[case] unit_price: Decimal,
        #[case] expected: Decimal,
    ) {
        let tx = Transaction::try_from(fields(quantity, unit_price)).unwrap();
        assert_eq!(tx.total_sales(), expected);
        assert_eq!(tx.total_sales(), Decimal::from(tx.quantity()) * tx.unit_price());
    }

    #[rstest]
    #[case::max_quantity_and_price(i64::MAX, Decimal::MAX)]
    #[case::large_negative_quantity(i64::MIN, Decimal::MAX)]
    #[case::max_price_times_two(2, Decimal::MAX)]
    fn test_total_sales_overflow_is_rejected(#[case] quantity: i64, #[case] unit_price: Decimal) {
        assert_eq!(
            Transaction::try_from(fields(quantity, unit_price)),
            Err(AnalyticsError::ArithmeticOverflow {
                operation: "TotalSales".to_string()
            })
        );
    }

    #[test]
    fn test_transaction_serializes_with_column_names() {
        let tx = Transaction::try_from(fields(10, Decimal::new(2550, 2))).unwrap();
        let value = serde_json::to_value(&tx).unwrap();

        assert_eq!(value["TransactionID"], "T001");
        assert_eq!(value["ProductID"], "P101");
        assert_eq!(value["Quantity"], 10);
        assert_eq!(value["UnitPrice"], 25.5);
        assert_eq!(value["TotalSales"], 255.0);
    }

    #[test]
    fn test_unmatched_enriched_serializes_null_api_fields() {
        let tx = Transaction::try_from(fields(1, Decimal::ONE)).unwrap();
        let enriched = EnrichedTransaction::new(tx, None);
        let value = serde_json::to_value(&enriched).unwrap();

        assert_eq!(value["TransactionID"], "T001");
        assert!(value["API_Category"].is_null());
        assert!(value["API_Brand"].is_null());
        assert!(value["API_Rating"].is_null());
        assert_eq!(value["API_Match"], false);
    }

    #[test]
    fn test_matched_enriched_serializes_api_fields() {
        let tx = Transaction::try_from(fields(1, Decimal::ONE)).unwrap();
        let details = CatalogDetails {
            title: "Essence Mascara".to_string(),
            category: "beauty".to_string(),
            brand: "Essence".to_string(),
            rating: 4.94,
        };
        let enriched = EnrichedTransaction::new(tx, Some(details));
        let value = serde_json::to_value(&enriched).unwrap();

        assert_eq!(value["API_Category"], "beauty");
        assert_eq!(value["API_Brand"], "Essence");
        assert_eq!(value["API_Rating"], 4.94);
        assert_eq!(value["API_Match"], true);
    }
}
