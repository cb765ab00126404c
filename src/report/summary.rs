//! Machine-readable analytics summary written to `analytics_report.json`

use crate::core::aggregator::{
    PeakDay, ProductSales, RegionSales, SalesAnalytics, SalesStatistics, DEFAULT_TOP_N,
};
use crate::core::enricher::EnrichmentStats;
use crate::core::validator::FilterSummary;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataValidation {
    pub total_input: usize,
    pub invalid_records: usize,
    pub valid_records: usize,
    pub filtered_by_region: usize,
    pub filtered_by_amount: usize,
    pub final_count: usize,
}

impl From<&FilterSummary> for DataValidation {
    fn from(summary: &FilterSummary) -> Self {
        DataValidation {
            total_input: summary.total_input,
            invalid_records: summary.invalid,
            valid_records: summary.valid,
            filtered_by_region: summary.filtered_by_region,
            filtered_by_amount: summary.filtered_by_amount,
            final_count: summary.final_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionEntry {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_sales: Decimal,
    pub transaction_count: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductEntry {
    pub name: String,
    pub quantity: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerEntry {
    pub id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_spent: Decimal,
    pub orders: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeakDayEntry {
    pub date: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
    pub transactions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichmentEntry {
    pub total_enriched: usize,
    pub matched: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub success_rate: Decimal,
}

/// Top-level JSON document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    pub timestamp: String,
    pub data_validation: DataValidation,
    pub statistics: Option<SalesStatistics>,
    /// Object keyed by region, in ranking order
    #[serde(serialize_with = "ordered_map")]
    pub sales_by_region: Vec<(String, RegionEntry)>,
    pub top_5_products: Vec<ProductEntry>,
    pub top_5_customers: Vec<CustomerEntry>,
    pub peak_sales_day: Option<PeakDayEntry>,
    pub low_performers_count: usize,
    pub api_enrichment: EnrichmentEntry,
}

fn ordered_map<S: Serializer>(
    entries: &[(String, RegionEntry)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(entries.iter().map(|(region, entry)| (region, entry)))
}

impl From<&RegionSales> for RegionEntry {
    fn from(region: &RegionSales) -> Self {
        RegionEntry {
            total_sales: region.total_sales,
            transaction_count: region.transaction_count,
            percentage: region.percentage,
        }
    }
}

impl From<&ProductSales> for ProductEntry {
    fn from(product: &ProductSales) -> Self {
        ProductEntry {
            name: product.product_name.clone(),
            quantity: product.total_quantity,
            revenue: product.total_revenue,
        }
    }
}

impl From<&PeakDay> for PeakDayEntry {
    fn from(peak: &PeakDay) -> Self {
        PeakDayEntry {
            date: peak.date.clone(),
            revenue: peak.revenue,
            transactions: peak.transaction_count,
        }
    }
}

impl AnalyticsSummary {
    pub fn build(
        validation: &FilterSummary,
        analytics: &SalesAnalytics,
        enrichment: &EnrichmentStats,
        timestamp: impl Into<String>,
    ) -> Self {
        AnalyticsSummary {
            timestamp: timestamp.into(),
            data_validation: validation.into(),
            statistics: analytics.statistics.clone(),
            sales_by_region: analytics
                .regions
                .iter()
                .map(|r| (r.region.clone(), r.into()))
                .collect(),
            top_5_products: analytics
                .top_products
                .iter()
                .take(DEFAULT_TOP_N)
                .map(ProductEntry::from)
                .collect(),
            top_5_customers: analytics
                .customers
                .iter()
                .take(DEFAULT_TOP_N)
                .map(|c| CustomerEntry {
                    id: c.customer_id.clone(),
                    total_spent: c.total_spent,
                    orders: c.purchase_count,
                })
                .collect(),
            peak_sales_day: analytics.peak_day.as_ref().map(PeakDayEntry::from),
            low_performers_count: analytics.low_performers.len(),
            api_enrichment: EnrichmentEntry {
                total_enriched: enrichment.total,
                matched: enrichment.matched,
                success_rate: enrichment.success_rate,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregator::AggregationOptions;
    use crate::core::enricher::enrich_transactions;
    use crate::core::parser::parse_transactions;
    use crate::core::validator::{validate_and_filter, TransactionFilter};
    use crate::types::ProductLookup;
    use serde_json::{json, Value};

    fn summary(lines: &[&str]) -> AnalyticsSummary {
        let parsed = parse_transactions(lines);
        let outcome = validate_and_filter(&parsed, &TransactionFilter::none());
        let analytics =
            SalesAnalytics::compute(&outcome.transactions, &AggregationOptions::default());
        let enriched = enrich_transactions(&outcome.transactions, &ProductLookup::default());
        AnalyticsSummary::build(
            &outcome.summary,
            &analytics,
            &EnrichmentStats::from_enriched(&enriched),
            "2024-02-01T09:30:00",
        )
    }

    fn summary_json(lines: &[&str]) -> Value {
        serde_json::to_value(summary(lines)).unwrap()
    }

    const SAMPLE: [&str; 6] = [
        "T001|2024-01-05|P101|Widget|10|25.50|C001|North",
        "T002|2024-01-05|P102|Gadget|2|10.00|C002|South",
        "T003|2024-01-06|P103|Gizmo|1|500.00|C003|North",
        "T004|2024-01-04|P102|Gadget|4|10.00|C001|East",
        "T005|2024-01-06|P101|Widget|5|25.50|C002|South",
        "X006|2024-01-06|P101|Widget|5|25.50|C002|South",
    ];

    #[test]
    fn test_summary_validation_block() {
        let value = summary_json(&SAMPLE);
        assert_eq!(
            value["data_validation"],
            json!({
                "total_input": 6,
                "invalid_records": 1,
                "valid_records": 5,
                "filtered_by_region": 0,
                "filtered_by_amount": 0,
                "final_count": 5,
            })
        );
        assert_eq!(value["timestamp"], "2024-02-01T09:30:00");
    }

    #[test]
    fn test_summary_regions_keep_ranking_order() {
        let text = serde_json::to_string(&summary(&SAMPLE)).unwrap();
        let north = text.find("North").unwrap();
        let south = text.find("South").unwrap();
        let east = text.find("East").unwrap();
        assert!(north < south && south < east);

        let value = summary_json(&SAMPLE);
        assert_eq!(value["sales_by_region"]["North"]["total_sales"], 755.0);
        let share = value["sales_by_region"]["North"]["percentage"].as_f64().unwrap();
        assert!((share - 80.11).abs() < 1e-9);
    }

    #[test]
    fn test_summary_rankings_and_peak() {
        let value = summary_json(&SAMPLE);

        assert_eq!(
            value["top_5_products"][0],
            json!({"name": "Widget", "quantity": 15, "revenue": 382.5})
        );
        assert_eq!(
            value["top_5_customers"][0],
            json!({"id": "C003", "total_spent": 500.0, "orders": 1})
        );
        assert_eq!(
            value["peak_sales_day"],
            json!({"date": "2024-01-06", "revenue": 627.5, "transactions": 2})
        );
        assert_eq!(value["low_performers_count"], 2);
        assert_eq!(
            value["api_enrichment"],
            json!({"total_enriched": 5, "matched": 0, "success_rate": 0.0})
        );
    }

    #[test]
    fn test_summary_empty_set_has_null_views() {
        let value = summary_json(&["X001|2024-01-05|P101|Widget|1|1.00|C001|North"]);

        assert_eq!(value["statistics"], Value::Null);
        assert_eq!(value["peak_sales_day"], Value::Null);
        assert_eq!(value["sales_by_region"], json!({}));
        assert_eq!(value["top_5_products"], json!([]));
    }
}
