//! Fixed-width text report
//!
//! Layout, top to bottom: header, overall summary, region table, top products,
//! top customers, daily trend, product performance, catalog enrichment, footer.
//! Every line fits in [`LINE_WIDTH`] columns except long names, which are never
//! truncated.

use super::format::{format_currency, format_fixed2};
use crate::core::aggregator::{AggregationOptions, SalesAnalytics, DEFAULT_LOW_PERFORMER_THRESHOLD};
use crate::core::enricher::EnrichmentStats;
use crate::types::{EnrichedTransaction, Transaction};
use chrono::NaiveDateTime;
use std::fmt::{self, Write};

pub const LINE_WIDTH: usize = 60;

const TOP_ROWS: usize = 5;
const DAILY_ROWS: usize = 10;
const LOW_PERFORMER_ROWS: usize = 5;
const UNMATCHED_ROWS: usize = 10;

/// Inputs to the report that do not come from the data
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub generated_at: NaiveDateTime,
    pub low_performer_threshold: i64,
}

impl ReportOptions {
    pub fn new(generated_at: NaiveDateTime) -> Self {
        ReportOptions {
            generated_at,
            low_performer_threshold: DEFAULT_LOW_PERFORMER_THRESHOLD,
        }
    }
}

/// Render the full report into a string
pub fn render_report(
    transactions: &[Transaction],
    enriched: Option<&[EnrichedTransaction]>,
    options: &ReportOptions,
) -> String {
    let mut out = String::new();
    // fmt::Write for String is infallible
    let _ = write_report(&mut out, transactions, enriched, options);
    out
}

/// Write the full report to any formatter sink
pub fn write_report<W: Write>(
    out: &mut W,
    transactions: &[Transaction],
    enriched: Option<&[EnrichedTransaction]>,
    options: &ReportOptions,
) -> fmt::Result {
    let analytics = SalesAnalytics::compute(
        transactions,
        &AggregationOptions {
            top_n: TOP_ROWS,
            low_performer_threshold: options.low_performer_threshold,
        },
    );

    write_header(out, transactions.len(), &options.generated_at)?;
    write_overall_summary(out, transactions, &analytics)?;
    write_region_performance(out, &analytics)?;
    write_top_products(out, &analytics)?;
    write_top_customers(out, &analytics)?;
    write_daily_trend(out, &analytics)?;
    write_product_performance(out, &analytics, options.low_performer_threshold)?;
    write_enrichment_summary(out, enriched.map(EnrichmentStats::from_enriched).as_ref())?;

    writeln!(out)?;
    writeln!(out, "{}", "=".repeat(LINE_WIDTH))?;
    writeln!(out, "END OF REPORT")?;
    writeln!(out, "{}", "=".repeat(LINE_WIDTH))
}

fn rule(out: &mut impl Write) -> fmt::Result {
    writeln!(out, "{}", "-".repeat(LINE_WIDTH))
}

fn write_header(out: &mut impl Write, records: usize, generated_at: &NaiveDateTime) -> fmt::Result {
    writeln!(out, "{}", "=".repeat(LINE_WIDTH))?;
    writeln!(out, "           SALES ANALYTICS REPORT")?;
    writeln!(out, "         Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(out, "         Records Processed: {}", records)?;
    writeln!(out, "{}", "=".repeat(LINE_WIDTH))?;
    writeln!(out)
}

fn write_overall_summary(
    out: &mut impl Write,
    transactions: &[Transaction],
    analytics: &SalesAnalytics,
) -> fmt::Result {
    let (revenue, count, average) = analytics
        .statistics
        .as_ref()
        .map(|s| (s.total_revenue, s.transaction_count, s.average_order_value))
        .unwrap_or_default();

    let first = transactions.iter().map(Transaction::date).min();
    let last = transactions.iter().map(Transaction::date).max();
    let date_range = match (first, last) {
        (Some(first), Some(last)) => format!("{} to {}", first, last),
        _ => "N/A".to_string(),
    };

    writeln!(out, "OVERALL SUMMARY")?;
    rule(out)?;
    writeln!(out, "Total Revenue:        ${}", format_currency(revenue))?;
    writeln!(out, "Total Transactions:   {}", count)?;
    writeln!(out, "Average Order Value:  ${}", format_currency(average))?;
    writeln!(out, "Date Range:           {}", date_range)?;
    writeln!(out)
}

fn write_region_performance(out: &mut impl Write, analytics: &SalesAnalytics) -> fmt::Result {
    writeln!(out, "REGION-WISE PERFORMANCE")?;
    rule(out)?;
    writeln!(
        out,
        "{:<15} {:<18} {:<15} {:<12}",
        "Region", "Sales", "% of Total", "Transactions"
    )?;
    rule(out)?;
    for region in &analytics.regions {
        writeln!(
            out,
            "{:<15} ${:>15}  {:>6}%     {:>6}",
            region.region,
            format_currency(region.total_sales),
            format_fixed2(region.percentage),
            region.transaction_count
        )?;
    }
    writeln!(out)
}

fn write_top_products(out: &mut impl Write, analytics: &SalesAnalytics) -> fmt::Result {
    writeln!(out, "TOP {} PRODUCTS", TOP_ROWS)?;
    rule(out)?;
    writeln!(
        out,
        "{:<6} {:<25} {:<12} {:<15}",
        "Rank", "Product Name", "Quantity", "Revenue"
    )?;
    rule(out)?;
    for (rank, product) in analytics.top_products.iter().enumerate() {
        writeln!(
            out,
            "{:<6} {:<25} {:<12} ${:>13}",
            rank + 1,
            product.product_name,
            product.total_quantity,
            format_currency(product.total_revenue)
        )?;
    }
    writeln!(out)
}

fn write_top_customers(out: &mut impl Write, analytics: &SalesAnalytics) -> fmt::Result {
    writeln!(out, "TOP {} CUSTOMERS", TOP_ROWS)?;
    rule(out)?;
    writeln!(
        out,
        "{:<6} {:<15} {:<18} {:<12}",
        "Rank", "Customer ID", "Total Spent", "Order Count"
    )?;
    rule(out)?;
    for (rank, customer) in analytics.customers.iter().take(TOP_ROWS).enumerate() {
        writeln!(
            out,
            "{:<6} {:<15} ${:>15}  {:>6}",
            rank + 1,
            customer.customer_id,
            format_currency(customer.total_spent),
            customer.purchase_count
        )?;
    }
    writeln!(out)
}

fn write_daily_trend(out: &mut impl Write, analytics: &SalesAnalytics) -> fmt::Result {
    writeln!(out, "DAILY SALES TREND")?;
    rule(out)?;
    writeln!(
        out,
        "{:<15} {:<18} {:<15} {:<12}",
        "Date", "Revenue", "Transactions", "Unique Customers"
    )?;
    rule(out)?;
    for day in analytics.daily_trend.iter().take(DAILY_ROWS) {
        writeln!(
            out,
            "{:<15} ${:>15}  {:>6}         {:>6}",
            day.date,
            format_currency(day.revenue),
            day.transaction_count,
            day.unique_customers
        )?;
    }
    if analytics.daily_trend.len() > DAILY_ROWS {
        writeln!(out, "... and {} more days", analytics.daily_trend.len() - DAILY_ROWS)?;
    }
    writeln!(out)
}

fn write_product_performance(
    out: &mut impl Write,
    analytics: &SalesAnalytics,
    threshold: i64,
) -> fmt::Result {
    writeln!(out, "PRODUCT PERFORMANCE ANALYSIS")?;
    rule(out)?;
    if let Some(peak) = &analytics.peak_day {
        writeln!(
            out,
            "Best Selling Day:     {} (${}, {} transactions)",
            peak.date,
            format_currency(peak.revenue),
            peak.transaction_count
        )?;
    }
    writeln!(
        out,
        "Low Performing Products (< {} units): {} products",
        threshold,
        analytics.low_performers.len()
    )?;
    for product in analytics.low_performers.iter().take(LOW_PERFORMER_ROWS) {
        writeln!(
            out,
            "  - {}: {} units (${})",
            product.product_name,
            product.total_quantity,
            format_currency(product.total_revenue)
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Average Transaction Value per Region:")?;
    for region in analytics.regions.iter().filter(|r| r.transaction_count > 0) {
        writeln!(
            out,
            "  {}: ${}",
            region.region,
            format_currency(region.average_transaction_value())
        )?;
    }
    writeln!(out)
}

fn write_enrichment_summary(out: &mut impl Write, stats: Option<&EnrichmentStats>) -> fmt::Result {
    writeln!(out, "API ENRICHMENT SUMMARY")?;
    rule(out)?;

    let stats = match stats {
        Some(stats) if stats.total > 0 => stats,
        _ => return writeln!(out, "No enriched data available"),
    };

    writeln!(out, "Total Transactions Processed: {}", stats.total)?;
    writeln!(out, "Successfully Enriched:       {}", stats.matched)?;
    writeln!(out, "Enrichment Success Rate:     {}%", format_fixed2(stats.success_rate))?;

    let unmatched = &stats.unmatched_product_ids;
    if !unmatched.is_empty() {
        writeln!(out)?;
        writeln!(out, "Products Not Enriched ({} products):", unmatched.len())?;
        for product_id in unmatched.iter().take(UNMATCHED_ROWS) {
            writeln!(out, "  - {}", product_id)?;
        }
        if unmatched.len() > UNMATCHED_ROWS {
            writeln!(out, "  ... and {} more", unmatched.len() - UNMATCHED_ROWS)?;
        }
    }
    Ok(())
}
