//! Aggregate views over a transaction set
//!
//! Every function here is pure: it takes a slice of transactions and returns
//! a freshly computed snapshot. No view depends on another's result, except
//! the peak day (derived from the daily trend) and the two product rankings
//! (derived from one product grouping).
//!
//! Grouped views are built in two steps: a `group_by_*` pass that sums and
//! counts per key in first-encountered order, and a derivation pass that adds
//! ratios and ranks. Rankings use stable sorts, so ties keep the order in
//! which the grouping pass first saw each key.
//!
//! Sums saturate instead of panicking. [`SalesAnalytics::try_compute`] first
//! checks that the totals of the whole set fit, so no view of a checked set
//! ever saturates.

use crate::types::{AnalyticsError, Transaction};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Number of products in the top-selling ranking
pub const DEFAULT_TOP_N: usize = 5;

/// Products selling fewer units than this are low performers
pub const DEFAULT_LOW_PERFORMER_THRESHOLD: i64 = 10;

/// Group transactions by a string key, preserving first-seen key order
fn group_ordered<'a, V, K, F>(
    transactions: &'a [Transaction],
    key: K,
    mut fold: F,
) -> Vec<(&'a str, V)>
where
    V: Default,
    K: Fn(&'a Transaction) -> &'a str,
    F: FnMut(&mut V, &'a Transaction),
{
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut groups: Vec<(&'a str, V)> = Vec::new();

    for tx in transactions {
        let name = key(tx);
        let slot = *index.entry(name).or_insert_with(|| {
            groups.push((name, V::default()));
            groups.len() - 1
        });
        fold(&mut groups[slot].1, tx);
    }

    groups
}

/// `part / whole * 100`, rounded to 2 decimal places; zero when `whole` is zero
fn percentage_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    // Scale first for precision; divide first when the scaled part would overflow
    part.checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(whole))
        .or_else(|| {
            part.checked_div(whole).and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        })
        .map(|share| share.round_dp(2))
        .unwrap_or(Decimal::ZERO)
}

/// `total / count`; zero when `count` is zero
fn average(total: Decimal, count: usize) -> Decimal {
    if count == 0 {
        Decimal::ZERO
    } else {
        total / Decimal::from(count)
    }
}

// ============================================================================
// Overall statistics
// ============================================================================

/// Totals and distinct counts over a whole transaction set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesStatistics {
    #[serde(rename = "total_sales", with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,

    #[serde(rename = "total_transactions")]
    pub transaction_count: usize,

    #[serde(rename = "average_transaction_value", with = "rust_decimal::serde::float")]
    pub average_order_value: Decimal,

    #[serde(rename = "total_quantity_sold")]
    pub total_quantity: i64,

    #[serde(rename = "num_unique_customers")]
    pub unique_customers: usize,

    #[serde(rename = "num_unique_products")]
    pub unique_products: usize,

    #[serde(rename = "num_unique_regions")]
    pub unique_regions: usize,
}

/// Sum of `TotalSales`, saturating at the decimal bounds
pub fn total_revenue(transactions: &[Transaction]) -> Decimal {
    transactions
        .iter()
        .fold(Decimal::ZERO, |acc, tx| acc.saturating_add(tx.total_sales()))
}

/// Sum of `Quantity`, saturating at the integer bounds
pub fn total_quantity(transactions: &[Transaction]) -> i64 {
    transactions
        .iter()
        .fold(0i64, |acc, tx| acc.saturating_add(tx.quantity()))
}

/// Check that every sum the views take over this set is representable
///
/// Absolute values are summed, so any per-group or partial sum is bounded by
/// the checked totals.
pub fn check_totals(transactions: &[Transaction]) -> Result<(), AnalyticsError> {
    let fold = |(revenue, units): (Decimal, u64), tx: &Transaction| {
        let revenue = revenue
            .checked_add(tx.total_sales().abs())
            .ok_or_else(|| AnalyticsError::arithmetic_overflow("total revenue"))?;
        let units = units
            .checked_add(tx.quantity().unsigned_abs())
            .filter(|units| *units <= i64::MAX as u64)
            .ok_or_else(|| AnalyticsError::arithmetic_overflow("total quantity"))?;
        Ok::<_, AnalyticsError>((revenue, units))
    };

    transactions.iter().try_fold((Decimal::ZERO, 0u64), fold)?;
    Ok(())
}

/// Overall statistics, or `None` when there are no transactions
pub fn calculate_statistics(transactions: &[Transaction]) -> Option<SalesStatistics> {
    if transactions.is_empty() {
        return None;
    }

    let revenue = total_revenue(transactions);
    let distinct = |field: fn(&Transaction) -> &str| {
        transactions.iter().map(field).collect::<HashSet<_>>().len()
    };

    Some(SalesStatistics {
        total_revenue: revenue,
        transaction_count: transactions.len(),
        average_order_value: average(revenue, transactions.len()),
        total_quantity: total_quantity(transactions),
        unique_customers: distinct(Transaction::customer_id),
        unique_products: distinct(Transaction::product_id),
        unique_regions: distinct(Transaction::region),
    })
}

// ============================================================================
// Regions
// ============================================================================

/// Revenue and transaction count for one region
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionTotals {
    pub region: String,
    pub total_sales: Decimal,
    pub transaction_count: usize,
}

/// A region's totals with its share of overall revenue
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSales {
    pub region: String,
    pub total_sales: Decimal,
    pub transaction_count: usize,
    /// Percent of grand total, 2 decimal places
    pub percentage: Decimal,
}

impl RegionSales {
    pub fn average_transaction_value(&self) -> Decimal {
        average(self.total_sales, self.transaction_count)
    }
}

pub fn group_by_region(transactions: &[Transaction]) -> Vec<RegionTotals> {
    group_ordered(transactions, Transaction::region, |acc: &mut RegionTotals, tx| {
        acc.total_sales = acc.total_sales.saturating_add(tx.total_sales());
        acc.transaction_count += 1;
    })
    .into_iter()
    .map(|(region, acc)| RegionTotals {
        region: region.to_string(),
        ..acc
    })
    .collect()
}

/// Add revenue shares and rank by total sales, highest first
pub fn derive_region_shares(groups: Vec<RegionTotals>) -> Vec<RegionSales> {
    let grand_total = groups
        .iter()
        .fold(Decimal::ZERO, |acc, g| acc.saturating_add(g.total_sales));

    let mut regions: Vec<RegionSales> = groups
        .into_iter()
        .map(|g| RegionSales {
            percentage: percentage_of(g.total_sales, grand_total),
            region: g.region,
            total_sales: g.total_sales,
            transaction_count: g.transaction_count,
        })
        .collect();

    regions.sort_by(|a, b| b.total_sales.cmp(&a.total_sales));
    regions
}

pub fn region_wise_sales(transactions: &[Transaction]) -> Vec<RegionSales> {
    derive_region_shares(group_by_region(transactions))
}

// ============================================================================
// Products
// ============================================================================

/// Units sold and revenue for one product name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductSales {
    pub product_name: String,
    pub total_quantity: i64,
    pub total_revenue: Decimal,
}

/// Per-product totals in first-encountered order
pub fn group_by_product(transactions: &[Transaction]) -> Vec<ProductSales> {
    group_ordered(transactions, Transaction::product_name, |acc: &mut ProductSales, tx| {
        acc.total_quantity = acc.total_quantity.saturating_add(tx.quantity());
        acc.total_revenue = acc.total_revenue.saturating_add(tx.total_sales());
    })
    .into_iter()
    .map(|(name, acc)| ProductSales {
        product_name: name.to_string(),
        ..acc
    })
    .collect()
}

/// The `n` products with the most units sold, highest first
pub fn top_products(groups: &[ProductSales], n: usize) -> Vec<ProductSales> {
    let mut ranked = groups.to_vec();
    ranked.sort_by(|a, b| b.total_quantity.cmp(&a.total_quantity));
    ranked.truncate(n);
    ranked
}

/// Products with fewer than `threshold` units sold, lowest first
pub fn low_performers(groups: &[ProductSales], threshold: i64) -> Vec<ProductSales> {
    let mut low: Vec<ProductSales> = groups
        .iter()
        .filter(|p| p.total_quantity < threshold)
        .cloned()
        .collect();
    low.sort_by_key(|p| p.total_quantity);
    low
}

pub fn top_selling_products(transactions: &[Transaction], n: usize) -> Vec<ProductSales> {
    top_products(&group_by_product(transactions), n)
}

pub fn low_performing_products(transactions: &[Transaction], threshold: i64) -> Vec<ProductSales> {
    low_performers(&group_by_product(transactions), threshold)
}

// ============================================================================
// Customers
// ============================================================================

/// Raw per-customer sums from the grouping pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerTotals {
    pub customer_id: String,
    pub total_spent: Decimal,
    pub purchase_count: usize,
    pub products: BTreeSet<String>,
}

/// Spending profile of one customer
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerSummary {
    pub customer_id: String,
    pub total_spent: Decimal,
    pub purchase_count: usize,
    /// Rounded to 2 decimal places
    pub avg_order_value: Decimal,
    /// Distinct product names, alphabetical
    pub products_bought: Vec<String>,
}

pub fn group_by_customer(transactions: &[Transaction]) -> Vec<CustomerTotals> {
    group_ordered(transactions, Transaction::customer_id, |acc: &mut CustomerTotals, tx| {
        acc.total_spent = acc.total_spent.saturating_add(tx.total_sales());
        acc.purchase_count += 1;
        acc.products.insert(tx.product_name().to_string());
    })
    .into_iter()
    .map(|(customer, acc)| CustomerTotals {
        customer_id: customer.to_string(),
        ..acc
    })
    .collect()
}

/// Add order averages and rank by spend, highest first
pub fn derive_customer_profiles(groups: Vec<CustomerTotals>) -> Vec<CustomerSummary> {
    let mut customers: Vec<CustomerSummary> = groups
        .into_iter()
        .map(|g| CustomerSummary {
            avg_order_value: average(g.total_spent, g.purchase_count).round_dp(2),
            customer_id: g.customer_id,
            total_spent: g.total_spent,
            purchase_count: g.purchase_count,
            products_bought: g.products.into_iter().collect(),
        })
        .collect();

    customers.sort_by(|a, b| b.total_spent.cmp(&a.total_spent));
    customers
}

pub fn customer_analysis(transactions: &[Transaction]) -> Vec<CustomerSummary> {
    derive_customer_profiles(group_by_customer(transactions))
}

// ============================================================================
// Daily trend
// ============================================================================

/// Raw per-date sums from the grouping pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayTotals {
    pub date: String,
    pub revenue: Decimal,
    pub transaction_count: usize,
    pub customers: HashSet<String>,
}

/// Activity on one date
#[derive(Debug, Clone, PartialEq)]
pub struct DailySales {
    pub date: String,
    pub revenue: Decimal,
    pub transaction_count: usize,
    pub unique_customers: usize,
}

pub fn group_by_date(transactions: &[Transaction]) -> Vec<DayTotals> {
    group_ordered(transactions, Transaction::date, |acc: &mut DayTotals, tx| {
        acc.revenue = acc.revenue.saturating_add(tx.total_sales());
        acc.transaction_count += 1;
        acc.customers.insert(tx.customer_id().to_string());
    })
    .into_iter()
    .map(|(date, acc)| DayTotals {
        date: date.to_string(),
        ..acc
    })
    .collect()
}

/// Count distinct customers and order by the date string
///
/// Dates are compared as text, so they must already be in a sortable form
/// such as `YYYY-MM-DD`.
pub fn derive_daily_trend(groups: Vec<DayTotals>) -> Vec<DailySales> {
    let mut days: Vec<DailySales> = groups
        .into_iter()
        .map(|g| DailySales {
            unique_customers: g.customers.len(),
            date: g.date,
            revenue: g.revenue,
            transaction_count: g.transaction_count,
        })
        .collect();

    days.sort_by(|a, b| a.date.cmp(&b.date));
    days
}

pub fn daily_sales_trend(transactions: &[Transaction]) -> Vec<DailySales> {
    derive_daily_trend(group_by_date(transactions))
}

/// The date with the highest revenue
#[derive(Debug, Clone, PartialEq)]
pub struct PeakDay {
    pub date: String,
    pub revenue: Decimal,
    pub transaction_count: usize,
}

/// Highest-revenue entry of a chronological trend; the earliest date wins ties
pub fn peak_of_trend(trend: &[DailySales]) -> Option<PeakDay> {
    let mut best: Option<&DailySales> = None;
    for day in trend {
        if best.map_or(true, |b| day.revenue > b.revenue) {
            best = Some(day);
        }
    }

    best.map(|day| PeakDay {
        date: day.date.clone(),
        revenue: day.revenue,
        transaction_count: day.transaction_count,
    })
}

pub fn find_peak_sales_day(transactions: &[Transaction]) -> Option<PeakDay> {
    peak_of_trend(&daily_sales_trend(transactions))
}

// ============================================================================
// All views
// ============================================================================

/// Tunables for the ranked views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationOptions {
    pub top_n: usize,
    pub low_performer_threshold: i64,
}

impl Default for AggregationOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            low_performer_threshold: DEFAULT_LOW_PERFORMER_THRESHOLD,
        }
    }
}

/// Every aggregate view of one transaction set
#[derive(Debug, Clone, PartialEq)]
pub struct SalesAnalytics {
    pub statistics: Option<SalesStatistics>,
    pub regions: Vec<RegionSales>,
    pub top_products: Vec<ProductSales>,
    pub customers: Vec<CustomerSummary>,
    pub daily_trend: Vec<DailySales>,
    pub peak_day: Option<PeakDay>,
    pub low_performers: Vec<ProductSales>,
}

impl SalesAnalytics {
    /// Every view, after checking that the set's totals fit
    ///
    /// # Errors
    ///
    /// `ArithmeticOverflow` when the revenue or quantity totals cannot be
    /// represented.
    pub fn try_compute(
        transactions: &[Transaction],
        options: &AggregationOptions,
    ) -> Result<Self, AnalyticsError> {
        check_totals(transactions)?;
        Ok(Self::compute(transactions, options))
    }

    pub fn compute(transactions: &[Transaction], options: &AggregationOptions) -> Self {
        let products = group_by_product(transactions);
        let daily_trend = daily_sales_trend(transactions);

        SalesAnalytics {
            statistics: calculate_statistics(transactions),
            regions: region_wise_sales(transactions),
            top_products: top_products(&products, options.top_n),
            customers: customer_analysis(transactions),
            peak_day: peak_of_trend(&daily_trend),
            daily_trend,
            low_performers: low_performers(&products, options.low_performer_threshold),
        }
    }
}
