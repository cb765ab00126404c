//! Catalog enrichment of transactions
//!
//! Joins each transaction against a [`ProductLookup`] keyed by the numeric
//! part of its ProductID (`P101` → `101`). Records degrade independently: a
//! ProductID that does not parse, or an id missing from the lookup, leaves
//! that one record unmatched.

use crate::core::validator::PRODUCT_ID_PREFIX;
use crate::types::{EnrichedTransaction, ProductId, ProductLookup, Transaction};
use rust_decimal::Decimal;
use std::collections::BTreeSet;

/// Numeric id of a prefixed product identifier
///
/// Strips every leading `prefix` character, then parses the remainder.
pub fn extract_product_id(product_id: &str, prefix: char) -> Option<ProductId> {
    product_id.trim_start_matches(prefix).parse().ok()
}

pub fn enrich_transaction(
    transaction: &Transaction,
    lookup: &ProductLookup,
) -> EnrichedTransaction {
    let details = extract_product_id(transaction.product_id(), PRODUCT_ID_PREFIX)
        .and_then(|id| lookup.get(id))
        .cloned();

    EnrichedTransaction::new(transaction.clone(), details)
}

/// One enriched record per input transaction, in input order
pub fn enrich_transactions(
    transactions: &[Transaction],
    lookup: &ProductLookup,
) -> Vec<EnrichedTransaction> {
    transactions
        .iter()
        .map(|tx| enrich_transaction(tx, lookup))
        .collect()
}

/// Match counts over an enriched set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichmentStats {
    pub total: usize,
    pub matched: usize,
    /// Percent of records matched; zero for an empty set
    pub success_rate: Decimal,
    /// Distinct ProductIDs without a catalog match, sorted
    pub unmatched_product_ids: Vec<String>,
}

impl EnrichmentStats {
    pub fn from_enriched(enriched: &[EnrichedTransaction]) -> Self {
        let total = enriched.len();
        let matched = enriched.iter().filter(|tx| tx.api_match()).count();
        let success_rate = if total == 0 {
            Decimal::ZERO
        } else {
            Decimal::from(matched) * Decimal::ONE_HUNDRED / Decimal::from(total)
        };

        let unmatched: BTreeSet<&str> = enriched
            .iter()
            .filter(|tx| !tx.api_match())
            .map(|tx| tx.transaction.product_id())
            .collect();

        EnrichmentStats {
            total,
            matched,
            success_rate,
            unmatched_product_ids: unmatched.into_iter().map(str::to_string).collect(),
        }
    }
}
