//! Product catalog types
//!
//! `CatalogProduct` mirrors one entry of the remote catalog payload. The
//! enrichment step only needs a subset of it, held in `CatalogDetails` and
//! indexed by numeric id in a `ProductLookup`.
//!
//! The payload is read leniently: any field may be missing or `null`, and an
//! entry that does not fit the product shape is skipped on its own.

use super::transaction::ProductId;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// One product as returned by the catalog service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogProduct {
    /// Entries without an id are ignored when building the lookup
    #[serde(default)]
    pub id: Option<ProductId>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub category: Option<String>,

    /// Some catalog entries carry no brand; treated as empty
    #[serde(default)]
    pub brand: Option<String>,

    #[serde(default)]
    pub price: Option<f64>,

    #[serde(default)]
    pub rating: Option<f64>,
}

/// Envelope of the catalog listing endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogResponse {
    #[serde(default, deserialize_with = "lenient_products")]
    pub products: Vec<CatalogProduct>,
}

/// Keep every entry that reads as a product, drop the rest individually
fn lenient_products<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<CatalogProduct>, D::Error> {
    let entries = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();

    Ok(entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(product) => Some(product),
            Err(e) => {
                debug!(entry = index, error = %e, "skipping malformed catalog entry");
                None
            }
        })
        .collect())
}

/// Catalog fields attached to a matched transaction
///
/// Missing catalog values become empty strings and a zero rating, so a
/// matched record always carries all three API fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogDetails {
    pub title: String,
    pub category: String,
    pub brand: String,
    pub rating: f64,
}

impl From<&CatalogProduct> for CatalogDetails {
    fn from(product: &CatalogProduct) -> Self {
        CatalogDetails {
            title: product.title.clone().unwrap_or_default(),
            category: product.category.clone().unwrap_or_default(),
            brand: product.brand.clone().unwrap_or_default(),
            rating: product.rating.unwrap_or_default(),
        }
    }
}

/// Product id to catalog details, built once per run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductLookup {
    entries: HashMap<ProductId, CatalogDetails>,
}

impl ProductLookup {
    /// Build a lookup from fetched products
    ///
    /// Products without an id are skipped. When an id repeats, the last
    /// entry wins.
    pub fn from_products(products: &[CatalogProduct]) -> Self {
        let entries = products
            .iter()
            .filter_map(|product| product.id.map(|id| (id, CatalogDetails::from(product))))
            .collect();

        ProductLookup { entries }
    }

    pub fn get(&self, id: ProductId) -> Option<&CatalogDetails> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(ProductId, CatalogDetails)> for ProductLookup {
    fn from_iter<I: IntoIterator<Item = (ProductId, CatalogDetails)>>(iter: I) -> Self {
        ProductLookup {
            entries: iter.into_iter().collect(),
        }
    }
}
