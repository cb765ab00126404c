//! Offline catalog source reading a saved listing payload

use super::CatalogSource;
use crate::types::{AnalyticsError, CatalogProduct, CatalogResponse};
use std::path::PathBuf;
use tracing::{info, warn};

/// Reads `{"products": [...]}` from a JSON file
#[derive(Debug, Clone, PartialEq)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn try_fetch(&self) -> Result<Vec<CatalogProduct>, AnalyticsError> {
        let bytes = tokio::fs::read(&self.path).await?;
        let payload: CatalogResponse = serde_json::from_slice(&bytes)?;
        Ok(payload.products)
    }
}

impl CatalogSource for FileCatalog {
    async fn fetch_products(&self) -> Vec<CatalogProduct> {
        match self.try_fetch().await {
            Ok(products) => {
                info!(
                    "Loaded {} products from catalog file {}",
                    products.len(),
                    self.path.display()
                );
                products
            }
            Err(e) => {
                warn!(
                    "Catalog file {} unusable, continuing without enrichment: {}",
                    self.path.display(),
                    e
                );
                Vec::new()
            }
        }
    }
}
