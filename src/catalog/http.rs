//! Catalog source backed by the product listing HTTP endpoint

use super::CatalogSource;
use crate::types::{AnalyticsError, CatalogProduct, CatalogResponse};
use reqwest::Client;
use std::time::Duration;
use tracing::{info, warn};

/// Fetches `GET {url}?limit={limit}` once per call, without retries
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: Client,
    url: String,
    limit: usize,
}

impl HttpCatalog {
    pub fn new(
        url: impl Into<String>,
        limit: usize,
        timeout: Duration,
    ) -> Result<Self, AnalyticsError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
            limit,
        })
    }

    /// Single request; any transport, status or payload problem is an error
    pub async fn try_fetch(&self) -> Result<Vec<CatalogProduct>, AnalyticsError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("limit", self.limit)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalyticsError::catalog(format!(
                "catalog request failed with status: {}",
                status
            )));
        }

        let payload: CatalogResponse = response.json().await?;
        Ok(payload.products)
    }
}

impl CatalogSource for HttpCatalog {
    async fn fetch_products(&self) -> Vec<CatalogProduct> {
        info!("Fetching product catalog from {}", self.url);
        match self.try_fetch().await {
            Ok(products) => {
                info!("Fetched {} products from catalog", products.len());
                products
            }
            Err(e) => {
                warn!("Catalog fetch failed, continuing without enrichment: {}", e);
                Vec::new()
            }
        }
    }
}
