//! Product catalog sources
//!
//! A catalog source yields the product list used to build the enrichment
//! lookup. Sources are best effort: any failure is logged and collapses to an
//! empty list, so the pipeline runs to completion with every record unmatched.

use crate::cli::CatalogKind;
use crate::types::{AnalyticsError, CatalogProduct};
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

pub mod file;
pub mod http;

pub use file::FileCatalog;
pub use http::HttpCatalog;

pub const DEFAULT_CATALOG_URL: &str = "https://dummyjson.com/products";
pub const DEFAULT_CATALOG_LIMIT: usize = 100;
pub const DEFAULT_CATALOG_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the enrichment products come from
pub trait CatalogSource: Send + Sync {
    /// Fetch the product list, empty on any failure
    fn fetch_products(&self) -> impl Future<Output = Vec<CatalogProduct>> + Send;
}

/// Settings shared by the catalog sources
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogConfig {
    pub url: String,
    pub file: Option<PathBuf>,
    pub limit: usize,
    pub timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_CATALOG_URL.to_string(),
            file: None,
            limit: DEFAULT_CATALOG_LIMIT,
            timeout: DEFAULT_CATALOG_TIMEOUT,
        }
    }
}

impl CatalogConfig {
    /// Build a config, replacing a zero limit or timeout with the default
    pub fn new(
        url: impl Into<String>,
        file: Option<PathBuf>,
        limit: usize,
        timeout: Duration,
    ) -> Self {
        let default = Self::default();

        let limit = if limit == 0 {
            tracing::warn!(
                "Invalid catalog limit ({}), using default ({})",
                limit,
                default.limit
            );
            default.limit
        } else {
            limit
        };

        let timeout = if timeout.is_zero() {
            tracing::warn!(
                "Invalid catalog timeout ({:?}), using default ({:?})",
                timeout,
                default.timeout
            );
            default.timeout
        } else {
            timeout
        };

        Self {
            url: url.into(),
            file,
            limit,
            timeout,
        }
    }
}

/// The catalog source selected for a run
#[derive(Debug, Clone)]
pub enum Catalog {
    Http(HttpCatalog),
    File(FileCatalog),
    Disabled,
}

impl CatalogSource for Catalog {
    async fn fetch_products(&self) -> Vec<CatalogProduct> {
        match self {
            Catalog::Http(source) => source.fetch_products().await,
            Catalog::File(source) => source.fetch_products().await,
            Catalog::Disabled => {
                tracing::info!("Catalog enrichment disabled");
                Vec::new()
            }
        }
    }
}

/// Create the catalog source for the selected kind
///
/// Fails only on configuration problems: a file source without a path, or an
/// HTTP client that cannot be built.
pub fn create_catalog(
    kind: CatalogKind,
    config: &CatalogConfig,
) -> Result<Catalog, AnalyticsError> {
    match kind {
        CatalogKind::Http => Ok(Catalog::Http(HttpCatalog::new(
            config.url.clone(),
            config.limit,
            config.timeout,
        )?)),
        CatalogKind::File => {
            let path = config.file.clone().ok_or_else(|| {
                AnalyticsError::invalid_config("--catalog file requires --catalog-file")
            })?;
            Ok(Catalog::File(FileCatalog::new(path)))
        }
        CatalogKind::None => Ok(Catalog::Disabled),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::valid(50, Duration::from_secs(3), 50, Duration::from_secs(3))]
    #[case::zero_limit(0, Duration::from_secs(3), DEFAULT_CATALOG_LIMIT, Duration::from_secs(3))]
    #[case::zero_timeout(50, Duration::ZERO, 50, DEFAULT_CATALOG_TIMEOUT)]
    fn test_catalog_config_zero_values_fallback(
        #[case] limit: usize,
        #[case] timeout: Duration,
        #[case] expected_limit: usize,
        #[case] expected_timeout: Duration,
    ) {
        let config = CatalogConfig::new(DEFAULT_CATALOG_URL, None, limit, timeout);
        assert_eq!(config.limit, expected_limit);
        assert_eq!(config.timeout, expected_timeout);
    }

    #[test]
    fn test_create_catalog_kinds() {
        let mut config = CatalogConfig::default();
        assert!(matches!(create_catalog(CatalogKind::Http, &config), Ok(Catalog::Http(_))));
        assert!(matches!(create_catalog(CatalogKind::None, &config), Ok(Catalog::Disabled)));

        config.file = Some(PathBuf::from("catalog.json"));
        assert!(matches!(create_catalog(CatalogKind::File, &config), Ok(Catalog::File(_))));
    }

    #[test]
    fn test_file_catalog_requires_path() {
        let result = create_catalog(CatalogKind::File, &CatalogConfig::default());
        assert!(matches!(result, Err(AnalyticsError::InvalidConfig { .. })));
    }

    #[tokio::test]
    async fn test_disabled_catalog_is_empty() {
        assert!(Catalog::Disabled.fetch_products().await.is_empty());
    }
}
