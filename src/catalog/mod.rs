//! Read-only product catalog: the list/detail contract, the bundled mock
//! catalog and a client for a remote one.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::ProductComparisonDetail;

mod http_catalog;
mod query;
mod static_catalog;

pub use http_catalog::HttpCatalog;
pub use query::{
    DEFAULT_PAGE_SIZE, FilterOption, Facets, MAX_PAGE_SIZE, Pagination, ProductListQuery,
    ProductListResponse, SortBy, SortOrder, Summary, list_products, page_of, price_map,
    sort_products,
};
pub use static_catalog::StaticCatalog;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("product {0} not found in catalog")]
    NotFound(String),

    #[error("catalog returned {0}")]
    Status(reqwest::StatusCode),

    #[error("catalog request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid catalog data: {0}")]
    Data(#[from] serde_json::Error),

    #[error("catalog file unreadable: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn list(&self, query: &ProductListQuery) -> Result<ProductListResponse, CatalogError>;

    async fn detail(&self, id: &str) -> Result<ProductComparisonDetail, CatalogError>;
}
