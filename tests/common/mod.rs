#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use pricehawk_api::{
    catalog::{CatalogError, CatalogSource, ProductListQuery, ProductListResponse},
    comparison::{
        ComparisonClient, ComparisonError, ComparisonRequest, ComparisonTableData, ComparisonTableProduct,
    },
    models::ProductComparisonDetail,
    state::AppState,
};
use tokio::sync::Notify;

pub const PRIMARY_URL: &str = "https://www.thaiwatsadu.com/th/product/1145439";
pub const HOMEPRO_URL: &str = "https://www.homepro.co.th/p/1145439";

/// In-memory state over the bundled catalog with an instant mock engine.
pub async fn state() -> AppState {
    AppState::in_memory().await.expect("in-memory state")
}

pub fn column(retailer: &str, sku: &str, name: &str, price: f64, url: &str) -> ComparisonTableProduct {
    ComparisonTableProduct {
        sku: sku.to_string(),
        name: name.to_string(),
        price,
        discount_percentage: None,
        unit_price: None,
        image_url: None,
        product_url: url.to_string(),
        brand: Some("SCG".to_string()),
        category: Some("Flooring".to_string()),
        stock_status: Some("In Stock".to_string()),
        retailer: retailer.to_string(),
        retailer_logo: None,
    }
}

/// Primary at `primary_price`, HomePro at `homepro_price`.
pub fn table(sku: &str, name: &str, primary_price: f64, homepro_price: f64) -> ComparisonTableData {
    ComparisonTableData {
        primary: column("THAI_WATSADU", sku, name, primary_price, PRIMARY_URL),
        competitors: vec![column("HOMEPRO", &format!("HOM-{sku}"), name, homepro_price, HOMEPRO_URL)],
    }
}

/// Catalog that is always down.
pub struct FailingCatalog;

#[async_trait]
impl CatalogSource for FailingCatalog {
    async fn list(&self, _query: &ProductListQuery) -> Result<ProductListResponse, CatalogError> {
        Err(CatalogError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE))
    }

    async fn detail(&self, _id: &str) -> Result<ProductComparisonDetail, CatalogError> {
        Err(CatalogError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE))
    }
}

/// Catalog serving a single fixed detail payload.
pub struct FixedDetailCatalog(pub ProductComparisonDetail);

#[async_trait]
impl CatalogSource for FixedDetailCatalog {
    async fn list(&self, _query: &ProductListQuery) -> Result<ProductListResponse, CatalogError> {
        Err(CatalogError::Status(reqwest::StatusCode::NOT_IMPLEMENTED))
    }

    async fn detail(&self, id: &str) -> Result<ProductComparisonDetail, CatalogError> {
        if self.0.product.id.as_str() == id {
            Ok(self.0.clone())
        } else {
            Err(CatalogError::NotFound(id.to_string()))
        }
    }
}

/// Comparison endpoint that always answers with a server error.
pub struct FailingComparison;

#[async_trait]
impl ComparisonClient for FailingComparison {
    async fn compare(&self, _request: &ComparisonRequest) -> Result<ComparisonTableData, ComparisonError> {
        Err(ComparisonError::Status(reqwest::StatusCode::INTERNAL_SERVER_ERROR))
    }
}

/// Comparison endpoint that signals when a request arrives and answers only
/// once released.
pub struct GatedComparison {
    pub started: Notify,
    pub release: Notify,
    pub response: ComparisonTableData,
}

impl GatedComparison {
    pub fn new(response: ComparisonTableData) -> Arc<Self> {
        Arc::new(Self {
            started: Notify::new(),
            release: Notify::new(),
            response,
        })
    }
}

#[async_trait]
impl ComparisonClient for GatedComparison {
    async fn compare(&self, _request: &ComparisonRequest) -> Result<ComparisonTableData, ComparisonError> {
        self.started.notify_one();
        self.release.notified().await;
        Ok(self.response.clone())
    }
}
