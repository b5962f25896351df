//! Submission of ad-hoc comparisons: the request the wizard sends, the
//! comparison table that comes back, and the clients that produce it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::retailers::RetailerRegistry;

mod http_client;
mod mock_engine;

pub use http_client::HttpComparisonClient;
pub use mock_engine::{MockComparisonEngine, source_product};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PrimaryInput {
    pub sku: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CompetitorInput {
    pub retailer: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ComparisonRequest {
    #[serde(rename = "thaiWatsadu")]
    pub primary: PrimaryInput,
    pub competitors: Vec<CompetitorInput>,
}

impl ComparisonRequest {
    pub fn validate(&self, registry: &RetailerRegistry) -> Result<(), ComparisonError> {
        if self.primary.sku.trim().is_empty() || self.primary.url.trim().is_empty() {
            return Err(ComparisonError::InvalidRequest(
                "Primary SKU and URL are required".to_string(),
            ));
        }
        if self.competitors.is_empty() {
            return Err(ComparisonError::InvalidRequest(
                "At least one competitor must be selected".to_string(),
            ));
        }
        let primary = registry.primary();
        if !primary.owns_url(&self.primary.url) {
            return Err(ComparisonError::InvalidRequest(format!(
                "Please enter a valid {} URL",
                primary.name
            )));
        }
        for competitor in &self.competitors {
            let info = match registry.resolve(&competitor.retailer) {
                Some(info) if !info.primary => info,
                _ => {
                    return Err(ComparisonError::InvalidRequest(format!(
                        "Unknown competitor retailer: {}",
                        competitor.retailer
                    )));
                }
            };
            if !info.owns_url(&competitor.url) {
                return Err(ComparisonError::InvalidRequest(format!(
                    "URL must be from {}",
                    info.name
                )));
            }
        }
        Ok(())
    }
}

/// One column of the comparison table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonTableProduct {
    pub sku: String,
    pub name: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub product_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_status: Option<String>,
    pub retailer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retailer_logo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ComparisonTableData {
    #[serde(rename = "thaiWatsadu")]
    pub primary: ComparisonTableProduct,
    pub competitors: Vec<ComparisonTableProduct>,
}

/// Primary-retailer product looked up by SKU before a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SourceProduct {
    pub sku: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_th: Option<String>,
    pub price: f64,
    pub image_url: String,
    pub product_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
}

#[derive(Debug, Error)]
pub enum ComparisonError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("comparison endpoint returned {0}")]
    Status(reqwest::StatusCode),

    #[error("comparison request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[async_trait]
pub trait ComparisonClient: Send + Sync {
    async fn compare(&self, request: &ComparisonRequest) -> Result<ComparisonTableData, ComparisonError>;
}
