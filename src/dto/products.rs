use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::ManualComparisonData;

/// Body of `PUT /api/products/{id}/manual-entry`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManualEntryRequest {
    pub retailer: String,
    pub product_name: String,
    pub sku: String,
    pub price: f64,
    pub url: String,
    pub image_url: Option<String>,
}

impl ManualEntryRequest {
    pub fn into_data(self, created_at: DateTime<Utc>) -> ManualComparisonData {
        ManualComparisonData {
            retailer: self.retailer,
            product_name: self.product_name,
            sku: self.sku,
            price: self.price,
            url: self.url,
            image_url: self.image_url,
            created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManualEntryData {
    pub product_id: String,
    pub entry: Option<ManualComparisonData>,
}

/// Rendered CSV download.
#[derive(Debug)]
pub struct ExportFile {
    pub filename: String,
    pub content: String,
}
