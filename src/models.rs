use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Prefix carried by every id minted for a user-created comparison product.
pub const MANUAL_ID_PREFIX: &str = "manual_";

/// Normalized retailer key (`HOMEPRO`, `homepro` and ` HomePro ` are the same id).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(from = "String", into = "String")]
pub struct RetailerId(String);

impl RetailerId {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_ascii_lowercase().replace(['-', ' '], "_"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RetailerId {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<&str> for RetailerId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<RetailerId> for String {
    fn from(id: RetailerId) -> Self {
        id.0
    }
}

impl fmt::Display for RetailerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a product id resolves: the remote catalog or the manual product store.
///
/// Parsed once at the boundary (path params, stored records) so nothing
/// downstream has to look at the prefix again.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProductId {
    Catalog(String),
    Manual(String),
}

impl ProductId {
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if raw.starts_with(MANUAL_ID_PREFIX) {
            ProductId::Manual(raw)
        } else {
            ProductId::Catalog(raw)
        }
    }

    pub fn new_manual(sku: &str, at: DateTime<Utc>) -> Self {
        ProductId::Manual(format!(
            "{MANUAL_ID_PREFIX}{}_{}",
            at.timestamp_millis(),
            sku.trim()
        ))
    }

    pub fn as_str(&self) -> &str {
        match self {
            ProductId::Catalog(id) | ProductId::Manual(id) => id,
        }
    }

    pub fn is_manual(&self) -> bool {
        matches!(self, ProductId::Manual(_))
    }
}

impl From<String> for ProductId {
    fn from(raw: String) -> Self {
        ProductId::parse(raw)
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        match id {
            ProductId::Catalog(id) | ProductId::Manual(id) => id,
        }
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Currency {
    #[default]
    #[serde(rename = "THB")]
    Thb,
}

/// Overall position of the primary retailer against its competitors.
///
/// Variant order matches the lexical order of the wire names, which is what
/// sorting by status compares.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum PriceStatus {
    Cheapest,
    Higher,
    Same,
    #[default]
    Unavailable,
}

impl PriceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceStatus::Cheapest => "cheapest",
            PriceStatus::Higher => "higher",
            PriceStatus::Same => "same",
            PriceStatus::Unavailable => "unavailable",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PriceStatus::Cheapest => "Cheapest",
            PriceStatus::Higher => "Higher",
            PriceStatus::Same => "Same",
            PriceStatus::Unavailable => "N/A",
        }
    }
}

/// Per-cell classification of one retailer price within a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PriceCategory {
    Cheapest,
    Same,
    Higher,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    #[default]
    Pending,
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RetailerPrice {
    pub retailer: RetailerId,
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    #[serde(default)]
    pub currency: Currency,
    pub product_url: Option<String>,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub in_stock: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_text: Option<String>,
}

impl RetailerPrice {
    pub fn unavailable(retailer: RetailerId, at: DateTime<Utc>) -> Self {
        Self {
            retailer,
            price: None,
            original_price: None,
            currency: Currency::Thb,
            product_url: None,
            last_updated: at,
            in_stock: false,
            promo_text: None,
        }
    }

    /// The price if it is usable for comparison (present, finite and > 0).
    pub fn valid_price(&self) -> Option<f64> {
        crate::pricing::valid(self.price)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductComparison {
    #[schema(value_type = String)]
    pub id: ProductId,
    pub sku: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_th: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_th: Option<String>,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_th: Option<String>,
    pub brand: String,
    #[serde(default)]
    pub image_url: String,
    pub prices: BTreeMap<RetailerId, RetailerPrice>,
    #[serde(default)]
    pub status: PriceStatus,
    #[serde(default)]
    pub lowest_price: Option<f64>,
    #[serde(default)]
    pub highest_price: Option<f64>,
    #[serde(default)]
    pub price_difference_percent: Option<f64>,
}

impl ProductComparison {
    pub fn price_of(&self, retailer: &RetailerId) -> Option<f64> {
        self.prices.get(retailer).and_then(RetailerPrice::valid_price)
    }

    /// Category label shown in lists and facets (Thai when available).
    pub fn display_category(&self) -> &str {
        self.category_th.as_deref().unwrap_or(&self.category)
    }

    pub fn display_name(&self) -> &str {
        self.name_th.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Exact,
    Similar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchedProduct {
    pub id: String,
    pub name: String,
    pub sku: String,
    #[serde(default)]
    pub image_url: String,
    pub price: f64,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_status: Option<ValidationStatus>,
    #[serde(default)]
    pub is_manual_entry: bool,
}

/// One retailer's matches for a product, possibly several candidate products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RetailerMatch {
    pub retailer: RetailerId,
    pub confidence: u8,
    pub match_type: MatchType,
    pub products: Vec<MatchedProduct>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LegacyProduct {
    pub name: String,
    pub sku: String,
    #[serde(default)]
    pub image_url: String,
    pub price: f64,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub in_stock: Option<bool>,
}

/// Older single-product-per-retailer match shape still returned by some catalogs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LegacyMatchedProduct {
    pub retailer: RetailerId,
    pub confidence: u8,
    pub match_type: MatchType,
    pub product: LegacyProduct,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum MatchedProductEntry {
    Multi(RetailerMatch),
    Legacy(LegacyMatchedProduct),
}

impl MatchedProductEntry {
    pub fn into_multi(self) -> RetailerMatch {
        match self {
            MatchedProductEntry::Multi(m) => m,
            MatchedProductEntry::Legacy(legacy) => {
                let product = legacy.product;
                RetailerMatch {
                    products: vec![MatchedProduct {
                        id: matched_product_id(&legacy.retailer, &product.sku),
                        name: product.name,
                        sku: product.sku,
                        image_url: product.image_url,
                        price: product.price,
                        url: product.url,
                        description: product.description,
                        brand: product.brand,
                        category: product.category,
                        validation_status: None,
                        is_manual_entry: false,
                    }],
                    retailer: legacy.retailer,
                    confidence: legacy.confidence,
                    match_type: legacy.match_type,
                }
            }
        }
    }
}

/// Id of the matched product a retailer contributes for a SKU: `<retailer>_<sku>`.
pub fn matched_product_id(retailer: &RetailerId, sku: &str) -> String {
    format!("{}_{}", retailer.as_str(), sku)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceHistoryPoint {
    pub date: DateTime<Utc>,
    pub prices: BTreeMap<RetailerId, Option<f64>>,
}

/// Catalog detail payload as served by a catalog source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductComparisonDetail {
    pub product: ProductComparison,
    #[serde(default)]
    pub price_history: Vec<PriceHistoryPoint>,
    #[serde(default)]
    pub matched_products: Vec<MatchedProductEntry>,
}

/// Single ad-hoc comparison result pinned to a product for the side panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManualComparisonData {
    pub retailer: String,
    pub product_name: String,
    pub sku: String,
    pub price: f64,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}
