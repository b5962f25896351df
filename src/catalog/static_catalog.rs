use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::Rng;
use serde::Deserialize;

use super::{CatalogError, CatalogSource, ProductListQuery, ProductListResponse, list_products, price_map};
use crate::models::{
    MatchType, MatchedProduct, MatchedProductEntry, PriceHistoryPoint, ProductComparison,
    ProductComparisonDetail, RetailerMatch, matched_product_id,
};
use crate::retailers::RetailerRegistry;

const BUNDLED_CATALOG: &str = include_str!("../../data/catalog.json");
const HISTORY_DAYS: i64 = 7;

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Wrapped { products: Vec<ProductComparison> },
    Bare(Vec<ProductComparison>),
}

/// Mock catalog held in memory. Derived fields are recomputed on load so the
/// file only needs ids, attributes and prices.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    products: Vec<ProductComparison>,
    registry: Arc<RetailerRegistry>,
}

impl StaticCatalog {
    pub fn new(mut products: Vec<ProductComparison>, registry: Arc<RetailerRegistry>) -> Self {
        for product in &mut products {
            product.refresh_derived(&registry);
        }
        Self { products, registry }
    }

    pub fn from_json(raw: &str, registry: Arc<RetailerRegistry>) -> Result<Self, CatalogError> {
        let products = match serde_json::from_str::<CatalogFile>(raw)? {
            CatalogFile::Wrapped { products } | CatalogFile::Bare(products) => products,
        };
        Ok(Self::new(products, registry))
    }

    pub fn bundled(registry: Arc<RetailerRegistry>) -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_CATALOG, registry)
    }

    pub async fn from_path(path: impl AsRef<Path>, registry: Arc<RetailerRegistry>) -> Result<Self, CatalogError> {
        let raw = tokio::fs::read_to_string(path.as_ref()).await?;
        Self::from_json(&raw, registry)
    }

    pub fn products(&self) -> &[ProductComparison] {
        &self.products
    }

    /// Competitors with a price, first two as exact matches and the rest as
    /// similar ones with lower confidence.
    fn matched_products(&self, product: &ProductComparison) -> Vec<MatchedProductEntry> {
        let mut rng = rand::rng();
        self.registry
            .competitors()
            .filter_map(|info| {
                let price = product.prices.get(&info.id)?;
                Some((info, price.valid_price()?, price))
            })
            .enumerate()
            .map(|(index, (info, amount, price))| {
                let exact = index < 2;
                let confidence = if exact {
                    rng.random_range(95..=100)
                } else {
                    rng.random_range(80..=94)
                };
                MatchedProductEntry::Multi(RetailerMatch {
                    retailer: info.id.clone(),
                    confidence,
                    match_type: if exact { MatchType::Exact } else { MatchType::Similar },
                    products: vec![MatchedProduct {
                        id: matched_product_id(&info.id, &product.sku),
                        name: product.name.clone(),
                        sku: product.sku.clone(),
                        image_url: product.image_url.clone(),
                        price: amount,
                        url: price.product_url.clone().unwrap_or_default(),
                        description: product.description.clone(),
                        brand: Some(product.brand.clone()),
                        category: Some(product.category.clone()),
                        validation_status: None,
                        is_manual_entry: false,
                    }],
                })
            })
            .collect()
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn list(&self, query: &ProductListQuery) -> Result<ProductListResponse, CatalogError> {
        Ok(list_products(&self.products, query, &self.registry.primary().id))
    }

    async fn detail(&self, id: &str) -> Result<ProductComparisonDetail, CatalogError> {
        let product = self
            .products
            .iter()
            .find(|p| p.id.as_str() == id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;

        let now = Utc::now();
        let prices = price_map(&product);
        let price_history = (0..HISTORY_DAYS)
            .map(|i| PriceHistoryPoint {
                date: now - Duration::days(HISTORY_DAYS - 1 - i),
                prices: prices.clone(),
            })
            .collect();

        Ok(ProductComparisonDetail {
            matched_products: self.matched_products(&product),
            product,
            price_history,
        })
    }
}
