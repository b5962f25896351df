use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;
use utoipa::ToSchema;

use super::{read_json, remove_key, write_json};
use crate::comparison::{ComparisonTableData, ComparisonTableProduct};
use crate::models::{Currency, MANUAL_ID_PREFIX, ProductComparison, ProductId, RetailerId, RetailerPrice};
use crate::retailers::RetailerRegistry;
use crate::storage::KeyValueStore;

const DEFAULT_CATEGORY: &str = "Manual Entry";
const DEFAULT_BRAND: &str = "Unknown";
const DEFAULT_IMAGE: &str = "/placeholder-product.jpg";

/// Fields a caller may change on a stored manual product. Prices are merged
/// per retailer; derived fields are always recomputed afterwards.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub sku: Option<String>,
    pub name: Option<String>,
    pub name_th: Option<String>,
    pub description: Option<String>,
    pub description_th: Option<String>,
    pub category: Option<String>,
    pub category_th: Option<String>,
    pub brand: Option<String>,
    pub image_url: Option<String>,
    pub prices: Option<BTreeMap<RetailerId, RetailerPrice>>,
}

/// User-created comparison products, kept newest first under one collection key.
#[derive(Clone)]
pub struct ManualProductStore {
    storage: Arc<dyn KeyValueStore>,
    key: String,
    registry: Arc<RetailerRegistry>,
    write_lock: Arc<Mutex<()>>,
}

impl ManualProductStore {
    pub fn new(storage: Arc<dyn KeyValueStore>, namespace: &str, registry: Arc<RetailerRegistry>) -> Self {
        Self {
            storage,
            key: format!("{namespace}manual_products"),
            registry,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn is_manual_id(id: &str) -> bool {
        id.starts_with(MANUAL_ID_PREFIX)
    }

    /// Stores the comparison as a new product at the head of the collection
    /// and returns its id.
    pub async fn save(&self, data: &ComparisonTableData) -> ProductId {
        let _guard = self.write_lock.lock().await;
        let mut products = self.load().await;

        let now = Utc::now();
        let mut at = now;
        let mut id = ProductId::new_manual(&data.primary.sku, at);
        while products.iter().any(|p| p.id == id) {
            at += Duration::milliseconds(1);
            id = ProductId::new_manual(&data.primary.sku, at);
        }

        let product = transform_comparison(data, id.clone(), &self.registry, now);
        products.insert(0, product);

        if write_json(self.storage.as_ref(), &self.key, &products).await {
            tracing::info!(%id, sku = %data.primary.sku, "manual product saved");
        }
        id
    }

    pub async fn get_all(&self) -> Vec<ProductComparison> {
        self.load().await
    }

    pub async fn get_by_id(&self, id: &ProductId) -> Option<ProductComparison> {
        if !id.is_manual() {
            return None;
        }
        self.load().await.into_iter().find(|p| p.id == *id)
    }

    /// Returns whether a product was removed.
    pub async fn delete(&self, id: &ProductId) -> bool {
        let _guard = self.write_lock.lock().await;
        let mut products = self.load().await;
        let before = products.len();
        products.retain(|p| p.id != *id);
        if products.len() == before {
            return false;
        }
        write_json(self.storage.as_ref(), &self.key, &products).await
    }

    pub async fn update(&self, id: &ProductId, patch: ProductPatch) -> Option<ProductComparison> {
        let _guard = self.write_lock.lock().await;
        let mut products = self.load().await;
        let product = products.iter_mut().find(|p| p.id == *id)?;

        apply_patch(product, patch, &self.registry);
        product.refresh_derived(&self.registry);
        let updated = product.clone();

        write_json(self.storage.as_ref(), &self.key, &products).await;
        Some(updated)
    }

    pub async fn clear_all(&self) {
        let _guard = self.write_lock.lock().await;
        remove_key(self.storage.as_ref(), &self.key).await;
    }

    async fn load(&self) -> Vec<ProductComparison> {
        let products: Vec<ProductComparison> = read_json(self.storage.as_ref(), &self.key)
            .await
            .unwrap_or_default();

        products
            .into_iter()
            .filter(|p| {
                let manual = p.id.is_manual();
                if !manual {
                    tracing::warn!(id = %p.id, "dropping stored manual product without manual id");
                }
                manual
            })
            .map(|mut p| {
                p.refresh_derived(&self.registry);
                p
            })
            .collect()
    }
}

fn apply_patch(product: &mut ProductComparison, patch: ProductPatch, registry: &RetailerRegistry) {
    if let Some(sku) = patch.sku {
        product.sku = sku;
    }
    if let Some(name) = patch.name {
        product.name = name;
    }
    if let Some(category) = patch.category {
        product.category = category;
    }
    if let Some(brand) = patch.brand {
        product.brand = brand;
    }
    if let Some(image_url) = patch.image_url {
        product.image_url = image_url;
    }
    product.name_th = patch.name_th.or(product.name_th.take());
    product.description = patch.description.or(product.description.take());
    product.description_th = patch.description_th.or(product.description_th.take());
    product.category_th = patch.category_th.or(product.category_th.take());

    if let Some(prices) = patch.prices {
        for (retailer, mut price) in prices {
            if registry.get(&retailer).is_none() {
                tracing::warn!(product_id = %product.id, %retailer, "patch price for unknown retailer skipped");
                continue;
            }
            price.retailer = retailer.clone();
            product.prices.insert(retailer, price);
        }
    }
}

fn retailer_price(column: &ComparisonTableProduct, retailer: RetailerId, at: DateTime<Utc>) -> RetailerPrice {
    let discount = column.discount_percentage.filter(|d| *d > 0.0 && *d < 100.0);

    RetailerPrice {
        retailer,
        price: Some(column.price),
        original_price: discount.map(|d| (column.price / (1.0 - d / 100.0)).round()),
        currency: Currency::Thb,
        product_url: Some(column.product_url.clone()),
        last_updated: at,
        in_stock: column.stock_status.as_deref() == Some("In Stock"),
        promo_text: discount.map(|d| format!("ลด {d}%")),
    }
}

/// Builds a full product from a comparison table. Competitors naming an
/// unknown retailer, or the primary retailer, are skipped.
pub fn transform_comparison(
    data: &ComparisonTableData,
    id: ProductId,
    registry: &RetailerRegistry,
    at: DateTime<Utc>,
) -> ProductComparison {
    let primary_id = registry.primary().id.clone();
    let mut prices = BTreeMap::new();
    prices.insert(primary_id.clone(), retailer_price(&data.primary, primary_id.clone(), at));

    for competitor in &data.competitors {
        match registry.resolve(&competitor.retailer) {
            Some(info) if info.id != primary_id => {
                prices.insert(info.id.clone(), retailer_price(competitor, info.id.clone(), at));
            }
            _ => {
                tracing::warn!(
                    retailer = %competitor.retailer,
                    sku = %competitor.sku,
                    "skipping competitor with unknown retailer"
                );
            }
        }
    }

    let primary = &data.primary;
    let mut product = ProductComparison {
        id,
        sku: primary.sku.clone(),
        name: primary.name.clone(),
        name_th: None,
        description: None,
        description_th: None,
        category: primary
            .category
            .clone()
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        category_th: None,
        brand: primary
            .brand
            .clone()
            .unwrap_or_else(|| DEFAULT_BRAND.to_string()),
        image_url: primary
            .image_url
            .clone()
            .unwrap_or_else(|| DEFAULT_IMAGE.to_string()),
        prices,
        status: Default::default(),
        lowest_price: None,
        highest_price: None,
        price_difference_percent: None,
    };
    product.refresh_derived(registry);
    product
}
