use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use super::{
    ComparisonClient, ComparisonError, ComparisonRequest, ComparisonTableData,
    ComparisonTableProduct, SourceProduct,
};
use crate::retailers::{RetailerRegistry, extract_sku_from_url};

const BRANDS: [&str; 4] = ["SCG", "TOA", "MAKITA", "Generic"];
const CATEGORIES: [&str; 4] = ["Building Materials", "Paint", "Tools", "Fixtures"];

/// In-process comparison endpoint. Prices are random around a base price;
/// nothing is actually scraped.
#[derive(Debug, Clone)]
pub struct MockComparisonEngine {
    registry: Arc<RetailerRegistry>,
    delay: Duration,
}

impl MockComparisonEngine {
    pub fn new(registry: Arc<RetailerRegistry>, delay: Duration) -> Self {
        Self { registry, delay }
    }

    pub fn generate(&self, request: &ComparisonRequest) -> ComparisonTableData {
        let mut rng = rand::rng();
        let primary_sku = request.primary.sku.trim();

        let base_price = rng.random_range(1000.0..=5000.0_f64).round();
        let brand = BRANDS[rng.random_range(0..BRANDS.len())].to_string();
        let category = CATEGORIES[rng.random_range(0..CATEGORIES.len())].to_string();
        let name = format!("Product {primary_sku} - High Quality Item");
        let primary_retailer = self.registry.primary().id.as_str().to_ascii_uppercase();

        let primary = ComparisonTableProduct {
            sku: primary_sku.to_string(),
            name: name.clone(),
            price: base_price,
            discount_percentage: rng
                .random_bool(0.5)
                .then(|| rng.random_range(5.0..=20.0_f64).round()),
            unit_price: Some((base_price / rng.random_range(1.0..=6.0_f64)).round()),
            image_url: Some(format!("/mock/{}-product.jpg", primary_retailer.to_ascii_lowercase())),
            product_url: request.primary.url.trim().to_string(),
            brand: Some(brand.clone()),
            category: Some(category.clone()),
            stock_status: Some("In Stock".to_string()),
            retailer: primary_retailer,
            retailer_logo: None,
        };

        let competitors = request
            .competitors
            .iter()
            .map(|competitor| {
                let retailer = competitor.retailer.trim().to_ascii_uppercase();
                let price = (base_price * rng.random_range(0.8..=1.2_f64)).round();
                let sku_prefix: String = retailer.chars().take(3).collect();

                ComparisonTableProduct {
                    sku: format!("{sku_prefix}-{primary_sku}"),
                    name: name.clone(),
                    price,
                    discount_percentage: rng
                        .random_bool(0.4)
                        .then(|| rng.random_range(5.0..=15.0_f64).round()),
                    unit_price: Some((price / rng.random_range(1.0..=6.0_f64)).round()),
                    image_url: Some(format!("/mock/{}-product.jpg", retailer.to_ascii_lowercase())),
                    product_url: competitor.url.trim().to_string(),
                    brand: Some(brand.clone()),
                    category: Some(category.clone()),
                    stock_status: Some(
                        if rng.random_bool(0.9) { "In Stock" } else { "Limited Stock" }.to_string(),
                    ),
                    retailer,
                    retailer_logo: None,
                }
            })
            .collect();

        ComparisonTableData {
            primary,
            competitors,
        }
    }
}

#[async_trait]
impl ComparisonClient for MockComparisonEngine {
    async fn compare(&self, request: &ComparisonRequest) -> Result<ComparisonTableData, ComparisonError> {
        request.validate(&self.registry)?;

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let data = self.generate(request);
        tracing::debug!(
            sku = %data.primary.sku,
            competitors = data.competitors.len(),
            "mock comparison generated"
        );
        Ok(data)
    }
}

/// Looks up the primary-retailer product for a SKU, or for the SKU found in
/// `url` when no SKU is given. The URL must be one of the primary retailer's
/// pages. Unknown SKUs get a generic product.
pub fn source_product(
    registry: &RetailerRegistry,
    sku: Option<&str>,
    url: Option<&str>,
) -> Result<SourceProduct, ComparisonError> {
    let sku = match (sku.map(str::trim).filter(|s| !s.is_empty()), url) {
        (Some(sku), _) => sku.to_string(),
        (None, Some(url)) if !url.trim().is_empty() => {
            let primary = registry.primary();
            if !primary.owns_url(url) {
                return Err(ComparisonError::InvalidRequest(format!(
                    "Please enter a valid {} URL",
                    primary.name
                )));
            }
            extract_sku_from_url(url).ok_or_else(|| {
                ComparisonError::InvalidRequest("Could not extract SKU from URL".to_string())
            })?
        }
        _ => {
            return Err(ComparisonError::InvalidRequest(
                "SKU or URL parameter is required".to_string(),
            ));
        }
    };

    let known = |name: &str, name_th: &str, price: f64, category: &str, brand: &str| SourceProduct {
        sku: sku.clone(),
        name: name.to_string(),
        name_th: Some(name_th.to_string()),
        price,
        image_url: format!("/mock/product-{sku}.jpg"),
        product_url: format!("https://www.thaiwatsadu.com/th/product/{sku}"),
        category: Some(category.to_string()),
        brand: Some(brand.to_string()),
    };

    let product = match sku.as_str() {
        "1145439" => known(
            "SPC NARA CREAM 17.78X121.92X0.4 CM.",
            "กระเบื้อง SPC นารา ครีม",
            100.0,
            "กระเบื้อง",
            "XX",
        ),
        "2234561" => known(
            "TOA SUPER SHIELD WHITE 5L",
            "สีทาบ้าน TOA ซุปเปอร์ชิลด์ ขาว 5 ลิตร",
            850.0,
            "สีทาบ้าน",
            "TOA",
        ),
        "3345672" => known(
            "MAKITA HAMMER DRILL HP1641",
            "สว่านกระแทก มากีต้า HP1641",
            2450.0,
            "เครื่องมือช่าง",
            "MAKITA",
        ),
        _ => SourceProduct {
            name: format!("Product {sku}"),
            name_th: Some(format!("สินค้า {sku}")),
            price: rand::rng().random_range(100.0..=5100.0_f64).round(),
            image_url: "/mock/generic-product.jpg".to_string(),
            product_url: format!("https://www.thaiwatsadu.com/th/product/{sku}"),
            category: Some("General".to_string()),
            brand: Some("Generic".to_string()),
            sku: sku.clone(),
        },
    };

    Ok(product)
}
