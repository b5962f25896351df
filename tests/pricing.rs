use pricehawk_api::{
    models::{PriceCategory, PriceStatus, ProductComparison, RetailerId},
    pricing::{overall_status, price_comparison_category, price_difference_percent},
    retailers::{DOHOME, HOMEPRO, MEGA_HOME, RetailerRegistry, THAI_WATSADU},
};
use serde_json::json;

fn product(prices: serde_json::Value) -> ProductComparison {
    let mut product: ProductComparison = serde_json::from_value(json!({
        "id": "prod-test",
        "sku": "100200",
        "name": "Test Product",
        "category": "Tools",
        "brand": "Generic",
        "prices": prices,
    }))
    .expect("product json");
    product.refresh_derived(&RetailerRegistry::default());
    product
}

fn price(retailer: &str, amount: Option<f64>) -> serde_json::Value {
    json!({
        "retailer": retailer,
        "price": amount,
        "productUrl": null,
        "lastUpdated": "2025-01-15T08:00:00Z",
    })
}

#[test]
fn overall_status_bands() {
    assert_eq!(overall_status(Some(100.0), &[Some(120.0), Some(130.0)]), PriceStatus::Cheapest);
    assert_eq!(overall_status(Some(150.0), &[Some(100.0), Some(200.0)]), PriceStatus::Same);
    assert_eq!(overall_status(Some(197.0), &[Some(100.0), Some(200.0)]), PriceStatus::Higher);
    assert_eq!(overall_status(Some(250.0), &[Some(100.0), None]), PriceStatus::Higher);
}

#[test]
fn overall_status_unavailable_without_usable_prices() {
    assert_eq!(overall_status(None, &[Some(100.0)]), PriceStatus::Unavailable);
    assert_eq!(overall_status(Some(0.0), &[Some(100.0)]), PriceStatus::Unavailable);
    assert_eq!(overall_status(Some(100.0), &[]), PriceStatus::Unavailable);
    assert_eq!(overall_status(Some(100.0), &[None, Some(-5.0), Some(f64::NAN)]), PriceStatus::Unavailable);
}

#[test]
fn cell_category_against_row_minimum() {
    let row = [100.0, 101.5, 150.0];
    assert_eq!(price_comparison_category(Some(100.0), &row), Some(PriceCategory::Cheapest));
    assert_eq!(price_comparison_category(Some(101.5), &row), Some(PriceCategory::Same));
    assert_eq!(price_comparison_category(Some(150.0), &row), Some(PriceCategory::Higher));
    assert_eq!(price_comparison_category(None, &row), None);
    assert_eq!(price_comparison_category(Some(0.0), &row), None);
    assert_eq!(price_comparison_category(Some(100.0), &[]), None);
}

#[test]
fn status_and_cell_use_different_anchors() {
    // Within 2% of the cheapest competitor counts as cheapest overall, while
    // the primary's own cell is only "same" because a competitor is lower.
    let row = [101.0, 100.0, 200.0];
    assert_eq!(overall_status(Some(101.0), &[Some(100.0), Some(200.0)]), PriceStatus::Cheapest);
    assert_eq!(price_comparison_category(Some(101.0), &row), Some(PriceCategory::Same));
}

#[test]
fn difference_percent_relative_to_lowest() {
    let diff = price_difference_percent(Some(110.0), Some(100.0)).expect("difference");
    assert!((diff - 10.0).abs() < 1e-9);
    assert_eq!(price_difference_percent(Some(100.0), Some(100.0)), None);
    assert_eq!(price_difference_percent(None, Some(100.0)), None);
}

#[test]
fn refresh_fills_every_retailer_and_derives_fields() {
    let product = product(json!({
        THAI_WATSADU: price(THAI_WATSADU, Some(120.0)),
        HOMEPRO: price(HOMEPRO, Some(100.0)),
        DOHOME: price(DOHOME, Some(0.0)),
    }));

    let registry = RetailerRegistry::default();
    assert_eq!(product.prices.len(), registry.all().len());
    assert_eq!(product.prices[&RetailerId::new(MEGA_HOME)].price, None);

    assert_eq!(product.status, PriceStatus::Higher);
    assert_eq!(product.lowest_price, Some(100.0));
    assert_eq!(product.highest_price, Some(120.0));
    let diff = product.price_difference_percent.expect("difference");
    assert!((diff - 20.0).abs() < 1e-9);

    let categories = product.price_categories();
    assert_eq!(categories[&RetailerId::new(HOMEPRO)], Some(PriceCategory::Cheapest));
    assert_eq!(categories[&RetailerId::new(THAI_WATSADU)], Some(PriceCategory::Higher));
    assert_eq!(categories[&RetailerId::new(DOHOME)], None);
}

#[test]
fn stored_derived_fields_are_not_trusted() {
    let raw = json!({
        "id": "prod-stale",
        "sku": "1",
        "name": "Stale",
        "category": "Tools",
        "brand": "Generic",
        "status": "higher",
        "lowestPrice": 1.0,
        "prices": {
            THAI_WATSADU: price(THAI_WATSADU, Some(90.0)),
            HOMEPRO: price(HOMEPRO, Some(100.0)),
        },
    });
    let mut product: ProductComparison = serde_json::from_value(raw).expect("product json");
    product.refresh_derived(&RetailerRegistry::default());

    assert_eq!(product.status, PriceStatus::Cheapest);
    assert_eq!(product.lowest_price, Some(90.0));
    assert_eq!(product.price_difference_percent, None);
}
