mod common;

use pricehawk_api::{
    comparison::{ComparisonError, ComparisonRequest, CompetitorInput, PrimaryInput, source_product},
    error::AppError,
    retailers::{HOMEPRO, RetailerRegistry, extract_sku_from_url},
    models::RetailerId,
    services::comparison_service,
};

fn request(primary_url: &str, retailer: &str, competitor_url: &str) -> ComparisonRequest {
    ComparisonRequest {
        primary: PrimaryInput {
            sku: "1145439".to_string(),
            url: primary_url.to_string(),
        },
        competitors: vec![CompetitorInput {
            retailer: retailer.to_string(),
            url: competitor_url.to_string(),
        }],
    }
}

#[test]
fn sku_is_pulled_from_common_url_shapes() {
    let cases = [
        ("https://www.thaiwatsadu.com/th/product/1145439", Some("1145439")),
        ("https://www.homepro.co.th/p/HP-1", Some("HP-1")),
        ("https://www.dohome.co.th/search?sku=777", Some("777")),
        ("https://www.globalhouse.co.th/item?id=888", Some("888")),
        ("https://www.boonthavorn.com/items/XYZ_9", Some("XYZ_9")),
        ("https://www.boonthavorn.com/", None),
        ("not a url", None),
    ];
    for (url, expected) in cases {
        assert_eq!(extract_sku_from_url(url).as_deref(), expected, "{url}");
    }
}

#[test]
fn urls_belong_to_their_retailer_domains() {
    let registry = RetailerRegistry::default();
    let homepro = registry.get(&RetailerId::new(HOMEPRO)).expect("homepro");

    assert!(homepro.owns_url(common::HOMEPRO_URL));
    assert!(homepro.owns_url("https://m.homepro.co.th/p/1"));
    assert!(!homepro.owns_url("https://evilhomepro.co.th/p/1"));
    assert!(!homepro.owns_url(common::PRIMARY_URL));
    assert!(registry.primary().owns_url(common::PRIMARY_URL));
}

#[test]
fn source_lookup_knows_the_fixed_products() {
    let registry = RetailerRegistry::default();

    let paint = source_product(&registry, Some("2234561"), None).expect("known sku");
    assert_eq!(paint.name, "TOA SUPER SHIELD WHITE 5L");
    assert_eq!(paint.price, 850.0);

    let drill = source_product(&registry, None, Some("https://www.thaiwatsadu.com/th/product/3345672"))
        .expect("sku from url");
    assert_eq!(drill.sku, "3345672");
    assert_eq!(drill.brand.as_deref(), Some("MAKITA"));

    let generic = source_product(&registry, Some("999"), None).expect("generic sku");
    assert_eq!(generic.name, "Product 999");
    assert_eq!(generic.brand.as_deref(), Some("Generic"));
    assert!((100.0..=5100.0).contains(&generic.price));
}

#[test]
fn source_lookup_rejects_foreign_urls_and_empty_input() {
    let registry = RetailerRegistry::default();

    let foreign = source_product(&registry, None, Some(common::HOMEPRO_URL));
    assert!(matches!(
        foreign,
        Err(ComparisonError::InvalidRequest(msg)) if msg == "Please enter a valid Thai Watsadu URL"
    ));
    assert!(source_product(&registry, None, None).is_err());
    assert!(source_product(&registry, Some("  "), Some("")).is_err());
}

#[tokio::test]
async fn mock_endpoint_checks_url_domains() {
    let state = common::state().await;

    let ok = comparison_service::compare(&state, request(common::PRIMARY_URL, "HOMEPRO", common::HOMEPRO_URL))
        .await
        .expect("valid request");
    let data = ok.data.expect("table");
    assert_eq!(data.competitors.len(), 1);
    assert_eq!(data.competitors[0].product_url, common::HOMEPRO_URL);

    let wrong_primary =
        comparison_service::compare(&state, request(common::HOMEPRO_URL, "HOMEPRO", common::HOMEPRO_URL)).await;
    assert!(matches!(wrong_primary, Err(AppError::BadRequest(_))));

    let wrong_competitor = comparison_service::compare(
        &state,
        request(common::PRIMARY_URL, "HOMEPRO", "https://www.dohome.co.th/p/1145439"),
    )
    .await;
    assert!(matches!(wrong_competitor, Err(AppError::BadRequest(msg)) if msg == "URL must be from HomePro"));

    let unknown = comparison_service::compare(
        &state,
        request(common::PRIMARY_URL, "SOME_SHOP", "https://example.com/p/1"),
    )
    .await;
    assert!(matches!(unknown, Err(AppError::BadRequest(_))));
}

#[tokio::test]
async fn source_route_uses_the_registry() {
    let state = common::state().await;
    let query = pricehawk_api::dto::comparison::SourceQuery {
        sku: None,
        url: Some(common::PRIMARY_URL.to_string()),
    };

    let resp = comparison_service::lookup_source(&state, query).await.expect("lookup");
    assert_eq!(resp.data.expect("product").product.sku, "1145439");
}
