mod common;

use std::sync::Arc;

use pricehawk_api::{
    catalog::{ProductListQuery, SortBy, SortOrder},
    error::AppError,
    models::{PriceCategory, PriceStatus, RetailerId, ValidationStatus, matched_product_id},
    retailers::{HOMEPRO, THAI_WATSADU},
    services::product_service,
};

#[tokio::test]
async fn bundled_catalog_summary() {
    let state = common::state().await;

    let view = state
        .reconciler
        .list(&ProductListQuery::default())
        .await
        .expect("list");

    assert_eq!(view.summary.total_products, 10);
    assert_eq!(view.summary.cheapest_count, 3);
    assert_eq!(view.summary.higher_count, 3);
    assert_eq!(view.summary.same_count, 2);
    assert_eq!(view.summary.unavailable_count, 2);
    assert_eq!(view.pagination.total, 10);
    assert_eq!(view.pagination.total_pages, 1);
    assert!(view.products.iter().all(|row| !row.is_manual));
}

#[tokio::test]
async fn summary_counts_both_sources_regardless_of_filters() {
    let state = common::state().await;
    state
        .manual_products
        .save(&common::table("1145439", "SPC Nara Cream", 100.0, 120.0))
        .await;

    let query = ProductListQuery {
        search: Some("bosch".to_string()),
        ..ProductListQuery::default()
    };
    let view = state.reconciler.list(&query).await.expect("list");

    assert_eq!(view.pagination.total, 1);
    assert_eq!(view.products[0].product.brand, "Bosch");
    assert_eq!(view.summary.total_products, 11);
    assert_eq!(view.summary.cheapest_count, 4);

    let flooring = view
        .filters
        .categories
        .iter()
        .find(|option| option.value == "Flooring")
        .expect("manual category facet");
    assert_eq!(flooring.count, 1);
}

#[tokio::test]
async fn manual_products_win_ties_and_are_flagged() {
    let state = common::state().await;
    let id = state
        .manual_products
        .save(&common::table("9999", "Bosch GSB 550 Impact Drill", 1000.0, 1100.0))
        .await;

    let query = ProductListQuery {
        search: Some("gsb 550".to_string()),
        sort_by: Some(SortBy::Name),
        ..ProductListQuery::default()
    };
    let view = state.reconciler.list(&query).await.expect("list");

    assert_eq!(view.products.len(), 2);
    assert_eq!(view.products[0].product.id, id);
    assert!(view.products[0].is_manual);
    assert!(!view.products[1].is_manual);
}

#[tokio::test]
async fn identical_manual_products_keep_a_stable_order() {
    let state = common::state().await;
    let older = state
        .manual_products
        .save(&common::table("A-1", "Twin Product", 100.0, 120.0))
        .await;
    let newer = state
        .manual_products
        .save(&common::table("A-2", "Twin Product", 100.0, 120.0))
        .await;

    let query = ProductListQuery {
        search: Some("twin".to_string()),
        sort_by: Some(SortBy::Name),
        sort_order: Some(SortOrder::Asc),
        ..ProductListQuery::default()
    };
    for _ in 0..3 {
        let view = state.reconciler.list(&query).await.expect("list");
        let ids: Vec<_> = view.products.iter().map(|row| row.product.id.clone()).collect();
        assert_eq!(ids, vec![newer.clone(), older.clone()]);
    }
}

#[tokio::test]
async fn pagination_spans_the_merged_list() {
    let state = common::state().await;
    for sku in ["M-1", "M-2", "M-3"] {
        state
            .manual_products
            .save(&common::table(sku, &format!("Manual {sku}"), 100.0, 120.0))
            .await;
    }

    let query = ProductListQuery {
        page: Some(3),
        page_size: Some(5),
        ..ProductListQuery::default()
    };
    let view = state.reconciler.list(&query).await.expect("list");

    assert_eq!(view.pagination.total, 13);
    assert_eq!(view.pagination.total_pages, 3);
    assert_eq!(view.products.len(), 3);
}

#[tokio::test]
async fn status_filter_and_price_sort() {
    let state = common::state().await;
    let query = ProductListQuery {
        status: Some(PriceStatus::Higher),
        sort_by: Some(SortBy::Price),
        sort_order: Some(SortOrder::Desc),
        ..ProductListQuery::default()
    };
    let view = state.reconciler.list(&query).await.expect("list");

    let primary = RetailerId::new(THAI_WATSADU);
    let prices: Vec<f64> = view
        .products
        .iter()
        .map(|row| row.product.price_of(&primary).unwrap_or(0.0))
        .collect();
    assert_eq!(prices, vec![4990.0, 1290.0, 265.0]);
    assert!(view.products.iter().all(|row| row.product.status == PriceStatus::Higher));
}

#[tokio::test]
async fn rows_carry_cell_categories_and_hidden_flags() {
    let state = common::state().await;
    let id = state
        .manual_products
        .save(&common::table("1145439", "SPC Nara Cream", 100.0, 120.0))
        .await;
    let homepro = RetailerId::new(HOMEPRO);
    state
        .validation
        .set_status(&id, &matched_product_id(&homepro, "1145439"), ValidationStatus::Incorrect)
        .await;

    let query = ProductListQuery {
        search: Some("nara".to_string()),
        ..ProductListQuery::default()
    };
    let view = state.reconciler.list(&query).await.expect("list");
    let row = &view.products[0];

    let primary_cell = &row.cells[&RetailerId::new(THAI_WATSADU)];
    assert_eq!(primary_cell.category, Some(PriceCategory::Cheapest));
    assert!(!primary_cell.hidden);

    let homepro_cell = &row.cells[&homepro];
    assert_eq!(homepro_cell.category, Some(PriceCategory::Higher));
    assert!(homepro_cell.hidden);
}

#[tokio::test]
async fn failing_catalog_fails_the_list() {
    let state = common::state().await.with_catalog(Arc::new(common::FailingCatalog));
    state
        .manual_products
        .save(&common::table("1145439", "SPC Nara Cream", 100.0, 120.0))
        .await;

    assert!(state.reconciler.list(&ProductListQuery::default()).await.is_err());

    let err = product_service::list_products(&state, ProductListQuery::default())
        .await
        .expect_err("catalog failure");
    assert!(matches!(err, AppError::Upstream(_)));
}

#[tokio::test]
async fn export_covers_every_matching_product() {
    let state = common::state().await;
    state
        .manual_products
        .save(&common::table("1145439", "SPC Nara Cream", 100.0, 120.0))
        .await;

    let query = ProductListQuery {
        page_size: Some(2),
        ..ProductListQuery::default()
    };
    let file = product_service::export_products(&state, query)
        .await
        .expect("export");

    assert!(file.filename.starts_with("price-comparison_"));
    assert!(file.filename.ends_with(".csv"));
    // header plus eleven rows
    assert_eq!(file.content.matches("\r\n").count(), 12);
}
