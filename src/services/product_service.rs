use chrono::Utc;

use crate::{
    audit,
    catalog::ProductListQuery,
    dto::products::{ExportFile, ManualEntryData, ManualEntryRequest},
    error::{AppError, AppResult},
    export::{export_filename, products_to_csv},
    models::{ManualComparisonData, ProductId},
    reconcile::{ProductDetailView, ProductListView},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_products(
    state: &AppState,
    query: ProductListQuery,
) -> AppResult<ApiResponse<ProductListView>> {
    let view = state.reconciler.list(&query).await?;
    let meta = Meta::new(
        view.pagination.page as i64,
        view.pagination.page_size as i64,
        view.pagination.total as i64,
    );
    Ok(ApiResponse::success("Products", view, Some(meta)))
}

/// Every product matching the query (not just one page) as CSV.
pub async fn export_products(state: &AppState, query: ProductListQuery) -> AppResult<ExportFile> {
    let merged = state.reconciler.merged(&query).await?;
    let content = products_to_csv(&merged.products, &state.registry);
    tracing::info!(rows = merged.products.len(), "products exported");

    Ok(ExportFile {
        filename: export_filename(Utc::now()),
        content,
    })
}

pub async fn get_product(state: &AppState, raw_id: String) -> AppResult<ApiResponse<ProductDetailView>> {
    let id = ProductId::parse(raw_id);
    let view = state
        .reconciler
        .detail(&id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success("Product", view, Some(Meta::empty())))
}

fn manual_entry_id(state: &AppState, raw_id: String) -> AppResult<ProductId> {
    let id = ProductId::parse(raw_id);
    if !state.manual_entries.accepts(&id) {
        return Err(AppError::BadRequest(format!("invalid product id {id}")));
    }
    Ok(id)
}

pub async fn get_manual_entry(state: &AppState, raw_id: String) -> AppResult<ApiResponse<ManualEntryData>> {
    let id = manual_entry_id(state, raw_id)?;
    let entry = state.manual_entries.get(&id).await;
    let data = ManualEntryData {
        product_id: id.to_string(),
        entry,
    };
    Ok(ApiResponse::success("Manual entry", data, Some(Meta::empty())))
}

pub async fn set_manual_entry(
    state: &AppState,
    raw_id: String,
    payload: ManualEntryRequest,
) -> AppResult<ApiResponse<ManualComparisonData>> {
    let id = manual_entry_id(state, raw_id)?;
    let data = payload.into_data(Utc::now());

    if !state.manual_entries.set(&id, &data).await {
        return Err(AppError::Internal(anyhow::anyhow!("manual entry could not be stored")));
    }

    audit::record(
        state.pool(),
        "manual_entry_set",
        Some("manual_entries"),
        Some(serde_json::json!({ "product_id": id.as_str(), "retailer": data.retailer })),
    )
    .await;

    Ok(ApiResponse::success("Manual entry saved", data, Some(Meta::empty())))
}

pub async fn clear_manual_entry(
    state: &AppState,
    raw_id: String,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let id = manual_entry_id(state, raw_id)?;
    state.manual_entries.clear(&id).await;

    audit::record(
        state.pool(),
        "manual_entry_clear",
        Some("manual_entries"),
        Some(serde_json::json!({ "product_id": id.as_str() })),
    )
    .await;

    Ok(ApiResponse::success(
        "Manual entry cleared",
        serde_json::json!({ "productId": id.as_str() }),
        Some(Meta::empty()),
    ))
}
