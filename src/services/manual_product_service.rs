use crate::{
    audit,
    error::{AppError, AppResult},
    models::{ProductComparison, ProductId},
    response::{ApiResponse, Meta},
    state::AppState,
    stores::ProductPatch,
};

/// Manual ids only; anything else can never live in the manual store.
fn manual_id(raw_id: String) -> AppResult<ProductId> {
    match ProductId::parse(raw_id) {
        id @ ProductId::Manual(_) => Ok(id),
        ProductId::Catalog(_) => Err(AppError::NotFound),
    }
}

pub async fn list(state: &AppState) -> AppResult<ApiResponse<Vec<ProductComparison>>> {
    let products = state.manual_products.get_all().await;
    let total = products.len() as i64;
    Ok(ApiResponse::success(
        "Manual products",
        products,
        Some(Meta::new(1, total, total)),
    ))
}

pub async fn get(state: &AppState, raw_id: String) -> AppResult<ApiResponse<ProductComparison>> {
    let id = manual_id(raw_id)?;
    let product = state
        .manual_products
        .get_by_id(&id)
        .await
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Manual product", product, Some(Meta::empty())))
}

pub async fn update(
    state: &AppState,
    raw_id: String,
    patch: ProductPatch,
) -> AppResult<ApiResponse<ProductComparison>> {
    let id = manual_id(raw_id)?;
    let product = state
        .manual_products
        .update(&id, patch)
        .await
        .ok_or(AppError::NotFound)?;

    audit::record(
        state.pool(),
        "manual_product_update",
        Some("manual_products"),
        Some(serde_json::json!({ "product_id": id.as_str() })),
    )
    .await;

    Ok(ApiResponse::success("Manual product updated", product, Some(Meta::empty())))
}

pub async fn delete(state: &AppState, raw_id: String) -> AppResult<ApiResponse<serde_json::Value>> {
    let id = manual_id(raw_id)?;
    if !state.manual_products.delete(&id).await {
        return Err(AppError::NotFound);
    }

    audit::record(
        state.pool(),
        "manual_product_delete",
        Some("manual_products"),
        Some(serde_json::json!({ "product_id": id.as_str() })),
    )
    .await;

    Ok(ApiResponse::success(
        "Manual product deleted",
        serde_json::json!({ "id": id.as_str() }),
        Some(Meta::empty()),
    ))
}

pub async fn clear_all(state: &AppState) -> AppResult<ApiResponse<serde_json::Value>> {
    state.manual_products.clear_all().await;

    audit::record(state.pool(), "manual_product_clear", Some("manual_products"), None).await;

    Ok(ApiResponse::success(
        "Manual products cleared",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
