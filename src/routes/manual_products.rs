use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{
    error::AppResult,
    models::ProductComparison,
    response::ApiResponse,
    services::manual_product_service,
    state::AppState,
    stores::ProductPatch,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).delete(clear_all))
        .route("/{id}", get(get_one).patch(update).delete(delete))
}

#[utoipa::path(
    get,
    path = "/api/manual-products",
    responses(
        (status = 200, description = "Saved comparisons, newest first", body = ApiResponse<Vec<ProductComparison>>),
    ),
    tag = "Manual Products"
)]
pub async fn list(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Vec<ProductComparison>>>> {
    let resp = manual_product_service::list(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/manual-products/{id}",
    params(
        ("id" = String, Path, description = "Manual product ID")
    ),
    responses(
        (status = 200, description = "Saved comparison", body = ApiResponse<ProductComparison>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Manual Products"
)]
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<ProductComparison>>> {
    let resp = manual_product_service::get(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/manual-products/{id}",
    params(
        ("id" = String, Path, description = "Manual product ID")
    ),
    request_body = ProductPatch,
    responses(
        (status = 200, description = "Updated comparison with derived fields recomputed", body = ApiResponse<ProductComparison>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Manual Products"
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ProductPatch>,
) -> AppResult<Json<ApiResponse<ProductComparison>>> {
    let resp = manual_product_service::update(&state, id, patch).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/manual-products/{id}",
    params(
        ("id" = String, Path, description = "Manual product ID")
    ),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not Found"),
    ),
    tag = "Manual Products"
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = manual_product_service::delete(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/manual-products",
    responses(
        (status = 200, description = "Every saved comparison removed"),
    ),
    tag = "Manual Products"
)]
pub async fn clear_all(State(state): State<AppState>) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = manual_product_service::clear_all(&state).await?;
    Ok(Json(resp))
}
