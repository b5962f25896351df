use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};

use crate::{
    catalog::{ProductListQuery, ProductListResponse},
    error::AppResult,
    models::ProductComparisonDetail,
    response::ApiResponse,
    services::catalog_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/{id}", get(get_product))
}

#[utoipa::path(
    get,
    path = "/api/catalog/products",
    params(ProductListQuery),
    responses(
        (status = 200, description = "Bundled mock catalog", body = ApiResponse<ProductListResponse>),
    ),
    tag = "Catalog"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> AppResult<Json<ApiResponse<ProductListResponse>>> {
    let resp = catalog_service::list_products(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/catalog/products/{id}",
    params(
        ("id" = String, Path, description = "Catalog product ID")
    ),
    responses(
        (status = 200, description = "Catalog product detail", body = ApiResponse<ProductComparisonDetail>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Catalog"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<ProductComparisonDetail>>> {
    let resp = catalog_service::get_product(&state, id).await?;
    Ok(Json(resp))
}
