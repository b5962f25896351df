use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
};

use crate::{
    catalog::ProductListQuery,
    dto::products::{ManualEntryData, ManualEntryRequest},
    error::AppResult,
    export::CSV_CONTENT_TYPE,
    models::ManualComparisonData,
    reconcile::{ProductDetailView, ProductListView},
    response::ApiResponse,
    services::product_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/export", get(export_products))
        .route("/{id}", get(get_product))
        .route(
            "/{id}/manual-entry",
            get(get_manual_entry)
                .put(set_manual_entry)
                .delete(clear_manual_entry),
        )
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(ProductListQuery),
    responses(
        (status = 200, description = "Catalog and manual products merged, filtered, sorted and paginated", body = ApiResponse<ProductListView>),
        (status = 502, description = "Catalog unavailable"),
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> AppResult<Json<ApiResponse<ProductListView>>> {
    let resp = product_service::list_products(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/export",
    params(ProductListQuery),
    responses(
        (status = 200, description = "CSV of every product matching the filters", content_type = "text/csv", body = String),
        (status = 502, description = "Catalog unavailable"),
    ),
    tag = "Products"
)]
pub async fn export_products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> AppResult<impl IntoResponse> {
    let file = product_service::export_products(&state, query).await?;
    let headers = [
        (header::CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file.filename),
        ),
    ];
    Ok((headers, file.content))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = String, Path, description = "Catalog id or manual_<timestamp>_<sku>")
    ),
    responses(
        (status = 200, description = "Product with price history and validated matches", body = ApiResponse<ProductDetailView>),
        (status = 404, description = "Not Found"),
        (status = 502, description = "Catalog unavailable"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<ProductDetailView>>> {
    let resp = product_service::get_product(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}/manual-entry",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Manually entered competitor data, if any", body = ApiResponse<ManualEntryData>),
        (status = 400, description = "Invalid product id"),
    ),
    tag = "Products"
)]
pub async fn get_manual_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<ManualEntryData>>> {
    let resp = product_service::get_manual_entry(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}/manual-entry",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    request_body = ManualEntryRequest,
    responses(
        (status = 200, description = "Manual entry stored", body = ApiResponse<ManualComparisonData>),
        (status = 400, description = "Invalid product id"),
    ),
    tag = "Products"
)]
pub async fn set_manual_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ManualEntryRequest>,
) -> AppResult<Json<ApiResponse<ManualComparisonData>>> {
    let resp = product_service::set_manual_entry(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}/manual-entry",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Manual entry cleared"),
        (status = 400, description = "Invalid product id"),
    ),
    tag = "Products"
)]
pub async fn clear_manual_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = product_service::clear_manual_entry(&state, id).await?;
    Ok(Json(resp))
}
