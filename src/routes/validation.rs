use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};

use crate::{
    dto::validation::{ProductValidation, SetValidationRequest, ValidationOverview},
    error::AppResult,
    response::ApiResponse,
    services::validation_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_all))
        .route("/{product_id}", get(get_for_product).delete(clear))
        .route("/{product_id}/{matched_id}", put(set_status))
}

#[utoipa::path(
    get,
    path = "/api/validation",
    responses(
        (status = 200, description = "Judgments of every product", body = ApiResponse<ValidationOverview>),
    ),
    tag = "Validation"
)]
pub async fn list_all(State(state): State<AppState>) -> AppResult<Json<ApiResponse<ValidationOverview>>> {
    let resp = validation_service::list_all(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/validation/{product_id}",
    params(
        ("product_id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Judgments of one product", body = ApiResponse<ProductValidation>),
    ),
    tag = "Validation"
)]
pub async fn get_for_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> AppResult<Json<ApiResponse<ProductValidation>>> {
    let resp = validation_service::get_for_product(&state, product_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/validation/{product_id}/{matched_id}",
    params(
        ("product_id" = String, Path, description = "Product ID"),
        ("matched_id" = String, Path, description = "Matched product ID, <retailer>_<sku>")
    ),
    request_body = SetValidationRequest,
    responses(
        (status = 200, description = "Judgment stored", body = ApiResponse<ProductValidation>),
        (status = 422, description = "Unknown status"),
    ),
    tag = "Validation"
)]
pub async fn set_status(
    State(state): State<AppState>,
    Path((product_id, matched_id)): Path<(String, String)>,
    Json(payload): Json<SetValidationRequest>,
) -> AppResult<Json<ApiResponse<ProductValidation>>> {
    let resp = validation_service::set_status(&state, product_id, matched_id, payload.status).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/validation/{product_id}",
    params(
        ("product_id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Judgments removed", body = ApiResponse<ProductValidation>),
    ),
    tag = "Validation"
)]
pub async fn clear(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> AppResult<Json<ApiResponse<ProductValidation>>> {
    let resp = validation_service::clear(&state, product_id).await?;
    Ok(Json(resp))
}
