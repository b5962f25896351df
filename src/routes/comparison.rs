use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};

use crate::{
    comparison::{ComparisonRequest, ComparisonTableData},
    dto::comparison::{SourceProductData, SourceQuery},
    error::AppResult,
    response::ApiResponse,
    services::comparison_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/manual", post(compare))
        .route("/source", get(lookup_source))
}

#[utoipa::path(
    post,
    path = "/api/comparison/manual",
    request_body = ComparisonRequest,
    responses(
        (status = 200, description = "Mock comparison table", body = ApiResponse<ComparisonTableData>),
        (status = 400, description = "Missing primary input or competitors"),
    ),
    tag = "Comparison"
)]
pub async fn compare(
    State(state): State<AppState>,
    Json(payload): Json<ComparisonRequest>,
) -> AppResult<Json<ApiResponse<ComparisonTableData>>> {
    let resp = comparison_service::compare(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/comparison/source",
    params(SourceQuery),
    responses(
        (status = 200, description = "Primary-retailer product for a SKU or URL", body = ApiResponse<SourceProductData>),
        (status = 400, description = "Neither SKU nor URL given, or the URL is not a primary-retailer page"),
    ),
    tag = "Comparison"
)]
pub async fn lookup_source(
    State(state): State<AppState>,
    Query(query): Query<SourceQuery>,
) -> AppResult<Json<ApiResponse<SourceProductData>>> {
    let resp = comparison_service::lookup_source(&state, query).await?;
    Ok(Json(resp))
}
