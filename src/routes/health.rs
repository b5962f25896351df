use axum::{Json, extract::State};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Liveness plus which backends this instance is wired to.
#[derive(Serialize, ToSchema)]
pub struct HealthData {
    pub status: String,
    /// `postgres` or `memory`
    pub storage: String,
    /// `remote` or `bundled`
    pub catalog: String,
    /// `remote` or `mock`
    pub comparison: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "OK", body = ApiResponse<HealthData>),
    ),
    tag = "Health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<HealthData>> {
    let config = &state.config;
    let data = HealthData {
        status: "ok".to_string(),
        storage: if state.pool.is_some() { "postgres" } else { "memory" }.to_string(),
        catalog: if config.catalog_url.is_some() { "remote" } else { "bundled" }.to_string(),
        comparison: if config.comparison_url.is_some() { "remote" } else { "mock" }.to_string(),
    };

    Json(ApiResponse::success("Health check", data, Some(Meta::empty())))
}
