use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::wizard::{DroppedSession, WizardInputRequest},
    error::AppResult,
    response::ApiResponse,
    services::wizard_service,
    state::AppState,
    wizard::{CompetitorEntry, WizardView},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create))
        .route("/{id}", get(get_session).delete(drop_session))
        .route("/{id}/input", put(set_input))
        .route("/{id}/competitors", post(add_competitor))
        .route("/{id}/competitors/{entry_id}", delete(remove_competitor))
        .route("/{id}/review", post(review))
        .route("/{id}/edit", post(edit))
        .route("/{id}/confirm", post(confirm))
        .route("/{id}/restart", post(restart))
}

#[utoipa::path(
    post,
    path = "/api/wizard",
    responses(
        (status = 200, description = "New session in the input stage", body = ApiResponse<WizardView>),
    ),
    tag = "Wizard"
)]
pub async fn create(State(state): State<AppState>) -> AppResult<Json<ApiResponse<WizardView>>> {
    let resp = wizard_service::create(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/wizard/{id}",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Current session state", body = ApiResponse<WizardView>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Wizard"
)]
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<WizardView>>> {
    let resp = wizard_service::get(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/wizard/{id}",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session dropped", body = ApiResponse<DroppedSession>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Wizard"
)]
pub async fn drop_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<DroppedSession>>> {
    let resp = wizard_service::drop_session(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/wizard/{id}/input",
    params(("id" = Uuid, Path, description = "Session ID")),
    request_body = WizardInputRequest,
    responses(
        (status = 200, description = "Form replaced", body = ApiResponse<WizardView>),
        (status = 400, description = "No entries or more than five"),
        (status = 409, description = "Not in the input stage"),
    ),
    tag = "Wizard"
)]
pub async fn set_input(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<WizardInputRequest>,
) -> AppResult<Json<ApiResponse<WizardView>>> {
    let resp = wizard_service::set_input(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/wizard/{id}/competitors",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Empty competitor entry added", body = ApiResponse<CompetitorEntry>),
        (status = 400, description = "Already five entries"),
        (status = 409, description = "Not in the input stage"),
    ),
    tag = "Wizard"
)]
pub async fn add_competitor(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CompetitorEntry>>> {
    let resp = wizard_service::add_competitor(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/wizard/{id}/competitors/{entry_id}",
    params(
        ("id" = Uuid, Path, description = "Session ID"),
        ("entry_id" = String, Path, description = "Competitor entry ID")
    ),
    responses(
        (status = 200, description = "Entry removed", body = ApiResponse<WizardView>),
        (status = 400, description = "Last remaining entry"),
        (status = 404, description = "Not Found"),
    ),
    tag = "Wizard"
)]
pub async fn remove_competitor(
    State(state): State<AppState>,
    Path((id, entry_id)): Path<(Uuid, String)>,
) -> AppResult<Json<ApiResponse<WizardView>>> {
    let resp = wizard_service::remove_competitor(&state, id, entry_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/wizard/{id}/review",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Review stage, or input stage with field errors", body = ApiResponse<WizardView>),
        (status = 409, description = "Not in the input stage"),
    ),
    tag = "Wizard"
)]
pub async fn review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<WizardView>>> {
    let resp = wizard_service::review(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/wizard/{id}/edit",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Back in the input stage", body = ApiResponse<WizardView>),
        (status = 409, description = "Not in the review stage"),
    ),
    tag = "Wizard"
)]
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<WizardView>>> {
    let resp = wizard_service::edit(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/wizard/{id}/confirm",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Results stage, or review stage with a general error", body = ApiResponse<WizardView>),
        (status = 409, description = "Not in the review stage or already submitting"),
    ),
    tag = "Wizard"
)]
pub async fn confirm(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<WizardView>>> {
    let resp = wizard_service::confirm(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/wizard/{id}/restart",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Empty form", body = ApiResponse<WizardView>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Wizard"
)]
pub async fn restart(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<WizardView>>> {
    let resp = wizard_service::restart(&state, id).await?;
    Ok(Json(resp))
}
