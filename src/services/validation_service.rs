use crate::{
    audit,
    dto::validation::{ProductValidation, ValidationOverview},
    error::AppResult,
    models::{ProductId, ValidationStatus},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_all(state: &AppState) -> AppResult<ApiResponse<ValidationOverview>> {
    let products = state
        .validation
        .get_all_statuses_across_products()
        .await
        .into_iter()
        .map(|(id, statuses)| (id.to_string(), statuses))
        .collect();
    Ok(ApiResponse::success(
        "Validation statuses",
        ValidationOverview { products },
        Some(Meta::empty()),
    ))
}

pub async fn get_for_product(state: &AppState, raw_id: String) -> AppResult<ApiResponse<ProductValidation>> {
    let id = ProductId::parse(raw_id);
    let statuses = state.validation.get_all_statuses(&id).await;
    Ok(ApiResponse::success(
        "Validation statuses",
        ProductValidation {
            product_id: id.to_string(),
            statuses,
        },
        Some(Meta::empty()),
    ))
}

pub async fn set_status(
    state: &AppState,
    raw_id: String,
    matched_product_id: String,
    status: ValidationStatus,
) -> AppResult<ApiResponse<ProductValidation>> {
    let id = ProductId::parse(raw_id);
    state
        .validation
        .set_status(&id, &matched_product_id, status)
        .await;

    audit::record(
        state.pool(),
        "validation_set",
        Some("validation"),
        Some(serde_json::json!({
            "product_id": id.as_str(),
            "matched_product_id": matched_product_id,
            "status": status,
        })),
    )
    .await;

    let statuses = state.validation.get_all_statuses(&id).await;
    Ok(ApiResponse::success(
        "Validation status saved",
        ProductValidation {
            product_id: id.to_string(),
            statuses,
        },
        Some(Meta::empty()),
    ))
}

pub async fn clear(state: &AppState, raw_id: String) -> AppResult<ApiResponse<ProductValidation>> {
    let id = ProductId::parse(raw_id);
    state.validation.clear_statuses(&id).await;

    audit::record(
        state.pool(),
        "validation_clear",
        Some("validation"),
        Some(serde_json::json!({ "product_id": id.as_str() })),
    )
    .await;

    Ok(ApiResponse::success(
        "Validation statuses cleared",
        ProductValidation {
            product_id: id.to_string(),
            statuses: Default::default(),
        },
        Some(Meta::empty()),
    ))
}
