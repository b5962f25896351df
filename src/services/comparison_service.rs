use crate::{
    comparison::{ComparisonClient, ComparisonRequest, ComparisonTableData, source_product},
    dto::comparison::{SourceProductData, SourceQuery},
    error::AppResult,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// The mock comparison endpoint itself. Nothing is stored here; the wizard
/// stores results it receives.
pub async fn compare(
    state: &AppState,
    request: ComparisonRequest,
) -> AppResult<ApiResponse<ComparisonTableData>> {
    let data = state.mock_engine.compare(&request).await?;
    Ok(ApiResponse::success("Comparison", data, Some(Meta::empty())))
}

pub async fn lookup_source(
    state: &AppState,
    query: SourceQuery,
) -> AppResult<ApiResponse<SourceProductData>> {
    let product = source_product(&state.registry, query.sku.as_deref(), query.url.as_deref())?;
    Ok(ApiResponse::success(
        "Source product",
        SourceProductData { product },
        Some(Meta::empty()),
    ))
}
