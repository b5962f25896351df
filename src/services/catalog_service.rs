use crate::{
    catalog::{CatalogSource, ProductListQuery, ProductListResponse},
    error::AppResult,
    models::ProductComparisonDetail,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_products(
    state: &AppState,
    query: ProductListQuery,
) -> AppResult<ApiResponse<ProductListResponse>> {
    let response = state.mock_catalog.list(&query).await?;
    let meta = Meta::new(
        response.pagination.page as i64,
        response.pagination.page_size as i64,
        response.pagination.total as i64,
    );
    Ok(ApiResponse::success("Catalog products", response, Some(meta)))
}

pub async fn get_product(state: &AppState, id: String) -> AppResult<ApiResponse<ProductComparisonDetail>> {
    let detail = state.mock_catalog.detail(&id).await?;
    Ok(ApiResponse::success("Catalog product", detail, Some(Meta::empty())))
}
