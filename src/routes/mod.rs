use axum::Router;

use crate::state::AppState;

pub mod catalog;
pub mod comparison;
pub mod doc;
pub mod health;
pub mod manual_products;
pub mod products;
pub mod validation;
pub mod wizard;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/products", products::router())
        .nest("/catalog", catalog::router())
        .nest("/validation", validation::router())
        .nest("/manual-products", manual_products::router())
        .nest("/comparison", comparison::router())
        .nest("/wizard", wizard::router())
}
