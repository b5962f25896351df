use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::comparison::SourceProduct;

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SourceQuery {
    /// Primary-retailer SKU.
    pub sku: Option<String>,
    /// Product page URL, used when no SKU is given.
    pub url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SourceProductData {
    pub product: SourceProduct,
}
