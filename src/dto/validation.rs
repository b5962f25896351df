use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::ValidationStatus;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetValidationRequest {
    pub status: ValidationStatus,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductValidation {
    pub product_id: String,
    /// Judgments keyed by matched product id. Missing ids are pending.
    pub statuses: BTreeMap<String, ValidationStatus>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ValidationOverview {
    #[schema(value_type = BTreeMap<String, BTreeMap<String, ValidationStatus>>)]
    pub products: BTreeMap<String, BTreeMap<String, ValidationStatus>>,
}
