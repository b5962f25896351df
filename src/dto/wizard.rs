use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::comparison::PrimaryInput;
use crate::wizard::CompetitorEntry;

#[derive(Debug, Deserialize, ToSchema)]
pub struct WizardInputRequest {
    #[serde(alias = "thaiWatsadu")]
    pub primary: PrimaryInput,
    pub competitors: Vec<CompetitorEntry>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DroppedSession {
    pub id: uuid::Uuid,
}
