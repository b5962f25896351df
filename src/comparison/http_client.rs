use std::time::Duration;

use async_trait::async_trait;

use super::{ComparisonClient, ComparisonError, ComparisonRequest, ComparisonTableData};
use crate::response::Payload;

/// Comparison endpoint reached over HTTP. Any non-2xx answer is a failure.
#[derive(Debug, Clone)]
pub struct HttpComparisonClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpComparisonClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ComparisonError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl ComparisonClient for HttpComparisonClient {
    async fn compare(&self, request: &ComparisonRequest) -> Result<ComparisonTableData, ComparisonError> {
        let response = self.client.post(&self.endpoint).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(endpoint = %self.endpoint, %status, "comparison endpoint rejected request");
            return Err(ComparisonError::Status(status));
        }

        let payload = response.json::<Payload<ComparisonTableData>>().await?;
        Ok(payload.into_inner())
    }
}
