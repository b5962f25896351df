use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::{CatalogError, CatalogSource, ProductListQuery, ProductListResponse};
use crate::models::ProductComparisonDetail;
use crate::response::Payload;
use crate::retailers::RetailerRegistry;

/// Catalog served by another process speaking the list/detail contract at
/// `<base>/products` and `<base>/products/{id}`.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: reqwest::Client,
    base_url: String,
    registry: Arc<RetailerRegistry>,
}

impl HttpCatalog {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        registry: Arc<RetailerRegistry>,
    ) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            registry,
        })
    }

    async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        id: Option<&str>,
    ) -> Result<T, CatalogError> {
        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            if let Some(id) = id {
                return Err(CatalogError::NotFound(id.to_string()));
            }
        }
        if !status.is_success() {
            tracing::warn!(base_url = %self.base_url, %status, "catalog request failed");
            return Err(CatalogError::Status(status));
        }

        Ok(response.json::<Payload<T>>().await?.into_inner())
    }
}

#[async_trait]
impl CatalogSource for HttpCatalog {
    async fn list(&self, query: &ProductListQuery) -> Result<ProductListResponse, CatalogError> {
        let request = self
            .client
            .get(format!("{}/products", self.base_url))
            .query(query);
        let mut response: ProductListResponse = self.fetch(request, None).await?;

        for product in &mut response.products {
            product.refresh_derived(&self.registry);
        }
        Ok(response)
    }

    async fn detail(&self, id: &str) -> Result<ProductComparisonDetail, CatalogError> {
        let request = self.client.get(format!(
            "{}/products/{}",
            self.base_url,
            urlencoding::encode(id)
        ));
        let mut detail: ProductComparisonDetail = self.fetch(request, Some(id)).await?;

        detail.product.refresh_derived(&self.registry);
        Ok(detail)
    }
}
