use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::{read_json, remove_key, write_json};
use crate::models::{ProductId, ValidationStatus};
use crate::storage::KeyValueStore;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValidationRecord {
    statuses: BTreeMap<String, ValidationStatus>,
    updated_at: DateTime<Utc>,
}

/// User judgments on matched competitor products, one record per product
/// under `<namespace>validation_<productId>`.
#[derive(Clone)]
pub struct ValidationStore {
    storage: Arc<dyn KeyValueStore>,
    prefix: String,
    write_lock: Arc<Mutex<()>>,
}

impl ValidationStore {
    pub fn new(storage: Arc<dyn KeyValueStore>, namespace: &str) -> Self {
        Self {
            storage,
            prefix: format!("{namespace}validation_"),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    fn key(&self, product_id: &ProductId) -> String {
        format!("{}{}", self.prefix, product_id)
    }

    pub async fn set_status(
        &self,
        product_id: &ProductId,
        matched_product_id: &str,
        status: ValidationStatus,
    ) {
        let _guard = self.write_lock.lock().await;
        let key = self.key(product_id);

        let mut record = read_json::<ValidationRecord>(self.storage.as_ref(), &key)
            .await
            .unwrap_or_else(|| ValidationRecord {
                statuses: BTreeMap::new(),
                updated_at: Utc::now(),
            });
        record
            .statuses
            .insert(matched_product_id.to_string(), status);
        record.updated_at = Utc::now();

        if write_json(self.storage.as_ref(), &key, &record).await {
            tracing::debug!(%product_id, matched_product_id, ?status, "validation status saved");
        }
    }

    pub async fn get_status(
        &self,
        product_id: &ProductId,
        matched_product_id: &str,
    ) -> Option<ValidationStatus> {
        self.get_all_statuses(product_id)
            .await
            .get(matched_product_id)
            .copied()
    }

    pub async fn get_all_statuses(&self, product_id: &ProductId) -> BTreeMap<String, ValidationStatus> {
        read_json::<ValidationRecord>(self.storage.as_ref(), &self.key(product_id))
            .await
            .map(|record| record.statuses)
            .unwrap_or_default()
    }

    /// Every product's judgments. A corrupt record is skipped, the rest are kept.
    pub async fn get_all_statuses_across_products(
        &self,
    ) -> BTreeMap<ProductId, BTreeMap<String, ValidationStatus>> {
        let keys = match self.storage.keys_with_prefix(&self.prefix).await {
            Ok(keys) => keys,
            Err(err) => {
                tracing::warn!(error = %err, "failed to list validation records");
                return BTreeMap::new();
            }
        };

        let mut result = BTreeMap::new();
        for key in keys {
            let Some(raw_id) = key.strip_prefix(&self.prefix) else {
                continue;
            };
            if raw_id.is_empty() {
                continue;
            }
            if let Some(record) = read_json::<ValidationRecord>(self.storage.as_ref(), &key).await {
                result.insert(ProductId::parse(raw_id), record.statuses);
            }
        }
        result
    }

    pub async fn clear_statuses(&self, product_id: &ProductId) {
        let _guard = self.write_lock.lock().await;
        remove_key(self.storage.as_ref(), &self.key(product_id)).await;
    }
}
