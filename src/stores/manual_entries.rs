use std::sync::Arc;

use tokio::sync::Mutex;

use super::{read_json, remove_key, write_json};
use crate::models::{ManualComparisonData, ProductId};
use crate::storage::KeyValueStore;

/// Side-panel comparison records, one per product under `<namespace>manual_<productId>`.
#[derive(Clone)]
pub struct ManualEntryStore {
    storage: Arc<dyn KeyValueStore>,
    prefix: String,
    write_lock: Arc<Mutex<()>>,
}

impl ManualEntryStore {
    pub fn new(storage: Arc<dyn KeyValueStore>, namespace: &str) -> Self {
        Self {
            storage,
            prefix: format!("{namespace}manual_"),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// `None` for product ids whose key would collide with the manual
    /// products collection.
    fn key(&self, product_id: &ProductId) -> Option<String> {
        match product_id.as_str() {
            "" | "products" => None,
            id => Some(format!("{}{}", self.prefix, id)),
        }
    }

    pub fn accepts(&self, product_id: &ProductId) -> bool {
        self.key(product_id).is_some()
    }

    pub async fn get(&self, product_id: &ProductId) -> Option<ManualComparisonData> {
        let key = self.key(product_id)?;
        read_json(self.storage.as_ref(), &key).await
    }

    /// Returns false when the product id is refused or the write failed.
    pub async fn set(&self, product_id: &ProductId, data: &ManualComparisonData) -> bool {
        let Some(key) = self.key(product_id) else {
            return false;
        };
        let _guard = self.write_lock.lock().await;
        write_json(self.storage.as_ref(), &key, data).await
    }

    pub async fn clear(&self, product_id: &ProductId) {
        let Some(key) = self.key(product_id) else {
            return;
        };
        let _guard = self.write_lock.lock().await;
        remove_key(self.storage.as_ref(), &key).await;
    }
}
