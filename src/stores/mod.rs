//! Typed stores over [`KeyValueStore`]. Reads never fail: missing or
//! unparseable data comes back as empty and is logged.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::storage::KeyValueStore;

pub mod manual_entries;
pub mod manual_products;
pub mod validation;

pub use manual_entries::ManualEntryStore;
pub use manual_products::{ManualProductStore, ProductPatch, transform_comparison};
pub use validation::ValidationStore;

pub const DEFAULT_NAMESPACE: &str = "pricehawk_";

async fn read_json<T: DeserializeOwned>(storage: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match storage.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            tracing::warn!(key, error = %err, "storage read failed");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(key, error = %err, "discarding unparseable stored value");
            None
        }
    }
}

async fn write_json<T: Serialize>(storage: &dyn KeyValueStore, key: &str, value: &T) -> bool {
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::warn!(key, error = %err, "failed to encode value for storage");
            return false;
        }
    };

    match storage.set(key, &raw).await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(key, error = %err, "storage write failed");
            false
        }
    }
}

async fn remove_key(storage: &dyn KeyValueStore, key: &str) {
    if let Err(err) = storage.remove(key).await {
        tracing::warn!(key, error = %err, "storage remove failed");
    }
}
