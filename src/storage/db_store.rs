use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};

use super::{KeyValueStore, StorageError};
use crate::entity::storage_entries::{ActiveModel, Column, Entity as StorageEntries};

/// PostgreSQL-backed storage over the `storage_entries` table.
#[derive(Debug, Clone)]
pub struct DbStore {
    orm: DatabaseConnection,
}

impl DbStore {
    pub fn new(orm: DatabaseConnection) -> Self {
        Self { orm }
    }
}

#[async_trait]
impl KeyValueStore for DbStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entry = StorageEntries::find_by_id(key.to_string())
            .one(&self.orm)
            .await?;
        Ok(entry.map(|e| e.value))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let active = ActiveModel {
            key: Set(key.to_string()),
            value: Set(value.to_string()),
            updated_at: Set(Utc::now().fixed_offset()),
        };
        StorageEntries::insert(active)
            .on_conflict(
                OnConflict::column(Column::Key)
                    .update_columns([Column::Value, Column::UpdatedAt])
                    .to_owned(),
            )
            .exec(&self.orm)
            .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        StorageEntries::delete_by_id(key.to_string())
            .exec(&self.orm)
            .await?;
        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let keys: Vec<String> = StorageEntries::find()
            .select_only()
            .column(Column::Key)
            .filter(Column::Key.starts_with(prefix))
            .order_by_asc(Column::Key)
            .into_tuple()
            .all(&self.orm)
            .await?;

        // LIKE treats `_` in the prefix as a wildcard; keep exact matches only.
        Ok(keys.into_iter().filter(|k| k.starts_with(prefix)).collect())
    }
}
