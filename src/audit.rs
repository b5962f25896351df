use serde_json::Value;
use uuid::Uuid;

use crate::db::DbPool;

pub async fn log_audit(
    pool: &DbPool,
    action: &str,
    resource: Option<&str>,
    metadata: Option<Value>,
) -> Result<(), sqlx::Error> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO audit_logs (id, action, resource, metadata)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(id)
    .bind(action)
    .bind(resource)
    .bind(metadata)
    .execute(pool)
    .await?;

    Ok(())
}

/// Writes an audit row when a database is configured. Failures are logged only.
pub async fn record(pool: Option<&DbPool>, action: &str, resource: Option<&str>, metadata: Option<Value>) {
    let Some(pool) = pool else {
        return;
    };
    if let Err(err) = log_audit(pool, action, resource, metadata).await {
        tracing::warn!(action, error = %err, "audit log failed");
    }
}
