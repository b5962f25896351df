use anyhow::Result;
use sea_orm::{Database, DatabaseConnection};

/// Pool used for audit rows and migrations.
pub type DbPool = sqlx::PgPool;

pub async fn create_orm_conn(database_url: &str) -> Result<DatabaseConnection> {
    let conn = Database::connect(database_url).await?;
    Ok(conn)
}

/// Applies pending `migrations/*.sql` files. Applied versions are tracked by
/// sqlx in `_sqlx_migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
