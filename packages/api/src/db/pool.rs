//! Connection pool and schema migrations.

use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::settings;

/// Open a pool against the configured database.
pub async fn connect(database: &settings::Database) -> Result<PgPool, sqlx::Error> {
    tracing::info!(
        host = %database.host,
        port = database.port,
        database = %database.database,
        "connecting to postgres"
    );
    PgPoolOptions::new()
        .max_connections(database.connections)
        .connect(&database.url())
        .await
}

/// Apply pending migrations from `packages/api/migrations`.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
