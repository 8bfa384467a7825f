//! Database connection utilities.

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establish a connection pool to the database.
///
/// Pool sizing is tuned for a worker process that holds a transaction for the
/// write phase of a sync: a small floor so idle processes stay light, a cap
/// that leaves headroom for concurrent task handlers, and bounded connection
/// lifetimes so stale connections are recycled.
///
/// # Arguments
/// * `database_url` - connection string (`postgres://...` in production,
///   `sqlite::memory:` in tests)
///
/// # Errors
/// Returns `DbErr` if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    if database_url.starts_with("sqlite") {
        // A pooled `sqlite::memory:` would open one independent database per
        // connection; a single connection keeps tests coherent.
        options.min_connections(1).max_connections(1);
    } else {
        options
            .min_connections(5)
            .max_connections(25)
            .idle_timeout(Duration::from_secs(5 * 60))
            .max_lifetime(Duration::from_secs(30 * 60));
    }
    options.sqlx_logging(false);

    Database::connect(options).await
}

/// Establish a connection and run all pending migrations.
///
/// Production deployments run migrations out-of-band; this is the convenient
/// entry point for tests and local development.
pub async fn connect_and_migrate(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    use sea_orm_migration::MigratorTrait;

    let db = connect(database_url).await?;
    crate::migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_returns_error_for_invalid_database_url() {
        let err = connect("this-is-not-a-db-url")
            .await
            .expect_err("invalid URL should error");
        let msg = err.to_string().to_ascii_lowercase();
        assert!(
            msg.contains("error") || msg.contains("invalid"),
            "unexpected error message: {err}"
        );
    }

    #[tokio::test]
    async fn connect_and_migrate_builds_schema_in_memory() {
        let db = connect_and_migrate("sqlite::memory:")
            .await
            .expect("in-memory sqlite should migrate cleanly");
        db.ping().await.expect("connection should be usable");
    }
}
