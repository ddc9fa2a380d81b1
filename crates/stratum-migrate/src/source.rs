//! Migration sources.
//!
//! A migration source supplies the set of already-recorded migrations. The
//! dump command consults it to refuse dumping into a namespace that already
//! contains history.

use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;

use crate::error::{MigrateError, Result};
use crate::metadata::{AvailableMigration, AvailableMigrationsSet, Version};

/// Name of the recorded-migrations table.
pub const MIGRATIONS_TABLE: &str = "stratum_migrations";

/// SQL to create the recorded-migrations table (SQLite).
pub const CREATE_MIGRATIONS_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS stratum_migrations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    namespace TEXT NOT NULL,
    name TEXT NOT NULL,
    recorded_at TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE(namespace, name)
)
"#;

/// Supplies the set of already-recorded migrations.
#[async_trait]
pub trait MigrationSource: Send + Sync {
    /// Returns all known migrations.
    async fn migrations(&self) -> Result<AvailableMigrationsSet>;
}

/// Migration source backed by the SQLite recorded-migrations table.
pub struct SqliteMigrationSource {
    pool: SqlitePool,
}

impl SqliteMigrationSource {
    /// Creates a source reading from the given pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Ensures the recorded-migrations table exists.
    pub async fn ensure_table(&self) -> Result<()> {
        sqlx::query(CREATE_MIGRATIONS_TABLE_SQL)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Records a migration version.
    pub async fn record(&self, version: &Version) -> Result<()> {
        sqlx::query("INSERT INTO stratum_migrations (namespace, name) VALUES (?, ?)")
            .bind(version.namespace())
            .bind(version.name())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Removes a recorded migration version.
    pub async fn remove(&self, version: &Version) -> Result<()> {
        let result = sqlx::query("DELETE FROM stratum_migrations WHERE namespace = ? AND name = ?")
            .bind(version.namespace())
            .bind(version.name())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(MigrateError::NotRecorded(version.to_string()));
        }

        Ok(())
    }
}

#[async_trait]
impl MigrationSource for SqliteMigrationSource {
    async fn migrations(&self) -> Result<AvailableMigrationsSet> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT namespace, name FROM stratum_migrations ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(AvailableMigrationsSet::new(
            rows.into_iter()
                .map(|(namespace, name)| AvailableMigration::new(Version::new(namespace, name)))
                .collect(),
        ))
    }
}
