//! SQLite-backed ledger persistence.

mod sync_queries;

use std::ops::Deref;
use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

/// Connection pool plus schema management for the sync-record ledger.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (or create) a file-backed ledger database.
    pub async fn new(path: &Path) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// An in-memory ledger, dropped with the process.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        // a single connection keeps every query on the same in-memory db
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sync_records (
                container_name      TEXT NOT NULL,
                row_key             TEXT NOT NULL,
                local_path          TEXT NOT NULL DEFAULT '',
                last_sync_utc       TEXT,
                local_modified_utc  TEXT,
                remote_modified_utc TEXT,
                PRIMARY KEY (container_name, row_key)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl Deref for Database {
    type Target = SqlitePool;

    fn deref(&self) -> &Self::Target {
        &self.pool
    }
}
