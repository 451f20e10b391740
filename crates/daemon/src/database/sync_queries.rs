//! [`SyncLedger`] implementation over the SQLite pool.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::warn;

use sync::{decode_row_key, Result, SyncError, SyncLedger, SyncRecord};

use super::Database;

fn ledger_err(err: sqlx::Error) -> SyncError {
    SyncError::Ledger(err.to_string())
}

fn row_to_record(row: &SqliteRow) -> Option<SyncRecord> {
    let row_key: String = row.get("row_key");
    let object_key = decode_row_key(&row_key)?;
    Some(SyncRecord {
        container_name: row.get("container_name"),
        object_key,
        local_path: row.get("local_path"),
        last_sync_utc: row.get::<Option<DateTime<Utc>>, _>("last_sync_utc"),
        local_modified_utc: row.get::<Option<DateTime<Utc>>, _>("local_modified_utc"),
        remote_modified_utc: row.get::<Option<DateTime<Utc>>, _>("remote_modified_utc"),
    })
}

#[async_trait]
impl SyncLedger for Database {
    async fn query(&self, container_name: &str) -> Result<Vec<SyncRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT container_name, row_key, local_path,
                   last_sync_utc, local_modified_utc, remote_modified_utc
            FROM sync_records
            WHERE container_name = ?1
            "#,
        )
        .bind(container_name)
        .fetch_all(&**self)
        .await
        .map_err(ledger_err)?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            match row_to_record(row) {
                Some(record) => records.push(record),
                None => {
                    let row_key: String = row.get("row_key");
                    warn!(row_key, "undecodable row key in ledger, skipping");
                }
            }
        }
        Ok(records)
    }

    async fn upsert_batch(&self, records: &[SyncRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        // one transaction per batch: all records land or none do
        let mut tx = self.begin().await.map_err(ledger_err)?;
        for record in records {
            sqlx::query(
                r#"
                INSERT INTO sync_records (
                    container_name, row_key, local_path,
                    last_sync_utc, local_modified_utc, remote_modified_utc
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                ON CONFLICT (container_name, row_key) DO UPDATE SET
                    local_path = excluded.local_path,
                    last_sync_utc = excluded.last_sync_utc,
                    local_modified_utc = excluded.local_modified_utc,
                    remote_modified_utc = excluded.remote_modified_utc
                "#,
            )
            .bind(&record.container_name)
            .bind(record.row_key())
            .bind(&record.local_path)
            .bind(record.last_sync_utc)
            .bind(record.local_modified_utc)
            .bind(record.remote_modified_utc)
            .execute(&mut *tx)
            .await
            .map_err(ledger_err)?;
        }
        tx.commit().await.map_err(ledger_err)?;
        Ok(())
    }

    async fn clear(&self, container_name: &str) -> Result<usize> {
        let result = sqlx::query("DELETE FROM sync_records WHERE container_name = ?1")
            .bind(container_name)
            .execute(&**self)
            .await
            .map_err(ledger_err)?;
        Ok(result.rows_affected() as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record_with_times(container: &str, key: &str, secs: i64) -> SyncRecord {
        let ts = Utc.timestamp_opt(secs, 0).unwrap();
        let mut record = SyncRecord::new(container, key);
        record.local_path = format!("/data/{container}/{key}");
        record.last_sync_utc = Some(ts);
        record.local_modified_utc = Some(ts);
        record.remote_modified_utc = Some(ts);
        record
    }

    #[tokio::test]
    async fn upsert_and_query_round_trip() {
        let db = Database::in_memory().await.unwrap();
        let record = record_with_times("sync", "a/b.txt", 1_700_000_000);

        db.upsert_batch(&[record.clone()]).await.unwrap();

        let records = db.query("sync").await.unwrap();
        assert_eq!(records, vec![record]);
    }

    #[tokio::test]
    async fn upsert_replaces_existing_record() {
        let db = Database::in_memory().await.unwrap();
        let mut record = record_with_times("sync", "a.txt", 1_700_000_000);
        db.upsert_batch(&[record.clone()]).await.unwrap();

        record.local_path = "/elsewhere/a.txt".to_string();
        record.last_sync_utc = Some(Utc.timestamp_opt(1_700_000_100, 0).unwrap());
        db.upsert_batch(&[record.clone()]).await.unwrap();

        let records = db.query("sync").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].local_path, "/elsewhere/a.txt");
        assert_eq!(records[0].last_sync_utc, record.last_sync_utc);
    }

    #[tokio::test]
    async fn fresh_record_stores_null_timestamps() {
        let db = Database::in_memory().await.unwrap();
        db.upsert_batch(&[SyncRecord::new("sync", "empty.txt")])
            .await
            .unwrap();

        let records = db.query("sync").await.unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].last_sync_utc.is_none());
        assert!(records[0].local_modified_utc.is_none());
        assert!(records[0].remote_modified_utc.is_none());
    }

    #[tokio::test]
    async fn clear_scopes_to_container_and_counts() {
        let db = Database::in_memory().await.unwrap();
        db.upsert_batch(&[
            record_with_times("sync", "a.txt", 1),
            record_with_times("sync", "b.txt", 2),
            record_with_times("other", "c.txt", 3),
        ])
        .await
        .unwrap();

        assert_eq!(db.clear("sync").await.unwrap(), 2);
        assert!(db.query("sync").await.unwrap().is_empty());
        assert_eq!(db.query("other").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn clear_on_empty_container_returns_zero() {
        let db = Database::in_memory().await.unwrap();
        assert_eq!(db.clear("sync").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn empty_batch_is_a_no_op() {
        let db = Database::in_memory().await.unwrap();
        db.upsert_batch(&[]).await.unwrap();
        assert!(db.query("sync").await.unwrap().is_empty());
    }
}
