//! SQLite table for fragment metadata.
//!
//! Rows are keyed by `(owner_id, id)`: the owner is the partition and the
//! fragment id the range key, so listing is a single indexed query per owner.

use std::path::Path;

use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow},
    Row,
};

use crate::error::{Result, StoreError, StoreKind};
use crate::record::{format_timestamp, FragmentRecord};

fn db_err(operation: &'static str) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |e| StoreError::backend(StoreKind::Metadata, operation, e)
}

fn parse_timestamp(key: &str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| StoreError::corrupt(StoreKind::Metadata, key, e))
}

fn record_from_row(row: &SqliteRow) -> Result<FragmentRecord> {
    let owner_id: String = row
        .try_get("owner_id")
        .map_err(db_err("decode metadata row"))?;
    let id: String = row.try_get("id").map_err(db_err("decode metadata row"))?;
    let key = format!("{}/{}", owner_id, id);

    let size: i64 = row.try_get("size").map_err(db_err("decode metadata row"))?;
    let size = u64::try_from(size).map_err(|e| StoreError::corrupt(StoreKind::Metadata, &key, e))?;
    let created: String = row.try_get("created").map_err(db_err("decode metadata row"))?;
    let updated: String = row.try_get("updated").map_err(db_err("decode metadata row"))?;

    Ok(FragmentRecord {
        fragment_type: row.try_get("type").map_err(db_err("decode metadata row"))?,
        size,
        created: parse_timestamp(&key, &created)?,
        updated: parse_timestamp(&key, &updated)?,
        owner_id,
        id,
    })
}

/// SQLite database connection pool.
#[derive(Debug, Clone)]
pub(crate) struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database connection from a file path.
    pub async fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(db_err("connect"))?;

        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    /// Create an in-memory database.
    ///
    /// Every connection to `:memory:` is its own database, so the pool is
    /// pinned to a single connection that is never recycled.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::new().filename(":memory:");

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(db_err("connect"))?;

        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    /// Run database migrations.
    async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::backend(StoreKind::Metadata, "migrate", e))?;
        Ok(())
    }

    /// Insert or replace a fragment record.
    pub async fn upsert_fragment(&self, record: &FragmentRecord) -> Result<()> {
        let size = i64::try_from(record.size)
            .map_err(|e| StoreError::backend(StoreKind::Metadata, "encode size", e))?;
        sqlx::query(
            r#"
            INSERT INTO fragments (owner_id, id, type, size, created, updated)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(owner_id, id) DO UPDATE SET
                type = excluded.type,
                size = excluded.size,
                created = excluded.created,
                updated = excluded.updated
            "#,
        )
        .bind(&record.owner_id)
        .bind(&record.id)
        .bind(&record.fragment_type)
        .bind(size)
        .bind(format_timestamp(&record.created))
        .bind(format_timestamp(&record.updated))
        .execute(&self.pool)
        .await
        .map_err(db_err("write record"))?;
        Ok(())
    }

    /// Get a fragment record by key.
    pub async fn get_fragment(&self, owner_id: &str, id: &str) -> Result<Option<FragmentRecord>> {
        let row = sqlx::query(
            r#"
            SELECT owner_id, id, type, size, created, updated
            FROM fragments
            WHERE owner_id = ? AND id = ?
            "#,
        )
        .bind(owner_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("read record"))?;

        row.as_ref().map(record_from_row).transpose()
    }

    /// List the fragment ids of one owner.
    pub async fn list_ids(&self, owner_id: &str) -> Result<Vec<String>> {
        let rows = sqlx::query(
            r#"
            SELECT id FROM fragments WHERE owner_id = ?
            ORDER BY id
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("list records"))?;

        rows.iter()
            .map(|r| r.try_get("id").map_err(db_err("decode metadata row")))
            .collect()
    }

    /// List the full records of one owner.
    pub async fn list_records(&self, owner_id: &str) -> Result<Vec<FragmentRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT owner_id, id, type, size, created, updated
            FROM fragments
            WHERE owner_id = ?
            ORDER BY id
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("list records"))?;

        rows.iter().map(record_from_row).collect()
    }

    /// Delete a fragment record. Returns whether a row was removed.
    pub async fn delete_fragment(&self, owner_id: &str, id: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM fragments WHERE owner_id = ? AND id = ?
            "#,
        )
        .bind(owner_id)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(db_err("delete record"))?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
impl Database {
    /// Count all records across owners.
    pub async fn count_fragments(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM fragments")
            .fetch_one(&self.pool)
            .await
            .map_err(db_err("count records"))?;
        row.try_get("count").map_err(db_err("decode count"))
    }

    /// Write a raw row, bypassing record validation.
    pub async fn insert_raw(&self, owner_id: &str, id: &str, size: i64, created: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO fragments (owner_id, id, type, size, created, updated) VALUES (?, ?, 'text/plain', ?, ?, ?)",
        )
        .bind(owner_id)
        .bind(id)
        .bind(size)
        .bind(created)
        .bind(created)
        .execute(&self.pool)
        .await
        .map_err(db_err("write record"))?;
        Ok(())
    }
}
