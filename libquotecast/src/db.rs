//! Quote inventory storage for Quotecast

use sqlx::sqlite::SqlitePool;
use sqlx::Row;
use std::path::Path;

use crate::error::Result;
use crate::types::QuoteRecord;

#[derive(Clone)]
pub struct QuoteStore {
    pool: SqlitePool,
}

impl QuoteStore {
    /// Open (or create) the quote database at the given path
    pub async fn open(db_path: &str) -> Result<Self> {
        // Expand path and create parent directories
        let expanded_path = shellexpand::tilde(db_path).to_string();
        let path = Path::new(&expanded_path);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(crate::error::StoreError::IoError)?;
        }

        // Use forward slashes for SQLite URL (works on both Windows and Unix)
        // Use mode=rwc to allow creating the database file if it doesn't exist
        let db_url = format!("sqlite://{}?mode=rwc", expanded_path.replace('\\', "/"));

        let pool = SqlitePool::connect(&db_url)
            .await
            .map_err(crate::error::StoreError::SqlxError)?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(crate::error::StoreError::MigrationError)?;

        Ok(Self { pool })
    }

    /// Number of records still eligible for publishing
    pub async fn count_unused(&self) -> Result<u32> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM quotes WHERE used = 0")
            .fetch_one(&self.pool)
            .await
            .map_err(crate::error::StoreError::SqlxError)?;

        Ok(row.get::<i64, _>("n") as u32)
    }

    /// Total number of records, used or not
    pub async fn count_total(&self) -> Result<u32> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM quotes")
            .fetch_one(&self.pool)
            .await
            .map_err(crate::error::StoreError::SqlxError)?;

        Ok(row.get::<i64, _>("n") as u32)
    }

    /// Insert a quote unless identical text is already stored.
    ///
    /// Duplicate text is a silent no-op, not an error. Returns whether a
    /// row was actually inserted.
    pub async fn insert_if_new(&self, text: &str, author: &str) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO quotes (quote, author, used, created_at)
            VALUES (?, ?, 0, ?)
            "#,
        )
        .bind(text)
        .bind(author)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(crate::error::StoreError::SqlxError)?;

        Ok(result.rows_affected() > 0)
    }

    /// Up to `n` unused records, oldest-inserted first. Does not mutate.
    pub async fn take_unused(&self, n: u32) -> Result<Vec<QuoteRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, quote, author, used, created_at, used_at
            FROM quotes
            WHERE used = 0
            ORDER BY id ASC
            LIMIT ?
            "#,
        )
        .bind(n as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(crate::error::StoreError::SqlxError)?;

        Ok(rows.iter().map(row_to_record).collect())
    }

    /// Mark a record consumed. Idempotent: a second call leaves the row
    /// (including `used_at`) unchanged.
    pub async fn mark_used(&self, id: i64) -> Result<()> {
        let now = chrono::Utc::now().timestamp();

        sqlx::query("UPDATE quotes SET used = 1, used_at = ? WHERE id = ? AND used = 0")
            .bind(now)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(crate::error::StoreError::SqlxError)?;

        Ok(())
    }

    /// Fetch a single record by id
    pub async fn get(&self, id: i64) -> Result<Option<QuoteRecord>> {
        let row = sqlx::query(
            r#"
            SELECT id, quote, author, used, created_at, used_at
            FROM quotes WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(crate::error::StoreError::SqlxError)?;

        Ok(row.as_ref().map(row_to_record))
    }

    /// Most recently inserted records, newest first
    pub async fn list_recent(&self, limit: u32) -> Result<Vec<QuoteRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, quote, author, used, created_at, used_at
            FROM quotes
            ORDER BY id DESC
            LIMIT ?
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(crate::error::StoreError::SqlxError)?;

        Ok(rows.iter().map(row_to_record).collect())
    }
}

fn row_to_record(r: &sqlx::sqlite::SqliteRow) -> QuoteRecord {
    QuoteRecord {
        id: r.get("id"),
        text: r.get("quote"),
        author: r.get("author"),
        used: r.get::<i64, _>("used") != 0,
        created_at: r.get("created_at"),
        used_at: r.get("used_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_store() -> QuoteStore {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        QuoteStore { pool }
    }

    #[tokio::test]
    async fn test_open_with_invalid_path() {
        #[cfg(unix)]
        let invalid_path = "/tmp/test\0invalid.db";

        #[cfg(windows)]
        let invalid_path = "C:\\invalid<>path\\test.db";

        let result = QuoteStore::open(invalid_path).await;
        assert!(result.is_err(), "Expected error for invalid path");
        assert!(matches!(
            result,
            Err(crate::error::QuotecastError::Store(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_store_counts() {
        let store = memory_store().await;
        assert_eq!(store.count_unused().await.unwrap(), 0);
        assert_eq!(store.count_total().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_insert_if_new_inserts_unused() {
        let store = memory_store().await;

        let inserted = store.insert_if_new("Be yourself.", "Anon").await.unwrap();
        assert!(inserted);
        assert_eq!(store.count_unused().await.unwrap(), 1);

        let records = store.take_unused(10).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "Be yourself.");
        assert_eq!(records[0].author, "Anon");
        assert!(!records[0].used);
        assert_eq!(records[0].used_at, None);
        assert!(records[0].created_at > 1_600_000_000);
    }

    #[tokio::test]
    async fn test_insert_if_new_duplicate_is_silent_noop() {
        let store = memory_store().await;

        assert!(store.insert_if_new("Be yourself.", "Anon").await.unwrap());
        // Same text, even with a different author, must not create a row
        // and must not error.
        let second = store
            .insert_if_new("Be yourself.", "Someone Else")
            .await
            .unwrap();
        assert!(!second);

        assert_eq!(store.count_total().await.unwrap(), 1);
        assert_eq!(store.count_unused().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_take_unused_oldest_first() {
        let store = memory_store().await;

        store.insert_if_new("first", "a").await.unwrap();
        store.insert_if_new("second", "b").await.unwrap();
        store.insert_if_new("third", "c").await.unwrap();

        let records = store.take_unused(2).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text, "first");
        assert_eq!(records[1].text, "second");

        // take_unused is read-only
        assert_eq!(store.count_unused().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_take_unused_skips_used() {
        let store = memory_store().await;

        store.insert_if_new("first", "a").await.unwrap();
        store.insert_if_new("second", "b").await.unwrap();

        let first = &store.take_unused(1).await.unwrap()[0];
        store.mark_used(first.id).await.unwrap();

        let remaining = store.take_unused(10).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].text, "second");
    }

    #[tokio::test]
    async fn test_mark_used_sets_flag_and_timestamp() {
        let store = memory_store().await;

        store.insert_if_new("Be yourself.", "Anon").await.unwrap();
        let record = &store.take_unused(1).await.unwrap()[0];

        store.mark_used(record.id).await.unwrap();

        let after = store.get(record.id).await.unwrap().unwrap();
        assert!(after.used);
        assert!(after.used_at.is_some());
        assert_eq!(store.count_unused().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_mark_used_idempotent() {
        let store = memory_store().await;

        store.insert_if_new("Be yourself.", "Anon").await.unwrap();
        let id = store.take_unused(1).await.unwrap()[0].id;

        store.mark_used(id).await.unwrap();
        let first = store.get(id).await.unwrap().unwrap();

        store.mark_used(id).await.unwrap();
        let second = store.get(id).await.unwrap().unwrap();

        assert!(second.used);
        assert_eq!(first.used_at, second.used_at);
    }

    #[tokio::test]
    async fn test_mark_used_unknown_id_is_noop() {
        let store = memory_store().await;
        store.mark_used(999).await.unwrap();
        assert_eq!(store.count_total().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_nonexistent_returns_none() {
        let store = memory_store().await;
        assert!(store.get(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_recent_newest_first() {
        let store = memory_store().await;

        store.insert_if_new("first", "a").await.unwrap();
        store.insert_if_new("second", "b").await.unwrap();
        store.insert_if_new("third", "c").await.unwrap();

        let recent = store.list_recent(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].text, "third");
        assert_eq!(recent[1].text, "second");
    }

    #[tokio::test]
    async fn test_store_usable_after_duplicate_insert() {
        let store = memory_store().await;

        store.insert_if_new("dup", "a").await.unwrap();
        store.insert_if_new("dup", "a").await.unwrap();

        assert!(store.insert_if_new("fresh", "b").await.unwrap());
        assert_eq!(store.count_total().await.unwrap(), 2);
    }
}
