//! `SQLite`-backed document store.
//!
//! Durable storage for feedback documents, one row per document in a single
//! `feedback` table. The table is created on open, so pointing the store at a
//! fresh path yields a working empty database.
//!
//! # Connection configuration
//!
//! Every connection is configured for sane concurrent behavior:
//!
//! - **WAL mode**: concurrent readers alongside a single writer
//! - **NORMAL synchronous**: balances durability with performance
//! - **`busy_timeout`**: waits up to 5 seconds for locks instead of failing
//!   immediately with `SQLITE_BUSY`
//!
//! The store owns its `Connection` outright; serialization of access falls
//! out of the `&mut self` methods on [`DocumentStore`].

use crate::storage::{DocumentStore, FeedbackChanges, StoredFeedback, StoredRating};
use crate::{Error, Result};
use rusqlite::types::{Value, ValueRef};
use rusqlite::{Connection, Row, params};
use std::path::PathBuf;
use std::time::Instant;
use tracing::instrument;

/// `SQLite`-backed [`DocumentStore`].
pub struct SqliteStore {
    conn: Connection,
    /// Path to the database file (`None` for in-memory).
    db_path: Option<PathBuf>,
}

impl SqliteStore {
    /// Opens (and initializes if necessary) a database at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if the database cannot be opened or the
    /// schema cannot be created.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use voxpop::SqliteStore;
    ///
    /// let store = SqliteStore::open("./feedback.db")?;
    /// # Ok::<(), voxpop::Error>(())
    /// ```
    pub fn open(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        let conn = Connection::open(&db_path).map_err(|e| Error::store("open_sqlite", e))?;

        let store = Self {
            conn,
            db_path: Some(db_path),
        };
        store.initialize()?;
        Ok(store)
    }

    /// Opens an in-memory database, useful for tests.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if the database cannot be initialized.
    pub fn in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| Error::store("open_sqlite_in_memory", e))?;

        let store = Self {
            conn,
            db_path: None,
        };
        store.initialize()?;
        Ok(store)
    }

    /// Returns the database path (`None` for in-memory).
    #[must_use]
    pub const fn db_path(&self) -> Option<&PathBuf> {
        self.db_path.as_ref()
    }

    /// Configures pragmas and creates the schema.
    fn initialize(&self) -> Result<()> {
        configure_connection(&self.conn);

        // The rating column is declared without a type on purpose: BLOB
        // affinity stores values exactly as bound, so rows written by legacy
        // tooling keep their text ratings instead of being coerced.
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS feedback (
                    feedback_id TEXT PRIMARY KEY,
                    customer_name TEXT NOT NULL,
                    feedback_text TEXT NOT NULL,
                    rating NOT NULL
                )",
                [],
            )
            .map_err(|e| Error::store("create_feedback_table", e))?;

        Ok(())
    }
}

/// Applies the WAL / NORMAL / `busy_timeout` pragma set.
fn configure_connection(conn: &Connection) {
    // journal_mode returns a result row ("wal"), which pragma_update reports
    // as an error on some SQLite builds; the setting still takes effect.
    let _ = conn.pragma_update(None, "journal_mode", "WAL");
    let _ = conn.pragma_update(None, "synchronous", "NORMAL");
    let _ = conn.pragma_update(None, "busy_timeout", "5000");
}

/// Maps a `feedback` row to its document form, preserving the stored rating
/// representation.
fn map_document_row(row: &Row<'_>) -> rusqlite::Result<StoredFeedback> {
    let rating = match row.get_ref(3)? {
        ValueRef::Integer(value) => StoredRating::Number(value),
        ValueRef::Text(bytes) => StoredRating::Text(String::from_utf8_lossy(bytes).into_owned()),
        // REAL, BLOB and NULL carry no usable rating; they normalize to 0
        // downstream.
        _ => StoredRating::Unsupported,
    };

    Ok(StoredFeedback {
        feedback_id: row.get(0)?,
        customer_name: row.get(1)?,
        feedback_text: row.get(2)?,
        rating,
    })
}

fn rating_to_sql(rating: &StoredRating) -> Value {
    match rating {
        StoredRating::Number(value) => Value::Integer(*value),
        StoredRating::Text(text) => Value::Text(text.clone()),
        // NOT NULL on the column rejects this, which is the right outcome
        // for a value the contract cannot represent.
        StoredRating::Unsupported => Value::Null,
    }
}

/// Records operation count and latency for a store operation.
fn record_store_metrics(operation: &'static str, start: Instant, status: &'static str) {
    metrics::counter!(
        "feedback_store_operations_total",
        "backend" => "sqlite",
        "operation" => operation,
        "status" => status
    )
    .increment(1);
    metrics::histogram!(
        "feedback_store_operation_duration_ms",
        "backend" => "sqlite",
        "operation" => operation,
        "status" => status
    )
    .record(start.elapsed().as_secs_f64() * 1000.0);
}

impl DocumentStore for SqliteStore {
    #[instrument(skip(self), fields(operation = "find_all", backend = "sqlite"))]
    fn find_all(&mut self) -> Result<Vec<StoredFeedback>> {
        let start = Instant::now();
        let result = (|| {
            let mut stmt = self
                .conn
                .prepare(
                    "SELECT feedback_id, customer_name, feedback_text, rating
                     FROM feedback
                     ORDER BY rowid",
                )
                .map_err(|e| Error::store("prepare_find_all", e))?;

            let documents = stmt
                .query_map([], map_document_row)
                .map_err(|e| Error::store("find_all", e))?
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| Error::store("read_feedback_row", e))?;

            Ok(documents)
        })();

        let status = if result.is_ok() { "success" } else { "error" };
        record_store_metrics("find_all", start, status);
        result
    }

    #[instrument(skip(self, document), fields(operation = "insert", backend = "sqlite", feedback.id = %document.feedback_id))]
    fn insert(&mut self, document: &StoredFeedback) -> Result<()> {
        let start = Instant::now();
        let result = self
            .conn
            .execute(
                "INSERT INTO feedback (feedback_id, customer_name, feedback_text, rating)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    document.feedback_id,
                    document.customer_name,
                    document.feedback_text,
                    rating_to_sql(&document.rating),
                ],
            )
            .map(|_| ())
            .map_err(|e| Error::store("insert_feedback", e));

        let status = if result.is_ok() { "success" } else { "error" };
        record_store_metrics("insert", start, status);
        result
    }

    #[instrument(skip(self, changes), fields(operation = "update", backend = "sqlite", feedback.id = %feedback_id))]
    fn update(&mut self, feedback_id: &str, changes: &FeedbackChanges) -> Result<bool> {
        let start = Instant::now();
        let result = self
            .conn
            .execute(
                "UPDATE feedback SET feedback_text = ?1, rating = ?2 WHERE feedback_id = ?3",
                params![changes.feedback_text, changes.rating, feedback_id],
            )
            .map(|updated| updated > 0)
            .map_err(|e| Error::store("update_feedback", e));

        let status = if result.is_ok() { "success" } else { "error" };
        record_store_metrics("update", start, status);
        result
    }

    #[instrument(skip(self), fields(operation = "delete", backend = "sqlite", feedback.id = %feedback_id))]
    fn delete(&mut self, feedback_id: &str) -> Result<bool> {
        let start = Instant::now();
        let result = self
            .conn
            .execute(
                "DELETE FROM feedback WHERE feedback_id = ?1",
                params![feedback_id],
            )
            .map(|deleted| deleted > 0)
            .map_err(|e| Error::store("delete_feedback", e));

        let status = if result.is_ok() { "success" } else { "error" };
        record_store_metrics("delete", start, status);
        result
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn document(id: &str, rating: i64) -> StoredFeedback {
        StoredFeedback {
            feedback_id: id.to_string(),
            customer_name: format!("customer-{id}"),
            feedback_text: format!("text-{id}"),
            rating: StoredRating::Number(rating),
        }
    }

    #[test]
    fn test_find_all_returns_insertion_order() {
        let mut store = SqliteStore::in_memory().unwrap();
        for id in ["F1", "F2", "F3"] {
            store.insert(&document(id, 3)).unwrap();
        }

        let ids: Vec<_> = store
            .find_all()
            .unwrap()
            .into_iter()
            .map(|d| d.feedback_id)
            .collect();
        assert_eq!(ids, ["F1", "F2", "F3"]);
    }

    #[test]
    fn test_update_rewrites_text_and_rating() {
        let mut store = SqliteStore::in_memory().unwrap();
        store.insert(&document("F1", 2)).unwrap();

        let changes = FeedbackChanges {
            feedback_text: "revised".to_string(),
            rating: 4,
        };
        assert!(store.update("F1", &changes).unwrap());

        let documents = store.find_all().unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].feedback_text, "revised");
        assert_eq!(documents[0].rating, StoredRating::Number(4));
        // Customer name is immutable.
        assert_eq!(documents[0].customer_name, "customer-F1");
    }

    #[test]
    fn test_update_missing_returns_false() {
        let mut store = SqliteStore::in_memory().unwrap();
        let changes = FeedbackChanges {
            feedback_text: "revised".to_string(),
            rating: 4,
        };
        assert!(!store.update("F9", &changes).unwrap());
    }

    #[test]
    fn test_delete_reports_match() {
        let mut store = SqliteStore::in_memory().unwrap();
        store.insert(&document("F1", 3)).unwrap();

        assert!(store.delete("F1").unwrap());
        assert!(!store.delete("F1").unwrap());
        assert!(store.find_all().unwrap().is_empty());
    }

    #[test]
    fn test_legacy_text_rating_survives_read() {
        let mut store = SqliteStore::in_memory().unwrap();

        // Simulate a row written by legacy tooling that stored the rating as
        // text. The typeless column keeps it as text.
        store
            .conn
            .execute(
                "INSERT INTO feedback (feedback_id, customer_name, feedback_text, rating)
                 VALUES ('F1', 'Alice', 'Great', '4')",
                [],
            )
            .unwrap();

        let documents = store.find_all().unwrap();
        assert_eq!(documents[0].rating, StoredRating::Text("4".to_string()));
        assert_eq!(documents[0].rating.normalize(), 4);
    }

    #[test]
    fn test_unparseable_rating_reads_as_text() {
        let mut store = SqliteStore::in_memory().unwrap();
        store
            .conn
            .execute(
                "INSERT INTO feedback (feedback_id, customer_name, feedback_text, rating)
                 VALUES ('F1', 'Alice', 'Great', 'excellent')",
                [],
            )
            .unwrap();

        let documents = store.find_all().unwrap();
        assert_eq!(documents[0].rating.normalize(), 0);
    }

    #[test]
    fn test_connection_pragmas_applied() {
        let store = SqliteStore::in_memory().unwrap();

        // In-memory databases cannot use WAL and report "memory" instead.
        let journal_mode: String = store
            .conn
            .pragma_query_value(None, "journal_mode", |row| row.get(0))
            .unwrap();
        assert!(
            journal_mode.eq_ignore_ascii_case("wal") || journal_mode.eq_ignore_ascii_case("memory"),
            "unexpected journal mode {journal_mode}"
        );

        let synchronous: i32 = store
            .conn
            .pragma_query_value(None, "synchronous", |row| row.get(0))
            .unwrap();
        assert_eq!(synchronous, 1, "expected NORMAL synchronous mode");

        let busy_timeout: i32 = store
            .conn
            .pragma_query_value(None, "busy_timeout", |row| row.get(0))
            .unwrap();
        assert_eq!(busy_timeout, 5000);
    }

    #[test]
    fn test_duplicate_insert_is_a_store_error() {
        let mut store = SqliteStore::in_memory().unwrap();
        store.insert(&document("F1", 3)).unwrap();

        // The ledger screens duplicates before calling insert; the primary
        // key is the backstop against other writers.
        let err = store.insert(&document("F1", 3)).unwrap_err();
        assert!(matches!(err, Error::Store { .. }));
    }
}
