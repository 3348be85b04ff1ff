use super::traits::RecordStore;
use super::{Collection, TextRecord};
use crate::error::{CleanseError, Result};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

/// Owns the SQLite connection and hands out one store per collection.
pub struct SqliteDatabase {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteDatabase {
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(db_path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        info!("Opened record database at {}", db_path.display());
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        // AUTOINCREMENT keeps ids monotonic even after deletes
        for collection in Collection::all() {
            conn.execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    text_id    INTEGER PRIMARY KEY AUTOINCREMENT,
                    dirty_text TEXT NOT NULL,
                    clean_text TEXT NOT NULL
                );",
                collection.table_name()
            ))?;
        }
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn store(&self, collection: Collection) -> SqliteRecordStore {
        SqliteRecordStore {
            conn: self.conn.clone(),
            collection,
        }
    }
}

/// A [`RecordStore`] over one table of a shared SQLite connection.
pub struct SqliteRecordStore {
    conn: Arc<Mutex<Connection>>,
    collection: Collection,
}

impl SqliteRecordStore {
    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| CleanseError::StoreUnavailable("database lock poisoned".to_string()))
    }

    fn table(&self) -> &'static str {
        self.collection.table_name()
    }

    fn not_found(&self, id: i64) -> CleanseError {
        CleanseError::NotFound {
            collection: self.collection,
            id,
        }
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    fn collection(&self) -> Collection {
        self.collection
    }

    async fn insert(&self, dirty_text: &str, clean_text: &str) -> Result<i64> {
        let conn = self.lock()?;
        conn.execute(
            &format!("INSERT INTO {} (dirty_text, clean_text) VALUES (?1, ?2)", self.table()),
            params![dirty_text, clean_text],
        )?;
        let id = conn.last_insert_rowid();

        debug!("Inserted record {} into {}", id, self.collection);
        Ok(id)
    }

    async fn get_by_id(&self, id: i64) -> Result<TextRecord> {
        let conn = self.lock()?;
        let record = conn
            .query_row(
                &format!(
                    "SELECT text_id, dirty_text, clean_text FROM {} WHERE text_id = ?1",
                    self.table()
                ),
                params![id],
                |row| {
                    Ok(TextRecord {
                        id: row.get(0)?,
                        dirty_text: row.get(1)?,
                        clean_text: row.get(2)?,
                    })
                },
            )
            .optional()?;
        record.ok_or_else(|| self.not_found(id))
    }

    async fn list_all(&self) -> Result<Vec<TextRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT text_id, dirty_text, clean_text FROM {} ORDER BY text_id",
            self.table()
        ))?;
        let rows = stmt.query_map([], |row| {
            Ok(TextRecord {
                id: row.get(0)?,
                dirty_text: row.get(1)?,
                clean_text: row.get(2)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    async fn update(&self, id: i64, dirty_text: &str, clean_text: &str) -> Result<()> {
        let conn = self.lock()?;
        let changed = conn.execute(
            &format!(
                "UPDATE {} SET dirty_text = ?1, clean_text = ?2 WHERE text_id = ?3",
                self.table()
            ),
            params![dirty_text, clean_text, id],
        )?;
        if changed == 0 {
            return Err(self.not_found(id));
        }

        debug!("Updated record {} in {}", id, self.collection);
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let conn = self.lock()?;
        let changed = conn.execute(
            &format!("DELETE FROM {} WHERE text_id = ?1", self.table()),
            params![id],
        )?;
        if changed == 0 {
            return Err(self.not_found(id));
        }

        debug!("Deleted record {} from {}", id, self.collection);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_collections_have_separate_id_sequences() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        let texts = db.store(Collection::Text);
        let files = db.store(Collection::File);

        assert_eq!(texts.insert("A", "a").await.unwrap(), 1);
        assert_eq!(texts.insert("B", "b").await.unwrap(), 2);
        assert_eq!(files.insert("C", "c").await.unwrap(), 1);

        assert_eq!(texts.list_all().await.unwrap().len(), 2);
        assert_eq!(files.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        let texts = db.store(Collection::Text);
        let a = texts.insert("A", "a").await.unwrap();
        let b = texts.insert("B", "b").await.unwrap();
        texts.delete(b).await.unwrap();
        let c = texts.insert("C", "c").await.unwrap();
        assert!(c > b && b > a);
    }

    #[tokio::test]
    async fn test_update_missing_creates_nothing() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        let texts = db.store(Collection::Text);
        let err = texts.update(5, "Baru", "baru").await.unwrap_err();
        assert!(matches!(
            err,
            CleanseError::NotFound { collection: Collection::Text, id: 5 }
        ));
        assert!(texts.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_round_trip_through_store() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        let files = db.store(Collection::File);
        let id = files.insert("Halo GW!!", "halo saya").await.unwrap();
        files.update(id, "Baru", "baru").await.unwrap();

        let record = files.get_by_id(id).await.unwrap();
        assert_eq!(
            record,
            TextRecord { id, dirty_text: "Baru".into(), clean_text: "baru".into() }
        );

        files.delete(id).await.unwrap();
        assert!(files.get_by_id(id).await.unwrap_err().is_not_found());
        assert!(files.delete(id).await.unwrap_err().is_not_found());
    }
}
