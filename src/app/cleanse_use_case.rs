use std::sync::Arc;

use tracing::{debug, info};

use crate::error::Result;
use crate::metrics;
use crate::pipeline::{normalize_batch, Normalizer};
use crate::storage::{Collection, RecordStore, TextRecord};
use crate::tabular::read_first_column;

/// Use case for cleansing texts and managing the stored dirty/clean pairs
pub struct CleanseService {
    normalizer: Arc<dyn Normalizer + Send + Sync>,
    texts: Arc<dyn RecordStore>,
    files: Arc<dyn RecordStore>,
}

impl CleanseService {
    pub fn new(
        normalizer: Arc<dyn Normalizer + Send + Sync>,
        texts: Arc<dyn RecordStore>,
        files: Arc<dyn RecordStore>,
    ) -> Self {
        Self {
            normalizer,
            texts,
            files,
        }
    }

    fn store(&self, collection: Collection) -> &dyn RecordStore {
        match collection {
            Collection::Text => self.texts.as_ref(),
            Collection::File => self.files.as_ref(),
        }
    }

    /// Clean a text without storing it
    pub fn preview(&self, text: &str) -> String {
        self.normalizer.normalize(text)
    }

    /// Clean a single text and record it in the text collection
    pub async fn clean_text(&self, text: &str) -> Result<TextRecord> {
        let clean_text = self.normalizer.normalize(text);
        let id = self.texts.insert(text, &clean_text).await.map_err(|e| {
            metrics::store_error(Collection::Text, "insert");
            e
        })?;
        metrics::text_cleaned(Collection::Text);

        debug!(id, "Cleaned text");
        Ok(TextRecord {
            id,
            dirty_text: text.to_string(),
            clean_text,
        })
    }

    /// Clean the first column of an uploaded table into the file collection.
    ///
    /// Returns every record in the file collection, not just this upload's.
    pub async fn clean_file(&self, bytes: &[u8]) -> Result<Vec<TextRecord>> {
        let rows = read_first_column(bytes)?;
        info!("Cleaning uploaded table with {} rows", rows.len());

        normalize_batch(self.normalizer.as_ref(), self.files.as_ref(), &rows).await?;
        self.files.list_all().await
    }

    pub async fn list(&self, collection: Collection) -> Result<Vec<TextRecord>> {
        self.store(collection).list_all().await
    }

    pub async fn get(&self, collection: Collection, id: i64) -> Result<TextRecord> {
        self.store(collection).get_by_id(id).await
    }

    /// Replace a record's text, re-running the pipeline on the new input
    pub async fn update(&self, collection: Collection, id: i64, text: &str) -> Result<TextRecord> {
        let clean_text = self.normalizer.normalize(text);
        self.store(collection).update(id, text, &clean_text).await?;

        debug!(id, %collection, "Updated record");
        Ok(TextRecord {
            id,
            dirty_text: text.to_string(),
            clean_text,
        })
    }

    pub async fn delete(&self, collection: Collection, id: i64) -> Result<()> {
        self.store(collection).delete(id).await?;
        debug!(id, %collection, "Deleted record");
        Ok(())
    }
}
