use tracing::{debug, info, warn};

use super::normalize::Normalizer;
use crate::error::Result;
use crate::metrics;
use crate::storage::{RecordStore, TextRecord};

/// Clean `rows` in order, persisting each row before the next is touched.
///
/// Writes are not grouped into a transaction. If the store fails on a row, the
/// rows before it stay persisted, that row and the rest are skipped, and the
/// store error is returned.
pub async fn normalize_batch(
    normalizer: &(dyn Normalizer + Send + Sync),
    store: &dyn RecordStore,
    rows: &[String],
) -> Result<Vec<TextRecord>> {
    let collection = store.collection();
    let mut persisted = Vec::with_capacity(rows.len());

    for (idx, dirty_text) in rows.iter().enumerate() {
        let clean_text = normalizer.normalize(dirty_text);

        let id = match store.insert(dirty_text, &clean_text).await {
            Ok(id) => id,
            Err(e) => {
                warn!(
                    row = idx + 1,
                    persisted = persisted.len(),
                    "Batch stopped, store write failed: {}",
                    e
                );
                metrics::store_error(collection, "insert");
                return Err(e);
            }
        };
        debug!(row = idx + 1, id, "Cleaned batch row");
        metrics::text_cleaned(collection);

        persisted.push(TextRecord {
            id,
            dirty_text: dirty_text.clone(),
            clean_text,
        });
    }

    metrics::batch_processed(persisted.len());
    info!("Cleaned {} rows into {}", persisted.len(), collection);
    Ok(persisted)
}
