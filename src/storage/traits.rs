use async_trait::async_trait;

use super::{Collection, TextRecord};
use crate::error::Result;

/// Keyed store for one record collection.
///
/// Identifiers are assigned on insert, strictly increasing and never reused.
/// Missing identifiers surface as `CleanseError::NotFound`; backend failures as
/// `CleanseError::StoreUnavailable`. Implementations must be safe to call from
/// concurrent tasks.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// The collection this store is bound to
    fn collection(&self) -> Collection;

    async fn insert(&self, dirty_text: &str, clean_text: &str) -> Result<i64>;
    async fn get_by_id(&self, id: i64) -> Result<TextRecord>;
    /// All records in ascending identifier order
    async fn list_all(&self) -> Result<Vec<TextRecord>>;
    async fn update(&self, id: i64, dirty_text: &str, clean_text: &str) -> Result<()>;
    async fn delete(&self, id: i64) -> Result<()>;
}
