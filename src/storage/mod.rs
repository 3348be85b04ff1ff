// Record persistence: the store contract and its SQLite/in-memory backends

pub mod in_memory;
pub mod sqlite;
pub mod traits;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{FILE_TABLE, TEXT_TABLE};

pub use in_memory::InMemoryRecordStore;
pub use sqlite::{SqliteDatabase, SqliteRecordStore};
pub use traits::RecordStore;

/// A stored dirty/clean text pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRecord {
    #[serde(rename = "text_id")]
    pub id: i64,
    pub dirty_text: String,
    pub clean_text: String,
}

/// The two record partitions. Each has its own identifier sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    /// Single texts submitted one at a time
    Text,
    /// Rows taken from uploaded tables
    File,
}

impl Collection {
    pub fn table_name(&self) -> &'static str {
        match self {
            Collection::Text => TEXT_TABLE,
            Collection::File => FILE_TABLE,
        }
    }

    pub fn all() -> [Collection; 2] {
        [Collection::Text, Collection::File]
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}
