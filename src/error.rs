use thiserror::Error;

use crate::storage::Collection;

#[derive(Error, Debug)]
pub enum CleanseError {
    #[error("Failed to load lookup table '{source_name}': {message}")]
    Load { source_name: String, message: String },

    #[error("No record {id} in {collection}")]
    NotFound { collection: Collection, id: i64 },

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Record store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CleanseError {
    pub fn load(source_name: impl Into<String>, message: impl ToString) -> Self {
        CleanseError::Load {
            source_name: source_name.into(),
            message: message.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CleanseError::NotFound { .. })
    }
}

impl From<rusqlite::Error> for CleanseError {
    fn from(err: rusqlite::Error) -> Self {
        CleanseError::StoreUnavailable(err.to_string())
    }
}

// Uploaded tables are the only place csv errors surface outside of lexicon
// loading, which maps its own errors to `Load`.
impl From<csv::Error> for CleanseError {
    fn from(err: csv::Error) -> Self {
        CleanseError::MalformedInput(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CleanseError>;
