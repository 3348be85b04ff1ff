//! DYass (Data Yassification): cleanses noisy, informal Indonesian
//! social-media text and keeps both the original and the cleaned form.

pub mod config;
pub mod constants;
pub mod error;
pub mod lexicon;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod server;
pub mod storage;
pub mod tabular;

// Application layer over the pipeline and the record stores
pub mod app;

pub use error::{CleanseError, Result};
