//! Prometheus metrics for the cleansing service.
//!
//! Recording functions are no-ops until a recorder is installed, so library
//! code and tests can call them freely.

use std::fmt;
use std::net::SocketAddr;

use tracing::{info, warn};

use crate::storage::Collection;

/// Every metric name the service records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    TextsCleaned,
    BatchesProcessed,
    BatchRows,
    StoreErrors,
    LexiconTerms,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::TextsCleaned => "dyass_texts_cleaned_total",
            MetricName::BatchesProcessed => "dyass_batches_processed_total",
            MetricName::BatchRows => "dyass_batch_rows",
            MetricName::StoreErrors => "dyass_store_errors_total",
            MetricName::LexiconTerms => "dyass_lexicon_terms",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Install the Prometheus exporter with an HTTP listener on `port`.
pub fn init_metrics(port: u16) {
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    let builder = metrics_exporter_prometheus::PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => info!("Prometheus exporter listening on http://{}/metrics", addr),
        Err(e) => warn!("Prometheus exporter install failed (possibly already installed): {}", e),
    }
}

pub fn text_cleaned(collection: Collection) {
    ::metrics::counter!(MetricName::TextsCleaned.as_str(), "collection" => collection.table_name())
        .increment(1);
}

pub fn batch_processed(rows: usize) {
    ::metrics::counter!(MetricName::BatchesProcessed.as_str()).increment(1);
    ::metrics::histogram!(MetricName::BatchRows.as_str()).record(rows as f64);
}

pub fn store_error(collection: Collection, operation: &'static str) {
    ::metrics::counter!(
        MetricName::StoreErrors.as_str(),
        "collection" => collection.table_name(),
        "operation" => operation
    )
    .increment(1);
}

pub fn lexicon_loaded(informal: usize, disallowed: usize) {
    ::metrics::gauge!(MetricName::LexiconTerms.as_str(), "table" => "informal").set(informal as f64);
    ::metrics::gauge!(MetricName::LexiconTerms.as_str(), "table" => "disallowed").set(disallowed as f64);
}
