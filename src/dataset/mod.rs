mod collect;
mod error;
mod metrics;
mod parse;
mod relations;

pub use collect::{load_metric_batch, load_metric_store, load_relationships, preset_metrics_path};
pub use error::DatasetError;
pub use metrics::{MetricBatch, MetricKey, MetricStore, ReloadSummary, SymbolMetrics};
pub use relations::{RelatedSet, RelationshipGraph};

#[cfg(test)]
pub(crate) use metrics::tests::{metric_batch, mixed_store, sample_store};
