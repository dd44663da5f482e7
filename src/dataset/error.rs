use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("metric dataset contains no records")]
    Empty,
    #[error("metric dataset must provide at least two metric keys, found {found}")]
    TooFewKeys { found: usize },
    #[error("symbol {symbol:?} does not carry the same metric keys as the first record")]
    InconsistentKeys { symbol: String },
    #[error("reloaded dataset changes the metric key set (missing {missing:?}, extra {extra:?})")]
    KeySetChanged {
        missing: Vec<String>,
        extra: Vec<String>,
    },
}
