use std::fs;
use std::path::{Path, PathBuf};

use super::error::DatasetError;
use super::metrics::{MetricBatch, MetricStore};
use super::parse::{parse_metric_records, parse_relationships};
use super::relations::RelationshipGraph;

fn read_file(path: &Path) -> Result<String, DatasetError> {
    fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_metric_store(path: &Path, range_epsilon: f64) -> Result<MetricStore, DatasetError> {
    let raw = read_file(path)?;
    let records = parse_metric_records(&raw, path)?;
    let store = MetricStore::from_records(records, range_epsilon)?;
    tracing::info!(
        path = %path.display(),
        symbols = store.len(),
        metrics = store.key_count(),
        "loaded metric dataset"
    );
    Ok(store)
}

pub fn load_metric_batch(path: &Path) -> Result<MetricBatch, DatasetError> {
    let raw = read_file(path)?;
    let records = parse_metric_records(&raw, path)?;
    tracing::debug!(path = %path.display(), records = records.len(), "parsed metric batch");
    Ok(MetricBatch(records))
}

pub fn load_relationships(path: &Path) -> Result<RelationshipGraph, DatasetError> {
    let raw = read_file(path)?;
    let graph = RelationshipGraph::from_entries(parse_relationships(&raw, path)?);
    tracing::info!(path = %path.display(), entries = graph.len(), "loaded relationships");
    Ok(graph)
}

/// Metric file for a dataset preset: `kanji_metrics_<label>.json` next to
/// the default file, or the default file itself when no such file exists.
pub fn preset_metrics_path(default_path: &Path, label: &str) -> PathBuf {
    let file_name = format!("kanji_metrics_{label}.json");
    let candidate = match default_path.parent() {
        Some(dir) => dir.join(&file_name),
        None => PathBuf::from(&file_name),
    };

    if candidate.is_file() {
        candidate
    } else {
        tracing::debug!(
            preset = label,
            candidate = %candidate.display(),
            "no preset metrics file, using the default dataset"
        );
        default_path.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_path_prefers_labelled_file() {
        let dir = tempfile::tempdir().unwrap();
        let default_path = dir.path().join("kanji_metrics.json");
        fs::write(&default_path, "[]").unwrap();
        fs::write(dir.path().join("kanji_metrics_Ryumin.json"), "[]").unwrap();

        assert_eq!(
            preset_metrics_path(&default_path, "Ryumin"),
            dir.path().join("kanji_metrics_Ryumin.json")
        );
        assert_eq!(preset_metrics_path(&default_path, "Reisho"), default_path);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let error = load_metric_store(Path::new("/nonexistent/kanji.json"), 0.001).unwrap_err();
        assert!(matches!(error, DatasetError::Io { .. }));
    }

    #[test]
    fn empty_record_set_fails_the_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kanji_metrics.json");
        fs::write(&path, "[]").unwrap();

        let error = load_metric_store(&path, 0.001).unwrap_err();
        assert!(matches!(error, DatasetError::Empty));
    }
}
