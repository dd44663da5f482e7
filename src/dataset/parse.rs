use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::error::DatasetError;

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawSymbolRecord {
    #[serde(rename = "char", alias = "symbol", alias = "symbolKey")]
    pub(super) key: String,
    pub(super) metrics: HashMap<String, f64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub(super) struct RawRelations {
    #[serde(default)]
    pub(super) parents: Vec<String>,
    #[serde(default)]
    pub(super) children: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawHistogramRow {
    #[serde(rename = "char", alias = "symbol", alias = "symbolKey")]
    key: String,
    #[serde(flatten)]
    relations: RawRelations,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawRelationshipDocument {
    Histogram { characters: Vec<RawHistogramRow> },
    Map(HashMap<String, RawRelations>),
}

pub(super) fn parse_metric_records(raw: &str, path: &Path) -> Result<Vec<RawSymbolRecord>, DatasetError> {
    serde_json::from_str(raw).map_err(|source| DatasetError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub(super) fn parse_relationships(
    raw: &str,
    path: &Path,
) -> Result<Vec<(String, RawRelations)>, DatasetError> {
    let document: RawRelationshipDocument =
        serde_json::from_str(strip_script_assignment(raw)).map_err(|source| DatasetError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(match document {
        RawRelationshipDocument::Histogram { characters } => characters
            .into_iter()
            .map(|row| (row.key, row.relations))
            .collect(),
        RawRelationshipDocument::Map(map) => map.into_iter().collect(),
    })
}

fn strip_script_assignment(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return trimmed;
    }

    let body = trimmed
        .split_once('=')
        .map(|(_, rest)| rest)
        .unwrap_or(trimmed)
        .trim();
    body.strip_suffix(';').unwrap_or(body).trim_end()
}
