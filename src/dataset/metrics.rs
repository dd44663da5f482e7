use std::collections::{BTreeSet, HashMap};

use super::error::DatasetError;
use super::parse::RawSymbolRecord;

const METRIC_CATALOG: &[(&str, &str)] = &[
    ("horizontal_ratio", "Horizontal (横線率)"),
    ("vertical_ratio", "Vertical (縦線率)"),
    ("diagonal_ratio", "Diagonal (斜線率)"),
    ("scale_factor", "Scale (スケール)"),
    ("density", "Density (画素密度)"),
    ("cog_x", "Center of Gravity X (重心X)"),
    ("cog_y", "Center of Gravity Y (重心Y)"),
    ("skeleton_length", "Skeleton Length (骨格長)"),
    ("holes", "Holes (閉領域数)"),
    ("discreteness", "Discreteness (パーツ数)"),
    ("inertia", "Inertia (拡散率)"),
    ("endpoints", "Endpoints (端点数)"),
];

/// Index of a metric key inside a [`MetricStore`]. Stable across reloads
/// because a reload may never change the key set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MetricKey(usize);

impl MetricKey {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MetricRange {
    pub min: f64,
    pub max: f64,
}

impl MetricRange {
    /// Strict min/max over `values`; `max` is nudged by `epsilon` when the
    /// values are all equal so the range never has zero width.
    pub fn from_values(values: impl IntoIterator<Item = f64>, epsilon: f64) -> Option<Self> {
        let mut iter = values.into_iter();
        let first = iter.next()?;
        let (min, mut max) = iter.fold((first, first), |(min, max), value| {
            (min.min(value), max.max(value))
        });
        if max <= min {
            max = min + epsilon;
        }
        Some(Self { min, max })
    }

    /// Maps `value` into `[0, 1]`, clamping anything outside the range.
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }
}

#[derive(Clone, Debug)]
pub struct SymbolMetrics {
    pub key: String,
    values: Vec<f64>,
}

impl SymbolMetrics {
    pub fn value(&self, key: MetricKey) -> f64 {
        self.values[key.0]
    }
}

#[derive(Clone, Debug)]
pub struct MetricBatch(pub(super) Vec<RawSymbolRecord>);

#[derive(Clone, Debug)]
pub struct ReloadSummary {
    pub updated: usize,
    pub untouched: usize,
    pub unknown: usize,
}

#[derive(Clone, Debug)]
pub struct MetricStore {
    keys: Vec<String>,
    ranges: Vec<MetricRange>,
    symbols: Vec<SymbolMetrics>,
    index_by_symbol: HashMap<String, usize>,
    epsilon: f64,
}

impl MetricStore {
    pub(super) fn from_records(
        records: Vec<RawSymbolRecord>,
        epsilon: f64,
    ) -> Result<Self, DatasetError> {
        let first = records.first().ok_or(DatasetError::Empty)?;
        if first.metrics.len() < 2 {
            return Err(DatasetError::TooFewKeys {
                found: first.metrics.len(),
            });
        }

        let keys = ordered_keys(first.metrics.keys().map(String::as_str));
        let mut symbols = Vec::with_capacity(records.len());
        let mut index_by_symbol = HashMap::with_capacity(records.len());

        for record in records {
            let values = values_in_order(&keys, &record)?;
            if index_by_symbol.contains_key(&record.key) {
                tracing::warn!(symbol = %record.key, "duplicate symbol in metric dataset, keeping the first");
                continue;
            }
            index_by_symbol.insert(record.key.clone(), symbols.len());
            symbols.push(SymbolMetrics {
                key: record.key,
                values,
            });
        }

        let mut store = Self {
            ranges: Vec::with_capacity(keys.len()),
            keys,
            symbols,
            index_by_symbol,
            epsilon,
        };
        store.ranges = (0..store.keys.len())
            .map(|index| store.compute_range(MetricKey(index)))
            .collect();
        Ok(store)
    }

    fn compute_range(&self, key: MetricKey) -> MetricRange {
        MetricRange::from_values(self.symbols.iter().map(|symbol| symbol.value(key)), self.epsilon)
            .unwrap_or(MetricRange {
                min: 0.0,
                max: self.epsilon,
            })
    }

    /// Replaces metric values wholesale from an alternate dataset. The whole
    /// batch is validated before anything is written so a rejected reload
    /// leaves the store untouched. Ranges are recomputed only for
    /// `volatile_keys`; every other key keeps its original range.
    pub fn replace_values(
        &mut self,
        batch: MetricBatch,
        volatile_keys: &[String],
    ) -> Result<ReloadSummary, DatasetError> {
        let records = batch.0;
        if records.is_empty() {
            return Err(DatasetError::Empty);
        }

        let mut staged = Vec::with_capacity(records.len());
        let mut unknown = 0usize;
        for record in &records {
            self.check_key_set(record)?;
            match self.index_by_symbol.get(&record.key) {
                Some(&index) => staged.push((index, values_in_order(&self.keys, record)?)),
                None => unknown += 1,
            }
        }

        let updated = staged.len();
        for (index, values) in staged {
            self.symbols[index].values = values;
        }

        for name in volatile_keys {
            if let Some(key) = self.find_key(name) {
                let range = self.compute_range(key);
                self.ranges[key.0] = range;
            }
        }

        Ok(ReloadSummary {
            updated,
            untouched: self.symbols.len().saturating_sub(updated),
            unknown,
        })
    }

    fn check_key_set(&self, record: &RawSymbolRecord) -> Result<(), DatasetError> {
        let expected = self.keys.iter().map(String::as_str).collect::<BTreeSet<_>>();
        let actual = record.metrics.keys().map(String::as_str).collect::<BTreeSet<_>>();
        if expected == actual {
            return Ok(());
        }

        Err(DatasetError::KeySetChanged {
            missing: expected.difference(&actual).map(|key| key.to_string()).collect(),
            extra: actual.difference(&expected).map(|key| key.to_string()).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn symbols(&self) -> &[SymbolMetrics] {
        &self.symbols
    }

    pub fn index_of(&self, symbol: &str) -> Option<usize> {
        self.index_by_symbol.get(symbol).copied()
    }

    pub fn keys(&self) -> impl ExactSizeIterator<Item = MetricKey> + '_ {
        (0..self.keys.len()).map(MetricKey)
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub fn key_at(&self, index: usize) -> MetricKey {
        MetricKey(index % self.keys.len())
    }

    pub fn find_key(&self, name: &str) -> Option<MetricKey> {
        self.keys.iter().position(|key| key == name).map(MetricKey)
    }

    pub fn key_name(&self, key: MetricKey) -> &str {
        &self.keys[key.0]
    }

    pub fn label(&self, key: MetricKey) -> &str {
        let name = self.key_name(key);
        METRIC_CATALOG
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, label)| *label)
            .unwrap_or(name)
    }

    pub fn range(&self, key: MetricKey) -> MetricRange {
        self.ranges[key.0]
    }
}

fn ordered_keys<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let names = names.collect::<BTreeSet<_>>();
    let mut keys = METRIC_CATALOG
        .iter()
        .filter(|(known, _)| names.contains(known))
        .map(|(known, _)| known.to_string())
        .collect::<Vec<_>>();
    keys.extend(
        names
            .into_iter()
            .filter(|name| !METRIC_CATALOG.iter().any(|(known, _)| known == name))
            .map(str::to_string),
    );
    keys
}

fn values_in_order(keys: &[String], record: &RawSymbolRecord) -> Result<Vec<f64>, DatasetError> {
    if record.metrics.len() != keys.len() {
        return Err(DatasetError::InconsistentKeys {
            symbol: record.key.clone(),
        });
    }

    keys.iter()
        .map(|key| {
            record
                .metrics
                .get(key)
                .copied()
                .ok_or_else(|| DatasetError::InconsistentKeys {
                    symbol: record.key.clone(),
                })
        })
        .collect()
}
