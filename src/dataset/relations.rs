use std::collections::{HashMap, HashSet};

use super::metrics::MetricStore;
use super::parse::RawRelations;

#[derive(Clone, Debug, Default)]
pub struct Relations {
    pub parents: Vec<String>,
    pub children: Vec<String>,
}

/// Parent/child links between symbols. Read-only after load; keys referenced
/// here need not exist in the metric dataset.
#[derive(Clone, Debug, Default)]
pub struct RelationshipGraph {
    entries: HashMap<String, Relations>,
}

/// Symbols to highlight around a selection, as indices into the
/// [`MetricStore`]. `links` keeps the relationship order (parents first) and
/// is what the overlay draws lines to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RelatedSet {
    pub members: HashSet<usize>,
    pub links: Vec<usize>,
}

impl RelatedSet {
    pub fn contains(&self, index: usize) -> bool {
        self.members.contains(&index)
    }
}

impl RelationshipGraph {
    pub(super) fn from_entries(entries: Vec<(String, RawRelations)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(key, raw)| {
                    (
                        key,
                        Relations {
                            parents: raw.parents,
                            children: raw.children,
                        },
                    )
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The selected symbol plus every parent and child present in `store`.
    /// Dangling references are dropped. Returns an empty set when the
    /// selected symbol itself is not in the store.
    pub fn resolve_related(&self, symbol: &str, store: &MetricStore) -> RelatedSet {
        let Some(selected) = store.index_of(symbol) else {
            return RelatedSet::default();
        };

        let mut members = HashSet::from([selected]);
        let mut links = Vec::new();
        if let Some(relations) = self.entries.get(symbol) {
            for related in relations.parents.iter().chain(&relations.children) {
                if let Some(index) = store.index_of(related) {
                    members.insert(index);
                    links.push(index);
                }
            }
        }

        RelatedSet { members, links }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::dataset::metrics::tests::sample_store;

    fn graph(key: &str, parents: &[&str], children: &[&str]) -> RelationshipGraph {
        let owned = |keys: &[&str]| -> Vec<String> { keys.iter().map(|key| key.to_string()).collect() };
        RelationshipGraph::from_entries(vec![(
            key.to_string(),
            RawRelations {
                parents: owned(parents),
                children: owned(children),
            },
        )])
    }

    #[test]
    fn related_set_includes_parents_and_children_present() {
        let store = sample_store();
        let graph = graph("日", &["口"], &["一"]);

        let related = graph.resolve_related("日", &store);
        let expected = ["日", "口", "一"]
            .iter()
            .map(|key| store.index_of(key).unwrap())
            .collect::<HashSet<_>>();
        assert_eq!(related.members, expected);
        assert_eq!(
            related.links,
            vec![store.index_of("口").unwrap(), store.index_of("一").unwrap()]
        );
    }

    #[test]
    fn dangling_references_are_dropped() {
        let store = sample_store();
        let graph = graph("日", &["曰", "口"], &["明", "晶"]);

        let related = graph.resolve_related("日", &store);
        assert_eq!(related.members.len(), 2);
        assert_eq!(related.links, vec![store.index_of("口").unwrap()]);
    }

    #[test]
    fn unknown_selection_resolves_to_nothing() {
        let store = sample_store();
        let graph = graph("猫", &["日"], &[]);
        assert_eq!(graph.resolve_related("猫", &store), RelatedSet::default());
    }

    proptest! {
        #[test]
        fn selected_symbol_is_always_related_to_itself(
            pick in 0usize..3,
            with_entry in any::<bool>(),
        ) {
            let store = sample_store();
            let key = store.symbols()[pick].key.clone();
            let graph = if with_entry {
                graph(&key, &["無"], &[])
            } else {
                RelationshipGraph::default()
            };

            let related = graph.resolve_related(&key, &store);
            prop_assert!(related.contains(pick));
        }
    }
}
