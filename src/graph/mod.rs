//! Module graph
//!
//! Static mapping of module ids to their metadata. Loaded once at colony
//! construction and read-only for the lifetime of the engine.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::ColonyError;

pub mod catalog;

pub use catalog::{default_catalog, load_catalog};

/// A single learning module. Immutable once the graph is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    pub id: String,
    pub title: String,
    /// Difficulty on a 1-5 scale.
    pub difficulty: u8,
    /// Expected time to complete, in minutes.
    pub estimated_minutes: u32,
    /// Module ids that must be completed first.
    #[serde(default)]
    pub prerequisites: BTreeSet<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub learning_objectives: Vec<String>,
    #[serde(default)]
    pub category: String,
}

impl Module {
    /// True if the module carries the given tag (case-insensitive).
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// Read-only lookup table over the module catalog.
///
/// Backed by a BTreeMap so iteration order is stable, which keeps seeded
/// optimization runs reproducible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleGraph {
    modules: BTreeMap<String, Module>,
}

impl ModuleGraph {
    /// Build a graph from module definitions.
    ///
    /// Fails on an empty catalog or a prerequisite pointing at a module
    /// that is not in the catalog. Cycles are assumed absent.
    pub fn new(modules: Vec<Module>) -> Result<Self, ColonyError> {
        if modules.is_empty() {
            return Err(ColonyError::EmptyGraph);
        }

        let map: BTreeMap<String, Module> =
            modules.into_iter().map(|m| (m.id.clone(), m)).collect();

        for module in map.values() {
            for prereq in &module.prerequisites {
                if !map.contains_key(prereq) {
                    return Err(ColonyError::UnknownModule(prereq.clone()));
                }
            }
        }

        Ok(Self { modules: map })
    }

    pub fn get(&self, id: &str) -> Option<&Module> {
        self.modules.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.modules.contains_key(id)
    }

    /// All modules, in stable id order.
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    /// All module ids, in stable order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(id: &str, prereqs: &[&str]) -> Module {
        Module {
            id: id.to_string(),
            title: id.to_string(),
            difficulty: 1,
            estimated_minutes: 30,
            prerequisites: prereqs.iter().map(|s| s.to_string()).collect(),
            tags: BTreeSet::new(),
            learning_objectives: vec![],
            category: String::new(),
        }
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert!(matches!(
            ModuleGraph::new(vec![]),
            Err(ColonyError::EmptyGraph)
        ));
    }

    #[test]
    fn test_dangling_prerequisite_rejected() {
        let result = ModuleGraph::new(vec![module("a", &["ghost"])]);
        assert!(matches!(result, Err(ColonyError::UnknownModule(id)) if id == "ghost"));
    }

    #[test]
    fn test_lookup_and_order() {
        let graph = ModuleGraph::new(vec![
            module("b", &["a"]),
            module("a", &[]),
        ])
        .unwrap();

        assert_eq!(graph.len(), 2);
        assert!(graph.contains("a"));
        assert!(graph.get("b").unwrap().prerequisites.contains("a"));

        // Stable id order regardless of insertion order
        let ids: Vec<&str> = graph.ids().collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_has_tag_case_insensitive() {
        let mut m = module("a", &[]);
        m.tags.insert("Hands-On".to_string());
        assert!(m.has_tag("hands-on"));
        assert!(!m.has_tag("theory"));
    }
}
