//! Read-only export surface
//!
//! Serializes colony state for external consumers. Pulls everything
//! through the engine's getters and performs no mutation.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::colony::{Colony, ColonyStats};
use crate::graph::Module;
use crate::learner::LearnerProfile;
use crate::trail::PheromoneTrail;

/// Full snapshot of colony state, borrowing from the engine.
#[derive(Debug, Serialize)]
pub struct ColonySnapshot<'a> {
    pub version: &'static str,
    pub exported_at: DateTime<Utc>,
    pub module_count: usize,
    pub trail_count: usize,
    pub learner_count: usize,
    pub average_pheromone: f64,
    pub stats: ColonyStats,
    pub modules: Vec<&'a Module>,
    pub trails: Vec<&'a PheromoneTrail>,
    pub learners: Vec<&'a LearnerProfile>,
}

/// Capture the current colony state.
///
/// The borrow is read-uncommitted with respect to any external
/// synchronization the caller layers on top: snapshot while no
/// optimization run is mutating the colony.
pub fn snapshot(colony: &Colony) -> ColonySnapshot<'_> {
    ColonySnapshot {
        version: env!("CARGO_PKG_VERSION"),
        exported_at: Utc::now(),
        module_count: colony.graph().len(),
        trail_count: colony.trails().len(),
        learner_count: colony.learner_count(),
        average_pheromone: colony.trails().average_pheromone(),
        stats: *colony.stats(),
        modules: colony.graph().modules().collect(),
        trails: colony.trails().iter().collect(),
        learners: colony.learners().collect(),
    }
}

/// Write a JSON snapshot to a file.
pub fn write_snapshot(colony: &Colony, path: &Path) -> Result<()> {
    let snap = snapshot(colony);
    let json = serde_json::to_string_pretty(&snap)?;
    std::fs::write(path, json)?;
    info!(
        "Exported {} modules, {} trails, {} learners to {:?}",
        snap.module_count, snap.trail_count, snap.learner_count, path
    );
    Ok(())
}

/// One row of the trail report.
#[derive(Debug, Serialize)]
pub struct TrailReportEntry {
    pub from: String,
    pub to: String,
    pub pheromone_level: f64,
    pub strength: f64,
    pub traversal_count: u64,
    pub success_rate: f64,
}

/// Strongest trails first, capped at `limit`.
pub fn trail_report(colony: &Colony, limit: usize) -> Vec<TrailReportEntry> {
    colony
        .trails()
        .strongest(limit)
        .into_iter()
        .map(|t| TrailReportEntry {
            from: t.from.clone(),
            to: t.to.clone(),
            pheromone_level: t.pheromone_level,
            strength: t.trail_strength(),
            traversal_count: t.traversal_count,
            success_rate: t.success_rate,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColonyConfig;
    use crate::graph::catalog::default_catalog;
    use crate::learner::LearningStyle;

    fn colony_with_history() -> Colony {
        let mut colony = Colony::with_seed(default_catalog(), ColonyConfig::default(), 11);
        colony.register_learner("ada", 2.0, LearningStyle::Practical);
        colony
            .record_progress("ada", "intro-programming", 90.0, 40, 1)
            .unwrap();
        colony
            .record_progress("ada", "variables-types", 88.0, 25, 1)
            .unwrap();
        colony
    }

    #[test]
    fn test_snapshot_counts() {
        let colony = colony_with_history();
        let snap = snapshot(&colony);

        assert_eq!(snap.module_count, 8);
        assert_eq!(snap.trail_count, 8 * 7);
        assert_eq!(snap.learner_count, 1);
        assert_eq!(snap.stats.learning_events, 2);
    }

    #[test]
    fn test_snapshot_serializes_to_json() {
        let colony = colony_with_history();
        let json = serde_json::to_string(&snapshot(&colony)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["module_count"], 8);
        assert!(value["trails"].as_array().unwrap().len() == 56);
    }

    #[test]
    fn test_write_snapshot_roundtrip() {
        let colony = colony_with_history();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");

        write_snapshot(&colony, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["learner_count"], 1);
    }

    #[test]
    fn test_trail_report_ranked_and_capped() {
        let colony = colony_with_history();
        let report = trail_report(&colony, 5);

        assert_eq!(report.len(), 5);
        for window in report.windows(2) {
            assert!(window[0].strength >= window[1].strength);
        }
        // The really-traversed edge ranks first
        assert_eq!(report[0].from, "intro-programming");
        assert_eq!(report[0].to, "variables-types");
    }
}
