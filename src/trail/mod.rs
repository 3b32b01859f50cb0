//! Pheromone trail store
//!
//! One trail record per ordered pair of distinct modules. Trails hold the
//! mutable pheromone level the optimizer reads and writes, plus traversal
//! statistics fed by real learner outcomes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::graph::ModuleGraph;

/// Pheromone levels never decay below this floor.
pub const MIN_PHEROMONE: f64 = 0.01;
/// Pheromone levels never accumulate past this ceiling.
pub const MAX_PHEROMONE: f64 = 10.0;
/// Level assigned to every trail at colony initialization.
pub const INITIAL_PHEROMONE: f64 = 1.0;
/// Defensive default when a pair has no trail record. Eager initialization
/// should make this unreachable, but selection must never fail on a miss.
pub const DEFAULT_PHEROMONE: f64 = 0.5;

/// A directed pheromone trail between two distinct modules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PheromoneTrail {
    pub from: String,
    pub to: String,
    pub pheromone_level: f64,
    pub traversal_count: u64,
    /// Running success fraction over recorded traversals, in [0, 1].
    pub success_rate: f64,
    pub total_score: f64,
    /// Biased running average: each update computes `(old + new) / 2`,
    /// which double-weights recent traversals. Preserved as-is for
    /// compatibility with the original system rather than replaced by a
    /// true running mean.
    pub average_completion_minutes: u32,
    pub last_updated: DateTime<Utc>,
}

impl PheromoneTrail {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            pheromone_level: INITIAL_PHEROMONE,
            traversal_count: 0,
            success_rate: 0.0,
            total_score: 0.0,
            average_completion_minutes: 0,
            last_updated: Utc::now(),
        }
    }

    /// Decay the pheromone level by `rate`, clamped to the floor.
    /// Applied to every trail each iteration, used or not.
    pub fn evaporate(&mut self, rate: f64) {
        self.pheromone_level = (self.pheromone_level * (1.0 - rate)).max(MIN_PHEROMONE);
        self.last_updated = Utc::now();
    }

    /// Deposit pheromone from a scored path, clamped to the valid range.
    pub fn reinforce(&mut self, amount: f64) {
        self.pheromone_level =
            (self.pheromone_level + amount).clamp(MIN_PHEROMONE, MAX_PHEROMONE);
        self.last_updated = Utc::now();
    }

    /// Record a real learner traversal of this edge, distinct from the
    /// optimizer's simulated reinforcement.
    pub fn record_traversal(&mut self, score: f64, completion_minutes: u32, success: bool) {
        // Reconstruct the prior success count from the stored rate before
        // folding in this traversal.
        let successes_before = (self.success_rate * self.traversal_count as f64).round() as u64;

        self.traversal_count += 1;
        self.success_rate =
            (successes_before + u64::from(success)) as f64 / self.traversal_count as f64;
        self.total_score += score;
        self.average_completion_minutes = (self.average_completion_minutes + completion_minutes) / 2;
        self.last_updated = Utc::now();
    }

    /// Mean score across recorded traversals.
    pub fn average_score(&self) -> f64 {
        if self.traversal_count == 0 {
            0.0
        } else {
            self.total_score / self.traversal_count as f64
        }
    }

    /// Combined ranking metric for analytics and trail reports.
    /// Not consulted by selection probability.
    pub fn trail_strength(&self) -> f64 {
        self.pheromone_level * (1.0 + self.success_rate)
    }
}

/// Store of every directed trail in the colony.
///
/// Trails are created eagerly for all n x (n-1) ordered module pairs and
/// never destroyed, so evaporation can iterate the map directly without
/// snapshotting the key set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrailStore {
    trails: BTreeMap<(String, String), PheromoneTrail>,
}

impl TrailStore {
    /// Build the full trail matrix for a module graph.
    pub fn for_graph(graph: &ModuleGraph) -> Self {
        let mut trails = BTreeMap::new();
        for from in graph.ids() {
            for to in graph.ids() {
                if from != to {
                    trails.insert(
                        (from.to_string(), to.to_string()),
                        PheromoneTrail::new(from, to),
                    );
                }
            }
        }
        Self { trails }
    }

    pub fn get(&self, from: &str, to: &str) -> Option<&PheromoneTrail> {
        self.trails.get(&(from.to_string(), to.to_string()))
    }

    pub fn get_mut(&mut self, from: &str, to: &str) -> Option<&mut PheromoneTrail> {
        self.trails.get_mut(&(from.to_string(), to.to_string()))
    }

    /// Pheromone level for a pair, with the defensive default for misses.
    pub fn pheromone_level(&self, from: &str, to: &str) -> f64 {
        self.get(from, to)
            .map(|t| t.pheromone_level)
            .unwrap_or(DEFAULT_PHEROMONE)
    }

    /// Evaporate every trail in the store by `rate`.
    pub fn evaporate_all(&mut self, rate: f64) {
        for trail in self.trails.values_mut() {
            trail.evaporate(rate);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &PheromoneTrail> {
        self.trails.values()
    }

    pub fn len(&self) -> usize {
        self.trails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trails.is_empty()
    }

    /// Trails ranked by strength, strongest first.
    pub fn strongest(&self, limit: usize) -> Vec<&PheromoneTrail> {
        let mut ranked: Vec<&PheromoneTrail> = self.trails.values().collect();
        ranked.sort_by(|a, b| {
            b.trail_strength()
                .partial_cmp(&a.trail_strength())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(limit);
        ranked
    }

    /// Mean pheromone level over all trails.
    pub fn average_pheromone(&self) -> f64 {
        if self.trails.is_empty() {
            return 0.0;
        }
        self.trails.values().map(|t| t.pheromone_level).sum::<f64>() / self.trails.len() as f64
    }
}
