//! Colony engine
//!
//! The algorithmic core: repeated probabilistic path construction over the
//! module graph, path scoring, and the evaporate-then-reinforce pheromone
//! update cycle. One engine instance owns the graph, the trail store, and
//! the learner roster; callers pass it explicitly rather than going
//! through any global state.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

use crate::config::ColonyConfig;
use crate::error::ColonyError;
use crate::graph::{Module, ModuleGraph};
use crate::learner::{LearnerProfile, LearningStyle};
use crate::trail::TrailStore;

pub mod attractiveness;
pub mod evaluation;

pub use attractiveness::attractiveness;
pub use evaluation::evaluate_path;

/// Hard cap on constructed path length, preventing unbounded walks.
pub const MAX_PATH_LENGTH: usize = 10;

/// Skill level assigned to learners created implicitly by their first
/// progress event.
pub const DEFAULT_SKILL_LEVEL: f64 = 5.0;

/// Aggregate counters across the colony's lifetime.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ColonyStats {
    /// Non-empty candidate paths constructed across all runs.
    pub paths_generated: u64,
    /// Progress events recorded.
    pub learning_events: u64,
    /// Completed optimization runs.
    pub optimization_runs: u64,
}

/// Outcome of one optimization run. An empty path is the valid
/// "no route found" result, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub path: Vec<String>,
    pub score: f64,
    pub iterations: u32,
    pub reached_target: bool,
}

impl OptimizationResult {
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

/// Outcome of recording a progress event, for caller display.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProgressOutcome {
    pub success: bool,
    pub skill_level: f64,
}

/// The ant-colony engine over one module graph.
pub struct Colony {
    graph: ModuleGraph,
    trails: TrailStore,
    learners: BTreeMap<String, LearnerProfile>,
    config: ColonyConfig,
    rng: StdRng,
    stats: ColonyStats,
}

impl Colony {
    /// Build a colony over a graph, eagerly creating the full trail matrix.
    pub fn new(graph: ModuleGraph, config: ColonyConfig) -> Self {
        Self::with_rng(graph, config, StdRng::from_entropy())
    }

    /// Build a colony with a fixed RNG seed for reproducible runs.
    pub fn with_seed(graph: ModuleGraph, config: ColonyConfig, seed: u64) -> Self {
        Self::with_rng(graph, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(graph: ModuleGraph, config: ColonyConfig, rng: StdRng) -> Self {
        let trails = TrailStore::for_graph(&graph);
        debug!(
            "Colony initialized: {} modules, {} trails",
            graph.len(),
            trails.len()
        );
        Self {
            graph,
            trails,
            learners: BTreeMap::new(),
            config,
            rng,
            stats: ColonyStats::default(),
        }
    }

    /// Register a learner explicitly. If the id already exists, the
    /// existing profile is kept unchanged.
    pub fn register_learner(
        &mut self,
        learner_id: &str,
        skill_level: f64,
        learning_style: LearningStyle,
    ) -> &mut LearnerProfile {
        self.learners
            .entry(learner_id.to_string())
            .or_insert_with(|| LearnerProfile::new(learner_id, skill_level, learning_style))
    }

    /// Record a real learner outcome on a module.
    ///
    /// Creates the learner on first contact. On success the module joins
    /// the completed set, the learner's current-module pointer advances,
    /// and, if there was a prior current module, a real traversal is
    /// recorded on that edge's trail.
    pub fn record_progress(
        &mut self,
        learner_id: &str,
        module_id: &str,
        score: f64,
        completion_minutes: u32,
        attempts: u32,
    ) -> Result<ProgressOutcome, ColonyError> {
        if !self.graph.contains(module_id) {
            return Err(ColonyError::UnknownModule(module_id.to_string()));
        }

        let learner = self
            .learners
            .entry(learner_id.to_string())
            .or_insert_with(|| {
                info!("Creating learner {} on first progress event", learner_id);
                LearnerProfile::new(learner_id, DEFAULT_SKILL_LEVEL, LearningStyle::Mixed)
            });

        let previous = learner.current_module.clone();
        let record = learner.record_performance(module_id, score, completion_minutes, attempts);
        let success = record.success;
        let skill_level = learner.skill_level;

        if success {
            learner.current_module = Some(module_id.to_string());

            // A real traversal of the (previous -> module) edge, distinct
            // from the optimizer's simulated reinforcement
            if let Some(prev) = previous {
                if prev != module_id {
                    if let Some(trail) = self.trails.get_mut(&prev, module_id) {
                        trail.record_traversal(score, completion_minutes, true);
                    }
                }
            }
        }

        self.stats.learning_events += 1;
        debug!(
            "Progress: learner={} module={} score={} success={}",
            learner_id, module_id, score, success
        );

        Ok(ProgressOutcome {
            success,
            skill_level,
        })
    }

    /// Run the optimization loop for a learner heading toward a target.
    ///
    /// Each iteration constructs one candidate path, scores it, and applies
    /// the pheromone update cycle (evaporate everything, reinforce the
    /// iteration's own edges). The best-scoring path across the budget is
    /// returned; an empty result means no feasible route was found.
    pub fn optimize(
        &mut self,
        learner_id: &str,
        target: &str,
        iterations: Option<u32>,
    ) -> Result<OptimizationResult, ColonyError> {
        if !self.graph.contains(target) {
            return Err(ColonyError::UnknownModule(target.to_string()));
        }
        let learner = self
            .learners
            .get(learner_id)
            .ok_or_else(|| ColonyError::UnknownLearner(learner_id.to_string()))?
            .clone();

        let budget = iterations.unwrap_or(self.config.max_iterations);
        let mut best_path: Vec<String> = Vec::new();
        let mut best_score = 0.0_f64;

        for iteration in 0..budget {
            // A single bad iteration must not discard the best path so far
            match self.run_iteration(&learner, target) {
                Ok((path, score)) => {
                    if !path.is_empty() {
                        self.stats.paths_generated += 1;
                    }
                    if score > best_score {
                        debug!(
                            "Iteration {}: new best score {:.4} ({} modules)",
                            iteration,
                            score,
                            path.len()
                        );
                        best_score = score;
                        best_path = path;
                    }
                }
                Err(e) => {
                    warn!("Iteration {} failed, continuing: {}", iteration, e);
                }
            }
        }

        self.stats.optimization_runs += 1;
        let reached_target = best_path.last().map(|m| m == target).unwrap_or(false);
        info!(
            "Optimization for {} -> {}: best score {:.4}, {} modules, reached={}",
            learner_id,
            target,
            best_score,
            best_path.len(),
            reached_target
        );

        Ok(OptimizationResult {
            path: best_path,
            score: best_score,
            iterations: budget,
            reached_target,
        })
    }

    /// One construct-evaluate-update cycle.
    fn run_iteration(
        &mut self,
        learner: &LearnerProfile,
        target: &str,
    ) -> Result<(Vec<String>, f64), ColonyError> {
        let path = self.construct_path(learner, target);
        let score = evaluation::evaluate_path(&self.graph, learner, &path);

        // Update cycle: every trail decays, then the edges this iteration
        // actually walked get a deposit proportional to the path's quality,
        // whether or not it beat the best so far
        self.trails.evaporate_all(self.config.evaporation_rate);
        let deposit = score * self.config.reinforcement_factor;
        for pair in path.windows(2) {
            if let Some(trail) = self.trails.get_mut(&pair[0], &pair[1]) {
                trail.reinforce(deposit);
            }
        }

        Ok((path, score))
    }

    /// Build one candidate path via roulette-wheel selection.
    ///
    /// Modules already on the path count as (hypothetically) completed for
    /// prerequisite checks, so a walk can unlock its own next step. The
    /// walk stops at the target, at the length cap, or when no candidate
    /// remains; a partial or empty path is a valid outcome.
    fn construct_path(&mut self, learner: &LearnerProfile, target: &str) -> Vec<String> {
        if learner.completed_modules.contains(target) {
            return Vec::new();
        }
        if learner.current_module.as_deref() == Some(target) {
            return Vec::new();
        }

        let Colony {
            graph,
            trails,
            config,
            rng,
            ..
        } = self;

        // Degenerate seed: a learner with no position starts the walk at
        // the target itself
        let mut current: String = learner
            .current_module
            .clone()
            .unwrap_or_else(|| target.to_string());

        let mut path: Vec<String> = Vec::new();
        let mut simulated: BTreeSet<String> = learner.completed_modules.clone();

        while path.len() < MAX_PATH_LENGTH {
            let candidates: Vec<&Module> = graph
                .modules()
                .filter(|m| !simulated.contains(&m.id))
                .filter(|m| m.prerequisites.iter().all(|p| simulated.contains(p)))
                .collect();

            if candidates.is_empty() {
                break;
            }

            let weights = selection_weights(trails, config, &current, &candidates, learner);
            let next = candidates[roulette(rng, &weights)].id.clone();

            path.push(next.clone());
            simulated.insert(next.clone());
            current = next;

            if current == target {
                break;
            }
        }

        path
    }

    pub fn graph(&self) -> &ModuleGraph {
        &self.graph
    }

    pub fn trails(&self) -> &TrailStore {
        &self.trails
    }

    pub fn learner(&self, learner_id: &str) -> Option<&LearnerProfile> {
        self.learners.get(learner_id)
    }

    pub fn learner_mut(&mut self, learner_id: &str) -> Option<&mut LearnerProfile> {
        self.learners.get_mut(learner_id)
    }

    pub fn learners(&self) -> impl Iterator<Item = &LearnerProfile> {
        self.learners.values()
    }

    pub fn learner_count(&self) -> usize {
        self.learners.len()
    }

    pub fn stats(&self) -> &ColonyStats {
        &self.stats
    }

    pub fn config(&self) -> &ColonyConfig {
        &self.config
    }
}

/// Unnormalized selection weights: pheromone^alpha x attractiveness^beta
/// for each candidate, with the defensive default level for missing trails.
fn selection_weights(
    trails: &TrailStore,
    config: &ColonyConfig,
    current: &str,
    candidates: &[&Module],
    learner: &LearnerProfile,
) -> Vec<f64> {
    candidates
        .iter()
        .map(|m| {
            let pheromone = trails.pheromone_level(current, &m.id);
            pheromone.powf(config.alpha) * attractiveness(m, learner).powf(config.beta)
        })
        .collect()
}

/// Roulette-wheel sampling over weights.
///
/// Zero total weight degrades to a uniform draw; floating-point shortfall
/// at the end of the wheel falls back to the first candidate. Never fails
/// for a non-empty candidate set.
fn roulette(rng: &mut StdRng, weights: &[f64]) -> usize {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return rng.gen_range(0..weights.len());
    }

    let draw: f64 = rng.gen();
    let mut cumulative = 0.0;
    for (index, weight) in weights.iter().enumerate() {
        cumulative += weight / total;
        if cumulative >= draw {
            return index;
        }
    }

    0
}
