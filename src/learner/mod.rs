//! Learner profiles
//!
//! Per-learner mutable state: skill level, learning style, completed
//! modules, and performance history. The optimizer reads this state to
//! bias module selection; progress recording is the only thing that
//! mutates it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::graph::{Module, ModuleGraph};

/// Minimum score counted as a successful attempt.
pub const PASSING_SCORE: f64 = 70.0;

const MIN_SKILL: f64 = 1.0;
const MAX_SKILL: f64 = 10.0;

/// How a learner prefers to be taught.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LearningStyle {
    Visual,
    Practical,
    Theoretical,
    #[default]
    Mixed,
}

impl FromStr for LearningStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "visual" => Ok(Self::Visual),
            "practical" => Ok(Self::Practical),
            "theoretical" => Ok(Self::Theoretical),
            "mixed" => Ok(Self::Mixed),
            other => Err(format!("unknown learning style: {}", other)),
        }
    }
}

/// A target the learner is working toward. Tagged variants rather than an
/// open key-value bag so each goal kind carries a typed payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum LearningGoal {
    TargetModule(String),
    SkillLevel(f64),
    ModulesPerWeek(u32),
}

/// Fixed-field learner preferences.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preferences {
    /// Longest session the learner wants to sit through, in minutes.
    pub max_session_minutes: Option<u32>,
}

/// One recorded attempt at a module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub module_id: String,
    /// Score on a 0-100 scale.
    pub score: f64,
    pub completion_minutes: u32,
    pub attempts: u32,
    pub success: bool,
    pub timestamp: DateTime<Utc>,
    /// Skill level after this record was applied.
    pub skill_at_time: f64,
}

/// Mutable per-learner state consumed by the colony engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnerProfile {
    pub learner_id: String,
    /// Empty until the first successful progress event.
    pub current_module: Option<String>,
    /// Drifts with performance, clamped to [1.0, 10.0].
    pub skill_level: f64,
    pub learning_style: LearningStyle,
    /// Append-only; a module is never un-completed.
    pub completed_modules: BTreeSet<String>,
    /// Append-only attempt history, oldest first.
    pub performance_history: Vec<PerformanceRecord>,
    pub learning_goals: Vec<LearningGoal>,
    pub preferences: Preferences,
}

impl LearnerProfile {
    pub fn new(learner_id: &str, skill_level: f64, learning_style: LearningStyle) -> Self {
        Self {
            learner_id: learner_id.to_string(),
            current_module: None,
            skill_level: skill_level.clamp(MIN_SKILL, MAX_SKILL),
            learning_style,
            completed_modules: BTreeSet::new(),
            performance_history: Vec::new(),
            learning_goals: Vec::new(),
            preferences: Preferences::default(),
        }
    }

    /// Record an attempt and drift the skill level.
    ///
    /// Success is a score of 70 or above. A success raises skill by
    /// `(score - 70) / 300` (a perfect 100 gives +0.1); a failure costs a
    /// flat 0.05. The result is clamped to [1.0, 10.0] and rounded to two
    /// decimals. This is the only mechanism for skill drift.
    pub fn record_performance(
        &mut self,
        module_id: &str,
        score: f64,
        completion_minutes: u32,
        attempts: u32,
    ) -> &PerformanceRecord {
        let success = score >= PASSING_SCORE;

        let adjusted = if success {
            self.skill_level + (score - PASSING_SCORE) / 300.0
        } else {
            self.skill_level - 0.05
        };
        self.skill_level = round2(adjusted.clamp(MIN_SKILL, MAX_SKILL));

        if success {
            self.completed_modules.insert(module_id.to_string());
        }

        self.performance_history.push(PerformanceRecord {
            module_id: module_id.to_string(),
            score,
            completion_minutes,
            attempts,
            success,
            timestamp: Utc::now(),
            skill_at_time: self.skill_level,
        });

        // Just pushed, so the history is non-empty
        self.performance_history
            .last()
            .expect("history is non-empty after push")
    }

    /// Modules the learner can start now: not yet completed, with every
    /// prerequisite already in the completed set. No partial credit.
    pub fn available_modules<'a>(&self, graph: &'a ModuleGraph) -> Vec<&'a Module> {
        graph
            .modules()
            .filter(|m| !self.completed_modules.contains(&m.id))
            .filter(|m| {
                m.prerequisites
                    .iter()
                    .all(|p| self.completed_modules.contains(p))
            })
            .collect()
    }

    /// Difficulty to aim for next, on the 1-5 module scale.
    ///
    /// With no history this is just the floored skill level. Otherwise the
    /// last five records decide: strong recent form bumps the target up
    /// one, weak form drops it one.
    pub fn recommended_difficulty(&self) -> u8 {
        let base = (self.skill_level.floor() as u8).clamp(1, 5);

        if self.performance_history.is_empty() {
            return base;
        }

        let recent: Vec<&PerformanceRecord> =
            self.performance_history.iter().rev().take(5).collect();
        let avg_score = recent.iter().map(|r| r.score).sum::<f64>() / recent.len() as f64;
        let success_rate =
            recent.iter().filter(|r| r.success).count() as f64 / recent.len() as f64;

        if avg_score > 85.0 && success_rate > 0.8 {
            (base + 1).min(5)
        } else if avg_score < 70.0 || success_rate < 0.5 {
            base.saturating_sub(1).max(1)
        } else {
            base
        }
    }

    /// Mean score over the most recent `n` records, if any exist.
    pub fn recent_average_score(&self, n: usize) -> Option<f64> {
        if self.performance_history.is_empty() || n == 0 {
            return None;
        }
        let recent: Vec<f64> = self
            .performance_history
            .iter()
            .rev()
            .take(n)
            .map(|r| r.score)
            .collect();
        Some(recent.iter().sum::<f64>() / recent.len() as f64)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
