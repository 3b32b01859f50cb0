//! Path quality scoring
//!
//! Scores a constructed candidate path so iterations can be compared.
//! Three weighted sub-scores per module: skill progression against a
//! simulated running skill, a constant length penalty, and prerequisite
//! satisfaction against the learner's completed set.

use crate::graph::ModuleGraph;
use crate::learner::LearnerProfile;

const SKILL_WEIGHT: f64 = 0.5;
const EFFICIENCY_WEIGHT: f64 = 0.2;
const PREREQ_WEIGHT: f64 = 0.3;

/// Simulated skill gained per module traversed along a hypothetical path.
const SKILL_GAIN_PER_MODULE: f64 = 0.2;

/// Average per-module quality of a path, roughly in [0.1, 1.3] for any
/// non-empty path. The empty path scores 0.0.
pub fn evaluate_path(graph: &ModuleGraph, learner: &LearnerProfile, path: &[String]) -> f64 {
    if path.is_empty() {
        return 0.0;
    }

    // Constant per path: longer routes are uniformly penalized
    let efficiency = 1.0 / (1.0 + 0.1 * path.len() as f64);

    let mut running_skill = learner.skill_level;
    let mut total = 0.0;

    for id in path {
        let Some(module) = graph.get(id) else {
            continue;
        };

        let skill_score =
            (1.0 - (f64::from(module.difficulty) - running_skill).abs() / 5.0).max(0.1);

        let prereq_score = if module.prerequisites.is_empty() {
            1.0
        } else {
            let satisfied = module
                .prerequisites
                .iter()
                .filter(|p| learner.completed_modules.contains(*p))
                .count();
            satisfied as f64 / module.prerequisites.len() as f64
        };

        total += SKILL_WEIGHT * skill_score
            + EFFICIENCY_WEIGHT * efficiency
            + PREREQ_WEIGHT * prereq_score;

        // Learning-by-doing: each traversed module nudges the simulated
        // skill upward
        running_skill = (running_skill + SKILL_GAIN_PER_MODULE).min(10.0);
    }

    total / path.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::catalog::default_catalog;
    use crate::learner::LearningStyle;

    #[test]
    fn test_empty_path_scores_zero() {
        let graph = default_catalog();
        let learner = LearnerProfile::new("ada", 1.0, LearningStyle::Mixed);
        assert_eq!(evaluate_path(&graph, &learner, &[]), 0.0);
    }

    #[test]
    fn test_non_empty_path_bounded() {
        let graph = default_catalog();
        let learner = LearnerProfile::new("ada", 1.0, LearningStyle::Mixed);

        let path: Vec<String> = vec![
            "intro-programming".to_string(),
            "variables-types".to_string(),
            "control-flow".to_string(),
        ];
        let score = evaluate_path(&graph, &learner, &path);
        assert!(score > 0.1, "score {} below sane floor", score);
        assert!(score < 1.3, "score {} above sane ceiling", score);
    }

    #[test]
    fn test_prerequisite_fraction_counts_partially() {
        let graph = default_catalog();
        let mut learner = LearnerProfile::new("ada", 3.0, LearningStyle::Mixed);

        // capstone-project needs data-structures and gui-fundamentals
        let path = vec!["capstone-project".to_string()];
        let unprepared = evaluate_path(&graph, &learner, &path);

        learner.completed_modules.insert("data-structures".to_string());
        let half_prepared = evaluate_path(&graph, &learner, &path);

        learner.completed_modules.insert("gui-fundamentals".to_string());
        let prepared = evaluate_path(&graph, &learner, &path);

        assert!(unprepared < half_prepared);
        assert!(half_prepared < prepared);
        // Each satisfied prerequisite adds 0.3 * 0.5 to the single-module score
        assert!((half_prepared - unprepared - 0.15).abs() < 1e-9);
    }

    #[test]
    fn test_longer_paths_pay_efficiency_penalty() {
        let graph = default_catalog();
        let learner = LearnerProfile::new("ada", 1.0, LearningStyle::Mixed);

        let short = vec!["intro-programming".to_string()];
        let long: Vec<String> = vec![
            "intro-programming".to_string(),
            "variables-types".to_string(),
            "control-flow".to_string(),
            "functions".to_string(),
            "data-structures".to_string(),
        ];

        // The efficiency component is strictly smaller for the long path
        let short_eff = 1.0 / (1.0 + 0.1 * short.len() as f64);
        let long_eff = 1.0 / (1.0 + 0.1 * long.len() as f64);
        assert!(long_eff < short_eff);

        // And both composite scores stay in the documented range
        for path in [&short, &long] {
            let score = evaluate_path(&graph, &learner, path);
            assert!(score > 0.1 && score < 1.3);
        }
    }
}
