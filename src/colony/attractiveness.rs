//! Learner-specific module attractiveness
//!
//! Desirability of a candidate module for a learner, independent of any
//! pheromone evidence. Four weighted terms: skill match, learning-style
//! match, session-time fit, and a recent-performance modifier.

use crate::graph::Module;
use crate::learner::{LearnerProfile, LearningStyle};

const SKILL_WEIGHT: f64 = 0.4;
const STYLE_WEIGHT: f64 = 0.2;
const TIME_WEIGHT: f64 = 0.2;
const PERFORMANCE_WEIGHT: f64 = 0.2;

/// Combined attractiveness score for a candidate module.
pub fn attractiveness(module: &Module, learner: &LearnerProfile) -> f64 {
    SKILL_WEIGHT * skill_match(module, learner)
        + STYLE_WEIGHT * style_match(module, learner.learning_style)
        + TIME_WEIGHT * time_fit(module, learner)
        + PERFORMANCE_WEIGHT * recent_performance_modifier(learner)
}

/// Closeness of module difficulty to learner skill, floored at 0.1 so no
/// candidate is ever completely unreachable.
fn skill_match(module: &Module, learner: &LearnerProfile) -> f64 {
    (1.0 - (f64::from(module.difficulty) - learner.skill_level).abs() / 5.0).max(0.1)
}

/// Fixed heuristic table keyed by style and module tags/title.
pub(crate) fn style_match(module: &Module, style: LearningStyle) -> f64 {
    let title = module.title.to_ascii_lowercase();

    match style {
        LearningStyle::Visual => {
            if module.has_tag("visual")
                || title.contains("gui")
                || title.contains("interface")
                || title.contains("diagram")
            {
                1.2
            } else {
                0.8
            }
        }
        LearningStyle::Practical => {
            if module.has_tag("hands-on")
                || title.contains("exercise")
                || title.contains("lab")
                || title.contains("project")
            {
                1.3
            } else if title.contains("theory") {
                0.7
            } else {
                1.0
            }
        }
        LearningStyle::Theoretical => {
            if module.has_tag("theory") || title.contains("theory") {
                1.3
            } else if module.has_tag("hands-on")
                || title.contains("exercise")
                || title.contains("lab")
                || title.contains("project")
            {
                0.7
            } else {
                1.0
            }
        }
        LearningStyle::Mixed => 1.0,
    }
}

/// Bonus when the module fits inside the learner's preferred session
/// length; neutral when no preference is set.
fn time_fit(module: &Module, learner: &LearnerProfile) -> f64 {
    match learner.preferences.max_session_minutes {
        Some(max) if module.estimated_minutes <= max => 1.2,
        Some(_) => 0.8,
        None => 1.0,
    }
}

/// Confidence bonus or caution penalty from the last three attempts.
fn recent_performance_modifier(learner: &LearnerProfile) -> f64 {
    match learner.recent_average_score(3) {
        Some(avg) if avg > 80.0 => 1.1,
        Some(avg) if avg < 60.0 => 0.9,
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn module(title: &str, difficulty: u8, tags: &[&str]) -> Module {
        Module {
            id: title.to_ascii_lowercase().replace(' ', "-"),
            title: title.to_string(),
            difficulty,
            estimated_minutes: 45,
            prerequisites: BTreeSet::new(),
            tags: tags.iter().map(|s| s.to_string()).collect(),
            learning_objectives: vec![],
            category: String::new(),
        }
    }

    #[test]
    fn test_style_match_table() {
        let gui = module("GUI Basics", 2, &[]);
        let lab = module("Sorting Lab", 2, &["hands-on"]);
        let theory = module("Complexity Theory", 2, &["theory"]);
        let plain = module("Functions", 2, &[]);

        assert_eq!(style_match(&gui, LearningStyle::Visual), 1.2);
        assert_eq!(style_match(&plain, LearningStyle::Visual), 0.8);

        assert_eq!(style_match(&lab, LearningStyle::Practical), 1.3);
        assert_eq!(style_match(&theory, LearningStyle::Practical), 0.7);
        assert_eq!(style_match(&plain, LearningStyle::Practical), 1.0);

        assert_eq!(style_match(&theory, LearningStyle::Theoretical), 1.3);
        assert_eq!(style_match(&lab, LearningStyle::Theoretical), 0.7);
        assert_eq!(style_match(&plain, LearningStyle::Theoretical), 1.0);

        assert_eq!(style_match(&gui, LearningStyle::Mixed), 1.0);
        assert_eq!(style_match(&theory, LearningStyle::Mixed), 1.0);
    }

    #[test]
    fn test_skill_match_floor() {
        // Difficulty far from skill still yields the 0.1 floor via the
        // combined score's skill term
        let hard = module("Capstone", 5, &[]);
        let mut novice = LearnerProfile::new("n", 1.0, LearningStyle::Mixed);
        novice.skill_level = 1.0;

        let a = attractiveness(&hard, &novice);
        // 0.4*max(0.1, 1-4/5=0.2) + 0.2*1.0 + 0.2*1.0 + 0.2*1.0
        assert!((a - (0.4 * 0.2 + 0.6)).abs() < 1e-9);
    }

    #[test]
    fn test_time_fit_preference() {
        let m = module("Functions", 2, &[]);
        let mut learner = LearnerProfile::new("a", 2.0, LearningStyle::Mixed);

        let neutral = attractiveness(&m, &learner);

        learner.preferences.max_session_minutes = Some(60);
        let fits = attractiveness(&m, &learner);
        assert!(fits > neutral);

        learner.preferences.max_session_minutes = Some(30);
        let too_long = attractiveness(&m, &learner);
        assert!(too_long < neutral);
    }

    #[test]
    fn test_recent_performance_modifier() {
        let m = module("Functions", 2, &[]);
        let mut learner = LearnerProfile::new("a", 2.0, LearningStyle::Mixed);
        let baseline = attractiveness(&m, &learner);

        for _ in 0..3 {
            learner.record_performance("x", 95.0, 20, 1);
        }
        let skill_before = learner.skill_level;
        let confident = attractiveness(&m, &learner);
        // Skill also drifted, so compare against a same-skill control with
        // no history: the only difference is the 1.1 vs 1.0 modifier
        let control = LearnerProfile::new("b", skill_before, LearningStyle::Mixed);
        let delta = confident - attractiveness(&m, &control);
        assert!((delta - 0.2 * 0.1).abs() < 1e-9);
        assert!(baseline > 0.0);
    }
}
