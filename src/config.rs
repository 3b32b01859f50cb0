//! Colony configuration
//!
//! Tuning constants for the optimization loop. Every field has a
//! documented default so a partial (or absent) config file is accepted.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Tuning parameters for the colony engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColonyConfig {
    /// Pheromone exponent in the selection weight.
    pub alpha: f64,
    /// Attractiveness exponent in the selection weight.
    pub beta: f64,
    /// Fraction of pheromone removed from every trail each iteration (0-1).
    pub evaporation_rate: f64,
    /// Multiplier applied to a path's score when reinforcing its edges.
    pub reinforcement_factor: f64,
    /// Iteration budget for one optimization run.
    pub max_iterations: u32,
    /// Accepted for interface compatibility; the loop always runs its full
    /// budget, so this value is recorded but never triggers an early exit.
    pub convergence_threshold: f64,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            beta: 2.0,
            evaporation_rate: 0.1,
            reinforcement_factor: 1.0,
            max_iterations: 100,
            convergence_threshold: 0.001,
        }
    }
}

impl ColonyConfig {
    /// Load configuration from a TOML file.
    ///
    /// Missing or malformed files fall back to the defaults with a warning;
    /// configuration problems are never fatal.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!("Config not readable at {:?} ({}), using defaults", path, e);
                return Self::default();
            }
        };

        match toml::from_str(&content) {
            Ok(config) => {
                info!("Loaded colony config from {:?}", path);
                config
            }
            Err(e) => {
                warn!("Malformed config at {:?} ({}), using defaults", path, e);
                Self::default()
            }
        }
    }

    /// Write the default configuration file if none exists yet.
    pub fn write_default(path: &Path) -> anyhow::Result<()> {
        if path.exists() {
            return Ok(());
        }
        let content = toml::to_string_pretty(&Self::default())?;
        std::fs::write(path, content)?;
        info!("Created default configuration at {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ColonyConfig::default();
        assert_eq!(config.alpha, 1.0);
        assert_eq!(config.beta, 2.0);
        assert_eq!(config.evaporation_rate, 0.1);
        assert_eq!(config.reinforcement_factor, 1.0);
        assert_eq!(config.max_iterations, 100);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: ColonyConfig = toml::from_str("alpha = 2.5\nmax_iterations = 25\n").unwrap();
        assert_eq!(config.alpha, 2.5);
        assert_eq!(config.max_iterations, 25);
        // Unspecified fields keep their defaults
        assert_eq!(config.beta, 2.0);
        assert_eq!(config.evaporation_rate, 0.1);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = ColonyConfig::load(Path::new("/nonexistent/antpath.toml"));
        assert_eq!(config.max_iterations, 100);
    }
}
