//! CLI session journal
//!
//! The engine itself is in-memory; the CLI keeps continuity between
//! invocations by appending progress events to a JSON-lines journal and
//! replaying them into a fresh colony at startup. This is front-end glue,
//! not engine state.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::colony::Colony;

/// One journaled progress event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub learner_id: String,
    pub module_id: String,
    pub score: f64,
    pub completion_minutes: u32,
    pub attempts: u32,
    pub timestamp: DateTime<Utc>,
}

/// Resolve the data directory: a project-local `.antpath/` wins over the
/// home-directory default.
pub fn data_dir() -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    let local = cwd.join(".antpath");
    if local.exists() {
        return Ok(local);
    }

    let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;
    Ok(home.join(".antpath"))
}

/// Append one event to the journal, creating the file if needed.
pub fn append_event(path: &Path, event: &ProgressEvent) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let line = serde_json::to_string(event)?;
    writeln!(file, "{}", line)?;
    Ok(())
}

/// Load all events from the journal. Malformed lines are skipped with a
/// warning rather than failing the whole load.
pub fn load_events(path: &Path) -> Result<Vec<ProgressEvent>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = std::fs::File::open(path)?;
    let reader = BufReader::new(file);
    let mut events = Vec::new();

    for (number, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(l) => l,
            Err(_) => continue,
        };
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<ProgressEvent>(&line) {
            Ok(event) => events.push(event),
            Err(e) => warn!("Skipping malformed journal line {}: {}", number + 1, e),
        }
    }

    debug!("Loaded {} events from {:?}", events.len(), path);
    Ok(events)
}

/// Replay journaled events into a colony. Events referencing modules no
/// longer in the catalog are skipped with a warning.
pub fn replay(colony: &mut Colony, events: &[ProgressEvent]) {
    for event in events {
        if let Err(e) = colony.record_progress(
            &event.learner_id,
            &event.module_id,
            event.score,
            event.completion_minutes,
            event.attempts,
        ) {
            warn!("Skipping journaled event: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColonyConfig;
    use crate::graph::catalog::default_catalog;

    fn event(learner: &str, module: &str, score: f64) -> ProgressEvent {
        ProgressEvent {
            learner_id: learner.to_string(),
            module_id: module.to_string(),
            score,
            completion_minutes: 30,
            attempts: 1,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_append_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.jsonl");

        append_event(&path, &event("ada", "intro-programming", 90.0)).unwrap();
        append_event(&path, &event("ada", "variables-types", 85.0)).unwrap();

        let events = load_events(&path).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].module_id, "variables-types");
    }

    #[test]
    fn test_load_skips_malformed_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.jsonl");

        append_event(&path, &event("ada", "intro-programming", 90.0)).unwrap();
        std::fs::write(
            &path,
            format!(
                "{}\nnot json at all\n",
                std::fs::read_to_string(&path).unwrap().trim()
            ),
        )
        .unwrap();
        append_event(&path, &event("ada", "variables-types", 85.0)).unwrap();

        let events = load_events(&path).unwrap();
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_missing_journal_is_empty() {
        let events = load_events(Path::new("/nonexistent/journal.jsonl")).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_replay_rebuilds_state() {
        let mut colony = Colony::with_seed(default_catalog(), ColonyConfig::default(), 5);
        let events = vec![
            event("ada", "intro-programming", 90.0),
            event("ada", "variables-types", 85.0),
            event("ada", "no-such-module", 85.0), // skipped, not fatal
        ];

        replay(&mut colony, &events);

        let learner = colony.learner("ada").unwrap();
        assert_eq!(learner.completed_modules.len(), 2);
        assert_eq!(learner.current_module.as_deref(), Some("variables-types"));
        assert_eq!(colony.stats().learning_events, 2);
    }
}
