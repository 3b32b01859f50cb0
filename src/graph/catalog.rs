//! Catalog loading
//!
//! Module definitions come from a TOML file (`[[modules]]` array). A
//! missing or malformed file falls back to the built-in default catalog
//! so the engine always has something to optimize over.

use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{info, warn};

use super::{Module, ModuleGraph};

#[derive(Debug, Deserialize)]
struct CatalogFile {
    modules: Vec<Module>,
}

/// Load a module catalog from a TOML file, falling back to the built-in
/// default catalog on any read, parse, or validation failure.
pub fn load_catalog(path: &Path) -> ModuleGraph {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Catalog not readable at {:?} ({}), using built-in modules", path, e);
            return default_catalog();
        }
    };

    let parsed: CatalogFile = match toml::from_str(&content) {
        Ok(p) => p,
        Err(e) => {
            warn!("Malformed catalog at {:?} ({}), using built-in modules", path, e);
            return default_catalog();
        }
    };

    match ModuleGraph::new(parsed.modules) {
        Ok(graph) => {
            info!("Loaded {} modules from {:?}", graph.len(), path);
            graph
        }
        Err(e) => {
            warn!("Invalid catalog at {:?} ({}), using built-in modules", path, e);
            default_catalog()
        }
    }
}

/// The built-in default catalog: a small programming-fundamentals track.
pub fn default_catalog() -> ModuleGraph {
    let modules = vec![
        module(
            "intro-programming",
            "Introduction to Programming Theory",
            1,
            45,
            &[],
            &["theory"],
            &["Explain what a program is", "Read simple pseudocode"],
        ),
        module(
            "variables-types",
            "Variables and Data Types",
            1,
            30,
            &["intro-programming"],
            &["hands-on"],
            &["Declare and assign variables", "Choose appropriate types"],
        ),
        module(
            "control-flow",
            "Control Flow Exercises",
            2,
            40,
            &["variables-types"],
            &["hands-on"],
            &["Write conditionals and loops"],
        ),
        module(
            "functions",
            "Functions and Scope",
            2,
            50,
            &["control-flow"],
            &[],
            &["Define and call functions", "Reason about scope"],
        ),
        module(
            "data-structures",
            "Data Structures",
            3,
            60,
            &["functions"],
            &["theory"],
            &["Use lists, maps, and sets", "Pick a structure for a problem"],
        ),
        module(
            "algorithms-theory",
            "Algorithm Analysis Theory",
            4,
            75,
            &["data-structures"],
            &["theory"],
            &["Compare algorithms by complexity"],
        ),
        module(
            "gui-fundamentals",
            "GUI Interface Fundamentals",
            3,
            55,
            &["functions"],
            &["visual"],
            &["Lay out a simple interface", "Handle user events"],
        ),
        module(
            "capstone-project",
            "Capstone Project Lab",
            5,
            120,
            &["data-structures", "gui-fundamentals"],
            &["hands-on"],
            &["Build a small application end to end"],
        ),
    ];

    ModuleGraph::new(modules).expect("built-in catalog is valid")
}

/// Write the default catalog as a TOML file if none exists yet, so users
/// have a template to edit.
pub fn write_default_catalog(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        return Ok(());
    }

    #[derive(serde::Serialize)]
    struct CatalogOut<'a> {
        modules: Vec<&'a Module>,
    }

    let graph = default_catalog();
    let out = CatalogOut {
        modules: graph.modules().collect(),
    };
    std::fs::write(path, toml::to_string_pretty(&out)?)?;
    info!("Created default catalog at {:?}", path);
    Ok(())
}

fn module(
    id: &str,
    title: &str,
    difficulty: u8,
    estimated_minutes: u32,
    prerequisites: &[&str],
    tags: &[&str],
    objectives: &[&str],
) -> Module {
    Module {
        id: id.to_string(),
        title: title.to_string(),
        difficulty,
        estimated_minutes,
        prerequisites: prerequisites.iter().map(|s| s.to_string()).collect(),
        tags: tags.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
        learning_objectives: objectives.iter().map(|s| s.to_string()).collect(),
        category: "fundamentals".to_string(),
    }
}
