use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use antpath::colony::Colony;
use antpath::config::ColonyConfig;
use antpath::export;
use antpath::graph::catalog;
use antpath::session;

/// antpath - Ant-colony learning path optimizer
/// Recommends module sequences from pheromone trails built on learner outcomes
#[derive(Parser)]
#[command(name = "antpath")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Ant-colony learning path optimizer", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory with default config and catalog
    Init,

    /// Recommend a learning path for a learner toward a target module
    Optimize {
        /// Learner id
        #[arg(long)]
        learner: String,
        /// Target module id
        #[arg(long)]
        target: String,
        /// Iteration budget (defaults to the configured max_iterations)
        #[arg(long)]
        iterations: Option<u32>,
        /// Fixed RNG seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Record a learner's attempt at a module
    Record {
        /// Learner id
        #[arg(long)]
        learner: String,
        /// Module id
        #[arg(long)]
        module: String,
        /// Score achieved, 0-100
        #[arg(long)]
        score: f64,
        /// Time taken in minutes
        #[arg(long)]
        minutes: u32,
        /// Attempts needed
        #[arg(long, default_value = "1")]
        attempts: u32,
    },

    /// List the module catalog
    Modules,

    /// Show the strongest pheromone trails
    Trails {
        /// Number of trails to show
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Show current status
    Status,

    /// Show detailed statistics
    Stats,

    /// Export a full JSON snapshot of the colony state
    Export {
        /// Output file path
        #[arg(long, default_value = "antpath-snapshot.json")]
        output: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr) // Logs to stderr, reports to stdout
        .init();

    match cli.command {
        Commands::Init => init()?,
        Commands::Optimize {
            learner,
            target,
            iterations,
            seed,
        } => {
            let (mut colony, _) = build_colony(seed)?;
            let result = colony.optimize(&learner, &target, iterations)?;

            if result.is_empty() {
                println!("No route found from {}'s position to {}", learner, target);
                println!("(target may already be completed, or prerequisites block every path)");
            } else {
                println!("Recommended path for {} -> {}:", learner, target);
                for (step, module_id) in result.path.iter().enumerate() {
                    match colony.graph().get(module_id) {
                        Some(m) => println!(
                            "  {}. {} ({}, difficulty {}, ~{} min)",
                            step + 1,
                            m.title,
                            m.id,
                            m.difficulty,
                            m.estimated_minutes
                        ),
                        None => println!("  {}. {}", step + 1, module_id),
                    }
                }
                println!();
                println!(
                    "Score: {:.4} over {} iterations",
                    result.score, result.iterations
                );
                if !result.reached_target {
                    println!("⚠️  Best path does not reach the target");
                }
            }
        }
        Commands::Record {
            learner,
            module,
            score,
            minutes,
            attempts,
        } => {
            let (mut colony, data_dir) = build_colony(None)?;
            let outcome = colony.record_progress(&learner, &module, score, minutes, attempts)?;

            let event = session::ProgressEvent {
                learner_id: learner.clone(),
                module_id: module.clone(),
                score,
                completion_minutes: minutes,
                attempts,
                timestamp: chrono::Utc::now(),
            };
            session::append_event(&data_dir.join("journal.jsonl"), &event)?;

            if outcome.success {
                println!("✅ {} passed {} (score {})", learner, module, score);
            } else {
                println!(
                    "❌ {} did not pass {} (score {}, below 70)",
                    learner, module, score
                );
            }
            println!("Skill level now {:.2}", outcome.skill_level);
        }
        Commands::Modules => {
            let (colony, _) = build_colony(None)?;
            println!("Module Catalog");
            println!("==============");
            for m in colony.graph().modules() {
                let prereqs = if m.prerequisites.is_empty() {
                    "none".to_string()
                } else {
                    m.prerequisites
                        .iter()
                        .cloned()
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                println!(
                    "  {} - {} (difficulty {}, ~{} min, prereqs: {})",
                    m.id, m.title, m.difficulty, m.estimated_minutes, prereqs
                );
            }
        }
        Commands::Trails { limit } => {
            let (colony, _) = build_colony(None)?;
            let report = export::trail_report(&colony, limit);

            println!("Strongest Trails");
            println!("================");
            for entry in report {
                println!(
                    "  {} -> {}  strength {:.3} (pheromone {:.3}, {} traversals, {:.0}% success)",
                    entry.from,
                    entry.to,
                    entry.strength,
                    entry.pheromone_level,
                    entry.traversal_count,
                    entry.success_rate * 100.0
                );
            }
        }
        Commands::Status => {
            let data_dir = session::data_dir()?;

            println!("antpath Status");
            println!("==============");
            println!();

            if !data_dir.exists() {
                println!("Status: NOT INITIALIZED");
                println!("Run 'antpath init' to initialize");
                return Ok(());
            }

            println!("Status: INITIALIZED");
            println!("Data directory: {:?}", data_dir);

            let (colony, _) = build_colony(None)?;
            println!("Modules: {}", colony.graph().len());
            println!("Trails: {}", colony.trails().len());
            println!("Learners: {}", colony.learner_count());
            println!("Recorded events: {}", colony.stats().learning_events);
        }
        Commands::Stats => {
            let (colony, _) = build_colony(None)?;
            let stats = colony.stats();

            println!("antpath Statistics");
            println!("==================");
            println!();
            println!("Graph:");
            println!("  Modules: {}", colony.graph().len());
            println!("  Trails: {}", colony.trails().len());
            println!(
                "  Average pheromone: {:.3}",
                colony.trails().average_pheromone()
            );
            println!();
            println!("Activity:");
            println!("  Learning events: {}", stats.learning_events);
            println!("  Paths generated: {}", stats.paths_generated);
            println!("  Optimization runs: {}", stats.optimization_runs);
            println!();
            println!("Learners:");
            if colony.learner_count() == 0 {
                println!("  No learners recorded yet.");
            }
            for learner in colony.learners() {
                println!(
                    "  {} - skill {:.2}, {} completed, recommended difficulty {}",
                    learner.learner_id,
                    learner.skill_level,
                    learner.completed_modules.len(),
                    learner.recommended_difficulty()
                );
            }
        }
        Commands::Export { output } => {
            let (colony, _) = build_colony(None)?;
            export::write_snapshot(&colony, std::path::Path::new(&output))?;
            println!("✅ Exported colony snapshot to {}", output);
        }
    }

    Ok(())
}

/// Create the data directory and seed it with default config and catalog
/// files the user can edit.
fn init() -> Result<()> {
    let data_dir = session::data_dir()?;
    std::fs::create_dir_all(&data_dir)?;

    ColonyConfig::write_default(&data_dir.join("config.toml"))?;
    catalog::write_default_catalog(&data_dir.join("modules.toml"))?;

    info!("antpath initialized at {:?}", data_dir);
    println!("✅ Initialized at {:?}", data_dir);
    println!("Edit modules.toml to define your own catalog");
    Ok(())
}

/// Hydrate a colony from the data directory: config and catalog files with
/// built-in fallbacks, then replay the progress journal.
fn build_colony(seed: Option<u64>) -> Result<(Colony, PathBuf)> {
    let data_dir = session::data_dir()?;

    let config = ColonyConfig::load(&data_dir.join("config.toml"));
    let graph = catalog::load_catalog(&data_dir.join("modules.toml"));

    let mut colony = match seed {
        Some(seed) => Colony::with_seed(graph, config, seed),
        None => Colony::new(graph, config),
    };

    let events = session::load_events(&data_dir.join("journal.jsonl"))?;
    session::replay(&mut colony, &events);

    Ok((colony, data_dir))
}
