//! Headless attempt runner
//!
//! Drives the simulation core without any rendering: loads knowledge,
//! runs a batch of attempts (sequentially or in parallel), saves the
//! updated knowledge, and prints a summary per attempt.

use std::path::PathBuf;

use clap::Parser;

use emberward::core::config::{set_config, SimConfig};
use emberward::core::error::Result;
use emberward::knowledge::store::KnowledgeStore;
use emberward::sim::runner::{run_attempts, run_attempts_parallel};

#[derive(Parser, Debug)]
#[command(name = "survival_run", about = "Run survival attempts headlessly")]
struct Args {
    /// Base RNG seed; attempt i uses seed + i
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Number of attempts to run
    #[arg(long, default_value_t = 5)]
    attempts: u32,

    /// Run the batch in parallel (attempts share a knowledge snapshot)
    #[arg(long)]
    parallel: bool,

    /// Knowledge file path
    #[arg(long, default_value = "knowledge.json")]
    knowledge: PathBuf,

    /// Optional TOML tuning file overriding the default config
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "emberward=info".into()),
        )
        .init();

    let args = Args::parse();

    if let Some(path) = &args.config {
        let config = SimConfig::from_file(path)?;
        if set_config(config).is_err() {
            tracing::warn!("config was already initialized, tuning file ignored");
        }
    }

    let store = KnowledgeStore::new(&args.knowledge);
    let mut knowledge = store.load();

    tracing::info!(
        attempts = args.attempts,
        seed = args.seed,
        parallel = args.parallel,
        prior_attempts = knowledge.attempts,
        "starting batch"
    );

    let outcomes = if args.parallel {
        run_attempts_parallel(args.attempts, args.seed, &mut knowledge)
    } else {
        run_attempts(args.attempts, args.seed, &mut knowledge)
    };

    store.save(&knowledge)?;

    println!("seed      days  level  q-states  outcome");
    for outcome in &outcomes {
        println!(
            "{:<9} {:<5} {:<6} {:<9} {}",
            outcome.seed,
            outcome.days_survived,
            outcome.final_level,
            outcome.states_learned,
            outcome
                .death_cause
                .map(|c| c.as_str())
                .unwrap_or("survived to the cap"),
        );
    }
    println!(
        "\nbest survival: {} days over {} attempts (risk tolerance {:.2})",
        knowledge.best_survival_days, knowledge.attempts, knowledge.risk_tolerance
    );

    Ok(())
}
