use anyhow::{Context, Result};
use base_core::GameState;
use base_world::{build_initial_state, load_content, load_scenario, load_state, save_state};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod report;
mod script;

use script::ConfirmPolicy;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "base_cli", about = "Base loadout script runner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a script of assignments against a scenario or saved state.
    Run {
        #[arg(long, default_value = "./content")]
        content_dir: String,
        #[arg(long)]
        script: PathBuf,
        /// Starting scenario. Defaults to `scenario.json` in the content dir.
        #[arg(long, conflicts_with = "state_file")]
        scenario: Option<PathBuf>,
        /// Seed for base ids. Overrides the scenario's seed.
        #[arg(long, conflicts_with = "state_file")]
        seed: Option<u64>,
        /// Resume from a saved GameState instead of a scenario.
        #[arg(long = "state")]
        state_file: Option<PathBuf>,
        /// Confirm stacking onto completed CPUs instead of declining.
        #[arg(long)]
        yes: bool,
        /// Write the final GameState here.
        #[arg(long)]
        save: Option<PathBuf>,
    },
}

struct RunArgs {
    content_dir: String,
    script: PathBuf,
    scenario: Option<PathBuf>,
    seed: Option<u64>,
    state_file: Option<PathBuf>,
    yes: bool,
    save: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

fn initial_state(args: &RunArgs, content: &base_core::GameContent) -> Result<GameState> {
    if let Some(path) = &args.state_file {
        let state = load_state(path)?;
        info!(path = %path.display(), tick = state.meta.tick, "resumed saved state");
        return Ok(state);
    }
    let scenario_path = args
        .scenario
        .clone()
        .unwrap_or_else(|| PathBuf::from(&args.content_dir).join("scenario.json"));
    let scenario = load_scenario(&scenario_path)?;
    let seed = args
        .seed
        .or(scenario.seed)
        .unwrap_or_else(rand::random);
    let mut rng = base_world::seeded_rng(seed);
    let state = build_initial_state(content, &scenario, seed, &mut rng)
        .with_context(|| format!("building scenario {}", scenario_path.display()))?;
    info!(seed, bases = state.bases.len(), "scenario loaded");
    Ok(state)
}

fn run(args: &RunArgs) -> Result<()> {
    let content = load_content(&args.content_dir)?;
    let mut state = initial_state(args, &content)?;
    let steps = script::load_script(&args.script)?;
    let policy = if args.yes {
        ConfirmPolicy::Accept
    } else {
        ConfirmPolicy::Decline
    };

    info!(
        steps = steps.len(),
        content_version = %content.content_version,
        "running script"
    );
    println!("{}", "-".repeat(72));
    let outcome = script::run_script(&mut state, &content, &steps, policy, |snapshot| {
        print!("{}", report::render(snapshot, &content));
        println!("{}", "-".repeat(72));
    })?;
    info!(
        applied = outcome.applied,
        unchanged = outcome.unchanged,
        confirmed = outcome.confirmed,
        cancelled = outcome.cancelled,
        rejected = outcome.rejected,
        tick = state.meta.tick,
        "script finished"
    );

    if let Some(path) = &args.save {
        save_state(&state, path)?;
        info!(path = %path.display(), "state saved");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            content_dir,
            script,
            scenario,
            seed,
            state_file,
            yes,
            save,
        } => run(&RunArgs {
            content_dir,
            script,
            scenario,
            seed,
            state_file,
            yes,
            save,
        })?,
    }
    Ok(())
}
