//! Trait-pack demo simulation.
//!
//! Runs a seeded colony scenario — nine trait carriers, their pets, and a
//! raid — and writes a JSONL event stream plus periodic world snapshots.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use traits_core::config::{Config, DEFAULT_TUNING_PATH};
use traits_core::scenario::{self, ScenarioParams};

/// Command line arguments for the demo simulation.
#[derive(Parser, Debug)]
#[command(name = "traits_sim")]
#[command(about = "A trait-pack colony simulation")]
struct Args {
    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of ticks to simulate (0 uses the tuning file's value)
    #[arg(long, default_value_t = 0)]
    ticks: u64,

    /// Interval between world snapshots, in ticks (0 disables)
    #[arg(long, default_value_t = 500)]
    snapshot_interval: u64,

    /// Path to the tuning file
    #[arg(long, default_value = DEFAULT_TUNING_PATH)]
    tuning: PathBuf,

    /// Output directory for the event log and snapshots
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = Config::load(&args.tuning).unwrap_or_else(|e| {
        eprintln!("Warning: {}. Using defaults.", e);
        Config::default()
    });
    let ticks = if args.ticks > 0 {
        args.ticks
    } else {
        config.simulation.default_ticks
    };

    println!("Trait-Pack Simulation");
    println!("=====================");
    println!("Seed: {}", args.seed);
    println!("Ticks: {}", ticks);
    println!("Raid at tick: {}", config.simulation.raid_tick);
    println!("Output: {}", args.output_dir.display());
    println!();

    let params = ScenarioParams {
        seed: args.seed,
        ticks,
        snapshot_interval: args.snapshot_interval,
        config,
        output_dir: Some(args.output_dir.clone()),
        quiet: false,
    };

    let outcome = match scenario::run(&params) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("Simulation failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!();
    println!(
        "Simulation complete: {} ticks, {} events, {} snapshots.",
        ticks,
        outcome.events.len(),
        outcome.snapshot_count
    );
    let snapshot = &outcome.final_snapshot;
    println!(
        "Colony standing: {} of {} pawns.",
        snapshot.standing_count(),
        snapshot.pawns.len()
    );
    println!(
        "Caravan pace: {} ticks per move.",
        outcome.caravan_ticks_per_move
    );

    let rages = outcome
        .events
        .iter()
        .filter(|e| e.kind == traits_events::EventKind::RageStarted)
        .count();
    let taunts = outcome
        .events
        .iter()
        .filter(|e| e.kind == traits_events::EventKind::Taunt)
        .count();
    println!("Rages: {}, taunts: {}.", rages, taunts);

    ExitCode::SUCCESS
}
