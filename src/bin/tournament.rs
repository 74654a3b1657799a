//! Tournament CLI
//!
//! Grid-searches the difficulty parameters through parallel self-play
//! and prints the top configurations, optionally persisting the full
//! ranking as JSON.

use std::path::PathBuf;
use std::process;
use std::sync::atomic::AtomicBool;

use clap::Parser;

use ironwake::core::config::EngineConfig;
use ironwake::tournament::{
    build_report, preset, print_top, run_tournament, write_report, ParamRange, TournamentConfig,
};

/// Self-play grid search over alpha and risk awareness
#[derive(Parser, Debug)]
#[command(name = "tournament")]
#[command(about = "Round-robin self-play tournament over the difficulty grid")]
struct Args {
    /// Lower bound of the alpha range
    #[arg(long)]
    alpha_min: Option<f64>,

    /// Upper bound of the alpha range
    #[arg(long)]
    alpha_max: Option<f64>,

    /// Alpha step
    #[arg(long)]
    alpha_step: Option<f64>,

    /// Lower bound of the risk-awareness range
    #[arg(long)]
    risk_min: Option<f64>,

    /// Upper bound of the risk-awareness range
    #[arg(long)]
    risk_max: Option<f64>,

    /// Risk-awareness step
    #[arg(long)]
    risk_step: Option<f64>,

    /// Games per configuration pair (first move split evenly)
    #[arg(long)]
    games: Option<u32>,

    /// Worker pool size (defaults to the host CPU count)
    #[arg(long)]
    workers: Option<usize>,

    /// Base seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Configurations to print when done
    #[arg(long)]
    top: Option<usize>,

    /// Write the full ranking as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Starting shape: test, quick, default, or full
    #[arg(long, default_value = "default")]
    preset: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ironwake=info".into()),
        )
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            process::exit(1);
        }
    };

    let Some(mut config) = preset(&args.preset) else {
        eprintln!(
            "unknown preset '{}' (expected test, quick, default, or full)",
            args.preset
        );
        process::exit(1);
    };

    // Explicit flags override the preset
    config.alpha = ParamRange::new(
        args.alpha_min.unwrap_or(config.alpha.min),
        args.alpha_max.unwrap_or(config.alpha.max),
        args.alpha_step.unwrap_or(config.alpha.step),
    );
    config.risk = ParamRange::new(
        args.risk_min.unwrap_or(config.risk.min),
        args.risk_max.unwrap_or(config.risk.max),
        args.risk_step.unwrap_or(config.risk.step),
    );
    if let Some(games) = args.games {
        config.games_per_pair = games;
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(top) = args.top {
        config.top_n = top;
    }

    if let Err(e) = config.validate() {
        eprintln!("invalid arguments: {e}");
        process::exit(1);
    }

    let configs = config.configurations();
    let pairs = TournamentConfig::pairings(configs.len()).len();
    println!(
        "{} configurations, {} pairings, {} matches on {} workers (seed {})",
        configs.len(),
        pairs,
        pairs * config.games_per_pair as usize,
        config.workers,
        config.seed,
    );

    let stop = AtomicBool::new(false);
    let outcome = match run_tournament(&config, &EngineConfig::default(), &stop) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("tournament failed: {e}");
            process::exit(1);
        }
    };

    println!(
        "\ncompleted {}/{} matches\n",
        outcome.completed_matches, outcome.scheduled_matches
    );
    print_top(&outcome, config.top_n);

    if let Some(path) = &args.output {
        let report = build_report(&config, &outcome);
        if let Err(e) = write_report(path, &report) {
            eprintln!("failed to write {}: {e}", path.display());
            process::exit(1);
        }
        println!("\nfull ranking written to {}", path.display());
    }
}
