//! Round-robin harness over the parameter grid
//!
//! One task is one match. Tasks fan out over a rayon pool sized by the
//! worker count; simulations share nothing, so the only synchronized
//! state is the progress counter and the cooperative stop flag, checked
//! between tasks.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

use rayon::prelude::*;

use crate::ai::difficulty::Difficulty;
use crate::core::config::EngineConfig;
use crate::core::error::{IronwakeError, Result};
use crate::core::types::{MatchWinner, Side};
use crate::sim::runner::run_match;
use crate::tournament::grid::TournamentConfig;

/// One scheduled match between two grid configurations
#[derive(Debug, Clone, Copy)]
pub struct MatchTask {
    pub config_a: usize,
    pub config_b: usize,
    pub first: Side,
    pub seed: u64,
}

/// Accumulated record for one configuration
#[derive(Debug, Clone)]
pub struct Standing {
    pub difficulty: Difficulty,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub games: u32,
    pub total_turns: u64,
}

impl Standing {
    fn new(difficulty: Difficulty) -> Self {
        Self { difficulty, wins: 0, losses: 0, draws: 0, games: 0, total_turns: 0 }
    }

    pub fn win_rate(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.wins as f64 / self.games as f64
        }
    }

    pub fn avg_turns(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_turns as f64 / self.games as f64
        }
    }
}

/// Ranked result of a completed (or stopped) tournament
#[derive(Debug, Clone)]
pub struct TournamentOutcome {
    /// Standings sorted by win rate, best first
    pub standings: Vec<Standing>,
    pub completed_matches: usize,
    pub scheduled_matches: usize,
}

/// Lay out every task for the grid
///
/// Each pair plays `games_per_pair` matches with the first move split
/// evenly; seeds are derived from the base seed and the task index so a
/// rerun reproduces every match exactly.
pub fn build_tasks(config: &TournamentConfig, pair_count: usize) -> Vec<MatchTask> {
    let pairs = TournamentConfig::pairings(pair_count);
    let mut tasks = Vec::with_capacity(pairs.len() * config.games_per_pair as usize);

    for (config_a, config_b) in pairs {
        for game in 0..config.games_per_pair {
            let index = tasks.len() as u64;
            tasks.push(MatchTask {
                config_a,
                config_b,
                first: if game % 2 == 0 { Side::A } else { Side::B },
                seed: config.seed ^ index.wrapping_mul(0x9E37_79B9_7F4A_7C15),
            });
        }
    }

    tasks
}

struct TaskResult {
    task: MatchTask,
    winner: MatchWinner,
    turns: u32,
}

/// Run the full round-robin
///
/// `stop` is polled before each task; raising it abandons the
/// remaining matches but still ranks what finished.
pub fn run_tournament(
    config: &TournamentConfig,
    engine: &EngineConfig,
    stop: &AtomicBool,
) -> Result<TournamentOutcome> {
    config.validate().map_err(IronwakeError::Tournament)?;
    engine.validate().map_err(IronwakeError::InvalidConfig)?;

    let difficulties = config.configurations();
    let tasks = build_tasks(config, difficulties.len());
    let scheduled = tasks.len();

    tracing::debug!(
        configs = difficulties.len(),
        matches = scheduled,
        workers = config.workers,
        "tournament laid out"
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .build()
        .map_err(|e| IronwakeError::Tournament(format!("failed to build worker pool: {e}")))?;

    let completed = AtomicUsize::new(0);
    let started = Instant::now();
    let report_every = (scheduled / 20).max(1);

    let run_one = |task: &MatchTask| -> Result<Option<TaskResult>> {
        if stop.load(Ordering::Relaxed) {
            return Ok(None);
        }

        let outcome = run_match(
            difficulties[task.config_a],
            difficulties[task.config_b],
            task.seed,
            task.first,
            engine.clone(),
        )?;

        let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
        if done % report_every == 0 {
            let elapsed = started.elapsed().as_secs_f64();
            let remaining = elapsed / done as f64 * (scheduled - done) as f64;
            eprintln!(
                "progress: {done}/{scheduled} matches ({:.0}%), ~{remaining:.0}s remaining",
                done as f64 / scheduled as f64 * 100.0
            );
        }

        Ok(Some(TaskResult { task: *task, winner: outcome.winner, turns: outcome.turns }))
    };

    let results: Vec<Result<Option<TaskResult>>> =
        pool.install(|| tasks.par_iter().map(run_one).collect());

    let mut standings: Vec<Standing> =
        difficulties.iter().map(|&d| Standing::new(d)).collect();
    let mut completed_matches = 0;

    for result in results {
        let Some(result) = result? else { continue };
        completed_matches += 1;

        let (a, b) = (result.task.config_a, result.task.config_b);
        standings[a].games += 1;
        standings[b].games += 1;
        standings[a].total_turns += result.turns as u64;
        standings[b].total_turns += result.turns as u64;

        match result.winner {
            MatchWinner::Side(Side::A) => {
                standings[a].wins += 1;
                standings[b].losses += 1;
            }
            MatchWinner::Side(Side::B) => {
                standings[b].wins += 1;
                standings[a].losses += 1;
            }
            MatchWinner::Draw => {
                standings[a].draws += 1;
                standings[b].draws += 1;
            }
        }
    }

    standings.sort_by(|x, y| {
        y.win_rate()
            .partial_cmp(&x.win_rate())
            .expect("win rates are finite")
    });

    Ok(TournamentOutcome { standings, completed_matches, scheduled_matches: scheduled })
}
