//! Headless match loop
//!
//! Drives a full AI-vs-AI match in pure data space. This is the
//! substrate for the tournament and for end-to-end verification; a
//! seeded run is bit-for-bit reproducible.

use crate::ai::difficulty::Difficulty;
use crate::core::config::EngineConfig;
use crate::core::error::Result;
use crate::core::types::{MatchWinner, Side};
use crate::sim::match_state::{Match, SideStats};

/// Result of one headless match
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub winner: MatchWinner,
    pub turns: u32,
    pub side_a: SideStats,
    pub side_b: SideStats,
}

/// Run one match to completion
///
/// Sides alternate from `first`; the configured turn cap bounds
/// divergent games as a draw.
pub fn run_match(
    difficulty_a: Difficulty,
    difficulty_b: Difficulty,
    seed: u64,
    first: Side,
    config: EngineConfig,
) -> Result<MatchOutcome> {
    let mut game = Match::with_config(seed, difficulty_a, config)?;
    game.set_difficulty(Side::B, difficulty_b);
    game.deploy(Side::A)?;
    game.deploy(Side::B)?;

    let mut side = first;
    while !game.is_finished() {
        let action = game.decide(side);
        game.resolve(side, action)?;
        side = side.opponent();
    }

    let status = game.status();
    Ok(MatchOutcome {
        winner: status.winner.expect("loop runs until finished"),
        turns: status.turn,
        side_a: status.side_a,
        side_b: status.side_b,
    })
}
