//! Headless simulation: the match container and the two-sided loop

pub mod match_state;
pub mod runner;

pub use match_state::{Match, MatchStatus, SideState, SideStats};
pub use runner::{run_match, MatchOutcome};
