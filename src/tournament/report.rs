//! Tournament reporting: ranked stdout table and JSON persistence

use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::tournament::grid::TournamentConfig;
use crate::tournament::harness::TournamentOutcome;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigRecord {
    pub alpha: f64,
    pub risk_awareness: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultRecord {
    pub config: ConfigRecord,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub games: u32,
    pub win_rate: f64,
    pub avg_turns: f64,
}

/// Persisted shape of a finished tournament
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentReport {
    pub config: TournamentConfig,
    /// Unix seconds at report time
    pub timestamp: u64,
    pub results: Vec<ResultRecord>,
}

pub fn build_report(config: &TournamentConfig, outcome: &TournamentOutcome) -> TournamentReport {
    TournamentReport {
        config: config.clone(),
        timestamp: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs(),
        results: outcome
            .standings
            .iter()
            .map(|s| ResultRecord {
                config: ConfigRecord {
                    alpha: s.difficulty.alpha,
                    risk_awareness: s.difficulty.risk_awareness,
                },
                wins: s.wins,
                losses: s.losses,
                draws: s.draws,
                games: s.games,
                win_rate: s.win_rate(),
                avg_turns: s.avg_turns(),
            })
            .collect(),
    }
}

/// Write the full ranking as pretty JSON
pub fn write_report(path: &Path, report: &TournamentReport) -> Result<()> {
    fs::write(path, serde_json::to_string_pretty(report)?)?;
    Ok(())
}

/// Print the leading configurations as a table
pub fn print_top(outcome: &TournamentOutcome, top_n: usize) {
    println!("Rank  Alpha  Risk   W    L    D  WinRate  AvgTurns");
    println!("----  -----  ----  ---  ---  ---  -------  --------");
    for (rank, s) in outcome.standings.iter().take(top_n).enumerate() {
        println!(
            "{:>4}  {:>5.2} {:>5.2}  {:>3}  {:>3}  {:>3}  {:>6.1}%  {:>8.1}",
            rank + 1,
            s.difficulty.alpha,
            s.difficulty.risk_awareness,
            s.wins,
            s.losses,
            s.draws,
            s.win_rate() * 100.0,
            s.avg_turns(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::difficulty::Difficulty;
    use crate::tournament::harness::Standing;

    fn sample_outcome() -> TournamentOutcome {
        TournamentOutcome {
            standings: vec![Standing {
                difficulty: Difficulty::new(0.4, 0.0, 0.2),
                wins: 12,
                losses: 6,
                draws: 2,
                games: 20,
                total_turns: 1500,
            }],
            completed_matches: 10,
            scheduled_matches: 10,
        }
    }

    #[test]
    fn test_report_shape() {
        let config = TournamentConfig::default();
        let report = build_report(&config, &sample_outcome());

        assert!(report.timestamp > 0);
        assert_eq!(report.results.len(), 1);
        let result = &report.results[0];
        assert_eq!(result.wins, 12);
        assert!((result.win_rate - 0.6).abs() < 1e-12);
        assert!((result.avg_turns - 75.0).abs() < 1e-12);
    }

    #[test]
    fn test_report_round_trips_through_json() {
        let config = TournamentConfig::default();
        let report = build_report(&config, &sample_outcome());
        let text = serde_json::to_string(&report).unwrap();
        let back: TournamentReport = serde_json::from_str(&text).unwrap();
        assert_eq!(back.results.len(), report.results.len());
        assert_eq!(back.results[0].games, 20);
    }
}
