//! Parameter grid and pairings for the self-play tournament
//!
//! The grid spans alpha and risk awareness; randomness is pinned to
//! zero so every configuration plays its best game.

use serde::{Deserialize, Serialize};

use crate::ai::difficulty::Difficulty;

/// An inclusive `[min, max]` range walked in `step` increments
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ParamRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ParamRange {
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// A range collapsed to a single value
    pub fn fixed(value: f64) -> Self {
        Self { min: value, max: value, step: 1.0 }
    }

    pub fn values(&self) -> Vec<f64> {
        let mut out = Vec::new();
        let mut v = self.min;
        // Half-step tolerance absorbs float drift at the top end
        while v <= self.max + self.step * 0.5 {
            out.push(v.min(self.max));
            v += self.step;
        }
        out
    }
}

/// Everything the harness needs to lay out a tournament
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentConfig {
    pub alpha: ParamRange,
    pub risk: ParamRange,
    pub games_per_pair: u32,
    pub workers: usize,
    pub seed: u64,
    pub top_n: usize,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            alpha: ParamRange::new(0.0, 1.0, 0.1),
            risk: ParamRange::new(0.0, 0.5, 0.1),
            games_per_pair: 20,
            workers: default_workers(),
            seed: 1,
            top_n: 20,
        }
    }
}

pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

impl TournamentConfig {
    /// The cartesian product of the two ranges, randomness pinned to 0
    pub fn configurations(&self) -> Vec<Difficulty> {
        let mut out = Vec::new();
        for &alpha in &self.alpha.values() {
            for &risk in &self.risk.values() {
                out.push(Difficulty::new(alpha, 0.0, risk));
            }
        }
        out
    }

    /// Unordered round-robin pairings over `n` configurations
    pub fn pairings(n: usize) -> Vec<(usize, usize)> {
        let mut out = Vec::with_capacity(n * (n.saturating_sub(1)) / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                out.push((i, j));
            }
        }
        out
    }

    pub fn validate(&self) -> Result<(), String> {
        for (name, range) in [("alpha", &self.alpha), ("risk", &self.risk)] {
            if range.step <= 0.0 {
                return Err(format!("{name} step must be positive"));
            }
            if range.min > range.max {
                return Err(format!("{name} range is inverted"));
            }
        }
        if !(0.0..=1.0).contains(&self.alpha.min) || !(0.0..=1.0).contains(&self.alpha.max) {
            return Err("alpha must stay within [0, 1]".into());
        }
        if self.games_per_pair == 0 {
            return Err("games per pair must be positive".into());
        }
        if self.workers == 0 {
            return Err("worker count must be positive".into());
        }
        if self.configurations().len() < 2 {
            return Err("grid needs at least two configurations to pair".into());
        }
        Ok(())
    }
}

/// Canned tournament shapes selectable from the CLI
pub fn preset(name: &str) -> Option<TournamentConfig> {
    let base = TournamentConfig::default();
    match name {
        "test" => Some(TournamentConfig {
            alpha: ParamRange::new(0.0, 1.0, 0.5),
            risk: ParamRange::new(0.0, 0.4, 0.4),
            games_per_pair: 2,
            ..base
        }),
        "quick" => Some(TournamentConfig {
            alpha: ParamRange::new(0.1, 0.9, 0.2),
            risk: ParamRange::new(0.0, 0.4, 0.2),
            games_per_pair: 6,
            ..base
        }),
        "default" => Some(base),
        "full" => Some(TournamentConfig {
            alpha: ParamRange::new(0.0, 1.0, 0.05),
            risk: ParamRange::new(0.0, 0.6, 0.1),
            games_per_pair: 30,
            ..base
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_values_inclusive() {
        let values = ParamRange::new(0.0, 1.0, 0.5).values();
        assert_eq!(values, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_range_values_survive_float_drift() {
        // 0.1 steps accumulate error; the top end must still appear
        let values = ParamRange::new(0.0, 1.0, 0.1).values();
        assert_eq!(values.len(), 11);
        assert!((values[10] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_configurations_pin_randomness() {
        let config = preset("test").unwrap();
        let configs = config.configurations();
        assert_eq!(configs.len(), 6);
        assert!(configs.iter().all(|d| d.randomness == 0.0));
    }

    #[test]
    fn test_pairings_count() {
        let pairs = TournamentConfig::pairings(6);
        assert_eq!(pairs.len(), 15);
        assert!(pairs.iter().all(|&(i, j)| i < j));
    }

    #[test]
    fn test_validate_rejects_bad_ranges() {
        let mut config = TournamentConfig::default();
        config.alpha.step = 0.0;
        assert!(config.validate().is_err());

        let mut config = TournamentConfig::default();
        config.risk.min = 0.5;
        config.risk.max = 0.1;
        assert!(config.validate().is_err());

        let mut config = TournamentConfig::default();
        config.alpha = ParamRange::fixed(0.5);
        config.risk = ParamRange::fixed(0.0);
        assert!(config.validate().is_err(), "single config cannot pair");
    }

    #[test]
    fn test_unknown_preset() {
        assert!(preset("turbo").is_none());
    }
}
