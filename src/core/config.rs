//! Engine configuration with documented constants
//!
//! All tunable values are collected here with explanations of their
//! purpose and how they interact with each other.

use crate::board::ship::ShipClass;

/// Configuration for the decision engine and simulator
///
/// The defaults reproduce the shipping game's behavior. Changing them
/// affects decision quality, decision latency, and match pacing.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    // === BOARD ===
    /// Side length of the square board
    pub board_side: usize,

    // === BELIEF SAMPLING ===
    /// Configurations sampled for a live decision
    ///
    /// Higher values tighten the marginal probability grid at the cost
    /// of decision latency. 700 keeps a decision well under the soft
    /// per-turn budget on a desktop host.
    pub live_samples: usize,

    /// Configurations sampled inside the risk roll-out
    ///
    /// The roll-out runs the sampler once per simulated enemy turn, so
    /// this is deliberately much smaller than `live_samples`.
    pub rollout_samples: usize,

    /// Attempt budget multiplier for the rejection sampler
    ///
    /// Sampling stops after `attempt_factor * samples` draws even if
    /// fewer configurations were accepted. Short sets are padded by
    /// resampling with replacement; an empty set degrades the turn to
    /// the random-play branch.
    pub attempt_factor: usize,

    // === RISK LOOK-AHEAD ===
    /// Simulated enemy turns in the self-roll-out
    pub lookahead_depth: usize,

    /// Sink probability at or above which a ship counts as endangered
    pub endangered_threshold: f64,

    // === MATCH LOOP ===
    /// Hard turn cap; reaching it ends the match as a draw
    pub turn_cap: u32,

    // === DEPLOYMENT ===
    /// Preferred minimum Euclidean distance between ships
    pub ideal_spacing: f64,

    /// Spacing floor; below this the distance filter gives up and the
    /// top distance-maximizing placements are used instead
    pub min_spacing: f64,

    /// Step by which the spacing requirement is relaxed
    pub spacing_step: f64,

    /// Candidate pool kept when even the spacing floor filters out
    /// every placement
    pub spacing_fallback_pool: usize,

    // === WEAPONS ===
    /// Ship classes whose survival enables sonar
    pub sonar_sensors: Vec<ShipClass>,

    // === DECISION ===
    /// Scores within this distance of the best are considered tied
    pub score_epsilon: f64,

    /// Probabilities within this distance of 0 or 1 contribute no
    /// entropy
    pub prob_epsilon: f64,

    /// Attempts the random-play fallback spends looking for a fresh
    /// cell before settling for any non-miss cell
    pub fallback_attempts: usize,

    /// Chance the random-play fallback fires a special weapon
    /// (air strike first, then sonar) instead of the main gun
    pub fallback_special_chance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            board_side: 10,

            live_samples: 700,
            rollout_samples: 50,
            attempt_factor: 20,

            lookahead_depth: 5,
            endangered_threshold: 0.2,

            turn_cap: 200,

            ideal_spacing: 5.0,
            min_spacing: 1.5,
            spacing_step: 0.5,
            spacing_fallback_pool: 5,

            sonar_sensors: vec![ShipClass::Destroyer],

            score_epsilon: 1e-6,
            prob_epsilon: 1e-9,
            fallback_attempts: 100,
            fallback_special_chance: 0.1,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        // Longest ship must fit on the board
        let longest = ShipClass::ROSTER.iter().map(|c| c.length()).max().unwrap_or(0);
        if self.board_side < longest {
            return Err(format!(
                "board_side ({}) is smaller than the longest ship ({})",
                self.board_side, longest
            ));
        }

        if self.live_samples == 0 || self.rollout_samples == 0 {
            return Err("sample counts must be positive".into());
        }

        if self.attempt_factor == 0 {
            return Err("attempt_factor must be positive".into());
        }

        if self.min_spacing > self.ideal_spacing {
            return Err(format!(
                "min_spacing ({}) should be <= ideal_spacing ({})",
                self.min_spacing, self.ideal_spacing
            ));
        }

        if self.spacing_step <= 0.0 {
            return Err("spacing_step must be positive".into());
        }

        if !(0.0..=1.0).contains(&self.fallback_special_chance) {
            return Err("fallback_special_chance must be in [0, 1]".into());
        }

        if !(0.0..=1.0).contains(&self.endangered_threshold) {
            return Err("endangered_threshold must be in [0, 1]".into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_tiny_board_rejected() {
        let mut config = EngineConfig::default();
        config.board_side = 3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_spacing_rejected() {
        let mut config = EngineConfig::default();
        config.min_spacing = 6.0;
        assert!(config.validate().is_err());
    }
}
