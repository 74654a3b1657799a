//! Difficulty triples governing the decision engine
//!
//! `alpha` trades expected damage against information gain,
//! `randomness` is the chance a turn skips evaluation entirely, and
//! `risk_awareness` scales how much the look-ahead bonus bends the
//! final ranking.

use serde::{Deserialize, Serialize};

/// (alpha, randomness, risk_awareness)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    pub alpha: f64,
    pub randomness: f64,
    pub risk_awareness: f64,
}

impl Difficulty {
    pub fn new(alpha: f64, randomness: f64, risk_awareness: f64) -> Self {
        Self { alpha, randomness, risk_awareness }
    }

    pub fn easy() -> Self {
        Self::new(0.1, 0.6, 0.1)
    }

    pub fn normal() -> Self {
        Self::new(0.4, 0.3, 0.2)
    }

    pub fn hard() -> Self {
        Self::new(0.7, 0.0, 0.4)
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::normal()
    }
}
