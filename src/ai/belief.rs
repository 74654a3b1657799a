//! Belief engine: Monte Carlo sampling of hidden ship layouts
//!
//! From a fog-of-war view we derive hard constraints (cells a ship must
//! cover, cells it must avoid) and soft ones (sonar suspects), then
//! rejection-sample whole-fleet configurations. The marginal occupancy
//! grid and its entropy are everything downstream consumers need; the
//! belief itself lives only for the duration of one decision.

use rand::Rng;

use crate::board::placement::{legal_placements, Placement};
use crate::board::view::{ViewGrid, ViewState};
use crate::core::types::Coord;

/// Observation constraints derived from a view grid
#[derive(Debug, Clone)]
pub struct Constraints {
    side: usize,
    /// Cells some placement must cover (view Hit or Destroyed)
    pub must_hit: Vec<Coord>,
    /// Cells no placement may touch (view Miss or Sunk)
    must_avoid: Vec<bool>,
    /// Sonar-flagged cells, rewarded during sampling
    suspect: Vec<bool>,
    /// Hit/Destroyed flags, rewarded harder
    struck: Vec<bool>,
}

impl Constraints {
    pub fn from_view(view: &ViewGrid) -> Self {
        let side = view.side();
        let mut must_hit = Vec::new();
        let mut must_avoid = vec![false; side * side];
        let mut suspect = vec![false; side * side];
        let mut struck = vec![false; side * side];

        for (coord, state) in view.iter() {
            let idx = coord.r as usize * side + coord.c as usize;
            match state {
                ViewState::Hit | ViewState::Destroyed => {
                    must_hit.push(coord);
                    struck[idx] = true;
                }
                ViewState::Miss | ViewState::Sunk => must_avoid[idx] = true,
                ViewState::Suspect => suspect[idx] = true,
                ViewState::Unknown => {}
            }
        }

        Self { side, must_hit, must_avoid, suspect, struck }
    }

    fn idx(&self, coord: Coord) -> usize {
        coord.r as usize * self.side + coord.c as usize
    }

    pub fn avoided(&self, coord: Coord) -> bool {
        self.must_avoid[self.idx(coord)]
    }

    fn placement_weight(&self, placement: &Placement) -> u64 {
        let mut struck_count = 0u64;
        let mut suspect_count = 0u64;
        for cell in placement.cells() {
            let idx = self.idx(cell);
            if self.struck[idx] {
                struck_count += 1;
            }
            if self.suspect[idx] {
                suspect_count += 1;
            }
        }
        1 + 10 * struck_count + 2 * suspect_count
    }
}

/// A finite multiset of admissible fleet configurations
#[derive(Debug, Clone)]
pub struct BeliefState {
    side: usize,
    samples: Vec<Vec<Placement>>,
}

impl BeliefState {
    /// Sample `count` configurations of the given ship lengths
    ///
    /// Lengths are placed longest first. Sampling spends at most
    /// `attempt_factor * count` draws; a short harvest is padded by
    /// resampling with replacement, and an empty one returns `None`
    /// (the exhausted-sampler degradation).
    pub fn sample(
        view: &ViewGrid,
        ship_lengths: &[usize],
        count: usize,
        attempt_factor: usize,
        rng: &mut impl Rng,
    ) -> Option<BeliefState> {
        let constraints = Constraints::from_view(view);

        let mut lengths: Vec<usize> = ship_lengths.to_vec();
        lengths.sort_unstable_by(|a, b| b.cmp(a));

        let budget = attempt_factor.saturating_mul(count);
        let mut samples = Vec::with_capacity(count);
        for _ in 0..budget {
            if samples.len() >= count {
                break;
            }
            if let Some(config) = sample_configuration(&constraints, &lengths, rng) {
                samples.push(config);
            }
        }

        if samples.is_empty() {
            return None;
        }

        // Oversampling beats under-weighting rare constraints
        while samples.len() < count {
            let pick = rng.gen_range(0..samples.len());
            samples.push(samples[pick].clone());
        }

        Some(BeliefState { side: view.side(), samples })
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Per-cell occupancy probability, with observed cells forced to
    /// their known truth
    pub fn marginals(&self, view: &ViewGrid) -> ProbGrid {
        let side = self.side;
        let mut counts = vec![0u32; side * side];

        for config in &self.samples {
            for placement in config {
                for cell in placement.cells() {
                    counts[cell.r as usize * side + cell.c as usize] += 1;
                }
            }
        }

        let total = self.samples.len() as f64;
        let mut p: Vec<f64> = counts.iter().map(|&c| c as f64 / total).collect();

        for (coord, state) in view.iter() {
            let idx = coord.r as usize * side + coord.c as usize;
            match state {
                ViewState::Hit => p[idx] = 1.0,
                ViewState::Miss | ViewState::Destroyed | ViewState::Sunk => p[idx] = 0.0,
                _ => {}
            }
        }

        ProbGrid { side, p }
    }
}

fn sample_configuration(
    constraints: &Constraints,
    lengths: &[usize],
    rng: &mut impl Rng,
) -> Option<Vec<Placement>> {
    let side = constraints.side;
    let mut occupied = vec![false; side * side];
    let mut config = Vec::with_capacity(lengths.len());

    for &length in lengths {
        let candidates = legal_placements(side, length, |c| {
            !occupied[c.r as usize * side + c.c as usize] && !constraints.avoided(c)
        });
        if candidates.is_empty() {
            return None;
        }

        let weights: Vec<u64> = candidates
            .iter()
            .map(|p| constraints.placement_weight(p))
            .collect();
        let total: u64 = weights.iter().sum();
        let mut pick = rng.gen_range(0..total);
        let mut chosen = candidates.len() - 1;
        for (i, &w) in weights.iter().enumerate() {
            if pick < w {
                chosen = i;
                break;
            }
            pick -= w;
        }

        let placement = candidates[chosen];
        for cell in placement.cells() {
            occupied[cell.r as usize * side + cell.c as usize] = true;
        }
        config.push(placement);
    }

    // Hard constraint: every struck cell must be explained
    for &hit in &constraints.must_hit {
        if !occupied[hit.r as usize * side + hit.c as usize] {
            return None;
        }
    }

    Some(config)
}

/// Marginal occupancy probabilities for one view
#[derive(Debug, Clone)]
pub struct ProbGrid {
    side: usize,
    p: Vec<f64>,
}

impl ProbGrid {
    /// The all-zeros grid the engine degrades to when sampling fails
    pub fn zeros(side: usize) -> Self {
        Self { side, p: vec![0.0; side * side] }
    }

    pub fn get(&self, coord: Coord) -> f64 {
        if coord.in_bounds(self.side) {
            self.p[coord.r as usize * self.side + coord.c as usize]
        } else {
            0.0
        }
    }

    /// Total uncertainty: binary entropy summed over unresolved cells
    pub fn total_entropy(&self, view: &ViewGrid, eps: f64) -> f64 {
        view.iter()
            .filter(|(_, state)| state.may_hold_ship())
            .map(|(coord, _)| binary_entropy(self.get(coord), eps))
            .sum()
    }
}

/// H2(p), zero within `eps` of either end
pub fn binary_entropy(p: f64, eps: f64) -> f64 {
    if p < eps || p > 1.0 - eps {
        return 0.0;
    }
    -p * p.log2() - (1.0 - p) * (1.0 - p).log2()
}

/// Expected entropy after an attack-shaped strike on `coverage`
///
/// Striking a cell reveals its occupancy, eliminating its binary
/// entropy in expectation.
pub fn entropy_after_attack(
    entropy: f64,
    coverage: &[Coord],
    probs: &ProbGrid,
    eps: f64,
) -> f64 {
    let removed: f64 = coverage.iter().map(|&c| binary_entropy(probs.get(c), eps)).sum();
    (entropy - removed).max(0.0)
}

/// Expected entropy after a sonar scan centered on `center`
pub fn entropy_after_sonar(
    entropy: f64,
    center: Coord,
    area: &[Coord],
    probs: &ProbGrid,
    view: &ViewGrid,
    eps: f64,
) -> f64 {
    let p_center = probs.get(center);
    let area_sum: f64 = area
        .iter()
        .filter(|&&c| view.get(c).may_hold_ship())
        .map(|&c| binary_entropy(probs.get(c), eps))
        .sum();

    // Contact branch reveals the center; no-contact clears the area
    let expected = p_center * (entropy - binary_entropy(p_center, eps))
        + (1.0 - p_center) * (entropy - area_sum);
    (entropy - (entropy - expected).max(0.0)).max(0.0)
}
