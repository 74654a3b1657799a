//! Action evaluation: expected damage, information gain, unified
//! utility
//!
//! Every candidate is scored against the marginal probability grid from
//! one belief build. The attacker's damage estimate is deliberately
//! information-poor: it knows only the damage it has dealt per cell and
//! which enemy classes survive, never true segment health.

use rand::Rng;

use crate::ai::belief::{entropy_after_attack, entropy_after_sonar, ProbGrid};
use crate::board::grid::DamageGrid;
use crate::board::view::{ViewGrid, ViewState};
use crate::core::config::EngineConfig;
use crate::core::types::Coord;
use crate::weapons::{Abilities, Action, Weapon};

/// Shared read-only inputs for one evaluation pass
pub struct EvalInputs<'a> {
    pub view: &'a ViewGrid,
    pub probs: &'a ProbGrid,
    /// Total entropy of `probs` over unresolved cells
    pub entropy: f64,
    pub damage_dealt: &'a DamageGrid,
    /// Highest per-segment max health among surviving defender ships
    pub max_alive_segment_hp: i32,
    pub alpha: f64,
}

/// A scored candidate action
#[derive(Debug, Clone)]
pub struct Candidate {
    pub action: Action,
    pub coverage: Vec<Coord>,
    pub utility: f64,
    pub expected_damage: f64,
    pub info_gain: f64,
}

/// Walk the view grid and list every action worth scoring
pub fn enumerate_actions(view: &ViewGrid, abilities: &Abilities) -> Vec<Action> {
    let mut actions = Vec::new();

    for (coord, state) in view.iter() {
        match state {
            ViewState::Miss | ViewState::Sunk => continue,
            // An air strike's power lies in its diagonals, so a dead
            // center is still a usable pivot
            ViewState::Destroyed => {
                if abilities.can_use_air {
                    actions.push(Action { weapon: Weapon::AirStrike, coord });
                }
            }
            _ => {
                actions.push(Action { weapon: Weapon::MainGun, coord });
                if abilities.can_use_air {
                    actions.push(Action { weapon: Weapon::AirStrike, coord });
                }
                if abilities.can_use_sonar && state.may_hold_ship() {
                    actions.push(Action { weapon: Weapon::Sonar, coord });
                }
            }
        }
    }

    actions
}

/// Expected effective damage of a strike over `coverage`
///
/// Remaining health per cell is estimated as the largest surviving
/// class's segment maximum minus the damage already dealt there.
pub fn expected_damage(
    coverage: &[Coord],
    cell_damage: i32,
    inputs: &EvalInputs,
) -> f64 {
    coverage
        .iter()
        .map(|&coord| {
            let estimated_remaining =
                (inputs.max_alive_segment_hp - inputs.damage_dealt.get(coord) as i32).max(0);
            let effective = cell_damage.min(estimated_remaining) as f64;
            inputs.probs.get(coord) * effective
        })
        .sum()
}

/// Unified utility of one action under the given abilities
///
/// Returns `None` when the abilities no longer allow the weapon, which
/// the risk pass uses to price a capability loss.
pub fn utility(
    action: Action,
    abilities: &Abilities,
    inputs: &EvalInputs,
    config: &EngineConfig,
) -> Option<f64> {
    if !abilities.allows(action.weapon) {
        return None;
    }

    let eps = config.prob_epsilon;
    let coverage = action.weapon.coverage(action.coord, inputs.view.side());
    let flat_entropy = inputs.entropy < eps;

    match action.weapon {
        Weapon::Sonar => {
            if flat_entropy {
                return Some(0.0);
            }
            let after = entropy_after_sonar(
                inputs.entropy,
                action.coord,
                &coverage,
                inputs.probs,
                inputs.view,
                eps,
            );
            let gain = inputs.entropy - after;
            Some(inputs.alpha * (gain / inputs.entropy))
        }
        Weapon::MainGun | Weapon::AirStrike => {
            let norm_gain = if flat_entropy {
                0.0
            } else {
                let after = entropy_after_attack(inputs.entropy, &coverage, inputs.probs, eps);
                (inputs.entropy - after) / inputs.entropy
            };

            let damage = expected_damage(&coverage, action.weapon.cell_damage(abilities), inputs);
            let ceiling = action.weapon.max_damage(abilities);
            let norm_damage = if ceiling > 0.0 { damage / ceiling } else { 0.0 };

            Some(inputs.alpha * norm_gain + (1.0 - inputs.alpha) * norm_damage)
        }
    }
}

/// Score every enumerated action
pub fn evaluate_all(
    abilities: &Abilities,
    inputs: &EvalInputs,
    config: &EngineConfig,
) -> Vec<Candidate> {
    enumerate_actions(inputs.view, abilities)
        .into_iter()
        .filter_map(|action| {
            let score = utility(action, abilities, inputs, config)?;
            let coverage = action.weapon.coverage(action.coord, inputs.view.side());
            let eps = config.prob_epsilon;
            let (expected, gain) = match action.weapon {
                Weapon::Sonar => {
                    let after = entropy_after_sonar(
                        inputs.entropy,
                        action.coord,
                        &coverage,
                        inputs.probs,
                        inputs.view,
                        eps,
                    );
                    (0.0, inputs.entropy - after)
                }
                _ => {
                    let after = entropy_after_attack(inputs.entropy, &coverage, inputs.probs, eps);
                    let dmg =
                        expected_damage(&coverage, action.weapon.cell_damage(abilities), inputs);
                    (dmg, inputs.entropy - after)
                }
            };
            Some(Candidate {
                action,
                coverage,
                utility: score,
                expected_damage: expected,
                info_gain: gain,
            })
        })
        .collect()
}

/// Uniform choice among the scores tied with the best
///
/// Returns an index into `scores`.
pub fn select_among(scores: &[f64], epsilon: f64, rng: &mut impl Rng) -> Option<usize> {
    let best = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if !best.is_finite() {
        return None;
    }
    let tied: Vec<usize> = scores
        .iter()
        .enumerate()
        .filter(|(_, &s)| s >= best - epsilon)
        .map(|(i, _)| i)
        .collect();
    Some(tied[rng.gen_range(0..tied.len())])
}

/// Record a committed action in the attacker's damage-dealt grid
pub fn commit_action(action: Action, abilities: &Abilities, damage_dealt: &mut DamageGrid) {
    match action.weapon {
        Weapon::MainGun => damage_dealt.add(action.coord, abilities.ap_damage as u32),
        Weapon::AirStrike => {
            for cell in Weapon::AirStrike.coverage(action.coord, damage_dealt.side()) {
                damage_dealt.add(cell, 1);
            }
        }
        Weapon::Sonar => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::belief::BeliefState;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const LENGTHS: [usize; 5] = [4, 4, 3, 2, 1];

    fn full_abilities() -> Abilities {
        Abilities { can_use_air: true, can_use_sonar: true, ap_damage: 3 }
    }

    fn build_inputs<'a>(
        view: &'a ViewGrid,
        probs: &'a ProbGrid,
        damage: &'a DamageGrid,
        alpha: f64,
    ) -> EvalInputs<'a> {
        EvalInputs {
            view,
            probs,
            entropy: probs.total_entropy(view, 1e-9),
            damage_dealt: damage,
            max_alive_segment_hp: 3,
            alpha,
        }
    }

    #[test]
    fn test_enumeration_skips_dead_cells() {
        let mut view = ViewGrid::new(10);
        view.set(Coord::new(0, 0), ViewState::Miss);
        view.set(Coord::new(0, 1), ViewState::Sunk);
        view.set(Coord::new(0, 2), ViewState::Destroyed);

        let actions = enumerate_actions(&view, &full_abilities());

        assert!(!actions.iter().any(|a| a.coord == Coord::new(0, 0)));
        assert!(!actions.iter().any(|a| a.coord == Coord::new(0, 1)));
        // Destroyed cells pivot air strikes only
        let at_destroyed: Vec<_> =
            actions.iter().filter(|a| a.coord == Coord::new(0, 2)).collect();
        assert_eq!(at_destroyed.len(), 1);
        assert_eq!(at_destroyed[0].weapon, Weapon::AirStrike);
    }

    #[test]
    fn test_enumeration_without_special_weapons() {
        let view = ViewGrid::new(10);
        let abilities = Abilities { can_use_air: false, can_use_sonar: false, ap_damage: 2 };
        let actions = enumerate_actions(&view, &abilities);
        assert_eq!(actions.len(), 100);
        assert!(actions.iter().all(|a| a.weapon == Weapon::MainGun));
    }

    #[test]
    fn test_no_sonar_candidate_on_hit_cells() {
        let mut view = ViewGrid::new(10);
        view.set(Coord::new(4, 4), ViewState::Hit);
        let actions = enumerate_actions(&view, &full_abilities());
        assert!(!actions
            .iter()
            .any(|a| a.weapon == Weapon::Sonar && a.coord == Coord::new(4, 4)));
        assert!(actions
            .iter()
            .any(|a| a.weapon == Weapon::MainGun && a.coord == Coord::new(4, 4)));
    }

    #[test]
    fn test_expected_damage_caps_at_estimated_remaining() {
        let view = ViewGrid::new(10);
        let probs = {
            let mut rng = StdRng::seed_from_u64(1);
            BeliefState::sample(&view, &LENGTHS, 100, 20, &mut rng)
                .unwrap()
                .marginals(&view)
        };
        let mut damage = DamageGrid::new(10);
        damage.add(Coord::new(5, 5), 2);

        let inputs = build_inputs(&view, &probs, &damage, 0.0);

        // 3 max hp minus 2 dealt leaves 1 effective point
        let capped = expected_damage(&[Coord::new(5, 5)], 3, &inputs);
        let fresh = expected_damage(&[Coord::new(5, 6)], 3, &inputs);
        let p_capped = probs.get(Coord::new(5, 5));
        let p_fresh = probs.get(Coord::new(5, 6));
        assert!((capped - p_capped * 1.0).abs() < 1e-12);
        assert!((fresh - p_fresh * 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_alpha_zero_maximizes_expected_damage() {
        let mut view = ViewGrid::new(10);
        view.set(Coord::new(2, 5), ViewState::Hit);
        let mut rng = StdRng::seed_from_u64(2);
        let probs = BeliefState::sample(&view, &LENGTHS, 300, 20, &mut rng)
            .unwrap()
            .marginals(&view);
        let damage = DamageGrid::new(10);
        let inputs = build_inputs(&view, &probs, &damage, 0.0);

        let abilities = Abilities { can_use_air: false, can_use_sonar: false, ap_damage: 3 };
        let candidates = evaluate_all(&abilities, &inputs, &EngineConfig::default());

        let best = candidates
            .iter()
            .max_by(|a, b| a.utility.partial_cmp(&b.utility).unwrap())
            .unwrap();
        let max_damage = candidates
            .iter()
            .map(|c| c.expected_damage)
            .fold(f64::NEG_INFINITY, f64::max);
        assert!((best.expected_damage - max_damage).abs() < 1e-12);
    }

    #[test]
    fn test_sonar_utility_is_pure_information() {
        let view = ViewGrid::new(10);
        let mut rng = StdRng::seed_from_u64(3);
        let probs = BeliefState::sample(&view, &LENGTHS, 100, 20, &mut rng)
            .unwrap()
            .marginals(&view);
        let damage = DamageGrid::new(10);

        // With alpha 0 the information term vanishes entirely
        let inputs = build_inputs(&view, &probs, &damage, 0.0);
        let score = utility(
            Action { weapon: Weapon::Sonar, coord: Coord::new(5, 5) },
            &full_abilities(),
            &inputs,
            &EngineConfig::default(),
        )
        .unwrap();
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_utility_none_when_weapon_unavailable() {
        let view = ViewGrid::new(10);
        let probs = ProbGrid::zeros(10);
        let damage = DamageGrid::new(10);
        let inputs = build_inputs(&view, &probs, &damage, 0.5);
        let abilities = Abilities { can_use_air: false, can_use_sonar: false, ap_damage: 1 };

        assert!(utility(
            Action { weapon: Weapon::AirStrike, coord: Coord::new(5, 5) },
            &abilities,
            &inputs,
            &EngineConfig::default(),
        )
        .is_none());
    }

    #[test]
    fn test_select_among_is_uniform_over_ties() {
        let scores = vec![1.0, 1.0, 0.2];
        let mut rng = StdRng::seed_from_u64(4);
        let mut picked = [0usize; 3];
        for _ in 0..200 {
            picked[select_among(&scores, 1e-6, &mut rng).unwrap()] += 1;
        }
        assert_eq!(picked[2], 0);
        assert!(picked[0] > 50 && picked[1] > 50);
    }

    #[test]
    fn test_commit_action_updates_damage_grid() {
        let mut damage = DamageGrid::new(10);
        let abilities = full_abilities();

        commit_action(
            Action { weapon: Weapon::MainGun, coord: Coord::new(3, 3) },
            &abilities,
            &mut damage,
        );
        assert_eq!(damage.get(Coord::new(3, 3)), 3);

        commit_action(
            Action { weapon: Weapon::AirStrike, coord: Coord::new(5, 5) },
            &abilities,
            &mut damage,
        );
        assert_eq!(damage.get(Coord::new(5, 5)), 1);
        assert_eq!(damage.get(Coord::new(4, 4)), 1);
        assert_eq!(damage.get(Coord::new(6, 6)), 1);

        commit_action(
            Action { weapon: Weapon::Sonar, coord: Coord::new(7, 7) },
            &abilities,
            &mut damage,
        );
        assert_eq!(damage.get(Coord::new(7, 7)), 0);
    }
}
