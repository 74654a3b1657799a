//! The decision function: glue over belief, evaluation, and risk
//!
//! One call builds a belief, scores every candidate, optionally bends
//! the ranking with the risk look-ahead, breaks ties uniformly, and
//! commits the chosen action to the attacker's damage-dealt grid. The
//! caller supplies the RNG; the decider reads no ambient entropy.

use rand::Rng;

use crate::ai::belief::BeliefState;
use crate::ai::difficulty::Difficulty;
use crate::ai::evaluator::{self, EvalInputs};
use crate::ai::risk::{self, RiskContext};
use crate::board::grid::DamageGrid;
use crate::board::ship::Fleet;
use crate::board::view::{ViewGrid, ViewState};
use crate::core::config::EngineConfig;
use crate::core::types::Coord;
use crate::weapons::{Abilities, Action, Weapon};

/// Choose where and with what weapon to fire
///
/// `defender_fleet` supplies only derived counts (alive lengths, sunk
/// classes); true segment health is never consulted. Pass `risk` to
/// enable the look-ahead when the difficulty asks for it.
pub fn decide(
    view: &ViewGrid,
    attacker_fleet: &Fleet,
    defender_fleet: &Fleet,
    damage_dealt: &mut DamageGrid,
    risk: Option<&RiskContext>,
    difficulty: &Difficulty,
    config: &EngineConfig,
    rng: &mut impl Rng,
) -> Action {
    let abilities = Abilities::from_fleet(attacker_fleet, config);

    // Difficulty-driven lapse of judgement
    if rng.gen::<f64>() < difficulty.randomness {
        let action = random_action(view, &abilities, config, rng);
        evaluator::commit_action(action, &abilities, damage_dealt);
        return action;
    }

    let lengths: Vec<usize> = defender_fleet.alive().map(|s| s.length()).collect();
    let belief = BeliefState::sample(
        view,
        &lengths,
        config.live_samples,
        config.attempt_factor,
        rng,
    );

    let Some(belief) = belief else {
        // Nothing consistent with the observations: degrade to the
        // random-play branch for this turn
        tracing::warn!("belief sampler exhausted; degrading to random play");
        let action = random_action(view, &abilities, config, rng);
        evaluator::commit_action(action, &abilities, damage_dealt);
        return action;
    };

    let probs = belief.marginals(view);
    let entropy = probs.total_entropy(view, config.prob_epsilon);

    let inputs = EvalInputs {
        view,
        probs: &probs,
        entropy,
        damage_dealt,
        max_alive_segment_hp: defender_fleet.max_alive_segment_hp(),
        alpha: difficulty.alpha,
    };

    let candidates = evaluator::evaluate_all(&abilities, &inputs, config);
    if candidates.is_empty() {
        let action = random_action(view, &abilities, config, rng);
        evaluator::commit_action(action, &abilities, damage_dealt);
        return action;
    }

    let scores: Vec<f64> = if difficulty.risk_awareness > 0.0 {
        if let Some(ctx) = risk {
            let sink = risk::rollout_sink_probabilities(
                attacker_fleet,
                ctx,
                difficulty.alpha,
                config,
                rng,
            );
            candidates
                .iter()
                .map(|c| {
                    let bonus = risk::risk_bonus(c, attacker_fleet, &sink, &inputs, config);
                    c.utility * (1.0 + difficulty.risk_awareness * bonus)
                })
                .collect()
        } else {
            candidates.iter().map(|c| c.utility).collect()
        }
    } else {
        candidates.iter().map(|c| c.utility).collect()
    };

    let chosen = evaluator::select_among(&scores, config.score_epsilon, rng)
        .expect("candidate list is non-empty");
    let action = candidates[chosen].action;
    evaluator::commit_action(action, &abilities, damage_dealt);
    action
}

/// Random-play fallback: a fresh-ish cell and a mostly-main-gun weapon
pub fn random_action(
    view: &ViewGrid,
    abilities: &Abilities,
    config: &EngineConfig,
    rng: &mut impl Rng,
) -> Action {
    let side = view.side() as i32;

    let mut coord = None;
    for _ in 0..config.fallback_attempts {
        let candidate = Coord::new(rng.gen_range(0..side), rng.gen_range(0..side));
        if !matches!(
            view.get(candidate),
            ViewState::Miss | ViewState::Destroyed | ViewState::Sunk
        ) {
            coord = Some(candidate);
            break;
        }
    }
    let coord = coord.unwrap_or_else(|| {
        // Settle for any non-miss cell; a board of nothing but misses
        // cannot occur while the match is still running
        let fallback: Vec<Coord> = view
            .iter()
            .filter(|(_, s)| *s != ViewState::Miss)
            .map(|(c, _)| c)
            .collect();
        if fallback.is_empty() {
            Coord::new(rng.gen_range(0..side), rng.gen_range(0..side))
        } else {
            fallback[rng.gen_range(0..fallback.len())]
        }
    });

    let weapon = if abilities.can_use_air && rng.gen::<f64>() < config.fallback_special_chance {
        Weapon::AirStrike
    } else if abilities.can_use_sonar && rng.gen::<f64>() < config.fallback_special_chance {
        Weapon::Sonar
    } else {
        Weapon::MainGun
    };

    Action { weapon, coord }
}
