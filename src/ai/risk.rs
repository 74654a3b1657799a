//! Risk look-ahead: bounded symmetric self-roll-out
//!
//! The engine turns the evaluator on itself: it simulates a handful of
//! opponent turns against its own exposed board, accumulates the
//! expected damage each of its ships would soak, and converts that into
//! per-ship sink probabilities. Actions that exercise a capability
//! about to disappear get a score bonus proportional to the danger.

use std::collections::HashMap;

use rand::Rng;

use crate::ai::belief::BeliefState;
use crate::ai::evaluator::{self, Candidate, EvalInputs};
use crate::board::grid::{Board, DamageGrid};
use crate::board::ship::{Fleet, ShipId};
use crate::board::view::{ViewGrid, ViewState};
use crate::core::config::EngineConfig;
use crate::weapons::Abilities;

/// What the roll-out needs to impersonate the opponent
pub struct RiskContext<'a> {
    /// The deciding side's own board (ground truth it legitimately knows)
    pub own_board: &'a Board,
    /// The opponent's current view of that board
    pub opponent_view: &'a ViewGrid,
    /// The opponent's surviving fleet (their abilities)
    pub opponent_fleet: &'a Fleet,
    /// Damage the opponent has dealt so far
    pub opponent_damage: &'a DamageGrid,
}

/// Sink probability per surviving own ship after the roll-out
pub type SinkProbabilities = HashMap<ShipId, f64>;

/// Simulate `lookahead_depth` opponent turns and tally the threat
pub fn rollout_sink_probabilities(
    own_fleet: &Fleet,
    ctx: &RiskContext,
    alpha: f64,
    config: &EngineConfig,
    rng: &mut impl Rng,
) -> SinkProbabilities {
    let mut sim_view = ctx.opponent_view.clone();
    let mut sim_damage = ctx.opponent_damage.clone();
    let opponent_abilities = Abilities::from_fleet(ctx.opponent_fleet, config);

    let mut tallies: HashMap<ShipId, f64> = HashMap::new();

    for _ in 0..config.lookahead_depth {
        let lengths: Vec<usize> = own_fleet.alive().map(|s| s.length()).collect();
        if lengths.is_empty() {
            break;
        }

        let Some(belief) = BeliefState::sample(
            &sim_view,
            &lengths,
            config.rollout_samples,
            config.attempt_factor,
            rng,
        ) else {
            break;
        };
        let probs = belief.marginals(&sim_view);
        let entropy = probs.total_entropy(&sim_view, config.prob_epsilon);

        let inputs = EvalInputs {
            view: &sim_view,
            probs: &probs,
            entropy,
            damage_dealt: &sim_damage,
            max_alive_segment_hp: own_fleet.max_alive_segment_hp(),
            alpha,
        };

        let candidates = evaluator::evaluate_all(&opponent_abilities, &inputs, config);
        let Some(best) = candidates.iter().max_by(|a, b| {
            a.utility.partial_cmp(&b.utility).expect("utilities are finite")
        }) else {
            break;
        };
        let best: Candidate = best.clone();

        // Threat lands where the simulated strike meets a real ship
        let cell_damage = best.action.weapon.cell_damage(&opponent_abilities);
        for &cell in &best.coverage {
            if let Some(occupant) = ctx.own_board.get(cell).and_then(|c| c.occupant) {
                if own_fleet.get(occupant.ship).is_some_and(|s| !s.sunk) {
                    *tallies.entry(occupant.ship).or_default() +=
                        probs.get(cell) * cell_damage as f64;
                }
            }
        }

        // Advance the imagined view so the next turn aims elsewhere
        for &cell in &best.coverage {
            if sim_view.get(cell).may_hold_ship() {
                let state = if probs.get(cell) > 0.5 {
                    ViewState::Hit
                } else {
                    ViewState::Miss
                };
                sim_view.set(cell, state);
            }
        }
        evaluator::commit_action(best.action, &opponent_abilities, &mut sim_damage);
    }

    own_fleet
        .alive()
        .map(|ship| {
            let tally = tallies.get(&ship.id).copied().unwrap_or(0.0);
            let hp = ship.remaining_hp() as f64;
            let probability = if hp > 0.0 { (tally / hp).min(1.0) } else { 1.0 };
            (ship.id, probability)
        })
        .collect()
}

/// Normalized risk bonus for one candidate action
///
/// Averages, over endangered ships, the utility the action would lose
/// if that ship went down; an action that disappears outright loses its
/// full current utility.
pub fn risk_bonus(
    candidate: &Candidate,
    own_fleet: &Fleet,
    sink_probabilities: &SinkProbabilities,
    inputs: &EvalInputs,
    config: &EngineConfig,
) -> f64 {
    // Walk in fleet order so the summation is deterministic
    let endangered: Vec<(ShipId, f64)> = own_fleet
        .alive()
        .filter_map(|ship| {
            let p = sink_probabilities.get(&ship.id).copied().unwrap_or(0.0);
            (p >= config.endangered_threshold).then_some((ship.id, p))
        })
        .collect();

    if endangered.is_empty() {
        return 0.0;
    }

    let mut total = 0.0;
    for (ship_id, sink_probability) in &endangered {
        let after = Abilities::without_ship(own_fleet, *ship_id, config);
        let loss = match evaluator::utility(candidate.action, &after, inputs, config) {
            Some(utility_after) => candidate.utility - utility_after,
            None => candidate.utility,
        };
        total += sink_probability * loss;
    }

    total / endangered.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::belief::ProbGrid;
    use crate::board::placement::place_ship;
    use crate::board::ship::{Ship, ShipClass};
    use crate::core::types::{Coord, Orientation};
    use crate::weapons::{Action, Weapon};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fleet_of(classes: &[ShipClass]) -> Fleet {
        let mut fleet = Fleet::new();
        for (i, &class) in classes.iter().enumerate() {
            fleet
                .ships
                .push(Ship::new(class, 2 * i as i32, 0, Orientation::Horizontal));
        }
        fleet
    }

    #[test]
    fn test_rollout_threatens_exposed_ships() {
        let config = EngineConfig::default();
        let mut board = Board::new(config.board_side);
        let mut own_fleet = Fleet::new();
        for &(class, r, c) in &[
            (ShipClass::Carrier, 0, 0),
            (ShipClass::Battleship, 2, 0),
            (ShipClass::LightCruiser, 4, 0),
            (ShipClass::Submarine, 6, 0),
            (ShipClass::Destroyer, 8, 0),
        ] {
            place_ship(&mut board, &mut own_fleet, class, r, c, Orientation::Horizontal).unwrap();
        }

        // Opponent has already found the carrier's first segment
        let mut opponent_view = ViewGrid::new(config.board_side);
        opponent_view.set(Coord::new(0, 0), ViewState::Hit);

        let opponent_fleet = fleet_of(&ShipClass::ROSTER);
        let opponent_damage = DamageGrid::new(config.board_side);
        let ctx = RiskContext {
            own_board: &board,
            opponent_view: &opponent_view,
            opponent_fleet: &opponent_fleet,
            opponent_damage: &opponent_damage,
        };

        let mut rng = StdRng::seed_from_u64(11);
        let sink = rollout_sink_probabilities(&own_fleet, &ctx, 0.0, &config, &mut rng);

        assert_eq!(sink.len(), 5);
        for &p in sink.values() {
            assert!((0.0..=1.0).contains(&p));
        }
        // A damage-greedy opponent with a confirmed hit hammers the
        // carrier's neighborhood
        let carrier = own_fleet.ships[0].id;
        assert!(sink[&carrier] > 0.0);
    }

    #[test]
    fn test_risk_bonus_zero_without_endangered_ships() {
        let config = EngineConfig::default();
        let own_fleet = fleet_of(&ShipClass::ROSTER);
        let sink: SinkProbabilities =
            own_fleet.ships.iter().map(|s| (s.id, 0.05)).collect();

        let view = ViewGrid::new(10);
        let probs = ProbGrid::zeros(10);
        let damage = DamageGrid::new(10);
        let inputs = EvalInputs {
            view: &view,
            probs: &probs,
            entropy: 0.0,
            damage_dealt: &damage,
            max_alive_segment_hp: 3,
            alpha: 0.5,
        };
        let candidate = Candidate {
            action: Action { weapon: Weapon::AirStrike, coord: Coord::new(5, 5) },
            coverage: Weapon::AirStrike.coverage(Coord::new(5, 5), 10),
            utility: 0.4,
            expected_damage: 0.0,
            info_gain: 0.0,
        };

        assert_eq!(risk_bonus(&candidate, &own_fleet, &sink, &inputs, &config), 0.0);
    }

    #[test]
    fn test_risk_bonus_prices_losing_the_carrier() {
        let config = EngineConfig::default();
        let own_fleet = fleet_of(&ShipClass::ROSTER);
        let carrier = own_fleet
            .ships
            .iter()
            .find(|s| s.class == ShipClass::Carrier)
            .unwrap()
            .id;

        // Only the carrier is endangered
        let sink: SinkProbabilities = own_fleet
            .ships
            .iter()
            .map(|s| (s.id, if s.id == carrier { 0.8 } else { 0.0 }))
            .collect();

        let view = ViewGrid::new(10);
        let mut rng = StdRng::seed_from_u64(12);
        let probs = BeliefState::sample(&view, &[4, 4, 3, 2, 1], 100, 20, &mut rng)
            .unwrap()
            .marginals(&view);
        let damage = DamageGrid::new(10);
        let inputs = EvalInputs {
            view: &view,
            probs: &probs,
            entropy: probs.total_entropy(&view, config.prob_epsilon),
            damage_dealt: &damage,
            max_alive_segment_hp: 3,
            alpha: 0.5,
        };
        let abilities = Abilities::from_fleet(&own_fleet, &config);

        let score = |weapon| {
            let action = Action { weapon, coord: Coord::new(5, 5) };
            Candidate {
                action,
                coverage: weapon.coverage(Coord::new(5, 5), 10),
                utility: evaluator::utility(action, &abilities, &inputs, &config).unwrap(),
                expected_damage: 0.0,
                info_gain: 0.0,
            }
        };

        // Air strikes vanish with the carrier: full utility at stake
        let air = score(Weapon::AirStrike);
        let bonus = risk_bonus(&air, &own_fleet, &sink, &inputs, &config);
        assert!((bonus - 0.8 * air.utility).abs() < 1e-12);
        assert!(bonus > 0.0);

        // The main gun survives a carrier loss unchanged
        let gun = score(Weapon::MainGun);
        let bonus = risk_bonus(&gun, &own_fleet, &sink, &inputs, &config);
        assert!(bonus.abs() < 1e-12);
    }
}
