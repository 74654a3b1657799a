//! Match state and the host-facing API
//!
//! A match owns both sides' boards, rosters, fog-of-war views, and
//! damage ledgers, plus the seeded RNG every random draw flows through.
//! Hosts drive it with deploy/decide/resolve/status; the headless
//! runner and the tournament build on the same five calls.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::ai::decider;
use crate::ai::difficulty::Difficulty;
use crate::ai::risk::RiskContext;
use crate::board::grid::{Board, DamageGrid};
use crate::board::placement::{self, deploy_fleet};
use crate::board::ship::{Fleet, ShipClass, ShipId};
use crate::board::view::{ViewGrid, ViewState};
use crate::core::config::EngineConfig;
use crate::core::error::{IronwakeError, Result};
use crate::core::types::{MatchWinner, Orientation, Side};
use crate::weapons::{resolve_action, Abilities, Action, Event, ResolveContext};

/// Per-side running totals
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SideStats {
    pub shots: u32,
    pub hits: u32,
    pub damage_dealt: u32,
}

/// Everything one side owns
#[derive(Debug, Clone)]
pub struct SideState {
    pub board: Board,
    pub fleet: Fleet,
    /// This side's view of the opponent
    pub view: ViewGrid,
    /// Damage this side has dealt, per opponent coordinate
    pub damage: DamageGrid,
    pub difficulty: Difficulty,
    pub stats: SideStats,
}

impl SideState {
    fn new(board_side: usize, difficulty: Difficulty) -> Self {
        Self {
            board: Board::new(board_side),
            fleet: Fleet::new(),
            view: ViewGrid::new(board_side),
            damage: DamageGrid::new(board_side),
            difficulty,
            stats: SideStats::default(),
        }
    }
}

/// Snapshot returned by [`Match::status`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchStatus {
    pub turn: u32,
    pub winner: Option<MatchWinner>,
    pub side_a: SideStats,
    pub side_b: SideStats,
}

/// A full two-sided match
pub struct Match {
    config: EngineConfig,
    side_a: SideState,
    side_b: SideState,
    turn: u32,
    winner: Option<MatchWinner>,
    /// Cumulative resolver events, in application order
    pub event_log: Vec<Event>,
    rng: ChaCha8Rng,
}

impl Match {
    /// Allocate a fresh match with the default configuration
    pub fn new(seed: u64, difficulty: Difficulty) -> Self {
        Self::with_config(seed, difficulty, EngineConfig::default())
            .expect("default config is valid")
    }

    pub fn with_config(seed: u64, difficulty: Difficulty, config: EngineConfig) -> Result<Self> {
        config.validate().map_err(IronwakeError::InvalidConfig)?;
        Ok(Self {
            side_a: SideState::new(config.board_side, difficulty),
            side_b: SideState::new(config.board_side, difficulty),
            config,
            turn: 0,
            winner: None,
            event_log: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn side(&self, side: Side) -> &SideState {
        match side {
            Side::A => &self.side_a,
            Side::B => &self.side_b,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut SideState {
        match side {
            Side::A => &mut self.side_a,
            Side::B => &mut self.side_b,
        }
    }

    pub fn set_difficulty(&mut self, side: Side, difficulty: Difficulty) {
        self.side_mut(side).difficulty = difficulty;
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn winner(&self) -> Option<MatchWinner> {
        self.winner
    }

    pub fn is_finished(&self) -> bool {
        self.winner.is_some()
    }

    /// Deploy one side's roster using the sparse random policy
    pub fn deploy(&mut self, side: Side) -> Result<&Fleet> {
        if !self.side(side).fleet.ships.is_empty() {
            return Err(IronwakeError::InvalidPlacement(
                "side already has ships deployed".into(),
            ));
        }
        let state = match side {
            Side::A => &mut self.side_a,
            Side::B => &mut self.side_b,
        };
        state.fleet = deploy_fleet(&mut state.board, &self.config, &mut self.rng);
        Ok(&self.side(side).fleet)
    }

    /// Manually place one ship for a side
    pub fn place_ship(
        &mut self,
        side: Side,
        class: ShipClass,
        row: i32,
        col: i32,
        orientation: Orientation,
    ) -> Result<ShipId> {
        let state = self.side_mut(side);
        placement::place_ship(&mut state.board, &mut state.fleet, class, row, col, orientation)
    }

    /// Run the decision engine for one side
    ///
    /// The returned action is not yet applied; call [`Match::resolve`]
    /// to commit it.
    pub fn decide(&mut self, side: Side) -> Action {
        let (attacker, defender) = match side {
            Side::A => (&mut self.side_a, &self.side_b),
            Side::B => (&mut self.side_b, &self.side_a),
        };

        let risk = if attacker.difficulty.risk_awareness > 0.0 {
            Some(RiskContext {
                own_board: &attacker.board,
                opponent_view: &defender.view,
                opponent_fleet: &defender.fleet,
                opponent_damage: &defender.damage,
            })
        } else {
            None
        };

        decider::decide(
            &attacker.view,
            &attacker.fleet,
            &defender.fleet,
            &mut attacker.damage,
            risk.as_ref(),
            &attacker.difficulty,
            &self.config,
            &mut self.rng,
        )
    }

    /// Apply an action against the opposing side
    ///
    /// Returns the ordered event list; a finished match resolves
    /// nothing.
    pub fn resolve(&mut self, side: Side, action: Action) -> Result<Vec<Event>> {
        if self.winner.is_some() {
            return Ok(Vec::new());
        }

        let (attacker, defender) = match side {
            Side::A => (&mut self.side_a, &mut self.side_b),
            Side::B => (&mut self.side_b, &mut self.side_a),
        };

        let abilities = Abilities::from_fleet(&attacker.fleet, &self.config);
        let hp_before = defender.fleet.raw_hp();

        let mut ctx = ResolveContext {
            board: &mut defender.board,
            fleet: &mut defender.fleet,
            view: &mut attacker.view,
            attacker_is_player: side == Side::A,
        };
        let resolution = resolve_action(action, &abilities, &mut ctx)?;

        let hp_after = defender.fleet.raw_hp();
        attacker.stats.shots += 1;
        attacker.stats.damage_dealt += (hp_before - hp_after).max(0) as u32;
        attacker.stats.hits += resolution
            .events
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    Event::CellUpdate { state: ViewState::Hit, .. }
                        | Event::CellUpdate { state: ViewState::Destroyed, .. }
                )
            })
            .count() as u32;

        self.turn += 1;
        if defender.fleet.all_sunk() {
            self.winner = Some(MatchWinner::Side(side));
        } else if self.turn >= self.config.turn_cap {
            self.winner = Some(MatchWinner::Draw);
        }

        self.event_log.extend(resolution.events.iter().cloned());
        Ok(resolution.events)
    }

    pub fn status(&self) -> MatchStatus {
        MatchStatus {
            turn: self.turn,
            winner: self.winner,
            side_a: self.side_a.stats,
            side_b: self.side_b.stats,
        }
    }
}
