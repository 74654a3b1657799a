//! Weapon subsystem: a closed set of three weapons and their pure
//! resolvers
//!
//! Weapons are a sum type with static dispatch; the set is finite and
//! fixed, so no registry indirection is needed. Each weapon knows its
//! availability, its target validity, and its coverage area; resolution
//! lives in [`resolver`].

pub mod events;
pub mod resolver;

use serde::{Deserialize, Serialize};

use crate::board::ship::{Fleet, ShipClass};
use crate::board::view::{ViewGrid, ViewState};
use crate::core::config::EngineConfig;
use crate::core::types::Coord;

pub use events::{EffectKind, Event, LogClass, MarkKind};
pub use resolver::{resolve_action, Resolution, ResolveContext};

/// The three weapons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weapon {
    /// Armor-piercing main battery: one cell, fleet-dependent damage
    MainGun,
    /// High-explosive air strike: X pattern, damage 1 per cell
    AirStrike,
    /// Sonar scan: 3x3 area, no damage
    Sonar,
}

/// A committed firing decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub weapon: Weapon,
    pub coord: Coord,
}

/// What the attacker's surviving fleet currently enables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Abilities {
    pub can_use_air: bool,
    pub can_use_sonar: bool,
    pub ap_damage: i32,
}

impl Abilities {
    /// Snapshot abilities from a fleet
    ///
    /// Main gun damage: 3 while a battleship survives, 2 while a
    /// submarine or light cruiser survives, otherwise 1.
    pub fn from_fleet(fleet: &Fleet, config: &EngineConfig) -> Self {
        let ap_damage = if fleet.has_alive(ShipClass::Battleship) {
            3
        } else if fleet.has_alive(ShipClass::Submarine) || fleet.has_alive(ShipClass::LightCruiser)
        {
            2
        } else {
            1
        };

        Self {
            can_use_air: fleet.has_alive(ShipClass::Carrier),
            can_use_sonar: config.sonar_sensors.iter().any(|&c| fleet.has_alive(c)),
            ap_damage,
        }
    }

    /// Abilities as they would be if one ship were lost
    pub fn without_ship(
        fleet: &Fleet,
        lost: crate::board::ship::ShipId,
        config: &EngineConfig,
    ) -> Self {
        let mut reduced = fleet.clone();
        if let Some(ship) = reduced.get_mut(lost) {
            ship.sunk = true;
        }
        Self::from_fleet(&reduced, config)
    }

    pub fn allows(&self, weapon: Weapon) -> bool {
        match weapon {
            Weapon::MainGun => true,
            Weapon::AirStrike => self.can_use_air,
            Weapon::Sonar => self.can_use_sonar,
        }
    }
}

impl Weapon {
    /// Cells the weapon touches when fired at `center`, clipped to the
    /// board
    pub fn coverage(self, center: Coord, board_side: usize) -> Vec<Coord> {
        let offsets: &[(i32, i32)] = match self {
            Weapon::MainGun => &[(0, 0)],
            Weapon::AirStrike => &[(0, 0), (-1, -1), (-1, 1), (1, -1), (1, 1)],
            Weapon::Sonar => &[
                (-1, -1),
                (-1, 0),
                (-1, 1),
                (0, -1),
                (0, 0),
                (0, 1),
                (1, -1),
                (1, 0),
                (1, 1),
            ],
        };

        offsets
            .iter()
            .map(|&(dr, dc)| Coord::new(center.r + dr, center.c + dc))
            .filter(|c| c.in_bounds(board_side))
            .collect()
    }

    /// Damage applied to each covered cell
    pub fn cell_damage(self, abilities: &Abilities) -> i32 {
        match self {
            Weapon::MainGun => abilities.ap_damage,
            Weapon::AirStrike => 1,
            Weapon::Sonar => 0,
        }
    }

    /// Normalization ceiling for expected damage
    pub fn max_damage(self, abilities: &Abilities) -> f64 {
        match self {
            Weapon::MainGun => abilities.ap_damage as f64,
            Weapon::AirStrike => 5.0,
            Weapon::Sonar => 0.0,
        }
    }

    /// Would a resolver accept this target?
    pub fn is_valid_target(self, view: &ViewGrid, coord: Coord) -> bool {
        if !view.in_bounds(coord) {
            return false;
        }
        match self {
            Weapon::MainGun => !matches!(
                view.get(coord),
                ViewState::Miss | ViewState::Destroyed | ViewState::Sunk
            ),
            // Area weapons accept any in-bounds center; dead cells in
            // the area are skipped during resolution
            Weapon::AirStrike | Weapon::Sonar => true,
        }
    }
}
