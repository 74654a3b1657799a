//! Ship records and per-side rosters
//!
//! A ship is a line of segments, each with its own hit points. A ship
//! sinks when every segment is at or below zero; the sunk flag latches
//! for the rest of the match.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::types::{Coord, Orientation};

/// Unique identifier for ships
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShipId(pub Uuid);

impl ShipId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ShipId {
    fn default() -> Self {
        Self::new()
    }
}

/// The five ship classes of a roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipClass {
    Carrier,
    Battleship,
    LightCruiser,
    Submarine,
    Destroyer,
}

impl ShipClass {
    /// Roster order of a freshly deployed side
    pub const ROSTER: [ShipClass; 5] = [
        ShipClass::Carrier,
        ShipClass::Battleship,
        ShipClass::LightCruiser,
        ShipClass::Submarine,
        ShipClass::Destroyer,
    ];

    /// Two-letter type code
    pub fn code(self) -> &'static str {
        match self {
            ShipClass::Carrier => "CV",
            ShipClass::Battleship => "BB",
            ShipClass::LightCruiser => "CL",
            ShipClass::Submarine => "SS",
            ShipClass::Destroyer => "DD",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShipClass::Carrier => "Carrier",
            ShipClass::Battleship => "Battleship",
            ShipClass::LightCruiser => "Light cruiser",
            ShipClass::Submarine => "Submarine",
            ShipClass::Destroyer => "Destroyer",
        }
    }

    /// Number of segments
    pub fn length(self) -> usize {
        match self {
            ShipClass::Carrier => 4,
            ShipClass::Battleship => 4,
            ShipClass::LightCruiser => 3,
            ShipClass::Submarine => 1,
            ShipClass::Destroyer => 2,
        }
    }

    /// Hit points per segment at match start
    pub fn max_segment_hp(self) -> i32 {
        match self {
            ShipClass::Carrier => 2,
            ShipClass::Battleship => 3,
            ShipClass::LightCruiser => 1,
            ShipClass::Submarine => 2,
            ShipClass::Destroyer => 1,
        }
    }
}

/// A single ship: position, per-segment health, latched sunk flag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub id: ShipId,
    pub class: ShipClass,
    pub row: i32,
    pub col: i32,
    pub orientation: Orientation,
    /// Current segment healths; may go negative, never recovers
    pub segments: Vec<i32>,
    pub sunk: bool,
}

impl Ship {
    pub fn new(class: ShipClass, row: i32, col: i32, orientation: Orientation) -> Self {
        Self {
            id: ShipId::new(),
            class,
            row,
            col,
            orientation,
            segments: vec![class.max_segment_hp(); class.length()],
            sunk: false,
        }
    }

    pub fn length(&self) -> usize {
        self.class.length()
    }

    /// Cells occupied by this ship, in segment order
    pub fn cells(&self) -> Vec<Coord> {
        let (dr, dc) = self.orientation.step();
        (0..self.length() as i32)
            .map(|i| Coord::new(self.row + dr * i, self.col + dc * i))
            .collect()
    }

    /// Every segment at or below zero?
    pub fn all_segments_destroyed(&self) -> bool {
        self.segments.iter().all(|&hp| hp <= 0)
    }

    /// Sum of surviving segment health
    pub fn remaining_hp(&self) -> i32 {
        self.segments.iter().map(|&hp| hp.max(0)).sum()
    }

    /// Raw sum of segment health, negatives included
    ///
    /// Useful for damage accounting: a resolved hit always lowers this
    /// by exactly the damage applied.
    pub fn raw_hp(&self) -> i32 {
        self.segments.iter().sum()
    }
}

/// One side's ordered roster
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fleet {
    pub ships: Vec<Ship>,
}

impl Fleet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ShipId) -> Option<&Ship> {
        self.ships.iter().find(|s| s.id == id)
    }

    pub fn get_mut(&mut self, id: ShipId) -> Option<&mut Ship> {
        self.ships.iter_mut().find(|s| s.id == id)
    }

    pub fn alive(&self) -> impl Iterator<Item = &Ship> {
        self.ships.iter().filter(|s| !s.sunk)
    }

    pub fn has_alive(&self, class: ShipClass) -> bool {
        self.alive().any(|s| s.class == class)
    }

    pub fn all_sunk(&self) -> bool {
        !self.ships.is_empty() && self.ships.iter().all(|s| s.sunk)
    }

    /// Highest per-segment max health among surviving ships
    ///
    /// This is what an attacker can legitimately derive about the
    /// defender: sunk classes are announced, true segment health is not.
    pub fn max_alive_segment_hp(&self) -> i32 {
        self.alive().map(|s| s.class.max_segment_hp()).max().unwrap_or(0)
    }

    pub fn raw_hp(&self) -> i32 {
        self.ships.iter().map(|s| s.raw_hp()).sum()
    }
}
