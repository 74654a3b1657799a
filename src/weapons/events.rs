//! Events emitted by weapon resolution
//!
//! Resolvers mutate the defender's board and the attacker's view, and
//! describe everything they did as an ordered event list. Observers
//! (rendering, match log, tests) consume the list; the core never calls
//! into a foreign sink from inside a resolver.

use serde::{Deserialize, Serialize};

use crate::board::ship::ShipId;
use crate::board::view::ViewState;
use crate::core::types::Coord;

/// Rendering tag attached to some cell updates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkKind {
    Splash,
    Burst,
    Ping,
}

/// Which match-log column a line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogClass {
    Player,
    Enemy,
    System,
}

/// Animation hook; carried for observers, ignored by the core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    ShellBurst,
    AirRaid,
    SonarPing,
}

/// One step of a weapon resolution, in emission order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// A view cell changed state
    CellUpdate {
        coord: Coord,
        state: ViewState,
        mark: Option<MarkKind>,
    },
    /// A segment's health changed, or (with `segment: None`) the whole
    /// ship was just sunk
    ShipUpdate {
        ship: ShipId,
        segment: Option<usize>,
        hp: i32,
        sunk: bool,
    },
    /// Human-readable match log line
    Log { message: String, class: LogClass },
    /// Animation side-channel
    Effect { kind: EffectKind, coord: Coord },
}

impl Event {
    pub fn is_cell_update(&self) -> bool {
        matches!(self, Event::CellUpdate { .. })
    }

    pub fn is_ship_update(&self) -> bool {
        matches!(self, Event::ShipUpdate { .. })
    }
}
