//! Ship placement: legal-placement enumeration and the sparse random
//! deployment policy
//!
//! Deployment shuffles the roster, then places each ship as far from the
//! already-placed ships as it can while staying random: placements are
//! filtered by a minimum-distance threshold that relaxes step by step,
//! and the survivor is drawn uniformly.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::grid::Board;
use crate::board::ship::{Fleet, Ship, ShipClass, ShipId};
use crate::core::config::EngineConfig;
use crate::core::error::{IronwakeError, Result};
use crate::core::types::{Coord, Orientation};

/// A candidate position for a ship of some length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub row: i32,
    pub col: i32,
    pub orientation: Orientation,
    pub length: usize,
}

impl Placement {
    pub fn cells(&self) -> Vec<Coord> {
        let (dr, dc) = self.orientation.step();
        (0..self.length as i32)
            .map(|i| Coord::new(self.row + dr * i, self.col + dc * i))
            .collect()
    }
}

/// Every in-bounds placement of `length` whose cells all pass `open`
pub fn legal_placements(
    board_side: usize,
    length: usize,
    open: impl Fn(Coord) -> bool,
) -> Vec<Placement> {
    let n = board_side as i32;
    let mut placements = Vec::new();

    for &orientation in &[Orientation::Horizontal, Orientation::Vertical] {
        let (dr, dc) = orientation.step();
        let max_r = n - dr * (length as i32 - 1);
        let max_c = n - dc * (length as i32 - 1);
        for row in 0..max_r {
            for col in 0..max_c {
                let placement = Placement { row, col, orientation, length };
                if placement.cells().into_iter().all(&open) {
                    placements.push(placement);
                }
            }
        }
    }

    placements
}

/// Minimum Euclidean distance from any cell of `placement` to any cell
/// already claimed by the fleet
fn min_distance_to_fleet(placement: &Placement, claimed: &[Coord]) -> f64 {
    let mut min = f64::INFINITY;
    for cell in placement.cells() {
        for other in claimed {
            let d = cell.distance(other);
            if d < min {
                min = d;
            }
        }
    }
    min
}

/// Deploy a full roster onto an empty board using the sparse random
/// policy
///
/// The first ship lands uniformly at random; each later ship prefers
/// placements at least `ideal_spacing` from everything already placed,
/// relaxing the requirement down to `min_spacing` and finally falling
/// back to the most distant handful of candidates.
pub fn deploy_fleet(board: &mut Board, config: &EngineConfig, rng: &mut impl Rng) -> Fleet {
    let mut classes = ShipClass::ROSTER;
    classes.shuffle(rng);

    let mut fleet = Fleet::new();
    let mut claimed: Vec<Coord> = Vec::new();

    for class in classes {
        let candidates = legal_placements(board.side(), class.length(), |c| !board.is_occupied(c));
        debug_assert!(!candidates.is_empty(), "roster always fits a 10x10 board");

        let choice = if claimed.is_empty() {
            *candidates.choose(rng).expect("board has legal placements")
        } else {
            choose_sparse(&candidates, &claimed, config, rng)
        };

        let ship = Ship::new(class, choice.row, choice.col, choice.orientation);
        let cells = ship.cells();
        board.occupy(ship.id, &cells);
        claimed.extend(cells);
        fleet.ships.push(ship);
    }

    fleet
}

/// Pick a placement honoring the relaxing distance threshold
fn choose_sparse(
    candidates: &[Placement],
    claimed: &[Coord],
    config: &EngineConfig,
    rng: &mut impl Rng,
) -> Placement {
    let distances: Vec<f64> = candidates
        .iter()
        .map(|p| min_distance_to_fleet(p, claimed))
        .collect();

    let mut threshold = config.ideal_spacing;
    while threshold >= config.min_spacing {
        let passing: Vec<&Placement> = candidates
            .iter()
            .zip(&distances)
            .filter(|(_, &d)| d >= threshold)
            .map(|(p, _)| p)
            .collect();
        if !passing.is_empty() {
            return **passing.choose(rng).expect("non-empty");
        }
        threshold -= config.spacing_step;
    }

    // Nothing clears even the floor: keep the most distant few
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by(|&a, &b| distances[b].partial_cmp(&distances[a]).expect("finite distances"));
    order.truncate(config.spacing_fallback_pool);
    candidates[*order.choose(rng).expect("non-empty")]
}

/// Manually place one ship, validating bounds and overlap
pub fn place_ship(
    board: &mut Board,
    fleet: &mut Fleet,
    class: ShipClass,
    row: i32,
    col: i32,
    orientation: Orientation,
) -> Result<ShipId> {
    let ship = Ship::new(class, row, col, orientation);
    let cells = ship.cells();

    for &cell in &cells {
        if !board.in_bounds(cell) {
            return Err(IronwakeError::InvalidPlacement(format!(
                "{} at ({}, {}) leaves the board",
                class.name(),
                row,
                col
            )));
        }
        if board.is_occupied(cell) {
            return Err(IronwakeError::InvalidPlacement(format!(
                "{} at ({}, {}) overlaps another ship",
                class.name(),
                row,
                col
            )));
        }
    }

    let id = ship.id;
    board.occupy(id, &cells);
    fleet.ships.push(ship);
    Ok(id)
}
