//! The owning grid: cells, occupancy, damage accounting
//!
//! Cells are stored in row-major order. A cell knows whether it has
//! been struck and which ship segment occupies it, nothing else; health
//! lives on the ship records.

use serde::{Deserialize, Serialize};

use crate::board::ship::ShipId;
use crate::core::types::Coord;

/// Which ship segment sits on a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupant {
    pub ship: ShipId,
    pub segment: usize,
}

/// One board cell
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Cell {
    pub hit: bool,
    pub occupant: Option<Occupant>,
}

/// A side's owning board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    side: usize,
    cells: Vec<Cell>,
}

impl Board {
    pub fn new(side: usize) -> Self {
        Self {
            side,
            cells: vec![Cell::default(); side * side],
        }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.in_bounds(self.side)
    }

    fn idx(&self, coord: Coord) -> usize {
        coord.r as usize * self.side + coord.c as usize
    }

    pub fn get(&self, coord: Coord) -> Option<&Cell> {
        if self.in_bounds(coord) {
            Some(&self.cells[self.idx(coord)])
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, coord: Coord) -> Option<&mut Cell> {
        if self.in_bounds(coord) {
            let idx = self.idx(coord);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    /// Write a ship's segments onto the grid
    ///
    /// Caller is responsible for having validated the placement.
    pub fn occupy(&mut self, ship_id: ShipId, cells: &[Coord]) {
        for (segment, &coord) in cells.iter().enumerate() {
            let idx = self.idx(coord);
            self.cells[idx].occupant = Some(Occupant { ship: ship_id, segment });
        }
    }

    pub fn is_occupied(&self, coord: Coord) -> bool {
        self.get(coord).is_some_and(|c| c.occupant.is_some())
    }
}

/// Cumulative damage an attacker has dealt to each defender coordinate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamageGrid {
    side: usize,
    dealt: Vec<u32>,
}

impl DamageGrid {
    pub fn new(side: usize) -> Self {
        Self {
            side,
            dealt: vec![0; side * side],
        }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn get(&self, coord: Coord) -> u32 {
        if coord.in_bounds(self.side) {
            self.dealt[coord.r as usize * self.side + coord.c as usize]
        } else {
            0
        }
    }

    pub fn add(&mut self, coord: Coord, dmg: u32) {
        if coord.in_bounds(self.side) {
            self.dealt[coord.r as usize * self.side + coord.c as usize] += dmg;
        }
    }
}
