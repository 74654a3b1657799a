//! Fog-of-war view grid
//!
//! What one side knows about the opponent's board. The view is only
//! ever advanced by weapon resolution events; the belief engine reads
//! it, never writes it.

use serde::{Deserialize, Serialize};

use crate::core::types::Coord;

/// Fog-of-war label for a single opponent cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewState {
    #[default]
    Unknown,
    /// Struck, no ship there
    Miss,
    /// Struck, segment still has health
    Hit,
    /// Struck, that segment is at or below zero
    Destroyed,
    /// Flagged by a sonar contact
    Suspect,
    /// Belongs to a fully destroyed ship
    Sunk,
}

impl ViewState {
    /// May this cell still host an unresolved ship segment?
    pub fn may_hold_ship(self) -> bool {
        matches!(self, ViewState::Unknown | ViewState::Suspect)
    }
}

/// One side's view of the opponent's board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewGrid {
    side: usize,
    cells: Vec<ViewState>,
}

impl ViewGrid {
    pub fn new(side: usize) -> Self {
        Self {
            side,
            cells: vec![ViewState::Unknown; side * side],
        }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.in_bounds(self.side)
    }

    pub fn get(&self, coord: Coord) -> ViewState {
        if self.in_bounds(coord) {
            self.cells[coord.r as usize * self.side + coord.c as usize]
        } else {
            ViewState::Miss
        }
    }

    pub fn set(&mut self, coord: Coord, state: ViewState) {
        if self.in_bounds(coord) {
            self.cells[coord.r as usize * self.side + coord.c as usize] = state;
        }
    }

    /// Iterate all coordinates with their view state
    pub fn iter(&self) -> impl Iterator<Item = (Coord, ViewState)> + '_ {
        let side = self.side;
        self.cells.iter().enumerate().map(move |(i, &state)| {
            (Coord::new((i / side) as i32, (i % side) as i32), state)
        })
    }

    pub fn count(&self, state: ViewState) -> usize {
        self.cells.iter().filter(|&&s| s == state).count()
    }
}
