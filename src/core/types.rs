//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// One of the two sides of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// Match winner, or a draw at the turn cap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchWinner {
    Side(Side),
    Draw,
}

/// Board coordinate (row, column), signed so area clipping can run
/// off-board before bounds checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub r: i32,
    pub c: i32,
}

impl Coord {
    pub fn new(r: i32, c: i32) -> Self {
        Self { r, c }
    }

    /// Is this coordinate on an n-by-n board?
    pub fn in_bounds(&self, n: usize) -> bool {
        self.r >= 0 && self.c >= 0 && (self.r as usize) < n && (self.c as usize) < n
    }

    pub fn distance(&self, other: &Coord) -> f64 {
        let dr = (self.r - other.r) as f64;
        let dc = (self.c - other.c) as f64;
        (dr * dr + dc * dc).sqrt()
    }
}

/// Ship orientation on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Unit step along the ship's axis
    pub fn step(self) -> (i32, i32) {
        match self {
            Orientation::Horizontal => (0, 1),
            Orientation::Vertical => (1, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_opponent() {
        assert_eq!(Side::A.opponent(), Side::B);
        assert_eq!(Side::B.opponent(), Side::A);
    }

    #[test]
    fn test_coord_bounds() {
        assert!(Coord::new(0, 0).in_bounds(10));
        assert!(Coord::new(9, 9).in_bounds(10));
        assert!(!Coord::new(10, 0).in_bounds(10));
        assert!(!Coord::new(-1, 3).in_bounds(10));
    }

    #[test]
    fn test_coord_distance() {
        let a = Coord::new(0, 0);
        let b = Coord::new(3, 4);
        assert!((a.distance(&b) - 5.0).abs() < 1e-9);
    }
}
