//! Ironwake - probabilistic naval-combat decision engine
//!
//! The decision core of a turn-based naval duel under fog of war: a
//! belief engine over hidden ship layouts, an information-theoretic
//! action evaluator with a risk look-ahead, a pure battle resolver, and
//! a self-play tournament for tuning the difficulty parameters.

pub mod ai;
pub mod board;
pub mod core;
pub mod sim;
pub mod tournament;
pub mod weapons;
