//! Decision engine: belief sampling, action evaluation, risk
//! look-ahead
//!
//! The pipeline for one turn: derive constraints from the fog-of-war
//! view, sample a belief over hidden layouts, score every candidate
//! action on expected damage plus information gain, optionally bend the
//! ranking by the self-roll-out risk bonus, then pick uniformly among
//! the tied best.

pub mod belief;
pub mod decider;
pub mod difficulty;
pub mod evaluator;
pub mod risk;

pub use belief::{BeliefState, Constraints, ProbGrid};
pub use decider::{decide, random_action};
pub use difficulty::Difficulty;
pub use evaluator::{Candidate, EvalInputs};
pub use risk::RiskContext;
