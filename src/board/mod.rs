//! Board and ship model: owning grids, rosters, fog-of-war views,
//! deployment

pub mod grid;
pub mod placement;
pub mod ship;
pub mod view;

pub use grid::{Board, Cell, DamageGrid, Occupant};
pub use placement::{deploy_fleet, legal_placements, place_ship, Placement};
pub use ship::{Fleet, Ship, ShipClass, ShipId};
pub use view::{ViewGrid, ViewState};
