//! Shared hit resolution and the three weapon resolvers
//!
//! Resolvers own the only write path into a defender's board, ship
//! records, and the attacker's view grid. They are pure with respect to
//! the outside world: no I/O, no global state, every observable change
//! mirrored in the returned event list.

use crate::board::grid::Board;
use crate::board::ship::{Fleet, ShipId};
use crate::board::view::{ViewGrid, ViewState};
use crate::core::error::{IronwakeError, Result};
use crate::core::types::Coord;
use crate::weapons::events::{EffectKind, Event, LogClass, MarkKind};
use crate::weapons::{Abilities, Action, Weapon};

/// Everything a resolver may mutate, plus the log-class flag
pub struct ResolveContext<'a> {
    /// Defender's owning grid
    pub board: &'a mut Board,
    /// Defender's ship records
    pub fleet: &'a mut Fleet,
    /// Attacker's view of the defender
    pub view: &'a mut ViewGrid,
    /// Attacker is the human-controlled side (log classes only)
    pub attacker_is_player: bool,
}

impl ResolveContext<'_> {
    fn log_class(&self) -> LogClass {
        if self.attacker_is_player {
            LogClass::Player
        } else {
            LogClass::Enemy
        }
    }
}

/// Ordered outcome of one weapon resolution
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub events: Vec<Event>,
    /// Ships that transitioned to sunk during this resolution
    pub sunk: Vec<ShipId>,
}

impl Resolution {
    pub fn is_noop(&self) -> bool {
        self.events.is_empty()
    }
}

/// Apply an action to the defender
///
/// Invalid targets resolve to an empty event list; the decider never
/// produces them, but hosts may.
pub fn resolve_action(
    action: Action,
    abilities: &Abilities,
    ctx: &mut ResolveContext,
) -> Result<Resolution> {
    let mut out = Resolution::default();

    if !abilities.allows(action.weapon) || !action.weapon.is_valid_target(ctx.view, action.coord) {
        return Ok(out);
    }

    match action.weapon {
        Weapon::MainGun => {
            out.events.push(Event::Effect {
                kind: EffectKind::ShellBurst,
                coord: action.coord,
            });
            resolve_hit(ctx, action.coord, abilities.ap_damage, &mut out)?;
        }
        Weapon::AirStrike => {
            out.events.push(Event::Effect {
                kind: EffectKind::AirRaid,
                coord: action.coord,
            });
            let cells = Weapon::AirStrike.coverage(action.coord, ctx.board.side());
            resolve_multi_hit(ctx, &cells, 1, &mut out)?;
        }
        Weapon::Sonar => {
            out.events.push(Event::Effect {
                kind: EffectKind::SonarPing,
                coord: action.coord,
            });
            resolve_sonar(ctx, action.coord, &mut out)?;
        }
    }

    Ok(out)
}

/// Atomic hit semantics shared by all damage-dealing weapons
pub fn resolve_hit(
    ctx: &mut ResolveContext,
    coord: Coord,
    dmg: i32,
    out: &mut Resolution,
) -> Result<()> {
    // Off-board strikes and re-fires on a confirmed miss are no-ops
    if ctx.view.get(coord) == ViewState::Miss {
        return Ok(());
    }
    let Some(cell) = ctx.board.get_mut(coord) else {
        return Ok(());
    };
    cell.hit = true;
    let occupant = cell.occupant;

    let Some(occupant) = occupant else {
        ctx.view.set(coord, ViewState::Miss);
        out.events.push(Event::CellUpdate {
            coord,
            state: ViewState::Miss,
            mark: Some(MarkKind::Splash),
        });
        return Ok(());
    };

    let log_class = ctx.log_class();
    let ship = ctx
        .fleet
        .get_mut(occupant.ship)
        .ok_or(IronwakeError::UnknownShip(occupant.ship))?;

    if ship.sunk && !ship.all_segments_destroyed() {
        return Err(IronwakeError::InconsistentState(format!(
            "{} is flagged sunk with surviving segments",
            ship.class.name()
        )));
    }

    // Destroyed segments absorb nothing further
    if ship.segments[occupant.segment] <= 0 {
        return Ok(());
    }

    ship.segments[occupant.segment] -= dmg;
    let new_hp = ship.segments[occupant.segment];
    out.events.push(Event::ShipUpdate {
        ship: ship.id,
        segment: Some(occupant.segment),
        hp: new_hp,
        sunk: false,
    });

    let state = if new_hp <= 0 {
        ViewState::Destroyed
    } else {
        ViewState::Hit
    };
    ctx.view.set(coord, state);
    out.events.push(Event::CellUpdate {
        coord,
        state,
        mark: Some(MarkKind::Burst),
    });

    if !ship.sunk && ship.all_segments_destroyed() {
        ship.sunk = true;
        let ship_id = ship.id;
        let name = ship.class.name();
        let cells = ship.cells();

        out.events.push(Event::ShipUpdate {
            ship: ship_id,
            segment: None,
            hp: 0,
            sunk: true,
        });
        for cell in cells {
            ctx.view.set(cell, ViewState::Sunk);
            out.events.push(Event::CellUpdate {
                coord: cell,
                state: ViewState::Sunk,
                mark: None,
            });
        }
        out.events.push(Event::Log {
            message: format!("{} sunk", name),
            class: log_class,
        });
        out.sunk.push(ship_id);
    }

    Ok(())
}

/// Iterate `resolve_hit` over a cell list, concatenating events in order
pub fn resolve_multi_hit(
    ctx: &mut ResolveContext,
    cells: &[Coord],
    dmg: i32,
    out: &mut Resolution,
) -> Result<()> {
    for &cell in cells {
        resolve_hit(ctx, cell, dmg, out)?;
    }
    Ok(())
}

/// Sonar scan: non-lethal, only moves view states
fn resolve_sonar(ctx: &mut ResolveContext, center: Coord, out: &mut Resolution) -> Result<()> {
    let area = Weapon::Sonar.coverage(center, ctx.board.side());

    // A live, unstruck segment under an unresolved cell counts as signal
    let signal = area
        .iter()
        .filter(|&&coord| {
            if !ctx.view.get(coord).may_hold_ship() {
                return false;
            }
            ctx.board.get(coord).is_some_and(|cell| {
                !cell.hit
                    && cell.occupant.is_some_and(|o| {
                        ctx.fleet
                            .get(o.ship)
                            .is_some_and(|s| s.segments[o.segment] > 0)
                    })
            })
        })
        .count();

    let log_class = ctx.log_class();

    if signal == 0 {
        for &coord in &area {
            if ctx.view.get(coord).may_hold_ship() {
                ctx.view.set(coord, ViewState::Miss);
                out.events.push(Event::CellUpdate {
                    coord,
                    state: ViewState::Miss,
                    mark: Some(MarkKind::Ping),
                });
            }
        }
        out.events.push(Event::Log {
            message: format!("Sonar at ({}, {}): no contact", center.r, center.c),
            class: log_class,
        });
        return Ok(());
    }

    // Contact: reveal the center, flag the untouched ring
    resolve_hit(ctx, center, 0, out)?;
    for &coord in &area {
        if coord != center && ctx.view.get(coord) == ViewState::Unknown {
            ctx.view.set(coord, ViewState::Suspect);
            out.events.push(Event::CellUpdate {
                coord,
                state: ViewState::Suspect,
                mark: Some(MarkKind::Ping),
            });
        }
    }
    out.events.push(Event::Log {
        message: format!("Sonar at ({}, {}): contact", center.r, center.c),
        class: log_class,
    });

    Ok(())
}
