//! Engine integration tests
//!
//! End-to-end scenarios through the public match API, plus the
//! universal invariants checked after every resolver call of a full
//! headless game.

use ironwake::ai::Difficulty;
use ironwake::board::{ShipClass, ViewGrid, ViewState};
use ironwake::core::config::EngineConfig;
use ironwake::core::types::{Coord, MatchWinner, Orientation, Side};
use ironwake::sim::{run_match, Match};
use ironwake::weapons::{Action, Event, Weapon};

fn small_config() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.live_samples = 60;
    config.rollout_samples = 20;
    config.lookahead_depth = 2;
    config
}

fn cell_updates(events: &[Event]) -> Vec<(Coord, ViewState)> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::CellUpdate { coord, state, .. } => Some((*coord, *state)),
            _ => None,
        })
        .collect()
}

/// hit cells carry a resolved view state; sunk flags match segment
/// health
fn assert_invariants(game: &Match, attacker: Side) {
    let defender = attacker.opponent();
    let board = &game.side(defender).board;
    let view = &game.side(attacker).view;

    for r in 0..10 {
        for c in 0..10 {
            let coord = Coord::new(r, c);
            if board.get(coord).unwrap().hit {
                assert!(
                    matches!(
                        view.get(coord),
                        ViewState::Miss | ViewState::Hit | ViewState::Destroyed | ViewState::Sunk
                    ),
                    "struck cell {:?} left unresolved in the view",
                    coord
                );
            }
        }
    }

    for ship in &game.side(defender).fleet.ships {
        assert_eq!(
            ship.sunk,
            ship.all_segments_destroyed(),
            "{} sunk flag out of sync",
            ship.class.name()
        );
    }
}

#[test]
fn test_ap_on_empty_cell() {
    let mut game = Match::new(1, Difficulty::normal());
    game.place_ship(Side::A, ShipClass::Battleship, 0, 0, Orientation::Horizontal)
        .unwrap();
    game.place_ship(Side::B, ShipClass::Submarine, 9, 9, Orientation::Horizontal)
        .unwrap();

    let events = game
        .resolve(Side::A, Action { weapon: Weapon::MainGun, coord: Coord::new(3, 3) })
        .unwrap();

    assert_eq!(cell_updates(&events), vec![(Coord::new(3, 3), ViewState::Miss)]);
    assert!(events.iter().all(|e| !e.is_ship_update()));
    assert_invariants(&game, Side::A);
}

#[test]
fn test_ap_sinks_destroyer() {
    let mut game = Match::new(2, Difficulty::normal());
    game.place_ship(Side::A, ShipClass::Battleship, 0, 0, Orientation::Horizontal)
        .unwrap();
    let dd = game
        .place_ship(Side::B, ShipClass::Destroyer, 5, 2, Orientation::Horizontal)
        .unwrap();

    let first = game
        .resolve(Side::A, Action { weapon: Weapon::MainGun, coord: Coord::new(5, 2) })
        .unwrap();
    assert_eq!(cell_updates(&first), vec![(Coord::new(5, 2), ViewState::Destroyed)]);
    assert!(first
        .iter()
        .any(|e| matches!(e, Event::ShipUpdate { ship, segment: Some(0), hp: -2, sunk: false } if *ship == dd)));
    assert_invariants(&game, Side::A);

    let second = game
        .resolve(Side::A, Action { weapon: Weapon::MainGun, coord: Coord::new(5, 3) })
        .unwrap();

    // Segment update, then the terminal sunk marker, then the log line
    let updates: Vec<_> = second.iter().filter(|e| e.is_ship_update()).collect();
    assert!(matches!(
        updates[0],
        Event::ShipUpdate { segment: Some(1), hp: -2, sunk: false, .. }
    ));
    assert!(matches!(updates[1], Event::ShipUpdate { segment: None, hp: 0, sunk: true, .. }));
    assert!(matches!(second.last(), Some(Event::Log { .. })));

    // Both destroyer cells now read sunk
    let view = &game.side(Side::A).view;
    assert_eq!(view.get(Coord::new(5, 2)), ViewState::Sunk);
    assert_eq!(view.get(Coord::new(5, 3)), ViewState::Sunk);
    assert_invariants(&game, Side::A);
}

#[test]
fn test_air_strike_x_pattern() {
    let mut game = Match::new(3, Difficulty::normal());
    game.place_ship(Side::A, ShipClass::Carrier, 0, 0, Orientation::Horizontal)
        .unwrap();
    game.place_ship(Side::B, ShipClass::LightCruiser, 4, 4, Orientation::Horizontal)
        .unwrap();

    let events = game
        .resolve(Side::A, Action { weapon: Weapon::AirStrike, coord: Coord::new(5, 5) })
        .unwrap();

    let updates = cell_updates(&events);
    let destroyed = updates
        .iter()
        .filter(|(_, s)| *s == ViewState::Destroyed)
        .count();
    let missed = updates.iter().filter(|(_, s)| *s == ViewState::Miss).count();
    assert_eq!(destroyed, 2, "cruiser segments 0 and 2 sit on the diagonals");
    assert_eq!(missed, 3);

    let cl = &game.side(Side::B).fleet.ships[0];
    assert_eq!(cl.segments, vec![0, 1, 0]);
    assert!(!cl.sunk);
    assert_invariants(&game, Side::A);
}

#[test]
fn test_sonar_no_contact_at_corner() {
    let mut game = Match::new(4, Difficulty::normal());
    game.place_ship(Side::A, ShipClass::Destroyer, 0, 0, Orientation::Horizontal)
        .unwrap();
    game.place_ship(Side::B, ShipClass::Submarine, 9, 9, Orientation::Horizontal)
        .unwrap();

    let events = game
        .resolve(Side::A, Action { weapon: Weapon::Sonar, coord: Coord::new(0, 0) })
        .unwrap();

    // Clipped area is the four corner cells; all become miss
    let updates = cell_updates(&events);
    assert_eq!(updates.len(), 4);
    assert!(updates.iter().all(|(_, s)| *s == ViewState::Miss));
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::Log { message, .. } if message.contains("no contact"))));

    // No side took damage
    assert_eq!(game.status().side_a.damage_dealt, 0);
    assert_invariants(&game, Side::A);
}

#[test]
fn test_sonar_contact_over_submarine() {
    let mut game = Match::new(5, Difficulty::normal());
    game.place_ship(Side::A, ShipClass::Destroyer, 0, 0, Orientation::Horizontal)
        .unwrap();
    game.place_ship(Side::B, ShipClass::Submarine, 4, 4, Orientation::Horizontal)
        .unwrap();

    let events = game
        .resolve(Side::A, Action { weapon: Weapon::Sonar, coord: Coord::new(4, 4) })
        .unwrap();

    let view = &game.side(Side::A).view;
    assert_eq!(view.get(Coord::new(4, 4)), ViewState::Hit);
    for (dr, dc) in [(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0), (1, 1)] {
        assert_eq!(view.get(Coord::new(4 + dr, 4 + dc)), ViewState::Suspect);
    }

    let ss = &game.side(Side::B).fleet.ships[0];
    assert_eq!(ss.segments, vec![2], "sonar never wounds");
    assert!(!ss.sunk);
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::Log { message, .. } if message.contains("contact"))));
    assert_invariants(&game, Side::A);
}

#[test]
fn test_resolve_is_idempotent_on_misses_and_wrecks() {
    let mut game = Match::new(6, Difficulty::normal());
    game.place_ship(Side::A, ShipClass::Battleship, 0, 0, Orientation::Horizontal)
        .unwrap();
    game.place_ship(Side::B, ShipClass::Destroyer, 5, 2, Orientation::Horizontal)
        .unwrap();

    // Miss twice
    game.resolve(Side::A, Action { weapon: Weapon::MainGun, coord: Coord::new(0, 9) })
        .unwrap();
    let view_after_one = game.side(Side::A).view.clone();
    let repeat = game
        .resolve(Side::A, Action { weapon: Weapon::MainGun, coord: Coord::new(0, 9) })
        .unwrap();
    assert!(repeat.is_empty());
    assert_eq!(game.side(Side::A).view, view_after_one);

    // Wreck a segment twice
    game.resolve(Side::A, Action { weapon: Weapon::MainGun, coord: Coord::new(5, 2) })
        .unwrap();
    let hp_after_one = game.side(Side::B).fleet.ships[0].segments.clone();
    let repeat = game
        .resolve(Side::A, Action { weapon: Weapon::MainGun, coord: Coord::new(5, 2) })
        .unwrap();
    assert!(repeat.is_empty());
    assert_eq!(game.side(Side::B).fleet.ships[0].segments, hp_after_one);
}

#[test]
fn test_event_replay_recreates_view() {
    let mut game = Match::new(7, Difficulty::normal());
    game.place_ship(Side::A, ShipClass::Carrier, 0, 0, Orientation::Horizontal)
        .unwrap();
    game.place_ship(Side::A, ShipClass::Destroyer, 2, 0, Orientation::Horizontal)
        .unwrap();
    game.place_ship(Side::B, ShipClass::LightCruiser, 4, 4, Orientation::Horizontal)
        .unwrap();
    game.place_ship(Side::B, ShipClass::Submarine, 8, 1, Orientation::Horizontal)
        .unwrap();

    // Only side A fires, so the whole log belongs to A's view
    for action in [
        Action { weapon: Weapon::Sonar, coord: Coord::new(4, 5) },
        Action { weapon: Weapon::AirStrike, coord: Coord::new(5, 5) },
        Action { weapon: Weapon::MainGun, coord: Coord::new(4, 4) },
        Action { weapon: Weapon::MainGun, coord: Coord::new(8, 1) },
    ] {
        game.resolve(Side::A, action).unwrap();
    }

    let mut replayed = ViewGrid::new(10);
    for event in &game.event_log {
        if let Event::CellUpdate { coord, state, .. } = event {
            replayed.set(*coord, *state);
        }
    }

    assert_eq!(replayed, game.side(Side::A).view);
}

#[test]
fn test_headless_match_holds_invariants() {
    // Small budgets keep the loop fast
    let mut config = small_config();
    config.turn_cap = 60;
    let mut game = Match::with_config(99, Difficulty::hard(), config).unwrap();
    game.set_difficulty(Side::B, Difficulty::normal());
    game.deploy(Side::A).unwrap();
    game.deploy(Side::B).unwrap();

    let mut side = Side::A;
    while !game.is_finished() {
        let action = game.decide(side);
        assert!(action.weapon.is_valid_target(&game.side(side).view, action.coord));
        game.resolve(side, action).unwrap();
        assert_invariants(&game, side);
        side = side.opponent();
    }
}

#[test]
fn test_damage_stats_match_health_reduction() {
    let config = small_config();
    let outcome = run_match(Difficulty::hard(), Difficulty::easy(), 31, Side::A, config).unwrap();

    // A roster carries 27 hit points; overkill on a segment still
    // counts as dealt damage, so sinking everything means at least 27
    let roster_hp: u32 = ShipClass::ROSTER
        .iter()
        .map(|c| (c.length() as i32 * c.max_segment_hp()) as u32)
        .sum();
    assert_eq!(roster_hp, 27);

    if let MatchWinner::Side(winner) = outcome.winner {
        let winner_stats = match winner {
            Side::A => outcome.side_a,
            Side::B => outcome.side_b,
        };
        assert!(
            winner_stats.damage_dealt >= roster_hp,
            "sinking a full roster means dealing at least all of its health"
        );
        assert!(winner_stats.hits > 0);
    }
}
