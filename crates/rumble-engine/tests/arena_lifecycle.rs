//! Full-arena lifecycle: start a small arena with fast decay, wait for
//! the round to end, shut down, and audit the quiescent shared state.
//!
//! Energy decay alone guarantees termination, so the round-end wait is
//! deadline-bounded rather than hopeful.

use std::time::{Duration, Instant};

use rumble_core::layout::{SYM_BATTERY, SYM_BORDER, SYM_EMPTY};
use rumble_core::{Occupant, RobotStatus};
use rumble_engine::{Arena, ArenaConfig};

fn fast_config() -> ArenaConfig {
    ArenaConfig {
        width: 14,
        height: 10,
        num_robots: 4,
        num_batteries: 2,
        seed: 1_234,
        act_interval: Duration::from_millis(2),
        decay_interval: Duration::from_millis(5),
        shutdown_grace: Duration::from_secs(5),
        ..Default::default()
    }
}

#[test]
fn round_runs_to_completion_and_state_stays_consistent() {
    let mut arena = Arena::new(fast_config()).unwrap();
    arena.start().unwrap();
    let viewer = arena.viewer();
    let shared = arena.handle();

    // Decay kills every robot within a couple hundred cycles, so the
    // game-over flag must rise well inside this deadline.
    let deadline = Instant::now() + Duration::from_secs(30);
    while !viewer.game_over() {
        assert!(Instant::now() < deadline, "round never ended");
        std::thread::sleep(Duration::from_millis(10));
    }

    let report = arena.shutdown();
    assert_eq!(report.abandoned, 0, "threads must exit within the grace budget");

    // Quiescent now: audit flags against the robot table.
    let flags = shared.region.flags();
    assert!(flags.game_over);
    let mut alive = Vec::new();
    for id in 0..4 {
        let rec = shared.region.robot(id).unwrap();
        if rec.status == RobotStatus::Alive {
            alive.push(rec);
        }
    }
    assert_eq!(flags.alive_count as usize, alive.len());
    assert!(alive.len() <= 1);
    match alive.first() {
        Some(rec) => assert_eq!(flags.winner, rec.id.0 as i32),
        None => assert_eq!(flags.winner, -1),
    }

    // Every surviving robot's cell shows its symbol; every dead
    // robot's symbol is gone from the grid.
    let frame = viewer.grid_snapshot();
    for rec in &alive {
        assert_eq!(
            Occupant::from_symbol(frame.cell(rec.x as u32, rec.y as u32).unwrap()),
            Occupant::Robot(rec.id)
        );
    }
    let robot_cells = frame
        .cells()
        .iter()
        .filter(|&&c| matches!(Occupant::from_symbol(c), Occupant::Robot(_)))
        .count();
    assert_eq!(robot_cells, alive.len(), "dead robots must leave no stale cells");

    // Uncollected batteries still sit on their recorded cells.
    for b in 0..2 {
        let bat = shared.region.battery(b).unwrap();
        if !bat.collected {
            assert_eq!(
                frame.cell(bat.x as u32, bat.y as u32).unwrap(),
                SYM_BATTERY
            );
        }
    }

    // The border survived the whole round.
    let (w, h) = (frame.width(), frame.height());
    for x in 0..w {
        assert_eq!(frame.cell(x, 0).unwrap(), SYM_BORDER);
        assert_eq!(frame.cell(x, h - 1).unwrap(), SYM_BORDER);
    }
    for y in 0..h {
        assert_eq!(frame.cell(0, y).unwrap(), SYM_BORDER);
        assert_eq!(frame.cell(w - 1, y).unwrap(), SYM_BORDER);
    }
    // Interior cells are only empty, battery, or a live robot.
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let sym = frame.cell(x, y).unwrap();
            assert!(
                sym == SYM_EMPTY
                    || sym == SYM_BATTERY
                    || matches!(Occupant::from_symbol(sym), Occupant::Robot(_)),
                "unexpected symbol {sym:?} at ({x}, {y})"
            );
        }
    }
}

#[test]
fn registered_arena_is_attachable_until_shutdown() {
    let mut arena = Arena::with_name("lifecycle-attach", fast_config()).unwrap();
    arena.start().unwrap();

    let attached = rumble_engine::registry::attach("lifecycle-attach").unwrap();
    assert!(attached.region.flags().initialized);
    assert!(attached.gate.is_open());

    arena.shutdown();
    assert!(rumble_engine::registry::attach("lifecycle-attach").is_err());
}
