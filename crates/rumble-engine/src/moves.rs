//! Move execution under the lock hierarchy.
//!
//! This module is the deterministic core of the agent state machine:
//! [`apply_move`] performs one intended unit move from start to
//! finish, acquiring locks strictly in the `grid → robot-table →
//! battery[i]` order. The agent threads in [`agent`](crate::agent)
//! are thin shells around it, which is also what makes every conflict
//! path — duels, battery contention, death — drivable from
//! single-threaded tests.
//!
//! Lock choreography per target-cell kind:
//!
//! - empty: grid, then nested robot-table for the whole-record RMW.
//! - battery: grid, then that battery's lock (robot-table level
//!   skipped downward — legal under a total order); the battery guard
//!   is released before the robot-table lock is taken for the energy
//!   and position update.
//! - another robot: grid, then one robot-table acquisition covering
//!   both participants' records.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use rumble_core::layout::{BATTERY_BOOST, MOVE_COST, SYM_BATTERY, SYM_EMPTY};
use rumble_core::{
    BatteryRecord, GridGuard, Occupant, RegionError, RobotId, RobotRecord, RobotStatus,
    RobotsGuard, SharedRegion,
};

use crate::config::ArenaError;
use crate::shared::ArenaShared;

/// Retry bound for rejection-sampled placement.
const PLACEMENT_TRIES: usize = 1_000;

// ── Outcomes ───────────────────────────────────────────────────────

/// How a duel resolved. Pure function of each side's `2*force + energy`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DuelOutcome {
    /// Attacker's power was strictly higher; it takes the cell.
    AttackerWins,
    /// Defender's power was strictly higher; the attacker dies in place.
    DefenderWins,
    /// Equal power; both die and the contested cell empties.
    BothDie,
}

/// Result of one [`apply_move`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Target outside the playable interior (or a null delta); no-op.
    Rejected,
    /// Moved into an empty cell.
    Moved,
    /// Collected the battery in slot `battery`, then moved in.
    Collected {
        /// The claimed battery's table index.
        battery: u32,
    },
    /// Fought the robot occupying the target cell.
    Duel {
        /// The defender's id.
        defender: RobotId,
        /// How the duel resolved.
        outcome: DuelOutcome,
    },
    /// Target showed a robot whose record is already dead — its
    /// housekeeping task clears the cell as soon as the grid lock
    /// frees up. No-op this tick.
    Blocked,
    /// This robot is (or just became) dead; the caller must abort the
    /// rest of the tick's moves.
    Died,
}

/// Resolve a duel from the two records. Strictly higher
/// [`power`](RobotRecord::power) wins; a tie kills both.
pub fn duel_outcome(attacker: &RobotRecord, defender: &RobotRecord) -> DuelOutcome {
    match attacker.power().cmp(&defender.power()) {
        std::cmp::Ordering::Greater => DuelOutcome::AttackerWins,
        std::cmp::Ordering::Less => DuelOutcome::DefenderWins,
        std::cmp::Ordering::Equal => DuelOutcome::BothDie,
    }
}

// ── apply_move ─────────────────────────────────────────────────────

/// Execute one intended unit move for robot `id`.
///
/// Covers the full act step: target computation and interior check,
/// target-cell inspection under the grid lock, and the empty/battery/
/// duel paths with their respective nested locks. Death bookkeeping
/// (alive count, game-over flag, winner) happens inside the same
/// robot-table acquisition that records the death.
pub fn apply_move(
    shared: &ArenaShared,
    rng: &mut ChaCha8Rng,
    id: u32,
    dx: i32,
    dy: i32,
) -> Result<MoveOutcome, ArenaError> {
    let region = &shared.region;
    let layout = *region.layout();

    let grid = shared.locks.lock_grid();

    let me = region.robot(id)?;
    if me.status == RobotStatus::Dead {
        return Ok(MoveOutcome::Died);
    }
    if dx == 0 && dy == 0 {
        return Ok(MoveOutcome::Rejected);
    }
    let (tx, ty) = (me.x + dx, me.y + dy);
    if !layout.interior(tx, ty) {
        return Ok(MoveOutcome::Rejected);
    }

    match Occupant::from_symbol(region.cell(tx, ty)) {
        Occupant::Border => Ok(MoveOutcome::Rejected),
        Occupant::Empty => step_into(region, &grid, id, tx, ty, 0),
        Occupant::Battery => {
            match claim_battery_at(region, &grid, id, tx, ty, rng)? {
                Some(battery) => match step_into(region, &grid, id, tx, ty, BATTERY_BOOST)? {
                    MoveOutcome::Moved => Ok(MoveOutcome::Collected { battery }),
                    other => Ok(other),
                },
                // Lost the race (or stale symbol): an empty-cell move
                // this tick, no energy gain.
                None => step_into(region, &grid, id, tx, ty, 0),
            }
        }
        Occupant::Robot(defender) if defender.0 == id => Ok(MoveOutcome::Rejected),
        Occupant::Robot(defender) => resolve_duel(region, &grid, id, defender, tx, ty),
    }
}

/// Move robot `id` into the (now) unoccupied cell `(tx, ty)`, applying
/// `gain` energy first and the movement cost after, both clamped.
///
/// Dying on the move clears the robot's old cell and leaves the target
/// untouched — no move completes after death.
fn step_into(
    region: &SharedRegion,
    grid: &GridGuard<'_>,
    id: u32,
    tx: i32,
    ty: i32,
    gain: i32,
) -> Result<MoveOutcome, ArenaError> {
    let robots = grid.lock_robots();
    let mut me = region.robot(id)?;
    if me.status == RobotStatus::Dead {
        return Ok(MoveOutcome::Died);
    }

    me.adjust_energy(gain);
    me.energy -= MOVE_COST;
    if me.energy <= 0 {
        me.energy = 0;
        me.status = RobotStatus::Dead;
        region.set_robot(id, me, &robots)?;
        region.set_cell(me.x, me.y, SYM_EMPTY, grid)?;
        refresh_flags_after_death(region, &robots)?;
        return Ok(MoveOutcome::Died);
    }

    let (ox, oy) = (me.x, me.y);
    me.x = tx;
    me.y = ty;
    region.set_robot(id, me, &robots)?;
    region.set_cell(ox, oy, SYM_EMPTY, grid)?;
    region.set_cell(tx, ty, me.symbol(), grid)?;
    Ok(MoveOutcome::Moved)
}

/// Claim the battery whose record sits at `(x, y)`, then immediately
/// re-place it at a fresh empty cell, all under its individual lock.
///
/// Returns the claimed slot, or `None` when the cell's symbol was
/// stale or another agent claimed the battery first (the caller then
/// treats the move as into an empty cell).
fn claim_battery_at(
    region: &SharedRegion,
    grid: &GridGuard<'_>,
    collector: u32,
    x: i32,
    y: i32,
    rng: &mut ChaCha8Rng,
) -> Result<Option<u32>, ArenaError> {
    let layout = *region.layout();

    // Locate the slot without its lock; verified again under it.
    let mut slot = None;
    for b in 0..layout.max_batteries {
        let rec = region.battery(b)?;
        if !rec.collected && rec.x == x && rec.y == y {
            slot = Some(b);
            break;
        }
    }
    let Some(b) = slot else {
        return Ok(None);
    };

    let guard = grid
        .lock_battery(b)
        .ok_or(ArenaError::Region(RegionError::BatteryIndex {
            id: b,
            max: layout.max_batteries,
        }))?;

    let rec = region.battery(b)?;
    if rec.collected || rec.x != x || rec.y != y {
        return Ok(None);
    }

    // Exactly one claimant reaches this write.
    region.set_battery(
        b,
        BatteryRecord {
            collected: true,
            owner: collector as i32,
            ..rec
        },
        &guard,
    )?;

    // Recycle: the battery reappears elsewhere before the move even
    // finishes. The target cell still shows the battery symbol, so the
    // sampled cell is always distinct from it.
    match sample_empty_cell(region, rng).or_else(|| scan_empty_cell(region)) {
        Some((nx, ny)) => {
            region.set_cell(nx, ny, SYM_BATTERY, grid)?;
            region.set_battery(b, BatteryRecord::placed_at(nx, ny), &guard)?;
        }
        None => {
            // Board completely full; the slot stays collected until a
            // cell frees up and a later claimant path retries.
            tracing::warn!(battery = b, "no empty cell to respawn battery");
        }
    }
    Ok(Some(b))
}

/// Fight the live robot on `(tx, ty)`. One robot-table acquisition
/// covers both participants' writes.
fn resolve_duel(
    region: &SharedRegion,
    grid: &GridGuard<'_>,
    id: u32,
    defender: RobotId,
    tx: i32,
    ty: i32,
) -> Result<MoveOutcome, ArenaError> {
    let robots = grid.lock_robots();

    let mut me = region.robot(id)?;
    if me.status == RobotStatus::Dead {
        return Ok(MoveOutcome::Died);
    }
    let mut def = region.robot(defender.0)?;
    if def.status == RobotStatus::Dead {
        return Ok(MoveOutcome::Blocked);
    }

    let outcome = duel_outcome(&me, &def);
    match outcome {
        DuelOutcome::AttackerWins => {
            def.status = RobotStatus::Dead;
            region.set_robot(defender.0, def, &robots)?;
            let (ox, oy) = (me.x, me.y);
            me.x = tx;
            me.y = ty;
            region.set_robot(id, me, &robots)?;
            region.set_cell(ox, oy, SYM_EMPTY, grid)?;
            region.set_cell(tx, ty, me.symbol(), grid)?;
            refresh_flags_after_death(region, &robots)?;
        }
        DuelOutcome::DefenderWins => {
            me.status = RobotStatus::Dead;
            region.set_robot(id, me, &robots)?;
            region.set_cell(me.x, me.y, SYM_EMPTY, grid)?;
            refresh_flags_after_death(region, &robots)?;
        }
        DuelOutcome::BothDie => {
            me.status = RobotStatus::Dead;
            def.status = RobotStatus::Dead;
            region.set_robot(id, me, &robots)?;
            region.set_robot(defender.0, def, &robots)?;
            region.set_cell(me.x, me.y, SYM_EMPTY, grid)?;
            region.set_cell(tx, ty, SYM_EMPTY, grid)?;
            refresh_flags_after_death(region, &robots)?;
        }
    }
    Ok(MoveOutcome::Duel { defender, outcome })
}

/// Recompute the flags block from the robot table after a death.
///
/// Called with the robot-table lock held at every site, which
/// serializes the (otherwise unguarded) flag writes. Deriving the
/// alive count and winner from the table rather than incrementally
/// keeps a tie duel's double death consistent.
pub(crate) fn refresh_flags_after_death(
    region: &SharedRegion,
    _robots: &RobotsGuard<'_>,
) -> Result<(), RegionError> {
    let layout = *region.layout();
    let mut alive = 0;
    let mut last_alive = -1;
    for id in 0..layout.max_robots {
        let rec = region.robot(id)?;
        if rec.status == RobotStatus::Alive {
            alive += 1;
            last_alive = id as i32;
        }
    }

    let mut flags = region.flags();
    flags.alive_count = alive;
    if alive <= 1 {
        flags.game_over = true;
        flags.winner = if alive == 1 { last_alive } else { -1 };
    }
    region.set_flags(flags);
    Ok(())
}

// ── Placement helpers ──────────────────────────────────────────────

/// Uniformly sample an empty interior cell, bounded rejection sampling.
pub(crate) fn sample_empty_cell(
    region: &SharedRegion,
    rng: &mut ChaCha8Rng,
) -> Option<(i32, i32)> {
    let layout = *region.layout();
    for _ in 0..PLACEMENT_TRIES {
        let x = rng.random_range(1..layout.width as i32 - 1);
        let y = rng.random_range(1..layout.height as i32 - 1);
        if region.cell(x, y) == SYM_EMPTY {
            return Some((x, y));
        }
    }
    None
}

/// Deterministic fallback: first empty interior cell in row-major
/// order. Succeeds whenever any empty cell exists.
pub(crate) fn scan_empty_cell(region: &SharedRegion) -> Option<(i32, i32)> {
    let layout = *region.layout();
    for y in 1..layout.height as i32 - 1 {
        for x in 1..layout.width as i32 - 1 {
            if region.cell(x, y) == SYM_EMPTY {
                return Some((x, y));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArenaConfig;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rumble_core::layout::ENERGY_LIMIT;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    /// An initialized-by-hand arena: flags published, grid stamped
    /// only with what each test places.
    fn blank_arena(num_robots: u32) -> ArenaShared {
        let shared = ArenaShared::create(ArenaConfig {
            num_robots,
            num_batteries: 2,
            ..Default::default()
        })
        .unwrap();
        shared.region.set_flags(rumble_core::Flags {
            initialized: true,
            game_over: false,
            winner: -1,
            alive_count: num_robots as i32,
        });
        shared
    }

    fn place_robot(shared: &ArenaShared, id: u32, x: i32, y: i32, force: i32, energy: i32) {
        let rec = RobotRecord {
            id: RobotId(id),
            x,
            y,
            force,
            energy,
            velocity: 1,
            status: RobotStatus::Alive,
        };
        let grid = shared.locks.lock_grid();
        let robots = grid.lock_robots();
        shared.region.set_robot(id, rec, &robots).unwrap();
        shared.region.set_cell(x, y, rec.symbol(), &grid).unwrap();
    }

    fn place_battery(shared: &ArenaShared, slot: u32, x: i32, y: i32) {
        let grid = shared.locks.lock_grid();
        let guard = grid.lock_battery(slot).unwrap();
        shared
            .region
            .set_battery(slot, BatteryRecord::placed_at(x, y), &guard)
            .unwrap();
        shared.region.set_cell(x, y, SYM_BATTERY, &grid).unwrap();
    }

    #[test]
    fn move_into_empty_cell_updates_grid_and_record() {
        let shared = blank_arena(1);
        place_robot(&shared, 0, 10, 10, 5, 50);

        let outcome = apply_move(&shared, &mut rng(), 0, 1, 0).unwrap();
        assert_eq!(outcome, MoveOutcome::Moved);

        let rec = shared.region.robot(0).unwrap();
        assert_eq!((rec.x, rec.y), (11, 10));
        assert_eq!(rec.energy, 49, "one unit of movement cost");
        assert_eq!(shared.region.cell(10, 10), SYM_EMPTY);
        assert_eq!(shared.region.cell(11, 10), b'P');
    }

    #[test]
    fn move_off_the_interior_is_rejected() {
        let shared = blank_arena(1);
        place_robot(&shared, 0, 1, 1, 5, 50);

        assert_eq!(
            apply_move(&shared, &mut rng(), 0, -1, 0).unwrap(),
            MoveOutcome::Rejected
        );
        assert_eq!(
            apply_move(&shared, &mut rng(), 0, 0, -1).unwrap(),
            MoveOutcome::Rejected
        );
        assert_eq!(
            apply_move(&shared, &mut rng(), 0, 0, 0).unwrap(),
            MoveOutcome::Rejected
        );
        // Nothing moved, nothing charged.
        let rec = shared.region.robot(0).unwrap();
        assert_eq!((rec.x, rec.y, rec.energy), (1, 1, 50));
    }

    #[test]
    fn last_unit_of_energy_kills_instead_of_moving() {
        let shared = blank_arena(1);
        place_robot(&shared, 0, 10, 10, 5, 1);

        let outcome = apply_move(&shared, &mut rng(), 0, 1, 0).unwrap();
        assert_eq!(outcome, MoveOutcome::Died);

        let rec = shared.region.robot(0).unwrap();
        assert_eq!(rec.status, RobotStatus::Dead);
        assert_eq!(rec.energy, 0);
        assert_eq!((rec.x, rec.y), (10, 10), "no move completes after death");
        assert_eq!(shared.region.cell(10, 10), SYM_EMPTY);
        assert_eq!(shared.region.cell(11, 10), SYM_EMPTY);

        let flags = shared.region.flags();
        assert_eq!(flags.alive_count, 0);
        assert!(flags.game_over);
        assert_eq!(flags.winner, -1);
    }

    #[test]
    fn battery_collection_gains_energy_and_respawns() {
        let shared = blank_arena(1);
        place_robot(&shared, 0, 10, 10, 5, 50);
        place_battery(&shared, 0, 11, 10);

        let outcome = apply_move(&shared, &mut rng(), 0, 1, 0).unwrap();
        assert_eq!(outcome, MoveOutcome::Collected { battery: 0 });

        let rec = shared.region.robot(0).unwrap();
        assert_eq!((rec.x, rec.y), (11, 10));
        assert_eq!(rec.energy, 50 + BATTERY_BOOST - MOVE_COST);

        // The slot was recycled, not consumed.
        let bat = shared.region.battery(0).unwrap();
        assert!(!bat.collected);
        assert_eq!(bat.owner, -1);
        assert_ne!((bat.x, bat.y), (11, 10), "respawn at a distinct cell");
        assert_eq!(shared.region.cell(bat.x, bat.y), SYM_BATTERY);
        assert_eq!(shared.region.cell(11, 10), b'P');
    }

    #[test]
    fn battery_gain_caps_at_energy_limit() {
        let shared = blank_arena(1);
        place_robot(&shared, 0, 10, 10, 5, ENERGY_LIMIT - 3);
        place_battery(&shared, 0, 11, 10);

        apply_move(&shared, &mut rng(), 0, 1, 0).unwrap();
        let rec = shared.region.robot(0).unwrap();
        assert_eq!(rec.energy, ENERGY_LIMIT - MOVE_COST);
    }

    #[test]
    fn stale_battery_symbol_is_an_empty_move() {
        let shared = blank_arena(1);
        place_robot(&shared, 0, 10, 10, 5, 50);
        // Symbol on the grid, but no record behind it.
        {
            let grid = shared.locks.lock_grid();
            shared
                .region
                .set_cell(11, 10, SYM_BATTERY, &grid)
                .unwrap();
        }

        let outcome = apply_move(&shared, &mut rng(), 0, 1, 0).unwrap();
        assert_eq!(outcome, MoveOutcome::Moved);
        let rec = shared.region.robot(0).unwrap();
        assert_eq!(rec.energy, 49, "no gain without a claim");
    }

    #[test]
    fn duel_stronger_attacker_wins_and_takes_cell() {
        // The reference scenario: F=8,E=50 (power 66) vs F=3,E=40 (46).
        let shared = blank_arena(2);
        place_robot(&shared, 0, 10, 10, 8, 50);
        place_robot(&shared, 1, 11, 10, 3, 40);

        let outcome = apply_move(&shared, &mut rng(), 0, 1, 0).unwrap();
        assert_eq!(
            outcome,
            MoveOutcome::Duel {
                defender: RobotId(1),
                outcome: DuelOutcome::AttackerWins
            }
        );

        let winner = shared.region.robot(0).unwrap();
        let loser = shared.region.robot(1).unwrap();
        assert_eq!(winner.status, RobotStatus::Alive);
        assert_eq!((winner.x, winner.y), (11, 10));
        assert_eq!(winner.energy, 50, "duels cost no energy");
        assert_eq!(loser.status, RobotStatus::Dead);
        assert_eq!(shared.region.cell(10, 10), SYM_EMPTY);
        assert_eq!(shared.region.cell(11, 10), b'P');

        let flags = shared.region.flags();
        assert_eq!(flags.alive_count, 1);
        assert!(flags.game_over);
        assert_eq!(flags.winner, 0);
    }

    #[test]
    fn duel_weaker_attacker_dies_in_place() {
        let shared = blank_arena(2);
        place_robot(&shared, 0, 10, 10, 3, 40);
        place_robot(&shared, 1, 11, 10, 8, 50);

        let outcome = apply_move(&shared, &mut rng(), 0, 1, 0).unwrap();
        assert_eq!(
            outcome,
            MoveOutcome::Duel {
                defender: RobotId(1),
                outcome: DuelOutcome::DefenderWins
            }
        );
        assert_eq!(
            shared.region.robot(0).unwrap().status,
            RobotStatus::Dead
        );
        assert_eq!(shared.region.cell(10, 10), SYM_EMPTY);
        // Defender keeps its cell untouched.
        assert_eq!(shared.region.cell(11, 10), b'1');
        assert_eq!(shared.region.flags().winner, 1);
    }

    #[test]
    fn tie_duel_kills_both_and_empties_both_cells() {
        let shared = blank_arena(2);
        place_robot(&shared, 0, 10, 10, 5, 40); // power 50
        place_robot(&shared, 1, 11, 10, 10, 30); // power 50

        let outcome = apply_move(&shared, &mut rng(), 0, 1, 0).unwrap();
        assert_eq!(
            outcome,
            MoveOutcome::Duel {
                defender: RobotId(1),
                outcome: DuelOutcome::BothDie
            }
        );
        assert_eq!(shared.region.robot(0).unwrap().status, RobotStatus::Dead);
        assert_eq!(shared.region.robot(1).unwrap().status, RobotStatus::Dead);
        assert_eq!(shared.region.cell(10, 10), SYM_EMPTY);
        assert_eq!(shared.region.cell(11, 10), SYM_EMPTY);

        let flags = shared.region.flags();
        assert_eq!(flags.alive_count, 0);
        assert!(flags.game_over);
        assert_eq!(flags.winner, -1);
    }

    #[test]
    fn dead_occupant_blocks_instead_of_dueling() {
        let shared = blank_arena(2);
        place_robot(&shared, 0, 10, 10, 5, 50);
        place_robot(&shared, 1, 11, 10, 5, 50);
        // Robot 1 dies but its housekeeping has not yet cleared the cell.
        {
            let robots = shared.locks.lock_robots();
            let mut rec = shared.region.robot(1).unwrap();
            rec.status = RobotStatus::Dead;
            shared.region.set_robot(1, rec, &robots).unwrap();
        }

        let outcome = apply_move(&shared, &mut rng(), 0, 1, 0).unwrap();
        assert_eq!(outcome, MoveOutcome::Blocked);
        let rec = shared.region.robot(0).unwrap();
        assert_eq!((rec.x, rec.y, rec.energy), (10, 10, 50));
    }

    #[test]
    fn concurrent_claims_on_one_battery_admit_exactly_one() {
        // The original mutex test, in miniature: N threads race to
        // claim the same battery slot under its individual lock.
        let shared = blank_arena(1);
        place_battery(&shared, 0, 20, 10);

        let claims: Vec<_> = (0..6u32)
            .map(|robot| {
                let shared = shared.clone();
                std::thread::spawn(move || {
                    let grid = shared.locks.lock_grid();
                    let guard = grid.lock_battery(0).unwrap();
                    let rec = shared.region.battery(0).unwrap();
                    if rec.collected {
                        false
                    } else {
                        shared
                            .region
                            .set_battery(
                                0,
                                BatteryRecord {
                                    collected: true,
                                    owner: robot as i32,
                                    ..rec
                                },
                                &guard,
                            )
                            .unwrap();
                        true
                    }
                })
            })
            .map(|h| h.join().unwrap())
            .collect();

        assert_eq!(claims.iter().filter(|&&won| won).count(), 1);
        let rec = shared.region.battery(0).unwrap();
        assert!(rec.collected);
        assert!((0..6).contains(&rec.owner), "winner recorded as owner");
    }

    #[test]
    fn scan_fallback_finds_the_only_empty_cell() {
        let shared = blank_arena(1);
        let layout = *shared.region.layout();
        {
            let grid = shared.locks.lock_grid();
            for y in 1..layout.height as i32 - 1 {
                for x in 1..layout.width as i32 - 1 {
                    shared.region.set_cell(x, y, b'#', &grid).unwrap();
                }
            }
            shared.region.set_cell(17, 9, SYM_EMPTY, &grid).unwrap();
        }
        assert_eq!(scan_empty_cell(&shared.region), Some((17, 9)));
    }

    proptest! {
        #[test]
        fn duel_outcome_is_a_pure_power_comparison(
            f1 in 1i32..=10, e1 in 0i32..=100,
            f2 in 1i32..=10, e2 in 0i32..=100,
        ) {
            let mk = |id: u32, f: i32, e: i32| RobotRecord {
                id: RobotId(id),
                x: 1,
                y: 1,
                force: f,
                energy: e,
                velocity: 1,
                status: RobotStatus::Alive,
            };
            let a = mk(0, f1, e1);
            let d = mk(1, f2, e2);
            let expected = match (2 * f1 + e1).cmp(&(2 * f2 + e2)) {
                std::cmp::Ordering::Greater => DuelOutcome::AttackerWins,
                std::cmp::Ordering::Less => DuelOutcome::DefenderWins,
                std::cmp::Ordering::Equal => DuelOutcome::BothDie,
            };
            prop_assert_eq!(duel_outcome(&a, &d), expected);
            // Swapping sides inverts every outcome except the tie.
            let swapped = duel_outcome(&d, &a);
            match expected {
                DuelOutcome::AttackerWins => prop_assert_eq!(swapped, DuelOutcome::DefenderWins),
                DuelOutcome::DefenderWins => prop_assert_eq!(swapped, DuelOutcome::AttackerWins),
                DuelOutcome::BothDie => prop_assert_eq!(swapped, DuelOutcome::BothDie),
            }
        }
    }
}
