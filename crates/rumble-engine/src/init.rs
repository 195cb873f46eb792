//! One-time arena setup under the init lock.
//!
//! [`initialize`] is idempotent: every spawned component may call it,
//! exactly one performs the work, and the rest observe the flag and
//! return. Agents then block on the [`InitGate`] rather than busy-
//! polling the initialized flag; the gate opens only after the flag is
//! set, so the "only proceed after initialized" ordering survives the
//! signaling change.

use std::sync::{Condvar, Mutex, PoisonError};
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use rumble_core::layout::{ENERGY_LIMIT, SYM_BATTERY, SYM_EMPTY};
use rumble_core::{BatteryRecord, Flags, RobotId, RobotRecord, RobotStatus};

use crate::config::ArenaError;
use crate::moves::sample_empty_cell;
use crate::shared::ArenaShared;

// ── InitGate ───────────────────────────────────────────────────────

/// Condvar gate that replaces busy-polling of the initialized flag.
///
/// Opens exactly once and stays open.
#[derive(Debug, Default)]
pub struct InitGate {
    open: Mutex<bool>,
    cond: Condvar,
}

impl InitGate {
    /// A closed gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the gate and wake every waiter. Idempotent.
    pub fn open(&self) {
        let mut open = self.open.lock().unwrap_or_else(PoisonError::into_inner);
        *open = true;
        self.cond.notify_all();
    }

    /// Block until the gate opens.
    pub fn wait(&self) {
        let mut open = self.open.lock().unwrap_or_else(PoisonError::into_inner);
        while !*open {
            open = self
                .cond
                .wait(open)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Block until the gate opens or `timeout` elapses. Returns
    /// whether the gate is open.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let mut open = self.open.lock().unwrap_or_else(PoisonError::into_inner);
        while !*open {
            let (guard, result) = self
                .cond
                .wait_timeout(open, timeout)
                .unwrap_or_else(PoisonError::into_inner);
            open = guard;
            if result.timed_out() {
                return *open;
            }
        }
        true
    }

    /// Whether the gate has opened.
    pub fn is_open(&self) -> bool {
        *self.open.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ── Initializer ────────────────────────────────────────────────────

/// What [`initialize`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InitReport {
    /// This call performed the setup.
    Initialized {
        /// Robots created.
        robots: u32,
        /// Batteries placed.
        batteries: u32,
    },
    /// Another caller already set up the arena; nothing was done.
    AlreadyInitialized,
}

/// Populate the arena under the init lock: place batteries, create
/// robot records, stamp the grid, publish the flags, open the gate.
///
/// Robot 0 is the player and starts at the board center (falling back
/// to a sampled cell if the center is taken); AI robots start at
/// uniformly sampled empty cells. Stats are randomized from the
/// configured seed: force 1–10, velocity 1–5, energy 60–100 for the
/// player and 50–90 for AI robots.
///
/// # Errors
///
/// [`ArenaError::PlacementFailed`] when rejection sampling cannot find
/// an empty cell within its retry bound; region accessor errors pass
/// through.
pub fn initialize(shared: &ArenaShared) -> Result<InitReport, ArenaError> {
    let init = shared.locks.lock_init();
    if shared.region.flags().initialized {
        // A racing initializer won; make sure waiters are released.
        shared.gate.open();
        return Ok(InitReport::AlreadyInitialized);
    }

    let region = &shared.region;
    let config = &shared.config;
    let layout = *region.layout();
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

    for b in 0..config.num_batteries {
        let (x, y) = sample_empty_cell(region, &mut rng)
            .ok_or(ArenaError::PlacementFailed { what: "battery" })?;
        region.set_cell(x, y, SYM_BATTERY, &init)?;
        region.set_battery(b, BatteryRecord::placed_at(x, y), &init)?;
    }

    for id in 0..config.num_robots {
        let (x, y) = if id == 0 {
            let cx = layout.width as i32 / 2;
            let cy = layout.height as i32 / 2;
            if region.cell(cx, cy) == SYM_EMPTY {
                (cx, cy)
            } else {
                sample_empty_cell(region, &mut rng)
                    .ok_or(ArenaError::PlacementFailed { what: "player" })?
            }
        } else {
            sample_empty_cell(region, &mut rng)
                .ok_or(ArenaError::PlacementFailed { what: "robot" })?
        };

        let energy = if id == 0 {
            rng.random_range(60..=ENERGY_LIMIT)
        } else {
            rng.random_range(50..=90)
        };
        let rec = RobotRecord {
            id: RobotId(id),
            x,
            y,
            force: rng.random_range(1..=10),
            energy,
            velocity: rng.random_range(1..=5),
            status: RobotStatus::Alive,
        };
        region.set_robot(id, rec, &init)?;
        region.set_cell(x, y, rec.symbol(), &init)?;
    }

    region.set_flags(Flags {
        initialized: true,
        game_over: false,
        winner: -1,
        alive_count: config.num_robots as i32,
    });
    shared.gate.open();

    Ok(InitReport::Initialized {
        robots: config.num_robots,
        batteries: config.num_batteries,
    })
}
