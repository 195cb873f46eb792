//! The per-robot agent: sense → decide → act, plus the concurrent
//! housekeeping (energy decay) task.
//!
//! The agent thread is a thin shell over [`moves::apply_move`] — all
//! lock choreography lives there. What lives here is the state
//! machine: waiting out initialization, the unlocked sense snapshot,
//! the player/AI decision split, pacing, and cooperative shutdown.
//!
//! Pacing uses `thread::park_timeout` rather than `sleep` so a stop
//! request can unpark the thread immediately instead of waiting out
//! the interval.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::Receiver;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use rumble_core::layout::SYM_BORDER;
use rumble_core::{RobotRecord, RobotStatus};

use crate::config::ArenaError;
use crate::moves::{apply_move, refresh_flags_after_death, MoveOutcome};
use crate::shared::ArenaShared;

/// The four unit moves.
const CARDINALS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

// ── Brain ──────────────────────────────────────────────────────────

/// What drives a robot's decisions.
///
/// One shared sense–act loop consumes either variant; the split is
/// only in how intended moves are produced.
#[derive(Debug)]
pub enum Brain {
    /// Commands arrive on a channel; only the most recent unconsumed
    /// direction matters (stale ones coalesce away at drain time).
    Player {
        /// Direction command ingress.
        directions: Receiver<(i32, i32)>,
    },
    /// Uniform-random policy: up to `velocity` independent cardinal
    /// moves per tick.
    Ai,
}

// ── RobotAgent ─────────────────────────────────────────────────────

/// One robot's driving agent. Owns its RNG stream and its brain;
/// shares the region, locks, and gate with everyone else.
#[derive(Debug)]
pub struct RobotAgent {
    shared: ArenaShared,
    id: u32,
    brain: Brain,
    rng: ChaCha8Rng,
    running: Arc<AtomicBool>,
}

impl RobotAgent {
    /// Build the agent for robot `id`. The RNG stream is derived from
    /// the arena seed and the id, so runs are reproducible per robot.
    pub fn new(shared: ArenaShared, id: u32, brain: Brain, running: Arc<AtomicBool>) -> Self {
        let seed = shared
            .config
            .seed
            .wrapping_add(0x9E37_79B9_7F4A_7C15u64.wrapping_mul(u64::from(id) + 1));
        Self {
            shared,
            id,
            brain,
            rng: ChaCha8Rng::seed_from_u64(seed),
            running,
        }
    }

    /// The main loop: wait for initialization, then sense–decide–act
    /// until dead, stopped, or the round ends.
    ///
    /// Faults are fatal to this agent only: they are logged and the
    /// loop exits, leaving the rest of the arena running.
    pub fn run(mut self) {
        self.shared.gate.wait();
        if !self.shared.region.flags().initialized {
            tracing::warn!(robot = self.id, "gate opened without initialization");
            return;
        }
        tracing::debug!(robot = self.id, "agent started");

        while self.running.load(Ordering::Acquire) {
            if self.shared.region.flags().game_over {
                break;
            }
            match self.step() {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    tracing::warn!(robot = self.id, error = %e, "agent fault");
                    break;
                }
            }
            std::thread::park_timeout(self.shared.config.act_interval);
        }
        tracing::debug!(robot = self.id, "agent exited");
    }

    /// One sense–decide–act pass. Returns whether to keep looping.
    fn step(&mut self) -> Result<bool, ArenaError> {
        // SENSE: unlocked grid snapshot for heuristics, locked read of
        // our own record for liveness.
        let snapshot = self.shared.region.grid_bytes_snapshot();
        let me = {
            let _robots = self.shared.locks.lock_robots();
            self.shared.region.robot(self.id)?
        };
        if me.status == RobotStatus::Dead {
            return Ok(false);
        }

        // DECIDE.
        let intents = self.decide(&me, &snapshot);

        // ACT: one locked execution per intent, aborting the tick's
        // remainder the moment we are dead.
        for (dx, dy) in intents {
            let outcome = apply_move(&self.shared, &mut self.rng, self.id, dx, dy)?;
            if outcome == MoveOutcome::Died {
                return Ok(false);
            }
            let dead_now = {
                let _robots = self.shared.locks.lock_robots();
                self.shared.region.robot(self.id)?.status == RobotStatus::Dead
            };
            if dead_now {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Produce this tick's intended moves.
    fn decide(&mut self, me: &RobotRecord, snapshot: &[u8]) -> Vec<(i32, i32)> {
        match &self.brain {
            Brain::Player { directions } => {
                // Coalesce: drain everything, keep only the latest.
                let mut last = None;
                while let Ok(d) = directions.try_recv() {
                    last = Some(d);
                }
                last.into_iter().collect()
            }
            Brain::Ai => {
                let layout = self.shared.region.layout();
                let width = layout.width as usize;
                let mut intents = Vec::new();
                for _ in 0..me.velocity.max(0) {
                    let (dx, dy) = CARDINALS[self.rng.random_range(0..CARDINALS.len())];
                    // Heuristic only: skip targets the (possibly stale)
                    // snapshot already shows as border. The authoritative
                    // check happens again under the grid lock.
                    let (tx, ty) = (me.x + dx, me.y + dy);
                    let sym = snapshot
                        .get(ty as usize * width + tx as usize)
                        .copied()
                        .unwrap_or(SYM_BORDER);
                    if sym != SYM_BORDER {
                        intents.push((dx, dy));
                    }
                }
                intents
            }
        }
    }
}

// ── Housekeeping ───────────────────────────────────────────────────

/// What one decay pass did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DecayStatus {
    /// Energy reduced; robot still alive.
    Alive,
    /// Energy hit zero: robot died and its cell was cleared.
    Died,
    /// The robot was already dead; nothing to do.
    AlreadyDead,
}

/// One housekeeping decay pass for robot `id`.
///
/// The whole-record RMW happens under the robot-table lock; when the
/// decay kills the robot, the robots guard is *released* before the
/// grid lock is taken to clear the cell (acquiring grid while holding
/// robots would invert the lock order). The duel path tolerates the
/// resulting window by re-checking defender status under the robots
/// lock.
pub(crate) fn decay_once(shared: &ArenaShared, id: u32) -> Result<DecayStatus, ArenaError> {
    let died_at = {
        let robots = shared.locks.lock_robots();
        let mut rec = shared.region.robot(id)?;
        if rec.status == RobotStatus::Dead {
            return Ok(DecayStatus::AlreadyDead);
        }
        rec.energy -= decay_amount(&rec);
        if rec.energy <= 0 {
            rec.energy = 0;
            rec.status = RobotStatus::Dead;
            shared.region.set_robot(id, rec, &robots)?;
            refresh_flags_after_death(&shared.region, &robots)?;
            Some((rec.x, rec.y))
        } else {
            shared.region.set_robot(id, rec, &robots)?;
            None
        }
    };

    match died_at {
        Some((x, y)) => {
            let grid = shared.locks.lock_grid();
            shared.region.set_cell(x, y, rumble_core::layout::SYM_EMPTY, &grid)?;
            Ok(DecayStatus::Died)
        }
        None => Ok(DecayStatus::Alive),
    }
}

/// Per-robot decay per housekeeping cycle: `max(1, (velocity + force) / 4)`.
pub(crate) fn decay_amount(rec: &RobotRecord) -> i32 {
    ((rec.velocity + rec.force) / 4).max(1)
}

/// The housekeeping task: periodic energy decay until death or stop.
pub(crate) fn housekeeping_loop(shared: ArenaShared, id: u32, running: Arc<AtomicBool>) {
    shared.gate.wait();
    while running.load(Ordering::Acquire) {
        std::thread::park_timeout(shared.config.decay_interval);
        if !running.load(Ordering::Acquire) {
            break;
        }
        match decay_once(&shared, id) {
            Ok(DecayStatus::Alive) => {}
            Ok(DecayStatus::Died) => {
                tracing::debug!(robot = id, "died of energy decay");
                break;
            }
            Ok(DecayStatus::AlreadyDead) => break,
            Err(e) => {
                tracing::warn!(robot = id, error = %e, "housekeeping fault");
                break;
            }
        }
    }
}
