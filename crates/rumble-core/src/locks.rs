//! The lock domain and its ordering protocol.
//!
//! Four lock classes protect the shared region: one init lock, one
//! grid lock, one robot-table lock, and one lock per battery. Any call
//! site that needs more than one of {grid, robot-table, battery} at
//! once must acquire them in the global order
//!
//! ```text
//! grid → robot-table → battery[i]
//! ```
//!
//! and release in reverse. That total order is the entire deadlock-
//! freedom argument, so it is enforced by construction rather than
//! convention: each guard type only exposes "acquire next in sequence"
//! methods, and a nested guard borrows its parent, so the borrow
//! checker rejects both out-of-order acquisition and out-of-order
//! release. There is no way to reach the grid lock from a robots
//! guard, or the robots lock from a battery guard.
//!
//! The init lock sits outside the hierarchy: it is taken alone during
//! one-time setup and never nested with the other three. Its guard
//! doubles as a write proof for every table, because setup stamps the
//! grid and both tables before any agent observes `initialized`.
//!
//! Poisoning is deliberately swallowed everywhere: a panicking agent
//! is fatal to that agent, not to the arena, and the data it guards is
//! whole-record writes that are valid or absent, never half-applied.

use std::sync::{Mutex, MutexGuard, PoisonError};

fn lock(m: &Mutex<()>) -> MutexGuard<'_, ()> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

// ── LockHandles ──────────────────────────────────────────────────

/// The full set of locks for one arena.
///
/// A plain value handed explicitly to every component at construction
/// — there is no process-wide registry of locks. Each lock protects
/// exactly one kind of region: no lock covers two.
#[derive(Debug)]
pub struct LockHandles {
    init: Mutex<()>,
    grid: Mutex<()>,
    robots: Mutex<()>,
    batteries: Box<[Mutex<()>]>,
}

impl LockHandles {
    /// Create the lock set for an arena with `max_batteries` battery slots.
    pub fn new(max_batteries: u32) -> Self {
        Self {
            init: Mutex::new(()),
            grid: Mutex::new(()),
            robots: Mutex::new(()),
            batteries: (0..max_batteries).map(|_| Mutex::new(())).collect(),
        }
    }

    /// Number of per-battery locks.
    pub fn battery_count(&self) -> u32 {
        self.batteries.len() as u32
    }

    /// Acquire the init lock. One-time setup only; never nested.
    pub fn lock_init(&self) -> InitGuard<'_> {
        InitGuard {
            _raw: lock(&self.init),
        }
    }

    /// Acquire the grid lock — the top of the ordering hierarchy.
    pub fn lock_grid(&self) -> GridGuard<'_> {
        GridGuard {
            _raw: lock(&self.grid),
            locks: self,
        }
    }

    /// Acquire the robot-table lock alone.
    ///
    /// Entering the hierarchy here forfeits the grid lock: the
    /// returned guard cannot reach it. This is the viewer's snapshot
    /// path and the housekeeping decay path.
    pub fn lock_robots(&self) -> RobotsGuard<'_> {
        RobotsGuard {
            _raw: lock(&self.robots),
            locks: self,
        }
    }

    /// Acquire one battery's lock alone. `None` if `id` is out of range.
    ///
    /// The bottom of the hierarchy: nothing further can be acquired
    /// while this guard is held.
    pub fn lock_battery(&self, id: u32) -> Option<BatteryGuard<'_>> {
        let m = self.batteries.get(id as usize)?;
        Some(BatteryGuard {
            _raw: lock(m),
            id,
        })
    }
}

// ── Guards ───────────────────────────────────────────────────────

/// Proof of holding the init lock. Outside the ordering hierarchy; no
/// nesting methods.
#[derive(Debug)]
pub struct InitGuard<'a> {
    _raw: MutexGuard<'a, ()>,
}

/// Proof of holding the grid lock.
#[derive(Debug)]
pub struct GridGuard<'a> {
    _raw: MutexGuard<'a, ()>,
    locks: &'a LockHandles,
}

impl GridGuard<'_> {
    /// Acquire the robot-table lock beneath the grid lock.
    ///
    /// The returned guard borrows this one, so it must be dropped
    /// first — release order is the reverse of acquisition by
    /// construction.
    pub fn lock_robots(&self) -> RobotsGuard<'_> {
        RobotsGuard {
            _raw: lock(&self.locks.robots),
            locks: self.locks,
        }
    }

    /// Acquire a battery lock beneath the grid lock, skipping the
    /// robot-table level (skipping downward never violates a total
    /// order). `None` if `id` is out of range.
    pub fn lock_battery(&self, id: u32) -> Option<BatteryGuard<'_>> {
        let m = self.locks.batteries.get(id as usize)?;
        Some(BatteryGuard {
            _raw: lock(m),
            id,
        })
    }
}

/// Proof of holding the robot-table lock.
#[derive(Debug)]
pub struct RobotsGuard<'a> {
    _raw: MutexGuard<'a, ()>,
    locks: &'a LockHandles,
}

impl RobotsGuard<'_> {
    /// Acquire a battery lock beneath the robot-table lock. `None` if
    /// `id` is out of range.
    pub fn lock_battery(&self, id: u32) -> Option<BatteryGuard<'_>> {
        let m = self.locks.batteries.get(id as usize)?;
        Some(BatteryGuard {
            _raw: lock(m),
            id,
        })
    }
}

/// Proof of holding one battery's lock. Terminal: exposes nothing
/// further to acquire.
#[derive(Debug)]
pub struct BatteryGuard<'a> {
    _raw: MutexGuard<'a, ()>,
    id: u32,
}

impl BatteryGuard<'_> {
    /// Index of the battery this guard protects.
    pub fn battery_id(&self) -> u32 {
        self.id
    }
}

// ── Write proofs ─────────────────────────────────────────────────

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::InitGuard<'_> {}
    impl Sealed for super::GridGuard<'_> {}
    impl Sealed for super::RobotsGuard<'_> {}
    impl Sealed for super::BatteryGuard<'_> {}
}

/// Capability to write grid cells: the grid guard, or the init guard
/// during pre-publication setup.
pub trait GridWriteProof: sealed::Sealed {}
impl GridWriteProof for GridGuard<'_> {}
impl GridWriteProof for InitGuard<'_> {}

/// Capability to write robot records: the robot-table guard, or the
/// init guard during pre-publication setup.
pub trait RobotWriteProof: sealed::Sealed {}
impl RobotWriteProof for RobotsGuard<'_> {}
impl RobotWriteProof for InitGuard<'_> {}

/// Capability to write one battery record.
///
/// A [`BatteryGuard`] proves access to exactly its own slot
/// (`slot()` returns it, and the region accessor checks the match);
/// the init guard proves access to every slot.
pub trait BatteryWriteProof: sealed::Sealed {
    /// The single slot this proof covers, or `None` for all slots.
    fn slot(&self) -> Option<u32>;
}

impl BatteryWriteProof for BatteryGuard<'_> {
    fn slot(&self) -> Option<u32> {
        Some(self.id)
    }
}

impl BatteryWriteProof for InitGuard<'_> {
    fn slot(&self) -> Option<u32> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    #[test]
    fn full_chain_acquires_and_releases() {
        let locks = LockHandles::new(4);
        {
            let grid = locks.lock_grid();
            {
                let robots = grid.lock_robots();
                let battery = robots.lock_battery(2).unwrap();
                assert_eq!(battery.battery_id(), 2);
            }
            // Robots released; grid → battery skip is also legal.
            let battery = grid.lock_battery(0).unwrap();
            assert_eq!(battery.battery_id(), 0);
        }
        // Everything released; standalone entries still work.
        let _robots = locks.lock_robots();
        let _battery = locks.lock_battery(3).unwrap();
    }

    #[test]
    fn battery_index_out_of_range_is_none() {
        let locks = LockHandles::new(2);
        assert!(locks.lock_battery(2).is_none());
        let grid = locks.lock_grid();
        assert!(grid.lock_battery(9).is_none());
    }

    #[test]
    fn contended_chains_make_progress() {
        // Several threads all walking grid → robots → battery[i] must
        // finish quickly; with a cycle in the order this would hang.
        let locks = Arc::new(LockHandles::new(3));
        let start = Instant::now();
        let handles: Vec<_> = (0..8u32)
            .map(|i| {
                let locks = Arc::clone(&locks);
                std::thread::spawn(move || {
                    for _ in 0..200 {
                        let grid = locks.lock_grid();
                        let robots = grid.lock_robots();
                        let _battery = robots.lock_battery(i % 3).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert!(
            start.elapsed() < Duration::from_secs(10),
            "lock chain contention took pathologically long"
        );
    }

    #[test]
    fn init_guard_proves_every_battery_slot() {
        let locks = LockHandles::new(2);
        let init = locks.lock_init();
        assert_eq!(BatteryWriteProof::slot(&init), None);
        drop(init);
        let guard = locks.lock_battery(1).unwrap();
        assert_eq!(BatteryWriteProof::slot(&guard), Some(1));
    }
}
