//! The arena controller: thread lifecycle and the player command path.
//!
//! [`Arena`] owns every spawned thread — one agent plus one
//! housekeeping task per robot — and is the only component allowed to
//! stop them. Stopping is cooperative: each robot's thread pair checks
//! its own flag and parks between ticks, so a stop is a flag store
//! plus an unpark, followed (on shutdown) by a grace-bounded join.
//! Threads that miss the grace budget are abandoned (detached), never
//! blocked on forever.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Sender, TrySendError};

use crate::agent::{housekeeping_loop, Brain, RobotAgent};
use crate::config::{ArenaConfig, ArenaError};
use crate::init::initialize;
use crate::registry;
use crate::shared::ArenaShared;
use crate::viewer::Viewer;

/// Robot 0 is the player.
pub const PLAYER_ID: u32 = 0;

/// Capacity of the player direction channel. The agent drains it every
/// tick and keeps only the latest entry, so depth buys nothing beyond
/// absorbing a controller burst.
const DIRECTION_QUEUE: usize = 8;

// ── ShutdownReport ─────────────────────────────────────────────────

/// Report from [`Arena::shutdown`].
#[derive(Debug)]
pub struct ShutdownReport {
    /// Total time spent in the shutdown sequence.
    pub total_ms: u64,
    /// Threads joined within the grace budget.
    pub joined: usize,
    /// Threads that missed the budget and were abandoned. They still
    /// observe the stop flag and exit on their own; they just no
    /// longer have anyone waiting on them.
    pub abandoned: usize,
}

// ── Arena ──────────────────────────────────────────────────────────

/// One robot's thread pair plus its stop flag.
struct RobotSlot {
    running: Arc<AtomicBool>,
    agent: JoinHandle<()>,
    housekeeping: JoinHandle<()>,
}

impl RobotSlot {
    fn stop(&self) {
        self.running.store(false, Ordering::Release);
        self.agent.thread().unpark();
        self.housekeeping.thread().unpark();
    }
}

/// One running arena: the shared state plus every thread driving it.
///
/// Construction initializes the arena (idempotently, under the init
/// lock); [`start`](Self::start) spawns the threads. Dropping an arena
/// shuts it down and, if it was registered under a name, removes the
/// registry entry.
pub struct Arena {
    shared: ArenaShared,
    name: Option<String>,
    direction_tx: Option<Sender<(i32, i32)>>,
    slots: Vec<RobotSlot>,
    shut_down: bool,
}

impl Arena {
    /// Allocate and initialize an unregistered arena. No threads run
    /// until [`start`](Self::start).
    ///
    /// # Errors
    ///
    /// Configuration validation and initializer errors pass through.
    pub fn new(config: ArenaConfig) -> Result<Self, ArenaError> {
        let shared = ArenaShared::create(config)?;
        initialize(&shared)?;
        Ok(Self::from_shared(shared, None))
    }

    /// Allocate, initialize, and register an arena under `name`, so
    /// standalone components can [`registry::attach`] to it.
    ///
    /// # Errors
    ///
    /// Configuration validation and initializer errors pass through.
    pub fn with_name(name: &str, config: ArenaConfig) -> Result<Self, ArenaError> {
        let shared = registry::create(name, config)?;
        initialize(&shared)?;
        Ok(Self::from_shared(shared, Some(name.to_owned())))
    }

    fn from_shared(shared: ArenaShared, name: Option<String>) -> Self {
        Self {
            shared,
            name,
            direction_tx: None,
            slots: Vec::new(),
            shut_down: false,
        }
    }

    /// Spawn every robot's agent and housekeeping thread. Robot 0 gets
    /// the player brain; the rest are AI.
    ///
    /// # Errors
    ///
    /// Calling `start` twice (or after shutdown) returns
    /// [`ArenaError::AgentStopped`] for the player.
    pub fn start(&mut self) -> Result<(), ArenaError> {
        if !self.slots.is_empty() || self.shut_down {
            return Err(ArenaError::AgentStopped { id: PLAYER_ID });
        }

        for id in 0..self.shared.config.num_robots {
            let brain = if id == PLAYER_ID {
                let (tx, rx) = crossbeam_channel::bounded(DIRECTION_QUEUE);
                self.direction_tx = Some(tx);
                Brain::Player { directions: rx }
            } else {
                Brain::Ai
            };

            let running = Arc::new(AtomicBool::new(true));
            let agent = RobotAgent::new(
                self.shared.clone(),
                id,
                brain,
                Arc::clone(&running),
            );
            let agent = thread::Builder::new()
                .name(format!("rumble-agent-{id}"))
                .spawn(move || agent.run())
                .expect("failed to spawn agent thread");

            let hk_shared = self.shared.clone();
            let hk_running = Arc::clone(&running);
            let housekeeping = thread::Builder::new()
                .name(format!("rumble-decay-{id}"))
                .spawn(move || housekeeping_loop(hk_shared, id, hk_running))
                .expect("failed to spawn housekeeping thread");

            self.slots.push(RobotSlot {
                running,
                agent,
                housekeeping,
            });
        }
        tracing::info!(
            robots = self.shared.config.num_robots,
            name = self.name.as_deref().unwrap_or("<anonymous>"),
            "arena started"
        );
        Ok(())
    }

    /// Queue a direction command for the player. Only the most recent
    /// unconsumed command takes effect; when the queue is full the
    /// command is dropped.
    ///
    /// # Errors
    ///
    /// [`ArenaError::InvalidDirection`] for anything but a unit
    /// cardinal delta, [`ArenaError::NoSuchAgent`] before `start`,
    /// [`ArenaError::AgentStopped`] once the player agent has exited.
    pub fn set_player_direction(&self, dx: i32, dy: i32) -> Result<(), ArenaError> {
        if dx.abs() + dy.abs() != 1 {
            return Err(ArenaError::InvalidDirection { dx, dy });
        }
        let tx = self
            .direction_tx
            .as_ref()
            .ok_or(ArenaError::NoSuchAgent { id: PLAYER_ID })?;
        match tx.try_send((dx, dy)) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                tracing::debug!("player direction queue full, command dropped");
                Ok(())
            }
            Err(TrySendError::Disconnected(_)) => {
                Err(ArenaError::AgentStopped { id: PLAYER_ID })
            }
        }
    }

    /// A read-only viewer over this arena's shared state.
    pub fn viewer(&self) -> Viewer {
        Viewer::new(self.shared.clone())
    }

    /// A clone of the shared-state bundle, for components that sit
    /// beside the controller.
    pub fn handle(&self) -> ArenaShared {
        self.shared.clone()
    }

    /// Whether the round has ended (one or zero robots left alive).
    pub fn game_over(&self) -> bool {
        self.shared.region.flags().game_over
    }

    /// The winner's robot id once the round has ended with a survivor;
    /// `None` while running or after a final tie.
    pub fn winner(&self) -> Option<u32> {
        let flags = self.shared.region.flags();
        if flags.game_over && flags.winner >= 0 {
            Some(flags.winner as u32)
        } else {
            None
        }
    }

    /// Request a cooperative stop of one robot's thread pair without
    /// joining it. The pair observes the flag at the top of its next
    /// tick; the unpark cuts short any in-progress interval sleep.
    ///
    /// # Errors
    ///
    /// [`ArenaError::NoSuchAgent`] when `id` has no spawned threads.
    pub fn stop(&self, id: u32) -> Result<(), ArenaError> {
        let slot = self
            .slots
            .get(id as usize)
            .ok_or(ArenaError::NoSuchAgent { id })?;
        slot.stop();
        Ok(())
    }

    /// Cooperatively stop every robot's thread pair.
    pub fn stop_all(&self) {
        for slot in &self.slots {
            slot.stop();
        }
    }

    /// Stop every thread and join each within the configured grace
    /// budget. Idempotent; the second call reports zero work.
    pub fn shutdown(&mut self) -> ShutdownReport {
        if self.shut_down {
            return ShutdownReport {
                total_ms: 0,
                joined: 0,
                abandoned: 0,
            };
        }
        self.shut_down = true;
        let start = Instant::now();

        self.stop_all();
        // Dropping the sender lets later callers observe disconnection
        // instead of an ever-full queue.
        self.direction_tx = None;

        let grace = self.shared.config.shutdown_grace;
        let mut joined = 0;
        let mut abandoned = 0;
        let handles = self
            .slots
            .drain(..)
            .flat_map(|slot| [slot.agent, slot.housekeeping]);
        for handle in handles {
            // The budget is shared across all handles: the stop flags
            // were set for everyone up front, so the threads wind down
            // concurrently.
            let deadline = start + grace;
            while !handle.is_finished() && Instant::now() < deadline {
                handle.thread().unpark();
                thread::sleep(Duration::from_millis(1));
            }
            if handle.is_finished() && handle.join().is_ok() {
                joined += 1;
            } else {
                abandoned += 1;
            }
        }

        if let Some(name) = self.name.take() {
            registry::remove(&name);
        }

        let total_ms = start.elapsed().as_millis() as u64;
        let report = ShutdownReport {
            total_ms,
            joined,
            abandoned,
        };
        tracing::info!(
            total_ms = report.total_ms,
            joined = report.joined,
            abandoned = report.abandoned,
            "arena shut down"
        );
        report
    }
}

impl Drop for Arena {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("name", &self.name)
            .field("robots", &self.shared.config.num_robots)
            .field("slots", &self.slots.len())
            .field("shut_down", &self.shut_down)
            .finish()
    }
}
