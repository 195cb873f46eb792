//! Engine for the robot rumble arena.
//!
//! Orchestrates everything above the shared-state layer: one-time
//! initialization behind an idempotent gate, per-robot agent and
//! housekeeping threads, move execution under the `grid → robot-table
//! → battery[i]` lock order, the named-region registry, and the
//! read-only viewer.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod agent;
pub mod config;
pub mod controller;
pub mod init;
pub mod moves;
pub mod registry;
pub mod shared;
pub mod viewer;

pub use agent::{Brain, RobotAgent};
pub use config::{ArenaConfig, ArenaError, ConfigError};
pub use controller::{Arena, ShutdownReport, PLAYER_ID};
pub use init::{initialize, InitGate, InitReport};
pub use moves::{apply_move, duel_outcome, DuelOutcome, MoveOutcome};
pub use shared::ArenaShared;
pub use viewer::{GridSnapshot, Viewer};
