//! Rumble: a multi-agent robot arena over a fixed-layout shared region.
//!
//! This is the facade crate re-exporting the public API from the
//! Rumble sub-crates. For most users, adding `rumble` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use rumble::prelude::*;
//! use std::time::Duration;
//!
//! let config = ArenaConfig {
//!     num_robots: 4,
//!     num_batteries: 5,
//!     seed: 42,
//!     act_interval: Duration::from_millis(10),
//!     decay_interval: Duration::from_millis(50),
//!     ..Default::default()
//! };
//! let mut arena = Arena::new(config).unwrap();
//! arena.start().unwrap();
//!
//! // Steer the player; AI robots wander on their own.
//! arena.set_player_direction(1, 0).unwrap();
//!
//! // Observe without stalling anyone.
//! let viewer = arena.viewer();
//! let frame = viewer.grid_snapshot();
//! assert_eq!(frame.height(), 20);
//! assert!(viewer.robots_snapshot().unwrap().len() <= 4);
//!
//! let report = arena.shutdown();
//! assert_eq!(report.abandoned, 0);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `rumble-core` | Region layout, records, the ordered lock domain |
//! | [`engine`] | `rumble-engine` | Initializer, agents, controller, registry, viewer |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Region layout, record types, and the ordered lock domain
/// (`rumble-core`).
///
/// The lock hierarchy lives here: [`types::LockHandles`] hands out
/// guards whose types only permit acquisitions in the `grid →
/// robot-table → battery[i]` order.
pub use rumble_core as types;

/// Arena orchestration (`rumble-engine`).
///
/// [`engine::Arena`] owns the threads; [`engine::apply_move`] is the
/// deterministic move core; [`engine::registry`] is the named
/// rendezvous for shared regions.
pub use rumble_engine as engine;

/// Common imports for typical usage.
///
/// ```rust
/// use rumble::prelude::*;
/// ```
pub mod prelude {
    pub use rumble_core::{
        BatteryRecord, Flags, Occupant, RegionLayout, RobotId, RobotRecord, RobotStatus,
        SharedRegion,
    };
    pub use rumble_engine::{
        Arena, ArenaConfig, ArenaError, ArenaShared, DuelOutcome, GridSnapshot, MoveOutcome,
        ShutdownReport, Viewer, PLAYER_ID,
    };
}
