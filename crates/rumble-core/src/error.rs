//! Error types for shared-region access.

use std::error::Error;
use std::fmt;

/// Errors from [`SharedRegion`](crate::region::SharedRegion) accessors.
///
/// Out-of-bounds *reads* of the grid do not error — they return the
/// border symbol, which the move logic relies on. Everything that
/// would silently corrupt or silently drop a write is surfaced here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegionError {
    /// A grid write targeted a cell outside the board.
    OutOfBounds {
        /// Requested x coordinate.
        x: i32,
        /// Requested y coordinate.
        y: i32,
    },
    /// A robot-table access used an index outside the table.
    RobotIndex {
        /// The offending index.
        id: u32,
        /// Number of robot slots in the table.
        max: u32,
    },
    /// A battery-table access used an index outside the table.
    BatteryIndex {
        /// The offending index.
        id: u32,
        /// Number of battery slots in the table.
        max: u32,
    },
    /// A battery write presented a guard for a different battery.
    LockMismatch {
        /// Index the guard actually protects.
        held: u32,
        /// Index the write targeted.
        requested: u32,
    },
    /// The region was created by an incompatible layout revision.
    VersionMismatch {
        /// Version found in the flags block.
        found: u32,
        /// Version this build expects.
        expected: u32,
    },
}

impl fmt::Display for RegionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { x, y } => write!(f, "grid write out of bounds at ({x}, {y})"),
            Self::RobotIndex { id, max } => {
                write!(f, "robot index {id} out of range (table holds {max})")
            }
            Self::BatteryIndex { id, max } => {
                write!(f, "battery index {id} out of range (table holds {max})")
            }
            Self::LockMismatch { held, requested } => write!(
                f,
                "battery write to slot {requested} under the lock for slot {held}"
            ),
            Self::VersionMismatch { found, expected } => {
                write!(f, "region layout version {found}, expected {expected}")
            }
        }
    }
}

impl Error for RegionError {}
