//! Byte-exact layout of the shared region.
//!
//! The region is one contiguous block addressed by static offsets,
//! in this order:
//!
//! ```text
//! grid block      height × width bytes, row-major, one symbol byte per cell
//! robot table     RobotRecord::BYTES × max_robots
//! battery table   BatteryRecord::BYTES × max_batteries
//! flags block     Flags::BYTES (initialized, game_over, winner,
//!                 alive_count, layout version, reserved)
//! ```
//!
//! All offsets are computed once from the board dimensions and table
//! capacities; record widths are compile-time constants with size
//! assertions in [`record`](crate::record).

use crate::record::{BatteryRecord, Flags, RobotRecord};

/// Revision of the byte layout. Stamped into the flags block at region
/// creation and checked when attaching, so a viewer built against a
/// different revision fails loudly instead of misreading the tables.
pub const LAYOUT_VERSION: u32 = 1;

/// Default board width, in cells (including the border ring).
pub const DEFAULT_WIDTH: u32 = 40;
/// Default board height, in cells (including the border ring).
pub const DEFAULT_HEIGHT: u32 = 20;

/// Upper bound on robots per arena. Robot 0 renders as `P`; robots
/// 1–9 render as their decimal digit, which caps the table at ten.
pub const MAX_ROBOTS: u32 = 10;
/// Upper bound on batteries per arena.
pub const MAX_BATTERIES: u32 = 16;

/// Energy ceiling for every robot.
pub const ENERGY_LIMIT: i32 = 100;
/// Energy cost of one completed unit move.
pub const MOVE_COST: i32 = 1;
/// Energy gained from collecting one battery, before the
/// [`ENERGY_LIMIT`] cap.
pub const BATTERY_BOOST: i32 = 20;

// ── Cell symbols ─────────────────────────────────────────────────

/// Border cell symbol.
pub const SYM_BORDER: u8 = b'#';
/// Empty cell symbol.
pub const SYM_EMPTY: u8 = b' ';
/// Uncollected battery symbol.
pub const SYM_BATTERY: u8 = b'B';
/// Player robot symbol (robot 0).
pub const SYM_PLAYER: u8 = b'P';

/// Grid symbol for a robot id: `P` for the player, a decimal digit
/// for AI robots.
pub fn robot_symbol(id: u32) -> u8 {
    if id == 0 {
        SYM_PLAYER
    } else {
        b'0' + (id % 10) as u8
    }
}

// ── RegionLayout ─────────────────────────────────────────────────

/// Dimensions and capacities that fix every byte offset in the region.
///
/// A layout is a pure value: two equal layouts describe byte-identical
/// regions, which is what lets a standalone viewer attach and read the
/// same offsets the agents write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegionLayout {
    /// Board width in cells, including the border columns.
    pub width: u32,
    /// Board height in cells, including the border rows.
    pub height: u32,
    /// Robot table capacity.
    pub max_robots: u32,
    /// Battery table capacity.
    pub max_batteries: u32,
}

impl RegionLayout {
    /// Layout with the default board and maximum table capacities.
    pub fn with_defaults() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            max_robots: MAX_ROBOTS,
            max_batteries: MAX_BATTERIES,
        }
    }

    /// Number of bytes in the grid block.
    pub fn grid_bytes(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Offset of the grid block. Always zero; named for symmetry.
    pub fn grid_offset(&self) -> usize {
        0
    }

    /// Byte offset of cell `(x, y)` within the region, or `None` when
    /// the coordinate is off the board.
    pub fn cell_offset(&self, x: i32, y: i32) -> Option<usize> {
        if !self.contains(x, y) {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Offset of the robot table.
    pub fn robot_table_offset(&self) -> usize {
        self.grid_offset() + self.grid_bytes()
    }

    /// Offset of robot record `id`, or `None` past the table.
    pub fn robot_offset(&self, id: u32) -> Option<usize> {
        if id >= self.max_robots {
            return None;
        }
        Some(self.robot_table_offset() + id as usize * RobotRecord::BYTES)
    }

    /// Offset of the battery table.
    pub fn battery_table_offset(&self) -> usize {
        self.robot_table_offset() + self.max_robots as usize * RobotRecord::BYTES
    }

    /// Offset of battery record `id`, or `None` past the table.
    pub fn battery_offset(&self, id: u32) -> Option<usize> {
        if id >= self.max_batteries {
            return None;
        }
        Some(self.battery_table_offset() + id as usize * BatteryRecord::BYTES)
    }

    /// Offset of the flags block.
    pub fn flags_offset(&self) -> usize {
        self.battery_table_offset() + self.max_batteries as usize * BatteryRecord::BYTES
    }

    /// Total region size in bytes.
    pub fn total_bytes(&self) -> usize {
        self.flags_offset() + Flags::BYTES
    }

    /// Whether `(x, y)` is on the board at all (border included).
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Whether `(x, y)` is in the playable interior — on the board and
    /// not on the border ring. Moves outside the interior are rejected.
    pub fn interior(&self, x: i32, y: i32) -> bool {
        x >= 1 && y >= 1 && (x as u32) < self.width - 1 && (y as u32) < self.height - 1
    }

    /// Whether the cell at `(x, y)` is part of the border ring.
    pub fn on_border(&self, x: i32, y: i32) -> bool {
        self.contains(x, y) && !self.interior(x, y)
    }
}
