//! Fixed-width record types stored in the shared region.
//!
//! Every record serializes to a compile-time-constant number of bytes
//! (little-endian `i32` fields plus reserved padding), asserted below.
//! Readers and writers on both sides of the region — agents, the
//! initializer, standalone viewers — share these widths, which is what
//! makes the byte offsets in [`layout`](crate::layout) meaningful.

use std::fmt;

use crate::layout::{self, ENERGY_LIMIT};

/// Index of a robot in the robot table.
///
/// Robot 0 is the player; the rest are AI-driven.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RobotId(pub u32);

impl fmt::Display for RobotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for RobotId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

impl RobotId {
    /// Whether this id denotes the player robot.
    pub fn is_player(self) -> bool {
        self.0 == 0
    }
}

// ── RobotStatus ──────────────────────────────────────────────────

/// Liveness of a robot. `Dead` is terminal: no transition ever leaves it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RobotStatus {
    /// The robot is out of the game. Encoded as 0.
    Dead,
    /// The robot is active. Encoded as 1.
    Alive,
}

impl RobotStatus {
    fn encode(self) -> i32 {
        match self {
            Self::Dead => 0,
            Self::Alive => 1,
        }
    }

    fn decode(v: i32) -> Self {
        if v == 1 {
            Self::Alive
        } else {
            Self::Dead
        }
    }
}

// ── RobotRecord ──────────────────────────────────────────────────

/// One robot's slot in the robot table.
///
/// Written only as a whole record under the robot-table lock (the
/// record's own agent is the sole writer, except that a duel writes
/// both participants inside a single lock acquisition). Read as a
/// value copy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RobotRecord {
    /// This robot's table index.
    pub id: RobotId,
    /// Column, in cells.
    pub x: i32,
    /// Row, in cells.
    pub y: i32,
    /// Force stat; duels resolve on `2 * force + energy`.
    pub force: i32,
    /// Energy, always within `[0, ENERGY_LIMIT]`.
    pub energy: i32,
    /// Moves attempted per tick (AI robots).
    pub velocity: i32,
    /// Liveness.
    pub status: RobotStatus,
}

impl RobotRecord {
    /// Serialized width: seven `i32` fields plus 4 reserved bytes.
    pub const BYTES: usize = 32;

    /// Duel power: `2 * force + energy`.
    pub fn power(&self) -> i32 {
        2 * self.force + self.energy
    }

    /// Grid symbol for this robot.
    pub fn symbol(&self) -> u8 {
        layout::robot_symbol(self.id.0)
    }

    /// Add `delta` to energy, clamping to `[0, ENERGY_LIMIT]`.
    pub fn adjust_energy(&mut self, delta: i32) {
        self.energy = (self.energy + delta).clamp(0, ENERGY_LIMIT);
    }

    /// Serialize into `buf`, which must be exactly [`Self::BYTES`] long.
    pub fn write_to(&self, buf: &mut [u8; Self::BYTES]) {
        let fields = [
            self.id.0 as i32,
            self.x,
            self.y,
            self.force,
            self.energy,
            self.velocity,
            self.status.encode(),
        ];
        for (i, v) in fields.iter().enumerate() {
            buf[i * 4..i * 4 + 4].copy_from_slice(&v.to_le_bytes());
        }
        buf[28..32].fill(0);
    }

    /// Deserialize from a [`Self::BYTES`]-wide buffer.
    pub fn read_from(buf: &[u8; Self::BYTES]) -> Self {
        let field = |i: usize| i32::from_le_bytes(buf[i * 4..i * 4 + 4].try_into().unwrap());
        Self {
            id: RobotId(field(0) as u32),
            x: field(1),
            y: field(2),
            force: field(3),
            energy: field(4),
            velocity: field(5),
            status: RobotStatus::decode(field(6)),
        }
    }
}

const _: () = assert!(RobotRecord::BYTES == 7 * 4 + 4);

// ── BatteryRecord ────────────────────────────────────────────────

/// One battery's slot in the battery table.
///
/// Owned by no single agent: any agent may claim it exactly once under
/// its individual lock, after which it is immediately re-placed
/// (recycled, never destroyed).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatteryRecord {
    /// Column, in cells.
    pub x: i32,
    /// Row, in cells.
    pub y: i32,
    /// Whether the battery has been claimed and not yet re-placed.
    pub collected: bool,
    /// Claiming robot id, or -1 while uncollected.
    pub owner: i32,
}

impl BatteryRecord {
    /// Serialized width: four `i32` fields.
    pub const BYTES: usize = 16;

    /// A fresh, uncollected battery at `(x, y)`.
    pub fn placed_at(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            collected: false,
            owner: -1,
        }
    }

    /// Serialize into `buf`.
    pub fn write_to(&self, buf: &mut [u8; Self::BYTES]) {
        let fields = [self.x, self.y, i32::from(self.collected), self.owner];
        for (i, v) in fields.iter().enumerate() {
            buf[i * 4..i * 4 + 4].copy_from_slice(&v.to_le_bytes());
        }
    }

    /// Deserialize from a [`Self::BYTES`]-wide buffer.
    pub fn read_from(buf: &[u8; Self::BYTES]) -> Self {
        let field = |i: usize| i32::from_le_bytes(buf[i * 4..i * 4 + 4].try_into().unwrap());
        Self {
            x: field(0),
            y: field(1),
            collected: field(2) != 0,
            owner: field(3),
        }
    }
}

const _: () = assert!(BatteryRecord::BYTES == 4 * 4);

// ── Flags ────────────────────────────────────────────────────────

/// The process-wide flags block at the tail of the region.
///
/// Deliberately unguarded by any lock: readers poll freely and accept
/// staleness. In this build every writer of `alive_count`, `game_over`
/// and `winner` happens to hold the robot-table lock (all writes occur
/// at death-bookkeeping sites), so writes are serialized in practice,
/// but an unlocked reader can still observe a torn `winner` mid-write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Flags {
    /// Set once by the initializer; agents wait for it before sensing.
    pub initialized: bool,
    /// Set when one or zero robots remain.
    pub game_over: bool,
    /// Winning robot id once decided, -1 otherwise (including a tie
    /// that leaves the arena empty).
    pub winner: i32,
    /// Number of robots currently alive.
    pub alive_count: i32,
}

impl Flags {
    /// Serialized width: four `i32` fields, one `u32` layout-version
    /// word, and 12 reserved bytes.
    pub const BYTES: usize = 32;

    /// Pre-initialization state.
    pub fn empty() -> Self {
        Self {
            initialized: false,
            game_over: false,
            winner: -1,
            alive_count: 0,
        }
    }

    /// Serialize into `buf`, stamping `version` into the fifth word.
    pub fn write_to(&self, buf: &mut [u8; Self::BYTES], version: u32) {
        let fields = [
            i32::from(self.initialized),
            i32::from(self.game_over),
            self.winner,
            self.alive_count,
        ];
        for (i, v) in fields.iter().enumerate() {
            buf[i * 4..i * 4 + 4].copy_from_slice(&v.to_le_bytes());
        }
        buf[16..20].copy_from_slice(&version.to_le_bytes());
        buf[20..32].fill(0);
    }

    /// Deserialize, returning the flags and the stamped layout version.
    pub fn read_from(buf: &[u8; Self::BYTES]) -> (Self, u32) {
        let field = |i: usize| i32::from_le_bytes(buf[i * 4..i * 4 + 4].try_into().unwrap());
        let version = u32::from_le_bytes(buf[16..20].try_into().unwrap());
        (
            Self {
                initialized: field(0) != 0,
                game_over: field(1) != 0,
                winner: field(2),
                alive_count: field(3),
            },
            version,
        )
    }
}

const _: () = assert!(Flags::BYTES == 4 * 4 + 4 + 12);

// ── Occupant ─────────────────────────────────────────────────────

/// What a grid symbol byte denotes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Occupant {
    /// Nothing; a robot may move in.
    Empty,
    /// The border ring (or any unknown symbol, treated as impassable).
    Border,
    /// An uncollected battery.
    Battery,
    /// A robot, by table index.
    Robot(RobotId),
}

impl Occupant {
    /// Classify a raw cell symbol.
    pub fn from_symbol(sym: u8) -> Self {
        match sym {
            layout::SYM_EMPTY => Self::Empty,
            layout::SYM_BATTERY => Self::Battery,
            layout::SYM_PLAYER => Self::Robot(RobotId(0)),
            b'1'..=b'9' => Self::Robot(RobotId((sym - b'0') as u32)),
            _ => Self::Border,
        }
    }
}
