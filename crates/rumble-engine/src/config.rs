//! Arena configuration, validation, and error types.

use std::error::Error;
use std::fmt;
use std::time::Duration;

use rumble_core::layout::{
    DEFAULT_HEIGHT, DEFAULT_WIDTH, MAX_BATTERIES, MAX_ROBOTS,
};
use rumble_core::{RegionError, RegionLayout};

// ── ArenaConfig ────────────────────────────────────────────────────

/// Configuration for one arena run.
///
/// The defaults reproduce the reference game: a 40×20 board, one
/// player robot plus three AI robots, five batteries, 100 ms between
/// act phases and 500 ms between housekeeping decay cycles.
#[derive(Clone, Debug)]
pub struct ArenaConfig {
    /// Board width in cells, border included.
    pub width: u32,
    /// Board height in cells, border included.
    pub height: u32,
    /// Number of robots, player included. Robot 0 is the player.
    pub num_robots: u32,
    /// Number of batteries on the board at any time.
    pub num_batteries: u32,
    /// Seed for all arena randomness (placement, AI policy, respawn).
    /// Each agent derives its own stream from this.
    pub seed: u64,
    /// Pause between an agent's act phases.
    pub act_interval: Duration,
    /// Pause between housekeeping energy-decay cycles.
    pub decay_interval: Duration,
    /// How long `shutdown()` waits for each agent thread before
    /// abandoning it.
    pub shutdown_grace: Duration,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            num_robots: 4,
            num_batteries: 5,
            seed: 0,
            act_interval: Duration::from_millis(100),
            decay_interval: Duration::from_millis(500),
            shutdown_grace: Duration::from_millis(500),
        }
    }
}

impl ArenaConfig {
    /// Validate structural invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant: board too small, robot or
    /// battery count out of range, zero intervals, or a board without
    /// enough interior cells for every robot and battery.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < 5 || self.height < 5 {
            return Err(ConfigError::BoardTooSmall {
                width: self.width,
                height: self.height,
            });
        }
        if self.num_robots == 0 {
            return Err(ConfigError::NoRobots);
        }
        if self.num_robots > MAX_ROBOTS {
            return Err(ConfigError::TooManyRobots {
                configured: self.num_robots,
                max: MAX_ROBOTS,
            });
        }
        if self.num_batteries > MAX_BATTERIES {
            return Err(ConfigError::TooManyBatteries {
                configured: self.num_batteries,
                max: MAX_BATTERIES,
            });
        }
        let interior = (self.width as usize - 2) * (self.height as usize - 2);
        let occupants = self.num_robots as usize + self.num_batteries as usize;
        // Placement is rejection-sampled; past half full it degenerates.
        if occupants * 2 > interior {
            return Err(ConfigError::BoardTooCrowded {
                interior,
                occupants,
            });
        }
        if self.act_interval.is_zero() || self.decay_interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }

    /// The region layout this configuration produces. Table capacities
    /// are always the maxima so every same-sized board is byte-compatible.
    pub fn layout(&self) -> RegionLayout {
        RegionLayout {
            width: self.width,
            height: self.height,
            max_robots: MAX_ROBOTS,
            max_batteries: MAX_BATTERIES,
        }
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`ArenaConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Board smaller than 5×5 leaves no usable interior.
    BoardTooSmall {
        /// Configured width.
        width: u32,
        /// Configured height.
        height: u32,
    },
    /// At least one robot is required.
    NoRobots,
    /// Robot count exceeds the table capacity.
    TooManyRobots {
        /// Configured count.
        configured: u32,
        /// Table capacity.
        max: u32,
    },
    /// Battery count exceeds the table capacity.
    TooManyBatteries {
        /// Configured count.
        configured: u32,
        /// Table capacity.
        max: u32,
    },
    /// More occupants than rejection-sampled placement can handle.
    BoardTooCrowded {
        /// Interior cell count.
        interior: usize,
        /// Robots plus batteries.
        occupants: usize,
    },
    /// `act_interval` or `decay_interval` is zero.
    ZeroInterval,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BoardTooSmall { width, height } => {
                write!(f, "board {width}x{height} is below the 5x5 minimum")
            }
            Self::NoRobots => write!(f, "at least one robot is required"),
            Self::TooManyRobots { configured, max } => {
                write!(f, "{configured} robots exceeds the table capacity {max}")
            }
            Self::TooManyBatteries { configured, max } => {
                write!(f, "{configured} batteries exceeds the table capacity {max}")
            }
            Self::BoardTooCrowded {
                interior,
                occupants,
            } => write!(
                f,
                "{occupants} occupants on {interior} interior cells leaves placement no room"
            ),
            Self::ZeroInterval => write!(f, "act and decay intervals must be non-zero"),
        }
    }
}

impl Error for ConfigError {}

// ── ArenaError ─────────────────────────────────────────────────────

/// Errors from arena construction and operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// Configuration validation failed.
    Config(ConfigError),
    /// A shared-region accessor failed.
    Region(RegionError),
    /// No region is registered under the requested name.
    NotFound {
        /// The name that was looked up.
        name: String,
    },
    /// Rejection-sampled placement ran out of retries.
    PlacementFailed {
        /// What was being placed.
        what: &'static str,
    },
    /// A direction command was not one of the four unit moves.
    InvalidDirection {
        /// Requested x delta.
        dx: i32,
        /// Requested y delta.
        dy: i32,
    },
    /// The targeted agent does not exist or was never started.
    NoSuchAgent {
        /// The requested robot id.
        id: u32,
    },
    /// A command was sent to an agent whose channel has closed.
    AgentStopped {
        /// The requested robot id.
        id: u32,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Region(e) => write!(f, "region: {e}"),
            Self::NotFound { name } => write!(f, "no shared region named '{name}'"),
            Self::PlacementFailed { what } => {
                write!(f, "could not place {what} on an empty cell")
            }
            Self::InvalidDirection { dx, dy } => {
                write!(f, "({dx}, {dy}) is not a unit cardinal direction")
            }
            Self::NoSuchAgent { id } => write!(f, "no agent for robot {id}"),
            Self::AgentStopped { id } => write!(f, "agent for robot {id} has stopped"),
        }
    }
}

impl Error for ArenaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Region(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for ArenaError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<RegionError> for ArenaError {
    fn from(e: RegionError) -> Self {
        Self::Region(e)
    }
}
