//! Read-only observation over a live arena.
//!
//! The grid snapshot is deliberately unlocked: viewers must never
//! stall the agents, and a frame that is one move stale or shows a
//! half-applied move is an accepted cost. The robot-table snapshot
//! does take the robot-table lock for its whole pass so that each
//! returned record is internally consistent.

use std::fmt;

use rumble_core::{Flags, RobotRecord};

use crate::config::ArenaError;
use crate::shared::ArenaShared;

// ── GridSnapshot ───────────────────────────────────────────────────

/// One rendered frame of the grid.
///
/// `Display` draws the board row by row, suitable for a terminal.
#[derive(Clone, Debug)]
pub struct GridSnapshot {
    width: u32,
    height: u32,
    cells: Vec<u8>,
}

impl GridSnapshot {
    /// Board width in cells, border included.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Board height in cells, border included.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The symbol at `(x, y)`, or `None` outside the board.
    pub fn cell(&self, x: u32, y: u32) -> Option<u8> {
        if x < self.width && y < self.height {
            Some(self.cells[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Raw row-major cell bytes.
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }
}

impl fmt::Display for GridSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width as usize) {
            for &cell in row {
                write!(f, "{}", cell as char)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// ── Viewer ─────────────────────────────────────────────────────────

/// A read-only handle on an arena's shared state.
///
/// Cheap to clone and to construct; any number may observe one arena
/// concurrently with the agents.
#[derive(Clone, Debug)]
pub struct Viewer {
    shared: ArenaShared,
}

impl Viewer {
    /// Wrap the shared state.
    pub fn new(shared: ArenaShared) -> Self {
        Self { shared }
    }

    /// Capture the grid without taking any lock. The frame may be
    /// stale or mid-move; it is for display only.
    pub fn grid_snapshot(&self) -> GridSnapshot {
        let layout = *self.shared.region.layout();
        GridSnapshot {
            width: layout.width,
            height: layout.height,
            cells: self.shared.region.grid_bytes_snapshot(),
        }
    }

    /// Capture every configured robot's record — dead ones included —
    /// in a single robot-table lock acquisition, so each record is
    /// consistent and the set is one instant's view. Callers wanting
    /// only survivors filter on [`RobotRecord::status`].
    ///
    /// # Errors
    ///
    /// Region accessor errors pass through.
    pub fn robots_snapshot(&self) -> Result<Vec<RobotRecord>, ArenaError> {
        let _robots = self.shared.locks.lock_robots();
        (0..self.shared.config.num_robots)
            .map(|id| self.shared.region.robot(id).map_err(ArenaError::from))
            .collect()
    }

    /// The current flags block (unlocked single read).
    pub fn flags(&self) -> Flags {
        self.shared.region.flags()
    }

    /// Whether the round has ended.
    pub fn game_over(&self) -> bool {
        self.flags().game_over
    }

    /// The winner's robot id once the round has ended with a survivor;
    /// `None` while running or after a final tie.
    pub fn winner(&self) -> Option<u32> {
        let flags = self.flags();
        if flags.game_over && flags.winner >= 0 {
            Some(flags.winner as u32)
        } else {
            None
        }
    }
}
