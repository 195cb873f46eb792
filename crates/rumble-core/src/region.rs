//! The shared region: one fixed-size block of bytes holding the grid,
//! the robot table, the battery table, and the flags.
//!
//! Storage is a `Box<[AtomicU8]>` accessed with relaxed per-byte
//! atomics, so unsynchronized readers are well-defined: a multi-byte
//! field read without the owning lock may tear, but never faults. The
//! lock protocol in [`locks`](crate::locks) rules tearing out exactly
//! where it matters — whole-record read-modify-writes happen under the
//! owning lock — while the cheap paths the design calls for (grid
//! display snapshots, flag polling) stay lock-free and tolerate
//! staleness.
//!
//! Write accessors demand a lock proof parameter; read accessors do
//! not. The flags block is the documented exception: writable by
//! anyone, raced by design.

use std::sync::atomic::{AtomicU8, Ordering};

use crate::error::RegionError;
use crate::layout::{RegionLayout, LAYOUT_VERSION, SYM_BORDER, SYM_EMPTY};
use crate::locks::{BatteryWriteProof, GridWriteProof, RobotWriteProof};
use crate::record::{BatteryRecord, Flags, RobotRecord};

/// The arena's shared state block.
///
/// Created once per arena with the border ring and layout version
/// stamped; all later mutation flows through the typed accessors.
#[derive(Debug)]
pub struct SharedRegion {
    layout: RegionLayout,
    version: u32,
    bytes: Box<[AtomicU8]>,
}

impl SharedRegion {
    /// Allocate and stamp a fresh region for `layout`.
    ///
    /// The grid starts as an empty interior inside a border ring; both
    /// tables start zeroed; the flags block carries
    /// [`LAYOUT_VERSION`] and an all-clear [`Flags::empty`].
    pub fn new(layout: RegionLayout) -> Self {
        Self::with_version(layout, LAYOUT_VERSION)
    }

    /// Allocate a region stamped with an explicit layout version.
    ///
    /// Every flags write re-stamps this version, so a region built by
    /// a different layout generation keeps advertising it and
    /// [`check_version`](Self::check_version) keeps rejecting it.
    pub fn with_version(layout: RegionLayout, version: u32) -> Self {
        let bytes: Box<[AtomicU8]> = (0..layout.total_bytes())
            .map(|_| AtomicU8::new(0))
            .collect();
        let region = Self {
            layout,
            version,
            bytes,
        };

        for y in 0..layout.height as i32 {
            for x in 0..layout.width as i32 {
                let sym = if layout.interior(x, y) {
                    SYM_EMPTY
                } else {
                    SYM_BORDER
                };
                // In-bounds by construction.
                let off = layout.cell_offset(x, y).unwrap_or(0);
                region.bytes[off].store(sym, Ordering::Relaxed);
            }
        }
        region.set_flags(Flags::empty());
        region
    }

    /// The layout this region was built from.
    pub fn layout(&self) -> &RegionLayout {
        &self.layout
    }

    /// Check the stamped layout version against this build's.
    pub fn check_version(&self) -> Result<(), RegionError> {
        let buf = self.read_array::<{ Flags::BYTES }>(self.layout.flags_offset());
        let (_, found) = Flags::read_from(&buf);
        if found != LAYOUT_VERSION {
            return Err(RegionError::VersionMismatch {
                found,
                expected: LAYOUT_VERSION,
            });
        }
        Ok(())
    }

    // ── Grid ─────────────────────────────────────────────────────

    /// Read one cell symbol. Out-of-bounds coordinates read as the
    /// border symbol, so callers can treat "off the board" and "on
    /// the border ring" identically.
    pub fn cell(&self, x: i32, y: i32) -> u8 {
        match self.layout.cell_offset(x, y) {
            Some(off) => self.bytes[off].load(Ordering::Relaxed),
            None => SYM_BORDER,
        }
    }

    /// Write one cell symbol under a grid write proof.
    ///
    /// Out-of-bounds writes are an error, not a silent no-op.
    pub fn set_cell<P: GridWriteProof>(
        &self,
        x: i32,
        y: i32,
        sym: u8,
        _proof: &P,
    ) -> Result<(), RegionError> {
        let off = self
            .layout
            .cell_offset(x, y)
            .ok_or(RegionError::OutOfBounds { x, y })?;
        self.bytes[off].store(sym, Ordering::Relaxed);
        Ok(())
    }

    /// Copy the whole grid block, cell by cell, without any lock.
    ///
    /// The copy may be torn across concurrent moves; it is fit for
    /// display and decision heuristics, never for correctness-critical
    /// updates.
    pub fn grid_bytes_snapshot(&self) -> Vec<u8> {
        let off = self.layout.grid_offset();
        (0..self.layout.grid_bytes())
            .map(|i| self.bytes[off + i].load(Ordering::Relaxed))
            .collect()
    }

    // ── Robot table ──────────────────────────────────────────────

    /// Read robot record `id` as a value copy.
    ///
    /// Consistent only when the caller holds the robot-table lock;
    /// unlocked reads may observe a record mid-rewrite.
    pub fn robot(&self, id: u32) -> Result<RobotRecord, RegionError> {
        let off = self
            .layout
            .robot_offset(id)
            .ok_or(RegionError::RobotIndex {
                id,
                max: self.layout.max_robots,
            })?;
        Ok(RobotRecord::read_from(&self.read_array(off)))
    }

    /// Replace robot record `id` wholesale under a robot-table write
    /// proof. Partial-field updates are not expressible.
    pub fn set_robot<P: RobotWriteProof>(
        &self,
        id: u32,
        rec: RobotRecord,
        _proof: &P,
    ) -> Result<(), RegionError> {
        let off = self
            .layout
            .robot_offset(id)
            .ok_or(RegionError::RobotIndex {
                id,
                max: self.layout.max_robots,
            })?;
        let mut buf = [0u8; RobotRecord::BYTES];
        rec.write_to(&mut buf);
        self.write_array(off, &buf);
        Ok(())
    }

    // ── Battery table ────────────────────────────────────────────

    /// Read battery record `id` as a value copy.
    pub fn battery(&self, id: u32) -> Result<BatteryRecord, RegionError> {
        let off = self
            .layout
            .battery_offset(id)
            .ok_or(RegionError::BatteryIndex {
                id,
                max: self.layout.max_batteries,
            })?;
        Ok(BatteryRecord::read_from(&self.read_array(off)))
    }

    /// Replace battery record `id` under that battery's own lock (or
    /// the init guard). A guard for a different slot is rejected.
    pub fn set_battery<P: BatteryWriteProof>(
        &self,
        id: u32,
        rec: BatteryRecord,
        proof: &P,
    ) -> Result<(), RegionError> {
        if let Some(held) = proof.slot() {
            if held != id {
                return Err(RegionError::LockMismatch { held, requested: id });
            }
        }
        let off = self
            .layout
            .battery_offset(id)
            .ok_or(RegionError::BatteryIndex {
                id,
                max: self.layout.max_batteries,
            })?;
        let mut buf = [0u8; BatteryRecord::BYTES];
        rec.write_to(&mut buf);
        self.write_array(off, &buf);
        Ok(())
    }

    // ── Flags ────────────────────────────────────────────────────

    /// Read the flags block. No lock; staleness accepted.
    pub fn flags(&self) -> Flags {
        let buf = self.read_array::<{ Flags::BYTES }>(self.layout.flags_offset());
        Flags::read_from(&buf).0
    }

    /// Write the flags block. No dedicated lock guards it — this is
    /// the region's documented race (see [`Flags`]).
    pub fn set_flags(&self, flags: Flags) {
        let mut buf = [0u8; Flags::BYTES];
        flags.write_to(&mut buf, self.version);
        self.write_array(self.layout.flags_offset(), &buf);
    }

    // ── Raw byte helpers ─────────────────────────────────────────

    fn read_array<const N: usize>(&self, off: usize) -> [u8; N] {
        let mut buf = [0u8; N];
        for (i, b) in buf.iter_mut().enumerate() {
            *b = self.bytes[off + i].load(Ordering::Relaxed);
        }
        buf
    }

    fn write_array(&self, off: usize, buf: &[u8]) {
        for (i, b) in buf.iter().enumerate() {
            self.bytes[off + i].store(*b, Ordering::Relaxed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locks::LockHandles;
    use crate::record::{RobotId, RobotStatus};

    fn small_layout() -> RegionLayout {
        RegionLayout {
            width: 8,
            height: 6,
            max_robots: 3,
            max_batteries: 2,
        }
    }

    #[test]
    fn fresh_region_has_border_ring_and_empty_interior() {
        let region = SharedRegion::new(small_layout());
        assert_eq!(region.cell(0, 0), SYM_BORDER);
        assert_eq!(region.cell(7, 5), SYM_BORDER);
        assert_eq!(region.cell(3, 0), SYM_BORDER);
        assert_eq!(region.cell(1, 1), SYM_EMPTY);
        assert_eq!(region.cell(6, 4), SYM_EMPTY);
    }

    #[test]
    fn out_of_bounds_reads_are_border() {
        let region = SharedRegion::new(small_layout());
        assert_eq!(region.cell(-1, 3), SYM_BORDER);
        assert_eq!(region.cell(3, 99), SYM_BORDER);
    }

    #[test]
    fn out_of_bounds_writes_are_errors() {
        let region = SharedRegion::new(small_layout());
        let locks = LockHandles::new(2);
        let grid = locks.lock_grid();
        assert_eq!(
            region.set_cell(-1, 2, b'X', &grid),
            Err(RegionError::OutOfBounds { x: -1, y: 2 })
        );
        assert_eq!(
            region.set_cell(8, 2, b'X', &grid),
            Err(RegionError::OutOfBounds { x: 8, y: 2 })
        );
    }

    #[test]
    fn robot_record_round_trips_through_region() {
        let region = SharedRegion::new(small_layout());
        let locks = LockHandles::new(2);
        let rec = RobotRecord {
            id: RobotId(2),
            x: 4,
            y: 3,
            force: 6,
            energy: 77,
            velocity: 4,
            status: RobotStatus::Alive,
        };
        {
            let robots = locks.lock_robots();
            region.set_robot(2, rec, &robots).unwrap();
        }
        assert_eq!(region.robot(2).unwrap(), rec);
        assert!(matches!(
            region.robot(3),
            Err(RegionError::RobotIndex { id: 3, max: 3 })
        ));
    }

    #[test]
    fn battery_write_requires_matching_guard() {
        let region = SharedRegion::new(small_layout());
        let locks = LockHandles::new(2);
        let rec = BatteryRecord::placed_at(2, 2);

        let guard = locks.lock_battery(0).unwrap();
        assert_eq!(
            region.set_battery(1, rec, &guard),
            Err(RegionError::LockMismatch {
                held: 0,
                requested: 1
            })
        );
        region.set_battery(0, rec, &guard).unwrap();
        assert_eq!(region.battery(0).unwrap(), rec);
    }

    #[test]
    fn init_guard_writes_everywhere() {
        let region = SharedRegion::new(small_layout());
        let locks = LockHandles::new(2);
        let init = locks.lock_init();
        region.set_cell(1, 1, b'B', &init).unwrap();
        region
            .set_battery(1, BatteryRecord::placed_at(1, 1), &init)
            .unwrap();
        let rec = RobotRecord {
            id: RobotId(0),
            x: 2,
            y: 2,
            force: 1,
            energy: 60,
            velocity: 1,
            status: RobotStatus::Alive,
        };
        region.set_robot(0, rec, &init).unwrap();
        assert_eq!(region.cell(1, 1), b'B');
    }

    #[test]
    fn version_is_stamped_and_checked() {
        let region = SharedRegion::new(small_layout());
        region.check_version().unwrap();

        // Rewriting flags must preserve the stamp.
        region.set_flags(Flags {
            initialized: true,
            game_over: false,
            winner: -1,
            alive_count: 3,
        });
        region.check_version().unwrap();
        assert!(region.flags().initialized);
        assert_eq!(region.flags().alive_count, 3);
    }

    #[test]
    fn foreign_version_is_rejected_even_after_flag_writes() {
        let region = SharedRegion::with_version(small_layout(), LAYOUT_VERSION + 1);
        assert_eq!(
            region.check_version(),
            Err(RegionError::VersionMismatch {
                found: LAYOUT_VERSION + 1,
                expected: LAYOUT_VERSION,
            })
        );

        // Flag writes re-stamp the region's own version, not this
        // build's, so the mismatch persists.
        region.set_flags(Flags::empty());
        assert!(region.check_version().is_err());
    }
}
