//! Core types for the Rumble arena: the shared-region byte layout,
//! fixed-width record types, typed accessors, and the ordered lock
//! domain that keeps concurrent robot agents deadlock-free.
//!
//! This is the leaf crate with zero internal dependencies. Everything
//! here is mechanism: the engine crate supplies the agents that drive
//! it.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod layout;
pub mod locks;
pub mod record;
pub mod region;

pub use error::RegionError;
pub use layout::{RegionLayout, LAYOUT_VERSION};
pub use locks::{
    BatteryGuard, BatteryWriteProof, GridGuard, GridWriteProof, InitGuard, LockHandles,
    RobotWriteProof, RobotsGuard,
};
pub use record::{BatteryRecord, Flags, Occupant, RobotId, RobotRecord, RobotStatus};
pub use region::SharedRegion;
