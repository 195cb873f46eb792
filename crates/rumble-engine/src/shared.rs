//! The bundle of shared state handed to every arena component.

use std::sync::Arc;

use rumble_core::{LockHandles, SharedRegion};

use crate::config::{ArenaConfig, ArenaError};
use crate::init::InitGate;

/// Everything a component needs to participate in one arena: the
/// region, its lock domain, the init gate, and the configuration they
/// were built from.
///
/// Passed explicitly at construction — components never reach for
/// hidden globals. Cloning is cheap (`Arc` handles all the way down).
#[derive(Clone, Debug)]
pub struct ArenaShared {
    /// The shared state block.
    pub region: Arc<SharedRegion>,
    /// The lock domain protecting it.
    pub locks: Arc<LockHandles>,
    /// Signaled once the initializer publishes `initialized = 1`.
    pub gate: Arc<InitGate>,
    /// The configuration this arena was built from.
    pub config: ArenaConfig,
}

impl ArenaShared {
    /// Validate `config` and allocate a fresh, uninitialized arena.
    pub fn create(config: ArenaConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        let layout = config.layout();
        Ok(Self {
            region: Arc::new(SharedRegion::new(layout)),
            locks: Arc::new(LockHandles::new(layout.max_batteries)),
            gate: Arc::new(InitGate::new()),
            config,
        })
    }
}
