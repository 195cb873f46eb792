//! Named rendezvous for shared arenas.
//!
//! Components that are constructed far from the controller (viewers,
//! late-joining agents, tests) attach to an arena by name instead of
//! threading an [`ArenaShared`] through every constructor. The
//! registry is explicitly that and nothing more: creation and removal
//! stay the controller's job, and attach never creates.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock, PoisonError};

use crate::config::{ArenaConfig, ArenaError};
use crate::shared::ArenaShared;

static REGISTRY: OnceLock<Mutex<HashMap<String, ArenaShared>>> = OnceLock::new();

fn registry() -> &'static Mutex<HashMap<String, ArenaShared>> {
    REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Allocate a fresh arena and register it under `name`.
///
/// A leftover entry under the same name — a previous run that never
/// removed itself — is discarded and replaced, matching the
/// clean-up-then-create recovery a crashed owner needs.
///
/// # Errors
///
/// Configuration validation errors pass through.
pub fn create(name: &str, config: ArenaConfig) -> Result<ArenaShared, ArenaError> {
    let shared = ArenaShared::create(config)?;
    let mut map = registry().lock().unwrap_or_else(PoisonError::into_inner);
    if map.insert(name.to_owned(), shared.clone()).is_some() {
        tracing::warn!(name, "replaced leftover registry entry");
    }
    Ok(shared)
}

/// Attach to the arena registered under `name`.
///
/// # Errors
///
/// [`ArenaError::NotFound`] when nothing is registered under `name`;
/// a version-mismatch region error when the registered region's layout
/// version differs from this build's.
pub fn attach(name: &str) -> Result<ArenaShared, ArenaError> {
    let map = registry().lock().unwrap_or_else(PoisonError::into_inner);
    let shared = map
        .get(name)
        .cloned()
        .ok_or_else(|| ArenaError::NotFound {
            name: name.to_owned(),
        })?;
    shared.region.check_version()?;
    Ok(shared)
}

/// Remove the entry under `name`. Idempotent: removing a name that was
/// never registered (or already removed) is a no-op.
pub fn remove(name: &str) {
    let mut map = registry().lock().unwrap_or_else(PoisonError::into_inner);
    map.remove(name);
}
