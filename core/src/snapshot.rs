//! Snapshot serialization — full simulation state to/from JSON.
//!
//! The snapshot is the persistence boundary: collaborators save and
//! restore it as opaque text. Floats round-trip exactly (serde_json is
//! built with `float_roundtrip`).
//!
//! Persistence is best-effort. A failed save is logged and ignored; a
//! missing or unreadable snapshot falls back to the default initial
//! state. The simulation stays playable without durable storage.

use crate::{
    clock::SimClock,
    error::SimResult,
    state::SimulationState,
    store::SimStore,
    types::RunId,
};
use serde::{Deserialize, Serialize};

/// Storage key used when the caller does not pick one.
pub const DEFAULT_SAVE_KEY: &str = "ecosim_v1";

/// Bump when the snapshot layout changes incompatibly.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub version: u32,
    pub run_id:  RunId,
    pub clock:   SimClock,
    pub state:   SimulationState,
}

impl SimSnapshot {
    pub fn new(run_id: RunId, clock: SimClock, state: SimulationState) -> Self {
        Self { version: SNAPSHOT_VERSION, run_id, clock, state }
    }

    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> SimResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

pub fn save(store: &SimStore, key: &str, snapshot: &SimSnapshot) -> SimResult<()> {
    let json = snapshot.to_json()?;
    store.kv_put(key, &json, snapshot.state.day)
}

/// Save, logging and swallowing any failure.
pub fn save_best_effort(store: &SimStore, key: &str, snapshot: &SimSnapshot) {
    if let Err(e) = save(store, key, snapshot) {
        log::warn!("Snapshot save to '{key}' failed, continuing without it: {e}");
    }
}

/// Read the snapshot stored under `key`. `Ok(None)` when nothing is stored.
pub fn load(store: &SimStore, key: &str) -> SimResult<Option<SimSnapshot>> {
    let Some(json) = store.kv_get(key)? else {
        return Ok(None);
    };
    let snapshot = SimSnapshot::from_json(&json)?;
    if snapshot.version != SNAPSHOT_VERSION {
        log::warn!(
            "Snapshot '{key}' has version {} (expected {SNAPSHOT_VERSION}); ignoring it",
            snapshot.version
        );
        return Ok(None);
    }
    Ok(Some(snapshot))
}

/// Load the snapshot under `key`, or None when absent or unreadable.
pub fn load_best_effort(store: &SimStore, key: &str) -> Option<SimSnapshot> {
    match load(store, key) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            log::warn!("Snapshot load from '{key}' failed, starting fresh: {e}");
            None
        }
    }
}

/// Restored state, or the documented default initial state.
pub fn load_or_default(store: &SimStore, key: &str) -> SimulationState {
    load_best_effort(store, key)
        .map(|s| s.state)
        .unwrap_or_default()
}

pub fn clear(store: &SimStore, key: &str) {
    if let Err(e) = store.kv_delete(key) {
        log::warn!("Snapshot clear of '{key}' failed: {e}");
    }
}
