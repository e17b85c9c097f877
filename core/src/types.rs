//! Shared primitive types used across the entire simulation.

/// A simulation day. One `step()` = one in-game day.
pub type Day = u64;

/// The canonical run identifier.
pub type RunId = String;

/// Aggregate ecosystem health, 0–100.
pub type Health = u8;
