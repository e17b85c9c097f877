//! Subsystem trait.
//!
//! RULE: Every daily phase implements SimSubsystem.
//! The engine calls update() on each registered subsystem
//! in registration order, once per day.
//! Execution order is fixed and documented in engine.rs.
//!
//! Subsystems own configuration only. The simulation state is owned by
//! the engine and lent to each subsystem for the duration of its update;
//! no subsystem keeps a copy of it.

use crate::{
    error::SimResult,
    event::SimEvent,
    rng::RandomSource,
    state::SimulationState,
    types::Day,
};

/// The contract every subsystem must fulfill.
pub trait SimSubsystem: Send {
    /// Unique stable name for this subsystem.
    fn name(&self) -> &'static str;

    /// Called once per day by the engine.
    ///
    /// - `day`:       the day being simulated (already written to `state.day`)
    /// - `state`:     the single mutable simulation aggregate
    /// - `events_in`: events emitted by earlier subsystems this day
    /// - `rng`:       the random source for this subsystem and day
    ///
    /// Returns a vec of new events to add to the day's event log.
    fn update(
        &mut self,
        day: Day,
        state: &mut SimulationState,
        events_in: &[SimEvent],
        rng: &mut dyn RandomSource,
    ) -> SimResult<Vec<SimEvent>>;
}
