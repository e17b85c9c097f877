//! Climate drift: temperature wanders ±0.1 °C every day with equal
//! probability, independent of any disaster.

use crate::{
    error::SimResult,
    event::SimEvent,
    rng::RandomSource,
    state::SimulationState,
    subsystem::SimSubsystem,
    types::Day,
};

pub struct ClimateSubsystem {
    drift: f64,
}

impl ClimateSubsystem {
    pub fn new(drift: f64) -> Self {
        Self { drift }
    }
}

impl SimSubsystem for ClimateSubsystem {
    fn name(&self) -> &'static str { "climate" }

    fn update(
        &mut self,
        day: Day,
        state: &mut SimulationState,
        _events_in: &[SimEvent],
        rng: &mut dyn RandomSource,
    ) -> SimResult<Vec<SimEvent>> {
        let delta = if rng.chance(0.5) { -self.drift } else { self.drift };
        state.environment.temp += delta;
        state.environment.clamp();

        Ok(vec![SimEvent::ClimateDrifted {
            day,
            delta,
            temp: state.environment.temp,
        }])
    }
}
