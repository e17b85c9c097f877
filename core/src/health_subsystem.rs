//! Ecosystem health score, 0–100.
//!
//! Recomputed from scratch every day from the current snapshot; it does
//! not depend on earlier days.
//!
//!   score = round(100 × (0.20·biodiversity + 0.15·plants + 0.15·animals
//!                        + 0.15·climate + 0.15·oxygen + 0.10·soil + 0.10·water))

use crate::{
    error::SimResult,
    event::SimEvent,
    rng::RandomSource,
    species::Species,
    state::SimulationState,
    subsystem::SimSubsystem,
    types::{Day, Health},
};

const PLANT_TARGET: f64 = 200.0;
const ANIMAL_TARGET: f64 = 50.0;
const OXYGEN_TARGET: f64 = 300.0;
const WATER_TARGET: f64 = 60.0;

/// Per-factor breakdown of the score, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthFactors {
    pub biodiversity:  f64,
    pub plant_balance: f64,
    pub animals_ok:    f64,
    pub env_ok:        f64,
    pub oxygen_ok:     f64,
    pub soil_ok:       f64,
    pub water_ok:      f64,
}

impl HealthFactors {
    pub fn measure(state: &SimulationState) -> Self {
        let species = &state.species;
        let env = &state.environment;
        Self {
            biodiversity:  species.biodiversity_count() as f64 / Species::TRACKED.len() as f64,
            plant_balance: (species.total_plants() / PLANT_TARGET).min(1.0),
            animals_ok:    (species.total_animals() / ANIMAL_TARGET).min(1.0),
            env_ok:        (1.0 - (env.temp - 20.0).abs() / 60.0 - (env.humidity - 60.0).abs() / 200.0).max(0.0),
            oxygen_ok:     (env.oxygen / OXYGEN_TARGET).min(1.0),
            soil_ok:       env.soil / 100.0,
            water_ok:      (env.water / WATER_TARGET).min(1.0),
        }
    }

    pub fn score(&self) -> Health {
        let weighted = self.biodiversity * 0.20
            + self.plant_balance * 0.15
            + self.animals_ok * 0.15
            + self.env_ok * 0.15
            + self.oxygen_ok * 0.15
            + self.soil_ok * 0.10
            + self.water_ok * 0.10;
        (weighted * 100.0).round().clamp(0.0, 100.0) as Health
    }
}

/// Current health score. Pure: calling it twice yields the same value.
pub fn compute_health(state: &SimulationState) -> Health {
    HealthFactors::measure(state).score()
}

pub struct HealthSubsystem;

impl SimSubsystem for HealthSubsystem {
    fn name(&self) -> &'static str { "health" }

    fn update(
        &mut self,
        day: Day,
        state: &mut SimulationState,
        _events_in: &[SimEvent],
        _rng: &mut dyn RandomSource,
    ) -> SimResult<Vec<SimEvent>> {
        state.health = compute_health(state);
        log::debug!("day={day} health={}", state.health);
        Ok(vec![SimEvent::HealthComputed { day, health: state.health }])
    }
}
