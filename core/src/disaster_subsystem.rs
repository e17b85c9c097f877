//! Disaster engine — stochastic, time-limited adverse events.
//!
//! State machine: idle (`state.disaster == None`) or active. While idle,
//! one trigger roll per day, checked in order and first match wins:
//!   1. catastrophe (drought / flood / fire, uniform), 2–4 days
//!   2. invasive species, 3–5 days
//!   3. disease on one animal species, 2–3 days — only when the total
//!      animal population exceeds the density threshold
//!
//! While active, the effect is applied once per day after population
//! dynamics, then `days_remaining` is decremented; at zero the disaster
//! clears. Invariant: an active disaster always has `days_remaining >= 1`.
//!
//! Execution: `DisasterRoll` before population dynamics,
//! `DisasterImpact` after.

use crate::{
    config::DisasterConfig,
    error::SimResult,
    event::SimEvent,
    rng::RandomSource,
    species::Species,
    state::SimulationState,
    subsystem::SimSubsystem,
    types::Day,
};
use serde::{Deserialize, Serialize};
use std::fmt;

const CATASTROPHES: [DisasterKind; 3] = [DisasterKind::Drought, DisasterKind::Flood, DisasterKind::Fire];
const DISEASE_TARGETS: [Species; 4] = [Species::Rabbit, Species::Deer, Species::Fox, Species::Wolf];

// Daily multipliers / deltas while active.
const FIRE_GRASS: f64 = 0.7;
const FIRE_SHRUB: f64 = 0.8;
const FIRE_TREE: f64 = 0.9;
const FIRE_SOIL_LOSS: f64 = 2.0;
const DROUGHT_HUMIDITY_LOSS: f64 = 5.0;
const DROUGHT_WATER_LOSS: f64 = 5.0;
const FLOOD_RABBIT: f64 = 0.9;
const FLOOD_DEER: f64 = 0.95;
const FLOOD_SOIL_LOSS: f64 = 1.0;
const DISEASE_SURVIVAL: f64 = 0.85;
const INVASIVE_PLANTS: f64 = 0.95;

/// The five disaster kinds. Only disease carries a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DisasterKind {
    Fire,
    Drought,
    Flood,
    Disease { target: Species },
    Invasive,
}

impl DisasterKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fire          => "fire",
            Self::Drought       => "drought",
            Self::Flood         => "flood",
            Self::Disease { .. } => "disease",
            Self::Invasive      => "invasive",
        }
    }
}

impl fmt::Display for DisasterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disease { target } => write!(f, "disease ({target})"),
            other => f.write_str(other.label()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveDisaster {
    #[serde(flatten)]
    pub kind: DisasterKind,
    pub days_remaining: u32,
}

impl ActiveDisaster {
    pub fn new(kind: DisasterKind, days_remaining: u32) -> Self {
        assert!(days_remaining >= 1, "a disaster must last at least one day");
        Self { kind, days_remaining }
    }
}

/// Roll for a new disaster. Returns None when one is already active or
/// no roll succeeds.
pub fn roll_trigger(
    state: &SimulationState,
    config: &DisasterConfig,
    rng: &mut dyn RandomSource,
) -> Option<ActiveDisaster> {
    if state.disaster.is_some() {
        return None;
    }

    if rng.chance(config.catastrophe_chance) {
        let kind = CATASTROPHES[rng.below(CATASTROPHES.len())];
        let (lo, hi) = config.catastrophe_days;
        return Some(ActiveDisaster::new(kind, rng.range_inclusive(lo, hi)));
    }

    if rng.chance(config.invasive_chance) {
        let (lo, hi) = config.invasive_days;
        return Some(ActiveDisaster::new(DisasterKind::Invasive, rng.range_inclusive(lo, hi)));
    }

    if state.total_animals() > config.disease_density_threshold && rng.chance(config.disease_chance) {
        let target = DISEASE_TARGETS[rng.below(DISEASE_TARGETS.len())];
        let (lo, hi) = config.disease_days;
        return Some(ActiveDisaster::new(DisasterKind::Disease { target }, rng.range_inclusive(lo, hi)));
    }

    None
}

/// Apply one day of `kind`'s effect to populations and environment.
pub fn apply_effect(kind: DisasterKind, state: &mut SimulationState) {
    let species = &mut state.species;
    let env = &mut state.environment;
    match kind {
        DisasterKind::Fire => {
            species.scale(Species::Grass, FIRE_GRASS);
            species.scale(Species::Shrub, FIRE_SHRUB);
            species.scale(Species::Tree, FIRE_TREE);
            env.soil -= FIRE_SOIL_LOSS;
        }
        DisasterKind::Drought => {
            env.humidity -= DROUGHT_HUMIDITY_LOSS;
            env.water -= DROUGHT_WATER_LOSS;
        }
        DisasterKind::Flood => {
            species.scale(Species::Rabbit, FLOOD_RABBIT);
            species.scale(Species::Deer, FLOOD_DEER);
            env.soil -= FLOOD_SOIL_LOSS;
        }
        DisasterKind::Disease { target } => {
            species.scale(target, DISEASE_SURVIVAL);
        }
        DisasterKind::Invasive => {
            species.scale(Species::Grass, INVASIVE_PLANTS);
            species.scale(Species::Shrub, INVASIVE_PLANTS);
        }
    }
    env.clamp();
}

/// Shorten the active disaster by `days`. Returns the mitigated disaster
/// as it stands afterwards, or None when idle. The countdown floors at one:
/// a fully mitigated disaster still strikes once more and clears at the
/// end of the next day.
pub fn mitigate(state: &mut SimulationState, days: u32) -> Option<ActiveDisaster> {
    let active = state.disaster.as_mut()?;
    active.days_remaining = active.days_remaining.saturating_sub(days).max(1);
    Some(*active)
}

pub struct DisasterRoll {
    config: DisasterConfig,
}

impl DisasterRoll {
    pub fn new(config: DisasterConfig) -> Self {
        Self { config }
    }
}

impl SimSubsystem for DisasterRoll {
    fn name(&self) -> &'static str { "disaster_roll" }

    fn update(
        &mut self,
        day: Day,
        state: &mut SimulationState,
        _events_in: &[SimEvent],
        rng: &mut dyn RandomSource,
    ) -> SimResult<Vec<SimEvent>> {
        let Some(disaster) = roll_trigger(state, &self.config, rng) else {
            return Ok(vec![]);
        };
        log::info!("day={day} disaster triggered: {} for {} days", disaster.kind, disaster.days_remaining);
        state.disaster = Some(disaster);
        Ok(vec![SimEvent::DisasterTriggered {
            day,
            kind: disaster.kind,
            duration: disaster.days_remaining,
        }])
    }
}

pub struct DisasterImpact;

impl SimSubsystem for DisasterImpact {
    fn name(&self) -> &'static str { "disaster_impact" }

    fn update(
        &mut self,
        day: Day,
        state: &mut SimulationState,
        _events_in: &[SimEvent],
        _rng: &mut dyn RandomSource,
    ) -> SimResult<Vec<SimEvent>> {
        let Some(active) = state.disaster else {
            return Ok(vec![]);
        };

        apply_effect(active.kind, state);
        let days_remaining = active.days_remaining.saturating_sub(1);
        let mut events = vec![SimEvent::DisasterStruck { day, kind: active.kind, days_remaining }];

        if days_remaining == 0 {
            state.disaster = None;
            log::info!("day={day} disaster cleared: {}", active.kind);
            events.push(SimEvent::DisasterCleared { day, kind: active.kind });
        } else {
            state.disaster = Some(ActiveDisaster { days_remaining, ..active });
        }
        Ok(events)
    }
}
