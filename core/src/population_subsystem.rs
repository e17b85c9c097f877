//! Population dynamics — one day of growth, feeding, predation and decay.
//!
//! EXECUTION ORDER (fixed): plants → herbivores → predators → decomposers.
//! Each tier reads the populations left behind by the tier before it.
//!
//! No randomness: the same state always advances to the same state,
//! bit for bit.

use crate::{
    error::SimResult,
    event::SimEvent,
    environment::PERCENT_MAX,
    rng::RandomSource,
    species::Species,
    state::SimulationState,
    subsystem::SimSubsystem,
    types::Day,
};

// ── Plants ───────────────────────────────────────────────────────────────────

struct PlantTraits {
    species:     Species,
    growth_rate: f64,
    /// Oxygen produced per individual, before the global 0.01 scale.
    o2_yield:    f64,
}

const PLANTS: [PlantTraits; 3] = [
    PlantTraits { species: Species::Grass, growth_rate: 0.10, o2_yield: 2.0  },
    PlantTraits { species: Species::Shrub, growth_rate: 0.06, o2_yield: 5.0  },
    PlantTraits { species: Species::Tree,  growth_rate: 0.03, o2_yield: 10.0 },
];

const PLANT_BASE_MORTALITY: f64 = 0.02;
const PLANT_STRESS_MORTALITY: f64 = 0.05;
const O2_SCALE: f64 = 0.01;
const O2_PER_ANIMAL: f64 = 0.02;
/// Water gained per point of humidity above 50%.
const HUMIDITY_WATER_RATE: f64 = 0.02;
const HUMIDITY_WATER_FLOOR: f64 = 50.0;

// ── Animals ──────────────────────────────────────────────────────────────────

struct HerbivoreTraits {
    species:        Species,
    food:           Species,
    /// Food eaten per day by every 10 individuals.
    per_day:        f64,
    repro_interval: Day,
}

const HERBIVORES: [HerbivoreTraits; 2] = [
    HerbivoreTraits { species: Species::Rabbit, food: Species::Grass, per_day: 5.0,  repro_interval: 3 },
    HerbivoreTraits { species: Species::Deer,   food: Species::Shrub, per_day: 10.0, repro_interval: 7 },
];

const HERB_REPRO_RATE: f64 = 0.20;
const HERB_BASE_MORTALITY: f64 = 0.03;
const HERB_STRESS_MORTALITY: f64 = 0.07;
const HERB_FAMINE_MORTALITY: f64 = 0.2;
const HERB_CARCASS_SHARE: f64 = 0.5;

struct PredatorTraits {
    species:        Species,
    prey:           Species,
    /// Prey taken per week by each individual.
    per_week:       f64,
    repro_interval: Day,
}

const PREDATORS: [PredatorTraits; 2] = [
    PredatorTraits { species: Species::Fox,  prey: Species::Rabbit, per_week: 2.0, repro_interval: 10 },
    PredatorTraits { species: Species::Wolf, prey: Species::Deer,   per_week: 1.0, repro_interval: 15 },
];

const PRED_REPRO_RATE: f64 = 0.12;
const PRED_BASE_MORTALITY: f64 = 0.03;
const PRED_STRESS_MORTALITY: f64 = 0.05;
const PRED_HUNGER_MORTALITY: f64 = 0.25;
const PRED_CARCASS_SHARE: f64 = 0.8;

// ── Decomposers ──────────────────────────────────────────────────────────────

const DECOMPOSER_MAX_GROWTH: f64 = 5.0;
const DECOMPOSER_GROWTH_RATE: f64 = 0.05;
const DECOMPOSER_CAPACITY: f64 = 0.5;
/// Dead organic units per soil point.
const ORGANIC_PER_SOIL: f64 = 10.0;

/// Unmet fraction of a demand, 0 when fully met.
fn shortfall(need: f64, got: f64) -> f64 {
    if need > got {
        (need - got) / need.max(1.0)
    } else {
        0.0
    }
}

pub fn grow_plants(state: &mut SimulationState) {
    let suit = state.environment.plant_suitability();
    let env = &mut state.environment;
    env.water = (env.water + (env.humidity - HUMIDITY_WATER_FLOOR).max(0.0) * HUMIDITY_WATER_RATE)
        .min(PERCENT_MAX);
    let soil_factor = env.soil / 100.0;

    for plant in &PLANTS {
        let pop = state.species.get(plant.species);
        let growth = pop * plant.growth_rate * suit * soil_factor;
        let mortality = pop * (PLANT_BASE_MORTALITY + (1.0 - suit) * PLANT_STRESS_MORTALITY);
        state.species.set(plant.species, pop + growth - mortality);
    }

    let produced: f64 = PLANTS
        .iter()
        .map(|p| state.species.get(p.species) * p.o2_yield * O2_SCALE)
        .sum();
    let consumed = state.species.total_animals() * O2_PER_ANIMAL;
    state.environment.oxygen += produced - consumed;
    state.environment.clamp();
}

pub fn feed_herbivores(state: &mut SimulationState) {
    let suit = state.environment.herbivore_suitability();
    let day = state.day;

    for herb in &HERBIVORES {
        let pop = state.species.get(herb.species);
        if pop <= 0.0 {
            continue;
        }
        let available = state.species.get(herb.food);
        let need = herb.per_day * pop / 10.0;
        let eaten = available.min(need);
        state.species.set(herb.food, available - eaten);
        let famine = shortfall(need, eaten);

        let repro = if day % herb.repro_interval == 0 {
            (pop * HERB_REPRO_RATE * suit).max(0.0)
        } else {
            0.0
        };
        let death = pop
            * (HERB_BASE_MORTALITY + (1.0 - suit) * HERB_STRESS_MORTALITY + famine * HERB_FAMINE_MORTALITY);
        state.species.set(herb.species, pop + repro - death);
        state.dead_organic += death * HERB_CARCASS_SHARE;
    }
}

pub fn hunt_prey(state: &mut SimulationState) {
    let suit = state.environment.predator_suitability();
    let day = state.day;

    for pred in &PREDATORS {
        let pop = state.species.get(pred.species);
        if pop <= 0.0 {
            continue;
        }
        let daily_prey = pred.per_week / 7.0 * pop;
        let available = state.species.get(pred.prey);
        let hunted = available.min(daily_prey);
        state.species.set(pred.prey, available - hunted);
        let hunger = shortfall(daily_prey, hunted);

        let repro = if day % pred.repro_interval == 0 {
            (pop * PRED_REPRO_RATE * suit).max(0.0)
        } else {
            0.0
        };
        let death = pop
            * (PRED_BASE_MORTALITY + (1.0 - suit) * PRED_STRESS_MORTALITY + hunger * PRED_HUNGER_MORTALITY);
        state.species.set(pred.species, pop + repro - death);
        state.dead_organic += death * PRED_CARCASS_SHARE;
    }
}

pub fn decompose(state: &mut SimulationState) {
    let growth = (state.dead_organic * DECOMPOSER_GROWTH_RATE).min(DECOMPOSER_MAX_GROWTH);
    state.species.add(Species::Decomposer, growth);

    let processed = state.dead_organic.min(state.species.decomposer * DECOMPOSER_CAPACITY);
    state.dead_organic = (state.dead_organic - processed).max(0.0);
    state.environment.soil = (state.environment.soil + processed / ORGANIC_PER_SOIL).min(PERCENT_MAX);
    state.environment.clamp();
}

/// Run all four tiers for the day in `state.day`.
pub fn advance(state: &mut SimulationState) {
    state.environment.clamp();
    grow_plants(state);
    feed_herbivores(state);
    hunt_prey(state);
    decompose(state);
}

pub struct PopulationSubsystem;

impl SimSubsystem for PopulationSubsystem {
    fn name(&self) -> &'static str { "population" }

    fn update(
        &mut self,
        day: Day,
        state: &mut SimulationState,
        _events_in: &[SimEvent],
        _rng: &mut dyn RandomSource,
    ) -> SimResult<Vec<SimEvent>> {
        advance(state);

        log::debug!(
            "day={day} population: plants={:.1} animals={:.1} decomposers={:.1} dead_organic={:.2} o2={:.1}",
            state.species.total_plants(),
            state.species.total_animals(),
            state.species.decomposer,
            state.dead_organic,
            state.environment.oxygen
        );

        Ok(vec![SimEvent::PopulationsUpdated {
            day,
            plants: state.species.total_plants(),
            animals: state.species.total_animals(),
            dead_organic: state.dead_organic,
        }])
    }
}
