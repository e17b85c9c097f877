//! The simulation aggregate.
//!
//! `SimulationState` is the one mutable object in a run. It is owned by
//! the engine, mutated only by the daily step and by gated player actions,
//! and serialized whole as the persistence snapshot.

use crate::{
    disaster_subsystem::ActiveDisaster,
    environment::Environment,
    error::SimResult,
    event::SimEvent,
    outcome_subsystem::Outcome,
    rng::RandomSource,
    species::{Species, SpeciesTable},
    subsystem::SimSubsystem,
    types::{Day, Health},
};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_LEN: usize = 30;
pub const DEFAULT_AP_MAX: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub day:               Day,
    pub health:            Health,
    pub environment:       Environment,
    pub species:           SpeciesTable,
    pub dead_organic:      f64,
    pub disaster:          Option<ActiveDisaster>,
    pub resources:         Resources,
    pub history:           History,
    pub outcome:           Outcome,
    pub low_health_streak: u32,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self {
            day:               1,
            health:            100,
            environment:       Environment::default(),
            species:           SpeciesTable {
                grass: 100.0,
                rabbit: 20.0,
                fox: 5.0,
                ..SpeciesTable::default()
            },
            dead_organic:      0.0,
            disaster:          None,
            resources:         Resources::default(),
            history:           History::new(DEFAULT_HISTORY_LEN),
            outcome:           Outcome::None,
            low_health_streak: 0,
        }
    }
}

impl SimulationState {
    /// Fresh state with a custom history cap.
    pub fn with_history_len(max_len: usize) -> Self {
        Self {
            history: History::new(max_len),
            ..Self::default()
        }
    }

    pub fn population(&self, species: Species) -> f64 {
        self.species.get(species)
    }

    pub fn total_animals(&self) -> f64 {
        self.species.total_animals()
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome.is_terminal()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resources {
    pub action_points: f64,
    pub ap_max:        f64,
    pub budget:        f64,
}

impl Default for Resources {
    fn default() -> Self {
        Self {
            action_points: 10.0,
            ap_max:        DEFAULT_AP_MAX,
            budget:        1000.0,
        }
    }
}

/// Populations of the tracked species on one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopulationSample {
    pub grass:  f64,
    pub shrub:  f64,
    pub tree:   f64,
    pub rabbit: f64,
    pub deer:   f64,
    pub fox:    f64,
    pub wolf:   f64,
}

impl From<&SpeciesTable> for PopulationSample {
    fn from(t: &SpeciesTable) -> Self {
        Self {
            grass:  t.grass,
            shrub:  t.shrub,
            tree:   t.tree,
            rabbit: t.rabbit,
            deer:   t.deer,
            fox:    t.fox,
            wolf:   t.wolf,
        }
    }
}

/// Environment readings plus the day's health score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentSample {
    pub temp:     f64,
    pub humidity: f64,
    pub oxygen:   f64,
    pub soil:     f64,
    pub water:    f64,
    pub health:   Health,
}

/// Three parallel FIFO series capped at `max_len`. The oldest day is
/// evicted first; the series always have equal length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    days:        VecDeque<Day>,
    populations: VecDeque<PopulationSample>,
    environment: VecDeque<EnvironmentSample>,
    max_len:     usize,
}

impl History {
    pub fn new(max_len: usize) -> Self {
        Self {
            days:        VecDeque::with_capacity(max_len + 1),
            populations: VecDeque::with_capacity(max_len + 1),
            environment: VecDeque::with_capacity(max_len + 1),
            max_len,
        }
    }

    /// Append the current day's readings, evicting beyond the cap.
    pub fn record(&mut self, day: Day, species: &SpeciesTable, env: &Environment, health: Health) {
        self.days.push_back(day);
        self.populations.push_back(PopulationSample::from(species));
        self.environment.push_back(EnvironmentSample {
            temp:     env.temp,
            humidity: env.humidity,
            oxygen:   env.oxygen,
            soil:     env.soil,
            water:    env.water,
            health,
        });
        while self.days.len() > self.max_len {
            self.days.pop_front();
            self.populations.pop_front();
            self.environment.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn days(&self) -> &VecDeque<Day> {
        &self.days
    }

    pub fn populations(&self) -> &VecDeque<PopulationSample> {
        &self.populations
    }

    pub fn environment(&self) -> &VecDeque<EnvironmentSample> {
        &self.environment
    }

    /// True when all three series have the same length and respect the cap.
    pub fn is_consistent(&self) -> bool {
        self.days.len() == self.populations.len()
            && self.days.len() == self.environment.len()
            && self.days.len() <= self.max_len
    }
}

/// Appends the finished day's readings to the history.
pub struct HistoryRecorder;

impl SimSubsystem for HistoryRecorder {
    fn name(&self) -> &'static str { "history" }

    fn update(
        &mut self,
        day: Day,
        state: &mut SimulationState,
        _events_in: &[SimEvent],
        _rng: &mut dyn RandomSource,
    ) -> SimResult<Vec<SimEvent>> {
        state.history.record(day, &state.species, &state.environment, state.health);
        Ok(vec![])
    }
}
