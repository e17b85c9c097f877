//! The simulation engine — owns the state and advances it one day at a time.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   0. day += 1                  (engine)
//!   1. Action point regeneration (economy)
//!   2. Climate drift             (climate)
//!   3. Disaster trigger roll     (disaster)
//!   4. Population dynamics       (population)
//!   5. Disaster impact           (disaster)
//!   6. Health score              (health)
//!   7. Budget reward             (economy)
//!   8. History append            (history)
//!   9. Win/lose evaluation       (outcome)
//!
//! RULES:
//!   - A day is atomic: subsystems run against a working copy which is
//!     committed only once every subsystem has finished.
//!   - All randomness flows through the RngBank (or an injected source).
//!   - Player actions are gated by the economy before they touch state.
//!   - Persistence is best-effort and never fails a day or an action.

use crate::{
    climate_subsystem::ClimateSubsystem,
    clock::SimClock,
    command::{ActionOutcome, DeclineReason, PlayerCommand},
    config::{ActionCost, SimConfig},
    disaster_subsystem::{self, DisasterImpact, DisasterRoll},
    economy_subsystem::{self, ActionPointRegen, BudgetReward},
    environment::Direction,
    error::SimResult,
    event::{EventLogEntry, SimEvent},
    health_subsystem::{self, HealthSubsystem},
    outcome_subsystem::{self, Outcome, OutcomeSubsystem},
    population_subsystem::PopulationSubsystem,
    rng::{RandomSource, RngBank, SubsystemSlot},
    snapshot::{self, SimSnapshot, DEFAULT_SAVE_KEY},
    species::Species,
    state::{HistoryRecorder, SimulationState},
    store::SimStore,
    subsystem::SimSubsystem,
    types::{Day, Health, RunId},
};

pub struct SimEngine {
    pub run_id:     RunId,
    pub clock:      SimClock,
    config:         SimConfig,
    state:          SimulationState,
    rng_bank:       RngBank,
    /// Set when the caller pinned the seed; None for entropy-seeded runs.
    seed:           Option<u64>,
    rng_override:   Option<Box<dyn RandomSource + Send>>,
    subsystems:     Vec<(SubsystemSlot, Box<dyn SimSubsystem>)>,
    store:          Option<SimStore>,
    save_key:       String,
    action_events:  Vec<SimEvent>,
}

impl SimEngine {
    /// A reproducible engine: same seed, same disasters and drift.
    pub fn new(run_id: RunId, seed: u64, config: SimConfig) -> Self {
        Self::assemble(run_id, RngBank::new(seed), Some(seed), config)
    }

    /// An engine seeded from the OS, as the game is normally played.
    pub fn from_entropy(config: SimConfig) -> Self {
        let run_id = format!("run-{}", uuid::Uuid::new_v4());
        Self::assemble(run_id, RngBank::from_entropy(), None, config)
    }

    fn assemble(run_id: RunId, rng_bank: RngBank, seed: Option<u64>, config: SimConfig) -> Self {
        let mut engine = Self {
            run_id,
            clock:         SimClock::new(),
            state:         SimulationState::with_history_len(config.history_len),
            rng_bank,
            seed,
            rng_override:  None,
            subsystems:    Vec::new(),
            store:         None,
            save_key:      DEFAULT_SAVE_KEY.to_string(),
            action_events: Vec::new(),
            config,
        };
        engine.register_subsystems();
        engine
    }

    fn register_subsystems(&mut self) {
        let c = &self.config;
        let subsystems: Vec<(SubsystemSlot, Box<dyn SimSubsystem>)> = vec![
            (SubsystemSlot::Economy,    Box::new(ActionPointRegen::new(c.economy.clone()))),
            (SubsystemSlot::Climate,    Box::new(ClimateSubsystem::new(c.disasters.climate_drift))),
            (SubsystemSlot::Disaster,   Box::new(DisasterRoll::new(c.disasters.clone()))),
            (SubsystemSlot::Population, Box::new(PopulationSubsystem)),
            (SubsystemSlot::Disaster,   Box::new(DisasterImpact)),
            (SubsystemSlot::Health,     Box::new(HealthSubsystem)),
            (SubsystemSlot::Economy,    Box::new(BudgetReward::new(c.economy.clone()))),
            (SubsystemSlot::History,    Box::new(HistoryRecorder)),
            (SubsystemSlot::Outcome,    Box::new(OutcomeSubsystem::new(c.outcome.clone()))),
        ];
        self.subsystems = subsystems;
    }

    /// Attach persistence. Restores the snapshot stored under `key` when
    /// one exists and is readable; otherwise keeps the fresh state and
    /// writes it out.
    pub fn with_store(mut self, store: SimStore, key: &str) -> Self {
        if let Err(e) = store.migrate() {
            log::warn!("Store migration failed, continuing without persistence guarantees: {e}");
        }
        self.save_key = key.to_string();

        match snapshot::load_best_effort(&store, key) {
            Some(saved) => {
                log::info!("Restored run {} at day {}", saved.run_id, saved.state.day);
                self.run_id = saved.run_id;
                self.clock = saved.clock;
                self.state = saved.state;
                self.store = Some(store);
            }
            None => {
                self.store = Some(store);
                self.log_run_initialized();
                self.persist();
            }
        }
        self
    }

    /// Replace every subsystem's random stream with one shared source.
    /// Used by tests that need to force or suppress disasters.
    pub fn with_random_source(mut self, rng: Box<dyn RandomSource + Send>) -> Self {
        self.rng_override = Some(rng);
        self
    }

    /// Start from an explicit state instead of the default one.
    pub fn with_state(mut self, state: SimulationState) -> Self {
        self.state = state;
        self
    }

    // ── Read access ───────────────────────────────────────────

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Ungated write access for tests and tooling that stage a scenario.
    /// Gameplay mutations go through `apply_command` and the action methods.
    #[doc(hidden)]
    pub fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn store(&self) -> Option<&SimStore> {
        self.store.as_ref()
    }

    pub fn day(&self) -> Day {
        self.state.day
    }

    /// Current health score, computed fresh. Does not touch `state.health`.
    pub fn compute_health(&self) -> Health {
        health_subsystem::compute_health(&self.state)
    }

    /// The run's outcome: the recorded terminal outcome if there is one,
    /// otherwise a fresh evaluation of the win/lose rules. Mutates nothing.
    pub fn check_outcome(&self) -> Outcome {
        if self.state.outcome.is_terminal() {
            return self.state.outcome;
        }
        outcome_subsystem::check_outcome(&self.state, &self.config.outcome)
    }

    pub fn snapshot(&self) -> SimSnapshot {
        SimSnapshot::new(self.run_id.clone(), self.clock.clone(), self.state.clone())
    }

    /// Read back the persisted event log for one day of this run.
    pub fn events_for_day(&self, day: Day) -> SimResult<Vec<EventLogEntry>> {
        match &self.store {
            Some(store) => store.events_for_day(&self.run_id, day),
            None => Ok(vec![]),
        }
    }

    /// Events produced by player actions since the last call.
    pub fn drain_action_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.action_events)
    }

    // ── Daily step ────────────────────────────────────────────

    /// Advance one day. This is the core simulation step.
    /// Returns the day's events in emission order.
    pub fn step(&mut self) -> SimResult<Vec<SimEvent>> {
        let mut next = self.state.clone();
        next.day += 1;
        let day = next.day;

        let mut day_events: Vec<SimEvent> = vec![SimEvent::DayStarted { day }];
        // (subsystem, first event index, event count), logged after commit.
        let mut emitted: Vec<(&'static str, usize, usize)> = Vec::with_capacity(self.subsystems.len());

        // Execute each subsystem in registration order.
        // Each subsystem sees all events emitted so far this day.
        for (slot, subsystem) in &mut self.subsystems {
            let new_events = match self.rng_override.as_mut() {
                Some(rng) => subsystem.update(day, &mut next, &day_events, &mut **rng)?,
                None => {
                    let mut rng = self.rng_bank.for_subsystem_on_day(*slot, day);
                    subsystem.update(day, &mut next, &day_events, &mut rng)?
                }
            };
            emitted.push((subsystem.name(), day_events.len(), new_events.len()));
            day_events.extend(new_events);
        }

        day_events.push(SimEvent::DayCompleted { day, health: next.health });
        self.state = next;
        for (name, start, len) in emitted {
            append_events(self.store.as_ref(), &self.run_id, name, day, &day_events[start..start + len]);
        }
        self.persist();
        Ok(day_events)
    }

    /// Run up to `n` days, stopping early once the outcome is decided.
    /// Returns the number of days actually simulated.
    pub fn run_days(&mut self, n: u64) -> SimResult<u64> {
        let mut ran = 0;
        for _ in 0..n {
            if self.state.outcome.is_terminal() {
                break;
            }
            self.step()?;
            ran += 1;
        }
        Ok(ran)
    }

    // ── Player actions ────────────────────────────────────────

    /// Route a command through the single mutation path.
    pub fn apply_command(&mut self, command: PlayerCommand) -> ActionOutcome {
        match command {
            PlayerCommand::Pause => {
                self.clock.pause();
                ActionOutcome::Applied
            }
            PlayerCommand::Resume => {
                self.clock.resume();
                ActionOutcome::Applied
            }
            PlayerCommand::SetSpeed { speed } => {
                self.clock.set_speed(speed);
                ActionOutcome::Applied
            }
            PlayerCommand::AdjustTemperature { direction } => self.adjust_temperature(direction),
            PlayerCommand::AdjustHumidity { direction } => self.adjust_humidity(direction),
            PlayerCommand::AddSpecies { species, amount: Some(amount) } => self.add_species(species, amount),
            PlayerCommand::AddSpecies { species, amount: None } => self.buy_species(species),
            PlayerCommand::MitigateDisaster => self.mitigate_disaster(),
            PlayerCommand::Reset => {
                self.reset();
                ActionOutcome::Applied
            }
        }
    }

    /// Nudge temperature by ±1 °C.
    pub fn adjust_temperature(&mut self, direction: Direction) -> ActionOutcome {
        let cost = self.config.actions.adjust_temperature;
        self.gated("adjust_temperature", cost, |state| {
            state.environment.adjust_temperature(direction);
        })
    }

    /// Nudge humidity by ±5 %.
    pub fn adjust_humidity(&mut self, direction: Direction) -> ActionOutcome {
        let cost = self.config.actions.adjust_humidity;
        self.gated("adjust_humidity", cost, |state| {
            state.environment.adjust_humidity(direction);
        })
    }

    /// Buy one catalog lot of `species`.
    pub fn buy_species(&mut self, species: Species) -> ActionOutcome {
        match self.config.actions.offer_for(species) {
            Some(offer) => {
                let amount = offer.amount;
                self.add_species(species, amount)
            }
            None => self.decline(&format!("add_species:{species}"), DeclineReason::NotPurchasable { species }),
        }
    }

    /// Add `amount` of `species` at the catalog price. The population is
    /// floored at zero.
    pub fn add_species(&mut self, species: Species, amount: f64) -> ActionOutcome {
        let action = format!("add_species:{species}");
        let Some(cost) = self.config.actions.offer_for(species).map(|o| o.cost) else {
            return self.decline(&action, DeclineReason::NotPurchasable { species });
        };
        let outcome = self.gated(&action, cost, |state| {
            state.species.add(species, amount);
        });
        if outcome.is_applied() {
            self.action_events.push(SimEvent::SpeciesAdded {
                day: self.state.day,
                species,
                amount,
                population: self.state.species.get(species),
            });
        }
        outcome
    }

    /// Shorten the active disaster. Declined without charge when idle.
    pub fn mitigate_disaster(&mut self) -> ActionOutcome {
        if self.state.disaster.is_none() {
            return self.decline("mitigate_disaster", DeclineReason::NoActiveDisaster);
        }
        let cost = self.config.actions.mitigate_disaster;
        let days = self.config.disasters.mitigation_days;
        let mut mitigated = None;
        let outcome = self.gated("mitigate_disaster", cost, |state| {
            mitigated = disaster_subsystem::mitigate(state, days);
        });
        if let Some(after) = mitigated {
            self.action_events.push(SimEvent::DisasterMitigated {
                day: self.state.day,
                kind: after.kind,
                days_remaining: after.days_remaining,
            });
        }
        outcome
    }

    /// Discard the run and start again from the default initial state.
    pub fn reset(&mut self) {
        log::info!("Run {} reset at day {}", self.run_id, self.state.day);
        self.state = SimulationState::with_history_len(self.config.history_len);
        self.action_events.clear();
        if let Some(store) = &self.store {
            snapshot::clear(store, &self.save_key);
        }
        self.run_id = format!("run-{}", uuid::Uuid::new_v4());
        self.log_run_initialized();
        self.persist();
    }

    fn gated<F>(&mut self, action: &str, cost: ActionCost, apply: F) -> ActionOutcome
    where
        F: FnOnce(&mut SimulationState),
    {
        let resources = self.state.resources;
        if !economy_subsystem::can_afford(&resources, cost) {
            return self.decline(action, DeclineReason::InsufficientResources {
                ap_cost:          cost.ap,
                budget_cost:      cost.budget,
                ap_available:     resources.action_points,
                budget_available: resources.budget,
            });
        }

        economy_subsystem::spend(&mut self.state.resources, cost);
        apply(&mut self.state);

        let event = SimEvent::ActionApplied {
            day: self.state.day,
            action: action.to_string(),
            ap_cost: cost.ap,
            budget_cost: cost.budget,
        };
        append_events(self.store.as_ref(), &self.run_id, "player", self.state.day, std::slice::from_ref(&event));
        self.action_events.push(event);
        self.persist();
        ActionOutcome::Applied
    }

    fn decline(&mut self, action: &str, reason: DeclineReason) -> ActionOutcome {
        log::warn!("day={} action {action} declined: {reason:?}", self.state.day);
        let event = SimEvent::ActionDeclined {
            day: self.state.day,
            action: action.to_string(),
            reason,
        };
        append_events(self.store.as_ref(), &self.run_id, "player", self.state.day, std::slice::from_ref(&event));
        self.action_events.push(event);
        ActionOutcome::Declined(reason)
    }

    // ── Persistence ───────────────────────────────────────────

    fn persist(&self) {
        if let Some(store) = &self.store {
            snapshot::save_best_effort(store, &self.save_key, &self.snapshot());
        }
    }

    fn log_run_initialized(&self) {
        let event = SimEvent::RunInitialized {
            run_id: self.run_id.clone(),
            seed: self.seed,
        };
        append_events(self.store.as_ref(), &self.run_id, "engine", self.state.day, &[event]);
    }
}

/// Persist events to the store's event log, logging and skipping failures.
fn append_events(store: Option<&SimStore>, run_id: &str, subsystem: &str, day: Day, events: &[SimEvent]) {
    let Some(store) = store else { return };
    for event in events {
        let payload = match serde_json::to_string(event) {
            Ok(p) => p,
            Err(e) => {
                log::warn!("Could not serialize {} event: {e}", event.type_name());
                continue;
            }
        };
        let entry = EventLogEntry {
            id:         None,
            run_id:     run_id.to_string(),
            day,
            subsystem:  subsystem.to_string(),
            event_type: event.type_name().to_string(),
            payload,
        };
        if let Err(e) = store.append_event(&entry) {
            log::warn!("Event log append failed on day {day}: {e}");
        }
    }
}
