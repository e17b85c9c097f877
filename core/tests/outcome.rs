//! Health score and win/lose evaluation.

use ecosim_core::{
    config::{OutcomeConfig, SimConfig},
    engine::SimEngine,
    health_subsystem,
    outcome_subsystem::{self, LoseReason, Outcome},
    rng::ScriptedRng,
    species::Species,
    state::SimulationState,
};

fn all_tracked(state: &mut SimulationState, pop: f64) {
    for sp in Species::TRACKED {
        state.species.set(sp, pop);
    }
}

#[test]
fn resources_exhausted_loses() {
    let mut state = SimulationState::default();
    state.resources.action_points = 0.0;
    state.resources.budget = 0.0;

    let outcome = outcome_subsystem::check_outcome(&state, &OutcomeConfig::default());
    assert_eq!(outcome, Outcome::Lost(LoseReason::ResourcesExhausted));
    assert_eq!(LoseReason::ResourcesExhausted.message(), "resources exhausted");
}

#[test]
fn total_collapse_regardless_of_health_or_day() {
    for (health, day) in [(100, 1), (0, 50), (80, 200)] {
        let mut state = SimulationState::default();
        all_tracked(&mut state, 0.0);
        state.health = health;
        state.day = day;

        let outcome = outcome_subsystem::check_outcome(&state, &OutcomeConfig::default());
        assert_eq!(outcome, Outcome::Lost(LoseReason::TotalCollapse));
        assert_eq!(outcome.to_string(), "lost: total collapse");
    }
}

#[test]
fn balanced_ecosystem_on_day_100_wins() {
    let mut state = SimulationState::default();
    all_tracked(&mut state, 10.0);
    state.health = 100;
    state.day = 100;
    assert_eq!(outcome_subsystem::check_outcome(&state, &OutcomeConfig::default()), Outcome::Won);

    state.day = 99;
    assert_eq!(outcome_subsystem::check_outcome(&state, &OutcomeConfig::default()), Outcome::None);
}

#[test]
fn three_extinct_species_lose() {
    // The documented starting state has shrub, tree, deer and wolf at zero.
    let state = SimulationState::default();
    assert_eq!(state.species.extinct_count(), 4);
    assert_eq!(
        outcome_subsystem::check_outcome(&state, &OutcomeConfig::default()),
        Outcome::Lost(LoseReason::MassExtinction)
    );
}

#[test]
fn day_limit_and_low_health_streak_lose() {
    let mut state = SimulationState::default();
    all_tracked(&mut state, 10.0);
    state.health = 50;
    state.day = 365;
    assert_eq!(
        outcome_subsystem::check_outcome(&state, &OutcomeConfig::default()),
        Outcome::Lost(LoseReason::DayLimit)
    );

    state.day = 40;
    state.low_health_streak = 5;
    assert_eq!(
        outcome_subsystem::check_outcome(&state, &OutcomeConfig::default()),
        Outcome::Lost(LoseReason::ChronicLowHealth)
    );
}

#[test]
fn default_state_health() {
    let state = SimulationState::default();
    let h = health_subsystem::compute_health(&state);
    assert_eq!(h, 54);
    assert_eq!(h, health_subsystem::compute_health(&state), "compute_health must be pure");
}

#[test]
fn outcome_is_frozen_once_reached() {
    let mut engine = SimEngine::new("outcome-freeze".into(), 3, SimConfig::default())
        .with_random_source(Box::new(ScriptedRng::never_trigger()));

    engine.step().expect("day 2");
    let lost = engine.state().outcome;
    assert_eq!(lost, Outcome::Lost(LoseReason::MassExtinction));
    assert_eq!(engine.check_outcome(), lost);

    // Stage a winning ecosystem; the recorded outcome must not change.
    {
        let s = engine.state_mut();
        all_tracked(s, 50.0);
        s.day = 150;
    }
    for _ in 0..5 {
        engine.step().expect("step");
        assert_eq!(engine.state().outcome, lost);
        assert_eq!(engine.check_outcome(), lost);
    }
}

#[test]
fn run_days_stops_at_the_outcome() {
    let mut engine = SimEngine::new("outcome-stop".into(), 3, SimConfig::default());
    let ran = engine.run_days(50).expect("run");
    assert_eq!(ran, 1);
    assert_eq!(engine.day(), 2);
    assert!(engine.state().is_terminal());
}

#[test]
fn reset_discards_the_outcome() {
    let mut engine = SimEngine::new("outcome-reset".into(), 3, SimConfig::default());
    engine.run_days(5).expect("run");
    assert!(engine.state().is_terminal());

    engine.reset();
    assert_eq!(engine.state(), &SimulationState::default());
    assert_eq!(engine.check_outcome(), Outcome::Lost(LoseReason::MassExtinction));
    assert_eq!(engine.state().outcome, Outcome::None);
}
