//! Disaster engine tests, driven through the full daily step with a
//! scripted random source.

use ecosim_core::{
    config::{DisasterConfig, SimConfig},
    disaster_subsystem::{self, ActiveDisaster, DisasterKind},
    economy_subsystem,
    engine::SimEngine,
    event::SimEvent,
    population_subsystem,
    rng::ScriptedRng,
    species::Species,
    state::SimulationState,
};

fn engine_with(state: SimulationState, rng: ScriptedRng) -> SimEngine {
    SimEngine::new("disaster-test".into(), 0, SimConfig::default())
        .with_state(state)
        .with_random_source(Box::new(rng))
}

#[test]
fn last_day_of_fire_burns_then_clears() {
    let mut start = SimulationState::default();
    start.species.shrub = 30.0;
    start.species.tree = 10.0;
    start.disaster = Some(ActiveDisaster::new(DisasterKind::Fire, 1));

    // Replay the day by hand: regen, +0.1 drift (0.99 never drifts down),
    // no roll while active, population, then the fire.
    let mut expected = start.clone();
    expected.day = 2;
    economy_subsystem::regenerate(&mut expected.resources, &SimConfig::default().economy);
    expected.environment.temp += 0.1;
    expected.environment.clamp();
    population_subsystem::advance(&mut expected);
    let before_fire = expected.clone();
    disaster_subsystem::apply_effect(DisasterKind::Fire, &mut expected);

    let mut engine = engine_with(start, ScriptedRng::never_trigger());
    let events = engine.step().expect("step");
    let s = engine.state();

    assert_eq!(s.day, 2);
    assert_eq!(s.species.grass, before_fire.species.grass * 0.7);
    assert_eq!(s.species.shrub, before_fire.species.shrub * 0.8);
    assert_eq!(s.species.tree, before_fire.species.tree * 0.9);
    assert_eq!(s.species.grass, expected.species.grass);
    assert!((s.environment.soil - (before_fire.environment.soil - 2.0)).abs() < 1e-12);
    assert!(s.disaster.is_none(), "fire with one day left must clear");

    assert!(events.contains(&SimEvent::DisasterStruck { day: 2, kind: DisasterKind::Fire, days_remaining: 0 }));
    assert!(events.contains(&SimEvent::DisasterCleared { day: 2, kind: DisasterKind::Fire }));
}

#[test]
fn fire_soil_loss_floors_at_zero() {
    let mut state = SimulationState::default();
    state.environment.soil = 1.0;
    disaster_subsystem::apply_effect(DisasterKind::Fire, &mut state);
    assert_eq!(state.environment.soil, 0.0);
}

#[test]
fn drought_dries_out_and_disease_hits_only_its_target() {
    let mut state = SimulationState::default();
    disaster_subsystem::apply_effect(DisasterKind::Drought, &mut state);
    assert_eq!(state.environment.humidity, 55.0);
    assert_eq!(state.environment.water, 45.0);

    let rabbits = state.species.rabbit;
    disaster_subsystem::apply_effect(DisasterKind::Disease { target: Species::Fox }, &mut state);
    assert_eq!(state.species.fox, 5.0 * 0.85);
    assert_eq!(state.species.rabbit, rabbits);
}

#[test]
fn a_triggered_disaster_strikes_the_same_day() {
    // Day roll order: regen draws nothing, climate draws one value,
    // then catastrophe hit, kind index floor(0.9*3) = fire, duration 2 + floor(0.0*3) = 2.
    let rng = ScriptedRng::new(vec![0.99, 0.01, 0.9, 0.0, 0.99]);
    let mut engine = engine_with(SimulationState::default(), rng);

    let events = engine.step().expect("step");
    assert!(events.contains(&SimEvent::DisasterTriggered { day: 2, kind: DisasterKind::Fire, duration: 2 }));
    assert!(events.contains(&SimEvent::DisasterStruck { day: 2, kind: DisasterKind::Fire, days_remaining: 1 }));
    assert_eq!(engine.state().disaster, Some(ActiveDisaster::new(DisasterKind::Fire, 1)));
}

#[test]
fn active_disaster_always_has_a_day_left() {
    let mut engine = SimEngine::new("disaster-inv".into(), 0xABCD, SimConfig::default());
    engine.state_mut().species.rabbit = 60.0;
    engine.state_mut().species.deer = 20.0;
    for _ in 0..200 {
        engine.step().expect("step");
        if let Some(d) = engine.state().disaster {
            assert!(d.days_remaining >= 1, "active disaster with {} days left", d.days_remaining);
        }
    }
}

#[test]
fn flood_thins_herbivores_and_washes_soil() {
    let mut state = SimulationState::default();
    state.species.deer = 10.0;
    disaster_subsystem::apply_effect(DisasterKind::Flood, &mut state);
    assert_eq!(state.species.rabbit, 20.0 * 0.9);
    assert_eq!(state.species.deer, 10.0 * 0.95);
    assert_eq!(state.environment.soil, 69.0);
    assert_eq!(state.species.fox, 5.0);
}

#[test]
fn invasive_species_crowd_out_grass_and_shrub() {
    let mut state = SimulationState::default();
    state.species.shrub = 40.0;
    state.species.tree = 8.0;
    disaster_subsystem::apply_effect(DisasterKind::Invasive, &mut state);
    assert_eq!(state.species.grass, 100.0 * 0.95);
    assert_eq!(state.species.shrub, 40.0 * 0.95);
    assert_eq!(state.species.tree, 8.0);
}

#[test]
fn invasive_rolls_after_a_catastrophe_miss() {
    let state = SimulationState::default();
    let config = DisasterConfig::default();

    // catastrophe miss, invasive hit, duration 3 + floor(0.0*3) = 3
    let mut rng = ScriptedRng::new(vec![0.9, 0.01, 0.0]);
    let d = disaster_subsystem::roll_trigger(&state, &config, &mut rng).expect("invasive");
    assert_eq!(d, ActiveDisaster::new(DisasterKind::Invasive, 3));

    // top of the range
    let mut rng = ScriptedRng::new(vec![0.9, 0.01, 0.99]);
    let d = disaster_subsystem::roll_trigger(&state, &config, &mut rng).expect("invasive");
    assert_eq!(d.days_remaining, 5);
}

#[test]
fn fully_mitigated_drought_still_strikes_once() {
    let mut start = SimulationState::default();
    start.resources.action_points = 100.0;
    start.disaster = Some(ActiveDisaster::new(DisasterKind::Drought, 2));
    let mut engine = engine_with(start, ScriptedRng::never_trigger());

    assert!(engine.mitigate_disaster().is_applied());
    assert_eq!(engine.state().disaster, Some(ActiveDisaster::new(DisasterKind::Drought, 1)));

    let events = engine.step().expect("step");
    assert_eq!(engine.state().environment.humidity, 55.0);
    assert!(engine.state().disaster.is_none());
    assert!(events.contains(&SimEvent::DisasterCleared { day: 2, kind: DisasterKind::Drought }));
}
