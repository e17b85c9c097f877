//! Invariants that must hold after every day, whatever the dice say.

use ecosim_core::{
    config::SimConfig,
    engine::SimEngine,
    environment::{OXYGEN_MAX, PERCENT_MAX, TEMP_MAX, TEMP_MIN},
    rng::ScriptedRng,
    species::Species,
    state::SimulationState,
};

fn assert_invariants(engine: &SimEngine) {
    let s = engine.state();
    let e = &s.environment;
    assert!((TEMP_MIN..=TEMP_MAX).contains(&e.temp), "temp {}", e.temp);
    for (name, v) in [("humidity", e.humidity), ("soil", e.soil), ("water", e.water)] {
        assert!((0.0..=PERCENT_MAX).contains(&v), "{name} {v}");
    }
    assert!((0.0..=OXYGEN_MAX).contains(&e.oxygen), "oxygen {}", e.oxygen);
    for (sp, pop) in s.species.iter() {
        assert!(pop >= 0.0, "{sp} negative: {pop}");
    }
    assert!(s.dead_organic >= 0.0);
    assert!((0.0..=s.resources.ap_max).contains(&s.resources.action_points));
    assert!(s.resources.budget >= 0.0);
    assert!(s.health <= 100);
    assert!(s.history.is_consistent());
    assert!(s.history.len() <= 30);
}

#[test]
fn a_year_of_random_days_keeps_every_bound() {
    for seed in [1u64, 7, 0xFEED] {
        let mut engine = SimEngine::new(format!("prop-{seed}"), seed, SimConfig::default());
        {
            let s = engine.state_mut();
            s.species.shrub = 40.0;
            s.species.tree = 15.0;
            s.species.deer = 8.0;
            s.species.wolf = 2.0;
            s.species.rabbit = 70.0;
        }
        for _ in 0..365 {
            engine.step().expect("step");
            assert_invariants(&engine);
        }
        assert_eq!(engine.state().history.len(), 30);
    }
}

#[test]
fn history_keeps_the_last_thirty_days() {
    let mut engine = SimEngine::new("prop-history".into(), 5, SimConfig::default());
    for _ in 0..45 {
        engine.step().expect("step");
    }
    let days: Vec<u64> = engine.state().history.days().iter().copied().collect();
    assert_eq!(days.first(), Some(&17));
    assert_eq!(days.last(), Some(&46));
    assert_eq!(engine.state().history.populations().len(), 30);
    assert_eq!(engine.state().history.environment().len(), 30);
}

#[test]
fn compute_health_is_idempotent() {
    let mut engine = SimEngine::new("prop-health".into(), 9, SimConfig::default());
    engine.step().expect("step");
    let a = engine.compute_health();
    let b = engine.compute_health();
    assert_eq!(a, b);
    assert_eq!(a, engine.state().health);
}

#[test]
fn quiet_day_after_adding_zero_rabbits() {
    let mut engine = SimEngine::new("prop-rabbit".into(), 0, SimConfig::default())
        .with_random_source(Box::new(ScriptedRng::never_trigger()));
    engine.state_mut().resources.action_points = 100.0;
    let start = SimulationState::default();

    assert!(engine.add_species(Species::Rabbit, 0.0).is_applied());
    assert_eq!(engine.state().species.rabbit, 20.0);

    engine.step().expect("step");
    let s = engine.state();
    assert_eq!(s.day, 2);
    assert!(s.disaster.is_none());
    assert!(s.species.grass < start.species.grass, "rabbits ate more than the grass grew");
    // Day 2 is not a rabbit breeding day: natural mortality plus foxes only.
    assert!(s.species.rabbit < 20.0);
    assert!(s.species.rabbit > 17.0);
    assert!(s.health <= 100);
}
