//! Population dynamics tests.
//!
//! The daily population step is deterministic: no random draws, so the
//! same input state must give the same output bit for bit.

use ecosim_core::{
    population_subsystem,
    species::Species,
    state::SimulationState,
};

fn staged(day: u64) -> SimulationState {
    let mut state = SimulationState::default();
    state.day = day;
    state
}

#[test]
fn same_input_same_output_bit_for_bit() {
    let mut a = staged(30);
    a.species.deer = 12.0;
    a.species.shrub = 40.0;
    a.species.wolf = 2.0;
    let mut b = a.clone();

    population_subsystem::advance(&mut a);
    population_subsystem::advance(&mut b);

    for (sp, pop) in a.species.iter() {
        assert_eq!(pop.to_bits(), b.species.get(sp).to_bits(), "{sp} diverged");
    }
    assert_eq!(a.environment, b.environment);
    assert_eq!(a.dead_organic.to_bits(), b.dead_organic.to_bits());
}

#[test]
fn grass_grows_from_the_default_environment() {
    let mut state = staged(2);
    population_subsystem::grow_plants(&mut state);

    // suitability 0.825, soil factor 0.7:
    // 100 + 100*0.10*0.825*0.7 - 100*(0.02 + 0.175*0.05)
    let expected = 100.0 + 5.775 - 2.875;
    assert!((state.species.grass - expected).abs() < 1e-9, "grass = {}", state.species.grass);
    // humidity 60 → +0.2 water
    assert!((state.environment.water - 50.2).abs() < 1e-9);
    // 102.9 grass * 2 * 0.01 - 25 animals * 0.02
    assert!((state.environment.oxygen - (expected * 0.02 - 0.5)).abs() < 1e-9);
}

#[test]
fn rabbits_eat_grass_and_only_breed_on_their_interval() {
    let mut off_day = staged(2);
    population_subsystem::feed_herbivores(&mut off_day);
    assert!(off_day.species.grass < 100.0, "rabbits must eat grass");
    assert!(off_day.species.rabbit < 20.0, "no reproduction on day 2");

    let mut breeding_day = staged(3);
    population_subsystem::feed_herbivores(&mut breeding_day);
    assert!(breeding_day.species.rabbit > off_day.species.rabbit);
}

#[test]
fn empty_herbivore_slots_are_skipped() {
    let mut state = staged(7);
    state.species.shrub = 50.0;
    population_subsystem::feed_herbivores(&mut state);
    assert_eq!(state.species.deer, 0.0);
    assert_eq!(state.species.shrub, 50.0, "no deer, no shrub eaten");
}

#[test]
fn starving_predators_die_faster() {
    let mut fed = staged(4);
    let mut starved = staged(4);
    starved.species.rabbit = 0.0;

    population_subsystem::hunt_prey(&mut fed);
    population_subsystem::hunt_prey(&mut starved);

    assert!(starved.species.fox < fed.species.fox);
    assert!(starved.dead_organic > fed.dead_organic);
}

#[test]
fn decomposers_turn_dead_matter_into_soil() {
    let mut state = staged(5);
    state.dead_organic = 40.0;
    population_subsystem::decompose(&mut state);

    // growth min(5, 40*0.05) = 2, processed min(40, 2*0.5) = 1
    assert_eq!(state.species.get(Species::Decomposer), 2.0);
    assert!((state.dead_organic - 39.0).abs() < 1e-12);
    assert!((state.environment.soil - 70.1).abs() < 1e-12);
}

#[test]
fn populations_never_go_negative() {
    let mut state = staged(15);
    state.species.rabbit = 500.0;
    state.species.grass = 1.0;
    state.species.wolf = 80.0;
    state.species.deer = 0.5;
    state.environment.temp = 40.0;
    state.environment.humidity = 0.0;

    for day in 15..60 {
        state.day = day;
        population_subsystem::advance(&mut state);
        for (sp, pop) in state.species.iter() {
            assert!(pop >= 0.0, "{sp} negative on day {day}: {pop}");
        }
        assert!(state.dead_organic >= 0.0);
    }
}
