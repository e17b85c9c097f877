//! ecosim-core: a deterministic, headless ecosystem simulation.
//!
//! The engine advances a single `SimulationState` one day at a time
//! through a fixed pipeline of subsystems. Callers drive it with
//! `SimEngine::step` and mutate it only through gated player actions.

pub mod climate_subsystem;
pub mod clock;
pub mod command;
pub mod config;
pub mod disaster_subsystem;
pub mod economy_subsystem;
pub mod engine;
pub mod environment;
pub mod error;
pub mod event;
pub mod health_subsystem;
pub mod outcome_subsystem;
pub mod population_subsystem;
pub mod rng;
pub mod snapshot;
pub mod species;
pub mod state;
pub mod store;
pub mod subsystem;
pub mod types;
