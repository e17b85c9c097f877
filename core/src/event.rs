//! Structured simulation events.
//!
//! RULE: The core never renders anything. Everything a UI would show as a
//! notification ("fire started", "not enough resources", "you won") is
//! emitted as a `SimEvent` and left to the caller to present.

use crate::{
    command::DeclineReason,
    disaster_subsystem::DisasterKind,
    outcome_subsystem::Outcome,
    species::Species,
    types::{Day, Health, RunId},
};
use serde::{Deserialize, Serialize};

/// Every event emitted during simulation.
/// Variants may be appended — never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    // ── Engine events ──────────────────────────────
    DayStarted {
        day: Day,
    },
    DayCompleted {
        day: Day,
        health: Health,
    },
    RunInitialized {
        run_id: RunId,
        seed: Option<u64>,
    },

    // ── Economy events ─────────────────────────────
    ActionPointsRegenerated {
        day: Day,
        action_points: f64,
    },
    BudgetRewarded {
        day: Day,
        amount: f64,
        budget: f64,
    },

    // ── Climate and disaster events ────────────────
    ClimateDrifted {
        day: Day,
        delta: f64,
        temp: f64,
    },
    DisasterTriggered {
        day: Day,
        kind: DisasterKind,
        duration: u32,
    },
    DisasterStruck {
        day: Day,
        kind: DisasterKind,
        days_remaining: u32,
    },
    DisasterCleared {
        day: Day,
        kind: DisasterKind,
    },
    DisasterMitigated {
        day: Day,
        kind: DisasterKind,
        days_remaining: u32,
    },

    // ── Ecology events ─────────────────────────────
    PopulationsUpdated {
        day: Day,
        plants: f64,
        animals: f64,
        dead_organic: f64,
    },
    HealthComputed {
        day: Day,
        health: Health,
    },
    OutcomeReached {
        day: Day,
        outcome: Outcome,
    },

    // ── Player action events ───────────────────────
    ActionApplied {
        day: Day,
        action: String,
        ap_cost: f64,
        budget_cost: f64,
    },
    ActionDeclined {
        day: Day,
        action: String,
        reason: DeclineReason,
    },
    SpeciesAdded {
        day: Day,
        species: Species,
        amount: f64,
        population: f64,
    },
}

impl SimEvent {
    /// Stable string name for the `event_type` column in event_log.
    pub fn type_name(&self) -> &'static str {
        match self {
            SimEvent::DayStarted { .. }              => "day_started",
            SimEvent::DayCompleted { .. }            => "day_completed",
            SimEvent::RunInitialized { .. }          => "run_initialized",
            SimEvent::ActionPointsRegenerated { .. } => "action_points_regenerated",
            SimEvent::BudgetRewarded { .. }          => "budget_rewarded",
            SimEvent::ClimateDrifted { .. }          => "climate_drifted",
            SimEvent::DisasterTriggered { .. }       => "disaster_triggered",
            SimEvent::DisasterStruck { .. }          => "disaster_struck",
            SimEvent::DisasterCleared { .. }         => "disaster_cleared",
            SimEvent::DisasterMitigated { .. }       => "disaster_mitigated",
            SimEvent::PopulationsUpdated { .. }      => "populations_updated",
            SimEvent::HealthComputed { .. }          => "health_computed",
            SimEvent::OutcomeReached { .. }          => "outcome_reached",
            SimEvent::ActionApplied { .. }           => "action_applied",
            SimEvent::ActionDeclined { .. }          => "action_declined",
            SimEvent::SpeciesAdded { .. }            => "species_added",
        }
    }
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id: Option<i64>,
    pub run_id: RunId,
    pub day: Day,
    pub subsystem: String,
    pub event_type: String,
    pub payload: String, // JSON-serialized SimEvent
}
