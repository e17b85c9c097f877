//! Win/lose evaluation.
//!
//! Evaluated once per day after health, and only while the outcome is
//! still `None`. Once set, the outcome never changes for the run; only a
//! reset to a fresh state clears it.
//!
//! Win: day >= 100, health > 70, no tracked species extinct.
//!
//! Lose, first match wins:
//!   1. total collapse — no tracked species has population >= 1
//!   2. resources exhausted — AP <= 0 and budget <= 0
//!   3. mass extinction — 3+ tracked species below 1
//!   4. day limit — day >= 365
//!   5. chronic low health — health < 30 for 5 consecutive days
//!
//! Collapse is checked ahead of mass extinction because it is the
//! narrower case: every collapse is also a mass extinction, and would
//! otherwise never be reported.

use crate::{
    config::OutcomeConfig,
    error::SimResult,
    event::SimEvent,
    rng::RandomSource,
    state::SimulationState,
    subsystem::SimSubsystem,
    types::Day,
};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    #[default]
    None,
    Won,
    Lost(LoseReason),
}

impl Outcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::None)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::None         => f.write_str("in progress"),
            Outcome::Won          => f.write_str("won: the ecosystem is in balance"),
            Outcome::Lost(reason) => write!(f, "lost: {reason}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoseReason {
    MassExtinction,
    TotalCollapse,
    DayLimit,
    ChronicLowHealth,
    ResourcesExhausted,
}

impl LoseReason {
    /// Human-readable reason surfaced to the player.
    pub fn message(&self) -> &'static str {
        match self {
            Self::MassExtinction     => "three or more species extinct",
            Self::TotalCollapse      => "total collapse",
            Self::DayLimit           => "day limit reached",
            Self::ChronicLowHealth   => "health below 30 for 5 consecutive days",
            Self::ResourcesExhausted => "resources exhausted",
        }
    }
}

impl fmt::Display for LoseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Pure evaluation of the win/lose rules against `state` as it stands.
/// Uses the stored `health` and `low_health_streak`; mutates nothing.
pub fn check_outcome(state: &SimulationState, config: &OutcomeConfig) -> Outcome {
    let species = &state.species;

    if state.day >= config.win_min_day
        && state.health > config.win_min_health
        && species.extinct_count() == 0
    {
        return Outcome::Won;
    }

    if !species.any_alive() {
        return Outcome::Lost(LoseReason::TotalCollapse);
    }
    if state.resources.action_points <= 0.0 && state.resources.budget <= 0.0 {
        return Outcome::Lost(LoseReason::ResourcesExhausted);
    }
    if species.extinct_count() >= config.max_extinct {
        return Outcome::Lost(LoseReason::MassExtinction);
    }
    if state.day >= config.max_day {
        return Outcome::Lost(LoseReason::DayLimit);
    }
    if state.low_health_streak >= config.low_health_days {
        return Outcome::Lost(LoseReason::ChronicLowHealth);
    }
    Outcome::None
}

/// Advance the consecutive low-health counter for today's health.
pub fn track_low_health(state: &mut SimulationState, config: &OutcomeConfig) {
    if state.health < config.low_health {
        state.low_health_streak += 1;
    } else {
        state.low_health_streak = 0;
    }
}

pub struct OutcomeSubsystem {
    config: OutcomeConfig,
}

impl OutcomeSubsystem {
    pub fn new(config: OutcomeConfig) -> Self {
        Self { config }
    }
}

impl SimSubsystem for OutcomeSubsystem {
    fn name(&self) -> &'static str { "outcome" }

    fn update(
        &mut self,
        day: Day,
        state: &mut SimulationState,
        _events_in: &[SimEvent],
        _rng: &mut dyn RandomSource,
    ) -> SimResult<Vec<SimEvent>> {
        if state.outcome.is_terminal() {
            return Ok(vec![]);
        }

        track_low_health(state, &self.config);
        let outcome = check_outcome(state, &self.config);
        if !outcome.is_terminal() {
            return Ok(vec![]);
        }

        state.outcome = outcome;
        log::info!("day={day} outcome: {outcome}");
        Ok(vec![SimEvent::OutcomeReached { day, outcome }])
    }
}
