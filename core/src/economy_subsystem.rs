//! Resource economy — action points and budget.
//!
//! Action points regenerate daily up to `ap_max`. Budget is earned from
//! health and biodiversity after each day and never decays on its own.
//! Player actions are gated with `can_afford` + `spend`; spending is an
//! unconditional deduction and callers must check first.
//!
//! Execution: two phases per day. `ActionPointRegen` runs first,
//! `BudgetReward` runs right after health is recomputed.

use crate::{
    config::{ActionCost, EconomyConfig},
    error::SimResult,
    event::SimEvent,
    rng::RandomSource,
    species::SpeciesTable,
    state::{Resources, SimulationState},
    subsystem::SimSubsystem,
    types::{Day, Health},
};

pub fn regenerate(resources: &mut Resources, config: &EconomyConfig) {
    resources.action_points = (resources.action_points + config.ap_regen_per_day).min(resources.ap_max);
}

pub fn can_afford(resources: &Resources, cost: ActionCost) -> bool {
    resources.action_points >= cost.ap && resources.budget >= cost.budget
}

/// Deduct `cost`. Callers must gate with `can_afford` first.
pub fn spend(resources: &mut Resources, cost: ActionCost) {
    debug_assert!(
        can_afford(resources, cost),
        "spend() called without can_afford(): {cost:?} vs {resources:?}"
    );
    resources.action_points -= cost.ap;
    resources.budget -= cost.budget;
}

/// Budget earned for a day at `health` with the given populations.
pub fn reward_amount(health: Health, species: &SpeciesTable, config: &EconomyConfig) -> f64 {
    let base = (f64::from(health) / 100.0 * config.health_reward_scale).round();
    let bio_bonus = config.biodiversity_bonus * species.biodiversity_count() as f64;
    base + bio_bonus
}

/// Credit the daily reward. Returns the amount added; budget never decreases.
pub fn reward(
    resources: &mut Resources,
    health: Health,
    species: &SpeciesTable,
    config: &EconomyConfig,
) -> f64 {
    let gain = reward_amount(health, species, config);
    if gain > 0.0 {
        resources.budget += gain;
        gain
    } else {
        0.0
    }
}

pub struct ActionPointRegen {
    config: EconomyConfig,
}

impl ActionPointRegen {
    pub fn new(config: EconomyConfig) -> Self {
        Self { config }
    }
}

impl SimSubsystem for ActionPointRegen {
    fn name(&self) -> &'static str { "economy_regen" }

    fn update(
        &mut self,
        day: Day,
        state: &mut SimulationState,
        _events_in: &[SimEvent],
        _rng: &mut dyn RandomSource,
    ) -> SimResult<Vec<SimEvent>> {
        regenerate(&mut state.resources, &self.config);
        Ok(vec![SimEvent::ActionPointsRegenerated {
            day,
            action_points: state.resources.action_points,
        }])
    }
}

pub struct BudgetReward {
    config: EconomyConfig,
}

impl BudgetReward {
    pub fn new(config: EconomyConfig) -> Self {
        Self { config }
    }
}

impl SimSubsystem for BudgetReward {
    fn name(&self) -> &'static str { "economy_reward" }

    fn update(
        &mut self,
        day: Day,
        state: &mut SimulationState,
        _events_in: &[SimEvent],
        _rng: &mut dyn RandomSource,
    ) -> SimResult<Vec<SimEvent>> {
        let amount = reward(&mut state.resources, state.health, &state.species, &self.config);
        log::debug!(
            "day={day} economy: +{amount:.0} budget (now {:.0}), ap={:.0}",
            state.resources.budget,
            state.resources.action_points
        );
        if amount <= 0.0 {
            return Ok(vec![]);
        }
        Ok(vec![SimEvent::BudgetRewarded {
            day,
            amount,
            budget: state.resources.budget,
        }])
    }
}
