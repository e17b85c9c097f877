use serde::{Deserialize, Serialize};

use crate::{
    clock::SimSpeed,
    environment::Direction,
    error::{SimError, SimResult},
    species::Species,
};

/// All player-issued commands. Every mutation requested from outside the
/// daily step goes through one of these.
/// Variants added over time — never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PlayerCommand {
    // ── Clock control ─────────────────────────────
    Pause,
    Resume,
    SetSpeed { speed: SimSpeed },

    // ── Environment nudges ────────────────────────
    AdjustTemperature { direction: Direction },
    AdjustHumidity { direction: Direction },

    // ── Species ───────────────────────────────────
    /// Buy one catalog lot; `amount` overrides the catalog amount.
    AddSpecies {
        species: Species,
        #[serde(default)]
        amount: Option<f64>,
    },

    // ── Disasters ─────────────────────────────────
    MitigateDisaster,

    // ── Run control ───────────────────────────────
    Reset,
}

impl PlayerCommand {
    /// Short stable label used in events and logs.
    pub fn label(&self) -> String {
        match self {
            Self::Pause                           => "pause".into(),
            Self::Resume                          => "resume".into(),
            Self::SetSpeed { .. }                 => "set_speed".into(),
            Self::AdjustTemperature { .. }        => "adjust_temperature".into(),
            Self::AdjustHumidity { .. }           => "adjust_humidity".into(),
            Self::AddSpecies { species, .. }      => format!("add_species:{species}"),
            Self::MitigateDisaster                => "mitigate_disaster".into(),
            Self::Reset                           => "reset".into(),
        }
    }
}

/// Why a player action was turned down. A declined action leaves the
/// state exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DeclineReason {
    InsufficientResources {
        ap_cost:          f64,
        budget_cost:      f64,
        ap_available:     f64,
        budget_available: f64,
    },
    NotPurchasable { species: Species },
    NoActiveDisaster,
}

/// Result of a player action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ActionOutcome {
    Applied,
    Declined(DeclineReason),
}

impl ActionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ActionOutcome::Applied)
    }

    /// Turn an unaffordable action into a hard error, for callers that do
    /// not handle the declined signal themselves.
    pub fn into_result(self) -> SimResult<Self> {
        match self {
            ActionOutcome::Declined(DeclineReason::InsufficientResources {
                ap_cost,
                budget_cost,
                ap_available,
                budget_available,
            }) => Err(SimError::InsufficientResources {
                ap_cost,
                budget_cost,
                ap_available,
                budget_available,
            }),
            other => Ok(other),
        }
    }
}
