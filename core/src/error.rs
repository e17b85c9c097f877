use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown species key '{key}'")]
    InvalidSpeciesKey { key: String },

    #[error("Invalid nudge direction {value}: expected -1 or +1")]
    InvalidDirection { value: i32 },

    #[error("Insufficient resources: need {ap_cost} AP / {budget_cost} budget, have {ap_available} AP / {budget_available} budget")]
    InsufficientResources {
        ap_cost:          f64,
        budget_cost:      f64,
        ap_available:     f64,
        budget_available: f64,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SimResult<T> = Result<T, SimError>;
