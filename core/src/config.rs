//! Tunable policy: economy, player action prices, disaster odds,
//! win/lose thresholds.
//!
//! Ecological constants (growth rates, diets, O2 yields) are not here;
//! they live next to the formulas in population_subsystem.rs.

use crate::species::Species;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = "ecosim_config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomyConfig {
    /// Action points regenerated at the start of every day.
    pub ap_regen_per_day: f64,
    /// Budget earned at health 100, scaled linearly with health.
    pub health_reward_scale: f64,
    /// Budget earned per tracked species with population > 1.
    pub biodiversity_bonus: f64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            ap_regen_per_day:    10.0,
            health_reward_scale: 40.0,
            biodiversity_bonus:  6.0,
        }
    }
}

/// Price of one player action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionCost {
    pub ap:     f64,
    pub budget: f64,
}

impl ActionCost {
    pub const fn new(ap: f64, budget: f64) -> Self {
        Self { ap, budget }
    }
}

/// A purchasable species: how many individuals one purchase adds and
/// what it costs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeciesOffer {
    pub species: Species,
    pub amount:  f64,
    pub cost:    ActionCost,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionConfig {
    pub adjust_temperature: ActionCost,
    pub adjust_humidity:    ActionCost,
    pub mitigate_disaster:  ActionCost,
    pub species_catalog:    Vec<SpeciesOffer>,
}

impl ActionConfig {
    /// Catalog entry for `species`, or None if it cannot be bought.
    pub fn offer_for(&self, species: Species) -> Option<&SpeciesOffer> {
        self.species_catalog.iter().find(|o| o.species == species)
    }
}

impl Default for ActionConfig {
    fn default() -> Self {
        let offer = |species, amount, ap, budget| SpeciesOffer {
            species,
            amount,
            cost: ActionCost::new(ap, budget),
        };
        Self {
            adjust_temperature: ActionCost::new(5.0, 0.0),
            adjust_humidity:    ActionCost::new(3.0, 0.0),
            mitigate_disaster:  ActionCost::new(40.0, 0.0),
            species_catalog: vec![
                offer(Species::Grass,  10.0, 20.0, 100.0),
                offer(Species::Shrub,   5.0, 20.0, 100.0),
                offer(Species::Tree,    2.0, 20.0, 100.0),
                offer(Species::Rabbit,  4.0, 30.0, 200.0),
                offer(Species::Deer,    1.0, 30.0, 200.0),
                offer(Species::Fox,     1.0, 50.0, 300.0),
                offer(Species::Wolf,    1.0, 50.0, 300.0),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisasterConfig {
    /// Daily chance of a drought, flood or fire.
    pub catastrophe_chance: f64,
    pub catastrophe_days:   (u32, u32),
    /// Daily chance of an invasive species event.
    pub invasive_chance:    f64,
    pub invasive_days:      (u32, u32),
    /// Daily chance of disease once animal density exceeds the threshold.
    pub disease_chance:     f64,
    pub disease_days:       (u32, u32),
    pub disease_density_threshold: f64,
    /// Days removed from the active disaster by one mitigation.
    pub mitigation_days:    u32,
    /// Daily climate drift magnitude (°C).
    pub climate_drift:      f64,
}

impl Default for DisasterConfig {
    fn default() -> Self {
        Self {
            catastrophe_chance: 0.05,
            catastrophe_days:   (2, 4),
            invasive_chance:    0.03,
            invasive_days:      (3, 5),
            disease_chance:     0.04,
            disease_days:       (2, 3),
            disease_density_threshold: 60.0,
            mitigation_days:    2,
            climate_drift:      0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeConfig {
    pub win_min_day:        u64,
    /// Health must be strictly above this to win.
    pub win_min_health:     u8,
    pub max_day:            u64,
    /// Health strictly below this counts towards the low-health streak.
    pub low_health:         u8,
    pub low_health_days:    u32,
    pub max_extinct:        usize,
}

impl Default for OutcomeConfig {
    fn default() -> Self {
        Self {
            win_min_day:     100,
            win_min_health:  70,
            max_day:         365,
            low_health:      30,
            low_health_days: 5,
            max_extinct:     3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default)]
    pub economy:   EconomyConfig,
    #[serde(default)]
    pub actions:   ActionConfig,
    #[serde(default)]
    pub disasters: DisasterConfig,
    #[serde(default)]
    pub outcome:   OutcomeConfig,
    #[serde(default = "default_history_len")]
    pub history_len: usize,
}

fn default_history_len() -> usize {
    crate::state::DEFAULT_HISTORY_LEN
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            economy:     EconomyConfig::default(),
            actions:     ActionConfig::default(),
            disasters:   DisasterConfig::default(),
            outcome:     OutcomeConfig::default(),
            history_len: default_history_len(),
        }
    }
}

impl SimConfig {
    /// Load from `<data_dir>/ecosim_config.json`.
    /// In tests, use SimConfig::default().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/{CONFIG_FILE_NAME}");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: SimConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Load if the file exists, otherwise fall back to defaults.
    pub fn load_or_default(data_dir: &str) -> anyhow::Result<Self> {
        let path = std::path::Path::new(data_dir).join(CONFIG_FILE_NAME);
        if path.exists() {
            Self::load(data_dir)
        } else {
            log::info!("No {CONFIG_FILE_NAME} in {data_dir}; using built-in defaults");
            Ok(Self::default())
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        let d = &self.disasters;
        for (name, (lo, hi)) in [
            ("catastrophe_days", d.catastrophe_days),
            ("invasive_days", d.invasive_days),
            ("disease_days", d.disease_days),
        ] {
            if lo == 0 || lo > hi {
                anyhow::bail!("disasters.{name} must be a non-empty range starting at 1 or more");
            }
        }
        for p in [d.catastrophe_chance, d.invasive_chance, d.disease_chance] {
            if !(0.0..=1.0).contains(&p) {
                anyhow::bail!("disaster probabilities must lie in [0, 1], got {p}");
            }
        }
        if self.history_len == 0 {
            anyhow::bail!("history_len must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_fills_in_defaults() {
        let json = r#"{ "outcome": { "win_min_day": 50, "win_min_health": 60,
                        "max_day": 200, "low_health": 25, "low_health_days": 3,
                        "max_extinct": 2 } }"#;
        let config: SimConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.outcome.max_day, 200);
        assert_eq!(config.economy, EconomyConfig::default());
        assert_eq!(config.history_len, 30);
    }

    #[test]
    fn decomposers_are_not_for_sale() {
        let actions = ActionConfig::default();
        assert!(actions.offer_for(Species::Decomposer).is_none());
        assert_eq!(actions.offer_for(Species::Rabbit).unwrap().amount, 4.0);
    }
}
