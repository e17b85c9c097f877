//! Environment model: temperature, humidity, soil, water, oxygen.
//!
//! RULE: every operation that writes an environment field must end with
//! `clamp()`. Suitability functions are pure and recomputed every day;
//! they are not clamped here (only derived health clamps).

use crate::error::{SimError, SimResult};
use serde::{Deserialize, Serialize};

pub const TEMP_MIN: f64 = -10.0;
pub const TEMP_MAX: f64 = 40.0;
pub const PERCENT_MAX: f64 = 100.0;
pub const OXYGEN_MAX: f64 = 1000.0;

/// Player nudge step sizes.
pub const TEMP_NUDGE: f64 = 1.0;
pub const HUMIDITY_NUDGE: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub temp:     f64,
    pub humidity: f64,
    pub soil:     f64,
    pub water:    f64,
    pub oxygen:   f64,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            temp:     20.0,
            humidity: 60.0,
            soil:     70.0,
            water:    50.0,
            oxygen:   0.0,
        }
    }
}

/// Direction of a player nudge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Down,
    Up,
}

impl Direction {
    pub fn sign(&self) -> f64 {
        match self {
            Self::Down => -1.0,
            Self::Up   =>  1.0,
        }
    }
}

impl TryFrom<i32> for Direction {
    type Error = SimError;

    fn try_from(value: i32) -> SimResult<Self> {
        match value {
            -1 => Ok(Self::Down),
            1  => Ok(Self::Up),
            _  => Err(SimError::InvalidDirection { value }),
        }
    }
}

impl Environment {
    /// Force every field back into its declared range.
    pub fn clamp(&mut self) {
        self.temp     = self.temp.clamp(TEMP_MIN, TEMP_MAX);
        self.humidity = self.humidity.clamp(0.0, PERCENT_MAX);
        self.soil     = self.soil.clamp(0.0, PERCENT_MAX);
        self.water    = self.water.clamp(0.0, PERCENT_MAX);
        self.oxygen   = self.oxygen.clamp(0.0, OXYGEN_MAX);
    }

    pub fn adjust_temperature(&mut self, direction: Direction) {
        self.temp += direction.sign() * TEMP_NUDGE;
        self.clamp();
    }

    pub fn adjust_humidity(&mut self, direction: Direction) {
        self.humidity += direction.sign() * HUMIDITY_NUDGE;
        self.clamp();
    }

    /// Plant fitness: temperature proximity to 20 °C (tolerance 20) weighted
    /// 0.5, humidity and soil fractions weighted 0.25 each.
    pub fn plant_suitability(&self) -> f64 {
        let t = proximity(self.temp, 20.0, 20.0);
        t * 0.5 + self.humidity / 100.0 * 0.25 + self.soil / 100.0 * 0.25
    }

    /// Herbivore fitness: proximity to 15 °C (tolerance 25) weighted 0.6,
    /// humidity fraction weighted 0.4.
    pub fn herbivore_suitability(&self) -> f64 {
        let t = proximity(self.temp, 15.0, 25.0);
        t * 0.6 + self.humidity / 100.0 * 0.4
    }

    /// Predator fitness: proximity to 10 °C with tolerance 30.
    pub fn predator_suitability(&self) -> f64 {
        proximity(self.temp, 10.0, 30.0)
    }
}

/// 1.0 at `ideal`, falling linearly to 0.0 at `tolerance` away.
fn proximity(value: f64, ideal: f64, tolerance: f64) -> f64 {
    1.0 - ((value - ideal).abs() / tolerance).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_forces_declared_bounds() {
        let mut env = Environment {
            temp:     99.0,
            humidity: -4.0,
            soil:     140.0,
            water:    -0.5,
            oxygen:   5000.0,
        };
        env.clamp();
        assert_eq!(env.temp, TEMP_MAX);
        assert_eq!(env.humidity, 0.0);
        assert_eq!(env.soil, 100.0);
        assert_eq!(env.water, 0.0);
        assert_eq!(env.oxygen, OXYGEN_MAX);
    }

    #[test]
    fn nudges_respect_bounds() {
        let mut env = Environment { temp: 39.5, humidity: 98.0, ..Default::default() };
        env.adjust_temperature(Direction::Up);
        env.adjust_humidity(Direction::Up);
        assert_eq!(env.temp, 40.0);
        assert_eq!(env.humidity, 100.0);

        env.adjust_humidity(Direction::Down);
        assert_eq!(env.humidity, 95.0);
    }

    #[test]
    fn suitability_peaks_at_ideal_temperature() {
        let env = Environment { temp: 20.0, humidity: 100.0, soil: 100.0, ..Default::default() };
        assert!((env.plant_suitability() - 1.0).abs() < 1e-12);

        let cold = Environment { temp: 10.0, ..Default::default() };
        assert!((cold.predator_suitability() - 1.0).abs() < 1e-12);

        let far = Environment { temp: 40.0, ..Default::default() };
        // |40-10| / 30 = 1.0 → no temperature contribution left
        assert_eq!(far.predator_suitability(), 0.0);
    }

    #[test]
    fn direction_from_sign() {
        assert_eq!(Direction::try_from(-1).unwrap(), Direction::Down);
        assert_eq!(Direction::try_from(1).unwrap(), Direction::Up);
        assert!(Direction::try_from(0).is_err());
    }
}
