//! Simulation clock — pacing, speed control, and pause.
//!
//! The clock does not own the day counter (that lives in the simulation
//! state) and never blocks `step()`. It only tells a driver loop whether
//! to advance and how long to wait between days.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Real time per in-game day at normal speed.
pub const BASE_DAY_MS: u64 = 5000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimClock {
    pub speed:  SimSpeed,
    pub paused: bool,
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SimClock {
    pub fn new() -> Self {
        Self {
            speed: SimSpeed::Normal,
            paused: false,
        }
    }

    pub fn pause(&mut self)  { self.paused = true;  }
    pub fn resume(&mut self) { self.paused = false; }

    pub fn set_speed(&mut self, speed: SimSpeed) {
        self.speed = speed;
    }

    pub fn faster(&mut self) {
        self.speed = self.speed.faster();
    }

    pub fn slower(&mut self) {
        self.speed = self.speed.slower();
    }

    /// Wall-clock interval between two days at the current speed.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(BASE_DAY_MS / self.speed.multiplier())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SimSpeed {
    Normal,     // 1 day / 5 s
    Double,     // 1 day / 2.5 s
    Triple,     // 1 day / ~1.7 s
    Quadruple,  // 1 day / 1.25 s
}

impl SimSpeed {
    pub fn multiplier(&self) -> u64 {
        match self {
            Self::Normal    => 1,
            Self::Double    => 2,
            Self::Triple    => 3,
            Self::Quadruple => 4,
        }
    }

    pub fn faster(&self) -> Self {
        match self {
            Self::Normal    => Self::Double,
            Self::Double    => Self::Triple,
            Self::Triple    => Self::Quadruple,
            Self::Quadruple => Self::Quadruple,
        }
    }

    pub fn slower(&self) -> Self {
        match self {
            Self::Normal    => Self::Normal,
            Self::Double    => Self::Normal,
            Self::Triple    => Self::Double,
            Self::Quadruple => Self::Triple,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_saturates_at_both_ends() {
        let mut clock = SimClock::new();
        clock.slower();
        assert_eq!(clock.speed, SimSpeed::Normal);
        for _ in 0..10 {
            clock.faster();
        }
        assert_eq!(clock.speed, SimSpeed::Quadruple);
        assert_eq!(clock.tick_interval(), Duration::from_millis(1250));
    }
}
