//! Species keys and the fixed-shape population table.
//!
//! Populations are continuous, unpositioned aggregates. A species is
//! "extinct" when its count drops below 1.0; it is counted towards
//! biodiversity only while its count is above 1.0.

use crate::error::{SimError, SimResult};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    Grass,
    Shrub,
    Tree,
    Rabbit,
    Deer,
    Fox,
    Wolf,
    Decomposer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrophicTier {
    Plant,
    Herbivore,
    Predator,
    Decomposer,
}

impl Species {
    pub const ALL: [Species; 8] = [
        Species::Grass,
        Species::Shrub,
        Species::Tree,
        Species::Rabbit,
        Species::Deer,
        Species::Fox,
        Species::Wolf,
        Species::Decomposer,
    ];

    /// The seven species that count for biodiversity, extinction and win/lose.
    /// Decomposers are deliberately excluded.
    pub const TRACKED: [Species; 7] = [
        Species::Grass,
        Species::Shrub,
        Species::Tree,
        Species::Rabbit,
        Species::Deer,
        Species::Fox,
        Species::Wolf,
    ];

    pub const PLANTS: [Species; 3] = [Species::Grass, Species::Shrub, Species::Tree];
    pub const HERBIVORES: [Species; 2] = [Species::Rabbit, Species::Deer];
    pub const PREDATORS: [Species; 2] = [Species::Fox, Species::Wolf];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Grass      => "grass",
            Self::Shrub      => "shrub",
            Self::Tree       => "tree",
            Self::Rabbit     => "rabbit",
            Self::Deer       => "deer",
            Self::Fox        => "fox",
            Self::Wolf       => "wolf",
            Self::Decomposer => "decomposer",
        }
    }

    pub fn tier(&self) -> TrophicTier {
        match self {
            Self::Grass | Self::Shrub | Self::Tree => TrophicTier::Plant,
            Self::Rabbit | Self::Deer              => TrophicTier::Herbivore,
            Self::Fox | Self::Wolf                 => TrophicTier::Predator,
            Self::Decomposer                       => TrophicTier::Decomposer,
        }
    }

    pub fn is_animal(&self) -> bool {
        matches!(self.tier(), TrophicTier::Herbivore | TrophicTier::Predator)
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Species {
    type Err = SimError;

    fn from_str(s: &str) -> SimResult<Self> {
        Species::ALL
            .into_iter()
            .find(|sp| sp.key() == s)
            .ok_or_else(|| SimError::InvalidSpeciesKey { key: s.to_string() })
    }
}

/// Population counts for every species. Fixed shape: there is no way to
/// insert an unknown key.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SpeciesTable {
    pub grass:      f64,
    pub shrub:      f64,
    pub tree:       f64,
    pub rabbit:     f64,
    pub deer:       f64,
    pub fox:        f64,
    pub wolf:       f64,
    pub decomposer: f64,
}

impl SpeciesTable {
    pub fn get(&self, species: Species) -> f64 {
        match species {
            Species::Grass      => self.grass,
            Species::Shrub      => self.shrub,
            Species::Tree       => self.tree,
            Species::Rabbit     => self.rabbit,
            Species::Deer       => self.deer,
            Species::Fox        => self.fox,
            Species::Wolf       => self.wolf,
            Species::Decomposer => self.decomposer,
        }
    }

    pub fn get_mut(&mut self, species: Species) -> &mut f64 {
        match species {
            Species::Grass      => &mut self.grass,
            Species::Shrub      => &mut self.shrub,
            Species::Tree       => &mut self.tree,
            Species::Rabbit     => &mut self.rabbit,
            Species::Deer       => &mut self.deer,
            Species::Fox        => &mut self.fox,
            Species::Wolf       => &mut self.wolf,
            Species::Decomposer => &mut self.decomposer,
        }
    }

    /// Set a population, flooring at zero.
    pub fn set(&mut self, species: Species, value: f64) {
        *self.get_mut(species) = value.max(0.0);
    }

    /// Add `amount` (which may be negative) to a population, flooring at zero.
    pub fn add(&mut self, species: Species, amount: f64) {
        let current = self.get(species);
        self.set(species, current + amount);
    }

    /// Multiply a population by `factor`.
    pub fn scale(&mut self, species: Species, factor: f64) {
        let current = self.get(species);
        self.set(species, current * factor);
    }

    pub fn total_animals(&self) -> f64 {
        Species::ALL.into_iter().filter(Species::is_animal).map(|s| self.get(s)).sum()
    }

    pub fn total_plants(&self) -> f64 {
        self.total_in(TrophicTier::Plant)
    }

    pub fn total_in(&self, tier: TrophicTier) -> f64 {
        Species::ALL.into_iter().filter(|s| s.tier() == tier).map(|s| self.get(s)).sum()
    }

    /// Tracked species with population > 1.
    pub fn biodiversity_count(&self) -> usize {
        Species::TRACKED.iter().filter(|&&s| self.get(s) > 1.0).count()
    }

    /// Tracked species with population < 1.
    pub fn extinct_count(&self) -> usize {
        Species::TRACKED.iter().filter(|&&s| self.get(s) < 1.0).count()
    }

    /// True when at least one tracked species still has population >= 1.
    pub fn any_alive(&self) -> bool {
        Species::TRACKED.iter().any(|&s| self.get(s) >= 1.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Species, f64)> + '_ {
        Species::ALL.into_iter().map(move |s| (s, self.get(s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_key_and_rejects_unknown() {
        for sp in Species::ALL {
            assert_eq!(sp.key().parse::<Species>().unwrap(), sp);
        }
        let err = "unicorn".parse::<Species>().unwrap_err();
        assert!(matches!(err, SimError::InvalidSpeciesKey { ref key } if key == "unicorn"));
    }

    #[test]
    fn add_floors_at_zero() {
        let mut table = SpeciesTable { rabbit: 3.0, ..Default::default() };
        table.add(Species::Rabbit, -10.0);
        assert_eq!(table.rabbit, 0.0);
    }

    #[test]
    fn decomposers_do_not_count_for_biodiversity() {
        let table = SpeciesTable { decomposer: 50.0, grass: 2.0, ..Default::default() };
        assert_eq!(table.biodiversity_count(), 1);
        assert_eq!(table.extinct_count(), 6);
    }

    #[test]
    fn tier_totals_cover_the_right_species() {
        let table = SpeciesTable {
            grass: 10.0, shrub: 5.0, tree: 1.0,
            rabbit: 4.0, deer: 2.0, fox: 3.0, wolf: 1.0,
            decomposer: 50.0,
        };
        assert_eq!(table.total_plants(), 16.0);
        assert_eq!(table.total_animals(), 10.0);
        assert_eq!(table.total_in(TrophicTier::Herbivore), 6.0);
        assert_eq!(table.total_in(TrophicTier::Decomposer), 50.0);
        assert!(!Species::Decomposer.is_animal());
    }
}
