//! World parameters

use serde::{Deserialize, Serialize};

/// Grid size, food economy and reproduction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub cols: i32,
    pub rows: i32,
    pub initial_organisms: usize,
    pub initial_food: usize,
    /// Food spawning stops while this many food cells exist
    pub max_food: usize,
    /// Energy gained per food item
    pub food_energy: f32,
    /// Chance per tick that one food item appears
    pub food_spawn_rate: f32,
    /// Energy spent by every organism each tick
    pub metabolism: f32,
    pub initial_energy: f32,
    /// Energy at which an organism splits off a child
    pub reproduction_threshold: f32,
    /// Chance that reproduction uses a compatible neighbour as second parent
    ///
    /// Only genomes with identical input and output node ids can be crossed.
    /// The first two founders share them, clones keep them, and crossover
    /// gives every child fresh ones, so most pairings fall back to cloning.
    pub crossover_rate: f32,
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            cols: 30,
            rows: 18,
            initial_organisms: 10,
            initial_food: 30,
            max_food: 60,
            food_energy: 0.5,
            food_spawn_rate: 0.05,
            metabolism: 0.02,
            initial_energy: 1.0,
            reproduction_threshold: 1.8,
            crossover_rate: 0.25,
            seed: 42,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_world_config() {
        let config = WorldConfig::default();
        assert_eq!((config.cols, config.rows), (30, 18));
        assert_eq!(config.initial_organisms, 10);
        assert_eq!(config.food_energy, 0.5);
        assert_eq!(config.reproduction_threshold, 1.8);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let config: WorldConfig = ron::from_str("(cols: 12, seed: 7)").unwrap();
        assert_eq!(config.cols, 12);
        assert_eq!(config.seed, 7);
        assert_eq!(config.rows, 18);
        assert_eq!(config.metabolism, 0.02);
    }
}
