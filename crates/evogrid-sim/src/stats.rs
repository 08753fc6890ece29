//! Per-tick population statistics

use std::fmt;

use crate::grid::Grid;
use crate::organism::Organism;

/// Snapshot of the world after one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickStats {
    pub tick: u64,
    pub population: usize,
    pub food: usize,
    pub births: usize,
    pub deaths: usize,
    pub average_energy: f32,
    pub max_generation: u32,
    pub mean_hidden_nodes: f32,
    pub mean_enabled_connections: f32,
    /// Most food energy collected by any living organism
    pub best_fitness: f32,
}

impl TickStats {
    pub fn collect(
        tick: u64,
        organisms: &[Organism],
        grid: &Grid,
        births: usize,
        deaths: usize,
    ) -> Self {
        let population = organisms.len();
        let mean = |total: f32| {
            if population == 0 {
                0.0
            } else {
                total / population as f32
            }
        };

        Self {
            tick,
            population,
            food: grid.food_count(),
            births,
            deaths,
            average_energy: mean(organisms.iter().map(|o| o.energy).sum()),
            max_generation: organisms.iter().map(|o| o.generation).max().unwrap_or(0),
            mean_hidden_nodes: mean(
                organisms
                    .iter()
                    .map(|o| o.genome.hidden_count() as f32)
                    .sum(),
            ),
            mean_enabled_connections: mean(
                organisms
                    .iter()
                    .map(|o| o.genome.enabled_connection_count() as f32)
                    .sum(),
            ),
            best_fitness: organisms
                .iter()
                .map(|o| o.food_collected())
                .fold(0.0, f32::max),
        }
    }

    pub fn is_extinct(&self) -> bool {
        self.population == 0
    }
}

impl fmt::Display for TickStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tick {}: organisms {} (+{} -{}), food {}, avg energy {:.2}, max gen {}, hidden {:.2}, links {:.1}, best {:.1}",
            self.tick,
            self.population,
            self.births,
            self.deaths,
            self.food,
            self.average_energy,
            self.max_generation,
            self.mean_hidden_nodes,
            self.mean_enabled_connections,
            self.best_fitness
        )
    }
}
