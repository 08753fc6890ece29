//! The simulated world
//!
//! A [`World`] owns everything that changes during a run: the grid, the
//! organisms, the innovation id allocator and the random generator. All
//! randomness flows from the configured seed, so two worlds built from the
//! same configuration produce the same history.

use evogrid_neat::{Genome, IdAllocator, MutationConfig, build_bootstrap_genome};
use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::config::WorldConfig;
use crate::error::SimError;
use crate::grid::{Cell, Grid};
use crate::organism::{ACTION_COUNT, Organism, SENSOR_COUNT};
use crate::stats::TickStats;
use crate::types::{Direction, OrganismId};

pub struct World {
    config: WorldConfig,
    mutation: MutationConfig,
    grid: Grid,
    organisms: Vec<Organism>,
    ids: IdAllocator,
    rng: Xoshiro256PlusPlus,
    next_organism: u64,
    tick: u64,
}

impl World {
    /// Build a world and place the initial organisms and food
    pub fn new(config: WorldConfig, mutation: MutationConfig) -> Result<Self, SimError> {
        let mut world = Self::empty(config, mutation)?;
        world.populate();
        Ok(world)
    }

    /// Build a world with an empty grid
    pub fn empty(config: WorldConfig, mutation: MutationConfig) -> Result<Self, SimError> {
        if config.cols <= 0
            || config.rows <= 0
            || config.cols.checked_mul(config.rows).is_none()
        {
            return Err(SimError::InvalidGrid {
                cols: config.cols,
                rows: config.rows,
            });
        }

        Ok(Self {
            grid: Grid::new(config.cols, config.rows),
            organisms: Vec::new(),
            ids: IdAllocator::new(),
            rng: Xoshiro256PlusPlus::seed_from_u64(config.seed),
            next_organism: 1,
            tick: 0,
            config,
            mutation,
        })
    }

    fn populate(&mut self) {
        for _ in 0..self.config.initial_organisms {
            let Some(position) = self.grid.random_empty_cell(&mut self.rng) else {
                log::warn!("Grid full, placed {} organisms", self.organisms.len());
                break;
            };
            let genome =
                build_bootstrap_genome(SENSOR_COUNT, ACTION_COUNT, &mut self.ids, &mut self.rng);
            let direction = self.random_direction();
            self.insert(genome, position, direction, 0);
        }

        for _ in 0..self.config.initial_food {
            if !self.spawn_food() {
                break;
            }
        }

        log::info!(
            "Populated {}x{} world with {} organisms and {} food",
            self.grid.cols(),
            self.grid.rows(),
            self.organisms.len(),
            self.grid.food_count()
        );
    }

    /// Clear the grid and rebuild the initial population
    ///
    /// The configuration, id allocator and random stream carry on.
    pub fn reset(&mut self) {
        self.grid.clear();
        self.organisms.clear();
        self.tick = 0;
        self.populate();
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn mutation_config(&self) -> &MutationConfig {
        &self.mutation
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn organisms(&self) -> &[Organism] {
        &self.organisms
    }

    pub fn organism(&self, id: OrganismId) -> Option<&Organism> {
        self.organisms.iter().find(|o| o.id == id)
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    fn random_direction(&mut self) -> Direction {
        Direction::ALL[self.rng.random_range(0..Direction::ALL.len())]
    }

    fn insert(
        &mut self,
        genome: Genome,
        position: IVec2,
        direction: Direction,
        generation: u32,
    ) -> OrganismId {
        let id = OrganismId::from_raw(self.next_organism);
        self.next_organism += 1;

        let mut organism = Organism::new(
            id,
            position,
            direction,
            self.config.initial_energy,
            genome,
        );
        organism.generation = generation;

        self.grid.set(position, Cell::Organism(id));
        self.organisms.push(organism);
        id
    }

    /// Place an organism with the given genome
    ///
    /// Returns None if the (wrapped) cell is not empty.
    pub fn spawn(
        &mut self,
        genome: Genome,
        position: IVec2,
        direction: Direction,
    ) -> Option<OrganismId> {
        let position = self.grid.wrap(position);
        if !self.grid.get(position).is_empty() {
            return None;
        }
        Some(self.insert(genome, position, direction, 0))
    }

    /// Put food on an empty cell; false if the cell is taken
    pub fn place_food(&mut self, position: IVec2) -> bool {
        if !self.grid.get(position).is_empty() {
            return false;
        }
        self.grid.set(position, Cell::Food(self.config.food_energy));
        true
    }

    fn spawn_food(&mut self) -> bool {
        match self.grid.random_empty_cell(&mut self.rng) {
            Some(position) => self.place_food(position),
            None => false,
        }
    }

    /// Advance the world by one tick
    ///
    /// Organisms act in order of birth, each seeing the grid as the ones
    /// before it left it. Dead organisms leave the grid immediately.
    /// Reproduction runs after everyone has acted.
    pub fn step(&mut self) -> Result<TickStats, SimError> {
        self.tick += 1;

        if self.grid.food_count() < self.config.max_food
            && self.rng.random::<f32>() < self.config.food_spawn_rate
        {
            self.spawn_food();
        }

        let mut deaths = 0;
        let mut ready = Vec::new();
        for index in 0..self.organisms.len() {
            let organism = &mut self.organisms[index];
            organism.metabolize(self.config.metabolism);

            let action = organism
                .think(&self.grid)
                .map_err(|source| SimError::Genome {
                    organism: organism.id,
                    source,
                })?;
            if let Some(action) = action {
                organism.perform(action, &mut self.grid);
            }

            if !organism.is_alive() {
                self.grid.set(organism.position, Cell::Empty);
                deaths += 1;
                log::debug!(
                    "{} died at age {} after eating {:.2}",
                    organism.id,
                    organism.age,
                    organism.food_collected()
                );
            } else if organism.energy >= self.config.reproduction_threshold {
                ready.push(index);
            }
        }

        let births = self.reproduce(&ready)?;
        self.organisms.retain(Organism::is_alive);

        Ok(TickStats::collect(
            self.tick,
            &self.organisms,
            &self.grid,
            births,
            deaths,
        ))
    }

    fn reproduce(&mut self, ready: &[usize]) -> Result<usize, SimError> {
        let mut births = 0;
        // Children born this tick are not yet eligible as mates
        let adults = self.organisms.len();

        for &index in ready {
            let parent = &self.organisms[index];
            let Some(position) = self.grid.empty_neighbour(parent.position, &mut self.rng) else {
                log::trace!("{} has no room to reproduce", parent.id);
                continue;
            };

            let partner = if self.rng.random::<f32>() < self.config.crossover_rate {
                find_partner(&self.organisms[..adults], &self.grid, index)
            } else {
                None
            };

            let (mut genome, generation) = match partner {
                Some(other) => {
                    let mate = &self.organisms[other];
                    let genome = parent
                        .genome
                        .crossover(&mate.genome, &mut self.ids, &mut self.rng)
                        .map_err(|source| SimError::Genome {
                            organism: parent.id,
                            source,
                        })?;
                    (genome, parent.generation.max(mate.generation) + 1)
                }
                None => (parent.genome.clone(), parent.generation + 1),
            };
            genome.mutate(&self.mutation, &mut self.ids, &mut self.rng);

            let parent_id = parent.id;
            self.organisms[index].energy /= 2.0;

            let direction = self.random_direction();
            let child = self.insert(genome, position, direction, generation);
            births += 1;

            match partner {
                Some(other) => log::debug!(
                    "{} and {} produced {} (generation {})",
                    parent_id,
                    self.organisms[other].id,
                    child,
                    generation
                ),
                None => log::debug!("{} produced {} (generation {})", parent_id, child, generation),
            }
        }

        Ok(births)
    }

    /// Check every genome's structural invariants
    pub fn validate(&self) -> Result<(), SimError> {
        for organism in &self.organisms {
            organism
                .genome
                .validate()
                .map_err(|source| SimError::Genome {
                    organism: organism.id,
                    source,
                })?;
        }
        Ok(())
    }
}

/// Index of a living neighbour whose genome can be crossed with the one at
/// `index`
fn find_partner(organisms: &[Organism], grid: &Grid, index: usize) -> Option<usize> {
    let parent = &organisms[index];
    Direction::ALL.iter().find_map(|&dir| {
        let Cell::Organism(id) = grid.get(grid.step(parent.position, dir, 1)) else {
            return None;
        };
        // Tiny grids wrap a neighbour back onto the parent itself
        if id == parent.id {
            return None;
        }
        organisms.iter().position(|o| {
            o.id == id && o.is_alive() && o.genome.io_compatible(&parent.genome)
        })
    })
}
