//! Organisms: sensing, acting and metabolism
//!
//! Each organism carries one genome. Every tick it senses its surroundings,
//! feeds the readings through the network and performs the action with the
//! strongest output.

use evogrid_neat::{Genome, GenomeError, choose_action};
use glam::IVec2;

use crate::grid::{Cell, Grid};
use crate::types::{Direction, OrganismId};

/// Network inputs: food then organisms, each for N, E, S, W
pub const SENSOR_COUNT: usize = 8;
/// Network outputs, one per [`Action`]
pub const ACTION_COUNT: usize = 4;
/// How many cells each directional sensor looks ahead
pub const SENSE_RANGE: i32 = 3;

/// Discrete action selected from the network outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveForward,
    TurnLeft,
    TurnRight,
    Eat,
}

impl Action {
    /// Map an output index to an action; indices past the fourth are idle
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Action::MoveForward),
            1 => Some(Action::TurnLeft),
            2 => Some(Action::TurnRight),
            3 => Some(Action::Eat),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Organism {
    pub id: OrganismId,
    pub position: IVec2,
    pub direction: Direction,
    pub energy: f32,
    pub age: u64,
    pub generation: u32,
    pub genome: Genome,
}

impl Organism {
    pub fn new(
        id: OrganismId,
        position: IVec2,
        direction: Direction,
        energy: f32,
        mut genome: Genome,
    ) -> Self {
        // Fitness tracks what this organism has eaten, not its parent
        genome.fitness = 0.0;
        Self {
            id,
            position,
            direction,
            energy,
            age: 0,
            generation: 0,
            genome,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.energy > 0.0
    }

    /// Total food energy collected so far
    pub fn food_collected(&self) -> f32 {
        self.genome.fitness
    }

    /// Read the eight directional sensors
    ///
    /// Input `i` is `1/d` for the nearest food at distance `d` (1..=3) in
    /// direction `i`; input `4 + i` is the same for other organisms.
    pub fn sense(&self, grid: &Grid) -> [f32; SENSOR_COUNT] {
        let mut inputs = [0.0; SENSOR_COUNT];

        for (i, &dir) in Direction::ALL.iter().enumerate() {
            for dist in 1..=SENSE_RANGE {
                if let Cell::Food(_) = grid.get(grid.step(self.position, dir, dist)) {
                    inputs[i] = 1.0 / dist as f32;
                    break;
                }
            }

            for dist in 1..=SENSE_RANGE {
                if let Cell::Organism(other) = grid.get(grid.step(self.position, dir, dist))
                    && other != self.id
                {
                    inputs[i + 4] = 1.0 / dist as f32;
                    break;
                }
            }
        }

        inputs
    }

    /// Run the network on the current surroundings and pick an action
    pub fn think(&mut self, grid: &Grid) -> Result<Option<Action>, GenomeError> {
        let inputs = self.sense(grid);
        let outputs = self.genome.activate(&inputs)?;
        Ok(choose_action(&outputs).and_then(Action::from_index))
    }

    fn eat_at(&mut self, grid: &mut Grid, pos: IVec2) -> bool {
        if let Cell::Food(energy) = grid.get(pos) {
            grid.set(pos, Cell::Empty);
            self.energy += energy;
            self.genome.fitness += energy;
            true
        } else {
            false
        }
    }

    /// Apply an action to the organism and the grid
    ///
    /// Moving forward into food eats it without moving; moving into another
    /// organism does nothing. Eating takes the first food among the four
    /// neighbours in N, E, S, W order.
    pub fn perform(&mut self, action: Action, grid: &mut Grid) {
        match action {
            Action::MoveForward => {
                let ahead = grid.step(self.position, self.direction, 1);
                match grid.get(ahead) {
                    Cell::Empty => {
                        grid.set(self.position, Cell::Empty);
                        grid.set(ahead, Cell::Organism(self.id));
                        self.position = ahead;
                    }
                    Cell::Food(_) => {
                        self.eat_at(grid, ahead);
                    }
                    Cell::Organism(_) => {}
                }
            }
            Action::TurnLeft => self.direction = self.direction.turn_left(),
            Action::TurnRight => self.direction = self.direction.turn_right(),
            Action::Eat => {
                for dir in Direction::ALL {
                    let neighbour = grid.step(self.position, dir, 1);
                    if self.eat_at(grid, neighbour) {
                        break;
                    }
                }
            }
        }
    }

    /// Age one tick and pay the metabolic cost
    pub fn metabolize(&mut self, cost: f32) {
        self.age += 1;
        self.energy -= cost;
    }
}
