//! Toroidal cell grid
//!
//! Every coordinate wraps around both axes, so there are no edges. Each cell
//! holds at most one thing: food or a single organism.

use glam::IVec2;
use rand::Rng;
use rand::prelude::IndexedRandom;

use crate::types::{Direction, OrganismId};

/// Contents of one cell
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Food(f32),
    Organism(OrganismId),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// Wrapping occupancy grid
#[derive(Debug, Clone)]
pub struct Grid {
    cols: i32,
    rows: i32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an empty grid
    ///
    /// Dimensions must be positive and `cols * rows` must fit in an `i32`;
    /// [`World`](crate::world::World) rejects configurations that do not.
    pub fn new(cols: i32, rows: i32) -> Self {
        debug_assert!(cols > 0 && rows > 0 && cols.checked_mul(rows).is_some());
        Self {
            cols,
            rows,
            cells: vec![Cell::Empty; cols as usize * rows as usize],
        }
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    /// Map any coordinate onto the torus
    pub fn wrap(&self, pos: IVec2) -> IVec2 {
        IVec2::new(pos.x.rem_euclid(self.cols), pos.y.rem_euclid(self.rows))
    }

    fn index(&self, pos: IVec2) -> usize {
        let pos = self.wrap(pos);
        (pos.y * self.cols + pos.x) as usize
    }

    pub fn get(&self, pos: IVec2) -> Cell {
        self.cells[self.index(pos)]
    }

    pub fn set(&mut self, pos: IVec2, cell: Cell) {
        let index = self.index(pos);
        self.cells[index] = cell;
    }

    /// Empty every cell
    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    /// Cell reached by walking `distance` steps from `pos`
    pub fn step(&self, pos: IVec2, direction: Direction, distance: i32) -> IVec2 {
        self.wrap(pos + direction.offset() * distance)
    }

    pub fn empty_cells(&self) -> Vec<IVec2> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_empty())
            .map(|(i, _)| IVec2::new(i as i32 % self.cols, i as i32 / self.cols))
            .collect()
    }

    /// Uniformly chosen empty cell, or None when the grid is full
    pub fn random_empty_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<IVec2> {
        self.empty_cells().choose(rng).copied()
    }

    /// Random empty cell among the four neighbours of `pos`
    pub fn empty_neighbour<R: Rng + ?Sized>(&self, pos: IVec2, rng: &mut R) -> Option<IVec2> {
        let free: Vec<IVec2> = Direction::ALL
            .iter()
            .map(|&dir| self.step(pos, dir, 1))
            .filter(|&p| self.get(p).is_empty())
            .collect();
        free.choose(rng).copied()
    }

    pub fn food_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| matches!(cell, Cell::Food(_)))
            .count()
    }
}
