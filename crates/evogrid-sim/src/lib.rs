//! Headless grid world for evolving organisms
//!
//! This crate implements:
//! - A toroidal grid holding food and organisms
//! - Organisms that sense in four directions and act through their genome
//! - A tick loop with metabolism, death and sexual or asexual reproduction
//! - Per-tick population statistics

pub mod config;
pub mod error;
pub mod grid;
pub mod organism;
pub mod stats;
pub mod types;
pub mod world;

// Re-export main types for convenience
pub use config::WorldConfig;
pub use error::SimError;
pub use grid::{Cell, Grid};
pub use organism::{ACTION_COUNT, Action, Organism, SENSE_RANGE, SENSOR_COUNT};
pub use stats::TickStats;
pub use types::{Direction, OrganismId};
pub use world::World;
