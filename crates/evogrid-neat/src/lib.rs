//! Evolvable neural genomes for grid-world organisms
//!
//! This crate implements:
//! - A shared identity allocator for node ids and connection innovation numbers
//! - Genomes as id-keyed node arenas with weighted, possibly recurrent connections
//! - Fixed-pass forward activation
//! - NEAT-style mutation and innovation-aligned crossover

pub mod crossover;
pub mod error;
pub mod genome;
pub mod ids;
pub mod mutation;
pub mod neural;

// Re-export main types for convenience
pub use error::{GenomeError, MutationSkip};
pub use genome::{Connection, Genome, Node, NodeType, build_bootstrap_genome};
pub use ids::IdAllocator;
pub use mutation::{MutationConfig, MutationReport};
pub use neural::{PROPAGATION_PASSES, choose_action};
