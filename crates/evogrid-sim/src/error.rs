//! Simulation errors

use evogrid_neat::GenomeError;
use thiserror::Error;

use crate::types::OrganismId;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("grid dimensions {cols}x{rows} must be positive with a cell count that fits in i32")]
    InvalidGrid { cols: i32, rows: i32 },

    #[error("{organism} carries a broken genome")]
    Genome {
        organism: OrganismId,
        #[source]
        source: GenomeError,
    },
}
