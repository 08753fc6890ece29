//! Genome invariant violations and recoverable mutation skips

use thiserror::Error;

/// Broken graph bookkeeping. These indicate a bug, not a modeled state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenomeError {
    #[error("connection {connection} references missing node {node}")]
    DanglingReference { connection: u64, node: u64 },

    #[error("node id {0} appears more than once")]
    DuplicateNodeId(u64),

    #[error("connection id {0} appears more than once")]
    DuplicateConnectionId(u64),
}

/// Why a structural mutation did nothing this call
///
/// All of these are expected during evolution and are never surfaced to the
/// caller as failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MutationSkip {
    #[error("fewer than two nodes")]
    TooFewNodes,

    #[error("no target node distinct from the source")]
    NoTarget,

    #[error("a connection with the same source and target already exists")]
    DuplicateLink,

    #[error("no eligible connection")]
    NoEligibleConnection,

    #[error("no output nodes")]
    NoOutputNodes,

    #[error("coin flip declined")]
    CoinFlip,
}
