//! Forward activation of a genome
//!
//! The network may be recurrent, so there is no fixed point to converge to.
//! Instead signal is pushed through every connection a fixed number of
//! times per activation, which bounds the cost regardless of depth or cycles.

use ahash::HashMap;

use crate::error::GenomeError;
use crate::genome::{Genome, NodeType};

/// Propagation sweeps per activation (signal travels at most this many hops)
pub const PROPAGATION_PASSES: usize = 3;

/// Hyperbolic tangent squashing applied to hidden and output nodes
pub fn squash(x: f32) -> f32 {
    x.tanh()
}

impl Genome {
    /// Map node id to its position in `nodes`
    fn node_positions(&self) -> HashMap<u64, usize> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(pos, node)| (node.id, pos))
            .collect()
    }

    /// Evaluate the network against one tick of sensory input
    ///
    /// Every node starts from zero. Inputs are then assigned to input nodes in
    /// ascending id order; extra inputs are ignored and input nodes without a
    /// value stay at zero. Returns output node values in ascending id order.
    /// Accumulated values are not cleared between passes.
    pub fn activate(&mut self, inputs: &[f32]) -> Result<Vec<f32>, GenomeError> {
        let positions = self.node_positions();

        // Resolve every endpoint before touching any state
        let edges = self
            .connections
            .iter()
            .enumerate()
            .map(|(conn_pos, conn)| {
                let lookup = |node: u64| {
                    positions
                        .get(&node)
                        .copied()
                        .ok_or(GenomeError::DanglingReference {
                            connection: conn.id,
                            node,
                        })
                };
                Ok((conn_pos, lookup(conn.source)?, lookup(conn.target)?))
            })
            .collect::<Result<Vec<_>, GenomeError>>()?;

        for node in &mut self.nodes {
            node.value = 0.0;
        }

        for (id, &value) in self.sorted_ids(NodeType::Input).iter().zip(inputs) {
            self.nodes[positions[id]].value = value;
        }

        for _ in 0..PROPAGATION_PASSES {
            for &(conn_pos, source, target) in &edges {
                let contribution = self.connections[conn_pos].forward(self.nodes[source].value);
                self.nodes[target].value += contribution;
            }

            for node in &mut self.nodes {
                if node.node_type != NodeType::Input {
                    node.value = squash(node.value);
                }
            }
        }

        Ok(self
            .sorted_ids(NodeType::Output)
            .iter()
            .map(|id| self.nodes[positions[id]].value)
            .collect())
    }
}

/// Index of the strongest output; ties go to the lowest index
pub fn choose_action(outputs: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &value) in outputs.iter().enumerate() {
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((i, value)),
        }
    }
    best.map(|(i, _)| i)
}
