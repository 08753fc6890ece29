//! Genome representation
//!
//! A genome is an arena of nodes plus a list of weighted connections that
//! refer to nodes by id. The graph may contain cycles; nothing here requires
//! it to be feed-forward. Connection ids double as NEAT innovation numbers
//! and are what crossover aligns on.

use ahash::HashSet;
use rand::Rng;

use crate::error::GenomeError;
use crate::ids::IdAllocator;

/// Role of a node in the network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Input,  // Driven by sensory input each tick
    Hidden, // Inserted by node mutation
    Output, // Read back as action values
}

/// Node gene
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: u64,
    pub node_type: NodeType,
    /// Scratch state for the current activation
    pub value: f32,
}

impl Node {
    pub fn new(id: u64, node_type: NodeType) -> Self {
        Self {
            id,
            node_type,
            value: 0.0,
        }
    }
}

/// Connection gene
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    /// Innovation number, stable across copies and crossover
    pub id: u64,
    pub source: u64,
    pub target: u64,
    pub weight: f32,
    pub enabled: bool,
}

impl Connection {
    pub fn new(id: u64, source: u64, target: u64, weight: f32) -> Self {
        Self {
            id,
            source,
            target,
            weight,
            enabled: true,
        }
    }

    /// Signal carried from `input`; disabled connections carry nothing
    pub fn forward(&self, input: f32) -> f32 {
        if self.enabled { input * self.weight } else { 0.0 }
    }
}

/// Evolvable controller network of one organism
///
/// `Clone` is the asexual copy: a deep duplicate that keeps every id.
#[derive(Debug, Clone, Default)]
pub struct Genome {
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
    pub fitness: f32,
    pub adjusted_fitness: f32,
}

impl Genome {
    pub fn new(nodes: Vec<Node>, connections: Vec<Connection>) -> Self {
        Self {
            nodes,
            connections,
            fitness: 0.0,
            adjusted_fitness: 0.0,
        }
    }

    /// Build a network with `input_size` inputs and `output_size` outputs
    ///
    /// Starts with no connections, then runs link mutation
    /// `input_size * output_size` times. Duplicate pairs are skipped, so the
    /// result can hold fewer connections than attempts. The allocator's
    /// one-time post-bootstrap reset is applied afterwards.
    pub fn bootstrap<R: Rng + ?Sized>(
        input_size: usize,
        output_size: usize,
        ids: &mut IdAllocator,
        rng: &mut R,
    ) -> Self {
        let mut nodes = Vec::with_capacity(input_size + output_size);
        for _ in 0..input_size {
            nodes.push(Node::new(ids.next_id(), NodeType::Input));
        }
        for _ in 0..output_size {
            nodes.push(Node::new(ids.next_id(), NodeType::Output));
        }

        let mut genome = Self::new(nodes, Vec::new());
        for _ in 0..input_size * output_size {
            // Skips are expected here; only unique pairs get wired
            let _ = genome.mutate_link(ids, rng);
        }

        if ids.finish_bootstrap() {
            log::debug!(
                "Bootstrap genome built ({} nodes, {} connections); id counter reset",
                genome.nodes.len(),
                genome.connections.len()
            );
        }

        genome
    }

    pub fn node(&self, id: u64) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn connection(&self, id: u64) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == id)
    }

    pub fn has_link(&self, source: u64, target: u64) -> bool {
        self.connections
            .iter()
            .any(|c| c.source == source && c.target == target)
    }

    /// Whether `id` is taken by any node or connection of this genome
    pub fn uses_id(&self, id: u64) -> bool {
        self.nodes.iter().any(|n| n.id == id) || self.connections.iter().any(|c| c.id == id)
    }

    pub fn count_nodes(&self, node_type: NodeType) -> usize {
        self.nodes.iter().filter(|n| n.node_type == node_type).count()
    }

    pub fn input_count(&self) -> usize {
        self.count_nodes(NodeType::Input)
    }

    pub fn output_count(&self) -> usize {
        self.count_nodes(NodeType::Output)
    }

    pub fn hidden_count(&self) -> usize {
        self.count_nodes(NodeType::Hidden)
    }

    pub fn enabled_connection_count(&self) -> usize {
        self.connections.iter().filter(|c| c.enabled).count()
    }

    /// Ids of nodes of one type, ascending
    pub fn sorted_ids(&self, node_type: NodeType) -> Vec<u64> {
        let mut ids: Vec<u64> = self
            .nodes
            .iter()
            .filter(|n| n.node_type == node_type)
            .map(|n| n.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Whether both genomes expose the same input and output node ids
    pub fn io_compatible(&self, other: &Genome) -> bool {
        self.sorted_ids(NodeType::Input) == other.sorted_ids(NodeType::Input)
            && self.sorted_ids(NodeType::Output) == other.sorted_ids(NodeType::Output)
    }

    /// Check id uniqueness and that every connection endpoint exists
    pub fn validate(&self) -> Result<(), GenomeError> {
        let mut node_ids = HashSet::default();
        for node in &self.nodes {
            if !node_ids.insert(node.id) {
                return Err(GenomeError::DuplicateNodeId(node.id));
            }
        }

        let mut connection_ids = HashSet::default();
        for conn in &self.connections {
            if !connection_ids.insert(conn.id) {
                return Err(GenomeError::DuplicateConnectionId(conn.id));
            }
            for node in [conn.source, conn.target] {
                if !node_ids.contains(&node) {
                    return Err(GenomeError::DanglingReference {
                        connection: conn.id,
                        node,
                    });
                }
            }
        }

        Ok(())
    }
}

/// Bootstrap a genome for the simulation driver
pub fn build_bootstrap_genome<R: Rng + ?Sized>(
    input_size: usize,
    output_size: usize,
    ids: &mut IdAllocator,
    rng: &mut R,
) -> Genome {
    Genome::bootstrap(input_size, output_size, ids, rng)
}
