//! NEAT mutation operators
//!
//! Every operator is gated independently by its own rate, so several can
//! fire in one call. Nothing is ever removed from a genome; a connection is
//! only switched off through `enabled = false`.

use rand::Rng;
use rand::prelude::{IndexedMutRandom, IndexedRandom};
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

use crate::error::MutationSkip;
use crate::genome::{Connection, Genome, Node, NodeType};
use crate::ids::IdAllocator;

/// Connection weights live in [-WEIGHT_LIMIT, WEIGHT_LIMIT]
pub const WEIGHT_LIMIT: f32 = 2.0;
/// Chance that a mutated weight is replaced rather than perturbed
pub const WEIGHT_REPLACE_CHANCE: f32 = 0.1;
/// Standard deviation of weight and bias perturbations
pub const PERTURB_SIGMA: f32 = 0.1;

/// Per-call probabilities for each operator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationConfig {
    /// Gate for weight mutation, reused as the per-connection probability
    pub weight: f32,
    pub link: f32,
    pub node: f32,
    pub toggle: f32,
    /// Re-enable one disabled connection
    pub re_enable: f32,
    pub bias: f32,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            weight: 0.8,
            link: 0.05,
            node: 0.03,
            toggle: 0.1,
            re_enable: 0.0,
            bias: 0.7,
        }
    }
}

impl MutationConfig {
    /// Every operator always fires; useful for tests and stress runs
    pub fn always() -> Self {
        Self {
            weight: 1.0,
            link: 1.0,
            node: 1.0,
            toggle: 1.0,
            re_enable: 1.0,
            bias: 1.0,
        }
    }
}

/// What one call to [`Genome::mutate`] changed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutationReport {
    pub weights_mutated: usize,
    /// Id of the added connection
    pub link: Option<u64>,
    /// Id of the inserted hidden node
    pub node: Option<u64>,
    /// Id of the toggled connection
    pub toggled: Option<u64>,
    /// Id of the re-enabled connection
    pub re_enabled: Option<u64>,
    /// Id of the nudged output node
    pub bias: Option<u64>,
}

impl MutationReport {
    /// Whether a node or connection was added
    pub fn grew(&self) -> bool {
        self.link.is_some() || self.node.is_some()
    }
}

fn gaussian<R: Rng + ?Sized>(rng: &mut R, sigma: f32) -> f32 {
    let z: f32 = StandardNormal.sample(rng);
    z * sigma
}

fn applied(operator: &str, result: Result<u64, MutationSkip>) -> Option<u64> {
    match result {
        Ok(id) => Some(id),
        Err(skip) => {
            log::trace!("{} mutation skipped: {}", operator, skip);
            None
        }
    }
}

impl Genome {
    /// Next id from `ids` that is not already used inside this genome
    fn fresh_id(&self, ids: &mut IdAllocator) -> u64 {
        ids.next_unused(|id| self.uses_id(id))
    }

    /// Apply all operators in order: weight, link, node, toggle, re-enable, bias
    pub fn mutate<R: Rng + ?Sized>(
        &mut self,
        config: &MutationConfig,
        ids: &mut IdAllocator,
        rng: &mut R,
    ) -> MutationReport {
        let mut report = MutationReport::default();

        if rng.random::<f32>() < config.weight {
            report.weights_mutated = self.mutate_weight(config.weight, rng);
        }

        if rng.random::<f32>() < config.link {
            report.link = applied("link", self.mutate_link(ids, rng));
        }

        if rng.random::<f32>() < config.node {
            report.node = applied("node", self.mutate_node(ids, rng));
        }

        if rng.random::<f32>() < config.toggle {
            report.toggled = applied("toggle", self.mutate_toggle(rng));
        }

        if rng.random::<f32>() < config.re_enable {
            report.re_enabled = applied("re-enable", self.mutate_re_enable(rng));
        }

        if rng.random::<f32>() < config.bias {
            report.bias = applied("bias", self.mutate_bias(rng));
        }

        debug_assert!(self.validate().is_ok(), "mutation broke genome invariants");
        report
    }

    /// Perturb or replace each connection weight with probability `rate`
    /// Returns number of weights mutated
    pub fn mutate_weight<R: Rng + ?Sized>(&mut self, rate: f32, rng: &mut R) -> usize {
        let mut mutated = 0;

        for conn in &mut self.connections {
            if rng.random::<f32>() >= rate {
                continue;
            }
            if rng.random::<f32>() < WEIGHT_REPLACE_CHANCE {
                conn.weight = rng.random_range(-WEIGHT_LIMIT..WEIGHT_LIMIT);
            } else {
                conn.weight += gaussian(rng, PERTURB_SIGMA);
                conn.weight = conn.weight.clamp(-WEIGHT_LIMIT, WEIGHT_LIMIT);
            }
            mutated += 1;
        }

        mutated
    }

    /// Connect two distinct random nodes with a weight in [-1, 1)
    ///
    /// Any node may be a source or a target, so recurrent and input-targeting
    /// links are possible. An existing (source, target) pair is never added twice.
    pub fn mutate_link<R: Rng + ?Sized>(
        &mut self,
        ids: &mut IdAllocator,
        rng: &mut R,
    ) -> Result<u64, MutationSkip> {
        if self.nodes.len() < 2 {
            return Err(MutationSkip::TooFewNodes);
        }

        let source = self
            .nodes
            .choose(rng)
            .map(|n| n.id)
            .ok_or(MutationSkip::TooFewNodes)?;
        let targets: Vec<u64> = self
            .nodes
            .iter()
            .map(|n| n.id)
            .filter(|&id| id != source)
            .collect();
        let target = *targets.choose(rng).ok_or(MutationSkip::NoTarget)?;

        if self.has_link(source, target) {
            return Err(MutationSkip::DuplicateLink);
        }

        let weight = rng.random_range(-1.0..1.0);
        let id = self.fresh_id(ids);
        self.connections
            .push(Connection::new(id, source, target, weight));
        Ok(id)
    }

    /// Split a random enabled connection with a new hidden node
    ///
    /// The old connection is disabled. The incoming half gets weight 1.0 and
    /// the outgoing half keeps the old weight, so the path initially carries
    /// the same signal. Returns the new node id.
    pub fn mutate_node<R: Rng + ?Sized>(
        &mut self,
        ids: &mut IdAllocator,
        rng: &mut R,
    ) -> Result<u64, MutationSkip> {
        let enabled: Vec<usize> = self
            .connections
            .iter()
            .enumerate()
            .filter(|(_, c)| c.enabled)
            .map(|(pos, _)| pos)
            .collect();
        let &pos = enabled
            .choose(rng)
            .ok_or(MutationSkip::NoEligibleConnection)?;

        let split = &mut self.connections[pos];
        split.enabled = false;
        let (source, target, weight) = (split.source, split.target, split.weight);

        let node_id = self.fresh_id(ids);
        self.nodes.push(Node::new(node_id, NodeType::Hidden));

        let incoming = self.fresh_id(ids);
        self.connections
            .push(Connection::new(incoming, source, node_id, 1.0));
        let outgoing = self.fresh_id(ids);
        self.connections
            .push(Connection::new(outgoing, node_id, target, weight));

        Ok(node_id)
    }

    /// Flip `enabled` on one random connection
    pub fn mutate_toggle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<u64, MutationSkip> {
        let conn = self
            .connections
            .choose_mut(rng)
            .ok_or(MutationSkip::NoEligibleConnection)?;
        conn.enabled = !conn.enabled;
        Ok(conn.id)
    }

    /// Switch one random disabled connection back on
    pub fn mutate_re_enable<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<u64, MutationSkip> {
        let disabled: Vec<usize> = self
            .connections
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.enabled)
            .map(|(pos, _)| pos)
            .collect();
        let &pos = disabled
            .choose(rng)
            .ok_or(MutationSkip::NoEligibleConnection)?;
        let conn = &mut self.connections[pos];
        conn.enabled = true;
        Ok(conn.id)
    }

    /// With a 50% chance, nudge the stored value of one random output node
    ///
    /// The value is scratch state that the next activation resets, so this
    /// only shows up if read before then.
    pub fn mutate_bias<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<u64, MutationSkip> {
        let outputs: Vec<usize> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.node_type == NodeType::Output)
            .map(|(pos, _)| pos)
            .collect();
        if outputs.is_empty() {
            return Err(MutationSkip::NoOutputNodes);
        }
        if rng.random::<f32>() >= 0.5 {
            return Err(MutationSkip::CoinFlip);
        }

        let &pos = outputs.choose(rng).ok_or(MutationSkip::NoOutputNodes)?;
        let node = &mut self.nodes[pos];
        node.value += gaussian(rng, PERTURB_SIGMA);
        Ok(node.id)
    }
}
