//! NEAT crossover
//!
//! Connections are the unit of genetic bookkeeping: they are aligned on
//! their innovation number and keep it in the offspring. Nodes are not
//! tracked across generations, so every offspring node gets a new id.

use ahash::{HashMap, HashSet};
use rand::Rng;

use crate::error::GenomeError;
use crate::genome::{Connection, Genome, Node};
use crate::ids::IdAllocator;

impl Genome {
    /// Combine this genome with `partner` into a new offspring
    ///
    /// Nodes from both parents are merged by id (this parent first) and
    /// re-keyed. A matching gene is inherited from either parent with equal
    /// chance; a disjoint gene is always inherited. Weights and enabled flags
    /// are copied unchanged. Fitness starts at zero.
    pub fn crossover<R: Rng + ?Sized>(
        &self,
        partner: &Genome,
        ids: &mut IdAllocator,
        rng: &mut R,
    ) -> Result<Genome, GenomeError> {
        let in_either_parent = |id: u64| self.uses_id(id) || partner.uses_id(id);

        let mut node_map: HashMap<u64, u64> = HashMap::default();
        let mut nodes = Vec::with_capacity(self.nodes.len().max(partner.nodes.len()));
        for node in self.nodes.iter().chain(&partner.nodes) {
            if node_map.contains_key(&node.id) {
                continue;
            }
            let id = ids.next_unused(&in_either_parent);
            node_map.insert(node.id, id);
            nodes.push(Node {
                id,
                ..node.clone()
            });
        }

        let own_genes: HashMap<u64, &Connection> =
            self.connections.iter().rev().map(|c| (c.id, c)).collect();
        let partner_genes: HashMap<u64, &Connection> =
            partner.connections.iter().rev().map(|c| (c.id, c)).collect();

        let remap = |conn: &Connection, node: u64| {
            node_map
                .get(&node)
                .copied()
                .ok_or(GenomeError::DanglingReference {
                    connection: conn.id,
                    node,
                })
        };

        let mut seen: HashSet<u64> = HashSet::default();
        let mut connections = Vec::with_capacity(own_genes.len().max(partner_genes.len()));
        for gene in self.connections.iter().chain(&partner.connections) {
            if !seen.insert(gene.id) {
                continue;
            }

            let inherited = match (own_genes.get(&gene.id), partner_genes.get(&gene.id)) {
                // Matching gene
                (Some(own), Some(theirs)) => {
                    if rng.random::<bool>() {
                        *own
                    } else {
                        *theirs
                    }
                }
                // Disjoint gene
                (Some(only), None) | (None, Some(only)) => *only,
                (None, None) => gene,
            };

            connections.push(Connection {
                source: remap(inherited, inherited.source)?,
                target: remap(inherited, inherited.target)?,
                ..inherited.clone()
            });
        }

        let offspring = Genome::new(nodes, connections);
        debug_assert!(offspring.validate().is_ok(), "crossover broke genome invariants");
        Ok(offspring)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::{NodeType, build_bootstrap_genome};
    use crate::mutation::MutationConfig;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    fn parent(weight: f32, extra: Option<Connection>) -> Genome {
        let mut connections = vec![Connection::new(10, 1, 3, weight)];
        connections.extend(extra);
        Genome::new(
            vec![
                Node::new(1, NodeType::Input),
                Node::new(2, NodeType::Input),
                Node::new(3, NodeType::Output),
            ],
            connections,
        )
    }

    #[test]
    fn test_matching_gene_inherited_once_unaveraged() {
        let mut ids = IdAllocator::new();
        let mut rng = Xoshiro256StarStar::seed_from_u64(1);
        let a = parent(0.25, None);
        let b = parent(-1.5, None);

        let mut from_a = 0;
        let mut from_b = 0;
        for _ in 0..100 {
            let child = a.crossover(&b, &mut ids, &mut rng).unwrap();
            let genes: Vec<&Connection> =
                child.connections.iter().filter(|c| c.id == 10).collect();
            assert_eq!(genes.len(), 1);
            match genes[0].weight {
                w if w == 0.25 => from_a += 1,
                w if w == -1.5 => from_b += 1,
                w => panic!("unexpected weight {}", w),
            }
        }
        assert!(from_a > 0 && from_b > 0);
    }

    #[test]
    fn test_disjoint_genes_always_inherited() {
        let mut ids = IdAllocator::new();
        let mut rng = Xoshiro256StarStar::seed_from_u64(2);
        let a = parent(0.5, Some(Connection::new(11, 2, 3, 0.9)));
        let mut extra = Connection::new(12, 3, 1, -0.4);
        extra.enabled = false;
        let b = parent(0.5, Some(extra));

        let child = a.crossover(&b, &mut ids, &mut rng).unwrap();
        let gene_ids: Vec<u64> = child.connections.iter().map(|c| c.id).collect();
        assert_eq!(gene_ids, vec![10, 11, 12]);

        let disabled = child.connection(12).unwrap();
        assert!(!disabled.enabled);
        assert_eq!(disabled.weight, -0.4);
    }

    #[test]
    fn test_offspring_nodes_are_rekeyed() {
        let mut ids = IdAllocator::new();
        let mut rng = Xoshiro256StarStar::seed_from_u64(3);
        let a = parent(0.5, Some(Connection::new(11, 2, 3, 0.9)));
        let b = parent(0.5, None);

        let child = a.crossover(&b, &mut ids, &mut rng).unwrap();

        // Shared node ids collapse into one offspring node each
        assert_eq!(child.nodes.len(), 3);
        for node in &child.nodes {
            assert!(!a.uses_id(node.id));
            assert!(!b.uses_id(node.id));
        }
        assert!(child.validate().is_ok());

        // Connection 10 ran input 1 -> output 3; it must follow the remap
        let gene = child.connection(10).unwrap();
        assert_eq!(child.node(gene.source).unwrap().node_type, NodeType::Input);
        assert_eq!(child.node(gene.target).unwrap().node_type, NodeType::Output);
    }

    #[test]
    fn test_union_of_distinct_node_ids() {
        let mut ids = IdAllocator::new();
        let mut rng = Xoshiro256StarStar::seed_from_u64(4);
        let a = parent(0.5, None);
        let b = Genome::new(
            vec![Node::new(20, NodeType::Input), Node::new(21, NodeType::Output)],
            vec![Connection::new(22, 20, 21, 1.0)],
        );

        let child = a.crossover(&b, &mut ids, &mut rng).unwrap();
        assert_eq!(child.nodes.len(), 5);
        assert_eq!(child.connections.len(), 2);
        assert_eq!(child.input_count(), 3);
        assert_eq!(child.output_count(), 2);
    }

    #[test]
    fn test_fitness_not_inherited() {
        let mut ids = IdAllocator::new();
        let mut rng = Xoshiro256StarStar::seed_from_u64(5);
        let mut a = parent(0.5, None);
        let mut b = parent(0.5, None);
        a.fitness = 3.0;
        b.fitness = 7.0;
        b.adjusted_fitness = 1.0;

        let child = a.crossover(&b, &mut ids, &mut rng).unwrap();
        assert_eq!(child.fitness, 0.0);
        assert_eq!(child.adjusted_fitness, 0.0);
    }

    #[test]
    fn test_dangling_parent_reference_is_reported() {
        let mut ids = IdAllocator::new();
        let mut rng = Xoshiro256StarStar::seed_from_u64(6);
        let broken = Genome::new(
            vec![Node::new(1, NodeType::Input)],
            vec![Connection::new(2, 1, 99, 1.0)],
        );
        let fine = parent(0.5, None);

        assert_eq!(
            fine.crossover(&broken, &mut ids, &mut rng).unwrap_err(),
            GenomeError::DanglingReference {
                connection: 2,
                node: 99
            }
        );
    }

    #[test]
    fn test_crossover_of_mutated_lineages() {
        let mut ids = IdAllocator::new();
        let mut rng = Xoshiro256StarStar::seed_from_u64(7);
        let founder = build_bootstrap_genome(8, 4, &mut ids, &mut rng);
        let config = MutationConfig::always();

        let mut a = founder.clone();
        let mut b = founder.clone();
        for _ in 0..10 {
            a.mutate(&config, &mut ids, &mut rng);
            b.mutate(&config, &mut ids, &mut rng);
        }

        let mut child = a.crossover(&b, &mut ids, &mut rng).unwrap();
        assert!(child.validate().is_ok());
        assert_eq!(child.input_count(), 8);
        assert_eq!(child.output_count(), 4);

        let outputs = child.activate(&[1.0; 8]).unwrap();
        assert_eq!(outputs.len(), 4);
    }
}
