//! Integration tests for repeated reproduction
//!
//! Drives genomes through many generations of asexual and sexual
//! reproduction the way the simulation does, checking graph invariants hold.

use ahash::HashSet;
use evogrid_neat::{
    Genome, IdAllocator, MutationConfig, NodeType, build_bootstrap_genome, choose_action,
    mutation::WEIGHT_LIMIT,
};
use rand::{Rng, SeedableRng};
use rand::seq::IndexedRandom;
use rand_xoshiro::Xoshiro256StarStar;

fn assert_no_duplicate_pairs(genome: &Genome) {
    let mut pairs = HashSet::default();
    for conn in &genome.connections {
        assert!(
            pairs.insert((conn.source, conn.target)),
            "duplicate link {} -> {}",
            conn.source,
            conn.target
        );
    }
}

#[test]
fn test_bootstrap_example_scenario() {
    let mut ids = IdAllocator::new();
    let mut rng = Xoshiro256StarStar::seed_from_u64(2024);
    let mut genome = build_bootstrap_genome(8, 4, &mut ids, &mut rng);

    assert_eq!(genome.nodes.len(), 12);
    assert_eq!(genome.input_count(), 8);
    assert_eq!(genome.output_count(), 4);
    assert!(genome.connections.len() <= 32);

    let inputs = [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
    let first = genome.activate(&inputs).unwrap();
    for _ in 0..2 {
        assert_eq!(genome.activate(&inputs).unwrap(), first);
    }
    assert!(choose_action(&first).is_some_and(|action| action < 4));
}

#[test]
fn test_asexual_lineage_keeps_invariants() {
    let mut ids = IdAllocator::new();
    let mut rng = Xoshiro256StarStar::seed_from_u64(1);
    let config = MutationConfig {
        link: 0.5,
        node: 0.2,
        re_enable: 0.05,
        ..MutationConfig::default()
    };

    let mut genome = build_bootstrap_genome(8, 4, &mut ids, &mut rng);
    for generation in 0..300 {
        let mut child = genome.clone();
        child.mutate(&config, &mut ids, &mut rng);

        assert!(child.validate().is_ok(), "generation {}", generation);
        assert_no_duplicate_pairs(&child);
        for conn in &child.connections {
            assert!((-WEIGHT_LIMIT..=WEIGHT_LIMIT).contains(&conn.weight));
        }
        assert_eq!(child.activate(&[0.5; 8]).unwrap().len(), 4);

        genome = child;
    }
    assert!(genome.hidden_count() > 0);
}

#[test]
fn test_mixed_population_reproduction() {
    let mut ids = IdAllocator::new();
    let mut rng = Xoshiro256StarStar::seed_from_u64(77);
    let config = MutationConfig {
        link: 0.3,
        node: 0.1,
        ..MutationConfig::default()
    };

    let founder = build_bootstrap_genome(8, 4, &mut ids, &mut rng);
    let mut population: Vec<Genome> = (0..8).map(|_| founder.clone()).collect();

    for _ in 0..12 {
        let mut next = Vec::with_capacity(population.len());
        for genome in &population {
            let mut child = if rng.random_bool(0.2) {
                let partner = population.choose(&mut rng).unwrap();
                let child = genome.crossover(partner, &mut ids, &mut rng).unwrap();

                for node in &child.nodes {
                    assert!(!genome.uses_id(node.id));
                    assert!(!partner.uses_id(node.id));
                }
                child
            } else {
                genome.clone()
            };
            child.mutate(&config, &mut ids, &mut rng);
            assert!(child.validate().is_ok());
            next.push(child);
        }
        population = next;
    }

    for genome in &mut population {
        let outputs = genome.activate(&[1.0; 8]).unwrap();
        assert_eq!(outputs.len(), genome.output_count());
        assert!(genome.input_count() >= 8);
        assert_eq!(
            genome.sorted_ids(NodeType::Input).len(),
            genome.input_count()
        );
    }
}
