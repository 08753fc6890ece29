use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use evogrid_neat::{Genome, IdAllocator, MutationConfig, build_bootstrap_genome};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

fn evolved_genome(ids: &mut IdAllocator, rng: &mut Xoshiro256PlusPlus) -> Genome {
    let mut genome = build_bootstrap_genome(8, 4, ids, rng);
    let config = MutationConfig {
        link: 0.5,
        node: 0.3,
        ..MutationConfig::default()
    };
    for _ in 0..200 {
        genome.mutate(&config, ids, rng);
    }
    genome
}

fn bench_activation(c: &mut Criterion) {
    let mut ids = IdAllocator::new();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
    let mut bootstrap = build_bootstrap_genome(8, 4, &mut ids, &mut rng);
    let mut evolved = evolved_genome(&mut ids, &mut rng);
    let inputs = [1.0, 0.0, 0.5, 0.0, 0.0, 0.33, 0.0, 1.0];

    c.bench_function("activate_bootstrap", |b| {
        b.iter(|| bootstrap.activate(black_box(&inputs)))
    });
    c.bench_function("activate_evolved", |b| {
        b.iter(|| evolved.activate(black_box(&inputs)))
    });
}

fn bench_reproduction(c: &mut Criterion) {
    let mut ids = IdAllocator::new();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
    let a = evolved_genome(&mut ids, &mut rng);
    let b = evolved_genome(&mut ids, &mut rng);
    let config = MutationConfig::default();

    c.bench_function("clone_and_mutate", |bench| {
        bench.iter(|| {
            let mut child = a.clone();
            child.mutate(&config, &mut ids, &mut rng);
            child
        })
    });
    c.bench_function("crossover", |bench| {
        bench.iter(|| a.crossover(black_box(&b), &mut ids, &mut rng))
    });
}

criterion_group!(benches, bench_activation, bench_reproduction);
criterion_main!(benches);
