use evogrid_neat::MutationConfig;
use evogrid_sim::{Cell, World, WorldConfig};

fn run(config: WorldConfig, mutation: MutationConfig, ticks: usize) -> Vec<evogrid_sim::TickStats> {
    let mut world = World::new(config, mutation).unwrap();
    let mut history = Vec::with_capacity(ticks);
    for _ in 0..ticks {
        let stats = world.step().unwrap();
        let extinct = stats.is_extinct();
        history.push(stats);
        if extinct {
            break;
        }
    }
    history
}

#[test]
fn same_seed_same_history() {
    let a = run(WorldConfig::default(), MutationConfig::default(), 300);
    let b = run(WorldConfig::default(), MutationConfig::default(), 300);
    assert_eq!(a, b);
}

#[test]
fn different_seed_diverges() {
    let a = run(WorldConfig::default(), MutationConfig::default(), 200);
    let b = run(
        WorldConfig {
            seed: 7,
            ..WorldConfig::default()
        },
        MutationConfig::default(),
        200,
    );
    assert_ne!(a, b);
}

#[test]
fn genomes_stay_valid_under_heavy_mutation() {
    let config = WorldConfig {
        cols: 16,
        rows: 16,
        initial_organisms: 12,
        initial_food: 80,
        max_food: 120,
        food_spawn_rate: 1.0,
        food_energy: 0.6,
        reproduction_threshold: 1.4,
        crossover_rate: 0.5,
        ..WorldConfig::default()
    };
    let mut world = World::new(config, MutationConfig::always()).unwrap();

    for _ in 0..150 {
        let stats = world.step().unwrap();
        world.validate().unwrap();
        if stats.is_extinct() {
            break;
        }
    }
}

#[test]
fn grid_and_population_agree() {
    let mut world = World::new(WorldConfig::default(), MutationConfig::default()).unwrap();

    for _ in 0..250 {
        let stats = world.step().unwrap();

        let occupied = (0..world.grid().rows())
            .flat_map(|y| (0..world.grid().cols()).map(move |x| glam::IVec2::new(x, y)))
            .filter(|&pos| matches!(world.grid().get(pos), Cell::Organism(_)))
            .count();
        assert_eq!(occupied, stats.population);
        assert!(stats.food <= world.config().max_food.max(world.config().initial_food) + 1);

        for organism in world.organisms() {
            assert!(organism.is_alive());
            assert_eq!(world.grid().get(organism.position), Cell::Organism(organism.id));
        }

        if stats.is_extinct() {
            break;
        }
    }
}

#[test]
fn starving_world_goes_extinct() {
    let config = WorldConfig {
        initial_food: 0,
        food_spawn_rate: 0.0,
        metabolism: 0.25,
        ..WorldConfig::default()
    };
    let history = run(config, MutationConfig::default(), 100);

    let last = history.last().unwrap();
    assert!(last.is_extinct());
    assert_eq!(last.tick, 4);
    assert_eq!(history.iter().map(|s| s.deaths).sum::<usize>(), 10);
}
