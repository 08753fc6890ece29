//! Headless simulation loop

use anyhow::{Context, Result};
use evogrid_sim::{TickStats, World};

use crate::config::SimConfig;

/// How long to run and how often to log
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub ticks: u64,
    /// Log a stats line every this many ticks; 0 disables periodic reports
    pub report_every: u64,
}

/// Totals over a whole run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    pub births: usize,
    pub deaths: usize,
    pub peak_population: usize,
    pub extinct: bool,
    pub last: TickStats,
}

impl RunSummary {
    fn record(&mut self, stats: &TickStats) {
        self.ticks = stats.tick;
        self.births += stats.births;
        self.deaths += stats.deaths;
        self.peak_population = self.peak_population.max(stats.population);
        self.extinct = stats.is_extinct();
        self.last = stats.clone();
    }
}

/// Run the world until the tick budget is spent or everything has died
pub fn run(config: &SimConfig, options: RunOptions) -> Result<RunSummary> {
    let mut world = World::new(config.world.clone(), config.mutation.clone())
        .context("Failed to create world")?;

    let mut summary = RunSummary {
        peak_population: world.organisms().len(),
        ..RunSummary::default()
    };

    for _ in 0..options.ticks {
        let stats = world
            .step()
            .with_context(|| format!("Simulation failed at tick {}", world.tick()))?;
        summary.record(&stats);

        if options.report_every > 0 && stats.tick % options.report_every == 0 {
            log::info!("{}", stats);
        }

        if stats.is_extinct() {
            log::warn!("Population went extinct at tick {}", stats.tick);
            break;
        }
    }

    Ok(summary)
}
