use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

mod config;
mod run;

use crate::config::SimConfig;
use crate::run::{RunOptions, run};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of ticks to simulate
    #[arg(long, default_value = "10000")]
    ticks: u64,

    /// Override the world seed
    #[arg(long)]
    seed: Option<u64>,

    /// Log population stats every N ticks (0 to disable)
    #[arg(long, default_value = "100")]
    report_every: u64,

    /// Configuration file (RON); defaults to ./evogrid.ron if present
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = SimConfig::load(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.world.seed = seed;
    }

    if args.print_config {
        println!("{}", config.to_ron()?);
        return Ok(());
    }

    log::info!("Starting headless simulation");
    log::info!(
        "  Grid: {}x{}, seed {}",
        config.world.cols,
        config.world.rows,
        config.world.seed
    );
    log::info!("  Ticks: {}", args.ticks);

    let summary = run(
        &config,
        RunOptions {
            ticks: args.ticks,
            report_every: args.report_every,
        },
    )?;

    println!("Simulated {} ticks", summary.ticks);
    println!(
        "  Births: {}, deaths: {}, peak population: {}",
        summary.births, summary.deaths, summary.peak_population
    );
    if summary.extinct {
        println!("  Population went extinct");
    } else {
        println!("  Final: {}", summary.last);
    }

    Ok(())
}
