//! Simulation configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest priority):
//! 1. Compiled defaults
//! 2. `evogrid.ron` in the working directory (if exists), or the file given
//!    with `--config`
//! 3. Environment variables prefixed with `EVOGRID_`
//!
//! Example environment variable: `EVOGRID_WORLD__CROSSOVER_RATE=0.5`

use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use evogrid_neat::MutationConfig;
use evogrid_sim::WorldConfig;
use serde::{Deserialize, Serialize};

/// Everything a run needs besides the CLI switches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SimConfig {
    #[serde(default)]
    pub world: WorldConfig,

    #[serde(default)]
    pub mutation: MutationConfig,
}

impl SimConfig {
    /// Load configuration with layered priority
    ///
    /// An explicit `path` must exist; the implicit `evogrid.ron` is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let world = WorldConfig::default();
        let mutation = MutationConfig::default();

        let file = match path {
            Some(path) => File::from(path).format(FileFormat::Ron).required(true),
            None => File::with_name("evogrid")
                .format(FileFormat::Ron)
                .required(false),
        };

        let builder = Config::builder()
            // Layer 1: Compiled defaults
            .set_default("world.cols", i64::from(world.cols))?
            .set_default("world.rows", i64::from(world.rows))?
            .set_default("world.initial_organisms", world.initial_organisms as i64)?
            .set_default("world.initial_food", world.initial_food as i64)?
            .set_default("world.max_food", world.max_food as i64)?
            .set_default("world.food_energy", f64::from(world.food_energy))?
            .set_default("world.food_spawn_rate", f64::from(world.food_spawn_rate))?
            .set_default("world.metabolism", f64::from(world.metabolism))?
            .set_default("world.initial_energy", f64::from(world.initial_energy))?
            .set_default(
                "world.reproduction_threshold",
                f64::from(world.reproduction_threshold),
            )?
            .set_default("world.crossover_rate", f64::from(world.crossover_rate))?
            .set_default("world.seed", world.seed)?
            .set_default("mutation.weight", f64::from(mutation.weight))?
            .set_default("mutation.link", f64::from(mutation.link))?
            .set_default("mutation.node", f64::from(mutation.node))?
            .set_default("mutation.toggle", f64::from(mutation.toggle))?
            .set_default("mutation.re_enable", f64::from(mutation.re_enable))?
            .set_default("mutation.bias", f64::from(mutation.bias))?
            // Layer 2: Config file
            .add_source(file)
            // Layer 3: Environment variables (EVOGRID_WORLD__SEED, etc.)
            .add_source(
                Environment::with_prefix("EVOGRID")
                    .prefix_separator("_")
                    .separator("__"),
            );

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Render as RON, the same format the config file uses
    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .context("Failed to serialize configuration")
    }
}
