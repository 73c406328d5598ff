//! Configuration management for simulation parameters.
//!
//! This module provides strongly-typed configuration structures that map to
//! the `config.toml` file. All simulation parameters can be customized through
//! this configuration system.
//!
//! ## Configuration Hierarchy
//!
//! 1. Default values (hardcoded in `Default` impls)
//! 2. `config.toml` file (overrides defaults, missing keys fall back)
//! 3. Command line flags of the headless driver (seed, speed)
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [world]
//! half_extent = 49.0
//! initial_plants = 40
//! seed = 42
//!
//! [herbivore]
//! hunger_threshold = 100.0
//! reproduction_cost = 80.0
//! ```

use anyhow::Context;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use std::path::Path;

/// World-level simulation configuration.
///
/// Defines the bounds of the world, the initial population and the guards
/// applied to the clock and to population growth.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Offspring positions are clamped to `[-half_extent, half_extent]` on X and Z.
    pub half_extent: f64,
    pub ground_height: f64,
    pub initial_plants: usize,
    pub initial_herbivores: usize,
    pub initial_carnivores: usize,
    /// Soft cap; births that would exceed it are dropped.
    pub max_population: usize,
    pub seed: Option<u64>,
    /// Upper bound on a single clock-derived step, in simulated seconds.
    pub max_frame_dt: f64,
    /// Ticks between periodic summary log lines.
    pub log_interval: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            half_extent: 49.0,
            ground_height: 0.0,
            initial_plants: 40,
            initial_herbivores: 12,
            initial_carnivores: 4,
            max_population: 2000,
            seed: None,
            max_frame_dt: 0.25,
            log_interval: 1000,
        }
    }
}

/// Ambient state defaults and random-event tuning.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub temperature: f64,
    pub rainfall: f64,
    pub pollution: f64,
    pub time_of_day: f64,
    /// Seconds of simulated time for a full day-night cycle.
    pub day_duration: f64,
    /// Minimum light level reached at night.
    pub min_light: f64,
    /// Amplitude of the random temperature walk, per second.
    pub temperature_jitter: f64,
    /// Drought probability per second of simulated time.
    pub drought_chance: f64,
    pub drought_rainfall_factor: f64,
    pub drought_max_duration: f64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            temperature: 25.0,
            rainfall: 50.0,
            pollution: 0.0,
            time_of_day: 0.5,
            day_duration: 60.0,
            min_light: 0.1,
            temperature_jitter: 0.1,
            drought_chance: 0.001,
            drought_rainfall_factor: 0.1,
            drought_max_duration: 10.0,
        }
    }
}

/// Tuning shared by every mobile agent's state machine.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AiConfig {
    /// Seconds between wander heading changes.
    pub wander_interval: f64,
    /// Wander speed as a fraction of max speed.
    pub wander_speed_fraction: f64,
    /// Forward push applied every wander tick, as a fraction of max force.
    pub forward_bias: f64,
    /// A flee ends once the threat is farther than `flee_radius * flee_hysteresis`.
    pub flee_hysteresis: f64,
    /// Length of the post-mating rest, in simulated seconds.
    pub rest_duration: f64,
    /// Velocity multiplier applied after a bite or a mating.
    pub action_damping: f64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            wander_interval: 5.0,
            wander_speed_fraction: 0.5,
            forward_bias: 0.1,
            flee_hysteresis: 1.5,
            rest_duration: 0.5,
            action_damping: 0.1,
        }
    }
}

/// Per-species attributes copied into every new agent.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SpeciesConfig {
    /// Initial agents are scattered uniformly in `[-spawn_extent, spawn_extent)` on X and Z.
    pub spawn_extent: f64,
    pub initial_energy: f64,
    pub max_energy: f64,
    pub size: f64,
    /// Uniform random addition to `size` at creation.
    pub size_jitter: f64,
    pub min_size: f64,
    pub max_size: f64,
    pub max_age: f64,
    pub max_age_jitter: f64,
    pub max_speed: f64,
    pub max_speed_jitter: f64,
    pub max_force: f64,
    pub metabolic_rate: f64,
    pub perception_radius: f64,
    pub flee_radius: f64,
    pub feed_epsilon: f64,
    pub mate_epsilon: f64,
    pub hunger_threshold: f64,
    pub reproduction_threshold: f64,
    pub reproduction_cooldown: f64,
    pub reproduction_cost: f64,
    pub offspring_energy_fraction: f64,
    pub feed_amount: f64,
    pub feed_source_fraction: f64,
    pub feed_drain_multiplier: f64,
    pub feed_cooldown: f64,
    pub growth_rate: f64,
}

impl Default for SpeciesConfig {
    fn default() -> Self {
        SpeciesConfig::herbivore()
    }
}

impl SpeciesConfig {
    #[must_use]
    pub fn plant() -> Self {
        Self {
            spawn_extent: 25.0,
            initial_energy: 50.0,
            max_energy: 1000.0,
            size: 0.5,
            size_jitter: 0.5,
            min_size: 0.5,
            max_size: 2.0,
            max_age: 50.0,
            max_age_jitter: 50.0,
            max_speed: 0.0,
            max_speed_jitter: 0.0,
            max_force: 0.0,
            metabolic_rate: 0.0,
            perception_radius: 5.0,
            flee_radius: 8.0,
            feed_epsilon: 0.0,
            mate_epsilon: 0.0,
            hunger_threshold: 0.0,
            reproduction_threshold: 80.0,
            reproduction_cooldown: 0.0,
            reproduction_cost: 0.0,
            offspring_energy_fraction: 0.4,
            feed_amount: 0.0,
            feed_source_fraction: 0.0,
            feed_drain_multiplier: 0.0,
            feed_cooldown: 0.0,
            growth_rate: 0.5,
        }
    }

    #[must_use]
    pub fn herbivore() -> Self {
        Self {
            spawn_extent: 20.0,
            initial_energy: 150.0,
            max_energy: 250.0,
            size: 1.2,
            size_jitter: 0.0,
            min_size: 1.2,
            max_size: 1.2,
            max_age: 100.0,
            max_age_jitter: 0.0,
            max_speed: 1.5,
            max_speed_jitter: 0.5,
            max_force: 0.1,
            metabolic_rate: 0.1,
            perception_radius: 10.0,
            flee_radius: 12.0,
            feed_epsilon: 0.2,
            mate_epsilon: 1.2,
            hunger_threshold: 100.0,
            reproduction_threshold: 200.0,
            reproduction_cooldown: 15.0,
            reproduction_cost: 80.0,
            offspring_energy_fraction: 0.8,
            feed_amount: 50.0,
            feed_source_fraction: 0.8,
            feed_drain_multiplier: 1.2,
            feed_cooldown: 1.0,
            growth_rate: 0.0,
        }
    }

    #[must_use]
    pub fn carnivore() -> Self {
        Self {
            spawn_extent: 15.0,
            initial_energy: 200.0,
            max_energy: 400.0,
            size: 1.5,
            size_jitter: 0.0,
            min_size: 1.5,
            max_size: 1.5,
            max_age: 100.0,
            max_age_jitter: 0.0,
            max_speed: 2.0,
            max_speed_jitter: 0.8,
            max_force: 0.1,
            metabolic_rate: 0.1,
            perception_radius: 15.0,
            flee_radius: 8.0,
            feed_epsilon: 0.3,
            mate_epsilon: 1.5,
            hunger_threshold: 150.0,
            reproduction_threshold: 300.0,
            reproduction_cooldown: 25.0,
            reproduction_cost: 120.0,
            offspring_energy_fraction: 0.8,
            feed_amount: 100.0,
            feed_source_fraction: 1.0,
            feed_drain_multiplier: 1.5,
            feed_cooldown: 5.0,
            growth_rate: 0.0,
        }
    }

    fn validate(&self, name: &str) -> anyhow::Result<()> {
        anyhow::ensure!(self.spawn_extent >= 0.0, "{name}: spawn extent must be non-negative");
        anyhow::ensure!(self.max_energy > 0.0, "{name}: max energy must be positive");
        anyhow::ensure!(
            self.initial_energy > 0.0 && self.initial_energy <= self.max_energy,
            "{name}: initial energy must be in (0, max_energy]"
        );
        anyhow::ensure!(
            self.min_size > 0.0 && self.min_size <= self.max_size,
            "{name}: size bounds must satisfy 0 < min_size <= max_size"
        );
        anyhow::ensure!(
            self.size >= self.min_size && self.size + self.size_jitter <= self.max_size,
            "{name}: initial size range must lie within [min_size, max_size]"
        );
        anyhow::ensure!(self.max_age > 0.0, "{name}: max age must be positive");
        anyhow::ensure!(
            self.max_age_jitter >= 0.0
                && self.max_speed >= 0.0
                && self.max_speed_jitter >= 0.0
                && self.max_force >= 0.0,
            "{name}: speed, force and jitter values must be non-negative"
        );
        anyhow::ensure!(self.metabolic_rate >= 0.0, "{name}: metabolic rate must be non-negative");
        anyhow::ensure!(
            self.perception_radius >= 0.0 && self.flee_radius >= 0.0,
            "{name}: radii must be non-negative"
        );
        anyhow::ensure!(
            self.reproduction_cooldown >= 0.0 && self.feed_cooldown >= 0.0,
            "{name}: cooldowns must be non-negative"
        );
        anyhow::ensure!(self.reproduction_cost >= 0.0, "{name}: reproduction cost must be non-negative");
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.offspring_energy_fraction),
            "{name}: offspring energy fraction must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.feed_source_fraction),
            "{name}: feed source fraction must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.feed_amount >= 0.0 && self.feed_drain_multiplier >= 0.0,
            "{name}: feed amount and drain multiplier must be non-negative"
        );
        anyhow::ensure!(self.growth_rate >= 0.0, "{name}: growth rate must be non-negative");
        Ok(())
    }
}

/// Plant growth and asexual reproduction rules.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PlantGrowthConfig {
    /// Seeded plants start with `size * energy_per_size` energy. Zero falls
    /// back to `plant.initial_energy`.
    pub energy_per_size: f64,
    /// Growth potential per second as a fraction of current energy.
    pub growth_fraction: f64,
    /// Energy spent per unit of size gained.
    pub growth_cost: f64,
    /// Maintenance drain per unit of size per second.
    pub maintenance_rate: f64,
    /// Reproduction requires `size > max_size * reproduction_size_fraction`.
    pub reproduction_size_fraction: f64,
    /// Reproduction probability per second once eligible.
    pub reproduction_chance: f64,
    /// Offspring land within `±offspring_scatter` of the parent on X and Z.
    pub offspring_scatter: f64,
}

impl Default for PlantGrowthConfig {
    fn default() -> Self {
        Self {
            energy_per_size: 20.0,
            growth_fraction: 0.01,
            growth_cost: 10.0,
            maintenance_rate: 0.05,
            reproduction_size_fraction: 0.8,
            reproduction_chance: 0.01,
            offspring_scatter: 2.0,
        }
    }
}

/// Thresholds below which a renderer is not notified of a change.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    pub position_epsilon: f64,
    pub size_epsilon: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            position_epsilon: 0.01,
            size_epsilon: 1e-6,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub world: WorldConfig,
    pub environment: EnvironmentConfig,
    pub ai: AiConfig,
    #[serde(deserialize_with = "plant_section")]
    pub plant: SpeciesConfig,
    pub plant_growth: PlantGrowthConfig,
    #[serde(deserialize_with = "herbivore_section")]
    pub herbivore: SpeciesConfig,
    #[serde(deserialize_with = "carnivore_section")]
    pub carnivore: SpeciesConfig,
    pub render: RenderConfig,
}

/// Overlays a partial species section on that species' own defaults.
fn merge_species<'de, D: Deserializer<'de>>(
    base: SpeciesConfig,
    deserializer: D,
) -> Result<SpeciesConfig, D::Error> {
    let overrides = toml::Table::deserialize(deserializer)?;
    let toml::Value::Table(mut merged) = toml::Value::try_from(base).map_err(D::Error::custom)? else {
        return Err(D::Error::custom("species defaults are not a table"));
    };
    merged.extend(overrides);
    toml::Value::Table(merged).try_into().map_err(D::Error::custom)
}

fn plant_section<'de, D: Deserializer<'de>>(d: D) -> Result<SpeciesConfig, D::Error> {
    merge_species(SpeciesConfig::plant(), d)
}

fn herbivore_section<'de, D: Deserializer<'de>>(d: D) -> Result<SpeciesConfig, D::Error> {
    merge_species(SpeciesConfig::herbivore(), d)
}

fn carnivore_section<'de, D: Deserializer<'de>>(d: D) -> Result<SpeciesConfig, D::Error> {
    merge_species(SpeciesConfig::carnivore(), d)
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            environment: EnvironmentConfig::default(),
            ai: AiConfig::default(),
            plant: SpeciesConfig::plant(),
            plant_growth: PlantGrowthConfig::default(),
            herbivore: SpeciesConfig::herbivore(),
            carnivore: SpeciesConfig::carnivore(),
            render: RenderConfig::default(),
        }
    }
}

impl AppConfig {
    #[must_use]
    pub fn species(&self, species: terrarium_data::Species) -> &SpeciesConfig {
        match species {
            terrarium_data::Species::Plant => &self.plant,
            terrarium_data::Species::Herbivore => &self.herbivore,
            terrarium_data::Species::Carnivore => &self.carnivore,
        }
    }

    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a description
    /// of the first validation failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        // World validation
        anyhow::ensure!(self.world.half_extent > 0.0, "World half extent must be positive");
        anyhow::ensure!(
            self.world.half_extent <= 10_000.0,
            "World half extent too large (max 10000)"
        );
        anyhow::ensure!(
            self.world.initial_plants + self.world.initial_herbivores + self.world.initial_carnivores
                <= self.world.max_population,
            "Initial population exceeds max population"
        );
        anyhow::ensure!(
            self.world.max_population <= 100_000,
            "Max population too large (max 100000)"
        );
        anyhow::ensure!(self.world.max_frame_dt > 0.0, "Max frame dt must be positive");
        anyhow::ensure!(self.world.log_interval > 0, "Log interval must be positive");

        // Environment validation
        anyhow::ensure!(
            self.environment.day_duration > 0.0,
            "Day duration must be positive"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.environment.pollution),
            "Pollution must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            (0.0..1.0).contains(&self.environment.time_of_day),
            "Time of day must be in [0.0, 1.0)"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.environment.min_light),
            "Min light must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.environment.rainfall >= 0.0,
            "Rainfall must be non-negative"
        );
        anyhow::ensure!(
            self.environment.drought_chance >= 0.0 && self.environment.drought_max_duration >= 0.0,
            "Drought chance and duration must be non-negative"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.environment.drought_rainfall_factor)
                && self.environment.drought_rainfall_factor > 0.0,
            "Drought rainfall factor must be in (0.0, 1.0]"
        );

        // AI validation
        anyhow::ensure!(self.ai.wander_interval >= 0.0, "Wander interval must be non-negative");
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.ai.wander_speed_fraction),
            "Wander speed fraction must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.ai.flee_hysteresis >= 1.0,
            "Flee hysteresis must be at least 1.0"
        );
        anyhow::ensure!(self.ai.rest_duration >= 0.0, "Rest duration must be non-negative");
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.ai.action_damping),
            "Action damping must be in [0.0, 1.0]"
        );

        // Species validation
        self.plant.validate("plant")?;
        self.herbivore.validate("herbivore")?;
        self.carnivore.validate("carnivore")?;

        anyhow::ensure!(
            self.plant_growth.reproduction_chance >= 0.0,
            "Plant reproduction chance must be non-negative"
        );
        anyhow::ensure!(
            self.plant_growth.offspring_scatter >= 0.0,
            "Plant offspring scatter must be non-negative"
        );

        anyhow::ensure!(
            self.render.position_epsilon >= 0.0 && self.render.size_epsilon >= 0.0,
            "Render epsilons must be non-negative"
        );

        Ok(())
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from `path`, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!(path = %path.display(), "No config file found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("parsing {}", path.display()))
    }

    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.world).as_bytes());
        hasher.update(format!("{:?}", self.environment).as_bytes());
        hasher.update(format!("{:?}", self.ai).as_bytes());
        hasher.update(format!("{:?}", self.plant).as_bytes());
        hasher.update(format!("{:?}", self.plant_growth).as_bytes());
        hasher.update(format!("{:?}", self.herbivore).as_bytes());
        hasher.update(format!("{:?}", self.carnivore).as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_half_extent() {
        let config = AppConfig {
            world: WorldConfig {
                half_extent: 0.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_initial_population_over_cap() {
        let config = AppConfig {
            world: WorldConfig {
                initial_plants: 10,
                max_population: 5,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_pollution() {
        let config = AppConfig {
            environment: EnvironmentConfig {
                pollution: 1.5,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_flee_hysteresis_below_one() {
        let config = AppConfig {
            ai: AiConfig {
                flee_hysteresis: 0.9,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_species_initial_energy_above_max() {
        let mut config = AppConfig::default();
        config.herbivore.initial_energy = 500.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [world]
            seed = 7
            initial_plants = 3

            [carnivore]
            hunger_threshold = 120.0
            "#,
        )
        .expect("partial config should parse");
        assert_eq!(config.world.seed, Some(7));
        assert_eq!(config.world.initial_plants, 3);
        assert_eq!(config.world.initial_herbivores, 12);
        assert_eq!(config.carnivore.hunger_threshold, 120.0);
        assert_eq!(config.carnivore.feed_amount, 100.0);
    }

    #[test]
    fn test_from_toml_rejects_invalid_values() {
        let result = AppConfig::from_toml(
            r#"
            [ai]
            wander_speed_fraction = 2.0
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = AppConfig::load("definitely/not/here/config.toml").expect("defaults");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_fingerprint_consistency() {
        let config1 = AppConfig::default();
        let config2 = AppConfig::default();
        assert_eq!(config1.fingerprint(), config2.fingerprint());

        let mut config3 = AppConfig::default();
        config3.herbivore.feed_amount = 51.0;
        assert_ne!(config1.fingerprint(), config3.fingerprint());
    }
}
