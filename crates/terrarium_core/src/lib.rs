//! # Terrarium Core
//!
//! The deterministic simulation engine behind Terrarium, a small
//! predator-prey-plant ecosystem.
//!
//! This crate contains:
//! - Configuration with validation and fingerprinting
//! - The id-keyed agent arena and brute-force spatial queries
//! - Agent physics, survival and steering
//! - Species capabilities and plant growth
//! - Feeding and mating interactions
//! - The finite-state AI and per-tick systems
//! - Metrics collection and structured logging
//!
//! ## Example
//!
//! ```
//! use glam::DVec3;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use terrarium_core::config::AppConfig;
//! use terrarium_core::lifecycle::{create_agent_with, AgentLogic};
//! use terrarium_data::Species;
//!
//! let config = AppConfig::default();
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let mut rabbit = create_agent_with(Species::Herbivore, DVec3::ZERO, None, &config, &mut rng);
//!
//! rabbit.integrate(1.0, 0.0).unwrap();
//! assert!(rabbit.energy() < 150.0);
//! ```

/// Id-keyed agent storage with species indices
pub mod arena;
/// Configuration management for simulation parameters
pub mod config;
/// Ambient state: day cycle, temperature, droughts
pub mod environment;
/// Error types for the simulation core
pub mod error;
/// Feeding and mating between two agents
pub mod interaction;
/// Agent physics, survival and creation
pub mod lifecycle;
/// Performance metrics collection and logging
pub mod metrics;
/// Read-only world snapshots for observers
pub mod snapshot;
/// Nearest-neighbour and radius queries
pub mod spatial;
/// Species capability table and plant rules
pub mod species;
/// Wander, seek and flee forces
pub mod steering;
/// Per-tick systems (behavior, threat pressure, statistics)
pub mod systems;

pub use arena::Arena;
pub use config::AppConfig;
pub use environment::{Environment, EnvironmentParam};
pub use error::{Result, SimError};
pub use lifecycle::{AgentLogic, BirthRequest};
pub use metrics::{init_logging, Metrics};
pub use species::SpeciesLogic;
