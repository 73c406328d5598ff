//! # Terrarium
//!
//! A predator-prey-plant ecosystem. Plants photosynthesise and seed, herbivores
//! graze and flee, carnivores hunt, and all of it runs on a fixed-step,
//! seedable simulation loop.
//!
//! The engine lives in `terrarium_core`; this crate owns the [`World`]
//! orchestration, the statistics history and the headless application.
//!
//! [`World`]: model::world::World

pub mod app;
pub mod model;
