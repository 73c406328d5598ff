//! Core data structures for the Terrarium simulation.

pub mod agent;
pub mod environment;
pub mod events;
