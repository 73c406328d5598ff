/// Finite-state AI: decision and state actions
pub mod behavior;
/// Threat pressure applied after every agent has stepped
pub mod interaction;
/// Per-tick population statistics
pub mod stats;
