//! Error types for the simulation core.
//!
//! Simulation faults never abort a tick. These values are returned from the
//! control surface and from integration so callers can decide what to report.

use terrarium_data::AgentId;
use thiserror::Error;

/// Main error type for terrarium_core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// An environment parameter name that the control surface does not know.
    #[error("Unknown environment parameter: {0}")]
    UnknownParameter(String),

    /// A value outside the accepted domain of a parameter.
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: f64 },

    /// Kinematics became NaN or infinite during integration.
    #[error("Non-finite state on agent {0}")]
    NonFinite(AgentId),
}

/// Result type alias for terrarium_core operations.
pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    #[must_use]
    pub fn unknown_parameter<S: Into<String>>(name: S) -> Self {
        Self::UnknownParameter(name.into())
    }

    #[must_use]
    pub fn invalid_value<S: Into<String>>(name: S, value: f64) -> Self {
        Self::InvalidValue {
            name: name.into(),
            value,
        }
    }
}
