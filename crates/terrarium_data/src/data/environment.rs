use serde::{Deserialize, Serialize};

/// Read-only copy of the ambient state handed to observers.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EnvironmentState {
    /// Degrees Celsius.
    pub temperature: f64,
    /// Effective rainfall, already reduced while a drought is active.
    pub rainfall: f64,
    /// 0.1 (night floor) to 1.0 (noon).
    pub light_level: f64,
    /// 0.0 (clean) to 1.0 (highly polluted).
    pub pollution: f64,
    /// Fraction of the day cycle: 0.0 is midnight, 0.5 is noon.
    pub time_of_day: f64,
    pub drought: bool,
}

