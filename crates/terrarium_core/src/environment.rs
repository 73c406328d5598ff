use crate::config::EnvironmentConfig;
use crate::error::{Result, SimError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use terrarium_data::{EnvironmentState, LiveEvent};

/// Environment values that can be edited from outside the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnvironmentParam {
    Temperature,
    Rainfall,
    Pollution,
}

impl EnvironmentParam {
    pub const ALL: [EnvironmentParam; 3] = [
        EnvironmentParam::Temperature,
        EnvironmentParam::Rainfall,
        EnvironmentParam::Pollution,
    ];

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            EnvironmentParam::Temperature => "temperature",
            EnvironmentParam::Rainfall => "rainfall",
            EnvironmentParam::Pollution => "pollution",
        }
    }
}

impl fmt::Display for EnvironmentParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EnvironmentParam {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.name() == normalized)
            .ok_or_else(|| SimError::unknown_parameter(s))
    }
}

/// Ambient conditions shared by every agent in a world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub temperature: f64,
    /// Rainfall outside of droughts. External edits change this value.
    pub base_rainfall: f64,
    pub light_level: f64,
    pub pollution: f64,
    pub time_of_day: f64,
    /// Seconds of drought left, if one is active.
    pub drought_remaining: Option<f64>,
    day_duration: f64,
    min_light: f64,
    temperature_jitter: f64,
    drought_chance: f64,
    drought_rainfall_factor: f64,
    drought_max_duration: f64,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(&EnvironmentConfig::default())
    }
}

impl Environment {
    #[must_use]
    pub fn new(config: &EnvironmentConfig) -> Self {
        let mut env = Self {
            temperature: config.temperature,
            base_rainfall: config.rainfall,
            light_level: 1.0,
            pollution: config.pollution.clamp(0.0, 1.0),
            time_of_day: config.time_of_day,
            drought_remaining: None,
            day_duration: config.day_duration,
            min_light: config.min_light,
            temperature_jitter: config.temperature_jitter,
            drought_chance: config.drought_chance,
            drought_rainfall_factor: config.drought_rainfall_factor,
            drought_max_duration: config.drought_max_duration,
        };
        env.light_level = env.light_for(env.time_of_day);
        env
    }

    fn light_for(&self, time_of_day: f64) -> f64 {
        (time_of_day * std::f64::consts::PI).sin().max(self.min_light)
    }

    /// Advances the day cycle and the temperature random walk.
    pub fn update<R: Rng>(&mut self, dt: f64, rng: &mut R) {
        self.time_of_day = (self.time_of_day + dt / self.day_duration).rem_euclid(1.0);
        self.light_level = self.light_for(self.time_of_day);
        self.temperature += (rng.gen::<f64>() - 0.5) * self.temperature_jitter * dt;
    }

    /// Rolls for a drought and counts down an active one.
    ///
    /// At most one drought is active at a time.
    pub fn trigger_random_events<R: Rng>(
        &mut self,
        dt: f64,
        sim_time: f64,
        rng: &mut R,
    ) -> Vec<LiveEvent> {
        let mut events = Vec::new();
        match self.drought_remaining {
            Some(remaining) => {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    self.drought_remaining = None;
                    tracing::info!(sim_time, "Drought ended");
                    events.push(LiveEvent::DroughtEnded { sim_time });
                } else {
                    self.drought_remaining = Some(remaining);
                }
            }
            None => {
                if rng.gen::<f64>() < self.drought_chance * dt {
                    let duration = rng.gen::<f64>() * self.drought_max_duration;
                    self.drought_remaining = Some(duration);
                    tracing::info!(sim_time, duration, "Drought started");
                    events.push(LiveEvent::DroughtStarted { duration, sim_time });
                }
            }
        }
        events
    }

    #[must_use]
    pub fn is_drought(&self) -> bool {
        self.drought_remaining.is_some()
    }

    /// Rainfall after the drought reduction.
    #[must_use]
    pub fn rainfall(&self) -> f64 {
        if self.is_drought() {
            self.base_rainfall * self.drought_rainfall_factor
        } else {
            self.base_rainfall
        }
    }

    /// Applies an external edit. Non-finite values are rejected; pollution is
    /// clamped to `[0, 1]` and rainfall to non-negative values.
    pub fn set(&mut self, param: EnvironmentParam, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(SimError::invalid_value(param.name(), value));
        }
        match param {
            EnvironmentParam::Temperature => self.temperature = value,
            EnvironmentParam::Rainfall => self.base_rainfall = value.max(0.0),
            EnvironmentParam::Pollution => self.pollution = value.clamp(0.0, 1.0),
        }
        Ok(())
    }

    #[must_use]
    pub fn get(&self, param: EnvironmentParam) -> f64 {
        match param {
            EnvironmentParam::Temperature => self.temperature,
            EnvironmentParam::Rainfall => self.rainfall(),
            EnvironmentParam::Pollution => self.pollution,
        }
    }

    #[must_use]
    pub fn state(&self) -> EnvironmentState {
        EnvironmentState {
            temperature: self.temperature,
            rainfall: self.rainfall(),
            light_level: self.light_level,
            pollution: self.pollution,
            time_of_day: self.time_of_day,
            drought: self.is_drought(),
        }
    }
}
