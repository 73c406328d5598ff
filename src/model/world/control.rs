//! Pause, speed, environment edits and reset.

use crate::model::environment::{Environment, EnvironmentParam};
use crate::model::world::init::seeded_rng;
use crate::model::world::{TickReport, World};
use std::time::Instant;
use terrarium_core::error::SimError;
use terrarium_data::RenderEvent;

/// Wall-clock pacing for [`World::tick_at`].
#[derive(Debug, Clone, PartialEq)]
pub struct SimClock {
    paused: bool,
    speed: f64,
    /// Baseline for the next frame delta. `None` until the first frame or
    /// after a resume.
    last_instant: Option<Instant>,
}

impl Default for SimClock {
    fn default() -> Self {
        Self {
            paused: false,
            speed: 1.0,
            last_instant: None,
        }
    }
}

impl SimClock {
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[must_use]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Scales a wall-clock frame delta by the speed and caps it at
    /// `max_frame_dt`. `None` while paused.
    #[must_use]
    pub fn scaled(&self, frame_dt: f64, max_frame_dt: f64) -> Option<f64> {
        if self.paused {
            return None;
        }
        let dt = (frame_dt * self.speed).max(0.0);
        Some(if dt.is_finite() { dt.min(max_frame_dt) } else { 0.0 })
    }
}

impl World {
    /// Runs one tick from a raw frame delta, honouring pause, speed and the
    /// frame cap. Returns `None` while paused.
    pub fn advance(&mut self, frame_dt: f64) -> Option<TickReport> {
        let dt = self.clock.scaled(frame_dt, self.config.world.max_frame_dt)?;
        Some(self.step(dt))
    }

    /// Clock-driven entry point for real-time drivers.
    ///
    /// The first call after creation or a resume only records the baseline.
    pub fn tick_at(&mut self, now: Instant) -> Option<TickReport> {
        if self.clock.paused {
            return None;
        }
        let last = self.clock.last_instant.replace(now)?;
        let frame_dt = now.saturating_duration_since(last).as_secs_f64();
        self.advance(frame_dt)
    }

    pub fn pause(&mut self) {
        if !self.clock.paused {
            tracing::info!(tick = self.tick, "Simulation paused");
        }
        self.clock.paused = true;
    }

    /// Unpauses and drops the elapsed-time baseline, so time spent paused is
    /// never applied.
    pub fn resume(&mut self) {
        if self.clock.paused {
            tracing::info!(tick = self.tick, "Simulation resumed");
        }
        self.clock.paused = false;
        self.clock.last_instant = None;
    }

    /// Like [`World::resume`] but starts the new baseline at `now`.
    pub fn resume_at(&mut self, now: Instant) {
        self.resume();
        self.clock.last_instant = Some(now);
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.clock.paused
    }

    /// Sets the time multiplier. Negative or non-finite values clamp to zero.
    pub fn set_speed(&mut self, speed: f64) {
        self.clock.speed = if speed.is_finite() && speed >= 0.0 {
            speed
        } else {
            tracing::warn!(speed, "Invalid speed, clamped to 0");
            0.0
        };
    }

    #[must_use]
    pub fn speed(&self) -> f64 {
        self.clock.speed
    }

    /// Sets `temperature`, `rainfall` or `pollution` by name.
    pub fn set_environment_param(&mut self, name: &str, value: f64) -> Result<(), SimError> {
        let result = name
            .parse::<EnvironmentParam>()
            .and_then(|param| self.environment.set(param, value));
        if let Err(err) = &result {
            tracing::warn!(name, value, %err, "Rejected environment parameter");
        }
        result
    }

    /// Clears every agent and restores the initial state from the current
    /// configuration. Pause and speed are kept.
    pub fn reset(&mut self) {
        for id in self.arena.ids() {
            self.pending_render.push(RenderEvent::Removed { id });
        }
        self.pending_events.clear();
        self.rendered.clear();
        self.consumed_by.clear();
        self.arena.clear();

        self.environment = Environment::new(&self.config.environment);
        self.tick = 0;
        self.sim_time = 0.0;
        if self.config.world.seed.is_some() {
            self.rng = seeded_rng(&self.config);
        }
        self.metrics.reset();
        self.clock.last_instant = None;

        self.populate();
        tracing::info!(agents = self.arena.len(), "World reset");
    }
}
