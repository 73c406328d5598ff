pub mod shutdown;
pub mod state;

pub use shutdown::ShutdownManager;
pub use state::{App, AppOptions};

use anyhow::{ensure, Context, Result};
use std::time::{Duration, Instant};

/// Shortest real-time frame accepted.
pub const MIN_FRAME: Duration = Duration::from_millis(1);

/// Validates a step length given on the command line and turns it into a
/// real-time frame, never shorter than [`MIN_FRAME`].
pub fn frame_interval(dt: f64) -> Result<Duration> {
    ensure!(
        dt.is_finite() && dt > 0.0,
        "Step length must be a positive finite number of seconds, got {dt}"
    );
    let frame = Duration::try_from_secs_f64(dt)
        .with_context(|| format!("Step length {dt} does not fit a frame duration"))?;
    Ok(frame.max(MIN_FRAME))
}

impl App {
    /// Runs up to `ticks` fixed steps of `dt` as fast as possible.
    ///
    /// Stops early when the ecosystem empties or shutdown is requested.
    /// Returns the number of ticks run.
    pub fn run_ticks(&mut self, ticks: u64, dt: f64, shutdown: &ShutdownManager) -> Result<u64> {
        let mut ran = 0;
        while ran < ticks && self.running && !shutdown.is_shutdown_requested() {
            let report = self.world.step(dt);
            self.record(&report)?;
            ran += 1;
        }
        self.logger.flush()?;
        Ok(ran)
    }

    /// Paces the world against the wall clock, one frame every `frame`.
    ///
    /// Pause and speed are honoured through [`World::tick_at`]. A `max_ticks`
    /// of `None` runs until shutdown.
    ///
    /// [`World::tick_at`]: crate::model::world::World::tick_at
    pub async fn run_realtime(
        &mut self,
        frame: Duration,
        max_ticks: Option<u64>,
        shutdown: &ShutdownManager,
    ) -> Result<u64> {
        let mut interval = tokio::time::interval(frame);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut ran = 0;

        self.world.resume_at(Instant::now());
        while self.running && !shutdown.is_shutdown_requested() {
            if max_ticks.is_some_and(|max| ran >= max) {
                break;
            }
            interval.tick().await;
            if let Some(report) = self.world.tick_at(Instant::now()) {
                self.record(&report)?;
                ran += 1;
            }
        }
        self.logger.flush()?;
        Ok(ran)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::{AppConfig, WorldConfig};

    fn config() -> AppConfig {
        AppConfig {
            world: WorldConfig {
                seed: Some(21),
                initial_plants: 10,
                initial_herbivores: 3,
                initial_carnivores: 1,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_run_ticks_fills_history() {
        let options = AppOptions {
            history_len: 5,
            ..Default::default()
        };
        let mut app = App::new(config(), options).expect("app");
        let ran = app
            .run_ticks(12, 0.1, &ShutdownManager::new())
            .expect("run");
        assert_eq!(ran, 12);
        assert_eq!(app.history.len(), 5);
        assert_eq!(app.history.latest().map(|s| s.tick), Some(12));
    }

    #[test]
    fn test_shutdown_stops_run() {
        let mut app = App::new(config(), AppOptions::default()).expect("app");
        let shutdown = ShutdownManager::new();
        shutdown.request_shutdown();
        assert_eq!(app.run_ticks(10, 0.1, &shutdown).expect("run"), 0);
    }

    #[test]
    fn test_stats_stream_written() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("stats.jsonl");
        let options = AppOptions {
            stats_out: Some(path.clone()),
            log_events: true,
            ..Default::default()
        };
        let mut app = App::new(config(), options).expect("app");
        app.run_ticks(3, 0.1, &ShutdownManager::new()).expect("run");

        let content = std::fs::read_to_string(&path).expect("read");
        let stats_lines = content
            .lines()
            .filter_map(|l| serde_json::from_str::<serde_json::Value>(l).ok())
            .filter(|v| v.get("plant_count").is_some())
            .count();
        assert_eq!(stats_lines, 3);
        // Seeding births are reported with the first tick.
        assert!(content.contains("\"event\":\"Birth\""));
    }

    #[test]
    fn test_frame_interval_rejects_bad_steps() {
        for dt in [0.0, -0.5, f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 1e300] {
            assert!(frame_interval(dt).is_err(), "dt {dt} accepted");
        }
        assert_eq!(frame_interval(0.25).expect("valid"), Duration::from_millis(250));
        assert_eq!(frame_interval(1e-6).expect("valid"), MIN_FRAME);
    }

    #[tokio::test]
    async fn test_realtime_runs_bounded() {
        let mut app = App::new(config(), AppOptions::default()).expect("app");
        let ran = app
            .run_realtime(Duration::from_millis(1), Some(3), &ShutdownManager::new())
            .await
            .expect("run");
        assert_eq!(ran, 3);
        assert_eq!(app.world.tick, 3);
    }
}
