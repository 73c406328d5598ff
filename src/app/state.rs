use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::model::config::AppConfig;
use crate::model::history::{HistoryLogger, StatsHistory, DEFAULT_HISTORY_LEN};
use crate::model::world::{TickReport, World};

/// Options of the headless runner that are not part of the simulation
/// configuration.
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub history_len: usize,
    /// JSON-lines file receiving per-tick stats and live events.
    pub stats_out: Option<PathBuf>,
    /// Also write births, deaths and feeds to `stats_out`.
    pub log_events: bool,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            history_len: DEFAULT_HISTORY_LEN,
            stats_out: None,
            log_events: false,
        }
    }
}

pub struct App {
    pub running: bool,
    pub world: World,
    pub history: StatsHistory,
    pub logger: HistoryLogger,
    pub options: AppOptions,
}

impl App {
    pub fn new(config: AppConfig, options: AppOptions) -> Result<Self> {
        let world = World::new(config).context("Failed to create world")?;
        let logger = match &options.stats_out {
            Some(path) => HistoryLogger::new_at(path)
                .with_context(|| format!("Failed to open stats output {}", path.display()))?,
            None => HistoryLogger::new_dummy(),
        };
        Ok(Self {
            running: true,
            world,
            history: StatsHistory::new(options.history_len),
            logger,
            options,
        })
    }

    /// Records one tick's report in the history and the stats stream.
    pub fn record(&mut self, report: &TickReport) -> Result<()> {
        self.history.push(report.stats);
        self.logger.log_stats(&report.stats)?;
        if self.options.log_events {
            for event in &report.events {
                self.logger.log_event(event)?;
            }
        }
        if report.stats.total == 0 {
            tracing::info!(tick = report.stats.tick, "Ecosystem is empty, stopping");
            self.running = false;
        }
        Ok(())
    }

    /// Resets the world and forgets the recorded history.
    pub fn reset(&mut self) {
        self.world.reset();
        self.history.clear();
    }
}
