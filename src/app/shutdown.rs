//! Graceful shutdown handling for the application.
//!
//! A Ctrl-C handler flips a shared flag; the run loops poll it between ticks.

use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Manages graceful shutdown of the application.
#[derive(Clone)]
pub struct ShutdownManager {
    shutdown_requested: Arc<AtomicBool>,
    exit_code: i32,
}

impl Default for ShutdownManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownManager {
    pub fn new() -> Self {
        Self {
            shutdown_requested: Arc::new(AtomicBool::new(false)),
            exit_code: 0,
        }
    }

    /// Spawns a task that requests shutdown on Ctrl-C. Needs a Tokio runtime.
    pub fn install_ctrl_c_handler(&self) {
        let manager = self.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Ctrl+C received, initiating graceful shutdown...");
                manager.request_shutdown();
            }
        });
    }

    pub fn request_shutdown(&self) {
        self.shutdown_requested.store(true, Ordering::SeqCst);
        tracing::info!("Shutdown requested");
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::SeqCst)
    }

    pub fn set_exit_code(&mut self, code: i32) {
        self.exit_code = code;
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// Flushes the stats stream before exit.
    pub fn cleanup(&self, app: &mut crate::app::App) -> Result<()> {
        tracing::info!("Performing shutdown cleanup...");
        if app.logger.is_active() {
            app.logger.flush()?;
            tracing::info!("Stats stream flushed");
        }
        tracing::info!(
            tick = app.world.tick,
            sim_time = app.world.sim_time,
            agents = app.world.population(),
            "Cleanup complete"
        );
        Ok(())
    }
}
