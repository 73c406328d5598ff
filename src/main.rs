use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use terrarium_core::metrics::{
    init_logging, COUNTER_BIRTHS, COUNTER_DEATHS, COUNTER_DROPPED_BIRTHS, COUNTER_FAULTS, COUNTER_FEEDS,
};
use terrarium_lib::app::{frame_interval, App, AppOptions, ShutdownManager};
use terrarium_lib::model::config::AppConfig;
use terrarium_lib::model::state::Species;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Number of ticks to run (unbounded in real-time mode when omitted)
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Simulated seconds per fixed step
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f64,

    /// RNG seed, overrides the config file
    #[arg(long)]
    seed: Option<u64>,

    /// Time multiplier for real-time mode
    #[arg(long, default_value_t = 1.0)]
    speed: f64,

    /// Pace ticks against the wall clock instead of running flat out
    #[arg(long)]
    realtime: bool,

    /// Append per-tick stats as JSON lines to this file
    #[arg(long)]
    stats_out: Option<PathBuf>,

    /// Also write live events to the stats file
    #[arg(long)]
    events: bool,

    /// Number of ticks kept in the statistics history
    #[arg(long, default_value_t = 30)]
    history: usize,
}

const DEFAULT_HEADLESS_TICKS: u64 = 3600;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();
    let frame = frame_interval(args.dt)?;

    let mut config = AppConfig::load(&args.config)?;
    if args.seed.is_some() {
        config.world.seed = args.seed;
    }

    let options = AppOptions {
        history_len: args.history,
        stats_out: args.stats_out.clone(),
        log_events: args.events,
    };
    let mut app = App::new(config, options)?;
    app.world.set_speed(args.speed);

    let mut shutdown = ShutdownManager::new();
    shutdown.install_ctrl_c_handler();

    let ran = if args.realtime {
        app.run_realtime(frame, args.ticks, &shutdown).await?
    } else {
        let ticks = args.ticks.unwrap_or(DEFAULT_HEADLESS_TICKS);
        app.run_ticks(ticks, args.dt, &shutdown)?
    };

    shutdown.cleanup(&mut app)?;
    if shutdown.is_shutdown_requested() {
        shutdown.set_exit_code(130);
    }

    let metrics = &app.world.metrics;
    tracing::info!(
        ticks = ran,
        births = metrics.counter(COUNTER_BIRTHS),
        deaths = metrics.counter(COUNTER_DEATHS),
        feeds = metrics.counter(COUNTER_FEEDS),
        faults = metrics.counter(COUNTER_FAULTS),
        dropped_births = metrics.counter(COUNTER_DROPPED_BIRTHS),
        wall_secs = metrics.elapsed().as_secs_f64(),
        "Simulation finished"
    );
    if let Some(stats) = app.history.latest() {
        println!(
            "tick {} t={:.1}s  plants {} ({:+})  herbivores {} ({:+})  carnivores {} ({:+})",
            stats.tick,
            stats.sim_time,
            stats.plant_count,
            app.history.trend(Species::Plant),
            stats.herbivore_count,
            app.history.trend(Species::Herbivore),
            stats.carnivore_count,
            app.history.trend(Species::Carnivore),
        );
    }

    if shutdown.exit_code() != 0 {
        std::process::exit(shutdown.exit_code());
    }
    Ok(())
}
