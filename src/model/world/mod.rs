use crate::model::config::AppConfig;
use crate::model::environment::Environment;
use crate::model::snapshot::{AgentSnapshot, WorldSnapshot};
use glam::DVec3;
use rand_chacha::ChaCha8Rng;
use std::collections::{BTreeMap, HashMap};
use terrarium_core::arena::Arena;
use terrarium_core::metrics::Metrics;
use terrarium_core::spatial;
use terrarium_core::systems::stats::{collect_tick_stats, StatsContext};
use terrarium_data::{Agent, AgentId, LiveEvent, RenderEvent, Species, TickStats};

pub mod control;
pub mod finalize;
pub mod init;
pub mod update;

pub use control::SimClock;

/// Everything one tick produced, handed to observers by value.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub stats: TickStats,
    pub events: Vec<LiveEvent>,
    pub render: Vec<RenderEvent>,
}

/// Last position and size reported to the renderer for one agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Rendered {
    pub position: DVec3,
    pub size: f64,
}

/// The ecosystem: owner of every agent, the environment and the clock.
///
/// Agents enter only through [`World::insert_agent`] and leave only through
/// the removal pass at the end of a tick.
pub struct World {
    pub tick: u64,
    /// Simulated seconds since creation or the last reset.
    pub sim_time: f64,
    pub arena: Arena,
    pub environment: Environment,
    pub config: AppConfig,
    pub rng: ChaCha8Rng,
    pub metrics: Metrics,
    pub clock: SimClock,
    pub(crate) rendered: BTreeMap<AgentId, Rendered>,
    pub(crate) pending_render: Vec<RenderEvent>,
    pub(crate) pending_events: Vec<LiveEvent>,
    /// Killer of each agent drained to death this tick.
    pub(crate) consumed_by: HashMap<AgentId, AgentId>,
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("tick", &self.tick)
            .field("sim_time", &self.sim_time)
            .field("agents", &self.arena.len())
            .field("paused", &self.clock.is_paused())
            .finish()
    }
}

impl World {
    #[must_use]
    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.arena.get(id)
    }

    /// Agents of one species in ascending id order.
    pub fn agents_of(&self, species: Species) -> impl Iterator<Item = &Agent> + '_ {
        self.arena.of_species(species)
    }

    #[must_use]
    pub fn population(&self) -> usize {
        self.arena.len()
    }

    /// Nearest live agent of `species` strictly within `max_distance` of `source`.
    #[must_use]
    pub fn find_nearest(&self, source: AgentId, species: Species, max_distance: f64) -> Option<AgentId> {
        let source = self.arena.get(source)?;
        spatial::find_nearest(source, self.arena.of_species(species), max_distance).map(|a| a.id)
    }

    /// Live agents of `species` strictly within `radius` of `position`.
    #[must_use]
    pub fn in_radius(&self, position: DVec3, radius: f64, species: Species) -> Vec<AgentId> {
        spatial::in_radius(position, radius, self.arena.of_species(species))
            .into_iter()
            .map(|a| a.id)
            .collect()
    }

    /// Statistics for the current state without advancing time.
    #[must_use]
    pub fn stats(&self) -> TickStats {
        collect_tick_stats(StatsContext {
            arena: &self.arena,
            environment: &self.environment,
            sim_time: self.sim_time,
            tick: self.tick,
        })
    }

    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.tick,
            sim_time: self.sim_time,
            agents: self.arena.iter().map(AgentSnapshot::from).collect(),
            stats: self.stats(),
        }
    }

    /// Render events queued outside of a tick (initial seeding, reset).
    pub fn drain_render_events(&mut self) -> Vec<RenderEvent> {
        std::mem::take(&mut self.pending_render)
    }
}
