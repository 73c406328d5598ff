use super::agent::{AgentId, Species};
use super::environment::EnvironmentState;
use glam::DVec3;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
/// Per-tick population snapshot published to statistics consumers.
pub struct TickStats {
    /// Simulated seconds elapsed since the world was created or reset.
    pub sim_time: f64,
    /// Number of completed ticks.
    pub tick: u64,
    pub plant_count: usize,
    pub herbivore_count: usize,
    pub carnivore_count: usize,
    /// Sum of the three species counts.
    pub total: usize,
    pub environment: EnvironmentState,
}

impl TickStats {
    #[must_use]
    pub fn count(&self, species: Species) -> usize {
        match species {
            Species::Plant => self.plant_count,
            Species::Herbivore => self.herbivore_count,
            Species::Carnivore => self.carnivore_count,
        }
    }
}

/// Messages for a visualization consumer. The only coupling between the
/// simulation and a renderer.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(tag = "kind")]
pub enum RenderEvent {
    Spawned {
        id: AgentId,
        species: Species,
        position: DVec3,
        size: f64,
    },
    Moved {
        id: AgentId,
        position: DVec3,
    },
    Resized {
        id: AgentId,
        size: f64,
    },
    Removed {
        id: AgentId,
    },
}

impl RenderEvent {
    #[must_use]
    pub fn id(&self) -> AgentId {
        match self {
            RenderEvent::Spawned { id, .. }
            | RenderEvent::Moved { id, .. }
            | RenderEvent::Resized { id, .. }
            | RenderEvent::Removed { id } => *id,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeathCause {
    /// Energy ran out through metabolism.
    Starvation,
    /// Age exceeded the lifespan.
    OldAge,
    /// Energy drained to zero by a consumer.
    Consumed { by: AgentId },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "event")]
/// Tagged union of simulation events emitted during a tick.
///
/// Serialised with `#[serde(tag = "event")]` for streaming JSONL output.
pub enum LiveEvent {
    /// An agent was inserted into the world (initial seeding or reproduction).
    Birth {
        id: AgentId,
        species: Species,
        parents: Vec<AgentId>,
        sim_time: f64,
    },
    /// An agent was removed from the world.
    Death {
        id: AgentId,
        species: Species,
        age: f64,
        cause: DeathCause,
        sim_time: f64,
    },
    /// A herbivore ate a plant or a carnivore hunted a herbivore.
    Consumption {
        consumer: AgentId,
        source: AgentId,
        gained: f64,
        drained: f64,
        sim_time: f64,
    },
    DroughtStarted {
        duration: f64,
        sim_time: f64,
    },
    DroughtEnded {
        sim_time: f64,
    },
}
