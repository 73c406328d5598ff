use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of an agent, assigned by the world on insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub u64);

impl AgentId {
    /// Placeholder carried by agents that have not been inserted into a world yet.
    pub const UNASSIGNED: AgentId = AgentId(u64::MAX);
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Species tag selecting which capability table applies to an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Species {
    Plant,
    Herbivore,
    Carnivore,
}

impl Species {
    pub const ALL: [Species; 3] = [Species::Plant, Species::Herbivore, Species::Carnivore];

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Species::Plant => "plant",
            Species::Herbivore => "herbivore",
            Species::Carnivore => "carnivore",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Discrete behavioral state of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub enum AiState {
    #[default]
    Idle,
    Wandering,
    SeekingFood,
    Eating,
    Fleeing,
    SeekingMate,
    Reproducing,
    Dead,
}

impl AiState {
    #[must_use]
    pub fn is_feeding(&self) -> bool {
        matches!(self, AiState::SeekingFood | AiState::Eating)
    }

    #[must_use]
    pub fn is_mating(&self) -> bool {
        matches!(self, AiState::SeekingMate | AiState::Reproducing)
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            AiState::Idle => "idle",
            AiState::Wandering => "wandering",
            AiState::SeekingFood => "seeking_food",
            AiState::Eating => "eating",
            AiState::Fleeing => "fleeing",
            AiState::SeekingMate => "seeking_mate",
            AiState::Reproducing => "reproducing",
            AiState::Dead => "dead",
        }
    }
}

/// Motion state. Forces accumulate in `steering` until the next integration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kinematics {
    pub position: DVec3,
    pub velocity: DVec3,
    pub steering: DVec3,
    /// Last non-zero direction of travel, used when a direction degenerates.
    pub heading: DVec3,
    /// Unit direction picked by the last wander heading change, on the X/Z plane.
    pub wander_direction: DVec3,
    pub max_speed: f64,
    pub max_force: f64,
}

impl Kinematics {
    #[must_use]
    pub fn at(position: DVec3) -> Self {
        Self {
            position,
            velocity: DVec3::ZERO,
            steering: DVec3::ZERO,
            heading: DVec3::X,
            wander_direction: DVec3::X,
            max_speed: 0.0,
            max_force: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    pub energy: f64,
    pub max_energy: f64,
    /// Seconds of simulated time lived.
    pub age: f64,
    pub max_age: f64,
    pub size: f64,
    pub min_size: f64,
    pub max_size: f64,
    /// Energy drained per second of simulated time.
    pub metabolic_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Senses {
    pub perception_radius: f64,
    pub flee_radius: f64,
    /// Added to the half-sizes of both parties to get the feeding contact distance.
    pub feed_epsilon: f64,
    /// Added to the half-sizes of both parties to get the mating contact distance.
    pub mate_epsilon: f64,
}

/// Per-agent thresholds and feeding/reproduction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Traits {
    pub hunger_threshold: f64,
    pub reproduction_threshold: f64,
    pub reproduction_cooldown: f64,
    pub reproduction_cost: f64,
    pub offspring_energy_fraction: f64,
    pub feed_amount: f64,
    /// Fraction of the source's energy the consumer may take in one bite.
    pub feed_source_fraction: f64,
    /// The source loses `gain * feed_drain_multiplier`.
    pub feed_drain_multiplier: f64,
    pub feed_cooldown: f64,
    /// Photosynthesis rate; zero for animals.
    pub growth_rate: f64,
}

/// Simulation-time stamps of the last occurrences of timed actions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cooldowns {
    pub last_feed: f64,
    pub last_reproduce: f64,
    pub last_wander_change: Option<f64>,
    /// While `sim_time < rest_until` the agent is in its post-mating rest.
    pub rest_until: f64,
}

impl Cooldowns {
    /// Stamps that make every timed action available immediately.
    #[must_use]
    pub fn ready(feed_cooldown: f64, reproduction_cooldown: f64) -> Self {
        Self {
            last_feed: -feed_cooldown,
            last_reproduce: -reproduction_cooldown,
            last_wander_change: None,
            rest_until: f64::NEG_INFINITY,
        }
    }
}

/// Cached targets. Ids only; the referent may vanish at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AiMemory {
    pub food_target: Option<AgentId>,
    pub mate_target: Option<AgentId>,
    pub threat: Option<AgentId>,
}

impl AiMemory {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// A complete organism.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub species: Species,
    pub state: AiState,
    pub kinematics: Kinematics,
    pub vitals: Vitals,
    pub senses: Senses,
    pub traits: Traits,
    pub cooldowns: Cooldowns,
    pub memory: AiMemory,
}

impl Agent {
    #[inline]
    #[must_use]
    pub fn position(&self) -> DVec3 {
        self.kinematics.position
    }

    #[inline]
    #[must_use]
    pub fn energy(&self) -> f64 {
        self.vitals.energy
    }

    #[inline]
    #[must_use]
    pub fn size(&self) -> f64 {
        self.vitals.size
    }
}
