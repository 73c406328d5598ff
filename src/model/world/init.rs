use crate::model::config::AppConfig;
use crate::model::environment::Environment;
use crate::model::lifecycle::{self, BirthRequest};
use crate::model::world::{Rendered, SimClock, World};
use glam::DVec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::{BTreeMap, HashMap};
use terrarium_core::arena::Arena;
use terrarium_core::metrics::{Metrics, COUNTER_BIRTHS};
use terrarium_data::{AgentId, LiveEvent, RenderEvent, Species};

pub(crate) fn seeded_rng(config: &AppConfig) -> ChaCha8Rng {
    match config.world.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

impl World {
    /// Validates `config` and seeds the initial population.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        config.validate()?;

        let mut world = Self {
            tick: 0,
            sim_time: 0.0,
            arena: Arena::new(),
            environment: Environment::new(&config.environment),
            rng: seeded_rng(&config),
            metrics: Metrics::with_log_interval(config.world.log_interval),
            clock: SimClock::default(),
            rendered: BTreeMap::new(),
            pending_render: Vec::new(),
            pending_events: Vec::new(),
            consumed_by: HashMap::new(),
            config,
        };
        world.populate();

        tracing::info!(
            seed = ?world.config.world.seed,
            fingerprint = %world.config.fingerprint(),
            agents = world.arena.len(),
            "World created"
        );
        Ok(world)
    }

    pub(crate) fn populate(&mut self) {
        let counts = [
            (Species::Plant, self.config.world.initial_plants),
            (Species::Herbivore, self.config.world.initial_herbivores),
            (Species::Carnivore, self.config.world.initial_carnivores),
        ];
        for (species, count) in counts {
            for _ in 0..count {
                let position = lifecycle::random_spawn_position(species, &self.config, &mut self.rng);
                self.spawn(species, position, None);
            }
        }
    }

    /// Creates an agent from its species configuration and inserts it.
    ///
    /// `energy` overrides the configured starting energy.
    pub fn spawn(&mut self, species: Species, position: DVec3, energy: Option<f64>) -> AgentId {
        let agent = lifecycle::create_agent_with(species, position, energy, &self.config, &mut self.rng);
        self.insert_agent(agent, Vec::new())
    }

    /// The only way into the world: assigns the id and queues the
    /// `Spawned` render event and the `Birth` live event.
    pub fn insert_agent(&mut self, agent: lifecycle::Agent, parents: Vec<AgentId>) -> AgentId {
        let species = agent.species;
        let position = agent.position();
        let size = agent.size();
        let id = self.arena.insert(agent);

        self.rendered.insert(id, Rendered { position, size });
        self.pending_render.push(RenderEvent::Spawned {
            id,
            species,
            position,
            size,
        });
        self.pending_events.push(LiveEvent::Birth {
            id,
            species,
            parents,
            sim_time: self.sim_time,
        });
        self.metrics.increment_counter(COUNTER_BIRTHS);
        id
    }

    pub(crate) fn insert_birth(&mut self, birth: BirthRequest) -> AgentId {
        let agent = lifecycle::create_agent_with(
            birth.species,
            birth.position,
            Some(birth.energy),
            &self.config,
            &mut self.rng,
        );
        self.insert_agent(agent, birth.parents)
    }
}
