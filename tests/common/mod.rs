pub mod macros;

use glam::DVec3;
use terrarium_data::{AgentId, AiState, Species};
use terrarium_lib::model::config::AppConfig;
use terrarium_lib::model::world::World;

/// Builds an empty, seeded world; agents are placed explicitly by tests.
#[allow(dead_code)]
pub struct WorldBuilder {
    config: AppConfig,
    agents: Vec<AgentBuilder>,
}

#[allow(dead_code)]
impl WorldBuilder {
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.world.initial_plants = 0;
        config.world.initial_herbivores = 0;
        config.world.initial_carnivores = 0;
        config.world.seed = Some(42);
        config.environment.drought_chance = 0.0;
        Self {
            config,
            agents: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.world.seed = Some(seed);
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn with_agent(mut self, agent: AgentBuilder) -> Self {
        self.agents.push(agent);
        self
    }

    /// Returns the world and the ids of the builder's agents in insertion order.
    pub fn build(self) -> (World, Vec<AgentId>) {
        let mut world = World::new(self.config).expect("Failed to create world in test builder");
        let ids = self.agents.into_iter().map(|a| a.spawn(&mut world)).collect();
        world.drain_render_events();
        (world, ids)
    }
}

#[allow(dead_code)]
pub struct AgentBuilder {
    species: Species,
    position: DVec3,
    energy: Option<f64>,
    size: Option<f64>,
    age: Option<f64>,
    state: Option<AiState>,
    velocity: DVec3,
}

#[allow(dead_code)]
impl AgentBuilder {
    pub fn new(species: Species) -> Self {
        Self {
            species,
            position: DVec3::ZERO,
            energy: None,
            size: None,
            age: None,
            state: None,
            velocity: DVec3::ZERO,
        }
    }

    pub fn plant() -> Self {
        Self::new(Species::Plant)
    }

    pub fn herbivore() -> Self {
        Self::new(Species::Herbivore)
    }

    pub fn carnivore() -> Self {
        Self::new(Species::Carnivore)
    }

    /// Ground coordinates; the world lifts the agent onto the ground.
    pub fn at(mut self, x: f64, z: f64) -> Self {
        self.position = DVec3::new(x, 0.0, z);
        self
    }

    pub fn energy(mut self, amount: f64) -> Self {
        self.energy = Some(amount);
        self
    }

    pub fn size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn age(mut self, age: f64) -> Self {
        self.age = Some(age);
        self
    }

    pub fn state(mut self, state: AiState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn velocity(mut self, x: f64, z: f64) -> Self {
        self.velocity = DVec3::new(x, 0.0, z);
        self
    }

    pub fn spawn(self, world: &mut World) -> AgentId {
        let id = world.spawn(self.species, self.position, self.energy);
        let ground = world.config.world.ground_height;
        let agent = world.arena.get_mut(id).expect("just spawned");
        if let Some(size) = self.size {
            agent.vitals.size = size;
            agent.kinematics.position.y = ground + size * 0.5;
        }
        if let Some(age) = self.age {
            agent.vitals.age = age;
        }
        if let Some(state) = self.state {
            agent.state = state;
        }
        agent.kinematics.velocity = self.velocity;
        id
    }
}

/// Moves an agent on the ground plane, keeping its height.
#[allow(dead_code)]
pub fn place(world: &mut World, id: AgentId, x: f64, z: f64) {
    let agent = world.arena.get_mut(id).expect("agent exists");
    agent.kinematics.position.x = x;
    agent.kinematics.position.z = z;
}
