use glam::DVec3;
use serde::{Deserialize, Serialize};
use terrarium_data::{Agent, AgentId, AiState, Species, TickStats};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AgentSnapshot {
    pub id: AgentId,
    pub species: Species,
    pub state: AiState,
    pub position: DVec3,
    pub velocity: DVec3,
    pub energy: f64,
    pub max_energy: f64,
    pub age: f64,
    pub size: f64,
}

impl From<&Agent> for AgentSnapshot {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id,
            species: agent.species,
            state: agent.state,
            position: agent.kinematics.position,
            velocity: agent.kinematics.velocity,
            energy: agent.vitals.energy,
            max_energy: agent.vitals.max_energy,
            age: agent.vitals.age,
            size: agent.vitals.size,
        }
    }
}

/// Read-only copy of a world handed to observers. Agents are in ascending id order.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub sim_time: f64,
    pub agents: Vec<AgentSnapshot>,
    pub stats: TickStats,
}

impl WorldSnapshot {
    pub fn of_species(&self, species: Species) -> impl Iterator<Item = &AgentSnapshot> {
        self.agents.iter().filter(move |a| a.species == species)
    }

    #[must_use]
    pub fn get(&self, id: AgentId) -> Option<&AgentSnapshot> {
        self.agents
            .binary_search_by_key(&id, |a| a.id)
            .ok()
            .map(|i| &self.agents[i])
    }
}
