use std::collections::{BTreeMap, BTreeSet};
use terrarium_data::{Agent, AgentId, Species};

/// Id-keyed owner of every agent in a world.
///
/// Ids come from a monotonic counter and are never reused. Iteration is in
/// ascending id order, which makes every traversal and every tie-break in the
/// simulation deterministic.
///
/// While an agent is being updated it is checked out with [`Arena::checkout`]
/// so the update can mutate other agents through the arena. A checked-out
/// agent stays in its species index but is invisible to lookups until it is
/// returned with [`Arena::restore`].
#[derive(Debug, Clone, Default)]
pub struct Arena {
    agents: BTreeMap<AgentId, Agent>,
    by_species: [BTreeSet<AgentId>; 3],
    next_id: u64,
}

fn species_slot(species: Species) -> usize {
    match species {
        Species::Plant => 0,
        Species::Herbivore => 1,
        Species::Carnivore => 2,
    }
}

impl Arena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns a fresh id, indexes the agent and returns the id.
    pub fn insert(&mut self, mut agent: Agent) -> AgentId {
        let id = AgentId(self.next_id);
        self.next_id += 1;
        agent.id = id;
        self.by_species[species_slot(agent.species)].insert(id);
        self.agents.insert(id, agent);
        id
    }

    /// Removes and de-indexes an agent.
    pub fn remove(&mut self, id: AgentId) -> Option<Agent> {
        let agent = self.agents.remove(&id)?;
        self.by_species[species_slot(agent.species)].remove(&id);
        Some(agent)
    }

    #[must_use]
    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(&id)
    }

    /// Resolves an id to an agent that is present and not dead.
    #[must_use]
    pub fn get_live(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id).filter(|a| !crate::lifecycle::is_dead(a))
    }

    /// Takes an agent out for exclusive mutation. Its index entry is kept.
    pub fn checkout(&mut self, id: AgentId) -> Option<Agent> {
        self.agents.remove(&id)
    }

    /// Returns an agent taken with [`Arena::checkout`].
    pub fn restore(&mut self, agent: Agent) {
        self.agents.insert(agent.id, agent);
    }

    /// Ids of one species in ascending order.
    pub fn ids_of(&self, species: Species) -> impl Iterator<Item = AgentId> + '_ {
        self.by_species[species_slot(species)].iter().copied()
    }

    /// Snapshot of every id in ascending order.
    #[must_use]
    pub fn ids(&self) -> Vec<AgentId> {
        self.agents.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    /// Agents of one species in ascending id order, skipping checked-out ones.
    pub fn of_species(&self, species: Species) -> impl Iterator<Item = &Agent> + '_ {
        self.ids_of(species).filter_map(|id| self.agents.get(&id))
    }

    #[must_use]
    pub fn count(&self, species: Species) -> usize {
        self.by_species[species_slot(species)].len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_species.iter().map(BTreeSet::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every agent and restarts id assignment.
    pub fn clear(&mut self) {
        self.agents.clear();
        for index in &mut self.by_species {
            index.clear();
        }
        self.next_id = 0;
    }
}
