use crate::arena::Arena;
use crate::config::AiConfig;
use crate::lifecycle::{is_dead, AgentLogic};
use crate::species::SpeciesLogic;
use crate::systems::behavior::{decide_next_state, transition};
use terrarium_data::{AgentId, AiState, Species};

/// Re-runs the decision step for every live flee-capable agent after the
/// agent pass, so a threat that moved into range this tick is noticed.
///
/// Only a `Fleeing` decision is applied. Resting agents are skipped. Returns
/// the number of agents whose threat changed.
pub fn apply_threat_pressure(arena: &mut Arena, now: f64, ai: &AiConfig) -> usize {
    let mut updates: Vec<(AgentId, Option<AgentId>)> = Vec::new();

    for species in Species::ALL {
        let caps = species.capabilities();
        if !caps.can_flee || caps.threat.is_none() {
            continue;
        }

        for prey in arena.of_species(species) {
            if is_dead(prey) || prey.is_resting(now) {
                continue;
            }
            let mut decided = prey.clone();
            if decide_next_state(&mut decided, arena, now, ai) != AiState::Fleeing {
                continue;
            }
            if prey.state != AiState::Fleeing || prey.memory.threat != decided.memory.threat {
                updates.push((prey.id, decided.memory.threat));
            }
        }
    }

    let changed = updates.len();
    for (prey_id, threat_id) in updates {
        if let Some(prey) = arena.get_mut(prey_id) {
            transition(prey, AiState::Fleeing);
            prey.memory.threat = threat_id;
        }
    }
    changed
}
