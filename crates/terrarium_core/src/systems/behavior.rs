//! Finite-state AI for mobile agents.
//!
//! Each tick an agent first decides its state from a fixed priority list
//! (flee, eat, reproduce, wander) and then executes the action of that state.
//! Targets are cached as ids and resolved through the arena on every use, so
//! a target that died or vanished simply clears the cache and triggers one
//! re-decision.

use crate::arena::Arena;
use crate::config::AiConfig;
use crate::interaction::{feed, mate, FeedOutcome};
use crate::lifecycle::{AgentLogic, BirthRequest};
use crate::spatial::find_nearest;
use crate::species::{ReproductionMode, SpeciesLogic};
use crate::steering;
use rand::Rng;
use terrarium_data::{Agent, AgentId, AiState};

pub struct BehaviorContext<'a, R: Rng> {
    pub arena: &'a mut Arena,
    pub now: f64,
    pub ai: &'a AiConfig,
    pub rng: &'a mut R,
    pub output: &'a mut BehaviorOutput,
}

/// A feed that happened during the tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedRecord {
    pub consumer: AgentId,
    pub source: AgentId,
    pub outcome: FeedOutcome,
}

#[derive(Debug, Default)]
pub struct BehaviorOutput {
    pub births: Vec<BirthRequest>,
    pub feeds: Vec<FeedRecord>,
}

/// Runs decision and action for one checked-out agent.
///
/// Dead agents only have their state pinned to `Dead`. Resting agents skip
/// both steps.
pub fn run<R: Rng>(agent: &mut Agent, ctx: &mut BehaviorContext<'_, R>) {
    if agent.is_dead() {
        agent.die();
        return;
    }
    if !agent.species.capabilities().mobile || agent.is_resting(ctx.now) {
        return;
    }
    let next = decide_next_state(agent, ctx.arena, ctx.now, ctx.ai);
    transition(agent, next);
    execute_state_action(agent, ctx, false);
}

/// Picks the next state by priority. Records the chosen threat.
pub fn decide_next_state(agent: &mut Agent, arena: &Arena, now: f64, ai: &AiConfig) -> AiState {
    if agent.is_dead() {
        return AiState::Dead;
    }
    let caps = agent.species.capabilities();

    if caps.can_flee {
        if let Some(threat_species) = caps.threat {
            let radius = agent.senses.flee_radius;
            if let Some(threat) = find_nearest(agent, arena.of_species(threat_species), radius) {
                agent.memory.threat = Some(threat.id);
                return AiState::Fleeing;
            }
            if agent.state == AiState::Fleeing {
                let retained = agent
                    .memory
                    .threat
                    .and_then(|id| arena.get_live(id))
                    .is_some_and(|t| {
                        t.position().distance(agent.position()) <= radius * ai.flee_hysteresis
                    });
                if retained {
                    return AiState::Fleeing;
                }
            }
        }
    }

    if caps.food.is_some() && agent.is_hungry() {
        let in_reach = agent
            .memory
            .food_target
            .and_then(|id| arena.get_live(id))
            .is_some_and(|food| within(agent, food, agent.senses.feed_epsilon));
        return if in_reach {
            AiState::Eating
        } else {
            AiState::SeekingFood
        };
    }

    if caps.reproduction == ReproductionMode::Sexual && agent.can_reproduce(now) {
        let in_reach = agent
            .memory
            .mate_target
            .and_then(|id| arena.get_live(id))
            .is_some_and(|m| m.can_reproduce(now) && within(agent, m, agent.senses.mate_epsilon));
        return if in_reach {
            AiState::Reproducing
        } else {
            AiState::SeekingMate
        };
    }

    if caps.can_wander {
        AiState::Wandering
    } else {
        AiState::Idle
    }
}

/// Moves to `next`, dropping the cached targets of the states being left.
pub fn transition(agent: &mut Agent, next: AiState) {
    if !next.is_feeding() {
        agent.memory.food_target = None;
    }
    if !next.is_mating() {
        agent.memory.mate_target = None;
    }
    if next != AiState::Fleeing {
        agent.memory.threat = None;
    }
    agent.state = next;
}

fn within(agent: &Agent, other: &Agent, epsilon: f64) -> bool {
    agent.position().distance(other.position()) < agent.reach(other, epsilon)
}

/// A cached target stays valid only while the agent can still perceive it.
fn perceives(agent: &Agent, other: &Agent) -> bool {
    agent.position().distance(other.position()) <= agent.senses.perception_radius
}

fn wander_or_idle<R: Rng>(agent: &mut Agent, ctx: &mut BehaviorContext<'_, R>) {
    if agent.species.capabilities().can_wander {
        agent.state = AiState::Wandering;
        steering::wander(agent, ctx.now, ctx.ai, ctx.rng);
    } else {
        agent.state = AiState::Idle;
    }
}

fn redecide<R: Rng>(agent: &mut Agent, ctx: &mut BehaviorContext<'_, R>, redecided: bool) {
    let next = decide_next_state(agent, ctx.arena, ctx.now, ctx.ai);
    transition(agent, next);
    if !redecided {
        execute_state_action(agent, ctx, true);
    }
}

/// Executes the action bound to the agent's current state.
///
/// `redecided` is set on the second pass of a tick and stops a vanished
/// target from causing more than one re-decision.
pub fn execute_state_action<R: Rng>(
    agent: &mut Agent,
    ctx: &mut BehaviorContext<'_, R>,
    redecided: bool,
) {
    match agent.state {
        AiState::Wandering => steering::wander(agent, ctx.now, ctx.ai, ctx.rng),
        AiState::SeekingFood => seek_food(agent, ctx),
        AiState::Eating => eat(agent, ctx, redecided),
        AiState::Fleeing => flee(agent, ctx, redecided),
        AiState::SeekingMate => seek_mate(agent, ctx),
        AiState::Reproducing => reproduce(agent, ctx, redecided),
        AiState::Idle | AiState::Dead => {}
    }
}

fn seek_food<R: Rng>(agent: &mut Agent, ctx: &mut BehaviorContext<'_, R>) {
    let Some(food_species) = agent.species.capabilities().food else {
        wander_or_idle(agent, ctx);
        return;
    };

    let cached = agent
        .memory
        .food_target
        .and_then(|id| ctx.arena.get_live(id))
        .filter(|food| food.species == food_species && perceives(agent, food));
    let target = cached
        .or_else(|| {
            find_nearest(
                agent,
                ctx.arena.of_species(food_species),
                agent.senses.perception_radius,
            )
        })
        .map(|t| (t.id, t.position(), within(agent, t, agent.senses.feed_epsilon)));

    match target {
        None => {
            agent.memory.food_target = None;
            wander_or_idle(agent, ctx);
        }
        Some((id, _, true)) => {
            agent.memory.food_target = Some(id);
            agent.state = AiState::Eating;
            eat(agent, ctx, true);
        }
        Some((id, position, false)) => {
            agent.memory.food_target = Some(id);
            steering::seek(agent, position);
        }
    }
}

fn eat<R: Rng>(agent: &mut Agent, ctx: &mut BehaviorContext<'_, R>, redecided: bool) {
    let Some(target_id) = agent.memory.food_target else {
        redecide(agent, ctx, redecided);
        return;
    };
    if !ctx
        .arena
        .get_live(target_id)
        .is_some_and(|food| perceives(agent, food))
    {
        agent.memory.food_target = None;
        redecide(agent, ctx, redecided);
        return;
    }
    let Some(source) = ctx.arena.get_mut(target_id) else {
        return;
    };

    if !within(agent, source, agent.senses.feed_epsilon) {
        agent.state = AiState::SeekingFood;
        let position = source.position();
        steering::seek(agent, position);
        return;
    }

    if let Some(outcome) = feed(agent, source, ctx.now, ctx.ai) {
        ctx.output.feeds.push(FeedRecord {
            consumer: agent.id,
            source: target_id,
            outcome,
        });
        if !agent.is_hungry() || outcome.killed {
            agent.memory.food_target = None;
        }
    }
}

fn flee<R: Rng>(agent: &mut Agent, ctx: &mut BehaviorContext<'_, R>, redecided: bool) {
    let threat = agent
        .memory
        .threat
        .and_then(|id| ctx.arena.get_live(id))
        .map(|t| t.position());
    let Some(threat_position) = threat else {
        agent.memory.threat = None;
        redecide(agent, ctx, redecided);
        return;
    };

    steering::flee(agent, threat_position);
    if agent.position().distance(threat_position) > agent.senses.flee_radius * ctx.ai.flee_hysteresis {
        agent.memory.threat = None;
    }
}

fn seek_mate<R: Rng>(agent: &mut Agent, ctx: &mut BehaviorContext<'_, R>) {
    let now = ctx.now;
    let cached = agent
        .memory
        .mate_target
        .and_then(|id| ctx.arena.get_live(id))
        .filter(|m| m.can_reproduce(now) && perceives(agent, m));
    let target = cached
        .or_else(|| {
            find_nearest(
                agent,
                ctx.arena
                    .of_species(agent.species)
                    .filter(|m| m.can_reproduce(now)),
                agent.senses.perception_radius,
            )
        })
        .map(|m| (m.id, m.position(), within(agent, m, agent.senses.mate_epsilon)));

    match target {
        None => {
            agent.memory.mate_target = None;
            wander_or_idle(agent, ctx);
        }
        Some((id, _, true)) => {
            agent.memory.mate_target = Some(id);
            agent.state = AiState::Reproducing;
            reproduce(agent, ctx, true);
        }
        Some((id, position, false)) => {
            agent.memory.mate_target = Some(id);
            steering::seek(agent, position);
        }
    }
}

fn reproduce<R: Rng>(agent: &mut Agent, ctx: &mut BehaviorContext<'_, R>, redecided: bool) {
    let now = ctx.now;
    let partner_id = agent
        .memory
        .mate_target
        .filter(|&id| {
            ctx.arena
                .get_live(id)
                .is_some_and(|m| m.can_reproduce(now) && perceives(agent, m))
        });
    let Some(partner_id) = partner_id else {
        agent.memory.mate_target = None;
        redecide(agent, ctx, redecided);
        return;
    };
    let Some(partner) = ctx.arena.get_mut(partner_id) else {
        return;
    };

    if !within(agent, partner, agent.senses.mate_epsilon) {
        agent.state = AiState::SeekingMate;
        let position = partner.position();
        steering::seek(agent, position);
        return;
    }

    if let Some(birth) = mate(agent, partner, now, ctx.ai) {
        ctx.output.births.push(birth);
    }
    agent.memory.mate_target = None;
}
