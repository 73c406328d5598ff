use crate::config::AiConfig;
use crate::lifecycle::{AgentLogic, BirthRequest};
use terrarium_data::{Agent, AiState};

/// Energy bookkeeping of one successful bite or hunt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedOutcome {
    pub gained: f64,
    pub drained: f64,
    /// The source's energy reached zero and it was killed.
    pub killed: bool,
}

/// Energy the consumer would take from `source` right now.
///
/// `min(feed_amount, source.energy * feed_source_fraction, max_energy - energy)`,
/// never negative.
#[must_use]
pub fn feed_gain(consumer: &Agent, source: &Agent) -> f64 {
    let t = &consumer.traits;
    let room = consumer.vitals.max_energy - consumer.vitals.energy;
    t.feed_amount
        .min(source.vitals.energy * t.feed_source_fraction)
        .min(room)
        .max(0.0)
}

/// Consumer eats or hunts `source`.
///
/// Returns `None` while the feed cooldown is running or when the source is
/// already dead. Otherwise the source loses `gain * feed_drain_multiplier`, is
/// killed on the spot if that empties it, and the consumer stops briefly.
pub fn feed(consumer: &mut Agent, source: &mut Agent, now: f64, ai: &AiConfig) -> Option<FeedOutcome> {
    if source.is_dead() || !consumer.can_feed(now) {
        return None;
    }

    let gained = feed_gain(consumer, source);
    let drained = gained * consumer.traits.feed_drain_multiplier;

    source.vitals.energy -= drained;
    consumer.vitals.energy += gained;
    consumer.cooldowns.last_feed = now;
    consumer.state = AiState::Eating;
    consumer.kinematics.velocity *= ai.action_damping;

    let killed = source.vitals.energy <= 0.0;
    if killed {
        source.die();
    }

    tracing::debug!(
        consumer = %consumer.id,
        source = %source.id,
        gained,
        drained,
        killed,
        "Feed"
    );

    Some(FeedOutcome {
        gained,
        drained,
        killed,
    })
}

/// Pairs two agents of the same species.
///
/// Both must be eligible at call time. Both pay their reproduction cost, have
/// their cooldown stamped with `now` and rest for `ai.rest_duration`. One
/// offspring is queued at the midpoint.
pub fn mate(a: &mut Agent, b: &mut Agent, now: f64, ai: &AiConfig) -> Option<BirthRequest> {
    if a.id == b.id || a.species != b.species || !a.can_reproduce(now) || !b.can_reproduce(now) {
        return None;
    }

    for parent in [&mut *a, &mut *b] {
        parent.vitals.energy -= parent.traits.reproduction_cost;
        parent.cooldowns.last_reproduce = now;
        parent.cooldowns.rest_until = now + ai.rest_duration;
        parent.state = AiState::Reproducing;
        parent.kinematics.velocity *= ai.action_damping;
    }

    let position = a.position().lerp(b.position(), 0.5);
    let energy = a.traits.reproduction_cost * a.traits.offspring_energy_fraction;

    tracing::debug!(a = %a.id, b = %b.id, species = %a.species, "Mated");

    Some(BirthRequest {
        species: a.species,
        position,
        energy,
        parents: vec![a.id, b.id],
    })
}
