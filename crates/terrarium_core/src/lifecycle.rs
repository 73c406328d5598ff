use crate::config::AppConfig;
use crate::error::{Result, SimError};
use glam::DVec3;
use rand::Rng;
pub use terrarium_data::{
    Agent, AgentId, AiMemory, AiState, Cooldowns, DeathCause, Kinematics, Senses, Species, Traits,
    Vitals,
};

/// An offspring queued during a tick and inserted after the traversal.
#[derive(Debug, Clone, PartialEq)]
pub struct BirthRequest {
    pub species: Species,
    pub position: DVec3,
    pub energy: f64,
    pub parents: Vec<AgentId>,
}

/// Physics and survival rules shared by every species.
pub trait AgentLogic {
    /// `energy <= 0 || age > max_age`.
    fn is_dead(&self) -> bool;
    /// Marks the agent dead. Idempotent; removal is the world's job.
    fn die(&mut self);
    /// Ages the agent, burns base metabolism and moves it one step.
    ///
    /// On a non-finite result the kinematics are rolled back and
    /// [`SimError::NonFinite`] is returned.
    fn integrate(&mut self, dt: f64, ground: f64) -> Result<()>;
    /// Accumulates a steering force for the next integration. Non-finite
    /// forces are ignored.
    fn apply_force(&mut self, force: DVec3);
    fn is_hungry(&self) -> bool;
    fn can_feed(&self, now: f64) -> bool;
    fn can_reproduce(&self, now: f64) -> bool;
    fn is_resting(&self, now: f64) -> bool;
    /// Contact distance between the centres of `self` and `other`.
    fn reach(&self, other: &Agent, epsilon: f64) -> f64;
    fn death_cause(&self) -> DeathCause;
}

impl AgentLogic for Agent {
    fn is_dead(&self) -> bool {
        is_dead(self)
    }

    fn die(&mut self) {
        if self.state != AiState::Dead {
            tracing::debug!(id = %self.id, species = %self.species, "Agent died");
        }
        self.state = AiState::Dead;
        self.vitals.energy = 0.0;
    }

    fn integrate(&mut self, dt: f64, ground: f64) -> Result<()> {
        let previous = self.kinematics;

        self.vitals.age += dt;
        self.vitals.energy -= dt * self.vitals.metabolic_rate;

        let k = &mut self.kinematics;
        k.velocity += k.steering * dt;
        k.velocity = k.velocity.clamp_length_max(k.max_speed.max(0.0));
        k.position += k.velocity * dt;
        k.steering = DVec3::ZERO;

        let floor = ground + self.vitals.size * 0.5;
        if k.position.y < floor {
            k.position.y = floor;
            k.velocity.y = 0.0;
        }

        if !k.position.is_finite() || !k.velocity.is_finite() {
            self.kinematics = previous;
            self.kinematics.velocity = DVec3::ZERO;
            self.kinematics.steering = DVec3::ZERO;
            return Err(SimError::NonFinite(self.id));
        }

        let planar = DVec3::new(k.velocity.x, 0.0, k.velocity.z);
        if planar.length_squared() > f64::EPSILON {
            k.heading = planar.normalize();
        }
        Ok(())
    }

    fn apply_force(&mut self, force: DVec3) {
        if force.is_finite() {
            self.kinematics.steering += force;
        }
    }

    fn is_hungry(&self) -> bool {
        self.vitals.energy < self.traits.hunger_threshold
    }

    fn can_feed(&self, now: f64) -> bool {
        now - self.cooldowns.last_feed >= self.traits.feed_cooldown
    }

    fn can_reproduce(&self, now: f64) -> bool {
        !self.is_dead()
            && self.vitals.energy > self.traits.reproduction_threshold
            && now - self.cooldowns.last_reproduce >= self.traits.reproduction_cooldown
    }

    fn is_resting(&self, now: f64) -> bool {
        now < self.cooldowns.rest_until
    }

    fn reach(&self, other: &Agent, epsilon: f64) -> f64 {
        self.vitals.size * 0.5 + other.vitals.size * 0.5 + epsilon
    }

    fn death_cause(&self) -> DeathCause {
        if self.vitals.age > self.vitals.max_age {
            DeathCause::OldAge
        } else {
            DeathCause::Starvation
        }
    }
}

/// Free-function form of [`AgentLogic::is_dead`] for filters.
#[inline]
#[must_use]
pub fn is_dead(agent: &Agent) -> bool {
    agent.state == AiState::Dead || agent.vitals.energy <= 0.0 || agent.vitals.age > agent.vitals.max_age
}

/// Builds a new agent of `species` from its configuration section.
///
/// `energy` overrides the configured starting energy (offspring). The agent is
/// lifted so it rests on the ground. Its id stays [`AgentId::UNASSIGNED`] until
/// the arena inserts it.
pub fn create_agent_with<R: Rng>(
    species: Species,
    position: DVec3,
    energy: Option<f64>,
    config: &AppConfig,
    rng: &mut R,
) -> Agent {
    let sc = config.species(species);
    let size = (sc.size + rng.gen::<f64>() * sc.size_jitter).clamp(sc.min_size, sc.max_size);
    let max_age = sc.max_age + rng.gen::<f64>() * sc.max_age_jitter;
    let max_speed = sc.max_speed + rng.gen::<f64>() * sc.max_speed_jitter;

    let energy = energy.unwrap_or_else(|| match species {
        Species::Plant if config.plant_growth.energy_per_size > 0.0 => {
            size * config.plant_growth.energy_per_size
        }
        _ => sc.initial_energy,
    });

    let mut position = position;
    position.y = position.y.max(config.world.ground_height + size * 0.5);

    Agent {
        id: AgentId::UNASSIGNED,
        species,
        state: AiState::Idle,
        kinematics: Kinematics {
            max_speed,
            max_force: sc.max_force,
            ..Kinematics::at(position)
        },
        vitals: Vitals {
            energy,
            max_energy: sc.max_energy,
            age: 0.0,
            max_age,
            size,
            min_size: sc.min_size,
            max_size: sc.max_size,
            metabolic_rate: sc.metabolic_rate,
        },
        senses: Senses {
            perception_radius: sc.perception_radius,
            flee_radius: sc.flee_radius,
            feed_epsilon: sc.feed_epsilon,
            mate_epsilon: sc.mate_epsilon,
        },
        traits: Traits {
            hunger_threshold: sc.hunger_threshold,
            reproduction_threshold: sc.reproduction_threshold,
            reproduction_cooldown: sc.reproduction_cooldown,
            reproduction_cost: sc.reproduction_cost,
            offspring_energy_fraction: sc.offspring_energy_fraction,
            feed_amount: sc.feed_amount,
            feed_source_fraction: sc.feed_source_fraction,
            feed_drain_multiplier: sc.feed_drain_multiplier,
            feed_cooldown: sc.feed_cooldown,
            growth_rate: sc.growth_rate,
        },
        cooldowns: Cooldowns::ready(sc.feed_cooldown, sc.reproduction_cooldown),
        memory: AiMemory::default(),
    }
}

/// Random spawn point on the ground plane within a species' spawn extent.
pub fn random_spawn_position<R: Rng>(species: Species, config: &AppConfig, rng: &mut R) -> DVec3 {
    let extent = config.species(species).spawn_extent;
    let x = (rng.gen::<f64>() * 2.0 - 1.0) * extent;
    let z = (rng.gen::<f64>() * 2.0 - 1.0) * extent;
    DVec3::new(x, config.world.ground_height, z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn herbivore() -> Agent {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        create_agent_with(Species::Herbivore, DVec3::ZERO, None, &config, &mut rng)
    }

    #[test]
    fn test_create_uses_species_defaults() {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let h = create_agent_with(Species::Herbivore, DVec3::ZERO, None, &config, &mut rng);
        assert_eq!(h.energy(), 150.0);
        assert_eq!(h.size(), 1.2);
        assert!((h.position().y - 0.6).abs() < 1e-12);
        assert!(h.kinematics.max_speed >= 1.5 && h.kinematics.max_speed < 2.0);
        assert_eq!(h.id, AgentId::UNASSIGNED);

        let p = create_agent_with(Species::Plant, DVec3::ZERO, None, &config, &mut rng);
        assert!(p.size() >= 0.5 && p.size() < 1.0);
        assert!((p.energy() - p.size() * 20.0).abs() < 1e-9);
        assert!(p.vitals.max_age >= 50.0 && p.vitals.max_age < 100.0);
    }

    #[test]
    fn test_energy_decreases_at_base_rate() {
        let mut h = herbivore();
        let before = h.energy();
        h.integrate(1.0, 0.0).ok();
        assert!((before - h.energy() - 0.1).abs() < 1e-12);
        assert!((h.vitals.age - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_velocity_clamped_and_steering_reset() {
        let mut h = herbivore();
        h.apply_force(DVec3::new(1000.0, 0.0, 0.0));
        h.integrate(1.0, 0.0).ok();
        assert!(h.kinematics.velocity.length() <= h.kinematics.max_speed + 1e-9);
        assert_eq!(h.kinematics.steering, DVec3::ZERO);
        assert!((h.kinematics.heading - DVec3::X).length() < 1e-9);
    }

    #[test]
    fn test_ground_floor() {
        let mut h = herbivore();
        h.kinematics.velocity = DVec3::new(0.0, -1.0, 0.0);
        h.integrate(1.0, 0.0).ok();
        assert!((h.position().y - 0.6).abs() < 1e-12);
        assert_eq!(h.kinematics.velocity.y, 0.0);
    }

    #[test]
    fn test_non_finite_force_ignored() {
        let mut h = herbivore();
        h.apply_force(DVec3::new(f64::NAN, 0.0, 0.0));
        assert_eq!(h.kinematics.steering, DVec3::ZERO);
    }

    #[test]
    fn test_non_finite_state_rolled_back() {
        let mut h = herbivore();
        let position = h.position();
        h.kinematics.max_speed = f64::INFINITY;
        h.kinematics.velocity = DVec3::new(f64::INFINITY, 0.0, 0.0);
        let result = h.integrate(1.0, 0.0);
        assert!(matches!(result, Err(SimError::NonFinite(_))));
        assert_eq!(h.position(), position);
        assert_eq!(h.kinematics.velocity, DVec3::ZERO);
    }

    #[test]
    fn test_die_is_idempotent() {
        let mut h = herbivore();
        h.die();
        h.die();
        assert_eq!(h.energy(), 0.0);
        assert_eq!(h.state, AiState::Dead);
        assert!(h.is_dead());
    }

    #[test]
    fn test_death_causes() {
        let mut h = herbivore();
        h.vitals.age = h.vitals.max_age + 1.0;
        assert!(h.is_dead());
        assert_eq!(h.death_cause(), DeathCause::OldAge);

        let mut h = herbivore();
        h.vitals.energy = -0.5;
        assert!(h.is_dead());
        assert_eq!(h.death_cause(), DeathCause::Starvation);
    }

    #[test]
    fn test_reproduction_eligibility() {
        let mut h = herbivore();
        h.vitals.energy = 210.0;
        assert!(h.can_reproduce(0.0));
        h.cooldowns.last_reproduce = 10.0;
        assert!(!h.can_reproduce(20.0));
        assert!(h.can_reproduce(25.0));
        h.vitals.energy = 200.0;
        assert!(!h.can_reproduce(25.0));
    }

    #[test]
    fn test_reach_uses_half_sizes() {
        let h = herbivore();
        let other = herbivore();
        assert!((h.reach(&other, 0.2) - 1.4).abs() < 1e-12);
    }
}
