//! Steering primitives. Each one computes a force and accumulates it on the
//! agent; nothing moves until the next integration.

use crate::config::AiConfig;
use crate::lifecycle::AgentLogic;
use glam::DVec3;
use rand::Rng;
use terrarium_data::Agent;

/// Normalizes `direction`, falling back to `heading` and then to +X when the
/// vector is degenerate.
#[must_use]
pub fn direction_or_heading(direction: DVec3, heading: DVec3) -> DVec3 {
    direction
        .try_normalize()
        .or_else(|| heading.try_normalize())
        .unwrap_or(DVec3::X)
}

/// `clamp(desired - velocity, max_force)`.
#[must_use]
pub fn steer_towards(agent: &Agent, desired: DVec3) -> DVec3 {
    let k = &agent.kinematics;
    (desired - k.velocity).clamp_length_max(k.max_force.max(0.0))
}

/// Random walk on the ground plane.
///
/// The heading is re-rolled once every `ai.wander_interval` seconds of
/// simulated time. A small forward push along the current velocity is added
/// every call.
pub fn wander<R: Rng>(agent: &mut Agent, now: f64, ai: &AiConfig, rng: &mut R) {
    let due = agent
        .cooldowns
        .last_wander_change
        .map_or(true, |last| now - last > ai.wander_interval);
    if due {
        let angle = rng.gen::<f64>() * std::f64::consts::TAU;
        agent.kinematics.wander_direction = DVec3::new(angle.cos(), 0.0, angle.sin());
        agent.cooldowns.last_wander_change = Some(now);
    }

    let desired = agent.kinematics.wander_direction
        * agent.kinematics.max_speed.max(0.0)
        * ai.wander_speed_fraction;
    let steer = steer_towards(agent, desired);
    agent.apply_force(steer);

    let push = agent.kinematics.velocity.normalize_or_zero() * agent.kinematics.max_force * ai.forward_bias;
    agent.apply_force(push);
}

/// Full-speed approach of `target`.
pub fn seek(agent: &mut Agent, target: DVec3) {
    let direction = direction_or_heading(target - agent.position(), agent.kinematics.heading);
    let desired = direction * agent.kinematics.max_speed.max(0.0);
    let steer = steer_towards(agent, desired);
    agent.apply_force(steer);
}

/// Full-speed retreat from `threat`.
pub fn flee(agent: &mut Agent, threat: DVec3) {
    let direction = direction_or_heading(agent.position() - threat, agent.kinematics.heading);
    let desired = direction * agent.kinematics.max_speed.max(0.0);
    let steer = steer_towards(agent, desired);
    agent.apply_force(steer);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::lifecycle::create_agent_with;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use terrarium_data::Species;

    fn herbivore() -> Agent {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        create_agent_with(Species::Herbivore, DVec3::ZERO, None, &config, &mut rng)
    }

    #[test]
    fn test_seek_points_at_target_and_is_clamped() {
        let mut h = herbivore();
        let target = h.position() + DVec3::new(10.0, 0.0, 0.0);
        seek(&mut h, target);
        let s = h.kinematics.steering;
        assert!(s.x > 0.0);
        assert!(s.length() <= h.kinematics.max_force + 1e-12);
    }

    #[test]
    fn test_flee_points_away() {
        let mut h = herbivore();
        let threat = h.position() + DVec3::new(0.0, 0.0, 3.0);
        flee(&mut h, threat);
        assert!(h.kinematics.steering.z < 0.0);
    }

    #[test]
    fn test_degenerate_direction_uses_heading() {
        let mut h = herbivore();
        h.kinematics.heading = DVec3::Z;
        let here = h.position();
        seek(&mut h, here);
        let s = h.kinematics.steering;
        assert!(s.z > 0.0 && s.x.abs() < 1e-12);

        assert_eq!(direction_or_heading(DVec3::ZERO, DVec3::ZERO), DVec3::X);
    }

    #[test]
    fn test_wander_respects_interval() {
        let ai = AiConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut h = herbivore();

        wander(&mut h, 0.0, &ai, &mut rng);
        let first = h.kinematics.wander_direction;
        assert_eq!(h.cooldowns.last_wander_change, Some(0.0));
        assert!(first.y.abs() < 1e-12);
        assert!((first.length() - 1.0).abs() < 1e-9);

        wander(&mut h, 4.0, &ai, &mut rng);
        assert_eq!(h.kinematics.wander_direction, first);

        wander(&mut h, 5.5, &ai, &mut rng);
        assert_eq!(h.cooldowns.last_wander_change, Some(5.5));
    }

    #[test]
    fn test_wander_force_bounded() {
        let ai = AiConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let mut h = herbivore();
        h.kinematics.velocity = DVec3::new(1.0, 0.0, 0.0);
        wander(&mut h, 0.0, &ai, &mut rng);
        let bound = h.kinematics.max_force * (1.0 + ai.forward_bias);
        assert!(h.kinematics.steering.length() <= bound + 1e-12);
    }
}
