use crate::model::lifecycle::{AgentLogic, BirthRequest};
use crate::model::world::{Rendered, TickReport, World};
use std::time::Instant;
use terrarium_core::metrics::{COUNTER_DEATHS, COUNTER_DROPPED_BIRTHS};
use terrarium_data::{AgentId, DeathCause, LiveEvent, RenderEvent};

impl World {
    /// Closes a tick: births, removals, random events, render diffs and stats.
    pub(crate) fn finalize_tick(
        &mut self,
        births: Vec<BirthRequest>,
        dt: f64,
        started: Instant,
    ) -> TickReport {
        self.insert_births(births);
        self.remove_dead();

        let drought_events = self
            .environment
            .trigger_random_events(dt, self.sim_time, &mut self.rng);
        self.pending_events.extend(drought_events);

        self.diff_render_state();

        let stats = self.stats();
        self.metrics
            .record_tick(started.elapsed(), self.sim_time, self.arena.len());

        TickReport {
            stats,
            events: std::mem::take(&mut self.pending_events),
            render: std::mem::take(&mut self.pending_render),
        }
    }

    fn insert_births(&mut self, births: Vec<BirthRequest>) {
        let cap = self.config.world.max_population;
        let mut dropped = 0u64;
        for birth in births {
            if self.arena.len() >= cap {
                dropped += 1;
                continue;
            }
            self.insert_birth(birth);
        }
        if dropped > 0 {
            tracing::warn!(dropped, cap, "Population cap reached, births dropped");
            self.metrics.add_to_counter(COUNTER_DROPPED_BIRTHS, dropped);
        }
    }

    /// Mark-then-compact: every agent dead at this point leaves the arena.
    fn remove_dead(&mut self) {
        let dead: Vec<AgentId> = self.arena.iter().filter(|a| a.is_dead()).map(|a| a.id).collect();

        for id in dead {
            let Some(mut agent) = self.arena.remove(id) else {
                continue;
            };
            let cause = match self.consumed_by.get(&id) {
                Some(&by) => DeathCause::Consumed { by },
                None => agent.death_cause(),
            };
            agent.die();

            self.rendered.remove(&id);
            self.pending_render.push(RenderEvent::Removed { id });
            self.pending_events.push(LiveEvent::Death {
                id,
                species: agent.species,
                age: agent.vitals.age,
                cause,
                sim_time: self.sim_time,
            });
            self.metrics.increment_counter(COUNTER_DEATHS);
        }
    }

    /// Queues `Moved` and `Resized` for agents that changed beyond the
    /// configured epsilons since their last report.
    fn diff_render_state(&mut self) {
        let position_epsilon = self.config.render.position_epsilon;
        let size_epsilon = self.config.render.size_epsilon;

        for agent in self.arena.iter() {
            let id = agent.id;
            let last = self.rendered.entry(id).or_insert(Rendered {
                position: agent.position(),
                size: agent.size(),
            });

            if agent.position().distance(last.position) > position_epsilon {
                last.position = agent.position();
                self.pending_render.push(RenderEvent::Moved {
                    id,
                    position: agent.position(),
                });
            }
            if (agent.size() - last.size).abs() > size_epsilon {
                last.size = agent.size();
                self.pending_render.push(RenderEvent::Resized { id, size: agent.size() });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::{AppConfig, WorldConfig};
    use glam::DVec3;
    use terrarium_data::Species;

    fn world_with_cap(cap: usize) -> World {
        let config = AppConfig {
            world: WorldConfig {
                seed: Some(5),
                initial_plants: 0,
                initial_herbivores: 0,
                initial_carnivores: 0,
                max_population: cap,
                ..Default::default()
            },
            ..Default::default()
        };
        World::new(config).expect("valid config")
    }

    fn birth(x: f64) -> BirthRequest {
        BirthRequest {
            species: Species::Plant,
            position: DVec3::new(x, 0.0, 0.0),
            energy: 10.0,
            parents: Vec::new(),
        }
    }

    #[test]
    fn test_births_beyond_cap_are_dropped() {
        let mut world = world_with_cap(2);
        world.spawn(Species::Plant, DVec3::ZERO, None);
        let report = world.finalize_tick(vec![birth(1.0), birth(2.0), birth(3.0)], 0.0, Instant::now());

        assert_eq!(world.population(), 2);
        assert_eq!(world.metrics.counter(COUNTER_DROPPED_BIRTHS), 2);
        let spawned = report
            .render
            .iter()
            .filter(|e| matches!(e, RenderEvent::Spawned { .. }))
            .count();
        assert_eq!(spawned, 2);
    }

    #[test]
    fn test_moves_below_epsilon_are_not_reported() {
        let mut world = world_with_cap(10);
        let id = world.spawn(Species::Herbivore, DVec3::ZERO, None);
        world.finalize_tick(Vec::new(), 0.0, Instant::now());

        world.arena.get_mut(id).expect("h").kinematics.position.x += 0.005;
        let report = world.finalize_tick(Vec::new(), 0.0, Instant::now());
        assert!(report.render.is_empty());

        world.arena.get_mut(id).expect("h").kinematics.position.x += 0.5;
        let report = world.finalize_tick(Vec::new(), 0.0, Instant::now());
        assert!(matches!(report.render.as_slice(), [RenderEvent::Moved { id: moved, .. }] if *moved == id));
    }

    #[test]
    fn test_resize_is_reported() {
        let mut world = world_with_cap(10);
        let id = world.spawn(Species::Plant, DVec3::ZERO, None);
        world.finalize_tick(Vec::new(), 0.0, Instant::now());

        world.arena.get_mut(id).expect("p").vitals.size += 0.1;
        let report = world.finalize_tick(Vec::new(), 0.0, Instant::now());
        assert!(report
            .render
            .iter()
            .any(|e| matches!(e, RenderEvent::Resized { id: r, .. } if *r == id)));
    }

    #[test]
    fn test_starved_agent_removed_with_cause() {
        let mut world = world_with_cap(10);
        let id = world.spawn(Species::Herbivore, DVec3::ZERO, None);
        world.arena.get_mut(id).expect("h").vitals.energy = -1.0;
        let report = world.finalize_tick(Vec::new(), 0.0, Instant::now());

        assert!(world.get(id).is_none());
        assert!(report.events.iter().any(|e| matches!(
            e,
            LiveEvent::Death { id: dead, cause: DeathCause::Starvation, .. } if *dead == id
        )));
        assert_eq!(world.metrics.counter(COUNTER_DEATHS), 1);
    }
}
