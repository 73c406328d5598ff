use crate::model::lifecycle::{Agent, AgentLogic, BirthRequest};
use crate::model::species::{self, SpeciesLogic};
use crate::model::world::{TickReport, World};
use std::time::Instant;
use terrarium_core::metrics::{COUNTER_FAULTS, COUNTER_FEEDS};
use terrarium_core::systems::behavior::{self, BehaviorContext, BehaviorOutput, FeedRecord};
use terrarium_core::systems::interaction::apply_threat_pressure;
use terrarium_data::LiveEvent;

impl World {
    /// Advances the simulation by one fixed step of `dt` simulated seconds.
    ///
    /// The pause flag is the clock's concern; `step` always runs. A negative
    /// or non-finite `dt` is treated as zero.
    pub fn step(&mut self, dt: f64) -> TickReport {
        let started = Instant::now();
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            tracing::warn!(dt, "Rejected step delta, using 0");
            0.0
        };

        self.tick += 1;
        self.sim_time += dt;
        self.consumed_by.clear();

        self.environment.update(dt, &mut self.rng);

        let output = self.pass_agents(dt);
        let pressured = apply_threat_pressure(&mut self.arena, self.sim_time, &self.config.ai);
        if pressured > 0 {
            tracing::trace!(pressured, "Threat pressure applied");
        }
        self.pass_feeds(&output.feeds);

        self.finalize_tick(output.births, dt, started)
    }

    /// Steps every agent once in ascending id order.
    ///
    /// The agent being updated is checked out of the arena so it can borrow
    /// its neighbours mutably. Ids are snapshotted first; agents born during
    /// the pass are not visited.
    fn pass_agents(&mut self, dt: f64) -> BehaviorOutput {
        let mut output = BehaviorOutput::default();
        let ground = self.config.world.ground_height;

        for id in self.arena.ids() {
            let Some(mut agent) = self.arena.checkout(id) else {
                continue;
            };

            if agent.is_dead() {
                agent.die();
                self.arena.restore(agent);
                continue;
            }

            if agent.species.capabilities().mobile {
                if let Err(err) = agent.integrate(dt, ground) {
                    tracing::warn!(id = %agent.id, %err, "Agent fault, motion reset");
                    self.metrics.increment_counter(COUNTER_FAULTS);
                }
                let mut ctx = BehaviorContext {
                    arena: &mut self.arena,
                    now: self.sim_time,
                    ai: &self.config.ai,
                    rng: &mut self.rng,
                    output: &mut output,
                };
                behavior::run(&mut agent, &mut ctx);
            } else {
                self.step_plant(&mut agent, dt, &mut output.births);
            }

            self.arena.restore(agent);
        }
        output
    }

    fn step_plant(&mut self, plant: &mut Agent, dt: f64, births: &mut Vec<BirthRequest>) {
        let growth = &self.config.plant_growth;
        species::update_plant(
            plant,
            dt,
            self.environment.light_level,
            growth,
            self.config.world.ground_height,
        );
        if let Some(birth) =
            species::maybe_reproduce_plant(plant, dt, growth, &self.config.world, &mut self.rng)
        {
            births.push(birth);
        }
        if plant.is_dead() {
            plant.die();
        }
    }

    fn pass_feeds(&mut self, feeds: &[FeedRecord]) {
        for record in feeds {
            if record.outcome.killed {
                self.consumed_by.insert(record.source, record.consumer);
            }
            self.pending_events.push(LiveEvent::Consumption {
                consumer: record.consumer,
                source: record.source,
                gained: record.outcome.gained,
                drained: record.outcome.drained,
                sim_time: self.sim_time,
            });
        }
        self.metrics.add_to_counter(COUNTER_FEEDS, feeds.len() as u64);
    }
}
