use crate::arena::Arena;
use crate::environment::Environment;
use crate::lifecycle::is_dead;
use terrarium_data::{Species, TickStats};

pub struct StatsContext<'a> {
    pub arena: &'a Arena,
    pub environment: &'a Environment,
    pub sim_time: f64,
    pub tick: u64,
}

/// Counts live agents per species.
///
/// Runs after dead agents have been removed, so the filter only matters for
/// callers that sample mid-tick.
#[must_use]
pub fn collect_tick_stats(ctx: StatsContext<'_>) -> TickStats {
    let count = |species: Species| ctx.arena.of_species(species).filter(|a| !is_dead(a)).count();
    let plant_count = count(Species::Plant);
    let herbivore_count = count(Species::Herbivore);
    let carnivore_count = count(Species::Carnivore);

    TickStats {
        sim_time: ctx.sim_time,
        tick: ctx.tick,
        plant_count,
        herbivore_count,
        carnivore_count,
        total: plant_count + herbivore_count + carnivore_count,
        environment: ctx.environment.state(),
    }
}
