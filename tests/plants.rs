mod common;

use common::{AgentBuilder, WorldBuilder};
use terrarium_data::{LiveEvent, RenderEvent, Species};

fn forced_reproduction() -> WorldBuilder {
    WorldBuilder::new().with_config(|c| c.plant_growth.reproduction_chance = 1e12)
}

#[test]
fn test_forced_plant_reproduction() {
    let (mut world, ids) = forced_reproduction()
        .with_agent(AgentBuilder::plant().energy(90.0).size(1.8))
        .build();
    let parent = ids[0];

    let report = world.step(1e-6);

    assert_population!(world, Species::Plant, 2);
    let parent_energy = world.get(parent).expect("parent alive").energy();
    assert_close!(parent_energy, 45.0, 1e-3);

    let child = world
        .agents_of(Species::Plant)
        .find(|p| p.id != parent)
        .expect("offspring");
    assert_close!(child.energy(), 0.4 * parent_energy, 1e-3);
    let bound = world.config.world.half_extent;
    assert!(child.position().x.abs() <= bound && child.position().z.abs() <= bound);

    assert!(report.events.iter().any(|e| matches!(
        e,
        LiveEvent::Birth { id, parents, .. } if *id == child.id && parents == &vec![parent]
    )));
    assert!(report
        .render
        .iter()
        .any(|e| matches!(e, RenderEvent::Spawned { id, .. } if *id == child.id)));
}

#[test]
fn test_offspring_clamped_to_world_bounds() {
    let (mut world, _) = forced_reproduction()
        .with_config(|c| c.plant_growth.offspring_scatter = 10.0)
        .with_agent(AgentBuilder::plant().at(49.0, -49.0).energy(90.0).size(1.8))
        .build();

    world.step(1e-6);

    let bound = world.config.world.half_extent;
    for plant in world.agents_of(Species::Plant) {
        assert!(plant.position().x <= bound && plant.position().x >= -bound);
        assert!(plant.position().z <= bound && plant.position().z >= -bound);
    }
}

#[test]
fn test_small_plant_does_not_seed() {
    let (mut world, _) = forced_reproduction()
        .with_agent(AgentBuilder::plant().energy(90.0).size(1.0))
        .build();

    world.step(1e-6);
    assert_population!(world, Species::Plant, 1);
}

#[test]
fn test_plant_grows_in_daylight() {
    let (mut world, ids) = WorldBuilder::new()
        .with_agent(AgentBuilder::plant().energy(60.0).size(0.6))
        .build();
    let p = ids[0];

    for _ in 0..10 {
        world.step(0.1);
    }
    let plant = world.get(p).expect("alive");
    assert!(plant.size() > 0.6);
    assert!(plant.size() <= plant.vitals.max_size);
}

#[test]
fn test_soft_population_cap() {
    let (mut world, _) = forced_reproduction()
        .with_config(|c| c.world.max_population = 3)
        .with_agent(AgentBuilder::plant().at(-10.0, 0.0).energy(90.0).size(1.8))
        .with_agent(AgentBuilder::plant().at(0.0, 0.0).energy(90.0).size(1.8))
        .with_agent(AgentBuilder::plant().at(10.0, 0.0).energy(90.0).size(1.8))
        .build();

    world.step(1e-6);

    assert_population!(world, Species::Plant, 3);
    assert_eq!(
        world
            .metrics
            .counter(terrarium_core::metrics::COUNTER_DROPPED_BIRTHS),
        3
    );
}
