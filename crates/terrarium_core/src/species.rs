//! Species capability table and plant rules.
//!
//! Behaviour differences between species are data, not types: the AI engine
//! asks [`SpeciesLogic::capabilities`] what an agent may do.

use crate::config::{PlantGrowthConfig, WorldConfig};
use crate::lifecycle::{AgentLogic, BirthRequest};
use glam::DVec3;
use rand::Rng;
use terrarium_data::{Agent, Species};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReproductionMode {
    /// Seeding by a single parent, driven by the plant rule.
    Asexual,
    /// Pairing of two eligible partners of the same species.
    Sexual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Runs physics integration and the AI state machine.
    pub mobile: bool,
    pub can_flee: bool,
    pub can_wander: bool,
    /// Species this one feeds on, if any.
    pub food: Option<Species>,
    /// Species this one flees from, if any.
    pub threat: Option<Species>,
    pub reproduction: ReproductionMode,
}

pub trait SpeciesLogic {
    fn capabilities(&self) -> Capabilities;
}

impl SpeciesLogic for Species {
    fn capabilities(&self) -> Capabilities {
        match self {
            Species::Plant => Capabilities {
                mobile: false,
                can_flee: false,
                can_wander: false,
                food: None,
                threat: None,
                reproduction: ReproductionMode::Asexual,
            },
            Species::Herbivore => Capabilities {
                mobile: true,
                can_flee: true,
                can_wander: true,
                food: Some(Species::Plant),
                threat: Some(Species::Carnivore),
                reproduction: ReproductionMode::Sexual,
            },
            Species::Carnivore => Capabilities {
                mobile: true,
                can_flee: false,
                can_wander: true,
                food: Some(Species::Herbivore),
                threat: None,
                reproduction: ReproductionMode::Sexual,
            },
        }
    }
}

/// One plant step: ageing, photosynthesis, growth and maintenance.
///
/// Plants never integrate physics. Their height tracks their size so they
/// stay planted on the ground.
pub fn update_plant(plant: &mut Agent, dt: f64, light_level: f64, growth: &PlantGrowthConfig, ground: f64) {
    let v = &mut plant.vitals;
    v.age += dt;

    let gain = plant.traits.growth_rate * light_level * dt;
    v.energy = (v.energy + gain).min(v.max_energy);

    let potential = v.energy * growth.growth_fraction * dt;
    if v.size < v.max_size && potential > 0.0 {
        let grown = potential.min(v.max_size - v.size);
        v.size += grown;
        v.energy -= grown * growth.growth_cost;
        plant.kinematics.position.y = ground + v.size * 0.5;
    }

    v.energy -= v.size * growth.maintenance_rate * dt;
}

/// Whether a plant is large and energetic enough to seed.
#[must_use]
pub fn plant_can_reproduce(plant: &Agent, growth: &PlantGrowthConfig) -> bool {
    !plant.is_dead()
        && plant.vitals.energy > plant.traits.reproduction_threshold
        && plant.vitals.size > plant.vitals.max_size * growth.reproduction_size_fraction
}

/// Seeds one offspring when eligible and `roll < reproduction_chance * dt`.
///
/// The parent pays half of its energy. The offspring lands at
/// `parent + offset` with X and Z clamped to the world bounds and receives
/// `offspring_energy_fraction` of the parent's remaining energy.
pub fn reproduce_plant(
    plant: &mut Agent,
    dt: f64,
    roll: f64,
    offset: DVec3,
    growth: &PlantGrowthConfig,
    world: &WorldConfig,
) -> Option<BirthRequest> {
    if !plant_can_reproduce(plant, growth) || roll >= growth.reproduction_chance * dt {
        return None;
    }

    plant.vitals.energy *= 0.5;

    let bound = world.half_extent;
    let mut position = plant.position() + offset;
    position.x = position.x.clamp(-bound, bound);
    position.z = position.z.clamp(-bound, bound);
    position.y = world.ground_height;

    Some(BirthRequest {
        species: Species::Plant,
        position,
        energy: plant.vitals.energy * plant.traits.offspring_energy_fraction,
        parents: vec![plant.id],
    })
}

/// Draws the roll and scatter offset from `rng` and calls [`reproduce_plant`].
pub fn maybe_reproduce_plant<R: Rng>(
    plant: &mut Agent,
    dt: f64,
    growth: &PlantGrowthConfig,
    world: &WorldConfig,
    rng: &mut R,
) -> Option<BirthRequest> {
    if !plant_can_reproduce(plant, growth) {
        return None;
    }
    let roll = rng.gen::<f64>();
    let scatter = growth.offspring_scatter;
    let offset = DVec3::new(
        (rng.gen::<f64>() * 2.0 - 1.0) * scatter,
        0.0,
        (rng.gen::<f64>() * 2.0 - 1.0) * scatter,
    );
    reproduce_plant(plant, dt, roll, offset, growth, world)
}
