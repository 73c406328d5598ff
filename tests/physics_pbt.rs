use glam::DVec3;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use terrarium_data::Species;
use terrarium_lib::model::config::AppConfig;
use terrarium_lib::model::lifecycle::{self, AgentLogic};
use terrarium_lib::model::world::World;

prop_compose! {
    fn arb_force()(
        x in -50.0f64..50.0,
        y in -50.0f64..50.0,
        z in -50.0f64..50.0
    ) -> DVec3 {
        DVec3::new(x, y, z)
    }
}

fn mobile_species() -> impl Strategy<Value = Species> {
    prop_oneof![Just(Species::Herbivore), Just(Species::Carnivore)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn test_integration_respects_speed_and_ground(
        species in mobile_species(),
        forces in prop::collection::vec(arb_force(), 1..20),
        dt in 0.0f64..0.5,
        seed in any::<u64>()
    ) {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut agent = lifecycle::create_agent_with(species, DVec3::ZERO, None, &config, &mut rng);

        for force in forces {
            agent.apply_force(force);
            prop_assert!(agent.integrate(dt, 0.0).is_ok());
            let k = &agent.kinematics;
            prop_assert!(k.position.is_finite());
            prop_assert!(k.velocity.length() <= k.max_speed + 1e-9);
            prop_assert!(k.position.y >= agent.vitals.size * 0.5 - 1e-12);
            prop_assert_eq!(k.steering, DVec3::ZERO);
        }
    }

    #[test]
    fn test_energy_drops_by_metabolism(
        dt in 0.0f64..2.0,
        steps in 1usize..30,
        seed in any::<u64>()
    ) {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut agent =
            lifecycle::create_agent_with(Species::Carnivore, DVec3::ZERO, None, &config, &mut rng);
        let start = agent.energy();

        for _ in 0..steps {
            agent.integrate(dt, 0.0).ok();
        }
        let expected = start - dt * steps as f64 * agent.vitals.metabolic_rate;
        prop_assert!((agent.energy() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_world_population_stays_live(seed in any::<u64>(), ticks in 1usize..60) {
        let mut config = AppConfig::default();
        config.world.seed = Some(seed);
        config.world.initial_plants = 15;
        config.world.initial_herbivores = 6;
        config.world.initial_carnivores = 2;
        let mut world = World::new(config).unwrap();

        for _ in 0..ticks {
            let report = world.step(0.2);
            prop_assert_eq!(report.stats.total, world.population());
        }
        for agent in world.arena.iter() {
            prop_assert!(!agent.is_dead());
            prop_assert!(agent.position().is_finite());
            prop_assert!(agent.energy() <= agent.vitals.max_energy + 1e-9);
        }
    }
}
