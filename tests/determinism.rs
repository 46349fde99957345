use quartier_core::{Engine, SimConfig};

#[test]
fn test_determinism_consistency() {
    let mut config = SimConfig::default();
    config.grid.rows = 31;
    config.grid.cols = 31;
    config.grid.seed = Some(12345);
    config.shock.pool_size = 2000;
    config.tolerance.pool_size = 2000;
    config.steps = 100;

    let mut engine1 = Engine::new(config.clone()).unwrap();
    let mut engine2 = Engine::new(config).unwrap();

    // Same seed, same initial grid.
    assert_eq!(engine1.grid(), engine2.grid());

    for _ in 0..100 {
        let r1 = engine1.step().unwrap();
        let r2 = engine2.step().unwrap();
        assert_eq!(r1.shocked, r2.shocked, "tick {}", r1.tick);
        assert_eq!(r1.happiness, r2.happiness, "tick {}", r1.tick);
    }

    assert_eq!(engine1.grid(), engine2.grid());
    assert_eq!(
        engine1.happiness().as_slice(),
        engine2.happiness().as_slice()
    );
}

#[test]
fn test_different_seeds_diverge() {
    let mut config = SimConfig::default();
    config.grid.rows = 31;
    config.grid.cols = 31;
    config.shock.pool_size = 2000;
    config.tolerance.pool_size = 2000;
    config.steps = 10;

    config.grid.seed = Some(1);
    let engine1 = Engine::new(config.clone()).unwrap();
    config.grid.seed = Some(2);
    let engine2 = Engine::new(config).unwrap();

    assert_ne!(engine1.grid(), engine2.grid());
}
