use quartier_core::neighborhood::{neighbors, similarity_counts};
use quartier_core::{happiness_rule, Engine, Grid, IsolatedPolicy, SimConfig};

/// The 5x5 scenario from the reference model: three populations (0, 1) plus
/// empty lots (3), evaluated at radius 1 with a fixed tolerance of 0.5.
fn fixture_grid() -> Grid {
    #[rustfmt::skip]
    let cells = vec![
        0, 0, 0, 1, 3,
        0, 0, 1, 1, 3,
        1, 1, 3, 0, 0,
        1, 1, 0, 0, 3,
        3, 3, 0, 0, 1,
    ];
    Grid::from_cells(5, 5, cells, 3).unwrap()
}

fn fixture_config() -> SimConfig {
    let mut config = SimConfig::default();
    config.grid.seed = Some(99);
    config.radius = 1;
    config.shock.pool_size = 200;
    config.tolerance.pool_size = 200;
    config.steps = 10;
    config
}

#[test]
fn classification_matches_hand_computed_counts() {
    let grid = fixture_grid();

    // Cell (0, 0) holds code 0. Its eight wrapped neighbors contain four
    // occupied cells, three of them also code 0.
    let (alike, total) = similarity_counts(&grid, 0, 0, 1);
    assert_eq!((alike, total), (3, 4));
    assert!(happiness_rule(alike, total, 0.5, false, IsolatedPolicy::Happy));

    // Cell (4, 4) holds code 1: five occupied neighbors, two alike.
    let (alike, total) = similarity_counts(&grid, 4, 4, 1);
    assert_eq!((alike, total), (2, 5));
    assert!(!happiness_rule(alike, total, 0.5, false, IsolatedPolicy::Happy));

    // The comparison is strict: a ratio exactly at the threshold is unhappy.
    assert!(!happiness_rule(2, 4, 0.5, false, IsolatedPolicy::Happy));
}

#[test]
fn neighborhood_cardinality_is_24_at_radius_2() {
    for rows in [5, 6, 51] {
        for cols in [5, 7, 51] {
            let n = neighbors(rows, cols, 0, 0, 2);
            assert_eq!(n.len(), 24, "{rows}x{cols}");
        }
    }
}

#[test]
fn conservation_holds_over_a_full_run() {
    let mut config = SimConfig::default();
    config.grid.rows = 25;
    config.grid.cols = 25;
    config.grid.seed = Some(7);
    config.shock.pool_size = 1000;
    config.tolerance.pool_size = 1000;
    config.steps = 50;

    let mut engine = Engine::new(config).unwrap();
    let census = engine.grid().code_census();
    while !engine.is_finished() {
        let report = engine.step().unwrap();
        assert!(
            (0.0..=100.0).contains(&report.happiness),
            "happiness out of bounds at tick {}",
            report.tick
        );
        assert_eq!(engine.grid().code_census(), census);
    }
    assert_eq!(engine.happiness().len(), 50);
}

#[test]
fn all_happy_step_leaves_grid_unchanged() {
    let mut config = fixture_config();
    config.tolerance.mean = -1.0;
    config.tolerance.std_dev = 0.0;
    config.shock.percentile = 100.0;

    let mut engine = Engine::from_grid(config, fixture_grid()).unwrap();
    let before = engine.grid().clone();
    let report = engine.step().unwrap();

    assert_eq!(report.happiness, 100.0);
    assert_eq!(report.relocated, 0);
    assert_eq!(engine.grid(), &before);
}

#[test]
fn saturated_grid_keeps_unhappy_cells_in_place() {
    // No empty lots anywhere and a tolerance no ratio can exceed.
    let full = Grid::from_cells(4, 4, vec![0, 1, 0, 1, 1, 0, 1, 0, 0, 1, 0, 1, 1, 0, 1, 0], 2)
        .unwrap();
    let mut config = fixture_config();
    config.population.proportions = vec![0.5, 0.5, 0.0];
    config.tolerance.mean = 2.0;
    config.tolerance.std_dev = 0.0;
    config.shock.percentile = 100.0;

    let mut engine = Engine::from_grid(config, full).unwrap();
    let before = engine.grid().clone();
    let report = engine.step().unwrap();

    assert_eq!(report.happiness, 0.0);
    assert_eq!(report.relocated, 0);
    assert_eq!(engine.grid(), &before);
}

#[test]
fn empty_grid_records_full_happiness() {
    let empty = Grid::from_cells(4, 4, vec![3; 16], 3).unwrap();
    let mut engine = Engine::from_grid(fixture_config(), empty).unwrap();
    let report = engine.step().unwrap();
    assert_eq!(report.happiness, 100.0);
    assert_eq!(report.relocated, 0);
}

#[test]
fn relocation_moves_only_into_empty_lots() {
    let mut config = fixture_config();
    // Everyone unhappy so every occupant tries to move.
    config.tolerance.mean = 2.0;
    config.tolerance.std_dev = 0.0;
    config.shock.percentile = 100.0;

    let mut engine = Engine::from_grid(config, fixture_grid()).unwrap();
    let occupied_before = engine.grid().occupied_count();
    let empty_before = engine.grid().empty_positions().len();
    let report = engine.step().unwrap();

    assert_eq!(report.happiness, 0.0);
    assert!(report.relocated > 0);
    assert_eq!(engine.grid().occupied_count(), occupied_before);
    assert_eq!(engine.grid().empty_positions().len(), empty_before);
}
