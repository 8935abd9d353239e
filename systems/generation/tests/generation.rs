use tidepool_core::{CellCoord, TileKind};
use tidepool_system_generation::{
    ensure_connected, generate, BacktrackPolicy, ChaChaSource, GenerationConfig, MazeGenerator,
    OverlapPolicy, RoomCarver, RoomConfig, MAZE_ORIGIN,
};
use tidepool_world::ConnectivityGraph;

#[test]
fn four_by_four_maze_reaches_its_coverage_threshold() {
    for seed in 0..32 {
        let mut maze = MazeGenerator::new(4, 4, BacktrackPolicy::Front);
        assert_eq!(maze.coverage_threshold(), 16);
        let steps = maze
            .run(&mut ChaChaSource::seeded(seed))
            .expect("maze completes");
        assert_eq!(maze.visited_count(), 16);
        assert!(steps >= 15, "each carve is a step, got {steps}");
        assert!(steps < 1_000);
    }
}

#[test]
fn carved_mazes_are_connected_for_every_size_and_policy() {
    for policy in [BacktrackPolicy::Front, BacktrackPolicy::Back] {
        for (columns, rows) in [(1, 1), (2, 3), (4, 4), (7, 5), (15, 15)] {
            for seed in 0..8 {
                let mut rng = ChaChaSource::seeded(seed);
                let mut maze = MazeGenerator::new(columns, rows, policy);
                let _ = maze.run(&mut rng).expect("maze completes");
                let mut layout = maze.expand();
                assert_eq!(layout.columns(), columns * 2 + 1);
                assert_eq!(layout.rows(), rows * 2 + 1);
                assert_eq!(ensure_connected(&layout), Ok(()));

                let _ = RoomCarver::new(RoomConfig::default()).carve(&mut layout, &mut rng);
                assert_eq!(
                    ensure_connected(&layout),
                    Ok(()),
                    "{columns}x{rows} seed {seed} disconnected by rooms"
                );
            }
        }
    }
}

#[test]
fn front_and_back_policies_produce_different_mazes() {
    let carve = |policy| {
        let mut maze = MazeGenerator::new(15, 15, policy);
        let _ = maze
            .run(&mut ChaChaSource::seeded(99))
            .expect("maze completes");
        maze.expand()
    };
    assert_ne!(carve(BacktrackPolicy::Front), carve(BacktrackPolicy::Back));
}

#[test]
fn generated_layouts_keep_every_walkable_cell_reachable() {
    for seed in 0..16 {
        let layout = generate(&GenerationConfig::default(), &mut ChaChaSource::seeded(seed))
            .expect("generation succeeds");
        let unreachable = ConnectivityGraph::build(&layout).unreachable_from(MAZE_ORIGIN);
        assert!(unreachable.is_empty(), "seed {seed}: {unreachable:?}");
        assert_eq!(layout.get(CellCoord::new(0, 0)), Some(TileKind::Timer));
        assert_eq!(layout.player_spawn(), MAZE_ORIGIN);
        assert_eq!(layout.enemy_spawns().len(), 1);
    }
}

#[test]
fn the_border_stays_solid() {
    let layout = generate(&GenerationConfig::default(), &mut ChaChaSource::seeded(4))
        .expect("generation succeeds");
    let (last_column, last_row) = (layout.columns() - 1, layout.rows() - 1);
    for (cell, kind) in layout.cells() {
        let border = cell.column() == 0
            || cell.row() == 0
            || cell.column() == last_column
            || cell.row() == last_row;
        if border {
            assert!(
                matches!(kind, TileKind::Wall | TileKind::Timer),
                "{cell:?} holds {kind:?}"
            );
        }
    }
}

#[test]
fn seeds_reproduce_layouts() {
    let config = GenerationConfig {
        rooms: RoomConfig {
            overlap: OverlapPolicy::Strict,
            ..RoomConfig::default()
        },
        enemies: 3,
        ..GenerationConfig::default()
    };
    let first = generate(&config, &mut ChaChaSource::seeded(2024)).expect("generation succeeds");
    let second = generate(&config, &mut ChaChaSource::seeded(2024)).expect("generation succeeds");
    let other = generate(&config, &mut ChaChaSource::seeded(2025)).expect("generation succeeds");
    assert_eq!(first, second);
    assert_ne!(first, other);
    assert_eq!(first.enemy_spawns().len(), 3);
}
