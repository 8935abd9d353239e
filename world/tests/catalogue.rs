use glam::Vec2;
use tidepool_core::{CellCoord, FoodKind, Layout, TileKind};
use tidepool_world::{query, CatalogueError, TileCatalogue, World};

const SHIPPED: &str = include_str!("../../assets/tiles.toml");

#[test]
fn shipped_catalogue_matches_the_builtin_sizes() {
    let catalogue = TileCatalogue::from_toml_str(SHIPPED).expect("shipped catalogue parses");
    assert_eq!(catalogue, TileCatalogue::builtin());
}

#[test]
fn dropping_a_tile_from_the_shipped_catalogue_is_fatal() {
    let trimmed = SHIPPED.replace("[tiles.timer]", "[other]");
    assert!(TileCatalogue::from_toml_str(&trimmed).is_err());

    let start = SHIPPED.find("[tiles.timer]").expect("timer entry present");
    let without_timer = &SHIPPED[..start];
    assert!(matches!(
        TileCatalogue::from_toml_str(without_timer),
        Err(CatalogueError::MissingTile("timer"))
    ));
}

#[test]
fn world_sizes_items_from_the_catalogue_descriptor() {
    let resized = SHIPPED.replace(
        "[tiles.cake]\nname = \"cake\"\nwidth = 16\nheight = 16",
        "[tiles.cake]\nname = \"cake\"\nwidth = 24\nheight = 20",
    );
    assert_ne!(resized, SHIPPED);
    let catalogue = TileCatalogue::from_toml_str(&resized).expect("resized catalogue parses");

    let mut layout = Layout::filled(3, 3, TileKind::Wall);
    layout.set(CellCoord::new(1, 1), TileKind::Food(FoodKind::Cake));
    let world = World::new(&layout, catalogue);

    let cake = query::descriptor(&world, TileKind::Food(FoodKind::Cake));
    assert_eq!(cake.name(), "cake");
    assert_eq!(cake.size(), Vec2::new(24.0, 20.0));
    assert_eq!(cake.texture_path(), "textures/tiles/cake");
    assert_eq!(
        query::descriptor(&world, TileKind::Food(FoodKind::Apple)).size(),
        Vec2::splat(16.0)
    );
    assert_eq!(query::descriptor(&world, TileKind::Wall).name(), "wall");

    let item = query::items(&world).next().expect("cake spawned");
    assert_eq!(item.bounds.size(), cake.size());
}
