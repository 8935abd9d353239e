#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Tidepool.
//!
//! The world is built once from a generated [`Layout`] and mutated only
//! through [`apply`]. Systems observe it through the read-only [`query`]
//! module.

mod actors;
mod catalogue;
mod connectivity;
mod cooldown;
mod countdown;
mod grid;
mod items;
mod puzzle;

use std::time::Duration;

use tidepool_core::{
    Actor, BoardSlot, CellCoord, Command, EnemyId, Event, InteractionError, Layout, Outcome,
    ReceptacleKind, ShellColor, TileKind,
};

pub use actors::{
    ACTOR_SIZE, ATTACK_COOLDOWN, FRICTION, HITBOX_BUFFER, PLAYER_MAX_HEALTH, STUN_COOLDOWN,
};
pub use catalogue::{
    CatalogueError, DescriptorKey, TileCatalogue, TileDescriptor, SUPPORTED_CATALOGUE_VERSION,
};
pub use connectivity::ConnectivityGraph;
pub use cooldown::{Cooldown, CooldownState};
pub use countdown::COUNTDOWN_LIMIT;
pub use grid::Tile;
pub use items::{Counters, COLLECT_BUFFER};
pub use puzzle::ShellBoard;

use actors::{Enemy, Player};
use countdown::Countdown;
use grid::Grid;
use items::Items;

/// Largest cell distance from which the player may use a board or the timer.
pub const INTERACTION_RANGE: f32 = 3.0;
/// Silver awarded for redeeming the treasure map at its marker.
pub const TREASURE_SILVER: u32 = 4;
/// Reward granted the first time the player's board matches the reference.
pub const PUZZLE_REWARD: Counters = Counters {
    food_points: 3,
    silver: 5,
    gold: 1,
};

#[derive(Clone, Debug)]
struct Boards {
    player: ShellBoard,
    player_cell: CellCoord,
    reference: ShellBoard,
    reference_cell: CellCoord,
    completed: bool,
}

/// Represents the authoritative Tidepool world state.
#[derive(Clone, Debug)]
pub struct World {
    catalogue: TileCatalogue,
    grid: Grid,
    connectivity: ConnectivityGraph,
    player: Player,
    enemies: Vec<Enemy>,
    items: Items,
    counters: Counters,
    countdown: Countdown,
    boards: Option<Boards>,
    selected_shell: Option<ShellColor>,
    timer_cell: Option<CellCoord>,
    marker_cell: Option<CellCoord>,
    treasure_used: bool,
    outcome: Option<Outcome>,
    tick_index: u64,
}

impl World {
    /// Builds a world from a generated layout, sizing tiles from `catalogue`.
    #[must_use]
    pub fn new(layout: &Layout, catalogue: TileCatalogue) -> Self {
        let mut grid = Grid::from_layout(layout, &catalogue);
        let tile = grid.tile_size();

        let mut items = Items::default();
        for (cell, kind) in layout.cells() {
            if kind.is_collectible() {
                let size = catalogue.descriptor_for(kind).size();
                let id = items.spawn(cell, kind, tile, size);
                grid.attach_item(cell, id);
            }
        }

        let enemies: Vec<Enemy> = layout
            .enemy_spawns()
            .iter()
            .enumerate()
            .map(|(index, cell)| Enemy::spawn(EnemyId::new(index as u32), *cell, tile))
            .collect();

        let boards = locate_boards(&grid);
        let timer_cell = grid.find(|kind| kind == TileKind::Timer);
        let marker_cell = grid.find(|kind| kind == TileKind::MapMarker);

        tracing::debug!(
            columns = layout.columns(),
            rows = layout.rows(),
            enemies = enemies.len(),
            puzzle = boards.is_some(),
            "world assembled from layout"
        );

        Self {
            connectivity: ConnectivityGraph::build(layout),
            player: Player::spawn(layout.player_spawn(), tile),
            enemies,
            items,
            counters: Counters::default(),
            countdown: Countdown::full(),
            boards,
            selected_shell: None,
            timer_cell,
            marker_cell,
            treasure_used: false,
            outcome: None,
            tick_index: 0,
            grid,
            catalogue,
        }
    }

    fn player_cell(&self) -> CellCoord {
        self.player.motion.cell(self.grid.tile_size())
    }

    fn within_reach(&self, target: CellCoord) -> bool {
        self.player_cell().distance(target) <= INTERACTION_RANGE
    }

    fn enemy_mut(&mut self, enemy: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|candidate| candidate.id == enemy)
    }

    fn conclude(&mut self, outcome: Outcome, out_events: &mut Vec<Event>) {
        if self.outcome.is_some() {
            return;
        }
        self.outcome = Some(outcome);
        tracing::info!(?outcome, tick = self.tick_index, "run concluded");
        out_events.push(Event::GameConcluded { outcome });
    }

    fn check_defeat(&mut self, out_events: &mut Vec<Event>) {
        if self.player.health == 0 || self.countdown.remaining() == 0 {
            self.conclude(Outcome::Lost, out_events);
        }
    }
}

fn locate_boards(grid: &Grid) -> Option<Boards> {
    let player_cell =
        grid.find(|kind| kind == TileKind::PuzzleReceptacle(ReceptacleKind::Empty))?;
    let (reference_cell, arrangement) = grid.tiles().iter().find_map(|tile| match tile.kind() {
        TileKind::PuzzleReceptacle(ReceptacleKind::Reference(arrangement)) => {
            Some((tile.cell(), arrangement))
        }
        _ => None,
    })?;
    Some(Boards {
        player: ShellBoard::empty(),
        player_cell,
        reference: ShellBoard::reference(arrangement),
        reference_cell,
        completed: false,
    })
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.outcome.is_some() {
        if is_interaction(&command) {
            reject(out_events, InteractionError::Concluded);
        }
        return;
    }

    match command {
        Command::Tick { dt } => tick(world, dt, out_events),
        Command::SteerPlayer { heading } => world.player.steer(heading),
        Command::SetPlayerAttack { engaged } => world.player.attack_held = engaged,
        Command::StepEnemy { enemy, offset } => {
            let bounds = world.grid.bounds();
            if let Some(enemy) = world.enemy_mut(enemy) {
                if !enemy.stunned {
                    enemy.motion.position += offset;
                    enemy.motion.clamp_to(&bounds);
                }
            }
        }
        Command::SettleActor { actor, position } => {
            let bounds = world.grid.bounds();
            let motion = match actor {
                Actor::Player => Some(&mut world.player.motion),
                Actor::Enemy(enemy) => world.enemy_mut(enemy).map(|enemy| &mut enemy.motion),
            };
            if let Some(motion) = motion {
                motion.position = position;
                motion.clamp_to(&bounds);
            }
        }
        Command::CollectItem { item } => {
            if let Some(entry) = world.items.get_mut(item) {
                if entry.collect(&mut world.counters) {
                    tracing::debug!(item = item.get(), kind = ?entry.kind, "item collected");
                    out_events.push(Event::ItemCollected {
                        item,
                        kind: entry.kind,
                    });
                }
            }
        }
        Command::StunEnemy { enemy } => {
            if let Some(target) = world.enemy_mut(enemy) {
                target.stunned = true;
                tracing::debug!(enemy = enemy.get(), "enemy stunned");
                out_events.push(Event::EnemyStunned { enemy });
            }
        }
        Command::StrikePlayer { enemy } => {
            let Some(attacker) = world.enemies.iter_mut().find(|candidate| candidate.id == enemy)
            else {
                return;
            };
            if !attacker.attacking {
                return;
            }
            attacker.attacking = false;
            if world.player.take_hit() {
                tracing::debug!(enemy = enemy.get(), health = world.player.health, "player struck");
                out_events.push(Event::PlayerStruck {
                    enemy,
                    health: world.player.health,
                });
            }
            world.check_defeat(out_events);
        }
        Command::SelectShell { color } => select_shell(world, color, out_events),
        Command::PlaceShell { slot } => place_shell(world, slot, out_events),
        Command::FeedTimer { coins } => feed_timer(world, coins, out_events),
        Command::RedeemTreasureMap => redeem_treasure_map(world, out_events),
        Command::RequestExit => match world.timer_cell {
            Some(timer) if world.within_reach(timer) => world.conclude(Outcome::Won, out_events),
            _ => reject(out_events, InteractionError::OutOfRange),
        },
    }
}

fn is_interaction(command: &Command) -> bool {
    matches!(
        command,
        Command::SelectShell { .. }
            | Command::PlaceShell { .. }
            | Command::FeedTimer { .. }
            | Command::RedeemTreasureMap
            | Command::RequestExit
    )
}

fn reject(out_events: &mut Vec<Event>, reason: InteractionError) {
    out_events.push(Event::InteractionRejected { reason });
}

fn tick(world: &mut World, dt: Duration, out_events: &mut Vec<Event>) {
    world.tick_index = world.tick_index.saturating_add(1);
    out_events.push(Event::TimeAdvanced { dt });

    let bounds = world.grid.bounds();
    world.player.tick(dt);
    world.player.motion.clamp_to(&bounds);
    for enemy in &mut world.enemies {
        enemy.tick(dt);
    }

    if world.countdown.advance(dt) {
        out_events.push(Event::CountdownChanged {
            remaining: world.countdown.remaining(),
        });
    }
    world.check_defeat(out_events);
}

fn select_shell(world: &mut World, color: Option<ShellColor>, out_events: &mut Vec<Event>) {
    if let Some(color) = color {
        let available = world
            .items
            .shell_mut(color)
            .is_some_and(|shell| shell.collected && !shell.placed);
        if !available {
            reject(out_events, InteractionError::ShellUnavailable);
            return;
        }
    }
    world.selected_shell = color;
    out_events.push(Event::ShellSelected { color });
}

fn place_shell(world: &mut World, slot: BoardSlot, out_events: &mut Vec<Event>) {
    let player_cell = world.player_cell();
    let Some(boards) = world.boards.as_mut() else {
        reject(out_events, InteractionError::OutOfRange);
        return;
    };
    if player_cell.distance(boards.player_cell) > INTERACTION_RANGE {
        reject(out_events, InteractionError::OutOfRange);
        return;
    }

    if let Some(color) = boards.player.take(slot) {
        if let Some(shell) = world.items.shell_mut(color) {
            shell.placed = false;
        }
        tracing::debug!(slot = slot.index(), ?color, "shell taken back");
        out_events.push(Event::ShellRemoved { slot, color });
        return;
    }

    let Some(color) = world.selected_shell else {
        reject(out_events, InteractionError::NothingSelected);
        return;
    };
    if !boards.player.insert(slot, color) {
        return;
    }
    if let Some(shell) = world.items.shell_mut(color) {
        shell.placed = true;
    }
    world.selected_shell = None;
    tracing::debug!(slot = slot.index(), ?color, "shell placed");
    out_events.push(Event::ShellPlaced { slot, color });

    if !boards.completed && boards.player == boards.reference {
        boards.completed = true;
        world.counters.food_points += PUZZLE_REWARD.food_points;
        world.counters.silver += PUZZLE_REWARD.silver;
        world.counters.gold += PUZZLE_REWARD.gold;
        tracing::info!("shell puzzle completed");
        out_events.push(Event::PuzzleCompleted);
    }
}

fn feed_timer(world: &mut World, coins: u32, out_events: &mut Vec<Event>) {
    match world.timer_cell {
        Some(timer) if world.within_reach(timer) => {}
        _ => {
            reject(out_events, InteractionError::OutOfRange);
            return;
        }
    }

    let mut fed = 0;
    while fed < coins {
        let Some(coin) = world
            .countdown
            .coin_that_fits(world.counters.silver, world.counters.gold)
        else {
            break;
        };
        *world.counters.coins_mut(coin) -= 1;
        world.countdown.add(coin.seconds());
        fed += 1;
        out_events.push(Event::TimerFed {
            coin,
            remaining: world.countdown.remaining(),
        });
    }

    if fed == 0 {
        reject(out_events, InteractionError::NoCoinFits);
    }
}

fn redeem_treasure_map(world: &mut World, out_events: &mut Vec<Event>) {
    let carried = world.items.treasure_map().is_some_and(|map| map.collected);
    let on_marker = world.marker_cell == Some(world.player_cell());
    if !carried || world.treasure_used || !on_marker {
        reject(out_events, InteractionError::MapUnavailable);
        return;
    }
    world.treasure_used = true;
    world.counters.silver += TREASURE_SILVER;
    tracing::debug!("treasure map redeemed");
    out_events.push(Event::TreasureRedeemed);
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use glam::Vec2;
    use tidepool_core::{
        Aabb, CellCoord, CollisionBody, CompassHeading, EnemyId, ItemId, Outcome, ShellColor,
        TileKind,
    };

    use super::{
        actors::ACTOR_SIZE, items::Item, ConnectivityGraph, Counters, ShellBoard, Tile,
        TileCatalogue, TileDescriptor, World,
    };

    /// Side length of a grid cell in world units.
    #[must_use]
    pub fn tile_size(world: &World) -> Vec2 {
        world.grid.tile_size()
    }

    /// Number of columns and rows in the grid.
    #[must_use]
    pub fn dimensions(world: &World) -> (u32, u32) {
        world.grid.dimensions()
    }

    /// World-space rectangle covered by the map.
    #[must_use]
    pub fn map_bounds(world: &World) -> Aabb {
        world.grid.bounds()
    }

    /// Tile stored at the cell, looked up by index.
    #[must_use]
    pub fn tile(world: &World, cell: CellCoord) -> Option<&Tile> {
        world.grid.tile(cell)
    }

    /// Every tile in row-major order.
    #[must_use]
    pub fn tiles(world: &World) -> &[Tile] {
        world.grid.tiles()
    }

    /// Tiles matching `predicate` that fall inside `viewport`.
    pub fn visible_tiles<'a>(
        world: &'a World,
        viewport: Aabb,
        mut predicate: impl FnMut(TileKind) -> bool + 'a,
    ) -> impl Iterator<Item = &'a Tile> + 'a {
        world
            .grid
            .tiles()
            .iter()
            .filter(move |tile| predicate(tile.kind()) && tile.is_in_viewport(&viewport))
    }

    /// Catalogue the world was sized from.
    #[must_use]
    pub fn catalogue(world: &World) -> &TileCatalogue {
        &world.catalogue
    }

    /// Descriptor for tiles of the provided kind.
    #[must_use]
    pub fn descriptor(world: &World, kind: TileKind) -> &TileDescriptor {
        world.catalogue.descriptor_for(kind)
    }

    /// Connectivity graph built from the layout.
    #[must_use]
    pub fn connectivity(world: &World) -> &ConnectivityGraph {
        &world.connectivity
    }

    /// Solid bodies of the obstacles around `cell`.
    #[must_use]
    pub fn obstacles_near(world: &World, cell: CellCoord) -> Vec<CollisionBody> {
        world
            .grid
            .neighbourhood(cell)
            .filter_map(Tile::body)
            .collect()
    }

    /// Items spawned in the 3x3 block around `cell`.
    #[must_use]
    pub fn items_near(world: &World, cell: CellCoord) -> Vec<ItemSnapshot> {
        world
            .grid
            .neighbourhood(cell)
            .filter_map(Tile::item)
            .filter_map(|id| world.items.get(id))
            .map(snapshot_item)
            .collect()
    }

    /// Every item in identifier order.
    pub fn items(world: &World) -> impl Iterator<Item = ItemSnapshot> + '_ {
        world.items.iter().map(snapshot_item)
    }

    /// Single item by identifier.
    #[must_use]
    pub fn item(world: &World, item: ItemId) -> Option<ItemSnapshot> {
        world.items.get(item).map(snapshot_item)
    }

    /// Captures the player's state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        let player = &world.player;
        PlayerSnapshot {
            position: player.motion.position,
            previous_position: player.motion.previous,
            size: ACTOR_SIZE,
            velocity: player.velocity,
            cell: player.motion.cell(world.grid.tile_size()),
            body: player.motion.body(),
            hitbox: player.motion.hitbox(),
            health: player.health,
            attacking: player.attacking,
            attack_elapsed: player.attack.elapsed(),
        }
    }

    /// Captures every enemy's state in identifier order.
    #[must_use]
    pub fn enemies(world: &World) -> Vec<EnemySnapshot> {
        let tile = world.grid.tile_size();
        let mut snapshots: Vec<EnemySnapshot> = world
            .enemies
            .iter()
            .map(|enemy| EnemySnapshot {
                id: enemy.id,
                position: enemy.motion.position,
                previous_position: enemy.motion.previous,
                size: ACTOR_SIZE,
                cell: enemy.motion.cell(tile),
                body: enemy.motion.body(),
                hitbox: enemy.motion.hitbox(),
                attacking: enemy.attacking,
                stunned: enemy.stunned,
                attack_elapsed: enemy.attack.elapsed(),
                stun_elapsed: enemy.stun.elapsed(),
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        snapshots
    }

    /// Food, silver and gold counters.
    #[must_use]
    pub fn counters(world: &World) -> Counters {
        world.counters
    }

    /// Whole seconds left on the countdown.
    #[must_use]
    pub fn countdown_remaining(world: &World) -> u32 {
        world.countdown.remaining()
    }

    /// Shell the player currently carries.
    #[must_use]
    pub fn selected_shell(world: &World) -> Option<ShellColor> {
        world.selected_shell
    }

    /// State of both shell boards, when the layout contains them.
    #[must_use]
    pub fn boards(world: &World) -> Option<BoardsSnapshot> {
        world.boards.as_ref().map(|boards| BoardsSnapshot {
            player_cell: boards.player_cell,
            player: boards.player,
            reference_cell: boards.reference_cell,
            reference: boards.reference,
            completed: boards.completed,
        })
    }

    /// Heading from the player toward the treasure marker while the map is
    /// carried and unused.
    #[must_use]
    pub fn treasure_heading(world: &World) -> Option<CompassHeading> {
        let map = world.items.treasure_map()?;
        if !map.collected || world.treasure_used {
            return None;
        }
        let marker = world.marker_cell?;
        Some(world.player_cell().heading_to(marker))
    }

    /// Reports whether the treasure map was redeemed.
    #[must_use]
    pub fn treasure_used(world: &World) -> bool {
        world.treasure_used
    }

    /// Cell of the countdown timer.
    #[must_use]
    pub fn timer_cell(world: &World) -> Option<CellCoord> {
        world.timer_cell
    }

    /// Cell the treasure map points to.
    #[must_use]
    pub fn marker_cell(world: &World) -> Option<CellCoord> {
        world.marker_cell
    }

    /// Outcome of the run, once decided.
    #[must_use]
    pub fn outcome(world: &World) -> Option<Outcome> {
        world.outcome
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Read-only snapshot of the player.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct PlayerSnapshot {
        /// Top-left corner of the body.
        pub position: Vec2,
        /// Top-left corner at the start of the current tick.
        pub previous_position: Vec2,
        /// Body size.
        pub size: Vec2,
        /// Velocity applied during the last tick.
        pub velocity: Vec2,
        /// Cell containing the body's centre.
        pub cell: CellCoord,
        /// Exact collision body.
        pub body: CollisionBody,
        /// Combat-sensing bounds.
        pub hitbox: Aabb,
        /// Remaining health.
        pub health: u32,
        /// Whether the player attacks this tick.
        pub attacking: bool,
        /// Attack cooldown progress.
        pub attack_elapsed: Duration,
    }

    /// Read-only snapshot of an enemy.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct EnemySnapshot {
        /// Identifier of the enemy.
        pub id: EnemyId,
        /// Top-left corner of the body.
        pub position: Vec2,
        /// Top-left corner at the start of the current tick.
        pub previous_position: Vec2,
        /// Body size.
        pub size: Vec2,
        /// Cell containing the body's centre.
        pub cell: CellCoord,
        /// Exact collision body.
        pub body: CollisionBody,
        /// Combat-sensing bounds.
        pub hitbox: Aabb,
        /// Whether the enemy attacks this tick.
        pub attacking: bool,
        /// Whether the enemy is stunned.
        pub stunned: bool,
        /// Attack cooldown progress.
        pub attack_elapsed: Duration,
        /// Stun cooldown progress.
        pub stun_elapsed: Duration,
    }

    /// Read-only snapshot of a collectible item.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct ItemSnapshot {
        /// Identifier of the item.
        pub id: ItemId,
        /// Cell the item was spawned in.
        pub cell: CellCoord,
        /// Kind of the item.
        pub kind: TileKind,
        /// Drawn area.
        pub bounds: Aabb,
        /// Trigger body; disabled once collected.
        pub body: CollisionBody,
        /// Whether the player picked the item up.
        pub collected: bool,
        /// Whether the item (a shell) sits on the player's board.
        pub placed: bool,
    }

    impl ItemSnapshot {
        /// Reports whether the item should be drawn inside `viewport`.
        #[must_use]
        pub fn is_in_viewport(&self, viewport: &Aabb) -> bool {
            !self.collected && self.bounds.is_in_viewport(viewport)
        }
    }

    fn snapshot_item(item: &Item) -> ItemSnapshot {
        ItemSnapshot {
            id: item.id,
            cell: item.cell,
            kind: item.kind,
            bounds: item.bounds,
            body: item.body,
            collected: item.collected,
            placed: item.placed,
        }
    }

    /// Read-only snapshot of both shell boards.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct BoardsSnapshot {
        /// Cell of the board the player fills.
        pub player_cell: CellCoord,
        /// Contents of the player's board.
        pub player: ShellBoard,
        /// Cell of the reference board.
        pub reference_cell: CellCoord,
        /// Contents of the reference board.
        pub reference: ShellBoard,
        /// Whether the puzzle reward was granted.
        pub completed: bool,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use tidepool_core::{CoinKind, FoodKind, ItemId};

    fn open_room() -> Layout {
        let mut layout = Layout::filled(7, 7, TileKind::Wall);
        for row in 1..6 {
            for column in 1..6 {
                layout.set(CellCoord::new(column, row), TileKind::Background);
            }
        }
        layout
    }

    #[test]
    fn world_spawns_items_from_collectible_tiles() {
        let mut layout = open_room();
        layout.set(CellCoord::new(2, 2), TileKind::Food(FoodKind::Apple));
        layout.set(CellCoord::new(3, 2), TileKind::MapMarker);
        let world = World::new(&layout, TileCatalogue::builtin());

        let items: Vec<_> = query::items(&world).collect();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].cell, CellCoord::new(2, 2));
        assert_eq!(
            query::tile(&world, CellCoord::new(2, 2)).and_then(Tile::item),
            Some(items[0].id)
        );
        assert_eq!(query::marker_cell(&world), Some(CellCoord::new(3, 2)));
    }

    #[test]
    fn collecting_twice_rewards_once() {
        let mut layout = open_room();
        layout.set(CellCoord::new(2, 2), TileKind::Coin(CoinKind::Silver));
        let mut world = World::new(&layout, TileCatalogue::builtin());
        let mut events = Vec::new();

        apply(&mut world, Command::CollectItem { item: ItemId::new(0) }, &mut events);
        apply(&mut world, Command::CollectItem { item: ItemId::new(0) }, &mut events);

        assert_eq!(query::counters(&world).silver, 1);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn countdown_expiry_loses_the_run() {
        let mut world = World::new(&open_room(), TileCatalogue::builtin());
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(u64::from(COUNTDOWN_LIMIT)),
            },
            &mut events,
        );
        assert_eq!(query::outcome(&world), Some(Outcome::Lost));
        assert!(events.contains(&Event::GameConcluded {
            outcome: Outcome::Lost
        }));

        events.clear();
        apply(&mut world, Command::Tick { dt: Duration::from_secs(1) }, &mut events);
        assert!(events.is_empty(), "a concluded world ignores ticks");
        apply(&mut world, Command::RequestExit, &mut events);
        assert_eq!(
            events,
            vec![Event::InteractionRejected {
                reason: InteractionError::Concluded
            }]
        );
    }

    #[test]
    fn settled_actors_stay_inside_the_map() {
        let mut world = World::new(&open_room(), TileCatalogue::builtin());
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SettleActor {
                actor: Actor::Player,
                position: Vec2::new(-30.0, 1_000.0),
            },
            &mut events,
        );
        let bounds = query::map_bounds(&world);
        let player = query::player(&world);
        assert_eq!(player.position.x, 0.0);
        assert_eq!(player.position.y, bounds.bottom() - ACTOR_SIZE.y);
    }
}
