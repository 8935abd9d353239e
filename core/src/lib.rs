#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tidepool engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.
//!
//! The generated map travels between crates as a [`Layout`]: a dense grid of
//! [`TileKind`] values plus the spawn locations chosen during placement.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Side length of a square world tile measured in world units.
pub const TILE_LENGTH: f32 = 48.0;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Updates the movement heading requested by the input layer.
    SteerPlayer {
        /// Desired acceleration; each component is clamped to `[-1, 1]`.
        heading: Vec2,
    },
    /// Reports whether the attack input is currently held.
    SetPlayerAttack {
        /// `true` while the attack input is held.
        engaged: bool,
    },
    /// Moves an enemy by a pursuit offset computed for the current tick.
    StepEnemy {
        /// Identifier of the enemy that should move.
        enemy: EnemyId,
        /// Offset applied to the enemy's position in world units.
        offset: Vec2,
    },
    /// Overrides the position of an actor after collision push-out.
    SettleActor {
        /// Actor whose position is corrected.
        actor: Actor,
        /// Resolved top-left position in world units.
        position: Vec2,
    },
    /// Collects an item the player touched.
    CollectItem {
        /// Identifier of the item being collected.
        item: ItemId,
    },
    /// Stuns an enemy hit by the player's attack.
    StunEnemy {
        /// Identifier of the enemy that was hit.
        enemy: EnemyId,
    },
    /// Applies an enemy's attack to the player.
    StrikePlayer {
        /// Identifier of the attacking enemy.
        enemy: EnemyId,
    },
    /// Selects the shell the player carries toward the puzzle board.
    SelectShell {
        /// Shell to carry, or `None` to put the current shell away.
        color: Option<ShellColor>,
    },
    /// Places the carried shell into a slot of the player's board, or takes
    /// back the shell occupying that slot.
    PlaceShell {
        /// Slot targeted by the interaction.
        slot: BoardSlot,
    },
    /// Spends up to the provided number of coins to add time to the countdown.
    FeedTimer {
        /// Maximum number of coins to insert.
        coins: u32,
    },
    /// Redeems the carried treasure map while standing on its marker.
    RedeemTreasureMap,
    /// Requests leaving the maze through the timer.
    RequestExit,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Reports that the countdown changed its whole-second value.
    CountdownChanged {
        /// Seconds left on the countdown.
        remaining: u32,
    },
    /// Confirms that an item was collected by the player.
    ItemCollected {
        /// Identifier of the collected item.
        item: ItemId,
        /// Kind of tile the item was spawned from.
        kind: TileKind,
    },
    /// Confirms that the player's attack stunned an enemy.
    EnemyStunned {
        /// Identifier of the stunned enemy.
        enemy: EnemyId,
    },
    /// Confirms that an enemy attack landed on the player.
    PlayerStruck {
        /// Identifier of the attacking enemy.
        enemy: EnemyId,
        /// Health remaining after the hit.
        health: u32,
    },
    /// Announces the shell the player now carries.
    ShellSelected {
        /// Carried shell, if any.
        color: Option<ShellColor>,
    },
    /// Confirms that a shell was placed into a board slot.
    ShellPlaced {
        /// Slot that received the shell.
        slot: BoardSlot,
        /// Shell that was placed.
        color: ShellColor,
    },
    /// Confirms that a shell was taken back from a board slot.
    ShellRemoved {
        /// Slot that was emptied.
        slot: BoardSlot,
        /// Shell returned to the inventory.
        color: ShellColor,
    },
    /// Announces that the player's board matches the reference board.
    PuzzleCompleted,
    /// Confirms that a coin was inserted into the timer.
    TimerFed {
        /// Coin that was spent.
        coin: CoinKind,
        /// Seconds left on the countdown after the insertion.
        remaining: u32,
    },
    /// Confirms that the treasure map was redeemed at its marker.
    TreasureRedeemed,
    /// Reports that an interaction command was ignored.
    InteractionRejected {
        /// Reason the interaction was rejected.
        reason: InteractionError,
    },
    /// Announces that the run ended.
    GameConcluded {
        /// Final outcome of the run.
        outcome: Outcome,
    },
}

/// Final result of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The player left the maze through the timer.
    Won,
    /// The countdown ran out or the player lost all health.
    Lost,
}

/// Reasons an interaction command may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionError {
    /// The player stands too far from the targeted tile.
    OutOfRange,
    /// No shell is selected while placing into an empty slot.
    NothingSelected,
    /// The requested shell has not been collected or is already placed.
    ShellUnavailable,
    /// No owned coin fits into the remaining countdown headroom.
    NoCoinFits,
    /// The treasure map is not carried, already used, or the player is not on the marker.
    MapUnavailable,
    /// The run already ended.
    Concluded,
}

/// Actors that move through the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Actor {
    /// The player-controlled character.
    Player,
    /// A pursuing enemy.
    Enemy(EnemyId),
}

/// Cardinal directions on the grid. Rows grow southward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing row indices.
    North,
    /// Toward increasing column indices.
    East,
    /// Toward increasing row indices.
    South,
    /// Toward decreasing column indices.
    West,
}

impl Direction {
    /// All directions in clockwise order starting from north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];
}

/// Compass heading from one cell toward another, including "already there".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompassHeading {
    /// Target lies straight north.
    North,
    /// Target lies north-east.
    NorthEast,
    /// Target lies straight east.
    East,
    /// Target lies south-east.
    SouthEast,
    /// Target lies straight south.
    South,
    /// Target lies south-west.
    SouthWest,
    /// Target lies straight west.
    West,
    /// Target lies north-west.
    NorthWest,
    /// Origin and target coincide.
    Here,
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a collectible item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(u32);

impl ItemId {
    /// Creates a new item identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// One of the four slots of a shell board, laid out as `0 1 / 2 3`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BoardSlot(u8);

impl BoardSlot {
    /// Number of slots on a shell board.
    pub const COUNT: usize = 4;

    /// Creates a slot reference, rejecting indices outside the board.
    #[must_use]
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < Self::COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Zero-based index of the slot.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Euclidean distance between two cell coordinates.
    #[must_use]
    pub fn distance(self, other: CellCoord) -> f32 {
        let columns = self.column().abs_diff(other.column()) as f32;
        let rows = self.row().abs_diff(other.row()) as f32;
        columns.hypot(rows)
    }

    /// Cell adjacent in the provided direction, if it does not underflow.
    ///
    /// Upper bounds are left to the caller because only the grid knows them.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        match direction {
            Direction::North => self.row.checked_sub(1).map(|row| Self::new(self.column, row)),
            Direction::East => self
                .column
                .checked_add(1)
                .map(|column| Self::new(column, self.row)),
            Direction::South => self.row.checked_add(1).map(|row| Self::new(self.column, row)),
            Direction::West => self
                .column
                .checked_sub(1)
                .map(|column| Self::new(column, self.row)),
        }
    }

    /// Heading that points from `self` toward `target`.
    #[must_use]
    pub fn heading_to(self, target: CellCoord) -> CompassHeading {
        use std::cmp::Ordering::{Equal, Greater, Less};

        match (
            target.column().cmp(&self.column()),
            target.row().cmp(&self.row()),
        ) {
            (Equal, Equal) => CompassHeading::Here,
            (Equal, Less) => CompassHeading::North,
            (Greater, Less) => CompassHeading::NorthEast,
            (Greater, Equal) => CompassHeading::East,
            (Greater, Greater) => CompassHeading::SouthEast,
            (Equal, Greater) => CompassHeading::South,
            (Less, Greater) => CompassHeading::SouthWest,
            (Less, Equal) => CompassHeading::West,
            (Less, Less) => CompassHeading::NorthWest,
        }
    }

    /// Top-left corner of the cell in world units.
    #[must_use]
    pub fn world_origin(self, tile: Vec2) -> Vec2 {
        Vec2::new(self.column as f32 * tile.x, self.row as f32 * tile.y)
    }

    /// Centre of the cell in world units.
    #[must_use]
    pub fn world_center(self, tile: Vec2) -> Vec2 {
        self.world_origin(tile) + tile * 0.5
    }

    /// Cell containing the provided world-space point, if it is not negative.
    #[must_use]
    pub fn containing(point: Vec2, tile: Vec2) -> Option<CellCoord> {
        if point.x < 0.0 || point.y < 0.0 || tile.x <= 0.0 || tile.y <= 0.0 {
            return None;
        }
        let column = (point.x / tile.x).floor();
        let row = (point.y / tile.y).floor();
        if column > u32::MAX as f32 || row > u32::MAX as f32 {
            return None;
        }
        Some(Self::new(column as u32, row as u32))
    }
}

/// Food varieties scattered across the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodKind {
    /// Worth one food point.
    Apple,
    /// Worth one food point.
    Cherries,
    /// Worth two food points.
    Sandwich,
    /// Worth two food points.
    Cake,
}

impl FoodKind {
    /// Every food variety, in placement order.
    pub const ALL: [FoodKind; 4] = [
        FoodKind::Sandwich,
        FoodKind::Cake,
        FoodKind::Apple,
        FoodKind::Cherries,
    ];

    /// Food points awarded when the food is collected.
    #[must_use]
    pub const fn points(self) -> u32 {
        match self {
            FoodKind::Apple | FoodKind::Cherries => 1,
            FoodKind::Sandwich | FoodKind::Cake => 2,
        }
    }
}

/// Coin denominations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoinKind {
    /// Common coin.
    Silver,
    /// Rare coin.
    Gold,
}

impl CoinKind {
    /// Seconds added to the countdown when the coin is fed to the timer.
    #[must_use]
    pub const fn seconds(self) -> u32 {
        match self {
            CoinKind::Silver => 5,
            CoinKind::Gold => 10,
        }
    }
}

/// Shell colours used by the board puzzle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShellColor {
    /// Orange shell.
    Orange,
    /// Blue shell.
    Blue,
    /// Pink shell.
    Pink,
    /// Purple shell.
    Purple,
}

impl ShellColor {
    /// Every shell colour, in placement order.
    pub const ALL: [ShellColor; 4] = [
        ShellColor::Orange,
        ShellColor::Blue,
        ShellColor::Pink,
        ShellColor::Purple,
    ];
}

const REFERENCE_ARRANGEMENTS: [[ShellColor; 4]; 8] = {
    use ShellColor::{Blue, Orange, Pink, Purple};
    [
        [Orange, Blue, Purple, Pink],
        [Orange, Pink, Purple, Blue],
        [Pink, Orange, Blue, Purple],
        [Pink, Purple, Blue, Orange],
        [Blue, Purple, Pink, Orange],
        [Blue, Pink, Orange, Purple],
        [Purple, Orange, Blue, Pink],
        [Purple, Blue, Pink, Orange],
    ]
};

/// One of the fixed shell arrangements a reference board may display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferenceArrangement(u8);

impl ReferenceArrangement {
    /// Number of available arrangements.
    pub const COUNT: u32 = REFERENCE_ARRANGEMENTS.len() as u32;

    /// Selects an arrangement by index, rejecting out-of-range values.
    #[must_use]
    pub const fn new(index: u8) -> Option<Self> {
        if (index as u32) < Self::COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Selects an arrangement, wrapping indices past the last one.
    #[must_use]
    pub const fn wrapping(index: u32) -> Self {
        Self((index % Self::COUNT) as u8)
    }

    /// Zero-based index of the arrangement.
    #[must_use]
    pub const fn index(&self) -> u8 {
        self.0
    }

    /// Shell colours laid out across the four slots.
    #[must_use]
    pub const fn slots(&self) -> [ShellColor; 4] {
        REFERENCE_ARRANGEMENTS[self.0 as usize]
    }
}

/// Role of a shell board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReceptacleKind {
    /// Board the player fills.
    Empty,
    /// Board showing the arrangement to reproduce.
    Reference(ReferenceArrangement),
}

/// Closed set of tile kinds a grid cell may hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Open floor.
    Background,
    /// Solid wall.
    Wall,
    /// Food collectible.
    Food(FoodKind),
    /// Coin collectible.
    Coin(CoinKind),
    /// Shell collectible used by the board puzzle.
    Shell(ShellColor),
    /// Map pointing at the [`TileKind::MapMarker`].
    TreasureMap,
    /// Location the treasure map points to.
    MapMarker,
    /// Extremely rare decorative bonus.
    RareBonus,
    /// Shell board mounted in a wall.
    PuzzleReceptacle(ReceptacleKind),
    /// Countdown timer mounted in the outer wall.
    Timer,
}

impl TileKind {
    /// Reports whether actors may stand on the tile.
    #[must_use]
    pub const fn is_walkable(&self) -> bool {
        match self {
            TileKind::Background
            | TileKind::Food(_)
            | TileKind::Coin(_)
            | TileKind::Shell(_)
            | TileKind::TreasureMap
            | TileKind::MapMarker
            | TileKind::RareBonus => true,
            TileKind::Wall | TileKind::PuzzleReceptacle(_) | TileKind::Timer => false,
        }
    }

    /// Reports whether the tile is collected on contact.
    #[must_use]
    pub const fn is_collectible(&self) -> bool {
        matches!(
            self,
            TileKind::Food(_) | TileKind::Coin(_) | TileKind::Shell(_) | TileKind::TreasureMap
        )
    }
}

/// Dense grid of tile kinds produced by generation and consumed by the world.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    columns: u32,
    rows: u32,
    tiles: Vec<TileKind>,
    player_spawn: CellCoord,
    enemy_spawns: Vec<CellCoord>,
}

impl Layout {
    /// Creates a layout with every cell set to `fill`.
    #[must_use]
    pub fn filled(columns: u32, rows: u32, fill: TileKind) -> Self {
        let count = u64::from(columns) * u64::from(rows);
        let count = usize::try_from(count).unwrap_or(0);
        Self {
            columns,
            rows,
            tiles: vec![fill; count],
            player_spawn: CellCoord::new(1, 1),
            enemy_spawns: Vec::new(),
        }
    }

    /// Number of columns in the layout.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the layout.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether the cell lies inside the layout.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Row-major index of the cell, if it lies inside the layout.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let column = usize::try_from(cell.column()).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Tile kind stored at the cell.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<TileKind> {
        self.index(cell)
            .and_then(|index| self.tiles.get(index).copied())
    }

    /// Replaces the tile kind stored at the cell, ignoring out-of-bounds cells.
    pub fn set(&mut self, cell: CellCoord, kind: TileKind) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.tiles.get_mut(index) {
                *slot = kind;
            }
        }
    }

    /// Iterates every cell with its tile kind in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, TileKind)> + '_ {
        let columns = self.columns.max(1);
        self.tiles.iter().enumerate().map(move |(index, kind)| {
            let index = index as u32;
            (CellCoord::new(index % columns, index / columns), *kind)
        })
    }

    /// Cell the player starts in.
    #[must_use]
    pub const fn player_spawn(&self) -> CellCoord {
        self.player_spawn
    }

    /// Moves the player spawn.
    pub fn set_player_spawn(&mut self, cell: CellCoord) {
        self.player_spawn = cell;
    }

    /// Cells enemies start in.
    #[must_use]
    pub fn enemy_spawns(&self) -> &[CellCoord] {
        &self.enemy_spawns
    }

    /// Registers an additional enemy spawn.
    pub fn push_enemy_spawn(&mut self, cell: CellCoord) {
        self.enemy_spawns.push(cell);
    }
}

/// Axis-aligned rectangle in world units, anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    position: Vec2,
    size: Vec2,
}

impl Aabb {
    /// Creates a box from its top-left corner and size.
    #[must_use]
    pub const fn new(position: Vec2, size: Vec2) -> Self {
        Self { position, size }
    }

    /// Top-left corner.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Width and height.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        self.size
    }

    /// Smallest x coordinate.
    #[must_use]
    pub fn left(&self) -> f32 {
        self.position.x
    }

    /// Largest x coordinate.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.position.x + self.size.x
    }

    /// Smallest y coordinate.
    #[must_use]
    pub fn top(&self) -> f32 {
        self.position.y
    }

    /// Largest y coordinate.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.position.y + self.size.y
    }

    /// Geometric centre.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    /// Box grown by `buffer` in total along each axis, keeping its centre.
    #[must_use]
    pub fn inflated(&self, buffer: Vec2) -> Self {
        Self::new(self.position - buffer * 0.5, self.size + buffer)
    }

    /// Reports whether the two boxes overlap by a positive amount on both axes.
    #[must_use]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Reports whether the box should be drawn inside `viewport`.
    ///
    /// Boxes up to five times their own size past the leading edges still
    /// count as visible.
    #[must_use]
    pub fn is_in_viewport(&self, viewport: &Aabb) -> bool {
        let screen = self.position - viewport.position;
        screen.x > -self.size.x * 5.0
            && screen.y > -self.size.y * 5.0
            && screen.x < viewport.size.x
            && screen.y < viewport.size.y
    }
}

/// Collision volume that can be switched off once its owner is consumed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionBody {
    bounds: Aabb,
    enabled: bool,
}

impl CollisionBody {
    /// Creates an enabled body covering `bounds`.
    #[must_use]
    pub const fn new(bounds: Aabb) -> Self {
        Self {
            bounds,
            enabled: true,
        }
    }

    /// Area covered by the body.
    #[must_use]
    pub const fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Reports whether the body still participates in collision tests.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Moves the body so its top-left corner sits at `position`.
    pub fn set_position(&mut self, position: Vec2) {
        self.bounds = Aabb::new(position, self.bounds.size());
    }

    /// Removes the body from all further collision tests.
    pub fn disable(&mut self) {
        self.enabled = false;
    }
}
