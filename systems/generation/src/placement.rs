//! Scatters collectibles, puzzle boards, the timer and enemy spawns.

use tidepool_core::{
    CellCoord, CoinKind, FoodKind, Layout, ReceptacleKind, ReferenceArrangement, ShellColor,
    TileKind,
};

use crate::{GenerationError, RandomSource};

/// Inclusive count range sampled uniformly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CountRange {
    /// Smallest count.
    pub min: u32,
    /// Largest count, inclusive.
    pub max: u32,
}

impl CountRange {
    /// Creates an inclusive range.
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    fn sample(&self, rng: &mut impl RandomSource) -> u32 {
        rng.next(self.min, self.max.saturating_add(1))
    }
}

/// Entity counts and sampling limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementConfig {
    /// Food items, split uniformly across the food kinds.
    pub food: CountRange,
    /// Silver coins.
    pub silver: CountRange,
    /// Gold coins.
    pub gold: CountRange,
    /// One rare bonus is placed when a roll in `0..rare_bonus_odds` is zero.
    pub rare_bonus_odds: u32,
    /// Coordinates sampled per entity before placement gives up.
    pub max_attempts: u32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            food: CountRange::new(10, 16),
            silver: CountRange::new(14, 18),
            gold: CountRange::new(7, 8),
            rare_bonus_odds: 1_000,
            max_attempts: 100_000,
        }
    }
}

/// Counts of what a placement run put down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlacementSummary {
    /// Food items placed.
    pub food: u32,
    /// Silver coins placed.
    pub silver: u32,
    /// Gold coins placed.
    pub gold: u32,
    /// Whether the rare bonus was rolled.
    pub rare_bonus: bool,
    /// Arrangement shown by the reference board.
    pub arrangement: Option<ReferenceArrangement>,
}

/// Places every entity category onto a carved layout.
#[derive(Clone, Copy, Debug, Default)]
pub struct EntityPlacer {
    config: PlacementConfig,
}

impl EntityPlacer {
    /// Creates a placer with the provided counts.
    #[must_use]
    pub const fn new(config: PlacementConfig) -> Self {
        Self { config }
    }

    /// Places entities in a fixed category order and registers enemy spawns.
    ///
    /// Floor entities replace `Background` cells, so a cell never receives
    /// two entities. The timer always lands on `(0, 0)` and both boards
    /// replace interior wall cells.
    pub fn place(
        &self,
        layout: &mut Layout,
        enemies: u32,
        rng: &mut impl RandomSource,
    ) -> Result<PlacementSummary, GenerationError> {
        let mut run = PlacementRun {
            layout,
            rng,
            max_attempts: self.config.max_attempts,
        };
        let mut summary = PlacementSummary::default();

        summary.food = self.config.food.sample(&mut *run.rng);
        for _ in 0..summary.food {
            let kinds = FoodKind::ALL.len() as u32;
            let kind = FoodKind::ALL[(run.rng.next(0, kinds) % kinds) as usize];
            run.place_on_floor("food", TileKind::Food(kind))?;
        }

        summary.silver = self.config.silver.sample(&mut *run.rng);
        for _ in 0..summary.silver {
            run.place_on_floor("silver coin", TileKind::Coin(CoinKind::Silver))?;
        }

        summary.gold = self.config.gold.sample(&mut *run.rng);
        for _ in 0..summary.gold {
            run.place_on_floor("gold coin", TileKind::Coin(CoinKind::Gold))?;
        }

        for color in ShellColor::ALL {
            run.place_on_floor("shell", TileKind::Shell(color))?;
        }

        run.place_on_floor("treasure map", TileKind::TreasureMap)?;
        run.place_on_floor("map marker", TileKind::MapMarker)?;

        if run.rng.next(0, self.config.rare_bonus_odds) == 0 {
            run.place_on_floor("rare bonus", TileKind::RareBonus)?;
            summary.rare_bonus = true;
            tracing::info!("rare bonus placed");
        }

        run.layout.set(CellCoord::new(0, 0), TileKind::Timer);

        let empty = run.sample("empty board", |_, kind| kind == TileKind::Wall)?;
        run.layout
            .set(empty, TileKind::PuzzleReceptacle(ReceptacleKind::Empty));
        let arrangement =
            ReferenceArrangement::wrapping(run.rng.next(0, ReferenceArrangement::COUNT));
        let reference = run.sample("reference board", |_, kind| kind == TileKind::Wall)?;
        run.layout.set(
            reference,
            TileKind::PuzzleReceptacle(ReceptacleKind::Reference(arrangement)),
        );
        summary.arrangement = Some(arrangement);

        let spawn = run.layout.player_spawn();
        for _ in 0..enemies {
            let cell = run.sample("enemy", |cell, kind| cell != spawn && kind.is_walkable())?;
            run.layout.push_enemy_spawn(cell);
        }

        Ok(summary)
    }
}

struct PlacementRun<'a, R> {
    layout: &'a mut Layout,
    rng: &'a mut R,
    max_attempts: u32,
}

impl<R: RandomSource> PlacementRun<'_, R> {
    /// Samples interior coordinates until `accept` takes one.
    fn sample(
        &mut self,
        entity: &'static str,
        mut accept: impl FnMut(CellCoord, TileKind) -> bool,
    ) -> Result<CellCoord, GenerationError> {
        let column_end = self.layout.columns().saturating_sub(2);
        let row_end = self.layout.rows().saturating_sub(2);
        for _ in 0..self.max_attempts {
            let cell = CellCoord::new(self.rng.next(1, column_end), self.rng.next(1, row_end));
            if self.layout.get(cell).is_some_and(|kind| accept(cell, kind)) {
                return Ok(cell);
            }
        }
        Err(GenerationError::PlacementExhausted {
            entity,
            attempts: self.max_attempts,
        })
    }

    fn place_on_floor(&mut self, entity: &'static str, kind: TileKind) -> Result<(), GenerationError> {
        let cell = self.sample(entity, |_, candidate| candidate == TileKind::Background)?;
        self.layout.set(cell, kind);
        Ok(())
    }
}
