//! Collectible items spawned from the layout.

use glam::Vec2;
use tidepool_core::{Aabb, CellCoord, CoinKind, CollisionBody, ItemId, ShellColor, TileKind};

/// Total growth applied to an item's bounds to form its trigger body.
pub const COLLECT_BUFFER: Vec2 = Vec2::splat(4.0);

/// Counters that collecting items and solving puzzles increase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Counters {
    /// Points earned from food.
    pub food_points: u32,
    /// Silver coins owned.
    pub silver: u32,
    /// Gold coins owned.
    pub gold: u32,
}

impl Counters {
    pub(crate) fn coins_mut(&mut self, coin: CoinKind) -> &mut u32 {
        match coin {
            CoinKind::Silver => &mut self.silver,
            CoinKind::Gold => &mut self.gold,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Item {
    pub(crate) id: ItemId,
    pub(crate) cell: CellCoord,
    pub(crate) kind: TileKind,
    pub(crate) bounds: Aabb,
    pub(crate) body: CollisionBody,
    pub(crate) collected: bool,
    pub(crate) placed: bool,
}

impl Item {
    /// Credits the item's reward; returns `false` when it was already collected.
    pub(crate) fn collect(&mut self, counters: &mut Counters) -> bool {
        if self.collected {
            return false;
        }
        self.collected = true;
        self.body.disable();
        match self.kind {
            TileKind::Food(food) => counters.food_points += food.points(),
            TileKind::Coin(coin) => *counters.coins_mut(coin) += 1,
            _ => {}
        }
        true
    }
}

/// Arena of items indexed by [`ItemId`].
#[derive(Clone, Debug, Default)]
pub(crate) struct Items {
    items: Vec<Item>,
}

impl Items {
    /// Registers an item centred in `cell` and returns its identifier.
    pub(crate) fn spawn(&mut self, cell: CellCoord, kind: TileKind, tile: Vec2, size: Vec2) -> ItemId {
        let id = ItemId::new(self.items.len() as u32);
        let position = cell.world_origin(tile) + (tile - size) * 0.5;
        let bounds = Aabb::new(position, size);
        self.items.push(Item {
            id,
            cell,
            kind,
            bounds,
            body: CollisionBody::new(bounds.inflated(COLLECT_BUFFER)),
            collected: false,
            placed: false,
        });
        id
    }

    pub(crate) fn get(&self, id: ItemId) -> Option<&Item> {
        usize::try_from(id.get())
            .ok()
            .and_then(|index| self.items.get(index))
    }

    pub(crate) fn get_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        usize::try_from(id.get())
            .ok()
            .and_then(|index| self.items.get_mut(index))
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub(crate) fn shell_mut(&mut self, color: ShellColor) -> Option<&mut Item> {
        self.items
            .iter_mut()
            .find(|item| item.kind == TileKind::Shell(color))
    }

    pub(crate) fn treasure_map(&self) -> Option<&Item> {
        self.items
            .iter()
            .find(|item| item.kind == TileKind::TreasureMap)
    }
}
