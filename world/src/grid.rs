//! Indexed arena holding every tile of the maze.

use glam::Vec2;
use tidepool_core::{Aabb, CellCoord, CollisionBody, ItemId, Layout, TileKind};

use crate::catalogue::TileCatalogue;

/// Single grid cell with its world-space geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    cell: CellCoord,
    kind: TileKind,
    bounds: Aabb,
    footprint: Aabb,
    item: Option<ItemId>,
}

impl Tile {
    /// Grid coordinate of the tile.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Kind assigned at generation time.
    #[must_use]
    pub const fn kind(&self) -> TileKind {
        self.kind
    }

    /// Drawn area, sized from the tile's descriptor and centred in its cell.
    #[must_use]
    pub const fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Item spawned on this tile, if any.
    #[must_use]
    pub const fn item(&self) -> Option<ItemId> {
        self.item
    }

    /// Reports whether actors are pushed out of this tile.
    #[must_use]
    pub const fn is_obstacle(&self) -> bool {
        !self.kind.is_walkable()
    }

    /// Solid body covering the whole cell, for obstacles only.
    #[must_use]
    pub fn body(&self) -> Option<CollisionBody> {
        self.is_obstacle()
            .then(|| CollisionBody::new(self.footprint))
    }

    /// Reports whether the tile should be drawn inside `viewport`.
    #[must_use]
    pub fn is_in_viewport(&self, viewport: &Aabb) -> bool {
        self.bounds.is_in_viewport(viewport)
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Grid {
    columns: u32,
    rows: u32,
    tile_size: Vec2,
    tiles: Vec<Tile>,
}

impl Grid {
    pub(crate) fn from_layout(layout: &Layout, catalogue: &TileCatalogue) -> Self {
        let tile_size = catalogue.world_tile_size();
        let tiles = layout
            .cells()
            .map(|(cell, kind)| {
                let origin = cell.world_origin(tile_size);
                let size = catalogue.descriptor_for(kind).size();
                Tile {
                    cell,
                    kind,
                    bounds: Aabb::new(origin + (tile_size - size) * 0.5, size),
                    footprint: Aabb::new(origin, tile_size),
                    item: None,
                }
            })
            .collect();
        Self {
            columns: layout.columns(),
            rows: layout.rows(),
            tile_size,
            tiles,
        }
    }

    pub(crate) const fn tile_size(&self) -> Vec2 {
        self.tile_size
    }

    pub(crate) const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// World-space rectangle covered by the whole grid.
    pub(crate) fn bounds(&self) -> Aabb {
        Aabb::new(
            Vec2::ZERO,
            Vec2::new(
                self.columns as f32 * self.tile_size.x,
                self.rows as f32 * self.tile_size.y,
            ),
        )
    }

    pub(crate) fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }

    pub(crate) fn tile(&self, cell: CellCoord) -> Option<&Tile> {
        self.index(cell).and_then(|index| self.tiles.get(index))
    }

    pub(crate) fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub(crate) fn attach_item(&mut self, cell: CellCoord, item: ItemId) {
        if let Some(index) = self.index(cell) {
            if let Some(tile) = self.tiles.get_mut(index) {
                tile.item = Some(item);
            }
        }
    }

    /// First cell holding a tile that matches `predicate`, in row-major order.
    pub(crate) fn find(&self, mut predicate: impl FnMut(TileKind) -> bool) -> Option<CellCoord> {
        self.tiles
            .iter()
            .find(|tile| predicate(tile.kind))
            .map(|tile| tile.cell)
    }

    /// Tiles in the 3x3 block centred on `cell`, clipped to the grid.
    pub(crate) fn neighbourhood(&self, cell: CellCoord) -> impl Iterator<Item = &Tile> + '_ {
        let first_column = cell.column().saturating_sub(1);
        let first_row = cell.row().saturating_sub(1);
        let last_column = cell.column().saturating_add(1);
        let last_row = cell.row().saturating_add(1);
        (first_row..=last_row)
            .flat_map(move |row| {
                (first_column..=last_column).map(move |column| CellCoord::new(column, row))
            })
            .filter_map(move |candidate| self.tile(candidate))
    }
}
