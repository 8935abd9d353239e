//! Rectangular rooms carved over the expanded maze to open loops.

use tidepool_core::{CellCoord, Layout, TileKind};

use crate::RandomSource;

/// Whether a room may be carved over cells of an earlier room.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OverlapPolicy {
    /// Rooms are carved wherever they land.
    #[default]
    Unchecked,
    /// A room whose corners touch an earlier room is skipped.
    Strict,
}

/// Room count and size ranges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoomConfig {
    /// Fewest rooms carved.
    pub min_rooms: u32,
    /// Most rooms carved, inclusive.
    pub max_rooms: u32,
    /// Smallest room side.
    pub min_side: u32,
    /// Room sides stay below this length.
    pub max_side: u32,
    /// Overlap handling between rooms.
    pub overlap: OverlapPolicy,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            min_rooms: 4,
            max_rooms: 8,
            min_side: 3,
            max_side: 6,
            overlap: OverlapPolicy::Unchecked,
        }
    }
}

/// Rectangle carved into the layout, anchored at its top-left cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Room {
    /// Top-left cell.
    pub origin: CellCoord,
    /// Width in cells.
    pub width: u32,
    /// Height in cells.
    pub height: u32,
}

impl Room {
    /// Reports whether the room covers `cell`.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        (self.origin.column()..self.origin.column() + self.width).contains(&cell.column())
            && (self.origin.row()..self.origin.row() + self.height).contains(&cell.row())
    }

    /// Corners probed by the strict overlap check, one cell past the far edges.
    #[must_use]
    pub fn corners(&self) -> [CellCoord; 4] {
        let (x, y) = (self.origin.column(), self.origin.row());
        let (right, bottom) = (x + self.width, y + self.height);
        [
            CellCoord::new(x, y),
            CellCoord::new(right, y),
            CellCoord::new(x, bottom),
            CellCoord::new(right, bottom),
        ]
    }
}

/// Carves random rooms into an expanded maze.
#[derive(Clone, Copy, Debug, Default)]
pub struct RoomCarver {
    config: RoomConfig,
}

impl RoomCarver {
    /// Creates a carver with the provided ranges.
    #[must_use]
    pub const fn new(config: RoomConfig) -> Self {
        Self { config }
    }

    /// Carves rooms into `layout` and returns the ones that were carved.
    ///
    /// Room cells are clipped to the layout interior so the border survives.
    pub fn carve(&self, layout: &mut Layout, rng: &mut impl RandomSource) -> Vec<Room> {
        let config = &self.config;
        let count = rng.next(config.min_rooms, config.max_rooms.saturating_add(1));
        let mut claimed = vec![false; layout.cells().count()];
        let mut rooms = Vec::new();

        for _ in 0..count {
            let width = rng.next(config.min_side, config.max_side);
            let height = rng.next(config.min_side, config.max_side);
            let x = rng.next(1, layout.columns().saturating_sub(1).saturating_sub(width));
            let y = rng.next(1, layout.rows().saturating_sub(1).saturating_sub(height));
            let room = Room {
                origin: CellCoord::new(x, y),
                width,
                height,
            };

            if config.overlap == OverlapPolicy::Strict
                && room.corners().iter().any(|corner| {
                    layout
                        .index(*corner)
                        .and_then(|index| claimed.get(index).copied())
                        .unwrap_or(false)
                })
            {
                tracing::debug!(?room, "room skipped for overlapping an earlier room");
                continue;
            }

            for row in y..(y + height).min(layout.rows().saturating_sub(1)) {
                for column in x..(x + width).min(layout.columns().saturating_sub(1)) {
                    let cell = CellCoord::new(column, row);
                    if let Some(flag) = layout.index(cell).and_then(|index| claimed.get_mut(index)) {
                        *flag = true;
                    }
                    layout.set(cell, TileKind::Background);
                }
            }
            rooms.push(room);
        }

        rooms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays a fixed list of values, clamped into the requested range.
    struct Scripted(Vec<u32>);

    impl RandomSource for Scripted {
        fn next(&mut self, low: u32, high: u32) -> u32 {
            let value = if self.0.is_empty() { low } else { self.0.remove(0) };
            value.clamp(low, high.saturating_sub(1).max(low))
        }
    }

    #[test]
    fn rooms_open_their_rectangle() {
        let mut layout = Layout::filled(11, 11, TileKind::Wall);
        let config = RoomConfig {
            min_rooms: 1,
            max_rooms: 1,
            ..RoomConfig::default()
        };
        // count, width, height, x, y
        let rooms = RoomCarver::new(config).carve(&mut layout, &mut Scripted(vec![1, 3, 4, 2, 5]));
        assert_eq!(
            rooms,
            vec![Room {
                origin: CellCoord::new(2, 5),
                width: 3,
                height: 4
            }]
        );
        let open = layout
            .cells()
            .filter(|(_, kind)| *kind == TileKind::Background)
            .count();
        assert_eq!(open, 12);
        assert!(rooms[0].contains(CellCoord::new(4, 8)));
        assert!(!rooms[0].contains(CellCoord::new(5, 8)));
    }

    #[test]
    fn unchecked_rooms_may_overlap() {
        let mut layout = Layout::filled(13, 13, TileKind::Wall);
        let config = RoomConfig {
            min_rooms: 2,
            max_rooms: 2,
            ..RoomConfig::default()
        };
        let script = vec![2, 3, 3, 2, 2, 3, 3, 3, 3];
        let rooms = RoomCarver::new(config).carve(&mut layout, &mut Scripted(script));
        assert_eq!(rooms.len(), 2);
    }

    #[test]
    fn strict_rooms_skip_overlapping_corners() {
        let mut layout = Layout::filled(13, 13, TileKind::Wall);
        let config = RoomConfig {
            min_rooms: 2,
            max_rooms: 2,
            overlap: OverlapPolicy::Strict,
            ..RoomConfig::default()
        };
        let script = vec![2, 3, 3, 2, 2, 3, 3, 3, 3];
        let rooms = RoomCarver::new(config).carve(&mut layout, &mut Scripted(script));
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].origin, CellCoord::new(2, 2));
    }

    #[test]
    fn rooms_never_touch_the_border() {
        let mut layout = Layout::filled(5, 5, TileKind::Wall);
        let config = RoomConfig {
            min_rooms: 1,
            max_rooms: 1,
            ..RoomConfig::default()
        };
        let _ = RoomCarver::new(config).carve(&mut layout, &mut Scripted(vec![1, 5, 5, 4, 4]));
        for (cell, kind) in layout.cells() {
            let border = cell.column() == 0
                || cell.row() == 0
                || cell.column() == 4
                || cell.row() == 4;
            if border {
                assert_eq!(kind, TileKind::Wall, "{cell:?} was carved");
            } else {
                assert_eq!(kind, TileKind::Background);
            }
        }
    }
}
