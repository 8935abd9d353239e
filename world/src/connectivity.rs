//! Static connectivity graph over the walkable cells of a layout.

use std::collections::VecDeque;

use tidepool_core::{CellCoord, Direction, Layout};

/// Adjacency between axis-adjacent walkable cells.
///
/// Each cell stores a four-bit mask of the directions it links to. Links are
/// symmetric by construction and the graph is never mutated after it is built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectivityGraph {
    columns: u32,
    rows: u32,
    links: Vec<u8>,
    open: Vec<bool>,
}

impl ConnectivityGraph {
    /// Builds the graph by linking every pair of axis-adjacent walkable cells.
    #[must_use]
    pub fn build(layout: &Layout) -> Self {
        let columns = layout.columns();
        let rows = layout.rows();
        let open: Vec<bool> = layout.cells().map(|(_, kind)| kind.is_walkable()).collect();
        let mut graph = Self {
            columns,
            rows,
            links: vec![0; open.len()],
            open,
        };

        for (cell, kind) in layout.cells() {
            if !kind.is_walkable() {
                continue;
            }
            // East and south are enough; the reverse link is written alongside.
            for direction in [Direction::East, Direction::South] {
                let Some(neighbor) = graph.neighbor(cell, direction) else {
                    continue;
                };
                if !graph.is_open(neighbor) {
                    continue;
                }
                graph.link(cell, direction);
                graph.link(neighbor, opposite(direction));
            }
        }

        graph
    }

    /// Width of the graph in cells.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Height of the graph in cells.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of cells covered by the graph.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.open.len()
    }

    /// Row-major index of the cell, if it lies inside the graph.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }
        let column = usize::try_from(cell.column()).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Reports whether the cell is walkable.
    #[must_use]
    pub fn is_open(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.open.get(index).copied())
            .unwrap_or(false)
    }

    /// Reports whether the two cells are directly linked.
    #[must_use]
    pub fn are_connected(&self, from: CellCoord, to: CellCoord) -> bool {
        self.neighbors(from).any(|neighbor| neighbor == to)
    }

    /// Cells directly linked to `cell`, in north, east, south, west order.
    pub fn neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        let mask = self
            .index(cell)
            .and_then(|index| self.links.get(index).copied())
            .unwrap_or(0);
        Direction::ALL
            .into_iter()
            .filter(move |direction| mask & bit(*direction) != 0)
            .filter_map(move |direction| cell.step(direction))
    }

    /// Walkable cells that cannot be reached from `origin`.
    ///
    /// Every walkable cell is reported when `origin` itself is not walkable.
    #[must_use]
    pub fn unreachable_from(&self, origin: CellCoord) -> Vec<CellCoord> {
        let mut visited = vec![false; self.open.len()];
        let mut queue = VecDeque::new();

        if let Some(index) = self.index(origin) {
            if self.open[index] {
                visited[index] = true;
                queue.push_back(origin);
            }
        }

        while let Some(cell) = queue.pop_front() {
            for neighbor in self.neighbors(cell) {
                let Some(index) = self.index(neighbor) else {
                    continue;
                };
                if visited[index] {
                    continue;
                }
                visited[index] = true;
                queue.push_back(neighbor);
            }
        }

        let columns = self.columns.max(1);
        self.open
            .iter()
            .zip(visited.iter())
            .enumerate()
            .filter(|(_, (open, seen))| **open && !**seen)
            .map(|(index, _)| {
                let index = index as u32;
                CellCoord::new(index % columns, index / columns)
            })
            .collect()
    }

    fn neighbor(&self, cell: CellCoord, direction: Direction) -> Option<CellCoord> {
        cell.step(direction)
            .filter(|next| next.column() < self.columns && next.row() < self.rows)
    }

    fn link(&mut self, cell: CellCoord, direction: Direction) {
        if let Some(index) = self.index(cell) {
            if let Some(mask) = self.links.get_mut(index) {
                *mask |= bit(direction);
            }
        }
    }
}

const fn bit(direction: Direction) -> u8 {
    match direction {
        Direction::North => 0b0001,
        Direction::East => 0b0010,
        Direction::South => 0b0100,
        Direction::West => 0b1000,
    }
}

const fn opposite(direction: Direction) -> Direction {
    match direction {
        Direction::North => Direction::South,
        Direction::East => Direction::West,
        Direction::South => Direction::North,
        Direction::West => Direction::East,
    }
}
