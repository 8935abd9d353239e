//! Carve-and-backtrack maze over a half-resolution logical grid.
//!
//! Each logical cell `(x, y)` owns a 2x2 block of the expanded grid: the
//! cell itself, its right wall, its bottom wall and the corner between them.
//! [`MazeGenerator::expand`] adds the top and left border, so logical cell
//! `(x, y)` lands on expanded cell `(2x + 1, 2y + 1)`.

use std::collections::VecDeque;

use tidepool_core::{CellCoord, Direction, Layout, TileKind};

use crate::{GenerationError, RandomSource};

/// End of the carve history a stuck generator resumes from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BacktrackPolicy {
    /// Resume from the oldest cell (first-in, first-out).
    #[default]
    Front,
    /// Resume from the newest cell, as a classic stack backtracker.
    Back,
}

/// Logical maze cell with the two walls it owns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MazeCell {
    coord: CellCoord,
    right_wall: bool,
    bottom_wall: bool,
}

impl MazeCell {
    fn new(coord: CellCoord) -> Self {
        Self {
            coord,
            right_wall: true,
            bottom_wall: true,
        }
    }

    /// Logical coordinate of the cell.
    #[must_use]
    pub const fn coord(&self) -> CellCoord {
        self.coord
    }

    /// Reports whether the wall towards the east neighbour still stands.
    #[must_use]
    pub const fn has_right_wall(&self) -> bool {
        self.right_wall
    }

    /// Reports whether the wall towards the south neighbour still stands.
    #[must_use]
    pub const fn has_bottom_wall(&self) -> bool {
        self.bottom_wall
    }
}

/// Outcome of a single [`MazeGenerator::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MazeStep {
    /// The wall between two cells was removed and `to` became current.
    Carved {
        /// Cell the generator came from.
        from: CellCoord,
        /// Newly visited cell.
        to: CellCoord,
    },
    /// The generator was stuck and resumed from a history cell.
    Backtracked {
        /// Cell taken from the history.
        to: CellCoord,
    },
    /// The generator was stuck with an empty history.
    Exhausted,
}

/// Randomised maze generator with a configurable backtrack policy.
#[derive(Clone, Debug)]
pub struct MazeGenerator {
    columns: u32,
    rows: u32,
    policy: BacktrackPolicy,
    cells: Vec<MazeCell>,
    visited: Vec<bool>,
    visited_count: usize,
    history: VecDeque<CellCoord>,
    current: CellCoord,
}

impl MazeGenerator {
    /// Creates a generator whose walk starts in the top-left logical cell.
    #[must_use]
    pub fn new(columns: u32, rows: u32, policy: BacktrackPolicy) -> Self {
        let cells = (0..rows)
            .flat_map(|row| (0..columns).map(move |column| MazeCell::new(CellCoord::new(column, row))))
            .collect::<Vec<_>>();
        let mut generator = Self {
            columns,
            rows,
            policy,
            visited: vec![false; cells.len()],
            cells,
            visited_count: 0,
            history: VecDeque::new(),
            current: CellCoord::new(0, 0),
        };
        let start = generator.current;
        generator.visit(start);
        generator
    }

    /// Number of logical columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of logical rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Cell the walk currently stands on.
    #[must_use]
    pub const fn current(&self) -> CellCoord {
        self.current
    }

    /// Number of cells visited so far.
    #[must_use]
    pub const fn visited_count(&self) -> usize {
        self.visited_count
    }

    /// Visited-cell count at which generation stops: `(rows·2 · columns·2) / 4`.
    #[must_use]
    pub fn coverage_threshold(&self) -> usize {
        let expanded = u64::from(self.rows) * 2 * u64::from(self.columns) * 2;
        usize::try_from(expanded / 4).unwrap_or(usize::MAX)
    }

    /// Reports whether the coverage threshold was reached.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.visited_count >= self.coverage_threshold()
    }

    /// Reports whether the walk visited `coord`.
    #[must_use]
    pub fn is_visited(&self, coord: CellCoord) -> bool {
        self.index(coord)
            .and_then(|index| self.visited.get(index).copied())
            .unwrap_or(false)
    }

    /// Logical cell at `coord`.
    #[must_use]
    pub fn cell(&self, coord: CellCoord) -> Option<&MazeCell> {
        self.index(coord).and_then(|index| self.cells.get(index))
    }

    /// Every logically adjacent cell, walls ignored, in north, east, south, west order.
    pub fn neighbours(&self, coord: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| coord.step(direction))
            .filter(move |neighbour| self.index(*neighbour).is_some())
    }

    /// Adjacent cells with no wall in between.
    #[must_use]
    pub fn connected(&self, coord: CellCoord) -> Vec<CellCoord> {
        self.neighbours(coord)
            .filter(|neighbour| !self.wall_between(coord, *neighbour))
            .collect()
    }

    /// Performs one carve or backtrack step.
    pub fn step(&mut self, rng: &mut impl RandomSource) -> MazeStep {
        let from = self.current;
        let unvisited: Vec<CellCoord> = self
            .neighbours(from)
            .filter(|neighbour| !self.is_visited(*neighbour))
            .collect();

        if !unvisited.is_empty() {
            let count = unvisited.len() as u32;
            let pick = (rng.next(0, count) % count) as usize;
            let to = unvisited[pick];
            self.remove_wall(from, to);
            self.visit(to);
            return MazeStep::Carved { from, to };
        }

        let resumed = match self.policy {
            BacktrackPolicy::Front => self.history.pop_front(),
            BacktrackPolicy::Back => self.history.pop_back(),
        };
        match resumed {
            Some(to) => {
                self.current = to;
                MazeStep::Backtracked { to }
            }
            None => MazeStep::Exhausted,
        }
    }

    /// Steps until the coverage threshold is reached; returns the step count.
    pub fn run(&mut self, rng: &mut impl RandomSource) -> Result<usize, GenerationError> {
        let mut steps = 0;
        while !self.is_complete() {
            steps += 1;
            if self.step(rng) == MazeStep::Exhausted {
                return Err(GenerationError::Stalled {
                    visited: self.visited_count,
                    threshold: self.coverage_threshold(),
                });
            }
        }
        tracing::debug!(steps, visited = self.visited_count, "maze carved");
        Ok(steps)
    }

    /// Expands the maze into a `(2·columns + 1) × (2·rows + 1)` layout with
    /// a wall border.
    #[must_use]
    pub fn expand(&self) -> Layout {
        let mut layout = Layout::filled(
            self.columns * 2 + 1,
            self.rows * 2 + 1,
            TileKind::Wall,
        );
        for cell in &self.cells {
            let column = cell.coord.column() * 2 + 1;
            let row = cell.coord.row() * 2 + 1;
            layout.set(CellCoord::new(column, row), TileKind::Background);
            if !cell.right_wall {
                layout.set(CellCoord::new(column + 1, row), TileKind::Background);
            }
            if !cell.bottom_wall {
                layout.set(CellCoord::new(column, row + 1), TileKind::Background);
            }
        }
        layout
    }

    fn index(&self, coord: CellCoord) -> Option<usize> {
        if coord.column() >= self.columns || coord.row() >= self.rows {
            return None;
        }
        let row = usize::try_from(coord.row()).ok()?;
        let column = usize::try_from(coord.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }

    fn visit(&mut self, coord: CellCoord) {
        if let Some(index) = self.index(coord) {
            if let Some(flag) = self.visited.get_mut(index) {
                if !*flag {
                    *flag = true;
                    self.visited_count += 1;
                }
            }
        }
        self.history.push_back(coord);
        self.current = coord;
    }

    /// Cell owning the wall between two adjacent cells, and whether it is the
    /// right (`true`) or bottom (`false`) wall.
    fn wall_owner(a: CellCoord, b: CellCoord) -> Option<(CellCoord, bool)> {
        if a.row() == b.row() {
            if a.column() + 1 == b.column() {
                return Some((a, true));
            }
            if b.column() + 1 == a.column() {
                return Some((b, true));
            }
        }
        if a.column() == b.column() {
            if a.row() + 1 == b.row() {
                return Some((a, false));
            }
            if b.row() + 1 == a.row() {
                return Some((b, false));
            }
        }
        None
    }

    fn wall_between(&self, a: CellCoord, b: CellCoord) -> bool {
        match Self::wall_owner(a, b) {
            Some((owner, true)) => self.cell(owner).map_or(true, |cell| cell.right_wall),
            Some((owner, false)) => self.cell(owner).map_or(true, |cell| cell.bottom_wall),
            None => true,
        }
    }

    fn remove_wall(&mut self, a: CellCoord, b: CellCoord) {
        let Some((owner, right)) = Self::wall_owner(a, b) else {
            return;
        };
        let Some(index) = self.index(owner) else {
            return;
        };
        if let Some(cell) = self.cells.get_mut(index) {
            if right {
                cell.right_wall = false;
            } else {
                cell.bottom_wall = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Always picks the first candidate.
    struct FirstPick;

    impl RandomSource for FirstPick {
        fn next(&mut self, low: u32, _high: u32) -> u32 {
            low
        }
    }

    #[test]
    fn neighbours_ignore_walls_and_bounds() {
        let maze = MazeGenerator::new(3, 2, BacktrackPolicy::Front);
        let corner: Vec<_> = maze.neighbours(CellCoord::new(0, 0)).collect();
        assert_eq!(corner, vec![CellCoord::new(1, 0), CellCoord::new(0, 1)]);
        assert_eq!(maze.neighbours(CellCoord::new(1, 1)).count(), 3);
        assert!(maze.connected(CellCoord::new(1, 1)).is_empty());
    }

    #[test]
    fn carving_removes_the_shared_wall() {
        let mut maze = MazeGenerator::new(3, 3, BacktrackPolicy::Front);
        let step = maze.step(&mut FirstPick);
        assert_eq!(
            step,
            MazeStep::Carved {
                from: CellCoord::new(0, 0),
                to: CellCoord::new(1, 0)
            }
        );
        let origin = maze.cell(CellCoord::new(0, 0)).expect("cell exists");
        assert!(!origin.has_right_wall());
        assert!(origin.has_bottom_wall());
        assert_eq!(maze.connected(CellCoord::new(1, 0)), vec![CellCoord::new(0, 0)]);
        assert_eq!(maze.visited_count(), 2);
    }

    #[test]
    fn front_policy_resumes_from_the_oldest_cell() {
        let mut maze = MazeGenerator::new(2, 2, BacktrackPolicy::Front);
        // (0,0) -> (1,0) -> (1,1) -> (0,1), then stuck.
        for _ in 0..3 {
            let _ = maze.step(&mut FirstPick);
        }
        assert!(maze.is_complete());
        assert_eq!(
            maze.step(&mut FirstPick),
            MazeStep::Backtracked {
                to: CellCoord::new(0, 0)
            }
        );
    }

    #[test]
    fn back_policy_resumes_from_the_newest_cell() {
        let mut maze = MazeGenerator::new(2, 2, BacktrackPolicy::Back);
        for _ in 0..3 {
            let _ = maze.step(&mut FirstPick);
        }
        assert_eq!(
            maze.step(&mut FirstPick),
            MazeStep::Backtracked {
                to: CellCoord::new(0, 1)
            }
        );
    }

    #[test]
    fn exhausted_history_is_reported() {
        let mut maze = MazeGenerator::new(1, 1, BacktrackPolicy::Front);
        assert_eq!(maze.run(&mut FirstPick), Ok(0));
        assert_eq!(
            maze.step(&mut FirstPick),
            MazeStep::Backtracked {
                to: CellCoord::new(0, 0)
            }
        );
        assert_eq!(maze.step(&mut FirstPick), MazeStep::Exhausted);
    }

    #[test]
    fn expansion_adds_a_wall_border() {
        let mut maze = MazeGenerator::new(2, 1, BacktrackPolicy::Front);
        let _ = maze.run(&mut FirstPick).expect("maze completes");
        let layout = maze.expand();
        assert_eq!((layout.columns(), layout.rows()), (5, 3));
        let open: Vec<_> = layout
            .cells()
            .filter(|(_, kind)| *kind == TileKind::Background)
            .map(|(cell, _)| cell)
            .collect();
        assert_eq!(
            open,
            vec![CellCoord::new(1, 1), CellCoord::new(2, 1), CellCoord::new(3, 1)]
        );
    }
}
