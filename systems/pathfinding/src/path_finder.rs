//! Breadth-first shortest paths over the connectivity graph.

use std::collections::VecDeque;

use tidepool_core::CellCoord;
use tidepool_world::ConnectivityGraph;

/// Breadth-first search with reusable scratch buffers.
///
/// The finder keeps no state between calls apart from allocations, so one
/// instance can serve every pursuer.
#[derive(Clone, Debug, Default)]
pub struct PathFinder {
    queue: VecDeque<CellCoord>,
    predecessors: Vec<Option<CellCoord>>,
}

impl PathFinder {
    /// Shortest path from `start` to `goal`, both included.
    ///
    /// Returns `[start]` when both cells coincide and an empty path when
    /// `goal` cannot be reached.
    pub fn shortest_path(
        &mut self,
        graph: &ConnectivityGraph,
        start: CellCoord,
        goal: CellCoord,
    ) -> Vec<CellCoord> {
        if start == goal {
            return vec![start];
        }
        let (Some(start_index), Some(_)) = (graph.index(start), graph.index(goal)) else {
            return Vec::new();
        };

        self.queue.clear();
        self.predecessors.clear();
        self.predecessors.resize(graph.cell_count(), None);
        self.predecessors[start_index] = Some(start);
        self.queue.push_back(start);

        let mut reached = false;
        while let Some(cell) = self.queue.pop_front() {
            if cell == goal {
                reached = true;
                break;
            }
            for neighbor in graph.neighbors(cell) {
                let Some(index) = graph.index(neighbor) else {
                    continue;
                };
                if self.predecessors[index].is_some() {
                    continue;
                }
                self.predecessors[index] = Some(cell);
                self.queue.push_back(neighbor);
            }
        }

        if !reached {
            return Vec::new();
        }

        let mut path = vec![goal];
        let mut cursor = goal;
        while cursor != start {
            let Some(previous) = graph
                .index(cursor)
                .and_then(|index| self.predecessors[index])
            else {
                return Vec::new();
            };
            path.push(previous);
            cursor = previous;
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidepool_core::{Layout, TileKind};

    fn graph(rows: &[&str]) -> ConnectivityGraph {
        let mut layout = Layout::filled(rows[0].len() as u32, rows.len() as u32, TileKind::Wall);
        for (row, line) in rows.iter().enumerate() {
            for (column, symbol) in line.chars().enumerate() {
                if symbol == '.' {
                    layout.set(
                        CellCoord::new(column as u32, row as u32),
                        TileKind::Background,
                    );
                }
            }
        }
        ConnectivityGraph::build(&layout)
    }

    #[test]
    fn path_to_itself_is_a_single_cell() {
        let graph = graph(&["###", "#.#", "###"]);
        let cell = CellCoord::new(1, 1);
        assert_eq!(PathFinder::default().shortest_path(&graph, cell, cell), vec![cell]);
    }

    #[test]
    fn single_edge_yields_both_ends() {
        let graph = graph(&["####", "#..#", "####"]);
        let start = CellCoord::new(1, 1);
        let goal = CellCoord::new(2, 1);
        assert_eq!(
            PathFinder::default().shortest_path(&graph, start, goal),
            vec![start, goal]
        );
    }

    #[test]
    fn unreachable_goal_yields_an_empty_path() {
        let graph = graph(&["#####", "#.#.#", "#####"]);
        let path =
            PathFinder::default().shortest_path(&graph, CellCoord::new(1, 1), CellCoord::new(3, 1));
        assert!(path.is_empty());
    }

    #[test]
    fn path_follows_the_corridor_around_walls() {
        let graph = graph(&[
            "#####", //
            "#...#", //
            "###.#", //
            "#...#", //
            "#####",
        ]);
        let mut finder = PathFinder::default();
        let path = finder.shortest_path(&graph, CellCoord::new(1, 1), CellCoord::new(1, 3));
        assert_eq!(
            path,
            vec![
                CellCoord::new(1, 1),
                CellCoord::new(2, 1),
                CellCoord::new(3, 1),
                CellCoord::new(3, 2),
                CellCoord::new(3, 3),
                CellCoord::new(2, 3),
                CellCoord::new(1, 3),
            ]
        );
        // Reusing the finder must not leak state from the previous search.
        let back = finder.shortest_path(&graph, CellCoord::new(1, 3), CellCoord::new(3, 1));
        assert_eq!(back.len(), 5);
    }

    #[test]
    fn loops_pick_a_shortest_route() {
        let graph = graph(&[
            "#####", //
            "#...#", //
            "#.#.#", //
            "#...#", //
            "#####",
        ]);
        let path =
            PathFinder::default().shortest_path(&graph, CellCoord::new(1, 1), CellCoord::new(3, 3));
        assert_eq!(path.len(), 5);
        assert!(path
            .windows(2)
            .all(|pair| graph.are_connected(pair[0], pair[1])));
    }
}
