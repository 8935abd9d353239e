#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pursuit system that steers enemies along shortest paths toward the player.

mod path_finder;

use glam::Vec2;
use tidepool_core::{Aabb, CellCoord, Command, Event};
use tidepool_world::{query::EnemySnapshot, ConnectivityGraph};

pub use path_finder::PathFinder;

/// Distance an enemy covers along each axis per tick, in world units.
pub const PURSUIT_SPEED: f32 = 1.0;

/// Pure system that reacts to world ticks and emits enemy steps.
#[derive(Debug, Default)]
pub struct Pursuit {
    path_finder: PathFinder,
}

impl Pursuit {
    /// Emits one [`Command::StepEnemy`] per enemy that should move this tick.
    ///
    /// Stunned enemies and enemies already sharing the target's cell stay put.
    pub fn handle(
        &mut self,
        events: &[Event],
        graph: &ConnectivityGraph,
        tile_size: Vec2,
        target: CellCoord,
        enemies: &[EnemySnapshot],
        out: &mut Vec<Command>,
    ) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        for enemy in enemies {
            if enemy.stunned {
                continue;
            }
            let path = self.path_finder.shortest_path(graph, enemy.cell, target);
            let Some(waypoint) = path.get(1) else {
                continue;
            };
            let offset = pursuit_step(&enemy.body.bounds(), enemy.cell, *waypoint, tile_size);
            if offset != Vec2::ZERO {
                out.push(Command::StepEnemy {
                    enemy: enemy.id,
                    offset,
                });
            }
        }
    }
}

/// Offset moving `body` one unit per axis toward the centre of `waypoint`.
///
/// An axis only advances toward the waypoint while the body's centre lies
/// within half a tile of the waypoint centre on the other axis. A gated axis
/// re-centres on the `current` cell instead, so the body lines up with the
/// corridor before turning.
#[must_use]
pub fn pursuit_step(body: &Aabb, current: CellCoord, waypoint: CellCoord, tile_size: Vec2) -> Vec2 {
    let center = body.center();
    let target = waypoint.world_center(tile_size);
    let anchor = current.world_center(tile_size);
    let half = tile_size * 0.5;

    let x = if (target.y - center.y).abs() <= half.y {
        toward(center.x, target.x)
    } else {
        toward(center.x, anchor.x)
    };
    let y = if (target.x - center.x).abs() <= half.x {
        toward(center.y, target.y)
    } else {
        toward(center.y, anchor.y)
    };
    Vec2::new(x, y)
}

fn toward(from: f32, to: f32) -> f32 {
    if to - from >= PURSUIT_SPEED {
        PURSUIT_SPEED
    } else if from - to >= PURSUIT_SPEED {
        -PURSUIT_SPEED
    } else {
        0.0
    }
}
