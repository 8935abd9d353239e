#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Axis-aligned collision tests, wall push-out and the system that turns
//! contacts into world commands.

use glam::Vec2;
use tidepool_core::{Aabb, Actor, CellCoord, CollisionBody, Command, Event};
use tidepool_world::{
    query::{EnemySnapshot, ItemSnapshot, PlayerSnapshot},
    HITBOX_BUFFER,
};

/// Gap left between a pushed-out body and the obstacle it hit.
pub const SEPARATION_GAP: f32 = 0.1;

/// Position of a body this tick and the one it moved from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovingBody {
    /// Top-left corner after movement.
    pub position: Vec2,
    /// Top-left corner before movement.
    pub previous: Vec2,
    /// Width and height.
    pub size: Vec2,
}

impl MovingBody {
    /// Creates a moving body.
    #[must_use]
    pub const fn new(position: Vec2, previous: Vec2, size: Vec2) -> Self {
        Self {
            position,
            previous,
            size,
        }
    }

    /// Enabled collision body at the current position.
    #[must_use]
    pub fn body(&self) -> CollisionBody {
        CollisionBody::new(Aabb::new(self.position, self.size))
    }
}

/// Hitbox and attack flag of one side of a melee exchange.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Combatant {
    /// Inflated box used for combat.
    pub hitbox: Aabb,
    /// Whether an attack is live this tick.
    pub attacking: bool,
}

/// Outcome of a player/enemy hitbox contact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Contact {
    /// The player's attack landed.
    pub stun_enemy: bool,
    /// The enemy's attack landed.
    pub strike_player: bool,
}

/// Stateless collision queries.
#[derive(Clone, Copy, Debug, Default)]
pub struct CollisionEngine;

impl CollisionEngine {
    /// Reports whether two enabled bodies overlap. Touching edges do not count.
    #[must_use]
    pub fn is_collision(a: &CollisionBody, b: &CollisionBody) -> bool {
        a.is_enabled() && b.is_enabled() && a.bounds().overlaps(&b.bounds())
    }

    /// Pushes `mover` out of `obstacle` along every axis it crossed this tick.
    ///
    /// Each side is only resolved when the previous position was clear of it,
    /// so a body already overlapping stays where it is. Both axes may snap in
    /// the same call.
    #[must_use]
    pub fn resolve_entity_tile_collision(mover: &MovingBody, obstacle: &CollisionBody) -> Vec2 {
        let mut position = mover.position;
        if !Self::is_collision(&mover.body(), obstacle) {
            return position;
        }
        let wall = obstacle.bounds();
        let size = mover.size;
        let previous = mover.previous;

        if position.x + size.x > wall.left() && previous.x + size.x <= wall.left() {
            position.x = wall.left() - size.x - SEPARATION_GAP;
        }
        if position.x < wall.right() && previous.x >= wall.right() {
            position.x = wall.right() + SEPARATION_GAP;
        }
        if position.y + size.y > wall.top() && previous.y + size.y <= wall.top() {
            position.y = wall.top() - size.y - SEPARATION_GAP;
        }
        if position.y < wall.bottom() && previous.y >= wall.bottom() {
            position.y = wall.bottom() + SEPARATION_GAP;
        }
        position
    }

    /// Resolves a melee exchange. Both sides may land in the same tick.
    #[must_use]
    pub fn resolve_player_enemy_collision(player: &Combatant, enemy: &Combatant) -> Contact {
        if !player.hitbox.overlaps(&enemy.hitbox) {
            return Contact::default();
        }
        Contact {
            stun_enemy: player.attacking,
            strike_player: enemy.attacking,
        }
    }
}

/// Pure system that reacts to world ticks and emits collision outcomes.
#[derive(Debug, Default)]
pub struct Collision {
    settled: Vec<(Actor, Vec2)>,
}

impl Collision {
    /// Emits push-outs, item pickups and combat commands for the current tick.
    ///
    /// `obstacles_near` and `items_near` return what lies in the 3x3 block
    /// around a cell. Obstacles are resolved one after another against the
    /// running position.
    pub fn handle<O, I>(
        &mut self,
        events: &[Event],
        player: &PlayerSnapshot,
        enemies: &[EnemySnapshot],
        obstacles_near: O,
        items_near: I,
        out: &mut Vec<Command>,
    ) where
        O: Fn(CellCoord) -> Vec<CollisionBody>,
        I: Fn(CellCoord) -> Vec<ItemSnapshot>,
    {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }
        self.settled.clear();

        let mover = MovingBody::new(player.position, player.previous_position, player.size);
        let player_position = settle(&mover, &obstacles_near(player.cell));
        if player_position != player.position {
            self.settled.push((Actor::Player, player_position));
        }

        let player_body = CollisionBody::new(Aabb::new(player_position, player.size));
        for item in items_near(player.cell) {
            if !item.collected && CollisionEngine::is_collision(&player_body, &item.body) {
                out.push(Command::CollectItem { item: item.id });
            }
        }

        let player_side = Combatant {
            hitbox: Aabb::new(player_position, player.size).inflated(HITBOX_BUFFER),
            attacking: player.attacking,
        };
        let mut contacts = Vec::new();
        for enemy in enemies {
            let mover = MovingBody::new(enemy.position, enemy.previous_position, enemy.size);
            let position = settle(&mover, &obstacles_near(enemy.cell));
            if position != enemy.position {
                self.settled.push((Actor::Enemy(enemy.id), position));
            }

            let enemy_side = Combatant {
                hitbox: Aabb::new(position, enemy.size).inflated(HITBOX_BUFFER),
                attacking: enemy.attacking,
            };
            let contact = CollisionEngine::resolve_player_enemy_collision(&player_side, &enemy_side);
            if contact.stun_enemy && !enemy.stunned {
                contacts.push(Command::StunEnemy { enemy: enemy.id });
            }
            if contact.strike_player {
                contacts.push(Command::StrikePlayer { enemy: enemy.id });
            }
        }

        out.extend(
            self.settled
                .drain(..)
                .map(|(actor, position)| Command::SettleActor { actor, position }),
        );
        out.extend(contacts);
    }
}

fn settle(mover: &MovingBody, obstacles: &[CollisionBody]) -> Vec2 {
    obstacles.iter().fold(mover.position, |position, obstacle| {
        CollisionEngine::resolve_entity_tile_collision(
            &MovingBody {
                position,
                ..*mover
            },
            obstacle,
        )
    })
}
