//! Player and enemy state owned by the world.

use std::time::Duration;

use glam::Vec2;
use tidepool_core::{Aabb, CellCoord, CollisionBody, EnemyId};

use crate::cooldown::Cooldown;

/// Width and height of every actor's collision body.
pub const ACTOR_SIZE: Vec2 = Vec2::splat(16.0);
/// Total growth applied to an actor's body to form its hitbox.
pub const HITBOX_BUFFER: Vec2 = Vec2::splat(16.0);
/// Health the player starts with.
pub const PLAYER_MAX_HEALTH: u32 = 3;
/// Time between two attacks of the same actor.
pub const ATTACK_COOLDOWN: Duration = Duration::from_millis(600);
/// Time an enemy stays stunned.
pub const STUN_COOLDOWN: Duration = Duration::from_millis(1600);
/// Fraction of the velocity lost every tick.
pub const FRICTION: f32 = 0.3;

/// Continuous position with the previous tick's value kept for collision.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Motion {
    pub(crate) position: Vec2,
    pub(crate) previous: Vec2,
}

impl Motion {
    pub(crate) fn centered_in(cell: CellCoord, tile: Vec2) -> Self {
        let position = cell.world_center(tile) - ACTOR_SIZE * 0.5;
        Self {
            position,
            previous: position,
        }
    }

    pub(crate) fn begin_tick(&mut self) {
        self.previous = self.position;
    }

    pub(crate) fn body(&self) -> CollisionBody {
        CollisionBody::new(Aabb::new(self.position, ACTOR_SIZE))
    }

    pub(crate) fn hitbox(&self) -> Aabb {
        Aabb::new(self.position, ACTOR_SIZE).inflated(HITBOX_BUFFER)
    }

    pub(crate) fn cell(&self, tile: Vec2) -> CellCoord {
        let center = self.position + ACTOR_SIZE * 0.5;
        CellCoord::containing(center, tile).unwrap_or(CellCoord::new(0, 0))
    }

    /// Keeps the body inside `bounds`.
    pub(crate) fn clamp_to(&mut self, bounds: &Aabb) {
        let max = (bounds.position() + bounds.size() - ACTOR_SIZE).max(bounds.position());
        self.position = self.position.clamp(bounds.position(), max);
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Player {
    pub(crate) motion: Motion,
    pub(crate) velocity: Vec2,
    pub(crate) heading: Vec2,
    pub(crate) attack_held: bool,
    pub(crate) attacking: bool,
    pub(crate) attack: Cooldown,
    pub(crate) health: u32,
}

impl Player {
    pub(crate) fn spawn(cell: CellCoord, tile: Vec2) -> Self {
        Self {
            motion: Motion::centered_in(cell, tile),
            velocity: Vec2::ZERO,
            heading: Vec2::ZERO,
            attack_held: false,
            attacking: false,
            attack: Cooldown::new(ATTACK_COOLDOWN),
            health: PLAYER_MAX_HEALTH,
        }
    }

    pub(crate) fn tick(&mut self, dt: Duration) {
        self.motion.begin_tick();
        self.velocity += self.heading - FRICTION * self.velocity;
        self.motion.position += self.velocity;

        self.attacking = self.attack_held && self.attack.is_ready();
        self.attack.advance(&mut self.attacking, dt);
    }

    pub(crate) fn steer(&mut self, heading: Vec2) {
        self.heading = heading.clamp(Vec2::splat(-1.0), Vec2::splat(1.0));
    }

    /// Removes one point of health; returns `false` when none was left.
    pub(crate) fn take_hit(&mut self) -> bool {
        if self.health == 0 {
            return false;
        }
        self.health -= 1;
        true
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) motion: Motion,
    pub(crate) attacking: bool,
    pub(crate) stunned: bool,
    pub(crate) attack: Cooldown,
    pub(crate) stun: Cooldown,
}

impl Enemy {
    pub(crate) fn spawn(id: EnemyId, cell: CellCoord, tile: Vec2) -> Self {
        Self {
            id,
            motion: Motion::centered_in(cell, tile),
            attacking: false,
            stunned: false,
            attack: Cooldown::new(ATTACK_COOLDOWN),
            stun: Cooldown::new(STUN_COOLDOWN),
        }
    }

    pub(crate) fn tick(&mut self, dt: Duration) {
        self.motion.begin_tick();
        self.stun.advance(&mut self.stunned, dt);
        self.attacking = self.attack.is_ready() && !self.stunned;
        self.attack.advance(&mut self.attacking, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidepool_core::TILE_LENGTH;

    const TICK: Duration = Duration::from_millis(16);

    #[test]
    fn actors_spawn_centred_in_their_cell() {
        let tile = Vec2::splat(TILE_LENGTH);
        let player = Player::spawn(CellCoord::new(1, 1), tile);
        assert_eq!(player.motion.position, Vec2::new(64.0, 64.0));
        assert_eq!(player.motion.cell(tile), CellCoord::new(1, 1));
        assert_eq!(player.motion.hitbox().size(), Vec2::splat(32.0));
    }

    #[test]
    fn friction_bounds_player_speed() {
        let mut player = Player::spawn(CellCoord::new(1, 1), Vec2::splat(TILE_LENGTH));
        player.steer(Vec2::new(3.0, 0.0));
        player.tick(TICK);
        assert_eq!(player.velocity, Vec2::new(1.0, 0.0));
        player.tick(TICK);
        assert!((player.velocity.x - 1.7).abs() < 1e-5);
        for _ in 0..200 {
            player.tick(TICK);
        }
        assert!((player.velocity.x - 1.0 / FRICTION).abs() < 1e-3);
        assert_eq!(player.motion.previous.y, player.motion.position.y);
    }

    #[test]
    fn held_attack_fires_once_per_cooldown() {
        let mut player = Player::spawn(CellCoord::new(1, 1), Vec2::splat(TILE_LENGTH));
        player.attack_held = true;
        player.tick(TICK);
        assert!(player.attacking);
        player.tick(TICK);
        assert!(!player.attacking, "attack is a single-tick pulse");
        assert!(!player.attack.is_ready());
    }

    #[test]
    fn stunned_enemy_does_not_attack() {
        let mut enemy = Enemy::spawn(EnemyId::new(0), CellCoord::new(2, 2), Vec2::splat(TILE_LENGTH));
        enemy.stunned = true;
        enemy.tick(TICK);
        assert!(!enemy.attacking);
        assert!(enemy.stunned);
        assert_eq!(enemy.stun.elapsed(), TICK);
    }

    #[test]
    fn health_never_drops_below_zero() {
        let mut player = Player::spawn(CellCoord::new(1, 1), Vec2::splat(TILE_LENGTH));
        for _ in 0..PLAYER_MAX_HEALTH {
            assert!(player.take_hit());
        }
        assert!(!player.take_hit());
        assert_eq!(player.health, 0);
    }
}
