#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Bootstrap system that generates a Tidepool run and drives its tick loop.

use std::time::Duration;

use glam::Vec2;
use tidepool_core::{BoardSlot, Command, Event, Layout, ShellColor};
use tidepool_system_collision::Collision;
use tidepool_system_generation::{generate, GenerationConfig, GenerationError, RandomSource};
use tidepool_system_pathfinding::Pursuit;
use tidepool_world::{self as world, query, TileCatalogue, World};

/// Longest slice of simulated time a single world tick covers.
///
/// Must stay below [`tidepool_world::ATTACK_COOLDOWN`] so an attack is still
/// live when the collision pass of its step runs.
pub const MAX_STEP: Duration = Duration::from_millis(100);

/// Produces ready-to-play sessions from a generation config.
#[derive(Clone, Debug)]
pub struct Bootstrap {
    config: GenerationConfig,
    catalogue: TileCatalogue,
}

impl Bootstrap {
    /// Creates a bootstrap that generates with `config` and sizes tiles from `catalogue`.
    #[must_use]
    pub fn new(config: GenerationConfig, catalogue: TileCatalogue) -> Self {
        Self { config, catalogue }
    }

    /// Generation parameters used for new sessions.
    #[must_use]
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Generates a fresh layout and wraps it in a session.
    pub fn session(&self, rng: &mut impl RandomSource) -> Result<Session, GenerationError> {
        let layout = generate(&self.config, rng)?;
        Ok(Session::from_layout(&layout, self.catalogue.clone()))
    }
}

/// Single-threaded run: the world plus the systems reacting to it.
#[derive(Debug)]
pub struct Session {
    world: World,
    pursuit: Pursuit,
    collision: Collision,
}

impl Session {
    /// Starts a session on an already generated layout.
    #[must_use]
    pub fn from_layout(layout: &Layout, catalogue: TileCatalogue) -> Self {
        tracing::info!(
            columns = layout.columns(),
            rows = layout.rows(),
            enemies = layout.enemy_spawns().len(),
            "session started"
        );
        Self {
            world: World::new(layout, catalogue),
            pursuit: Pursuit::default(),
            collision: Collision::default(),
        }
    }

    /// Read-only access for queries and rendering.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Advances the run by `dt`: world tick, pursuit, then collision.
    ///
    /// Frames longer than [`MAX_STEP`] are split into several steps so no
    /// attack window opens and closes unseen within one step. Returns every
    /// event the world emitted along the way.
    pub fn tick(&mut self, dt: Duration) -> Vec<Event> {
        let mut log = Vec::new();
        let mut remaining = dt;
        loop {
            let step = remaining.min(MAX_STEP);
            remaining -= step;
            self.step(step, &mut log);
            if remaining.is_zero() || query::outcome(&self.world).is_some() {
                break;
            }
        }

        if let Some(outcome) = log.iter().find_map(|event| match event {
            Event::GameConcluded { outcome } => Some(*outcome),
            _ => None,
        }) {
            tracing::info!(
                ?outcome,
                tick = query::tick_index(&self.world),
                "session concluded"
            );
        }
        log
    }

    fn step(&mut self, dt: Duration, log: &mut Vec<Event>) {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Tick { dt }, &mut events);
        log.extend(events.iter().cloned());

        let mut commands = Vec::new();
        self.pursuit.handle(
            &events,
            query::connectivity(&self.world),
            query::tile_size(&self.world),
            query::player(&self.world).cell,
            &query::enemies(&self.world),
            &mut commands,
        );
        self.apply_all(commands, log);

        let mut commands = Vec::new();
        let world = &self.world;
        self.collision.handle(
            &events,
            &query::player(world),
            &query::enemies(world),
            |cell| query::obstacles_near(world, cell),
            |cell| query::items_near(world, cell),
            &mut commands,
        );
        self.apply_all(commands, log);
    }

    /// Sets the movement heading.
    pub fn steer(&mut self, heading: Vec2) -> Vec<Event> {
        self.submit(Command::SteerPlayer { heading })
    }

    /// Holds or releases the attack input.
    pub fn set_attack(&mut self, engaged: bool) -> Vec<Event> {
        self.submit(Command::SetPlayerAttack { engaged })
    }

    /// Selects the shell to carry, or puts it away.
    pub fn select_shell(&mut self, color: Option<ShellColor>) -> Vec<Event> {
        self.submit(Command::SelectShell { color })
    }

    /// Places the carried shell into `slot`, or takes back the shell there.
    pub fn place_shell(&mut self, slot: BoardSlot) -> Vec<Event> {
        self.submit(Command::PlaceShell { slot })
    }

    /// Spends up to `coins` coins on the countdown.
    pub fn feed_timer(&mut self, coins: u32) -> Vec<Event> {
        self.submit(Command::FeedTimer { coins })
    }

    /// Redeems the treasure map on its marker.
    pub fn redeem_treasure_map(&mut self) -> Vec<Event> {
        self.submit(Command::RedeemTreasureMap)
    }

    /// Leaves the maze through the timer.
    pub fn request_exit(&mut self) -> Vec<Event> {
        self.submit(Command::RequestExit)
    }

    /// Applies a single input command.
    pub fn submit(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        events
    }

    fn apply_all(&mut self, commands: Vec<Command>, log: &mut Vec<Event>) {
        for command in commands {
            let mut generated = Vec::new();
            world::apply(&mut self.world, command, &mut generated);
            log.extend(generated);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidepool_core::{CellCoord, TileKind};

    fn corridor() -> Layout {
        let mut layout = Layout::filled(9, 3, TileKind::Wall);
        for column in 1..8 {
            layout.set(CellCoord::new(column, 1), TileKind::Background);
        }
        layout.set(CellCoord::new(0, 0), TileKind::Timer);
        layout
    }

    #[test]
    fn every_tick_reports_time_advancing() {
        let mut session = Session::from_layout(&corridor(), TileCatalogue::builtin());
        let events = session.tick(Duration::from_millis(16));
        assert_eq!(
            events.first(),
            Some(&Event::TimeAdvanced {
                dt: Duration::from_millis(16)
            })
        );
        assert_eq!(query::tick_index(session.world()), 1);
    }

    #[test]
    fn exit_next_to_the_timer_wins() {
        let mut session = Session::from_layout(&corridor(), TileCatalogue::builtin());
        let events = session.request_exit();
        assert_eq!(
            events,
            vec![Event::GameConcluded {
                outcome: tidepool_core::Outcome::Won
            }]
        );
        assert!(session.tick(Duration::from_millis(16)).is_empty());
    }

    #[test]
    fn long_frames_are_split_into_bounded_steps() {
        let mut session = Session::from_layout(&corridor(), TileCatalogue::builtin());
        let events = session.tick(Duration::from_millis(2_050));
        let steps: Vec<Duration> = events
            .iter()
            .filter_map(|event| match event {
                Event::TimeAdvanced { dt } => Some(*dt),
                _ => None,
            })
            .collect();
        assert_eq!(steps.len(), 21);
        assert!(steps.iter().all(|step| *step <= MAX_STEP));
        assert_eq!(steps.iter().sum::<Duration>(), Duration::from_millis(2_050));
        assert_eq!(query::countdown_remaining(session.world()), 58);
    }

    #[test]
    fn attacks_land_even_when_a_frame_outlasts_the_cooldown() {
        let mut layout = corridor();
        layout.push_enemy_spawn(CellCoord::new(1, 1));
        let mut session = Session::from_layout(&layout, TileCatalogue::builtin());
        assert!(tidepool_world::ATTACK_COOLDOWN < Duration::from_secs(1));

        let events = session.tick(Duration::from_secs(1));
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::PlayerStruck { .. })));
        assert!(query::player(session.world()).health < tidepool_world::PLAYER_MAX_HEALTH);
    }
}
