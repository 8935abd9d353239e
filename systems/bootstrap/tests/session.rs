use std::time::Duration;

use glam::Vec2;
use tidepool_core::{Event, InteractionError, Outcome};
use tidepool_system_bootstrap::{Bootstrap, Session};
use tidepool_system_generation::{ChaChaSource, GenerationConfig};
use tidepool_system_pathfinding::PathFinder;
use tidepool_world::{query, TileCatalogue, COUNTDOWN_LIMIT};

const FRAME: Duration = Duration::from_millis(16);

fn session(seed: u64) -> Session {
    Bootstrap::new(GenerationConfig::default(), TileCatalogue::builtin())
        .session(&mut ChaChaSource::seeded(seed))
        .expect("default generation succeeds")
}

fn scripted_run(seed: u64) -> Vec<Event> {
    let mut session = session(seed);
    let mut log = Vec::new();
    let headings = [
        Vec2::new(1.0, 0.0),
        Vec2::new(0.0, 1.0),
        Vec2::new(-1.0, 0.0),
        Vec2::new(0.0, -1.0),
    ];
    for frame in 0..400 {
        if frame % 50 == 0 {
            log.extend(session.steer(headings[(frame / 50) % headings.len()]));
            log.extend(session.set_attack(frame % 100 == 0));
        }
        log.extend(session.tick(FRAME));
    }
    log
}

#[test]
fn seeded_sessions_replay_identically() {
    let first = scripted_run(17);
    let second = scripted_run(17);
    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(
        first
            .iter()
            .filter(|event| matches!(event, Event::TimeAdvanced { .. }))
            .count(),
        400
    );
}

#[test]
fn idle_player_loses_when_the_countdown_expires() {
    let mut session = session(3);
    let mut outcome = None;
    for _ in 0..=COUNTDOWN_LIMIT {
        for event in session.tick(Duration::from_secs(1)) {
            if let Event::GameConcluded { outcome: reached } = event {
                outcome = Some(reached);
            }
        }
        if outcome.is_some() {
            break;
        }
    }
    assert_eq!(outcome, Some(Outcome::Lost));
    assert_eq!(query::outcome(session.world()), Some(Outcome::Lost));
    assert_eq!(
        session.feed_timer(1),
        vec![Event::InteractionRejected {
            reason: InteractionError::Concluded
        }]
    );
}

#[test]
fn starting_position_is_within_reach_of_the_timer() {
    let mut session = session(8);
    assert_eq!(
        session.feed_timer(1),
        vec![Event::InteractionRejected {
            reason: InteractionError::NoCoinFits
        }],
        "a full countdown has no headroom"
    );
    assert_eq!(
        session.request_exit(),
        vec![Event::GameConcluded {
            outcome: Outcome::Won
        }]
    );
}

#[test]
fn enemies_close_in_on_an_idle_player() {
    let mut session = session(5);
    let mut finder = PathFinder::default();
    let mut remaining = |session: &Session| {
        let world = session.world();
        let enemy = query::enemies(world)[0].cell;
        finder
            .shortest_path(query::connectivity(world), enemy, query::player(world).cell)
            .len()
    };

    let start = remaining(&session);
    assert!(start > 0, "the player is reachable");
    for _ in 0..120 {
        let _ = session.tick(FRAME);
    }
    if query::outcome(session.world()).is_none() {
        let end = remaining(&session);
        assert!(end < start || end == 1, "path went from {start} to {end}");
    }
}
