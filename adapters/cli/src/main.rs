#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates a Tidepool maze and runs it headless.

mod ascii;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tidepool_system_bootstrap::{Bootstrap, Session};
use tidepool_system_generation::{
    BacktrackPolicy, ChaChaSource, GenerationConfig, OverlapPolicy, RoomConfig,
};
use tidepool_world::{query, TileCatalogue};

/// Generates a maze from a seed, prints it and simulates it without input.
#[derive(Debug, Parser)]
#[command(name = "tidepool", version)]
struct Args {
    /// Seed for the generator; a random one is drawn when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Logical maze columns before expansion.
    #[arg(long, default_value_t = 15)]
    columns: u32,

    /// Logical maze rows before expansion.
    #[arg(long, default_value_t = 15)]
    rows: u32,

    /// Which end of the history the generator backtracks to.
    #[arg(long, value_enum, default_value = "front")]
    backtrack: Backtrack,

    /// Skip rooms whose corners fall inside an earlier room.
    #[arg(long)]
    strict_rooms: bool,

    /// Number of enemies to spawn.
    #[arg(long, default_value_t = 1)]
    enemies: u32,

    /// Tile catalogue TOML; the built-in sizes are used when omitted.
    #[arg(long, value_name = "PATH")]
    catalogue: Option<PathBuf>,

    /// Ticks to simulate after generation.
    #[arg(long, default_value_t = 600)]
    ticks: u32,

    /// Simulated milliseconds per tick.
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,

    /// Do not print the generated map.
    #[arg(long)]
    no_map: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Backtrack {
    /// Resume from the oldest cell in the history.
    Front,
    /// Resume from the newest cell in the history.
    Back,
}

impl Args {
    fn generation_config(&self) -> GenerationConfig {
        let overlap = if self.strict_rooms {
            OverlapPolicy::Strict
        } else {
            OverlapPolicy::Unchecked
        };
        GenerationConfig {
            columns: self.columns,
            rows: self.rows,
            backtrack: match self.backtrack {
                Backtrack::Front => BacktrackPolicy::Front,
                Backtrack::Back => BacktrackPolicy::Back,
            },
            rooms: RoomConfig {
                overlap,
                ..RoomConfig::default()
            },
            enemies: self.enemies,
            ..GenerationConfig::default()
        }
    }

    fn catalogue(&self) -> Result<TileCatalogue> {
        match &self.catalogue {
            Some(path) => TileCatalogue::from_path(path)
                .with_context(|| format!("failed to load tile catalogue {}", path.display())),
            None => Ok(TileCatalogue::builtin()),
        }
    }
}

/// Entry point for the Tidepool command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);
    let bootstrap = Bootstrap::new(args.generation_config(), args.catalogue()?);
    let mut session = bootstrap
        .session(&mut ChaChaSource::seeded(seed))
        .with_context(|| format!("failed to generate a maze from seed {seed}"))?;

    if !args.no_map {
        println!("{}", ascii::render(session.world()));
    }

    let ticks = simulate(&mut session, args.ticks, Duration::from_millis(args.tick_ms));
    print_summary(&session, seed, ticks);
    Ok(())
}

/// Runs up to `ticks` idle ticks and returns how many were simulated.
fn simulate(session: &mut Session, ticks: u32, dt: Duration) -> u32 {
    for tick in 0..ticks {
        let _ = session.tick(dt);
        if query::outcome(session.world()).is_some() {
            return tick + 1;
        }
    }
    ticks
}

fn print_summary(session: &Session, seed: u64, ticks: u32) {
    let world = session.world();
    let counters = query::counters(world);
    let player = query::player(world);
    println!("seed:       {seed}");
    println!("ticks:      {ticks}");
    println!("countdown:  {}s", query::countdown_remaining(world));
    println!("health:     {}", player.health);
    println!(
        "counters:   food {} / silver {} / gold {}",
        counters.food_points, counters.silver, counters.gold
    );
    match query::outcome(world) {
        Some(outcome) => println!("outcome:    {outcome:?}"),
        None => println!("outcome:    running"),
    }
}
