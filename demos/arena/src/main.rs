//! arena — walks a bot around a small scripted map.
//!
//! The world is a `ScriptedWorld` standing in for the simulation server,
//! calibrated like a 10 × 20 map square arena.  The bot visits each label in
//! turn, is nudged off course once on the way, and faces the label when it
//! arrives.
//!
//! ```text
//! RUST_LOG=debug cargo run -p arena -- [config.json]
//! ```
//!
//! The optional argument is a `NavConfig` in JSON; missing fields keep their
//! defaults.

use std::fs;

use anyhow::{Context, Result, bail};

use nav_agent::BotBuilder;
use nav_core::{Calibration, EntityId, GridPos, NavConfig, WorldPoint, WorldPos};
use nav_journey::{JourneyOutcome, TracingObserver};
use nav_remote::ScriptedWorld;
use nav_route::{Planner, StaticPlanner};

// ── Constants ─────────────────────────────────────────────────────────────────

const ME:           EntityId = EntityId(1);
const PEN_MIN:      GridPos  = GridPos::new(0, 0);
const PEN_MAX:      GridPos  = GridPos::new(10, 20);
const DOOM_MIN:     WorldPoint = WorldPoint::new(1000.0, 2000.0);
const DOOM_MAX:     WorldPoint = WorldPoint::new(1480.0, 1040.0);
const PLAYER_START: GridPos  = GridPos::new(1, 1);

/// `(name, entity, cell)` for every label in the arena.
const LABELS: [(&str, EntityId, GridPos); 3] = [
    ("kitchen", EntityId(10), GridPos::new(6, 4)),
    ("armoury", EntityId(11), GridPos::new(2, 9)),
    ("hall",    EntityId(12), GridPos::new(8, 15)),
];

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => load_config(&path)?,
        None => NavConfig::default(),
    };

    let (world, planner) = build_arena()?;
    let mut bot = BotBuilder::new(world, planner)
        .config(config)
        .build()
        .context("bot start-up failed")?;
    let start = bot.grid_position()?;
    println!("{} ready at {}", bot.name(), start);

    // One sideways shove on the first trip, to exercise replanning.
    bot.cache_mut()
        .transport_mut()
        .queue_drift(WorldPoint::new(48.0, 0.0));

    let mut observer = TracingObserver::new();
    for (name, _, _) in LABELS {
        let outcome = bot.navigate_to_label(name, &mut observer)?;
        println!("{name:<8} {outcome} (code {})", outcome.code());
        if outcome != JourneyOutcome::ReachedDestination {
            bail!("could not reach {name}: {outcome}");
        }
        bot.face_label(name)?;
    }

    let world = bot.cache().transport();
    println!(
        "{} bulk moves, {} remote calls, {} cache hits",
        observer.segments(),
        world.total_calls(),
        bot.cache().stats().hits,
    );
    Ok(())
}

fn load_config(path: &str) -> Result<NavConfig> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    let config: NavConfig = serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?;
    config.validate()?;
    Ok(config)
}

// ── Arena ─────────────────────────────────────────────────────────────────────

fn build_arena() -> Result<(ScriptedWorld, StaticPlanner)> {
    let calibration = Calibration::calibrate(PEN_MIN, DOOM_MIN, PEN_MAX, DOOM_MAX)?;
    let cell = |g: GridPos| -> WorldPos { calibration.world_from_grid(g).with_z(0.0) };

    let mut world = ScriptedWorld::new(ME, cell(PLAYER_START))
        .with_map_name("arena")
        .with_player_start(cell(PLAYER_START))
        .with_tag("penminx", PEN_MIN.x)
        .with_tag("penminy", PEN_MIN.y)
        .with_tag("penmaxx", PEN_MAX.x)
        .with_tag("penmaxy", PEN_MAX.y)
        .with_tag("doomminx", DOOM_MIN.x)
        .with_tag("doomminy", DOOM_MIN.y)
        .with_tag("doommaxx", DOOM_MAX.x)
        .with_tag("doommaxy", DOOM_MAX.y);
    let mut planner = StaticPlanner::new(PLAYER_START);

    for (name, id, at) in LABELS {
        world = world
            .with_entity(id, &format!("label_{name}"), cell(at))
            .with_named("label", name, id);
        planner = planner.with_label(name, at);
    }
    tracing::debug!(labels = ?planner.labels(), "arena built");
    Ok((world, planner))
}
