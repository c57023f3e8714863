//! Fluent builder for constructing a [`Bot`].

use nav_cache::ActionCache;
use nav_core::{Calibration, GridPos, NavConfig, NavError, WorldPoint};
use nav_remote::Transport;
use nav_route::Planner;

use crate::{AgentError, AgentResult, Bot};

/// Grid-side calibration tags, in `(x, y)` pairs: minimum corner, maximum corner.
const PEN_TAGS: [(&str, &str); 2] = [("penminx", "penminy"), ("penmaxx", "penmaxy")];

/// World-side calibration tags, matching [`PEN_TAGS`] pair for pair.
const DOOM_TAGS: [(&str, &str); 2] = [("doomminx", "doomminy"), ("doommaxx", "doommaxy")];

/// Fluent builder for [`Bot<T, P>`].
///
/// # Required inputs
///
/// - `T: Transport` — the connection to the simulation server
/// - `P: Planner` — the route oracle for the same map
///
/// # Optional inputs (have defaults)
///
/// | Method        | Default                |
/// |---------------|------------------------|
/// | `.config(c)`  | `NavConfig::default()` |
///
/// # Example
///
/// ```rust,ignore
/// let mut bot = BotBuilder::new(transport, planner)
///     .config(config)
///     .build()?;
/// bot.navigate_to(GridPos::new(4, 7), &mut NoopObserver)?;
/// ```
pub struct BotBuilder<T: Transport, P: Planner> {
    transport: T,
    planner:   P,
    config:    Option<NavConfig>,
}

impl<T: Transport, P: Planner> BotBuilder<T, P> {
    /// Create a builder with all required inputs.
    pub fn new(transport: T, planner: P) -> Self {
        Self { transport, planner, config: None }
    }

    /// Supply tuning parameters.  Validated by [`build`][Self::build].
    pub fn config(mut self, config: NavConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Read the map's calibration tags, derive the grid ↔ world mapping,
    /// check it against the planner and return a ready bot.
    ///
    /// # Errors
    ///
    /// - [`AgentError::Tag`] for a tag that does not parse
    /// - [`NavError::DegenerateCalibration`] if the reference corners share
    ///   a coordinate
    /// - [`NavError::RoundTrip`] if a cell between the reference corners does
    ///   not survive the round trip, or the server's player start does not
    ///   land on the planner's player start cell
    pub fn build(self) -> AgentResult<Bot<T, P>> {
        // ── Validate config ───────────────────────────────────────────────
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let mut cache = ActionCache::new(self.transport);

        // ── Calibrate from map tags ───────────────────────────────────────
        let mut grid = [GridPos::default(); 2];
        let mut world = [WorldPoint::default(); 2];
        for i in 0..2 {
            let (gx, gy) = PEN_TAGS[i];
            let (wx, wy) = DOOM_TAGS[i];
            grid[i] = GridPos::new(grid_tag(&mut cache, gx)?, grid_tag(&mut cache, gy)?);
            world[i] = WorldPoint::new(world_tag(&mut cache, wx)?, world_tag(&mut cache, wy)?);
        }
        let calibration = Calibration::calibrate(grid[0], world[0], grid[1], world[1])?;
        calibration.verify_area(grid[0], grid[1])?;

        // ── Check against the planner ─────────────────────────────────────
        let server_start = calibration.grid_from_pos(cache.player_start()?);
        let planner_start = self.planner.player_start();
        if server_start != planner_start {
            return Err(NavError::RoundTrip { grid: planner_start, recovered: server_start }.into());
        }

        // ── Identify ourselves ────────────────────────────────────────────
        let me = cache.self_id()?;
        let name = cache.entity_name(me)?;
        let map = cache.pen_map_name()?;
        tracing::info!(
            bot = %name,
            %me,
            %map,
            scale_x = calibration.scale_x,
            scale_y = calibration.scale_y,
            "bot ready"
        );

        Ok(Bot {
            cache,
            planner: self.planner,
            calibration,
            config,
            me,
            name,
        })
    }
}

fn tag_value<T: Transport>(cache: &mut ActionCache<T>, name: &'static str) -> AgentResult<(String, f64)> {
    let raw = cache.tag(name)?;
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok((raw, v)),
        _ => Err(AgentError::Tag { name, value: raw }),
    }
}

fn world_tag<T: Transport>(cache: &mut ActionCache<T>, name: &'static str) -> AgentResult<f64> {
    Ok(tag_value(cache, name)?.1)
}

/// Grid tags must name a whole cell.
fn grid_tag<T: Transport>(cache: &mut ActionCache<T>, name: &'static str) -> AgentResult<i32> {
    let (raw, v) = tag_value(cache, name)?;
    if v.fract() != 0.0 || v.abs() > i32::MAX as f64 {
        return Err(AgentError::Tag { name, value: raw });
    }
    Ok(v as i32)
}
