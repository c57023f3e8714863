//! The planning oracle and a fixed-map implementation.
//!
//! # Pluggability
//!
//! The bot asks for routes only through [`Planner`], so a real pathfinder
//! over the map's grid (A*, a precomputed all-pairs table, a remote planner
//! service) can be dropped in without touching the journey controller.
//! [`StaticPlanner`] walks an open map and is meant for tests and demos.

use std::collections::{BTreeMap, BTreeSet};

use nav_core::GridPos;

use crate::{Route, RouteError, RouteResult};

// ── Planner trait ─────────────────────────────────────────────────────────────

pub trait Planner {
    /// Route from `from` to `to`.  `from == to` yields an empty route.
    ///
    /// # Errors
    ///
    /// [`RouteError::NoRoute`] if `to` is unreachable.
    fn compute_route(&self, from: GridPos, to: GridPos) -> RouteResult<Route>;

    /// The map's player start cell.
    fn player_start(&self) -> GridPos;

    /// Cell of the named label, e.g. `"kitchen"`.
    fn label_position(&self, name: &str) -> Option<GridPos>;

    /// Spawn cell of the named map object.
    fn spawn_from_name(&self, name: &str) -> Option<GridPos>;

    /// Every label name the map defines.
    fn labels(&self) -> Vec<String>;
}

// ── StaticPlanner ─────────────────────────────────────────────────────────────

/// An open grid with optional blocked cells.
///
/// Routes step diagonally until source and destination share a row or
/// column, then straight.  A route that would cross a blocked cell fails
/// with `NoRoute`; no detour is searched.
#[derive(Debug, Clone, Default)]
pub struct StaticPlanner {
    player_start: GridPos,
    labels:       BTreeMap<String, GridPos>,
    spawns:       BTreeMap<String, GridPos>,
    blocked:      BTreeSet<GridPos>,
}

impl StaticPlanner {
    pub fn new(player_start: GridPos) -> Self {
        Self { player_start, ..Self::default() }
    }

    pub fn with_label(mut self, name: &str, cell: GridPos) -> Self {
        self.labels.insert(name.to_owned(), cell);
        self
    }

    pub fn with_spawn(mut self, name: &str, cell: GridPos) -> Self {
        self.spawns.insert(name.to_owned(), cell);
        self
    }

    pub fn block(mut self, cell: GridPos) -> Self {
        self.blocked.insert(cell);
        self
    }

    /// Cells visited walking from `from` to `to`, excluding `from`.
    pub fn walk(from: GridPos, to: GridPos) -> Vec<GridPos> {
        let mut cells = Vec::new();
        let mut at = from;
        while at != to {
            let step = GridPos::new((to.x - at.x).signum(), (to.y - at.y).signum());
            at = at + step;
            cells.push(at);
        }
        cells
    }
}

impl Planner for StaticPlanner {
    fn compute_route(&self, from: GridPos, to: GridPos) -> RouteResult<Route> {
        let cells = Self::walk(from, to);
        if cells.iter().any(|c| self.blocked.contains(c)) {
            return Err(RouteError::NoRoute { from, to });
        }
        Ok(Route::new(from, cells))
    }

    fn player_start(&self) -> GridPos {
        self.player_start
    }

    fn label_position(&self, name: &str) -> Option<GridPos> {
        self.labels.get(name).copied()
    }

    fn spawn_from_name(&self, name: &str) -> Option<GridPos> {
        self.spawns.get(name).copied()
    }

    fn labels(&self) -> Vec<String> {
        self.labels.keys().cloned().collect()
    }
}
