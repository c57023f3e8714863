//! Grid and world coordinate types.
//!
//! Two coordinate spaces meet in this crate:
//!
//! - **grid** — the planner's coarse integer map (`GridPos`);
//! - **world** — the simulation server's continuous units (`WorldPos`, with
//!   `WorldPoint` as its XY projection).
//!
//! Values are small `Copy` structs, replaced wholesale rather than mutated.

use std::fmt;
use std::ops::{Add, Sub};

// ── GridPos ───────────────────────────────────────────────────────────────────

/// A cell on the planning grid.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean length of this position read as a vector, in grid units.
    #[inline]
    pub fn length(self) -> f64 {
        (self.x as f64).hypot(self.y as f64)
    }

    /// Euclidean distance to `other` in grid units.
    #[inline]
    pub fn distance(self, other: GridPos) -> f64 {
        (other - self).length()
    }

    /// `true` when moving from `self` to `other` is purely horizontal or
    /// vertical, i.e. the two cells share a grid coordinate.
    #[inline]
    pub fn is_orthogonal_to(self, other: GridPos) -> bool {
        self.x == other.x || self.y == other.y
    }
}

impl Add for GridPos {
    type Output = GridPos;
    #[inline]
    fn add(self, rhs: GridPos) -> GridPos {
        GridPos::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for GridPos {
    type Output = GridPos;
    #[inline]
    fn sub(self, rhs: GridPos) -> GridPos {
        GridPos::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

// ── WorldPoint ────────────────────────────────────────────────────────────────

/// A world-space point (or vector) on the XY plane.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldPoint {
    pub x: f64,
    pub y: f64,
}

impl WorldPoint {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length in world units.
    #[inline]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Lift onto the 3-D world at height `z`.
    #[inline]
    pub fn with_z(self, z: f64) -> WorldPos {
        WorldPos::new(self.x, self.y, z)
    }
}

impl Sub for WorldPoint {
    type Output = WorldPoint;
    #[inline]
    fn sub(self, rhs: WorldPoint) -> WorldPoint {
        WorldPoint::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Add for WorldPoint {
    type Output = WorldPoint;
    #[inline]
    fn add(self, rhs: WorldPoint) -> WorldPoint {
        WorldPoint::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl fmt::Display for WorldPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

// ── WorldPos ──────────────────────────────────────────────────────────────────

/// A 3-D position in world units as reported by the server.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldPos {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl WorldPos {
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Drop the Z component.  The grid transform only models the XY plane.
    #[inline]
    pub fn xy(self) -> WorldPoint {
        WorldPoint::new(self.x, self.y)
    }
}

impl fmt::Display for WorldPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}
