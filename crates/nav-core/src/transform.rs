//! Affine mapping between the planning grid and world coordinates.
//!
//! # Model
//!
//! Each horizontal axis is mapped independently:
//!
//!   world = grid * scale + offset
//!   grid  = trunc((world - offset) / scale)
//!
//! A quotient within [`SNAP_EPSILON`] of an integer is taken as that integer
//! before truncating, so a scale that is not exact in binary (1000 / 7, say)
//! still maps every grid point back onto itself.
//!
//! The four scalars are derived once from two reference points whose grid
//! and world coordinates are both known (typically the map's min/max corner
//! tags).  The sign of each scale records whether the grid axis runs parallel
//! (`+1`) or anti-parallel (`-1`) to the world axis.
//!
//! Every movement command and drift check crosses this boundary exactly once
//! per decision; rounding error is never compounded by chaining conversions.

use crate::{Axis, GridPos, NavError, NavResult, WorldPoint, WorldPos};

/// Largest distance, in cells, from an integer that still counts as on it.
pub const SNAP_EPSILON: f64 = 1e-6;

/// Immutable grid ↔ world calibration.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Calibration {
    pub scale_x:  f64,
    pub offset_x: f64,
    pub scale_y:  f64,
    pub offset_y: f64,
}

impl Calibration {
    /// Derive the calibration from two reference `(grid, world)` pairs.
    ///
    /// # Errors
    ///
    /// [`NavError::DegenerateCalibration`] if the two points share a grid
    /// coordinate on some axis (division by zero), or share a world
    /// coordinate (a zero scale cannot be inverted).
    pub fn calibrate(
        grid_a:  GridPos,
        world_a: WorldPoint,
        grid_b:  GridPos,
        world_b: WorldPoint,
    ) -> NavResult<Self> {
        let dgx = grid_a.x - grid_b.x;
        let dgy = grid_a.y - grid_b.y;
        if dgx == 0 {
            return Err(NavError::DegenerateCalibration { axis: Axis::X });
        }
        if dgy == 0 {
            return Err(NavError::DegenerateCalibration { axis: Axis::Y });
        }

        let scale_x = (world_a.x - world_b.x) / dgx as f64;
        let scale_y = (world_a.y - world_b.y) / dgy as f64;
        if scale_x == 0.0 || !scale_x.is_finite() {
            return Err(NavError::DegenerateCalibration { axis: Axis::X });
        }
        if scale_y == 0.0 || !scale_y.is_finite() {
            return Err(NavError::DegenerateCalibration { axis: Axis::Y });
        }

        Ok(Self {
            scale_x,
            offset_x: world_a.x - grid_a.x as f64 * scale_x,
            scale_y,
            offset_y: world_a.y - grid_a.y as f64 * scale_y,
        })
    }

    /// Forward map: grid cell → world point (XY plane only).
    #[inline]
    pub fn world_from_grid(&self, grid: GridPos) -> WorldPoint {
        WorldPoint::new(
            grid.x as f64 * self.scale_x + self.offset_x,
            grid.y as f64 * self.scale_y + self.offset_y,
        )
    }

    /// Inverse map: world position → grid cell, truncating toward zero.
    #[inline]
    pub fn grid_from_world(&self, world: WorldPoint) -> GridPos {
        GridPos::new(
            to_cell((world.x - self.offset_x) / self.scale_x),
            to_cell((world.y - self.offset_y) / self.scale_y),
        )
    }

    /// Convenience for 3-D server positions; Z is ignored.
    #[inline]
    pub fn grid_from_pos(&self, pos: WorldPos) -> GridPos {
        self.grid_from_world(pos.xy())
    }

    /// Forward map that also checks the round-trip invariant.
    ///
    /// # Errors
    ///
    /// [`NavError::RoundTrip`] if `grid_from_world(world_from_grid(grid))`
    /// is not `grid`.
    pub fn world_from_grid_checked(&self, grid: GridPos) -> NavResult<WorldPoint> {
        let world     = self.world_from_grid(grid);
        let recovered = self.grid_from_world(world);
        if recovered != grid {
            return Err(NavError::RoundTrip { grid, recovered });
        }
        Ok(world)
    }

    /// Check the round-trip invariant for every cell in `grids`.
    pub fn verify<I>(&self, grids: I) -> NavResult<()>
    where
        I: IntoIterator<Item = GridPos>,
    {
        for grid in grids {
            self.world_from_grid_checked(grid)?;
        }
        Ok(())
    }

    /// Check the round-trip invariant for every cell of the rectangle spanned
    /// by corners `a` and `b` (inclusive).
    pub fn verify_area(&self, a: GridPos, b: GridPos) -> NavResult<()> {
        for x in a.x.min(b.x)..=a.x.max(b.x) {
            for y in a.y.min(b.y)..=a.y.max(b.y) {
                self.world_from_grid_checked(GridPos::new(x, y))?;
            }
        }
        Ok(())
    }

    /// Direction of each grid axis relative to the world axis: `+1` parallel,
    /// `-1` anti-parallel.
    #[inline]
    pub fn axis_sign(&self) -> (i32, i32) {
        (sign_of(self.scale_x), sign_of(self.scale_y))
    }

    /// World position of the middle of `grid`, for a grid cell `grid_unit`
    /// world units wide.
    pub fn cell_centre(&self, grid: GridPos, grid_unit: f64) -> WorldPoint {
        let (sx, sy) = self.axis_sign();
        WorldPoint::new(
            grid.x as f64 * grid_unit + sx as f64 * grid_unit / 2.0,
            grid.y as f64 * grid_unit + sy as f64 * grid_unit / 2.0,
        )
    }
}

/// Truncate toward zero, unless `q` is within [`SNAP_EPSILON`] of an integer.
#[inline]
fn to_cell(q: f64) -> i32 {
    let nearest = q.round();
    if (q - nearest).abs() <= SNAP_EPSILON { nearest as i32 } else { q as i32 }
}

/// `+1` for zero or positive values, `-1` otherwise.
#[inline]
fn sign_of(v: f64) -> i32 {
    if v >= 0.0 { 1 } else { -1 }
}
