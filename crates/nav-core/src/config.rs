//! Navigation tuning parameters.
//!
//! Typically loaded from a JSON file by the application crate (with the
//! `serde` feature) and handed to the bot builder.

use crate::{NavError, NavResult};

/// Tuning knobs shared by the journey controller and the bot façade.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NavConfig {
    /// World units per grid cell.  Default: 48 (inches per map square).
    pub grid_unit: f64,

    /// Factor applied to the world distance of a horizontal or vertical move.
    pub orthogonal_scaling: f64,

    /// Factor applied to the world distance of a diagonal move.  Smaller than
    /// `orthogonal_scaling`: a diagonal grid step does not cover √2× the world
    /// distance of an orthogonal one.
    pub diagonal_scaling: f64,

    /// Degrees added to a map angle to obtain the server's yaw.
    pub angle_offset: i32,

    /// Default movement velocity used by `navigate_to`.
    pub velocity: i32,

    /// How many times `navigate_to` may request a fresh route after drifting
    /// off the current one.
    pub max_replans: u32,

    /// Upper bound on journey calls made by a single `navigate_to`.
    pub max_legs: u32,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            grid_unit:          48.0,
            orthogonal_scaling: 0.55,
            diagonal_scaling:   0.5,
            angle_offset:       0,
            velocity:           100,
            max_replans:        3,
            max_legs:           64,
        }
    }
}

impl NavConfig {
    /// Reject values the controller cannot work with.
    pub fn validate(&self) -> NavResult<()> {
        positive("grid_unit", self.grid_unit)?;
        positive("orthogonal_scaling", self.orthogonal_scaling)?;
        positive("diagonal_scaling", self.diagonal_scaling)?;
        if self.max_legs == 0 {
            return Err(NavError::Config("max_legs must be at least 1".into()));
        }
        Ok(())
    }

    /// Convert a grid-unit distance into world units.
    #[inline]
    pub fn grid_to_world_distance(&self, grid_units: f64) -> f64 {
        grid_units * self.grid_unit
    }
}

fn positive(name: &str, value: f64) -> NavResult<()> {
    if value.is_nan() || value <= 0.0 {
        return Err(NavError::Config(format!("{name} must be positive, got {value}")));
    }
    Ok(())
}
