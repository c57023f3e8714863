//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `NavError` as one variant
//! via `From`, so calibration failures surface unchanged at the top.

use std::fmt;

use thiserror::Error;

use crate::GridPos;

/// A horizontal axis of the XY plane.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Axis::X => "x",
            Axis::Y => "y",
        })
    }
}

/// The top-level error type for `nav-core`.
#[derive(Debug, Error)]
pub enum NavError {
    /// The two calibration reference points share a coordinate on `axis`, so
    /// no scale can be derived for it.
    #[error("degenerate calibration: reference points share the {axis} coordinate")]
    DegenerateCalibration { axis: Axis },

    /// Mapping `grid` to world and back produced a different cell.
    #[error("calibration round-trip failed: {grid} came back as {recovered}")]
    RoundTrip { grid: GridPos, recovered: GridPos },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for `nav-core`.
pub type NavResult<T> = Result<T, NavError>;
