//! Argument types for the visibility-shader and bounding-box calls.

use nav_core::BBoxId;

/// Size of an axis-aligned box in world units.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoxExtent {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl BoxExtent {
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// 2ft × 2ft × 6ft.
    pub const PLAYER:     BoxExtent = BoxExtent::new(24.0, 24.0, 72.0);
    /// 1ft cube.
    pub const WEAPON:     BoxExtent = BoxExtent::new(12.0, 12.0, 12.0);
    /// 1ft cube.
    pub const LABEL:      BoxExtent = BoxExtent::new(12.0, 12.0, 12.0);
    /// 4ft × 4ft × 1ft, one map square.
    pub const PEN_SQUARE: BoxExtent = BoxExtent::new(48.0, 48.0, 12.0);
}

/// Which bounding boxes a collision/visibility toggle applies to.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BBoxSelection {
    All,
    Only(Vec<BBoxId>),
}

/// Colour and alpha for the visibility shader, each in `0.0..=1.0`.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgba {
    pub red:   f64,
    pub green: f64,
    pub blue:  f64,
    pub alpha: f64,
}

impl Rgba {
    /// The same value on every channel.
    pub fn grey(v: f64) -> Self {
        Self { red: v, green: v, blue: v, alpha: v }
    }
}
