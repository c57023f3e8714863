//! Facing angles and the turn policy.
//!
//! Angles are whole degrees in `0..360` using the map convention:
//! 0 up, 90 left, 180 down, 270 right.  A positive angular velocity turns
//! toward increasing angles.

use std::fmt;

use crate::WorldPoint;

/// A facing angle in whole degrees, always normalised into `0..360`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Facing(u16);

/// Which way to rotate when turning.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnDirection {
    /// Toward increasing angles (angular velocity `+1`).
    Increasing,
    /// Toward decreasing angles (angular velocity `-1`).
    Decreasing,
}

impl TurnDirection {
    /// Unit angular velocity understood by the server's `turn` call.
    #[inline]
    pub fn velocity(self) -> i32 {
        match self {
            TurnDirection::Increasing => 1,
            TurnDirection::Decreasing => -1,
        }
    }

    #[inline]
    pub fn reversed(self) -> TurnDirection {
        match self {
            TurnDirection::Increasing => TurnDirection::Decreasing,
            TurnDirection::Decreasing => TurnDirection::Increasing,
        }
    }
}

impl Facing {
    pub const UP:    Facing = Facing(0);
    pub const LEFT:  Facing = Facing(90);
    pub const DOWN:  Facing = Facing(180);
    pub const RIGHT: Facing = Facing(270);

    /// Normalise any integer number of degrees into `0..360`.
    #[inline]
    pub fn new(degrees: i32) -> Self {
        Facing(degrees.rem_euclid(360) as u16)
    }

    #[inline]
    pub fn degrees(self) -> i32 {
        self.0 as i32
    }

    /// This angle rotated by `inc` degrees (wrapping).
    #[inline]
    pub fn offset(self, inc: i32) -> Self {
        Facing::new(self.degrees() + inc)
    }

    /// The facing that looks along `v`.
    ///
    /// `v` is the vector *from the target to the agent* (`me − target`), so
    /// the general case is rotated by 180°.  Axis-aligned vectors map straight
    /// onto the cardinal angles without going through `atan2`.
    pub fn toward(v: WorldPoint) -> Self {
        if v.x == 0.0 {
            if v.y > 0.0 { Facing::RIGHT } else { Facing::LEFT }
        } else if v.y == 0.0 {
            if v.x > 0.0 { Facing::DOWN } else { Facing::UP }
        } else {
            let degrees = v.y.atan2(v.x).to_degrees() as i32;
            Facing::new(degrees).offset(180)
        }
    }

    /// Angular distance covered when turning from `self` to `target` in
    /// direction `dir`.
    pub fn distance_to(self, target: Facing, dir: TurnDirection) -> i32 {
        match dir {
            TurnDirection::Increasing => (target.degrees() - self.degrees()).rem_euclid(360),
            TurnDirection::Decreasing => (self.degrees() - target.degrees()).rem_euclid(360),
        }
    }

    /// The direction that reaches `target` through the smaller angle,
    /// comparing the direct distance against the wrap-around through 0/360.
    pub fn shortest_turn(self, target: Facing) -> TurnDirection {
        let (old, new) = (self.degrees(), target.degrees());
        if old < new {
            if (old + 360 - new).abs() < (new - old).abs() {
                TurnDirection::Decreasing
            } else {
                TurnDirection::Increasing
            }
        } else if (new + 360 - old).abs() < (new - old).abs() {
            TurnDirection::Increasing
        } else {
            TurnDirection::Decreasing
        }
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}
