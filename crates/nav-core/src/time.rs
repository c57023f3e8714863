//! Server tick counts and the timeout countdown.
//!
//! The server advances in frames ("ticks").  A single countdown per bot can be
//! armed; its expiry is one of the events `select` can wait for.  Re-arming
//! while a countdown is active reports how much of the previous one was left,
//! so callers can compose timeouts without losing information.

use std::fmt;

/// A number of server ticks.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ticks(pub u32);

impl Ticks {
    pub const ZERO: Ticks = Ticks(0);
}

impl fmt::Display for Ticks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ticks", self.0)
    }
}

/// A request to the timeout countdown.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Timeout {
    /// Expire `n` ticks from now, replacing any active countdown.
    Arm(Ticks),
    /// Cancel the active countdown, if any.
    Disarm,
}

impl Timeout {
    /// Wire encoding: the tick count, or `-1` to disarm.
    pub fn to_wire(self) -> i32 {
        match self {
            Timeout::Arm(Ticks(n)) => i32::try_from(n).unwrap_or(i32::MAX),
            Timeout::Disarm => -1,
        }
    }

    /// Decode the server's reply: remaining ticks of the previous countdown,
    /// or `None` when no countdown was active (any negative value).
    pub fn remaining_from_wire(raw: i32) -> Option<Ticks> {
        u32::try_from(raw).ok().map(Ticks)
    }
}
