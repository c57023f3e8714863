//! Completion events reported by the server's blocking wait.

use std::fmt;

/// Something `select` can wait for.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Event {
    /// A move, step or strafe finished.
    Move,
    /// A shot finished.
    Fire,
    /// A turn finished.
    Turn,
    /// A reload finished.
    Reload,
    /// The armed timeout expired.
    Timeout,
    /// A tracked entity changed visibility.
    Track,
    /// A bounding box became visible.
    BboxVisible,
    /// Something touched a bounding box.
    BboxTouch,
}

impl Event {
    /// Wire name of the event.
    pub fn as_str(self) -> &'static str {
        match self {
            Event::Move        => "move",
            Event::Fire        => "fire",
            Event::Turn        => "turn",
            Event::Reload      => "reload",
            Event::Timeout     => "timeout",
            Event::Track       => "track",
            Event::BboxVisible => "bbox_visible",
            Event::BboxTouch   => "bbox_touch",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
