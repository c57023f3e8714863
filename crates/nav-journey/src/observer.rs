//! Journey diagnostics sink.

use nav_core::GridPos;

use crate::{JourneyOutcome, Segment};

/// Callbacks invoked by [`Journey::step`][crate::Journey::step] at key points
/// of a call.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Observers see the journey; they cannot
/// steer it.
pub trait JourneyObserver {
    /// Called once per call, after the route has been skipped to `current`.
    fn on_journey_start(&mut self, _current: GridPos, _destination: GridPos, _hops: usize) {}

    /// Called before each bulk move.
    fn on_segment(&mut self, _from: GridPos, _segment: &Segment) {}

    /// Called after each bulk move with the grid distance advanced and the
    /// cell the agent ended up on.
    fn on_advance(&mut self, _advanced: f64, _at: GridPos) {}

    /// Called when a bulk move ended on no hop of its segment.
    fn on_off_route(&mut self, _at: GridPos, _segment: &Segment) {}

    /// Called exactly once per call that returns `Ok`.
    fn on_outcome(&mut self, _outcome: JourneyOutcome) {}
}

/// A [`JourneyObserver`] that does nothing.
pub struct NoopObserver;

impl JourneyObserver for NoopObserver {}

/// Forwards every callback to `tracing` under the `nav_journey` target.
#[derive(Debug, Default)]
pub struct TracingObserver {
    segments: usize,
}

impl TracingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bulk moves issued since construction.
    pub fn segments(&self) -> usize {
        self.segments
    }
}

impl JourneyObserver for TracingObserver {
    fn on_journey_start(&mut self, current: GridPos, destination: GridPos, hops: usize) {
        tracing::debug!(%current, %destination, hops, "journey start");
    }

    fn on_segment(&mut self, from: GridPos, segment: &Segment) {
        self.segments += 1;
        tracing::debug!(
            %from,
            target = %segment.target(),
            merged = segment.len(),
            "bulk move"
        );
    }

    fn on_advance(&mut self, advanced: f64, at: GridPos) {
        tracing::trace!(advanced, %at, "advanced");
    }

    fn on_off_route(&mut self, at: GridPos, segment: &Segment) {
        tracing::warn!(%at, expected = ?segment.hops(), "fell off the route");
    }

    fn on_outcome(&mut self, outcome: JourneyOutcome) {
        tracing::info!(%outcome, code = outcome.code(), "journey finished");
    }
}
