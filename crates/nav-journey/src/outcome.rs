//! Terminal codes of one journey call.

use std::fmt;

use crate::JourneyResult;

/// Why a journey call returned control to its caller.  Exactly one per call.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JourneyOutcome {
    /// The agent stands on the destination cell.
    ReachedDestination,
    /// The next hop was reached but not the destination; call again.
    ReachedIntermediateHop,
    /// After a bulk move the agent stands on no hop of that segment; replan.
    OffRoute,
    /// The tracked object left the cell it occupied when the call started.
    TrackedObjectMoved,
    /// The distance budget ran out first.
    OutOfDistanceBudget,
    /// None of the above: a stalled move, zero velocity, an exhausted route
    /// or a failed remote call.
    UnrecognizedFailure,
}

impl JourneyOutcome {
    pub const ALL: [JourneyOutcome; 6] = [
        JourneyOutcome::ReachedDestination,
        JourneyOutcome::ReachedIntermediateHop,
        JourneyOutcome::OffRoute,
        JourneyOutcome::TrackedObjectMoved,
        JourneyOutcome::OutOfDistanceBudget,
        JourneyOutcome::UnrecognizedFailure,
    ];

    /// Collapse a journey result: any error becomes `UnrecognizedFailure`.
    pub fn from_result(result: JourneyResult<JourneyOutcome>) -> JourneyOutcome {
        result.unwrap_or(JourneyOutcome::UnrecognizedFailure)
    }

    /// Numeric code used by the bot library's callers (0 = success).
    pub fn code(self) -> u8 {
        match self {
            JourneyOutcome::ReachedDestination     => 0,
            JourneyOutcome::ReachedIntermediateHop => 1,
            JourneyOutcome::OffRoute               => 2,
            JourneyOutcome::TrackedObjectMoved     => 3,
            JourneyOutcome::OutOfDistanceBudget    => 4,
            JourneyOutcome::UnrecognizedFailure    => 5,
        }
    }

    /// `true` if calling again with the same route can make progress.
    pub fn is_retryable(self) -> bool {
        matches!(self, JourneyOutcome::ReachedIntermediateHop)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JourneyOutcome::ReachedDestination     => "reached destination",
            JourneyOutcome::ReachedIntermediateHop => "reached intermediate hop",
            JourneyOutcome::OffRoute               => "off route",
            JourneyOutcome::TrackedObjectMoved     => "tracked object moved",
            JourneyOutcome::OutOfDistanceBudget    => "out of distance budget",
            JourneyOutcome::UnrecognizedFailure    => "unrecognized failure",
        }
    }
}

impl fmt::Display for JourneyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
