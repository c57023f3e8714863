//! `nav-journey` — the path-following controller.
//!
//! Given a route from a [`Planner`][nav_route::Planner], [`Journey`] drives
//! the agent with as few movement commands as possible: consecutive hops
//! with the same step vector are merged into one bulk move, and after every
//! move the agent's real cell is checked against the hops it was meant to
//! pass.  Each call reports one [`JourneyOutcome`].
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`journey`]  | `Journey` controller, `JourneyRequest`, bulk move, turning  |
//! | [`segment`]  | `Segment` — collinearity merge                              |
//! | [`outcome`]  | `JourneyOutcome`                                            |
//! | [`observer`] | `JourneyObserver`, `NoopObserver`, `TracingObserver`        |
//! | [`error`]    | `JourneyError`, `JourneyResult<T>`                          |

pub mod error;
pub mod journey;
pub mod observer;
pub mod outcome;
pub mod segment;

#[cfg(test)]
mod tests;

pub use error::{JourneyError, JourneyResult};
pub use journey::{Journey, JourneyRequest};
pub use observer::{JourneyObserver, NoopObserver, TracingObserver};
pub use outcome::JourneyOutcome;
pub use segment::Segment;
