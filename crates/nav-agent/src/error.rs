use thiserror::Error;

use nav_cache::CacheError;
use nav_core::NavError;
use nav_journey::JourneyError;
use nav_route::RouteError;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("calibration error: {0}")]
    Calibration(#[from] NavError),

    #[error("remote call failed: {0}")]
    Cache(#[from] CacheError),

    #[error("planning failed: {0}")]
    Route(#[from] RouteError),

    #[error("journey failed: {0}")]
    Journey(#[from] JourneyError),

    /// A calibration tag that is not a number, or a grid tag that is not a
    /// whole number.
    #[error("map tag {name} has unusable value {value:?}")]
    Tag { name: &'static str, value: String },

    #[error("the map has no label {0:?}")]
    UnknownLabel(String),
}

pub type AgentResult<T> = Result<T, AgentError>;
