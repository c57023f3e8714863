use thiserror::Error;

use nav_cache::CacheError;
use nav_core::NavError;
use nav_route::RouteError;

/// Failures that abort a journey call.  Drift, stalls and exhausted routes
/// are [`JourneyOutcome`][crate::JourneyOutcome]s, not errors.
#[derive(Debug, Error)]
pub enum JourneyError {
    #[error("remote call failed: {0}")]
    Cache(#[from] CacheError),

    #[error("coordinate transform failed: {0}")]
    Transform(#[from] NavError),

    #[error("route bookkeeping failed: {0}")]
    Route(#[from] RouteError),
}

pub type JourneyResult<T> = Result<T, JourneyError>;
