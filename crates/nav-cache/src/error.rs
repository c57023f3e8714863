use thiserror::Error;

use nav_remote::TransportError;

use crate::CacheKey;

/// Errors produced by `nav-cache`.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A key holds a value of the wrong shape.  Indicates a defect in the
    /// key → operation table, never a server problem.
    #[error("cached value under `{key}` is a {found}, expected a {expected}")]
    ValueMismatch {
        key:      CacheKey,
        found:    &'static str,
        expected: &'static str,
    },
}

pub type CacheResult<T> = Result<T, CacheError>;
