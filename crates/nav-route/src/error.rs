//! Route error type.

use thiserror::Error;

use nav_core::GridPos;

/// Errors produced by `nav-route`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: GridPos, to: GridPos },

    #[error("hop {index} is {found}, expected {expected}")]
    HopMismatch {
        index:    usize,
        expected: GridPos,
        found:    GridPos,
    },

    #[error("hop {index} out of range for a route of {len} hops")]
    HopOutOfRange { index: usize, len: usize },
}

pub type RouteResult<T> = Result<T, RouteError>;
