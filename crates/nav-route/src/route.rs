//! `Route` — the hop list of one navigation request.
//!
//! A route is produced by a [`Planner`][crate::Planner], owned by the caller
//! and lent mutably to one journey call at a time.  Hops are consumed from
//! the front as the agent passes them; the cell most recently passed becomes
//! the route's origin.

use std::collections::VecDeque;

use nav_core::GridPos;

use crate::{RouteError, RouteResult};

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    /// Cell the remaining hops start from (the source, or the last hop passed).
    origin: GridPos,
    /// Remaining waypoints in travel order, excluding `origin`.
    hops:   VecDeque<GridPos>,
}

impl Route {
    pub fn new<I>(origin: GridPos, hops: I) -> Self
    where
        I: IntoIterator<Item = GridPos>,
    {
        Self { origin, hops: hops.into_iter().collect() }
    }

    /// A route with nothing left to travel.
    pub fn empty(origin: GridPos) -> Self {
        Self { origin, hops: VecDeque::new() }
    }

    pub fn origin(&self) -> GridPos {
        self.origin
    }

    #[inline]
    pub fn hop(&self, index: usize) -> Option<GridPos> {
        self.hops.get(index).copied()
    }

    #[inline]
    pub fn next_hop(&self) -> Option<GridPos> {
        self.hops.front().copied()
    }

    /// Final hop, if any remain.
    pub fn destination(&self) -> Option<GridPos> {
        self.hops.back().copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.hops.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = GridPos> + '_ {
        self.hops.iter().copied()
    }

    /// Position of `cell` among the remaining hops.
    pub fn index_of(&self, cell: GridPos) -> Option<usize> {
        self.hops.iter().position(|&h| h == cell)
    }

    /// Remove hop `index`, which the caller believes is `expected`.
    ///
    /// # Errors
    ///
    /// [`RouteError::HopOutOfRange`] or [`RouteError::HopMismatch`]; the
    /// route is unchanged on error.
    pub fn remove_hop(&mut self, index: usize, expected: GridPos) -> RouteResult<()> {
        let found = self
            .hop(index)
            .ok_or(RouteError::HopOutOfRange { index, len: self.len() })?;
        if found != expected {
            return Err(RouteError::HopMismatch { index, expected, found });
        }
        self.hops.remove(index);
        if index == 0 {
            self.origin = found;
        }
        Ok(())
    }

    /// Drop every hop up to and including `current`, if `current` is on the
    /// route.  Returns how many hops were dropped.
    pub fn skip_to(&mut self, current: GridPos) -> usize {
        match self.index_of(current) {
            Some(i) => self.consume(i + 1),
            None => 0,
        }
    }

    /// Drop the first `n` hops (fewer if the route is shorter).  Returns how
    /// many were dropped.
    pub fn consume(&mut self, n: usize) -> usize {
        let n = n.min(self.hops.len());
        if let Some(last) = self.hops.drain(..n).last() {
            self.origin = last;
        }
        n
    }

    /// Grid length of the remaining route, from the origin through every hop.
    pub fn total_distance(&self) -> f64 {
        let mut prev = self.origin;
        let mut total = 0.0;
        for &hop in &self.hops {
            total += prev.distance(hop);
            prev = hop;
        }
        total
    }
}
