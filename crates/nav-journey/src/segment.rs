//! Collinearity merge: the run of hops one movement command can cover.

use nav_core::GridPos;
use nav_route::Route;

/// A maximal run of route hops sharing one step vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Step between consecutive cells of the run.
    pub direction: GridPos,
    /// Hops in travel order; never empty.
    hops:          Vec<GridPos>,
    /// Last entry of `hops`.
    target:        GridPos,
}

impl Segment {
    /// Build the segment starting at the route's next hop, as seen from
    /// `current`.  `None` if the route is empty.
    pub fn from_route(current: GridPos, route: &Route) -> Option<Segment> {
        let first = route.next_hop()?;
        let direction = first - current;
        let mut hops = vec![first];
        let mut prev = first;
        for hop in route.iter().skip(1) {
            if hop - prev != direction {
                break;
            }
            hops.push(hop);
            prev = hop;
        }
        Some(Segment { direction, hops, target: prev })
    }

    /// The cell the bulk move aims for.
    pub fn target(&self) -> GridPos {
        self.target
    }

    pub fn hops(&self) -> &[GridPos] {
        &self.hops
    }

    /// Number of hops merged; at least 1.
    pub fn len(&self) -> usize {
        self.hops.len()
    }

    /// Index of `cell` within the segment.
    pub fn position_of(&self, cell: GridPos) -> Option<usize> {
        self.hops.iter().position(|&h| h == cell)
    }
}
