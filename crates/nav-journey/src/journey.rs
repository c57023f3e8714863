//! The path-following controller.
//!
//! # One call, one segment
//!
//! [`Journey::step`] moves the agent along at most one bulk segment and then
//! reports why it stopped.  A caller drives a whole route by calling again
//! while the outcome is [`JourneyOutcome::ReachedIntermediateHop`] (see
//! `nav-agent`'s `navigate_to`).
//!
//! # Cache discipline
//!
//! Every position-sensitive decision starts with a full cache reset: at the
//! start of the call, before each bulk move, after the turn and after the
//! move.  Each reset costs at most one `position` round trip.

use nav_cache::ActionCache;
use nav_core::{Calibration, EntityId, Facing, GridPos, NavConfig, WorldPoint};
use nav_remote::{Event, Transport};
use nav_route::Route;

use crate::{JourneyObserver, JourneyOutcome, JourneyResult, Segment};

/// Parameters of one journey call.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct JourneyRequest {
    pub destination: GridPos,
    pub velocity:    i32,
    /// Grid distance the call may cover before giving up.
    pub budget:      f64,
    /// Abort if this object leaves the cell it stands on at the start.
    pub tracked:     Option<EntityId>,
}

impl JourneyRequest {
    pub fn new(destination: GridPos, velocity: i32, budget: f64) -> Self {
        Self { destination, velocity, budget, tracked: None }
    }

    pub fn tracking(mut self, object: EntityId) -> Self {
        self.tracked = Some(object);
        self
    }
}

/// Borrowed view of one bot's cache, calibration and tuning.
pub struct Journey<'a, T: Transport> {
    cache:       &'a mut ActionCache<T>,
    calibration: &'a Calibration,
    config:      &'a NavConfig,
}

impl<'a, T: Transport> Journey<'a, T> {
    pub fn new(
        cache:       &'a mut ActionCache<T>,
        calibration: &'a Calibration,
        config:      &'a NavConfig,
    ) -> Self {
        Self { cache, calibration, config }
    }

    // ── Position helpers ──────────────────────────────────────────────────

    /// The bot's own grid cell.
    pub fn grid_position(&mut self) -> JourneyResult<GridPos> {
        let pos = self.cache.my_position()?;
        Ok(self.calibration.grid_from_pos(pos))
    }

    /// Grid cell of `object`.
    pub fn object_cell(&mut self, object: EntityId) -> JourneyResult<GridPos> {
        let pos = self.cache.position(object)?;
        Ok(self.calibration.grid_from_pos(pos))
    }

    /// `true` if `object` currently stands on `cell`.
    pub fn on_cell(&mut self, object: EntityId, cell: GridPos) -> JourneyResult<bool> {
        Ok(self.object_cell(object)? == cell)
    }

    // ── Turning ───────────────────────────────────────────────────────────

    /// Turn to look along `v` (`me − target`, world units).  Without an
    /// explicit angular velocity the shorter way round is chosen.  Returns
    /// the server angle requested.
    pub fn turnface(&mut self, v: WorldPoint, angular_velocity: Option<i32>) -> JourneyResult<Facing> {
        let target = Facing::toward(v).offset(self.config.angle_offset);
        let velocity = match angular_velocity {
            Some(velocity) => velocity,
            None => self.cache.facing()?.shortest_turn(target).velocity(),
        };
        self.cache.turn(target, velocity)?;
        Ok(target)
    }

    /// Turn to face `world`.  Does not wait for the turn to finish.
    pub fn face_position(&mut self, world: WorldPoint, angular_velocity: Option<i32>) -> JourneyResult<Facing> {
        self.cache.reset();
        let me = self.cache.my_position()?.xy();
        self.turnface(me - world, angular_velocity)
    }

    /// Turn to face `world` and wait until the turn has finished.
    pub fn face_position_blocking(&mut self, world: WorldPoint) -> JourneyResult<Facing> {
        let facing = self.face_position(world, None)?;
        self.cache.select(&[Event::Turn])?;
        Ok(facing)
    }

    // ── Movement ──────────────────────────────────────────────────────────

    /// World distance to request from `forward` for a move of `world` world
    /// units between the cells `from` and `to`.
    pub fn movement_distance(&self, from: GridPos, to: GridPos, world: f64) -> f64 {
        if from.is_orthogonal_to(to) {
            world * self.config.orthogonal_scaling
        } else {
            world * self.config.diagonal_scaling
        }
    }

    /// Turn toward `target`, walk to it and report the grid distance
    /// actually advanced (0 if the agent is still in its start cell).
    pub fn bulk_move(&mut self, target: GridPos, velocity: i32) -> JourneyResult<f64> {
        self.cache.reset();
        let start_world = self.cache.my_position()?.xy();
        let start = self.calibration.grid_from_world(start_world);
        if start == target {
            return Ok(0.0);
        }
        let target_world = self.calibration.world_from_grid_checked(target)?;

        self.turnface(start_world - target_world, None)?;
        self.cache.select(&[Event::Turn])?;
        self.cache.reset();

        let distance = self.movement_distance(start, target, (target_world - start_world).length());
        self.cache.forward(velocity, distance)?;
        self.cache.select(&[Event::Move])?;
        self.cache.reset();

        let end = self.grid_position()?;
        if end == start {
            return Ok(0.0);
        }
        Ok(start.distance(end))
    }

    // ── Controller ────────────────────────────────────────────────────────

    /// Drive the agent along `route` toward `request.destination`.
    ///
    /// Hops the agent has passed are removed from `route`.  On
    /// [`JourneyOutcome::OffRoute`] none of the failed segment is removed.
    ///
    /// `request.budget` gates the call, not the segment: a merged segment is
    /// always walked whole, so [`JourneyOutcome::OutOfDistanceBudget`] means
    /// the call started with no budget left.  Callers driving a route pass
    /// the route's remaining length.
    ///
    /// # Errors
    ///
    /// Remote call and transform failures abort the call;
    /// [`JourneyOutcome::from_result`] maps them to `UnrecognizedFailure`.
    pub fn step<O: JourneyObserver>(
        &mut self,
        route:    &mut Route,
        request:  &JourneyRequest,
        observer: &mut O,
    ) -> JourneyResult<JourneyOutcome> {
        self.cache.reset();
        let tracked_cell = match request.tracked {
            Some(object) => Some((object, self.object_cell(object)?)),
            None => None,
        };
        let mut current = self.grid_position()?;
        route.skip_to(current);
        observer.on_journey_start(current, request.destination, route.len());

        let mut budget = request.budget;
        let mut reached_hop = false;

        // A successful move either lands on a hop of the segment or leaves
        // the route, so one call issues at most one bulk move.
        if current != request.destination
            && budget > 0.0
            && request.velocity != 0
            && self.tracked_in_place(tracked_cell)?
        {
            if let Some(segment) = Segment::from_route(current, route) {
                observer.on_segment(current, &segment);

                let advanced = self.bulk_move(segment.target(), request.velocity)?;
                if advanced > 0.0 {
                    budget -= advanced;
                    self.cache.reset();
                    current = self.grid_position()?;
                    observer.on_advance(advanced, current);

                    match segment.position_of(current) {
                        Some(h) => {
                            route.consume(h + 1);
                            reached_hop = true;
                        }
                        None => {
                            observer.on_off_route(current, &segment);
                            observer.on_outcome(JourneyOutcome::OffRoute);
                            return Ok(JourneyOutcome::OffRoute);
                        }
                    }
                }
            }
        }

        let outcome = self.classify(current, request, reached_hop, tracked_cell, budget)?;
        observer.on_outcome(outcome);
        Ok(outcome)
    }

    fn tracked_in_place(&mut self, tracked_cell: Option<(EntityId, GridPos)>) -> JourneyResult<bool> {
        match tracked_cell {
            Some((object, cell)) => self.on_cell(object, cell),
            None => Ok(true),
        }
    }

    fn classify(
        &mut self,
        current:      GridPos,
        request:      &JourneyRequest,
        reached_hop:  bool,
        tracked_cell: Option<(EntityId, GridPos)>,
        budget:       f64,
    ) -> JourneyResult<JourneyOutcome> {
        if current == request.destination {
            return Ok(JourneyOutcome::ReachedDestination);
        }
        if reached_hop {
            return Ok(JourneyOutcome::ReachedIntermediateHop);
        }
        if let Some((object, cell)) = tracked_cell {
            self.cache.reset();
            if !self.on_cell(object, cell)? {
                return Ok(JourneyOutcome::TrackedObjectMoved);
            }
        }
        if budget <= 0.0 {
            return Ok(JourneyOutcome::OutOfDistanceBudget);
        }
        Ok(JourneyOutcome::UnrecognizedFailure)
    }
}
