//! The bot façade: one calibrated agent on one map.
//!
//! # Navigation
//!
//! [`Bot::journey`] is a single controller call.  [`Bot::navigate_to`] and
//! [`Bot::navigate_to_object`] drive whole routes: they call the controller
//! again on every intermediate hop and ask the planner for a fresh route
//! when the agent drifts off (at most `max_replans` times), giving up after
//! `max_legs` calls.

use nav_cache::ActionCache;
use nav_core::{BBoxId, Calibration, EntityId, Facing, GridPos, NavConfig, WorldPoint, WorldPos};
use nav_journey::{Journey, JourneyObserver, JourneyOutcome, JourneyRequest};
use nav_remote::{BoxExtent, Transport};
use nav_route::{Planner, Route};

use crate::{AgentError, AgentResult};

/// What a navigation request is heading for.
#[derive(Copy, Clone, Debug)]
enum Goal {
    Cell(GridPos),
    Object(EntityId),
}

/// A calibrated bot.  Built by [`BotBuilder`][crate::BotBuilder].
pub struct Bot<T: Transport, P: Planner> {
    pub(crate) cache:       ActionCache<T>,
    pub(crate) planner:     P,
    pub(crate) calibration: Calibration,
    pub(crate) config:      NavConfig,
    pub(crate) me:          EntityId,
    pub(crate) name:        String,
}

impl<T: Transport, P: Planner> Bot<T, P> {
    // ── Accessors ─────────────────────────────────────────────────────────

    /// The full cached remote surface.
    pub fn cache(&self) -> &ActionCache<T> {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut ActionCache<T> {
        &mut self.cache
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    pub fn planner(&self) -> &P {
        &self.planner
    }

    /// The bot's own entity.
    pub fn me(&self) -> EntityId {
        self.me
    }

    /// The bot's entity name, as reported at construction.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn controller(&mut self) -> Journey<'_, T> {
        Journey::new(&mut self.cache, &self.calibration, &self.config)
    }

    // ── Position ──────────────────────────────────────────────────────────

    pub fn grid_position(&mut self) -> AgentResult<GridPos> {
        Ok(self.controller().grid_position()?)
    }

    pub fn world_position(&mut self, id: EntityId) -> AgentResult<WorldPos> {
        Ok(self.cache.position(id)?)
    }

    /// Grid cell of `object`.
    pub fn object_cell(&mut self, object: EntityId) -> AgentResult<GridPos> {
        Ok(self.controller().object_cell(object)?)
    }

    // ── Routing ───────────────────────────────────────────────────────────

    /// Route from the bot's current cell to the cell `object` stands on,
    /// with its grid length.
    pub fn calc_nav(&mut self, object: EntityId) -> AgentResult<(Route, f64)> {
        self.cache.reset();
        let destination = self.object_cell(object)?;
        self.calc_nav_pos(destination)
    }

    /// Route from the bot's current cell to `destination`, with its grid
    /// length.
    pub fn calc_nav_pos(&mut self, destination: GridPos) -> AgentResult<(Route, f64)> {
        self.cache.reset();
        let current = self.grid_position()?;
        let route = self.planner.compute_route(current, destination)?;
        let distance = route.total_distance();
        Ok((route, distance))
    }

    // ── Navigation ────────────────────────────────────────────────────────

    /// One controller call along `route`.
    pub fn journey<O: JourneyObserver>(
        &mut self,
        route:    &mut Route,
        request:  &JourneyRequest,
        observer: &mut O,
    ) -> AgentResult<JourneyOutcome> {
        Ok(self.controller().step(route, request, observer)?)
    }

    /// Travel to `destination` at the configured velocity.
    ///
    /// Returns the last controller outcome: `ReachedDestination` on success,
    /// otherwise whatever stopped the trip.
    pub fn navigate_to<O: JourneyObserver>(
        &mut self,
        destination: GridPos,
        observer:    &mut O,
    ) -> AgentResult<JourneyOutcome> {
        self.drive(Goal::Cell(destination), observer)
    }

    /// Travel to the planner's cell for label `name`.
    pub fn navigate_to_label<O: JourneyObserver>(
        &mut self,
        name:     &str,
        observer: &mut O,
    ) -> AgentResult<JourneyOutcome> {
        let destination = self
            .planner
            .label_position(name)
            .ok_or_else(|| AgentError::UnknownLabel(name.to_owned()))?;
        self.navigate_to(destination, observer)
    }

    /// Travel to wherever `object` stands.  The object is tracked: when it
    /// moves, the route is replanned toward its new cell.
    pub fn navigate_to_object<O: JourneyObserver>(
        &mut self,
        object:   EntityId,
        observer: &mut O,
    ) -> AgentResult<JourneyOutcome> {
        self.drive(Goal::Object(object), observer)
    }

    fn drive<O: JourneyObserver>(&mut self, goal: Goal, observer: &mut O) -> AgentResult<JourneyOutcome> {
        let mut destination = self.resolve(goal)?;
        let (mut route, _) = self.calc_nav_pos(destination)?;
        let mut replans = 0;
        let mut outcome = JourneyOutcome::UnrecognizedFailure;

        for leg in 0..self.config.max_legs {
            if let Goal::Object(_) = goal {
                let now = self.resolve(goal)?;
                if now != destination {
                    if replans == self.config.max_replans {
                        return Ok(JourneyOutcome::TrackedObjectMoved);
                    }
                    replans += 1;
                    destination = now;
                    route = self.calc_nav_pos(destination)?.0;
                }
            }

            let mut request = JourneyRequest::new(destination, self.config.velocity, route.total_distance());
            if let Goal::Object(object) = goal {
                request = request.tracking(object);
            }
            outcome = self.journey(&mut route, &request, observer)?;
            tracing::debug!(leg, %outcome, remaining = route.len(), "navigation leg");

            match outcome {
                JourneyOutcome::ReachedIntermediateHop => {}
                JourneyOutcome::OffRoute | JourneyOutcome::TrackedObjectMoved
                    if replans < self.config.max_replans =>
                {
                    replans += 1;
                    destination = self.resolve(goal)?;
                    tracing::debug!(replans, %destination, "replanning");
                    route = self.calc_nav_pos(destination)?.0;
                }
                _ => return Ok(outcome),
            }
        }
        tracing::warn!(legs = self.config.max_legs, %outcome, "navigation leg limit reached");
        Ok(outcome)
    }

    fn resolve(&mut self, goal: Goal) -> AgentResult<GridPos> {
        match goal {
            Goal::Cell(cell) => Ok(cell),
            Goal::Object(object) => {
                self.cache.reset();
                self.object_cell(object)
            }
        }
    }

    // ── Facing and aiming ─────────────────────────────────────────────────

    /// Turn toward `object` and aim at it.  Both positions are read fresh.
    pub fn face(&mut self, object: EntityId) -> AgentResult<()> {
        self.cache.reset();
        let target = self.world_position(object)?.xy();
        self.face_position(target, None)?;
        self.aim(object)
    }

    pub fn aim(&mut self, object: EntityId) -> AgentResult<()> {
        self.cache.reset();
        Ok(self.cache.aim(object)?)
    }

    /// Turn toward the world point `target`.  Returns the server angle
    /// requested.
    pub fn face_position(&mut self, target: WorldPoint, angular_velocity: Option<i32>) -> AgentResult<Facing> {
        Ok(self.controller().face_position(target, angular_velocity)?)
    }

    /// Turn toward the label entity `name` and aim at it.
    pub fn face_label(&mut self, name: &str) -> AgentResult<()> {
        let label = self.label_entity(name)?;
        self.cache.reset();
        let target = self.cache.entity_position(label)?.xy();
        self.face_position(target, None)?;
        self.aim(label)
    }

    // ── Labels ────────────────────────────────────────────────────────────

    /// The server entity carrying label `name`.
    pub fn label_entity(&mut self, name: &str) -> AgentResult<EntityId> {
        Ok(self.cache.entity_named("label", name)?)
    }

    /// Map position of label `name`.
    pub fn label_position(&mut self, name: &str) -> AgentResult<WorldPos> {
        let label = self.label_entity(name)?;
        Ok(self.cache.entity_position(label)?)
    }

    // ── Movement ──────────────────────────────────────────────────────────

    /// Turn to the map angle `angle`.
    pub fn turn(&mut self, angle: Facing, angular_velocity: i32) -> AgentResult<()> {
        Ok(self.cache.turn(angle.offset(self.config.angle_offset), angular_velocity)?)
    }

    pub fn crouch(&mut self) -> AgentResult<()> {
        Ok(self.cache.step_up(-2, 48.0)?)
    }

    // ── Bounding boxes ────────────────────────────────────────────────────

    /// Create a bounding box of `size` (see the [`BoxExtent`] constants) at
    /// the map position of entity `id`.
    pub fn init_bbox_entity(&mut self, id: EntityId, size: BoxExtent) -> AgentResult<BBoxId> {
        let origin = self.cache.entity_position(id)?;
        Ok(self.cache.init_bbox(origin, size)?)
    }

    /// Create a one-square bounding box on grid cell `cell`.
    pub fn init_bbox_cell(&mut self, cell: GridPos) -> AgentResult<BBoxId> {
        let origin = self.calibration.world_from_grid_checked(cell)?.with_z(0.0);
        Ok(self.cache.init_bbox(origin, BoxExtent::PEN_SQUARE)?)
    }
}
