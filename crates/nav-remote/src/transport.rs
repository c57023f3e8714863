//! The `Transport` trait — one blocking method per server operation.
//!
//! # Pluggability
//!
//! The cache and journey controller only ever talk to the server through
//! this trait, so a socket client, a replay log or the in-memory
//! [`ScriptedWorld`][crate::ScriptedWorld] can be swapped in without touching
//! them.
//!
//! # Blocking
//!
//! Every method blocks until the server replies.  Movement, turning and
//! firing calls return as soon as the server has *accepted* the command; use
//! [`select`][Transport::select] to wait for the completion event.

use nav_core::{BBoxId, EntityId, Facing, Ticks, Timeout, WeaponId, WorldPos};

use crate::{BBoxSelection, BoxExtent, Event, Rgba, TransportResult};

pub trait Transport {
    // ── Queries ───────────────────────────────────────────────────────────

    /// Current position of entity `id`.
    fn position(&mut self, id: EntityId) -> TransportResult<WorldPos>;

    /// This bot's own entity id.
    fn self_id(&mut self) -> TransportResult<EntityId>;

    /// Highest entity id registered on the server.
    fn max_object(&mut self) -> TransportResult<u32>;

    fn object_name(&mut self, id: EntityId) -> TransportResult<String>;

    /// `true` if `id` is in line of sight.
    fn is_visible(&mut self, id: EntityId) -> TransportResult<bool>;

    /// `true` if `id` is a static fixture of the map.
    fn is_fixed(&mut self, id: EntityId) -> TransportResult<bool>;

    /// Name of the grid map the server is running.
    fn pen_map_name(&mut self) -> TransportResult<String>;

    /// Raw value of a map tag, e.g. `penminx`.
    fn tag(&mut self, name: &str) -> TransportResult<String>;

    /// World position of the map's player start.
    fn player_start(&mut self) -> TransportResult<WorldPos>;

    /// Entity whose spawn arguments contain the pair `left`, `right`.
    fn entity_named(&mut self, left: &str, right: &str) -> TransportResult<EntityId>;

    /// Spawn position of `id` in the static map.
    fn entity_position(&mut self, id: EntityId) -> TransportResult<WorldPos>;

    fn entity_name(&mut self, id: EntityId) -> TransportResult<String>;

    /// Names of the sub-entities owned by this bot (weapon, head, body…).
    fn self_entity_names(&mut self) -> TransportResult<Vec<String>>;

    /// Current facing angle, map convention.
    fn facing(&mut self) -> TransportResult<Facing>;

    // ── Movement ──────────────────────────────────────────────────────────

    /// Walk along the facing direction.  Negative velocity walks backwards.
    fn forward(&mut self, velocity: i32, distance: f64) -> TransportResult<()>;

    /// Strafe right.  Negative velocity strafes left.
    fn right(&mut self, velocity: i32, distance: f64) -> TransportResult<()>;

    /// Step up (positive velocity) or crouch (negative).
    fn step_up(&mut self, velocity: i32, distance: f64) -> TransportResult<()>;

    /// Combined forward/right step.
    fn step_vec(&mut self, vel_forward: i32, vel_right: i32, distance: f64) -> TransportResult<()>;

    /// Rotate to `angle`, in the direction given by the sign of `angular_velocity`.
    fn turn(&mut self, angle: Facing, angular_velocity: i32) -> TransportResult<()>;

    // ── Waiting ───────────────────────────────────────────────────────────

    /// Block until any completion event occurs.
    fn sync(&mut self) -> TransportResult<Event>;

    /// Block until the first of `events` occurs and return it.
    fn select(&mut self, events: &[Event]) -> TransportResult<Event>;

    /// Arm or cancel the countdown.  Returns the remaining ticks of the
    /// previous countdown, `None` if none was active.
    fn timeout(&mut self, request: Timeout) -> TransportResult<Option<Ticks>>;

    // ── Weapons ───────────────────────────────────────────────────────────

    /// Start firing; returns ammo left.
    fn start_firing(&mut self) -> TransportResult<u32>;

    /// Stop firing; returns ammo left.
    fn stop_firing(&mut self) -> TransportResult<u32>;

    /// Reload the active weapon; returns ammo left.
    fn reload_weapon(&mut self) -> TransportResult<u32>;

    fn ammo(&mut self, weapon: WeaponId) -> TransportResult<u32>;

    /// `true` if the bot holds `weapon` (it may still have no ammo for it).
    fn inventory_weapon(&mut self, weapon: WeaponId) -> TransportResult<bool>;

    /// Switch to `weapon`; returns its ammo, or `None` if not held.
    fn change_weapon(&mut self, weapon: WeaponId) -> TransportResult<Option<u32>>;

    /// Drop the active weapon; `true` if something was dropped.
    fn drop_weapon(&mut self) -> TransportResult<bool>;

    fn aim(&mut self, id: EntityId) -> TransportResult<()>;

    // ── Visibility shader ─────────────────────────────────────────────────

    fn visibility_flag(&mut self, on: bool) -> TransportResult<()>;

    fn visibility(&mut self, colour: Rgba) -> TransportResult<()>;

    /// Durations of the shader's time segments.
    fn visibility_params(&mut self, segments: &[f64]) -> TransportResult<()>;

    fn flip_visibility(&mut self) -> TransportResult<()>;

    /// Apply `shader` to the listed owned entities (all of them if empty).
    fn set_visibility_shader(&mut self, shader: &str, entities: &[String]) -> TransportResult<bool>;

    // ── Bounding boxes ────────────────────────────────────────────────────

    /// Create a box with its bottom-left corner at `origin`.
    fn init_bbox(&mut self, origin: WorldPos, size: BoxExtent) -> TransportResult<BBoxId>;

    fn delete_bbox(&mut self, id: BBoxId) -> TransportResult<bool>;

    fn delete_bbox_all(&mut self) -> TransportResult<()>;

    /// Track `id` for `ticks`; `false` if it cannot be tracked.  Non-blocking.
    fn bbox_track(&mut self, id: BBoxId, ticks: Ticks) -> TransportResult<bool>;

    /// Track entity `id` for `ticks`; `false` if it cannot be tracked.
    fn track(&mut self, id: EntityId, ticks: Ticks) -> TransportResult<bool>;

    fn bbox_collision(&mut self, boxes: &BBoxSelection, enabled: bool) -> TransportResult<bool>;

    fn bbox_visibility(&mut self, boxes: &BBoxSelection, enabled: bool) -> TransportResult<bool>;
}
