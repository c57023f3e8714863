//! `ScriptedWorld` — a deterministic, in-memory [`Transport`].
//!
//! The world is a handful of entities on a plane, a facing angle, a tick
//! counter and a queue of completion events.  It is not a physics engine:
//! movement is a straight line along the facing, and every deviation
//! (collisions, drift, other entities moving) is scripted by the test.
//!
//! # Time
//!
//! Every remote call advances the clock by one tick.  A `select` that only
//! waits for the timeout jumps the clock straight to the deadline.
//!
//! # Movement
//!
//! `forward(v, d)` travels `d * stride` world units along the facing, where
//! `stride` is `orthogonal_stride` for the four cardinal facings and
//! `diagonal_stride` otherwise.  The defaults invert the default
//! `NavConfig` scaling factors so a controller using them lands exactly on
//! its target.  Positions are quantised to 1/1000 of a world unit, as the
//! text wire format of the real server would.
//!
//! # Instrumentation
//!
//! Every call is counted per operation name ([`calls`][ScriptedWorld::calls])
//! and appended to an ordered log ([`log`][ScriptedWorld::log]) so tests can
//! assert exactly which round trips were made.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use nav_core::{BBoxId, EntityId, Facing, Ticks, Timeout, WeaponId, WorldPoint, WorldPos};

use crate::{BBoxSelection, BoxExtent, Event, Rgba, Transport, TransportError, TransportResult};

/// One entity known to the scripted server.
#[derive(Clone, Debug)]
pub struct ScriptedEntity {
    pub name:     String,
    pub position: WorldPos,
    /// Position in the static map (what `entity_position` reports).
    pub spawn:    WorldPos,
    pub visible:  bool,
    pub fixed:    bool,
}

pub struct ScriptedWorld {
    me:           EntityId,
    entities:     BTreeMap<EntityId, ScriptedEntity>,
    facing:       Facing,
    tick:         u64,
    deadline:     Option<u64>,
    pending:      VecDeque<Event>,

    map_name:     String,
    tags:         HashMap<String, String>,
    player_start: WorldPos,
    named:        HashMap<(String, String), EntityId>,
    self_names:   Vec<String>,

    weapons:      BTreeMap<WeaponId, u32>,
    active:       Option<WeaponId>,
    firing:       bool,

    bboxes:       BTreeMap<BBoxId, (WorldPos, BoxExtent)>,
    next_bbox:    u32,
    shader_on:    bool,

    /// World units travelled per unit of `forward` distance, cardinal facings.
    pub orthogonal_stride: f64,
    /// World units travelled per unit of `forward` distance, other facings.
    pub diagonal_stride:   f64,

    cutoffs:      VecDeque<f64>,
    drifts:       VecDeque<WorldPoint>,
    relocations:  VecDeque<(EntityId, WorldPos)>,
    failures:     HashSet<&'static str>,

    calls:        BTreeMap<&'static str, usize>,
    log:          Vec<&'static str>,
    last_turn:    Option<(Facing, i32)>,
}

impl ScriptedWorld {
    /// A world containing only the bot itself, entity `me`, at `start`.
    pub fn new(me: EntityId, start: WorldPos) -> Self {
        let mut entities = BTreeMap::new();
        entities.insert(me, ScriptedEntity {
            name:     "python_doommarine_mp".into(),
            position: quantise(start),
            spawn:    start,
            visible:  true,
            fixed:    false,
        });
        Self {
            me,
            entities,
            facing:       Facing::UP,
            tick:         0,
            deadline:     None,
            pending:      VecDeque::new(),
            map_name:     "scripted".into(),
            tags:         HashMap::new(),
            player_start: start,
            named:        HashMap::new(),
            self_names:   vec!["body".into(), "head".into(), "weapon".into()],
            weapons:      BTreeMap::new(),
            active:       None,
            firing:       false,
            bboxes:       BTreeMap::new(),
            next_bbox:    1,
            shader_on:    false,
            orthogonal_stride: 1.0 / 0.55,
            diagonal_stride:   1.0 / 0.5,
            cutoffs:      VecDeque::new(),
            drifts:       VecDeque::new(),
            relocations:  VecDeque::new(),
            failures:     HashSet::new(),
            calls:        BTreeMap::new(),
            log:          Vec::new(),
            last_turn:    None,
        }
    }

    // ── Scenario setup ────────────────────────────────────────────────────

    pub fn with_map_name(mut self, name: &str) -> Self {
        self.map_name = name.into();
        self
    }

    pub fn with_tag(mut self, name: &str, value: impl ToString) -> Self {
        self.tags.insert(name.into(), value.to_string());
        self
    }

    pub fn with_player_start(mut self, pos: WorldPos) -> Self {
        self.player_start = pos;
        self
    }

    pub fn with_entity(mut self, id: EntityId, name: &str, pos: WorldPos) -> Self {
        self.entities.insert(id, ScriptedEntity {
            name:     name.into(),
            position: quantise(pos),
            spawn:    pos,
            visible:  true,
            fixed:    false,
        });
        self
    }

    /// Register entity `id` under the spawn-argument pair `(left, right)`.
    pub fn with_named(mut self, left: &str, right: &str, id: EntityId) -> Self {
        self.named.insert((left.into(), right.into()), id);
        self
    }

    pub fn with_weapon(mut self, weapon: WeaponId, ammo: u32) -> Self {
        self.weapons.insert(weapon, ammo);
        if self.active.is_none() {
            self.active = Some(weapon);
        }
        self
    }

    pub fn with_facing(mut self, facing: Facing) -> Self {
        self.facing = facing;
        self
    }

    /// Mutable access to an entity, for tests that edit the world directly.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut ScriptedEntity> {
        self.entities.get_mut(&id)
    }

    /// The next move covers only `fraction` of its requested distance.
    pub fn queue_cutoff(&mut self, fraction: f64) {
        self.cutoffs.push_back(fraction);
    }

    /// The next move ends displaced by `offset`.
    pub fn queue_drift(&mut self, offset: WorldPoint) {
        self.drifts.push_back(offset);
    }

    /// While the bot next blocks in `select`/`sync`, entity `id` moves to `pos`.
    pub fn queue_relocation(&mut self, id: EntityId, pos: WorldPos) {
        self.relocations.push_back((id, pos));
    }

    /// The next call to `op` fails with [`TransportError::Disconnected`].
    pub fn fail_next(&mut self, op: &'static str) {
        self.failures.insert(op);
    }

    // ── Inspection ────────────────────────────────────────────────────────

    /// How many times `op` has been called.
    pub fn calls(&self, op: &str) -> usize {
        self.calls.get(op).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.log.len()
    }

    /// Every call made so far, in order.
    pub fn log(&self) -> &[&'static str] {
        &self.log
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
        self.calls.clear();
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Where the bot really is, bypassing the call counters.
    pub fn true_position(&self) -> WorldPos {
        self.entities.get(&self.me).map(|e| e.position).unwrap_or_default()
    }

    pub fn true_facing(&self) -> Facing {
        self.facing
    }

    /// The most recent `turn` request as `(angle, angular_velocity)`.
    pub fn last_turn(&self) -> Option<(Facing, i32)> {
        self.last_turn
    }

    pub fn is_firing(&self) -> bool {
        self.firing
    }

    pub fn shader_enabled(&self) -> bool {
        self.shader_on
    }

    pub fn bbox_count(&self) -> usize {
        self.bboxes.len()
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn enter(&mut self, op: &'static str) -> TransportResult<()> {
        *self.calls.entry(op).or_insert(0) += 1;
        self.log.push(op);
        self.tick += 1;
        if self.failures.remove(op) {
            return Err(TransportError::Disconnected);
        }
        Ok(())
    }

    fn entity(&self, op: &'static str, id: EntityId) -> TransportResult<&ScriptedEntity> {
        self.entities.get(&id).ok_or_else(|| TransportError::Rejected {
            op,
            reason: format!("unknown entity {id}"),
        })
    }

    fn remaining(&self) -> Option<Ticks> {
        self.deadline
            .filter(|&d| d > self.tick)
            .map(|d| Ticks(u32::try_from(d - self.tick).unwrap_or(u32::MAX)))
    }

    /// Move the bot by `travel` world units along `heading`.
    fn displace(&mut self, heading: Facing, velocity: i32, distance: f64) {
        let (dir, stride) = match heading.degrees() {
            0   => (WorldPoint::new(1.0, 0.0), self.orthogonal_stride),
            90  => (WorldPoint::new(0.0, 1.0), self.orthogonal_stride),
            180 => (WorldPoint::new(-1.0, 0.0), self.orthogonal_stride),
            270 => (WorldPoint::new(0.0, -1.0), self.orthogonal_stride),
            d   => {
                let r = (d as f64).to_radians();
                (WorldPoint::new(r.cos(), r.sin()), self.diagonal_stride)
            }
        };
        let mut travel = distance * stride * velocity.signum() as f64;
        if let Some(fraction) = self.cutoffs.pop_front() {
            travel *= fraction;
        }
        let drift = self.drifts.pop_front().unwrap_or_default();
        if let Some(me) = self.entities.get_mut(&self.me) {
            let next = WorldPoint::new(
                me.position.x + dir.x * travel + drift.x,
                me.position.y + dir.y * travel + drift.y,
            );
            me.position = quantise(next.with_z(me.position.z));
        }
    }

    fn settle(&mut self) {
        while let Some((id, pos)) = self.relocations.pop_front() {
            if let Some(e) = self.entities.get_mut(&id) {
                e.position = quantise(pos);
            }
        }
    }

    fn active_ammo(&self) -> u32 {
        self.active.and_then(|w| self.weapons.get(&w).copied()).unwrap_or(0)
    }
}

fn quantise(p: WorldPos) -> WorldPos {
    let q = |v: f64| (v * 1000.0).round() / 1000.0;
    WorldPos::new(q(p.x), q(p.y), q(p.z))
}

impl Transport for ScriptedWorld {
    fn position(&mut self, id: EntityId) -> TransportResult<WorldPos> {
        self.enter("position")?;
        Ok(self.entity("position", id)?.position)
    }

    fn self_id(&mut self) -> TransportResult<EntityId> {
        self.enter("self_id")?;
        Ok(self.me)
    }

    fn max_object(&mut self) -> TransportResult<u32> {
        self.enter("max_object")?;
        Ok(self.entities.keys().next_back().map_or(0, |id| id.0))
    }

    fn object_name(&mut self, id: EntityId) -> TransportResult<String> {
        self.enter("object_name")?;
        Ok(self.entity("object_name", id)?.name.clone())
    }

    fn is_visible(&mut self, id: EntityId) -> TransportResult<bool> {
        self.enter("is_visible")?;
        Ok(self.entity("is_visible", id)?.visible)
    }

    fn is_fixed(&mut self, id: EntityId) -> TransportResult<bool> {
        self.enter("is_fixed")?;
        Ok(self.entity("is_fixed", id)?.fixed)
    }

    fn pen_map_name(&mut self) -> TransportResult<String> {
        self.enter("pen_map_name")?;
        Ok(self.map_name.clone())
    }

    fn tag(&mut self, name: &str) -> TransportResult<String> {
        self.enter("tag")?;
        self.tags.get(name).cloned().ok_or_else(|| TransportError::Rejected {
            op:     "tag",
            reason: format!("map has no tag {name:?}"),
        })
    }

    fn player_start(&mut self) -> TransportResult<WorldPos> {
        self.enter("player_start")?;
        Ok(self.player_start)
    }

    fn entity_named(&mut self, left: &str, right: &str) -> TransportResult<EntityId> {
        self.enter("entity_named")?;
        self.named
            .get(&(left.to_owned(), right.to_owned()))
            .copied()
            .ok_or_else(|| TransportError::Rejected {
                op:     "entity_named",
                reason: format!("no entity with {left:?} {right:?}"),
            })
    }

    fn entity_position(&mut self, id: EntityId) -> TransportResult<WorldPos> {
        self.enter("entity_position")?;
        Ok(self.entity("entity_position", id)?.spawn)
    }

    fn entity_name(&mut self, id: EntityId) -> TransportResult<String> {
        self.enter("entity_name")?;
        Ok(self.entity("entity_name", id)?.name.clone())
    }

    fn self_entity_names(&mut self) -> TransportResult<Vec<String>> {
        self.enter("self_entity_names")?;
        Ok(self.self_names.clone())
    }

    fn facing(&mut self) -> TransportResult<Facing> {
        self.enter("facing")?;
        Ok(self.facing)
    }

    fn forward(&mut self, velocity: i32, distance: f64) -> TransportResult<()> {
        self.enter("forward")?;
        self.displace(self.facing, velocity, distance);
        self.pending.push_back(Event::Move);
        Ok(())
    }

    fn right(&mut self, velocity: i32, distance: f64) -> TransportResult<()> {
        self.enter("right")?;
        self.displace(self.facing.offset(-90), velocity, distance);
        self.pending.push_back(Event::Move);
        Ok(())
    }

    fn step_up(&mut self, velocity: i32, distance: f64) -> TransportResult<()> {
        self.enter("step_up")?;
        if let Some(me) = self.entities.get_mut(&self.me) {
            me.position.z += distance * velocity.signum() as f64;
            me.position = quantise(me.position);
        }
        self.pending.push_back(Event::Move);
        Ok(())
    }

    fn step_vec(&mut self, vel_forward: i32, vel_right: i32, distance: f64) -> TransportResult<()> {
        self.enter("step_vec")?;
        self.displace(self.facing, vel_forward, distance);
        self.displace(self.facing.offset(-90), vel_right, distance);
        self.pending.push_back(Event::Move);
        Ok(())
    }

    fn turn(&mut self, angle: Facing, angular_velocity: i32) -> TransportResult<()> {
        self.enter("turn")?;
        self.last_turn = Some((angle, angular_velocity));
        if angular_velocity != 0 {
            self.facing = angle;
        }
        self.pending.push_back(Event::Turn);
        Ok(())
    }

    fn sync(&mut self) -> TransportResult<Event> {
        self.enter("sync")?;
        self.settle();
        if let Some(event) = self.pending.pop_front() {
            return Ok(event);
        }
        if let Some(deadline) = self.deadline.take() {
            self.tick = self.tick.max(deadline);
            return Ok(Event::Timeout);
        }
        Err(TransportError::Rejected {
            op:     "sync",
            reason: "nothing in progress; the call would block forever".into(),
        })
    }

    fn select(&mut self, events: &[Event]) -> TransportResult<Event> {
        self.enter("select")?;
        self.settle();
        if let Some(i) = self.pending.iter().position(|e| events.contains(e)) {
            if let Some(event) = self.pending.remove(i) {
                return Ok(event);
            }
        }
        if events.contains(&Event::Timeout) {
            if let Some(deadline) = self.deadline.take() {
                self.tick = self.tick.max(deadline);
                return Ok(Event::Timeout);
            }
        }
        Err(TransportError::Rejected {
            op:     "select",
            reason: format!("none of {events:?} can complete; the call would block forever"),
        })
    }

    fn timeout(&mut self, request: Timeout) -> TransportResult<Option<Ticks>> {
        self.enter("timeout")?;
        let previous = self.remaining();
        self.deadline = match request {
            Timeout::Arm(Ticks(n)) => Some(self.tick + n as u64),
            Timeout::Disarm        => None,
        };
        Ok(previous)
    }

    fn start_firing(&mut self) -> TransportResult<u32> {
        self.enter("start_firing")?;
        self.firing = true;
        if let Some(ammo) = self.active.and_then(|w| self.weapons.get_mut(&w)) {
            *ammo = ammo.saturating_sub(1);
        }
        self.pending.push_back(Event::Fire);
        Ok(self.active_ammo())
    }

    fn stop_firing(&mut self) -> TransportResult<u32> {
        self.enter("stop_firing")?;
        self.firing = false;
        Ok(self.active_ammo())
    }

    fn reload_weapon(&mut self) -> TransportResult<u32> {
        self.enter("reload_weapon")?;
        if let Some(ammo) = self.active.and_then(|w| self.weapons.get_mut(&w)) {
            *ammo += 10;
        }
        self.pending.push_back(Event::Reload);
        Ok(self.active_ammo())
    }

    fn ammo(&mut self, weapon: WeaponId) -> TransportResult<u32> {
        self.enter("ammo")?;
        Ok(self.weapons.get(&weapon).copied().unwrap_or(0))
    }

    fn inventory_weapon(&mut self, weapon: WeaponId) -> TransportResult<bool> {
        self.enter("inventory_weapon")?;
        Ok(self.weapons.contains_key(&weapon))
    }

    fn change_weapon(&mut self, weapon: WeaponId) -> TransportResult<Option<u32>> {
        self.enter("change_weapon")?;
        match self.weapons.get(&weapon) {
            Some(&ammo) => {
                self.active = Some(weapon);
                Ok(Some(ammo))
            }
            None => Ok(None),
        }
    }

    fn drop_weapon(&mut self) -> TransportResult<bool> {
        self.enter("drop_weapon")?;
        match self.active.take() {
            Some(w) => Ok(self.weapons.remove(&w).is_some()),
            None    => Ok(false),
        }
    }

    fn aim(&mut self, id: EntityId) -> TransportResult<()> {
        self.enter("aim")?;
        let target = self.entity("aim", id)?.position.xy();
        let me = self.true_position().xy();
        self.facing = Facing::toward(me - target);
        Ok(())
    }

    fn visibility_flag(&mut self, on: bool) -> TransportResult<()> {
        self.enter("visibility_flag")?;
        self.shader_on = on;
        Ok(())
    }

    fn visibility(&mut self, _colour: Rgba) -> TransportResult<()> {
        self.enter("visibility")
    }

    fn visibility_params(&mut self, _segments: &[f64]) -> TransportResult<()> {
        self.enter("visibility_params")
    }

    fn flip_visibility(&mut self) -> TransportResult<()> {
        self.enter("flip_visibility")
    }

    fn set_visibility_shader(&mut self, _shader: &str, entities: &[String]) -> TransportResult<bool> {
        self.enter("set_visibility_shader")?;
        Ok(entities.iter().all(|e| self.self_names.contains(e)))
    }

    fn init_bbox(&mut self, origin: WorldPos, size: BoxExtent) -> TransportResult<BBoxId> {
        self.enter("init_bbox")?;
        let id = BBoxId(self.next_bbox);
        self.next_bbox += 1;
        self.bboxes.insert(id, (origin, size));
        Ok(id)
    }

    fn delete_bbox(&mut self, id: BBoxId) -> TransportResult<bool> {
        self.enter("delete_bbox")?;
        Ok(self.bboxes.remove(&id).is_some())
    }

    fn delete_bbox_all(&mut self) -> TransportResult<()> {
        self.enter("delete_bbox_all")?;
        self.bboxes.clear();
        Ok(())
    }

    fn bbox_track(&mut self, id: BBoxId, _ticks: Ticks) -> TransportResult<bool> {
        self.enter("bbox_track")?;
        Ok(self.bboxes.contains_key(&id))
    }

    fn track(&mut self, id: EntityId, _ticks: Ticks) -> TransportResult<bool> {
        self.enter("track")?;
        Ok(self.entities.get(&id).is_some_and(|e| e.visible))
    }

    fn bbox_collision(&mut self, boxes: &BBoxSelection, _enabled: bool) -> TransportResult<bool> {
        self.enter("bbox_collision")?;
        Ok(selection_exists(&self.bboxes, boxes))
    }

    fn bbox_visibility(&mut self, boxes: &BBoxSelection, _enabled: bool) -> TransportResult<bool> {
        self.enter("bbox_visibility")?;
        Ok(selection_exists(&self.bboxes, boxes))
    }
}

fn selection_exists(bboxes: &BTreeMap<BBoxId, (WorldPos, BoxExtent)>, sel: &BBoxSelection) -> bool {
    match sel {
        BBoxSelection::All      => true,
        BBoxSelection::Only(ids) => ids.iter().all(|id| bboxes.contains_key(id)),
    }
}
