//! `ActionCache` — memoised queries and invalidating actions over a
//! [`Transport`].
//!
//! # Validity window
//!
//! An entry is served from memory until an action that could change it is
//! issued through this façade, or until [`reset`][ActionCache::reset].  Calls
//! made on the transport directly (via [`transport_mut`]) bypass the
//! invalidation table; follow them with a reset.
//!
//! [`transport_mut`]: ActionCache::transport_mut

use nav_core::{BBoxId, EntityId, Facing, Ticks, Timeout, WeaponId, WorldPos};
use nav_remote::{BBoxSelection, BoxExtent, Event, Rgba, Transport, TransportResult};

use crate::{Action, CacheError, CacheKey, CacheResult, CachedValue, FromCached, WeaponScope};

#[cfg(feature = "fx-hash")]
type KeyMap = rustc_hash::FxHashMap<CacheKey, CachedValue>;
#[cfg(not(feature = "fx-hash"))]
type KeyMap = std::collections::HashMap<CacheKey, CachedValue>;

/// Hit/miss counters since construction.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct CacheStats {
    pub hits:   u64,
    pub misses: u64,
}

pub struct ActionCache<T: Transport> {
    transport:     T,
    entries:       KeyMap,
    /// The bot's own id, learned on the first `self_id` fetch.  Survives
    /// resets: the id cannot change for the lifetime of a connection.
    me:            Option<EntityId>,
    active_weapon: Option<WeaponId>,
    stats:         CacheStats,
}

impl<T: Transport> ActionCache<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            entries:       KeyMap::default(),
            me:            None,
            active_weapon: None,
            stats:         CacheStats::default(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Direct access to the transport, bypassing invalidation.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_inner(self) -> T {
        self.transport
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    /// The weapon most recently switched to through this cache, if known.
    pub fn active_weapon(&self) -> Option<WeaponId> {
        self.active_weapon
    }

    // ── Core operations ───────────────────────────────────────────────────

    /// Cached value under `key`, fetching it from the server on a miss.
    pub fn get_or_fetch(&mut self, key: CacheKey) -> CacheResult<CachedValue> {
        if let Some(value) = self.entries.get(&key) {
            self.stats.hits += 1;
            return Ok(value.clone());
        }
        self.stats.misses += 1;
        tracing::debug!(key = %key, "cache miss");
        let value = key.fetch(&mut self.transport)?;
        if let (CacheKey::SelfId, CachedValue::Entity(id)) = (&key, &value) {
            self.me = Some(*id);
        }
        self.entries.insert(key, value.clone());
        Ok(value)
    }

    /// Typed [`get_or_fetch`][Self::get_or_fetch].
    pub fn get<V: FromCached>(&mut self, key: CacheKey) -> CacheResult<V> {
        let value = self.get_or_fetch(key.clone())?;
        V::from_cached(&value).ok_or_else(|| CacheError::ValueMismatch {
            key,
            found:    value.kind(),
            expected: std::any::type_name::<V>(),
        })
    }

    /// Drop `key`.  Returns whether it was present.
    pub fn invalidate(&mut self, key: &CacheKey) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drop every entry.
    pub fn reset(&mut self) {
        if !self.entries.is_empty() {
            tracing::trace!(entries = self.entries.len(), "cache reset");
        }
        self.entries.clear();
    }

    /// Drop everything `action` could have changed.
    pub fn invalidate_for(&mut self, action: Action) {
        let inv = action.invalidation();
        if inv.is_empty() {
            return;
        }
        if inv.own_position {
            match self.me {
                Some(me) => {
                    self.entries.remove(&CacheKey::Position(me));
                }
                None => self.entries.retain(|k, _| !matches!(k, CacheKey::Position(_))),
            }
        }
        if inv.facing {
            self.entries.remove(&CacheKey::Facing);
        }
        self.drop_weapon_scope(inv.ammo, |k| match k {
            CacheKey::Ammo(w) => Some(*w),
            _ => None,
        });
        self.drop_weapon_scope(inv.inventory, |k| match k {
            CacheKey::InventoryWeapon(w) => Some(*w),
            _ => None,
        });
        tracing::trace!(?action, entries = self.entries.len(), "invalidated");
    }

    fn drop_weapon_scope(&mut self, scope: WeaponScope, weapon_of: fn(&CacheKey) -> Option<WeaponId>) {
        let target = match scope {
            WeaponScope::Untouched => return,
            WeaponScope::Active    => self.active_weapon,
            WeaponScope::Weapon(w) => Some(w),
        };
        self.entries.retain(|k, _| match (weapon_of(k), target) {
            (None, _)              => true,
            (Some(w), Some(t))     => w != t,
            (Some(_), None)        => false,
        });
    }

    fn act<R>(
        &mut self,
        action: Action,
        call: impl FnOnce(&mut T) -> TransportResult<R>,
    ) -> CacheResult<R> {
        let result = call(&mut self.transport);
        // The command may have reached the server even when the reply failed.
        self.invalidate_for(action);
        Ok(result?)
    }

    // ── Cached queries ────────────────────────────────────────────────────

    pub fn position(&mut self, id: EntityId) -> CacheResult<WorldPos> {
        self.get(CacheKey::Position(id))
    }

    pub fn self_id(&mut self) -> CacheResult<EntityId> {
        self.get(CacheKey::SelfId)
    }

    /// The bot's own position.
    pub fn my_position(&mut self) -> CacheResult<WorldPos> {
        let me = self.self_id()?;
        self.position(me)
    }

    pub fn max_object(&mut self) -> CacheResult<u32> {
        self.get(CacheKey::MaxObject)
    }

    pub fn object_name(&mut self, id: EntityId) -> CacheResult<String> {
        self.get(CacheKey::ObjectName(id))
    }

    pub fn is_visible(&mut self, id: EntityId) -> CacheResult<bool> {
        self.get(CacheKey::IsVisible(id))
    }

    pub fn is_fixed(&mut self, id: EntityId) -> CacheResult<bool> {
        self.get(CacheKey::IsFixed(id))
    }

    pub fn ammo(&mut self, weapon: WeaponId) -> CacheResult<u32> {
        self.get(CacheKey::Ammo(weapon))
    }

    pub fn has_weapon(&mut self, weapon: WeaponId) -> CacheResult<bool> {
        self.get(CacheKey::InventoryWeapon(weapon))
    }

    pub fn facing(&mut self) -> CacheResult<Facing> {
        self.get(CacheKey::Facing)
    }

    pub fn pen_map_name(&mut self) -> CacheResult<String> {
        self.get(CacheKey::PenMapName)
    }

    pub fn tag(&mut self, name: &str) -> CacheResult<String> {
        self.get(CacheKey::Tag(name.to_owned()))
    }

    pub fn player_start(&mut self) -> CacheResult<WorldPos> {
        self.get(CacheKey::PlayerStart)
    }

    pub fn entity_named(&mut self, left: &str, right: &str) -> CacheResult<EntityId> {
        self.get(CacheKey::EntityNamed(left.to_owned(), right.to_owned()))
    }

    pub fn entity_position(&mut self, id: EntityId) -> CacheResult<WorldPos> {
        self.get(CacheKey::EntityPosition(id))
    }

    pub fn entity_name(&mut self, id: EntityId) -> CacheResult<String> {
        self.get(CacheKey::EntityName(id))
    }

    pub fn self_entity_names(&mut self) -> CacheResult<Vec<String>> {
        self.get(CacheKey::SelfEntityNames)
    }

    /// Every entity id the server has registered.
    pub fn all_objects(&mut self) -> CacheResult<Vec<EntityId>> {
        Ok(EntityId::all_up_to(self.max_object()?).collect())
    }

    /// Where the bot spawned in the static map.
    pub fn spawn_position(&mut self) -> CacheResult<WorldPos> {
        let me = self.self_id()?;
        self.entity_position(me)
    }

    // ── Movement ──────────────────────────────────────────────────────────

    pub fn forward(&mut self, velocity: i32, distance: f64) -> CacheResult<()> {
        self.act(Action::Forward, |t| t.forward(velocity, distance))
    }

    pub fn back(&mut self, velocity: i32, distance: f64) -> CacheResult<()> {
        self.forward(-velocity, distance)
    }

    pub fn right(&mut self, velocity: i32, distance: f64) -> CacheResult<()> {
        self.act(Action::Right, |t| t.right(velocity, distance))
    }

    pub fn left(&mut self, velocity: i32, distance: f64) -> CacheResult<()> {
        self.right(-velocity, distance)
    }

    pub fn step_up(&mut self, velocity: i32, distance: f64) -> CacheResult<()> {
        self.act(Action::StepUp, |t| t.step_up(velocity, distance))
    }

    pub fn step_vec(&mut self, vel_forward: i32, vel_right: i32, distance: f64) -> CacheResult<()> {
        self.act(Action::StepVec, |t| t.step_vec(vel_forward, vel_right, distance))
    }

    pub fn turn(&mut self, angle: Facing, angular_velocity: i32) -> CacheResult<()> {
        self.act(Action::Turn, |t| t.turn(angle, angular_velocity))
    }

    // ── Waiting ───────────────────────────────────────────────────────────

    pub fn sync(&mut self) -> CacheResult<Event> {
        self.act(Action::Sync, |t| t.sync())
    }

    pub fn select(&mut self, events: &[Event]) -> CacheResult<Event> {
        self.act(Action::Select, |t| t.select(events))
    }

    pub fn timeout(&mut self, request: Timeout) -> CacheResult<Option<Ticks>> {
        self.act(Action::Timeout, |t| t.timeout(request))
    }

    // ── Weapons ───────────────────────────────────────────────────────────

    pub fn start_firing(&mut self) -> CacheResult<u32> {
        self.act(Action::StartFiring, |t| t.start_firing())
    }

    pub fn stop_firing(&mut self) -> CacheResult<u32> {
        self.act(Action::StopFiring, |t| t.stop_firing())
    }

    pub fn reload_weapon(&mut self) -> CacheResult<u32> {
        self.act(Action::Reload, |t| t.reload_weapon())
    }

    /// Switch to `weapon`; returns its ammo, or `None` if it is not held.
    pub fn change_weapon(&mut self, weapon: WeaponId) -> CacheResult<Option<u32>> {
        let ammo = self.act(Action::ChangeWeapon(weapon), |t| t.change_weapon(weapon))?;
        if ammo.is_some() {
            self.active_weapon = Some(weapon);
        }
        Ok(ammo)
    }

    pub fn drop_weapon(&mut self) -> CacheResult<bool> {
        let dropped = self.act(Action::DropWeapon, |t| t.drop_weapon())?;
        self.active_weapon = None;
        Ok(dropped)
    }

    pub fn aim(&mut self, id: EntityId) -> CacheResult<()> {
        self.act(Action::Aim, |t| t.aim(id))
    }

    // ── Visibility shader ─────────────────────────────────────────────────

    pub fn visibility_flag(&mut self, on: bool) -> CacheResult<()> {
        self.act(Action::Visibility, |t| t.visibility_flag(on))
    }

    pub fn visibility(&mut self, colour: Rgba) -> CacheResult<()> {
        self.act(Action::Visibility, |t| t.visibility(colour))
    }

    pub fn visibility_params(&mut self, segments: &[f64]) -> CacheResult<()> {
        self.act(Action::Visibility, |t| t.visibility_params(segments))
    }

    pub fn flip_visibility(&mut self) -> CacheResult<()> {
        self.act(Action::Visibility, |t| t.flip_visibility())
    }

    pub fn set_visibility_shader(&mut self, shader: &str, entities: &[String]) -> CacheResult<bool> {
        self.act(Action::Visibility, |t| t.set_visibility_shader(shader, entities))
    }

    // ── Bounding boxes ────────────────────────────────────────────────────

    pub fn init_bbox(&mut self, origin: WorldPos, size: BoxExtent) -> CacheResult<BBoxId> {
        self.act(Action::BoundingBox, |t| t.init_bbox(origin, size))
    }

    pub fn delete_bbox(&mut self, id: BBoxId) -> CacheResult<bool> {
        self.act(Action::BoundingBox, |t| t.delete_bbox(id))
    }

    pub fn delete_bbox_all(&mut self) -> CacheResult<()> {
        self.act(Action::BoundingBox, |t| t.delete_bbox_all())
    }

    pub fn bbox_track(&mut self, id: BBoxId, ticks: Ticks) -> CacheResult<bool> {
        self.act(Action::Track, |t| t.bbox_track(id, ticks))
    }

    pub fn track(&mut self, id: EntityId, ticks: Ticks) -> CacheResult<bool> {
        self.act(Action::Track, |t| t.track(id, ticks))
    }

    pub fn bbox_include_collision(&mut self, boxes: &BBoxSelection) -> CacheResult<bool> {
        self.act(Action::BoundingBox, |t| t.bbox_collision(boxes, true))
    }

    pub fn bbox_exclude_collision(&mut self, boxes: &BBoxSelection) -> CacheResult<bool> {
        self.act(Action::BoundingBox, |t| t.bbox_collision(boxes, false))
    }

    pub fn bbox_include_visibility(&mut self, boxes: &BBoxSelection) -> CacheResult<bool> {
        self.act(Action::BoundingBox, |t| t.bbox_visibility(boxes, true))
    }

    pub fn bbox_exclude_visibility(&mut self, boxes: &BBoxSelection) -> CacheResult<bool> {
        self.act(Action::BoundingBox, |t| t.bbox_visibility(boxes, false))
    }
}
