//! Cache keys, cached values, and the key → remote operation mapping.

use std::fmt;

use nav_core::{EntityId, Facing, WeaponId, WorldPos};
use nav_remote::{Transport, TransportResult};

/// Identity of one memoised query: the operation plus its argument.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CacheKey {
    Position(EntityId),
    SelfId,
    MaxObject,
    ObjectName(EntityId),
    IsVisible(EntityId),
    IsFixed(EntityId),
    Ammo(WeaponId),
    InventoryWeapon(WeaponId),
    Facing,
    PenMapName,
    Tag(String),
    PlayerStart,
    EntityNamed(String, String),
    EntityPosition(EntityId),
    EntityName(EntityId),
    SelfEntityNames,
}

impl CacheKey {
    /// Name of the remote operation that populates this key.
    pub fn op(&self) -> &'static str {
        match self {
            CacheKey::Position(_)        => "position",
            CacheKey::SelfId             => "self_id",
            CacheKey::MaxObject          => "max_object",
            CacheKey::ObjectName(_)      => "object_name",
            CacheKey::IsVisible(_)       => "is_visible",
            CacheKey::IsFixed(_)         => "is_fixed",
            CacheKey::Ammo(_)            => "ammo",
            CacheKey::InventoryWeapon(_) => "inventory_weapon",
            CacheKey::Facing             => "facing",
            CacheKey::PenMapName         => "pen_map_name",
            CacheKey::Tag(_)             => "tag",
            CacheKey::PlayerStart        => "player_start",
            CacheKey::EntityNamed(..)    => "entity_named",
            CacheKey::EntityPosition(_)  => "entity_position",
            CacheKey::EntityName(_)      => "entity_name",
            CacheKey::SelfEntityNames    => "self_entity_names",
        }
    }

    /// Issue the remote query for this key.
    pub(crate) fn fetch<T: Transport>(&self, transport: &mut T) -> TransportResult<CachedValue> {
        Ok(match self {
            CacheKey::Position(id)         => CachedValue::Position(transport.position(*id)?),
            CacheKey::SelfId               => CachedValue::Entity(transport.self_id()?),
            CacheKey::MaxObject            => CachedValue::Count(transport.max_object()?),
            CacheKey::ObjectName(id)       => CachedValue::Text(transport.object_name(*id)?),
            CacheKey::IsVisible(id)        => CachedValue::Flag(transport.is_visible(*id)?),
            CacheKey::IsFixed(id)          => CachedValue::Flag(transport.is_fixed(*id)?),
            CacheKey::Ammo(w)              => CachedValue::Count(transport.ammo(*w)?),
            CacheKey::InventoryWeapon(w)   => CachedValue::Flag(transport.inventory_weapon(*w)?),
            CacheKey::Facing               => CachedValue::Facing(transport.facing()?),
            CacheKey::PenMapName           => CachedValue::Text(transport.pen_map_name()?),
            CacheKey::Tag(name)            => CachedValue::Text(transport.tag(name)?),
            CacheKey::PlayerStart          => CachedValue::Position(transport.player_start()?),
            CacheKey::EntityNamed(l, r)    => CachedValue::Entity(transport.entity_named(l, r)?),
            CacheKey::EntityPosition(id)   => CachedValue::Position(transport.entity_position(*id)?),
            CacheKey::EntityName(id)       => CachedValue::Text(transport.entity_name(*id)?),
            CacheKey::SelfEntityNames      => CachedValue::Names(transport.self_entity_names()?),
        })
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Position(id)
            | CacheKey::ObjectName(id)
            | CacheKey::IsVisible(id)
            | CacheKey::IsFixed(id)
            | CacheKey::EntityPosition(id)
            | CacheKey::EntityName(id)      => write!(f, "{} {}", self.op(), id.raw()),
            CacheKey::Ammo(w)
            | CacheKey::InventoryWeapon(w)  => write!(f, "{} {}", self.op(), w.raw()),
            CacheKey::Tag(name)             => write!(f, "{} {name}", self.op()),
            CacheKey::EntityNamed(l, r)     => write!(f, "{} {l} {r}", self.op()),
            _                               => f.write_str(self.op()),
        }
    }
}

// ── CachedValue ───────────────────────────────────────────────────────────────

/// The last observed result of a query.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CachedValue {
    Position(WorldPos),
    Entity(EntityId),
    Count(u32),
    Text(String),
    Flag(bool),
    Facing(Facing),
    Names(Vec<String>),
}

impl CachedValue {
    /// Short name of the variant, for mismatch reports.
    pub fn kind(&self) -> &'static str {
        match self {
            CachedValue::Position(_) => "position",
            CachedValue::Entity(_)   => "entity",
            CachedValue::Count(_)    => "count",
            CachedValue::Text(_)     => "text",
            CachedValue::Flag(_)     => "flag",
            CachedValue::Facing(_)   => "facing",
            CachedValue::Names(_)    => "names",
        }
    }
}

/// Extraction of a concrete type from a [`CachedValue`].
pub trait FromCached: Sized {
    fn from_cached(value: &CachedValue) -> Option<Self>;
}

macro_rules! from_cached {
    ($ty:ty, $variant:ident) => {
        impl FromCached for $ty {
            #[inline]
            fn from_cached(value: &CachedValue) -> Option<Self> {
                match value {
                    CachedValue::$variant(v) => Some(v.clone()),
                    _ => None,
                }
            }
        }
    };
}

from_cached!(WorldPos, Position);
from_cached!(EntityId, Entity);
from_cached!(u32, Count);
from_cached!(String, Text);
from_cached!(bool, Flag);
from_cached!(Facing, Facing);
from_cached!(Vec<String>, Names);
