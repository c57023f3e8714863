//! Strongly typed identifier wrappers for server-side objects.
//!
//! The simulation server hands out small integer ids for every entity it
//! knows about (players, monsters, pickups, labels).  Wrapping them keeps an
//! entity id from being passed where a weapon slot or bounding-box handle is
//! expected.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// The raw value sent over the wire.
            #[inline(always)]
            pub fn raw(self) -> $inner {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$inner> for $name {
            #[inline(always)]
            fn from(raw: $inner) -> $name {
                $name(raw)
            }
        }
    };
}

typed_id! {
    /// Server entity number.  Ids start at 1; the server reports the highest
    /// registered id through `max_object`.
    pub struct EntityId(u32);
}

typed_id! {
    /// Weapon slot number, `0..=max_weapon`.
    pub struct WeaponId(u32);
}

typed_id! {
    /// Handle of a bounding box created on the server for this bot.
    pub struct BBoxId(u32);
}

impl EntityId {
    /// Every id from 1 up to and including `max`.
    pub fn all_up_to(max: u32) -> impl Iterator<Item = EntityId> {
        (1..=max).map(EntityId)
    }
}
