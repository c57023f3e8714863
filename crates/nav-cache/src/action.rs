//! Mutating actions and what each one makes stale.
//!
//! Every call on the cache façade that changes the world is tagged with an
//! [`Action`].  [`Action::invalidation`] is the single table of which cached
//! queries the action can affect; it is an exhaustive `match`, so a new
//! action cannot be added without deciding what it invalidates.

use nav_core::WeaponId;

/// A mutating remote call, as seen by the cache.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    Forward,
    Right,
    StepUp,
    StepVec,
    Turn,
    Aim,
    Sync,
    Select,
    StartFiring,
    StopFiring,
    Reload,
    ChangeWeapon(WeaponId),
    DropWeapon,
    Timeout,
    Visibility,
    BoundingBox,
    Track,
}

/// Which weapon-keyed entries an action touches.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum WeaponScope {
    Untouched,
    /// The active weapon; every weapon if the active one is not known.
    Active,
    Weapon(WeaponId),
}

/// The set of cached queries an action makes stale.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Invalidation {
    /// The bot's own `Position`.
    pub own_position: bool,
    pub facing:       bool,
    pub ammo:         WeaponScope,
    pub inventory:    WeaponScope,
}

impl Invalidation {
    pub const NOTHING: Invalidation = Invalidation {
        own_position: false,
        facing:       false,
        ammo:         WeaponScope::Untouched,
        inventory:    WeaponScope::Untouched,
    };

    const MOVED: Invalidation = Invalidation { own_position: true, ..Self::NOTHING };

    /// Waiting lets the world advance: position and facing may both change.
    const WAITED: Invalidation = Invalidation { own_position: true, facing: true, ..Self::NOTHING };

    const FIRED: Invalidation = Invalidation { ammo: WeaponScope::Active, ..Self::NOTHING };

    /// `true` if nothing is invalidated.
    pub fn is_empty(&self) -> bool {
        *self == Self::NOTHING
    }
}

impl Action {
    pub fn invalidation(self) -> Invalidation {
        match self {
            Action::Forward | Action::Right | Action::StepUp | Action::StepVec => {
                Invalidation::MOVED
            }
            Action::Turn | Action::Sync | Action::Select => Invalidation::WAITED,
            Action::Aim => Invalidation { facing: true, ..Invalidation::NOTHING },
            Action::StartFiring | Action::StopFiring | Action::Reload => Invalidation::FIRED,
            Action::ChangeWeapon(w) => Invalidation {
                ammo: WeaponScope::Weapon(w),
                ..Invalidation::NOTHING
            },
            Action::DropWeapon => Invalidation {
                ammo:      WeaponScope::Active,
                inventory: WeaponScope::Active,
                ..Invalidation::NOTHING
            },
            Action::Timeout | Action::Visibility | Action::BoundingBox | Action::Track => {
                Invalidation::NOTHING
            }
        }
    }
}
