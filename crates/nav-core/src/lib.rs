//! `nav-core` — foundational types for the bot navigation stack.
//!
//! This crate is a dependency of every other `nav-*` crate.  It has no
//! `nav-*` dependencies and minimal external ones (only `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                |
//! |-----------------|---------------------------------------------------------|
//! | [`ids`]         | `EntityId`, `WeaponId`, `BBoxId`                        |
//! | [`geo`]         | `GridPos`, `WorldPos`, `WorldPoint`                     |
//! | [`transform`]   | `Calibration` — affine grid ↔ world mapping             |
//! | [`angle`]       | `Facing`, `TurnDirection`, facing/turn policy           |
//! | [`time`]        | `Ticks`, `Timeout`                                      |
//! | [`config`]      | `NavConfig`                                             |
//! | [`error`]       | `NavError`, `NavResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod angle;
pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod time;
pub mod transform;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use angle::{Facing, TurnDirection};
pub use config::NavConfig;
pub use error::{Axis, NavError, NavResult};
pub use geo::{GridPos, WorldPoint, WorldPos};
pub use ids::{BBoxId, EntityId, WeaponId};
pub use time::{Ticks, Timeout};
pub use transform::Calibration;
