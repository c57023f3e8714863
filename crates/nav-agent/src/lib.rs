//! `nav-agent` — the bot façade.
//!
//! A [`Bot`] owns the cached connection to the server, the map's planner and
//! the grid ↔ world calibration read from the map's tags.  It exposes the
//! navigation, facing and labelling requests a bot script is written in.
//!
//! # Crate layout
//!
//! | Module      | Contents                                            |
//! |-------------|-----------------------------------------------------|
//! | [`builder`] | `BotBuilder` — tag calibration and start-up checks  |
//! | [`bot`]     | `Bot` — navigation, facing, labels, bounding boxes  |
//! | [`error`]   | `AgentError`, `AgentResult<T>`                      |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                 |
//! |-----------|--------------------------------------------------------|
//! | `serde`   | Forwards `serde` to every `nav-*` dependency.          |
//! | `fx-hash` | FxHash for the action cache's key map.                 |

pub mod bot;
pub mod builder;
pub mod error;

#[cfg(test)]
mod tests;

pub use bot::Bot;
pub use builder::BotBuilder;
pub use error::{AgentError, AgentResult};
