//! `nav-remote` — the synchronous remote call surface of the simulation
//! server.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`transport`]| `Transport` trait — one method per remote operation         |
//! | [`event`]    | `Event` — completions `select` can wait for                 |
//! | [`bbox`]     | `BoxExtent`, `BBoxSelection`, `Rgba`                        |
//! | [`scripted`] | `ScriptedWorld` — deterministic in-memory `Transport`       |
//! | [`error`]    | `TransportError`, `TransportResult<T>`                      |
//!
//! Connection setup and wire encoding live behind the trait; nothing in the
//! navigation core depends on how a call reaches the server.

pub mod bbox;
pub mod error;
pub mod event;
pub mod scripted;
pub mod transport;


pub use bbox::{BBoxSelection, BoxExtent, Rgba};
pub use error::{TransportError, TransportResult};
pub use event::Event;
pub use scripted::ScriptedWorld;
pub use transport::Transport;
