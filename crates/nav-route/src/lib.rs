//! `nav-route` — routes on the planning grid and the planner seam.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`route`]   | `Route` — owned, destructively consumed hop list           |
//! | [`planner`] | `Planner` trait, `StaticPlanner`                           |
//! | [`error`]   | `RouteError`, `RouteResult<T>`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `Route`.                |

pub mod error;
pub mod planner;
pub mod route;


pub use error::{RouteError, RouteResult};
pub use planner::{Planner, StaticPlanner};
pub use route::Route;
