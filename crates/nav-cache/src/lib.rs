//! `nav-cache` — selective result cache with action-triggered invalidation.
//!
//! Every query to the simulation server costs a round trip.  [`ActionCache`]
//! wraps a [`Transport`][nav_remote::Transport], memoises the read-only
//! queries, and drops exactly the entries a mutating call could have made
//! stale.  Calls with a side effect per invocation (firing, waiting,
//! timeouts) are exposed on the same façade and always reach the server.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                      |
//! |------------|---------------------------------------------------------------|
//! | [`key`]    | `CacheKey`, `CachedValue`, `FromCached`                       |
//! | [`action`] | `Action`, `Invalidation` — the invalidation table             |
//! | [`cache`]  | `ActionCache<T>` façade, `CacheStats`                         |
//! | [`error`]  | `CacheError`, `CacheResult<T>`                                |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                      |
//! |-----------|-------------------------------------------------------------|
//! | `fx-hash` | Use `rustc-hash`'s `FxHashMap` for the key map.             |
//! | `serde`   | `Serialize`/`Deserialize` on keys, values and actions.      |

pub mod action;
pub mod cache;
pub mod error;
pub mod key;


pub use action::{Action, Invalidation, WeaponScope};
pub use cache::{ActionCache, CacheStats};
pub use error::{CacheError, CacheResult};
pub use key::{CacheKey, CachedValue, FromCached};
