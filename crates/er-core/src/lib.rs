//! `er-core` — foundational types for the `rust_er` dispatch simulator.
//!
//! This crate is a dependency of every other `er-*` crate.  It has no `er-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                               |
//! |--------------|--------------------------------------------------------|
//! | [`ids`]      | `NodeId`, `EdgeId`                                     |
//! | [`geo`]      | `GeoPoint`, haversine distance                         |
//! | [`config`]   | `TrialConfig`, `ScoringMode`                           |
//! | [`rng`]      | `TrialRng` (seeded goal draws)                         |
//! | [`error`]    | `ErError`, `ErResult`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{ScoringMode, TrialConfig};
pub use error::{ErError, ErResult};
pub use geo::GeoPoint;
pub use ids::{EdgeId, NodeId};
pub use rng::TrialRng;
