//! `er-spatial` — road network, edge loading, risk, and routing.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`network`]  | `RoadNetwork` (forward + reverse CSR, R-tree), builder, duration → weight table |
//! | [`loader`]   | `EdgeRecord`, `RiskRecord`, CSV readers, `build_network`   |
//! | [`risk`]     | `RiskIndex`                                                |
//! | [`search`]   | `Router` trait, `BidirectionalRouter`, `MeetingRoute`      |
//! | [`duration`] | `DurationSource` boundary, `KeyRing`                       |
//! | [`error`]    | `SpatialError`, `SpatialResult<T>`                         |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on core types.             |

pub mod duration;
pub mod error;
pub mod loader;
pub mod network;
pub mod risk;
pub mod search;


pub use duration::{assign_durations, DurationLookup, DurationSource, KeyRing, PendingEdge};
pub use error::{SpatialError, SpatialResult};
pub use loader::{
    build_network, candidate_goals, load_edges_csv, load_risk_csv, read_edge_records,
    read_risk_records, EdgeRecord, RiskRecord,
};
pub use network::{duration_factor, edge_weight, RoadNetwork, RoadNetworkBuilder};
pub use risk::RiskIndex;
pub use search::{
    bidirectional_search, leg_cost, BidirectionalRouter, MeetingRoute, Router, SearchParams,
};
