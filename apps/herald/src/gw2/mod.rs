//! # GW2 API Module
//!
//! Read-only access to the public World-vs-World and worlds endpoints.

mod client;
mod types;

pub use client::{DEFAULT_BASE_URL, Gw2Client};
pub use types::{ApiMatch, MatchOverview, region_snapshot};
