//! # herald-core
//!
//! The deterministic matchup engine for Herald - THE LOGIC.
//!
//! Given the current standings of every tier in a World-vs-World region,
//! this crate computes which three worlds will meet in a tier after the next
//! reset, including the worlds linked to them.
//!
//! ## Architectural Constraints
//!
//! The CORE:
//! - Works on immutable snapshots handed in by the caller
//! - Never reads a clock: reset instants and "now" are injected
//! - Never guesses: a missing standing or name is an error, not a fallback
//! - Has NO async, NO network, NO file I/O (pure Rust)

// =============================================================================
// MODULES
// =============================================================================

pub mod population;
pub mod predictor;
pub mod primitives;
pub mod ranking;
pub mod schedule;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    HeraldError, MatchId, NameLookup, Prediction, Region, RegionSnapshot, Role, RoleMap, Seat,
    Standing, WorldId,
};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use predictor::{MatchupPredictor, Outcome};
pub use ranking::{Place, RankingResolver};

// =============================================================================
// RE-EXPORTS: Reports and Schedules
// =============================================================================

pub use population::{PopulationLevel, RegionPopulation, Trend, WorldInfo};
pub use schedule::{RelinkSchedule, ResetSchedule};
