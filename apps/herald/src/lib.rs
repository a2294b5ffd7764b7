//! # Herald
//!
//! Library half of the `herald` binary: API client, configuration, report
//! rendering, change logs and the Discord webhook. The matchup logic itself
//! lives in `herald-core`.

pub mod cli;
pub mod config;
pub mod error;
pub mod gw2;
pub mod history;
pub mod report;
pub mod webhook;

pub use error::{AppError, ClientError};
