//! # Application Errors
//!
//! The core reports domain failures with [`HeraldError`]; everything the
//! binary adds on top (HTTP, configuration, log files) is wrapped here.

use herald_core::HeraldError;
use thiserror::Error;

/// Errors from the HTTP layer (GW2 API and Discord webhooks).
#[derive(Debug, Error)]
pub enum ClientError {
    /// The remote host could not be reached.
    #[error("Cannot connect to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    /// The remote host answered with a non-success status.
    #[error("Request to {url} failed ({status}): {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    /// The response body is not the expected JSON.
    #[error("Parse error for {url}: {reason}")]
    Parse { url: String, reason: String },
}

/// Top-level error of the `herald` binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] HeraldError),

    #[error(transparent)]
    Client(#[from] ClientError),

    /// Missing or invalid settings; may list several issues.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A history log row that cannot be understood.
    #[error("Malformed log {path}: {reason}")]
    History { path: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config file error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
