//! # Herald - WvW Matchup Herald
//!
//! The main binary for Herald.
//!
//! This application provides:
//! - Matchup predictions for the next weekly reset
//! - World population and link reports
//! - Delivery to a Discord webhook, or to the console
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      apps/herald (THE BINARY)                   │
//! │                                                                 │
//! │  ┌─────────────┐    ┌─────────────┐    ┌──────────────────┐   │
//! │  │   CLI       │    │  GW2 API    │    │ Reports/Webhook  │   │
//! │  │  (clap)     │    │  (reqwest)  │    │  (csv logs)      │   │
//! │  └──────┬──────┘    └──────┬──────┘    └────────┬─────────┘   │
//! │         │                  │                    │              │
//! │         └──────────────────┼────────────────────┘              │
//! │                            ▼                                   │
//! │                    ┌───────────────┐                           │
//! │                    │  herald-core  │                           │
//! │                    │ (THE LOGIC)   │                           │
//! │                    └───────────────┘                           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Post the matchup prediction of Riverside (2202)
//! herald -w 2202 -u https://discord.com/api/webhooks/... matches -t Europe/Berlin
//!
//! # Print the population report as markdown
//! herald -w 2202 -p -m population
//! ```

use clap::Parser;
use herald::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // HERALD_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("HERALD_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "herald=info".into());

    // Logs go to stderr; stdout carries printed reports.
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}
