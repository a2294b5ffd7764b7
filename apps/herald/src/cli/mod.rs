//! # Herald CLI Module
//!
//! This module implements the CLI interface for Herald.
//!
//! ## Available Commands
//!
//! - `matches` - Predict the home world's matchup after the next reset
//! - `population` - Report world populations and links of the home region
//!
//! Every option falls back to an environment variable and then to the config
//! file (`~/.gw2_discord_webhooks.toml` unless `--config` says otherwise).

mod commands;

use crate::config::{FileConfig, Job, resolve};
use crate::error::AppError;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Herald - Guild Wars 2 WvW matchup predictions and population reports
///
/// Posts to a Discord webhook, or prints to the console with --print.
#[derive(Parser, Debug)]
#[command(name = "herald")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, global = true, env = "GW2_CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Home world id
    #[arg(short, long, global = true, env = "GW2_HOME_WORLD_ID")]
    pub world: Option<u32>,

    /// Discord webhook url
    #[arg(short = 'u', long, global = true, env = "GW2_WEBHOOK_URL")]
    pub webhook_url: Option<String>,

    /// Only execute the webhook on a change (requires a log)
    #[arg(short = 'x', long, global = true, env = "GW2_CHANGE_ONLY")]
    pub change_only: bool,

    /// Print to console, do not send
    #[arg(short, long, global = true)]
    pub print: bool,

    /// When printing to console, output as markdown
    #[arg(short, long, global = true)]
    pub markdown: bool,

    /// Print the raw result as JSON, do not send
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress notices such as "did not change"
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Predict the next matchup of the home world
    Matches(MatchesArgs),

    /// Report population and links of the home region
    Population(PopulationArgs),
}

#[derive(Args, Debug)]
pub struct MatchesArgs {
    /// Webhook thumbnail url
    #[arg(short = 'b', long, env = "GW2_WEBHOOK_THUMBNAIL")]
    pub webhook_thumbnail: Option<String>,

    /// Webhook username for this command
    #[arg(short = 'n', long, env = "GW2_MATCHES_USERNAME")]
    pub username: Option<String>,

    /// Log predictions to this file
    #[arg(short, long, env = "GW2_MATCHES_LOG")]
    pub log: Option<PathBuf>,

    /// Comma separated list of timezones to render
    #[arg(short, long, env = "GW2_TIMEZONES", value_delimiter = ',')]
    pub timezones: Vec<String>,

    /// Use 12h clock instead of 24h clock
    #[arg(short, long, env = "GW2_AMPM")]
    pub ampm: bool,
}

#[derive(Args, Debug)]
pub struct PopulationArgs {
    /// Webhook username for this command
    #[arg(short = 'n', long, env = "GW2_POPULATION_USERNAME")]
    pub username: Option<String>,

    /// Log populations to this file
    #[arg(short, long, env = "GW2_POPULATION_LOG")]
    pub log: Option<PathBuf>,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), AppError> {
    let file = FileConfig::load(cli.config.as_deref())?;
    let (settings, job) = resolve(&cli, &file)?;

    match job {
        Job::Matches(matches) => cmd_matches(&settings, &matches).await,
        Job::Population(population) => cmd_population(&settings, &population).await,
    }
}
