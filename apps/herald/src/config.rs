//! # Configuration
//!
//! Settings come from three layers, first match wins:
//! 1. command line arguments
//! 2. environment variables (handled by clap)
//! 3. the TOML config file
//!
//! ```toml
//! world = 2104
//! webhook-url = "https://discord.com/api/webhooks/..."
//! change-only = true
//! matches-log = "/var/lib/herald/matches.csv"
//! timezones = ["Europe/Berlin", "America/New_York"]
//! relink-anchor = "2024-01-05"
//! eu-reset = { weekday = "Fri", time = "18:00:00" }
//! ```

use crate::cli::{Cli, Commands};
use crate::error::AppError;
use crate::gw2::DEFAULT_BASE_URL;
use chrono::NaiveDate;
use chrono_tz::Tz;
use herald_core::primitives::{DEFAULT_RELINK_INTERVAL_WEEKS, MAX_RELINK_INTERVAL_WEEKS};
use herald_core::{Region, RelinkSchedule, ResetSchedule, WorldId};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file looked up in the home directory.
pub const DEFAULT_CONFIG_FILE: &str = ".gw2_discord_webhooks.toml";

/// `~/.gw2_discord_webhooks.toml`, if a home directory is known.
pub fn default_config_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().join(DEFAULT_CONFIG_FILE))
}

// =============================================================================
// CONFIG FILE
// =============================================================================

/// Contents of the config file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub world: Option<u32>,
    pub webhook_url: Option<String>,
    pub webhook_thumbnail: Option<String>,
    pub change_only: Option<bool>,
    pub matches_username: Option<String>,
    pub matches_log: Option<PathBuf>,
    pub population_username: Option<String>,
    pub population_log: Option<PathBuf>,
    pub timezones: Option<Vec<String>>,
    pub ampm: Option<bool>,
    pub api_base_url: Option<String>,
    pub eu_reset: Option<ResetSchedule>,
    pub na_reset: Option<ResetSchedule>,
    /// A past or future relink date, quoted (`"2024-01-05"`).
    pub relink_anchor: Option<NaiveDate>,
    pub relink_interval_weeks: Option<u32>,
}

impl FileConfig {
    pub fn parse(text: &str) -> Result<Self, AppError> {
        Ok(toml::from_str(text)?)
    }

    /// Load `explicit`, or the default file if it exists.
    ///
    /// An explicit path that cannot be read is an error; a missing default
    /// file is not.
    pub fn load(explicit: Option<&Path>) -> Result<Self, AppError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) if path.is_file() => path,
                _ => return Ok(Self::default()),
            },
        };

        let text = std::fs::read_to_string(&path).map_err(|e| {
            AppError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        tracing::debug!(path = %path.display(), "config file loaded");
        Self::parse(&text)
    }
}

// =============================================================================
// RESOLVED SETTINGS
// =============================================================================

/// Where the report goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Output {
    pub print: bool,
    pub markdown: bool,
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    /// Neither printing nor dumping JSON: post to the webhook.
    pub fn sends_webhook(&self) -> bool {
        !self.print && !self.json
    }
}

/// Settings shared by all commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub world: WorldId,
    pub webhook_url: Option<String>,
    pub change_only: bool,
    pub api_base_url: String,
    pub eu_reset: ResetSchedule,
    pub na_reset: ResetSchedule,
    pub relink_anchor: Option<NaiveDate>,
    pub relink_interval_weeks: u32,
    pub output: Output,
}

impl Settings {
    /// Reset schedule of a region id. Unknown regions use the NA schedule.
    pub fn reset_for(&self, region: u8) -> ResetSchedule {
        match Region::from_id(region) {
            Some(Region::Europe) => self.eu_reset,
            _ => self.na_reset,
        }
    }

    /// Relink schedule of a region id, if an anchor is configured.
    pub fn relink_for(&self, region: u8) -> Option<RelinkSchedule> {
        self.relink_anchor.map(|anchor| {
            RelinkSchedule::new(self.reset_for(region), anchor, self.relink_interval_weeks)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchesSettings {
    pub username: Option<String>,
    pub thumbnail: Option<String>,
    pub log: Option<PathBuf>,
    pub timezones: Vec<Tz>,
    pub ampm: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulationSettings {
    pub username: Option<String>,
    pub log: Option<PathBuf>,
}

/// The command to run with its own settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    Matches(MatchesSettings),
    Population(PopulationSettings),
}

// =============================================================================
// MERGE & VALIDATION
// =============================================================================

fn config_error(issues: &[String]) -> AppError {
    AppError::Config(format!("Invalid config:\n - {}", issues.join("\n - ")))
}

/// Merge arguments over the file and validate the result.
///
/// All problems are collected and reported together.
pub fn resolve(cli: &Cli, file: &FileConfig) -> Result<(Settings, Job), AppError> {
    let mut issues: Vec<String> = Vec::new();

    let world = cli.world.or(file.world);
    if world.is_none() {
        issues.push("world is required (--world, GW2_HOME_WORLD_ID or `world`)".into());
    }

    let output = Output {
        print: cli.print,
        markdown: cli.markdown,
        json: cli.json,
        quiet: cli.quiet,
    };

    let webhook_url = cli.webhook_url.clone().or_else(|| file.webhook_url.clone());
    if output.sends_webhook() {
        match &webhook_url {
            None => issues.push(
                "No webhook url configured (--webhook-url, GW2_WEBHOOK_URL or `webhook-url`)"
                    .into(),
            ),
            Some(url) if !url.starts_with("https://") && !url.starts_with("http://") => {
                issues.push("webhook url must start with http:// or https://".into());
            }
            Some(_) => {}
        }
    }

    let change_only = cli.change_only || file.change_only.unwrap_or(false);

    let relink_interval_weeks = file
        .relink_interval_weeks
        .unwrap_or(DEFAULT_RELINK_INTERVAL_WEEKS);
    if relink_interval_weeks == 0 {
        issues.push("relink-interval-weeks must be > 0".into());
    } else if relink_interval_weeks > MAX_RELINK_INTERVAL_WEEKS {
        issues.push(format!(
            "relink-interval-weeks must be at most {MAX_RELINK_INTERVAL_WEEKS} \
             (got {relink_interval_weeks})"
        ));
    }

    let job = match &cli.command {
        Commands::Matches(args) => {
            let log = args.log.clone().or_else(|| file.matches_log.clone());
            if change_only && log.is_none() {
                issues.push(
                    "change-only requires a matches log (--log, GW2_MATCHES_LOG or `matches-log`)"
                        .into(),
                );
            }

            let names = if args.timezones.is_empty() {
                file.timezones.clone().unwrap_or_default()
            } else {
                args.timezones.clone()
            };
            let mut timezones = Vec::new();
            for name in names.iter().map(|name| name.trim()).filter(|name| !name.is_empty()) {
                match name.parse::<Tz>() {
                    Ok(tz) => timezones.push(tz),
                    Err(_) => issues.push(format!("unknown timezone '{name}'")),
                }
            }

            Job::Matches(MatchesSettings {
                username: args.username.clone().or_else(|| file.matches_username.clone()),
                thumbnail: args
                    .webhook_thumbnail
                    .clone()
                    .or_else(|| file.webhook_thumbnail.clone()),
                log,
                timezones,
                ampm: args.ampm || file.ampm.unwrap_or(false),
            })
        }
        Commands::Population(args) => {
            let log = args.log.clone().or_else(|| file.population_log.clone());
            if change_only && log.is_none() {
                issues.push(
                    "change-only requires a population log (--log, GW2_POPULATION_LOG or `population-log`)"
                        .into(),
                );
            }

            Job::Population(PopulationSettings {
                username: args
                    .username
                    .clone()
                    .or_else(|| file.population_username.clone()),
                log,
            })
        }
    };

    let world = match world {
        Some(world) if issues.is_empty() => WorldId(world),
        _ => return Err(config_error(&issues)),
    };

    let settings = Settings {
        world,
        webhook_url,
        change_only,
        api_base_url: file
            .api_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        eu_reset: file
            .eu_reset
            .unwrap_or_else(|| ResetSchedule::for_region(Region::Europe.id())),
        na_reset: file
            .na_reset
            .unwrap_or_else(|| ResetSchedule::for_region(Region::NorthAmerica.id())),
        relink_anchor: file.relink_anchor,
        relink_interval_weeks,
        output,
    };
    Ok((settings, job))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, Weekday};
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["herald"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).expect("valid arguments")
    }

    #[test]
    fn parses_kebab_case_file() {
        let file = FileConfig::parse(
            r#"
            world = 2104
            webhook-url = "https://example.invalid/hook"
            change-only = true
            timezones = ["Europe/Berlin"]
            relink-anchor = "2024-01-05"
            relink-interval-weeks = 4
            eu-reset = { weekday = "Fri", time = "19:00:00" }
            "#,
        )
        .expect("parse");

        assert_eq!(file.world, Some(2104));
        assert_eq!(file.change_only, Some(true));
        assert_eq!(file.relink_anchor, NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(
            file.eu_reset,
            Some(ResetSchedule::new(
                Weekday::Fri,
                NaiveTime::from_hms_opt(19, 0, 0).expect("time")
            ))
        );
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        assert!(FileConfig::parse("wrld = 1").is_err());
    }

    #[test]
    fn arguments_win_over_file() {
        let file = FileConfig {
            world: Some(1001),
            timezones: Some(vec!["Europe/London".to_string()]),
            matches_username: Some("from file".to_string()),
            ..FileConfig::default()
        };
        let (settings, job) = resolve(
            &cli(&["-w", "2104", "-p", "matches", "-t", "Europe/Berlin,America/New_York"]),
            &file,
        )
        .expect("resolve");

        assert_eq!(settings.world, WorldId(2104));
        assert_eq!(settings.api_base_url, DEFAULT_BASE_URL);
        let Job::Matches(matches) = job else {
            unreachable!("matches subcommand resolves to a matches job");
        };
        assert_eq!(matches.timezones, vec![Tz::Europe__Berlin, Tz::America__New_York]);
        assert_eq!(matches.username.as_deref(), Some("from file"));
    }

    #[test]
    fn all_issues_are_reported_together() {
        let err = resolve(&cli(&["-x", "matches", "-t", "Mars/Olympus"]), &FileConfig::default())
            .expect_err("invalid");
        let AppError::Config(message) = err else {
            unreachable!("validation failures are config errors");
        };
        assert!(message.contains("world is required"));
        assert!(message.contains("No webhook url configured"));
        assert!(message.contains("change-only requires a matches log"));
        assert!(message.contains("unknown timezone 'Mars/Olympus'"));
    }

    #[test]
    fn region_schedules() {
        let (settings, _) = resolve(&cli(&["-w", "2104", "--json", "population"]), &FileConfig {
            relink_anchor: NaiveDate::from_ymd_opt(2024, 1, 5),
            ..FileConfig::default()
        })
        .expect("resolve");

        assert_eq!(settings.reset_for(2), ResetSchedule::europe());
        assert_eq!(settings.reset_for(1), ResetSchedule::north_america());
        let relink = settings.relink_for(2).expect("anchor configured");
        assert_eq!(relink.interval_weeks, DEFAULT_RELINK_INTERVAL_WEEKS);
        assert!(relink.is_aligned());
    }

    #[test]
    fn relink_interval_is_bounded() {
        let with_interval = |weeks| FileConfig {
            relink_interval_weeks: Some(weeks),
            ..FileConfig::default()
        };
        let args = cli(&["-w", "2104", "--json", "population"]);

        let (settings, _) =
            resolve(&args, &with_interval(MAX_RELINK_INTERVAL_WEEKS)).expect("resolve");
        assert_eq!(settings.relink_interval_weeks, MAX_RELINK_INTERVAL_WEEKS);

        for weeks in [0, MAX_RELINK_INTERVAL_WEEKS + 1, u32::MAX] {
            let err = resolve(&args, &with_interval(weeks)).expect_err("out of range");
            let AppError::Config(message) = err else {
                unreachable!("validation failures are config errors");
            };
            assert!(message.contains("relink-interval-weeks"), "{message}");
        }
    }

    #[test]
    fn default_config_lives_in_the_home_directory() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with(DEFAULT_CONFIG_FILE));
            assert!(path.is_absolute());
        }
    }
}
