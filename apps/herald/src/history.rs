//! # History Logs
//!
//! Semicolon-separated CSV logs that let a run tell whether anything changed
//! since the previous one.
//!
//! Matchup log, one row per run, no header:
//!
//! ```text
//! logged_at;reset;green;blue;red
//! ```
//!
//! Population log, a header naming the worlds, then one row per change:
//!
//! ```text
//! Timestamp;<world name>;<world name>;...
//! <timestamp>;<level>;<level>;...
//! ```

use crate::error::AppError;
use chrono::{DateTime, Utc};
use herald_core::{PopulationLevel, RoleMap, WorldId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// Timestamp format of both logs.
pub const LOG_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

const DELIMITER: u8 = b';';
const POPULATION_HEADER: &str = "Timestamp";

fn format_time(instant: DateTime<Utc>) -> String {
    instant.format(LOG_TIME_FORMAT).to_string()
}

fn reader(path: &Path) -> Result<csv::Reader<std::fs::File>, AppError> {
    Ok(csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .flexible(true)
        .from_path(path)?)
}

fn appender(path: &Path) -> Result<csv::Writer<std::fs::File>, AppError> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .from_writer(file))
}

// =============================================================================
// MATCHUP LOG
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct MatchupRow {
    logged_at: String,
    reset: String,
    green: u32,
    blue: u32,
    red: u32,
}

/// Log of predicted lineups (main worlds only).
#[derive(Debug, Clone)]
pub struct MatchupLog {
    path: PathBuf,
}

impl MatchupLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Last lineup logged for `reset`, if any.
    pub fn last_for_reset(
        &self,
        reset: DateTime<Utc>,
    ) -> Result<Option<RoleMap<WorldId>>, AppError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let reset = format_time(reset);
        let mut last = None;
        for row in reader(&self.path)?.deserialize::<MatchupRow>() {
            let row = row?;
            if row.reset == reset {
                last = Some(RoleMap::new(
                    WorldId(row.green),
                    WorldId(row.blue),
                    WorldId(row.red),
                ));
            }
        }
        Ok(last)
    }

    /// Append `lineup` and return the lineup previously logged for the same
    /// reset.
    pub fn record(
        &self,
        logged_at: DateTime<Utc>,
        reset: DateTime<Utc>,
        lineup: RoleMap<WorldId>,
    ) -> Result<Option<RoleMap<WorldId>>, AppError> {
        let previous = self.last_for_reset(reset)?;

        let mut writer = appender(&self.path)?;
        writer.serialize(MatchupRow {
            logged_at: format_time(logged_at),
            reset: format_time(reset),
            green: lineup.green.0,
            blue: lineup.blue.0,
            red: lineup.red.0,
        })?;
        writer.flush()?;

        tracing::debug!(path = %self.path.display(), "matchup logged");
        Ok(previous)
    }
}

/// Whether a lineup differs from the previously logged one in any role.
pub fn lineup_changed(
    previous: Option<&RoleMap<WorldId>>,
    current: &RoleMap<WorldId>,
) -> bool {
    previous.is_some_and(|previous| previous != current)
}

// =============================================================================
// POPULATION LOG
// =============================================================================

/// Outcome of [`PopulationLog::record`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulationRecord {
    /// Levels of the last logged row, by world name. `None` on the first run.
    pub previous: Option<BTreeMap<String, PopulationLevel>>,
    /// Whether a new row was written.
    pub changed: bool,
}

/// Log of population levels by world name.
#[derive(Debug, Clone)]
pub struct PopulationLog {
    path: PathBuf,
}

impl PopulationLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn malformed(&self, reason: impl Into<String>) -> AppError {
        AppError::History {
            path: self.path.display().to_string(),
            reason: reason.into(),
        }
    }

    /// Latest header and the last row written under it.
    fn read_last(&self) -> Result<(Option<Vec<String>>, Option<Vec<String>>), AppError> {
        if !self.path.exists() {
            return Ok((None, None));
        }

        let mut header = None;
        let mut last = None;
        for record in reader(&self.path)?.records() {
            let record = record?;
            let mut fields = record.iter().map(str::to_string);
            let first = fields.next().unwrap_or_default();
            if first == POPULATION_HEADER {
                header = Some(fields.collect());
                last = None;
            } else {
                last = Some(fields.collect());
            }
        }
        Ok((header, last))
    }

    /// Pair the latest header with the last row under it.
    fn levels(
        &self,
        header: Option<&[String]>,
        last: Option<Vec<String>>,
    ) -> Result<Option<BTreeMap<String, PopulationLevel>>, AppError> {
        let (Some(header), Some(last)) = (header, last) else {
            return Ok(None);
        };
        if header.len() != last.len() {
            return Err(self.malformed(format!(
                "{} names in header, {} levels in last row",
                header.len(),
                last.len()
            )));
        }

        header
            .iter()
            .cloned()
            .zip(last)
            .map(|(name, level)| Ok((name, level.parse::<PopulationLevel>()?)))
            .collect::<Result<BTreeMap<_, _>, AppError>>()
            .map(Some)
    }

    /// Compare `current` (sorted by name) with the last row and append a row
    /// when anything changed. A new header is written first when the set of
    /// worlds differs from the logged one.
    pub fn record(
        &self,
        logged_at: DateTime<Utc>,
        current: &[(String, PopulationLevel)],
    ) -> Result<PopulationRecord, AppError> {
        let (header, last) = self.read_last()?;
        let previous = self.levels(header.as_deref(), last)?;

        let current_map: BTreeMap<String, PopulationLevel> = current.iter().cloned().collect();
        let changed = previous.as_ref() != Some(&current_map);
        if !changed {
            return Ok(PopulationRecord { previous, changed });
        }

        let names: Vec<&str> = current.iter().map(|(name, _)| name.as_str()).collect();
        let mut writer = appender(&self.path)?;
        let same_header = header
            .is_some_and(|header| header.iter().map(String::as_str).eq(names.iter().copied()));
        if !same_header {
            writer.write_record(std::iter::once(POPULATION_HEADER).chain(names.iter().copied()))?;
        }
        let timestamp = format_time(logged_at);
        let levels = current.iter().map(|(_, level)| level.as_str());
        writer.write_record(std::iter::once(timestamp.as_str()).chain(levels))?;
        writer.flush()?;

        tracing::debug!(path = %self.path.display(), "population logged");
        Ok(PopulationRecord { previous, changed })
    }
}
