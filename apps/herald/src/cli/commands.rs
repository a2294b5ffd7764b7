//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::config::{MatchesSettings, Output, PopulationSettings, Settings};
use crate::error::AppError;
use crate::gw2::{Gw2Client, region_snapshot};
use crate::history::{MatchupLog, PopulationLog, lineup_changed};
use crate::report::Report;
use crate::report::matchup::{MatchupOptions, matchup_report};
use crate::report::population::population_report;
use crate::webhook::{DiscordWebhook, WebhookPayload};
use chrono::Utc;
use herald_core::{
    MatchId, MatchupPredictor, PopulationLevel, RegionPopulation, RegionSnapshot, WorldId,
};
use std::collections::BTreeMap;
use std::io::IsTerminal;

// =============================================================================
// SHARED STEPS
// =============================================================================

/// Current match of `world` and the standings of its region.
async fn fetch_region(
    client: &Gw2Client,
    world: WorldId,
) -> Result<(MatchId, RegionSnapshot), AppError> {
    let overview = client.overview(world).await?;
    tracing::info!(
        %world,
        match_id = %overview.id,
        role = ?overview.role_of(world),
        "current match"
    );

    let matches = client.matches().await?;
    let snapshot = region_snapshot(matches, overview.id.region)?;
    tracing::debug!(tiers = snapshot.len(), "region standings loaded");
    Ok((overview.id, snapshot))
}

fn notice(output: &Output, message: &str) {
    if !output.quiet {
        println!("{}", message);
    }
}

/// Print the report, or post it to the webhook.
async fn deliver(
    settings: &Settings,
    report: &Report,
    username: Option<String>,
    thumbnail: Option<String>,
) -> Result<(), AppError> {
    if settings.output.print {
        let text = report.to_text();
        if settings.output.markdown {
            println!("{}", text.to_markdown());
        } else if std::io::stdout().is_terminal() {
            println!("{}", text.to_console());
        } else {
            println!("{}", text.to_plain());
        }
        return Ok(());
    }

    let url = settings
        .webhook_url
        .as_deref()
        .ok_or_else(|| AppError::Config("No webhook url configured".to_string()))?;
    let payload = WebhookPayload::from_report(report, username, thumbnail, Utc::now());
    DiscordWebhook::new(url).execute(&payload).await?;
    Ok(())
}

// =============================================================================
// MATCHES COMMAND
// =============================================================================

/// Predict and report the home world's next matchup.
pub async fn cmd_matches(settings: &Settings, matches: &MatchesSettings) -> Result<(), AppError> {
    let client = Gw2Client::new(&settings.api_base_url);
    let (current, snapshot) = fetch_region(&client, settings.world).await?;

    let names: BTreeMap<WorldId, String> = client
        .worlds(snapshot.world_ids())
        .await?
        .into_iter()
        .map(|info| (info.id, info.name))
        .collect();

    let now = Utc::now();
    let reset = settings.reset_for(current.region).next_after(now);
    let outcome = MatchupPredictor::outcome_of(settings.world, &snapshot, current)?;
    let prediction = MatchupPredictor::predict(settings.world, &snapshot, current, reset, &names)?;
    tracing::info!(
        %current,
        ?outcome,
        next_match = %prediction.match_id(),
        role = %prediction.role,
        %reset,
        "matchup predicted"
    );

    let mut changed = false;
    if let Some(path) = &matches.log {
        let mains = prediction.mains();
        let previous = MatchupLog::new(path).record(now, reset, mains)?;
        changed = lineup_changed(previous.as_ref(), &mains);
        if previous.is_some() && !changed && settings.change_only {
            notice(&settings.output, "Matchup did not change.");
            return Ok(());
        }
    }

    if settings.output.json {
        let value = serde_json::json!({
            "prediction": prediction,
            "changed": changed,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let options = MatchupOptions {
        timezones: matches.timezones.clone(),
        ampm: matches.ampm,
        changed,
    };
    let report = matchup_report(&prediction, now, &options)?;
    deliver(
        settings,
        &report,
        matches.username.clone(),
        matches.thumbnail.clone(),
    )
    .await
}

// =============================================================================
// POPULATION COMMAND
// =============================================================================

/// Report world populations and links of the home region.
pub async fn cmd_population(
    settings: &Settings,
    population_settings: &PopulationSettings,
) -> Result<(), AppError> {
    let client = Gw2Client::new(&settings.api_base_url);
    let (current, snapshot) = fetch_region(&client, settings.world).await?;
    let worlds = client.worlds(snapshot.world_ids()).await?;

    let now = Utc::now();
    let schedule = settings.relink_for(current.region);
    let relink = schedule.and_then(|schedule| {
        if !schedule.is_aligned() {
            tracing::warn!(
                anchor = %schedule.anchor,
                weekday = ?schedule.reset.weekday,
                "relink anchor is not a reset day"
            );
        }
        let next = schedule.next_after(now);
        if next.is_none() {
            tracing::warn!(
                anchor = %schedule.anchor,
                interval_weeks = schedule.interval_weeks,
                "next relink is out of range"
            );
        }
        next
    });
    if schedule.is_none() {
        tracing::debug!("no relink anchor configured");
    }

    let population = RegionPopulation::build(settings.world, &snapshot, &worlds, relink)?;
    let by_name = population.worlds_by_name();

    let mut previous: BTreeMap<WorldId, PopulationLevel> = BTreeMap::new();
    if let Some(path) = &population_settings.log {
        let levels: Vec<(String, PopulationLevel)> = by_name
            .iter()
            .filter_map(|world| {
                Some((
                    population.name(*world)?.to_string(),
                    population.level(*world)?,
                ))
            })
            .collect();

        let record = PopulationLog::new(path).record(now, &levels)?;
        if settings.change_only {
            if record.previous.is_none() {
                notice(&settings.output, "Script run for the first time.");
                return Ok(());
            }
            if !record.changed {
                notice(&settings.output, "Population did not change.");
                return Ok(());
            }
        }

        if let Some(logged) = record.previous {
            previous = by_name
                .iter()
                .filter_map(|world| {
                    let level = logged.get(population.name(*world)?)?;
                    Some((*world, *level))
                })
                .collect();
        }
    }

    if settings.output.json {
        println!("{}", serde_json::to_string_pretty(&population)?);
        return Ok(());
    }

    let report = population_report(&population, &previous)?;
    deliver(settings, &report, population_settings.username.clone(), None).await
}
