//! Matchup prediction report.

use super::{FormattedText, Report};
use chrono::{DateTime, TimeDelta, Utc};
use chrono_tz::Tz;
use herald_core::{HeraldError, Prediction, Role, Seat, WorldId};

// =============================================================================
// CONSTANTS
// =============================================================================

pub const GREEN_COLOR: u32 = 0x28B463;
pub const BLUE_COLOR: u32 = 0x039BE5;
pub const RED_COLOR: u32 = 0xD32F2F;

pub const CHANGED_NOTICE: &str = "The opponents have changed since last prediction!";

/// Embed color of a role.
pub const fn role_color(role: Role) -> u32 {
    match role {
        Role::Green => GREEN_COLOR,
        Role::Blue => BLUE_COLOR,
        Role::Red => RED_COLOR,
    }
}

/// Square emoji shortcode of a role.
pub const fn role_emoji(role: Role) -> &'static str {
    match role {
        Role::Green => ":green_square:",
        Role::Blue => ":blue_square:",
        Role::Red => ":red_square:",
    }
}

/// Rendering switches for a matchup report.
#[derive(Debug, Clone, Default)]
pub struct MatchupOptions {
    /// Extra local times shown for the reset, in order.
    pub timezones: Vec<Tz>,
    /// 12h clock instead of 24h.
    pub ampm: bool,
    /// Append the changed-opponents notice.
    pub changed: bool,
}

// =============================================================================
// FRAGMENTS
// =============================================================================

/// `"<YYYY-MM-DD> Reset Matchup Prediction:"`
pub fn format_title(reset: DateTime<Utc>) -> String {
    reset.format("%Y-%m-%d Reset Matchup Prediction:").to_string()
}

/// Remaining time, rounded up to whole minutes, e.g. `**2**d **3**h **4**m`.
///
/// Days appear only beyond 24h59m (a single day and no hours reads `24h`),
/// hours only beyond 59m. Negative durations render as zero.
pub fn format_duration(remaining: TimeDelta) -> FormattedText {
    let mut seconds = remaining.num_seconds();
    if remaining.subsec_nanos() > 0 {
        seconds += 1;
    }
    let minutes = (seconds.max(0) + 59) / 60;

    let days = minutes / (24 * 60);
    let mut hours = minutes % (24 * 60) / 60;

    let mut ft = FormattedText::new();
    if days == 1 && hours == 0 {
        hours = 24;
    } else if days > 0 {
        ft.bold(days.to_string()).plain("d ");
    }
    if days > 0 || hours > 0 {
        ft.bold(hours.to_string()).plain("h ");
    }
    ft.bold((minutes % 60).to_string()).plain("m");
    ft
}

/// `at **18:00** CET / **12:00** EST\nor `
fn format_reset_times(reset: DateTime<Utc>, options: &MatchupOptions) -> FormattedText {
    let mut ft = FormattedText::new();
    if options.timezones.is_empty() {
        return ft;
    }

    let clock = if options.ampm { "%I:%M%p" } else { "%H:%M" };
    ft.plain("at ");
    for (i, tz) in options.timezones.iter().enumerate() {
        if i > 0 {
            ft.plain(" / ");
        }
        let local = reset.with_timezone(tz);
        ft.bold(local.format(clock).to_string().to_lowercase())
            .plain(local.format(" %Z").to_string());
    }
    ft.plain("\nor ");
    ft
}

fn name_of(prediction: &Prediction, world: WorldId) -> Result<&str, HeraldError> {
    prediction
        .name(world)
        .ok_or(HeraldError::NameNotFound(world))
}

/// `Main (+ Linked1, Linked2)`, the target world underlined.
fn format_seat(prediction: &Prediction, seat: &Seat) -> Result<FormattedText, HeraldError> {
    let target = prediction.world;
    let mut ft = FormattedText::new();
    ft.underline_if(seat.main == target, name_of(prediction, seat.main)?);

    for (i, linked) in seat.linked.iter().enumerate() {
        ft.plain(if i == 0 { " (+ " } else { ", " });
        ft.underline_if(*linked == target, name_of(prediction, *linked)?);
    }
    if !seat.linked.is_empty() {
        ft.plain(")");
    }
    Ok(ft)
}

// =============================================================================
// REPORT
// =============================================================================

/// Body text of a prediction: reset times, tier and one line per role.
pub fn format_prediction(
    prediction: &Prediction,
    now: DateTime<Utc>,
    options: &MatchupOptions,
) -> Result<FormattedText, HeraldError> {
    let mut ft = format_reset_times(prediction.reset, options);
    ft.append(format_duration(prediction.reset - now));
    ft.plain(" from this post.\n\n");
    ft.bold(format!("Tier {}", prediction.tier));

    for (role, seat) in prediction.lineup.iter() {
        ft.plain(format!("\n{} ", role_emoji(role)));
        ft.append(format_seat(prediction, seat)?);
    }

    if options.changed {
        ft.plain("\n\n").italic(CHANGED_NOTICE);
    }
    Ok(ft)
}

/// Full matchup report, colored by the target's next role.
pub fn matchup_report(
    prediction: &Prediction,
    now: DateTime<Utc>,
    options: &MatchupOptions,
) -> Result<Report, HeraldError> {
    Ok(Report {
        title: format_title(prediction.reset),
        description: format_prediction(prediction, now, options)?,
        fields: Vec::new(),
        color: Some(role_color(prediction.role)),
    })
}
