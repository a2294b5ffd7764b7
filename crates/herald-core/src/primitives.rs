//! # Ladder Primitives
//!
//! Fixed constants of the World-vs-World ladder.
//!
//! These are compiled into the binary and never change at runtime. The reset
//! defaults only seed [`crate::schedule::ResetSchedule`]; everything that may
//! vary per deployment is carried by that value instead of being read from
//! here.

use chrono::Weekday;

/// The top tier of every region. Winning here keeps a world in place.
pub const TOP_TIER: u8 = 1;

/// Weekday of the European reset.
pub const EU_RESET_WEEKDAY: Weekday = Weekday::Fri;

/// Hour of the European reset, UTC.
pub const EU_RESET_HOUR_UTC: u32 = 18;

/// Weekday of the North American reset.
///
/// The NA reset is Friday evening in US time zones, which is already
/// Saturday in UTC.
pub const NA_RESET_WEEKDAY: Weekday = Weekday::Sat;

/// Hour of the North American reset, UTC.
pub const NA_RESET_HOUR_UTC: u32 = 2;

/// Weeks between two world relinks.
pub const DEFAULT_RELINK_INTERVAL_WEEKS: u32 = 8;

/// Longest accepted relink interval (ten years).
pub const MAX_RELINK_INTERVAL_WEEKS: u32 = 520;
