// src/date_utils.rs
//
// Standardizes job posting dates across all vendor scrapers. Careers sites
// report posting dates in wildly different shapes: relative phrases
// ("Posted Today", "3 days ago"), ISO timestamps, RFC 2822 strings, epoch
// integers, or plain human dates. Everything funnels into one canonical UTC
// form so downstream consumers can sort and compare records.

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

/// Canonical UTC timestamp layout: `YYYY-MM-DDTHH:MM:SSZ`.
pub const CANONICAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

static TODAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\btoday\b").expect("invalid today pattern"));
static YESTERDAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\byesterday\b").expect("invalid yesterday pattern"));
static UNITS_AGO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d+)\s+(day|hour|week|month)s?\s+ago\b")
        .expect("invalid units-ago pattern")
});
static POSTED_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^posted\s+").expect("invalid posted-prefix pattern"));

/// Timezone-naive datetime formats, tried in order. Naive values are read as
/// UTC, not local time: most careers APIs emit UTC without saying so, and a
/// stable (if occasionally wrong) assumption beats one that varies with the
/// scraping host's timezone.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

/// Date-only formats, tried in order; resolved to midnight UTC.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
];

/// Convert a raw posting-date expression to the canonical UTC form.
///
/// `now` is the anchor for relative phrases and must be passed in by the
/// caller; wall-clock reads inside this function would make the relative
/// branches untestable.
///
/// Returns an empty string when the input cannot be understood. Nothing here
/// errors out past this boundary: a date we cannot read costs one field, not
/// the record.
pub fn normalize_date_to_utc(raw: &str, now: DateTime<Utc>) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }

    match resolve(raw, now) {
        Ok(instant) => format_canonical(instant),
        Err(err) => {
            warn!("failed to parse date '{raw}': {err:#}");
            String::new()
        }
    }
}

/// Current wall-clock instant in canonical form.
pub fn current_utc_timestamp() -> String {
    format_canonical(Utc::now())
}

/// Format an instant as `YYYY-MM-DDTHH:MM:SSZ`.
pub fn format_canonical(instant: DateTime<Utc>) -> String {
    instant.format(CANONICAL_FORMAT).to_string()
}

/// Relative phrases first, then free-form parsing. The "Posted" lead-in is
/// optional everywhere: Workday tiles say "Posted 3 Days Ago", Lever feeds
/// just "3 days ago".
fn resolve(raw: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    if TODAY.is_match(raw) {
        return Ok(midnight_of(now));
    }
    if YESTERDAY.is_match(raw) {
        return days_back(now, 1).ok_or_else(|| anyhow!("date offset out of range"));
    }
    if let Some(instant) = resolve_units_ago(raw, now) {
        return Ok(instant);
    }

    let cleaned = POSTED_PREFIX.replace(raw, "");
    parse_freeform(cleaned.trim())
}

/// "N days/hours/weeks/months ago". `None` when the phrase does not match,
/// or when the count is too large to represent as a time offset; either way
/// the caller falls through to free-form parsing.
///
/// Months are a flat 30 days, on purpose. Sites that say "2 months ago" have
/// already thrown away the real posting date; calendar-accurate month math
/// would only add false precision, and changing it now would shift every
/// already-normalized record.
fn resolve_units_ago(raw: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let caps = UNITS_AGO.captures(raw)?;
    let count: i64 = caps[1].parse().ok()?;

    match caps[2].to_ascii_lowercase().as_str() {
        // Hours keep the time of day; everything coarser snaps to midnight.
        "hour" => now.checked_sub_signed(Duration::try_hours(count)?),
        "day" => days_back(now, count),
        "week" => days_back(now, count.checked_mul(7)?),
        "month" => days_back(now, count.checked_mul(30)?),
        _ => None,
    }
}

/// Midnight UTC of the date `days` before `now`'s date.
fn days_back(now: DateTime<Utc>, days: i64) -> Option<DateTime<Utc>> {
    let shifted = now.checked_sub_signed(Duration::try_days(days)?)?;
    Some(midnight_of(shifted))
}

fn midnight_of(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Absolute date/time parsing: RFC 3339, RFC 2822, epoch integers, then the
/// fixed naive-format lists. First hit wins.
fn parse_freeform(cleaned: &str) -> Result<DateTime<Utc>> {
    if cleaned.is_empty() {
        bail!("nothing left after removing the posted prefix");
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(cleaned) {
        return Ok(instant.with_timezone(&Utc));
    }
    if let Ok(instant) = DateTime::parse_from_rfc2822(cleaned) {
        return Ok(instant.with_timezone(&Utc));
    }

    // Bare integers are epoch seconds, or milliseconds when the value is too
    // large to be a plausible seconds count (past the year 2286).
    if let Ok(epoch) = cleaned.parse::<i64>() {
        let parsed = if epoch > 10_000_000_000 {
            Utc.timestamp_millis_opt(epoch).single()
        } else {
            Utc.timestamp_opt(epoch, 0).single()
        };
        return parsed.with_context(|| format!("epoch value out of range: {epoch}"));
    }

    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(cleaned, format) {
            return Ok(naive.and_utc());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(cleaned, format) {
            return Ok(date.and_time(NaiveTime::MIN).and_utc());
        }
    }

    bail!("unrecognized date format")
}
