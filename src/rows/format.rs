//! Field formatters used by row projections.
//!
//! Every formatter is total: input it cannot interpret is passed through
//! unchanged rather than dropped.

use chrono::{DateTime, FixedOffset};

/// Display format for dates in the console.
pub const DATE_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Length of abbreviated commit ids.
pub const SHORT_HASH_LEN: usize = 10;

/// Federal states: (code, name).
const LAENDER: &[(&str, &str)] = &[
    ("BWB", "Baden-Württemberg"),
    ("BYN", "Bayern"),
    ("BLN", "Berlin"),
    ("BRA", "Brandenburg"),
    ("BRE", "Bremen"),
    ("HAM", "Hamburg"),
    ("HES", "Hessen"),
    ("MPV", "Mecklenburg-Vorpommern"),
    ("NSA", "Niedersachsen"),
    ("NRW", "Nordrhein-Westfalen"),
    ("RLP", "Rheinland-Pfalz"),
    ("SRL", "Saarland"),
    ("SAC", "Sachsen"),
    ("SAA", "Sachsen-Anhalt"),
    ("SLH", "Schleswig-Holstein"),
    ("THU", "Thüringen"),
];

/// Full name of a federal state code; unknown codes and names pass through.
#[must_use]
pub fn land_name(code: &str) -> &str {
    LAENDER
        .iter()
        .find(|(c, _)| *c == code.trim())
        .map_or(code, |(_, name)| name)
}

/// Code of a federal state given by name or code.
#[must_use]
pub fn land_code(name_or_code: &str) -> Option<&'static str> {
    let needle = name_or_code.trim();
    LAENDER
        .iter()
        .find(|(code, name)| *code == needle || *name == needle)
        .map(|(code, _)| *code)
}

/// Strip quote characters from a stored enum-like value (`"\"Lesen\""` → `Lesen`).
#[must_use]
pub fn unquote(value: &str) -> String {
    value.trim().trim_matches(|c| c == '"' || c == '\'').to_string()
}

/// Abbreviate a commit id.
#[must_use]
pub fn short_hash(value: &str) -> String {
    value.chars().take(SHORT_HASH_LEN).collect()
}

/// Format a commit time given as epoch seconds, offset minutes and sign.
///
/// The offset is interpreted as signed minutes east of UTC; a `-` sign
/// forces a negative offset even when the minutes were delivered unsigned.
#[must_use]
pub fn commit_date(seconds: &str, offset_minutes: &str, sign: &str) -> String {
    let Ok(secs) = seconds.trim().parse::<i64>() else {
        return seconds.to_string();
    };
    let mut minutes = offset_minutes.trim().parse::<i32>().unwrap_or(0);
    if sign.trim() == "-" && minutes > 0 {
        minutes = -minutes;
    }

    let offset = FixedOffset::east_opt(minutes * 60)
        .or_else(|| FixedOffset::east_opt(0));
    match (DateTime::from_timestamp(secs, 0), offset) {
        (Some(utc), Some(offset)) => utc.with_timezone(&offset).format(DATE_FORMAT).to_string(),
        _ => seconds.to_string(),
    }
}

/// Format an RFC 3339 timestamp; anything else is returned as-is.
#[must_use]
pub fn timestamp(value: &str) -> String {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|_| value.to_string())
}

/// Derive the state of an access request from its granted/rejected columns.
#[must_use]
pub fn access_status(granted_by: &str, rejected_by: &str) -> String {
    let granted_by = granted_by.trim();
    let rejected_by = rejected_by.trim();
    if !granted_by.is_empty() {
        format!("gewährt ({granted_by})")
    } else if !rejected_by.is_empty() {
        format!("abgelehnt ({rejected_by})")
    } else {
        "offen".to_string()
    }
}
