//! Turns a raw `/recovered` response body into an LLM-friendly report.
//!
//! The formatter is total: every input, however malformed, produces either a
//! [`Report`] or a [`FormatError`], and both display as plain text suitable
//! for handing straight to a language model.

use crate::report::types::{is_truthy, kind_of, RecoveryEvent};
use chrono::format::{parse as parse_items, Parsed, StrftimeItems};
use chrono::{DateTime, FixedOffset};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Maximum number of events rendered into one report.
/// The header still counts every event in the payload.
pub const MAX_RENDERED_EVENTS: usize = 10;

/// Output layout for parsed timestamps.
const DATE_FORMAT: &str = "%B %d, %Y at %H:%M:%S UTC";

/// Fallback when a record has no `datetime` at all.
const UNKNOWN_DATE: &str = "Unknown date";

const NO_DATA_MESSAGE: &str = "No data found in the API response.";

/// ISO-8601 date-time layouts, extended and basic. Each is tried as-is and
/// with a trailing `%:z` offset. Missing hours and minutes read as zero.
const TIMESTAMP_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H",
    "%Y-%m-%d",
    "%Y%m%dT%H%M%S%.f",
    "%Y%m%dT%H%M",
    "%Y%m%dT%H",
    "%Y%m%d",
];

/// Successful formatter outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// At least one event was present.
    Events {
        text: String,
        /// Number of events in the payload.
        total: usize,
        /// Number of events actually rendered (at most [`MAX_RENDERED_EVENTS`]).
        rendered: usize,
    },
    /// The payload was empty, null or otherwise falsy.
    Empty,
}

impl Report {
    pub fn text(&self) -> &str {
        match self {
            Report::Events { text, .. } => text,
            Report::Empty => NO_DATA_MESSAGE,
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("Error: Invalid JSON in the API response.")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Error processing the API response: {0}")]
    Processing(String),
}

/// Parse and render a `/recovered` response body.
///
/// # Flow
/// 1. Parse JSON (`InvalidJson` on failure)
/// 2. Falsy payloads (`[]`, `null`, `{}`, `""`, `0`, `false`) yield [`Report::Empty`]
/// 3. Render the first [`MAX_RENDERED_EVENTS`] records in order
/// 4. Prefix the header with the full event count
pub fn format_recoveries(raw: &str) -> Result<Report, FormatError> {
    let data: Value = serde_json::from_str(raw).map_err(FormatError::InvalidJson)?;

    if !is_truthy(&data) {
        return Ok(Report::Empty);
    }

    let events = data.as_array().ok_or_else(|| {
        FormatError::Processing(format!(
            "expected a JSON array of event records, found {}",
            kind_of(&data)
        ))
    })?;

    let mut entries = Vec::with_capacity(events.len().min(MAX_RENDERED_EVENTS));
    for (index, value) in events.iter().take(MAX_RENDERED_EVENTS).enumerate() {
        let event = RecoveryEvent::from_value(value)
            .map_err(|e| FormatError::Processing(format!("record {}: {}", index, e)))?;
        entries.push(render_event(&event));
    }

    let total = events.len();
    let rendered = entries.len();
    let text = format!("{}{}", header(total), entries.join("\n"));

    tracing::debug!(total, rendered, "Recovery report formatted");

    Ok(Report::Events {
        text,
        total,
        rendered,
    })
}

/// Flatten [`format_recoveries`] into the string handed to the agent.
pub fn format_api_response(raw: &str) -> String {
    match format_recoveries(raw) {
        Ok(report) => report.to_string(),
        Err(e) => e.to_string(),
    }
}

/// Render an ISO-8601 timestamp as `March 15, 2024 at 12:30:00 UTC`.
///
/// A trailing `Z` is read as `+00:00`. The wall-clock time is printed as
/// given; an offset is parsed but not applied. Returns `None` when no
/// supported layout matches.
pub fn format_timestamp(raw: &str) -> Option<String> {
    parse_timestamp(raw).map(|dt| dt.format(DATE_FORMAT).to_string())
}

fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let normalized = match raw.strip_suffix('Z') {
        Some(rest) => format!("{}+00:00", rest),
        None => raw.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(dt);
    }

    TIMESTAMP_LAYOUTS.iter().find_map(|layout| {
        parse_layout(&normalized, &format!("{}%:z", layout))
            .or_else(|| parse_layout(&normalized, layout))
    })
}

/// Parse `raw` against one strftime layout, defaulting a missing offset to
/// UTC and missing hour or minute to zero.
fn parse_layout(raw: &str, layout: &str) -> Option<DateTime<FixedOffset>> {
    let mut parsed = Parsed::new();
    parse_items(&mut parsed, raw, StrftimeItems::new(layout)).ok()?;

    if parsed.hour_div_12().is_none() {
        parsed.set_hour(0).ok()?;
    }
    if parsed.minute().is_none() {
        parsed.set_minute(0).ok()?;
    }
    if parsed.offset().is_none() {
        parsed.set_offset(0).ok()?;
    }

    parsed.to_datetime().ok()
}

fn header(total: usize) -> String {
    let plural = if total > 1 { "s" } else { "" };
    format!("# Data Report\nContaining {} event{}.\n\n", total, plural)
}

fn render_event(event: &RecoveryEvent) -> String {
    let date = match event.raw_datetime() {
        Some(raw) => format_timestamp(&raw).unwrap_or(raw),
        None => UNKNOWN_DATE.to_string(),
    };

    let status = if event.is_recovered() {
        "Recovered"
    } else {
        "Not Recovered"
    };

    let mut entry = format!(
        "\nEvent Details:\n\
         - Date and Time: {}\n\
         - Serial Number: {}\n\
         - Location: Latitude {}, Longitude {}, Altitude {} meters\n\
         - Recovery Status: {}\n",
        date,
        event.serial(),
        event.latitude(),
        event.longitude(),
        event.altitude(),
        status,
    );

    if let Some(who) = event.recovered_by() {
        entry.push_str(&format!("- Recovered By: {}\n", who));
    }

    if let Some(details) = event.description() {
        entry.push_str(&format!("- Additional Details: {}\n", details));
    }

    entry
}
