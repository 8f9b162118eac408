//! Time entry input model.
//!
//! Entries arrive from an external store as loosely-typed JSON: every field may
//! be missing, dates may be malformed, and numeric fields may be null. Nothing
//! here rejects a single bad record. Accessors substitute safe defaults so one
//! broken row never aborts an analysis.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::types::{DriverId, EntryStatus};

/// Errors raised while reading a list of entries.
#[derive(Debug, Error)]
pub enum EntryError {
    /// The input was not shaped like a list of time entries.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// A JSONL line could not be decoded as a time entry.
    #[error("invalid time entry on line {line}")]
    InvalidLine {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// One driver's recorded time for one working day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    #[serde(
        default,
        alias = "driverId",
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub driver_id: Option<String>,

    /// Calendar date, `YYYY-MM-DD` or an RFC 3339 timestamp.
    #[serde(
        default,
        alias = "entryDate",
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub entry_date: Option<String>,

    #[serde(
        default,
        alias = "totalHours",
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_hours: Option<f64>,

    #[serde(
        default,
        alias = "drivingHours",
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub driving_hours: Option<f64>,

    #[serde(
        default,
        alias = "breakHours",
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub break_hours: Option<f64>,

    #[serde(
        default,
        alias = "overtimeHours",
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub overtime_hours: Option<f64>,

    #[serde(
        default,
        deserialize_with = "lenient_status",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<EntryStatus>,
}

impl TimeEntry {
    /// Creates an entry for the given date with all hours unset.
    pub fn new(entry_date: impl Into<String>) -> Self {
        Self {
            entry_date: Some(entry_date.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_driver(mut self, driver_id: impl Into<String>) -> Self {
        self.driver_id = Some(driver_id.into());
        self
    }

    #[must_use]
    pub const fn with_total_hours(mut self, hours: f64) -> Self {
        self.total_hours = Some(hours);
        self
    }

    #[must_use]
    pub const fn with_driving_hours(mut self, hours: f64) -> Self {
        self.driving_hours = Some(hours);
        self
    }

    #[must_use]
    pub const fn with_break_hours(mut self, hours: f64) -> Self {
        self.break_hours = Some(hours);
        self
    }

    #[must_use]
    pub const fn with_overtime_hours(mut self, hours: f64) -> Self {
        self.overtime_hours = Some(hours);
        self
    }

    #[must_use]
    pub const fn with_status(mut self, status: EntryStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// The driver this entry belongs to, if it carries a usable ID.
    pub fn driver(&self) -> Option<DriverId> {
        self.driver_id
            .as_deref()
            .and_then(|id| DriverId::new(id).ok())
    }

    /// The calendar date of the entry, or `None` if missing or malformed.
    pub fn date(&self) -> Option<NaiveDate> {
        self.entry_date.as_deref().and_then(parse_entry_date)
    }

    pub fn total_hours(&self) -> f64 {
        sanitize_hours(self.total_hours)
    }

    pub fn driving_hours(&self) -> f64 {
        sanitize_hours(self.driving_hours)
    }

    pub fn break_hours(&self) -> f64 {
        sanitize_hours(self.break_hours)
    }

    pub fn overtime_hours(&self) -> f64 {
        sanitize_hours(self.overtime_hours)
    }
}

/// Parses an entry date.
///
/// Accepts a plain `YYYY-MM-DD` date or an RFC 3339 timestamp, which is
/// reduced to its UTC calendar date.
pub fn parse_entry_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).date_naive())
}

/// Missing, negative, and non-finite hours all count as zero.
fn sanitize_hours(value: Option<f64>) -> f64 {
    match value {
        Some(hours) if hours.is_finite() && hours > 0.0 => hours,
        Some(hours) if hours != 0.0 => {
            tracing::debug!(hours, "treating invalid hour value as zero");
            0.0
        }
        _ => 0.0,
    }
}

/// A field value of the wrong JSON type reads as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| serde_json::from_value(value).ok()))
}

/// Unknown status strings are dropped instead of failing the whole record.
fn lenient_status<'de, D>(deserializer: D) -> Result<Option<EntryStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = lenient(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

/// Parses entries from a JSON array or from JSON Lines.
///
/// A top-level JSON value that is neither an array nor an object, or an array
/// element that is not an object, is rejected with
/// [`EntryError::InvalidArgument`]. Fields of the wrong type inside an object
/// read as absent. Empty input yields no entries.
pub fn parse_entries(input: &str) -> Result<Vec<TimeEntry>, EntryError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        return match value {
            serde_json::Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(idx, item)| entry_from_element(idx, item))
                .collect(),
            serde_json::Value::Object(_) => {
                let entry = serde_json::from_value(value)
                    .map_err(|source| EntryError::InvalidLine { line: 1, source })?;
                Ok(vec![entry])
            }
            other => Err(EntryError::InvalidArgument {
                message: format!("expected a list of time entries, got {}", json_kind(&other)),
            }),
        };
    }

    let mut entries = Vec::new();
    for (idx, line) in trimmed.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let entry = serde_json::from_str(line)
            .map_err(|source| EntryError::InvalidLine { line: idx + 1, source })?;
        entries.push(entry);
    }
    Ok(entries)
}

fn entry_from_element(idx: usize, item: serde_json::Value) -> Result<TimeEntry, EntryError> {
    if !item.is_object() {
        return Err(EntryError::InvalidArgument {
            message: format!(
                "expected a list of time entry objects, element {idx} is {}",
                json_kind(&item)
            ),
        });
    }
    serde_json::from_value(item).map_err(|e| EntryError::InvalidArgument {
        message: format!("element {idx} is not a time entry: {e}"),
    })
}

const fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
