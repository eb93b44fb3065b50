//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request validation collects every failing field before rejecting, so a
//! client sees the full list in one response rather than one field at a
//! time. Collector methods return placeholder values on failure; the
//! placeholders are discarded once [`FieldErrors::finish`] reports the
//! collected failures.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::json;

use crate::domain::Error;

/// One failed field, serialized into the error `details`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub(crate) struct FieldError {
    pub field: &'static str,
    #[serde(rename = "msg")]
    pub message: &'static str,
}

/// Collector for per-field validation failures.
#[derive(Debug, Default)]
pub(crate) struct FieldErrors {
    errors: Vec<FieldError>,
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }
    // Bare calendar dates are accepted as midnight UTC.
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

impl FieldErrors {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, field: &'static str, message: &'static str) {
        self.errors.push(FieldError { field, message });
    }

    /// Require a non-blank string field.
    pub(crate) fn require_text(
        &mut self,
        field: &'static str,
        message: &'static str,
        value: Option<String>,
    ) -> String {
        match value {
            Some(text) if !text.trim().is_empty() => text,
            _ => {
                self.record(field, message);
                String::new()
            }
        }
    }

    /// Require a date field, accepting RFC 3339 or `YYYY-MM-DD`.
    pub(crate) fn require_date(
        &mut self,
        field: &'static str,
        message: &'static str,
        value: Option<String>,
    ) -> DateTime<Utc> {
        let Some(raw) = value.filter(|raw| !raw.trim().is_empty()) else {
            self.record(field, message);
            return DateTime::UNIX_EPOCH;
        };
        match parse_date(&raw) {
            Some(date) => date,
            None => {
                self.record(field, "must be a valid date");
                DateTime::UNIX_EPOCH
            }
        }
    }

    /// Parse an optional date field, recording a failure on bad input.
    pub(crate) fn optional_date(
        &mut self,
        field: &'static str,
        value: Option<String>,
    ) -> Option<DateTime<Utc>> {
        let raw = value.filter(|raw| !raw.trim().is_empty())?;
        match parse_date(&raw) {
            Some(date) => Some(date),
            None => {
                self.record(field, "must be a valid date");
                None
            }
        }
    }

    /// Reject the request if any field failed.
    pub(crate) fn finish(self) -> Result<(), Error> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(Error::invalid_request("Validation failed")
                .with_details(json!({ "errors": self.errors })))
        }
    }
}
