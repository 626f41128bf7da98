//! Scanner usage report model.
//!
//! The scanner emits a JSON array of envelopes, one per account/service scan:
//!
//! ```json
//! [{
//!   "account": { "identifier": "999888777666", "name": "some account" },
//!   "description": "AWS s3 service usage scan",
//!   "partition": { "year": "2021", "month": "03" },
//!   "results": {
//!     "event_source": "s3.amazonaws.com",
//!     "service_usage": [{ "event_name": "GetObject", "count": 205 }]
//!   }
//! }]
//! ```
//!
//! Only `results` drives policy generation; the envelope metadata is kept for
//! summaries and defaults to empty values when the scanner leaves it out.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ScpError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub month: String,
}

/// One API action and how many times it was called.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageEntry {
    pub event_name: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageResults {
    pub event_source: String,
    /// A scan that saw no events reports `null` here.
    #[serde(deserialize_with = "null_as_empty")]
    pub service_usage: Vec<UsageEntry>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<UsageEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries: Option<Vec<UsageEntry>> = Option::deserialize(deserializer)?;
    Ok(entries.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageReport {
    #[serde(default)]
    pub account: AccountInfo,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub partition: Partition,
    pub results: UsageResults,
}

impl UsageReport {
    /// Dotted service identifier, e.g. `s3.amazonaws.com`.
    pub fn service_identifier(&self) -> &str {
        &self.results.event_source
    }

    pub fn entries(&self) -> &[UsageEntry] {
        &self.results.service_usage
    }

    pub fn service_name(&self) -> &str {
        service_name(self.service_identifier())
    }
}

/// How the pipeline picks a report out of a multi-report input.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportSelection {
    /// Process the first report; any later ones are ignored.
    #[default]
    First,
    /// Require exactly one report.
    Single,
}

impl FromStr for ReportSelection {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "first" => Ok(ReportSelection::First),
            "single" => Ok(ReportSelection::Single),
            _ => Err(format!("unknown report selection: {value}")),
        }
    }
}

impl fmt::Display for ReportSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            ReportSelection::First => "first",
            ReportSelection::Single => "single",
        };
        write!(f, "{value}")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportSet {
    pub reports: Vec<UsageReport>,
}

/// The report chosen for processing and how many were left out.
#[derive(Debug, Clone, Copy)]
pub struct SelectedReport<'a> {
    pub report: &'a UsageReport,
    pub ignored: usize,
}

impl ReportSet {
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn select(&self, selection: ReportSelection) -> Result<SelectedReport<'_>, ScpError> {
        let report = self.reports.first().ok_or(ScpError::EmptyReportSet)?;
        let ignored = self.reports.len() - 1;
        if selection == ReportSelection::Single && ignored > 0 {
            return Err(ScpError::UnexpectedReportCount(self.reports.len()));
        }
        Ok(SelectedReport { report, ignored })
    }
}

pub fn parse_report(bytes: &[u8]) -> Result<ReportSet, ScpError> {
    serde_json::from_slice(bytes).map_err(ScpError::Parse)
}

/// Returns the leading segment of a dotted event source (`s3.amazonaws.com` -> `s3`).
pub fn service_name(event_source: &str) -> &str {
    event_source.split('.').next().unwrap_or(event_source)
}
