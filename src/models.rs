use crate::constants::*;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// One record as returned by the API: an opaque field-to-value mapping.
///
/// Record attributes are not known ahead of time and the response shape is
/// not guaranteed stable across windows, so nothing is validated or
/// transformed here. Output columns are derived later from the union of keys
/// observed across all records.
pub type Record = serde_json::Map<String, Value>;

/// A half-open time interval `[from, to)` bounding one API query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// Optional filters applied to a session query.
#[derive(Debug, Clone, Default)]
pub struct SessionFilter {
    pub status: Option<String>,
    pub session_type: Option<String>,
    pub segment_id: Option<String>,
}

impl SessionFilter {
    /// Filter used by the core export: failed sessions only.
    pub fn failed() -> Self {
        Self {
            status: Some(FAILED_STATUS.to_string()),
            ..Self::default()
        }
    }

    /// Filter used by the clients export: network-access sessions of one segment.
    pub fn for_segment(segment_id: &str) -> Self {
        Self {
            session_type: Some(NETWORK_ACCESS_SESSION_TYPE.to_string()),
            segment_id: Some(segment_id.to_string()),
            ..Self::default()
        }
    }
}

/// The `{error, data}` wrapper every query endpoint returns.
///
/// The upstream reports application-level failures inside an HTTP 200 body:
/// any truthy `error` value means the query failed, regardless of status
/// code.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Returns the upstream error rendered as text, or `None` when the
    /// `error` field is absent or falsy (null, `false`, empty string).
    pub fn error_message(&self) -> Option<String> {
        match &self.error {
            None | Some(Value::Null) | Some(Value::Bool(false)) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        }
    }
}

/// A page of records from the session or stats endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct RecordPage {
    #[serde(default)]
    pub records: Vec<Record>,
}

/// Segment listing payload. The upstream capitalizes this field.
#[derive(Debug, Default, Deserialize)]
pub struct SegmentPage {
    #[serde(default, rename = "Records")]
    pub records: Vec<Segment>,
}

/// One configured segment. Identifiers have been observed both as numbers
/// and as strings, so the raw value is kept and rendered on demand.
#[derive(Debug, Default, Deserialize)]
pub struct Segment {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub name: String,
}

impl Segment {
    /// Segment identifier as the string the session filter expects.
    pub fn id_string(&self) -> Option<String> {
        match &self.id {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Body of a successful key login.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Which export workflow to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Sessions,
    Stats,
    Clients,
}

impl ExportKind {
    /// Returns a human-readable name for the export kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Sessions => "Failed Sessions",
            Self::Stats => "Statistics",
            Self::Clients => "Segment Clients",
        }
    }
}

impl From<&str> for ExportKind {
    fn from(value: &str) -> Self {
        // Trim whitespace and compare case-insensitively
        let lower = value.trim().to_lowercase();

        if STATS_ALIASES.contains(&lower.as_str()) {
            Self::Stats
        } else if CLIENTS_ALIASES.contains(&lower.as_str()) {
            Self::Clients
        } else if SESSIONS_ALIASES.contains(&lower.as_str()) {
            Self::Sessions
        } else {
            // Default silently to Sessions; callers can decide to log if needed.
            Self::Sessions
        }
    }
}
