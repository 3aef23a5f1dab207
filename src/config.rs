use crate::constants::*;
use crate::errors::{AppError, AppResult};
use crate::models::ExportKind;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Credential set read from the environment: key identifier, key value,
/// organization identifier and the API base URL.
///
/// All four are required and must be non-empty; a missing value is a
/// configuration error raised before any network call is made.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub key_id: String,
    pub key_value: String,
    pub org_id: String,
    pub base_url: Url,
}

impl Credentials {
    /// Loads credentials from `NSE_KEY_ID`, `NSE_KEY_VALUE`, `NSE_ORG_ID`
    /// and `NSE_BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any variable is unset, empty, or if the base
    /// URL does not parse.
    pub fn from_env() -> AppResult<Self> {
        let key_id = required_env(ENV_KEY_ID)?;
        let key_value = required_env(ENV_KEY_VALUE)?;
        let org_id = required_env(ENV_ORG_ID)?;
        let raw_url = required_env(ENV_BASE_URL)?;

        let base_url = Url::parse(raw_url.trim_end_matches('/')).map_err(|e| {
            AppError::ConfigError(format!("{ENV_BASE_URL} is not a valid URL ({raw_url}): {e}"))
        })?;

        Ok(Self {
            key_id,
            key_value,
            org_id,
            base_url,
        })
    }
}

fn required_env(name: &str) -> AppResult<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(AppError::ConfigError(format!(
            "Missing required environment variable {name}"
        ))),
    }
}

/// Resolved export configuration with all tunables filled in (no Options
/// except where absence is meaningful).
///
/// This struct holds the run defaults and can be deserialized by the TOML
/// loader. It is built once at startup and passed down; there is no ambient
/// global configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Fixed window size in minutes for the time-sliced fetch.
    pub window_minutes: i64,
    /// How far back to look, in hours. When unset, each workflow applies its
    /// own default (6 for sessions, 24 for stats and clients).
    pub hours_back: Option<i64>,
    /// Explicit start of the historical range (RFC 3339). Takes precedence
    /// over `hours_back`.
    pub start: Option<DateTime<Utc>>,
    /// Records requested per page. The upstream caps pages at 1000.
    pub page_limit: usize,
    /// Flat delay in milliseconds between successive API calls.
    pub request_delay_ms: u64,
    /// Flat delay in milliseconds between client enrichment lookups.
    pub enrich_delay_ms: u64,
    /// Whether the clients export enriches each device from the identity
    /// endpoint.
    pub enrich: bool,
    /// Directory the CSV files are written to.
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            window_minutes: DEFAULT_WINDOW_MINUTES,
            hours_back: None,
            start: None,
            page_limit: DEFAULT_PAGE_LIMIT,
            request_delay_ms: DEFAULT_REQUEST_DELAY_MS,
            enrich_delay_ms: DEFAULT_ENRICH_DELAY_MS,
            enrich: true,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl ExportConfig {
    /// Start of the historical range: the explicit `start` when given,
    /// otherwise `now` minus the configured or workflow-default look-back.
    pub fn resolve_start(&self, now: DateTime<Utc>, default_hours_back: i64) -> DateTime<Utc> {
        match self.start {
            Some(start) => start,
            None => now - Duration::hours(self.hours_back.unwrap_or(default_hours_back)),
        }
    }

    /// Validates the tunables.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the window size, page limit, or look-back
    /// is not positive.
    pub fn validate(&self) -> AppResult<()> {
        if self.window_minutes <= 0 {
            return Err(AppError::InvalidInput(format!(
                "Window size must be positive, got {} minutes",
                self.window_minutes
            )));
        }
        if self.page_limit == 0 {
            return Err(AppError::InvalidInput(
                "Page limit must be greater than 0".into(),
            ));
        }
        if let Some(hours) = self.hours_back {
            if hours <= 0 {
                return Err(AppError::InvalidInput(format!(
                    "Look-back must be positive, got {hours} hours"
                )));
            }
        }
        Ok(())
    }
}

/// Export run description loadable from a TOML file.
///
/// Deserializes the export kind, an optional segment name, and the flattened
/// tunables. Unknown keys are rejected to catch typos.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportConfigFile {
    /// Export kind: `"sessions"` (`sess`, `s`), `"stats"` (`st`), or
    /// `"clients"` (`cl`, `c`)
    #[serde(rename = "export")]
    pub export_kind: String,
    /// Segment name, required by the clients export
    pub segment: Option<String>,
    /// Flattened tunables with run defaults
    #[serde(flatten)]
    pub config: ExportConfig,
}

impl ExportConfigFile {
    /// Loads and validates an export description from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the TOML is malformed, unknown keys are
    /// present, the tunables fail validation, or the clients export is
    /// requested without a segment name.
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path)?;
        let file: ExportConfigFile = toml::from_str(&contents)
            .map_err(|e| AppError::InvalidInput(format!("Failed to parse config: {e}")))?;

        file.config.validate()?;
        if file.kind() == ExportKind::Clients && file.segment.is_none() {
            return Err(AppError::InvalidInput(
                "The clients export requires a segment name".into(),
            ));
        }

        Ok(file)
    }

    pub fn kind(&self) -> ExportKind {
        ExportKind::from(self.export_kind.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn default_config_values() {
        let config = ExportConfig::default();
        assert_eq!(config.window_minutes, 30);
        assert_eq!(config.page_limit, 1000);
        assert_eq!(config.request_delay_ms, 200);
        assert_eq!(config.enrich_delay_ms, 50);
        assert!(config.enrich);
        assert!(config.hours_back.is_none());
        assert!(config.start.is_none());
        assert_eq!(config.output_dir, PathBuf::from("data/exports"));
    }

    #[test]
    fn resolve_start_prefers_explicit_start() {
        let now = Utc.with_ymd_and_hms(2025, 10, 31, 13, 0, 0).unwrap();
        let start = Utc.with_ymd_and_hms(2025, 10, 30, 0, 0, 0).unwrap();
        let config = ExportConfig {
            start: Some(start),
            hours_back: Some(2),
            ..ExportConfig::default()
        };
        assert_eq!(config.resolve_start(now, 6), start);
    }

    #[test]
    fn resolve_start_uses_hours_back_over_workflow_default() {
        let now = Utc.with_ymd_and_hms(2025, 10, 31, 13, 0, 0).unwrap();
        let config = ExportConfig {
            hours_back: Some(2),
            ..ExportConfig::default()
        };
        let expected = Utc.with_ymd_and_hms(2025, 10, 31, 11, 0, 0).unwrap();
        assert_eq!(config.resolve_start(now, 6), expected);
    }

    #[test]
    fn resolve_start_falls_back_to_workflow_default() {
        let now = Utc.with_ymd_and_hms(2025, 10, 31, 13, 0, 0).unwrap();
        let config = ExportConfig::default();
        let expected = Utc.with_ymd_and_hms(2025, 10, 31, 7, 0, 0).unwrap();
        assert_eq!(config.resolve_start(now, 6), expected);
    }

    #[test]
    fn validate_rejects_non_positive_window() {
        let config = ExportConfig {
            window_minutes: 0,
            ..ExportConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_page_limit() {
        let config = ExportConfig {
            page_limit: 0,
            ..ExportConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_positive_hours_back() {
        let config = ExportConfig {
            hours_back: Some(0),
            ..ExportConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
