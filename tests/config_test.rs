//! Tests for configuration loading

use chrono::{TimeZone, Utc};
use nse_cli::config::{Credentials, ExportConfigFile};
use nse_cli::constants::{ENV_BASE_URL, ENV_KEY_ID, ENV_KEY_VALUE, ENV_ORG_ID};
use nse_cli::models::ExportKind;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut tmp = NamedTempFile::new().unwrap();
    write!(tmp, "{contents}").unwrap();
    tmp
}

#[test]
fn test_minimal_toml_is_parsed_and_defaults_apply() {
    let tmp = write_config(
        r#"
        export = "sessions"
        "#,
    );

    let file = ExportConfigFile::from_toml_file(tmp.path()).unwrap();
    assert_eq!(file.kind(), ExportKind::Sessions);
    assert!(file.segment.is_none());
    assert_eq!(file.config.window_minutes, 30);
    assert_eq!(file.config.page_limit, 1000);
    assert_eq!(file.config.request_delay_ms, 200);
    assert!(file.config.enrich);
}

#[test]
fn test_toml_overrides_apply() {
    let tmp = write_config(
        r#"
        export = "clients"
        segment = "corp-wifi"
        window_minutes = 15
        hours_back = 48
        start = "2025-10-31T12:00:00Z"
        request_delay_ms = 0
        enrich = false
        output_dir = "out"
        "#,
    );

    let file = ExportConfigFile::from_toml_file(tmp.path()).unwrap();
    assert_eq!(file.kind(), ExportKind::Clients);
    assert_eq!(file.segment.as_deref(), Some("corp-wifi"));
    assert_eq!(file.config.window_minutes, 15);
    assert_eq!(file.config.hours_back, Some(48));
    assert_eq!(
        file.config.start,
        Some(Utc.with_ymd_and_hms(2025, 10, 31, 12, 0, 0).unwrap())
    );
    assert!(!file.config.enrich);
}

#[test]
fn test_missing_export_kind_errors() {
    let tmp = write_config(
        r#"
        window_minutes = 15
        "#,
    );
    assert!(ExportConfigFile::from_toml_file(tmp.path()).is_err());
}

#[test]
fn test_unknown_key_errors() {
    let tmp = write_config(
        r#"
        export = "sessions"
        extra_flag = true
        "#,
    );
    assert!(ExportConfigFile::from_toml_file(tmp.path()).is_err());
}

#[test]
fn test_clients_export_requires_segment() {
    let tmp = write_config(
        r#"
        export = "clients"
        "#,
    );
    assert!(ExportConfigFile::from_toml_file(tmp.path()).is_err());
}

#[test]
fn test_non_positive_window_errors() {
    let tmp = write_config(
        r#"
        export = "sessions"
        window_minutes = 0
        "#,
    );
    assert!(ExportConfigFile::from_toml_file(tmp.path()).is_err());
}

#[test]
fn test_nonexistent_file_errors() {
    let result = ExportConfigFile::from_toml_file(std::path::Path::new("nonexistent.toml"));
    assert!(result.is_err());
}

// Environment access is process-global, so all credential scenarios run in
// one sequential test.
#[test]
fn test_credentials_from_env() {
    std::env::set_var(ENV_KEY_ID, "key-1");
    std::env::set_var(ENV_KEY_VALUE, "secret");
    std::env::set_var(ENV_ORG_ID, "org-1");
    std::env::set_var(ENV_BASE_URL, "https://nac.example.com/");

    let credentials = Credentials::from_env().unwrap();
    assert_eq!(credentials.key_id, "key-1");
    assert_eq!(credentials.key_value, "secret");
    assert_eq!(credentials.org_id, "org-1");
    // Trailing slash is normalized away
    assert_eq!(credentials.base_url.as_str(), "https://nac.example.com/");

    // Empty values count as missing
    std::env::set_var(ENV_KEY_VALUE, "   ");
    assert!(Credentials::from_env().is_err());
    std::env::set_var(ENV_KEY_VALUE, "secret");

    // A base URL that does not parse is a configuration error
    std::env::set_var(ENV_BASE_URL, "not a url");
    assert!(Credentials::from_env().is_err());

    // An unset variable is a configuration error
    std::env::remove_var(ENV_KEY_ID);
    assert!(Credentials::from_env().is_err());
}
