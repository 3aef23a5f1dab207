use crate::client::ApiClient;
use crate::config::{Credentials, ExportConfig, ExportConfigFile};
use crate::errors::{AppError, AppResult};
use crate::export::{clients, sessions, stats};
use crate::models::ExportKind;
use chrono::{DateTime, Utc};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use tracing::info;

// CLI metadata constants
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const APP_ABOUT: &str = env!("CARGO_PKG_DESCRIPTION");

/// Parses command-line arguments and executes the requested export.
///
/// Four subcommands are handled:
/// - `sessions`: the core export — failed sessions over a windowed range
/// - `stats`: one CSV per configured statistic type
/// - `clients`: client inventory of one segment, optionally enriched
/// - `toml`: run any of the above from a TOML configuration file
///
/// Credentials always come from the environment; the subcommand flags only
/// override tunables. Without a subcommand the help text is printed.
///
/// # Errors
///
/// Returns an error if required configuration is missing, a flag value does
/// not parse, login is rejected, any window fetch fails, or the output file
/// cannot be written.
pub async fn cli() -> AppResult<()> {
    let cmd = Command::new("nse-cli")
        .version(APP_VERSION)
        .about(APP_ABOUT)
        .subcommand(
            Command::new("sessions")
                .about("Export failed sessions over a windowed time range")
                .after_help(
                    "Looks back 6 hours in 30-minute windows by default.\nExample:\n  nse-cli sessions --hours-back 6 --window-minutes 30",
                )
                .arg(start_arg())
                .arg(hours_back_arg())
                .arg(window_minutes_arg())
                .arg(output_dir_arg()),
        )
        .subcommand(
            Command::new("stats")
                .about("Export the configured statistic types, one CSV per type")
                .after_help("Looks back 24 hours by default.")
                .arg(hours_back_arg())
                .arg(output_dir_arg()),
        )
        .subcommand(
            Command::new("clients")
                .about("Export the client inventory of one segment")
                .after_help(
                    "Looks back 24 hours by default. Enrichment queries the identity\nendpoint once per client; disable it with --no-enrich.",
                )
                .arg(
                    Arg::new("segment")
                        .short('g')
                        .long("segment")
                        .help("Segment name to export")
                        .required(true)
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("no_enrich")
                        .short('n')
                        .long("no-enrich")
                        .help("Skip the per-client identity lookups")
                        .action(ArgAction::SetTrue),
                )
                .arg(start_arg())
                .arg(hours_back_arg())
                .arg(window_minutes_arg())
                .arg(output_dir_arg()),
        )
        .subcommand(
            Command::new("toml")
                .about("Run an export described by a TOML configuration file")
                .arg(
                    Arg::new("config")
                        .help("Path to the TOML config file")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        );

    let mut cmd_for_help = cmd.clone();
    let matches = cmd.get_matches();

    match matches.subcommand() {
        Some(("sessions", sub)) => {
            let config = config_from_flags(sub)?;
            run_export(ExportKind::Sessions, None, &config).await?;
        }
        Some(("stats", sub)) => {
            let config = config_from_flags(sub)?;
            run_export(ExportKind::Stats, None, &config).await?;
        }
        Some(("clients", sub)) => {
            let mut config = config_from_flags(sub)?;
            if sub.get_flag("no_enrich") {
                config.enrich = false;
            }
            let segment = sub
                .get_one::<String>("segment")
                .expect("segment is required");
            run_export(ExportKind::Clients, Some(segment), &config).await?;
        }
        Some(("toml", sub)) => {
            let config_path = sub
                .get_one::<PathBuf>("config")
                .expect("config is required");

            let file = ExportConfigFile::from_toml_file(config_path)?;
            run_export(file.kind(), file.segment.as_deref(), &file.config).await?;
        }
        _ => {
            cmd_for_help
                .print_help()
                .map_err(|e| AppError::IoError(format!("Failed to print help: {e}")))?;
        }
    }

    Ok(())
}

fn start_arg() -> Arg<'static> {
    Arg::new("start")
        .short('s')
        .long("start")
        .help("Start of the historical range (RFC 3339, e.g. 2025-10-31T12:00:00Z)")
        .action(ArgAction::Set)
}

fn hours_back_arg() -> Arg<'static> {
    Arg::new("hours_back")
        .short('b')
        .long("hours-back")
        .help("How far back to look when no start is given")
        .value_parser(clap::value_parser!(i64))
        .action(ArgAction::Set)
}

fn window_minutes_arg() -> Arg<'static> {
    Arg::new("window_minutes")
        .short('w')
        .long("window-minutes")
        .help("Fixed window size in minutes for the time-sliced fetch")
        .value_parser(clap::value_parser!(i64))
        .action(ArgAction::Set)
}

fn output_dir_arg() -> Arg<'static> {
    Arg::new("output_dir")
        .short('o')
        .long("output-dir")
        .help("Directory the CSV files are written to")
        .value_parser(clap::value_parser!(PathBuf))
        .action(ArgAction::Set)
}

/// Builds the run configuration from defaults plus the shared flags.
fn config_from_flags(sub: &ArgMatches) -> AppResult<ExportConfig> {
    let mut config = ExportConfig::default();

    // try_get_one: not every subcommand defines every shared flag.
    if let Ok(Some(raw)) = sub.try_get_one::<String>("start") {
        config.start = Some(parse_start(raw)?);
    }
    if let Ok(Some(&hours)) = sub.try_get_one::<i64>("hours_back") {
        config.hours_back = Some(hours);
    }
    if let Ok(Some(&minutes)) = sub.try_get_one::<i64>("window_minutes") {
        config.window_minutes = minutes;
    }
    if let Ok(Some(dir)) = sub.try_get_one::<PathBuf>("output_dir") {
        config.output_dir = dir.clone();
    }

    Ok(config)
}

fn parse_start(raw: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|e| AppError::InvalidInput(format!("Invalid start timestamp '{raw}': {e}")))
}

/// Logs in once and dispatches to the requested workflow.
async fn run_export(
    kind: ExportKind,
    segment: Option<&str>,
    config: &ExportConfig,
) -> AppResult<()> {
    config.validate()?;
    let credentials = Credentials::from_env()?;

    info!(
        export = kind.display_name(),
        base_url = %credentials.base_url,
        "Starting export"
    );

    let mut client = ApiClient::new(credentials.base_url.clone(), credentials.org_id.clone());
    client.login(&credentials.key_id, &credentials.key_value).await?;

    match kind {
        ExportKind::Sessions => {
            sessions::export_failed_sessions(&client, config).await?;
        }
        ExportKind::Stats => stats::export_stats(&client, config).await?,
        ExportKind::Clients => {
            let segment = segment.ok_or_else(|| {
                AppError::InvalidInput("Segment name is required for the clients export".into())
            })?;
            clients::export_segment_clients(&client, config, segment).await?;
        }
    }

    info!(export = kind.display_name(), "All operations completed successfully");
    Ok(())
}
