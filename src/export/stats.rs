use crate::client::ApiClient;
use crate::config::ExportConfig;
use crate::constants::{DEFAULT_STATS_HOURS_BACK, STATS_TYPES};
use crate::errors::AppResult;
use crate::export::csv_writer::write_records;
use crate::models::Record;
use crate::utils::{timestamp_slug, to_rfc3339z};
use chrono::{Local, Utc};
use serde_json::Value;
use std::time::Duration;
use tracing::{info, warn};

/// Flattens one statistics record into a single CSV row.
///
/// `dateTime` is carried over first, the nested `stats` object is merged
/// into the row (objects and arrays rendered as JSON text, since topN
/// statistics nest freely), and any remaining root-level keys are carried
/// as-is.
fn flatten_stat_record(record: &Record) -> Record {
    let mut flat = Record::new();

    if let Some(date_time) = record.get("dateTime") {
        flat.insert("dateTime".to_string(), date_time.clone());
    }

    if let Some(Value::Object(stats)) = record.get("stats") {
        for (key, value) in stats {
            let cell = match value {
                Value::Object(_) | Value::Array(_) => Value::String(value.to_string()),
                other => other.clone(),
            };
            flat.insert(key.clone(), cell);
        }
    }

    for (key, value) in record {
        if key != "stats" && key != "dateTime" {
            flat.insert(key.clone(), value.clone());
        }
    }

    flat
}

/// Exports every configured statistic type to its own CSV file under
/// `{output_dir}/stats/`.
///
/// Each type is queried from `now` minus the look-back (default 24 hours).
/// A failing or empty type is logged and skipped — the remaining types
/// still run. Only the CSV write itself is fatal.
pub async fn export_stats(client: &ApiClient, config: &ExportConfig) -> AppResult<()> {
    let now = Utc::now();
    let from = config.resolve_start(now, DEFAULT_STATS_HOURS_BACK);
    let slug = timestamp_slug(&Local::now());
    let stats_dir = config.output_dir.join("stats");
    let delay = Duration::from_millis(config.request_delay_ms);

    info!(
        from = %to_rfc3339z(&from),
        types = STATS_TYPES.len(),
        "Starting statistics export"
    );

    let mut exported = 0usize;
    let mut failed = 0usize;

    for (index, stat_type) in STATS_TYPES.iter().enumerate() {
        if index > 0 {
            tokio::time::sleep(delay).await;
        }
        info!(stat_type, "Querying statistics");

        let records = match client.stats_get(stat_type, &from).await {
            Ok(records) => records,
            Err(e) => {
                warn!(stat_type, error = %e, "Failed to fetch statistics type");
                failed += 1;
                continue;
            }
        };

        if records.is_empty() {
            info!(stat_type, "No data returned");
            continue;
        }

        let flattened: Vec<Record> = records.iter().map(flatten_stat_record).collect();
        let filename = format!("{}_{slug}.csv", stat_type.replace('.', "_"));
        let path = stats_dir.join(filename);
        write_records(&path, &flattened, &["dateTime"])?;

        info!(
            stat_type,
            rows = flattened.len(),
            file = %path.display(),
            "Statistics exported"
        );
        exported += 1;
    }

    info!(
        exported,
        failed,
        total_types = STATS_TYPES.len(),
        "Statistics export completed"
    );
    Ok(())
}
