use crate::client::ApiClient;
use crate::config::ExportConfig;
use crate::constants::DEFAULT_HOURS_BACK;
use crate::errors::{AppError, AppResult};
use crate::export::csv_writer::write_records;
use crate::export::windows::compute_windows;
use crate::models::{Record, SessionFilter, TimeWindow};
use crate::ui;
use crate::utils::{
    format_duration, mb_from_bytes, round_two_decimals, timestamp_slug, to_rfc3339z,
};
use chrono::{Local, Utc};
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Walks the window sequence and accumulates every record the filter
/// matches, in fetch order.
///
/// One query per window, paginated by offset within the window: a full page
/// (`page_limit` records) triggers a follow-up request at the next offset, a
/// short page ends the window. Records are appended chronologically by
/// window, then by page order within a window.
///
/// A flat delay separates successive API calls — between calls, so the
/// first request goes out immediately. This avoids upstream rate limits
/// without any adaptive backoff.
///
/// # Errors
///
/// A failure fetching any window — transport, HTTP status, or envelope
/// error — aborts the whole run. There is no per-window recovery and no
/// checkpointing; an empty window is not an error.
pub async fn fetch_windowed(
    client: &ApiClient,
    config: &ExportConfig,
    windows: &[TimeWindow],
    filter: &SessionFilter,
) -> AppResult<Vec<Record>> {
    let mut all_records: Vec<Record> = Vec::new();

    if windows.is_empty() {
        info!("Time range is empty, nothing to fetch");
        return Ok(all_records);
    }

    let pb = ui::create_progress_bar(windows.len() as u64)?;
    let delay = Duration::from_millis(config.request_delay_ms);
    let started = Instant::now();
    let mut api_calls = 0usize;

    for window in windows {
        let from = to_rfc3339z(&window.from);
        let to = to_rfc3339z(&window.to);
        pb.set_message(format!("{from} -> {to}"));

        let mut offset = 0usize;
        let mut window_records = 0usize;
        loop {
            if api_calls > 0 {
                tokio::time::sleep(delay).await;
            }
            api_calls += 1;

            let page = client
                .session_list(filter, window, config.page_limit, offset)
                .await?;
            let fetched = page.len();
            window_records += fetched;
            all_records.extend(page);

            if fetched < config.page_limit {
                break;
            }
            offset += config.page_limit;
        }

        if window_records == 0 {
            debug!(from = %from, to = %to, "No records returned for this time window");
        } else {
            info!(from = %from, to = %to, records = window_records, "Window fetched");
        }
        pb.inc(1);
    }

    pb.finish_with_message(format!("Fetched {} record(s)", all_records.len()));
    info!(
        windows = windows.len(),
        api_calls,
        total_records = all_records.len(),
        elapsed = %format_duration(started.elapsed()),
        "Windowed fetch completed"
    );

    Ok(all_records)
}

/// The core export: failed sessions over `[start, now)`, written once at
/// the end to a timestamped CSV file.
///
/// The accumulated sequence is written even when it is empty — a run that
/// observed zero failed sessions still produces its output file and exits
/// successfully.
///
/// # Returns
///
/// The path of the written file.
pub async fn export_failed_sessions(
    client: &ApiClient,
    config: &ExportConfig,
) -> AppResult<PathBuf> {
    let now = Utc::now();
    let start = config.resolve_start(now, DEFAULT_HOURS_BACK);
    let windows = compute_windows(start, now, config.window_minutes)?;

    info!(
        from = %to_rfc3339z(&start),
        to = %to_rfc3339z(&now),
        window_minutes = config.window_minutes,
        windows = windows.len(),
        "Starting failed session export"
    );

    let records = fetch_windowed(client, config, &windows, &SessionFilter::failed()).await?;

    let filename = format!("failed_sessions_{}.csv", timestamp_slug(&Local::now()));
    let path = config.output_dir.join(filename);
    write_records(&path, &records, &[])?;

    let size_bytes = fs::metadata(&path)
        .map_err(|e| AppError::IoError(format!("Failed to read {}: {e}", path.display())))?
        .len();
    info!(
        total_records = records.len(),
        file = %path.display(),
        size_mb = round_two_decimals(mb_from_bytes(size_bytes)),
        "Total records collected and written"
    );

    Ok(path)
}
