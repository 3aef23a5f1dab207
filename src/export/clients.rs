use crate::client::ApiClient;
use crate::config::ExportConfig;
use crate::constants::{CLIENT_PRIORITY_COLUMNS, DEFAULT_CLIENTS_HOURS_BACK};
use crate::errors::{AppError, AppResult};
use crate::export::csv_writer::write_records;
use crate::export::sessions::fetch_windowed;
use crate::export::windows::compute_windows;
use crate::models::{Record, Segment, SessionFilter};
use crate::ui;
use crate::utils::{timestamp_slug, to_rfc3339z};
use chrono::{Local, Utc};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{info, warn};

/// Merges the identity endpoint's details into a session record.
///
/// `attributes` entries land as `client_attr_*` columns, the certificate
/// contributes issuer and expiry, and remaining detail fields are carried
/// over — prefixed with `client_` when the session already has a field of
/// the same name.
fn merge_client_details(record: &mut Record, mut details: Record) {
    if let Some(Value::Object(attributes)) = details.remove("attributes") {
        for (key, value) in attributes {
            record.insert(format!("client_attr_{key}"), value);
        }
    }

    if let Some(Value::Object(certificate)) = details.remove("certificate") {
        if let Some(issuer) = certificate.get("issuer") {
            record.insert("cert_issuer".to_string(), issuer.clone());
        }
        if let Some(expiry) = certificate.get("expiryDate") {
            record.insert("cert_expiry".to_string(), expiry.clone());
        }
    }

    for (key, value) in details {
        if record.contains_key(&key) {
            record.insert(format!("client_{key}"), value);
        } else {
            record.insert(key, value);
        }
    }
}

/// Deduplicates raw sessions into one record per client MAC.
///
/// Sessions arrive in chronological window order, so the last session seen
/// for a MAC is the most recent one; it wins. Sessions without a `mac`
/// field are dropped.
fn dedup_by_mac(sessions: Vec<Record>) -> BTreeMap<String, Record> {
    let mut devices: BTreeMap<String, Record> = BTreeMap::new();
    for session in sessions {
        let mac = match session.get("mac") {
            Some(Value::String(mac)) if !mac.is_empty() => mac.clone(),
            _ => continue,
        };
        devices.insert(mac, session);
    }
    devices
}

/// Exports the client inventory of one segment.
///
/// Resolves the segment name against the organization's configuration,
/// fetches its network-access sessions over the windowed loop, reduces them
/// to one record per MAC, optionally enriches every client from the
/// identity endpoint, and writes a CSV with the identity columns promoted
/// to the front.
///
/// # Errors
///
/// An unknown segment name is `InvalidInput`. Window fetch failures abort
/// the run; a failed per-client enrichment lookup only loses that client's
/// extra columns.
pub async fn export_segment_clients(
    client: &ApiClient,
    config: &ExportConfig,
    segment_name: &str,
) -> AppResult<()> {
    info!(segment = segment_name, "Looking up segment");
    let segments = client.segment_list().await?;
    let segment_id = segments
        .iter()
        .filter(|segment| segment.name == segment_name)
        .find_map(Segment::id_string)
        .ok_or_else(|| {
            AppError::InvalidInput(format!(
                "Segment '{segment_name}' not found in configuration"
            ))
        })?;
    info!(segment = segment_name, segment_id = %segment_id, "Resolved segment");

    let now = Utc::now();
    let start = config.resolve_start(now, DEFAULT_CLIENTS_HOURS_BACK);
    let windows = compute_windows(start, now, config.window_minutes)?;
    info!(
        from = %to_rfc3339z(&start),
        to = %to_rfc3339z(&now),
        windows = windows.len(),
        "Scanning segment sessions"
    );

    let filter = SessionFilter::for_segment(&segment_id);
    let raw_sessions = fetch_windowed(client, config, &windows, &filter).await?;
    let raw_count = raw_sessions.len();

    let devices = dedup_by_mac(raw_sessions);
    info!(
        raw_sessions = raw_count,
        devices = devices.len(),
        "Deduplicated sessions by MAC"
    );

    let mut final_records: Vec<Record> = Vec::with_capacity(devices.len());
    if config.enrich && !devices.is_empty() {
        info!(devices = devices.len(), "Enriching client details");
        let pb = ui::create_progress_bar(devices.len() as u64)?;
        let delay = Duration::from_millis(config.enrich_delay_ms);

        for (index, (mac, session)) in devices.into_iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(delay).await;
            }
            pb.set_message(mac.clone());

            let mut combined = session;
            match client.client_get(&mac).await {
                Ok(details) => merge_client_details(&mut combined, details),
                Err(e) => warn!(mac = %mac, error = %e, "Client detail lookup failed"),
            }
            final_records.push(combined);
            pb.inc(1);
        }
        pb.finish_with_message("Enrichment complete");
    } else {
        final_records.extend(devices.into_values());
    }

    if final_records.is_empty() {
        info!(segment = segment_name, "No client records found to export");
        return Ok(());
    }

    let safe_segment = segment_name.replace(' ', "_");
    let filename = format!(
        "clients_{safe_segment}_{}.csv",
        timestamp_slug(&Local::now())
    );
    let path = config.output_dir.join(filename);
    write_records(&path, &final_records, CLIENT_PRIORITY_COLUMNS)?;

    info!(
        clients = final_records.len(),
        file = %path.display(),
        "Client export completed"
    );
    Ok(())
}
