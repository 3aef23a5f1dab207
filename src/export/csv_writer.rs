use crate::errors::{AppError, AppResult};
use crate::models::Record;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Derives the output columns from a record set.
///
/// The column set is the union of keys observed across all records, sorted
/// lexicographically. Names listed in `priority` are then promoted, in
/// order, to the front of the header. The union policy means a field seen
/// only in one window still becomes a column for every row; rows lacking it
/// get an empty cell.
///
/// # Example
///
/// ```
/// use nse_cli::export::csv_writer::build_columns;
/// use nse_cli::models::Record;
/// use serde_json::json;
///
/// let mut first = Record::new();
/// first.insert("mac".into(), json!("aa:bb"));
/// first.insert("ip".into(), json!("10.0.0.1"));
/// let mut second = Record::new();
/// second.insert("username".into(), json!("alice"));
///
/// let columns = build_columns(&[first, second], &["mac"]);
/// assert_eq!(columns, vec!["mac", "ip", "username"]);
/// ```
pub fn build_columns(records: &[Record], priority: &[&str]) -> Vec<String> {
    let keys: BTreeSet<&str> = records
        .iter()
        .flat_map(|record| record.keys().map(String::as_str))
        .collect();
    let mut columns: Vec<String> = keys.into_iter().map(str::to_owned).collect();

    // Promote priority columns front-to-front by inserting in reverse.
    for name in priority.iter().rev() {
        if let Some(pos) = columns.iter().position(|column| column == name) {
            let column = columns.remove(pos);
            columns.insert(0, column);
        }
    }

    columns
}

/// Renders one cell: strings verbatim, scalars via display, null/missing as
/// empty, nested objects and arrays as JSON text.
fn render_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Writes the accumulated records to a CSV file.
///
/// The parent directory is created on demand. An empty record set still
/// produces the file — with no records there is no observed key set, so the
/// file carries no header and no data rows. Rows are written in the order
/// the records were accumulated.
///
/// # Arguments
///
/// * `path` - Destination file
/// * `records` - Accumulated records, already in output order
/// * `priority` - Column names promoted to the front of the header
///
/// # Errors
///
/// Returns `IoError` if the directory cannot be created or the file cannot
/// be flushed, and `CsvError` if a row fails to serialize.
pub fn write_records(path: &Path, records: &[Record], priority: &[&str]) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::IoError(format!(
                    "Failed to create output directory {}: {e}",
                    parent.display()
                ))
            })?;
        }
    }

    let columns = build_columns(records, priority);

    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::CsvError(format!("Failed to create {}: {e}", path.display())))?;

    if !columns.is_empty() {
        writer.write_record(&columns)?;
    }
    for record in records {
        writer.write_record(columns.iter().map(|column| render_cell(record.get(column))))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::IoError(format!("Failed to write {}: {e}", path.display())))?;

    Ok(())
}
