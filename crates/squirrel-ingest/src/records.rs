//! Loading of the sightings dataset.

use std::path::Path;

use csv::ReaderBuilder;
use serde_json::{Map, Number, Value};
use tracing::{debug, info};

use squirrel_model::Record;

use crate::error::{IngestError, Result};
use crate::normalize::record_from_row;
use crate::report::LoadReport;
use crate::sanitize::sanitize_json;

/// Options for reading the merged census CSV.
#[derive(Debug, Clone, Copy)]
pub struct CsvOptions {
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        // The merge step writes `;`-separated files.
        Self { delimiter: b';' }
    }
}

/// Parse the records JSON payload (an array of census rows).
pub fn parse_records_json(text: &str) -> Result<LoadReport<Record>> {
    let cleaned = sanitize_json(text);
    let value: Value = serde_json::from_str(&cleaned)?;
    let rows = match value {
        Value::Array(rows) => rows,
        other => {
            return Err(IngestError::NotAnArray {
                found: json_kind(&other),
            });
        }
    };

    let mut report = LoadReport::default();
    for (index, row) in rows.iter().enumerate() {
        let Value::Object(row) = row else {
            report.skip(index, format!("expected an object, found {}", json_kind(row)));
            continue;
        };
        match record_from_row(row) {
            Ok(record) => report.push(record),
            Err(reason) => report.skip(index, reason),
        }
    }
    Ok(report)
}

/// Read and parse a records JSON file.
pub fn load_records_json(path: &Path) -> Result<LoadReport<Record>> {
    let text = read_text(path)?;
    let report = parse_records_json(&text)?;
    info!(
        path = %path.display(),
        records = report.items.len(),
        skipped = report.skipped.len(),
        "records loaded"
    );
    Ok(report)
}

/// Parse the merged census CSV from any reader.
pub fn parse_records_csv<R: std::io::Read>(
    reader: R,
    options: CsvOptions,
) -> Result<LoadReport<Record>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(options.delimiter)
        .from_reader(reader);
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|header| header.trim_matches('\u{feff}').trim().to_string())
        .collect();

    let mut report = LoadReport::default();
    for (index, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(error) => {
                report.skip(index, error.to_string());
                continue;
            }
        };
        let mut row = Map::new();
        for (header, field) in headers.iter().zip(record.iter()) {
            row.insert(header.clone(), csv_field_value(field));
        }
        match record_from_row(&row) {
            Ok(record) => report.push(record),
            Err(reason) => report.skip(index, reason),
        }
    }
    Ok(report)
}

/// Read and parse a merged census CSV file.
pub fn load_records_csv(path: &Path, options: CsvOptions) -> Result<LoadReport<Record>> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let file = std::fs::File::open(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let report = parse_records_csv(file, options)?;
    info!(
        path = %path.display(),
        records = report.items.len(),
        skipped = report.skipped.len(),
        "records loaded"
    );
    Ok(report)
}

/// Load records choosing the reader from the file extension (`.csv` or JSON).
pub fn load_records(path: &Path) -> Result<LoadReport<Record>> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    debug!(path = %path.display(), is_csv, "loading records");
    if is_csv {
        load_records_csv(path, CsvOptions::default())
    } else {
        load_records_json(path)
    }
}

pub(crate) fn read_text(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    std::fs::read_to_string(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Type a raw CSV field the way pandas wrote it.
fn csv_field_value(field: &str) -> Value {
    let field = field.trim();
    if field.is_empty() || field.eq_ignore_ascii_case("nan") {
        return Value::Null;
    }
    if field.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if field.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if let Ok(integer) = field.parse::<i64>() {
        return Value::Number(integer.into());
    }
    if let Some(number) = field.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(number);
    }
    Value::String(field.to_string())
}
