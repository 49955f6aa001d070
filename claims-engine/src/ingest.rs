//! Uploaded CSV and JSON-array files as typed tables
//!
//! Column kinds are inferred from the cells: integer, then money, then
//! ISO date, falling back to text. Zero-padded identifiers stay text so
//! they keep their padding through filter and export.

use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ClaimsError, ClaimsResult};
use crate::table::{Column, ColumnData, Table, DATE_FORMAT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadFormat {
    Csv,
    Json,
}

impl UploadFormat {
    /// # Errors
    ///
    /// Returns [`ClaimsError::UnsupportedFormat`] for anything but `.csv`
    /// and `.json`.
    pub fn from_file_name(file_name: &str) -> ClaimsResult<Self> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("csv") => Ok(UploadFormat::Csv),
            Some("json") => Ok(UploadFormat::Json),
            _ => Err(ClaimsError::UnsupportedFormat(file_name.to_string())),
        }
    }
}

/// Parse an uploaded file's bytes, picking the parser from its name
///
/// # Errors
///
/// Returns [`ClaimsError::UnsupportedFormat`] or
/// [`ClaimsError::MalformedInput`].
pub fn read_bytes(file_name: &str, bytes: &[u8]) -> ClaimsResult<Table> {
    match UploadFormat::from_file_name(file_name)? {
        UploadFormat::Csv => read_csv(bytes),
        UploadFormat::Json => read_json(bytes),
    }
}

/// # Errors
///
/// As [`read_bytes`], plus I/O errors reading the file.
pub fn read_path(path: &Path) -> ClaimsResult<Table> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    UploadFormat::from_file_name(file_name)?;
    let bytes = std::fs::read(path)?;
    read_bytes(file_name, &bytes)
}

/// CSV with a header row
///
/// # Errors
///
/// Returns [`ClaimsError::MalformedInput`] for ragged rows or invalid text.
pub fn read_csv<R: Read>(reader: R) -> ClaimsResult<Table> {
    let mut csv_reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(|e| ClaimsError::MalformedInput(format!("unreadable header row: {e}")))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for (line, record) in csv_reader.records().enumerate() {
        let record = record.map_err(|e| ClaimsError::MalformedInput(format!("record {}: {e}", line + 1)))?;
        for (column, cell) in cells.iter_mut().zip(record.iter()) {
            column.push(cell.to_string());
        }
    }

    build_table(headers, cells)
}

/// A JSON array of flat objects; the first object fixes the column order
///
/// # Errors
///
/// Returns [`ClaimsError::MalformedInput`] for anything else, for records
/// whose keys differ from the first, and for nested values.
pub fn read_json(bytes: &[u8]) -> ClaimsResult<Table> {
    let document: serde_json::Value = serde_json::from_slice(bytes)?;
    let serde_json::Value::Array(records) = document else {
        return Err(ClaimsError::MalformedInput("expected a JSON array of objects".into()));
    };

    let mut headers: Vec<String> = Vec::new();
    let mut cells: Vec<Vec<String>> = Vec::new();

    for (index, record) in records.iter().enumerate() {
        let serde_json::Value::Object(fields) = record else {
            return Err(ClaimsError::MalformedInput(format!("element {index} is not an object")));
        };

        if index == 0 {
            headers = fields.keys().cloned().collect();
            cells = vec![Vec::with_capacity(records.len()); headers.len()];
        } else if fields.len() != headers.len() || headers.iter().any(|h| !fields.contains_key(h)) {
            return Err(ClaimsError::MalformedInput(format!(
                "element {index} has different keys than the first element"
            )));
        }

        for (header, column) in headers.iter().zip(cells.iter_mut()) {
            let value = fields.get(header).unwrap_or(&serde_json::Value::Null);
            column.push(json_cell(header, value)?);
        }
    }

    build_table(headers, cells)
}

fn json_cell(header: &str, value: &serde_json::Value) -> ClaimsResult<String> {
    match value {
        serde_json::Value::Null => Ok(String::new()),
        serde_json::Value::String(s) => Ok(s.clone()),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => Err(ClaimsError::MalformedInput(format!(
            "field '{header}' holds a nested value"
        ))),
    }
}

fn build_table(headers: Vec<String>, cells: Vec<Vec<String>>) -> ClaimsResult<Table> {
    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, values)| Column::new(name, infer(values)))
        .collect();
    Table::new(columns).map_err(|e| ClaimsError::MalformedInput(e.to_string()))
}

/// Narrowest kind that fits every cell; empty cells force text
fn infer(values: Vec<String>) -> ColumnData {
    let values: Vec<String> = values.into_iter().map(|v| v.trim().to_string()).collect();
    if values.is_empty() || values.iter().any(String::is_empty) {
        return ColumnData::Text(values);
    }
    if values.iter().any(|v| is_zero_padded(v)) {
        return ColumnData::Text(values);
    }

    if let Some(integers) = parse_all(&values, |v| v.parse::<i64>().ok()) {
        return ColumnData::Integer(integers);
    }
    if let Some(amounts) = parse_all(&values, |v| Decimal::from_str(v).ok()) {
        return ColumnData::Money(amounts);
    }
    if let Some(dates) = parse_all(&values, |v| NaiveDate::parse_from_str(v, DATE_FORMAT).ok()) {
        return ColumnData::Date(dates);
    }
    ColumnData::Text(values)
}

fn parse_all<T>(values: &[String], parse: impl Fn(&str) -> Option<T>) -> Option<Vec<T>> {
    values.iter().map(|v| parse(v)).collect()
}

/// "0042" or "-07", but not "0" or "0.50"
fn is_zero_padded(value: &str) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);
    let mut chars = digits.chars();
    chars.next() == Some('0') && chars.next().is_some_and(|c| c.is_ascii_digit())
}
