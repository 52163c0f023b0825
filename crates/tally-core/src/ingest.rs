//! Upload ingestion for ad-hoc analysis
//!
//! Turns an uploaded table into loosely typed rows keyed by header. Cells are
//! typed the way a spreadsheet would show them: plain numbers become numbers,
//! `true`/`false` become booleans, empty cells become null and everything else
//! stays a string (so `"$1,234.50"` is left for the amount coercion to handle).

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde_json::{Number, Value};
use tracing::debug;

use crate::analysis::rows_from_json;
use crate::error::Result;
use crate::fields::AdHocRow;

/// Parse CSV with a header row into ad-hoc rows
///
/// Fully blank lines are skipped. Short rows only carry the columns they have.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<AdHocRow>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut rows = Vec::new();

    for result in rdr.records() {
        let record = result?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        rows.push(record_to_row(&headers, &record));
    }

    debug!("Read {} rows with {} columns", rows.len(), headers.len());
    Ok(rows)
}

/// Read an uploaded file from disk
///
/// `.json` files hold either an array of row objects or `{"rows": [...]}`;
/// anything else is read as CSV.
pub fn read_rows_from_path(path: &Path) -> Result<Vec<AdHocRow>> {
    let file = std::fs::File::open(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        let document: Value = serde_json::from_reader(std::io::BufReader::new(file))?;
        Ok(rows_from_json(&document))
    } else {
        read_rows(file)
    }
}

fn record_to_row(headers: &StringRecord, record: &StringRecord) -> AdHocRow {
    let mut row = AdHocRow::new();
    for (i, header) in headers.iter().enumerate() {
        if let Some(cell) = record.get(i) {
            row.insert(header.to_string(), infer_cell(cell));
        }
    }
    row
}

/// Type a raw cell
pub fn infer_cell(cell: &str) -> Value {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    match trimmed {
        "true" | "TRUE" | "True" => return Value::Bool(true),
        "false" | "FALSE" | "False" => return Value::Bool(false),
        _ => {}
    }
    if looks_numeric(trimmed) {
        if let Ok(n) = trimmed.parse::<i64>() {
            return Value::Number(n.into());
        }
        if let Some(n) = trimmed.parse::<f64>().ok().and_then(Number::from_f64) {
            return Value::Number(n);
        }
    }
    Value::String(cell.to_string())
}

/// Plain decimal or scientific notation, nothing `f64::from_str` accepts beyond that
/// (so "inf" and "NaN" stay strings)
fn looks_numeric(s: &str) -> bool {
    let body = s.strip_prefix(['-', '+']).unwrap_or(s);
    body.chars().next().is_some_and(|c| c.is_ascii_digit() || c == '.')
        && body
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '-' | '+'))
}
