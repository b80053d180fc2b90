//! Pasted numeric tables used by the adjustment tools.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::loc;
use crate::validation::{FieldViolation, ValidationErrors, ViolationKind};

/// Runs of commas, tabs and spaces collapse to one comma.
static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,\t ]+").unwrap());

/// Numeric rows parsed from pasted text, in input order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NumericTable {
    pub rows: Vec<Vec<f64>>,
}

impl NumericTable {
    /// Values of column `index`.
    pub fn column(&self, index: usize) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(move |row| row[index])
    }
}

/// Normalize separators line by line.
pub(crate) fn normalize(text: &str) -> String {
    text.trim()
        .lines()
        .map(|line| SEPARATORS.replace_all(line.trim(), ",").into_owned())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn dataset_error(message: impl Into<String>) -> ValidationErrors {
    ValidationErrors::single(FieldViolation::new(
        loc!["dataset"],
        ViolationKind::Invalid,
        message,
    ))
}

/// Parse pasted text whose header must be exactly `columns`.
pub(crate) fn parse_table(
    text: &str,
    columns: &[&str],
    max_chars: usize,
) -> Result<NumericTable, ValidationErrors> {
    if text.chars().count() > max_chars {
        return Err(dataset_error("Dataset too large"));
    }

    let normalized = normalize(text);
    if normalized.is_empty() {
        return Err(dataset_error("Empty dataset"));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(normalized.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| dataset_error(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();
    if headers != columns {
        return Err(dataset_error(format!("Bad column names; requires {:?}", columns)));
    }

    let mut rows = Vec::new();
    for (row_idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| dataset_error(e.to_string()))?;
        if record.len() != columns.len() {
            return Err(dataset_error(format!(
                "Row {}: expected {} values, found {}",
                row_idx + 1,
                columns.len(),
                record.len()
            )));
        }
        let mut row = Vec::with_capacity(columns.len());
        for cell in record.iter() {
            let value = cell.parse::<f64>().map_err(|_| {
                dataset_error(format!("Row {}: '{}' is not a number", row_idx + 1, cell))
            })?;
            if !value.is_finite() {
                return Err(dataset_error(format!(
                    "Row {}: '{}' is not a finite number",
                    row_idx + 1,
                    cell
                )));
            }
            row.push(value);
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(dataset_error("Empty dataset"));
    }
    Ok(NumericTable { rows })
}
