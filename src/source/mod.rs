//! Row source: loads list rows from a JSONL file.
//!
//! One JSON object per line. Each object becomes one [`Row`]; the id comes
//! from a configurable field and every configured column is read by name.
//! Bad lines are skipped and counted, never fatal: a single corrupt record
//! should not keep the rest of the list from loading.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use unicode_width::UnicodeWidthStr;

use crate::model::{
    CellValue, ColumnDescriptor, ColumnName, ColumnSet, ListError, Row, RowId, SourceError,
};
use crate::store::RowStore;

/// How records map onto rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceOptions {
    /// Field holding the row id (string or number).
    pub id_field: String,
    /// Optional field holding an array of tag strings.
    pub tags_field: String,
    /// Columns to read. Empty means infer from the first record.
    pub columns: Vec<ColumnDescriptor>,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            id_field: "id".to_string(),
            tags_field: "tags".to_string(),
            columns: Vec::new(),
        }
    }
}

/// Why a line was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Not a JSON object, or the id was unusable.
    Malformed,
    /// A record with the same id was already loaded.
    DuplicateId,
}

/// A skipped input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number.
    pub line: usize,
    /// Why it was skipped.
    pub reason: SkipReason,
    /// Human-readable detail.
    pub detail: String,
}

/// Outcome counts for one load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Rows accepted.
    pub loaded: usize,
    /// Lines that were not blank but produced no row.
    pub skipped: Vec<SkippedLine>,
}

impl LoadReport {
    /// Number of malformed lines.
    pub fn malformed(&self) -> usize {
        self.count(SkipReason::Malformed)
    }

    /// Number of lines dropped as duplicate ids.
    pub fn duplicates(&self) -> usize {
        self.count(SkipReason::DuplicateId)
    }

    fn count(&self, reason: SkipReason) -> usize {
        self.skipped.iter().filter(|s| s.reason == reason).count()
    }

    fn skip(&mut self, line: usize, reason: SkipReason, detail: String) {
        warn!(line, ?reason, %detail, "skipping input line");
        self.skipped.push(SkippedLine {
            line,
            reason,
            detail,
        });
    }
}

/// Rows read from a source, in file order.
#[derive(Debug, Clone)]
pub struct LoadedRows {
    /// Column set the rows conform to.
    pub columns: ColumnSet,
    /// Parsed rows.
    pub rows: Vec<Row>,
    /// What was skipped.
    pub report: LoadReport,
}

impl LoadedRows {
    /// Move the rows into a fresh store, keeping file order.
    pub fn into_store(self) -> Result<RowStore, ListError> {
        RowStore::with_rows(self.columns, self.rows)
    }
}

/// Load rows from a JSONL file.
///
/// # Errors
///
/// - [`SourceError::FileNotFound`] when `path` does not exist.
/// - [`SourceError::NoColumns`] when no columns are configured and no
///   record yields any.
/// - [`SourceError::Io`] for read failures.
pub fn load_file(path: &Path, options: &SourceOptions) -> Result<LoadedRows, SourceError> {
    if !path.exists() {
        return Err(SourceError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let reader = BufReader::new(File::open(path)?);
    let loaded = read_rows(reader, options, path)?;
    info!(
        path = %path.display(),
        rows = loaded.report.loaded,
        skipped = loaded.report.skipped.len(),
        "rows loaded"
    );
    Ok(loaded)
}

/// Parse JSONL from any reader. `origin` is only used in error messages.
pub fn read_rows<R: BufRead>(
    reader: R,
    options: &SourceOptions,
    origin: &Path,
) -> Result<LoadedRows, SourceError> {
    let mut report = LoadReport::default();
    let mut records: Vec<(usize, Map<String, Value>)> = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(&line) {
            Ok(Value::Object(map)) => records.push((line_number, map)),
            Ok(other) => report.skip(
                line_number,
                SkipReason::Malformed,
                format!("expected an object, found {}", json_kind(&other)),
            ),
            Err(e) => report.skip(line_number, SkipReason::Malformed, e.to_string()),
        }
    }

    let descriptors = if options.columns.is_empty() {
        let mut inferred = records
            .first()
            .map(|(_, map)| infer_columns(map, options))
            .unwrap_or_default();
        fit_widths(&mut inferred, &records);
        debug!(columns = inferred.len(), "inferred columns");
        inferred
    } else {
        options.columns.clone()
    };
    if descriptors.is_empty() {
        return Err(SourceError::NoColumns {
            path: origin.to_path_buf(),
        });
    }
    let columns = ColumnSet::new(descriptors)?;

    let mut seen: HashSet<RowId> = HashSet::with_capacity(records.len());
    let mut rows = Vec::with_capacity(records.len());
    for (line_number, map) in records {
        let id = match record_id(&map, &options.id_field, line_number) {
            Ok(id) => id,
            Err(detail) => {
                report.skip(line_number, SkipReason::Malformed, detail);
                continue;
            }
        };
        if !seen.insert(id.clone()) {
            report.skip(
                line_number,
                SkipReason::DuplicateId,
                format!("id {} already loaded", id),
            );
            continue;
        }
        rows.push(build_row(id, &map, &columns, &options.tags_field));
    }

    report.loaded = rows.len();
    Ok(LoadedRows {
        columns,
        rows,
        report,
    })
}

/// Columns from one record: every key except the id and tags fields, in key
/// order; numeric when the value is a JSON number.
fn infer_columns(map: &Map<String, Value>, options: &SourceOptions) -> Vec<ColumnDescriptor> {
    map.iter()
        .filter(|(key, _)| **key != options.id_field && **key != options.tags_field)
        .filter_map(|(key, value)| {
            let name = ColumnName::new(key.as_str()).ok()?;
            Some(if value.is_number() {
                ColumnDescriptor::numeric(name)
            } else {
                ColumnDescriptor::text(name)
            })
        })
        .collect()
}

/// Size inferred columns to their widest value (or header), in display cells.
///
/// The header gets two extra cells for the sort indicator.
fn fit_widths(columns: &mut [ColumnDescriptor], records: &[(usize, Map<String, Value>)]) {
    const MIN_WIDTH: usize = 4;
    const MAX_WIDTH: usize = 40;

    for column in columns.iter_mut() {
        let key = column.name.as_str();
        let widest = records
            .iter()
            .filter_map(|(_, map)| map.get(key))
            .map(|value| cell_value(value).to_string().width())
            .fold(key.width() + 2, usize::max);
        let width = widest.clamp(MIN_WIDTH, MAX_WIDTH);
        column.width_hint = u16::try_from(width).unwrap_or(u16::MAX);
    }
}

fn record_id(map: &Map<String, Value>, field: &str, line_number: usize) -> Result<RowId, String> {
    let raw = match map.get(field) {
        None | Some(Value::Null) => format!("line-{}", line_number),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => return Err(format!("id field `{}` is {}", field, json_kind(other))),
    };
    RowId::new(raw).map_err(|e| e.to_string())
}

fn build_row(id: RowId, map: &Map<String, Value>, columns: &ColumnSet, tags_field: &str) -> Row {
    let mut row = columns.iter().fold(Row::new(id), |row, column| {
        let value = map.get(column.name.as_str()).map_or(
            CellValue::Text(String::new()),
            cell_value,
        );
        row.with_cell(column.name.clone(), value)
    });

    if let Some(Value::Array(tags)) = map.get(tags_field) {
        for tag in tags.iter().filter_map(Value::as_str) {
            row = row.with_tag(tag);
        }
    }
    row
}

fn cell_value(value: &Value) -> CellValue {
    match value {
        Value::Null => CellValue::Text(String::new()),
        Value::String(s) => CellValue::Text(s.clone()),
        Value::Number(n) => n
            .as_f64()
            .map_or_else(|| CellValue::Text(n.to_string()), CellValue::Number),
        Value::Bool(b) => CellValue::Text(b.to_string()),
        Value::Array(_) | Value::Object(_) => CellValue::Text(value.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
