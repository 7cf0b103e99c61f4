//! Source loading and record ingestion.
//!
//! A source is first read into a [`Workbook`] of raw cell grids (spreadsheets
//! through `calamine`, delimited text through `csv`), then [`ingest()`] turns
//! every sheet into canonical-keyed [`Record`]s:
//!
//! - the first row of a sheet is its header; headers are lowercased, trimmed
//!   and have line breaks collapsed, blank headers become `col_<index>`
//! - every other row is normalized cell by cell under those keys
//! - records without a `year` column get one inferred from the first field
//!   carrying four digits

use std::{
    io::{Cursor, Read, Seek},
    path::Path,
};

use calamine::{Data, ExcelDateTime, Range, Reader, Sheets, open_workbook_auto, open_workbook_auto_from_rs};
use encoding_rs::{Encoding, UTF_8};
use log::{debug, info};

use crate::{
    error::{InsightError, InsightResult},
    io_utils,
    record::{Dataset, Record, YEAR_KEY},
    value::{RawCell, Scalar, format_number, normalize},
};

/// One grid of raw cells, header row first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<RawCell>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<RawCell>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    /// Forces delimited parsing with this delimiter.
    pub delimiter: Option<u8>,
    pub encoding: &'static Encoding,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            encoding: UTF_8,
        }
    }
}

pub fn load_path(path: &Path, options: &LoadOptions) -> InsightResult<Dataset> {
    let source_name = path.display().to_string();
    let workbook = match io_utils::delimiter_for_path(path, options.delimiter) {
        Some(delimiter) => {
            let file = std::fs::File::open(path).map_err(|e| InsightError::parse(&source_name, e))?;
            read_delimited(file, delimiter, options.encoding, &source_name)?
        }
        None => {
            let sheets = open_workbook_auto(path).map_err(|e| InsightError::parse(&source_name, e))?;
            read_spreadsheet(sheets, &source_name)?
        }
    };
    Ok(ingest_logged(&workbook, &source_name))
}

/// Parses an uploaded source held in memory. `name` selects the format by
/// its extension, the same way [`load_path()`] does.
pub fn load_bytes(bytes: Vec<u8>, name: &str, options: &LoadOptions) -> InsightResult<Dataset> {
    let workbook = match io_utils::delimiter_for_path(Path::new(name), options.delimiter) {
        Some(delimiter) => read_delimited(bytes.as_slice(), delimiter, options.encoding, name)?,
        None => {
            let sheets =
                open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| InsightError::parse(name, e))?;
            read_spreadsheet(sheets, name)?
        }
    };
    Ok(ingest_logged(&workbook, name))
}

fn ingest_logged(workbook: &Workbook, source_name: &str) -> Dataset {
    let dataset = ingest(workbook);
    info!(
        "Ingested {} record(s) from {} sheet(s) in '{}'",
        dataset.len(),
        workbook.sheets.len(),
        source_name
    );
    dataset
}

pub fn read_spreadsheet<RS>(mut sheets: Sheets<RS>, source_name: &str) -> InsightResult<Workbook>
where
    RS: Read + Seek,
{
    let mut workbook = Workbook::default();
    for name in sheets.sheet_names() {
        let range = sheets
            .worksheet_range(&name)
            .map_err(|e| InsightError::parse(source_name, format!("sheet '{name}': {e}")))?;
        workbook.sheets.push(Sheet::new(name, range_rows(&range)));
    }
    Ok(workbook)
}

/// Expands a used range into rows anchored at `A1`, so leading blank rows
/// and columns stay in place.
fn range_rows(range: &Range<Data>) -> Vec<Vec<RawCell>> {
    let Some((end_row, end_col)) = range.end() else {
        return Vec::new();
    };
    (0..=end_row)
        .map(|row| {
            (0..=end_col)
                .map(|col| range.get_value((row, col)).map_or(RawCell::Empty, convert_cell))
                .collect()
        })
        .collect()
}

fn convert_cell(value: &Data) -> RawCell {
    match value {
        Data::Empty => RawCell::Empty,
        Data::Bool(b) => RawCell::Bool(*b),
        Data::Int(i) => RawCell::Int(*i),
        Data::Float(f) => RawCell::Float(*f),
        Data::String(s) => RawCell::Text(s.clone()),
        Data::DateTime(dt) => convert_excel_datetime(dt),
        Data::DateTimeIso(s) | Data::DurationIso(s) => RawCell::Text(s.clone()),
        Data::Error(e) => RawCell::Text(e.to_string()),
    }
}

fn convert_excel_datetime(value: &ExcelDateTime) -> RawCell {
    if value.is_duration() {
        return RawCell::Float(value.as_f64());
    }
    match value.as_datetime() {
        // Serials below one day carry only a time of day.
        Some(dt) if value.as_f64() < 1.0 => RawCell::Time(dt.time()),
        Some(dt) => RawCell::DateTime(dt),
        None => RawCell::Float(value.as_f64()),
    }
}

pub fn read_delimited<R: Read>(
    reader: R,
    delimiter: u8,
    encoding: &'static Encoding,
    source_name: &str,
) -> InsightResult<Workbook> {
    let mut reader = io_utils::open_csv_reader(reader, delimiter);
    let mut rows = Vec::new();
    for (row_idx, record) in reader.byte_records().enumerate() {
        let record = record
            .map_err(|e| InsightError::parse(source_name, format!("row {}: {e}", row_idx + 1)))?;
        let decoded = io_utils::decode_record(&record, encoding)
            .map_err(|e| InsightError::parse(source_name, format!("row {}: {e}", row_idx + 1)))?;
        rows.push(
            decoded
                .into_iter()
                .map(|field| {
                    if field.is_empty() {
                        RawCell::Empty
                    } else {
                        RawCell::Text(field)
                    }
                })
                .collect(),
        );
    }
    Ok(Workbook {
        sheets: vec![Sheet::new(source_name, rows)],
    })
}

pub fn ingest(workbook: &Workbook) -> Dataset {
    let mut records = Vec::new();
    for sheet in &workbook.sheets {
        let Some((header_row, body)) = sheet.rows.split_first() else {
            debug!("Skipping empty sheet '{}'", sheet.name);
            continue;
        };
        let headers = header_row
            .iter()
            .enumerate()
            .map(|(idx, cell)| canonical_header(&raw_text(cell), idx))
            .collect::<Vec<_>>();
        debug!("Sheet '{}' headers: {:?}", sheet.name, headers);
        records.extend(body.iter().map(|row| build_record(&headers, row)));
    }
    Dataset::new(records)
}

fn build_record(headers: &[String], row: &[RawCell]) -> Record {
    let width = headers.len().max(row.len());
    let mut record = Record::with_capacity(width + 1);
    for idx in 0..width {
        let key = headers
            .get(idx)
            .cloned()
            .unwrap_or_else(|| positional_key(idx));
        let value = row.get(idx).map_or(Scalar::Null, normalize);
        record.insert(key, value);
    }
    infer_year(&mut record);
    record
}

/// Adds a `year` field from the first four-digit field when none exists.
pub fn infer_year(record: &mut Record) {
    if record.contains_key(YEAR_KEY) {
        return;
    }
    if let Some(year) = record.first_year_like() {
        record.insert(YEAR_KEY, Scalar::Number(f64::from(year)));
    }
}

pub fn canonical_header(raw: &str, index: usize) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return positional_key(index);
    }
    trimmed
        .to_lowercase()
        .replace(['\n', '\r'], " ")
        .trim()
        .to_string()
}

fn positional_key(index: usize) -> String {
    format!("col_{index}")
}

/// Header text of a cell, without numeric normalization.
fn raw_text(cell: &RawCell) -> String {
    match cell {
        RawCell::Empty => String::new(),
        RawCell::Text(s) => s.clone(),
        RawCell::Bool(b) => b.to_string(),
        RawCell::Int(i) => i.to_string(),
        RawCell::Float(f) => format_number(*f),
        RawCell::Decimal(d) => d.to_string(),
        other => normalize(other).as_display(),
    }
}
