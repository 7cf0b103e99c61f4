//! Plain-text tables for terminal output.

use std::borrow::Cow;
use std::fmt::Write as _;

use crate::{record::Record, series::SeriesPoint, value::format_number};

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths = headers.iter().map(|h| display_width(h)).collect::<Vec<_>>();
    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(widths.len()) {
            widths[idx] = widths[idx].max(display_width(cell));
        }
    }
    for width in &mut widths {
        *width = (*width).max(1);
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(headers, &widths));
    let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&rule, &widths));
    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths));
    }
    output
}

pub fn print_table(headers: &[String], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

pub fn series_headers(label: &str) -> Vec<String> {
    vec!["year".to_string(), label.to_string()]
}

pub fn series_rows(series: &[SeriesPoint]) -> Vec<Vec<String>> {
    series
        .iter()
        .map(|point| vec![point.year.to_string(), format_average(point.value)])
        .collect()
}

/// Headers from the first record's keys, one row per record.
pub fn record_rows(records: &[Record]) -> (Vec<String>, Vec<Vec<String>>) {
    let headers = records
        .first()
        .map(|r| r.keys().map(str::to_string).collect::<Vec<_>>())
        .unwrap_or_default();
    let rows = records
        .iter()
        .map(|record| {
            headers
                .iter()
                .map(|key| record.get(key).map(|v| v.as_display()).unwrap_or_default())
                .collect()
        })
        .collect();
    (headers, rows)
}

fn format_average(value: f64) -> String {
    if value.fract() == 0.0 {
        format_number(value)
    } else {
        format!("{value:.2}")
    }
}

fn format_row(values: &[String], widths: &[usize]) -> String {
    let mut line = values
        .iter()
        .zip(widths)
        .map(|(value, width)| {
            let sanitized = sanitize_cell(value);
            let padding = width.saturating_sub(display_width(&sanitized));
            format!("{sanitized}{}", " ".repeat(padding))
        })
        .collect::<Vec<_>>()
        .join("  ");
    while line.ends_with(' ') {
        line.pop();
    }
    line
}

fn display_width(value: &str) -> usize {
    value.chars().filter(|c| !c.is_control()).count()
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}
