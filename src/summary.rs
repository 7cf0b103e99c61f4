//! The one-sentence analysis summary.

use itertools::{Itertools, MinMaxResult};

use crate::record::Record;

/// One-sentence description of a filtered record set.
pub fn build_summary(
    records: &[&Record],
    area: &str,
    price_column: Option<&str>,
    demand_column: Option<&str>,
) -> String {
    if records.is_empty() {
        return format!(
            "No records found for '{area}'. Try another locality or upload a different dataset."
        );
    }

    let years = match records
        .iter()
        .filter_map(|r| r.numeric_year())
        .filter(|y| *y != 0)
        .minmax()
    {
        MinMaxResult::NoElements => "N/A".to_string(),
        MinMaxResult::OneElement(y) => format!("{y}–{y}"),
        MinMaxResult::MinMax(min, max) => format!("{min}–{max}"),
    };

    let mut parts = vec![format!("{} records", records.len()), format!("years: {years}")];
    if let Some(avg) = price_column.and_then(|c| column_average(records, c)) {
        parts.push(format!("avg price ≈ ₹{}", format_thousands(avg)));
    }
    if let Some(avg) = demand_column.and_then(|c| column_average(records, c)) {
        parts.push(format!("avg demand ≈ {}", avg.trunc() as i64));
    }

    let label = if area.is_empty() { "All areas" } else { area };
    format!(
        "Analysis for {label}: {}. Recent trend: moderate.",
        parts.join(", ")
    )
}

fn column_average(records: &[&Record], column: &str) -> Option<f64> {
    let values = records
        .iter()
        .filter_map(|r| r.get(column).and_then(|v| v.as_number()))
        .collect::<Vec<_>>();
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Integer part of `value` with `,` between groups of three digits.
pub fn format_thousands(value: f64) -> String {
    let whole = value.trunc() as i64;
    let digits = whole.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if whole < 0 {
        grouped.push('-');
    }
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
