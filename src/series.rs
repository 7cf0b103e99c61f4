//! Year-indexed averaging of a metric column.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::record::Record;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub year: i64,
    pub value: f64,
}

/// Per-year mean of `metric` over `records`, ascending by year.
///
/// A record counts when it has a year (its numeric `year` field, otherwise
/// the first field carrying four digits) and a value (the metric column when
/// numeric, otherwise the first numeric field). Year `0` is treated as absent.
pub fn build_time_series<'a, I>(records: I, metric: Option<&str>) -> Vec<SeriesPoint>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut buckets: BTreeMap<i64, (f64, usize)> = BTreeMap::new();
    for record in records {
        let Some(year) = record_year(record) else {
            continue;
        };
        let Some(value) = metric_value(record, metric) else {
            continue;
        };
        let bucket = buckets.entry(year).or_insert((0.0, 0));
        bucket.0 += value;
        bucket.1 += 1;
    }
    buckets
        .into_iter()
        .map(|(year, (sum, count))| SeriesPoint {
            year,
            value: sum / count as f64,
        })
        .collect()
}

fn record_year(record: &Record) -> Option<i64> {
    record
        .numeric_year()
        .or_else(|| record.first_year_like().map(i64::from))
        .filter(|year| *year != 0)
}

fn metric_value(record: &Record, metric: Option<&str>) -> Option<f64> {
    metric
        .and_then(|column| record.get(column))
        .and_then(|v| v.as_number())
        .or_else(|| record.values().find_map(|v| v.as_number()))
}
