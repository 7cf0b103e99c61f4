//! Locality detection by value frequency.

use std::collections::HashMap;

use anyhow::Result;
use log::info;

use crate::{
    cli::AreasArgs,
    context::AnalysisContext,
    heuristics::Heuristics,
    record::Dataset,
    table,
};

/// Ranks locality-like values by frequency, most frequent first.
///
/// Only columns whose key carries a locality token are scanned; when none do,
/// every column is. Ties keep the order in which values were first seen.
pub fn detect_areas(dataset: &Dataset, max_values: usize, heuristics: &Heuristics) -> Vec<String> {
    let columns = dataset.columns();
    let mut candidates = columns
        .iter()
        .filter(|c| heuristics.is_locality_like(c))
        .map(String::as_str)
        .collect::<Vec<_>>();
    if candidates.is_empty() {
        candidates = columns.iter().map(String::as_str).collect();
    }

    let mut counter = AreaCounter::default();
    for record in dataset.records() {
        for column in &candidates {
            let Some(value) = record.get(column) else {
                continue;
            };
            if value.is_null() {
                continue;
            }
            let display = value.as_display();
            let trimmed = display.trim();
            if trimmed.is_empty()
                || looks_numeric(trimmed)
                || trimmed.chars().count() > heuristics.max_area_length
            {
                continue;
            }
            counter.add(trimmed);
        }
    }
    counter.ranked(max_values)
}

/// Digits once commas, periods and spaces are gone.
fn looks_numeric(value: &str) -> bool {
    let mut digits = value
        .chars()
        .filter(|c| !matches!(c, ',' | '.' | ' '))
        .peekable();
    digits.peek().is_some() && digits.all(|c| c.is_ascii_digit())
}

#[derive(Default)]
struct AreaCounter {
    index: HashMap<String, usize>,
    counts: Vec<(String, usize)>,
}

impl AreaCounter {
    fn add(&mut self, value: &str) {
        match self.index.get(value) {
            Some(&slot) => self.counts[slot].1 += 1,
            None => {
                self.index.insert(value.to_string(), self.counts.len());
                self.counts.push((value.to_string(), 1));
            }
        }
    }

    fn ranked(mut self, max_values: usize) -> Vec<String> {
        // Stable sort keeps first-seen order among equal counts.
        self.counts.sort_by(|a, b| b.1.cmp(&a.1));
        self.counts
            .into_iter()
            .take(max_values)
            .map(|(value, _)| value)
            .collect()
    }
}

pub fn execute(args: &AreasArgs) -> Result<()> {
    let context = AnalysisContext::from_args(&args.source)?;
    let dataset = context.dataset()?;
    let areas = detect_areas(&dataset, args.max, &context.heuristics);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&areas)?);
    } else {
        let rows = areas
            .iter()
            .enumerate()
            .map(|(idx, area)| vec![(idx + 1).to_string(), area.clone()])
            .collect::<Vec<_>>();
        let headers = vec!["#".to_string(), "area".to_string()];
        table::print_table(&headers, &rows);
    }
    info!("Detected {} area(s) across {} record(s)", areas.len(), dataset.len());
    Ok(())
}
