//! Column-role inference.
//!
//! Columns whose key contains a price or demand token become candidates for
//! that role and are kept when at least one sampled record holds a numeric
//! value for them. When no price column survives, the first column with
//! enough numeric samples is promoted instead.

use anyhow::Result;
use log::{debug, info, warn};
use serde::Serialize;

use crate::{
    cli::ColumnsArgs,
    context::AnalysisContext,
    heuristics::Heuristics,
    record::{Dataset, Record},
    table,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnRoles {
    pub price: Vec<String>,
    pub demand: Vec<String>,
}

impl ColumnRoles {
    pub fn primary_price(&self) -> Option<&str> {
        self.price.first().map(String::as_str)
    }

    pub fn primary_demand(&self) -> Option<&str> {
        self.demand.first().map(String::as_str)
    }
}

pub fn infer_schema(dataset: &Dataset, heuristics: &Heuristics) -> ColumnRoles {
    if dataset.is_empty() {
        return ColumnRoles::default();
    }
    let columns = dataset.columns();
    let sample_len = heuristics.sample_rows.min(dataset.len());
    let sample = &dataset.records()[..sample_len];

    let mut price = columns
        .iter()
        .filter(|c| heuristics.is_price_like(c))
        .filter(|c| numeric_count(sample, c) >= 1)
        .cloned()
        .collect::<Vec<_>>();
    let demand = columns
        .iter()
        .filter(|c| heuristics.is_demand_like(c))
        .filter(|c| numeric_count(sample, c) >= 1)
        .cloned()
        .collect::<Vec<_>>();

    if price.is_empty()
        && let Some(column) = columns
            .iter()
            .find(|c| numeric_count(sample, c) >= heuristics.fallback_min_numeric)
    {
        warn!("No price-like column found; falling back to numeric column '{column}'");
        price.push(column.clone());
    }

    debug!("Detected price columns {price:?}, demand columns {demand:?}");
    ColumnRoles { price, demand }
}

fn numeric_count(sample: &[Record], column: &str) -> usize {
    sample
        .iter()
        .filter(|r| r.get(column).and_then(|v| v.as_number()).is_some())
        .count()
}

pub fn execute(args: &ColumnsArgs) -> Result<()> {
    let context = AnalysisContext::from_args(&args.source)?;
    let dataset = context.dataset()?;
    let roles = infer_schema(&dataset, &context.heuristics);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&roles)?);
    } else {
        let mut rows = Vec::new();
        rows.extend(roles.price.iter().map(|c| vec!["price".to_string(), c.clone()]));
        rows.extend(roles.demand.iter().map(|c| vec!["demand".to_string(), c.clone()]));
        let headers = vec!["role".to_string(), "column".to_string()];
        table::print_table(&headers, &rows);
    }
    info!(
        "Detected {} price and {} demand column(s) across {} record(s)",
        roles.price.len(),
        roles.demand.len(),
        dataset.len()
    );
    Ok(())
}
