//! Area queries: filter, aggregate and summarize in one pass.

use anyhow::Result;
use log::{debug, info, warn};
use serde::Serialize;

use crate::{
    cli::QueryArgs,
    context::AnalysisContext,
    filter::{filter_by_area, resolve_area},
    heuristics::Heuristics,
    record::{Dataset, Record},
    schema::infer_schema,
    series::{SeriesPoint, build_time_series},
    summary::build_summary,
    table,
};

#[derive(Debug, Clone, Default)]
pub struct QueryRequest {
    /// Free text such as `"analyze Baner"`.
    pub query: String,
    /// Area to use verbatim instead of extracting one from `query`.
    pub area: Option<String>,
    pub price_column: Option<String>,
    pub demand_column: Option<String>,
}

impl QueryRequest {
    pub fn text(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn area(area: impl Into<String>) -> Self {
        Self {
            area: Some(area.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    pub summary: String,
    pub area: String,
    pub price_column: Option<String>,
    pub demand_column: Option<String>,
    pub price_series: Vec<SeriesPoint>,
    pub demand_series: Vec<SeriesPoint>,
    /// Price series over the whole dataset, charted when the area has none.
    pub overall_price_series: Vec<SeriesPoint>,
    pub records: Vec<Record>,
}

impl QueryResult {
    pub fn chart(&self) -> &[SeriesPoint] {
        if self.price_series.is_empty() {
            &self.overall_price_series
        } else {
            &self.price_series
        }
    }
}

pub fn run_query(dataset: &Dataset, request: &QueryRequest, heuristics: &Heuristics) -> QueryResult {
    let roles = infer_schema(dataset, heuristics);
    let price_column = resolve_column(dataset, request.price_column.as_deref(), roles.primary_price());
    let demand_column =
        resolve_column(dataset, request.demand_column.as_deref(), roles.primary_demand());

    let overall_price_series = match price_column.as_deref() {
        Some(column) => build_time_series(dataset.records(), Some(column)),
        None => Vec::new(),
    };

    let area = resolve_area(request.area.as_deref(), &request.query, heuristics);
    debug!("Resolved area token '{area}'");
    let filtered = filter_by_area(dataset.records(), &area);

    let (price_series, demand_series) = if filtered.is_empty() {
        (Vec::new(), Vec::new())
    } else {
        let series_for = |column: Option<&str>| match column {
            Some(c) => build_time_series(filtered.iter().copied(), Some(c)),
            None => Vec::new(),
        };
        (
            series_for(price_column.as_deref()),
            series_for(demand_column.as_deref()),
        )
    };

    let summary = build_summary(
        &filtered,
        &area,
        price_column.as_deref(),
        demand_column.as_deref(),
    );

    QueryResult {
        summary,
        area,
        price_column,
        demand_column,
        price_series,
        demand_series,
        overall_price_series,
        records: filtered.into_iter().cloned().collect(),
    }
}

/// Uses the requested column when the dataset has it, else the inferred one.
fn resolve_column(dataset: &Dataset, requested: Option<&str>, inferred: Option<&str>) -> Option<String> {
    match requested.filter(|c| !c.is_empty()) {
        Some(column) if dataset.has_column(column) => Some(column.to_string()),
        Some(column) => {
            warn!("Column '{column}' not present in dataset; using detected column {inferred:?}");
            inferred.map(str::to_string)
        }
        None => inferred.map(str::to_string),
    }
}

pub fn execute(args: &QueryArgs) -> Result<()> {
    let context = AnalysisContext::from_args(&args.source)?;
    let dataset = context.dataset()?;
    let request = QueryRequest {
        query: args.query.clone().unwrap_or_default(),
        area: args.area.clone(),
        price_column: args.price_col.clone(),
        demand_column: args.demand_col.clone(),
    };
    let mut result = run_query(&dataset, &request, &context.heuristics);
    let matched = result.records.len();
    result.records.truncate(args.rows);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", render_result(&result).trim_end());
    }
    info!(
        "Query for '{}' matched {} of {} record(s)",
        result.area,
        matched,
        dataset.len()
    );
    Ok(())
}

/// Summary line followed by the chart, demand series and matching records.
pub fn render_result(result: &QueryResult) -> String {
    let mut sections = vec![result.summary.clone()];
    let chart = result.chart();
    if !chart.is_empty() {
        let label = if result.price_series.is_empty() {
            "price (all areas)"
        } else {
            "price"
        };
        sections.push(table::render_table(
            &table::series_headers(label),
            &table::series_rows(chart),
        ));
    }
    if !result.demand_series.is_empty() {
        sections.push(table::render_table(
            &table::series_headers("demand"),
            &table::series_rows(&result.demand_series),
        ));
    }
    if !result.records.is_empty() {
        let (headers, rows) = table::record_rows(&result.records);
        sections.push(table::render_table(&headers, &rows));
    }
    sections.join("\n")
}
