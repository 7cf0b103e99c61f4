//! Dataset diagnostics: what was parsed and what inference made of it.

use anyhow::Result;
use log::info;
use serde::Serialize;

use crate::{
    areas::detect_areas,
    cli::InspectArgs,
    context::AnalysisContext,
    heuristics::Heuristics,
    record::{Dataset, Record},
    schema::infer_schema,
};

const INSPECT_AREA_LIMIT: usize = 20;

#[derive(Debug, Clone, Serialize)]
pub struct DatasetReport {
    pub rows: usize,
    pub headers: Vec<String>,
    pub preview: Vec<Record>,
    pub price_columns: Vec<String>,
    pub demand_columns: Vec<String>,
    pub areas: Vec<String>,
}

pub fn inspect_dataset(dataset: &Dataset, preview: usize, heuristics: &Heuristics) -> DatasetReport {
    let roles = infer_schema(dataset, heuristics);
    DatasetReport {
        rows: dataset.len(),
        headers: dataset.columns(),
        preview: dataset.records().iter().take(preview).cloned().collect(),
        price_columns: roles.price,
        demand_columns: roles.demand,
        areas: detect_areas(dataset, INSPECT_AREA_LIMIT, heuristics),
    }
}

#[derive(Debug, Serialize)]
struct InspectOutput {
    sample_path: Option<String>,
    upload_present: bool,
    #[serde(flatten)]
    report: DatasetReport,
}

pub fn execute(args: &InspectArgs) -> Result<()> {
    let context = AnalysisContext::from_args(&args.source)?;
    let dataset = context.dataset()?;
    let report = inspect_dataset(&dataset, args.preview, &context.heuristics);
    let output = InspectOutput {
        sample_path: context
            .store
            .fallback_path()
            .map(|p| p.display().to_string()),
        upload_present: context.store.has_upload(),
        report,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    info!("Inspected {} record(s)", dataset.len());
    Ok(())
}
