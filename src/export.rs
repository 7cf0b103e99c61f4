//! CSV export of the records matching an area.

use anyhow::{Context, Result};
use log::info;

use crate::{
    cli::ExportArgs,
    context::AnalysisContext,
    error::{InsightError, InsightResult},
    filter::filter_by_area,
    io_utils,
    record::Dataset,
};

/// Serializes the records matching `area` as CSV.
///
/// The header row is the first matching record's key order; later records
/// are written by those keys, leaving cells blank where a key is missing.
pub fn export_csv(dataset: &Dataset, area: &str) -> InsightResult<Vec<u8>> {
    let filtered = filter_by_area(dataset.records(), area);
    let Some(first) = filtered.first() else {
        return Err(InsightError::EmptyResult {
            area: area.to_string(),
        });
    };
    let keys = first.keys().collect::<Vec<_>>();

    let mut writer = io_utils::csv_writer(Vec::new());
    writer.write_record(&keys).map_err(csv_error)?;
    for record in &filtered {
        let row = keys
            .iter()
            .map(|key| record.get(key).map(|v| v.as_display()).unwrap_or_default());
        writer.write_record(row).map_err(csv_error)?;
    }
    writer
        .into_inner()
        .map_err(|err| InsightError::Io(err.into_error()))
}

fn csv_error(err: csv::Error) -> InsightError {
    InsightError::Io(err.into())
}

/// File name offered for a download of `area`'s records.
pub fn default_file_name(area: &str) -> String {
    let area = area.trim();
    if area.is_empty() {
        "filtered_all.csv".to_string()
    } else {
        format!("filtered_{area}.csv")
    }
}

pub fn execute(args: &ExportArgs) -> Result<()> {
    let context = AnalysisContext::from_args(&args.source)?;
    let dataset = context.dataset()?;
    let area = args.area.clone().unwrap_or_default();
    let bytes = export_csv(&dataset, &area)?;
    io_utils::write_output(args.output.as_deref(), &bytes)
        .with_context(|| format!("Writing export for '{area}'"))?;
    info!(
        "Exported {} byte(s) for '{}' to {}",
        bytes.len(),
        area,
        args.output
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "stdout".to_string())
    );
    Ok(())
}
