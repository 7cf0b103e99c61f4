//! Interactive session over a single resident dataset.
//!
//! Each input line is one command. `upload` replaces the resident dataset;
//! every other command reads whichever dataset is resident at that moment,
//! falling back to the sample when nothing was uploaded.

use std::{
    fs,
    io::{self, BufRead, Write},
    path::Path,
};

use anyhow::Result;
use log::{info, warn};

use crate::{
    areas::detect_areas,
    cli::SessionArgs,
    context::AnalysisContext,
    diagnostics::inspect_dataset,
    error::{InsightError, InsightResult},
    export::{default_file_name, export_csv},
    filter::filter_by_area,
    ingest::load_bytes,
    query::{QueryRequest, render_result, run_query},
    schema::infer_schema,
};

const HELP: &str = "\
commands:
  upload <path>           parse a spreadsheet or CSV and make it resident
  columns                 detected price and demand columns
  areas [max]             most frequent localities (default 100)
  query <text>            analyze the area named in free text
  area <name>             analyze an exact area token
  export <area> [path]    write matching records as CSV ('-' for all areas;
                          the path must end in .csv or contain a '/')
  inspect                 parsing diagnostics as JSON
  help                    this message
  quit                    leave the session";

const DEFAULT_AREA_LIMIT: usize = 100;

pub fn execute(args: &SessionArgs) -> Result<()> {
    let context = AnalysisContext::from_args(&args.source)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_session(&context, stdin.lock(), &mut stdout.lock())
}

pub fn run_session<R, W>(context: &AnalysisContext, input: R, out: &mut W) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    let mut handled = 0usize;
    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };
        if matches!(command, "quit" | "exit") {
            break;
        }
        handled += 1;
        match dispatch(context, command, rest) {
            Ok(output) => writeln!(out, "{}", output.trim_end())?,
            Err(err) => {
                warn!("Session command '{command}' failed: {err}");
                writeln!(out, "error: {err}")?;
            }
        }
    }
    info!("Session ended after {handled} command(s)");
    Ok(())
}

fn dispatch(context: &AnalysisContext, command: &str, rest: &str) -> InsightResult<String> {
    match command {
        "help" => Ok(HELP.to_string()),
        "upload" => upload(context, rest),
        "columns" => {
            let dataset = context.store.resolve(context.use_sample)?;
            let roles = infer_schema(&dataset, &context.heuristics);
            Ok(format!(
                "price: {}\ndemand: {}",
                roles.price.join(", "),
                roles.demand.join(", ")
            ))
        }
        "areas" => {
            let max = if rest.is_empty() {
                DEFAULT_AREA_LIMIT
            } else {
                rest.parse().map_err(|_| {
                    InsightError::Usage(format!("'{rest}' is not a valid area count"))
                })?
            };
            let dataset = context.store.resolve(context.use_sample)?;
            Ok(detect_areas(&dataset, max, &context.heuristics).join("\n"))
        }
        "query" | "area" => {
            let dataset = context.store.resolve(context.use_sample)?;
            let request = if command == "area" {
                QueryRequest::area(rest)
            } else {
                QueryRequest::text(rest)
            };
            Ok(render_result(&run_query(&dataset, &request, &context.heuristics)))
        }
        "export" => export(context, rest),
        "inspect" => {
            let dataset = context.store.resolve(context.use_sample)?;
            let report = inspect_dataset(&dataset, 3, &context.heuristics);
            serde_json::to_string_pretty(&report).map_err(|e| InsightError::Io(e.into()))
        }
        other => Err(InsightError::Usage(format!(
            "unknown command '{other}' (try 'help')"
        ))),
    }
}

fn upload(context: &AnalysisContext, path: &str) -> InsightResult<String> {
    if path.is_empty() {
        return Err(InsightError::Usage("upload needs a file path".to_string()));
    }
    let bytes = fs::read(path)?;
    let name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string());
    let dataset = load_bytes(bytes, &name, &context.load_options)?;
    let rows = dataset.len();
    context.store.replace(dataset);
    Ok(format!("File uploaded and parsed successfully. ({rows} rows)"))
}

fn export(context: &AnalysisContext, rest: &str) -> InsightResult<String> {
    let (area, target) = split_export_args(rest);
    let target = target
        .map(str::to_string)
        .unwrap_or_else(|| default_file_name(area));
    let dataset = context.store.resolve(context.use_sample)?;
    let bytes = export_csv(&dataset, area)?;
    fs::write(&target, &bytes)?;
    let rows = filter_by_area(dataset.records(), area).len();
    Ok(format!("Exported {rows} record(s) to {target}"))
}

/// Splits `<area> [path]`. The last word is a path only when it ends in
/// `.csv` or contains a separator, so multi-word areas stay whole.
/// An area of `-` selects every record.
fn split_export_args(rest: &str) -> (&str, Option<&str>) {
    let (area, target) = match rest.rsplit_once(char::is_whitespace) {
        Some((head, last)) if looks_like_path(last) => (head.trim(), Some(last)),
        _ => (rest.trim(), None),
    };
    if area == "-" { ("", target) } else { (area, target) }
}

fn looks_like_path(word: &str) -> bool {
    word.to_ascii_lowercase().ends_with(".csv") || word.contains(['/', '\\'])
}
